pub mod variable;

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{info, LevelFilter};
use simplelog::{Config, WriteLogger};

/// Get the state directory path using XDG Base Directory specification
/// Used for logs and other state files
pub fn get_state_dir() -> PathBuf {
    dirs::state_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("state")))
        .unwrap_or_else(std::env::temp_dir)
        .join("rtconfig")
}

pub fn parse_level(log_level: &str) -> LevelFilter {
    match log_level.to_lowercase().as_str() {
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

/// Sends log records to a timestamped file under the state directory, so
/// command output on stdout stays clean.
pub fn setup_logging(log_level: &str) -> Result<()> {
    let log_dir = get_state_dir().join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let log_file_path = log_dir.join(format!(
        "rtconfig-debug-{}.log",
        chrono::Local::now().format("%Y%m%d%H%M%S")
    ));

    WriteLogger::init(
        parse_level(log_level),
        Config::default(),
        File::create(&log_file_path)?,
    )?;

    info!("Logging to: {}", log_file_path.display());
    Ok(())
}
