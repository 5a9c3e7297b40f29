use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

mod commands;

use commands::setup_logging;
use commands::variable::model::VariableCommand;
use rtconfig::{Client, ClientSettings};

#[derive(Parser)]
#[clap(name = "rtconfig", bin_name = "rtconfig", version, about)]
struct RtConfigApp {
    /// Settings file, defaults to ~/.config/rtconfig/config.toml
    #[clap(short, long, global = true)]
    file: Option<String>,
    /// Project to act on, overrides the settings file
    #[clap(short, long, global = true, env = "RTCONFIG_PROJECT")]
    project: Option<String>,
    #[clap(subcommand)]
    command: VariableCommand,
}

impl RtConfigApp {
    pub async fn run(&self) -> Result<()> {
        // setup logging
        if let Ok(log_level) = std::env::var("RTCONFIG_LOG") {
            setup_logging(&log_level)?;
        }

        let path = self.file.as_ref().map(PathBuf::from);
        let mut settings = ClientSettings::from_file(path.as_deref())?;
        if let Some(project) = &self.project {
            settings.project = Some(project.clone());
        }

        let client = Client::from_settings(&settings)?;
        self.command.run(&client).await
    }
}

// Initialize rustls crypto provider for gcp_auth
// This uses ring as the crypto backend
fn init_crypto_provider() {
    use std::sync::Once;
    static CRYPTO_PROVIDER_INIT: Once = Once::new();

    CRYPTO_PROVIDER_INIT.call_once(|| {
        // This may fail if already installed, which is fine
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    init_crypto_provider();

    let app = RtConfigApp::parse();
    app.run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        RtConfigApp::command().debug_assert();
    }

    #[test]
    fn test_parse_set_with_global_options() {
        let app = RtConfigApp::try_parse_from([
            "rtconfig", "set", "my-config", "my-var", "--text", "hello", "-p", "my-project",
        ])
        .unwrap();
        assert_eq!(app.project.as_deref(), Some("my-project"));
        match app.command {
            VariableCommand::Set(cmd) => {
                assert_eq!(cmd.config, "my-config");
                assert_eq!(cmd.name, "my-var");
                assert_eq!(cmd.text.as_deref(), Some("hello"));
                assert!(cmd.base64.is_none());
            }
            _ => panic!("expected set"),
        }
    }

    #[test]
    fn test_set_requires_exactly_one_payload() {
        assert!(RtConfigApp::try_parse_from(["rtconfig", "set", "c", "v"]).is_err());
        assert!(RtConfigApp::try_parse_from([
            "rtconfig", "set", "c", "v", "--text", "a", "--base64", "YQ=="
        ])
        .is_err());
    }

    #[test]
    fn test_list_alias_and_optional_exists_name() {
        let app = RtConfigApp::try_parse_from(["rtconfig", "ls", "my-config"]).unwrap();
        assert!(matches!(app.command, VariableCommand::List(_)));

        let app = RtConfigApp::try_parse_from(["rtconfig", "exists", "my-config"]).unwrap();
        match app.command {
            VariableCommand::Exists(cmd) => assert!(cmd.name.is_none()),
            _ => panic!("expected exists"),
        }
    }
}
