use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use url::Url;

use super::client::gcp::GcpAuth;

pub const DEFAULT_ENDPOINT: &str = "https://runtimeconfig.googleapis.com";
pub const DEFAULT_API_VERSION: &str = "v1beta1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Expands environment variables in a string value.
/// Supports ${VAR} and $VAR syntax.
pub fn expand_env_vars(value: &str) -> Result<String> {
    shellexpand::env(value)
        .map(|s| s.into_owned())
        .map_err(|e| anyhow::anyhow!("Failed to expand environment variable in '{}': {}", value, e))
}

/// Default settings location: `{config_dir}/rtconfig/config.toml`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("rtconfig")
        .join("config.toml")
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Settings read from `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ClientSettings {
    pub project: Option<String>,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default)]
    pub auth: Auth,
    pub proxy: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(skip_serializing)]
    pub path: Option<PathBuf>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub enum Auth {
    /// Application Default Credentials.
    Gcp(GcpAuth),
    Token(TokenCmd),
    /// No credentials, for emulators and local testing.
    Anonymous,
}

impl Default for Auth {
    fn default() -> Self {
        Auth::Gcp(GcpAuth::default())
    }
}

/// A bearer token, either literal or printed by a helper command.
#[derive(Deserialize, Serialize, Clone)]
pub struct TokenCmd {
    pub cmd: Option<String>,
    pub token: Option<String>,
}

impl std::fmt::Debug for TokenCmd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCmd")
            .field("cmd", &self.cmd)
            .field("token", &self.token.as_ref().map(|_| "***redacted***"))
            .finish()
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientSettings {
    /// Creates settings pointing at the public service with ADC authentication
    /// and no project.
    pub fn new() -> Self {
        Self {
            project: None,
            endpoint: default_endpoint(),
            api_version: default_api_version(),
            auth: Auth::default(),
            proxy: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            path: None,
        }
    }

    /// Loads settings from `config_path`, or from the default location when no
    /// path is given. Only a missing default file yields the defaults; an
    /// explicit path has to exist.
    pub fn from_file(config_path: Option<&Path>) -> Result<Self> {
        let path = match config_path {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Settings file {} not found", path.display());
                }
                path.to_path_buf()
            }
            None => default_config_path(),
        };
        info!("Using configuration path: {}", path.display());

        let toml_settings = if path.exists() {
            std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?
        } else {
            String::new()
        };
        let mut settings = Self::from_toml(&toml_settings)
            .with_context(|| format!("Invalid settings in {}", path.display()))?;
        settings.path = Some(path);
        Ok(settings)
    }

    pub fn from_toml(settings: &str) -> Result<Self> {
        let settings: ClientSettings = toml::from_str(settings)?;
        let endpoint = expand_env_vars(&settings.endpoint)?;
        Url::parse(&endpoint).with_context(|| format!("Invalid endpoint URL: {endpoint}"))?;
        info!(
            "Loaded settings: project={:?}, endpoint={}, api_version={}",
            settings.project, settings.endpoint, settings.api_version
        );
        Ok(settings)
    }

    /// The configured project with environment variables expanded.
    pub fn project(&self) -> Result<String> {
        let project = self
            .project
            .as_deref()
            .context("No project configured; set `project` in the settings file or pass --project")?;
        let project = expand_env_vars(project)?;
        if project.is_empty() {
            anyhow::bail!("Configured project is empty");
        }
        Ok(project)
    }
}
