use anyhow::{Context, Result};
use gcp_auth::TokenProvider;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Scopes requested when the settings name none.
pub const DEFAULT_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/cloudruntimeconfig",
    "https://www.googleapis.com/auth/cloud-platform",
];

/// Application Default Credentials authentication.
///
/// Resolution order is the one `gcp_auth` implements: the key file named by
/// `GOOGLE_APPLICATION_CREDENTIALS`, `gcloud auth application-default login`,
/// then the metadata server of the hosting VM or serverless runtime.
/// The provider is created on first use and shared between clones.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct GcpAuth {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,
    #[serde(skip)]
    provider: Arc<OnceCell<Arc<dyn TokenProvider>>>,
}

impl fmt::Debug for GcpAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GcpAuth")
            .field("scopes", &self.scopes)
            .field("provider", &"<OnceCell<TokenProvider>>")
            .finish()
    }
}

impl GcpAuth {
    async fn provider(&self) -> Result<&Arc<dyn TokenProvider>> {
        self.provider
            .get_or_try_init(|| async {
                gcp_auth::provider()
                    .await
                    .context("Failed to create GCP token provider")
            })
            .await
    }

    /// Returns an access token for the configured scopes; `gcp_auth` refreshes
    /// it when expired.
    pub async fn token(&self) -> Result<String> {
        let scopes: Vec<&str> = match &self.scopes {
            Some(scopes) => scopes.iter().map(String::as_str).collect(),
            None => DEFAULT_SCOPES.to_vec(),
        };
        debug!("Requesting GCP access token for scopes {scopes:?}");

        let token = self
            .provider()
            .await?
            .token(&scopes)
            .await
            .context("Failed to get GCP access token")?;

        Ok(token.as_str().to_string())
    }
}
