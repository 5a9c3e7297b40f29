pub mod base;
pub mod gcp;
mod http;

pub use http::HttpConnection;

use anyhow::Result;
use log::info;
use std::fmt;
use std::sync::Arc;

use super::config::ClientSettings;
use super::resource::Config;
use super::traits::Connection;

/// Binds a project to a connection and hands out [`Config`] handles.
///
/// Cloning is cheap; clones share the connection.
#[derive(Clone)]
pub struct Client {
    project: String,
    connection: Arc<dyn Connection>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("project", &self.project)
            .field("connection", &"<Connection>")
            .finish()
    }
}

impl Client {
    pub fn new(project: impl Into<String>, connection: Arc<dyn Connection>) -> Self {
        Self {
            project: project.into(),
            connection,
        }
    }

    /// Builds a client talking HTTP to the endpoint named in `settings`.
    pub fn from_settings(settings: &ClientSettings) -> Result<Self> {
        let project = settings.project()?;
        let connection = HttpConnection::new(settings.clone())?;
        info!(
            "Created client for project {project} at {}",
            connection.base().base_url()
        );
        Ok(Self::new(project, Arc::new(connection)))
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    /// The connection bound to this client.
    pub fn connection(&self) -> Arc<dyn Connection> {
        Arc::clone(&self.connection)
    }

    /// Returns a handle for the config `name`. No request is made.
    pub fn config(&self, name: impl Into<String>) -> Config {
        Config::new(name, self.clone())
    }
}
