//! Client for runtime configuration variables.
//!
//! A [`Client`] binds a project to a [`Connection`]; it hands out [`Config`]
//! handles, which in turn hand out [`Variable`] proxies that can be created,
//! updated, probed and reloaded against the remote service.

pub mod runtimeconfig;

pub use runtimeconfig::client::{Client, HttpConnection};
pub use runtimeconfig::config::ClientSettings;
pub use runtimeconfig::error::{ApiError, ResourceError};
pub use runtimeconfig::model::{Payload, VariableState};
pub use runtimeconfig::resource::{Config, Variable, VariablePage};
pub use runtimeconfig::traits::Connection;
