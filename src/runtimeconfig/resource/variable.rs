use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, info};
use reqwest::Method;
use serde_json::{json, Value};
use time::OffsetDateTime;

use super::config::Config;
use crate::runtimeconfig::error::{ApiError, ResourceError};
use crate::runtimeconfig::model::{
    parse_timestamp, Payload, VariableProperties, VariableResource, VariableState,
};
use crate::runtimeconfig::names::variable_name_from_full_name;
use crate::runtimeconfig::traits::Connection;

/// Local proxy for one variable of a [`Config`].
///
/// Setting the payload only changes local state; call [`Variable::create`] or
/// [`Variable::update`] to persist it. Every successful response replaces
/// the local properties wholesale.
#[derive(Debug, Clone)]
pub struct Variable {
    /// Name relative to the config; may contain `/`.
    pub name: String,
    config: Config,
    properties: VariableProperties,
}

impl Variable {
    pub fn new(name: impl Into<String>, config: Config) -> Self {
        Self {
            name: name.into(),
            config,
            properties: VariableProperties::default(),
        }
    }

    /// Builds a variable from its API representation, deriving the name from
    /// the resource's fully-qualified name, which must be present.
    pub fn from_resource(resource: VariableResource, config: Config) -> Result<Self, ResourceError> {
        if resource.name.is_none() {
            return Err(ResourceError::InvalidName {
                full_name: String::new(),
            });
        }
        let mut variable = Self::new(String::new(), config);
        variable.set_properties(&resource)?;
        Ok(variable)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// E.g. `projects/my-project/configs/my-config/variables/my-var`.
    pub fn full_name(&self) -> Result<String, ResourceError> {
        if self.name.is_empty() {
            return Err(ResourceError::InvalidState {
                reason: "Missing variable name.".to_string(),
            });
        }
        Ok(format!("{}/variables/{}", self.config.full_name()?, self.name))
    }

    pub fn path(&self) -> Result<String, ResourceError> {
        Ok(format!("/{}", self.full_name()?))
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.properties.payload.as_ref()
    }

    pub fn text(&self) -> Option<&str> {
        match &self.properties.payload {
            Some(Payload::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Fails with [`ResourceError::ConflictingFields`] if a binary value is set.
    pub fn set_text(&mut self, text: impl Into<String>) -> Result<(), ResourceError> {
        if let Some(Payload::Binary(_)) = self.properties.payload {
            return Err(ResourceError::ConflictingFields);
        }
        self.properties.payload = Some(Payload::Text(text.into()));
        Ok(())
    }

    pub fn value(&self) -> Option<&[u8]> {
        match &self.properties.payload {
            Some(Payload::Binary(value)) => Some(value.as_slice()),
            _ => None,
        }
    }

    /// Fails with [`ResourceError::ConflictingFields`] if text is set.
    pub fn set_value(&mut self, value: impl Into<Vec<u8>>) -> Result<(), ResourceError> {
        if let Some(Payload::Text(_)) = self.properties.payload {
            return Err(ResourceError::ConflictingFields);
        }
        self.properties.payload = Some(Payload::Binary(value.into()));
        Ok(())
    }

    /// [`VariableState::Unspecified`] until the server reported a state.
    pub fn state(&self) -> VariableState {
        self.properties.state.unwrap_or_default()
    }

    /// Last update as reported by the server, in UTC.
    pub fn update_time(&self) -> Result<Option<OffsetDateTime>, ResourceError> {
        self.properties
            .update_time
            .as_deref()
            .map(parse_timestamp)
            .transpose()
    }

    /// Request body for create and update: the full name plus exactly one of
    /// `text` or base64 `value`.
    pub fn build_payload(&self) -> Result<Value, ResourceError> {
        let mut data = json!({ "name": self.full_name()? });
        match &self.properties.payload {
            Some(Payload::Text(text)) => data["text"] = json!(text),
            Some(Payload::Binary(value)) => data["value"] = json!(STANDARD.encode(value)),
            None => return Err(ResourceError::MissingPayload),
        }
        Ok(data)
    }

    fn set_properties(&mut self, resource: &VariableResource) -> Result<(), ResourceError> {
        // Decode everything before touching local state
        let properties = VariableProperties::try_from(resource)?;
        if let Some(full_name) = &resource.name {
            self.name = variable_name_from_full_name(full_name)?;
        }
        self.properties = properties;
        Ok(())
    }

    fn absorb(&mut self, response: Value) -> Result<()> {
        let resource: VariableResource =
            serde_json::from_value(response).context("Failed to decode variable resource")?;
        self.set_properties(&resource)?;
        Ok(())
    }

    /// Creates the variable with a POST to `{config_path}/variables`.
    ///
    /// Returns `false` if it already exists, leaving local state untouched.
    pub async fn create(&mut self, connection: Option<&dyn Connection>) -> Result<bool> {
        let bound = self.config.client().connection();
        let connection = connection.unwrap_or(bound.as_ref());
        let path = format!("{}/variables", self.config.path()?);
        let data = self.build_payload()?;
        debug!("create called for {path} ({})", self.name);

        match connection
            .api_request(Method::POST, &path, Some(&data), &[])
            .await
        {
            Ok(response) => {
                self.absorb(response)?;
                info!("Variable created: {}", self.name);
                Ok(true)
            }
            Err(e) if ApiError::is_conflict(&e) => {
                debug!("Variable {} already exists", self.name);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Replaces the remote payload with a PUT to the variable path.
    ///
    /// Returns `false` if the variable does not exist.
    pub async fn update(&mut self, connection: Option<&dyn Connection>) -> Result<bool> {
        let bound = self.config.client().connection();
        let connection = connection.unwrap_or(bound.as_ref());
        let path = self.path()?;
        let data = self.build_payload()?;
        debug!("update called for {path}");

        match connection
            .api_request(Method::PUT, &path, Some(&data), &[])
            .await
        {
            Ok(response) => {
                self.absorb(response)?;
                info!("Variable updated: {}", self.name);
                Ok(true)
            }
            Err(e) if ApiError::is_not_found(&e) => {
                debug!("Variable {path} not found, nothing updated");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Checks existence with a GET limited to the name field. Local state is
    /// never modified.
    pub async fn exists(&self, connection: Option<&dyn Connection>) -> Result<bool> {
        let bound = self.config.client().connection();
        let connection = connection.unwrap_or(bound.as_ref());
        let path = self.path()?;
        debug!("exists called for {path}");

        match connection
            .api_request(Method::GET, &path, None, &[("fields", "name".to_string())])
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if ApiError::is_not_found(&e) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Fetches the current server state. A missing variable is an error here,
    /// reported as [`ApiError::NotFound`].
    pub async fn reload(&mut self, connection: Option<&dyn Connection>) -> Result<()> {
        let bound = self.config.client().connection();
        let connection = connection.unwrap_or(bound.as_ref());
        let path = self.path()?;
        debug!("reload called for {path}");

        let response = connection.api_request(Method::GET, &path, None, &[]).await?;
        self.absorb(response)?;
        debug!("Variable reloaded: {}", self.name);
        Ok(())
    }
}
