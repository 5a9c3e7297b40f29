use anyhow::{Context, Result};
use log::{debug, info};
use reqwest::Method;
use serde_json::Value;

use super::variable::Variable;
use crate::runtimeconfig::client::Client;
use crate::runtimeconfig::error::{ApiError, ResourceError};
use crate::runtimeconfig::model::{ConfigResource, VariableListResponse};
use crate::runtimeconfig::names::config_name_from_full_name;
use crate::runtimeconfig::traits::Connection;

/// A named container of variables within the client's project.
#[derive(Debug, Clone)]
pub struct Config {
    pub name: String,
    client: Client,
    description: Option<String>,
}

/// One page of variables as returned by [`Config::list_variables`].
#[derive(Debug, Clone)]
pub struct VariablePage {
    pub variables: Vec<Variable>,
    pub next_page_token: Option<String>,
}

impl Config {
    pub fn new(name: impl Into<String>, client: Client) -> Self {
        Self {
            name: name.into(),
            client,
            description: None,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// E.g. `projects/my-project/configs/my-config`.
    pub fn full_name(&self) -> Result<String, ResourceError> {
        if self.name.is_empty() {
            return Err(ResourceError::InvalidState {
                reason: "Missing config name.".to_string(),
            });
        }
        Ok(format!("projects/{}/configs/{}", self.client.project(), self.name))
    }

    pub fn path(&self) -> Result<String, ResourceError> {
        Ok(format!("/{}", self.full_name()?))
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn set_properties(&mut self, resource: ConfigResource) -> Result<(), ResourceError> {
        if let Some(full_name) = &resource.name {
            self.name = config_name_from_full_name(full_name)?;
        }
        self.description = resource.description;
        Ok(())
    }

    /// Checks existence with a GET limited to the name field.
    pub async fn exists(&self, connection: Option<&dyn Connection>) -> Result<bool> {
        let bound = self.client.connection();
        let connection = connection.unwrap_or(bound.as_ref());
        let path = self.path()?;
        debug!("exists called for config {path}");

        match connection
            .api_request(Method::GET, &path, None, &[("fields", "name".to_string())])
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if ApiError::is_not_found(&e) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Fetches the config; a missing config is reported as [`ApiError::NotFound`].
    pub async fn reload(&mut self, connection: Option<&dyn Connection>) -> Result<()> {
        let bound = self.client.connection();
        let connection = connection.unwrap_or(bound.as_ref());
        let path = self.path()?;
        debug!("reload called for config {path}");

        let response = connection.api_request(Method::GET, &path, None, &[]).await?;
        let resource: ConfigResource =
            serde_json::from_value(response).context("Failed to decode config resource")?;
        self.set_properties(resource)?;
        Ok(())
    }

    /// A local variable bound to this config. No request is made.
    pub fn variable(&self, name: impl Into<String>) -> Variable {
        Variable::new(name, self.clone())
    }

    /// Fetches the variable `name`, or `None` if it does not exist.
    pub async fn get_variable(
        &self,
        name: impl Into<String>,
        connection: Option<&dyn Connection>,
    ) -> Result<Option<Variable>> {
        let mut variable = self.variable(name);
        match variable.reload(connection).await {
            Ok(()) => Ok(Some(variable)),
            Err(e) if ApiError::is_not_found(&e) => {
                debug!("Variable {} not found in config {}", variable.name, self.name);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Fetches one page of this config's variables.
    pub async fn list_variables(
        &self,
        page_size: Option<u32>,
        page_token: Option<&str>,
        connection: Option<&dyn Connection>,
    ) -> Result<VariablePage> {
        let bound = self.client.connection();
        let connection = connection.unwrap_or(bound.as_ref());
        let path = format!("{}/variables", self.path()?);
        debug!("list_variables called for {path} with page_size={page_size:?}, page_token={page_token:?}");

        let mut query = Vec::new();
        if let Some(page_size) = page_size {
            query.push(("pageSize", page_size.to_string()));
        }
        if let Some(page_token) = page_token {
            query.push(("pageToken", page_token.to_string()));
        }

        let response = connection.api_request(Method::GET, &path, None, &query).await?;
        let page = decode_page(response)?;
        let variables = page
            .variables
            .into_iter()
            .map(|resource| Variable::from_resource(resource, self.clone()))
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Fetched {} variables from {path}", variables.len());
        Ok(VariablePage {
            variables,
            next_page_token: page.next_page_token,
        })
    }

    /// Fetches every variable, following page tokens until the last page.
    pub async fn list_all_variables(&self, connection: Option<&dyn Connection>) -> Result<Vec<Variable>> {
        let mut all_variables = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self
                .list_variables(None, page_token.as_deref(), connection)
                .await?;
            all_variables.extend(page.variables);

            // Guard against infinite loops: stop on a missing, empty or repeated token
            match page.next_page_token {
                Some(token) if !token.is_empty() && page_token.as_deref() != Some(token.as_str()) => {
                    page_token = Some(token);
                }
                _ => break,
            }
        }

        info!("Variables fetched from {}: {}", self.name, all_variables.len());
        Ok(all_variables)
    }
}

fn decode_page(response: Value) -> Result<VariableListResponse> {
    match serde_json::from_value::<VariableListResponse>(response.clone()) {
        Ok(page) => Ok(page),
        Err(e) => {
            let body = response.to_string();
            log::error!("Failed to decode variable list response. Error: {e}");
            log::error!(
                "Response body (first 500 chars): {}",
                &body.chars().take(500).collect::<String>()
            );
            Err(anyhow::anyhow!(
                "Failed to decode response: {e}. Check debug log for response body."
            ))
        }
    }
}
