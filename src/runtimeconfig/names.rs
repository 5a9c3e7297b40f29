//! Conversions from fully-qualified resource names to short names.

use super::error::ResourceError;

/// Extracts the config name from `projects/{project}/configs/{config}`.
pub fn config_name_from_full_name(full_name: &str) -> Result<String, ResourceError> {
    let parts: Vec<&str> = full_name.split('/').collect();
    match parts.as_slice() {
        ["projects", _, "configs", name] => Ok((*name).to_string()),
        _ => Err(ResourceError::InvalidName {
            full_name: full_name.to_string(),
        }),
    }
}

/// Extracts the variable name from
/// `projects/{project}/configs/{config}/variables/{variable}`.
///
/// Variable names are hierarchical, so everything after `variables/` is kept,
/// slashes included.
pub fn variable_name_from_full_name(full_name: &str) -> Result<String, ResourceError> {
    let parts: Vec<&str> = full_name.splitn(6, '/').collect();
    match parts.as_slice() {
        ["projects", _, "configs", _, "variables", name] => Ok((*name).to_string()),
        _ => Err(ResourceError::InvalidName {
            full_name: full_name.to_string(),
        }),
    }
}
