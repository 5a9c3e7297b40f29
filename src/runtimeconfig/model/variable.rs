use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::warn;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

use crate::runtimeconfig::error::ResourceError;

/// Lifecycle state reported by the service.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum VariableState {
    Updated,
    Deleted,
    /// Also stands in for states this client does not know.
    #[default]
    #[serde(rename = "VARIABLE_STATE_UNSPECIFIED", other)]
    #[strum(serialize = "VARIABLE_STATE_UNSPECIFIED")]
    Unspecified,
}

/// Wire representation of a variable, as sent and received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableResource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Base64 encoded bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<VariableState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
}

/// The data a variable carries. Text and binary content are exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Binary(Vec<u8>),
}

/// Last known server state of a variable, decoded from a [`VariableResource`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableProperties {
    pub payload: Option<Payload>,
    pub state: Option<VariableState>,
    /// Kept raw; parsed on access.
    pub update_time: Option<String>,
}

impl TryFrom<&VariableResource> for VariableProperties {
    type Error = ResourceError;

    fn try_from(resource: &VariableResource) -> Result<Self, Self::Error> {
        let payload = match (&resource.text, &resource.value) {
            (Some(text), value) => {
                if value.is_some() {
                    warn!(
                        "Variable {:?} carries both text and value, keeping text",
                        resource.name
                    );
                }
                Some(Payload::Text(text.clone()))
            }
            (None, Some(value)) => Some(Payload::Binary(STANDARD.decode(value)?)),
            (None, None) => None,
        };

        Ok(Self {
            payload,
            state: resource.state,
            update_time: resource.update_time.clone(),
        })
    }
}

/// Parses an RFC3339 timestamp with any number of fractional second digits
/// (none, milliseconds, microseconds or nanoseconds) and normalizes it to UTC.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, ResourceError> {
    let parsed = OffsetDateTime::parse(value, &Rfc3339)?;
    Ok(parsed.to_offset(UtcOffset::UTC))
}
