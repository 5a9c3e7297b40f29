pub mod config;
pub mod variable;

// Re-export common types for easier access
pub use config::{ConfigResource, VariableListResponse};
pub use variable::{parse_timestamp, Payload, VariableProperties, VariableResource, VariableState};
