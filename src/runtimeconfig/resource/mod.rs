pub mod config;
pub mod variable;

pub use config::{Config, VariablePage};
pub use variable::Variable;
