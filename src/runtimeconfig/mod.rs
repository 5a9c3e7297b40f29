pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod names;
pub mod resource;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;
