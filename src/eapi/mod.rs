pub mod client;
pub mod commands;
pub mod error;
#[cfg(test)]
pub mod fake;
pub mod queries;
pub mod types;

pub use client::{CommandRunner, Connector, EapiConnector};
pub use error::EapiError;
