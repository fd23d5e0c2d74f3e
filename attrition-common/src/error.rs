//! Common error types for the attrition service

use thiserror::Error;

/// Common result type for attrition operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the service crates
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Model or preprocessor artifact could not be found or decoded
    #[error("Artifact error: {0}")]
    Artifact(String),

    /// Uploaded table could not be parsed (a client error)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Internal computation error
    #[error("Internal error: {0}")]
    Internal(String),
}
