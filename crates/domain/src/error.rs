//! Domain error types

use thiserror::Error;

/// Errors raised while building requests or validating configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A base URL or an endpoint built from it is unusable.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The method name is not one the photo API uses.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// A required setting is empty.
    #[error("missing configuration value: {0}")]
    MissingConfiguration(&'static str),

    /// A code, id or username is empty where one is required.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
