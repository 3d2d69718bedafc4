//! Application error types

use imagefeed_domain::{DomainError, StatusCode};
use thiserror::Error;

use crate::ports::{HttpClientError, SecureStoreError};

/// Errors surfaced by the auth, profile and feed services.
///
/// None of these are retried internally; the caller decides what to do.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The transport failed before a response arrived.
    #[error("network error: {0}")]
    Network(HttpClientError),

    /// The server answered with a non-2xx status.
    #[error("server returned {status}")]
    Http {
        /// Status returned by the server.
        status: StatusCode,
    },

    /// The response body did not match the expected shape.
    #[error("malformed response body: {0}")]
    Decoding(String),

    /// The same request is already in flight or has just completed.
    #[error("duplicate request")]
    DuplicateRequest,

    /// No access token is stored.
    #[error("no access token available")]
    InvalidToken,

    /// A request URL could not be built from the given input.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The call was superseded by a newer one or by a reset.
    #[error("request superseded")]
    Cancelled,

    /// Persisting or removing the token failed.
    #[error("token storage failed: {0}")]
    Storage(String),
}

impl From<HttpClientError> for ServiceError {
    fn from(error: HttpClientError) -> Self {
        match error {
            HttpClientError::Cancelled => Self::Cancelled,
            other => Self::Network(other),
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(error: DomainError) -> Self {
        Self::InvalidUrl(error.to_string())
    }
}

impl From<SecureStoreError> for ServiceError {
    fn from(error: SecureStoreError) -> Self {
        Self::Storage(error.to_string())
    }
}

/// Error returned by [`crate::AuthClient`].
pub type AuthError = ServiceError;

/// Error returned by [`crate::ProfileClient`].
pub type ProfileError = ServiceError;

/// Error returned by [`crate::FeedClient`].
pub type FeedError = ServiceError;

/// Result type alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by the session coordinator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The authorization code could not be exchanged.
    #[error("authentication failed: {0}")]
    Auth(#[source] ServiceError),

    /// The profile could not be loaded with the obtained token.
    #[error("profile unavailable: {0}")]
    Profile(#[source] ServiceError),
}
