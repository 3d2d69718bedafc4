//! Secure key-value store port
//!
//! Defines the interface for the durable store that holds the access token.

use async_trait::async_trait;

/// Errors that can occur during secure store operations.
#[derive(Debug, thiserror::Error)]
pub enum SecureStoreError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Durable, private storage for secret strings.
#[async_trait]
pub trait SecureStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Returns
    /// `None` if nothing is stored under the key.
    async fn get(&self, key: &str) -> Result<Option<String>, SecureStoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), SecureStoreError>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), SecureStoreError>;
}
