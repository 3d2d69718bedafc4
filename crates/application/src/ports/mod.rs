//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod authorization;
mod http_client;
mod secure_store;

pub use authorization::{AuthorizationOutcome, AuthorizationPrompt};
pub use http_client::{
    ApiRequest, ApiResponse, CancellationReceiver, CancellationToken, HttpClient, HttpClientError,
};
pub use secure_store::{SecureStore, SecureStoreError};
