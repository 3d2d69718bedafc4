//! Image Feed Application - Services and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for the network, secure storage and the login page)
//! - The token, auth, profile and feed services
//! - Session and logout orchestration
//! - Application-level error handling

pub mod auth;
pub mod error;
pub mod feed;
pub mod ports;
pub mod profile;
pub mod session;

mod request_guard;
mod transport;

#[cfg(test)]
mod test_support;

pub use auth::{AuthClient, TokenStore, TOKEN_KEY};
pub use error::{AuthError, FeedError, ProfileError, ServiceError, ServiceResult, SessionError};
pub use feed::{FeedClient, FeedEvent, PageOutcome};
pub use ports::{
    ApiRequest, ApiResponse, AuthorizationOutcome, AuthorizationPrompt, CancellationReceiver,
    CancellationToken, HttpClient, HttpClientError, SecureStore, SecureStoreError,
};
pub use profile::{AvatarChanged, ProfileClient};
pub use session::{LogoutCoordinator, SessionCoordinator, SessionRoute, SessionState};
