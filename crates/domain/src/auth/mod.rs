//! Authentication domain types

mod types;

pub use types::{AccessToken, OAuthConfig, TokenResponse, NATIVE_REDIRECT_PATH};
