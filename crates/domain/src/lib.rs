//! Image Feed Domain - Core business types
//!
//! This crate defines the domain model for the Image Feed client.
//! All types here are pure Rust with no I/O dependencies.

pub mod api;
pub mod auth;
pub mod error;
pub mod photo;
pub mod profile;
pub mod request;
pub mod response;

pub use api::ApiConfig;
pub use auth::{AccessToken, OAuthConfig, TokenResponse};
pub use error::{DomainError, DomainResult};
pub use photo::{Photo, PhotoResult, PhotoSize, UrlsResult};
pub use profile::{Profile, ProfileImage, ProfileResult, UserResult};
pub use request::HttpMethod;
pub use response::StatusCode;
