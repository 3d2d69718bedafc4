//! Authentication module for the Image Feed client.
//!
//! This module provides:
//! - Durable storage of the single access token
//! - The authorization-code exchange

mod client;
mod token_store;

pub use client::AuthClient;
pub use token_store::{TokenStore, TOKEN_KEY};
