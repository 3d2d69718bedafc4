//! Profile and avatar retrieval.

mod client;

pub use client::{AvatarChanged, ProfileClient};
