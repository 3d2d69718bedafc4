//! Paginated photo feed.

mod client;
mod events;

pub use client::{FeedClient, PageOutcome};
pub use events::FeedEvent;
