//! Outgoing request types

mod method;

pub use method::HttpMethod;
