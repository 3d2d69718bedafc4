//! Response status types

mod status;

pub use status::StatusCode;
