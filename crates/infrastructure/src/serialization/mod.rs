//! JSON encoding for files written by the adapters.
//!
//! Output is stable across writes: keys come out sorted (via `BTreeMap`),
//! indented by two spaces, with a trailing newline.

mod json;

pub use json::*;
