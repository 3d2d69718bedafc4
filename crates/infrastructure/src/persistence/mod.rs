//! Secure store adapters.

mod file_secure_store;

pub use file_secure_store::FileSecureStore;
