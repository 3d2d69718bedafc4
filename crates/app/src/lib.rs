//! Image Feed client - command-line host
//!
//! Configuration loading, dependency wiring and the terminal login prompt.
//! The `imagefeed` binary drives these from its subcommands.

pub mod config;
pub mod prompt;
pub mod services;

pub use config::{Settings, SettingsError};
pub use prompt::ConsoleAuthorizationPrompt;
pub use services::Services;
