//! Startup and logout orchestration.

mod coordinator;
mod logout;

pub use coordinator::{SessionCoordinator, SessionRoute, SessionState};
pub use logout::LogoutCoordinator;
