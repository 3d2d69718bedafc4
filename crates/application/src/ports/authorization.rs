//! Login page collaborator port

use async_trait::async_trait;
use url::Url;

/// Result of presenting the login page to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationOutcome {
    /// The user granted access and the page yielded this code.
    Code(String),
    /// The user backed out.
    Cancelled,
}

/// External login page (typically an embedded browser).
#[async_trait]
pub trait AuthorizationPrompt: Send + Sync {
    /// Opens `authorization_url` and waits for a code or a cancellation.
    async fn authorize(&self, authorization_url: &Url) -> AuthorizationOutcome;

    /// Purges cookies and site data left behind by the login page.
    async fn clear_session_data(&self);
}
