//! Terminal stand-in for the login web page.

use async_trait::async_trait;
use imagefeed_application::{AuthClient, AuthorizationOutcome, AuthorizationPrompt};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, warn};
use url::Url;

/// Prints the authorization URL and reads the answer from stdin.
///
/// The answer may be the bare code or the full redirect URL the browser
/// landed on. An empty line or end of input dismisses the prompt.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleAuthorizationPrompt;

impl ConsoleAuthorizationPrompt {
    /// Creates the prompt.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Interprets one line typed by the user.
    #[must_use]
    pub fn parse_answer(answer: &str) -> AuthorizationOutcome {
        let answer = answer.trim();
        if answer.is_empty() {
            return AuthorizationOutcome::Cancelled;
        }
        match Url::parse(answer) {
            Ok(url) => AuthClient::code_from_redirect(&url).map_or_else(
                || {
                    warn!("redirect URL carries no authorization code");
                    AuthorizationOutcome::Cancelled
                },
                AuthorizationOutcome::Code,
            ),
            Err(_) => AuthorizationOutcome::Code(answer.to_string()),
        }
    }
}

#[async_trait]
impl AuthorizationPrompt for ConsoleAuthorizationPrompt {
    async fn authorize(&self, authorization_url: &Url) -> AuthorizationOutcome {
        let mut stderr = tokio::io::stderr();
        let banner = format!(
            "Open this URL in a browser and sign in:\n\n  {authorization_url}\n\nPaste the code or the final redirect URL: "
        );
        if let Err(e) = stderr.write_all(banner.as_bytes()).await {
            warn!(error = %e, "failed to show authorization prompt");
            return AuthorizationOutcome::Cancelled;
        }
        let _ = stderr.flush().await;

        let mut line = String::new();
        match BufReader::new(tokio::io::stdin()).read_line(&mut line).await {
            Ok(_) => Self::parse_answer(&line),
            Err(e) => {
                warn!(error = %e, "failed to read authorization code");
                AuthorizationOutcome::Cancelled
            }
        }
    }

    async fn clear_session_data(&self) {
        debug!("terminal prompt keeps no browser data");
    }
}
