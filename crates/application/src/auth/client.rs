//! Authorization-code exchange.

use std::sync::Arc;

use imagefeed_domain::{AccessToken, HttpMethod, OAuthConfig, TokenResponse};
use tracing::{debug, info, warn};
use url::Url;

use super::TokenStore;
use crate::error::{AuthError, ServiceResult};
use crate::ports::{ApiRequest, HttpClient};
use crate::request_guard::KeyedRequestGuard;
use crate::transport;

/// Exchanges authorization codes for bearer tokens.
///
/// Submitting the code of the in-flight or last successful exchange again
/// is rejected with [`AuthError::DuplicateRequest`]. A different code
/// cancels whatever exchange is in flight.
pub struct AuthClient {
    http: Arc<dyn HttpClient>,
    oauth: OAuthConfig,
    tokens: Arc<TokenStore>,
    requests: KeyedRequestGuard,
}

impl AuthClient {
    /// Creates a client for the given registration.
    #[must_use]
    pub fn new(http: Arc<dyn HttpClient>, oauth: OAuthConfig, tokens: Arc<TokenStore>) -> Self {
        Self {
            http,
            oauth,
            tokens,
            requests: KeyedRequestGuard::new(),
        }
    }

    /// URL the login page should open to start the flow.
    ///
    /// # Errors
    /// Returns [`AuthError::InvalidUrl`] if the configured base is unusable.
    pub fn authorization_url(&self) -> ServiceResult<Url> {
        Ok(self.oauth.authorization_url()?)
    }

    /// Extracts the code from the login page's final redirect.
    #[must_use]
    pub fn code_from_redirect(url: &Url) -> Option<String> {
        OAuthConfig::code_from_redirect(url)
    }

    /// Exchanges `code` for a token and persists it.
    ///
    /// On failure the token store is left untouched and the code may be
    /// submitted again.
    ///
    /// # Errors
    /// - [`AuthError::DuplicateRequest`] if `code` was just submitted
    /// - [`AuthError::Cancelled`] if a newer code superseded this call
    /// - [`AuthError::Network`], [`AuthError::Http`] or [`AuthError::Decoding`] on request failure
    /// - [`AuthError::Storage`] if the token could not be persisted
    pub async fn exchange_code(&self, code: &str) -> Result<AccessToken, AuthError> {
        let url = self.oauth.token_url(code)?;
        let ticket = self.requests.begin(code)?;
        debug!("exchanging authorization code");

        let request = ApiRequest::new(HttpMethod::Post, url);
        let response: TokenResponse = ticket
            .run(transport::fetch_json(self.http.as_ref(), request))
            .await
            .inspect_err(|e| warn!(error = %e, "authorization code exchange failed"))?;

        if let Err(e) = self.tokens.set(&response.access_token).await {
            self.requests.release(code);
            return Err(e.into());
        }
        info!(
            token = %response.access_token.preview(),
            scope = response.scope.as_deref().unwrap_or_default(),
            "access token obtained"
        );
        Ok(response.access_token)
    }
}
