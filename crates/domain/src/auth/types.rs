//! OAuth2 authorization-code types

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DomainError, DomainResult};

/// Path the login page redirects to once the user has granted access.
pub const NATIVE_REDIRECT_PATH: &str = "/oauth/authorize/native";

/// Opaque bearer credential issued by the token endpoint.
///
/// The value never appears in `Debug` output so it cannot leak through logs.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the `Authorization` header value for this token.
    #[must_use]
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.0)
    }

    /// Returns a short preview (first 8 chars + ...) for display.
    #[must_use]
    pub fn preview(&self) -> String {
        if self.0.chars().count() > 12 {
            let head: String = self.0.chars().take(8).collect();
            format!("{head}...")
        } else {
            "****".to_string()
        }
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Body returned by the OAuth token endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    /// The issued bearer token.
    pub access_token: AccessToken,
    /// Token type, usually "Bearer".
    #[serde(default)]
    pub token_type: Option<String>,
    /// Space-separated granted scopes.
    #[serde(default)]
    pub scope: Option<String>,
    /// Unix timestamp of issuance.
    #[serde(default)]
    pub created_at: Option<i64>,
}

/// Client registration used for the authorization-code flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthConfig {
    access_key: String,
    secret_key: String,
    redirect_uri: String,
    scope: String,
    auth_base: Url,
}

impl OAuthConfig {
    /// Creates a configuration, rejecting empty credentials.
    ///
    /// `scope` is space-separated; it is form-encoded when placed in a URL.
    ///
    /// # Errors
    /// Returns an error if a required value is empty or the base URL is invalid.
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        redirect_uri: impl Into<String>,
        scope: impl Into<String>,
        auth_base: &str,
    ) -> DomainResult<Self> {
        let access_key = access_key.into();
        let secret_key = secret_key.into();
        let redirect_uri = redirect_uri.into();
        if access_key.trim().is_empty() {
            return Err(DomainError::MissingConfiguration("access_key"));
        }
        if secret_key.trim().is_empty() {
            return Err(DomainError::MissingConfiguration("secret_key"));
        }
        if redirect_uri.trim().is_empty() {
            return Err(DomainError::MissingConfiguration("redirect_uri"));
        }
        let auth_base =
            Url::parse(auth_base).map_err(|e| DomainError::InvalidUrl(format!("{e}: {auth_base}")))?;

        Ok(Self {
            access_key,
            secret_key,
            redirect_uri,
            scope: scope.into(),
            auth_base,
        })
    }

    /// Builds the URL the login page should open.
    ///
    /// # Errors
    /// Returns an error if the base URL cannot take path segments.
    pub fn authorization_url(&self) -> DomainResult<Url> {
        let mut url = self.endpoint(&["oauth", "authorize"])?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.access_key)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", &self.scope);
        Ok(url)
    }

    /// Builds the token-exchange URL for an authorization code.
    ///
    /// # Errors
    /// Returns an error if the code is empty or the base URL cannot take path segments.
    pub fn token_url(&self, code: &str) -> DomainResult<Url> {
        if code.trim().is_empty() {
            return Err(DomainError::InvalidIdentifier(
                "authorization code is empty".to_string(),
            ));
        }
        let mut url = self.endpoint(&["oauth", "token"])?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.access_key)
            .append_pair("client_secret", &self.secret_key)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("code", code)
            .append_pair("grant_type", "authorization_code");
        Ok(url)
    }

    /// Extracts the authorization code from the login page's final redirect.
    ///
    /// Returns `None` for any navigation that is not the native redirect.
    #[must_use]
    pub fn code_from_redirect(url: &Url) -> Option<String> {
        if url.path() != NATIVE_REDIRECT_PATH {
            return None;
        }
        url.query_pairs()
            .find(|(name, _)| name == "code")
            .map(|(_, value)| value.into_owned())
            .filter(|code| !code.is_empty())
    }

    /// Appends path segments to the auth base, keeping any base path.
    fn endpoint(&self, segments: &[&str]) -> DomainResult<Url> {
        let mut url = self.auth_base.clone();
        url.path_segments_mut()
            .map_err(|()| DomainError::InvalidUrl(self.auth_base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}
