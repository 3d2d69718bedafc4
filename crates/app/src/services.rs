//! Dependency wiring.

use std::sync::Arc;

use imagefeed_application::{
    AuthClient, AuthorizationPrompt, FeedClient, HttpClient, LogoutCoordinator, ProfileClient,
    SecureStore, SessionCoordinator, TokenStore,
};
use imagefeed_domain::{ApiConfig, OAuthConfig};
use imagefeed_infrastructure::{FileSecureStore, ReqwestHttpClient};
use tracing::debug;

use crate::config::Settings;

/// Every service of the client, built once and shared.
pub struct Services {
    /// Persisted access token.
    pub tokens: Arc<TokenStore>,
    /// Current user profile and avatar.
    pub profiles: Arc<ProfileClient>,
    /// Photo feed.
    pub feed: Arc<FeedClient>,
    /// Startup orchestration.
    pub session: Arc<SessionCoordinator>,
    /// Logout orchestration.
    pub logout: LogoutCoordinator,
}

impl Services {
    /// Wires the services over the given adapters.
    #[must_use]
    pub fn new(
        oauth: OAuthConfig,
        api: ApiConfig,
        http: Arc<dyn HttpClient>,
        store: Arc<dyn SecureStore>,
        prompt: Arc<dyn AuthorizationPrompt>,
    ) -> Self {
        let tokens = Arc::new(TokenStore::new(store));
        let auth = Arc::new(AuthClient::new(http.clone(), oauth, tokens.clone()));
        let profiles = Arc::new(ProfileClient::new(http.clone(), api.clone(), tokens.clone()));
        let feed = Arc::new(FeedClient::new(http, api, tokens.clone()));

        let session = Arc::new(SessionCoordinator::new(
            tokens.clone(),
            auth,
            profiles.clone(),
            prompt.clone(),
        ));
        let logout = LogoutCoordinator::new(
            session.clone(),
            profiles.clone(),
            feed.clone(),
            tokens.clone(),
            prompt,
        );

        Self {
            tokens,
            profiles,
            feed,
            session,
            logout,
        }
    }

    /// Wires the production adapters: reqwest and the token file.
    ///
    /// # Errors
    /// Returns an error if the settings are invalid or the HTTP client
    /// cannot be created.
    pub fn from_settings(
        settings: &Settings,
        prompt: Arc<dyn AuthorizationPrompt>,
    ) -> anyhow::Result<Self> {
        let token_path = settings.token_path()?;
        debug!(path = %token_path.display(), "using token file");

        let http = Arc::new(ReqwestHttpClient::new()?);
        let store = Arc::new(FileSecureStore::new(token_path));
        Ok(Self::new(
            settings.oauth()?,
            settings.api()?,
            http,
            store,
            prompt,
        ))
    }
}
