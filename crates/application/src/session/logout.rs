//! Logout use case.

use std::sync::Arc;

use tracing::info;

use crate::auth::TokenStore;
use crate::error::ServiceResult;
use crate::feed::FeedClient;
use crate::ports::AuthorizationPrompt;
use crate::profile::ProfileClient;
use crate::session::SessionCoordinator;

/// Clears every piece of session state, in memory and on disk.
pub struct LogoutCoordinator {
    session: Arc<SessionCoordinator>,
    profiles: Arc<ProfileClient>,
    feed: Arc<FeedClient>,
    tokens: Arc<TokenStore>,
    prompt: Arc<dyn AuthorizationPrompt>,
}

impl LogoutCoordinator {
    /// Creates a coordinator over the given services.
    #[must_use]
    pub fn new(
        session: Arc<SessionCoordinator>,
        profiles: Arc<ProfileClient>,
        feed: Arc<FeedClient>,
        tokens: Arc<TokenStore>,
        prompt: Arc<dyn AuthorizationPrompt>,
    ) -> Self {
        Self {
            session,
            profiles,
            feed,
            tokens,
            prompt,
        }
    }

    /// Signs out. Safe to call when already signed out.
    ///
    /// Every step runs even if removing the persisted token fails.
    ///
    /// # Errors
    /// Returns [`crate::ServiceError::Storage`] if the token could not be
    /// removed from the secure store.
    pub async fn logout(&self) -> ServiceResult<()> {
        self.session.sign_out();
        self.profiles.clear();
        self.feed.reset();
        let removed = self.tokens.clear().await;
        self.prompt.clear_session_data().await;

        info!(token_removed = removed.is_ok(), "logged out");
        removed.map_err(Into::into)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::auth::AuthClient;
    use crate::error::ServiceError;
    use crate::ports::{AuthorizationOutcome, SecureStore};
    use crate::session::{SessionRoute, SessionState};
    use crate::test_support::{
        api_config, feed_page_json, json_response, oauth_config, FailingSecureStore,
        MemorySecureStore, MockHttpClient, ScriptedPrompt,
    };
    use imagefeed_domain::AccessToken;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    struct Fixture {
        tokens: Arc<TokenStore>,
        profiles: Arc<ProfileClient>,
        feed: Arc<FeedClient>,
        prompt: Arc<ScriptedPrompt>,
        session: Arc<SessionCoordinator>,
        logout: LogoutCoordinator,
    }

    fn fixture(store: Arc<dyn SecureStore>) -> Fixture {
        let http = Arc::new(MockHttpClient::new(|request| match request.url.path() {
            "/me" => Ok(json_response(200, &json!({"username": "jane"}))),
            "/users/jane" => Ok(json_response(
                200,
                &json!({"profile_image": {"small": "https://img.example.com/jane.jpg"}}),
            )),
            _ => Ok(json_response(200, &feed_page_json(1))),
        }));
        let tokens = Arc::new(TokenStore::new(store));
        let auth = Arc::new(AuthClient::new(http.clone(), oauth_config(), tokens.clone()));
        let profiles = Arc::new(ProfileClient::new(http.clone(), api_config(), tokens.clone()));
        let feed = Arc::new(FeedClient::new(http, api_config(), tokens.clone()));
        let prompt = Arc::new(ScriptedPrompt::new(AuthorizationOutcome::Cancelled));
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
            prompt.clone(),
        );
        Fixture {
            tokens,
            profiles,
            feed,
            prompt,
            session,
            logout,
        }
    }

    async fn signed_in(store: Arc<MemorySecureStore>) -> Fixture {
        store.set(crate::TOKEN_KEY, "t1").await.unwrap();
        let f = fixture(store);
        let route = f.session.start().await.unwrap();
        assert!(matches!(route, SessionRoute::Feed { .. }));
        f.feed.fetch_next_page().await.unwrap();
        f
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let store = Arc::new(MemorySecureStore::default());
        let f = signed_in(store.clone()).await;

        f.logout.logout().await.unwrap();

        assert!(f.tokens.get().await.is_none());
        assert!(store.get(crate::TOKEN_KEY).await.unwrap().is_none());
        assert!(f.feed.is_empty());
        assert_eq!(f.feed.last_loaded_page(), 0);
        assert!(f.profiles.profile().is_none());
        assert!(f.profiles.avatar_url().is_none());
        assert_eq!(*f.prompt.cleared.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_logout_signs_session_out() {
        let f = signed_in(Arc::new(MemorySecureStore::default())).await;
        assert_eq!(f.session.state(), SessionState::Authenticated);

        f.logout.logout().await.unwrap();

        assert_eq!(f.session.state(), SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let f = signed_in(Arc::new(MemorySecureStore::default())).await;

        f.logout.logout().await.unwrap();
        f.logout.logout().await.unwrap();

        assert!(f.tokens.get().await.is_none());
        assert!(f.feed.is_empty());
        assert_eq!(f.session.state(), SessionState::Unauthenticated);
        assert_eq!(*f.prompt.cleared.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_storage_failure_still_clears_memory() {
        let f = fixture(Arc::new(FailingSecureStore));

        assert!(matches!(f.logout.logout().await, Err(ServiceError::Storage(_))));
        assert!(f.tokens.get().await.is_none());
        assert!(f.feed.is_empty());
        assert_eq!(f.session.state(), SessionState::Unauthenticated);
        assert_eq!(*f.prompt.cleared.lock().unwrap(), 1);
    }
}
