//! Session startup use case.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use imagefeed_domain::{AccessToken, Profile};
use tracing::{debug, info, warn};

use crate::auth::{AuthClient, TokenStore};
use crate::error::{ServiceError, SessionError};
use crate::ports::{AuthorizationOutcome, AuthorizationPrompt};
use crate::profile::ProfileClient;

/// Where the session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// The stored token is being checked.
    CheckingToken,
    /// A token is stored and the profile was loaded with it.
    Authenticated,
    /// No usable token.
    Unauthenticated,
}

/// Screen the host should show next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionRoute {
    /// Signed in; show the feed for this user.
    Feed {
        /// Profile of the signed-in user.
        profile: Profile,
    },
    /// Signed out; show the login screen.
    Login,
}

/// Decides on startup whether the user is signed in, and signs them in
/// otherwise.
pub struct SessionCoordinator {
    tokens: Arc<TokenStore>,
    auth: Arc<AuthClient>,
    profiles: Arc<ProfileClient>,
    prompt: Arc<dyn AuthorizationPrompt>,
    state: Mutex<SessionState>,
}

impl SessionCoordinator {
    /// Creates a coordinator over the given services.
    #[must_use]
    pub fn new(
        tokens: Arc<TokenStore>,
        auth: Arc<AuthClient>,
        profiles: Arc<ProfileClient>,
        prompt: Arc<dyn AuthorizationPrompt>,
    ) -> Self {
        Self {
            tokens,
            auth,
            profiles,
            prompt,
            state: Mutex::new(SessionState::Unauthenticated),
        }
    }

    /// Current session state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        *self.lock_state()
    }

    /// Marks the session as signed out.
    pub(crate) fn sign_out(&self) {
        self.set_state(SessionState::Unauthenticated);
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: SessionState) {
        debug!(?state, "session state changed");
        *self.lock_state() = state;
    }

    /// Resumes the stored session, or runs the authorization flow.
    ///
    /// If the stored token can no longer load the profile, the user is
    /// asked to sign in again.
    ///
    /// # Errors
    /// Returns [`SessionError`] if the authorization flow fails.
    pub async fn start(&self) -> Result<SessionRoute, SessionError> {
        self.set_state(SessionState::CheckingToken);

        if let Some(token) = self.tokens.get().await {
            match self.enter(&token).await {
                Ok(route) => return Ok(route),
                Err(e) => warn!(error = %e, "stored token rejected, signing in again"),
            }
        } else {
            debug!("no stored token");
        }
        self.authenticate().await
    }

    /// Opens the login page and signs in with the code it yields.
    ///
    /// Returns [`SessionRoute::Login`] if the user dismisses the page.
    ///
    /// # Errors
    /// Returns [`SessionError::Auth`] if the code exchange fails and
    /// [`SessionError::Profile`] if the new token cannot load the profile.
    pub async fn authenticate(&self) -> Result<SessionRoute, SessionError> {
        self.set_state(SessionState::Unauthenticated);
        let url = self.auth.authorization_url().map_err(SessionError::Auth)?;

        match self.prompt.authorize(&url).await {
            AuthorizationOutcome::Code(code) => self.handle_code(&code).await,
            AuthorizationOutcome::Cancelled => {
                info!("authorization dismissed");
                Ok(SessionRoute::Login)
            }
        }
    }

    /// Signs in with a code obtained outside [`Self::authenticate`].
    ///
    /// # Errors
    /// Returns [`SessionError::Auth`] if the code exchange fails and
    /// [`SessionError::Profile`] if the new token cannot load the profile.
    pub async fn handle_code(&self, code: &str) -> Result<SessionRoute, SessionError> {
        let token = self.auth.exchange_code(code).await.map_err(|e| {
            self.set_state(SessionState::Unauthenticated);
            SessionError::Auth(e)
        })?;
        self.enter(&token).await
    }

    async fn enter(&self, token: &AccessToken) -> Result<SessionRoute, SessionError> {
        self.set_state(SessionState::Authenticated);

        let profile = match self.profiles.fetch_profile(token).await {
            Ok(profile) => Ok(profile),
            Err(ServiceError::DuplicateRequest) => self
                .profiles
                .profile()
                .ok_or(ServiceError::DuplicateRequest),
            Err(e) => Err(e),
        }
        .map_err(|e| {
            self.set_state(SessionState::Unauthenticated);
            SessionError::Profile(e)
        })?;

        if let Err(e) = self.profiles.fetch_avatar_url(&profile.user_name).await {
            warn!(error = %e, "avatar unavailable");
        }

        info!(user = %profile.user_name, "session started");
        Ok(SessionRoute::Feed { profile })
    }
}
