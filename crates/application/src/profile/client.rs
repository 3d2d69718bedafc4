//! Current-user profile client.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use imagefeed_domain::{AccessToken, ApiConfig, Profile, ProfileResult, UserResult};
use tokio::sync::broadcast;
use tracing::{debug, warn};
use url::Url;

use crate::auth::TokenStore;
use crate::error::{ProfileError, ServiceError};
use crate::ports::{ApiRequest, HttpClient};
use crate::request_guard::KeyedRequestGuard;
use crate::transport;

const AVATAR_CHANNEL_CAPACITY: usize = 16;

/// Published whenever a new avatar URL is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarChanged {
    /// The new avatar URL.
    pub url: String,
}

#[derive(Debug, Default)]
struct ProfileState {
    profile: Option<Profile>,
    avatar_url: Option<Url>,
}

/// Fetches and holds the signed-in user's profile and avatar.
///
/// Each operation is single-flight per key: repeating the key of the
/// in-flight or last successful call is rejected, and a new key cancels
/// the previous call.
pub struct ProfileClient {
    http: Arc<dyn HttpClient>,
    api: ApiConfig,
    tokens: Arc<TokenStore>,
    profile_requests: KeyedRequestGuard,
    avatar_requests: KeyedRequestGuard,
    state: Mutex<ProfileState>,
    avatar_events: broadcast::Sender<AvatarChanged>,
}

impl ProfileClient {
    /// Creates a client against `api`.
    #[must_use]
    pub fn new(http: Arc<dyn HttpClient>, api: ApiConfig, tokens: Arc<TokenStore>) -> Self {
        let (avatar_events, _) = broadcast::channel(AVATAR_CHANNEL_CAPACITY);
        Self {
            http,
            api,
            tokens,
            profile_requests: KeyedRequestGuard::new(),
            avatar_requests: KeyedRequestGuard::new(),
            state: Mutex::new(ProfileState::default()),
            avatar_events,
        }
    }

    fn state(&self) -> MutexGuard<'_, ProfileState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Last successfully fetched profile.
    #[must_use]
    pub fn profile(&self) -> Option<Profile> {
        self.state().profile.clone()
    }

    /// Last successfully fetched avatar URL.
    #[must_use]
    pub fn avatar_url(&self) -> Option<Url> {
        self.state().avatar_url.clone()
    }

    /// Subscribes to avatar updates for as long as the receiver lives.
    #[must_use]
    pub fn subscribe_avatar(&self) -> broadcast::Receiver<AvatarChanged> {
        self.avatar_events.subscribe()
    }

    /// Fetches `GET /me` with `token`.
    ///
    /// # Errors
    /// - [`ProfileError::DuplicateRequest`] if `token` was just used
    /// - [`ProfileError::Cancelled`] if a call with another token superseded this one
    /// - [`ProfileError::Network`], [`ProfileError::Http`] or [`ProfileError::Decoding`] on request failure
    pub async fn fetch_profile(&self, token: &AccessToken) -> Result<Profile, ProfileError> {
        let ticket = self.profile_requests.begin(token.as_str())?;
        let request = ApiRequest::get(self.api.me_url()?).with_bearer(token.clone());

        let result: ProfileResult = ticket
            .run(transport::fetch_json(self.http.as_ref(), request))
            .await
            .inspect_err(|e| warn!(error = %e, "profile fetch failed"))?;

        let profile = Profile::from(result);
        debug!(user = %profile.user_name, "profile loaded");
        self.state().profile = Some(profile.clone());
        Ok(profile)
    }

    /// Fetches the small avatar of `username` with the stored token.
    ///
    /// Subscribers are notified with the new URL on success.
    ///
    /// # Errors
    /// - [`ProfileError::DuplicateRequest`] if `username` was just used
    /// - [`ProfileError::InvalidToken`] if no token is stored
    /// - [`ProfileError::InvalidUrl`] if `username` cannot form a URL
    /// - [`ProfileError::Decoding`] if the avatar is not a valid URL
    pub async fn fetch_avatar_url(&self, username: &str) -> Result<Url, ProfileError> {
        let ticket = self.avatar_requests.begin(username)?;
        let token = self.tokens.get().await.ok_or(ServiceError::InvalidToken)?;
        let request = ApiRequest::get(self.api.user_url(username)?).with_bearer(token);

        let user: UserResult = ticket
            .run(transport::fetch_json(self.http.as_ref(), request))
            .await
            .inspect_err(|e| warn!(error = %e, username, "avatar fetch failed"))?;

        let avatar_url = Url::parse(&user.profile_image.small)
            .map_err(|e| ServiceError::Decoding(format!("avatar URL: {e}")))?;
        self.state().avatar_url = Some(avatar_url.clone());

        let _ = self.avatar_events.send(AvatarChanged {
            url: avatar_url.to_string(),
        });
        Ok(avatar_url)
    }

    /// Forgets the profile, the avatar and any in-flight calls.
    pub fn clear(&self) {
        self.profile_requests.reset();
        self.avatar_requests.reset();
        *self.state() = ProfileState::default();
    }
}
