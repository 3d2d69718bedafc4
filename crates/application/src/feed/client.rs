//! Feed pagination and like toggling.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use imagefeed_domain::{ApiConfig, HttpMethod, Photo, PhotoResult};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::events::FeedEvent;
use crate::auth::TokenStore;
use crate::error::{FeedError, ServiceError};
use crate::ports::{ApiRequest, CancellationToken, HttpClient};
use crate::transport;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Result of a [`FeedClient::fetch_next_page`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// The page was fetched and merged.
    Loaded {
        /// Page number that was loaded.
        page: u32,
        /// Photos appended; duplicates are skipped.
        added: usize,
    },
    /// Another page fetch is still running; nothing was sent.
    AlreadyFetching,
}

#[derive(Debug, Default)]
struct FeedState {
    photos: Vec<Photo>,
    ids: HashSet<String>,
    last_loaded_page: u32,
    in_flight: Option<CancellationToken>,
    epoch: u64,
}

/// Clears the in-flight marker when a fetch ends, however it ends.
struct FetchSlot<'a> {
    state: &'a Mutex<FeedState>,
    epoch: u64,
    armed: bool,
}

impl Drop for FetchSlot<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.epoch == self.epoch {
            state.in_flight = None;
        }
    }
}

/// Owner of the photo feed.
///
/// Pages are fetched one at a time and appended in completion order,
/// skipping photos whose id is already present.
pub struct FeedClient {
    http: Arc<dyn HttpClient>,
    api: ApiConfig,
    tokens: Arc<TokenStore>,
    state: Mutex<FeedState>,
    events: broadcast::Sender<FeedEvent>,
}

impl FeedClient {
    /// Creates an empty feed against `api`.
    #[must_use]
    pub fn new(http: Arc<dyn HttpClient>, api: ApiConfig, tokens: Arc<TokenStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            http,
            api,
            tokens,
            state: Mutex::new(FeedState::default()),
            events,
        }
    }

    fn state(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the feed in display order.
    #[must_use]
    pub fn photos(&self) -> Vec<Photo> {
        self.state().photos.clone()
    }

    /// Looks up one photo by id.
    #[must_use]
    pub fn photo(&self, id: &str) -> Option<Photo> {
        self.state().photos.iter().find(|p| p.id == id).cloned()
    }

    /// Number of photos in the feed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state().photos.len()
    }

    /// Returns true if no photo has been loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state().photos.is_empty()
    }

    /// Last page merged into the feed, 0 before the first page.
    #[must_use]
    pub fn last_loaded_page(&self) -> u32 {
        self.state().last_loaded_page
    }

    /// Returns true while a page fetch is running.
    #[must_use]
    pub fn is_fetching(&self) -> bool {
        self.state().in_flight.is_some()
    }

    /// Subscribes to feed changes for as long as the receiver lives.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.events.subscribe()
    }

    /// Fetches the page after [`Self::last_loaded_page`].
    ///
    /// Returns [`PageOutcome::AlreadyFetching`] without sending anything
    /// while another fetch is running.
    ///
    /// # Errors
    /// - [`FeedError::InvalidToken`] if no token is stored
    /// - [`FeedError::Cancelled`] if the feed was reset meanwhile
    /// - [`FeedError::Network`], [`FeedError::Http`] or [`FeedError::Decoding`] on request failure
    pub async fn fetch_next_page(&self) -> Result<PageOutcome, FeedError> {
        let (page, mut cancel, mut slot) = {
            let mut state = self.state();
            if state.in_flight.is_some() {
                debug!("page fetch already in flight");
                return Ok(PageOutcome::AlreadyFetching);
            }
            let (token, cancel) = CancellationToken::new();
            state.in_flight = Some(token);
            let slot = FetchSlot {
                state: &self.state,
                epoch: state.epoch,
                armed: true,
            };
            (state.last_loaded_page + 1, cancel, slot)
        };

        let token = self.tokens.get().await.ok_or(ServiceError::InvalidToken)?;
        let request = ApiRequest::get(self.api.photos_url(page)?).with_bearer(token);

        let result: Result<Vec<PhotoResult>, FeedError> = tokio::select! {
            result = transport::fetch_json(self.http.as_ref(), request) => result,
            () = cancel.cancelled() => Err(ServiceError::Cancelled),
        };
        let records = result.inspect_err(|e| warn!(error = %e, page, "feed page fetch failed"))?;

        let (added, total) = {
            let mut state = self.state();
            if state.epoch != slot.epoch {
                debug!(page, "discarding page fetched before reset");
                return Err(ServiceError::Cancelled);
            }
            let FeedState { photos, ids, .. } = &mut *state;
            let before = photos.len();
            for photo in records.into_iter().map(Photo::from) {
                if ids.insert(photo.id.clone()) {
                    photos.push(photo);
                }
            }
            state.last_loaded_page = page;
            state.in_flight = None;
            slot.armed = false;
            (state.photos.len() - before, state.photos.len())
        };

        info!(page, added, total, "feed page loaded");
        let _ = self.events.send(FeedEvent::PageLoaded { page, added, total });
        Ok(PageOutcome::Loaded { page, added })
    }

    /// Likes (`liked = true`) or unlikes a photo.
    ///
    /// The local photo is only updated once the server accepts the change.
    /// Concurrent toggles are not coalesced; the last response applied wins.
    ///
    /// # Errors
    /// - [`FeedError::InvalidToken`] if no token is stored
    /// - [`FeedError::InvalidUrl`] if `photo_id` cannot form a URL
    /// - [`FeedError::Network`] or [`FeedError::Http`] on request failure
    pub async fn set_like(&self, photo_id: &str, liked: bool) -> Result<(), FeedError> {
        let token = self.tokens.get().await.ok_or(ServiceError::InvalidToken)?;
        let request = ApiRequest::new(HttpMethod::for_like(liked), self.api.like_url(photo_id)?)
            .with_bearer(token);

        transport::send(self.http.as_ref(), request)
            .await
            .inspect_err(|e| warn!(error = %e, photo_id, liked, "like toggle failed"))?;

        let updated = {
            let mut state = self.state();
            match state.photos.iter_mut().find(|p| p.id == photo_id) {
                Some(photo) => {
                    photo.is_liked = liked;
                    true
                }
                None => false,
            }
        };
        if updated {
            let _ = self.events.send(FeedEvent::PhotoUpdated {
                id: photo_id.to_string(),
                is_liked: liked,
            });
        } else {
            debug!(photo_id, "liked photo is not in the feed");
        }
        Ok(())
    }

    /// Empties the feed and abandons any running page fetch.
    pub fn reset(&self) {
        {
            let mut state = self.state();
            if let Some(token) = state.in_flight.take() {
                token.cancel();
            }
            state.photos.clear();
            state.ids.clear();
            state.last_loaded_page = 0;
            state.epoch += 1;
        }
        let _ = self.events.send(FeedEvent::Reset);
    }
}
