//! Access token storage backed by a secure store.
//!
//! Reads are cached after the first hit; every write goes through to the
//! backing store before the cache is updated.

use std::sync::Arc;

use imagefeed_domain::AccessToken;
use tokio::sync::RwLock;
use tracing::{debug, error};

use crate::ports::{SecureStore, SecureStoreError};

/// Key under which the token is persisted.
pub const TOKEN_KEY: &str = "accessToken";

#[derive(Debug, Clone)]
enum Cached {
    Unloaded,
    Loaded(Option<AccessToken>),
}

/// Owner of the persisted access token.
///
/// At most one token is stored; its absence means the user is signed out.
pub struct TokenStore {
    store: Arc<dyn SecureStore>,
    cached: RwLock<Cached>,
}

impl TokenStore {
    /// Create a token store on top of `store`.
    #[must_use]
    pub fn new(store: Arc<dyn SecureStore>) -> Self {
        Self {
            store,
            cached: RwLock::new(Cached::Unloaded),
        }
    }

    /// Get the stored token, if any.
    ///
    /// A failing backing store is logged and treated as "no token".
    pub async fn get(&self) -> Option<AccessToken> {
        if let Cached::Loaded(token) = &*self.cached.read().await {
            return token.clone();
        }

        let mut cached = self.cached.write().await;
        if let Cached::Loaded(token) = &*cached {
            return token.clone();
        }
        match self.store.get(TOKEN_KEY).await {
            Ok(value) => {
                let token = value.map(AccessToken::new);
                debug!(present = token.is_some(), "loaded access token");
                *cached = Cached::Loaded(token.clone());
                token
            }
            Err(e) => {
                error!(error = %e, "failed to read access token from secure store");
                None
            }
        }
    }

    /// Persist `token`, replacing any previous one.
    ///
    /// # Errors
    /// Returns the store error; the previous token stays in effect.
    pub async fn set(&self, token: &AccessToken) -> Result<(), SecureStoreError> {
        let mut cached = self.cached.write().await;
        self.store
            .set(TOKEN_KEY, token.as_str())
            .await
            .inspect_err(|e| error!(error = %e, "failed to save access token"))?;
        *cached = Cached::Loaded(Some(token.clone()));
        Ok(())
    }

    /// Remove the stored token.
    ///
    /// # Errors
    /// Returns the store error. The cached token is dropped regardless, so
    /// this process behaves as signed out either way.
    pub async fn clear(&self) -> Result<(), SecureStoreError> {
        let mut cached = self.cached.write().await;
        *cached = Cached::Loaded(None);
        self.store
            .remove(TOKEN_KEY)
            .await
            .inspect_err(|e| error!(error = %e, "failed to delete access token"))
    }

    /// Returns true if a token is stored.
    pub async fn is_authenticated(&self) -> bool {
        self.get().await.is_some()
    }
}
