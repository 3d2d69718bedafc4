//! In-process doubles for the ports.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use imagefeed_domain::{ApiConfig, OAuthConfig};
use serde_json::json;
use tokio::sync::Semaphore;

use crate::ports::{
    ApiRequest, ApiResponse, AuthorizationOutcome, AuthorizationPrompt, HttpClient,
    HttpClientError, SecureStore, SecureStoreError,
};

type Responder = Box<dyn Fn(&ApiRequest) -> Result<ApiResponse, HttpClientError> + Send + Sync>;
type Predicate = Box<dyn Fn(&ApiRequest) -> bool + Send + Sync>;

/// Scripted HTTP client that records every request.
pub(crate) struct MockHttpClient {
    responder: Responder,
    gate: Option<Arc<Semaphore>>,
    hang: Option<Predicate>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockHttpClient {
    pub(crate) fn new(
        responder: impl Fn(&ApiRequest) -> Result<ApiResponse, HttpClientError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            gate: None,
            hang: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every request waits for a permit on `gate` before answering.
    pub(crate) fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Requests matching `predicate` never complete.
    pub(crate) fn hanging_when(
        mut self,
        predicate: impl Fn(&ApiRequest) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.hang = Some(Box::new(predicate));
        self
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl HttpClient for MockHttpClient {
    fn execute(
        &self,
        request: ApiRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ApiResponse, HttpClientError>> + Send + '_>> {
        Box::pin(async move {
            self.requests.lock().unwrap().push(request.clone());
            if self.hang.as_ref().is_some_and(|hang| hang(&request)) {
                std::future::pending::<()>().await;
            }
            if let Some(gate) = &self.gate {
                gate.acquire().await.unwrap().forget();
            }
            (self.responder)(&request)
        })
    }
}

/// Volatile secure store.
#[derive(Default)]
pub(crate) struct MemorySecureStore {
    values: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl SecureStore for MemorySecureStore {
    async fn get(&self, key: &str) -> Result<Option<String>, SecureStoreError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), SecureStoreError> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), SecureStoreError> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Store whose writes always fail.
pub(crate) struct FailingSecureStore;

#[async_trait]
impl SecureStore for FailingSecureStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, SecureStoreError> {
        Err(SecureStoreError::Serialization("corrupt".to_string()))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), SecureStoreError> {
        Err(SecureStoreError::Io(std::io::Error::other("read-only")))
    }

    async fn remove(&self, _key: &str) -> Result<(), SecureStoreError> {
        Err(SecureStoreError::Io(std::io::Error::other("read-only")))
    }
}

/// Login page double with a fixed answer.
pub(crate) struct ScriptedPrompt {
    outcome: AuthorizationOutcome,
    pub(crate) opened: Mutex<Vec<String>>,
    pub(crate) cleared: Mutex<usize>,
}

impl ScriptedPrompt {
    pub(crate) fn new(outcome: AuthorizationOutcome) -> Self {
        Self {
            outcome,
            opened: Mutex::new(Vec::new()),
            cleared: Mutex::new(0),
        }
    }
}

#[async_trait]
impl AuthorizationPrompt for ScriptedPrompt {
    async fn authorize(&self, authorization_url: &url::Url) -> AuthorizationOutcome {
        self.opened
            .lock()
            .unwrap()
            .push(authorization_url.to_string());
        self.outcome.clone()
    }

    async fn clear_session_data(&self) {
        *self.cleared.lock().unwrap() += 1;
    }
}

pub(crate) fn api_config() -> ApiConfig {
    ApiConfig::new("https://api.example.com").unwrap()
}

pub(crate) fn oauth_config() -> OAuthConfig {
    OAuthConfig::new(
        "key",
        "secret",
        "urn:ietf:wg:oauth:2.0:oob",
        "public read_user write_likes",
        "https://auth.example.com",
    )
    .unwrap()
}

pub(crate) fn json_response(status: u16, body: &serde_json::Value) -> ApiResponse {
    ApiResponse::new(status, serde_json::to_vec(body).unwrap())
}

pub(crate) fn query_param(request: &ApiRequest, name: &str) -> Option<String> {
    request
        .url
        .query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// One photo record as the feed endpoint returns it.
pub(crate) fn photo_json(id: &str, liked: bool) -> serde_json::Value {
    json!({
        "id": id,
        "created_at": "2024-01-02T03:04:05Z",
        "width": 1080,
        "height": 720,
        "likes": 3,
        "liked_by_user": liked,
        "description": null,
        "urls": {
            "raw": format!("https://img.example.com/{id}/raw"),
            "full": format!("https://img.example.com/{id}/full"),
            "regular": format!("https://img.example.com/{id}/regular"),
            "small": format!("https://img.example.com/{id}/small"),
            "thumb": format!("https://img.example.com/{id}/thumb"),
        }
    })
}

/// Page `page` of the synthetic feed: ids `fake_{(page-1)*10}..`.
pub(crate) fn feed_page_json(page: u32) -> serde_json::Value {
    let base = (page - 1) * 10;
    serde_json::Value::Array(
        (0..10)
            .map(|i| photo_json(&format!("fake_{}", base + i), i % 2 == 0))
            .collect(),
    )
}
