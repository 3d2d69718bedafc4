//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port using the reqwest library.
//! It handles all HTTP communication with the photo and OAuth APIs.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use imagefeed_application::ports::{ApiRequest, ApiResponse, HttpClient, HttpClientError};
use imagefeed_domain::HttpMethod;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method};

const USER_AGENT: &str = concat!("imagefeed/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client implementation using reqwest.
///
/// Wraps `reqwest::Client` and implements the `HttpClient` port from the
/// application layer. Requests carry no timeout of their own beyond the
/// connect timeout.
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Creates a new HTTP client with default settings.
    ///
    /// Default configuration:
    /// - Connection timeout: 30 seconds
    /// - Follow redirects: up to 10
    /// - User-Agent: `imagefeed/<version>`
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new() -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self { client })
    }

    /// Creates a new HTTP client with a custom reqwest client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Maps reqwest errors to the port's `HttpClientError`.
    fn map_error(error: &reqwest::Error) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout;
        }
        if error.is_connect() {
            return HttpClientError::ConnectionFailed(error.to_string());
        }
        if error.is_builder() {
            return HttpClientError::InvalidUrl(error.to_string());
        }
        HttpClientError::Other(error.to_string())
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute(
        &self,
        request: ApiRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ApiResponse, HttpClientError>> + Send + '_>> {
        Box::pin(async move {
            let mut builder = self
                .client
                .request(Self::to_reqwest_method(request.method), request.url)
                .header(ACCEPT, "application/json");

            if let Some(token) = &request.bearer {
                builder = builder.header(AUTHORIZATION, token.bearer_header());
            }

            let response = builder.send().await.map_err(|e| Self::map_error(&e))?;
            let status = response.status().as_u16();

            let body = response
                .bytes()
                .await
                .map_err(|e| HttpClientError::Other(format!("failed to read body: {e}")))?
                .to_vec();

            Ok(ApiResponse::new(status, body))
        })
    }
}
