//! Request execution shared by the services.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ServiceError, ServiceResult};
use crate::ports::{ApiRequest, ApiResponse, HttpClient};

/// Executes `request` and fails on any non-2xx status.
pub(crate) async fn send(http: &dyn HttpClient, request: ApiRequest) -> ServiceResult<ApiResponse> {
    let method = request.method;
    let path = request.url.path().to_string();
    let response = http.execute(request).await?;
    debug!(%method, %path, status = response.status.as_u16(), "api call completed");

    if !response.is_success() {
        return Err(ServiceError::Http {
            status: response.status,
        });
    }
    Ok(response)
}

/// Executes `request` and decodes a successful body as `T`.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    http: &dyn HttpClient,
    request: ApiRequest,
) -> ServiceResult<T> {
    let response = send(http, request).await?;
    response
        .json()
        .map_err(|e| ServiceError::Decoding(e.to_string()))
}
