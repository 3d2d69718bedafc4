//! Photo API endpoint layout

use url::Url;

use crate::error::{DomainError, DomainResult};

/// Base URL of the public photo API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.unsplash.com";

/// Base URL of the OAuth host.
pub const DEFAULT_AUTH_BASE_URL: &str = "https://unsplash.com";

/// Number of photos requested per feed page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Endpoint builder for the photo API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: Url,
}

impl ApiConfig {
    /// Creates an API configuration rooted at `base_url`.
    ///
    /// # Errors
    /// Returns an error if the URL is malformed or cannot carry a path.
    pub fn new(base_url: &str) -> DomainResult<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| DomainError::InvalidUrl(format!("{e}: {base_url}")))?;
        if base_url.cannot_be_a_base() {
            return Err(DomainError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { base_url })
    }

    /// `GET /me`
    ///
    /// # Errors
    /// Returns an error if the base URL cannot carry a path.
    pub fn me_url(&self) -> DomainResult<Url> {
        self.endpoint(&["me"])
    }

    /// `GET /users/{username}`
    ///
    /// # Errors
    /// Returns an error if `username` is empty.
    pub fn user_url(&self, username: &str) -> DomainResult<Url> {
        self.endpoint(&["users", username])
    }

    /// `GET /photos?page={page}&per_page=10`
    ///
    /// # Errors
    /// Returns an error if the base URL cannot carry a path.
    pub fn photos_url(&self, page: u32) -> DomainResult<Url> {
        let mut url = self.endpoint(&["photos"])?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &DEFAULT_PAGE_SIZE.to_string());
        Ok(url)
    }

    /// `POST|DELETE /photos/{id}/like`
    ///
    /// # Errors
    /// Returns an error if `photo_id` is empty.
    pub fn like_url(&self, photo_id: &str) -> DomainResult<Url> {
        self.endpoint(&["photos", photo_id, "like"])
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> DomainResult<Url> {
        if let Some(empty) = segments.iter().position(|s| s.trim().is_empty()) {
            return Err(DomainError::InvalidUrl(format!(
                "empty path segment at position {empty}"
            )));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| DomainError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_endpoints() {
        let api = ApiConfig::new(DEFAULT_API_BASE_URL).unwrap();
        assert_eq!(api.me_url().unwrap().as_str(), "https://api.unsplash.com/me");
        assert_eq!(
            api.user_url("jane").unwrap().as_str(),
            "https://api.unsplash.com/users/jane"
        );
        assert_eq!(
            api.photos_url(3).unwrap().as_str(),
            "https://api.unsplash.com/photos?page=3&per_page=10"
        );
        assert_eq!(
            api.like_url("abc").unwrap().as_str(),
            "https://api.unsplash.com/photos/abc/like"
        );
    }

    #[test]
    fn test_segments_are_encoded() {
        let api = ApiConfig::new("http://localhost:8080/v1/").unwrap();
        assert_eq!(
            api.like_url("a/b").unwrap().as_str(),
            "http://localhost:8080/v1/photos/a%2Fb/like"
        );
    }

    #[test]
    fn test_empty_segment_rejected() {
        let api = ApiConfig::new(DEFAULT_API_BASE_URL).unwrap();
        assert!(matches!(api.like_url(""), Err(DomainError::InvalidUrl(_))));
        assert!(matches!(api.user_url("  "), Err(DomainError::InvalidUrl(_))));
    }

    #[test]
    fn test_rejects_non_base_url() {
        assert!(ApiConfig::new("mailto:someone@example.com").is_err());
        assert!(ApiConfig::new("not a url").is_err());
    }
}
