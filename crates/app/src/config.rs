//! Settings loaded from defaults, an optional file and the environment.

use std::path::{Path, PathBuf};

use ::config::{Config, ConfigError, Environment, File};
use imagefeed_domain::api::{DEFAULT_API_BASE_URL, DEFAULT_AUTH_BASE_URL};
use imagefeed_domain::{ApiConfig, DomainError, OAuthConfig};
use imagefeed_infrastructure::FileSecureStore;
use serde::Deserialize;
use thiserror::Error;

/// File read when no `--config` is given, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "imagefeed.toml";

/// Prefix of environment overrides, e.g. `IMAGEFEED_ACCESS_KEY`.
pub const ENV_PREFIX: &str = "IMAGEFEED";

const DEFAULT_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";
const DEFAULT_SCOPE: &str = "public read_user write_likes";

/// Errors raised while turning configuration into runtime settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A source could not be read or did not match [`Settings`].
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    /// A value was read but is not usable.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] DomainError),

    /// No token path was configured and the platform has no data directory.
    #[error("no token_path configured and no platform data directory found")]
    NoTokenPath,
}

/// Runtime settings for the client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// OAuth application access key (client id).
    pub access_key: String,
    /// OAuth application secret key.
    pub secret_key: String,
    /// Redirect URI registered for the application.
    pub redirect_uri: String,
    /// Space-separated OAuth scopes.
    pub scope: String,
    /// Base URL of the OAuth endpoints.
    pub auth_base_url: String,
    /// Base URL of the photo API.
    pub api_base_url: String,
    /// Where the token file lives; the platform data directory if unset.
    #[serde(default)]
    pub token_path: Option<PathBuf>,
}

impl Settings {
    /// Loads settings using `file` as the optional configuration file.
    ///
    /// Precedence, lowest first: built-in defaults, `file`, then
    /// `IMAGEFEED_*` environment variables.
    ///
    /// # Errors
    /// Returns [`SettingsError::Load`] if a source is malformed.
    pub fn load(file: &Path) -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .set_default("access_key", "")?
            .set_default("secret_key", "")?
            .set_default("redirect_uri", DEFAULT_REDIRECT_URI)?
            .set_default("scope", DEFAULT_SCOPE)?
            .set_default("auth_base_url", DEFAULT_AUTH_BASE_URL)?
            .set_default("api_base_url", DEFAULT_API_BASE_URL)?
            .add_source(File::from(file).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// OAuth registration built from these settings.
    ///
    /// # Errors
    /// Returns [`SettingsError::Invalid`] if a key is empty or a URL is malformed.
    pub fn oauth(&self) -> Result<OAuthConfig, SettingsError> {
        Ok(OAuthConfig::new(
            &self.access_key,
            &self.secret_key,
            &self.redirect_uri,
            &self.scope,
            &self.auth_base_url,
        )?)
    }

    /// Photo API configuration built from these settings.
    ///
    /// # Errors
    /// Returns [`SettingsError::Invalid`] if the base URL is malformed.
    pub fn api(&self) -> Result<ApiConfig, SettingsError> {
        Ok(ApiConfig::new(&self.api_base_url)?)
    }

    /// Location of the token file.
    ///
    /// # Errors
    /// Returns [`SettingsError::NoTokenPath`] if neither a configured path
    /// nor a platform data directory is available.
    pub fn token_path(&self) -> Result<PathBuf, SettingsError> {
        self.token_path
            .clone()
            .or_else(FileSecureStore::default_path)
            .ok_or(SettingsError::NoTokenPath)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load(&dir.path().join("missing.toml")).unwrap();

        assert_eq!(settings.redirect_uri, DEFAULT_REDIRECT_URI);
        assert_eq!(settings.scope, "public read_user write_likes");
        assert_eq!(settings.auth_base_url, "https://unsplash.com");
        assert_eq!(settings.api_base_url, "https://api.unsplash.com");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("imagefeed.toml");
        std::fs::write(
            &file,
            "access_key = \"key\"\nsecret_key = \"secret\"\napi_base_url = \"http://localhost:9000\"\ntoken_path = \"/tmp/token.json\"\n",
        )
        .unwrap();

        let settings = Settings::load(&file).unwrap();

        assert_eq!(settings.access_key, "key");
        assert_eq!(settings.api_base_url, "http://localhost:9000");
        assert_eq!(settings.token_path().unwrap(), PathBuf::from("/tmp/token.json"));
        assert!(settings.oauth().is_ok());
        assert_eq!(
            settings.api().unwrap().photos_url(1).unwrap().host_str(),
            Some("localhost")
        );
    }

    #[test]
    fn test_missing_keys_are_rejected() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load(&dir.path().join("missing.toml")).unwrap();

        assert!(matches!(
            settings.oauth(),
            Err(SettingsError::Invalid(DomainError::MissingConfiguration(_)))
        ));
    }

    #[test]
    fn test_scope_is_form_encoded_in_authorization_url() {
        let settings = Settings {
            access_key: "key".to_string(),
            secret_key: "secret".to_string(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            auth_base_url: DEFAULT_AUTH_BASE_URL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token_path: None,
        };

        let url = settings.oauth().unwrap().authorization_url().unwrap();
        assert!(url.as_str().contains("scope=public+read_user+write_likes"));
    }
}
