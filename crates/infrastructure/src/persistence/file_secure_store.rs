//! File-based secure store implementation.
//!
//! Values are kept in a single JSON object on disk:
//! ```json
//! {
//!   "accessToken": "abc123"
//! }
//! ```
//! The file is replaced atomically on every write and, on Unix, is only
//! readable by its owner.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use imagefeed_application::ports::{SecureStore, SecureStoreError};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use crate::serialization::{from_json_bytes, to_json_stable_bytes};

type Entries = BTreeMap<String, String>;

/// Secure store persisted as a JSON file.
#[derive(Debug)]
pub struct FileSecureStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSecureStore {
    /// Creates a store backed by the file at `path`.
    ///
    /// The file and its parent directories are created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Platform data directory location: `<data_dir>/imagefeed/token.json`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("imagefeed").join("token.json"))
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Entries, SecureStoreError> {
        match fs::read(&self.path).await {
            Ok(content) => from_json_bytes(&content)
                .map_err(|e| SecureStoreError::Serialization(e.to_string())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, entries: &Entries) -> Result<(), SecureStoreError> {
        if entries.is_empty() {
            return Ok(remove_if_exists(&self.path).await?);
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let content = to_json_stable_bytes(entries)
            .map_err(|e| SecureStoreError::Serialization(e.to_string()))?;

        let staging = self.path.with_extension("json.tmp");
        remove_if_exists(&staging).await?;
        let mut file = owner_only_options().open(&staging).await?;
        file.write_all(&content).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&staging, &self.path).await?;
        debug!(path = %self.path.display(), entries = entries.len(), "secure store saved");
        Ok(())
    }
}

async fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path).await {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

/// Options for a fresh staging file that is owner-only from creation.
fn owner_only_options() -> OpenOptions {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);
    options
}

#[async_trait]
impl SecureStore for FileSecureStore {
    async fn get(&self, key: &str) -> Result<Option<String>, SecureStoreError> {
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), SecureStoreError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<(), SecureStoreError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        if entries.remove(key).is_some() {
            self.save(&entries).await?;
        }
        Ok(())
    }
}
