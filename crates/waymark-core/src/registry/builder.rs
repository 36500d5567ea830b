//! Builder for creating and configuring LocationRegistry instances.

use std::path::{Path, PathBuf};

use super::LocationRegistry;
use crate::{
    error::{Result, WaymarkError},
    store::{LocalStore, LocationStore, RemoteConfig, RemoteStore},
};

/// Builder for creating and configuring LocationRegistry instances.
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    database_path: Option<PathBuf>,
    remote: Option<RemoteConfig>,
}

impl RegistryBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path for the local store.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/waymark/waymark.db` or `~/.local/share/waymark/waymark.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Configures the remote (primary) store. Without one, the registry
    /// runs on the local store only.
    pub fn with_remote(mut self, remote: Option<RemoteConfig>) -> Self {
        if let Some(remote) = remote {
            self.remote = Some(remote);
        }
        self
    }

    /// Builds the registry and selects the storage backend.
    ///
    /// An unreachable remote store is not an error: the registry falls back
    /// to the local store and logs a warning.
    ///
    /// # Errors
    ///
    /// Returns `WaymarkError::FileSystem` if the database directory cannot
    /// be created, `WaymarkError::Persistence` if the local database cannot
    /// be opened, and `WaymarkError::Configuration` if the remote settings
    /// are malformed.
    pub async fn build(self) -> Result<LocationRegistry> {
        let db_path = if let Some(path) = self.database_path {
            path
        } else {
            Self::default_database_path()?
        };

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| WaymarkError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let local = LocalStore::open(&db_path).await?;
        let remote = self.remote.as_ref().map(RemoteStore::new).transpose()?;

        let store = LocationStore::new(local, remote);
        store.initialize().await;

        Ok(LocationRegistry::new(store))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("waymark")
            .place_data_file("waymark.db")
            .map_err(|e| WaymarkError::XdgDirectory(e.to_string()))
    }
}
