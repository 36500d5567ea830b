//! Location persistence with automatic fallback.
//!
//! [`LocationStore`] fronts two backends:
//!
//! ```text
//!                    ┌──────────────────────┐
//!                ┌──▶│ Primary (RemoteStore)│  HTTP document collection
//! LocationStore ─┤   └──────────────────────┘
//!                │   ┌──────────────────────┐
//!                └──▶│ Secondary (LocalStore)│ SQLite snapshot on device
//!                    └──────────────────────┘
//! ```
//!
//! The backend is chosen by [`LocationStore::initialize`] and downgraded to
//! the secondary the first time the primary fails. Primary failures are never
//! returned to callers; they are logged and the operation is served by the
//! secondary instead. While the primary is active, every successful primary
//! operation is mirrored into the secondary so that a later fallback starts
//! from the latest known state.
//!
//! Operations are serialized through one async mutex: a `fetch_all` running
//! alongside an `insert` sees the set either before or after the insert.

use log::{info, warn};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::{
    error::Result,
    models::{LocationId, TaggedLocation},
};

pub mod local;
pub mod remote;

pub use local::LocalStore;
pub use remote::{RemoteConfig, RemoteError, RemoteStore};

/// Which backend is currently serving store operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Remote document collection
    Primary,
    /// Local fallback (degraded mode when a primary is configured)
    Secondary,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Primary => "primary",
            StorageBackend::Secondary => "secondary",
        }
    }
}

/// Persistence front for the tagged location set.
#[derive(Debug)]
pub struct LocationStore {
    inner: Mutex<StoreInner>,
}

#[derive(Debug)]
struct StoreInner {
    active: Option<StorageBackend>,
    remote: Option<RemoteStore>,
    local: LocalStore,
}

impl LocationStore {
    /// Creates an uninitialized store. Without a remote, the store always
    /// runs on the local backend.
    pub fn new(local: LocalStore, remote: Option<RemoteStore>) -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                active: None,
                remote,
                local,
            }),
        }
    }

    /// Selects the active backend, probing the primary if one is configured.
    ///
    /// Calling this again after a backend has been selected does nothing.
    /// Other operations initialize lazily, so calling it is optional.
    pub async fn initialize(&self) -> StorageBackend {
        self.inner.lock().await.ensure_initialized().await
    }

    /// The backend serving requests, or `None` before initialization.
    pub async fn active_backend(&self) -> Option<StorageBackend> {
        self.inner.lock().await.active
    }

    /// Whether a primary is configured but no longer in use.
    pub async fn is_degraded(&self) -> bool {
        let inner = self.inner.lock().await;
        inner.remote.is_some() && inner.active == Some(StorageBackend::Secondary)
    }

    /// Returns every persisted location.
    ///
    /// A successful primary read overwrites the local mirror with the remote
    /// snapshot. Locations written locally during an earlier degraded session
    /// are dropped at that point; they are never uploaded.
    pub async fn fetch_all(&self) -> Result<Vec<TaggedLocation>> {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        inner.ensure_initialized().await;

        if let Some(remote) = inner.primary() {
            match remote.fetch_all().await {
                Ok(locations) => {
                    if let Err(e) = inner.local.replace_all(locations.clone()).await {
                        warn!("Failed to mirror remote snapshot to local store: {e}");
                    }
                    return Ok(locations);
                }
                Err(e) => inner.degrade("fetch", &e),
            }
        }

        inner.local.fetch_all().await
    }

    /// Persists a location to the active backend.
    pub async fn insert(&self, location: &TaggedLocation) -> Result<()> {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        inner.ensure_initialized().await;

        if let Some(remote) = inner.primary() {
            match remote.insert(location).await {
                Ok(()) => {
                    if let Err(e) = inner.local.insert(location.clone()).await {
                        warn!("Failed to mirror location {} to local store: {e}", location.id);
                    }
                    return Ok(());
                }
                Err(e) => inner.degrade("insert", &e),
            }
        }

        inner.local.insert(location.clone()).await
    }

    /// Deletes a location by id. Unknown ids are ignored.
    pub async fn remove_by_id(&self, id: &LocationId) -> Result<()> {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        inner.ensure_initialized().await;

        if let Some(remote) = inner.primary() {
            match remote.remove_by_id(id).await {
                Ok(_) => {
                    if let Err(e) = inner.local.remove_by_id(id.clone()).await {
                        warn!("Failed to mirror removal of {id} to local store: {e}");
                    }
                    return Ok(());
                }
                Err(e) => inner.degrade("remove", &e),
            }
        }

        inner.local.remove_by_id(id.clone()).await?;
        Ok(())
    }

    /// Deletes every location.
    pub async fn clear(&self) -> Result<()> {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        inner.ensure_initialized().await;

        if let Some(remote) = inner.primary() {
            match remote.clear().await {
                Ok(()) => {
                    if let Err(e) = inner.local.clear().await {
                        warn!("Failed to mirror clear to local store: {e}");
                    }
                    return Ok(());
                }
                Err(e) => inner.degrade("clear", &e),
            }
        }

        inner.local.clear().await?;
        Ok(())
    }
}

impl StoreInner {
    async fn ensure_initialized(&mut self) -> StorageBackend {
        if let Some(active) = self.active {
            return active;
        }

        let selected = match &self.remote {
            None => {
                info!(
                    "Using local location store at {}",
                    self.local.path().display()
                );
                StorageBackend::Secondary
            }
            Some(remote) => match remote.ping().await {
                Ok(()) => {
                    info!("Connected to remote location store");
                    StorageBackend::Primary
                }
                Err(e) => {
                    warn!(
                        "Remote location store unreachable, using local store at {}: {e}",
                        self.local.path().display()
                    );
                    StorageBackend::Secondary
                }
            },
        };

        self.active = Some(selected);
        selected
    }

    /// The remote store, if it is the active backend.
    fn primary(&mut self) -> Option<&mut RemoteStore> {
        match self.active {
            Some(StorageBackend::Primary) => self.remote.as_mut(),
            _ => None,
        }
    }

    fn degrade(&mut self, operation: &str, error: &RemoteError) {
        warn!(
            "Remote location store failed during {operation}, switching to local store: {error}"
        );
        self.active = Some(StorageBackend::Secondary);
    }
}
