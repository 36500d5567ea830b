//! The session's source of truth for tagged locations.
//!
//! A [`LocationRegistry`] owns an in-memory cache of the location set and the
//! [`LocationStore`] behind it. Build one per session with
//! [`RegistryBuilder`] and pass it by reference to whatever needs it.
//!
//! ```text
//! ┌──────────────────┐    ┌──────────────────┐    ┌──────────────────┐
//! │ LocationRegistry │    │  LocationStore   │    │ Remote / Local   │
//! │  (cache + CRUD)  │───▶│ (failover policy)│───▶│    backends      │
//! └──────────────────┘    └──────────────────┘    └──────────────────┘
//! ```
//!
//! Writes go to the store first and reach the cache only once the store
//! accepted them. The cache lock is held for the whole write, so readers
//! never observe a cache that is ahead of or behind the store within a
//! session.
//!
//! # Example
//!
//! ```rust,no_run
//! use waymark_core::{params::TagLocation, RegistryBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = RegistryBuilder::new()
//!     .with_database_path(Some("waymark.db"))
//!     .build()
//!     .await?;
//!
//! let car = registry
//!     .add(&TagLocation {
//!         name: "My Car".to_string(),
//!         category: "vehicle".to_string(),
//!         latitude: 37.0,
//!         longitude: -122.0,
//!     })
//!     .await?;
//!
//! assert_eq!(registry.find_by_id(&car.id).await?, car);
//! # Ok(())
//! # }
//! ```

use jiff::Timestamp;
use log::debug;
use tokio::sync::Mutex;

use crate::{
    error::{Result, WaymarkError},
    geo::Coordinates,
    models::{Category, LocationId, TaggedLocation},
    params::TagLocation,
    store::{LocationStore, StorageBackend},
};

pub mod builder;


pub use builder::RegistryBuilder;

#[derive(Debug, Default)]
struct Cache {
    loaded: bool,
    entries: Vec<TaggedLocation>,
}

/// In-memory registry of tagged locations backed by a [`LocationStore`].
#[derive(Debug)]
pub struct LocationRegistry {
    store: LocationStore,
    cache: Mutex<Cache>,
}

impl LocationRegistry {
    /// Wraps a store. The cache starts unloaded.
    pub fn new(store: LocationStore) -> Self {
        Self {
            store,
            cache: Mutex::new(Cache::default()),
        }
    }

    /// Populates the cache from the store, replacing whatever it held.
    pub async fn load(&self) -> Result<()> {
        let mut cache = self.cache.lock().await;
        cache.entries = self.store.fetch_all().await?;
        cache.loaded = true;
        debug!("Loaded {} tagged locations", cache.entries.len());
        Ok(())
    }

    /// Marks the cache stale; the next read reloads it from the store.
    pub async fn invalidate(&self) {
        self.cache.lock().await.loaded = false;
    }

    /// All tagged locations, in the order they were stored.
    pub async fn list(&self) -> Result<Vec<TaggedLocation>> {
        let mut cache = self.cache.lock().await;
        self.ensure_loaded(&mut cache).await?;
        Ok(cache.entries.clone())
    }

    /// Looks up a location by id.
    ///
    /// # Errors
    ///
    /// Returns `WaymarkError::NotFound` if no location has this id.
    pub async fn find_by_id(&self, id: &LocationId) -> Result<TaggedLocation> {
        let mut cache = self.cache.lock().await;
        self.ensure_loaded(&mut cache).await?;
        cache
            .entries
            .iter()
            .find(|location| &location.id == id)
            .cloned()
            .ok_or_else(|| WaymarkError::NotFound { id: id.clone() })
    }

    /// Validates and tags a new location.
    ///
    /// The name is trimmed and must not be empty, the category must be one
    /// of the known categories, and the coordinates must be in range. The
    /// new record is written to the store before it is added to the cache.
    ///
    /// # Errors
    ///
    /// Returns `WaymarkError::InvalidInput` for bad input (nothing is
    /// written), or a persistence error if the store rejects the write.
    pub async fn add(&self, params: &TagLocation) -> Result<TaggedLocation> {
        let name = params.name.trim();
        if name.is_empty() {
            return Err(WaymarkError::invalid_input("name").with_reason("must not be empty"));
        }
        let category = params
            .category
            .parse::<Category>()
            .map_err(|reason| WaymarkError::invalid_input("category").with_reason(reason))?;
        let coordinates = Coordinates::new(params.latitude, params.longitude)?;

        let mut cache = self.cache.lock().await;
        self.ensure_loaded(&mut cache).await?;

        let mut id = LocationId::generate();
        while cache.entries.iter().any(|existing| existing.id == id) {
            id = LocationId::generate();
        }

        let location = TaggedLocation {
            id,
            name: name.to_string(),
            category,
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
            created_at: Timestamp::now(),
        };

        self.store.insert(&location).await?;
        cache.entries.push(location.clone());
        debug!("Tagged {} '{}' as {}", location.id, location.name, location.category);

        Ok(location)
    }

    /// Removes a location. Removing an unknown id is a no-op that returns
    /// `None`; otherwise the removed record is returned.
    pub async fn remove(&self, id: &LocationId) -> Result<Option<TaggedLocation>> {
        let mut cache = self.cache.lock().await;
        self.ensure_loaded(&mut cache).await?;

        let Some(index) = cache.entries.iter().position(|location| &location.id == id) else {
            debug!("Remove of unknown location {id} ignored");
            return Ok(None);
        };

        self.store.remove_by_id(id).await?;
        Ok(Some(cache.entries.remove(index)))
    }

    /// Removes every location and returns how many there were.
    pub async fn clear(&self) -> Result<usize> {
        let mut cache = self.cache.lock().await;
        self.ensure_loaded(&mut cache).await?;

        self.store.clear().await?;
        let cleared = cache.entries.len();
        cache.entries.clear();
        Ok(cleared)
    }

    /// The store backend currently in use.
    pub async fn active_backend(&self) -> StorageBackend {
        self.store.initialize().await
    }

    /// Whether the registry fell back from a configured primary store.
    pub async fn is_degraded(&self) -> bool {
        self.store.is_degraded().await
    }

    pub fn store(&self) -> &LocationStore {
        &self.store
    }

    async fn ensure_loaded(&self, cache: &mut Cache) -> Result<()> {
        if !cache.loaded {
            cache.entries = self.store.fetch_all().await?;
            cache.loaded = true;
        }
        Ok(())
    }
}
