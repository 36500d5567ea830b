//! Secondary store: the device-local SQLite snapshot.

use std::path::{Path, PathBuf};

use tokio::task;

use crate::{
    db::Database,
    error::{Result, WaymarkError},
    models::{LocationId, TaggedLocation},
};

/// Async handle to the local database file.
///
/// Each operation opens its own connection on the blocking pool.
#[derive(Debug, Clone)]
pub struct LocalStore {
    db_path: PathBuf,
}

impl LocalStore {
    /// Opens the database at `db_path`, creating the file and schema if
    /// needed.
    pub async fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let store = Self {
            db_path: db_path.as_ref().to_path_buf(),
        };
        store.with_db(|_| Ok(())).await?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    pub async fn fetch_all(&self) -> Result<Vec<TaggedLocation>> {
        self.with_db(|db| db.load_locations()).await
    }

    pub async fn insert(&self, location: TaggedLocation) -> Result<()> {
        self.with_db(move |db| db.insert_location(&location)).await
    }

    pub async fn remove_by_id(&self, id: LocationId) -> Result<bool> {
        self.with_db(move |db| db.remove_location(&id)).await
    }

    pub async fn clear(&self) -> Result<usize> {
        self.with_db(|db| db.clear_locations()).await
    }

    /// Overwrites the stored snapshot.
    pub async fn replace_all(&self, locations: Vec<TaggedLocation>) -> Result<()> {
        self.with_db(move |db| db.replace_locations(&locations)).await
    }

    async fn with_db<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            op(&mut db)
        })
        .await
        .map_err(WaymarkError::join)?
    }
}
