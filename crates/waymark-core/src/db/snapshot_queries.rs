//! Snapshot queries: read, mutate and replace the stored location array.

use jiff::Timestamp;
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use serde_json::Value;

use super::STORAGE_KEY;
use crate::{
    error::{DatabaseResultExt, Result, WaymarkError},
    models::{LocationId, TaggedLocation},
};

const SELECT_VALUE_SQL: &str = "SELECT value FROM kv_store WHERE key = ?1";
const UPSERT_VALUE_SQL: &str = "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3) \
     ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";

impl super::Database {
    /// Loads every stored location.
    ///
    /// Records that cannot be decoded or carry invalid coordinates are
    /// skipped and logged; a snapshot that is not a JSON array at all is an
    /// error.
    pub fn load_locations(&self) -> Result<Vec<TaggedLocation>> {
        read_snapshot(&self.connection)
    }

    /// Appends a location, replacing any stored record with the same id.
    pub fn insert_location(&mut self, location: &TaggedLocation) -> Result<()> {
        self.mutate_snapshot("insert location", |locations| {
            locations.retain(|existing| existing.id != location.id);
            locations.push(location.clone());
        })
    }

    /// Removes the location with the given id. Returns whether one existed.
    pub fn remove_location(&mut self, id: &LocationId) -> Result<bool> {
        let mut removed = false;
        self.mutate_snapshot("remove location", |locations| {
            let before = locations.len();
            locations.retain(|existing| &existing.id != id);
            removed = locations.len() != before;
        })?;
        Ok(removed)
    }

    /// Removes every location. Returns how many were stored.
    pub fn clear_locations(&mut self) -> Result<usize> {
        let mut cleared = 0;
        self.mutate_snapshot("clear locations", |locations| {
            cleared = locations.len();
            locations.clear();
        })?;
        Ok(cleared)
    }

    /// Overwrites the snapshot with exactly `locations`.
    pub fn replace_locations(&mut self, locations: &[TaggedLocation]) -> Result<()> {
        self.mutate_snapshot("replace locations", |stored| {
            *stored = locations.to_vec();
        })
    }

    /// Runs a read-modify-write of the snapshot inside one immediate
    /// transaction, so concurrent readers see either the old or the new
    /// array.
    fn mutate_snapshot<F>(&mut self, action: &str, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut Vec<TaggedLocation>),
    {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let mut locations = read_snapshot(&tx)?;
        mutate(&mut locations);
        write_snapshot(&tx, &locations)?;

        tx.commit().db_context("Failed to commit transaction")?;
        debug!("Local store: {action} ({} stored)", locations.len());
        Ok(())
    }
}

fn read_snapshot(conn: &Connection) -> Result<Vec<TaggedLocation>> {
    let raw: Option<String> = conn
        .query_row(SELECT_VALUE_SQL, params![STORAGE_KEY], |row| row.get(0))
        .optional()
        .db_context("Failed to read location snapshot")?;

    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    let records: Vec<Value> = serde_json::from_str(&raw)?;
    Ok(records.into_iter().filter_map(decode_record).collect())
}

fn write_snapshot(conn: &Connection, locations: &[TaggedLocation]) -> Result<()> {
    let raw = serde_json::to_string(locations)?;
    conn.execute(
        UPSERT_VALUE_SQL,
        params![STORAGE_KEY, raw, Timestamp::now().to_string()],
    )
    .db_context("Failed to write location snapshot")?;
    Ok(())
}

fn decode_record(record: Value) -> Option<TaggedLocation> {
    let location = match serde_json::from_value::<TaggedLocation>(record) {
        Ok(location) => location,
        Err(e) => {
            warn!("Skipping undecodable stored location: {e}");
            return None;
        }
    };

    match location.validate() {
        Ok(()) => Some(location),
        Err(WaymarkError::InvalidInput { field, reason }) => {
            warn!(
                "Skipping stored location {}: invalid {field}: {reason}",
                location.id
            );
            None
        }
        Err(e) => {
            warn!("Skipping stored location {}: {e}", location.id);
            None
        }
    }
}
