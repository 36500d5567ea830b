//! Tagged location model and its identifier.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Category;
use crate::{
    error::{Result, WaymarkError},
    geo::Coordinates,
};

/// Opaque, stable identifier of a tagged location.
///
/// New ids are UUID v4 strings, but any non-empty string read back from
/// storage is accepted so that older ids keep resolving.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(String);

impl LocationId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for LocationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for LocationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user-saved point of interest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaggedLocation {
    /// Unique identifier, assigned at creation and never reused
    pub id: LocationId,

    /// Display name (never empty)
    pub name: String,

    /// Kind of place; older records store this under `type`
    #[serde(alias = "type")]
    pub category: Category,

    /// Latitude in decimal degrees
    pub latitude: f64,

    /// Longitude in decimal degrees
    pub longitude: f64,

    /// Timestamp when the location was tagged (UTC)
    pub created_at: Timestamp,
}

impl TaggedLocation {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    /// Checks the record invariants: non-empty id and name, valid coordinates.
    pub fn validate(&self) -> Result<()> {
        if self.id.as_str().trim().is_empty() {
            return Err(WaymarkError::invalid_input("id").with_reason("must not be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(WaymarkError::invalid_input("name").with_reason("must not be empty"));
        }
        self.coordinates().validate()
    }
}
