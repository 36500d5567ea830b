//! Parameter structures for registry operations.
//!
//! These are the raw, unvalidated inputs an interface layer collects from the
//! user. They stay free of framework derives; the CLI converts its clap
//! argument structs into them with `From` impls, and the registry does all
//! validation.
//!
//! ```ignore
//! #[derive(Args)]
//! pub struct TagArgs { /* clap attributes */ }
//!
//! impl From<TagArgs> for TagLocation { /* field-by-field */ }
//! ```

use serde::{Deserialize, Serialize};

/// Parameters for tagging a new location.
///
/// `category` is kept as text so that an out-of-set value is reported as a
/// validation failure by the registry rather than rejected by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagLocation {
    /// Display name (required, must not be blank)
    pub name: String,
    /// One of `vehicle`, `vendor` or `custom`
    pub category: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}
