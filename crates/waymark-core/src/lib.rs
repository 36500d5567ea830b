//! Core library for the Waymark location tagging application.
//!
//! This crate lets a user tag points of interest, keeps them in a remote
//! document store with a local SQLite fallback, and computes straight-line
//! routes back to them from a live position.
//!
//! # Layers
//!
//! - [`geo`]: coordinate validation, haversine distance, bounding boxes
//! - [`models`]: [`TaggedLocation`], [`Category`], [`RoutePlan`]
//! - [`store`]: [`LocationStore`] with primary/secondary failover
//! - [`registry`]: [`LocationRegistry`], the per-session cache and CRUD
//! - [`navigation`]: [`NavigationPlanner`]
//! - [`position`]: [`PositionTracker`] polling a [`PositionSource`]
//!
//! The crate never formats text for users; interface layers turn models and
//! [`WaymarkError`] values into messages.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use waymark_core::{geo::Coordinates, params::TagLocation, NavigationPlanner, RegistryBuilder};
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
//!         latitude: 37.01,
//!         longitude: -122.0,
//!     })
//!     .await?;
//!
//! let here = Coordinates::new(37.0, -122.0)?;
//! let route = NavigationPlanner::new(&registry)
//!     .plan_route(Some(here), &car.id)
//!     .await?;
//! assert!((route.distance_km - 1.11).abs() < 0.05);
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod error;
pub mod geo;
pub mod models;
pub mod navigation;
pub mod params;
pub mod position;
pub mod registry;
pub mod store;

// Re-export commonly used types
pub use error::{Result, WaymarkError};
pub use geo::{BoundingBox, Coordinates};
pub use models::{Category, LocationId, RoutePlan, TaggedLocation};
pub use navigation::NavigationPlanner;
pub use params::TagLocation;
pub use position::{FixedPosition, PositionFile, PositionSource, PositionTracker};
pub use registry::{LocationRegistry, RegistryBuilder};
pub use store::{LocationStore, RemoteConfig, StorageBackend};
