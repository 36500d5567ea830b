//! Data models for tagged locations and route plans.
//!
//! The serialized shape of [`TaggedLocation`] is the persisted record layout:
//! both stores read and write it, so changes here are storage format changes.
//!
//! ```rust
//! use waymark_core::models::{Category, LocationId, TaggedLocation};
//! use jiff::Timestamp;
//!
//! let location = TaggedLocation {
//!     id: LocationId::from("c0ffee"),
//!     name: "My Car".to_string(),
//!     category: Category::Vehicle,
//!     latitude: 37.0,
//!     longitude: -122.0,
//!     created_at: Timestamp::from_second(1_700_000_000).unwrap(),
//! };
//!
//! let json = serde_json::to_string(&location).unwrap();
//! assert!(json.contains("\"category\":\"vehicle\""));
//! assert!(json.contains("\"createdAt\""));
//! ```

pub mod category;
pub mod location;
pub mod route;


pub use category::Category;
pub use location::{LocationId, TaggedLocation};
pub use route::RoutePlan;
