//! Result of a navigation request.

use serde::{Deserialize, Serialize};

use super::TaggedLocation;
use crate::geo::{BoundingBox, Coordinates};

/// A straight-line route from the current position to a tagged location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoutePlan {
    /// The resolved target
    pub target: TaggedLocation,

    /// Two-point line: `[current position, target]`
    pub line: [Coordinates; 2],

    /// Great-circle length of the line
    pub distance_km: f64,

    /// Box framing both ends of the line
    pub view_bounds: BoundingBox,
}

impl RoutePlan {
    pub fn origin(&self) -> Coordinates {
        self.line[0]
    }

    pub fn destination(&self) -> Coordinates {
        self.line[1]
    }
}
