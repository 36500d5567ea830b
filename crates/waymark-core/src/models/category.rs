//! The closed set of location categories.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// What kind of place a tag marks.
///
/// Older records call these `car` and `shop`; both spellings are still
/// accepted on input and normalized on output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Where a vehicle was parked
    #[serde(alias = "car")]
    Vehicle,

    /// A shop, stall or vendor worth coming back to
    #[serde(alias = "shop")]
    Vendor,

    /// Anything else
    #[default]
    Custom,
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vehicle" | "car" => Ok(Category::Vehicle),
            "vendor" | "shop" => Ok(Category::Vendor),
            "custom" => Ok(Category::Custom),
            _ => Err(format!(
                "Invalid category: {s} (expected vehicle, vendor or custom)"
            )),
        }
    }
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Category; 3] = [Category::Vehicle, Category::Vendor, Category::Custom];

    /// Canonical storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Vehicle => "vehicle",
            Category::Vendor => "vendor",
            Category::Custom => "custom",
        }
    }

    /// Name suggested for a new tag when the user does not give one.
    pub fn default_name(&self) -> &'static str {
        match self {
            Category::Vehicle => "My Car",
            Category::Vendor => "Favorite Shop",
            Category::Custom => "Tagged Location",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
