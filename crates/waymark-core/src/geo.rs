//! Geodesic helpers: coordinate pairs, great-circle distance and bounds.
//!
//! Everything in here is a pure function. Coordinates are validated when a
//! [`Coordinates`] value is built, so the math itself has no error paths.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WaymarkError};

/// Mean Earth radius in kilometers (IUGG).
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Builds a validated coordinate pair.
    ///
    /// # Errors
    ///
    /// Returns `WaymarkError::InvalidInput` when either component is not
    /// finite or falls outside `[-90, 90]` / `[-180, 180]`.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let coords = Self {
            latitude,
            longitude,
        };
        coords.validate()?;
        Ok(coords)
    }

    /// Checks that both components are finite and in range.
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(WaymarkError::invalid_input("latitude").with_reason(format!(
                "{} is not a latitude in [-90, 90]",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(WaymarkError::invalid_input("longitude").with_reason(format!(
                "{} is not a longitude in [-180, 180]",
                self.longitude
            )));
        }
        Ok(())
    }
}

impl FromStr for Coordinates {
    type Err = WaymarkError;

    /// Parses `"lat,lng"`, tolerating whitespace around either part.
    fn from_str(s: &str) -> Result<Self> {
        let (lat, lng) = s.split_once(',').ok_or_else(|| {
            WaymarkError::invalid_input("coordinates")
                .with_reason(format!("expected 'lat,lng', got '{s}'"))
        })?;

        let parse = |field: &str, raw: &str| {
            raw.trim().parse::<f64>().map_err(|_| {
                WaymarkError::invalid_input(field)
                    .with_reason(format!("'{}' is not a number", raw.trim()))
            })
        };

        Self::new(parse("latitude", lat)?, parse("longitude", lng)?)
    }
}

/// Axis-aligned latitude/longitude rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Zero-area box at a single point.
    pub fn at(point: Coordinates) -> Self {
        Self {
            south: point.latitude,
            west: point.longitude,
            north: point.latitude,
            east: point.longitude,
        }
    }

    /// Grows the box so it also covers `point`.
    pub fn extend(&mut self, point: Coordinates) {
        self.south = self.south.min(point.latitude);
        self.north = self.north.max(point.latitude);
        self.west = self.west.min(point.longitude);
        self.east = self.east.max(point.longitude);
    }

    pub fn center(&self) -> Coordinates {
        Coordinates {
            latitude: (self.south + self.north) / 2.0,
            longitude: (self.west + self.east) / 2.0,
        }
    }

    pub fn contains(&self, point: Coordinates) -> bool {
        (self.south..=self.north).contains(&point.latitude)
            && (self.west..=self.east).contains(&point.longitude)
    }

    pub fn is_degenerate(&self) -> bool {
        self.south == self.north && self.west == self.east
    }
}

/// Great-circle distance in kilometers (haversine).
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlng = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);

    // Rounding can push h a hair past 1 for antipodal points.
    2.0 * EARTH_RADIUS_KM * h.clamp(0.0, 1.0).sqrt().asin()
}

/// Smallest box containing every point, or `None` for an empty slice.
pub fn bounding_box(points: &[Coordinates]) -> Option<BoundingBox> {
    let (first, rest) = points.split_first()?;
    let mut bounds = BoundingBox::at(*first);
    for point in rest {
        bounds.extend(*point);
    }
    Some(bounds)
}
