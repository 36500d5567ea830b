//! Markdown formatting for command output.
//!
//! Each wrapper implements `Display` and produces markdown that the
//! [`crate::renderer::TerminalRenderer`] prints either styled or as plain
//! text.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};
use waymark_core::{
    BoundingBox, Coordinates, RoutePlan, StorageBackend, TaggedLocation, WaymarkError,
};

/// A timestamp shown in the system timezone as `YYYY-MM-DD HH:MM:SS TZ`.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M:%S %Z")
        )
    }
}

/// `lat, lng` with six decimals, ready to paste into a map search box.
pub struct CoordinatePair(pub Coordinates);

impl fmt::Display for CoordinatePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.0.latitude, self.0.longitude)
    }
}

pub struct LocationDetails<'a>(pub &'a TaggedLocation);

impl fmt::Display for LocationDetails<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = self.0;
        writeln!(f, "## {}", location.name)?;
        writeln!(f)?;
        writeln!(f, "- **ID**: `{}`", location.id)?;
        writeln!(f, "- **Category**: {}", location.category)?;
        writeln!(
            f,
            "- **Coordinates**: `{}`",
            CoordinatePair(location.coordinates())
        )?;
        writeln!(f, "- **Tagged**: {}", LocalDateTime(&location.created_at))
    }
}

/// The full location list, or a hint when it is empty.
pub struct LocationList<'a>(pub &'a [TaggedLocation]);

impl fmt::Display for LocationList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No tagged locations yet. Use `wm tag` to add one.");
        }

        writeln!(f, "# Tagged Locations ({})", self.0.len())?;
        for location in self.0 {
            writeln!(f)?;
            write!(f, "{}", LocationDetails(location))?;
        }
        Ok(())
    }
}

pub struct CreateResult<'a>(pub &'a TaggedLocation);

impl fmt::Display for CreateResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Tagged location with ID: {}", self.0.id)?;
        writeln!(f)?;
        write!(f, "{}", LocationDetails(self.0))
    }
}

/// Outcome of `remove`: the removed record, or the id that was not there.
pub enum DeleteResult<'a> {
    Removed(&'a TaggedLocation),
    Absent(&'a str),
}

impl fmt::Display for DeleteResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeleteResult::Removed(location) => writeln!(
                f,
                "Removed location '{}' (ID: {})",
                location.name, location.id
            ),
            DeleteResult::Absent(id) => {
                writeln!(f, "No tagged location with ID {id}; nothing removed")
            }
        }
    }
}

pub struct ClearResult(pub usize);

impl fmt::Display for ClearResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            1 => writeln!(f, "Removed 1 tagged location"),
            n => writeln!(f, "Removed {n} tagged locations"),
        }
    }
}

pub struct RouteSummary<'a>(pub &'a RoutePlan);

impl fmt::Display for RouteSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let route = self.0;
        writeln!(f, "# Route to {}", route.target.name)?;
        writeln!(f)?;
        writeln!(f, "- **Distance**: {:.2} km", route.distance_km)?;
        writeln!(f, "- **From**: `{}`", CoordinatePair(route.origin()))?;
        writeln!(f, "- **To**: `{}`", CoordinatePair(route.destination()))?;
        writeln!(f, "- **View**: {}", Bounds(&route.view_bounds))
    }
}

struct Bounds<'a>(&'a BoundingBox);

impl fmt::Display for Bounds<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.0;
        write!(
            f,
            "S {:.6} W {:.6} to N {:.6} E {:.6}",
            b.south, b.west, b.north, b.east
        )
    }
}

pub struct StatusReport {
    pub backend: StorageBackend,
    pub remote_configured: bool,
    pub degraded: bool,
    pub count: usize,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Waymark Status")?;
        writeln!(f)?;
        let store = match self.backend {
            StorageBackend::Primary => "remote document store",
            StorageBackend::Secondary => "local database",
        };
        writeln!(f, "- **Store**: {} ({store})", self.backend.as_str())?;
        if !self.remote_configured {
            writeln!(f, "- **Remote**: not configured")?;
        } else if self.degraded {
            writeln!(f, "- **Remote**: unreachable, using local fallback")?;
        } else {
            writeln!(f, "- **Remote**: connected")?;
        }
        writeln!(f, "- **Locations**: {}", self.count)
    }
}

/// The sentence shown to the user for a core error.
pub struct ErrorMessage<'a>(pub &'a WaymarkError);

impl fmt::Display for ErrorMessage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            WaymarkError::InvalidInput { field, reason } => {
                write!(f, "Invalid {field}: {reason}")
            }
            WaymarkError::NotFound { id } => write!(f, "No tagged location with ID {id}"),
            WaymarkError::TargetNotFound { id } => {
                write!(f, "Cannot navigate: no tagged location with ID {id}")
            }
            WaymarkError::NoCurrentPosition => write!(
                f,
                "Cannot navigate: the current position is not known yet"
            ),
            WaymarkError::PositionUnavailable { reason } => {
                write!(f, "Cannot read the current position: {reason}")
            }
            WaymarkError::Persistence { .. }
            | WaymarkError::Serialization { .. }
            | WaymarkError::FileSystem { .. } => {
                write!(f, "Could not access saved locations")
            }
            WaymarkError::XdgDirectory(_) | WaymarkError::Configuration { .. } => {
                write!(f, "Waymark is not configured correctly")
            }
        }
    }
}
