//! Straight-line navigation from the current position to a tagged location.

use crate::{
    error::{Result, WaymarkError},
    geo::{self, BoundingBox, Coordinates},
    models::{LocationId, RoutePlan},
    registry::LocationRegistry,
};

/// Plans routes against a registry. Holds no state of its own.
#[derive(Debug, Clone, Copy)]
pub struct NavigationPlanner<'a> {
    registry: &'a LocationRegistry,
}

impl<'a> NavigationPlanner<'a> {
    pub fn new(registry: &'a LocationRegistry) -> Self {
        Self { registry }
    }

    /// Computes the two-point line, distance and view bounds from `current`
    /// to the location `target_id`.
    ///
    /// The route is the geodesic straight line; roads are not considered.
    ///
    /// # Errors
    ///
    /// - `WaymarkError::NoCurrentPosition` when `current` is `None`
    /// - `WaymarkError::TargetNotFound` when `target_id` is not tagged
    pub async fn plan_route(
        &self,
        current: Option<Coordinates>,
        target_id: &LocationId,
    ) -> Result<RoutePlan> {
        let current = current.ok_or(WaymarkError::NoCurrentPosition)?;
        current.validate()?;

        let target = match self.registry.find_by_id(target_id).await {
            Ok(target) => target,
            Err(WaymarkError::NotFound { id }) => return Err(WaymarkError::TargetNotFound { id }),
            Err(e) => return Err(e),
        };

        let destination = target.coordinates();
        let line = [current, destination];

        Ok(RoutePlan {
            distance_km: geo::distance_km(current, destination),
            view_bounds: geo::bounding_box(&line).unwrap_or_else(|| BoundingBox::at(current)),
            line,
            target,
        })
    }
}

