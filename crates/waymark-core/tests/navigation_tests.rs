mod common;

use std::time::Duration;

use common::{create_test_registry, tag};
use waymark_core::{
    geo, Coordinates, FixedPosition, LocationId, NavigationPlanner, PositionTracker, WaymarkError,
};

#[tokio::test]
async fn test_route_to_parked_car() {
    let (_temp_dir, registry) = create_test_registry().await;
    let car = registry
        .add(&tag("My Car", "vehicle", 37.01, -122.0))
        .await
        .unwrap();

    let here = Coordinates::new(37.0, -122.0).unwrap();
    let route = NavigationPlanner::new(&registry)
        .plan_route(Some(here), &car.id)
        .await
        .expect("Failed to plan route");

    assert!(
        (route.distance_km - 1.11).abs() < 0.05,
        "unexpected distance {}",
        route.distance_km
    );
    assert_eq!(route.line.len(), 2);
    assert_eq!(route.origin(), here);
    assert_eq!(route.destination(), car.coordinates());
    assert_eq!(route.target, car);
    assert!(route.view_bounds.contains(here));
    assert!(route.view_bounds.contains(car.coordinates()));
}

#[tokio::test]
async fn test_route_distance_matches_geo() {
    let (_temp_dir, registry) = create_test_registry().await;
    let paris = registry
        .add(&tag("Paris", "custom", 48.8566, 2.3522))
        .await
        .unwrap();

    let london = Coordinates::new(51.5074, -0.1278).unwrap();
    let route = NavigationPlanner::new(&registry)
        .plan_route(Some(london), &paris.id)
        .await
        .unwrap();

    assert_eq!(route.distance_km, geo::distance_km(london, paris.coordinates()));
    assert!((route.distance_km - 343.5).abs() < 2.0);
}

#[tokio::test]
async fn test_route_to_own_position_is_zero() {
    let (_temp_dir, registry) = create_test_registry().await;
    let spot = registry
        .add(&tag("Right here", "custom", -33.86, 151.21))
        .await
        .unwrap();

    let route = NavigationPlanner::new(&registry)
        .plan_route(Some(spot.coordinates()), &spot.id)
        .await
        .unwrap();

    assert_eq!(route.distance_km, 0.0);
    assert!(route.view_bounds.is_degenerate());
    assert_eq!(route.view_bounds.center(), spot.coordinates());
}

#[tokio::test]
async fn test_route_without_position() {
    let (_temp_dir, registry) = create_test_registry().await;
    let car = registry
        .add(&tag("My Car", "vehicle", 37.01, -122.0))
        .await
        .unwrap();

    let result = NavigationPlanner::new(&registry)
        .plan_route(None, &car.id)
        .await;

    assert!(matches!(result, Err(WaymarkError::NoCurrentPosition)));
}

#[tokio::test]
async fn test_route_to_unknown_target() {
    let (_temp_dir, registry) = create_test_registry().await;
    let here = Coordinates::new(37.0, -122.0).unwrap();

    let result = NavigationPlanner::new(&registry)
        .plan_route(Some(here), &LocationId::from("gone"))
        .await;

    match result {
        Err(WaymarkError::TargetNotFound { id }) => assert_eq!(id.as_str(), "gone"),
        other => panic!("Expected TargetNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_route_after_target_removed() {
    let (_temp_dir, registry) = create_test_registry().await;
    let stall = registry
        .add(&tag("Fruit stall", "vendor", 13.75, 100.5))
        .await
        .unwrap();
    registry.remove(&stall.id).await.unwrap();

    let here = Coordinates::new(13.7, 100.5).unwrap();
    let result = NavigationPlanner::new(&registry)
        .plan_route(Some(here), &stall.id)
        .await;

    assert!(matches!(result, Err(WaymarkError::TargetNotFound { .. })));
}

#[tokio::test]
async fn test_route_from_tracked_position() {
    let (_temp_dir, registry) = create_test_registry().await;
    let car = registry
        .add(&tag("My Car", "vehicle", 37.01, -122.0))
        .await
        .unwrap();

    let here = Coordinates::new(37.0, -122.0).unwrap();
    let tracker = PositionTracker::spawn(FixedPosition::new(here), Duration::from_secs(60));
    let mut updates = tracker.subscribe();
    updates.wait_for(Option::is_some).await.unwrap();

    let route = NavigationPlanner::new(&registry)
        .plan_route(tracker.current(), &car.id)
        .await
        .unwrap();
    assert_eq!(route.origin(), here);

    tracker.shutdown().await;
}
