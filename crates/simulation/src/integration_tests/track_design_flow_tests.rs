//! Placing installed designs and capturing rides through the plugin events.

use crate::config::DEFAULT_PARK_CASH;
use crate::coords::{CoordsXYZD, TileCoordsXYZD};
use crate::game_actions::ActionStatus;
use crate::ride::{RideId, RideRatings, RideType, LIFECYCLE_TESTED};
use crate::test_harness::TestPark;
use crate::track_data::TrackElemType;
use crate::track_design::{
    CaptureError, TrackDesign, TrackDesignEntranceElement, TrackDesignId, TrackDesignOutcome,
    TrackDesignRepository, TrackDesignTrackElement,
};
use crate::{load_world, save_world};

const ORIGIN: CoordsXYZD = CoordsXYZD {
    x: 256,
    y: 256,
    z: 112,
    direction: 0,
};

fn station_loop() -> TrackDesign {
    let mut td = TrackDesign {
        name: "Loop".into(),
        ..Default::default()
    };
    td.track_and_vehicle.ride_type = RideType::LOOPING_ROLLER_COASTER;
    td.track_elements = [
        TrackElemType::END_STATION,
        TrackElemType::LEFT_QUARTER_TURN_3_TILES,
        TrackElemType::LEFT_QUARTER_TURN_3_TILES,
        TrackElemType::FLAT,
        TrackElemType::LEFT_QUARTER_TURN_3_TILES,
        TrackElemType::LEFT_QUARTER_TURN_3_TILES,
    ]
    .into_iter()
    .map(TrackDesignTrackElement::new)
    .collect();
    td.entrance_elements.push(TrackDesignEntranceElement {
        location: TileCoordsXYZD::new(0, 1, 0, 3),
        is_exit: false,
    });
    td
}

fn track_count(park: &TestPark, ride: RideId) -> usize {
    park.map()
        .iter_tiles()
        .flat_map(|(_, tile)| tile.elements.iter())
        .filter(|e| e.as_track().is_some_and(|t| t.ride == ride))
        .count()
}

fn placed_ride(park: &TestPark) -> RideId {
    match park.design_log().last() {
        Some(TrackDesignOutcome::Placed { ride: Some(ride), .. }) => *ride,
        other => panic!("expected a placed design, got: {other:?}"),
    }
}

fn mark_tested(park: &mut TestPark, ride: RideId) {
    let mut rides = park.rides_mut();
    let built = rides.get_mut(ride).expect("ride exists");
    built.set_lifecycle_flag(LIFECYCLE_TESTED, true);
    built.ratings = Some(RideRatings {
        excitement: 700,
        intensity: 600,
        nausea: 400,
    });
}

#[test]
fn test_place_event_builds_ride_and_charges() {
    let mut park = TestPark::new();
    let id = park.install_design(station_loop());
    park.request_place(id, ORIGIN, false);
    park.tick(1);

    let ride = placed_ride(&park);
    assert_eq!(park.rides().len(), 1);
    assert!(track_count(&park, ride) > 0, "no track was built");
    let Some(TrackDesignOutcome::Placed { cost, .. }) = park.design_log().last() else {
        unreachable!();
    };
    assert!(*cost > 0, "got: {cost}");
    assert_eq!(park.settings().cash, DEFAULT_PARK_CASH - cost);
}

#[test]
fn test_ghost_placement_is_free() {
    let mut park = TestPark::new();
    let id = park.install_design(station_loop());
    park.request_place(id, ORIGIN, true);
    park.tick(1);

    let ride = placed_ride(&park);
    assert_eq!(park.settings().cash, DEFAULT_PARK_CASH);
    let all_ghosts = park
        .map()
        .iter_tiles()
        .flat_map(|(_, tile)| tile.elements.iter())
        .filter(|e| e.as_track().is_some_and(|t| t.ride == ride))
        .all(|e| e.ghost);
    assert!(all_ghosts, "ghost placement left solid track");
}

#[test]
fn test_unknown_design_is_logged() {
    let mut park = TestPark::new();
    park.request_place(TrackDesignId(42), ORIGIN, false);
    park.tick(1);
    assert_eq!(
        park.design_log().last(),
        Some(&TrackDesignOutcome::PlaceFailed {
            design: TrackDesignId(42),
            result: None
        })
    );
    assert!(park.rides().is_empty());
}

#[test]
fn test_paused_park_refuses_placement() {
    let mut park = TestPark::new().paused();
    let id = park.install_design(station_loop());
    park.request_place(id, ORIGIN, false);
    park.tick(1);

    let status = match park.design_log().last() {
        Some(TrackDesignOutcome::PlaceFailed { result: Some(r), .. }) => r.status,
        other => panic!("expected a failed placement, got: {other:?}"),
    };
    assert_eq!(status, ActionStatus::Disallowed);
    assert!(park.rides().is_empty(), "failed placement leaked a ride");
    assert_eq!(park.map().element_count(), TestPark::new().map().element_count());
}

#[test]
fn test_capture_installs_copy_of_built_ride() {
    let mut park = TestPark::new();
    let id = park.install_design(station_loop());
    park.request_place(id, ORIGIN, false);
    park.tick(1);
    let ride = placed_ride(&park);
    mark_tested(&mut park, ride);

    park.request_capture(ride, true);
    park.tick(1);

    let captured = match park.design_log().last() {
        Some(TrackDesignOutcome::Captured { design, .. }) => *design,
        other => panic!("expected a capture, got: {other:?}"),
    };
    assert_eq!(park.designs().len(), 2);
    let installed = park.designs().get(captured).expect("captured design installed");
    assert_eq!(installed.name(), "Loop (2)");
    let types: Vec<TrackElemType> = installed.design.track_elements.iter().map(|e| e.track_type).collect();
    let original: Vec<TrackElemType> = station_loop().track_elements.iter().map(|e| e.track_type).collect();
    assert_eq!(types, original);
    assert_eq!(installed.design.statistics.ratings.excitement, 700);
    assert!(park.scenery_selection().is_empty());
}

#[test]
fn test_capture_of_untested_ride_is_logged() {
    let mut park = TestPark::new();
    let id = park.install_design(station_loop());
    park.request_place(id, ORIGIN, false);
    park.tick(1);
    let ride = placed_ride(&park);

    park.request_capture(ride, false);
    park.tick(1);
    assert_eq!(
        park.design_log().last(),
        Some(&TrackDesignOutcome::CaptureFailed {
            ride,
            error: CaptureError::NotTested
        })
    );
    assert_eq!(park.designs().len(), 1);
}

#[test]
fn test_repository_survives_save_and_load() {
    let mut park = TestPark::new();
    park.install_design(station_loop());
    let extensions = save_world(park.world_mut());
    assert!(extensions.contains_key("track_design_repository"));

    let mut restored = TestPark::new();
    assert_eq!(load_world(restored.world_mut(), &extensions), 1);
    let repo = restored.world_mut().resource::<TrackDesignRepository>();
    assert_eq!(repo.len(), 1);
    assert!(repo.find_by_name("Loop").is_some());
}
