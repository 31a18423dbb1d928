//! Integration tests for the game action executor system.
//!
//! Each test pushes actions into the [`ActionQueue`], ticks the simulation, and
//! verifies the expected world mutations via the [`ActionResultLog`].

use crate::coords::CoordsXYZD;
use crate::game_actions::{ActionFlags, ActionPayload, ActionStatus, ParkAction, TrackPlaceAction};
use crate::ride::RideType;
use crate::test_harness::TestPark;
use crate::track_data::TrackElemType;
use crate::track_design::{TrackDesign, TrackDesignAction, TrackDesignTrackElement};

#[test]
fn test_executor_runs_queued_actions_in_order() {
    let mut park = TestPark::new();
    park.queue_action(ParkAction::SetPaused { paused: true });
    park.queue_action(ParkAction::SetPaused { paused: false });
    park.tick(1);

    assert!(!park.settings().paused);
    assert_eq!(park.action_log().len(), 2);
}

#[test]
fn test_executor_places_design_from_queue() {
    let mut td = TrackDesign::default();
    td.track_and_vehicle.ride_type = RideType::LOOPING_ROLLER_COASTER;
    td.track_elements = vec![
        TrackDesignTrackElement::new(TrackElemType::FLAT),
        TrackDesignTrackElement::new(TrackElemType::FLAT),
    ];
    let mut park = TestPark::new();
    let action = TrackDesignAction::new(td, CoordsXYZD::new(320, 320, 112, 0)).with_flags(ActionFlags::APPLY);
    park.queue_action(ParkAction::PlaceTrackDesign(Box::new(action)));
    park.tick(1);

    let result = park.action_log().last().map(|e| e.result.clone()).unwrap();
    assert!(result.is_ok(), "got: {result}");
    assert!(matches!(result.payload, ActionPayload::Ride { .. }), "got: {:?}", result.payload);
    assert_eq!(park.rides().len(), 1);
    assert_eq!(park.action_log().built_rides().count(), 1);
}

#[test]
fn test_ghost_previews_collapse_to_latest() {
    let mut td = TrackDesign::default();
    td.track_and_vehicle.ride_type = RideType::LOOPING_ROLLER_COASTER;
    td.track_elements = vec![TrackDesignTrackElement::new(TrackElemType::FLAT)];
    let mut park = TestPark::new();
    for x in [320, 352, 384] {
        let preview = TrackDesignAction::new(td.clone(), CoordsXYZD::new(x, 320, 112, 0))
            .with_flags(ActionFlags::APPLY | ActionFlags::GHOST);
        park.queue_action(ParkAction::PlaceTrackDesign(Box::new(preview)));
    }
    park.tick(1);

    let log = park.action_log();
    assert_eq!(log.len(), 1);
    assert_eq!(log.ghost_count(), 1);
    assert!(log.last_real().is_none());
    assert_eq!(log.built_rides().count(), 0);
    assert_eq!(park.settings().cash, TestPark::new().settings().cash);
}

#[test]
fn test_executor_logs_failures() {
    let mut park = TestPark::new().with_cash(0);
    let ride = park.rides_mut().create(RideType::LOOPING_ROLLER_COASTER);
    let action = TrackPlaceAction::new(
        ride,
        TrackElemType::FLAT,
        RideType::LOOPING_ROLLER_COASTER,
        CoordsXYZD::new(320, 320, 112, 0),
    )
    .with_flags(ActionFlags::APPLY);
    park.queue_action(ParkAction::TrackPlace(action));
    park.tick(1);

    let result = park.action_log().last().map(|e| e.result.clone()).unwrap();
    assert_eq!(result.status, ActionStatus::InsufficientFunds, "got: {result}");
    assert_eq!(park.map().element_count(), TestPark::new().map().element_count());
}

#[test]
fn test_tick_counter_advances() {
    let mut park = TestPark::new();
    let start = park.tick_count();
    park.tick(3);
    assert_eq!(park.tick_count(), start + 3);
}
