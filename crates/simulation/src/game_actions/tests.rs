use super::*;
use crate::context::ParkState;
use crate::coords::{CoordsXYZ, CoordsXYZD};
use crate::ride::{RideId, RideType};
use crate::tile_map::{ElementClass, TileMap};
use crate::track_data::TrackElemType;

#[test]
fn test_park_action_serialization() {
    let action = ParkAction::SetPaused { paused: true };
    let json = serde_json::to_string(&action).unwrap();
    let decoded: ParkAction = serde_json::from_str(&json).unwrap();
    assert_eq!(action, decoded);

    let action = ParkAction::TrackPlace(
        TrackPlaceAction::new(
            RideId(3),
            TrackElemType::FLAT,
            RideType::LOOPING_ROLLER_COASTER,
            CoordsXYZD::new(320, 96, 112, 2),
        )
        .with_flags(ActionFlags::APPLY | ActionFlags::GHOST),
    );
    let json = serde_json::to_string(&action).unwrap();
    let decoded: ParkAction = serde_json::from_str(&json).unwrap();
    assert_eq!(action, decoded);
}

#[test]
fn test_action_result_serialization() {
    let res = ActionResult::ok()
        .with_cost(1250)
        .at(CoordsXYZ::new(16, 48, 112))
        .with_payload(ActionPayload::Ride { ride: RideId(4) });
    let json = serde_json::to_string(&res).unwrap();
    let decoded: ActionResult = serde_json::from_str(&json).unwrap();
    assert_eq!(res, decoded);

    let res = ActionResult::error(
        ActionStatus::NoClearance,
        ActionMessage::CantBuildThisHere,
        ActionMessage::ObstructedBy(ElementClass::Wall),
    );
    let json = serde_json::to_string(&res).unwrap();
    let decoded: ActionResult = serde_json::from_str(&json).unwrap();
    assert_eq!(res, decoded);
}

#[test]
fn test_ghost_and_no_spend_do_not_charge() {
    assert!(ActionFlags::APPLY.charges_cost());
    assert!(!(ActionFlags::APPLY | ActionFlags::GHOST).charges_cost());
    assert!(!(ActionFlags::APPLY | ActionFlags::NO_SPEND).charges_cost());
}

#[test]
fn test_paused_park_refuses_construction() {
    let mut park = ParkState::with_map(TileMap::new(16, 16));
    park.settings.paused = true;
    let ctx = park.ctx();
    let refused = check_not_paused(ActionFlags::APPLY, &ctx, ActionMessage::CantBuildThisHere);
    let status = refused.err().map(|r| r.status);
    assert_eq!(status, Some(ActionStatus::Disallowed), "got: {status:?}");
    assert!(check_not_paused(
        ActionFlags::APPLY | ActionFlags::ALLOW_DURING_PAUSED,
        &ctx,
        ActionMessage::CantBuildThisHere
    )
    .is_ok());
}

#[test]
fn test_query_nested_reports_insufficient_funds() {
    let mut park = ParkState::with_map(TileMap::new(16, 16));
    park.map.set_all_owned(true);
    park.settings.cash = 0;
    let ride = park.rides.create(RideType::LOOPING_ROLLER_COASTER);
    let action = TrackPlaceAction::new(
        ride,
        TrackElemType::FLAT,
        RideType::LOOPING_ROLLER_COASTER,
        CoordsXYZD::new(128, 128, 112, 0),
    )
    .with_flags(ActionFlags::APPLY);
    let ctx = park.ctx();
    let result = query_nested(&action, &ctx);
    assert_eq!(result.status, ActionStatus::InsufficientFunds, "got: {result}");
    assert!(result.cost > 0, "got: {}", result.cost);
}
