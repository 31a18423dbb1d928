use super::*;
use crate::config::DEFAULT_PARK_CASH;
use crate::context::ParkState;
use crate::coords::{TileCoordsXY, TileCoordsXYZD};
use crate::game_actions::{run_nested, ActionPayload, GameAction};
use crate::objects::{ObjectEntryDescriptor, ObjectKind, ObjectType};
use crate::park::{MAP_SELECT_FLAG_ENABLE_ARROW, MAP_SELECT_FLAG_ENABLE_CONSTRUCT};
use crate::ride::{RideType, LIFECYCLE_NOT_CUSTOM_DESIGN};
use crate::track_data::TrackElemType;
use crate::track_design::{
    TrackDesignEntranceElement, TrackDesignMazeElement, TrackDesignSceneryElement,
    TrackDesignTrackElement, TRACK_DESIGN_FLAG_VEHICLE_UNAVAILABLE,
};

const Z: i32 = 112;

fn owned_park() -> ParkState {
    let mut park = ParkState::with_map(TileMap::new(32, 32));
    park.map.set_all_owned(true);
    park
}

fn origin(direction: Direction) -> CoordsXYZD {
    CoordsXYZD::new(256, 256, Z, direction)
}

fn coaster(pieces: &[TrackElemType]) -> TrackDesign {
    let mut td = TrackDesign::default();
    td.name = "Test Coaster".into();
    td.track_and_vehicle.ride_type = RideType::LOOPING_ROLLER_COASTER;
    td.track_elements = pieces.iter().map(|&p| TrackDesignTrackElement::new(p)).collect();
    td
}

/// Station, four left turns and a straight: a closed circuit spanning five
/// by four tiles, all on the negative-y side of the station.
fn station_loop() -> TrackDesign {
    coaster(&[
        TrackElemType::END_STATION,
        TrackElemType::LEFT_QUARTER_TURN_3_TILES,
        TrackElemType::LEFT_QUARTER_TURN_3_TILES,
        TrackElemType::FLAT,
        TrackElemType::LEFT_QUARTER_TURN_3_TILES,
        TrackElemType::LEFT_QUARTER_TURN_3_TILES,
    ])
}

fn station_loop_with_entrance() -> TrackDesign {
    let mut td = station_loop();
    td.entrance_elements.push(TrackDesignEntranceElement {
        location: TileCoordsXYZD::new(0, 1, 0, 3),
        is_exit: false,
    });
    td
}

fn track_directions_at(park: &ParkState, loc: CoordsXY) -> Vec<Direction> {
    park.map
        .elements_at(loc)
        .iter()
        .filter_map(|e| e.as_track())
        .map(|t| t.direction)
        .collect()
}

#[test]
fn test_rotation_moves_following_piece() {
    let td = coaster(&[TrackElemType::FLAT, TrackElemType::FLAT]);

    let mut park = owned_park();
    let ride = park.rides.create(RideType::LOOPING_ROLLER_COASTER);
    let (_, result) = place_virtual(&mut park.ctx(), &td, TrackPlaceOperation::Place, true, ride, origin(0));
    assert!(result.is_ok(), "got: {result}");
    assert_eq!(track_directions_at(&park, CoordsXY::new(256, 256)), vec![0]);
    assert_eq!(track_directions_at(&park, CoordsXY::new(224, 256)), vec![0]);

    let mut park = owned_park();
    let ride = park.rides.create(RideType::LOOPING_ROLLER_COASTER);
    let (_, result) = place_virtual(&mut park.ctx(), &td, TrackPlaceOperation::Place, true, ride, origin(1));
    assert!(result.is_ok(), "got: {result}");
    assert_eq!(track_directions_at(&park, CoordsXY::new(256, 256)), vec![1]);
    assert_eq!(track_directions_at(&park, CoordsXY::new(256, 288)), vec![1]);
    assert!(track_directions_at(&park, CoordsXY::new(224, 256)).is_empty());
}

#[test]
fn test_ghost_place_then_remove_is_net_zero() {
    let td = station_loop_with_entrance();
    let mut park = owned_park();
    let before = park.map.element_count();
    let ride = park.rides.create(RideType::LOOPING_ROLLER_COASTER);

    let (state, result) =
        place_virtual(&mut park.ctx(), &td, TrackPlaceOperation::PlaceGhost, true, ride, origin(0));
    assert!(result.is_ok(), "got: {result}");
    assert!(state.entrance_exit_placed);
    assert!(park.map.element_count() > before);
    let ghosts = park
        .map
        .iter_tiles()
        .flat_map(|(_, tile)| tile.elements.iter())
        .filter(|e| !e.is_surface())
        .all(|e| e.ghost);
    assert!(ghosts, "every placed element should be a ghost");
    assert_eq!(park.settings.cash, DEFAULT_PARK_CASH);

    let (_, _) = place_virtual(&mut park.ctx(), &td, TrackPlaceOperation::RemoveGhost, true, ride, origin(0));
    assert_eq!(park.map.element_count(), before);
    assert_eq!(park.settings.cash, DEFAULT_PARK_CASH);
    assert!(park.rides.get(ride).is_none());
}

#[test]
fn test_query_predicts_place_cost() {
    let td = station_loop_with_entrance();

    let mut queried = owned_park();
    let before = queried.map.element_count();
    let query = place_track_design(&mut queried.ctx(), &td, origin(0), ActionFlags::NONE);
    assert!(query.is_ok(), "got: {query}");
    assert_eq!(queried.map.element_count(), before);
    assert!(queried.rides.is_empty());

    let mut placed = owned_park();
    let place = place_track_design(&mut placed.ctx(), &td, origin(0), ActionFlags::APPLY);
    assert!(place.is_ok(), "got: {place}");
    assert!(query.cost > 0);
    assert_eq!(query.cost, place.cost);
}

#[test]
fn test_query_reports_same_failure_as_place() {
    let td = station_loop();
    let mut park = owned_park();
    park.map.set_all_owned(false);

    let query = place_track_design(&mut park.ctx(), &td, origin(0), ActionFlags::NONE);
    let place = place_track_design(&mut park.ctx(), &td, origin(0), ActionFlags::APPLY);
    assert!(!query.is_ok());
    assert_eq!(query.status, place.status);
    assert_eq!(query.detail, place.detail);
    assert!(park.rides.is_empty());
}

#[test]
fn test_get_place_z_lifts_over_raised_terrain() {
    let td = coaster(&[TrackElemType::FLAT, TrackElemType::FLAT]);
    let mut park = owned_park();
    park.map.set_surface(CoordsXY::new(224, 256), Z + 16, 0, 0);
    let ride = park.rides.create(RideType::LOOPING_ROLLER_COASTER);

    assert_eq!(get_place_z(&mut park.ctx(), &td, ride, origin(0)), 16);
    assert_eq!(
        design_base_z(&mut park.ctx(), &td, ride, CoordsXY::new(256, 256), 0),
        Some(Z + 16)
    );
}

#[test]
fn test_get_place_z_accounts_for_water() {
    let td = coaster(&[TrackElemType::FLAT]);
    let mut park = owned_park();
    park.map.set_surface(CoordsXY::new(256, 256), Z, 0, Z + 32);
    let ride = park.rides.create(RideType::LOOPING_ROLLER_COASTER);
    assert_eq!(get_place_z(&mut park.ctx(), &td, ride, origin(0)), 32);
}

#[test]
fn test_get_place_z_subtracts_scenery_adjustment() {
    let mut td = coaster(&[TrackElemType::FLAT, TrackElemType::FLAT]);
    td.scenery_elements.push(TrackDesignSceneryElement {
        scenery_object: ObjectEntryDescriptor::new(ObjectType::SmallScenery, "TL0"),
        z: -4,
        ..Default::default()
    });
    let mut park = owned_park();
    park.map.set_surface(CoordsXY::new(224, 256), Z + 16, 0, 0);
    let ride = park.rides.create(RideType::LOOPING_ROLLER_COASTER);

    let (state, _) = place_virtual(&mut park.ctx(), &td, TrackPlaceOperation::GetPlaceZ, true, ride, origin(0));
    assert_eq!(state.place_z, 16);
    assert_eq!(state.place_scenery_z, -16);
    assert_eq!(state.place_z_result(), 32);
    assert!(state.has_scenery);
    assert!(state.scenery_unavailable);
}

#[test]
fn test_draw_outlines_only_selects() {
    let td = station_loop_with_entrance();
    let mut park = owned_park();
    let before = park.map.element_count();
    let ride = park.rides.create(RideType::LOOPING_ROLLER_COASTER);

    let (_, result) =
        place_virtual(&mut park.ctx(), &td, TrackPlaceOperation::DrawOutlines, true, ride, origin(0));
    assert!(result.is_ok());
    assert_eq!(park.map.element_count(), before);
    assert!(park.selection.tiles.contains(&CoordsXY::new(256, 256)));
    assert!(park.selection.tiles.contains(&CoordsXY::new(256, 288)));
    assert!(park.selection.tiles.iter().all(|t| t.y <= 288 && t.x >= 192 && t.x <= 320));
    assert!(park.selection.has_flag(MAP_SELECT_FLAG_ENABLE_CONSTRUCT));
    assert!(park.selection.has_flag(MAP_SELECT_FLAG_ENABLE_ARROW));
    assert_eq!(park.selection.arrow_position, Some(CoordsXYZ::new(256, 256, Z)));
}

#[test]
fn test_placement_context_is_restored() {
    let td = coaster(&[TrackElemType::FLAT]);
    let mut park = owned_park();
    let ride = park.rides.create(RideType::LOOPING_ROLLER_COASTER);
    let mut ctx = park.ctx();
    ctx.placement.current_direction = 2;

    place_virtual(&mut ctx, &td, TrackPlaceOperation::PlaceQuery, true, ride, origin(1));
    assert_eq!(ctx.placement.current_direction, 2);
    assert_eq!(ctx.placement.current_ride, None);
}

#[test]
fn test_unknown_piece_aborts() {
    let td = coaster(&[TrackElemType::FLAT, TrackElemType(0xFFFF)]);
    let mut park = owned_park();
    let ride = park.rides.create(RideType::LOOPING_ROLLER_COASTER);
    let (_, result) = place_virtual(&mut park.ctx(), &td, TrackPlaceOperation::PlaceQuery, true, ride, origin(0));
    assert_eq!(result.status, ActionStatus::InvalidParameters);
    assert_eq!(result.detail, ActionMessage::InvalidTrackType);
}

#[test]
fn test_maze_rotates_wall_bits() {
    let mut td = TrackDesign::default();
    td.track_and_vehicle.ride_type = RideType::MAZE;
    td.maze_elements = vec![
        TrackDesignMazeElement {
            location: TileCoordsXY::new(0, 0),
            maze_entry: 0x000F,
        },
        TrackDesignMazeElement {
            location: TileCoordsXY::new(1, 0),
            maze_entry: 0x0001,
        },
    ];
    let mut park = owned_park();
    let ride = park.rides.create(RideType::MAZE);
    let (_, result) = place_virtual(&mut park.ctx(), &td, TrackPlaceOperation::Place, true, ride, origin(1));
    assert!(result.is_ok(), "got: {result}");

    let entry_at = |loc: CoordsXY| {
        park.map
            .elements_at(loc)
            .iter()
            .find_map(|e| e.as_track())
            .map(|t| t.maze_entry)
    };
    assert_eq!(entry_at(CoordsXY::new(256, 256)), Some(0x00F0));
    assert_eq!(entry_at(CoordsXY::new(256, 224)), Some(0x0010));
    assert_eq!(park.rides.get(ride).map(|r| r.maze_tiles), Some(2));
}

#[test]
fn test_missing_scenery_is_skipped_and_flagged() {
    let mut td = station_loop();
    td.scenery_elements.push(TrackDesignSceneryElement {
        scenery_object: ObjectEntryDescriptor::new(ObjectType::SmallScenery, "NOPE"),
        x: 1,
        y: 1,
        ..Default::default()
    });
    let mut park = owned_park();
    assert!(scenery_unavailable(&td, &park.objects));

    let ride = park.rides.create(RideType::LOOPING_ROLLER_COASTER);
    let (state, result) = place_virtual(&mut park.ctx(), &td, TrackPlaceOperation::PlaceQuery, true, ride, origin(0));
    assert!(result.is_ok(), "got: {result}");
    assert!(state.scenery_unavailable);
    assert!(state.has_scenery);
}

#[test]
fn test_footpath_falls_back_to_first_surface() {
    let mut td = station_loop();
    td.scenery_elements.push(TrackDesignSceneryElement {
        scenery_object: ObjectEntryDescriptor::new(ObjectType::Paths, "CRAZY"),
        x: 0,
        y: 2,
        flags: 0x01,
        ..Default::default()
    });
    let mut park = owned_park();
    let tarmac = park.objects.register(
        ObjectEntryDescriptor::new(ObjectType::Paths, "TARMAC"),
        "rct2.footpath.tarmac",
        ObjectKind::Footpath { price: 12 },
    );
    assert!(!scenery_unavailable(&td, &park.objects));

    let ride = park.rides.create(RideType::LOOPING_ROLLER_COASTER);
    let (state, result) = place_virtual(&mut park.ctx(), &td, TrackPlaceOperation::Place, true, ride, origin(0));
    assert!(result.is_ok(), "got: {result}");
    assert!(!state.scenery_unavailable);
    let path = park
        .map
        .footpath_at(CoordsXYZ::new(256, 320, Z))
        .and_then(|e| e.as_path())
        .cloned()
        .expect("footpath placed");
    assert_eq!(path.surface, tarmac);
}

#[test]
fn test_design_action_applies_settings_and_charges() {
    let mut td = station_loop_with_entrance();
    td.operation.num_circuits = 0;
    td.operation.lift_hill_speed = 7;
    td.operation.min_waiting_time = 20;
    let mut park = owned_park();

    let action = TrackDesignAction::new(td, origin(0)).with_flags(ActionFlags::APPLY);
    let result = run_nested(&action, &mut park.ctx());
    assert!(result.is_ok(), "got: {result}");
    let ActionPayload::Ride { ride } = result.payload else {
        panic!("expected a ride payload, got: {:?}", result.payload);
    };
    let built = park.rides.get(ride).expect("ride created");
    assert_eq!(built.name, "Test Coaster");
    assert_eq!(built.num_circuits, 1);
    assert_eq!(built.lift_hill_speed, 7);
    assert_eq!(built.min_waiting_time, 20);
    assert!(built.has_lifecycle_flag(LIFECYCLE_NOT_CUSTOM_DESIGN));
    assert!(built.stations[0].entrance.is_some());
    assert_eq!(park.settings.cash, DEFAULT_PARK_CASH - result.cost);
}

#[test]
fn test_design_action_query_leaves_park_untouched() {
    let mut park = owned_park();
    let before = park.map.element_count();
    let action = TrackDesignAction::new(station_loop(), origin(0));
    let result = action.query(&park.ctx());
    assert!(result.is_ok(), "got: {result}");
    assert_eq!(park.map.element_count(), before);
    assert!(park.rides.is_empty());
}

#[test]
fn test_design_action_live_query_matches_scratch_query() {
    let mut park = owned_park();
    let before = park.map.element_count();
    let action = TrackDesignAction::new(station_loop_with_entrance(), origin(0));
    let scratch = action.query(&park.ctx());

    let mut ctx = park.ctx();
    ctx.placement.current_direction = 2;
    let live = run_nested(&action, &mut ctx);
    assert_eq!(ctx.placement.current_direction, 2);
    assert_eq!(ctx.placement.current_ride, None);
    assert_eq!(live, scratch, "got: {live}");
    assert!(live.is_ok(), "got: {live}");

    assert_eq!(park.map.element_count(), before);
    assert!(park.rides.is_empty());
    assert_eq!(park.settings.cash, DEFAULT_PARK_CASH);
}

#[test]
fn test_invalid_ride_type_is_rejected() {
    let mut td = station_loop();
    td.track_and_vehicle.ride_type = RideType(250);
    let mut park = owned_park();
    let result = place_track_design(&mut park.ctx(), &td, origin(0), ActionFlags::APPLY);
    assert_eq!(result.status, ActionStatus::InvalidParameters);
    assert_eq!(result.detail, ActionMessage::InvalidRideType);
    assert!(park.rides.is_empty());
}

#[test]
fn test_space_required_of_station_loop() {
    assert_eq!(space_required(&station_loop()), TileCoordsXY::new(5, 4));
    assert_eq!(space_required(&coaster(&[TrackElemType::FLAT])), TileCoordsXY::new(1, 1));
}

#[test]
fn test_preview_builds_and_records_cost() {
    let mut td = station_loop();
    let objects = crate::objects::ObjectRepository::default();
    let preview = place_preview(&mut td, &objects).expect("design fits the preview map");
    assert!(preview.cost > 0);
    assert_eq!(td.game_state.cost, preview.cost);
    assert!(td.game_state.has_flag(TRACK_DESIGN_FLAG_VEHICLE_UNAVAILABLE));
    let built = preview
        .park
        .map
        .iter_tiles()
        .flat_map(|(_, tile)| tile.elements.iter())
        .filter(|e| e.as_track().is_some_and(|t| t.ride == preview.ride))
        .count();
    assert_eq!(built, 18);
}

#[test]
fn test_random_designs_never_leave_partial_rides() {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    const PIECES: [TrackElemType; 10] = [
        TrackElemType::FLAT,
        TrackElemType::END_STATION,
        TrackElemType::FLAT_TO_UP_25,
        TrackElemType::UP_25,
        TrackElemType::UP_25_TO_FLAT,
        TrackElemType::LEFT_QUARTER_TURN_3_TILES,
        TrackElemType::RIGHT_QUARTER_TURN_5_TILES,
        TrackElemType::BRAKES,
        TrackElemType::MAZE,
        TrackElemType(0xFFFF),
    ];

    let mut rng = ChaCha8Rng::seed_from_u64(0x7D6);
    for _ in 0..200 {
        let len = rng.gen_range(1..12);
        let pieces: Vec<TrackElemType> = (0..len).map(|_| PIECES[rng.gen_range(0..PIECES.len())]).collect();
        let td = coaster(&pieces);
        let mut park = owned_park();
        let before = park.map.element_count();
        let result = place_track_design(&mut park.ctx(), &td, origin(rng.gen_range(0..4)), ActionFlags::APPLY);
        if !result.is_ok() {
            assert_eq!(park.map.element_count(), before, "failed placement left elements: {pieces:?}");
            assert!(park.rides.is_empty(), "failed placement left a ride: {pieces:?}");
        }
    }
}
