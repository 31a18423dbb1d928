use super::*;
use crate::context::ParkState;
use crate::coords::CoordsXY;
use crate::game_actions::{ActionFlags, ActionPayload};
use crate::objects::{
    LargeSceneryDesc, LargeSceneryTile, ObjectEntryDescriptor, ObjectKind, ObjectType,
    SmallSceneryDesc, SMALL_SCENERY_FULL_TILE,
};
use crate::ride::{RideRatings, RideType, Station, LIFECYCLE_TESTED};
use crate::tile_map::{
    EntranceElement, LargeSceneryElement, SmallSceneryElement, TileElement, TileElementKind,
    TrackElement,
};
use crate::track_data::{TrackCursor, TrackElemType};
use crate::track_design::placement::place_track_design;

const Z: i32 = 112;

fn owned_park() -> ParkState {
    let mut park = ParkState::with_map(TileMap::new(32, 32));
    park.map.set_all_owned(true);
    park
}

fn station_loop_with_entrance() -> TrackDesign {
    let mut td = TrackDesign::default();
    td.name = "Loop".into();
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

fn mark_tested(park: &mut ParkState, ride: RideId) {
    let built = park.rides.get_mut(ride).expect("ride exists");
    built.set_lifecycle_flag(LIFECYCLE_TESTED, true);
    built.ratings = Some(RideRatings {
        excitement: 650,
        intensity: 540,
        nausea: 320,
    });
}

/// Build `td` at tile (8, 8) facing `direction` and mark the ride tested.
fn build(park: &mut ParkState, td: &TrackDesign, direction: Direction) -> RideId {
    let origin = CoordsXYZD::new(256, 256, Z, direction);
    let result = place_track_design(&mut park.ctx(), td, origin, ActionFlags::APPLY);
    assert!(result.is_ok(), "got: {result}");
    let ActionPayload::Ride { ride } = result.payload else {
        panic!("expected a ride payload, got: {:?}", result.payload);
    };
    mark_tested(park, ride);
    ride
}

fn capture(park: &ParkState, ride: RideId) -> Result<TrackDesign, CaptureError> {
    create_track_design(&park.map, &park.rides, &park.objects, ride, &ScenerySelection::default())
}

fn piece_types(td: &TrackDesign) -> Vec<TrackElemType> {
    td.track_elements.iter().map(|e| e.track_type).collect()
}

#[test]
fn test_capture_recovers_placed_design() {
    let design = station_loop_with_entrance();
    let mut park = owned_park();
    let ride = build(&mut park, &design, 0);

    let captured = capture(&park, ride).expect("closed circuit captures");
    assert_eq!(piece_types(&captured), piece_types(&design));
    assert_eq!(captured.entrance_elements, design.entrance_elements);
    assert_eq!(captured.name, "Loop");
    assert_eq!(captured.statistics.ratings.excitement, 650);
    assert_eq!(captured.statistics.space_required, TileCoordsXY::new(5, 4));
}

#[test]
fn test_capture_undoes_placement_rotation() {
    let design = station_loop_with_entrance();
    for direction in 1..4 {
        let mut park = owned_park();
        let ride = build(&mut park, &design, direction);
        let captured = capture(&park, ride).expect("closed circuit captures");
        assert_eq!(piece_types(&captured), piece_types(&design), "direction {direction}");
        assert_eq!(
            captured.entrance_elements, design.entrance_elements,
            "direction {direction}"
        );
    }
}

#[test]
fn test_untested_ride_is_refused() {
    let mut park = owned_park();
    let ride = build(&mut park, &station_loop_with_entrance(), 0);
    if let Some(built) = park.rides.get_mut(ride) {
        built.set_lifecycle_flag(LIFECYCLE_TESTED, false);
    }
    let err = capture(&park, ride).unwrap_err();
    assert_eq!(err, CaptureError::NotTested);
    assert_eq!(err.category(), CaptureErrorCategory::RideNotTested);
}

#[test]
fn test_open_track_is_refused() {
    let mut td = station_loop_with_entrance();
    td.track_elements.truncate(3);
    td.entrance_elements.clear();
    let mut park = owned_park();
    let ride = build(&mut park, &td, 0);

    let err = capture(&park, ride).unwrap_err();
    assert_eq!(err, CaptureError::TrackNotClosed);
    assert_eq!(err.category(), CaptureErrorCategory::TrackTooLargeOrTooMuchScenery);
}

#[test]
fn test_unknown_ride_is_refused() {
    let park = owned_park();
    assert_eq!(capture(&park, RideId(42)).unwrap_err(), CaptureError::RideNotFound);
}

#[test]
fn test_stale_entrance_is_refused() {
    let mut park = owned_park();
    let ride = build(&mut park, &station_loop_with_entrance(), 0);
    park.map
        .remove_where(CoordsXY::new(256, 288), |e| e.as_entrance().is_some());
    assert_eq!(capture(&park, ride).unwrap_err(), CaptureError::MissingEntranceOrExit);
}

// ---------------------------------------------------------------------------
// Mazes
// ---------------------------------------------------------------------------

/// A maze of `cells` hedge tiles laid row by row from tile (0, 0), 50 to a
/// row, with its entrance and exit on the top row past the hedges.
fn manual_maze(cells: usize) -> (ParkState, RideId) {
    let mut park = ParkState::with_map(TileMap::new(64, 64));
    let ride = park.rides.create(RideType::MAZE);
    for i in 0..cells as i32 {
        let loc = CoordsXY::new((i % 50) * 32, (i / 50) * 32);
        let mut track = TrackElement::new(TrackElemType::MAZE, 0, ride, RideType::MAZE);
        track.maze_entry = 0x0F0F;
        park.map.insert(
            loc,
            TileElement::new(Z, Z + 32, 0b1111, TileElementKind::Track(track)),
        );
    }
    for (x, is_exit) in [(60, false), (61, true)] {
        let loc = CoordsXY::new(x * 32, 0);
        park.map.insert(
            loc,
            TileElement::new(
                Z,
                Z + 48,
                0b1111,
                TileElementKind::Entrance(EntranceElement {
                    direction: 2,
                    is_exit,
                    ride,
                    station_index: 0,
                }),
            ),
        );
    }
    let built = park.rides.get_mut(ride).expect("ride exists");
    built.stations[0] = Station {
        start: Some(CoordsXYZ::new(0, 0, Z)),
        length: 0,
        entrance: Some(CoordsXYZD::new(60 * 32, 0, Z, 2)),
        exit: Some(CoordsXYZD::new(61 * 32, 0, Z, 2)),
    };
    built.maze_tiles = cells as u16;
    mark_tested(&mut park, ride);
    (park, ride)
}

#[test]
fn test_maze_capture_collects_every_cell() {
    let (park, ride) = manual_maze(3);
    let captured = capture(&park, ride).expect("maze captures");
    assert!(captured.track_elements.is_empty());
    let cells: Vec<_> = captured.maze_elements.iter().map(|m| m.location).collect();
    assert_eq!(
        cells,
        vec![TileCoordsXY::new(0, 0), TileCoordsXY::new(1, 0), TileCoordsXY::new(2, 0)]
    );
    assert!(captured.maze_elements.iter().all(|m| m.maze_entry == 0x0F0F));
    assert_eq!(captured.entrance_elements.len(), 2);
    assert!(!captured.entrance_elements[0].is_exit);
    assert!(captured.entrance_elements[1].is_exit);
    assert_eq!(captured.entrance_elements[1].location, TileCoordsXYZD::new(61, 0, 0, 2));
}

#[test]
fn test_maze_capacity_boundary() {
    let (park, ride) = manual_maze(MAX_MAZE_ELEMENTS);
    let captured = capture(&park, ride).expect("a full maze still fits");
    assert_eq!(captured.maze_elements.len(), MAX_MAZE_ELEMENTS);

    let (park, ride) = manual_maze(MAX_MAZE_ELEMENTS + 1);
    assert_eq!(capture(&park, ride).unwrap_err(), CaptureError::TooManyMazeElements);
}

// ---------------------------------------------------------------------------
// Track capacity
// ---------------------------------------------------------------------------

/// A flat serpentine starting with a station piece: `pairs` back-and-forth
/// rows of `row` pieces, then a return leg around the outside. Rows run
/// toward -x and step toward -y; `stretch` pushes the return column clear of
/// the row ends.
fn serpentine(pairs: usize, row: usize, stretch: usize) -> Vec<TrackElemType> {
    use TrackElemType as T;
    let flats = |n: usize| std::iter::repeat(T::FLAT).take(n);
    let mut pieces = Vec::new();
    for _ in 0..pairs {
        pieces.extend(flats(row));
        pieces.extend([T::LEFT_QUARTER_TURN_3_TILES, T::LEFT_QUARTER_TURN_3_TILES]);
        pieces.extend(flats(row));
        pieces.extend([T::RIGHT_QUARTER_TURN_3_TILES, T::RIGHT_QUARTER_TURN_3_TILES]);
    }
    pieces.extend(flats(row + stretch));
    pieces.push(T::RIGHT_QUARTER_TURN_3_TILES);
    pieces.extend(flats(6 * pairs));
    pieces.push(T::RIGHT_QUARTER_TURN_3_TILES);
    pieces.extend(flats(row + stretch));
    pieces.push(T::RIGHT_QUARTER_TURN_3_TILES);
    pieces.push(T::RIGHT_QUARTER_TURN_3_TILES);
    pieces[0] = T::END_STATION;
    pieces
}

/// Lay `pieces` end to end from tile (140, 220) heading 0 on a 256x256 map,
/// with the first piece as the station start. Returns the cursor after the
/// last piece.
fn manual_circuit(pieces: &[TrackElemType]) -> (ParkState, RideId, TrackCursor) {
    let mut park = ParkState::with_map(TileMap::new(256, 256));
    let ride = park.rides.create(RideType::LOOPING_ROLLER_COASTER);
    let start = CoordsXY::new(140 * 32, 220 * 32);
    let mut cursor = TrackCursor {
        pos: start,
        z: Z,
        rotation: 0,
    };
    for &piece in pieces {
        let ted = piece.descriptor().expect("known piece");
        let (pos, base) = cursor.piece_origin(&ted.coordinates);
        let rotation = cursor.rotation & 3;
        for block in ted.blocks {
            let mut track = TrackElement::new(piece, rotation, ride, RideType::LOOPING_ROLLER_COASTER);
            track.sequence = block.index;
            let base_z = base + block.z;
            park.map.insert(
                pos + block.offset().rotate(rotation),
                TileElement::new(base_z, base_z + 32, 0b1111, TileElementKind::Track(track)),
            );
        }
        cursor.advance(&ted.coordinates);
    }
    let built = park.rides.get_mut(ride).expect("ride exists");
    built.stations[0].start = Some(start.with_z(Z));
    mark_tested(&mut park, ride);
    (park, ride, cursor)
}

#[test]
fn test_track_capacity_boundary() {
    // 32 * (2 * 119 + 4) + 2 * 126 + 192 + 4 pieces.
    let pieces = serpentine(32, 119, 7);
    assert_eq!(pieces.len(), TD6_MAX_TRACK_ELEMENTS);
    let (park, ride, end) = manual_circuit(&pieces);
    assert_eq!(end.pos, CoordsXY::new(140 * 32, 220 * 32), "circuit should close");
    assert_eq!(end.rotation, 0);

    let captured = capture(&park, ride).expect("a full-size circuit still fits");
    assert_eq!(captured.track_elements.len(), TD6_MAX_TRACK_ELEMENTS);
    assert_eq!(captured.track_elements[0].track_type, TrackElemType::END_STATION);

    // One more flat on the return leg: the walk passes the limit before it
    // ever learns the circuit no longer closes.
    let mut longer = pieces;
    let last_leg = longer.len() - 3;
    longer.insert(last_leg, TrackElemType::FLAT);
    assert_eq!(longer.len(), TD6_MAX_TRACK_ELEMENTS + 1);
    let (park, ride, _) = manual_circuit(&longer);
    let err = capture(&park, ride).unwrap_err();
    assert_eq!(err, CaptureError::TooManyTrackElements);
    assert_eq!(err.to_string(), "More than 8192 track pieces");
}

#[test]
fn test_maze_without_exit_is_refused() {
    let (mut park, ride) = manual_maze(4);
    if let Some(built) = park.rides.get_mut(ride) {
        built.stations[0].exit = None;
    }
    assert_eq!(capture(&park, ride).unwrap_err(), CaptureError::MissingEntranceOrExit);
}

// ---------------------------------------------------------------------------
// Scenery
// ---------------------------------------------------------------------------

fn register_tree(park: &mut ParkState) -> crate::objects::ObjectIndex {
    park.objects.register(
        ObjectEntryDescriptor::new(ObjectType::SmallScenery, "TL0"),
        "rct2.scenery_small.tl0",
        ObjectKind::SmallScenery(SmallSceneryDesc {
            flags: SMALL_SCENERY_FULL_TILE,
            height: 64,
            price: 5,
            removable: false,
            removal_price: 0,
        }),
    )
}

fn tree(object: crate::objects::ObjectIndex, direction: u8) -> TileElement {
    TileElement::new(
        Z,
        Z + 64,
        0b1111,
        TileElementKind::SmallScenery(SmallSceneryElement {
            object,
            direction,
            quadrant: 0,
            colours: [4, 5, 6],
        }),
    )
}

#[test]
fn test_nearby_scenery_is_selected_and_captured() {
    let design = station_loop_with_entrance();
    let mut park = owned_park();
    let ride = build(&mut park, &design, 0);
    let object = register_tree(&mut park);
    park.map.insert(CoordsXY::new(352, 288), tree(object, 1));
    park.map.insert(CoordsXY::new(960, 960), tree(object, 0));

    let mut selection = ScenerySelection::default();
    let added = select_nearby_scenery(&mut selection, &park.map, &park.objects, ride);
    assert_eq!(added, 1);
    assert_eq!(select_nearby_scenery(&mut selection, &park.map, &park.objects, ride), 0);

    let captured =
        create_track_design(&park.map, &park.rides, &park.objects, ride, &selection).expect("captures");
    assert_eq!(captured.scenery_elements.len(), 1);
    let item = &captured.scenery_elements[0];
    assert_eq!((item.x, item.y, item.z), (3, 1, 0));
    assert_eq!(item.direction(), 1);
    assert_eq!(item.colours(), [4, 5, 6]);
    assert_eq!(item.scenery_object.name, "TL0");
}

#[test]
fn test_captured_scenery_is_turned_back() {
    let design = station_loop_with_entrance();
    let mut park = owned_park();
    let ride = build(&mut park, &design, 1);
    let object = register_tree(&mut park);
    // Design offset (3, 1) turned once lands at world offset (1, -3).
    park.map.insert(CoordsXY::new(288, 160), tree(object, 2));

    let mut selection = ScenerySelection::default();
    select_nearby_scenery(&mut selection, &park.map, &park.objects, ride);
    let captured =
        create_track_design(&park.map, &park.rides, &park.objects, ride, &selection).expect("captures");
    let item = &captured.scenery_elements[0];
    assert_eq!((item.x, item.y), (3, 1));
    assert_eq!(item.direction(), 1);
}

#[test]
fn test_entrances_do_not_seed_selection() {
    let mut park = owned_park();
    let ride = park.rides.create(RideType::LOOPING_ROLLER_COASTER);
    let object = register_tree(&mut park);
    park.map.insert(
        CoordsXY::new(256, 256),
        TileElement::new(
            Z,
            Z + 48,
            0b1111,
            TileElementKind::Entrance(EntranceElement {
                direction: 0,
                is_exit: false,
                ride,
                station_index: 0,
            }),
        ),
    );
    park.map.insert(CoordsXY::new(288, 256), tree(object, 0));

    let mut selection = ScenerySelection::default();
    assert_eq!(select_nearby_scenery(&mut selection, &park.map, &park.objects, ride), 0);
    assert!(selection.is_empty());
}

#[test]
fn test_large_scenery_selects_whole_item() {
    let mut park = owned_park();
    let object = park.objects.register(
        ObjectEntryDescriptor::new(ObjectType::LargeScenery, "BIGROCK"),
        "rct2.scenery_large.bigrock",
        ObjectKind::LargeScenery(LargeSceneryDesc {
            tiles: vec![
                LargeSceneryTile { x: 0, y: 0, z: 0, clearance: 32 },
                LargeSceneryTile { x: 32, y: 0, z: 0, clearance: 32 },
            ],
            price: 40,
        }),
    );
    for (sequence, x) in [(0u8, 320), (1u8, 352)] {
        park.map.insert(
            CoordsXY::new(x, 320),
            TileElement::new(
                Z,
                Z + 32,
                0b1111,
                TileElementKind::LargeScenery(LargeSceneryElement {
                    object,
                    direction: 0,
                    sequence,
                    colours: [1, 2, 0],
                }),
            ),
        );
    }
    let second = park.map.elements_at(CoordsXY::new(352, 320))[1].clone();
    let first = park.map.elements_at(CoordsXY::new(320, 320))[1].clone();

    let mut selection = ScenerySelection::default();
    assert!(selection.toggle(&park.map, &park.objects, CoordsXY::new(352, 320), &second, true));
    assert_eq!(selection.len(), 1);
    assert_eq!(selection.element_count(), 2);
    assert!(selection.contains(CoordsXY::new(320, 320), &first));
    assert!(!selection.add(&park.map, &park.objects, CoordsXY::new(320, 320), &first));

    let entries = selection.to_design_elements(CoordsXYZ::new(256, 256, Z));
    assert_eq!((entries[0].x, entries[0].y, entries[0].z), (2, 2, 0));

    assert!(selection.toggle(&park.map, &park.objects, CoordsXY::new(320, 320), &first, false));
    assert!(selection.is_empty());
}

#[test]
fn test_selection_respects_element_cap() {
    let mut park = ParkState::with_map(TileMap::new(64, 64));
    let object = register_tree(&mut park);
    let mut selection = ScenerySelection::default();
    let mut added = 0;
    for i in 0..(MAX_SELECTED_SCENERY_ELEMENTS as i32 + 10) {
        let loc = CoordsXY::new((i % 64) * 32, (i / 64) * 32);
        let element = tree(object, 0);
        park.map.insert(loc, element.clone());
        if selection.add(&park.map, &park.objects, loc, &element) {
            added += 1;
        }
    }
    assert_eq!(added, MAX_SELECTED_SCENERY_ELEMENTS);
}
