use super::*;
use crate::objects::{
    ObjectEntryDescriptor, ObjectKind, ObjectRepository, ObjectType, SmallSceneryDesc,
    SMALL_SCENERY_FULL_TILE,
};
use crate::ride::RideType;
use crate::track_data::TrackElemType;

fn track(base_z: i32, ride: u16) -> TileElement {
    TileElement::new(
        base_z,
        base_z + 16,
        QUARTER_TILE_FULL,
        TileElementKind::Track(TrackElement::new(
            TrackElemType::FLAT,
            0,
            RideId(ride),
            RideType::LOOPING_ROLLER_COASTER,
        )),
    )
}

#[test]
fn test_new_map_is_flat_and_unowned() {
    let map = TileMap::new(8, 4);
    assert_eq!(map.element_count(), 32);
    let (element, surface) = map
        .surface_at(CoordsXY::new(32, 32))
        .expect("surface present");
    assert_eq!(element.base_z, DEFAULT_SURFACE_HEIGHT);
    assert_eq!(surface.slope, SLOPE_FLAT);
    assert!(!map.is_location_owned(CoordsXYZ::new(32, 32, 0)));
    assert!(map.is_location_valid(CoordsXY::new(7 * 32, 3 * 32)));
    assert!(!map.is_location_valid(CoordsXY::new(8 * 32, 0)));
    assert!(!map.is_location_valid(CoordsXY::new(-1, 0)));
}

#[test]
fn test_insert_keeps_height_order() {
    let mut map = TileMap::new(4, 4);
    let loc = CoordsXY::new(32, 32);
    map.insert(loc, track(160, 0)).expect("insert high");
    map.insert(loc, track(128, 0)).expect("insert low");
    let heights: Vec<i32> = map.elements_at(loc).iter().map(|e| e.base_z).collect();
    assert_eq!(heights, vec![DEFAULT_SURFACE_HEIGHT, 128, 160]);
    assert!(map.track_at(CoordsXYZ::new(32, 32, 128), RideId(0)).is_some());
    assert!(map.track_at(CoordsXYZ::new(32, 32, 128), RideId(1)).is_none());
}

#[test]
fn test_insert_respects_element_limit() {
    let mut map = TileMap::new(2, 2);
    map.set_max_elements(5);
    assert!(map.insert(CoordsXY::new(0, 0), track(128, 0)).is_some());
    assert!(map.insert(CoordsXY::new(0, 0), track(144, 0)).is_none());
    assert_eq!(map.element_count(), 5);
}

#[test]
fn test_remove_where_never_removes_surface() {
    let mut map = TileMap::new(2, 2);
    let loc = CoordsXY::new(0, 0);
    map.insert(loc, track(128, 0));
    let removed = map.remove_where(loc, |_| true);
    assert_eq!(removed, 1);
    assert_eq!(map.elements_at(loc).len(), 1);
    assert!(map.surface_at(loc).is_some());
    assert_eq!(map.element_count(), 4);
}

#[test]
fn test_off_map_lookups_are_empty() {
    let map = TileMap::new(2, 2);
    assert!(map.elements_at(CoordsXY::new(-32, 0)).is_empty());
    assert!(map.surface_at(CoordsXY::new(0, 640)).is_none());
}

#[test]
fn test_iter_tiles_is_row_major() {
    let map = TileMap::new(3, 2);
    let order: Vec<(i32, i32)> = map.iter_tiles().map(|(t, _)| (t.x, t.y)).collect();
    assert_eq!(order, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
}

#[test]
fn test_clearance_blocks_on_overlap() {
    let mut map = TileMap::new(4, 4);
    let objects = ObjectRepository::default();
    let loc = CoordsXY::new(32, 32);
    map.insert(loc, track(128, 0));

    let clash = ClearanceRange::new(loc, 136, 152);
    let err = can_construct_with_clear_at(&map, &objects, clash, QUARTER_TILE_FULL, false)
        .expect_err("overlapping track must block");
    assert_eq!(err, Obstruction::Element(ElementClass::Track));

    let above = ClearanceRange::new(loc, 144, 160);
    let ok = can_construct_with_clear_at(&map, &objects, above, QUARTER_TILE_FULL, false)
        .expect("stacked track is clear");
    assert_eq!(ok.ground_flags, GROUND_ABOVE);
}

#[test]
fn test_clearance_reports_underground_and_terrain() {
    let map = TileMap::new(4, 4);
    let objects = ObjectRepository::default();
    let loc = CoordsXY::new(0, 0);

    let tunnel = ClearanceRange::new(loc, 48, 96);
    let out = can_construct_with_clear_at(&map, &objects, tunnel, QUARTER_TILE_FULL, false)
        .expect("tunnel is allowed");
    assert_eq!(out.ground_flags & GROUND_UNDERGROUND, GROUND_UNDERGROUND);
    assert_eq!(out.ground_flags & GROUND_ABOVE, 0);

    let half_buried = ClearanceRange::new(loc, 104, 136);
    assert_eq!(
        can_construct_with_clear_at(&map, &objects, half_buried, QUARTER_TILE_FULL, false),
        Err(Obstruction::Terrain)
    );
}

#[test]
fn test_clearance_water() {
    let mut map = TileMap::new(4, 4);
    let objects = ObjectRepository::default();
    let loc = CoordsXY::new(0, 0);
    map.set_surface(loc, 96, SLOPE_FLAT, 128);

    let on_water = ClearanceRange::new(loc, 128, 144);
    let out = can_construct_with_clear_at(&map, &objects, on_water, QUARTER_TILE_FULL, false)
        .expect("sitting on the water is fine");
    assert_eq!(out.ground_flags & GROUND_UNDERWATER, 0);

    let submerged = ClearanceRange::new(loc, 112, 136);
    assert_eq!(
        can_construct_with_clear_at(&map, &objects, submerged, QUARTER_TILE_FULL, false),
        Err(Obstruction::Water)
    );
}

#[test]
fn test_removable_scenery_is_priced_then_cleared() {
    let mut map = TileMap::new(4, 4);
    let mut objects = ObjectRepository::default();
    let tree = objects.register(
        ObjectEntryDescriptor::new(ObjectType::SmallScenery, "TL0"),
        "rct2.scenery_small.tl0",
        ObjectKind::SmallScenery(SmallSceneryDesc {
            flags: SMALL_SCENERY_FULL_TILE,
            height: 64,
            price: 20,
            removable: true,
            removal_price: 7,
        }),
    );
    let loc = CoordsXY::new(64, 64);
    map.insert(
        loc,
        TileElement::new(
            DEFAULT_SURFACE_HEIGHT,
            DEFAULT_SURFACE_HEIGHT + 64,
            QUARTER_TILE_FULL,
            TileElementKind::SmallScenery(SmallSceneryElement {
                object: tree,
                direction: 0,
                quadrant: 0,
                colours: [0; 3],
            }),
        ),
    );

    let range = ClearanceRange::new(loc, DEFAULT_SURFACE_HEIGHT, DEFAULT_SURFACE_HEIGHT + 16);
    let out = can_construct_with_clear_at(&map, &objects, range, QUARTER_TILE_FULL, false)
        .expect("trees do not block");
    assert_eq!(out.cost, 7);

    clear_removable_scenery(&mut map, &objects, range, QUARTER_TILE_FULL);
    assert_eq!(map.elements_at(loc).len(), 1);
}
