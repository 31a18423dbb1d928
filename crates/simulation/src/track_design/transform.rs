//! Reflection and rotation of a design in its local frame.

use crate::coords::{direction_reverse, rol16, rol4, CoordsXY, Direction};
use crate::objects::{ObjectKind, ObjectRepository, SMALL_SCENERY_DIAGONAL, SMALL_SCENERY_FULL_TILE};

use super::model::{
    SceneryKind, TrackDesign, TrackDesignSceneryElement, SCENERY_PATH_EDGES_MASK,
    SCENERY_PATH_SLOPE_DIRECTION_SHIFT,
};

/// Where each of the 16 hedge wall bits lands when a maze is reflected.
const MAZE_SEGMENT_MIRROR_MAP: [u8; 16] = [5, 4, 2, 7, 1, 0, 14, 3, 13, 12, 10, 15, 9, 8, 6, 11];

/// Reflect a design across the x axis. Scenery whose object is not loaded
/// is left alone, except footpaths which need no object data.
pub fn mirror(td: &mut TrackDesign, objects: &ObjectRepository) {
    if td.is_maze() {
        for maze in td.maze_elements.iter_mut() {
            maze.location.y = -maze.location.y;
            maze.maze_entry = mirror_maze_entry(maze.maze_entry);
        }
    } else {
        for track in td.track_elements.iter_mut() {
            track.track_type = track.track_type.mirrored();
        }
    }
    for entrance in td.entrance_elements.iter_mut() {
        entrance.location.y = -entrance.location.y;
        if entrance.location.direction & 1 != 0 {
            entrance.location.direction = direction_reverse(entrance.location.direction);
        }
    }
    for scenery in td.scenery_elements.iter_mut() {
        mirror_scenery(scenery, objects);
    }
}

pub fn mirror_maze_entry(entry: u16) -> u16 {
    (0..16)
        .filter(|bit| entry & (1 << bit) != 0)
        .fold(0u16, |out, bit| out | (1 << MAZE_SEGMENT_MIRROR_MAP[bit]))
}

fn mirror_scenery(scenery: &mut TrackDesignSceneryElement, objects: &ObjectRepository) {
    let Some(kind) = scenery.kind() else {
        return;
    };
    let object = objects
        .find(&scenery.scenery_object)
        .and_then(|index| objects.get(index))
        .map(|o| &o.kind);

    match (kind, object) {
        (SceneryKind::Large, Some(ObjectKind::LargeScenery(desc))) => {
            let y1 = desc.tiles.iter().map(|t| t.y).fold(0, i32::min);
            let y2 = desc.tiles.iter().map(|t| t.y).fold(0, i32::max);
            match scenery.flags & 3 {
                0 => scenery.y = (-(scenery.y * 32 + y1) - y2) / 32,
                1 => {
                    scenery.x = (scenery.x * 32 + y2 + y1) / 32;
                    scenery.y = -scenery.y;
                    scenery.flags ^= 1 << 1;
                }
                2 => scenery.y = (-(scenery.y * 32 - y2) + y1) / 32,
                _ => {
                    scenery.x = (scenery.x * 32 - y2 - y1) / 32;
                    scenery.y = -scenery.y;
                    scenery.flags ^= 1 << 1;
                }
            }
        }
        (SceneryKind::Small, Some(ObjectKind::SmallScenery(desc))) => {
            scenery.y = -scenery.y;
            if desc.has_flag(SMALL_SCENERY_DIAGONAL) {
                scenery.flags ^= 1 << 0;
                if !desc.has_flag(SMALL_SCENERY_FULL_TILE) {
                    scenery.flags ^= 1 << 2;
                }
                return;
            }
            if scenery.flags & (1 << 0) != 0 {
                scenery.flags ^= 1 << 1;
            }
            scenery.flags ^= 1 << 2;
        }
        (SceneryKind::Wall, Some(ObjectKind::Wall { .. })) => {
            scenery.y = -scenery.y;
            if scenery.flags & (1 << 0) != 0 {
                scenery.flags ^= 1 << 1;
            }
        }
        (SceneryKind::Footpath, _) => {
            scenery.y = -scenery.y;
            if scenery.flags & (1 << 5) != 0 {
                scenery.flags ^= 1 << 6;
            }
            // Swap the +y and -y edges.
            let swapped = ((scenery.flags & (1 << 3)) >> 2) | ((scenery.flags & (1 << 1)) << 2);
            scenery.flags = (scenery.flags & 0xF5) | swapped;
        }
        _ => {}
    }
}

/// Rotate every element of a design by `direction` quarter turns about the
/// origin. Rotating by `d` then by `4 - d` restores the original.
pub fn rotate(td: &mut TrackDesign, direction: Direction) {
    let d = direction & 3;
    if d == 0 {
        return;
    }
    for maze in td.maze_elements.iter_mut() {
        let p = CoordsXY::new(maze.location.x, maze.location.y).rotate(d);
        maze.location.x = p.x;
        maze.location.y = p.y;
        maze.maze_entry = rol16(maze.maze_entry, u32::from(d) * 4);
    }
    for entrance in td.entrance_elements.iter_mut() {
        let p = CoordsXY::new(entrance.location.x, entrance.location.y).rotate(d);
        entrance.location.x = p.x;
        entrance.location.y = p.y;
        entrance.location.direction = (entrance.location.direction + d) & 3;
    }
    for scenery in td.scenery_elements.iter_mut() {
        let p = CoordsXY::new(scenery.x, scenery.y).rotate(d);
        scenery.x = p.x;
        scenery.y = p.y;
        scenery.flags = rotate_scenery_flags(scenery.kind(), scenery.flags, d);
    }
}

/// Turn the packed scenery flags by `d` quarter turns.
pub fn rotate_scenery_flags(kind: Option<SceneryKind>, flags: u8, d: Direction) -> u8 {
    match kind {
        Some(SceneryKind::Small) => {
            let direction = ((flags & 3) + d) & 3;
            let quadrant = ((flags >> 2) + d) & 3;
            (flags & 0xF0) | direction | (quadrant << 2)
        }
        Some(SceneryKind::Large) | Some(SceneryKind::Wall) => (flags & 0xFC) | (((flags & 3) + d) & 3),
        Some(SceneryKind::Footpath) => {
            let edges = rol4(flags & SCENERY_PATH_EDGES_MASK, d);
            let slope = ((flags >> SCENERY_PATH_SLOPE_DIRECTION_SHIFT) + d) & 3;
            (flags & 0x90) | edges | (slope << SCENERY_PATH_SLOPE_DIRECTION_SHIFT)
        }
        None => flags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{TileCoordsXY, TileCoordsXYZD};
    use crate::objects::{
        LargeSceneryDesc, LargeSceneryTile, ObjectEntryDescriptor, ObjectType, SmallSceneryDesc,
    };
    use crate::ride::RideType;
    use crate::track_data::TrackElemType;
    use crate::track_design::model::{
        TrackDesignEntranceElement, TrackDesignMazeElement, TrackDesignTrackElement,
    };

    fn scenery(object_type: ObjectType, name: &str, x: i32, y: i32, flags: u8) -> TrackDesignSceneryElement {
        TrackDesignSceneryElement {
            scenery_object: ObjectEntryDescriptor::new(object_type, name),
            x,
            y,
            z: 0,
            flags,
            ..Default::default()
        }
    }

    fn objects() -> ObjectRepository {
        let mut repo = ObjectRepository::default();
        repo.register(
            ObjectEntryDescriptor::new(ObjectType::SmallScenery, "TREE"),
            "rct2.scenery_small.tree",
            ObjectKind::SmallScenery(SmallSceneryDesc {
                flags: SMALL_SCENERY_FULL_TILE,
                height: 64,
                price: 10,
                removable: true,
                removal_price: 5,
            }),
        );
        repo.register(
            ObjectEntryDescriptor::new(ObjectType::LargeScenery, "BIG"),
            "rct2.scenery_large.big",
            ObjectKind::LargeScenery(LargeSceneryDesc {
                tiles: vec![
                    LargeSceneryTile { x: 0, y: 0, z: 0, clearance: 32 },
                    LargeSceneryTile { x: 0, y: 32, z: 0, clearance: 32 },
                ],
                price: 100,
            }),
        );
        repo
    }

    #[test]
    fn test_mirror_track_uses_mirror_map_and_flips_entrances() {
        let mut td = TrackDesign::default();
        td.track_and_vehicle.ride_type = RideType::LOOPING_ROLLER_COASTER;
        td.track_elements = vec![
            TrackDesignTrackElement::new(TrackElemType::LEFT_QUARTER_TURN_3_TILES),
            TrackDesignTrackElement::new(TrackElemType::FLAT),
        ];
        td.entrance_elements = vec![TrackDesignEntranceElement {
            location: TileCoordsXYZD::new(1, 2, 0, 1),
            is_exit: false,
        }];
        mirror(&mut td, &ObjectRepository::default());
        assert_eq!(td.track_elements[0].track_type, TrackElemType::RIGHT_QUARTER_TURN_3_TILES);
        assert_eq!(td.track_elements[1].track_type, TrackElemType::FLAT);
        assert_eq!(td.entrance_elements[0].location, TileCoordsXYZD::new(1, -2, 0, 3));
    }

    #[test]
    fn test_mirror_maze_twice_is_identity() {
        for entry in [0x0001u16, 0x8421, 0xFFFF, 0x1234] {
            assert_eq!(mirror_maze_entry(mirror_maze_entry(entry)), entry, "entry {entry:#06x}");
        }
        assert_eq!(mirror_maze_entry(1), 1 << 5);
    }

    #[test]
    fn test_mirror_path_swaps_y_edges() {
        let mut td = TrackDesign::default();
        // Edges towards +y (bit 1) and -x (bit 0), sloped towards direction 1.
        td.scenery_elements = vec![scenery(ObjectType::Paths, "TARMAC", 2, 3, 0b0010_0011 | 0x10)];
        mirror(&mut td, &ObjectRepository::default());
        let path = &td.scenery_elements[0];
        assert_eq!(path.y, -3);
        assert_eq!(path.flags & 0x0F, 0b1001);
        assert_eq!((path.flags >> 5) & 3, 3);
    }

    #[test]
    fn test_mirror_scenery_uses_object_data() {
        let repo = objects();
        let mut td = TrackDesign::default();
        td.scenery_elements = vec![
            scenery(ObjectType::SmallScenery, "TREE", 1, 2, 0b0000_0001),
            scenery(ObjectType::LargeScenery, "BIG", 1, 2, 0),
            scenery(ObjectType::SmallScenery, "MISSING", 1, 2, 0),
        ];
        mirror(&mut td, &repo);
        assert_eq!((td.scenery_elements[0].y, td.scenery_elements[0].flags), (-2, 0b0111));
        // Footprint spans y 0..32, so the reflected origin moves one tile further.
        assert_eq!(td.scenery_elements[1].y, -3);
        assert_eq!(td.scenery_elements[2].y, 2);
    }

    #[test]
    fn test_rotate_then_inverse_restores_design() {
        let mut td = TrackDesign::default();
        td.maze_elements = vec![TrackDesignMazeElement {
            location: TileCoordsXY::new(2, -1),
            maze_entry: 0x1234,
        }];
        td.entrance_elements = vec![TrackDesignEntranceElement {
            location: TileCoordsXYZD::new(-3, 1, 2, 2),
            is_exit: true,
        }];
        td.scenery_elements = vec![
            scenery(ObjectType::SmallScenery, "TREE", 4, 5, 0b1101),
            scenery(ObjectType::Walls, "WALL", -2, 0, 0b0110),
            scenery(ObjectType::Paths, "TARMAC", 1, 1, 0b1011_0101),
        ];
        let original = td.clone();
        for d in 0..4u8 {
            let mut turned = original.clone();
            rotate(&mut turned, d);
            rotate(&mut turned, (4 - d) & 3);
            assert_eq!(turned, original, "direction {d}");
        }
    }

    #[test]
    fn test_rotate_one_quarter_moves_entrance() {
        let mut td = TrackDesign::default();
        td.entrance_elements = vec![TrackDesignEntranceElement {
            location: TileCoordsXYZD::new(1, 0, 0, 0),
            is_exit: false,
        }];
        rotate(&mut td, 1);
        assert_eq!(td.entrance_elements[0].location, TileCoordsXYZD::new(0, -1, 0, 1));
    }
}
