//! Describing world scenery elements as design scenery entries.

use crate::config::COORDS_Z_STEP;
use crate::coords::{CoordsXY, CoordsXYZ};
use crate::objects::{ObjectKind, ObjectRepository};
use crate::tile_map::{ElementClass, TileElement, TileElementKind, TileMap};
use crate::track_design::model::{
    TrackDesignSceneryElement, SCENERY_PATH_EDGES_MASK, SCENERY_PATH_QUEUE, SCENERY_PATH_SLOPED,
    SCENERY_PATH_SLOPE_DIRECTION_SHIFT,
};

/// Identifies one scenery element on the map between selection calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementKey {
    pub loc: CoordsXYZ,
    pub class: ElementClass,
    /// Wall direction, small scenery quadrant or large scenery sequence.
    pub slot: u8,
}

impl ElementKey {
    pub fn of(loc: CoordsXY, element: &TileElement) -> Option<Self> {
        let slot = match &element.kind {
            TileElementKind::Path(_) => 0,
            TileElementKind::SmallScenery(s) => s.quadrant,
            TileElementKind::LargeScenery(s) => s.sequence,
            TileElementKind::Wall(w) => w.direction,
            _ => return None,
        };
        Some(Self {
            loc: loc.to_tile_start().with_z(element.base_z),
            class: element.kind.class(),
            slot,
        })
    }
}

/// A selected item: the map elements it covers and its entry in world tile
/// coordinates (x, y in tiles, z in z steps).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedScenery {
    pub keys: Vec<ElementKey>,
    pub scenery: TrackDesignSceneryElement,
}

fn world_entry(
    objects: &ObjectRepository,
    object: crate::objects::ObjectIndex,
    loc: CoordsXYZ,
    flags: u8,
    colours: [u8; 3],
) -> Option<TrackDesignSceneryElement> {
    let entry = objects.get(object)?.entry.clone();
    let tile = loc.xy().to_tile();
    Some(TrackDesignSceneryElement {
        scenery_object: entry,
        x: tile.x,
        y: tile.y,
        z: loc.z / COORDS_Z_STEP,
        flags,
        primary_colour: colours[0],
        secondary_colour: colours[1],
        tertiary_colour: colours[2],
    })
}

/// Describe the scenery item `element` at `loc` belongs to. Large scenery
/// expands to every tile of the item that is still on the map.
pub fn describe(
    map: &TileMap,
    objects: &ObjectRepository,
    loc: CoordsXY,
    element: &TileElement,
) -> Option<SelectedScenery> {
    let key = ElementKey::of(loc, element)?;
    let here = loc.to_tile_start().with_z(element.base_z);
    match &element.kind {
        TileElementKind::SmallScenery(s) => {
            let flags = (s.direction & 3) | ((s.quadrant & 3) << 2);
            Some(SelectedScenery {
                keys: vec![key],
                scenery: world_entry(objects, s.object, here, flags, s.colours)?,
            })
        }
        TileElementKind::Wall(w) => Some(SelectedScenery {
            keys: vec![key],
            scenery: world_entry(objects, w.object, here, w.direction & 3, w.colours)?,
        }),
        TileElementKind::Path(p) => {
            let mut flags = p.edges & SCENERY_PATH_EDGES_MASK;
            if p.is_sloped {
                flags |= SCENERY_PATH_SLOPED;
            }
            flags |= (p.slope_direction & 3) << SCENERY_PATH_SLOPE_DIRECTION_SHIFT;
            if p.is_queue {
                flags |= SCENERY_PATH_QUEUE;
            }
            Some(SelectedScenery {
                keys: vec![key],
                scenery: world_entry(objects, p.surface, here, flags, [0; 3])?,
            })
        }
        TileElementKind::LargeScenery(s) => {
            let ObjectKind::LargeScenery(desc) = &objects.get(s.object)?.kind else {
                return None;
            };
            let direction = s.direction & 3;
            let tile = desc.tiles.get(usize::from(s.sequence))?;
            let origin_xy = here.xy() - CoordsXY::new(tile.x, tile.y).rotate(direction);
            let origin_z = here.z - tile.z;

            let mut keys = Vec::new();
            let mut scenery = None;
            for (sequence, part) in desc.tiles.iter().enumerate() {
                let part_loc = origin_xy + CoordsXY::new(part.x, part.y).rotate(direction);
                let part_z = origin_z + part.z;
                let present = map.elements_at(part_loc).iter().any(|e| {
                    e.base_z == part_z
                        && matches!(&e.kind, TileElementKind::LargeScenery(other)
                            if other.object == s.object
                                && other.direction == direction
                                && usize::from(other.sequence) == sequence)
                });
                if !present {
                    continue;
                }
                if sequence == 0 {
                    scenery = world_entry(objects, s.object, part_loc.with_z(part_z), direction, s.colours);
                }
                keys.push(ElementKey {
                    loc: part_loc.to_tile_start().with_z(part_z),
                    class: ElementClass::LargeScenery,
                    slot: sequence as u8,
                });
            }
            Some(SelectedScenery {
                keys,
                scenery: scenery?,
            })
        }
        _ => None,
    }
}
