//! Construction clearance checks against the existing tile stack.

use crate::coords::CoordsXY;
use crate::objects::{ObjectKind, ObjectRepository};

use super::{ElementClass, TileElementKind, TileMap};

pub const GROUND_ABOVE: u8 = 1 << 0;
pub const GROUND_UNDERGROUND: u8 = 1 << 1;
pub const GROUND_UNDERWATER: u8 = 1 << 2;

/// The vertical span a new element wants to occupy on one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearanceRange {
    pub loc: CoordsXY,
    pub base_z: i32,
    pub clearance_z: i32,
}

impl ClearanceRange {
    pub fn new(loc: CoordsXY, base_z: i32, clearance_z: i32) -> Self {
        Self {
            loc,
            base_z,
            clearance_z,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearanceOutcome {
    /// `GROUND_*` bits describing where the range sits relative to terrain.
    pub ground_flags: u8,
    /// Cost of clearing removable scenery out of the way.
    pub cost: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Obstruction {
    OffMap,
    Terrain,
    Water,
    Element(ElementClass),
}

/// Check that nothing on the tile intersects `range` within the `quarter`
/// quadrants. Removable scenery (trees and shrubs) does not block; its removal
/// price is returned in the outcome instead and [`clear_removable_scenery`]
/// takes it away once the caller commits.
pub fn can_construct_with_clear_at(
    map: &TileMap,
    objects: &ObjectRepository,
    range: ClearanceRange,
    quarter: u8,
    ignore_obstructions: bool,
) -> Result<ClearanceOutcome, Obstruction> {
    if !map.is_location_valid(range.loc) {
        return Err(Obstruction::OffMap);
    }
    let mut outcome = ClearanceOutcome {
        ground_flags: GROUND_ABOVE,
        cost: 0,
    };
    for element in map.elements_at(range.loc) {
        match &element.kind {
            TileElementKind::Surface(surface) => {
                let water = surface.water_height;
                if water > 0 && water > range.base_z && element.base_z < range.clearance_z {
                    outcome.ground_flags |= GROUND_UNDERWATER;
                    if water < range.clearance_z && !ignore_obstructions {
                        return Err(Obstruction::Water);
                    }
                }
                if element.base_z >= range.clearance_z {
                    outcome.ground_flags |= GROUND_UNDERGROUND;
                    outcome.ground_flags &= !GROUND_ABOVE;
                } else if surface.highest_point(element.base_z) > range.base_z
                    && !ignore_obstructions
                {
                    return Err(Obstruction::Terrain);
                }
            }
            kind => {
                let overlaps = element.base_z < range.clearance_z
                    && element.clearance_z > range.base_z
                    && element.occupied_quadrants & quarter != 0;
                if !overlaps || ignore_obstructions {
                    continue;
                }
                match removal_price(objects, kind) {
                    Some(price) => outcome.cost += price,
                    None => return Err(Obstruction::Element(kind.class())),
                }
            }
        }
    }
    Ok(outcome)
}

fn removal_price(objects: &ObjectRepository, kind: &TileElementKind) -> Option<i64> {
    let TileElementKind::SmallScenery(scenery) = kind else {
        return None;
    };
    match objects.get(scenery.object).map(|o| &o.kind) {
        Some(ObjectKind::SmallScenery(desc)) if desc.removable => Some(desc.removal_price),
        _ => None,
    }
}

/// Remove the removable scenery that [`can_construct_with_clear_at`] priced in.
pub fn clear_removable_scenery(
    map: &mut TileMap,
    objects: &ObjectRepository,
    range: ClearanceRange,
    quarter: u8,
) {
    map.remove_where(range.loc, |e| {
        e.base_z < range.clearance_z
            && e.clearance_z > range.base_z
            && e.occupied_quadrants & quarter != 0
            && removal_price(objects, &e.kind).is_some()
    });
}
