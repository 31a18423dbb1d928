//! Scenery picked to be saved along with a ride.
//!
//! The player toggles individual items, or asks for everything near the ride
//! to be picked up. Items are remembered by map position, so a selection
//! only stays meaningful while the map around the ride is unchanged.

use bevy::prelude::*;

use crate::config::{COORDS_XY_STEP, COORDS_Z_STEP, NEARBY_SCENERY_DISTANCE};
use crate::coords::{CoordsXY, CoordsXYZ, TileCoordsXY};
use crate::objects::ObjectRepository;
use crate::ride::RideId;
use crate::tile_map::{TileElement, TileElementKind, TileMap};
use crate::track_design::model::TrackDesignSceneryElement;

use super::scenery::{describe, ElementKey, SelectedScenery};

/// Map elements a single selection may cover; a large scenery item counts
/// once per tile.
pub const MAX_SELECTED_SCENERY_ELEMENTS: usize = 1500;

#[derive(Resource, Debug, Clone, Default)]
pub struct ScenerySelection {
    items: Vec<SelectedScenery>,
}

impl ScenerySelection {
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Map elements covered by the selection.
    pub fn element_count(&self) -> usize {
        self.items.iter().map(|i| i.keys.len()).sum()
    }

    pub fn contains(&self, loc: CoordsXY, element: &TileElement) -> bool {
        ElementKey::of(loc, element).is_some_and(|key| self.contains_key(&key))
    }

    fn contains_key(&self, key: &ElementKey) -> bool {
        self.items.iter().any(|i| i.keys.contains(key))
    }

    /// Add the item `element` belongs to. Returns false for elements that are
    /// not scenery, are already selected, or would overflow the selection.
    pub fn add(&mut self, map: &TileMap, objects: &ObjectRepository, loc: CoordsXY, element: &TileElement) -> bool {
        if self.contains(loc, element) {
            return false;
        }
        let Some(item) = describe(map, objects, loc, element) else {
            return false;
        };
        if self.element_count() + item.keys.len() > MAX_SELECTED_SCENERY_ELEMENTS {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Drop the item `element` belongs to, with all of its tiles.
    pub fn remove(&mut self, loc: CoordsXY, element: &TileElement) -> bool {
        let Some(key) = ElementKey::of(loc, element) else {
            return false;
        };
        let before = self.items.len();
        self.items.retain(|i| !i.keys.contains(&key));
        self.items.len() != before
    }

    /// Add (`collect`) or remove the item at `loc`.
    pub fn toggle(
        &mut self,
        map: &TileMap,
        objects: &ObjectRepository,
        loc: CoordsXY,
        element: &TileElement,
        collect: bool,
    ) -> bool {
        if collect {
            self.add(map, objects, loc, element)
        } else {
            self.remove(loc, element)
        }
    }

    /// Entries relative to `origin`, still in world orientation.
    pub(super) fn to_design_elements(&self, origin: CoordsXYZ) -> Vec<TrackDesignSceneryElement> {
        let origin_tile = origin.xy().to_tile();
        let origin_z = origin.z / COORDS_Z_STEP;
        self.items
            .iter()
            .map(|item| TrackDesignSceneryElement {
                x: item.scenery.x - origin_tile.x,
                y: item.scenery.y - origin_tile.y,
                z: item.scenery.z - origin_z,
                ..item.scenery.clone()
            })
            .collect()
    }
}

/// Whether scenery around a tile holding `element` belongs with `ride`: the
/// ride's own track and the queues leading into it. Entrances and exits do
/// not seed a search.
fn marks_ride(ride: RideId, element: &TileElement) -> bool {
    match &element.kind {
        TileElementKind::Path(path) => path.is_queue && path.queue_ride == Some(ride),
        TileElementKind::Track(track) => track.ride == ride,
        _ => false,
    }
}

/// Whether `element` is picked up by a nearby-scenery sweep for `ride`.
/// Queues are only taken when they serve this ride.
fn sweeps_up(ride: RideId, element: &TileElement) -> bool {
    match &element.kind {
        TileElementKind::Path(path) => !path.is_queue || path.queue_ride == Some(ride),
        TileElementKind::SmallScenery(_) | TileElementKind::LargeScenery(_) | TileElementKind::Wall(_) => true,
        _ => false,
    }
}

/// Select every scenery item within [`NEARBY_SCENERY_DISTANCE`] tiles of the
/// ride's track and queues. Returns how many items were added.
pub fn select_nearby_scenery(
    selection: &mut ScenerySelection,
    map: &TileMap,
    objects: &ObjectRepository,
    ride: RideId,
) -> usize {
    let centres: Vec<TileCoordsXY> = map
        .iter_tiles()
        .filter(|(_, tile)| tile.elements.iter().any(|e| marks_ride(ride, e)))
        .map(|(coords, _)| coords)
        .collect();

    let before = selection.len();
    for centre in centres {
        for y in centre.y - NEARBY_SCENERY_DISTANCE..=centre.y + NEARBY_SCENERY_DISTANCE {
            for x in centre.x - NEARBY_SCENERY_DISTANCE..=centre.x + NEARBY_SCENERY_DISTANCE {
                let loc = CoordsXY::new(x * COORDS_XY_STEP, y * COORDS_XY_STEP);
                if !map.is_location_valid(loc) {
                    continue;
                }
                for element in map.elements_at(loc) {
                    if sweeps_up(ride, element) {
                        selection.add(map, objects, loc, element);
                    }
                }
            }
        }
    }
    let added = selection.len() - before;
    debug!("Selected {} scenery items near ride {}", added, ride);
    added
}
