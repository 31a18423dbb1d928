//! Tearing a ride down completely: every track, maze and entrance element it
//! owns, then the ride itself.

use bevy::prelude::*;

use crate::context::ParkContext;
use crate::coords::CoordsXYZ;
use crate::tile_map::TileElementKind;

use super::RideId;

fn owned_by(kind: &TileElementKind, ride: RideId) -> bool {
    match kind {
        TileElementKind::Track(track) => track.ride == ride,
        TileElementKind::Entrance(entrance) => entrance.ride == ride,
        _ => false,
    }
}

/// Removes everything `ride` owns from the map, unlinks queues pointing at it
/// and drops it from the registry. Returns the number of elements removed.
pub fn demolish_ride(ctx: &mut ParkContext, ride: RideId) -> usize {
    let mut owned = Vec::new();
    let mut queues = Vec::new();
    for (tile, contents) in ctx.map.iter_tiles() {
        for element in &contents.elements {
            if owned_by(&element.kind, ride) {
                owned.push(tile.to_coords());
            }
            if let TileElementKind::Path(path) = &element.kind {
                if path.queue_ride == Some(ride) {
                    queues.push(tile.to_coords().with_z(element.base_z));
                }
            }
        }
    }
    owned.dedup();

    let mut removed = 0;
    for loc in owned {
        let heights: Vec<i32> = ctx
            .map
            .elements_at(loc)
            .iter()
            .filter(|e| owned_by(&e.kind, ride))
            .map(|e| e.base_z)
            .collect();
        removed += ctx.map.remove_where(loc, |e| owned_by(&e.kind, ride));
        for z in heights {
            ctx.animations.remove_at(CoordsXYZ::new(loc.x, loc.y, z));
        }
        if let Some(TileElementKind::Surface(surface)) = ctx.map.surface_at_mut(loc).map(|e| &mut e.kind) {
            surface.has_track_that_needs_water = false;
        }
    }
    for loc in queues {
        if let Some(path) = ctx.map.footpath_at_mut(loc).and_then(|e| e.as_path_mut()) {
            path.queue_ride = None;
        }
    }

    if ctx.rides.remove(ride).is_some() {
        debug!("Demolished {} ({} elements)", ride, removed);
    }
    removed
}
