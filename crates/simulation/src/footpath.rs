//! Footpath edge bookkeeping shared by path, entrance and track placement.
//!
//! A path's `edges` has one bit per direction; bit `d` is set when the path
//! connects to whatever lies at `loc + COORDS_DIRECTION_DELTA[d]`.

use std::collections::VecDeque;

use crate::coords::{direction_reverse, rol4, CoordsXY, CoordsXYZ, Direction, COORDS_DIRECTION_DELTA};
use crate::ride::{Ride, RideId};
use crate::tile_map::{TileElementKind, TileMap};
use crate::track_data::{SEQUENCE_DIRECTION_MASK, SEQUENCE_FLAG_CONNECTS_TO_PATH};

fn neighbour(loc: CoordsXY, direction: Direction) -> CoordsXY {
    loc + COORDS_DIRECTION_DELTA[usize::from(direction & 3)]
}

/// Whether something on the neighbouring tile at height `z` accepts a path
/// connection coming from `direction`'s opposite side.
fn accepts_connection(map: &TileMap, loc: CoordsXY, z: i32, direction: Direction) -> bool {
    let from = direction_reverse(direction);
    map.elements_at(loc).iter().any(|e| {
        if e.base_z != z {
            return false;
        }
        match &e.kind {
            TileElementKind::Path(_) => true,
            // Entrances open onto the path on the side opposite their facing.
            TileElementKind::Entrance(entrance) => direction_reverse(entrance.direction) == from,
            TileElementKind::Track(track) => track
                .track_type
                .descriptor()
                .filter(|d| d.sequence & SEQUENCE_FLAG_CONNECTS_TO_PATH != 0)
                .is_some_and(|d| {
                    let open = rol4(d.sequence & SEQUENCE_DIRECTION_MASK, track.direction);
                    // Mazes without a descriptor mask open on every side.
                    open == 0 || open & (1 << from) != 0
                }),
            _ => false,
        }
    })
}

/// Join the path at `loc` to every neighbour that accepts it, setting the
/// matching edge on neighbouring paths as well.
pub fn connect_edges(map: &mut TileMap, loc: CoordsXYZ) {
    if map.footpath_at(loc).is_none() {
        return;
    }
    let mut edges = 0u8;
    for d in 0..4u8 {
        let n = neighbour(loc.xy(), d);
        if !accepts_connection(map, n, loc.z, d) {
            continue;
        }
        edges |= 1 << d;
        if let Some(path) = map.footpath_at_mut(n.with_z(loc.z)).and_then(|e| e.as_path_mut()) {
            path.edges |= 1 << direction_reverse(d);
        }
    }
    if let Some(path) = map.footpath_at_mut(loc).and_then(|e| e.as_path_mut()) {
        path.edges |= edges;
    }
}

/// Clear the path's edges and the neighbours' edges that point back at it.
pub fn remove_edges_at(map: &mut TileMap, loc: CoordsXYZ) {
    let Some(path) = map.footpath_at_mut(loc).and_then(|e| e.as_path_mut()) else {
        return;
    };
    let old = path.edges;
    path.edges = 0;
    for d in (0..4u8).filter(|d| old & (1 << d) != 0) {
        let n = neighbour(loc.xy(), d).with_z(loc.z);
        if let Some(other) = map.footpath_at_mut(n).and_then(|e| e.as_path_mut()) {
            other.edges &= !(1 << direction_reverse(d));
        }
    }
}

/// Connect the path in front of an entrance at `loc` facing `direction`.
pub fn connect_entrance(map: &mut TileMap, loc: CoordsXYZ, direction: Direction) {
    let back = direction_reverse(direction);
    let path_loc = neighbour(loc.xy(), back).with_z(loc.z);
    if let Some(path) = map.footpath_at_mut(path_loc).and_then(|e| e.as_path_mut()) {
        path.edges |= 1 << direction;
    }
}

/// Connect paths around a track piece that opens onto paths.
pub fn connect_track_neighbours(map: &mut TileMap, loc: CoordsXYZ) {
    for d in 0..4u8 {
        let n = neighbour(loc.xy(), d).with_z(loc.z);
        if map.footpath_at(n).is_some() {
            connect_edges(map, n);
        }
    }
}

/// Assign every queue reachable from `ride`'s station entrances to the ride.
/// Returns the number of queue tiles updated.
pub fn chain_queues(map: &mut TileMap, ride: &Ride) -> usize {
    let mut chained = 0;
    for entrance in ride.stations.iter().filter_map(|s| s.entrance) {
        let start = neighbour(entrance.xy(), direction_reverse(entrance.direction)).with_z(entrance.z);
        chained += chain_from(map, ride.id, start);
    }
    chained
}

fn chain_from(map: &mut TileMap, ride: RideId, start: CoordsXYZ) -> usize {
    let mut visited: Vec<CoordsXYZ> = Vec::new();
    let mut frontier = VecDeque::from([start]);
    while let Some(loc) = frontier.pop_front() {
        if visited.contains(&loc) {
            continue;
        }
        let Some(path) = map.footpath_at_mut(loc).and_then(|e| e.as_path_mut()) else {
            continue;
        };
        if !path.is_queue {
            continue;
        }
        path.queue_ride = Some(ride);
        let edges = path.edges;
        visited.push(loc);
        for d in (0..4u8).filter(|d| edges & (1 << d) != 0) {
            frontier.push_back(neighbour(loc.xy(), d).with_z(loc.z));
        }
    }
    visited.len()
}
