//! Capturing a built ride as a [`TrackDesign`].
//!
//! Tracked rides are walked piece by piece from their first station around
//! the circuit; mazes are raster-scanned. Entrances, exits and any selected
//! scenery are then made relative to the design origin and turned back to
//! direction 0, so the result can be placed anywhere at any rotation.

mod scenery;
mod selection;

#[cfg(test)]
mod tests;

use std::fmt;

use bevy::prelude::*;

use crate::config::{
    COORDS_XY_STEP, COORDS_Z_STEP, DESIGN_MAX_TILE_OFFSET, DESIGN_MIN_TILE_OFFSET,
    MAX_MAZE_ELEMENTS, TD6_MAX_TRACK_ELEMENTS,
};
use crate::coords::{CoordsXYZ, CoordsXYZD, Direction, TileCoordsXY, TileCoordsXYZD};
use crate::objects::ObjectRepository;
use crate::ride::{Ride, RideId, RideRegistry};
use crate::tile_map::{TileElementKind, TileMap};
use crate::track_data::{track_block_get_next, TrackBlockRef};

use super::model::{
    TrackDesign, TrackDesignEntranceElement, TrackDesignMazeElement, TrackDesignTrackElement,
    TRACK_ELEMENT_FLAG_CHAIN_LIFT, TRACK_ELEMENT_FLAG_INVERTED,
};
use super::placement::space_required;
use super::transform;

pub use selection::{select_nearby_scenery, ScenerySelection, MAX_SELECTED_SCENERY_ELEMENTS};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a ride could not be captured. No partial design is ever returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureError {
    RideNotFound,
    /// The ride has not completed a test run with ratings.
    NotTested,
    NoTrack,
    /// Following the track from its start did not lead back to it.
    TrackNotClosed,
    TooManyTrackElements,
    TooManyMazeElements,
    /// An entrance, exit or scenery item lies too far from the origin.
    PositionOutOfRange,
    MissingEntranceOrExit,
}

/// The coarse outcome players are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureErrorCategory {
    RideNotTested,
    TrackTooLargeOrTooMuchScenery,
}

impl CaptureError {
    pub fn category(self) -> CaptureErrorCategory {
        match self {
            CaptureError::NotTested => CaptureErrorCategory::RideNotTested,
            _ => CaptureErrorCategory::TrackTooLargeOrTooMuchScenery,
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::RideNotFound => write!(f, "Ride not found"),
            CaptureError::NotTested => write!(f, "Ride has not been tested"),
            CaptureError::NoTrack => write!(f, "Ride has no track"),
            CaptureError::TrackNotClosed => write!(f, "Track does not form a complete circuit"),
            CaptureError::TooManyTrackElements => {
                write!(f, "More than {TD6_MAX_TRACK_ELEMENTS} track pieces")
            }
            CaptureError::TooManyMazeElements => {
                write!(f, "More than {MAX_MAZE_ELEMENTS} maze tiles")
            }
            CaptureError::PositionOutOfRange => {
                write!(f, "Element too far from the design origin")
            }
            CaptureError::MissingEntranceOrExit => write!(f, "Entrance or exit not found"),
        }
    }
}

impl std::error::Error for CaptureError {}

// ---------------------------------------------------------------------------
// Capture
// ---------------------------------------------------------------------------

/// Build a design from `ride` as it stands on `map`, with the scenery in
/// `scenery` attached.
pub fn create_track_design(
    map: &TileMap,
    rides: &RideRegistry,
    objects: &ObjectRepository,
    ride: RideId,
    scenery: &ScenerySelection,
) -> Result<TrackDesign, CaptureError> {
    let built = rides.get(ride).ok_or(CaptureError::RideNotFound)?;
    if !built.is_tested() {
        return Err(CaptureError::NotTested);
    }

    let mut td = TrackDesign::default();
    td.copy_settings_from_ride(built);
    if let Some(vehicle) = built.vehicle_object.and_then(|i| objects.get(i)) {
        td.track_and_vehicle.vehicle_object = vehicle.entry.clone();
    }
    if let Some(style) = built.entrance_style.and_then(|i| objects.get(i)) {
        td.appearance.station_object_identifier = style.identifier.clone();
    }

    let (origin, direction) = if built.is_maze() {
        (capture_maze(map, built, &mut td)?, 0)
    } else {
        capture_track(map, built, &mut td)?
    };

    td.scenery_elements = scenery.to_design_elements(origin);
    transform::rotate(&mut td, (4 - direction) & 3);
    check_offsets(&td)?;

    td.statistics.space_required = space_required(&td);
    debug!(
        "Captured {} ({} pieces, {} maze tiles, {} scenery items)",
        td.name,
        td.track_elements.len(),
        td.maze_elements.len(),
        td.scenery_elements.len()
    );
    Ok(td)
}

/// The block of `ride` that a capture walk starts from: the first station's
/// start when it has one, otherwise the first piece found on the map.
fn start_block(map: &TileMap, ride: &Ride) -> Option<TrackBlockRef> {
    let from_station = ride.stations.iter().filter_map(|s| s.start).find_map(|start| {
        let element = map.track_at(start, ride.id)?;
        let track = element.as_track()?;
        Some(TrackBlockRef::from_element(start.xy(), element.base_z, track))
    });
    let found = from_station.or_else(|| {
        map.iter_tiles().find_map(|(tile, contents)| {
            contents.elements.iter().find_map(|e| {
                let track = e.as_track().filter(|t| t.ride == ride.id)?;
                Some(TrackBlockRef::from_element(tile.to_coords(), e.base_z, track))
            })
        })
    })?;
    origin_block(found)
}

/// The sequence-0 block of the piece `block` belongs to.
fn origin_block(block: TrackBlockRef) -> Option<TrackBlockRef> {
    if block.sequence == 0 {
        return Some(block);
    }
    let piece = block.piece_origin()?;
    let first = block.track_type.descriptor()?.block(0)?;
    let xy = piece.xy() + first.offset().rotate(block.direction & 3);
    Some(TrackBlockRef {
        loc: xy.with_z(piece.z + first.z),
        sequence: 0,
        ..block
    })
}

fn design_track_element(map: &TileMap, ride: RideId, block: &TrackBlockRef) -> Option<TrackDesignTrackElement> {
    let track = map.track_at(block.loc, ride)?.as_track()?;
    let mut element = TrackDesignTrackElement::new(track.track_type);
    element.set_flag(TRACK_ELEMENT_FLAG_CHAIN_LIFT, track.has_chain);
    element.set_flag(TRACK_ELEMENT_FLAG_INVERTED, track.inverted);
    element.colour_scheme = track.colour_scheme;
    element.station_index = track.station_index;
    element.brake_booster_speed = track.brake_booster_speed;
    element.seat_rotation = track.seat_rotation;
    Some(element)
}

/// Walk the circuit and record every piece. Returns the design origin and
/// the direction the first piece faces.
fn capture_track(
    map: &TileMap,
    ride: &Ride,
    td: &mut TrackDesign,
) -> Result<(CoordsXYZ, Direction), CaptureError> {
    let start = start_block(map, ride).ok_or(CaptureError::NoTrack)?;
    let ted = start.track_type.descriptor().ok_or(CaptureError::NoTrack)?;
    let piece = start.piece_origin().ok_or(CaptureError::NoTrack)?;
    let direction = start.direction & 3;
    let origin = piece.xy().with_z(piece.z + ted.coordinates.z_begin);

    let mut current = start;
    loop {
        let element = design_track_element(map, ride.id, &current).ok_or(CaptureError::NoTrack)?;
        td.track_elements.push(element);
        if td.track_elements.len() > TD6_MAX_TRACK_ELEMENTS {
            return Err(CaptureError::TooManyTrackElements);
        }
        current = track_block_get_next(map, ride.id, &current).ok_or(CaptureError::TrackNotClosed)?;
        if current == start {
            break;
        }
    }

    // Entrances first, then exits.
    for is_exit in [false, true] {
        for station in &ride.stations {
            let location = if is_exit { station.exit } else { station.entrance };
            let Some(location) = location else {
                continue;
            };
            if !has_entrance_element(map, ride.id, location, is_exit) {
                return Err(CaptureError::MissingEntranceOrExit);
            }
            td.entrance_elements
                .push(relative_entrance(origin, location, is_exit)?);
        }
    }
    Ok((origin, direction))
}

/// Raster-scan the map for the ride's hedge tiles. Returns the design origin,
/// the first tile found.
fn capture_maze(map: &TileMap, ride: &Ride, td: &mut TrackDesign) -> Result<CoordsXYZ, CaptureError> {
    let mut origin: Option<CoordsXYZ> = None;
    for (tile, contents) in map.iter_tiles() {
        for element in &contents.elements {
            let Some(track) = element.as_track().filter(|t| t.ride == ride.id) else {
                continue;
            };
            let start = *origin.get_or_insert(tile.to_coords().with_z(element.base_z));
            let start_tile = start.xy().to_tile();
            td.maze_elements.push(TrackDesignMazeElement {
                location: TileCoordsXY::new(tile.x - start_tile.x, tile.y - start_tile.y),
                maze_entry: track.maze_entry,
            });
            if td.maze_elements.len() > MAX_MAZE_ELEMENTS {
                return Err(CaptureError::TooManyMazeElements);
            }
        }
    }
    let origin = origin.ok_or(CaptureError::NoTrack)?;

    let station = &ride.stations[0];
    for (location, is_exit) in [(station.entrance, false), (station.exit, true)] {
        let location = location.ok_or(CaptureError::MissingEntranceOrExit)?;
        if !has_entrance_element(map, ride.id, location, is_exit) {
            return Err(CaptureError::MissingEntranceOrExit);
        }
        td.entrance_elements
            .push(relative_entrance(origin, location, is_exit)?);
    }
    Ok(origin)
}

fn has_entrance_element(map: &TileMap, ride: RideId, loc: CoordsXYZD, is_exit: bool) -> bool {
    map.elements_at(loc.xy()).iter().any(|e| {
        e.base_z == loc.z
            && matches!(&e.kind, TileElementKind::Entrance(entrance)
                if entrance.ride == ride && entrance.is_exit == is_exit)
    })
}

fn relative_entrance(
    origin: CoordsXYZ,
    location: CoordsXYZD,
    is_exit: bool,
) -> Result<TrackDesignEntranceElement, CaptureError> {
    let offset = location.xy() - origin.xy();
    let z = (location.z - origin.z) / COORDS_Z_STEP;
    if !in_design_range(z) {
        return Err(CaptureError::PositionOutOfRange);
    }
    Ok(TrackDesignEntranceElement {
        location: TileCoordsXYZD::new(
            offset.x / COORDS_XY_STEP,
            offset.y / COORDS_XY_STEP,
            z,
            location.direction & 3,
        ),
        is_exit,
    })
}

fn in_design_range(offset: i32) -> bool {
    (DESIGN_MIN_TILE_OFFSET..=DESIGN_MAX_TILE_OFFSET).contains(&offset)
}

/// Every relative position must fit the signed-byte range legacy files use.
fn check_offsets(td: &TrackDesign) -> Result<(), CaptureError> {
    let entrances = td
        .entrance_elements
        .iter()
        .map(|e| CoordsXYZ::new(e.location.x, e.location.y, e.location.z));
    let scenery = td
        .scenery_elements
        .iter()
        .map(|s| CoordsXYZ::new(s.x, s.y, s.z));
    let maze = td
        .maze_elements
        .iter()
        .map(|m| CoordsXYZ::new(m.location.x, m.location.y, 0));
    for p in entrances.chain(scenery).chain(maze) {
        if !in_design_range(p.x) || !in_design_range(p.y) || !in_design_range(p.z) {
            return Err(CaptureError::PositionOutOfRange);
        }
    }
    Ok(())
}

