//! Fixed-layout designs from the first two games: TD4, TD4AA and TD6.
//!
//! * [`td4_importer`]: first-game designs (import only).
//! * [`td6_importer`] / [`td6_exporter`]: second-game designs.
//! * [`rct1_tables`]: first-game ride, vehicle and colour tables.
//! * [`vehicle_lookup`]: the shared vehicle index used to split legacy ride types.
//!
//! The helpers here are shared by every legacy codec: the packed per-piece
//! flag byte, unit conversions for compact statistics, station styles and the
//! element stream layouts.

pub mod rct1_tables;
pub mod td4_importer;
pub mod td6_exporter;
pub mod td6_importer;
pub mod vehicle_lookup;


use park_sim::config::{
    DEFAULT_BLOCK_BRAKE_SPEED, DEFAULT_SEAT_ROTATION, MAX_MAZE_ELEMENTS, TD6_MAX_TRACK_ELEMENTS,
};
use park_sim::coords::{TileCoordsXY, TileCoordsXYZD};
use park_sim::ride::RideType;
use park_sim::track_data::TrackElemType;
use park_sim::track_design::{
    TrackDesign, TrackDesignEntranceElement, TrackDesignMazeElement, TrackDesignTrackElement,
    TRACK_ELEMENT_FLAG_CHAIN_LIFT, TRACK_ELEMENT_FLAG_INVERTED,
};

use crate::byte_stream::ByteReader;
use crate::config::{
    TD46_FIXED_SHIFT, TD46_G_FORCES_MULTIPLIER, TD46_MAZE_ENTRANCE, TD46_MAZE_EXIT,
    TD46_RATINGS_MULTIPLIER, TD46_TRACK_TERMINATOR,
};
use crate::error::TrackImportError;

// ---------------------------------------------------------------------------
// Per-piece flags
// ---------------------------------------------------------------------------

const TD46_FLAG_CHAIN_LIFT: u8 = 1 << 7;
const TD46_FLAG_INVERTED: u8 = 1 << 6;
const TD46_COLOUR_SCHEME_SHIFT: u8 = 4;
const TD46_LOW_NIBBLE: u8 = 0x0F;

/// Unpack a legacy flag byte. The low nibble is the station index for
/// stations, half the speed for brakes and boosters, and the seat rotation
/// for everything else.
pub fn convert_from_td46_flags(element: &mut TrackDesignTrackElement, flags: u8) {
    let low = flags & TD46_LOW_NIBBLE;
    element.brake_booster_speed = DEFAULT_BLOCK_BRAKE_SPEED;
    element.seat_rotation = DEFAULT_SEAT_ROTATION;
    match element.track_type {
        t if t.is_station() => element.station_index = low,
        TrackElemType::BRAKES | TrackElemType::BOOSTER => element.brake_booster_speed = low << 1,
        TrackElemType::BLOCK_BRAKES => {}
        _ => element.seat_rotation = low,
    }
    element.set_flag(TRACK_ELEMENT_FLAG_CHAIN_LIFT, flags & TD46_FLAG_CHAIN_LIFT != 0);
    element.set_flag(TRACK_ELEMENT_FLAG_INVERTED, flags & TD46_FLAG_INVERTED != 0);
    element.colour_scheme = (flags >> TD46_COLOUR_SCHEME_SHIFT) & 3;
}

pub fn convert_to_td46_flags(element: &TrackDesignTrackElement) -> u8 {
    let low = match element.track_type {
        t if t.is_station() => element.station_index,
        TrackElemType::BRAKES | TrackElemType::BOOSTER => element.brake_booster_speed >> 1,
        TrackElemType::BLOCK_BRAKES => 0,
        _ => element.seat_rotation,
    };
    let mut flags = low & TD46_LOW_NIBBLE;
    if element.has_flag(TRACK_ELEMENT_FLAG_CHAIN_LIFT) {
        flags |= TD46_FLAG_CHAIN_LIFT;
    }
    if element.has_flag(TRACK_ELEMENT_FLAG_INVERTED) {
        flags |= TD46_FLAG_INVERTED;
    }
    flags | ((element.colour_scheme & 3) << TD46_COLOUR_SCHEME_SHIFT)
}

// ---------------------------------------------------------------------------
// Unit conversions
// ---------------------------------------------------------------------------

pub fn rating_from_legacy(raw: u8) -> i16 {
    i16::from(raw) * TD46_RATINGS_MULTIPLIER
}

pub fn rating_to_legacy(rating: i16) -> u8 {
    (rating / TD46_RATINGS_MULTIPLIER).clamp(0, i16::from(u8::MAX)) as u8
}

pub fn g_force_from_legacy(raw: i32) -> i32 {
    raw * TD46_G_FORCES_MULTIPLIER
}

pub fn g_force_to_legacy(g: i32, min: i32, max: i32) -> i32 {
    (g / TD46_G_FORCES_MULTIPLIER).clamp(min, max)
}

pub fn fixed_from_legacy(raw: i32) -> i32 {
    raw << TD46_FIXED_SHIFT
}

pub fn fixed_to_legacy(value: i32, min: i32, max: i32) -> i32 {
    (value >> TD46_FIXED_SHIFT).clamp(min, max)
}

pub fn air_time_from_legacy(raw: u8) -> u16 {
    (u32::from(raw) * 1024 / 123) as u16
}

/// Rounds to the nearest legacy step.
pub fn air_time_to_legacy(ticks: u16) -> u8 {
    ((u32::from(ticks) * 123 + 512) / 1024).min(255) as u8
}

/// Inversions and holes share one legacy byte.
pub fn inversions_or_holes(td: &TrackDesign) -> u8 {
    let value = if td.ride_type().uses_holes() {
        td.statistics.holes
    } else {
        td.statistics.inversions
    };
    value & 0x1F
}

pub fn set_inversions_or_holes(td: &mut TrackDesign, raw: u8) {
    let value = raw & 0x1F;
    if td.ride_type().uses_holes() {
        td.statistics.holes = value;
        td.statistics.inversions = 0;
    } else {
        td.statistics.inversions = value;
        td.statistics.holes = 0;
    }
}

// ---------------------------------------------------------------------------
// Ride types and station styles
// ---------------------------------------------------------------------------

/// Legacy ride types that now split by train: (legacy, modern).
const RIDE_TYPE_SPLITS: [(RideType, RideType); 4] = [
    (RideType::CORKSCREW_ROLLER_COASTER, RideType::HYPERCOASTER),
    (RideType::TWISTER_ROLLER_COASTER, RideType::HYPER_TWISTER),
    (RideType::JUNIOR_ROLLER_COASTER, RideType::CLASSIC_MINI_ROLLER_COASTER),
    (RideType::WOODEN_ROLLER_COASTER, RideType::CLASSIC_WOODEN_ROLLER_COASTER),
];

/// The current ride type for a legacy type, given the type the design's
/// vehicle is built for when that vehicle is known.
pub fn modern_ride_type(legacy: RideType, vehicle_ride_type: Option<RideType>) -> RideType {
    match vehicle_ride_type {
        Some(vehicle)
            if RIDE_TYPE_SPLITS
                .iter()
                .any(|&(l, m)| l == legacy && m == vehicle) =>
        {
            vehicle
        }
        _ => legacy,
    }
}

pub fn legacy_ride_type(modern: RideType) -> RideType {
    RIDE_TYPE_SPLITS
        .iter()
        .find(|&&(_, m)| m == modern)
        .map_or(modern, |&(l, _)| l)
}

pub const STATION_STYLES: [&str; 12] = [
    "rct2.station.plain",
    "rct2.station.wooden",
    "rct2.station.canvas_tent",
    "rct2.station.castle_grey",
    "rct2.station.castle_brown",
    "rct2.station.jungle",
    "rct2.station.log_cabin",
    "rct2.station.classical",
    "rct2.station.abstract",
    "rct2.station.snow",
    "rct2.station.pagoda",
    "rct2.station.space",
];

pub fn station_identifier(style: u8) -> &'static str {
    STATION_STYLES
        .get(usize::from(style))
        .copied()
        .unwrap_or(STATION_STYLES[0])
}

/// Unknown identifiers store as the plain style.
pub fn station_style(identifier: &str) -> u8 {
    STATION_STYLES
        .iter()
        .position(|&s| s == identifier)
        .unwrap_or(0) as u8
}

// ---------------------------------------------------------------------------
// Element streams
// ---------------------------------------------------------------------------

/// Maze cells until an all-zero record. Records typed as entrance or exit
/// become entrance elements.
pub fn read_maze_elements(r: &mut ByteReader<'_>, td: &mut TrackDesign) -> Result<(), TrackImportError> {
    loop {
        let x = r.read_i8()?;
        let y = r.read_i8()?;
        let entry = r.read_u16()?;
        if x == 0 && y == 0 && entry == 0 {
            return Ok(());
        }
        let kind = (entry >> 8) as u8;
        if kind == TD46_MAZE_ENTRANCE || kind == TD46_MAZE_EXIT {
            td.entrance_elements.push(TrackDesignEntranceElement {
                location: TileCoordsXYZD::new(i32::from(x), i32::from(y), 0, (entry & 3) as u8),
                is_exit: kind == TD46_MAZE_EXIT,
            });
        } else {
            if td.maze_elements.len() >= MAX_MAZE_ELEMENTS {
                return Err(TrackImportError::TooManyElements);
            }
            td.maze_elements.push(TrackDesignMazeElement {
                location: TileCoordsXY::new(i32::from(x), i32::from(y)),
                maze_entry: entry,
            });
        }
    }
}

/// `{type, flags}` pairs until a `0xFF` type.
pub fn read_track_elements(r: &mut ByteReader<'_>, td: &mut TrackDesign) -> Result<(), TrackImportError> {
    loop {
        let track_type = r.read_u8()?;
        if track_type == TD46_TRACK_TERMINATOR {
            return Ok(());
        }
        if td.track_elements.len() >= TD6_MAX_TRACK_ELEMENTS {
            return Err(TrackImportError::TooManyElements);
        }
        let flags = r.read_u8()?;
        let mut element = TrackDesignTrackElement::new(TrackElemType(u16::from(track_type)));
        convert_from_td46_flags(&mut element, flags);
        td.track_elements.push(element);
    }
}
