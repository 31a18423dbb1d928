// ---------------------------------------------------------------------------
// td4_importer – first-game track designs (TD4 and the TD4AA expansion)
// ---------------------------------------------------------------------------
//
// Both share the first 0x38 bytes. TD4AA adds per-scheme track colours and a
// second flag byte, padding its header to 0xC4. Ride and vehicle types use
// the first game's numbering and its palette; both are translated here.
// Designs from this era carry no usable entrance or scenery lists.

use bevy::prelude::*;
use park_sim::coords::TileCoordsXY;
use park_sim::objects::{ObjectEntryDescriptor, ObjectType};
use park_sim::ride::{RideMode, RideRatings, TrackColour, VehicleColour, MAX_VEHICLE_COLOURS};
use park_sim::track_design::TrackDesign;

use crate::byte_stream::ByteReader;
use crate::config::{
    EXTENSION_TD4, TD46_VERSION_TD4, TD46_VERSION_TD4AA, TD4AA_HEADER_SIZE, TD4_HEADER_SIZE,
    TD4_VEHICLE_COLOURS,
};
use crate::error::TrackImportError;
use crate::importer::TrackImporter;
use crate::sawyer::SawyerChunkReader;

use super::rct1_tables::{
    self, HEDGE_MAZE_OBJECT, RCT1_RIDE_MODE_POWERED_LAUNCH, RCT1_RIDE_TYPE_HEDGE_MAZE,
    RCT1_RIDE_TYPE_RIVER_RAPIDS,
};
use super::{
    fixed_from_legacy, g_force_from_legacy, rating_from_legacy, read_maze_elements,
    read_track_elements, set_inversions_or_holes, STATION_STYLES,
};

const TD4_LIFT_HILL_SPEED: u8 = 5;
const COLOUR_WHITE: u8 = 2;
const MAZE_WALL_TYPE_HEDGE: u8 = 0;
/// Footprint placeholder; the real extent is measured when the design is
/// installed.
const TD4_SPACE_REQUIRED: i32 = 255;

#[derive(Default)]
pub struct Td4Importer {
    data: Option<Vec<u8>>,
    name: String,
}

impl Td4Importer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TrackImporter for Td4Importer {
    fn extension(&self) -> &'static str {
        EXTENSION_TD4
    }

    fn load_from_bytes(&mut self, bytes: &[u8]) -> Result<(), TrackImportError> {
        let chunk = SawyerChunkReader::new(bytes).read_track_chunk()?;
        self.data = Some(chunk.data);
        Ok(())
    }

    fn import(&mut self) -> Result<TrackDesign, TrackImportError> {
        let data = self.data.as_deref().ok_or(TrackImportError::NotLoaded)?;
        let mut td = decode_td4(data)?;
        td.name = self.name.clone();
        Ok(td)
    }

    fn set_fallback_name(&mut self, name: &str) {
        self.name = name.to_string();
    }
}

/// Map decoded TD4 or TD4AA bytes onto a design.
pub fn decode_td4(data: &[u8]) -> Result<TrackDesign, TrackImportError> {
    let version_byte = *data.get(7).ok_or(TrackImportError::Truncated)?;
    let version = (version_byte >> 2) & 3;
    let header_size = match version {
        TD46_VERSION_TD4 => TD4_HEADER_SIZE,
        TD46_VERSION_TD4AA => TD4AA_HEADER_SIZE,
        other => return Err(TrackImportError::UnsupportedLegacyVersion(other)),
    };
    if data.len() < header_size {
        return Err(TrackImportError::Truncated);
    }

    let mut r = ByteReader::new(data);
    let mut td = TrackDesign::default();

    let rct1_ride_type = r.read_u8()?;
    let vehicle_type = r.read_u8()?;
    let _flags = r.read_u32()?;
    let mode = r.read_u8()?;
    td.appearance.vehicle_colour_settings = r.read_u8()? & 3;

    let mut colours = [VehicleColour::default(); TD4_VEHICLE_COLOURS];
    for colour in colours.iter_mut() {
        colour.body = rct1_tables::colour(r.read_u8()?);
        colour.trim = rct1_tables::colour(r.read_u8()?);
    }
    let mut vehicle_colours = colours.to_vec();
    vehicle_colours.resize(MAX_VEHICLE_COLOURS, colours[0]);
    td.appearance.vehicle_colours = vehicle_colours;

    let spine_v0 = r.read_u8()?;
    let rail_v0 = r.read_u8()?;
    let support_v0 = r.read_u8()?;

    td.operation.depart_flags = r.read_u8()?;
    td.track_and_vehicle.num_trains = r.read_u8()?;
    td.track_and_vehicle.cars_per_train = r.read_u8()?;
    td.operation.min_waiting_time = r.read_u8()?;
    td.operation.max_waiting_time = r.read_u8()?;
    td.operation.operation_setting = r.read_u8()?;

    let stats = &mut td.statistics;
    stats.max_speed = fixed_from_legacy(i32::from(r.read_i8()?));
    stats.average_speed = fixed_from_legacy(i32::from(r.read_i8()?));
    stats.ride_length = fixed_from_legacy(i32::from(r.read_u16()?));
    stats.max_positive_vertical_g = g_force_from_legacy(i32::from(r.read_u8()?));
    stats.max_negative_vertical_g = g_force_from_legacy(i32::from(r.read_i8()?));
    stats.max_lateral_g = g_force_from_legacy(i32::from(r.read_u8()?));
    let inversions_or_holes = r.read_u8()?;
    stats.drops = r.read_u8()?;
    // First-game drop heights are stored at twice the resolution.
    stats.highest_drop_height = r.read_u8()? / 2;
    stats.ratings = RideRatings {
        excitement: rating_from_legacy(r.read_u8()?),
        intensity: rating_from_legacy(r.read_u8()?),
        nausea: rating_from_legacy(r.read_u8()?),
    };
    stats.upkeep_cost = i64::from(r.read_i16()?);
    stats.space_required = TileCoordsXY::new(TD4_SPACE_REQUIRED, TD4_SPACE_REQUIRED);

    if version == TD46_VERSION_TD4AA {
        let spine: [u8; 4] = r.read_array()?;
        let rail: [u8; 4] = r.read_array()?;
        let support: [u8; 4] = r.read_array()?;
        for (i, colour) in td.appearance.track_colours.iter_mut().enumerate() {
            *colour = TrackColour {
                main: rct1_tables::colour(spine[i]),
                additional: rct1_tables::colour(rail[i]),
                supports: rct1_tables::colour(support[i]),
            };
        }
    } else {
        let mut scheme = TrackColour {
            main: rct1_tables::colour(spine_v0),
            additional: rct1_tables::colour(rail_v0),
            supports: rct1_tables::colour(support_v0),
        };
        match rct1_ride_type {
            RCT1_RIDE_TYPE_HEDGE_MAZE => scheme.supports = MAZE_WALL_TYPE_HEDGE,
            RCT1_RIDE_TYPE_RIVER_RAPIDS => {
                scheme.main = COLOUR_WHITE;
                scheme.additional = COLOUR_WHITE;
            }
            _ => {}
        }
        td.appearance.track_colours = [scheme; 4];
    }
    r.seek(header_size)?;

    td.track_and_vehicle.ride_type = rct1_tables::ride_type(rct1_ride_type, vehicle_type);
    td.track_and_vehicle.vehicle_object = if rct1_ride_type == RCT1_RIDE_TYPE_HEDGE_MAZE {
        ObjectEntryDescriptor::new(ObjectType::Ride, HEDGE_MAZE_OBJECT)
    } else {
        rct1_tables::vehicle_object(vehicle_type).unwrap_or_else(|| {
            warn!("No vehicle object for first-game train {vehicle_type}");
            ObjectEntryDescriptor::default()
        })
    };
    td.appearance.station_object_identifier = STATION_STYLES[0].to_string();

    let ride_type = td.ride_type();
    td.operation.ride_mode = if mode == RCT1_RIDE_MODE_POWERED_LAUNCH {
        RideMode::PoweredLaunch
    } else {
        RideMode::from_u8(mode).unwrap_or_else(|| {
            warn!("Unknown ride mode {mode} in TD4 design; using default");
            ride_type
                .descriptor()
                .map_or(RideMode::default(), |d| d.default_mode)
        })
    };
    td.operation.lift_hill_speed = TD4_LIFT_HILL_SPEED;
    td.operation.num_circuits = 0;
    set_inversions_or_holes(&mut td, inversions_or_holes);

    if td.is_maze() {
        read_maze_elements(&mut r, &mut td)?;
    } else {
        read_track_elements(&mut r, &mut td)?;
    }
    debug!(
        "Imported TD4 design (version {version}): ride type {}, {} track, {} maze elements",
        td.ride_type().0,
        td.track_elements.len(),
        td.maze_elements.len()
    );
    Ok(td)
}
