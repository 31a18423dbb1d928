// ---------------------------------------------------------------------------
// td6_importer – second-game track designs
// ---------------------------------------------------------------------------
//
// Decoded layout (0xA3-byte header, little-endian):
//   [0x00] ride type          [0x01] vehicle type      [0x02..0x06] flags
//   [0x06] mode               [0x07] version (bits 2-3) and colour settings
//   [0x08..0x48] body/trim colours for 32 trains
//   [0x49] station style      [0x4A] air time          [0x4B..0x51] operation
//   [0x51..0x5E] statistics   [0x5E] upkeep (i16)
//   [0x60..0x6C] spine, rail and support colours per scheme
//   [0x70..0x80] vehicle object entry
//   [0x80] space x            [0x81] space y
//   [0x82..0xA2] tertiary colours   [0xA2] lift speed and circuits
// followed by the element streams and the scenery list.

use bevy::prelude::*;
use park_sim::coords::{TileCoordsXY, TileCoordsXYZD};
use park_sim::objects::ObjectEntryDescriptor;
use park_sim::ride::{RideMode, RideRatings, RideType, TrackColour, VehicleColour};
use park_sim::track_design::{
    TrackDesign, TrackDesignEntranceElement, TrackDesignSceneryElement,
};

use crate::byte_stream::ByteReader;
use crate::config::{
    EXTENSION_TD6, TD46_ENTRANCE_EXIT_BIT, TD46_VERSION_TD6, TD6_HEADER_SIZE,
};
use crate::error::TrackImportError;
use crate::importer::TrackImporter;
use crate::sawyer::SawyerChunkReader;

use super::vehicle_lookup::VehicleLookup;
use super::{
    air_time_from_legacy, fixed_from_legacy, g_force_from_legacy, modern_ride_type,
    rating_from_legacy, read_maze_elements, read_track_elements, set_inversions_or_holes,
    station_identifier,
};

const TD6_NUM_VEHICLE_COLOURS: usize = 32;
const SCENERY_TERMINATOR: u8 = 0xFF;

#[derive(Default)]
pub struct Td6Importer {
    data: Option<Vec<u8>>,
    name: String,
    vehicles: Option<VehicleLookup>,
}

impl Td6Importer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TrackImporter for Td6Importer {
    fn extension(&self) -> &'static str {
        EXTENSION_TD6
    }

    fn load_from_bytes(&mut self, bytes: &[u8]) -> Result<(), TrackImportError> {
        let chunk = SawyerChunkReader::new(bytes).read_track_chunk()?;
        self.data = Some(chunk.data);
        Ok(())
    }

    fn import(&mut self) -> Result<TrackDesign, TrackImportError> {
        let data = self.data.as_deref().ok_or(TrackImportError::NotLoaded)?;
        let mut td = decode_td6(data, self.vehicles.as_ref())?;
        td.name = self.name.clone();
        debug!(
            "Imported TD6 design '{}': {} track, {} maze, {} scenery elements",
            td.name,
            td.track_elements.len(),
            td.maze_elements.len(),
            td.scenery_elements.len()
        );
        Ok(td)
    }

    fn set_fallback_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn set_vehicle_lookup(&mut self, lookup: VehicleLookup) {
        self.vehicles = Some(lookup);
    }
}

/// Map decoded TD6 bytes onto a design.
pub fn decode_td6(data: &[u8], vehicles: Option<&VehicleLookup>) -> Result<TrackDesign, TrackImportError> {
    if data.len() < TD6_HEADER_SIZE {
        return Err(TrackImportError::Truncated);
    }
    let mut r = ByteReader::new(data);
    let mut td = TrackDesign::default();

    let legacy_ride_type = RideType(r.read_u8()?);
    let _vehicle_type = r.read_u8()?;
    let _flags = r.read_u32()?;
    let mode = r.read_u8()?;
    let version_and_colours = r.read_u8()?;
    let version = (version_and_colours >> 2) & 3;
    if version != TD46_VERSION_TD6 {
        return Err(TrackImportError::UnsupportedLegacyVersion(version));
    }
    td.appearance.vehicle_colour_settings = version_and_colours & 3;

    let mut vehicle_colours = [VehicleColour::default(); TD6_NUM_VEHICLE_COLOURS];
    for colour in vehicle_colours.iter_mut() {
        colour.body = r.read_u8()?;
        colour.trim = r.read_u8()?;
    }
    let _pad = r.read_u8()?;
    td.appearance.station_object_identifier = station_identifier(r.read_u8()?).to_string();
    let air_time = r.read_u8()?;

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
    stats.highest_drop_height = r.read_u8()?;
    stats.ratings = RideRatings {
        excitement: rating_from_legacy(r.read_u8()?),
        intensity: rating_from_legacy(r.read_u8()?),
        nausea: rating_from_legacy(r.read_u8()?),
    };
    stats.upkeep_cost = i64::from(r.read_i16()?);
    stats.total_air_time = air_time_from_legacy(air_time);

    let spine: [u8; 4] = r.read_array()?;
    let rail: [u8; 4] = r.read_array()?;
    let support: [u8; 4] = r.read_array()?;
    for (i, colour) in td.appearance.track_colours.iter_mut().enumerate() {
        *colour = TrackColour {
            main: spine[i],
            additional: rail[i],
            supports: support[i],
        };
    }
    let _flags2 = r.read_u32()?;

    let entry_flags = r.read_u32()?;
    let entry_name: [u8; 8] = r.read_array()?;
    let entry_checksum = r.read_u32()?;
    td.track_and_vehicle.vehicle_object =
        ObjectEntryDescriptor::from_legacy(entry_flags, &entry_name, entry_checksum);

    let space_x = r.read_u8()?;
    let space_y = r.read_u8()?;
    td.statistics.space_required = TileCoordsXY::new(i32::from(space_x), i32::from(space_y));

    for colour in vehicle_colours.iter_mut() {
        colour.tertiary = r.read_u8()?;
    }
    td.appearance.vehicle_colours = vehicle_colours.to_vec();
    let lift = r.read_u8()?;
    td.set_lift_hill_speed_num_circuits(lift);

    let vehicle_ride_type =
        vehicles.and_then(|v| v.ride_type_for(&td.track_and_vehicle.vehicle_object));
    if vehicle_ride_type.is_none() {
        warn!(
            "Vehicle '{}' not loaded; keeping legacy ride type {}",
            td.track_and_vehicle.vehicle_object.name, legacy_ride_type.0
        );
    }
    td.track_and_vehicle.ride_type = modern_ride_type(legacy_ride_type, vehicle_ride_type);
    let ride_type = td.ride_type();
    td.operation.ride_mode = RideMode::from_u8(mode).unwrap_or_else(|| {
        warn!("Unknown ride mode {mode} in TD6 design; using default");
        ride_type
            .descriptor()
            .map_or(RideMode::default(), |d| d.default_mode)
    });
    set_inversions_or_holes(&mut td, inversions_or_holes);

    if td.is_maze() {
        read_maze_elements(&mut r, &mut td)?;
    } else {
        read_track_elements(&mut r, &mut td)?;
        read_entrance_elements(&mut r, &mut td)?;
    }
    read_scenery_elements(&mut r, &mut td)?;
    Ok(td)
}

/// `{z, direction, x, y}` records in world units until `z == -1`. Bit 7 of
/// the direction marks an exit.
fn read_entrance_elements(r: &mut ByteReader<'_>, td: &mut TrackDesign) -> Result<(), TrackImportError> {
    loop {
        let z = r.read_i8()?;
        if z == -1 {
            return Ok(());
        }
        let direction = r.read_u8()?;
        let x = i32::from(r.read_i16()?);
        let y = i32::from(r.read_i16()?);
        td.entrance_elements.push(TrackDesignEntranceElement {
            location: TileCoordsXYZD::new(
                x.div_euclid(32),
                y.div_euclid(32),
                i32::from(z),
                direction & 3,
            ),
            is_exit: direction & TD46_ENTRANCE_EXIT_BIT != 0,
        });
    }
}

/// Scenery records run to a `0xFF` byte or the end of the data.
fn read_scenery_elements(r: &mut ByteReader<'_>, td: &mut TrackDesign) -> Result<(), TrackImportError> {
    while let Some(first) = r.peek_u8() {
        if first == SCENERY_TERMINATOR {
            r.read_u8()?;
            break;
        }
        let flags = r.read_u32()?;
        let name: [u8; 8] = r.read_array()?;
        let checksum = r.read_u32()?;
        let x = r.read_i8()?;
        let y = r.read_i8()?;
        let z = r.read_i8()?;
        let element_flags = r.read_u8()?;
        let primary = r.read_u8()?;
        let secondary = r.read_u8()?;
        td.scenery_elements.push(TrackDesignSceneryElement {
            scenery_object: ObjectEntryDescriptor::from_legacy(flags, &name, checksum),
            x: i32::from(x),
            y: i32::from(y),
            z: i32::from(z),
            flags: element_flags,
            primary_colour: primary,
            secondary_colour: secondary,
            tertiary_colour: 0,
        });
    }
    Ok(())
}
