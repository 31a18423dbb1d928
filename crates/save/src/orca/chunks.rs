//! Chunk bodies of the design file. Each function describes one chunk for
//! both directions through [`ChunkStream`].

use bevy::prelude::*;
use park_sim::config::{MAX_MAZE_ELEMENTS, TD6_MAX_TRACK_ELEMENTS};
use park_sim::objects::ObjectEntryDescriptor;
use park_sim::ride::{RideMode, MAX_VEHICLE_COLOURS};
use park_sim::track_design::{
    TrackDesign, TrackDesignEntranceElement, TrackDesignMazeElement, TrackDesignSceneryElement,
    TrackDesignTrackElement,
};

use crate::config::{ORCA_MAX_ENTRANCES, ORCA_MAX_SCENERY};

use super::stream::ChunkStream;

pub const CHUNK_GENERAL_METADATA: u32 = 1;
pub const CHUNK_TRACK_METADATA: u32 = 2;
pub const CHUNK_TRACK_ELEMENTS: u32 = 3;

/// Reserved for fields every chunk table will carry; currently one byte.
pub fn rw_general_metadata<S: ChunkStream>(s: &mut S) -> Result<(), S::Error> {
    let mut reserved = 0u8;
    s.rw_u8(&mut reserved)
}

fn rw_object_entry<S: ChunkStream>(s: &mut S, entry: &mut ObjectEntryDescriptor) -> Result<(), S::Error> {
    s.rw_u32(&mut entry.flags)?;
    s.rw_string(&mut entry.name)?;
    s.rw_u32(&mut entry.checksum)
}

fn rw_ride_mode<S: ChunkStream>(s: &mut S, mode: &mut RideMode) -> Result<(), S::Error> {
    let mut raw = *mode as u8;
    s.rw_u8(&mut raw)?;
    if s.is_reading() {
        *mode = RideMode::from_u8(raw).unwrap_or_else(|| {
            warn!("Unknown ride mode {raw} in design file; using default");
            RideMode::default()
        });
    }
    Ok(())
}

pub fn rw_track_metadata<S: ChunkStream>(s: &mut S, td: &mut TrackDesign) -> Result<(), S::Error> {
    s.rw_string(&mut td.name)?;

    let tv = &mut td.track_and_vehicle;
    s.rw_u8(&mut tv.ride_type.0)?;
    rw_object_entry(s, &mut tv.vehicle_object)?;
    s.rw_u8(&mut tv.num_trains)?;
    s.rw_u8(&mut tv.cars_per_train)?;

    let op = &mut td.operation;
    rw_ride_mode(s, &mut op.ride_mode)?;
    s.rw_u8(&mut op.lift_hill_speed)?;
    s.rw_u8(&mut op.num_circuits)?;
    s.rw_u8(&mut op.operation_setting)?;
    s.rw_u8(&mut op.depart_flags)?;
    s.rw_u8(&mut op.min_waiting_time)?;
    s.rw_u8(&mut op.max_waiting_time)?;

    let appearance = &mut td.appearance;
    for colour in appearance.track_colours.iter_mut() {
        s.rw_u8(&mut colour.main)?;
        s.rw_u8(&mut colour.additional)?;
        s.rw_u8(&mut colour.supports)?;
    }
    s.rw_string(&mut appearance.station_object_identifier)?;
    s.rw_u8(&mut appearance.vehicle_colour_settings)?;
    s.rw_vec(&mut appearance.vehicle_colours, MAX_VEHICLE_COLOURS, |s, c| {
        s.rw_u8(&mut c.body)?;
        s.rw_u8(&mut c.trim)?;
        s.rw_u8(&mut c.tertiary)
    })?;

    let stats = &mut td.statistics;
    s.rw_i16(&mut stats.ratings.excitement)?;
    s.rw_i16(&mut stats.ratings.intensity)?;
    s.rw_i16(&mut stats.ratings.nausea)?;
    s.rw_i32(&mut stats.max_speed)?;
    s.rw_i32(&mut stats.average_speed)?;
    s.rw_i32(&mut stats.ride_length)?;
    s.rw_i32(&mut stats.max_positive_vertical_g)?;
    s.rw_i32(&mut stats.max_negative_vertical_g)?;
    s.rw_i32(&mut stats.max_lateral_g)?;
    s.rw_u8(&mut stats.inversions)?;
    s.rw_u8(&mut stats.holes)?;
    s.rw_u8(&mut stats.drops)?;
    s.rw_u8(&mut stats.highest_drop_height)?;
    s.rw_u16(&mut stats.total_air_time)?;
    s.rw_i64(&mut stats.upkeep_cost)?;
    s.rw_i32(&mut stats.space_required.x)?;
    s.rw_i32(&mut stats.space_required.y)
}

fn rw_track_element<S: ChunkStream>(s: &mut S, e: &mut TrackDesignTrackElement) -> Result<(), S::Error> {
    s.rw_u16(&mut e.track_type.0)?;
    s.rw_u8(&mut e.flags)?;
    s.rw_u8(&mut e.colour_scheme)?;
    s.rw_u8(&mut e.station_index)?;
    s.rw_u8(&mut e.brake_booster_speed)?;
    s.rw_u8(&mut e.seat_rotation)
}

fn rw_maze_element<S: ChunkStream>(s: &mut S, e: &mut TrackDesignMazeElement) -> Result<(), S::Error> {
    s.rw_i32(&mut e.location.x)?;
    s.rw_i32(&mut e.location.y)?;
    s.rw_u16(&mut e.maze_entry)
}

fn rw_entrance_element<S: ChunkStream>(
    s: &mut S,
    e: &mut TrackDesignEntranceElement,
) -> Result<(), S::Error> {
    s.rw_i32(&mut e.location.x)?;
    s.rw_i32(&mut e.location.y)?;
    s.rw_i32(&mut e.location.z)?;
    s.rw_u8(&mut e.location.direction)?;
    s.rw_bool(&mut e.is_exit)
}

fn rw_scenery_element<S: ChunkStream>(
    s: &mut S,
    e: &mut TrackDesignSceneryElement,
) -> Result<(), S::Error> {
    rw_object_entry(s, &mut e.scenery_object)?;
    s.rw_i32(&mut e.x)?;
    s.rw_i32(&mut e.y)?;
    s.rw_i32(&mut e.z)?;
    s.rw_u8(&mut e.flags)?;
    s.rw_u8(&mut e.primary_colour)?;
    s.rw_u8(&mut e.secondary_colour)?;
    s.rw_u8(&mut e.tertiary_colour)
}

pub fn rw_track_elements<S: ChunkStream>(s: &mut S, td: &mut TrackDesign) -> Result<(), S::Error> {
    s.rw_vec(&mut td.track_elements, TD6_MAX_TRACK_ELEMENTS, rw_track_element)?;
    s.rw_vec(&mut td.maze_elements, MAX_MAZE_ELEMENTS, rw_maze_element)?;
    s.rw_vec(&mut td.entrance_elements, ORCA_MAX_ENTRANCES, rw_entrance_element)?;
    s.rw_vec(&mut td.scenery_elements, ORCA_MAX_SCENERY, rw_scenery_element)
}
