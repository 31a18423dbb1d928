//! Write a design in the second-game fixed layout.
//!
//! Quantities the format stores in coarser units are rounded and clamped to
//! the field range. Anything that cannot be represented at all (track types
//! past the byte range, offsets outside the stored width) fails the export
//! rather than writing a design that would load differently.

use bevy::prelude::*;
use park_sim::config::TD6_MAX_TRACK_ELEMENTS;
use park_sim::track_design::TrackDesign;

use crate::config::{
    TD46_ENTRANCE_EXIT_BIT, TD46_MAZE_ENTRANCE, TD46_MAZE_EXIT, TD46_TRACK_TERMINATOR,
    TD46_VERSION_TD6, TD6_HEADER_SIZE,
};
use crate::error::TrackExportError;
use crate::sawyer::SawyerChunkWriter;

use super::{
    air_time_to_legacy, convert_to_td46_flags, fixed_to_legacy, g_force_to_legacy,
    inversions_or_holes, legacy_ride_type, rating_to_legacy, station_style,
};

const TD6_NUM_VEHICLE_COLOURS: usize = 32;

/// Encode `td` as a complete TD6 file (run-length payload and checksum).
pub fn export_td6(td: &TrackDesign) -> Result<Vec<u8>, TrackExportError> {
    let data = encode_td6(td)?;
    let mut writer = SawyerChunkWriter::new();
    writer.write_track_chunk(&data);
    info!(
        "Exported TD6 design '{}' ({} bytes decoded)",
        td.name,
        data.len()
    );
    Ok(writer.into_bytes())
}

/// The decoded TD6 bytes for `td`.
pub fn encode_td6(td: &TrackDesign) -> Result<Vec<u8>, TrackExportError> {
    if td.track_elements.len() > TD6_MAX_TRACK_ELEMENTS {
        return Err(TrackExportError::TooManyElements);
    }

    let mut out = Vec::with_capacity(TD6_HEADER_SIZE + td.track_elements.len() * 2);
    write_header(&mut out, td);
    debug_assert_eq!(out.len(), TD6_HEADER_SIZE);

    if td.is_maze() {
        write_maze_elements(&mut out, td)?;
    } else {
        write_track_elements(&mut out, td)?;
        write_entrance_elements(&mut out, td)?;
    }
    write_scenery_elements(&mut out, td)?;
    Ok(out)
}

fn write_header(out: &mut Vec<u8>, td: &TrackDesign) {
    let stats = &td.statistics;
    let appearance = &td.appearance;
    let colour = |i: usize| appearance.vehicle_colours.get(i).copied().unwrap_or_default();

    out.push(legacy_ride_type(td.ride_type()).0);
    out.push(0); // vehicle type, resolved from the object entry on load
    out.extend_from_slice(&0u32.to_le_bytes());
    out.push(td.operation.ride_mode as u8);
    out.push((appearance.vehicle_colour_settings & 3) | (TD46_VERSION_TD6 << 2));
    for i in 0..TD6_NUM_VEHICLE_COLOURS {
        let c = colour(i);
        out.push(c.body);
        out.push(c.trim);
    }
    out.push(0);
    out.push(station_style(&appearance.station_object_identifier));
    out.push(air_time_to_legacy(stats.total_air_time));

    out.push(td.operation.depart_flags);
    out.push(td.track_and_vehicle.num_trains);
    out.push(td.track_and_vehicle.cars_per_train);
    out.push(td.operation.min_waiting_time);
    out.push(td.operation.max_waiting_time);
    out.push(td.operation.operation_setting);

    out.push(fixed_to_legacy(stats.max_speed, i32::from(i8::MIN), i32::from(i8::MAX)) as i8 as u8);
    out.push(fixed_to_legacy(stats.average_speed, i32::from(i8::MIN), i32::from(i8::MAX)) as i8 as u8);
    let length = fixed_to_legacy(stats.ride_length, 0, i32::from(u16::MAX)) as u16;
    out.extend_from_slice(&length.to_le_bytes());
    out.push(g_force_to_legacy(stats.max_positive_vertical_g, 0, i32::from(u8::MAX)) as u8);
    out.push(
        g_force_to_legacy(stats.max_negative_vertical_g, i32::from(i8::MIN), i32::from(i8::MAX)) as i8
            as u8,
    );
    out.push(g_force_to_legacy(stats.max_lateral_g, 0, i32::from(u8::MAX)) as u8);
    out.push(inversions_or_holes(td));
    out.push(stats.drops);
    out.push(stats.highest_drop_height);
    out.push(rating_to_legacy(stats.ratings.excitement));
    out.push(rating_to_legacy(stats.ratings.intensity));
    out.push(rating_to_legacy(stats.ratings.nausea));
    let upkeep = stats.upkeep_cost.clamp(i64::from(i16::MIN), i64::from(i16::MAX)) as i16;
    out.extend_from_slice(&upkeep.to_le_bytes());

    out.extend(appearance.track_colours.iter().map(|c| c.main));
    out.extend(appearance.track_colours.iter().map(|c| c.additional));
    out.extend(appearance.track_colours.iter().map(|c| c.supports));
    out.extend_from_slice(&0u32.to_le_bytes());

    let vehicle = &td.track_and_vehicle.vehicle_object;
    out.extend_from_slice(&vehicle.flags.to_le_bytes());
    out.extend_from_slice(&vehicle.name_bytes());
    out.extend_from_slice(&vehicle.checksum.to_le_bytes());

    out.push(stats.space_required.x.clamp(0, i32::from(u8::MAX)) as u8);
    out.push(stats.space_required.y.clamp(0, i32::from(u8::MAX)) as u8);
    for i in 0..TD6_NUM_VEHICLE_COLOURS {
        out.push(colour(i).tertiary);
    }
    out.push(td.lift_hill_speed_num_circuits());
}

fn to_i8(value: i32) -> Result<u8, TrackExportError> {
    i8::try_from(value)
        .map(|v| v as u8)
        .map_err(|_| TrackExportError::PositionOutOfRange)
}

fn to_i16(value: i32) -> Result<[u8; 2], TrackExportError> {
    i16::try_from(value)
        .map(i16::to_le_bytes)
        .map_err(|_| TrackExportError::PositionOutOfRange)
}

fn write_maze_elements(out: &mut Vec<u8>, td: &TrackDesign) -> Result<(), TrackExportError> {
    for maze in &td.maze_elements {
        out.push(to_i8(maze.location.x)?);
        out.push(to_i8(maze.location.y)?);
        out.extend_from_slice(&maze.maze_entry.to_le_bytes());
    }
    for entrance in &td.entrance_elements {
        let kind = if entrance.is_exit {
            TD46_MAZE_EXIT
        } else {
            TD46_MAZE_ENTRANCE
        };
        out.push(to_i8(entrance.location.x)?);
        out.push(to_i8(entrance.location.y)?);
        out.push(entrance.location.direction & 3);
        out.push(kind);
    }
    out.extend_from_slice(&[0; 4]);
    Ok(())
}

fn write_track_elements(out: &mut Vec<u8>, td: &TrackDesign) -> Result<(), TrackExportError> {
    for element in &td.track_elements {
        let track_type = element.track_type.0;
        let byte = u8::try_from(track_type)
            .ok()
            .filter(|&b| b != TD46_TRACK_TERMINATOR)
            .ok_or(TrackExportError::UnsupportedTrackType(track_type))?;
        out.push(byte);
        out.push(convert_to_td46_flags(element));
    }
    out.push(TD46_TRACK_TERMINATOR);
    Ok(())
}

fn write_entrance_elements(out: &mut Vec<u8>, td: &TrackDesign) -> Result<(), TrackExportError> {
    for entrance in &td.entrance_elements {
        let z = to_i8(entrance.location.z)?;
        if z == 0xFF {
            // -1 terminates the list.
            return Err(TrackExportError::PositionOutOfRange);
        }
        let mut direction = entrance.location.direction & 3;
        if entrance.is_exit {
            direction |= TD46_ENTRANCE_EXIT_BIT;
        }
        out.push(z);
        out.push(direction);
        out.extend_from_slice(&to_i16(entrance.location.x * 32)?);
        out.extend_from_slice(&to_i16(entrance.location.y * 32)?);
    }
    out.push(0xFF);
    Ok(())
}

fn write_scenery_elements(out: &mut Vec<u8>, td: &TrackDesign) -> Result<(), TrackExportError> {
    for scenery in &td.scenery_elements {
        let entry = &scenery.scenery_object;
        out.extend_from_slice(&entry.flags.to_le_bytes());
        out.extend_from_slice(&entry.name_bytes());
        out.extend_from_slice(&entry.checksum.to_le_bytes());
        out.push(to_i8(scenery.x)?);
        out.push(to_i8(scenery.y)?);
        out.push(to_i8(scenery.z)?);
        out.push(scenery.flags);
        out.push(scenery.primary_colour);
        out.push(scenery.secondary_colour);
    }
    out.push(0xFF);
    Ok(())
}
