use bevy::prelude::*;

use crate::context::ParkContext;
use crate::coords::{CoordsXY, CoordsXYZD};
use crate::game_actions::track_place::{TRACK_PLACE_INVERTED, TRACK_PLACE_LIFT_HILL};
use crate::game_actions::{
    execute_nested, run_nested, ActionMessage, ActionResult, ActionStatus, TrackPlaceAction,
    TrackRemoveAction,
};
use crate::track_data::TrackCursor;
use crate::track_design::{
    TrackDesign, TrackDesignTrackElement, TRACK_ELEMENT_FLAG_CHAIN_LIFT, TRACK_ELEMENT_FLAG_INVERTED,
};

use super::{placement_ride, raise_above_surface, surface_height, TrackDesignState, TrackPlaceOperation};

fn place_flags(element: &TrackDesignTrackElement) -> u8 {
    let mut flags = 0;
    if element.has_flag(TRACK_ELEMENT_FLAG_CHAIN_LIFT) {
        flags |= TRACK_PLACE_LIFT_HILL;
    }
    if element.has_flag(TRACK_ELEMENT_FLAG_INVERTED) {
        flags |= TRACK_PLACE_INVERTED;
    }
    flags
}

pub(super) fn place_track(
    ctx: &mut ParkContext,
    td: &TrackDesign,
    state: &mut TrackDesignState,
) -> Result<i64, ActionResult> {
    let ride = placement_ride(ctx)?;
    let direction = ctx.placement.current_direction;
    let origin = state.origin;
    let operation = state.operation;
    let flags = operation.sub_action_flags();

    if operation == TrackPlaceOperation::DrawOutlines {
        ctx.selection.clear();
        let arrow_z = surface_height(ctx.map, origin.xy()).unwrap_or(origin.z);
        ctx.selection.arrow_position = Some(origin.xy().with_z(arrow_z));
        ctx.selection.arrow_direction = direction;
    }

    state.place_z = 0;
    let mut cost = 0;
    let mut cursor = TrackCursor {
        pos: origin.xy(),
        z: origin.z,
        rotation: direction,
    };

    for element in &td.track_elements {
        let Some(ted) = element.track_type.descriptor() else {
            warn!("Unknown track piece {:?} in design {}", element.track_type, td.name);
            return Err(ActionResult::error(
                ActionStatus::InvalidParameters,
                ActionMessage::CantBuildThisHere,
                ActionMessage::InvalidTrackType,
            ));
        };
        let rotation = cursor.rotation & 3;
        let (piece_xy, piece_z) = cursor.piece_origin(&ted.coordinates);
        let block_loc = |offset: CoordsXY| piece_xy + offset.rotate(rotation);

        for block in ted.blocks {
            state.update_bounds(block_loc(block.offset()).with_z(piece_z + block.z));
        }

        match operation {
            TrackPlaceOperation::DrawOutlines => {
                for block in ted.blocks {
                    ctx.selection.add_tile(block_loc(block.offset()));
                }
            }
            TrackPlaceOperation::RemoveGhost => {
                let block_z = ted.block(0).map_or(0, |b| b.z);
                let action = TrackRemoveAction::new(
                    element.track_type,
                    0,
                    CoordsXYZD::new(piece_xy.x, piece_xy.y, piece_z + block_z, rotation),
                )
                .with_flags(flags);
                execute_nested(&action, ctx);
            }
            TrackPlaceOperation::GetPlaceZ => {
                for block in ted.blocks {
                    raise_above_surface(ctx.map, state, block_loc(block.offset()), piece_z + block.z);
                }
            }
            _ => {
                let mut action = TrackPlaceAction::new(
                    ride,
                    element.track_type,
                    td.ride_type(),
                    CoordsXYZD::new(piece_xy.x, piece_xy.y, piece_z, rotation),
                )
                .with_flags(flags);
                action.brake_speed = element.brake_booster_speed;
                action.colour = element.colour_scheme;
                action.seat_rotation = element.seat_rotation;
                action.place_flags = place_flags(element);
                action.from_track_design = true;

                let result = run_nested(&action, ctx);
                if !result.is_ok() {
                    return Err(result);
                }
                cost += result.cost;
            }
        }

        cursor.advance(&ted.coordinates);
    }

    Ok(cost)
}
