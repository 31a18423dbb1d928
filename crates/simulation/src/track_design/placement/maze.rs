use crate::context::ParkContext;
use crate::coords::rol16;
use crate::game_actions::{run_nested, ActionResult, MazePlaceTrackAction};
use crate::track_design::TrackDesign;

use super::{placement_ride, raise_above_surface, surface_height, TrackDesignState, TrackPlaceOperation};

/// Hedge tiles are a single element each; the wall bits rotate with the
/// design, four bits per quarter turn.
pub(super) fn place_maze(
    ctx: &mut ParkContext,
    td: &TrackDesign,
    state: &mut TrackDesignState,
) -> Result<i64, ActionResult> {
    let ride = placement_ride(ctx)?;
    let rotation = ctx.placement.current_direction & 3;
    let origin = state.origin;
    let operation = state.operation;

    if operation == TrackPlaceOperation::DrawOutlines {
        ctx.selection.clear();
        let arrow_z = surface_height(ctx.map, origin.xy()).unwrap_or(origin.z);
        ctx.selection.arrow_position = Some(origin.xy().with_z(arrow_z));
        ctx.selection.arrow_direction = ctx.placement.current_direction;
    }

    state.place_z = 0;
    let mut cost = 0;
    for element in &td.maze_elements {
        let loc = origin.xy() + element.location.to_coords().rotate(rotation);
        state.update_bounds(loc.with_z(origin.z));

        match operation {
            TrackPlaceOperation::DrawOutlines => ctx.selection.add_tile(loc),
            TrackPlaceOperation::GetPlaceZ => raise_above_surface(ctx.map, state, loc, origin.z),
            // The ride is demolished wholesale once every element is visited.
            TrackPlaceOperation::RemoveGhost => {}
            _ => {
                let action = MazePlaceTrackAction {
                    loc: loc.with_z(origin.z),
                    ride,
                    maze_entry: rol16(element.maze_entry, u32::from(rotation) * 4),
                    flags: operation.sub_action_flags(),
                };
                let result = run_nested(&action, ctx);
                if !result.is_ok() {
                    return Err(result);
                }
                cost += result.cost;
            }
        }
    }
    Ok(cost)
}
