use crate::context::ParkContext;
use crate::coords::COORDS_DIRECTION_DELTA;
use crate::game_actions::entrance_place::track_place_query;
use crate::game_actions::{run_nested, ActionResult, RideEntranceExitPlaceAction};
use crate::track_design::TrackDesign;

use super::{placement_ride, TrackDesignState, TrackPlaceOperation};

/// Entrances and exits, after the track they attach to. Each one faces the
/// station tile in front of it; when no track of the ride is there the
/// element is skipped.
pub(super) fn place_entrances(
    ctx: &mut ParkContext,
    td: &TrackDesign,
    state: &mut TrackDesignState,
) -> Result<i64, ActionResult> {
    let ride = placement_ride(ctx)?;
    let rotation = ctx.placement.current_direction & 3;
    let origin = state.origin;
    let operation = state.operation;

    let mut cost = 0;
    for entrance in &td.entrance_elements {
        let loc = origin.xy() + entrance.location.to_coords_xy().rotate(rotation);
        let z = origin.z + entrance.location.z_to_world();
        state.update_bounds(loc.with_z(origin.z));

        match operation {
            TrackPlaceOperation::DrawOutlines => ctx.selection.add_tile(loc),
            TrackPlaceOperation::PlaceQuery => {
                let result = track_place_query(ctx, loc.with_z(z), entrance.is_exit);
                if !result.is_ok() {
                    return Err(result);
                }
                cost += result.cost;
                state.entrance_exit_placed = true;
            }
            TrackPlaceOperation::Place
            | TrackPlaceOperation::PlaceGhost
            | TrackPlaceOperation::PlaceTrackPreview => {
                let direction = (rotation + entrance.location.direction) & 3;
                let station_loc = loc + COORDS_DIRECTION_DELTA[usize::from(direction)];
                let Some(station_index) = ctx
                    .map
                    .track_at(station_loc.with_z(z), ride)
                    .and_then(|e| e.as_track())
                    .map(|t| t.station_index)
                else {
                    continue;
                };
                let action = RideEntranceExitPlaceAction {
                    loc,
                    direction,
                    ride,
                    station_index,
                    is_exit: entrance.is_exit,
                    flags: operation.sub_action_flags(),
                };
                let result = run_nested(&action, ctx);
                if !result.is_ok() {
                    return Err(result);
                }
                cost += result.cost;
                state.entrance_exit_placed = true;
            }
            TrackPlaceOperation::RemoveGhost | TrackPlaceOperation::GetPlaceZ => {}
        }
    }
    Ok(cost)
}
