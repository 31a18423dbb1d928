//! Virtual placement of a track design onto the map.
//!
//! One call walks every track (or maze) element, then the entrances, then
//! the scenery, rotating each from design space into the world and handing
//! it to the matching game action. What happens to each element depends on
//! the [`TrackPlaceOperation`]: outlines only collect selection tiles, the
//! place family runs the sub-actions, `RemoveGhost` tears a ghost down and
//! `GetPlaceZ` measures how far the design must be lifted to clear the
//! terrain.

mod action;
mod entrances;
mod maze;
mod preview;
mod scenery;
mod track;

#[cfg(test)]
mod tests;

use bevy::prelude::*;

use crate::context::{ParkContext, PlacementContext};
use crate::coords::{CoordsXY, CoordsXYZ, CoordsXYZD, Direction};
use crate::footpath;
use crate::game_actions::{ActionFlags, ActionMessage, ActionResult, ActionStatus};
use crate::park::{MAP_SELECT_FLAG_ENABLE_ARROW, MAP_SELECT_FLAG_ENABLE_CONSTRUCT, MAP_SELECT_FLAG_GREEN};
use crate::ride::{demolish_ride, RideId};
use crate::tile_map::TileMap;

use super::TrackDesign;

pub use action::{place_track_design, TrackDesignAction};
pub use preview::{place_preview, space_required, TrackDesignPreview};
pub use scenery::scenery_unavailable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackPlaceOperation {
    /// Select the tiles the design would cover; the map is not touched.
    DrawOutlines,
    /// Validate every element without applying anything.
    PlaceQuery,
    Place,
    PlaceGhost,
    /// Build for real without pause or cash checks, into a scratch map.
    PlaceTrackPreview,
    RemoveGhost,
    /// Measure the lift needed to keep every element above the terrain.
    GetPlaceZ,
}

impl TrackPlaceOperation {
    /// Flags handed to every sub-action issued in this mode.
    pub fn sub_action_flags(self) -> ActionFlags {
        match self {
            Self::Place => ActionFlags::APPLY | ActionFlags::NO_SPEND | ActionFlags::TRACK_DESIGN,
            Self::PlaceGhost | Self::RemoveGhost => {
                ActionFlags::APPLY
                    | ActionFlags::ALLOW_DURING_PAUSED
                    | ActionFlags::NO_SPEND
                    | ActionFlags::GHOST
            }
            Self::PlaceTrackPreview => {
                ActionFlags::APPLY | ActionFlags::ALLOW_DURING_PAUSED | ActionFlags::NO_SPEND
            }
            Self::DrawOutlines | Self::PlaceQuery | Self::GetPlaceZ => ActionFlags::NONE,
        }
    }

    /// The modes that issue place sub-actions.
    pub fn is_place_family(self) -> bool {
        matches!(
            self,
            Self::PlaceQuery | Self::Place | Self::PlaceGhost | Self::PlaceTrackPreview
        )
    }
}

/// Bookkeeping for one placement call. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackDesignState {
    pub preview_min: CoordsXYZ,
    pub preview_max: CoordsXYZ,
    pub origin: CoordsXYZ,
    pub operation: TrackPlaceOperation,
    pub place_z: i32,
    pub place_scenery_z: i32,
    pub entrance_exit_placed: bool,
    pub has_scenery: bool,
    pub place_scenery: bool,
    pub scenery_unavailable: bool,
}

impl TrackDesignState {
    pub fn new(operation: TrackPlaceOperation, place_scenery: bool, origin: CoordsXYZ) -> Self {
        Self {
            preview_min: origin,
            preview_max: origin,
            origin,
            operation,
            place_z: 0,
            place_scenery_z: 0,
            entrance_exit_placed: false,
            has_scenery: false,
            place_scenery,
            scenery_unavailable: false,
        }
    }

    fn update_bounds(&mut self, loc: CoordsXYZ) {
        self.preview_min.x = self.preview_min.x.min(loc.x);
        self.preview_min.y = self.preview_min.y.min(loc.y);
        self.preview_min.z = self.preview_min.z.min(loc.z);
        self.preview_max.x = self.preview_max.x.max(loc.x);
        self.preview_max.y = self.preview_max.y.max(loc.y);
        self.preview_max.z = self.preview_max.z.max(loc.z);
    }

    /// Height adjustment measured by a `GetPlaceZ` pass.
    pub fn place_z_result(&self) -> i32 {
        self.place_z - self.place_scenery_z
    }
}

/// Place `td` for `ride` at `origin` in the given mode.
///
/// The placement context (ride and rotation) is swapped in for the call and
/// restored afterwards. The returned result carries the total cost, or the
/// first failing sub-action's result.
pub fn place_virtual(
    ctx: &mut ParkContext,
    td: &TrackDesign,
    operation: TrackPlaceOperation,
    place_scenery: bool,
    ride: RideId,
    origin: CoordsXYZD,
) -> (TrackDesignState, ActionResult) {
    let placement = PlacementContext {
        current_ride: Some(ride),
        current_direction: origin.direction & 3,
        drawing_preview: ctx.placement.drawing_preview,
    };
    let mut scope = ctx.scoped(placement);
    let ctx: &mut ParkContext = &mut scope;

    let mut state = TrackDesignState::new(operation, place_scenery, origin.xyz());
    let outcome = place_elements(ctx, td, &mut state);

    if operation == TrackPlaceOperation::RemoveGhost {
        demolish_ride(ctx, ride);
    }

    let cost = match outcome {
        Ok(cost) => cost,
        Err(result) => {
            debug!(
                "Track design placement ({:?}) failed: {}",
                operation, result
            );
            return (state, result);
        }
    };

    match operation {
        TrackPlaceOperation::DrawOutlines => {
            ctx.selection.flags |= MAP_SELECT_FLAG_ENABLE_CONSTRUCT | MAP_SELECT_FLAG_ENABLE_ARROW;
            ctx.selection.flags &= !MAP_SELECT_FLAG_GREEN;
        }
        TrackPlaceOperation::Place | TrackPlaceOperation::PlaceTrackPreview => {
            if let Some(built) = ctx.rides.get(ride) {
                footpath::chain_queues(ctx.map, built);
            }
        }
        _ => {}
    }

    (state, ActionResult::ok().with_cost(cost))
}

fn place_elements(
    ctx: &mut ParkContext,
    td: &TrackDesign,
    state: &mut TrackDesignState,
) -> Result<i64, ActionResult> {
    let mut cost = if td.is_maze() {
        maze::place_maze(ctx, td, state)?
    } else {
        track::place_track(ctx, td, state)?
    };
    cost += entrances::place_entrances(ctx, td, state)?;
    cost += scenery::place_all_scenery(ctx, td, state);
    Ok(cost)
}

/// Height the design must be raised by so that no element sits below the
/// terrain or water at `origin`.
pub fn get_place_z(ctx: &mut ParkContext, td: &TrackDesign, ride: RideId, origin: CoordsXYZD) -> i32 {
    let (state, _) = place_virtual(ctx, td, TrackPlaceOperation::GetPlaceZ, true, ride, origin);
    state.place_z_result()
}

/// Base height for placing `td` at `loc`: the terrain there plus the lift
/// measured by [`get_place_z`].
pub fn design_base_z(
    ctx: &mut ParkContext,
    td: &TrackDesign,
    ride: RideId,
    loc: CoordsXY,
    direction: Direction,
) -> Option<i32> {
    let height = surface_height(ctx.map, loc)?;
    let origin = CoordsXYZD::new(loc.x, loc.y, height, direction);
    Some(height + get_place_z(ctx, td, ride, origin))
}

/// Top of the terrain at `loc`, or the water surface when it is higher.
pub(crate) fn surface_height(map: &TileMap, loc: CoordsXY) -> Option<i32> {
    let (element, surface) = map.surface_at(loc)?;
    Some(surface.highest_point(element.base_z).max(surface.water_height))
}

/// The ride the current placement builds for.
fn placement_ride(ctx: &ParkContext) -> Result<RideId, ActionResult> {
    ctx.placement.current_ride.ok_or_else(|| {
        ActionResult::error(
            ActionStatus::InvalidParameters,
            ActionMessage::CantBuildThisHere,
            ActionMessage::RideNotFound,
        )
    })
}

/// Raise `place_z` so that a point at `z` clears the terrain at `loc`.
/// Off-map points are ignored.
fn raise_above_surface(map: &TileMap, state: &mut TrackDesignState, loc: CoordsXY, z: i32) {
    if !map.is_location_valid(loc) {
        return;
    }
    let Some(height) = surface_height(map, loc) else {
        return;
    };
    let difference = z + state.place_z - height;
    if difference < 0 {
        state.place_z -= difference;
    }
}
