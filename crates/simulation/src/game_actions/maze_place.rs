//! Placing one hedge tile of a maze.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::config::{COORDS_XY_STEP, COORDS_Z_PER_TINY_Z, MAZE_CLEARANCE};
use crate::context::ParkContext;
use crate::coords::CoordsXYZ;
use crate::ride::RideId;
use crate::tile_map::{
    can_construct_with_clear_at, clear_removable_scenery, ClearanceRange, TileElement,
    TileElementKind, TrackElement, GROUND_UNDERGROUND, GROUND_UNDERWATER, QUARTER_TILE_FULL,
};
use crate::track_data::TrackElemType;

use super::scenery::remove_intersecting_walls;
use super::{
    check_capacity, check_location, check_not_paused, ActionFlags, ActionMessage, ActionResult,
    ActionStatus, GameAction,
};

const TITLE: ActionMessage = ActionMessage::CantBuildThisHere;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct MazePlaceTrackAction {
    pub loc: CoordsXYZ,
    pub ride: RideId,
    /// Hedge wall bits, already rotated into world orientation.
    pub maze_entry: u16,
    pub flags: ActionFlags,
}

impl MazePlaceTrackAction {
    fn validate(&self, ctx: &ParkContext) -> Result<ActionResult, ActionResult> {
        let invalid = |detail| ActionResult::error(ActionStatus::InvalidParameters, TITLE, detail);
        let disallowed = |detail| ActionResult::error(ActionStatus::Disallowed, TITLE, detail);

        let Some(ride) = ctx.rides.get(self.ride) else {
            return Err(invalid(ActionMessage::RideNotFound));
        };
        let Some(rtd) = ride.descriptor() else {
            return Err(invalid(ActionMessage::InvalidRideType));
        };
        check_capacity(ctx, 1, TITLE)?;
        if self.loc.x % COORDS_XY_STEP != 0 || self.loc.y % COORDS_XY_STEP != 0 {
            return Err(invalid(ActionMessage::InvalidHeight));
        }
        if self.loc.z & 0x0F != 0 {
            return Err(invalid(ActionMessage::InvalidHeight));
        }
        check_not_paused(self.flags, ctx, TITLE)?;
        check_location(ctx, self.loc, TITLE)?;

        let Some((surface, _)) = ctx.map.surface_at(self.loc.xy()) else {
            return Err(ActionResult::error(
                ActionStatus::Unknown,
                TITLE,
                ActionMessage::SurfaceNotFound,
            ));
        };
        let clearance_z = self.loc.z + MAZE_CLEARANCE;
        if !ctx.cheats.disable_support_limits {
            let height = (clearance_z - surface.base_z) / COORDS_Z_PER_TINY_Z;
            if height > rtd.max_height {
                return Err(disallowed(ActionMessage::TooHighForSupports));
            }
        }

        let range = ClearanceRange::new(self.loc.xy(), self.loc.z, clearance_z);
        let outcome = can_construct_with_clear_at(
            ctx.map,
            ctx.objects,
            range,
            QUARTER_TILE_FULL,
            ctx.cheats.disable_clearance_checks,
        )
        .map_err(|obstruction| ActionResult::no_clearance(TITLE, obstruction))?;
        if outcome.ground_flags & GROUND_UNDERWATER != 0 {
            return Err(disallowed(ActionMessage::CantBuildThisUnderwater));
        }
        if outcome.ground_flags & GROUND_UNDERGROUND != 0 {
            return Err(disallowed(ActionMessage::CanOnlyBuildThisAboveGround));
        }

        let mut cost = outcome.cost;
        if !ctx.settings.no_money {
            let modifier = TrackElemType::MAZE
                .descriptor()
                .map_or(0, |d| d.price_modifier);
            cost += ((rtd.track_price * modifier) >> 17) * 10;
        }
        Ok(ActionResult::ok()
            .with_cost(cost)
            .at(CoordsXYZ::new(self.loc.x + 8, self.loc.y + 8, self.loc.z)))
    }
}

impl GameAction for MazePlaceTrackAction {
    fn flags(&self) -> ActionFlags {
        self.flags
    }

    fn query(&self, ctx: &ParkContext) -> ActionResult {
        self.validate(ctx).unwrap_or_else(|e| e)
    }

    fn execute(&self, ctx: &mut ParkContext) -> ActionResult {
        let result = match self.validate(ctx) {
            Ok(result) => result,
            Err(result) => return result,
        };
        let ghost = self.flags.is_ghost();
        let clearance_z = self.loc.z + MAZE_CLEARANCE;
        let range = ClearanceRange::new(self.loc.xy(), self.loc.z, clearance_z);
        if !ghost {
            clear_removable_scenery(ctx.map, ctx.objects, range, QUARTER_TILE_FULL);
            remove_intersecting_walls(ctx.map, range, 0x0F);
        }

        let Some(ride) = ctx.rides.get(self.ride) else {
            return ActionResult::error(ActionStatus::InvalidParameters, TITLE, ActionMessage::RideNotFound);
        };
        let mut track = TrackElement::new(TrackElemType::MAZE, 0, self.ride, ride.ride_type);
        track.maze_entry = self.maze_entry;
        let mut element = TileElement::new(
            self.loc.z,
            clearance_z,
            QUARTER_TILE_FULL,
            TileElementKind::Track(track),
        );
        element.ghost = ghost;
        if ctx.map.insert(self.loc.xy(), element).is_none() {
            return ActionResult::error(
                ActionStatus::NoFreeElements,
                TITLE,
                ActionMessage::TileElementLimitReached,
            );
        }

        if let Some(ride) = ctx.rides.get_mut(self.ride) {
            ride.maze_tiles += 1;
            let station = &mut ride.stations[0];
            if station.start.is_none() {
                station.start = Some(self.loc);
                station.length = 0;
            }
            if ride.overall_view.is_none() {
                ride.overall_view = Some(self.loc.xy());
            }
        }
        result
    }
}
