//! Ride entrances and exits.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::config::{ENTRANCE_CLEARANCE, MAX_STATIONS, MAX_TRACK_HEIGHT};
use crate::context::ParkContext;
use crate::coords::{direction_valid, CoordsXY, CoordsXYZ, Direction};
use crate::footpath;
use crate::ride::RideId;
use crate::tile_map::{
    can_construct_with_clear_at, clear_removable_scenery, ClearanceRange, EntranceElement,
    TileElement, TileElementKind, GROUND_UNDERWATER, QUARTER_TILE_FULL,
};

use super::{
    check_capacity, check_location, check_not_paused, ActionFlags, ActionMessage, ActionResult,
    ActionStatus, GameAction,
};

const TITLE: ActionMessage = ActionMessage::CantBuildThisHere;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct RideEntranceExitPlaceAction {
    pub loc: CoordsXY,
    pub direction: Direction,
    pub ride: RideId,
    pub station_index: u8,
    pub is_exit: bool,
    pub flags: ActionFlags,
}

/// Clearance, water and height checks for an entrance at `loc`, without a
/// ride or station. Used to test whether a design's entrances would fit.
pub fn track_place_query(ctx: &ParkContext, loc: CoordsXYZ, _is_exit: bool) -> ActionResult {
    if let Err(result) = check_location(ctx, loc, TITLE) {
        return result;
    }
    entrance_clearance(ctx, loc).unwrap_or_else(|e| e)
}

fn entrance_clearance(ctx: &ParkContext, loc: CoordsXYZ) -> Result<ActionResult, ActionResult> {
    let range = ClearanceRange::new(loc.xy(), loc.z, loc.z + ENTRANCE_CLEARANCE);
    let outcome = can_construct_with_clear_at(
        ctx.map,
        ctx.objects,
        range,
        QUARTER_TILE_FULL,
        ctx.cheats.disable_clearance_checks,
    )
    .map_err(|obstruction| ActionResult::no_clearance(TITLE, obstruction))?;
    if outcome.ground_flags & GROUND_UNDERWATER != 0 {
        return Err(ActionResult::error(
            ActionStatus::Disallowed,
            TITLE,
            ActionMessage::CantBuildThisUnderwater,
        ));
    }
    if loc.z > MAX_TRACK_HEIGHT {
        return Err(ActionResult::error(
            ActionStatus::InvalidParameters,
            TITLE,
            ActionMessage::TooHigh,
        ));
    }
    Ok(ActionResult::ok().with_cost(outcome.cost).at(loc))
}

impl RideEntranceExitPlaceAction {
    fn validate(&self, ctx: &ParkContext) -> Result<(CoordsXYZ, ActionResult), ActionResult> {
        let invalid = |detail| ActionResult::error(ActionStatus::InvalidParameters, TITLE, detail);
        let Some(ride) = ctx.rides.get(self.ride) else {
            return Err(invalid(ActionMessage::RideNotFound));
        };
        if usize::from(self.station_index) >= MAX_STATIONS {
            return Err(invalid(ActionMessage::InvalidStation));
        }
        if !direction_valid(self.direction) {
            return Err(invalid(ActionMessage::InvalidDirection));
        }
        check_not_paused(self.flags, ctx, TITLE)?;
        let Some(start) = ride.stations[usize::from(self.station_index)].start else {
            return Err(invalid(ActionMessage::InvalidStation));
        };
        let loc = self.loc.with_z(start.z);
        check_location(ctx, loc, TITLE)?;
        check_capacity(ctx, 1, TITLE)?;
        let result = entrance_clearance(ctx, loc)?;
        Ok((loc, result))
    }

    fn is_own_element(&self, element: &TileElement) -> bool {
        element.as_entrance().is_some_and(|e| {
            e.ride == self.ride && e.station_index == self.station_index && e.is_exit == self.is_exit
        })
    }
}

impl GameAction for RideEntranceExitPlaceAction {
    fn flags(&self) -> ActionFlags {
        self.flags
    }

    fn query(&self, ctx: &ParkContext) -> ActionResult {
        match self.validate(ctx) {
            Ok((_, result)) => result,
            Err(result) => result,
        }
    }

    fn execute(&self, ctx: &mut ParkContext) -> ActionResult {
        let (loc, result) = match self.validate(ctx) {
            Ok(found) => found,
            Err(result) => return result,
        };
        let ghost = self.flags.is_ghost();
        let index = usize::from(self.station_index);

        let previous = ctx.rides.get(self.ride).and_then(|ride| {
            let station = &ride.stations[index];
            if self.is_exit {
                station.exit
            } else {
                station.entrance
            }
        });
        if let Some(old) = previous {
            ctx.map
                .remove_where(old.xy(), |e| e.base_z == old.z && self.is_own_element(e));
        }

        let range = ClearanceRange::new(loc.xy(), loc.z, loc.z + ENTRANCE_CLEARANCE);
        if !ghost {
            clear_removable_scenery(ctx.map, ctx.objects, range, QUARTER_TILE_FULL);
        }
        let mut element = TileElement::new(
            loc.z,
            loc.z + ENTRANCE_CLEARANCE,
            QUARTER_TILE_FULL,
            TileElementKind::Entrance(EntranceElement {
                direction: self.direction,
                is_exit: self.is_exit,
                ride: self.ride,
                station_index: self.station_index,
            }),
        );
        element.ghost = ghost;
        if ctx.map.insert(loc.xy(), element).is_none() {
            return ActionResult::error(
                ActionStatus::NoFreeElements,
                TITLE,
                ActionMessage::TileElementLimitReached,
            );
        }

        if let Some(ride) = ctx.rides.get_mut(self.ride) {
            let station = &mut ride.stations[index];
            let placed = Some(loc.with_direction(self.direction));
            if self.is_exit {
                station.exit = placed;
            } else {
                station.entrance = placed;
            }
        }
        if !ghost {
            footpath::connect_entrance(ctx.map, loc, self.direction);
        }
        result
    }
}
