//! Footpaths laid as part of a track design, and their removal.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::config::{FOOTPATH_CLEARANCE, LAND_HEIGHT_STEP};
use crate::context::ParkContext;
use crate::coords::{CoordsXYZ, Direction};
use crate::footpath;
use crate::objects::{ObjectIndex, ObjectKind};
use crate::tile_map::{
    can_construct_with_clear_at, clear_removable_scenery, ClearanceRange, PathElement,
    TileElement, TileElementKind, GROUND_UNDERWATER, QUARTER_TILE_FULL,
};

use super::{
    check_capacity, check_location, check_not_paused, ActionFlags, ActionMessage, ActionResult,
    ActionStatus, GameAction,
};

const TITLE: ActionMessage = ActionMessage::CantBuildThisHere;

/// Places a path with its edges given up front instead of auto-connecting;
/// the design records exactly which sides were joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct FootpathPlaceFromTrackAction {
    pub loc: CoordsXYZ,
    pub is_sloped: bool,
    pub slope_direction: Direction,
    pub surface: ObjectIndex,
    pub edges: u8,
    pub is_queue: bool,
    pub flags: ActionFlags,
}

impl FootpathPlaceFromTrackAction {
    fn range(&self) -> ClearanceRange {
        let mut clearance_z = self.loc.z + FOOTPATH_CLEARANCE;
        if self.is_sloped {
            clearance_z += LAND_HEIGHT_STEP;
        }
        ClearanceRange::new(self.loc.xy(), self.loc.z, clearance_z)
    }

    fn validate(&self, ctx: &ParkContext) -> Result<ActionResult, ActionResult> {
        let price = match ctx.objects.get(self.surface).map(|o| &o.kind) {
            Some(ObjectKind::Footpath { price }) => *price,
            _ => {
                return Err(ActionResult::error(
                    ActionStatus::InvalidParameters,
                    TITLE,
                    ActionMessage::ObjectNotFound,
                ))
            }
        };
        check_not_paused(self.flags, ctx, TITLE)?;
        check_location(ctx, self.loc, TITLE)?;
        check_capacity(ctx, 1, TITLE)?;
        let outcome = can_construct_with_clear_at(
            ctx.map,
            ctx.objects,
            self.range(),
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
        Ok(ActionResult::ok()
            .with_cost(price + outcome.cost)
            .at(self.loc))
    }
}

impl GameAction for FootpathPlaceFromTrackAction {
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
        let range = self.range();
        let ghost = self.flags.is_ghost();
        if !ghost {
            clear_removable_scenery(ctx.map, ctx.objects, range, QUARTER_TILE_FULL);
        }
        let mut element = TileElement::new(
            range.base_z,
            range.clearance_z,
            QUARTER_TILE_FULL,
            TileElementKind::Path(PathElement {
                surface: self.surface,
                is_queue: self.is_queue,
                is_sloped: self.is_sloped,
                slope_direction: self.slope_direction & 3,
                edges: self.edges & 0x0F,
                queue_ride: None,
            }),
        );
        element.ghost = ghost;
        if ctx.map.insert(self.loc.xy(), element).is_none() {
            return ActionResult::error(
                ActionStatus::NoFreeElements,
                TITLE,
                ActionMessage::TileElementLimitReached,
            );
        }
        result
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct FootpathRemoveAction {
    pub loc: CoordsXYZ,
    pub flags: ActionFlags,
}

impl FootpathRemoveAction {
    fn validate(&self, ctx: &ParkContext) -> Result<(), ActionResult> {
        check_not_paused(self.flags, ctx, ActionMessage::CantRemoveThis)?;
        let found = ctx
            .map
            .footpath_at(self.loc)
            .is_some_and(|e| !self.flags.is_ghost() || e.ghost);
        if !found {
            return Err(ActionResult::error(
                ActionStatus::InvalidParameters,
                ActionMessage::CantRemoveThis,
                ActionMessage::ElementNotFound,
            ));
        }
        Ok(())
    }
}

impl GameAction for FootpathRemoveAction {
    fn flags(&self) -> ActionFlags {
        self.flags
    }

    fn query(&self, ctx: &ParkContext) -> ActionResult {
        match self.validate(ctx) {
            Ok(()) => ActionResult::ok().at(self.loc),
            Err(result) => result,
        }
    }

    fn execute(&self, ctx: &mut ParkContext) -> ActionResult {
        if let Err(result) = self.validate(ctx) {
            return result;
        }
        footpath::remove_edges_at(ctx.map, self.loc);
        let z = self.loc.z;
        ctx.map
            .remove_where(self.loc.xy(), |e| e.base_z == z && e.as_path().is_some());
        ActionResult::ok().at(self.loc)
    }
}
