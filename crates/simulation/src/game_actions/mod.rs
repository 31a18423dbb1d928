//! The game-action layer: every world mutation is a two-phase action with a
//! side-effect-free [`GameAction::query`] and a committing
//! [`GameAction::execute`]. Both phases share each action's validation code.

pub mod actions;
pub mod entrance_place;
pub mod executor;
pub mod footpath_place;
pub mod maze_place;
pub mod plugin;
pub mod queue;
pub mod result_log;
pub mod results;
pub mod scenery;
pub mod track_place;
pub mod track_remove;

use std::ops::BitOr;

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::context::ParkContext;

pub use actions::*;
pub use entrance_place::RideEntranceExitPlaceAction;
pub use executor::execute_queued_actions;
pub use footpath_place::{FootpathPlaceFromTrackAction, FootpathRemoveAction};
pub use maze_place::MazePlaceTrackAction;
pub use plugin::GameActionsPlugin;
pub use queue::*;
pub use result_log::{ActionResultLog, LoggedAction};
pub use results::*;
pub use scenery::{
    LargeSceneryPlaceAction, LargeSceneryRemoveAction, SmallSceneryPlaceAction,
    SmallSceneryRemoveAction, WallPlaceAction, WallRemoveAction,
};
pub use track_place::TrackPlaceAction;
pub use track_remove::TrackRemoveAction;

#[cfg(test)]
mod tests;

// ---------------------------------------------------------------------------
// Flags
// ---------------------------------------------------------------------------

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode,
)]
pub struct ActionFlags(pub u32);

impl ActionFlags {
    pub const NONE: Self = Self(0);
    /// Commit the action rather than only validating it.
    pub const APPLY: Self = Self(1 << 0);
    pub const REPLAY: Self = Self(1 << 1);
    pub const ALLOW_DURING_PAUSED: Self = Self(1 << 3);
    pub const NO_SPEND: Self = Self(1 << 5);
    pub const GHOST: Self = Self(1 << 6);
    pub const TRACK_DESIGN: Self = Self(1 << 7);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_ghost(self) -> bool {
        self.contains(Self::GHOST)
    }

    /// Whether a successful execute is paid for out of park cash.
    pub fn charges_cost(self) -> bool {
        !self.contains(Self::GHOST) && !self.contains(Self::NO_SPEND)
    }
}

impl BitOr for ActionFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

// ---------------------------------------------------------------------------
// Action contract
// ---------------------------------------------------------------------------

pub trait GameAction {
    fn flags(&self) -> ActionFlags;

    /// Validate against the current world and report the cost. Must not
    /// mutate anything.
    fn query(&self, ctx: &ParkContext) -> ActionResult;

    /// Validate with write access to the park. Actions that can only be
    /// checked by building and tearing down again override this; the park is
    /// left as it was found.
    fn query_live(&self, ctx: &mut ParkContext) -> ActionResult {
        self.query(ctx)
    }

    /// Validate again and commit.
    fn execute(&self, ctx: &mut ParkContext) -> ActionResult;
}

fn check_funds<A: GameAction + ?Sized>(
    action: &A,
    result: ActionResult,
    ctx: &ParkContext,
) -> ActionResult {
    if result.is_ok() && action.flags().charges_cost() && !ctx.settings.can_afford(result.cost) {
        return ActionResult::error(
            ActionStatus::InsufficientFunds,
            result.title,
            ActionMessage::NotEnoughCash,
        )
        .with_cost(result.cost);
    }
    result
}

/// Query an action and check the park can pay for it.
pub fn query_nested<A: GameAction + ?Sized>(action: &A, ctx: &ParkContext) -> ActionResult {
    check_funds(action, action.query(ctx), ctx)
}

/// [`query_nested`] through [`GameAction::query_live`].
pub fn query_nested_live<A: GameAction + ?Sized>(action: &A, ctx: &mut ParkContext) -> ActionResult {
    let result = action.query_live(ctx);
    check_funds(action, result, ctx)
}

/// Query, then execute and charge the cost unless the action is a ghost or
/// flagged `NO_SPEND`.
pub fn execute_nested<A: GameAction + ?Sized>(action: &A, ctx: &mut ParkContext) -> ActionResult {
    let query = query_nested_live(action, ctx);
    if !query.is_ok() {
        return query;
    }
    let result = action.execute(ctx);
    if result.is_ok() && action.flags().charges_cost() {
        ctx.settings.spend(result.cost);
    }
    result
}

/// Runs `execute_nested` when the action carries `APPLY`, `query_nested_live`
/// otherwise.
pub fn run_nested<A: GameAction + ?Sized>(action: &A, ctx: &mut ParkContext) -> ActionResult {
    if action.flags().contains(ActionFlags::APPLY) {
        execute_nested(action, ctx)
    } else {
        query_nested_live(action, ctx)
    }
}

/// Construction is refused while paused unless the action or a cheat allows it.
pub(crate) fn check_not_paused(
    flags: ActionFlags,
    ctx: &ParkContext,
    title: ActionMessage,
) -> Result<(), ActionResult> {
    if !flags.contains(ActionFlags::ALLOW_DURING_PAUSED)
        && ctx.settings.paused
        && !ctx.cheats.build_in_pause_mode
    {
        return Err(ActionResult::error(
            ActionStatus::Disallowed,
            title,
            ActionMessage::ConstructionNotPossibleWhilePaused,
        ));
    }
    Ok(())
}

/// Map bounds and land ownership for one tile.
pub(crate) fn check_location(
    ctx: &ParkContext,
    loc: crate::coords::CoordsXYZ,
    title: ActionMessage,
) -> Result<(), ActionResult> {
    if !ctx.map.is_location_valid(loc.xy()) {
        return Err(ActionResult::error(
            ActionStatus::InvalidParameters,
            title,
            ActionMessage::OffEdgeOfMap,
        ));
    }
    if !ctx.cheats.sandbox_mode && !ctx.map.is_location_owned(loc) {
        return Err(ActionResult::error(
            ActionStatus::Disallowed,
            title,
            ActionMessage::LandNotOwnedByPark,
        ));
    }
    Ok(())
}

pub(crate) fn check_capacity(
    ctx: &ParkContext,
    num_elements: usize,
    title: ActionMessage,
) -> Result<(), ActionResult> {
    if !ctx.map.has_capacity(num_elements) {
        return Err(ActionResult::error(
            ActionStatus::NoFreeElements,
            title,
            ActionMessage::TileElementLimitReached,
        ));
    }
    Ok(())
}
