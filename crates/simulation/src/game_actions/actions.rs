use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::context::ParkContext;
use crate::track_design::TrackDesignAction;

use super::{
    ActionFlags, ActionResult, FootpathPlaceFromTrackAction, FootpathRemoveAction, GameAction,
    LargeSceneryPlaceAction, LargeSceneryRemoveAction, MazePlaceTrackAction,
    RideEntranceExitPlaceAction, SmallSceneryPlaceAction, SmallSceneryRemoveAction,
    TrackPlaceAction, TrackRemoveAction, WallPlaceAction, WallRemoveAction,
};

/// Every action that can be queued, logged and replayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub enum ParkAction {
    SetPaused { paused: bool },
    TrackPlace(TrackPlaceAction),
    TrackRemove(TrackRemoveAction),
    MazePlaceTrack(MazePlaceTrackAction),
    RideEntranceExitPlace(RideEntranceExitPlaceAction),
    FootpathPlaceFromTrack(FootpathPlaceFromTrackAction),
    FootpathRemove(FootpathRemoveAction),
    SmallSceneryPlace(SmallSceneryPlaceAction),
    SmallSceneryRemove(SmallSceneryRemoveAction),
    LargeSceneryPlace(LargeSceneryPlaceAction),
    LargeSceneryRemove(LargeSceneryRemoveAction),
    WallPlace(WallPlaceAction),
    WallRemove(WallRemoveAction),
    PlaceTrackDesign(Box<TrackDesignAction>),
}

impl GameAction for ParkAction {
    fn flags(&self) -> ActionFlags {
        match self {
            ParkAction::SetPaused { .. } => ActionFlags::APPLY | ActionFlags::ALLOW_DURING_PAUSED,
            ParkAction::TrackPlace(a) => a.flags(),
            ParkAction::TrackRemove(a) => a.flags(),
            ParkAction::MazePlaceTrack(a) => a.flags(),
            ParkAction::RideEntranceExitPlace(a) => a.flags(),
            ParkAction::FootpathPlaceFromTrack(a) => a.flags(),
            ParkAction::FootpathRemove(a) => a.flags(),
            ParkAction::SmallSceneryPlace(a) => a.flags(),
            ParkAction::SmallSceneryRemove(a) => a.flags(),
            ParkAction::LargeSceneryPlace(a) => a.flags(),
            ParkAction::LargeSceneryRemove(a) => a.flags(),
            ParkAction::WallPlace(a) => a.flags(),
            ParkAction::WallRemove(a) => a.flags(),
            ParkAction::PlaceTrackDesign(a) => a.flags(),
        }
    }

    fn query(&self, ctx: &ParkContext) -> ActionResult {
        match self {
            ParkAction::SetPaused { .. } => ActionResult::ok(),
            ParkAction::TrackPlace(a) => a.query(ctx),
            ParkAction::TrackRemove(a) => a.query(ctx),
            ParkAction::MazePlaceTrack(a) => a.query(ctx),
            ParkAction::RideEntranceExitPlace(a) => a.query(ctx),
            ParkAction::FootpathPlaceFromTrack(a) => a.query(ctx),
            ParkAction::FootpathRemove(a) => a.query(ctx),
            ParkAction::SmallSceneryPlace(a) => a.query(ctx),
            ParkAction::SmallSceneryRemove(a) => a.query(ctx),
            ParkAction::LargeSceneryPlace(a) => a.query(ctx),
            ParkAction::LargeSceneryRemove(a) => a.query(ctx),
            ParkAction::WallPlace(a) => a.query(ctx),
            ParkAction::WallRemove(a) => a.query(ctx),
            ParkAction::PlaceTrackDesign(a) => a.query(ctx),
        }
    }

    fn query_live(&self, ctx: &mut ParkContext) -> ActionResult {
        match self {
            ParkAction::PlaceTrackDesign(a) => a.query_live(ctx),
            _ => self.query(ctx),
        }
    }

    fn execute(&self, ctx: &mut ParkContext) -> ActionResult {
        match self {
            ParkAction::SetPaused { paused } => {
                ctx.settings.paused = *paused;
                ActionResult::ok()
            }
            ParkAction::TrackPlace(a) => a.execute(ctx),
            ParkAction::TrackRemove(a) => a.execute(ctx),
            ParkAction::MazePlaceTrack(a) => a.execute(ctx),
            ParkAction::RideEntranceExitPlace(a) => a.execute(ctx),
            ParkAction::FootpathPlaceFromTrack(a) => a.execute(ctx),
            ParkAction::FootpathRemove(a) => a.execute(ctx),
            ParkAction::SmallSceneryPlace(a) => a.execute(ctx),
            ParkAction::SmallSceneryRemove(a) => a.execute(ctx),
            ParkAction::LargeSceneryPlace(a) => a.execute(ctx),
            ParkAction::LargeSceneryRemove(a) => a.execute(ctx),
            ParkAction::WallPlace(a) => a.execute(ctx),
            ParkAction::WallRemove(a) => a.execute(ctx),
            ParkAction::PlaceTrackDesign(a) => a.execute(ctx),
        }
    }
}

impl ParkAction {
    /// Ghosts are previews: never charged, never persisted.
    pub fn is_ghost(&self) -> bool {
        self.flags().is_ghost()
    }

    pub fn is_design_placement(&self) -> bool {
        matches!(self, ParkAction::PlaceTrackDesign(_))
    }
}
