use std::fmt;

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::coords::CoordsXYZ;
use crate::ride::RideId;
use crate::tile_map::{ElementClass, Obstruction};

/// Coarse outcome category. Callers branch on this; the messages are for
/// the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub enum ActionStatus {
    Ok,
    InvalidParameters,
    Disallowed,
    NoClearance,
    NoFreeElements,
    InsufficientFunds,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub enum ActionMessage {
    None,
    CantBuildThisHere,
    CantPositionThisHere,
    CantRemoveThis,
    CantCreateRide,
    RideNotFound,
    InvalidRideType,
    InvalidTrackType,
    InvalidDirection,
    InvalidBrakeSpeed,
    InvalidHeight,
    InvalidStation,
    ObjectNotFound,
    ElementNotFound,
    TooLow,
    TooHigh,
    TooHighForSupports,
    OffEdgeOfMap,
    LandNotOwnedByPark,
    ConstructionNotPossibleWhilePaused,
    NotAllowedToModifyStation,
    OnlyOneOnRidePhotoPerRide,
    OnlyOneCableLiftHillPerRide,
    TooSteepForLiftHill,
    TileElementLimitReached,
    CantBuildPartlyAboveAndPartlyBelowGround,
    CanOnlyBuildThisAboveGround,
    CantBuildThisUnderwater,
    CanOnlyBuildThisOnWater,
    RaiseOrLowerLandFirst,
    TooManyStations,
    SurfaceNotFound,
    NotEnoughCash,
    ObstructedBy(ElementClass),
}

impl fmt::Display for ActionMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ActionMessage::None => "",
            ActionMessage::CantBuildThisHere => "Can't construct this here...",
            ActionMessage::CantPositionThisHere => "Can't position this here...",
            ActionMessage::CantRemoveThis => "Can't remove this...",
            ActionMessage::CantCreateRide => "Can't create new ride/attraction...",
            ActionMessage::RideNotFound => "Ride not found",
            ActionMessage::InvalidRideType => "Invalid ride type",
            ActionMessage::InvalidTrackType => "Invalid track piece",
            ActionMessage::InvalidDirection => "Invalid direction",
            ActionMessage::InvalidBrakeSpeed => "Invalid brake speed",
            ActionMessage::InvalidHeight => "Invalid height",
            ActionMessage::InvalidStation => "Invalid station",
            ActionMessage::ObjectNotFound => "Object not found",
            ActionMessage::ElementNotFound => "Element not found",
            ActionMessage::TooLow => "Too low!",
            ActionMessage::TooHigh => "Too high!",
            ActionMessage::TooHighForSupports => "Too high for supports!",
            ActionMessage::OffEdgeOfMap => "Off edge of map!",
            ActionMessage::LandNotOwnedByPark => "Land not owned by park!",
            ActionMessage::ConstructionNotPossibleWhilePaused => {
                "Construction is not possible while game is paused!"
            }
            ActionMessage::NotAllowedToModifyStation => "Not allowed to modify station platform",
            ActionMessage::OnlyOneOnRidePhotoPerRide => "Only one on-ride photo section allowed per ride",
            ActionMessage::OnlyOneCableLiftHillPerRide => "Only one cable lift hill allowed per ride",
            ActionMessage::TooSteepForLiftHill => "Too steep for lift hill",
            ActionMessage::TileElementLimitReached => "Too many objects in game",
            ActionMessage::CantBuildPartlyAboveAndPartlyBelowGround => {
                "Can't build partly above and partly below ground"
            }
            ActionMessage::CanOnlyBuildThisAboveGround => "Can only build this above ground",
            ActionMessage::CantBuildThisUnderwater => "Can't build this underwater!",
            ActionMessage::CanOnlyBuildThisOnWater => "Can only build this on water!",
            ActionMessage::RaiseOrLowerLandFirst => "Raise or lower land first",
            ActionMessage::TooManyStations => "Too many stations for this ride",
            ActionMessage::SurfaceNotFound => "Surface element not found",
            ActionMessage::NotEnoughCash => "Not enough cash - requires more money",
            ActionMessage::ObstructedBy(class) => {
                return write!(f, "{class:?} in the way");
            }
        };
        f.write_str(text)
    }
}

impl From<Obstruction> for ActionMessage {
    fn from(obstruction: Obstruction) -> Self {
        match obstruction {
            Obstruction::OffMap => ActionMessage::OffEdgeOfMap,
            Obstruction::Terrain => ActionMessage::RaiseOrLowerLandFirst,
            Obstruction::Water => ActionMessage::CantBuildThisUnderwater,
            Obstruction::Element(class) => ActionMessage::ObstructedBy(class),
        }
    }
}

/// Action-specific data attached to a result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub enum ActionPayload {
    #[default]
    None,
    /// `GROUND_*` flags of the placed blocks.
    Ground { ground_flags: u8 },
    Ride { ride: RideId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct ActionResult {
    pub status: ActionStatus,
    pub title: ActionMessage,
    pub detail: ActionMessage,
    pub cost: i64,
    pub position: Option<CoordsXYZ>,
    pub payload: ActionPayload,
}

impl Default for ActionResult {
    fn default() -> Self {
        Self::ok()
    }
}

impl ActionResult {
    pub fn ok() -> Self {
        Self {
            status: ActionStatus::Ok,
            title: ActionMessage::None,
            detail: ActionMessage::None,
            cost: 0,
            position: None,
            payload: ActionPayload::None,
        }
    }

    pub fn error(status: ActionStatus, title: ActionMessage, detail: ActionMessage) -> Self {
        Self {
            status,
            title,
            detail,
            ..Self::ok()
        }
    }

    /// Failure caused by something already standing in the way.
    pub fn no_clearance(title: ActionMessage, obstruction: Obstruction) -> Self {
        Self::error(ActionStatus::NoClearance, title, obstruction.into())
    }

    pub fn with_cost(mut self, cost: i64) -> Self {
        self.cost = cost;
        self
    }

    pub fn at(mut self, position: CoordsXYZ) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_payload(mut self, payload: ActionPayload) -> Self {
        self.payload = payload;
        self
    }

    pub fn is_ok(&self) -> bool {
        self.status == ActionStatus::Ok
    }

    pub fn ground_flags(&self) -> u8 {
        match self.payload {
            ActionPayload::Ground { ground_flags } => ground_flags,
            _ => 0,
        }
    }
}

impl fmt::Display for ActionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.title, self.detail) {
            (ActionMessage::None, ActionMessage::None) => write!(f, "{:?}", self.status),
            (title, ActionMessage::None) => write!(f, "{:?}: {title}", self.status),
            (ActionMessage::None, detail) => write!(f, "{:?}: {detail}", self.status),
            (title, detail) => write!(f, "{:?}: {title} {detail}", self.status),
        }
    }
}
