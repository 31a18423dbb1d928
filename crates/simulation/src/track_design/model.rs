//! The canonical in-memory track design.
//!
//! Every element position is relative to the design origin and normalised to
//! direction 0: capture subtracts the ride's direction, placement rotates the
//! design back into the requested one. File codecs convert between their
//! storage units and the units used here.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::coords::{CoordsXY, Direction, TileCoordsXY, TileCoordsXYZD};
use crate::objects::ObjectEntryDescriptor;
use crate::ride::{
    Ride, RideMode, RideRatings, RideType, TrackColour, VehicleColour, MAX_VEHICLE_COLOURS,
    NUM_COLOUR_SCHEMES,
};
use crate::track_data::TrackElemType;

// ---------------------------------------------------------------------------
// Settings groups
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct TrackDesignTrackAndVehicleSettings {
    pub ride_type: RideType,
    pub vehicle_object: ObjectEntryDescriptor,
    pub num_trains: u8,
    pub cars_per_train: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct TrackDesignOperatingSettings {
    pub ride_mode: RideMode,
    pub lift_hill_speed: u8,
    pub num_circuits: u8,
    pub operation_setting: u8,
    pub depart_flags: u8,
    pub min_waiting_time: u8,
    pub max_waiting_time: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct TrackDesignAppearanceSettings {
    pub track_colours: [TrackColour; NUM_COLOUR_SCHEMES],
    /// Identifier of the station object, e.g. `rct2.station.plain`.
    pub station_object_identifier: String,
    pub vehicle_colour_settings: u8,
    pub vehicle_colours: Vec<VehicleColour>,
}

impl Default for TrackDesignAppearanceSettings {
    fn default() -> Self {
        Self {
            track_colours: [TrackColour::default(); NUM_COLOUR_SCHEMES],
            station_object_identifier: String::new(),
            vehicle_colour_settings: 0,
            vehicle_colours: vec![VehicleColour::default(); MAX_VEHICLE_COLOURS],
        }
    }
}

/// Measured statistics in the same units as [`crate::ride::RideStatistics`].
/// `inversions` and `holes` share one slot in the legacy formats; which one
/// is meaningful depends on [`RideType::uses_holes`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct TrackDesignStatistics {
    pub ratings: RideRatings,
    pub max_speed: i32,
    pub average_speed: i32,
    pub ride_length: i32,
    pub max_positive_vertical_g: i32,
    pub max_negative_vertical_g: i32,
    pub max_lateral_g: i32,
    pub inversions: u8,
    pub holes: u8,
    pub drops: u8,
    pub highest_drop_height: u8,
    pub total_air_time: u16,
    pub upkeep_cost: i64,
    /// Footprint in tiles, computed by an outline pass at the preview origin.
    pub space_required: TileCoordsXY,
}

// ---------------------------------------------------------------------------
// Elements
// ---------------------------------------------------------------------------

pub const TRACK_ELEMENT_FLAG_CHAIN_LIFT: u8 = 1 << 0;
pub const TRACK_ELEMENT_FLAG_INVERTED: u8 = 1 << 1;
pub const TRACK_ELEMENT_FLAG_COVERED: u8 = 1 << 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct TrackDesignTrackElement {
    pub track_type: TrackElemType,
    /// `TRACK_ELEMENT_FLAG_*` bits.
    pub flags: u8,
    pub colour_scheme: u8,
    pub station_index: u8,
    pub brake_booster_speed: u8,
    pub seat_rotation: u8,
}

impl TrackDesignTrackElement {
    pub fn new(track_type: TrackElemType) -> Self {
        Self {
            track_type,
            ..Default::default()
        }
    }

    pub fn has_flag(&self, flag: u8) -> bool {
        self.flags & flag != 0
    }

    pub fn set_flag(&mut self, flag: u8, on: bool) {
        if on {
            self.flags |= flag;
        } else {
            self.flags &= !flag;
        }
    }
}

/// One hedge tile; `maze_entry` holds 16 wall bits, four per quarter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct TrackDesignMazeElement {
    pub location: TileCoordsXY,
    pub maze_entry: u16,
}

/// A station entrance or exit. `location.z` is in z steps relative to the
/// design origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct TrackDesignEntranceElement {
    pub location: TileCoordsXYZD,
    pub is_exit: bool,
}

/// Which world element a scenery entry recreates, derived from its object type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneryKind {
    Small,
    Large,
    Wall,
    Footpath,
}

// Footpath flag layout: edges in the low nibble, then slope and queue bits.
pub const SCENERY_PATH_EDGES_MASK: u8 = 0x0F;
pub const SCENERY_PATH_SLOPED: u8 = 1 << 4;
pub const SCENERY_PATH_SLOPE_DIRECTION_SHIFT: u8 = 5;
pub const SCENERY_PATH_QUEUE: u8 = 1 << 7;

/// A scenery object placed with the design. `x`/`y` are tile offsets and `z`
/// is in z steps; `flags` packs the rotation, quadrant, path slope and edges
/// depending on the object type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct TrackDesignSceneryElement {
    pub scenery_object: ObjectEntryDescriptor,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub flags: u8,
    pub primary_colour: u8,
    pub secondary_colour: u8,
    pub tertiary_colour: u8,
}

impl TrackDesignSceneryElement {
    pub fn kind(&self) -> Option<SceneryKind> {
        use crate::objects::ObjectType;
        match self.scenery_object.object_type()? {
            ObjectType::SmallScenery => Some(SceneryKind::Small),
            ObjectType::LargeScenery => Some(SceneryKind::Large),
            ObjectType::Walls => Some(SceneryKind::Wall),
            ObjectType::Paths => Some(SceneryKind::Footpath),
            _ => None,
        }
    }

    pub fn tile_offset(&self) -> CoordsXY {
        TileCoordsXY::new(self.x, self.y).to_coords()
    }

    pub fn direction(&self) -> Direction {
        self.flags & 3
    }

    pub fn colours(&self) -> [u8; 3] {
        [self.primary_colour, self.secondary_colour, self.tertiary_colour]
    }
}

// ---------------------------------------------------------------------------
// Placement outcome
// ---------------------------------------------------------------------------

pub const TRACK_DESIGN_FLAG_SCENERY_UNAVAILABLE: u8 = 1 << 0;
pub const TRACK_DESIGN_FLAG_HAS_SCENERY: u8 = 1 << 1;
pub const TRACK_DESIGN_FLAG_VEHICLE_UNAVAILABLE: u8 = 1 << 2;

/// Outcome of the last placement attempt. Never written to design files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct TrackDesignGameStateData {
    pub cost: i64,
    pub flags: u8,
}

impl TrackDesignGameStateData {
    pub fn has_flag(&self, flag: u8) -> bool {
        self.flags & flag != 0
    }

    pub fn set_flag(&mut self, flag: u8, on: bool) {
        if on {
            self.flags |= flag;
        } else {
            self.flags &= !flag;
        }
    }
}

// ---------------------------------------------------------------------------
// TrackDesign
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct TrackDesign {
    pub name: String,
    pub track_and_vehicle: TrackDesignTrackAndVehicleSettings,
    pub operation: TrackDesignOperatingSettings,
    pub appearance: TrackDesignAppearanceSettings,
    pub statistics: TrackDesignStatistics,

    pub track_elements: Vec<TrackDesignTrackElement>,
    pub maze_elements: Vec<TrackDesignMazeElement>,
    pub entrance_elements: Vec<TrackDesignEntranceElement>,
    pub scenery_elements: Vec<TrackDesignSceneryElement>,

    #[serde(skip)]
    pub game_state: TrackDesignGameStateData,
}

impl TrackDesign {
    pub fn ride_type(&self) -> RideType {
        self.track_and_vehicle.ride_type
    }

    pub fn is_maze(&self) -> bool {
        self.ride_type().has_flag(crate::ride::ride_type::RTD_IS_MAZE)
    }

    pub fn has_scenery(&self) -> bool {
        !self.scenery_elements.is_empty()
    }

    /// Copies operating settings, colours and statistics from a built ride.
    /// Element lists are left untouched.
    pub fn copy_settings_from_ride(&mut self, ride: &Ride) {
        self.name = ride.name.clone();
        self.track_and_vehicle.ride_type = ride.ride_type;
        self.track_and_vehicle.num_trains = ride.num_trains;
        self.track_and_vehicle.cars_per_train = ride.cars_per_train;

        self.operation = TrackDesignOperatingSettings {
            ride_mode: ride.mode,
            lift_hill_speed: ride.lift_hill_speed,
            num_circuits: ride.num_circuits,
            operation_setting: ride.operation_setting,
            depart_flags: ride.depart_flags,
            min_waiting_time: ride.min_waiting_time,
            max_waiting_time: ride.max_waiting_time,
        };

        self.appearance.track_colours = ride.track_colours;
        self.appearance.vehicle_colour_settings = ride.vehicle_colour_settings;
        self.appearance.vehicle_colours = ride.vehicle_colours.to_vec();

        let stats = &ride.statistics;
        let uses_holes = ride.ride_type.uses_holes();
        self.statistics = TrackDesignStatistics {
            ratings: ride.ratings.unwrap_or_default(),
            max_speed: stats.max_speed,
            average_speed: stats.average_speed,
            ride_length: stats.ride_length,
            max_positive_vertical_g: stats.max_positive_vertical_g,
            max_negative_vertical_g: stats.max_negative_vertical_g,
            max_lateral_g: stats.max_lateral_g,
            inversions: if uses_holes { 0 } else { stats.inversions },
            holes: if uses_holes { stats.holes } else { 0 },
            drops: stats.drops,
            highest_drop_height: stats.highest_drop_height,
            total_air_time: stats.total_air_time,
            upkeep_cost: stats.upkeep_cost,
            space_required: self.statistics.space_required,
        };
    }

    /// Lift hill speed and circuit count packed the way legacy files store
    /// them: speed in the low five bits, circuits above.
    pub fn lift_hill_speed_num_circuits(&self) -> u8 {
        (self.operation.lift_hill_speed & 0x1F) | (self.operation.num_circuits << 5)
    }

    pub fn set_lift_hill_speed_num_circuits(&mut self, packed: u8) {
        self.operation.lift_hill_speed = packed & 0x1F;
        self.operation.num_circuits = packed >> 5;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::ObjectType;
    use crate::ride::{RideId, LIFECYCLE_TESTED};

    #[test]
    fn test_scenery_kind_follows_object_type() {
        let mut element = TrackDesignSceneryElement {
            scenery_object: ObjectEntryDescriptor::new(ObjectType::Walls, "WMF"),
            ..Default::default()
        };
        assert_eq!(element.kind(), Some(SceneryKind::Wall));
        element.scenery_object = ObjectEntryDescriptor::new(ObjectType::Paths, "TARMAC");
        assert_eq!(element.kind(), Some(SceneryKind::Footpath));
        element.scenery_object = ObjectEntryDescriptor::new(ObjectType::Ride, "ARRT1");
        assert_eq!(element.kind(), None);
    }

    #[test]
    fn test_lift_hill_packing() {
        let mut td = TrackDesign::default();
        td.set_lift_hill_speed_num_circuits(0x45);
        assert_eq!(td.operation.lift_hill_speed, 5);
        assert_eq!(td.operation.num_circuits, 2);
        assert_eq!(td.lift_hill_speed_num_circuits(), 0x45);
    }

    #[test]
    fn test_copy_settings_uses_holes_slot_for_mini_golf() {
        let mut ride = Ride::new(RideId(0), RideType::MINI_GOLF);
        ride.set_lifecycle_flag(LIFECYCLE_TESTED, true);
        ride.statistics.holes = 9;
        ride.statistics.inversions = 3;
        let mut td = TrackDesign::default();
        td.copy_settings_from_ride(&ride);
        assert_eq!(td.statistics.holes, 9);
        assert_eq!(td.statistics.inversions, 0);

        let mut coaster = Ride::new(RideId(1), RideType::LOOPING_ROLLER_COASTER);
        coaster.statistics.inversions = 3;
        coaster.statistics.holes = 9;
        td.copy_settings_from_ride(&coaster);
        assert_eq!(td.statistics.inversions, 3);
        assert_eq!(td.statistics.holes, 0);
    }

    #[test]
    fn test_game_state_is_not_serialized() {
        let mut td = TrackDesign::default();
        td.game_state.cost = 500;
        td.game_state.set_flag(TRACK_DESIGN_FLAG_HAS_SCENERY, true);
        let json = serde_json::to_string(&td).unwrap();
        let back: TrackDesign = serde_json::from_str(&json).unwrap();
        assert_eq!(back.game_state, TrackDesignGameStateData::default());
    }
}
