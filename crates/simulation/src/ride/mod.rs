//! Rides: the owners of track, stations and entrances.

pub mod demolish;
pub mod ride_type;
pub mod stations;

#[cfg(test)]
mod tests;

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::config::MAX_STATIONS;
use crate::coords::{CoordsXY, CoordsXYZ, CoordsXYZD};
use crate::objects::ObjectIndex;

pub use demolish::demolish_ride;
pub use ride_type::{RideType, RideTypeDescriptor};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    Encode, Decode,
)]
pub struct RideId(pub u16);

impl std::fmt::Display for RideId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ride #{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Operating modes
// ---------------------------------------------------------------------------

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode,
)]
#[repr(u8)]
pub enum RideMode {
    #[default]
    Normal = 0,
    ContinuousCircuit = 1,
    ReverseInclineLaunchedShuttle = 2,
    PoweredLaunchPassthrough = 3,
    Shuttle = 4,
    BoatHire = 5,
    UpwardLaunch = 6,
    RotatingLift = 7,
    StationToStation = 8,
    SingleRidePerAdmission = 9,
    UnlimitedRidesPerAdmission = 10,
    Maze = 11,
    Race = 12,
    Dodgems = 13,
    Swing = 14,
    ShopStall = 15,
    Rotation = 16,
    ForwardRotation = 17,
    BackwardRotation = 18,
    FilmAvengingAviators = 19,
    MouseTails3DFilm = 20,
    SpaceRings = 21,
    Beginners = 22,
    LimPoweredLaunch = 23,
    FilmThrillRiders = 24,
    StormChasers3DFilm = 25,
    SpaceRaiders3DFilm = 26,
    Intense = 27,
    Berserk = 28,
    HauntedHouse = 29,
    Circus = 30,
    DownwardLaunch = 31,
    CrookedHouse = 32,
    FreefallDrop = 33,
    ContinuousCircuitBlockSectioned = 34,
    PoweredLaunch = 35,
    PoweredLaunchBlockSectioned = 36,
}

impl RideMode {
    pub const COUNT: u8 = 37;

    pub fn from_u8(value: u8) -> Option<Self> {
        use RideMode::*;
        const ALL: [RideMode; RideMode::COUNT as usize] = [
            Normal,
            ContinuousCircuit,
            ReverseInclineLaunchedShuttle,
            PoweredLaunchPassthrough,
            Shuttle,
            BoatHire,
            UpwardLaunch,
            RotatingLift,
            StationToStation,
            SingleRidePerAdmission,
            UnlimitedRidesPerAdmission,
            Maze,
            Race,
            Dodgems,
            Swing,
            ShopStall,
            Rotation,
            ForwardRotation,
            BackwardRotation,
            FilmAvengingAviators,
            MouseTails3DFilm,
            SpaceRings,
            Beginners,
            LimPoweredLaunch,
            FilmThrillRiders,
            StormChasers3DFilm,
            SpaceRaiders3DFilm,
            Intense,
            Berserk,
            HauntedHouse,
            Circus,
            DownwardLaunch,
            CrookedHouse,
            FreefallDrop,
            ContinuousCircuitBlockSectioned,
            PoweredLaunch,
            PoweredLaunchBlockSectioned,
        ];
        ALL.get(value as usize).copied()
    }
}

// ---------------------------------------------------------------------------
// Lifecycle flags
// ---------------------------------------------------------------------------

pub const LIFECYCLE_ON_TRACK: u32 = 1 << 0;
pub const LIFECYCLE_TESTED: u32 = 1 << 1;
pub const LIFECYCLE_EVER_BEEN_OPENED: u32 = 1 << 4;
pub const LIFECYCLE_ON_RIDE_PHOTO: u32 = 1 << 7;
pub const LIFECYCLE_INDESTRUCTIBLE_TRACK: u32 = 1 << 14;
pub const LIFECYCLE_CABLE_LIFT: u32 = 1 << 17;
pub const LIFECYCLE_NOT_CUSTOM_DESIGN: u32 = 1 << 18;

// ---------------------------------------------------------------------------
// Colours and statistics
// ---------------------------------------------------------------------------

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode,
)]
pub struct TrackColour {
    pub main: u8,
    pub additional: u8,
    pub supports: u8,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode,
)]
pub struct VehicleColour {
    pub body: u8,
    pub trim: u8,
    pub tertiary: u8,
}

pub const NUM_COLOUR_SCHEMES: usize = 4;
pub const MAX_VEHICLE_COLOURS: usize = 32;

/// Excitement, intensity and nausea, scaled by 100.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode,
)]
pub struct RideRatings {
    pub excitement: i16,
    pub intensity: i16,
    pub nausea: i16,
}

/// Measured statistics. Speeds are 16.16 fixed point, G forces are scaled by 100,
/// air time is in ticks, length is 16.16 world units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct RideStatistics {
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
}

// ---------------------------------------------------------------------------
// Stations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Station {
    pub start: Option<CoordsXYZ>,
    pub length: u8,
    pub entrance: Option<CoordsXYZD>,
    pub exit: Option<CoordsXYZD>,
}

impl Station {
    pub fn is_null(&self) -> bool {
        self.start.is_none()
    }
}

// ---------------------------------------------------------------------------
// Ride
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Ride {
    pub id: RideId,
    pub name: String,
    pub ride_type: RideType,
    pub vehicle_object: Option<ObjectIndex>,
    pub entrance_style: Option<ObjectIndex>,
    pub mode: RideMode,
    pub lifecycle_flags: u32,
    pub stations: [Station; MAX_STATIONS],
    pub num_block_brakes: u16,
    pub maze_tiles: u16,
    pub cable_lift_loc: Option<CoordsXYZ>,
    pub overall_view: Option<CoordsXY>,

    pub depart_flags: u8,
    pub num_trains: u8,
    pub cars_per_train: u8,
    pub min_waiting_time: u8,
    pub max_waiting_time: u8,
    pub operation_setting: u8,
    pub lift_hill_speed: u8,
    pub num_circuits: u8,

    pub track_colours: [TrackColour; NUM_COLOUR_SCHEMES],
    pub vehicle_colour_settings: u8,
    pub vehicle_colours: [VehicleColour; MAX_VEHICLE_COLOURS],

    pub ratings: Option<RideRatings>,
    pub statistics: RideStatistics,
}

impl Ride {
    pub fn new(id: RideId, ride_type: RideType) -> Self {
        let mode = ride_type
            .descriptor()
            .map(|d| d.default_mode)
            .unwrap_or_default();
        Self {
            id,
            name: format!("Ride {}", id.0 + 1),
            ride_type,
            vehicle_object: None,
            entrance_style: None,
            mode,
            lifecycle_flags: 0,
            stations: [Station::default(); MAX_STATIONS],
            num_block_brakes: 0,
            maze_tiles: 0,
            cable_lift_loc: None,
            overall_view: None,
            depart_flags: 0,
            num_trains: 1,
            cars_per_train: 1,
            min_waiting_time: 10,
            max_waiting_time: 60,
            operation_setting: 0,
            lift_hill_speed: 5,
            num_circuits: 1,
            track_colours: [TrackColour::default(); NUM_COLOUR_SCHEMES],
            vehicle_colour_settings: 0,
            vehicle_colours: [VehicleColour::default(); MAX_VEHICLE_COLOURS],
            ratings: None,
            statistics: RideStatistics::default(),
        }
    }

    pub fn descriptor(&self) -> Option<&'static RideTypeDescriptor> {
        self.ride_type.descriptor()
    }

    pub fn has_lifecycle_flag(&self, flag: u32) -> bool {
        self.lifecycle_flags & flag != 0
    }

    pub fn set_lifecycle_flag(&mut self, flag: u32, on: bool) {
        if on {
            self.lifecycle_flags |= flag;
        } else {
            self.lifecycle_flags &= !flag;
        }
    }

    pub fn is_maze(&self) -> bool {
        self.ride_type.has_flag(ride_type::RTD_IS_MAZE)
    }

    pub fn num_stations(&self) -> usize {
        self.stations.iter().filter(|s| !s.is_null()).count()
    }

    /// Index of the first free station slot, if any.
    pub fn free_station_index(&self) -> Option<usize> {
        self.stations.iter().position(Station::is_null)
    }

    /// Clears station wiring belonging to a station start at `loc`.
    pub fn clear_station_at(&mut self, loc: CoordsXYZ) {
        for station in self.stations.iter_mut() {
            if station.start == Some(loc) {
                *station = Station::default();
            }
        }
    }

    /// A ride can be captured as a design only after a completed test run.
    pub fn is_tested(&self) -> bool {
        self.has_lifecycle_flag(LIFECYCLE_TESTED) && self.ratings.is_some()
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// All rides in the park, addressed by [`RideId`].
#[derive(Resource, Debug, Default, Clone, Serialize, Deserialize, Encode, Decode)]
pub struct RideRegistry {
    rides: Vec<Option<Ride>>,
}

impl RideRegistry {
    /// Allocates a new ride in the lowest free slot.
    pub fn create(&mut self, ride_type: RideType) -> RideId {
        let slot = self
            .rides
            .iter()
            .position(Option::is_none)
            .unwrap_or(self.rides.len());
        let id = RideId(slot as u16);
        let ride = Ride::new(id, ride_type);
        if slot == self.rides.len() {
            self.rides.push(Some(ride));
        } else {
            self.rides[slot] = Some(ride);
        }
        id
    }

    pub fn get(&self, id: RideId) -> Option<&Ride> {
        self.rides.get(id.0 as usize).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: RideId) -> Option<&mut Ride> {
        self.rides.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    pub fn remove(&mut self, id: RideId) -> Option<Ride> {
        self.rides.get_mut(id.0 as usize).and_then(Option::take)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ride> {
        self.rides.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
