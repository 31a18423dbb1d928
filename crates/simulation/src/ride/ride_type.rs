//! Ride type identifiers and their static build properties.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use super::RideMode;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Encode,
    Decode,
)]
pub struct RideType(pub u8);

impl Default for RideType {
    fn default() -> Self {
        Self::NULL
    }
}

impl RideType {
    pub const NULL: Self = Self(255);
    pub const SPIRAL_ROLLER_COASTER: Self = Self(0);
    pub const STAND_UP_ROLLER_COASTER: Self = Self(1);
    pub const SUSPENDED_SWINGING_COASTER: Self = Self(2);
    pub const INVERTED_ROLLER_COASTER: Self = Self(3);
    pub const JUNIOR_ROLLER_COASTER: Self = Self(4);
    pub const MINIATURE_RAILWAY: Self = Self(5);
    pub const MONORAIL: Self = Self(6);
    pub const MINI_SUSPENDED_COASTER: Self = Self(7);
    pub const BOAT_HIRE: Self = Self(8);
    pub const WOODEN_WILD_MOUSE: Self = Self(9);
    pub const STEEPLECHASE: Self = Self(10);
    pub const CAR_RIDE: Self = Self(11);
    pub const LAUNCHED_FREEFALL: Self = Self(12);
    pub const BOBSLEIGH_COASTER: Self = Self(13);
    pub const OBSERVATION_TOWER: Self = Self(14);
    pub const LOOPING_ROLLER_COASTER: Self = Self(15);
    pub const DINGHY_SLIDE: Self = Self(16);
    pub const MINE_TRAIN_COASTER: Self = Self(17);
    pub const CHAIRLIFT: Self = Self(18);
    pub const CORKSCREW_ROLLER_COASTER: Self = Self(19);
    pub const MAZE: Self = Self(20);
    pub const SPIRAL_SLIDE: Self = Self(21);
    pub const GO_KARTS: Self = Self(22);
    pub const LOG_FLUME: Self = Self(23);
    pub const RIVER_RAPIDS: Self = Self(24);
    pub const DODGEMS: Self = Self(25);
    pub const SWINGING_SHIP: Self = Self(26);
    pub const SWINGING_INVERTER_SHIP: Self = Self(27);
    pub const FOOD_STALL: Self = Self(28);
    pub const DRINK_STALL: Self = Self(30);
    pub const SHOP: Self = Self(32);
    pub const MERRY_GO_ROUND: Self = Self(33);
    pub const INFORMATION_KIOSK: Self = Self(35);
    pub const TOILETS: Self = Self(36);
    pub const FERRIS_WHEEL: Self = Self(37);
    pub const MOTION_SIMULATOR: Self = Self(38);
    pub const CINEMA_3D: Self = Self(39);
    pub const TOP_SPIN: Self = Self(40);
    pub const SPACE_RINGS: Self = Self(41);
    pub const REVERSE_FREEFALL_COASTER: Self = Self(42);
    pub const VERTICAL_DROP_ROLLER_COASTER: Self = Self(44);
    pub const TWIST: Self = Self(46);
    pub const HAUNTED_HOUSE: Self = Self(47);
    pub const CIRCUS: Self = Self(49);
    pub const GHOST_TRAIN: Self = Self(50);
    pub const TWISTER_ROLLER_COASTER: Self = Self(51);
    pub const WOODEN_ROLLER_COASTER: Self = Self(52);
    pub const SIDE_FRICTION_ROLLER_COASTER: Self = Self(53);
    pub const STEEL_WILD_MOUSE: Self = Self(54);
    pub const VIRGINIA_REEL: Self = Self(59);
    pub const SPLASH_BOATS: Self = Self(60);
    pub const MINI_HELICOPTERS: Self = Self(61);
    pub const LAY_DOWN_ROLLER_COASTER: Self = Self(62);
    pub const SUSPENDED_MONORAIL: Self = Self(63);
    pub const REVERSER_ROLLER_COASTER: Self = Self(65);
    pub const HEARTLINE_TWISTER_COASTER: Self = Self(66);
    pub const MINI_GOLF: Self = Self(67);
    pub const ROTO_DROP: Self = Self(69);
    pub const FLYING_SAUCERS: Self = Self(70);
    pub const CROOKED_HOUSE: Self = Self(71);
    pub const MONORAIL_CYCLES: Self = Self(72);
    pub const COMPACT_INVERTED_COASTER: Self = Self(73);
    pub const WATER_COASTER: Self = Self(74);
    pub const AIR_POWERED_VERTICAL_COASTER: Self = Self(75);
    pub const INVERTED_HAIRPIN_COASTER: Self = Self(76);
    pub const RIVER_RAFTS: Self = Self(79);
    pub const ENTERPRISE: Self = Self(81);
    pub const HYPERCOASTER: Self = Self(91);
    pub const HYPER_TWISTER: Self = Self(92);
    pub const CLASSIC_MINI_ROLLER_COASTER: Self = Self(95);
    pub const CLASSIC_WOODEN_ROLLER_COASTER: Self = Self(99);

    pub fn is_null(self) -> bool {
        self == Self::NULL
    }

    pub fn descriptor(self) -> Option<&'static RideTypeDescriptor> {
        RIDE_TYPE_DESCRIPTORS
            .iter()
            .find(|(t, _)| *t == self)
            .map(|(_, d)| d)
    }

    pub fn has_flag(self, flag: u32) -> bool {
        self.descriptor().is_some_and(|d| d.flags & flag != 0)
    }

    /// Maze and mini golf designs count holes instead of inversions.
    pub fn uses_holes(self) -> bool {
        self == Self::MAZE || self == Self::MINI_GOLF
    }
}

pub const RTD_HAS_TRACK: u32 = 1 << 0;
pub const RTD_IS_MAZE: u32 = 1 << 1;
pub const RTD_FLAT_RIDE: u32 = 1 << 2;
pub const RTD_TRACK_MUST_BE_ON_WATER: u32 = 1 << 3;
pub const RTD_HAS_LANDSCAPE_DOORS: u32 = 1 << 4;
pub const RTD_SUPPORTS_STEEP_LIFT_HILL: u32 = 1 << 5;
pub const RTD_TRACK_NO_WALLS: u32 = 1 << 6;
pub const RTD_HAS_SEAT_ROTATION: u32 = 1 << 7;

#[derive(Debug, Clone, Copy)]
pub struct RideTypeDescriptor {
    pub name: &'static str,
    pub flags: u32,
    /// Vertical clearance added above every track block.
    pub clearance_height: i32,
    /// Maximum height above the surface, in units of [`COORDS_Z_PER_TINY_Z`](crate::config::COORDS_Z_PER_TINY_Z).
    pub max_height: i32,
    pub track_price: i64,
    pub support_price: i64,
    pub default_mode: RideMode,
    /// Bit set of [`RideMode`] discriminants this type can operate in.
    pub available_modes: u64,
}

impl RideTypeDescriptor {
    pub fn has_flag(&self, flag: u32) -> bool {
        self.flags & flag != 0
    }

    pub fn supports_mode(&self, mode: RideMode) -> bool {
        self.available_modes & (1u64 << (mode as u8)) != 0
    }
}

const fn modes(list: &[RideMode]) -> u64 {
    let mut bits = 0u64;
    let mut i = 0;
    while i < list.len() {
        bits |= 1u64 << (list[i] as u8);
        i += 1;
    }
    bits
}

const COASTER: u32 = RTD_HAS_TRACK;
const COASTER_MODES: u64 = modes(&[
    RideMode::ContinuousCircuit,
    RideMode::ContinuousCircuitBlockSectioned,
    RideMode::ReverseInclineLaunchedShuttle,
    RideMode::PoweredLaunchPassthrough,
    RideMode::PoweredLaunch,
    RideMode::PoweredLaunchBlockSectioned,
]);
const CIRCUIT_MODES: u64 = modes(&[
    RideMode::ContinuousCircuit,
    RideMode::ContinuousCircuitBlockSectioned,
]);

const fn coaster(
    name: &'static str,
    clearance_height: i32,
    max_height: i32,
    track_price: i64,
    support_price: i64,
) -> RideTypeDescriptor {
    RideTypeDescriptor {
        name,
        flags: COASTER,
        clearance_height,
        max_height,
        track_price,
        support_price,
        default_mode: RideMode::ContinuousCircuit,
        available_modes: COASTER_MODES,
    }
}

static RIDE_TYPE_DESCRIPTORS: &[(RideType, RideTypeDescriptor)] = &[
    (
        RideType::SPIRAL_ROLLER_COASTER,
        coaster("Spiral Roller Coaster", 24, 40, 35, 8),
    ),
    (
        RideType::JUNIOR_ROLLER_COASTER,
        coaster("Junior Roller Coaster", 24, 12, 20, 4),
    ),
    (
        RideType::MINIATURE_RAILWAY,
        RideTypeDescriptor {
            available_modes: modes(&[RideMode::ContinuousCircuit, RideMode::Shuttle]),
            ..coaster("Miniature Railway", 32, 7, 18, 3)
        },
    ),
    (
        RideType::MONORAIL,
        RideTypeDescriptor {
            available_modes: modes(&[RideMode::ContinuousCircuit, RideMode::Shuttle]),
            ..coaster("Monorail", 32, 8, 32, 6)
        },
    ),
    (
        RideType::BOAT_HIRE,
        RideTypeDescriptor {
            name: "Boat Hire",
            flags: RTD_HAS_TRACK | RTD_TRACK_MUST_BE_ON_WATER | RTD_TRACK_NO_WALLS,
            clearance_height: 16,
            max_height: 255,
            track_price: 4,
            support_price: 0,
            default_mode: RideMode::BoatHire,
            available_modes: modes(&[RideMode::BoatHire]),
        },
    ),
    (
        RideType::LOOPING_ROLLER_COASTER,
        RideTypeDescriptor {
            flags: COASTER | RTD_SUPPORTS_STEEP_LIFT_HILL,
            ..coaster("Looping Roller Coaster", 24, 35, 30, 5)
        },
    ),
    (
        RideType::MINE_TRAIN_COASTER,
        RideTypeDescriptor {
            available_modes: CIRCUIT_MODES,
            ..coaster("Mine Train Coaster", 24, 21, 29, 4)
        },
    ),
    (
        RideType::CORKSCREW_ROLLER_COASTER,
        coaster("Corkscrew Roller Coaster", 24, 28, 35, 5),
    ),
    (
        RideType::MAZE,
        RideTypeDescriptor {
            name: "Maze",
            flags: RTD_HAS_TRACK | RTD_IS_MAZE,
            clearance_height: 32,
            max_height: 6,
            track_price: 8,
            support_price: 0,
            default_mode: RideMode::Maze,
            available_modes: modes(&[RideMode::Maze]),
        },
    ),
    (
        RideType::LOG_FLUME,
        RideTypeDescriptor {
            available_modes: modes(&[RideMode::ContinuousCircuit]),
            ..coaster("Log Flume", 24, 9, 36, 6)
        },
    ),
    (
        RideType::RIVER_RAPIDS,
        RideTypeDescriptor {
            available_modes: modes(&[RideMode::ContinuousCircuit]),
            ..coaster("River Rapids", 32, 9, 44, 6)
        },
    ),
    (
        RideType::GHOST_TRAIN,
        RideTypeDescriptor {
            flags: RTD_HAS_TRACK | RTD_HAS_LANDSCAPE_DOORS,
            available_modes: CIRCUIT_MODES,
            ..coaster("Ghost Train", 24, 8, 26, 3)
        },
    ),
    (
        RideType::WOODEN_ROLLER_COASTER,
        RideTypeDescriptor {
            available_modes: CIRCUIT_MODES,
            ..coaster("Wooden Roller Coaster", 24, 41, 36, 6)
        },
    ),
    (
        RideType::MINI_GOLF,
        RideTypeDescriptor {
            name: "Mini Golf",
            flags: RTD_HAS_TRACK | RTD_TRACK_NO_WALLS,
            clearance_height: 32,
            max_height: 7,
            track_price: 10,
            support_price: 2,
            default_mode: RideMode::ContinuousCircuit,
            available_modes: modes(&[RideMode::ContinuousCircuit]),
        },
    ),
    (
        RideType::TWISTER_ROLLER_COASTER,
        RideTypeDescriptor {
            flags: COASTER | RTD_SUPPORTS_STEEP_LIFT_HILL,
            ..coaster("Twister Roller Coaster", 24, 54, 43, 7)
        },
    ),
    (
        RideType::MERRY_GO_ROUND,
        RideTypeDescriptor {
            name: "Merry-Go-Round",
            flags: RTD_FLAT_RIDE,
            clearance_height: 48,
            max_height: 12,
            track_price: 57,
            support_price: 2,
            default_mode: RideMode::Rotation,
            available_modes: modes(&[RideMode::Rotation]),
        },
    ),
];
