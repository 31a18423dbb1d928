//! Tile element payloads stored on each map tile.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::config::LAND_HEIGHT_STEP;
use crate::coords::Direction;
use crate::objects::ObjectIndex;
use crate::ride::{RideId, RideType};
use crate::track_data::TrackElemType;

pub const SLOPE_FLAT: u8 = 0;
pub const SLOPE_N_CORNER_UP: u8 = 1 << 0;
pub const SLOPE_E_CORNER_UP: u8 = 1 << 1;
pub const SLOPE_S_CORNER_UP: u8 = 1 << 2;
pub const SLOPE_W_CORNER_UP: u8 = 1 << 3;
pub const SLOPE_ALL_CORNERS_UP: u8 = 0x0F;
pub const SLOPE_DOUBLE_HEIGHT: u8 = 1 << 4;

pub const SLOPE_W_CORNER_DN: u8 = SLOPE_N_CORNER_UP | SLOPE_E_CORNER_UP | SLOPE_S_CORNER_UP;
pub const SLOPE_S_CORNER_DN: u8 = SLOPE_N_CORNER_UP | SLOPE_E_CORNER_UP | SLOPE_W_CORNER_UP;
pub const SLOPE_E_CORNER_DN: u8 = SLOPE_N_CORNER_UP | SLOPE_S_CORNER_UP | SLOPE_W_CORNER_UP;
pub const SLOPE_N_CORNER_DN: u8 = SLOPE_E_CORNER_UP | SLOPE_S_CORNER_UP | SLOPE_W_CORNER_UP;

pub const QUARTER_TILE_FULL: u8 = 0b1111;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileElement {
    pub base_z: i32,
    pub clearance_z: i32,
    pub ghost: bool,
    pub occupied_quadrants: u8,
    pub kind: TileElementKind,
}

impl TileElement {
    pub fn new(base_z: i32, clearance_z: i32, occupied_quadrants: u8, kind: TileElementKind) -> Self {
        Self {
            base_z,
            clearance_z,
            ghost: false,
            occupied_quadrants,
            kind,
        }
    }

    pub fn as_surface(&self) -> Option<&SurfaceElement> {
        match &self.kind {
            TileElementKind::Surface(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_track(&self) -> Option<&TrackElement> {
        match &self.kind {
            TileElementKind::Track(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_track_mut(&mut self) -> Option<&mut TrackElement> {
        match &mut self.kind {
            TileElementKind::Track(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_entrance(&self) -> Option<&EntranceElement> {
        match &self.kind {
            TileElementKind::Entrance(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&PathElement> {
        match &self.kind {
            TileElementKind::Path(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_path_mut(&mut self) -> Option<&mut PathElement> {
        match &mut self.kind {
            TileElementKind::Path(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_surface(&self) -> bool {
        matches!(self.kind, TileElementKind::Surface(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileElementKind {
    Surface(SurfaceElement),
    Track(TrackElement),
    Entrance(EntranceElement),
    Path(PathElement),
    SmallScenery(SmallSceneryElement),
    LargeScenery(LargeSceneryElement),
    Wall(WallElement),
}

impl TileElementKind {
    pub fn class(&self) -> ElementClass {
        match self {
            TileElementKind::Surface(_) => ElementClass::Surface,
            TileElementKind::Track(_) => ElementClass::Track,
            TileElementKind::Entrance(_) => ElementClass::Entrance,
            TileElementKind::Path(_) => ElementClass::Path,
            TileElementKind::SmallScenery(_) => ElementClass::SmallScenery,
            TileElementKind::LargeScenery(_) => ElementClass::LargeScenery,
            TileElementKind::Wall(_) => ElementClass::Wall,
        }
    }
}

/// Payload-free discriminant of [`TileElementKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub enum ElementClass {
    Surface,
    Track,
    Entrance,
    Path,
    SmallScenery,
    LargeScenery,
    Wall,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfaceElement {
    pub slope: u8,
    /// Absolute height of the water surface, or 0 for dry land.
    pub water_height: i32,
    pub has_track_that_needs_water: bool,
}

impl SurfaceElement {
    /// Height of the highest corner of a surface whose base sits at `base_z`.
    pub fn highest_point(&self, base_z: i32) -> i32 {
        let mut height = base_z;
        if self.slope & SLOPE_ALL_CORNERS_UP != 0 {
            height += LAND_HEIGHT_STEP;
            if self.slope & SLOPE_DOUBLE_HEIGHT != 0 {
                height += LAND_HEIGHT_STEP;
            }
        }
        height
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackElement {
    pub track_type: TrackElemType,
    pub direction: Direction,
    pub sequence: u8,
    pub ride: RideId,
    pub ride_type: RideType,
    pub has_chain: bool,
    pub inverted: bool,
    pub colour_scheme: u8,
    pub station_index: u8,
    pub brake_booster_speed: u8,
    pub seat_rotation: u8,
    pub doors_closed: bool,
    pub maze_entry: u16,
}

impl TrackElement {
    pub fn new(track_type: TrackElemType, direction: Direction, ride: RideId, ride_type: RideType) -> Self {
        Self {
            track_type,
            direction,
            sequence: 0,
            ride,
            ride_type,
            has_chain: false,
            inverted: false,
            colour_scheme: 0,
            station_index: 0,
            brake_booster_speed: 0,
            seat_rotation: 0,
            doors_closed: false,
            maze_entry: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntranceElement {
    pub direction: Direction,
    pub is_exit: bool,
    pub ride: RideId,
    pub station_index: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathElement {
    pub surface: ObjectIndex,
    pub is_queue: bool,
    pub is_sloped: bool,
    pub slope_direction: Direction,
    /// Bit per direction: set when the path connects towards that side.
    pub edges: u8,
    pub queue_ride: Option<RideId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmallSceneryElement {
    pub object: ObjectIndex,
    pub direction: Direction,
    pub quadrant: u8,
    pub colours: [u8; 3],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LargeSceneryElement {
    pub object: ObjectIndex,
    pub direction: Direction,
    pub sequence: u8,
    pub colours: [u8; 3],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WallElement {
    pub object: ObjectIndex,
    pub direction: Direction,
    pub colours: [u8; 3],
}
