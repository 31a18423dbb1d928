//! World and tile coordinate types.
//!
//! World coordinates are in "big" units: one tile spans [`COORDS_XY_STEP`]
//! units horizontally and one height step is [`COORDS_Z_STEP`] units. A
//! direction is a value in `0..4`; direction 0 points towards -x, 1 towards
//! +y, 2 towards +x and 3 towards -y.

use std::ops::{Add, AddAssign, Sub};

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::config::{COORDS_XY_STEP, COORDS_Z_STEP};

pub type Direction = u8;

pub const NUM_DIRECTIONS: u8 = 4;

/// Unit step (one tile) for each direction.
pub const COORDS_DIRECTION_DELTA: [CoordsXY; 4] = [
    CoordsXY::new(-COORDS_XY_STEP, 0),
    CoordsXY::new(0, COORDS_XY_STEP),
    CoordsXY::new(COORDS_XY_STEP, 0),
    CoordsXY::new(0, -COORDS_XY_STEP),
];

pub fn direction_valid(direction: Direction) -> bool {
    direction < NUM_DIRECTIONS
}

pub fn direction_reverse(direction: Direction) -> Direction {
    direction ^ 2
}

/// Rotate a 4-bit mask left by `shift` places.
pub fn rol4(value: u8, shift: u8) -> u8 {
    let v = value & 0x0F;
    let s = shift & 3;
    ((v << s) | (v >> ((4 - s) & 3))) & 0x0F
}

/// Rotate a 16-bit mask left by `shift` places.
pub fn rol16(value: u16, shift: u32) -> u16 {
    value.rotate_left(shift & 15)
}

/// Round `value` down to a multiple of `step` (works for negatives).
pub fn floor2(value: i32, step: i32) -> i32 {
    value.div_euclid(step) * step
}

// ---------------------------------------------------------------------------
// CoordsXY
// ---------------------------------------------------------------------------

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode,
)]
pub struct CoordsXY {
    pub x: i32,
    pub y: i32,
}

impl CoordsXY {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Rotate clockwise around the origin by `direction` quarter turns.
    pub fn rotate(self, direction: Direction) -> Self {
        match direction & 3 {
            0 => self,
            1 => Self::new(self.y, -self.x),
            2 => Self::new(-self.x, -self.y),
            _ => Self::new(-self.y, self.x),
        }
    }

    pub fn to_tile(self) -> TileCoordsXY {
        TileCoordsXY::new(
            self.x.div_euclid(COORDS_XY_STEP),
            self.y.div_euclid(COORDS_XY_STEP),
        )
    }

    pub fn to_tile_start(self) -> Self {
        Self::new(
            floor2(self.x, COORDS_XY_STEP),
            floor2(self.y, COORDS_XY_STEP),
        )
    }

    pub fn with_z(self, z: i32) -> CoordsXYZ {
        CoordsXYZ::new(self.x, self.y, z)
    }
}

impl Add for CoordsXY {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for CoordsXY {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for CoordsXY {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

// ---------------------------------------------------------------------------
// CoordsXYZ / CoordsXYZD
// ---------------------------------------------------------------------------

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode,
)]
pub struct CoordsXYZ {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl CoordsXYZ {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn xy(self) -> CoordsXY {
        CoordsXY::new(self.x, self.y)
    }

    pub fn with_direction(self, direction: Direction) -> CoordsXYZD {
        CoordsXYZD::new(self.x, self.y, self.z, direction)
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode,
)]
pub struct CoordsXYZD {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub direction: Direction,
}

impl CoordsXYZD {
    pub const fn new(x: i32, y: i32, z: i32, direction: Direction) -> Self {
        Self { x, y, z, direction }
    }

    pub fn xy(self) -> CoordsXY {
        CoordsXY::new(self.x, self.y)
    }

    pub fn xyz(self) -> CoordsXYZ {
        CoordsXYZ::new(self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// Tile coordinates
// ---------------------------------------------------------------------------

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode,
)]
pub struct TileCoordsXY {
    pub x: i32,
    pub y: i32,
}

impl TileCoordsXY {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn to_coords(self) -> CoordsXY {
        CoordsXY::new(self.x * COORDS_XY_STEP, self.y * COORDS_XY_STEP)
    }
}

/// A tile-local position with a height in z steps and a direction; the
/// storage shape of design entrances.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode,
)]
pub struct TileCoordsXYZD {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub direction: Direction,
}

impl TileCoordsXYZD {
    pub const fn new(x: i32, y: i32, z: i32, direction: Direction) -> Self {
        Self { x, y, z, direction }
    }

    pub fn to_coords_xy(self) -> CoordsXY {
        CoordsXY::new(self.x * COORDS_XY_STEP, self.y * COORDS_XY_STEP)
    }

    pub fn z_to_world(self) -> i32 {
        self.z * COORDS_Z_STEP
    }
}
