//! Static per-piece track geometry.
//!
//! Every [`TrackElemType`] has a [`TrackElementDescriptor`] describing how far
//! the piece moves the build cursor ([`TrackCoordinates`]), which tiles it
//! occupies ([`TrackBlock`]), which sides of its origin tile can connect to
//! entrances or paths, and its price modifier.

mod tables;
mod walk;

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::coords::{CoordsXY, Direction, COORDS_DIRECTION_DELTA};

pub use tables::descriptor;
pub use walk::{track_block_get_next, TrackBlockRef};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    Encode, Decode,
)]
pub struct TrackElemType(pub u16);

impl TrackElemType {
    pub const FLAT: Self = Self(0);
    pub const END_STATION: Self = Self(1);
    pub const BEGIN_STATION: Self = Self(2);
    pub const MIDDLE_STATION: Self = Self(3);
    pub const UP_25: Self = Self(4);
    pub const UP_60: Self = Self(5);
    pub const FLAT_TO_UP_25: Self = Self(6);
    pub const UP_25_TO_UP_60: Self = Self(7);
    pub const UP_60_TO_UP_25: Self = Self(8);
    pub const UP_25_TO_FLAT: Self = Self(9);
    pub const DOWN_25: Self = Self(10);
    pub const DOWN_60: Self = Self(11);
    pub const FLAT_TO_DOWN_25: Self = Self(12);
    pub const DOWN_25_TO_DOWN_60: Self = Self(13);
    pub const DOWN_60_TO_DOWN_25: Self = Self(14);
    pub const DOWN_25_TO_FLAT: Self = Self(15);
    pub const LEFT_QUARTER_TURN_5_TILES: Self = Self(16);
    pub const RIGHT_QUARTER_TURN_5_TILES: Self = Self(17);
    pub const FLAT_TO_LEFT_BANK: Self = Self(18);
    pub const FLAT_TO_RIGHT_BANK: Self = Self(19);
    pub const LEFT_BANK_TO_FLAT: Self = Self(20);
    pub const RIGHT_BANK_TO_FLAT: Self = Self(21);
    pub const LEFT_BANK: Self = Self(32);
    pub const RIGHT_BANK: Self = Self(33);
    pub const LEFT_QUARTER_TURN_3_TILES: Self = Self(42);
    pub const RIGHT_QUARTER_TURN_3_TILES: Self = Self(43);
    pub const BRAKES: Self = Self(99);
    pub const BOOSTER: Self = Self(100);
    pub const MAZE: Self = Self(101);
    pub const WATERFALL: Self = Self(112);
    pub const RAPIDS: Self = Self(113);
    pub const ON_RIDE_PHOTO: Self = Self(114);
    pub const WHIRLPOOL: Self = Self(120);
    pub const CABLE_LIFT_HILL: Self = Self(123);
    pub const SPINNING_TUNNEL: Self = Self(173);
    pub const BLOCK_BRAKES: Self = Self(216);

    pub fn is_station(self) -> bool {
        matches!(
            self,
            Self::END_STATION | Self::BEGIN_STATION | Self::MIDDLE_STATION
        )
    }

    /// Pieces whose element stores a brake or booster speed.
    pub fn has_speed_setting(self) -> bool {
        matches!(self, Self::BRAKES | Self::BOOSTER | Self::BLOCK_BRAKES)
    }

    pub fn descriptor(self) -> Option<&'static TrackElementDescriptor> {
        descriptor(self)
    }

    /// The left/right mirror image of this piece. Symmetric pieces map to
    /// themselves; unknown pieces are returned unchanged.
    pub fn mirrored(self) -> Self {
        descriptor(self).map_or(self, |d| d.mirror)
    }
}

// ---------------------------------------------------------------------------
// Descriptor types
// ---------------------------------------------------------------------------

/// How a piece moves the build cursor: entry/exit rotation, entry/exit height
/// and the horizontal offset to the last tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackCoordinates {
    pub rotation_begin: u8,
    pub rotation_end: u8,
    pub z_begin: i32,
    pub z_end: i32,
    pub x: i32,
    pub y: i32,
}

/// One tile of a (possibly multi-tile) piece, relative to the piece origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackBlock {
    pub index: u8,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub clearance: i32,
    /// Occupied quarters of the tile in the piece's unrotated frame.
    pub quarter_tile: u8,
    pub flags: u8,
}

impl TrackBlock {
    pub fn offset(&self) -> CoordsXY {
        CoordsXY::new(self.x, self.y)
    }

    /// Occupied quarters once the piece is rotated to `direction`.
    pub fn rotated_quarter_tile(&self, direction: Direction) -> u8 {
        let q = self.quarter_tile & 0xF;
        let r = u32::from(direction & 3);
        if r == 0 {
            return q;
        }
        ((q << r) | (q >> (4 - r))) & 0xF
    }
}

pub const BLOCK_FLAG_IS_VERTICAL: u8 = 1 << 2;

pub const ELEM_FLAG_ONLY_ABOVE_GROUND: u16 = 1 << 0;
pub const ELEM_FLAG_STARTS_AT_HALF_HEIGHT: u16 = 1 << 1;
pub const ELEM_FLAG_IS_STEEP_UP: u16 = 1 << 2;
pub const ELEM_FLAG_CAN_BE_PARTLY_UNDERGROUND: u16 = 1 << 3;
pub const ELEM_FLAG_ALLOW_LIFT_HILL: u16 = 1 << 4;

/// Sides of the origin tile (in the piece frame) an entrance may face.
pub const SEQUENCE_DIRECTION_MASK: u8 = 0x0F;
pub const SEQUENCE_FLAG_ORIGIN: u8 = 1 << 4;
pub const SEQUENCE_FLAG_CONNECTS_TO_PATH: u8 = 1 << 5;

/// Fixed-point scale for [`TrackElementDescriptor::price_modifier`].
pub const PRICE_MODIFIER_ONE: i64 = 1 << 16;

#[derive(Debug, Clone, Copy)]
pub struct TrackElementDescriptor {
    pub coordinates: TrackCoordinates,
    pub blocks: &'static [TrackBlock],
    pub flags: u16,
    pub price_modifier: i64,
    pub mirror: TrackElemType,
    /// Sequence properties of the origin block.
    pub sequence: u8,
}

impl TrackElementDescriptor {
    pub fn has_flag(&self, flag: u16) -> bool {
        self.flags & flag != 0
    }

    pub fn block(&self, index: u8) -> Option<&'static TrackBlock> {
        self.blocks.iter().find(|b| b.index == index)
    }
}

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// The position and heading where the next piece of a track starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackCursor {
    pub pos: CoordsXY,
    pub z: i32,
    pub rotation: u8,
}

impl TrackCursor {
    /// Origin of a piece started at this cursor; `z` is the piece base height.
    pub fn piece_origin(&self, coords: &TrackCoordinates) -> (CoordsXY, i32) {
        (self.pos, self.z - coords.z_begin)
    }

    /// Move the cursor past one piece.
    pub fn advance(&mut self, coords: &TrackCoordinates) {
        let rotation = self.rotation & 3;
        self.pos += CoordsXY::new(coords.x, coords.y).rotate(rotation);
        self.z += coords.z_end - coords.z_begin;
        self.rotation = (rotation + coords.rotation_end - coords.rotation_begin) & 3;
        if coords.rotation_end & (1 << 2) != 0 {
            self.rotation |= 1 << 2;
        } else {
            self.pos += COORDS_DIRECTION_DELTA[usize::from(self.rotation & 3)];
        }
    }
}
