//! Park-wide state consulted by construction: money, pause state, cheats,
//! animated tiles and the interactive selection overlay.

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_PARK_CASH;
use crate::coords::{CoordsXY, CoordsXYZ};

// ---------------------------------------------------------------------------
// Settings and cheats
// ---------------------------------------------------------------------------

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct ParkSettings {
    pub paused: bool,
    /// Construction is free and never checks funds.
    pub no_money: bool,
    pub cash: i64,
}

impl Default for ParkSettings {
    fn default() -> Self {
        Self {
            paused: false,
            no_money: false,
            cash: DEFAULT_PARK_CASH,
        }
    }
}

impl ParkSettings {
    pub fn can_afford(&self, cost: i64) -> bool {
        self.no_money || cost <= 0 || cost <= self.cash
    }

    pub fn spend(&mut self, cost: i64) {
        if !self.no_money {
            self.cash -= cost;
        }
    }
}

#[derive(Resource, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cheats {
    pub sandbox_mode: bool,
    pub build_in_pause_mode: bool,
    pub allow_arbitrary_ride_type_changes: bool,
    pub enable_chain_lift_on_all_track: bool,
    pub disable_clearance_checks: bool,
    pub disable_support_limits: bool,
    pub allow_track_place_invalid_heights: bool,
}

// ---------------------------------------------------------------------------
// Map animations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub enum MapAnimationKind {
    TrackWaterfall,
    TrackRapids,
    TrackWhirlpool,
    TrackSpinningTunnel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct MapAnimation {
    pub loc: CoordsXYZ,
    pub kind: MapAnimationKind,
}

/// Tiles with animated track (water effects, tunnels).
#[derive(Resource, Debug, Clone, Default)]
pub struct MapAnimations {
    entries: Vec<MapAnimation>,
}

impl MapAnimations {
    pub fn create(&mut self, kind: MapAnimationKind, loc: CoordsXYZ) {
        let animation = MapAnimation { loc, kind };
        if !self.entries.contains(&animation) {
            self.entries.push(animation);
        }
    }

    pub fn remove_at(&mut self, loc: CoordsXYZ) {
        self.entries.retain(|a| a.loc != loc);
    }

    pub fn contains(&self, kind: MapAnimationKind, loc: CoordsXYZ) -> bool {
        self.entries.iter().any(|a| a.kind == kind && a.loc == loc)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Map selection
// ---------------------------------------------------------------------------

pub const MAP_SELECT_FLAG_ENABLE_CONSTRUCT: u8 = 1 << 0;
pub const MAP_SELECT_FLAG_ENABLE_ARROW: u8 = 1 << 1;
pub const MAP_SELECT_FLAG_GREEN: u8 = 1 << 2;

/// Upper bound on highlighted construction tiles.
pub const MAX_SELECTION_TILES: usize = 300;

/// Highlighted tiles drawn while the player positions a design.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct MapSelection {
    pub flags: u8,
    pub tiles: Vec<CoordsXY>,
    pub arrow_position: Option<CoordsXYZ>,
    pub arrow_direction: u8,
}

impl MapSelection {
    pub fn clear(&mut self) {
        self.tiles.clear();
        self.flags = 0;
        self.arrow_position = None;
    }

    /// Add a tile once; silently drops tiles beyond [`MAX_SELECTION_TILES`].
    pub fn add_tile(&mut self, loc: CoordsXY) {
        let loc = loc.to_tile_start();
        if self.tiles.len() >= MAX_SELECTION_TILES || self.tiles.contains(&loc) {
            return;
        }
        self.tiles.push(loc);
    }

    pub fn has_flag(&self, flag: u8) -> bool {
        self.flags & flag != 0
    }
}
