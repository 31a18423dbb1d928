//! Explicit world access for game actions and the placement engine.
//!
//! Actions never reach for ambient globals: everything they read or mutate
//! arrives through a [`ParkContext`]. The rotation, ride and preview flag that
//! nested placement steps share live in [`PlacementContext`], and a
//! [`PlacementScope`] swaps a new one in for the duration of a call and puts
//! the previous one back when it is dropped.

use std::ops::{Deref, DerefMut};

use crate::coords::Direction;
use crate::objects::ObjectRepository;
use crate::park::{Cheats, MapAnimations, MapSelection, ParkSettings};
use crate::ride::{RideId, RideRegistry};
use crate::tile_map::TileMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlacementContext {
    pub current_ride: Option<RideId>,
    pub current_direction: Direction,
    /// Set while a design is built into a scratch area for its preview.
    pub drawing_preview: bool,
}

pub struct ParkContext<'a> {
    pub map: &'a mut TileMap,
    pub rides: &'a mut RideRegistry,
    pub objects: &'a ObjectRepository,
    pub settings: &'a mut ParkSettings,
    pub cheats: &'a Cheats,
    pub animations: &'a mut MapAnimations,
    pub selection: &'a mut MapSelection,
    pub placement: PlacementContext,
}

impl<'a> ParkContext<'a> {
    /// Replace the placement context until the returned guard is dropped.
    pub fn scoped<'c>(&'c mut self, placement: PlacementContext) -> PlacementScope<'c, 'a> {
        let saved = std::mem::replace(&mut self.placement, placement);
        PlacementScope { ctx: self, saved }
    }
}

pub struct PlacementScope<'c, 'a> {
    ctx: &'c mut ParkContext<'a>,
    saved: PlacementContext,
}

impl<'a> Deref for PlacementScope<'_, 'a> {
    type Target = ParkContext<'a>;

    fn deref(&self) -> &Self::Target {
        &*self.ctx
    }
}

impl DerefMut for PlacementScope<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.ctx
    }
}

impl Drop for PlacementScope<'_, '_> {
    fn drop(&mut self) {
        self.ctx.placement = self.saved;
    }
}

/// Owned storage for everything a [`ParkContext`] borrows. Used by tests,
/// benches and the track preview scratch map.
#[derive(Default)]
pub struct ParkState {
    pub map: TileMap,
    pub rides: RideRegistry,
    pub objects: ObjectRepository,
    pub settings: ParkSettings,
    pub cheats: Cheats,
    pub animations: MapAnimations,
    pub selection: MapSelection,
}

impl ParkState {
    pub fn with_map(map: TileMap) -> Self {
        Self {
            map,
            ..Default::default()
        }
    }

    pub fn ctx(&mut self) -> ParkContext<'_> {
        ParkContext {
            map: &mut self.map,
            rides: &mut self.rides,
            objects: &self.objects,
            settings: &mut self.settings,
            cheats: &self.cheats,
            animations: &mut self.animations,
            selection: &mut self.selection,
            placement: PlacementContext::default(),
        }
    }
}
