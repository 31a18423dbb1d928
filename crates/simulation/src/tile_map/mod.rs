//! The park's tile map: a grid of tiles, each holding a height-ordered stack
//! of [`TileElement`]s with a surface element at the bottom.

pub mod clearance;
pub mod element;

#[cfg(test)]
mod tests;

use bevy::prelude::*;

use crate::config::{
    COORDS_XY_STEP, DEFAULT_MAP_SIZE, DEFAULT_SURFACE_HEIGHT, LAND_HEIGHT_STEP, MAX_TILE_ELEMENTS,
};
use crate::coords::{CoordsXY, CoordsXYZ, TileCoordsXY};
use crate::ride::RideId;

pub use clearance::*;
pub use element::*;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tile {
    pub owned: bool,
    pub elements: Vec<TileElement>,
}

#[derive(Resource, Debug, Clone)]
pub struct TileMap {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
    element_count: usize,
    max_elements: usize,
}

impl Default for TileMap {
    fn default() -> Self {
        Self::new(DEFAULT_MAP_SIZE, DEFAULT_MAP_SIZE)
    }
}

impl TileMap {
    /// A flat, dry, unowned map of `width` x `height` tiles.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let count = (width * height) as usize;
        let surface = TileElement::new(
            DEFAULT_SURFACE_HEIGHT,
            DEFAULT_SURFACE_HEIGHT + LAND_HEIGHT_STEP,
            QUARTER_TILE_FULL,
            TileElementKind::Surface(SurfaceElement::default()),
        );
        let tiles = vec![
            Tile {
                owned: false,
                elements: vec![surface],
            };
            count
        ];
        Self {
            width,
            height,
            tiles,
            element_count: count,
            max_elements: MAX_TILE_ELEMENTS.max(count * 4),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn element_count(&self) -> usize {
        self.element_count
    }

    /// Cap the total element count (surfaces included).
    pub fn set_max_elements(&mut self, max_elements: usize) {
        self.max_elements = max_elements;
    }

    fn index(&self, tile: TileCoordsXY) -> Option<usize> {
        if tile.x < 0 || tile.y < 0 || tile.x >= self.width || tile.y >= self.height {
            return None;
        }
        Some((tile.y * self.width + tile.x) as usize)
    }

    pub fn is_location_valid(&self, loc: CoordsXY) -> bool {
        loc.x >= 0
            && loc.y >= 0
            && loc.x < self.width * COORDS_XY_STEP
            && loc.y < self.height * COORDS_XY_STEP
    }

    pub fn is_location_owned(&self, loc: CoordsXYZ) -> bool {
        self.tile(loc.xy().to_tile()).is_some_and(|t| t.owned)
    }

    pub fn set_owned(&mut self, tile: TileCoordsXY, owned: bool) {
        if let Some(i) = self.index(tile) {
            self.tiles[i].owned = owned;
        }
    }

    pub fn set_all_owned(&mut self, owned: bool) {
        for tile in &mut self.tiles {
            tile.owned = owned;
        }
    }

    pub fn tile(&self, tile: TileCoordsXY) -> Option<&Tile> {
        self.index(tile).map(|i| &self.tiles[i])
    }

    /// Row-major iteration over every tile.
    pub fn iter_tiles(&self) -> impl Iterator<Item = (TileCoordsXY, &Tile)> {
        let width = self.width;
        self.tiles.iter().enumerate().map(move |(i, t)| {
            let i = i as i32;
            (TileCoordsXY::new(i % width, i / width), t)
        })
    }

    pub fn elements_at(&self, loc: CoordsXY) -> &[TileElement] {
        match self.index(loc.to_tile()) {
            Some(i) => &self.tiles[i].elements,
            None => &[],
        }
    }

    fn elements_at_mut(&mut self, loc: CoordsXY) -> Option<&mut Vec<TileElement>> {
        let i = self.index(loc.to_tile())?;
        Some(&mut self.tiles[i].elements)
    }

    pub fn surface_at(&self, loc: CoordsXY) -> Option<(&TileElement, &SurfaceElement)> {
        self.elements_at(loc)
            .iter()
            .find_map(|e| e.as_surface().map(|s| (e, s)))
    }

    pub fn surface_at_mut(&mut self, loc: CoordsXY) -> Option<&mut TileElement> {
        self.elements_at_mut(loc)?
            .iter_mut()
            .find(|e| e.is_surface())
    }

    /// Reshape the surface of one tile.
    pub fn set_surface(&mut self, loc: CoordsXY, base_z: i32, slope: u8, water_height: i32) {
        if let Some(surface) = self.surface_at_mut(loc) {
            surface.base_z = base_z;
            surface.clearance_z = base_z + LAND_HEIGHT_STEP;
            if let TileElementKind::Surface(s) = &mut surface.kind {
                s.slope = slope;
                s.water_height = water_height;
            }
        }
        if let Some(elements) = self.elements_at_mut(loc) {
            elements.sort_by_key(|e| (!e.is_surface(), e.base_z));
        }
    }

    /// The footpath whose base sits exactly at `loc.z`.
    pub fn footpath_at(&self, loc: CoordsXYZ) -> Option<&TileElement> {
        self.elements_at(loc.xy())
            .iter()
            .find(|e| e.base_z == loc.z && e.as_path().is_some())
    }

    pub fn footpath_at_mut(&mut self, loc: CoordsXYZ) -> Option<&mut TileElement> {
        self.elements_at_mut(loc.xy())?
            .iter_mut()
            .find(|e| e.base_z == loc.z && e.as_path().is_some())
    }

    /// The track element of `ride` at `loc` with the given base height.
    pub fn track_at(&self, loc: CoordsXYZ, ride: RideId) -> Option<&TileElement> {
        self.elements_at(loc.xy())
            .iter()
            .find(|e| e.base_z == loc.z && e.as_track().is_some_and(|t| t.ride == ride))
    }

    pub fn has_capacity(&self, num_elements: usize) -> bool {
        self.element_count + num_elements <= self.max_elements
    }

    /// Insert an element into the tile's stack, keeping it ordered by height
    /// above the surface. Returns `None` when off-map or out of capacity.
    pub fn insert(&mut self, loc: CoordsXY, element: TileElement) -> Option<&mut TileElement> {
        if !self.has_capacity(1) {
            warn!(
                "TileMap: element limit of {} reached, cannot insert at {:?}",
                self.max_elements, loc
            );
            return None;
        }
        let elements = self.elements_at_mut(loc)?;
        let pos = elements
            .iter()
            .position(|e| !e.is_surface() && e.base_z > element.base_z)
            .unwrap_or(elements.len());
        elements.insert(pos, element);
        self.element_count += 1;
        self.elements_at_mut(loc)?.get_mut(pos)
    }

    /// Remove every non-surface element on the tile matching `pred`.
    pub fn remove_where(&mut self, loc: CoordsXY, pred: impl Fn(&TileElement) -> bool) -> usize {
        let Some(elements) = self.elements_at_mut(loc) else {
            return 0;
        };
        let before = elements.len();
        elements.retain(|e| e.is_surface() || !pred(e));
        let removed = before - elements.len();
        self.element_count -= removed;
        removed
    }
}
