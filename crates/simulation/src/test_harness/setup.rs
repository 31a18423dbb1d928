//! Builder methods for terrain, funds, objects and designs in integration tests.

use crate::coords::TileCoordsXY;
use crate::objects::{ObjectEntryDescriptor, ObjectIndex, ObjectKind, ObjectRepository};
use crate::park::{Cheats, ParkSettings};
use crate::tile_map::TileMap;
use crate::track_design::{TrackDesign, TrackDesignId, TrackDesignRepository};

use super::TestPark;

impl TestPark {
    // -----------------------------------------------------------------------
    // Terrain and land
    // -----------------------------------------------------------------------

    /// Set every tile's surface to `base_z`, flat and dry.
    pub fn with_flat_terrain(mut self, base_z: i32) -> Self {
        let mut map = self.app.world_mut().resource_mut::<TileMap>();
        let tiles: Vec<TileCoordsXY> = map.iter_tiles().map(|(t, _)| t).collect();
        for tile in tiles {
            map.set_surface(tile.to_coords(), base_z, 0, 0);
        }
        self
    }

    /// Flood the rectangle of tiles `min..=max` to `water_height`.
    pub fn with_water(mut self, min: TileCoordsXY, max: TileCoordsXY, water_height: i32) -> Self {
        let mut map = self.app.world_mut().resource_mut::<TileMap>();
        for y in min.y..=max.y {
            for x in min.x..=max.x {
                let loc = TileCoordsXY::new(x, y).to_coords();
                let Some((element, surface)) = map.surface_at(loc) else {
                    continue;
                };
                let (base_z, slope) = (element.base_z, surface.slope);
                map.set_surface(loc, base_z, slope, water_height);
            }
        }
        self
    }

    /// Give up ownership of the rectangle of tiles `min..=max`.
    pub fn without_land(mut self, min: TileCoordsXY, max: TileCoordsXY) -> Self {
        let mut map = self.app.world_mut().resource_mut::<TileMap>();
        for y in min.y..=max.y {
            for x in min.x..=max.x {
                map.set_owned(TileCoordsXY::new(x, y), false);
            }
        }
        self
    }

    // -----------------------------------------------------------------------
    // Park state
    // -----------------------------------------------------------------------

    pub fn with_cash(mut self, cash: i64) -> Self {
        self.app.world_mut().resource_mut::<ParkSettings>().cash = cash;
        self
    }

    pub fn paused(mut self) -> Self {
        self.app.world_mut().resource_mut::<ParkSettings>().paused = true;
        self
    }

    pub fn with_cheats(mut self, cheats: Cheats) -> Self {
        self.app.world_mut().insert_resource(cheats);
        self
    }

    // -----------------------------------------------------------------------
    // Objects and designs
    // -----------------------------------------------------------------------

    /// Load an object into the park's repository.
    pub fn register_object(&mut self, entry: ObjectEntryDescriptor, identifier: &str, kind: ObjectKind) -> ObjectIndex {
        self.app
            .world_mut()
            .resource_mut::<ObjectRepository>()
            .register(entry, identifier, kind)
    }

    /// Install `design` in the park's design repository.
    pub fn install_design(&mut self, design: TrackDesign) -> TrackDesignId {
        self.app
            .world_mut()
            .resource_mut::<TrackDesignRepository>()
            .install(design)
    }
}
