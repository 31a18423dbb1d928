//! # TestPark: headless integration test harness
//!
//! Provides a fluent builder that wraps `bevy::app::App` + `ParkSimPlugin`
//! for running integration tests without a window or renderer.

mod queries;
mod setup;

use bevy::app::App;
use bevy::prelude::*;

use crate::config::DEFAULT_MAP_SIZE;
use crate::tile_map::TileMap;
use crate::ParkSimPlugin;

/// A headless Bevy App wrapping `ParkSimPlugin` for integration testing.
///
/// Use builder methods to set up the park, then call `tick()` to advance the
/// fixed-update schedule and query/assert on the resulting resources.
pub struct TestPark {
    app: App,
}

impl TestPark {
    /// An empty park on a flat, fully owned default-sized map.
    pub fn new() -> Self {
        Self::with_size(DEFAULT_MAP_SIZE, DEFAULT_MAP_SIZE)
    }

    pub fn with_size(width: i32, height: i32) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(ParkSimPlugin);

        let mut map = TileMap::new(width, height);
        map.set_all_owned(true);
        app.insert_resource(map);

        // Run one update so Startup systems execute.
        app.update();

        Self { app }
    }
}

impl Default for TestPark {
    fn default() -> Self {
        Self::new()
    }
}
