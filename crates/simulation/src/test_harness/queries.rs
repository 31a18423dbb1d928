//! Ticking, event helpers and resource accessors for `TestPark`.

use bevy::prelude::*;

use crate::coords::CoordsXYZD;
use crate::game_actions::{ActionQueue, ActionResultLog, ActionSource, ParkAction};
use crate::park::ParkSettings;
use crate::ride::{RideId, RideRegistry};
use crate::tile_map::TileMap;
use crate::track_design::{
    CaptureTrackDesignEvent, PlaceTrackDesignEvent, ScenerySelection, TrackDesignId,
    TrackDesignRepository, TrackDesignResultLog,
};
use crate::TickCounter;

use super::TestPark;

impl TestPark {
    // -----------------------------------------------------------------------
    // Simulation control
    // -----------------------------------------------------------------------

    /// Run `n` fixed-update ticks.
    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.app.world_mut().run_schedule(FixedUpdate);
        }
    }

    /// Queue an action as the player; it runs on the next tick.
    pub fn queue_action(&mut self, action: ParkAction) {
        let tick = self.app.world().resource::<TickCounter>().0;
        self.app
            .world_mut()
            .resource_mut::<ActionQueue>()
            .push(tick, ActionSource::Player, action);
    }

    pub fn request_place(&mut self, design: TrackDesignId, origin: CoordsXYZD, ghost: bool) {
        self.app.world_mut().send_event(PlaceTrackDesignEvent {
            design,
            origin,
            ghost,
        });
    }

    pub fn request_capture(&mut self, ride: RideId, select_nearby_scenery: bool) {
        self.app.world_mut().send_event(CaptureTrackDesignEvent {
            ride,
            select_nearby_scenery,
        });
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    pub fn map(&self) -> &TileMap {
        self.app.world().resource::<TileMap>()
    }

    pub fn rides(&self) -> &RideRegistry {
        self.app.world().resource::<RideRegistry>()
    }

    pub fn rides_mut(&mut self) -> Mut<'_, RideRegistry> {
        self.app.world_mut().resource_mut::<RideRegistry>()
    }

    pub fn settings(&self) -> &ParkSettings {
        self.app.world().resource::<ParkSettings>()
    }

    pub fn designs(&self) -> &TrackDesignRepository {
        self.app.world().resource::<TrackDesignRepository>()
    }

    pub fn scenery_selection(&self) -> &ScenerySelection {
        self.app.world().resource::<ScenerySelection>()
    }

    pub fn design_log(&self) -> &TrackDesignResultLog {
        self.app.world().resource::<TrackDesignResultLog>()
    }

    pub fn action_log(&self) -> &ActionResultLog {
        self.app.world().resource::<ActionResultLog>()
    }

    pub fn tick_count(&self) -> u64 {
        self.app.world().resource::<TickCounter>().0
    }
}
