use bevy::prelude::*;

pub mod config;
pub mod context;
pub mod coords;
pub mod footpath;
pub mod game_actions;
pub mod objects;
pub mod park;
pub mod ride;
pub mod saveable;
pub mod simulation_sets;
pub mod tile_map;
pub mod track_data;
pub mod track_design;

#[cfg(any(test, feature = "bench"))]
pub mod test_harness;


pub use saveable::{
    load_world, reset_world, save_world, ExtensionMap, Saveable, SaveableAppExt, SaveableRegistry,
};
pub use simulation_sets::SimulationSet;

use game_actions::GameActionsPlugin;
use objects::ObjectRepository;
use park::{Cheats, MapAnimations, MapSelection, ParkSettings};
use ride::RideRegistry;
use tile_map::TileMap;
use track_design::TrackDesignPlugin;

// ---------------------------------------------------------------------------
// Core resources
// ---------------------------------------------------------------------------

/// Global tick counter incremented each FixedUpdate, stamped on queued actions.
#[derive(Resource, Default)]
pub struct TickCounter(pub u64);

pub struct ParkSimPlugin;

impl Plugin for ParkSimPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TickCounter>()
            .init_resource::<SaveableRegistry>()
            .init_resource::<TileMap>()
            .init_resource::<RideRegistry>()
            .init_resource::<ObjectRepository>()
            .init_resource::<ParkSettings>()
            .init_resource::<Cheats>()
            .init_resource::<MapAnimations>()
            .init_resource::<MapSelection>()
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::PreSim,
                    SimulationSet::Simulation,
                    SimulationSet::PostSim,
                )
                    .chain(),
            )
            .add_systems(FixedUpdate, tick_counter.in_set(SimulationSet::PostSim));

        app.add_plugins((GameActionsPlugin, TrackDesignPlugin));
    }
}

pub fn tick_counter(mut tick: ResMut<TickCounter>) {
    tick.0 = tick.0.wrapping_add(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_registers_park_saveables() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(ParkSimPlugin);
        let registry = app.world().resource::<SaveableRegistry>();
        let keys: Vec<&str> = registry.keys().collect();
        assert_eq!(keys, vec!["action_queue", "track_design_repository"], "got: {keys:?}");
    }
}
