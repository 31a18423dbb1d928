use bevy::prelude::*;

use super::executor::execute_queued_actions;
use super::result_log::ActionResultLog;
use super::ActionQueue;
use crate::{SaveableAppExt, SimulationSet};

/// Queued map edits (track, maze, entrance, footpath and scenery placement)
/// run at the start of every fixed tick, before track design requests.
pub struct GameActionsPlugin;

impl Plugin for GameActionsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActionQueue>()
            .init_resource::<ActionResultLog>()
            .add_systems(
                FixedUpdate,
                execute_queued_actions.in_set(SimulationSet::PreSim),
            )
            .register_saveable::<ActionQueue>();
    }
}
