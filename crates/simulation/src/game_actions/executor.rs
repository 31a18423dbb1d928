//! Action executor system: drains the [`ActionQueue`] each fixed-update tick,
//! runs every queued [`ParkAction`] against the park resources and records
//! the outcome in the [`ActionResultLog`]. Failed ghost previews are routine
//! and only logged at debug level.

use bevy::prelude::*;

use crate::context::{ParkContext, PlacementContext};
use crate::objects::ObjectRepository;
use crate::park::{Cheats, MapAnimations, MapSelection, ParkSettings};
use crate::ride::RideRegistry;
use crate::tile_map::TileMap;

use super::result_log::ActionResultLog;
use super::{run_nested, ActionQueue};

/// Drains all pending actions from the queue and runs them in order.
#[allow(clippy::too_many_arguments)]
pub fn execute_queued_actions(
    mut queue: ResMut<ActionQueue>,
    mut log: ResMut<ActionResultLog>,
    mut map: ResMut<TileMap>,
    mut rides: ResMut<RideRegistry>,
    objects: Res<ObjectRepository>,
    mut settings: ResMut<ParkSettings>,
    cheats: Res<Cheats>,
    mut animations: ResMut<MapAnimations>,
    mut selection: ResMut<MapSelection>,
) {
    if queue.is_empty() {
        return;
    }
    let mut ctx = ParkContext {
        map: &mut map,
        rides: &mut rides,
        objects: &objects,
        settings: &mut settings,
        cheats: &cheats,
        animations: &mut animations,
        selection: &mut selection,
        placement: PlacementContext::default(),
    };
    for queued in queue.drain() {
        let result = run_nested(&queued.action, &mut ctx);
        if result.is_ok() || queued.action.is_ghost() {
            debug!("Action from {:?} at tick {}: {}", queued.source, queued.tick, result);
        } else {
            info!(
                "Action from {:?} at tick {} failed: {}",
                queued.source, queued.tick, result
            );
        }
        log.push(queued, result);
    }
}
