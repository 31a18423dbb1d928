//! Bevy wiring for track designs: placing installed designs, capturing built
//! rides into the repository and a short log of what happened.

use bevy::prelude::*;

use crate::context::{ParkContext, PlacementContext};
use crate::coords::CoordsXYZD;
use crate::game_actions::{execute_queued_actions, run_nested, ActionFlags, ActionPayload, ActionResult};
use crate::objects::ObjectRepository;
use crate::park::{Cheats, MapAnimations, MapSelection, ParkSettings};
use crate::ride::{RideId, RideRegistry};
use crate::tile_map::TileMap;
use crate::{SaveableAppExt, SimulationSet};

use super::capture::{create_track_design, select_nearby_scenery, CaptureError, ScenerySelection};
use super::library::{TrackDesignId, TrackDesignRepository};
use super::TrackDesignAction;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Build an installed design as a new ride.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct PlaceTrackDesignEvent {
    pub design: TrackDesignId,
    pub origin: CoordsXYZD,
    pub ghost: bool,
}

/// Save a built ride, with the current [`ScenerySelection`], as a new
/// installed design.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct CaptureTrackDesignEvent {
    pub ride: RideId,
    /// Sweep up the scenery around the ride before capturing.
    pub select_nearby_scenery: bool,
}

// ---------------------------------------------------------------------------
// Result log
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum TrackDesignOutcome {
    Placed {
        design: TrackDesignId,
        ride: Option<RideId>,
        cost: i64,
    },
    PlaceFailed {
        design: TrackDesignId,
        result: Option<ActionResult>,
    },
    Captured {
        ride: RideId,
        design: TrackDesignId,
    },
    CaptureFailed {
        ride: RideId,
        error: CaptureError,
    },
}

const MAX_OUTCOMES: usize = 32;

#[derive(Resource, Debug, Clone, Default)]
pub struct TrackDesignResultLog {
    entries: Vec<TrackDesignOutcome>,
}

impl TrackDesignResultLog {
    pub fn push(&mut self, outcome: TrackDesignOutcome) {
        if self.entries.len() >= MAX_OUTCOMES {
            self.entries.remove(0);
        }
        self.entries.push(outcome);
    }

    pub fn last(&self) -> Option<&TrackDesignOutcome> {
        self.entries.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackDesignOutcome> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
pub fn place_track_designs(
    mut events: EventReader<PlaceTrackDesignEvent>,
    repository: Res<TrackDesignRepository>,
    mut log: ResMut<TrackDesignResultLog>,
    mut map: ResMut<TileMap>,
    mut rides: ResMut<RideRegistry>,
    objects: Res<ObjectRepository>,
    mut settings: ResMut<ParkSettings>,
    cheats: Res<Cheats>,
    mut animations: ResMut<MapAnimations>,
    mut selection: ResMut<MapSelection>,
) {
    if events.is_empty() {
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
    for event in events.read() {
        let Some(installed) = repository.get(event.design) else {
            warn!("Track design {:?} is not installed", event.design);
            log.push(TrackDesignOutcome::PlaceFailed {
                design: event.design,
                result: None,
            });
            continue;
        };
        let mut flags = ActionFlags::APPLY;
        if event.ghost {
            flags = flags | ActionFlags::GHOST;
        }
        let action = TrackDesignAction::new(installed.design.clone(), event.origin).with_flags(flags);
        let result = run_nested(&action, &mut ctx);
        if result.is_ok() {
            let ride = match result.payload {
                ActionPayload::Ride { ride } => Some(ride),
                _ => None,
            };
            info!(
                "Placed track design {} at {:?}, cost {}",
                installed.name(),
                event.origin,
                result.cost
            );
            log.push(TrackDesignOutcome::Placed {
                design: event.design,
                ride,
                cost: result.cost,
            });
        } else {
            warn!("Could not place track design {}: {}", installed.name(), result);
            log.push(TrackDesignOutcome::PlaceFailed {
                design: event.design,
                result: Some(result),
            });
        }
    }
}

pub fn capture_track_designs(
    mut events: EventReader<CaptureTrackDesignEvent>,
    mut repository: ResMut<TrackDesignRepository>,
    mut scenery: ResMut<ScenerySelection>,
    mut log: ResMut<TrackDesignResultLog>,
    map: Res<TileMap>,
    rides: Res<RideRegistry>,
    objects: Res<ObjectRepository>,
) {
    for event in events.read() {
        if event.select_nearby_scenery {
            select_nearby_scenery(&mut scenery, &map, &objects, event.ride);
        }
        match create_track_design(&map, &rides, &objects, event.ride, &scenery) {
            Ok(design) => {
                let name = design.name.clone();
                let id = repository.install(design);
                info!("Saved {} as track design {:?}", name, id);
                scenery.clear();
                log.push(TrackDesignOutcome::Captured {
                    ride: event.ride,
                    design: id,
                });
            }
            Err(error) => {
                warn!(
                    "Could not save ride {} as a track design: {} ({:?})",
                    event.ride,
                    error,
                    error.category()
                );
                log.push(TrackDesignOutcome::CaptureFailed {
                    ride: event.ride,
                    error,
                });
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

pub struct TrackDesignPlugin;

impl Plugin for TrackDesignPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PlaceTrackDesignEvent>()
            .add_event::<CaptureTrackDesignEvent>()
            .init_resource::<TrackDesignRepository>()
            .init_resource::<ScenerySelection>()
            .init_resource::<TrackDesignResultLog>()
            .add_systems(
                FixedUpdate,
                (capture_track_designs, place_track_designs)
                    .chain()
                    .after(execute_queued_actions)
                    .in_set(SimulationSet::PreSim),
            );

        app.register_saveable::<TrackDesignRepository>();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_log_keeps_newest() {
        let mut log = TrackDesignResultLog::default();
        for i in 0..40 {
            log.push(TrackDesignOutcome::PlaceFailed {
                design: TrackDesignId(i),
                result: None,
            });
        }
        assert_eq!(log.len(), MAX_OUTCOMES);
        let first = log.iter().next();
        assert_eq!(
            first,
            Some(&TrackDesignOutcome::PlaceFailed {
                design: TrackDesignId(8),
                result: None
            })
        );
    }
}
