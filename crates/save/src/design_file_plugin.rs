use std::path::{Path, PathBuf};

use bevy::prelude::*;
use park_sim::objects::ObjectRepository;
use park_sim::track_design::{TrackDesignId, TrackDesignRepository};
use park_sim::SaveableRegistry;

use crate::atomic_write::atomic_write;
use crate::config::{EXTENSION_DESIGN_FILE, EXTENSION_TD6};
use crate::importer::import_track_design;
use crate::legacy::td6_exporter::export_td6;
use crate::legacy::vehicle_lookup::VehicleLookup;
use crate::orca::export_design_file;
use crate::park_state::{load_park_state, save_park_state};

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Import the design file at `path` into the park's design repository.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct LoadTrackDesignEvent {
    pub path: PathBuf,
}

/// Write an installed design to disk.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct ExportTrackDesignEvent {
    pub design: TrackDesignId,
    pub path: PathBuf,
    pub format: DesignFileFormat,
}

/// Write the park's saved resources (installed designs, pending actions).
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct SaveParkStateEvent {
    pub path: PathBuf,
}

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct LoadParkStateEvent {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DesignFileFormat {
    /// Second-game fixed layout; lossy for newer pieces and statistics.
    Td6,
    #[default]
    DesignFile,
}

impl DesignFileFormat {
    pub fn extension(self) -> &'static str {
        match self {
            DesignFileFormat::Td6 => EXTENSION_TD6,
            DesignFileFormat::DesignFile => EXTENSION_DESIGN_FILE,
        }
    }

    /// The export format for a path, by extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            EXTENSION_TD6 => Some(DesignFileFormat::Td6),
            EXTENSION_DESIGN_FILE => Some(DesignFileFormat::DesignFile),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome log
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesignFileOutcome {
    Loaded { path: PathBuf, design: TrackDesignId },
    LoadFailed { path: PathBuf, error: String },
    Exported { path: PathBuf, bytes: usize },
    ExportFailed { path: PathBuf, error: String },
    ParkStateSaved { path: PathBuf, resources: usize },
    ParkStateLoaded { path: PathBuf, resources: usize },
    ParkStateFailed { path: PathBuf, error: String },
}

const MAX_FILE_OUTCOMES: usize = 32;

#[derive(Resource, Debug, Clone, Default)]
pub struct DesignFileLog {
    entries: Vec<DesignFileOutcome>,
}

impl DesignFileLog {
    pub fn push(&mut self, outcome: DesignFileOutcome) {
        if self.entries.len() >= MAX_FILE_OUTCOMES {
            self.entries.remove(0);
        }
        self.entries.push(outcome);
    }

    pub fn last(&self) -> Option<&DesignFileOutcome> {
        self.entries.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DesignFileOutcome> {
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

/// Keep the legacy vehicle index in step with the loaded objects.
fn refresh_vehicle_lookup(objects: Res<ObjectRepository>, lookup: Res<VehicleLookup>) {
    if objects.is_changed() {
        lookup.refresh(&objects);
        debug!("Vehicle lookup refreshed: {} vehicles", lookup.len());
    }
}

fn load_track_designs(
    mut events: EventReader<LoadTrackDesignEvent>,
    mut repository: ResMut<TrackDesignRepository>,
    lookup: Res<VehicleLookup>,
    mut log: ResMut<DesignFileLog>,
) {
    for event in events.read() {
        match import_track_design(&event.path, &lookup) {
            Ok(design) => {
                let id = repository.install(design);
                info!("Loaded track design {} as {:?}", event.path.display(), id);
                log.push(DesignFileOutcome::Loaded {
                    path: event.path.clone(),
                    design: id,
                });
            }
            Err(e) => {
                error!("Failed to load track design {}: {}", event.path.display(), e);
                log.push(DesignFileOutcome::LoadFailed {
                    path: event.path.clone(),
                    error: e.to_string(),
                });
            }
        }
    }
}

fn export_track_designs(
    mut events: EventReader<ExportTrackDesignEvent>,
    repository: Res<TrackDesignRepository>,
    mut log: ResMut<DesignFileLog>,
) {
    for event in events.read() {
        let Some(installed) = repository.get(event.design) else {
            warn!("Track design {:?} is not installed", event.design);
            log.push(DesignFileOutcome::ExportFailed {
                path: event.path.clone(),
                error: format!("track design {:?} is not installed", event.design),
            });
            continue;
        };
        let encoded = match event.format {
            DesignFileFormat::Td6 => export_td6(&installed.design),
            DesignFileFormat::DesignFile => export_design_file(&installed.design),
        };
        let result = encoded.and_then(|bytes| {
            atomic_write(&event.path, &bytes)?;
            Ok(bytes.len())
        });
        match result {
            Ok(bytes) => {
                info!(
                    "Exported track design {} to {} ({} bytes)",
                    installed.name(),
                    event.path.display(),
                    bytes
                );
                log.push(DesignFileOutcome::Exported {
                    path: event.path.clone(),
                    bytes,
                });
            }
            Err(e) => {
                warn!(
                    "Failed to export track design {} to {}: {}",
                    installed.name(),
                    event.path.display(),
                    e
                );
                log.push(DesignFileOutcome::ExportFailed {
                    path: event.path.clone(),
                    error: e.to_string(),
                });
            }
        }
    }
}

/// Exclusive: the saveable registry reads and replaces resources across the
/// whole world.
fn handle_park_state_requests(world: &mut World) {
    let saves: Vec<SaveParkStateEvent> = world
        .resource_mut::<Events<SaveParkStateEvent>>()
        .drain()
        .collect();
    for event in saves {
        let outcome = match save_park_state(world, &event.path) {
            Ok(resources) => DesignFileOutcome::ParkStateSaved {
                path: event.path,
                resources,
            },
            Err(e) => {
                error!("Failed to save park state to {}: {}", event.path.display(), e);
                DesignFileOutcome::ParkStateFailed {
                    path: event.path,
                    error: e.to_string(),
                }
            }
        };
        world.resource_mut::<DesignFileLog>().push(outcome);
    }

    let loads: Vec<LoadParkStateEvent> = world
        .resource_mut::<Events<LoadParkStateEvent>>()
        .drain()
        .collect();
    for event in loads {
        let outcome = match load_park_state(world, &event.path) {
            Ok(resources) => DesignFileOutcome::ParkStateLoaded {
                path: event.path,
                resources,
            },
            Err(e) => {
                error!("Failed to load park state {}: {}", event.path.display(), e);
                DesignFileOutcome::ParkStateFailed {
                    path: event.path,
                    error: e.to_string(),
                }
            }
        };
        world.resource_mut::<DesignFileLog>().push(outcome);
    }
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

pub struct TrackDesignFilesPlugin;

impl Plugin for TrackDesignFilesPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<LoadTrackDesignEvent>()
            .add_event::<ExportTrackDesignEvent>()
            .add_event::<SaveParkStateEvent>()
            .add_event::<LoadParkStateEvent>()
            .init_resource::<SaveableRegistry>()
            .init_resource::<VehicleLookup>()
            .init_resource::<DesignFileLog>()
            .init_resource::<ObjectRepository>()
            .init_resource::<TrackDesignRepository>()
            .add_systems(
                Update,
                (
                    refresh_vehicle_lookup,
                    load_track_designs,
                    export_track_designs,
                    handle_park_state_requests,
                )
                    .chain(),
            );
    }
}
