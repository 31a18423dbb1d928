//! Track design files: the legacy TD4/TD6 formats, the native `.td` design
//! file, park state files, and the Bevy plugin that moves them between disk
//! and the park.

#[cfg(not(target_arch = "wasm32"))]
pub mod atomic_write;
pub mod byte_stream;
pub mod config;
#[cfg(not(target_arch = "wasm32"))]
pub mod design_file_plugin;
pub mod error;
pub mod importer;
pub mod legacy;
pub mod orca;
pub mod park_state;
pub mod sawyer;


#[cfg(not(target_arch = "wasm32"))]
pub use design_file_plugin::{
    DesignFileFormat, DesignFileLog, DesignFileOutcome, ExportTrackDesignEvent, LoadParkStateEvent,
    LoadTrackDesignEvent, SaveParkStateEvent, TrackDesignFilesPlugin,
};
pub use error::{ChunkError, TrackExportError, TrackImportError};
pub use importer::{create_importer, import_track_design, TrackImporter};
pub use legacy::td6_exporter::export_td6;
pub use legacy::vehicle_lookup::VehicleLookup;
pub use orca::export_design_file;
pub use park_state::{decode_park_state, encode_park_state};
