//! Importer dispatch by file extension.
//!
//! Loading is split in two: `load` reads and decodes the file envelope,
//! `import` maps the decoded bytes onto a [`TrackDesign`]. Callers that want
//! to try several formats construct one importer per guess.

use std::fs;
use std::path::Path;

use park_sim::track_design::TrackDesign;

use crate::config::{EXTENSION_DESIGN_FILE, EXTENSION_TD4, EXTENSION_TD6};
use crate::error::TrackImportError;
use crate::legacy::td4_importer::Td4Importer;
use crate::legacy::td6_importer::Td6Importer;
use crate::legacy::vehicle_lookup::VehicleLookup;
use crate::orca::OrcaImporter;

pub trait TrackImporter: Send {
    /// Lower-case extension this importer accepts, without the dot.
    fn extension(&self) -> &'static str;

    fn load_from_bytes(&mut self, bytes: &[u8]) -> Result<(), TrackImportError>;

    fn import(&mut self) -> Result<TrackDesign, TrackImportError>;

    /// Name given to the design when the file format does not store one.
    fn set_fallback_name(&mut self, _name: &str) {}

    /// Vehicle index used to split legacy ride types.
    fn set_vehicle_lookup(&mut self, _lookup: VehicleLookup) {}

    fn load(&mut self, path: &Path) -> Result<(), TrackImportError> {
        let extension = file_extension(path);
        if extension != self.extension() {
            return Err(TrackImportError::WrongExtension(extension));
        }
        let bytes = fs::read(path)?;
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            self.set_fallback_name(stem);
        }
        self.load_from_bytes(&bytes)
    }
}

fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// The importer for files with `extension` (case-insensitive, with or
/// without a leading dot).
pub fn create_importer(extension: &str) -> Result<Box<dyn TrackImporter>, TrackImportError> {
    let normalized = extension.trim_start_matches('.').to_ascii_lowercase();
    match normalized.as_str() {
        EXTENSION_TD4 => Ok(Box::new(Td4Importer::new())),
        EXTENSION_TD6 => Ok(Box::new(Td6Importer::new())),
        EXTENSION_DESIGN_FILE => Ok(Box::new(OrcaImporter::new())),
        _ => Err(TrackImportError::WrongExtension(normalized)),
    }
}

/// Load and import the design at `path` with the importer its extension
/// selects.
pub fn import_track_design(
    path: &Path,
    vehicles: &VehicleLookup,
) -> Result<TrackDesign, TrackImportError> {
    let mut importer = create_importer(&file_extension(path))?;
    importer.set_vehicle_lookup(vehicles.clone());
    importer.load(path)?;
    importer.import()
}
