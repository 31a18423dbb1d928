//! Track designs: saved rides that can be rebuilt anywhere in a park.
//!
//! - [`model`] holds the canonical in-memory design every file format maps to.
//! - [`transform`] rotates and mirrors a design in its local frame.
//! - [`placement`] builds a design onto the map in one of several modes.
//! - [`capture`] turns a built ride back into a design.
//! - [`library`] keeps the designs installed in the park.

pub mod capture;
pub mod library;
pub mod model;
pub mod placement;
pub mod plugin;
pub mod transform;

pub use capture::{
    create_track_design, select_nearby_scenery, CaptureError, CaptureErrorCategory,
    ScenerySelection, MAX_SELECTED_SCENERY_ELEMENTS,
};
pub use library::{InstalledTrackDesign, TrackDesignId, TrackDesignRepository};
pub use model::*;
pub use placement::{
    design_base_z, get_place_z, place_preview, place_track_design, place_virtual,
    scenery_unavailable, space_required, TrackDesignAction, TrackDesignPreview, TrackDesignState,
    TrackPlaceOperation,
};
pub use plugin::{
    CaptureTrackDesignEvent, PlaceTrackDesignEvent, TrackDesignOutcome, TrackDesignPlugin,
    TrackDesignResultLog,
};
pub use transform::{mirror, rotate};
