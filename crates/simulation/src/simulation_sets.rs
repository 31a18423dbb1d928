//! Deterministic ordering of park systems via `SystemSet` phases.
//!
//! ```text
//! PreSim  →  Simulation  →  PostSim
//! ```
//!
//! * **PreSim**: queued game actions, then track design placement and
//!   capture requests. Everything that mutates the map runs here.
//! * **Simulation**: per-tick park logic reading the map built in PreSim.
//! * **PostSim**: bookkeeping such as the tick counter.

use bevy::prelude::*;

/// Ordered phases for systems running in the `FixedUpdate` schedule.
///
/// Configured as a chain by `ParkSimPlugin`. Plugins use
/// `.in_set(SimulationSet::X)` and add `.after()` / `.before()` constraints
/// within a phase where order matters.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    PreSim,
    Simulation,
    PostSim,
}
