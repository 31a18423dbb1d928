//! Recently executed actions and their results.
//!
//! Ghost previews are logged alongside real edits but kept apart by the
//! queries, so a stream of cursor previews never hides the last real
//! placement.

use std::collections::VecDeque;

use bevy::prelude::*;

use super::{ActionPayload, ActionResult, ActionSource, ParkAction, QueuedAction};
use crate::ride::RideId;

const MAX_ENTRIES: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct LoggedAction {
    pub tick: u64,
    pub source: ActionSource,
    pub action: ParkAction,
    pub result: ActionResult,
}

impl LoggedAction {
    pub fn is_ghost(&self) -> bool {
        self.action.is_ghost()
    }

    /// The ride a successful design placement created.
    pub fn built_ride(&self) -> Option<RideId> {
        if !self.action.is_design_placement() || !self.result.is_ok() {
            return None;
        }
        match self.result.payload {
            ActionPayload::Ride { ride } => Some(ride),
            _ => None,
        }
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct ActionResultLog {
    entries: VecDeque<LoggedAction>,
}

impl ActionResultLog {
    pub fn push(&mut self, queued: QueuedAction, result: ActionResult) {
        if self.entries.len() >= MAX_ENTRIES {
            self.entries.pop_front();
        }
        self.entries.push_back(LoggedAction {
            tick: queued.tick,
            source: queued.source,
            action: queued.action,
            result,
        });
    }

    pub fn last(&self) -> Option<&LoggedAction> {
        self.entries.back()
    }

    /// Newest action that was not a ghost preview.
    pub fn last_real(&self) -> Option<&LoggedAction> {
        self.entries.iter().rev().find(|e| !e.is_ghost())
    }

    /// Rides built by real design placements, oldest first.
    pub fn built_rides(&self) -> impl Iterator<Item = RideId> + '_ {
        self.entries
            .iter()
            .filter(|e| !e.is_ghost())
            .filter_map(LoggedAction::built_ride)
    }

    pub fn ghost_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_ghost()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LoggedAction> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
