//! Actions waiting for the next fixed tick.
//!
//! A track design preview follows the cursor, so a new ghost design placement
//! supersedes any ghost placement still waiting in the queue. Ghosts are
//! dropped from the saved queue; only real edits survive a reload.

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use super::ParkAction;
use crate::Saveable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub enum ActionSource {
    Player,
    Agent,
    Replay,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct QueuedAction {
    pub tick: u64,
    pub source: ActionSource,
    pub action: ParkAction,
}

impl QueuedAction {
    fn is_ghost_design(&self) -> bool {
        self.action.is_design_placement() && self.action.is_ghost()
    }
}

#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct ActionQueue {
    pending: Vec<QueuedAction>,
}

impl ActionQueue {
    pub fn push(&mut self, tick: u64, source: ActionSource, action: ParkAction) {
        self.push_queued(QueuedAction {
            tick,
            source,
            action,
        });
    }

    pub fn push_queued(&mut self, queued: QueuedAction) {
        if queued.is_ghost_design() {
            let before = self.pending.len();
            self.pending.retain(|q| !q.is_ghost_design());
            let replaced = before - self.pending.len();
            if replaced > 0 {
                debug!("Ghost design placement replaced {} pending preview(s)", replaced);
            }
        }
        self.pending.push(queued);
    }

    pub fn drain(&mut self) -> Vec<QueuedAction> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn ghost_count(&self) -> usize {
        self.pending.iter().filter(|q| q.action.is_ghost()).count()
    }
}

impl Saveable for ActionQueue {
    const SAVE_KEY: &'static str = "action_queue";

    fn save_to_bytes(&self) -> Option<Vec<u8>> {
        let kept = ActionQueue {
            pending: self
                .pending
                .iter()
                .filter(|q| !q.action.is_ghost())
                .cloned()
                .collect(),
        };
        if kept.is_empty() {
            return None;
        }
        Some(bitcode::encode(&kept))
    }

    fn load_from_bytes(bytes: &[u8]) -> Result<Self, bitcode::Error> {
        bitcode::decode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{CoordsXYZ, CoordsXYZD};
    use crate::game_actions::{ActionFlags, FootpathRemoveAction, TrackPlaceAction};
    use crate::ride::{RideId, RideType};
    use crate::track_data::TrackElemType;
    use crate::track_design::{TrackDesign, TrackDesignAction};

    fn place_flat(flags: ActionFlags) -> ParkAction {
        ParkAction::TrackPlace(
            TrackPlaceAction::new(
                RideId(0),
                TrackElemType::FLAT,
                RideType::LOOPING_ROLLER_COASTER,
                CoordsXYZD::new(64, 64, 112, 1),
            )
            .with_flags(flags),
        )
    }

    fn place_design(x: i32, flags: ActionFlags) -> ParkAction {
        let action = TrackDesignAction::new(TrackDesign::default(), CoordsXYZD::new(x, 64, 112, 0))
            .with_flags(flags);
        ParkAction::PlaceTrackDesign(Box::new(action))
    }

    fn ghost() -> ActionFlags {
        ActionFlags::APPLY | ActionFlags::GHOST
    }

    #[test]
    fn drain_keeps_fifo_order() {
        let mut queue = ActionQueue::default();
        queue.push(10, ActionSource::Player, ParkAction::SetPaused { paused: true });
        queue.push(10, ActionSource::Agent, place_flat(ActionFlags::APPLY));
        queue.push(
            11,
            ActionSource::Replay,
            ParkAction::FootpathRemove(FootpathRemoveAction {
                loc: CoordsXYZ::new(32, 32, 112),
                flags: ActionFlags::APPLY,
            }),
        );

        let drained = queue.drain();
        assert!(queue.is_empty());
        let ticks: Vec<u64> = drained.iter().map(|q| q.tick).collect();
        assert_eq!(ticks, vec![10, 10, 11]);
        assert_eq!(drained[1].source, ActionSource::Agent);
    }

    #[test]
    fn newer_ghost_design_replaces_pending_one() {
        let mut queue = ActionQueue::default();
        queue.push(1, ActionSource::Player, place_design(64, ghost()));
        queue.push(1, ActionSource::Player, place_flat(ghost()));
        queue.push(2, ActionSource::Player, place_design(96, ghost()));

        assert_eq!(queue.len(), 2);
        let drained = queue.drain();
        assert_eq!(drained[0].action, place_flat(ghost()));
        assert_eq!(drained[1].action, place_design(96, ghost()));
    }

    #[test]
    fn real_design_placement_does_not_replace_ghost() {
        let mut queue = ActionQueue::default();
        queue.push(1, ActionSource::Player, place_design(64, ghost()));
        queue.push(1, ActionSource::Player, place_design(64, ActionFlags::APPLY));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.ghost_count(), 1);
    }

    #[test]
    fn saved_queue_drops_ghosts() {
        let mut queue = ActionQueue::default();
        queue.push(42, ActionSource::Player, place_flat(ActionFlags::APPLY));
        queue.push(42, ActionSource::Player, place_design(64, ghost()));

        let bytes = queue
            .save_to_bytes()
            .expect("real action should produce save bytes");
        let restored = ActionQueue::load_from_bytes(&bytes).unwrap();
        assert_eq!(restored.len(), 1);
        assert_eq!(restored.ghost_count(), 0);
    }

    #[test]
    fn ghost_only_queue_saves_nothing() {
        let mut queue = ActionQueue::default();
        queue.push(1, ActionSource::Player, place_design(64, ghost()));
        assert!(queue.save_to_bytes().is_none());
        assert!(ActionQueue::default().save_to_bytes().is_none());
    }
}
