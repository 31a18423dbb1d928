//! Installed track designs.
//!
//! The repository is the park's list of designs players can pick from when
//! building a ride. It is persisted with the save through [`Saveable`], so
//! designs captured in one session remain available after a reload.

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::ride::RideType;
use crate::Saveable;

use super::TrackDesign;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Encode, Decode)]
pub struct TrackDesignId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct InstalledTrackDesign {
    pub id: TrackDesignId,
    pub design: TrackDesign,
}

impl InstalledTrackDesign {
    pub fn name(&self) -> &str {
        &self.design.name
    }
}

#[derive(Resource, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct TrackDesignRepository {
    next_id: u32,
    items: Vec<InstalledTrackDesign>,
}

impl TrackDesignRepository {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Install `design`, renaming it when another design already uses its
    /// name: `Looper` becomes `Looper (2)`, then `Looper (3)`.
    pub fn install(&mut self, mut design: TrackDesign) -> TrackDesignId {
        design.name = self.unique_name(&design.name);
        design.game_state = Default::default();
        let id = TrackDesignId(self.next_id);
        self.next_id += 1;
        debug!("Installed track design {} as {:?}", design.name, id);
        self.items.push(InstalledTrackDesign { id, design });
        id
    }

    fn unique_name(&self, base: &str) -> String {
        let base = if base.is_empty() { "Untitled" } else { base };
        if self.find_by_name(base).is_none() {
            return base.to_string();
        }
        (2u32..)
            .map(|n| format!("{base} ({n})"))
            .find(|candidate| self.find_by_name(candidate).is_none())
            .unwrap_or_else(|| base.to_string())
    }

    pub fn get(&self, id: TrackDesignId) -> Option<&InstalledTrackDesign> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&InstalledTrackDesign> {
        self.items.iter().find(|i| i.design.name == name)
    }

    /// Designs buildable as `ride_type`, in installation order.
    pub fn for_ride_type(&self, ride_type: RideType) -> impl Iterator<Item = &InstalledTrackDesign> {
        self.items.iter().filter(move |i| i.design.ride_type() == ride_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InstalledTrackDesign> {
        self.items.iter()
    }

    /// Rename a design. Fails when the name is empty or taken by another design.
    pub fn rename(&mut self, id: TrackDesignId, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.find_by_name(name).is_some_and(|i| i.id != id) {
            return false;
        }
        match self.items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                item.design.name = name.to_string();
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: TrackDesignId) -> Option<TrackDesign> {
        let index = self.items.iter().position(|i| i.id == id)?;
        Some(self.items.remove(index).design)
    }
}

impl Saveable for TrackDesignRepository {
    const SAVE_KEY: &'static str = "track_design_repository";

    fn save_to_bytes(&self) -> Option<Vec<u8>> {
        if self.items.is_empty() {
            return None;
        }
        Some(bitcode::encode(self))
    }

    fn load_from_bytes(bytes: &[u8]) -> Result<Self, bitcode::Error> {
        bitcode::decode(bytes)
    }
}
