//! Vehicle name to ride type index shared by legacy importers.
//!
//! Importers may run on several threads at once (the design library scans
//! files in the background) while the object repository is refreshed, so the
//! index sits behind a mutex and every handle clone shares it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bevy::prelude::*;
use park_sim::objects::{ObjectEntryDescriptor, ObjectKind, ObjectRepository};
use park_sim::ride::RideType;

#[derive(Resource, Debug, Clone, Default)]
pub struct VehicleLookup {
    vehicles: Arc<Mutex<HashMap<String, RideType>>>,
}

impl VehicleLookup {
    pub fn from_repository(objects: &ObjectRepository) -> Self {
        let lookup = Self::default();
        lookup.refresh(objects);
        lookup
    }

    /// Rebuild the index from the loaded vehicle objects.
    pub fn refresh(&self, objects: &ObjectRepository) {
        let index: HashMap<String, RideType> = objects
            .iter()
            .filter_map(|(_, object)| match object.kind {
                ObjectKind::Vehicle { ride_type } => {
                    Some((object.entry.name.to_ascii_uppercase(), ride_type))
                }
                _ => None,
            })
            .collect();
        let Ok(mut vehicles) = self.vehicles.lock() else {
            warn!("Vehicle lookup lock poisoned; keeping previous index");
            return;
        };
        *vehicles = index;
    }

    /// The ride type `entry` is built for, if the vehicle is loaded.
    pub fn ride_type_for(&self, entry: &ObjectEntryDescriptor) -> Option<RideType> {
        let vehicles = self.vehicles.lock().ok()?;
        vehicles.get(&entry.name.to_ascii_uppercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.vehicles.lock().map_or(0, |v| v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use park_sim::objects::ObjectType;

    #[test]
    fn test_lookup_indexes_only_vehicles() {
        let mut objects = ObjectRepository::default();
        objects.register(
            ObjectEntryDescriptor::new(ObjectType::Ride, "ARRT2"),
            "rct2.ride.arrt2",
            ObjectKind::Vehicle {
                ride_type: RideType::HYPERCOASTER,
            },
        );
        objects.register(
            ObjectEntryDescriptor::new(ObjectType::Walls, "WMF"),
            "rct2.wall.wmf",
            ObjectKind::Wall { height: 32, price: 10 },
        );
        let lookup = VehicleLookup::from_repository(&objects);
        assert_eq!(lookup.len(), 1);
        let entry = ObjectEntryDescriptor::new(ObjectType::Ride, "arrt2");
        assert_eq!(lookup.ride_type_for(&entry), Some(RideType::HYPERCOASTER));
    }

    #[test]
    fn test_clones_share_refreshes() {
        let lookup = VehicleLookup::default();
        let handle = lookup.clone();
        assert!(handle.is_empty());

        let mut objects = ObjectRepository::default();
        objects.register(
            ObjectEntryDescriptor::new(ObjectType::Ride, "PMT1"),
            "rct2.ride.pmt1",
            ObjectKind::Vehicle {
                ride_type: RideType::CLASSIC_WOODEN_ROLLER_COASTER,
            },
        );
        lookup.refresh(&objects);
        let entry = ObjectEntryDescriptor::new(ObjectType::Ride, "PMT1");
        assert_eq!(
            handle.ride_type_for(&entry),
            Some(RideType::CLASSIC_WOODEN_ROLLER_COASTER)
        );
    }

    #[test]
    fn test_lookup_is_shared_across_threads() {
        let mut objects = ObjectRepository::default();
        objects.register(
            ObjectEntryDescriptor::new(ObjectType::Ride, "BMRB"),
            "rct2.ride.bmrb",
            ObjectKind::Vehicle {
                ride_type: RideType::HYPER_TWISTER,
            },
        );
        let lookup = VehicleLookup::from_repository(&objects);
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let handle = lookup.clone();
                std::thread::spawn(move || {
                    handle.ride_type_for(&ObjectEntryDescriptor::new(ObjectType::Ride, "BMRB"))
                })
            })
            .collect();
        for worker in workers {
            assert_eq!(worker.join().unwrap(), Some(RideType::HYPER_TWISTER));
        }
    }
}
