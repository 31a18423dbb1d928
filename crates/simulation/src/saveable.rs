//! Park resources that persist between sessions.
//!
//! Each persisted resource implements [`Saveable`] and is stored under its own
//! key in an [`ExtensionMap`]. The save crate frames that map into a park
//! state file. On load, keys nobody registered are skipped and registered
//! resources missing from the map keep their current value.

use std::collections::BTreeMap;

use bevy::prelude::*;

/// Saved resource bytes by [`Saveable::SAVE_KEY`].
pub type ExtensionMap = BTreeMap<String, Vec<u8>>;

pub trait Saveable: Resource + Default {
    /// Stable key in the extension map. Never reuse a retired key.
    const SAVE_KEY: &'static str;

    /// `None` when the resource holds nothing worth storing.
    fn save_to_bytes(&self) -> Option<Vec<u8>>;

    fn load_from_bytes(bytes: &[u8]) -> Result<Self, bitcode::Error>;
}

#[derive(Clone, Copy)]
struct SaveableEntry {
    save: fn(&World) -> Option<Vec<u8>>,
    load: fn(&mut World, &[u8]) -> bool,
    reset: fn(&mut World),
}

fn save_resource<T: Saveable>(world: &World) -> Option<Vec<u8>> {
    world.get_resource::<T>()?.save_to_bytes()
}

fn load_resource<T: Saveable>(world: &mut World, bytes: &[u8]) -> bool {
    match T::load_from_bytes(bytes) {
        Ok(value) => {
            world.insert_resource(value);
            true
        }
        Err(e) => {
            warn!(
                "Saved {} ({} bytes) is unreadable, resetting it: {}",
                T::SAVE_KEY,
                bytes.len(),
                e
            );
            world.insert_resource(T::default());
            false
        }
    }
}

fn reset_resource<T: Saveable>(world: &mut World) {
    world.insert_resource(T::default());
}

/// Every [`Saveable`] resource, filled in by the plugins that own them.
#[derive(Resource, Default)]
pub struct SaveableRegistry {
    entries: BTreeMap<&'static str, SaveableEntry>,
}

impl SaveableRegistry {
    /// Returns false, and keeps the first registration, when the key is taken.
    pub fn register<T: Saveable>(&mut self) -> bool {
        if self.entries.contains_key(T::SAVE_KEY) {
            warn!("Saveable key '{}' registered twice", T::SAVE_KEY);
            return false;
        }
        self.entries.insert(
            T::SAVE_KEY,
            SaveableEntry {
                save: save_resource::<T>,
                load: load_resource::<T>,
                reset: reset_resource::<T>,
            },
        );
        true
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    pub fn save_all(&self, world: &World) -> ExtensionMap {
        self.entries
            .iter()
            .filter_map(|(key, entry)| Some((key.to_string(), (entry.save)(world)?)))
            .collect()
    }

    /// Restore every registered resource found in `extensions`. Returns how
    /// many were restored intact.
    pub fn load_all(&self, world: &mut World, extensions: &ExtensionMap) -> usize {
        for key in extensions.keys().filter(|k| !self.contains(k)) {
            debug!("Skipping unknown saved resource '{}'", key);
        }
        let mut loaded = 0;
        for (key, entry) in &self.entries {
            if let Some(bytes) = extensions.get(*key) {
                if (entry.load)(world, bytes) {
                    loaded += 1;
                }
            }
        }
        loaded
    }

    pub fn reset_all(&self, world: &mut World) {
        for entry in self.entries.values() {
            (entry.reset)(world);
        }
    }
}

// ---------------------------------------------------------------------------
// World helpers
// ---------------------------------------------------------------------------

/// Snapshot every registered resource in `world`.
pub fn save_world(world: &World) -> ExtensionMap {
    world
        .get_resource::<SaveableRegistry>()
        .map(|registry| registry.save_all(world))
        .unwrap_or_default()
}

/// Restore `extensions` into `world`, returning how many resources loaded.
pub fn load_world(world: &mut World, extensions: &ExtensionMap) -> usize {
    let Some(registry) = world.remove_resource::<SaveableRegistry>() else {
        return 0;
    };
    let loaded = registry.load_all(world, extensions);
    world.insert_resource(registry);
    loaded
}

/// Put every registered resource back to its default.
pub fn reset_world(world: &mut World) {
    if let Some(registry) = world.remove_resource::<SaveableRegistry>() {
        registry.reset_all(world);
        world.insert_resource(registry);
    }
}

pub trait SaveableAppExt {
    fn register_saveable<T: Saveable>(&mut self) -> &mut Self;
}

impl SaveableAppExt for App {
    fn register_saveable<T: Saveable>(&mut self) -> &mut Self {
        self.init_resource::<T>().init_resource::<SaveableRegistry>();
        self.world_mut()
            .resource_mut::<SaveableRegistry>()
            .register::<T>();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcode::{Decode, Encode};

    #[derive(Resource, Default, Debug, PartialEq, Encode, Decode)]
    struct Visitors {
        count: u32,
    }

    impl Saveable for Visitors {
        const SAVE_KEY: &'static str = "visitors";

        fn save_to_bytes(&self) -> Option<Vec<u8>> {
            (self.count > 0).then(|| bitcode::encode(self))
        }

        fn load_from_bytes(bytes: &[u8]) -> Result<Self, bitcode::Error> {
            bitcode::decode(bytes)
        }
    }

    fn world_with(count: u32) -> World {
        let mut world = World::new();
        world.insert_resource(Visitors { count });
        let mut registry = SaveableRegistry::default();
        registry.register::<Visitors>();
        world.insert_resource(registry);
        world
    }

    #[test]
    fn test_save_then_load_into_fresh_world() {
        let extensions = save_world(&world_with(12));
        assert_eq!(extensions.len(), 1);

        let mut restored = world_with(0);
        assert_eq!(load_world(&mut restored, &extensions), 1);
        assert_eq!(restored.resource::<Visitors>().count, 12);
    }

    #[test]
    fn test_empty_resource_is_skipped() {
        assert!(save_world(&world_with(0)).is_empty());
    }

    #[test]
    fn test_unknown_and_missing_keys() {
        let mut world = world_with(5);
        let mut extensions = ExtensionMap::new();
        extensions.insert("retired_feature".to_string(), vec![1, 2, 3]);
        assert_eq!(load_world(&mut world, &extensions), 0);
        assert_eq!(world.resource::<Visitors>().count, 5);
    }

    #[test]
    fn test_corrupt_entry_resets_resource() {
        let mut world = world_with(5);
        let mut extensions = ExtensionMap::new();
        extensions.insert("visitors".to_string(), Vec::new());
        assert_eq!(load_world(&mut world, &extensions), 0);
        assert_eq!(world.resource::<Visitors>().count, 0);
    }

    #[test]
    fn test_reset_world() {
        let mut world = world_with(9);
        reset_world(&mut world);
        assert_eq!(world.resource::<Visitors>().count, 0);
        assert!(world.contains_resource::<SaveableRegistry>());
    }

    #[test]
    fn test_duplicate_key_keeps_first() {
        let mut registry = SaveableRegistry::default();
        assert!(registry.register::<Visitors>());
        assert!(!registry.register::<Visitors>());
        assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["visitors"]);
    }
}
