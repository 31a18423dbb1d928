//! Object descriptors and the repository of loaded objects.
//!
//! Designs reference objects (vehicles, scenery, footpaths) by a portable
//! [`ObjectEntryDescriptor`]; placement resolves those against the
//! [`ObjectRepository`] to get an [`ObjectIndex`].

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::ride::RideType;

pub type ObjectIndex = u16;

/// Portable reference to an object: the legacy 16-byte entry (flags, an
/// 8-character name and a checksum).
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode,
)]
pub struct ObjectEntryDescriptor {
    pub flags: u32,
    pub name: String,
    pub checksum: u32,
}

impl ObjectEntryDescriptor {
    pub fn new(object_type: ObjectType, name: &str) -> Self {
        Self {
            flags: object_type as u32,
            name: name.to_string(),
            checksum: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty()
    }

    pub fn object_type(&self) -> Option<ObjectType> {
        ObjectType::from_flags(self.flags)
    }

    /// The name padded or truncated to the fixed 8-byte legacy field.
    pub fn name_bytes(&self) -> [u8; 8] {
        let mut out = [b' '; 8];
        for (dst, src) in out.iter_mut().zip(self.name.bytes()) {
            *dst = src;
        }
        out
    }

    pub fn from_legacy(flags: u32, name: &[u8], checksum: u32) -> Self {
        let name = String::from_utf8_lossy(name).trim_end().to_string();
        Self {
            flags,
            name,
            checksum,
        }
    }
}

/// Low nibble of [`ObjectEntryDescriptor::flags`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ObjectType {
    Ride = 0,
    SmallScenery = 1,
    LargeScenery = 2,
    Walls = 3,
    Banners = 4,
    Paths = 5,
    PathBits = 6,
    SceneryGroup = 7,
    ParkEntrance = 8,
    Water = 9,
}

impl ObjectType {
    pub fn from_flags(flags: u32) -> Option<Self> {
        Some(match flags & 0x0F {
            0 => Self::Ride,
            1 => Self::SmallScenery,
            2 => Self::LargeScenery,
            3 => Self::Walls,
            4 => Self::Banners,
            5 => Self::Paths,
            6 => Self::PathBits,
            7 => Self::SceneryGroup,
            8 => Self::ParkEntrance,
            9 => Self::Water,
            _ => return None,
        })
    }
}

// ---------------------------------------------------------------------------
// Loaded object payloads
// ---------------------------------------------------------------------------

pub const SMALL_SCENERY_FULL_TILE: u32 = 1 << 0;
pub const SMALL_SCENERY_DIAGONAL: u32 = 1 << 1;
pub const SMALL_SCENERY_HALF_SPACE: u32 = 1 << 2;
pub const SMALL_SCENERY_THREE_QUARTERS: u32 = 1 << 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmallSceneryDesc {
    pub flags: u32,
    pub height: i32,
    pub price: i64,
    pub removable: bool,
    pub removal_price: i64,
}

impl SmallSceneryDesc {
    pub fn has_flag(&self, flag: u32) -> bool {
        self.flags & flag != 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LargeSceneryTile {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub clearance: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LargeSceneryDesc {
    pub tiles: Vec<LargeSceneryTile>,
    pub price: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectKind {
    /// A vehicle object; the ride type it is built for.
    Vehicle { ride_type: RideType },
    SmallScenery(SmallSceneryDesc),
    LargeScenery(LargeSceneryDesc),
    Wall { height: i32, price: i64 },
    Footpath { price: i64 },
    StationStyle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedObject {
    pub entry: ObjectEntryDescriptor,
    /// Modern string identifier, e.g. `rct2.ride.arrt1`.
    pub identifier: String,
    pub kind: ObjectKind,
}

// ---------------------------------------------------------------------------
// ObjectRepository
// ---------------------------------------------------------------------------

#[derive(Resource, Debug, Clone, Default)]
pub struct ObjectRepository {
    objects: Vec<LoadedObject>,
}

impl ObjectRepository {
    pub fn register(&mut self, entry: ObjectEntryDescriptor, identifier: &str, kind: ObjectKind) -> ObjectIndex {
        if let Some(existing) = self.find(&entry) {
            return existing;
        }
        self.objects.push(LoadedObject {
            entry,
            identifier: identifier.to_string(),
            kind,
        });
        (self.objects.len() - 1) as ObjectIndex
    }

    pub fn get(&self, index: ObjectIndex) -> Option<&LoadedObject> {
        self.objects.get(usize::from(index))
    }

    /// Resolve a legacy entry by type and name (the checksum is not compared
    /// so that re-saved objects still match).
    pub fn find(&self, entry: &ObjectEntryDescriptor) -> Option<ObjectIndex> {
        self.objects
            .iter()
            .position(|o| {
                o.entry.flags & 0x0F == entry.flags & 0x0F && o.entry.name.eq_ignore_ascii_case(&entry.name)
            })
            .map(|i| i as ObjectIndex)
    }

    pub fn find_by_identifier(&self, identifier: &str) -> Option<ObjectIndex> {
        self.objects
            .iter()
            .position(|o| o.identifier == identifier)
            .map(|i| i as ObjectIndex)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectIndex, &LoadedObject)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(i, o)| (i as ObjectIndex, o))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_bytes_pads_with_spaces() {
        let entry = ObjectEntryDescriptor::new(ObjectType::Ride, "ARRT1");
        assert_eq!(&entry.name_bytes(), b"ARRT1   ");
        let back = ObjectEntryDescriptor::from_legacy(entry.flags, &entry.name_bytes(), 0);
        assert_eq!(back.name, "ARRT1");
    }

    #[test]
    fn test_find_ignores_checksum_and_case() {
        let mut repo = ObjectRepository::default();
        let idx = repo.register(
            ObjectEntryDescriptor::new(ObjectType::SmallScenery, "TL0"),
            "rct2.scenery_small.tl0",
            ObjectKind::Footpath { price: 0 },
        );
        let mut query = ObjectEntryDescriptor::new(ObjectType::SmallScenery, "tl0");
        query.checksum = 0xDEAD_BEEF;
        assert_eq!(repo.find(&query), Some(idx));
        let wrong_type = ObjectEntryDescriptor::new(ObjectType::Walls, "TL0");
        assert_eq!(repo.find(&wrong_type), None);
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut repo = ObjectRepository::default();
        let entry = ObjectEntryDescriptor::new(ObjectType::Paths, "TARMAC");
        let a = repo.register(entry.clone(), "rct2.footpath.tarmac", ObjectKind::Footpath { price: 10 });
        let b = repo.register(entry, "rct2.footpath.tarmac", ObjectKind::Footpath { price: 10 });
        assert_eq!(a, b);
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_object_type_from_flags() {
        assert_eq!(ObjectType::from_flags(0x8001), Some(ObjectType::SmallScenery));
        assert_eq!(ObjectType::from_flags(0x0F), None);
    }
}
