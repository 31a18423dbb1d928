use super::ride_type::*;
use super::*;

#[test]
fn test_registry_reuses_lowest_free_slot() {
    let mut rides = RideRegistry::default();
    let a = rides.create(RideType::LOOPING_ROLLER_COASTER);
    let b = rides.create(RideType::MAZE);
    assert_eq!(a, RideId(0));
    assert_eq!(b, RideId(1));

    rides.remove(a);
    assert_eq!(rides.len(), 1);
    let c = rides.create(RideType::MINI_GOLF);
    assert_eq!(c, RideId(0));
    assert_eq!(rides.get(c).map(|r| r.ride_type), Some(RideType::MINI_GOLF));
}

#[test]
fn test_new_ride_uses_type_default_mode() {
    let mut rides = RideRegistry::default();
    let maze = rides.create(RideType::MAZE);
    let boat = rides.create(RideType::BOAT_HIRE);
    assert_eq!(rides.get(maze).map(|r| r.mode), Some(RideMode::Maze));
    assert_eq!(rides.get(boat).map(|r| r.mode), Some(RideMode::BoatHire));
}

#[test]
fn test_ride_mode_from_u8_bounds() {
    assert_eq!(RideMode::from_u8(0), Some(RideMode::Normal));
    assert_eq!(RideMode::from_u8(34), Some(RideMode::ContinuousCircuitBlockSectioned));
    assert_eq!(RideMode::from_u8(36), Some(RideMode::PoweredLaunchBlockSectioned));
    assert_eq!(RideMode::from_u8(37), None);
}

#[test]
fn test_descriptor_flags() {
    assert!(RideType::MAZE.has_flag(RTD_IS_MAZE));
    assert!(RideType::BOAT_HIRE.has_flag(RTD_TRACK_MUST_BE_ON_WATER));
    assert!(!RideType::LOOPING_ROLLER_COASTER.has_flag(RTD_IS_MAZE));
    assert!(RideType::NULL.descriptor().is_none());
    assert!(RideType::MINI_GOLF.uses_holes());
}

#[test]
fn test_coaster_supports_block_sectioned_modes() {
    let desc = RideType::LOOPING_ROLLER_COASTER
        .descriptor()
        .expect("looping coaster descriptor");
    assert!(desc.supports_mode(RideMode::ContinuousCircuitBlockSectioned));
    assert!(desc.supports_mode(RideMode::PoweredLaunchBlockSectioned));
    assert!(!desc.supports_mode(RideMode::Maze));
}

#[test]
fn test_is_tested_requires_ratings() {
    let mut ride = Ride::new(RideId(0), RideType::WOODEN_ROLLER_COASTER);
    ride.set_lifecycle_flag(LIFECYCLE_TESTED, true);
    assert!(!ride.is_tested());
    ride.ratings = Some(RideRatings {
        excitement: 650,
        intensity: 520,
        nausea: 310,
    });
    assert!(ride.is_tested());
    ride.set_lifecycle_flag(LIFECYCLE_TESTED, false);
    assert!(!ride.is_tested());
}

#[test]
fn test_free_station_index() {
    let mut ride = Ride::new(RideId(3), RideType::MONORAIL);
    assert_eq!(ride.free_station_index(), Some(0));
    ride.stations[0].start = Some(CoordsXYZ::new(64, 64, 112));
    assert_eq!(ride.num_stations(), 1);
    assert_eq!(ride.free_station_index(), Some(1));
    ride.clear_station_at(CoordsXYZ::new(64, 64, 112));
    assert_eq!(ride.num_stations(), 0);
}
