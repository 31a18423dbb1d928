//! Station wiring for station track pieces.
//!
//! A run of station pieces in a straight line at one height forms a single
//! station. The first piece placed records the station start; later pieces
//! next to it join the same station and extend its length.

use crate::coords::{direction_reverse, CoordsXYZ, Direction, COORDS_DIRECTION_DELTA};
use crate::tile_map::TileMap;

use super::{Ride, RideId, Station};

/// Index of the station an already placed neighbouring piece of `ride`
/// belongs to, looking both ways along `direction`.
pub fn adjacent_station_index(
    map: &TileMap,
    ride: RideId,
    loc: CoordsXYZ,
    direction: Direction,
) -> Option<u8> {
    let direction = direction & 3;
    [direction, direction_reverse(direction)]
        .into_iter()
        .find_map(|d| {
            let neighbour = loc.xy() + COORDS_DIRECTION_DELTA[usize::from(d)];
            map.elements_at(neighbour).iter().find_map(|e| {
                let track = e.as_track()?;
                (e.base_z == loc.z
                    && track.ride == ride
                    && track.track_type.is_station()
                    && track.direction & 1 == direction & 1)
                    .then_some(track.station_index)
            })
        })
}

/// The station a new piece at `loc` would be wired into, or `None` when it
/// would need a new station and all slots are taken.
pub fn station_slot_for(map: &TileMap, ride: &Ride, loc: CoordsXYZ, direction: Direction) -> Option<u8> {
    adjacent_station_index(map, ride.id, loc, direction)
        .or_else(|| ride.free_station_index().map(|i| i as u8))
}

/// Wire a station piece that is about to be inserted at `loc`.
pub fn add_station_piece(
    map: &TileMap,
    ride: &mut Ride,
    loc: CoordsXYZ,
    direction: Direction,
) -> Option<u8> {
    if let Some(index) = adjacent_station_index(map, ride.id, loc, direction) {
        let station = &mut ride.stations[usize::from(index)];
        if !station.is_null() {
            station.length = station.length.saturating_add(1);
            return Some(index);
        }
    }
    let index = ride.free_station_index()?;
    ride.stations[index] = Station {
        start: Some(loc),
        length: 1,
        ..Default::default()
    };
    Some(index as u8)
}

/// Unwire a station piece that has just been removed from `loc`. The station
/// is cleared once its last piece is gone; otherwise its start moves to a
/// remaining neighbour.
pub fn remove_station_piece(
    map: &TileMap,
    ride: &mut Ride,
    loc: CoordsXYZ,
    direction: Direction,
    index: u8,
) {
    let Some(station) = ride.stations.get_mut(usize::from(index)) else {
        return;
    };
    station.length = station.length.saturating_sub(1);
    if station.length == 0 {
        *station = Station::default();
        return;
    }
    if station.start == Some(loc) {
        let direction = direction & 3;
        station.start = [direction, direction_reverse(direction)]
            .into_iter()
            .map(|d| {
                let xy = loc.xy() + COORDS_DIRECTION_DELTA[usize::from(d)];
                xy.with_z(loc.z)
            })
            .find(|n| {
                map.track_at(*n, ride.id).is_some_and(|e| {
                    e.as_track()
                        .is_some_and(|t| t.track_type.is_station() && t.station_index == index)
                })
            });
        if station.start.is_none() {
            *station = Station::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::CoordsXY;
    use crate::ride::RideType;
    use crate::tile_map::{TileElement, TileElementKind, TrackElement, QUARTER_TILE_FULL};
    use crate::track_data::TrackElemType;

    fn put_station(map: &mut TileMap, ride: RideId, loc: CoordsXYZ, index: u8) {
        let mut track = TrackElement::new(TrackElemType::END_STATION, 0, ride, RideType::LOOPING_ROLLER_COASTER);
        track.station_index = index;
        map.insert(
            loc.xy(),
            TileElement::new(loc.z, loc.z + 16, QUARTER_TILE_FULL, TileElementKind::Track(track)),
        );
    }

    #[test]
    fn test_adjacent_pieces_share_a_station() {
        let mut map = TileMap::new(8, 8);
        let mut ride = Ride::new(RideId(0), RideType::LOOPING_ROLLER_COASTER);
        let a = CoordsXYZ::new(64, 64, 112);
        let b = CoordsXY::new(96, 64).with_z(112);

        assert_eq!(add_station_piece(&map, &mut ride, a, 0), Some(0));
        put_station(&mut map, ride.id, a, 0);
        assert_eq!(add_station_piece(&map, &mut ride, b, 0), Some(0));
        put_station(&mut map, ride.id, b, 0);
        assert_eq!(ride.stations[0].length, 2);
        assert_eq!(ride.num_stations(), 1);
    }

    #[test]
    fn test_separate_pieces_take_new_slots_until_full() {
        let map = TileMap::new(16, 16);
        let mut ride = Ride::new(RideId(0), RideType::LOOPING_ROLLER_COASTER);
        for i in 0..4 {
            let loc = CoordsXYZ::new(i * 96, 0, 112);
            assert_eq!(add_station_piece(&map, &mut ride, loc, 0), Some(i as u8));
        }
        let loc = CoordsXYZ::new(0, 256, 112);
        assert_eq!(station_slot_for(&map, &ride, loc, 0), None);
        assert_eq!(add_station_piece(&map, &mut ride, loc, 0), None);
    }

    #[test]
    fn test_removing_start_moves_it_to_a_neighbour() {
        let mut map = TileMap::new(8, 8);
        let mut ride = Ride::new(RideId(0), RideType::LOOPING_ROLLER_COASTER);
        let a = CoordsXYZ::new(64, 64, 112);
        let b = CoordsXYZ::new(96, 64, 112);
        add_station_piece(&map, &mut ride, a, 0);
        put_station(&mut map, ride.id, a, 0);
        add_station_piece(&map, &mut ride, b, 0);
        put_station(&mut map, ride.id, b, 0);

        map.remove_where(a.xy(), |e| e.as_track().is_some());
        remove_station_piece(&map, &mut ride, a, 0, 0);
        assert_eq!(ride.stations[0].start, Some(b));
        assert_eq!(ride.stations[0].length, 1);

        map.remove_where(b.xy(), |e| e.as_track().is_some());
        remove_station_piece(&map, &mut ride, b, 0, 0);
        assert!(ride.stations[0].is_null());
    }
}
