//! Following built track from one piece to the next.

use crate::coords::{CoordsXY, CoordsXYZ, Direction, COORDS_DIRECTION_DELTA};
use crate::ride::RideId;
use crate::tile_map::{TileMap, TrackElement};

use super::TrackElemType;

/// One block of a track piece on the map: the tile, the block's base height
/// and the fields that identify the block within its piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackBlockRef {
    pub loc: CoordsXYZ,
    pub direction: Direction,
    pub track_type: TrackElemType,
    pub sequence: u8,
}

impl TrackBlockRef {
    pub fn from_element(loc: CoordsXY, base_z: i32, track: &TrackElement) -> Self {
        Self {
            loc: loc.to_tile_start().with_z(base_z),
            direction: track.direction,
            track_type: track.track_type,
            sequence: track.sequence,
        }
    }

    /// The piece origin (x, y) and the piece base height.
    pub fn piece_origin(&self) -> Option<CoordsXYZ> {
        let block = self.track_type.descriptor()?.block(self.sequence)?;
        let xy = self.loc.xy() - block.offset().rotate(self.direction & 3);
        Some(xy.with_z(self.loc.z - block.z))
    }
}

/// Find the origin block of the next piece of `ride` after `current`.
///
/// The next piece must start exactly where this one ends, with a matching
/// heading and height. Returns `None` at the end of an open track.
pub fn track_block_get_next(map: &TileMap, ride: RideId, current: &TrackBlockRef) -> Option<TrackBlockRef> {
    let ted = current.track_type.descriptor()?;
    let coords = &ted.coordinates;
    let rotation = current.direction & 3;
    let origin = current.piece_origin()?;

    let mut next_xy = origin.xy() + CoordsXY::new(coords.x, coords.y).rotate(rotation);
    let next_z = origin.z + coords.z_end;
    let direction_start = ((coords.rotation_end + rotation) & 3) | (coords.rotation_end & (1 << 2));
    if direction_start & (1 << 2) == 0 {
        next_xy += COORDS_DIRECTION_DELTA[usize::from(direction_start & 3)];
    }

    map.elements_at(next_xy).iter().find_map(|element| {
        let track = element.as_track()?;
        if track.ride != ride || track.sequence != 0 {
            return None;
        }
        let next = track.track_type.descriptor()?;
        let begin = &next.coordinates;
        let heading = ((track.direction + begin.rotation_begin) & 3) | (begin.rotation_begin & (1 << 2));
        if heading != direction_start {
            return None;
        }
        let block_z = next.block(0).map_or(0, |b| b.z);
        if begin.z_begin - block_z + element.base_z != next_z {
            return None;
        }
        Some(TrackBlockRef::from_element(next_xy, element.base_z, track))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ride::RideType;
    use crate::tile_map::{TileElement, TileElementKind};
    use crate::track_data::TrackCursor;

    const Z: i32 = 112;

    /// Lays pieces end to end starting at tile (8, 8) heading 0, returning
    /// the origin block of each piece.
    fn lay(map: &mut TileMap, ride: RideId, pieces: &[TrackElemType]) -> Vec<TrackBlockRef> {
        let mut cursor = TrackCursor {
            pos: CoordsXY::new(256, 256),
            z: Z,
            rotation: 0,
        };
        let mut origins = Vec::new();
        for &piece in pieces {
            let ted = piece.descriptor().expect("known piece");
            let (pos, base) = cursor.piece_origin(&ted.coordinates);
            let rotation = cursor.rotation & 3;
            for block in ted.blocks {
                let loc = pos + block.offset().rotate(rotation);
                let mut track = TrackElement::new(piece, rotation, ride, RideType::LOOPING_ROLLER_COASTER);
                track.sequence = block.index;
                let base_z = base + block.z;
                map.insert(
                    loc,
                    TileElement::new(base_z, base_z + 32, 0b1111, TileElementKind::Track(track.clone())),
                );
                if block.index == 0 {
                    origins.push(TrackBlockRef::from_element(loc, base_z, &track));
                }
            }
            cursor.advance(&ted.coordinates);
        }
        origins
    }

    #[test]
    fn test_walks_closed_loop_back_to_start() {
        let mut map = TileMap::new(32, 32);
        let ride = RideId(0);
        let pieces = [
            TrackElemType::END_STATION,
            TrackElemType::LEFT_QUARTER_TURN_3_TILES,
            TrackElemType::LEFT_QUARTER_TURN_3_TILES,
            TrackElemType::FLAT,
            TrackElemType::LEFT_QUARTER_TURN_3_TILES,
            TrackElemType::LEFT_QUARTER_TURN_3_TILES,
        ];
        let origins = lay(&mut map, ride, &pieces);
        let mut current = origins[0];
        for expected in origins.iter().skip(1).chain(std::iter::once(&origins[0])) {
            let next = track_block_get_next(&map, ride, &current).expect("connected piece");
            assert_eq!(next, *expected);
            current = next;
        }
    }

    #[test]
    fn test_open_end_has_no_next() {
        let mut map = TileMap::new(32, 32);
        let ride = RideId(3);
        let origins = lay(&mut map, ride, &[TrackElemType::FLAT, TrackElemType::FLAT]);
        assert_eq!(track_block_get_next(&map, ride, &origins[0]), Some(origins[1]));
        assert_eq!(track_block_get_next(&map, ride, &origins[1]), None);
    }

    #[test]
    fn test_other_rides_track_is_not_followed() {
        let mut map = TileMap::new(32, 32);
        let origins = lay(&mut map, RideId(1), &[TrackElemType::FLAT, TrackElemType::FLAT]);
        assert_eq!(track_block_get_next(&map, RideId(2), &origins[0]), None);
    }

    #[test]
    fn test_slope_height_must_match() {
        let mut map = TileMap::new(32, 32);
        let ride = RideId(0);
        let origins = lay(
            &mut map,
            ride,
            &[TrackElemType::FLAT_TO_UP_25, TrackElemType::UP_25_TO_FLAT],
        );
        assert_eq!(track_block_get_next(&map, ride, &origins[0]), Some(origins[1]));
    }
}
