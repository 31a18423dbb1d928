use super::*;

const fn coords(
    rotation_begin: u8,
    rotation_end: u8,
    z_begin: i32,
    z_end: i32,
    x: i32,
    y: i32,
) -> TrackCoordinates {
    TrackCoordinates {
        rotation_begin,
        rotation_end,
        z_begin,
        z_end,
        x,
        y,
    }
}

const fn block(index: u8, x: i32, y: i32, z: i32, clearance: i32, quarter_tile: u8) -> TrackBlock {
    TrackBlock {
        index,
        x,
        y,
        z,
        clearance,
        quarter_tile,
        flags: 0,
    }
}

const fn single(clearance: i32) -> [TrackBlock; 1] {
    [block(0, 0, 0, 0, clearance, 0b1111)]
}

const fn piece(
    coordinates: TrackCoordinates,
    blocks: &'static [TrackBlock],
    flags: u16,
    price_modifier: i64,
    mirror: TrackElemType,
) -> TrackElementDescriptor {
    TrackElementDescriptor {
        coordinates,
        blocks,
        flags,
        price_modifier,
        mirror,
        sequence: 0,
    }
}

const fn station(mirror: TrackElemType) -> TrackElementDescriptor {
    TrackElementDescriptor {
        coordinates: coords(0, 0, 0, 0, 0, 0),
        blocks: &FLAT_BLOCKS,
        flags: 0,
        price_modifier: 98304,
        mirror,
        sequence: (1 << 1) | (1 << 3) | SEQUENCE_FLAG_ORIGIN,
    }
}

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

const FLAT_BLOCKS: [TrackBlock; 1] = single(0);
const CLEARANCE_8: [TrackBlock; 1] = single(8);
const CLEARANCE_16: [TrackBlock; 1] = single(16);
const CLEARANCE_32: [TrackBlock; 1] = single(32);
const CLEARANCE_64: [TrackBlock; 1] = single(64);

const LEFT_QUARTER_TURN_5_BLOCKS: [TrackBlock; 7] = [
    block(0, 0, 0, 0, 0, 0b1111),
    block(1, 0, -32, 0, 0, 0b1000),
    block(2, -32, 0, 0, 0, 0b0111),
    block(3, -32, -32, 0, 0, 0b1101),
    block(4, -32, -64, 0, 0, 0b1000),
    block(5, -64, -32, 0, 0, 0b0111),
    block(6, -64, -64, 0, 0, 0b1111),
];

const RIGHT_QUARTER_TURN_5_BLOCKS: [TrackBlock; 7] = [
    block(0, 0, 0, 0, 0, 0b1111),
    block(1, 0, 32, 0, 0, 0b0100),
    block(2, -32, 0, 0, 0, 0b1011),
    block(3, -32, 32, 0, 0, 0b1110),
    block(4, -32, 64, 0, 0, 0b0100),
    block(5, -64, 32, 0, 0, 0b1011),
    block(6, -64, 64, 0, 0, 0b1111),
];

const LEFT_QUARTER_TURN_3_BLOCKS: [TrackBlock; 4] = [
    block(0, 0, 0, 0, 0, 0b0111),
    block(1, 0, -32, 0, 0, 0b1000),
    block(2, -32, 0, 0, 0, 0b0010),
    block(3, -32, -32, 0, 0, 0b0111),
];

const RIGHT_QUARTER_TURN_3_BLOCKS: [TrackBlock; 4] = [
    block(0, 0, 0, 0, 0, 0b1011),
    block(1, 0, 32, 0, 0, 0b0100),
    block(2, -32, 0, 0, 0, 0b0001),
    block(3, -32, 32, 0, 0, 0b1011),
];

const CABLE_LIFT_HILL_BLOCKS: [TrackBlock; 4] = [
    block(0, 0, 0, 0, 8, 0b1111),
    block(1, -32, 0, 0, 8, 0b1111),
    block(2, -64, 0, 32, 32, 0b1111),
    TrackBlock {
        flags: BLOCK_FLAG_IS_VERTICAL,
        ..block(3, -96, 0, 96, 64, 0b1111)
    },
];

// ---------------------------------------------------------------------------
// Pieces
// ---------------------------------------------------------------------------

use TrackElemType as T;

static FLAT: TrackElementDescriptor = piece(coords(0, 0, 0, 0, 0, 0), &FLAT_BLOCKS, 0, 65536, T::FLAT);
static END_STATION: TrackElementDescriptor = station(T::END_STATION);
static BEGIN_STATION: TrackElementDescriptor = station(T::BEGIN_STATION);
static MIDDLE_STATION: TrackElementDescriptor = station(T::MIDDLE_STATION);

static UP_25: TrackElementDescriptor =
    piece(coords(0, 0, 0, 16, 0, 0), &CLEARANCE_16, ELEM_FLAG_STARTS_AT_HALF_HEIGHT, 79872, T::UP_25);
static UP_60: TrackElementDescriptor = piece(
    coords(0, 0, 0, 64, 0, 0),
    &CLEARANCE_64,
    ELEM_FLAG_IS_STEEP_UP | ELEM_FLAG_STARTS_AT_HALF_HEIGHT,
    114688,
    T::UP_60,
);
static FLAT_TO_UP_25: TrackElementDescriptor =
    piece(coords(0, 0, 0, 8, 0, 0), &CLEARANCE_8, 0, 73728, T::FLAT_TO_UP_25);
static UP_25_TO_UP_60: TrackElementDescriptor = piece(
    coords(0, 0, 0, 32, 0, 0),
    &CLEARANCE_32,
    ELEM_FLAG_IS_STEEP_UP | ELEM_FLAG_STARTS_AT_HALF_HEIGHT,
    96256,
    T::UP_25_TO_UP_60,
);
static UP_60_TO_UP_25: TrackElementDescriptor = piece(
    coords(0, 0, 0, 32, 0, 0),
    &CLEARANCE_32,
    ELEM_FLAG_IS_STEEP_UP | ELEM_FLAG_STARTS_AT_HALF_HEIGHT,
    96256,
    T::UP_60_TO_UP_25,
);
static UP_25_TO_FLAT: TrackElementDescriptor =
    piece(coords(0, 0, 0, 8, 0, 0), &CLEARANCE_8, ELEM_FLAG_STARTS_AT_HALF_HEIGHT, 73728, T::UP_25_TO_FLAT);

static DOWN_25: TrackElementDescriptor =
    piece(coords(0, 0, 16, 0, 0, 0), &CLEARANCE_16, ELEM_FLAG_STARTS_AT_HALF_HEIGHT, 79872, T::DOWN_25);
static DOWN_60: TrackElementDescriptor =
    piece(coords(0, 0, 64, 0, 0, 0), &CLEARANCE_64, ELEM_FLAG_STARTS_AT_HALF_HEIGHT, 114688, T::DOWN_60);
static FLAT_TO_DOWN_25: TrackElementDescriptor =
    piece(coords(0, 0, 8, 0, 0, 0), &CLEARANCE_8, ELEM_FLAG_STARTS_AT_HALF_HEIGHT, 73728, T::FLAT_TO_DOWN_25);
static DOWN_25_TO_DOWN_60: TrackElementDescriptor =
    piece(coords(0, 0, 32, 0, 0, 0), &CLEARANCE_32, ELEM_FLAG_STARTS_AT_HALF_HEIGHT, 96256, T::DOWN_25_TO_DOWN_60);
static DOWN_60_TO_DOWN_25: TrackElementDescriptor =
    piece(coords(0, 0, 32, 0, 0, 0), &CLEARANCE_32, ELEM_FLAG_STARTS_AT_HALF_HEIGHT, 96256, T::DOWN_60_TO_DOWN_25);
static DOWN_25_TO_FLAT: TrackElementDescriptor =
    piece(coords(0, 0, 8, 0, 0, 0), &CLEARANCE_8, 0, 73728, T::DOWN_25_TO_FLAT);

static LEFT_QUARTER_TURN_5_TILES: TrackElementDescriptor = piece(
    coords(0, 3, 0, 0, -64, -64),
    &LEFT_QUARTER_TURN_5_BLOCKS,
    0,
    257359,
    T::RIGHT_QUARTER_TURN_5_TILES,
);
static RIGHT_QUARTER_TURN_5_TILES: TrackElementDescriptor = piece(
    coords(0, 1, 0, 0, -64, 64),
    &RIGHT_QUARTER_TURN_5_BLOCKS,
    0,
    257359,
    T::LEFT_QUARTER_TURN_5_TILES,
);

static FLAT_TO_LEFT_BANK: TrackElementDescriptor =
    piece(coords(0, 0, 0, 0, 0, 0), &FLAT_BLOCKS, 0, 69632, T::FLAT_TO_RIGHT_BANK);
static FLAT_TO_RIGHT_BANK: TrackElementDescriptor =
    piece(coords(0, 0, 0, 0, 0, 0), &FLAT_BLOCKS, 0, 69632, T::FLAT_TO_LEFT_BANK);
static LEFT_BANK_TO_FLAT: TrackElementDescriptor =
    piece(coords(0, 0, 0, 0, 0, 0), &FLAT_BLOCKS, 0, 69632, T::RIGHT_BANK_TO_FLAT);
static RIGHT_BANK_TO_FLAT: TrackElementDescriptor =
    piece(coords(0, 0, 0, 0, 0, 0), &FLAT_BLOCKS, 0, 69632, T::LEFT_BANK_TO_FLAT);
static LEFT_BANK: TrackElementDescriptor =
    piece(coords(0, 0, 0, 0, 0, 0), &FLAT_BLOCKS, 0, 69632, T::RIGHT_BANK);
static RIGHT_BANK: TrackElementDescriptor =
    piece(coords(0, 0, 0, 0, 0, 0), &FLAT_BLOCKS, 0, 69632, T::LEFT_BANK);

static LEFT_QUARTER_TURN_3_TILES: TrackElementDescriptor = piece(
    coords(0, 3, 0, 0, -32, -32),
    &LEFT_QUARTER_TURN_3_BLOCKS,
    0,
    126156,
    T::RIGHT_QUARTER_TURN_3_TILES,
);
static RIGHT_QUARTER_TURN_3_TILES: TrackElementDescriptor = piece(
    coords(0, 1, 0, 0, -32, 32),
    &RIGHT_QUARTER_TURN_3_BLOCKS,
    0,
    126156,
    T::LEFT_QUARTER_TURN_3_TILES,
);

static BRAKES: TrackElementDescriptor =
    piece(coords(0, 0, 0, 0, 0, 0), &FLAT_BLOCKS, 0, 90112, T::BRAKES);
static BOOSTER: TrackElementDescriptor =
    piece(coords(0, 0, 0, 0, 0, 0), &FLAT_BLOCKS, 0, 77824, T::BOOSTER);
static MAZE: TrackElementDescriptor = TrackElementDescriptor {
    sequence: SEQUENCE_FLAG_CONNECTS_TO_PATH,
    ..piece(coords(0, 0, 0, 0, 0, 0), &FLAT_BLOCKS, 0, 65536, T::MAZE)
};
static WATERFALL: TrackElementDescriptor =
    piece(coords(0, 0, 0, 0, 0, 0), &CLEARANCE_16, 0, 114688, T::WATERFALL);
static RAPIDS: TrackElementDescriptor =
    piece(coords(0, 0, 0, 0, 0, 0), &FLAT_BLOCKS, 0, 90112, T::RAPIDS);
static ON_RIDE_PHOTO: TrackElementDescriptor = piece(
    coords(0, 0, 0, 0, 0, 0),
    &CLEARANCE_16,
    ELEM_FLAG_ONLY_ABOVE_GROUND,
    98304,
    T::ON_RIDE_PHOTO,
);
static WHIRLPOOL: TrackElementDescriptor =
    piece(coords(0, 0, 0, 0, 0, 0), &FLAT_BLOCKS, 0, 98304, T::WHIRLPOOL);
static CABLE_LIFT_HILL: TrackElementDescriptor = piece(
    coords(0, 0, 0, 96, -96, 0),
    &CABLE_LIFT_HILL_BLOCKS,
    ELEM_FLAG_CAN_BE_PARTLY_UNDERGROUND,
    167936,
    T::CABLE_LIFT_HILL,
);
static SPINNING_TUNNEL: TrackElementDescriptor =
    piece(coords(0, 0, 0, 0, 0, 0), &FLAT_BLOCKS, 0, 98304, T::SPINNING_TUNNEL);
static BLOCK_BRAKES: TrackElementDescriptor =
    piece(coords(0, 0, 0, 0, 0, 0), &FLAT_BLOCKS, 0, 98304, T::BLOCK_BRAKES);

/// Look up the geometry of a track piece. Returns `None` for piece types the
/// park does not know how to build.
pub fn descriptor(track_type: TrackElemType) -> Option<&'static TrackElementDescriptor> {
    let d = match track_type {
        T::FLAT => &FLAT,
        T::END_STATION => &END_STATION,
        T::BEGIN_STATION => &BEGIN_STATION,
        T::MIDDLE_STATION => &MIDDLE_STATION,
        T::UP_25 => &UP_25,
        T::UP_60 => &UP_60,
        T::FLAT_TO_UP_25 => &FLAT_TO_UP_25,
        T::UP_25_TO_UP_60 => &UP_25_TO_UP_60,
        T::UP_60_TO_UP_25 => &UP_60_TO_UP_25,
        T::UP_25_TO_FLAT => &UP_25_TO_FLAT,
        T::DOWN_25 => &DOWN_25,
        T::DOWN_60 => &DOWN_60,
        T::FLAT_TO_DOWN_25 => &FLAT_TO_DOWN_25,
        T::DOWN_25_TO_DOWN_60 => &DOWN_25_TO_DOWN_60,
        T::DOWN_60_TO_DOWN_25 => &DOWN_60_TO_DOWN_25,
        T::DOWN_25_TO_FLAT => &DOWN_25_TO_FLAT,
        T::LEFT_QUARTER_TURN_5_TILES => &LEFT_QUARTER_TURN_5_TILES,
        T::RIGHT_QUARTER_TURN_5_TILES => &RIGHT_QUARTER_TURN_5_TILES,
        T::FLAT_TO_LEFT_BANK => &FLAT_TO_LEFT_BANK,
        T::FLAT_TO_RIGHT_BANK => &FLAT_TO_RIGHT_BANK,
        T::LEFT_BANK_TO_FLAT => &LEFT_BANK_TO_FLAT,
        T::RIGHT_BANK_TO_FLAT => &RIGHT_BANK_TO_FLAT,
        T::LEFT_BANK => &LEFT_BANK,
        T::RIGHT_BANK => &RIGHT_BANK,
        T::LEFT_QUARTER_TURN_3_TILES => &LEFT_QUARTER_TURN_3_TILES,
        T::RIGHT_QUARTER_TURN_3_TILES => &RIGHT_QUARTER_TURN_3_TILES,
        T::BRAKES => &BRAKES,
        T::BOOSTER => &BOOSTER,
        T::MAZE => &MAZE,
        T::WATERFALL => &WATERFALL,
        T::RAPIDS => &RAPIDS,
        T::ON_RIDE_PHOTO => &ON_RIDE_PHOTO,
        T::WHIRLPOOL => &WHIRLPOOL,
        T::CABLE_LIFT_HILL => &CABLE_LIFT_HILL,
        T::SPINNING_TUNNEL => &SPINNING_TUNNEL,
        T::BLOCK_BRAKES => &BLOCK_BRAKES,
        _ => return None,
    };
    Some(d)
}
