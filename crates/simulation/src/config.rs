pub const COORDS_XY_STEP: i32 = 32;
pub const COORDS_Z_STEP: i32 = 8;
pub const LAND_HEIGHT_STEP: i32 = 2 * COORDS_Z_STEP;
pub const COORDS_Z_PER_TINY_Z: i32 = 16;

/// Lowest z at which any track block may sit. Anything below is "too low".
pub const MIN_TRACK_HEIGHT: i32 = 2 * COORDS_Z_STEP;
pub const MAX_TRACK_HEIGHT: i32 = 254 * COORDS_Z_STEP;

/// Default edge length (in tiles) of a freshly created park map.
pub const DEFAULT_MAP_SIZE: i32 = 64;
pub const DEFAULT_SURFACE_HEIGHT: i32 = 14 * COORDS_Z_STEP;

/// Upper bound on the total number of tile elements in the map.
pub const MAX_TILE_ELEMENTS: usize = 0x30000;

pub const MAX_STATIONS: usize = 4;
pub const MAX_BRAKE_SPEED: u8 = 30;
pub const DEFAULT_BLOCK_BRAKE_SPEED: u8 = 2;
pub const DEFAULT_SEAT_ROTATION: u8 = 4;

/// Design format capacity limits.
pub const TD6_MAX_TRACK_ELEMENTS: usize = 8192;
pub const MAX_MAZE_ELEMENTS: usize = 2000;
/// Relative tile offsets stored in a design must fit in a signed byte.
pub const DESIGN_MIN_TILE_OFFSET: i32 = -126;
pub const DESIGN_MAX_TILE_OFFSET: i32 = 127;

/// Origin used when laying out a design off-map to measure its footprint.
pub const TRACK_PREVIEW_ORIGIN_XY: i32 = 4096;
/// Edge length (in tiles) of the scratch map a design preview is built on.
pub const TRACK_PREVIEW_MAP_SIZE: i32 = 128;

/// Tile radius scanned by "select nearby scenery" around every ride tile.
pub const NEARBY_SCENERY_DISTANCE: i32 = 7;

pub const ENTRANCE_CLEARANCE: i32 = 6 * COORDS_Z_STEP;
pub const FOOTPATH_CLEARANCE: i32 = 4 * COORDS_Z_STEP;
pub const MAZE_CLEARANCE: i32 = 4 * COORDS_Z_STEP;

pub const DEFAULT_PARK_CASH: i64 = 1_000_000;
