// ---------------------------------------------------------------------------
// Format constants for design files
// ---------------------------------------------------------------------------

/// Upper bound for any decoded chunk. Declared lengths and decoder output
/// beyond this are treated as corrupt.
pub const MAX_CHUNK_SIZE: usize = 16 * 1024 * 1024;

/// Bytes trailing a legacy track chunk that hold its checksum.
pub const TRACK_CHECKSUM_SIZE: usize = 4;

// Checksum adjustments subtracted from the rotating sum of a track chunk.
pub const TD6_CHECKSUM_ADJUST: u32 = 0x1D4C1;
pub const TD4_CHECKSUM_ADJUST: u32 = 0x1A67C;
pub const TD4AA_CHECKSUM_ADJUST: u32 = 0x1A650;

// ---------------------------------------------------------------------------
// Legacy layouts
// ---------------------------------------------------------------------------

pub const TD4_HEADER_SIZE: usize = 0x38;
pub const TD4AA_HEADER_SIZE: usize = 0xC4;
pub const TD6_HEADER_SIZE: usize = 0xA3;

/// Trains with stored colours in first-game designs.
pub const TD4_VEHICLE_COLOURS: usize = 12;

// Version bits (2..=3) of the version-and-colour-scheme byte.
pub const TD46_VERSION_TD4: u8 = 0;
pub const TD46_VERSION_TD4AA: u8 = 1;
pub const TD46_VERSION_TD6: u8 = 2;

pub const TD46_MAZE_ENTRANCE: u8 = 0x08;
pub const TD46_MAZE_EXIT: u8 = 0x80;
pub const TD46_TRACK_TERMINATOR: u8 = 0xFF;
pub const TD46_ENTRANCE_EXIT_BIT: u8 = 0x80;
pub const TD6_SCENERY_RECORD_SIZE: usize = 22;

// Storage multipliers for compact legacy statistics.
pub const TD46_RATINGS_MULTIPLIER: i16 = 10;
pub const TD46_G_FORCES_MULTIPLIER: i32 = 32;
/// Legacy speeds and lengths are whole units; the model keeps 16.16.
pub const TD46_FIXED_SHIFT: u32 = 16;

// ---------------------------------------------------------------------------
// Design file container
// ---------------------------------------------------------------------------

/// `NTDF` read as a little-endian u32.
pub const ORCA_MAGIC: u32 = 0x4644_544E;
pub const ORCA_TARGET_VERSION: u32 = 1;
/// Highest `min_version` a file may declare and still be read by this build.
pub const ORCA_CURRENT_VERSION: u32 = 1;
pub const ORCA_MIN_VERSION: u32 = 1;

pub const ORCA_COMPRESSION_NONE: u8 = 0;
pub const ORCA_COMPRESSION_LZ4: u8 = 1;

/// Payloads shorter than this are stored uncompressed.
pub const ORCA_COMPRESSION_THRESHOLD: usize = 256;

/// Seed for the payload checksum.
pub const ORCA_XXHASH_SEED: u32 = 0;

pub const ORCA_MAX_STRING_LEN: usize = 1024;
pub const ORCA_MAX_ENTRANCES: usize = 64;
pub const ORCA_MAX_SCENERY: usize = 0x4000;

// File extensions accepted by `create_importer`.
pub const EXTENSION_TD4: &str = "td4";
pub const EXTENSION_TD6: &str = "td6";
pub const EXTENSION_DESIGN_FILE: &str = "td";

// ---------------------------------------------------------------------------
// Park state file
// ---------------------------------------------------------------------------

pub const EXTENSION_PARK_STATE: &str = "park";
/// Chunk holding every saved park resource, keyed by name.
pub const CHUNK_PARK_RESOURCES: u32 = 16;
pub const PARK_STATE_MAX_KEY_LEN: usize = 255;
