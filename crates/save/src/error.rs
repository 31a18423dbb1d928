// ---------------------------------------------------------------------------
// Error types for design file codecs
// ---------------------------------------------------------------------------

use std::fmt;

/// Failures of the Sawyer chunk layer. Every one is fatal to the current
/// read; the reader is rewound so the caller may try another format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkError {
    /// Declared length exceeds the chunk ceiling or the bytes available.
    CorruptChunkSize,
    /// A run or back-reference points outside the data.
    CorruptRle,
    /// Decoded output would exceed the chunk ceiling.
    DestinationTooSmall,
    InvalidChunkEncoding(u8),
    ZeroSizedChunk,
    /// The stream ended inside a chunk header.
    UnexpectedEof,
}

impl fmt::Display for ChunkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkError::CorruptChunkSize => write!(f, "Corrupt chunk size"),
            ChunkError::CorruptRle => write!(f, "Corrupt RLE compression data"),
            ChunkError::DestinationTooSmall => {
                write!(f, "Chunk data larger than allocated destination capacity")
            }
            ChunkError::InvalidChunkEncoding(encoding) => {
                write!(f, "Invalid chunk encoding: {encoding}")
            }
            ChunkError::ZeroSizedChunk => write!(f, "Encountered zero-sized chunk"),
            ChunkError::UnexpectedEof => write!(f, "Unexpected end of stream in chunk header"),
        }
    }
}

impl std::error::Error for ChunkError {}

/// Errors surfaced when loading a design file.
#[derive(Debug)]
pub enum TrackImportError {
    Chunk(ChunkError),
    Io(std::io::Error),
    /// The importer does not handle files with this extension.
    WrongExtension(String),
    /// The file needs a newer reader than this build.
    UnsupportedVersion { min_version: u32, target_version: u32 },
    /// The legacy version bits match no known format.
    UnsupportedLegacyVersion(u8),
    TooManyElements,
    BadMagic(u32),
    Truncated,
    InvalidString,
    /// The payload does not hash to the stored checksum.
    ChecksumMismatch { stored: u32, computed: u32 },
    /// Compression byte or compressed payload is invalid.
    Decompress(String),
    /// A chunk every design file must carry is absent.
    MissingChunk(u32),
    /// `import` was called before a successful `load`.
    NotLoaded,
}

impl fmt::Display for TrackImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackImportError::Chunk(e) => write!(f, "Chunk error: {e}"),
            TrackImportError::Io(e) => write!(f, "I/O error: {e}"),
            TrackImportError::WrongExtension(ext) => {
                write!(f, "Unsupported track design extension: '{ext}'")
            }
            TrackImportError::UnsupportedVersion {
                min_version,
                target_version,
            } => write!(
                f,
                "Unsupported design file version: requires v{min_version} (written as v{target_version})"
            ),
            TrackImportError::UnsupportedLegacyVersion(v) => {
                write!(f, "Unsupported legacy track design version: {v}")
            }
            TrackImportError::TooManyElements => write!(f, "Too many track design elements"),
            TrackImportError::BadMagic(magic) => write!(f, "Bad magic number: {magic:#010x}"),
            TrackImportError::Truncated => write!(f, "Track design data is truncated"),
            TrackImportError::InvalidString => write!(f, "Invalid string in track design"),
            TrackImportError::ChecksumMismatch { stored, computed } => write!(
                f,
                "Design file is corrupted: checksum mismatch (stored {stored:#010X}, computed {computed:#010X})"
            ),
            TrackImportError::Decompress(msg) => write!(f, "Failed to decompress design file: {msg}"),
            TrackImportError::MissingChunk(id) => write!(f, "Design file is missing chunk {id}"),
            TrackImportError::NotLoaded => write!(f, "No track design data has been loaded"),
        }
    }
}

impl std::error::Error for TrackImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrackImportError::Io(e) => Some(e),
            TrackImportError::Chunk(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TrackImportError {
    fn from(e: std::io::Error) -> Self {
        TrackImportError::Io(e)
    }
}

impl From<ChunkError> for TrackImportError {
    fn from(e: ChunkError) -> Self {
        TrackImportError::Chunk(e)
    }
}

/// Errors when writing a design into a format that cannot hold it.
#[derive(Debug)]
pub enum TrackExportError {
    Io(std::io::Error),
    /// The piece has no legacy track type number.
    UnsupportedTrackType(u16),
    TooManyElements,
    /// An element offset does not fit the legacy field width.
    PositionOutOfRange,
    /// A name or identifier is longer than the format allows.
    StringTooLong(usize),
}

impl fmt::Display for TrackExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackExportError::Io(e) => write!(f, "I/O error: {e}"),
            TrackExportError::UnsupportedTrackType(t) => {
                write!(f, "Track type {t} cannot be stored in this format")
            }
            TrackExportError::TooManyElements => write!(f, "Too many track design elements"),
            TrackExportError::PositionOutOfRange => {
                write!(f, "Element position out of range for this format")
            }
            TrackExportError::StringTooLong(len) => {
                write!(f, "String of {len} bytes is too long for this format")
            }
        }
    }
}

impl std::error::Error for TrackExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrackExportError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TrackExportError {
    fn from(e: std::io::Error) -> Self {
        TrackExportError::Io(e)
    }
}
