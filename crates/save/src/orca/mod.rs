// ---------------------------------------------------------------------------
// orca – the native design file (`.td`)
// ---------------------------------------------------------------------------
//
// Container layout (21-byte header, little-endian):
//   [0..4]   Magic "NTDF"
//   [4..8]   Target version: the version the writer produced
//   [8..12]  Minimum version a reader must support
//   [12]     Compression (0 = none, 1 = LZ4 block)
//   [13..17] Uncompressed payload size (u32)
//   [17..21] xxHash32 checksum of the uncompressed payload
//   [21..]   Payload
//
// The payload is a chunk table: repeated {id: u32, length: u32, data}.
// Readers skip chunk ids they do not know, so new chunks can be added without
// raising the minimum version.

pub mod chunks;
pub mod stream;


use std::collections::BTreeMap;

use bevy::prelude::*;
use park_sim::track_design::TrackDesign;
use xxhash_rust::xxh32::xxh32;

use crate::byte_stream::ByteReader;
use crate::config::{
    EXTENSION_DESIGN_FILE, MAX_CHUNK_SIZE, ORCA_COMPRESSION_LZ4, ORCA_COMPRESSION_NONE,
    ORCA_COMPRESSION_THRESHOLD, ORCA_CURRENT_VERSION, ORCA_MAGIC, ORCA_MIN_VERSION,
    ORCA_TARGET_VERSION, ORCA_XXHASH_SEED,
};
use crate::error::{ChunkError, TrackExportError, TrackImportError};
use crate::importer::TrackImporter;

use chunks::{
    rw_general_metadata, rw_track_elements, rw_track_metadata, CHUNK_GENERAL_METADATA,
    CHUNK_TRACK_ELEMENTS, CHUNK_TRACK_METADATA,
};
use stream::{OrcaReader, OrcaWriter};

pub const ORCA_HEADER_SIZE: usize = 21;

/// Parsed container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrcaHeader {
    pub magic: u32,
    pub target_version: u32,
    pub min_version: u32,
    pub compression: u8,
    pub uncompressed_size: u32,
    pub checksum: u32,
}

// ---------------------------------------------------------------------------
// Container
// ---------------------------------------------------------------------------

/// Frame a chunk table: header, then the payload, LZ4-compressed when large.
pub fn wrap_container(payload: &[u8]) -> Vec<u8> {
    let compress = payload.len() >= ORCA_COMPRESSION_THRESHOLD;
    let body = if compress {
        lz4_flex::block::compress(payload)
    } else {
        payload.to_vec()
    };
    let header = OrcaHeader {
        magic: ORCA_MAGIC,
        target_version: ORCA_TARGET_VERSION,
        min_version: ORCA_MIN_VERSION,
        compression: if compress {
            ORCA_COMPRESSION_LZ4
        } else {
            ORCA_COMPRESSION_NONE
        },
        uncompressed_size: payload.len() as u32,
        checksum: xxh32(payload, ORCA_XXHASH_SEED),
    };

    let mut out = Vec::with_capacity(ORCA_HEADER_SIZE + body.len());
    out.extend_from_slice(&header.magic.to_le_bytes());
    out.extend_from_slice(&header.target_version.to_le_bytes());
    out.extend_from_slice(&header.min_version.to_le_bytes());
    out.push(header.compression);
    out.extend_from_slice(&header.uncompressed_size.to_le_bytes());
    out.extend_from_slice(&header.checksum.to_le_bytes());
    out.extend_from_slice(&body);
    out
}

pub fn read_header(bytes: &[u8]) -> Result<OrcaHeader, TrackImportError> {
    let mut r = ByteReader::new(bytes);
    let magic = r.read_u32()?;
    if magic != ORCA_MAGIC {
        return Err(TrackImportError::BadMagic(magic));
    }
    let target_version = r.read_u32()?;
    let min_version = r.read_u32()?;
    if min_version > ORCA_CURRENT_VERSION {
        return Err(TrackImportError::UnsupportedVersion {
            min_version,
            target_version,
        });
    }
    Ok(OrcaHeader {
        magic,
        target_version,
        min_version,
        compression: r.read_u8()?,
        uncompressed_size: r.read_u32()?,
        checksum: r.read_u32()?,
    })
}

/// Validate the container and return its uncompressed chunk table.
pub fn unwrap_container(bytes: &[u8]) -> Result<Vec<u8>, TrackImportError> {
    let header = read_header(bytes)?;
    let size = header.uncompressed_size as usize;
    if size >= MAX_CHUNK_SIZE {
        return Err(TrackImportError::Chunk(ChunkError::CorruptChunkSize));
    }
    let body = &bytes[ORCA_HEADER_SIZE..];

    let payload = match header.compression {
        ORCA_COMPRESSION_NONE => body.to_vec(),
        ORCA_COMPRESSION_LZ4 => lz4_flex::block::decompress(body, size)
            .map_err(|e| TrackImportError::Decompress(e.to_string()))?,
        other => {
            return Err(TrackImportError::Decompress(format!(
                "unknown compression {other}"
            )))
        }
    };
    if payload.len() != size {
        return Err(TrackImportError::Truncated);
    }

    let computed = xxh32(&payload, ORCA_XXHASH_SEED);
    if computed != header.checksum {
        return Err(TrackImportError::ChecksumMismatch {
            stored: header.checksum,
            computed,
        });
    }
    if header.target_version > ORCA_TARGET_VERSION {
        debug!(
            "Design file written as v{}; reading as v{}",
            header.target_version, ORCA_TARGET_VERSION
        );
    }
    Ok(payload)
}

// ---------------------------------------------------------------------------
// Chunk table
// ---------------------------------------------------------------------------

pub(crate) fn push_chunk(out: &mut Vec<u8>, id: u32, data: &[u8]) {
    out.extend_from_slice(&id.to_le_bytes());
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(data);
}

/// Split a chunk table into its chunks. Later duplicates replace earlier ones.
pub fn parse_chunk_table(payload: &[u8]) -> Result<BTreeMap<u32, &[u8]>, TrackImportError> {
    let mut r = ByteReader::new(payload);
    let mut chunks = BTreeMap::new();
    while r.remaining() > 0 {
        let id = r.read_u32()?;
        let len = r.read_u32()? as usize;
        chunks.insert(id, r.read_bytes(len)?);
    }
    Ok(chunks)
}

/// Encode `td` as a complete design file. Placement outcome is not stored.
pub fn export_design_file(td: &TrackDesign) -> Result<Vec<u8>, TrackExportError> {
    let mut td = td.clone();
    let mut payload = Vec::new();

    let mut general = OrcaWriter::new();
    rw_general_metadata(&mut general)?;
    push_chunk(&mut payload, CHUNK_GENERAL_METADATA, &general.into_bytes());

    let mut metadata = OrcaWriter::new();
    rw_track_metadata(&mut metadata, &mut td)?;
    push_chunk(&mut payload, CHUNK_TRACK_METADATA, &metadata.into_bytes());

    let mut elements = OrcaWriter::new();
    rw_track_elements(&mut elements, &mut td)?;
    push_chunk(&mut payload, CHUNK_TRACK_ELEMENTS, &elements.into_bytes());

    let bytes = wrap_container(&payload);
    info!(
        "Exported design file '{}' ({} bytes, {} payload)",
        td.name,
        bytes.len(),
        payload.len()
    );
    Ok(bytes)
}

/// Decode an uncompressed chunk table into a design.
pub fn decode_design_chunks(payload: &[u8]) -> Result<TrackDesign, TrackImportError> {
    let chunks = parse_chunk_table(payload)?;
    let mut td = TrackDesign::default();

    for (&id, data) in &chunks {
        match id {
            CHUNK_GENERAL_METADATA => rw_general_metadata(&mut OrcaReader::new(data))?,
            CHUNK_TRACK_METADATA => rw_track_metadata(&mut OrcaReader::new(data), &mut td)?,
            CHUNK_TRACK_ELEMENTS => rw_track_elements(&mut OrcaReader::new(data), &mut td)?,
            unknown => debug!("Skipping unknown design file chunk {unknown} ({} bytes)", data.len()),
        }
    }
    if !chunks.contains_key(&CHUNK_TRACK_METADATA) {
        return Err(TrackImportError::MissingChunk(CHUNK_TRACK_METADATA));
    }
    if !chunks.contains_key(&CHUNK_TRACK_ELEMENTS) {
        return Err(TrackImportError::MissingChunk(CHUNK_TRACK_ELEMENTS));
    }
    Ok(td)
}

// ---------------------------------------------------------------------------
// Importer
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct OrcaImporter {
    payload: Option<Vec<u8>>,
    name: String,
}

impl OrcaImporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TrackImporter for OrcaImporter {
    fn extension(&self) -> &'static str {
        EXTENSION_DESIGN_FILE
    }

    fn load_from_bytes(&mut self, bytes: &[u8]) -> Result<(), TrackImportError> {
        self.payload = Some(unwrap_container(bytes)?);
        Ok(())
    }

    fn import(&mut self) -> Result<TrackDesign, TrackImportError> {
        let payload = self.payload.as_deref().ok_or(TrackImportError::NotLoaded)?;
        let mut td = decode_design_chunks(payload)?;
        if td.name.is_empty() {
            td.name = self.name.clone();
        }
        Ok(td)
    }

    fn set_fallback_name(&mut self, name: &str) {
        self.name = name.to_string();
    }
}
