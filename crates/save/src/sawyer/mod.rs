// ---------------------------------------------------------------------------
// Sawyer chunks: the compressed envelope of legacy park and track files
// ---------------------------------------------------------------------------
//
// General chunk layout (little-endian):
//   [0]     Encoding (0 none, 1 rle, 2 rle + back-reference, 3 rotate)
//   [1..5]  Encoded payload length (u32)
//   [5..]   Encoded payload
//
// Track files skip the header: everything up to the trailing 4-byte checksum
// is one run-length encoded payload.

mod codec;

#[cfg(test)]
mod tests;

pub use codec::{
    decode_repeat, decode_rle, decode_rotate, encode_repeat, encode_rle, encode_rotate,
};

use bevy::prelude::*;

use crate::config::{
    MAX_CHUNK_SIZE, TD4AA_CHECKSUM_ADJUST, TD4_CHECKSUM_ADJUST, TD6_CHECKSUM_ADJUST,
    TRACK_CHECKSUM_SIZE,
};
use crate::error::ChunkError;

const CHUNK_HEADER_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ChunkEncoding {
    None = 0,
    Rle = 1,
    RleCompressed = 2,
    Rotate = 3,
}

impl ChunkEncoding {
    pub fn from_u8(value: u8) -> Result<Self, ChunkError> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Rle),
            2 => Ok(Self::RleCompressed),
            3 => Ok(Self::Rotate),
            other => Err(ChunkError::InvalidChunkEncoding(other)),
        }
    }
}

/// A decoded chunk and the encoding it was stored with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SawyerChunk {
    pub encoding: ChunkEncoding,
    pub data: Vec<u8>,
}

pub fn decode_chunk(encoding: ChunkEncoding, src: &[u8]) -> Result<Vec<u8>, ChunkError> {
    decode_chunk_limited(encoding, src, MAX_CHUNK_SIZE)
}

pub(crate) fn decode_chunk_limited(
    encoding: ChunkEncoding,
    src: &[u8],
    limit: usize,
) -> Result<Vec<u8>, ChunkError> {
    let data = match encoding {
        ChunkEncoding::None => src.to_vec(),
        ChunkEncoding::Rle => decode_rle(src, limit)?,
        ChunkEncoding::RleCompressed => decode_repeat(&decode_rle(src, limit)?, limit)?,
        ChunkEncoding::Rotate => decode_rotate(src),
    };
    if data.is_empty() {
        return Err(ChunkError::ZeroSizedChunk);
    }
    Ok(data)
}

pub fn encode_chunk(encoding: ChunkEncoding, src: &[u8]) -> Vec<u8> {
    match encoding {
        ChunkEncoding::None => src.to_vec(),
        ChunkEncoding::Rle => encode_rle(src),
        ChunkEncoding::RleCompressed => encode_rle(&encode_repeat(src)),
        ChunkEncoding::Rotate => encode_rotate(src),
    }
}

// ---------------------------------------------------------------------------
// Checksum
// ---------------------------------------------------------------------------

/// Rotating byte sum over the encoded track payload.
fn rolling_sum(encoded: &[u8]) -> u32 {
    encoded.iter().fold(0u32, |sum, &b| {
        let low = (sum & 0xFF).wrapping_add(u32::from(b)) & 0xFF;
        ((sum & 0xFFFF_FF00) | low).rotate_left(3)
    })
}

/// The checksum written after a track chunk.
pub fn track_checksum(encoded: &[u8]) -> u32 {
    rolling_sum(encoded).wrapping_sub(TD6_CHECKSUM_ADJUST)
}

/// Whether `stored` matches the payload under any of the legacy adjustments.
pub fn validate_track_checksum(encoded: &[u8], stored: u32) -> bool {
    let sum = rolling_sum(encoded);
    [TD6_CHECKSUM_ADJUST, TD4_CHECKSUM_ADJUST, TD4AA_CHECKSUM_ADJUST]
        .iter()
        .any(|&adjust| sum.wrapping_sub(adjust) == stored)
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Reads chunks from an in-memory stream. A failed read leaves the position
/// where it was before the call.
pub struct SawyerChunkReader<'a> {
    stream: &'a [u8],
    pos: usize,
}

impl<'a> SawyerChunkReader<'a> {
    pub fn new(stream: &'a [u8]) -> Self {
        Self { stream, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn read_chunk(&mut self) -> Result<SawyerChunk, ChunkError> {
        let start = self.pos;
        let result = self.read_chunk_inner();
        if result.is_err() {
            self.pos = start;
        }
        result
    }

    fn read_chunk_inner(&mut self) -> Result<SawyerChunk, ChunkError> {
        let header = self
            .stream
            .get(self.pos..self.pos + CHUNK_HEADER_SIZE)
            .ok_or(ChunkError::UnexpectedEof)?;
        let encoding = ChunkEncoding::from_u8(header[0])?;
        let length = u32::from_le_bytes([header[1], header[2], header[3], header[4]]) as usize;
        if length >= MAX_CHUNK_SIZE {
            return Err(ChunkError::CorruptChunkSize);
        }
        let payload_start = self.pos + CHUNK_HEADER_SIZE;
        let payload = self
            .stream
            .get(payload_start..payload_start + length)
            .ok_or(ChunkError::CorruptChunkSize)?;
        let data = decode_chunk(encoding, payload)?;
        self.pos = payload_start + length;
        Ok(SawyerChunk { encoding, data })
    }

    /// The header-less payload of a track file. The trailing checksum is
    /// checked but a mismatch only logs a warning.
    pub fn read_track_chunk(&mut self) -> Result<SawyerChunk, ChunkError> {
        let start = self.pos;
        let result = self.read_track_chunk_inner();
        if result.is_err() {
            self.pos = start;
        }
        result
    }

    fn read_track_chunk_inner(&mut self) -> Result<SawyerChunk, ChunkError> {
        let remaining = self.stream.len() - self.pos;
        let length = remaining
            .checked_sub(TRACK_CHECKSUM_SIZE)
            .ok_or(ChunkError::CorruptChunkSize)?;
        if length >= MAX_CHUNK_SIZE {
            return Err(ChunkError::CorruptChunkSize);
        }
        let payload = &self.stream[self.pos..self.pos + length];
        let data = decode_chunk(ChunkEncoding::Rle, payload)?;

        let trailer = &self.stream[self.pos + length..];
        let stored = u32::from_le_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
        if !validate_track_checksum(payload, stored) {
            warn!("Track design checksum mismatch (stored {stored:#010x}); loading anyway");
        }

        self.pos = self.stream.len();
        Ok(SawyerChunk {
            encoding: ChunkEncoding::Rle,
            data,
        })
    }
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct SawyerChunkWriter {
    buf: Vec<u8>,
}

impl SawyerChunkWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_chunk(&mut self, encoding: ChunkEncoding, data: &[u8]) {
        let encoded = encode_chunk(encoding, data);
        self.buf.push(encoding as u8);
        self.buf
            .extend_from_slice(&(encoded.len() as u32).to_le_bytes());
        self.buf.extend_from_slice(&encoded);
    }

    /// A header-less run-length payload followed by its checksum.
    pub fn write_track_chunk(&mut self, data: &[u8]) {
        let encoded = encode_rle(data);
        let checksum = track_checksum(&encoded);
        self.buf.extend_from_slice(&encoded);
        self.buf.extend_from_slice(&checksum.to_le_bytes());
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}
