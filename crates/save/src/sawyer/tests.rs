use super::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Mixed content: runs, repeated phrases and noise.
fn sample_buffer(rng: &mut ChaCha8Rng, len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    while out.len() < len {
        match rng.gen_range(0..3) {
            0 => {
                let b: u8 = rng.gen();
                let n = rng.gen_range(1..300);
                out.extend(std::iter::repeat(b).take(n));
            }
            1 if out.len() > 8 => {
                let start = rng.gen_range(0..out.len() - 4);
                let n = rng.gen_range(1..=4);
                let phrase = out[start..start + n].to_vec();
                out.extend_from_slice(&phrase);
            }
            _ => {
                let n = rng.gen_range(1..40);
                out.extend((0..n).map(|_| rng.gen::<u8>()));
            }
        }
    }
    out.truncate(len);
    out
}

// ---------------------------------------------------------------------------
// Codec behaviour
// ---------------------------------------------------------------------------

#[test]
fn test_rle_decodes_runs_and_literals() {
    // 0xFE repeats the next byte three times; 0x01 copies two literals.
    let decoded = decode_rle(&[0xFE, 0xAA, 0x01, 0x10, 0x20], MAX_CHUNK_SIZE).unwrap();
    assert_eq!(decoded, vec![0xAA, 0xAA, 0xAA, 0x10, 0x20]);
}

#[test]
fn test_rle_encodes_long_runs_in_blocks() {
    let src = vec![7u8; 300];
    let encoded = encode_rle(&src);
    // 125 + 125 + 50
    assert_eq!(encoded, vec![132, 7, 132, 7, 207, 7], "got: {encoded:?}");
    assert_eq!(decode_rle(&encoded, MAX_CHUNK_SIZE).unwrap(), src);
}

#[test]
fn test_rle_round_trips_random_buffers() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5A17);
    for _ in 0..200 {
        let len = rng.gen_range(1..4096);
        let src = sample_buffer(&mut rng, len);
        let encoded = encode_rle(&src);
        assert_eq!(decode_rle(&encoded, MAX_CHUNK_SIZE).unwrap(), src);
    }
}

#[test]
fn test_rle_literal_blocks_never_exceed_code_range() {
    let src: Vec<u8> = (0..1000u32).map(|i| (i % 251) as u8).collect();
    let encoded = encode_rle(&src);
    assert!(encoded[0] < 0x80, "got: {}", encoded[0]);
    assert_eq!(decode_rle(&encoded, MAX_CHUNK_SIZE).unwrap(), src);
}

#[test]
fn test_rle_truncated_input_is_corrupt() {
    assert_eq!(decode_rle(&[0xFE], MAX_CHUNK_SIZE), Err(ChunkError::CorruptRle));
    assert_eq!(decode_rle(&[0x03, 1, 2], MAX_CHUNK_SIZE), Err(ChunkError::CorruptRle));
}

#[test]
fn test_rle_output_limit_is_enforced() {
    let result = decode_rle(&[0x81, 0x00, 0x81, 0x00], 200);
    assert_eq!(result, Err(ChunkError::DestinationTooSmall));
}

#[test]
fn test_repeat_round_trips_random_buffers() {
    let mut rng = ChaCha8Rng::seed_from_u64(0xBACC);
    for _ in 0..100 {
        let len = rng.gen_range(1..2048);
        let src = sample_buffer(&mut rng, len);
        let encoded = encode_repeat(&src);
        assert_eq!(decode_repeat(&encoded, MAX_CHUNK_SIZE).unwrap(), src);
    }
}

#[test]
fn test_repeat_compresses_periodic_data() {
    let src: Vec<u8> = b"abcd".iter().copied().cycle().take(256).collect();
    let encoded = encode_repeat(&src);
    assert!(encoded.len() < src.len() / 2, "got: {}", encoded.len());
}

#[test]
fn test_repeat_back_reference_before_start_is_corrupt() {
    // One literal then a copy reaching 32 bytes back.
    let result = decode_repeat(&[0xFF, 0x41, 0x00], MAX_CHUNK_SIZE);
    assert_eq!(result, Err(ChunkError::CorruptRle));
}

#[test]
fn test_repeat_back_reference_past_end_is_corrupt() {
    // Copy 2 bytes starting one byte back: would read unwritten output.
    let result = decode_repeat(&[0xFF, 0x41, 0xFF, 0x42, (31 << 3) | 1], MAX_CHUNK_SIZE);
    assert_eq!(result, Err(ChunkError::CorruptRle));
}

#[test]
fn test_rotate_cycles_amounts() {
    let src = [0x01u8, 0x01, 0x01, 0x01, 0x01];
    let encoded = encode_rotate(&src);
    assert_eq!(encoded, vec![0x02, 0x08, 0x20, 0x80, 0x02]);
    assert_eq!(decode_rotate(&encoded), src.to_vec());
}

#[test]
fn test_every_encoding_round_trips() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let src = sample_buffer(&mut rng, 3000);
    for encoding in [
        ChunkEncoding::None,
        ChunkEncoding::Rle,
        ChunkEncoding::RleCompressed,
        ChunkEncoding::Rotate,
    ] {
        let encoded = encode_chunk(encoding, &src);
        let decoded = decode_chunk(encoding, &encoded).unwrap();
        assert_eq!(decoded, src, "encoding {encoding:?}");
    }
}

// ---------------------------------------------------------------------------
// Chunk framing
// ---------------------------------------------------------------------------

#[test]
fn test_reader_reads_consecutive_chunks() {
    let mut writer = SawyerChunkWriter::new();
    writer.write_chunk(ChunkEncoding::Rle, b"first chunk");
    writer.write_chunk(ChunkEncoding::Rotate, b"second");
    let bytes = writer.into_bytes();

    let mut reader = SawyerChunkReader::new(&bytes);
    let first = reader.read_chunk().unwrap();
    assert_eq!(first.encoding, ChunkEncoding::Rle);
    assert_eq!(first.data, b"first chunk".to_vec());
    let second = reader.read_chunk().unwrap();
    assert_eq!(second.data, b"second".to_vec());
    assert_eq!(reader.position(), bytes.len());
    assert_eq!(reader.read_chunk(), Err(ChunkError::UnexpectedEof));
}

#[test]
fn test_invalid_encoding_rewinds() {
    let bytes = [9u8, 1, 0, 0, 0, 0];
    let mut reader = SawyerChunkReader::new(&bytes);
    assert_eq!(reader.read_chunk(), Err(ChunkError::InvalidChunkEncoding(9)));
    assert_eq!(reader.position(), 0);
}

#[test]
fn test_oversized_declared_length_is_rejected() {
    let mut bytes = vec![0u8];
    bytes.extend_from_slice(&(MAX_CHUNK_SIZE as u32).to_le_bytes());
    bytes.extend_from_slice(&[1, 2, 3]);
    let mut reader = SawyerChunkReader::new(&bytes);
    assert_eq!(reader.read_chunk(), Err(ChunkError::CorruptChunkSize));
    assert_eq!(reader.position(), 0);
}

#[test]
fn test_short_payload_is_corrupt_size() {
    let bytes = [0u8, 10, 0, 0, 0, 1, 2];
    let mut reader = SawyerChunkReader::new(&bytes);
    assert_eq!(reader.read_chunk(), Err(ChunkError::CorruptChunkSize));
}

#[test]
fn test_zero_sized_chunk_is_rejected() {
    let bytes = [0u8, 0, 0, 0, 0];
    let mut reader = SawyerChunkReader::new(&bytes);
    assert_eq!(reader.read_chunk(), Err(ChunkError::ZeroSizedChunk));
}

#[test]
fn test_failed_read_leaves_earlier_chunks_consumed() {
    let mut writer = SawyerChunkWriter::new();
    writer.write_chunk(ChunkEncoding::None, b"ok");
    let mut bytes = writer.into_bytes();
    let good_len = bytes.len();
    bytes.extend_from_slice(&[1, 1, 0, 0, 0, 0xFE]);

    let mut reader = SawyerChunkReader::new(&bytes);
    reader.read_chunk().unwrap();
    assert_eq!(reader.read_chunk(), Err(ChunkError::CorruptRle));
    assert_eq!(reader.position(), good_len);
}

// ---------------------------------------------------------------------------
// Track chunks
// ---------------------------------------------------------------------------

#[test]
fn test_track_chunk_round_trip_and_checksum() {
    let payload: Vec<u8> = (0..500u32).map(|i| (i / 7) as u8).collect();
    let mut writer = SawyerChunkWriter::new();
    writer.write_track_chunk(&payload);
    let bytes = writer.into_bytes();

    let encoded = &bytes[..bytes.len() - 4];
    let stored = u32::from_le_bytes(bytes[bytes.len() - 4..].try_into().unwrap());
    assert_eq!(stored, track_checksum(encoded));
    assert!(validate_track_checksum(encoded, stored));

    let mut reader = SawyerChunkReader::new(&bytes);
    let chunk = reader.read_track_chunk().unwrap();
    assert_eq!(chunk.data, payload);
}

#[test]
fn test_track_checksum_accepts_legacy_adjustments() {
    let encoded = encode_rle(b"legacy design bytes");
    let sum = track_checksum(&encoded).wrapping_add(TD6_CHECKSUM_ADJUST);
    assert!(validate_track_checksum(&encoded, sum.wrapping_sub(TD4_CHECKSUM_ADJUST)));
    assert!(validate_track_checksum(&encoded, sum.wrapping_sub(TD4AA_CHECKSUM_ADJUST)));
    assert!(!validate_track_checksum(&encoded, sum));
}

#[test]
fn test_bad_checksum_still_loads() {
    let mut writer = SawyerChunkWriter::new();
    writer.write_track_chunk(b"design");
    let mut bytes = writer.into_bytes();
    let last = bytes.len() - 1;
    bytes[last] ^= 0x5A;
    let mut reader = SawyerChunkReader::new(&bytes);
    assert_eq!(reader.read_track_chunk().unwrap().data, b"design".to_vec());
}

#[test]
fn test_track_chunk_without_payload_fails() {
    let bytes = [0u8, 0, 0, 0];
    let mut reader = SawyerChunkReader::new(&bytes);
    assert_eq!(reader.read_track_chunk(), Err(ChunkError::ZeroSizedChunk));
    let short = [0u8, 0];
    let mut reader = SawyerChunkReader::new(&short);
    assert_eq!(reader.read_track_chunk(), Err(ChunkError::CorruptChunkSize));
    assert_eq!(reader.position(), 0);
}
