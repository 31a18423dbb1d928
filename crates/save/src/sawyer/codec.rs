//! Sawyer chunk compression: run-length, back-reference and bit rotation.
//!
//! Every decoder bounds its output to a caller-supplied limit so that a
//! hostile stream cannot grow the buffer without bound.

use crate::error::ChunkError;

// ---------------------------------------------------------------------------
// Run-length
// ---------------------------------------------------------------------------

/// Longest run or literal block a single code byte describes when encoding.
const RLE_MAX_BLOCK: usize = 125;

/// A code byte with the top bit set repeats the next byte `257 - code`
/// times; otherwise the next `code + 1` bytes are copied verbatim.
pub fn decode_rle(src: &[u8], limit: usize) -> Result<Vec<u8>, ChunkError> {
    let mut out = Vec::with_capacity(src.len().min(limit));
    let mut i = 0;
    while i < src.len() {
        let code = src[i];
        if code & 0x80 != 0 {
            let value = *src.get(i + 1).ok_or(ChunkError::CorruptRle)?;
            let count = 257 - usize::from(code);
            if out.len() + count > limit {
                return Err(ChunkError::DestinationTooSmall);
            }
            out.resize(out.len() + count, value);
            i += 2;
        } else {
            let count = usize::from(code) + 1;
            let literals = src.get(i + 1..i + 1 + count).ok_or(ChunkError::CorruptRle)?;
            if out.len() + count > limit {
                return Err(ChunkError::DestinationTooSmall);
            }
            out.extend_from_slice(literals);
            i += 1 + count;
        }
    }
    Ok(out)
}

pub fn encode_rle(src: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(src.len() + src.len() / 64 + 2);
    let mut literal_start = 0;
    let mut literal_count = 0;
    let mut i = 0;

    while i + 1 < src.len() {
        let starts_run = src[i] == src[i + 1];
        if (literal_count > 0 && starts_run) || literal_count > RLE_MAX_BLOCK {
            flush_literals(&mut out, &src[literal_start..literal_start + literal_count]);
            literal_start += literal_count;
            literal_count = 0;
        }
        if starts_run {
            let mut run = 2;
            while run < RLE_MAX_BLOCK && i + run < src.len() && src[i + run] == src[i] {
                run += 1;
            }
            out.push((257 - run) as u8);
            out.push(src[i]);
            i += run;
            literal_start = i;
            literal_count = 0;
        } else {
            literal_count += 1;
            i += 1;
        }
    }
    if i + 1 == src.len() {
        literal_count += 1;
    }
    if literal_count > 0 {
        flush_literals(&mut out, &src[literal_start..literal_start + literal_count]);
    }
    out
}

fn flush_literals(out: &mut Vec<u8>, literals: &[u8]) {
    out.push((literals.len() - 1) as u8);
    out.extend_from_slice(literals);
}

// ---------------------------------------------------------------------------
// Back-reference
// ---------------------------------------------------------------------------

const REPEAT_LITERAL: u8 = 0xFF;
const REPEAT_WINDOW: usize = 32;
const REPEAT_MAX_COUNT: usize = 8;

/// `0xFF` escapes one literal byte. Any other code copies `(code & 7) + 1`
/// bytes starting `32 - (code >> 3)` bytes back in the output.
pub fn decode_repeat(src: &[u8], limit: usize) -> Result<Vec<u8>, ChunkError> {
    let mut out: Vec<u8> = Vec::with_capacity(src.len().min(limit));
    let mut i = 0;
    while i < src.len() {
        let code = src[i];
        if code == REPEAT_LITERAL {
            let value = *src.get(i + 1).ok_or(ChunkError::CorruptRle)?;
            if out.len() + 1 > limit {
                return Err(ChunkError::DestinationTooSmall);
            }
            out.push(value);
            i += 2;
        } else {
            let count = usize::from(code & 7) + 1;
            let back = REPEAT_WINDOW - usize::from(code >> 3);
            let start = out.len().checked_sub(back).ok_or(ChunkError::CorruptRle)?;
            if start + count > out.len() {
                return Err(ChunkError::CorruptRle);
            }
            if out.len() + count > limit {
                return Err(ChunkError::DestinationTooSmall);
            }
            out.extend_from_within(start..start + count);
            i += 1;
        }
    }
    Ok(out)
}

/// Greedy encoder over a 32-byte window. Matches never overlap the bytes
/// being encoded so the decoder can copy them in one go.
pub fn encode_repeat(src: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(src.len() * 2);
    let Some(&first) = src.first() else {
        return out;
    };
    out.push(REPEAT_LITERAL);
    out.push(first);

    let mut i = 1;
    while i < src.len() {
        let search_start = i.saturating_sub(REPEAT_WINDOW);
        let search_end = i - 1;
        let mut best_index = 0;
        let mut best_count = 0;

        for repeat_index in search_start..=search_end {
            let max_count = (REPEAT_MAX_COUNT - 1)
                .min(search_end - repeat_index)
                .min(src.len() - i - 1);
            let count = (0..=max_count)
                .take_while(|&j| src[repeat_index + j] == src[i + j])
                .count();
            if count > best_count {
                best_index = repeat_index;
                best_count = count;
                if count == REPEAT_MAX_COUNT {
                    break;
                }
            }
        }

        if best_count == 0 {
            out.push(REPEAT_LITERAL);
            out.push(src[i]);
            i += 1;
        } else {
            let distance = i - best_index;
            out.push(((best_count - 1) | ((REPEAT_WINDOW - distance) << 3)) as u8);
            i += best_count;
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Rotation
// ---------------------------------------------------------------------------

/// Rotation amounts cycle 1, 3, 5, 7 across the buffer.
fn rotation_for(index: usize) -> u32 {
    ((index * 2 + 1) & 7) as u32
}

pub fn decode_rotate(src: &[u8]) -> Vec<u8> {
    src.iter()
        .enumerate()
        .map(|(i, b)| b.rotate_right(rotation_for(i)))
        .collect()
}

pub fn encode_rotate(src: &[u8]) -> Vec<u8> {
    src.iter()
        .enumerate()
        .map(|(i, b)| b.rotate_left(rotation_for(i)))
        .collect()
}
