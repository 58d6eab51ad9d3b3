//! Single-chunk decoding and failure classification

use crate::chunk::{CRC_LEN, ChunkTag, HEADER_LEN, TAG_LEN, is_known_tag};
use crate::utils::{chunk_crc32, read_u32_be};

/// Result of decoding one chunk record at a fixed offset
///
/// Exactly one failure kind is reported per attempt. The tag is checked
/// before the length and the length before the CRC, since each later field
/// is meaningless while an earlier one is wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// Chunk is fully valid; the cursor may advance to `next_offset`.
    Valid { next_offset: usize, tag: ChunkTag },
    /// The bytes in the tag field are not in the known vocabulary.
    InvalidTag,
    /// The declared length does not fit between the tag and the buffer end.
    InvalidLength,
    /// The stored CRC disagrees with the CRC of tag and payload.
    InvalidChecksum,
}

/// Decode the chunk record starting at `offset`. Pure read, no side effects.
///
/// Layout at `offset`: 4-byte big-endian length, 4-byte tag, `length`
/// payload bytes, 4-byte big-endian CRC32 over tag and payload.
pub fn decode(data: &[u8], offset: usize) -> DecodeOutcome {
    let tag: ChunkTag = match data.get(offset + TAG_LEN..offset + HEADER_LEN) {
        Some(bytes) if is_known_tag(bytes) => bytes.try_into().expect("tag field is 4 bytes"),
        _ => return DecodeOutcome::InvalidTag,
    };

    // The length field precedes the tag, so it is in bounds whenever the tag is.
    let length = read_u32_be(data, offset) as usize;
    let next_offset = offset + HEADER_LEN + length + CRC_LEN;
    if next_offset > data.len() {
        return DecodeOutcome::InvalidLength;
    }

    let payload = &data[offset + HEADER_LEN..offset + HEADER_LEN + length];
    let stored = read_u32_be(data, offset + HEADER_LEN + length);
    if chunk_crc32(&tag, payload) != stored {
        return DecodeOutcome::InvalidChecksum;
    }

    DecodeOutcome::Valid { next_offset, tag }
}
