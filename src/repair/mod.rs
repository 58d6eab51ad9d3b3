//! Chunk repair strategies: tag, length, and checksum
//!
//! Each strategy is stateless and works on the raw buffer plus the failing
//! chunk's offset. Strategies never validate their own result; the
//! orchestrator re-decodes the chunk after every repair.

use std::io::{self, BufRead, Write};

use crate::chunk::{HEADER_LEN, KNOWN_TAGS, TAG_LEN, is_known_tag};
use crate::utils::{chunk_crc32, read_u32_be, write_u32_be};
use crate::{FixError, FixResult};

/// Source of replacement values for damaged chunk tags
///
/// A corrupted tag carries no self-describing recovery information, so the
/// corrective value has to come from outside the buffer. The CLI reads it
/// from stdin; tests plug in scripted implementations.
pub trait TagProvider {
    /// Produce the replacement for the damaged tag at `offset`
    fn replacement_tag(&mut self, current: &[u8], offset: usize) -> FixResult<Vec<u8>>;
}

/// Interactive provider reading one line from standard input
pub struct StdinTagProvider;

impl TagProvider for StdinTagProvider {
    fn replacement_tag(&mut self, _current: &[u8], _offset: usize) -> FixResult<Vec<u8>> {
        print!("Enter the replacement tag: ");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).as_bytes().to_vec())
    }
}

/// Replace the 4 tag bytes at `offset + 4` with a value from the provider
///
/// Only the tag field is overwritten; the stored CRC usually goes stale and
/// is caught by the re-decode that follows. A replacement that is not
/// exactly 4 bytes aborts the whole run. A buffer that ends inside the tag
/// field is grown so the replacement fits.
pub fn repair_tag(
    data: &mut Vec<u8>,
    offset: usize,
    provider: &mut dyn TagProvider,
) -> FixResult<()> {
    if data.len() < offset + HEADER_LEN {
        data.resize(offset + HEADER_LEN, 0);
    }
    let current = data[offset + TAG_LEN..offset + HEADER_LEN].to_vec();

    println!(
        "Current tag : {:?} ({})",
        current,
        String::from_utf8_lossy(&current)
    );
    println!("Known tags  : {}", known_tags_list());

    let replacement = provider.replacement_tag(&current, offset)?;
    if replacement.len() != TAG_LEN {
        return Err(FixError::ReplacementTagLength(replacement.len()));
    }
    data[offset + TAG_LEN..offset + HEADER_LEN].copy_from_slice(&replacement);
    Ok(())
}

/// Rewrite a damaged length field by resynchronizing on the next known tag
///
/// Scans from the payload start (`offset + 8`) for the earliest literal
/// occurrence of any known tag. The genuine next tag can never sit closer
/// than 8 bytes in, because the current chunk's CRC field and the next
/// chunk's length field precede it, so earlier matches are skipped. A
/// tag-shaped byte pattern inside real payload data still yields an
/// undersized length; accepted heuristic risk.
pub fn repair_length(data: &mut [u8], offset: usize) -> FixResult<()> {
    let landmark = data
        .get(offset + HEADER_LEN..)
        .unwrap_or(&[])
        .windows(TAG_LEN)
        .enumerate()
        .skip(HEADER_LEN)
        .find(|(_, window)| is_known_tag(window))
        .map(|(pos, _)| pos);

    match landmark {
        Some(pos) => {
            let length = (pos - HEADER_LEN) as u32;
            println!("Found the next chunk tag, resizing payload to {length} bytes");
            write_u32_be(data, offset, length);
            Ok(())
        }
        None => Err(FixError::NoResyncLandmark(offset)),
    }
}

/// Recompute the CRC over tag and payload and overwrite the stored value
///
/// The one fully-algorithmic repair: with a trusted tag and length it is
/// always exact. Precondition: a decode at `offset` already classified both
/// of those fields as consistent.
pub fn repair_checksum(data: &mut [u8], offset: usize) {
    let length = read_u32_be(data, offset) as usize;
    let payload_start = offset + HEADER_LEN;
    let crc = chunk_crc32(
        &data[offset + TAG_LEN..payload_start],
        &data[payload_start..payload_start + length],
    );
    println!("New CRC : {crc:#010x}");
    write_u32_be(data, payload_start + length, crc);
}

fn known_tags_list() -> String {
    KNOWN_TAGS
        .iter()
        .map(|tag| String::from_utf8_lossy(tag))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{ChunkTag, DecodeOutcome, decode};
    use proptest::prelude::*;

    struct Scripted(Vec<u8>);

    impl TagProvider for Scripted {
        fn replacement_tag(&mut self, _current: &[u8], _offset: usize) -> FixResult<Vec<u8>> {
            Ok(self.0.clone())
        }
    }

    fn encode_chunk(tag: &ChunkTag, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        out.extend_from_slice(tag);
        out.extend_from_slice(payload);
        out.extend_from_slice(&chunk_crc32(tag, payload).to_be_bytes());
        out
    }

    #[test]
    fn test_repair_tag_overwrites_only_tag_field() {
        let mut data = encode_chunk(b"IDAT", b"payload");
        data[4..8].copy_from_slice(b"QQQQ");
        let expected = encode_chunk(b"IDAT", b"payload");

        repair_tag(&mut data, 0, &mut Scripted(b"IDAT".to_vec())).unwrap();
        assert_eq!(data, expected);
    }

    #[test]
    fn test_repair_tag_rejects_wrong_length() {
        let mut data = encode_chunk(b"IDAT", b"payload");
        let err = repair_tag(&mut data, 0, &mut Scripted(b"abc".to_vec())).unwrap_err();
        assert!(matches!(err, FixError::ReplacementTagLength(3)));
    }

    #[test]
    fn test_repair_length_resynchronizes_on_next_tag() {
        let mut data = encode_chunk(b"IDAT", b"hello");
        data.extend_from_slice(&encode_chunk(b"IEND", &[]));
        // Zero out the length field.
        write_u32_be(&mut data, 0, 0);

        repair_length(&mut data, 0).unwrap();
        assert_eq!(read_u32_be(&data, 0), 5);

        // Re-decoding must land the cursor on the next chunk's record.
        let outcome = decode(&data, 0);
        let DecodeOutcome::Valid { next_offset, .. } = outcome else {
            panic!("chunk should decode after length repair, got {outcome:?}");
        };
        assert_eq!(&data[next_offset + 4..next_offset + 8], b"IEND");
    }

    #[test]
    fn test_repair_length_without_landmark_fails() {
        let mut data = encode_chunk(b"IDAT", b"hello");
        write_u32_be(&mut data, 0, 9999);
        let err = repair_length(&mut data, 0).unwrap_err();
        assert!(matches!(err, FixError::NoResyncLandmark(0)));
    }

    #[test]
    fn test_repair_checksum_minimal_damage() {
        let good = encode_chunk(b"tEXt", b"some text");
        let mut damaged = good.clone();
        let crc_start = damaged.len() - 4;
        damaged[crc_start..].fill(0);

        repair_checksum(&mut damaged, 0);
        assert_eq!(damaged, good);
    }

    proptest! {
        #[test]
        fn test_recomputed_crc_matches_contents(
            tag in any::<[u8; 4]>(),
            payload in proptest::collection::vec(any::<u8>(), 0..512),
        ) {
            let mut data = Vec::new();
            data.extend_from_slice(&(payload.len() as u32).to_be_bytes());
            data.extend_from_slice(&tag);
            data.extend_from_slice(&payload);
            data.extend_from_slice(&[0u8; 4]);

            repair_checksum(&mut data, 0);
            prop_assert_eq!(
                read_u32_be(&data, HEADER_LEN + payload.len()),
                chunk_crc32(&tag, &payload)
            );
        }
    }
}
