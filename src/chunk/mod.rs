//! Chunk layout constants and the closed tag vocabulary

pub mod decoder;

pub use decoder::{DecodeOutcome, decode};

/// A 4-byte chunk tag
pub type ChunkTag = [u8; 4];

/// Size of the tag field in bytes
pub const TAG_LEN: usize = 4;

/// Size of the length and tag fields preceding the payload
pub const HEADER_LEN: usize = 8;

/// Size of the trailing CRC field in bytes
pub const CRC_LEN: usize = 4;

/// Every chunk tag the repair engine recognizes
///
/// Fixed at compile time; nothing ever extends this set at run time.
pub const KNOWN_TAGS: [ChunkTag; 21] = [
    *b"IHDR", *b"PLTE", *b"IDAT", *b"IEND", *b"bKGD", *b"cHRM", *b"dSIG",
    *b"eXIf", *b"gAMA", *b"hIST", *b"iCCP", *b"iTXt", *b"pHYs", *b"sBIT",
    *b"sPLT", *b"sRGB", *b"sTER", *b"tEXt", *b"tIME", *b"tRNS", *b"zTXt",
];

/// Tag whose chunk ends the structural stream
pub const TERMINAL_TAG: ChunkTag = *b"IEND";

/// Membership test against the closed tag vocabulary
pub fn is_known_tag(bytes: &[u8]) -> bool {
    KNOWN_TAGS.iter().any(|tag| tag.as_slice() == bytes)
}
