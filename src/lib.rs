//! # PNG Chunk Repair Tool
//!
//! This library inspects a byte buffer claiming to be a PNG file, detects
//! structural corruption (bad signature, unrecognized chunk tag,
//! inconsistent length field, mismatched CRC) and applies targeted repairs
//! until the stream parses cleanly again.
//!
//! The engine walks the chunk stream with a cursor, classifying each chunk
//! and invoking the matching repair strategy on failure. A damaged tag
//! carries no recovery information of its own, so replacement tags are
//! requested through a pluggable [`TagProvider`].

// Public API exports
pub mod chunk;
pub mod fixer;
pub mod repair;
pub mod signature;
pub mod utils;

pub use fixer::{Fixer, fix_file};
pub use repair::{StdinTagProvider, TagProvider};

/// Result type alias for repair operations
pub type FixResult<T> = Result<T, FixError>;

/// Fatal error conditions for a repair run
///
/// Structural damage (bad tag, bad length, bad CRC) is not represented
/// here: each kind is consumed at the point of detection by its matching
/// repair strategy. Only conditions with no recovery path abort the run.
#[derive(Debug, thiserror::Error)]
pub enum FixError {
    #[error("Replacement tag must be exactly 4 bytes, got {0}")]
    ReplacementTagLength(usize),

    #[error("No known chunk tag found after offset {0}, cannot resynchronize length")]
    NoResyncLandmark(usize),

    #[error("Chunk at offset {0} still invalid after repair")]
    ChunkUnrepairable(usize),

    #[error("Input file error: {0}")]
    Io(#[from] std::io::Error),
}
