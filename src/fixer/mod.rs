//! Repair orchestration: the signature stage plus the chunk-by-chunk loop

use std::fs;
use std::path::Path;

use crate::chunk::{self, ChunkTag, DecodeOutcome, TERMINAL_TAG};
use crate::repair::{self, TagProvider};
use crate::signature;
use crate::{FixError, FixResult};

/// Drives a full repair pass over one in-memory buffer
///
/// Owns the buffer exclusively for the duration of the run; the repaired
/// bytes are handed back only once the whole stream decodes cleanly.
pub struct Fixer {
    data: Vec<u8>,
}

impl Fixer {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Load the buffer from a file
    pub fn from_file(path: &Path) -> FixResult<Self> {
        Ok(Self::new(fs::read(path)?))
    }

    /// Run the signature stage and the chunk loop, returning the repaired buffer
    ///
    /// The cursor starts right after the signature and the loop ends when it
    /// reaches the end of the buffer or a terminal chunk decodes cleanly;
    /// bytes after the terminal chunk pass through untouched.
    pub fn run(mut self, provider: &mut dyn TagProvider) -> FixResult<Vec<u8>> {
        println!("Validating signature...");
        if signature::is_valid(&self.data) {
            println!("Valid");
        } else {
            println!("Invalid, rewriting the signature bytes");
            signature::repair(&mut self.data);
            debug_assert!(signature::is_valid(&self.data));
        }

        let mut offset = signature::SIGNATURE.len();
        while offset < self.data.len() {
            let (next_offset, tag) = self.fix_chunk_at(offset, provider)?;
            debug_assert!(next_offset > offset, "cursor must strictly advance");
            offset = next_offset;
            if tag == TERMINAL_TAG {
                break;
            }
        }

        Ok(self.data)
    }

    /// Decode one chunk, repairing each failing field at most once
    ///
    /// Strategies run in classification order, so a tag or length repair
    /// that leaves the CRC stale still converges within the same pass. A
    /// chunk that fails decoding after its repair pass aborts the run
    /// instead of advancing an unvalidated cursor.
    fn fix_chunk_at(
        &mut self,
        offset: usize,
        provider: &mut dyn TagProvider,
    ) -> FixResult<(usize, ChunkTag)> {
        println!("Parsing chunk at offset {offset}");
        let mut outcome = chunk::decode(&self.data, offset);

        if matches!(outcome, DecodeOutcome::InvalidTag) {
            println!("Tag is invalid, repairing");
            repair::repair_tag(&mut self.data, offset, provider)?;
            outcome = chunk::decode(&self.data, offset);
        }
        if matches!(outcome, DecodeOutcome::InvalidLength) {
            println!("Length is invalid, repairing");
            repair::repair_length(&mut self.data, offset)?;
            outcome = chunk::decode(&self.data, offset);
        }
        if matches!(outcome, DecodeOutcome::InvalidChecksum) {
            println!("CRC is invalid, repairing");
            repair::repair_checksum(&mut self.data, offset);
            outcome = chunk::decode(&self.data, offset);
        }

        match outcome {
            DecodeOutcome::Valid { next_offset, tag } => {
                println!("Chunk {} is valid", String::from_utf8_lossy(&tag));
                Ok((next_offset, tag))
            }
            _ => Err(FixError::ChunkUnrepairable(offset)),
        }
    }
}

/// Repair `input` and write the result to `output`
///
/// The input file is never modified; the output is written in one piece
/// only after the whole buffer has been repaired.
pub fn fix_file(input: &Path, output: &Path, provider: &mut dyn TagProvider) -> FixResult<()> {
    let repaired = Fixer::from_file(input)?.run(provider)?;
    fs::write(output, repaired)?;
    println!("Done fixing, writing output image to {}", output.display());
    Ok(())
}
