//! Byte-level helpers shared by chunk decoding and repair

use crc32fast::Hasher;

/// Calculate the CRC32 of a chunk, fed as tag then payload
pub fn chunk_crc32(tag: &[u8], payload: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(tag);
    hasher.update(payload);
    hasher.finalize()
}

/// Read a big-endian u32 from byte slice
pub fn read_u32_be(bytes: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes(bytes[offset..offset + 4].try_into().expect("slice too short"))
}

/// Write a big-endian u32 to byte slice
pub fn write_u32_be(bytes: &mut [u8], offset: usize, value: u32) {
    bytes[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}
