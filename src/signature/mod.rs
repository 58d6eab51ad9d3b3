//! PNG signature validation and repair

/// The fixed 8-byte PNG file signature
pub const SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Check whether the buffer starts with the PNG signature
pub fn is_valid(data: &[u8]) -> bool {
    data.len() >= SIGNATURE.len() && data[..SIGNATURE.len()] == SIGNATURE
}

/// Overwrite the first 8 bytes with the canonical signature
///
/// Unconditional: no other field depends on the signature's prior value,
/// so a single overwrite always suffices. A buffer shorter than the
/// signature is grown to hold it.
pub fn repair(data: &mut Vec<u8>) {
    if data.len() < SIGNATURE.len() {
        data.resize(SIGNATURE.len(), 0);
    }
    data[..SIGNATURE.len()].copy_from_slice(&SIGNATURE);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_signature() {
        let data = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00];
        assert!(is_valid(&data));
    }

    #[test]
    fn test_corrupted_first_byte() {
        let data = [0x00, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert!(!is_valid(&data));
    }

    #[test]
    fn test_short_buffer_is_invalid() {
        assert!(!is_valid(&[0x89, 0x50]));
    }

    #[test]
    fn test_repair_touches_only_signature_bytes() {
        let mut data = vec![0x00, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0xAA, 0xBB];
        repair(&mut data);
        assert!(is_valid(&data));
        assert_eq!(&data[8..], &[0xAA, 0xBB]);
    }

    #[test]
    fn test_repair_is_idempotent() {
        let mut once = vec![0xFF; 12];
        repair(&mut once);
        let mut twice = once.clone();
        repair(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_repair_grows_short_buffer() {
        let mut data = vec![0x89, 0x50];
        repair(&mut data);
        assert!(is_valid(&data));
        assert_eq!(data.len(), SIGNATURE.len());
    }
}
