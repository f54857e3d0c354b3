//! CRC32 checksums for stored fact records
//!
//! The checksum covers the serialized fact set. Every read recomputes it;
//! a mismatch means the record is corrupted and is never served.

use crc32fast::Hasher;

use crate::canonical::FactSet;

use super::errors::StoreResult;

/// Computes a CRC32 checksum over the provided data.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Verifies that the computed checksum matches the expected checksum.
pub fn verify_checksum(data: &[u8], expected: u32) -> bool {
    compute_checksum(data) == expected
}

/// Checksum of a fact set's canonical JSON form
pub fn facts_checksum(facts: &FactSet) -> StoreResult<u32> {
    let bytes = serde_json::to_vec(facts)?;
    Ok(compute_checksum(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::{Point, Unit};

    #[test]
    fn test_checksum_deterministic() {
        let data = b"canonical facts";
        assert_eq!(compute_checksum(data), compute_checksum(data));
    }

    #[test]
    fn test_verify_checksum() {
        let data = b"test payload";
        let checksum = compute_checksum(data);
        assert!(verify_checksum(data, checksum));
        assert!(!verify_checksum(data, checksum ^ 1));
    }

    #[test]
    fn test_facts_checksum_changes_with_value() {
        let a = FactSet::new(vec![Unit::new("v1", 5.0, Point::new(0.0, 0.0), "d", 0)], vec![], vec![]);
        let b = FactSet::new(vec![Unit::new("v1", 5.1, Point::new(0.0, 0.0), "d", 0)], vec![], vec![]);
        assert_ne!(facts_checksum(&a).unwrap(), facts_checksum(&b).unwrap());
    }
}
