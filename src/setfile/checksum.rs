//! CRC32 checksum of setfile bytes
//!
//! Reported as `crc32:xxxxxxxx` (lowercase hex, zero-padded) for both
//! written and decoded setfiles, over the exact bytes on disk.

use std::fmt;

use crc32fast::Hasher;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checksum(u32);

impl Checksum {
    pub fn of(data: &[u8]) -> Self {
        let mut hasher = Hasher::new();
        hasher.update(data);
        Checksum(hasher.finalize())
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "crc32:{:08x}", self.0)
    }
}

impl Serialize for Checksum {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_deterministic() {
        let data = b"gInput_Grid_P1=300.0\n";
        assert_eq!(Checksum::of(data), Checksum::of(data));
    }

    #[test]
    fn test_checksum_detects_changes() {
        assert_ne!(
            Checksum::of(b"gInput_Grid_P1=300.0"),
            Checksum::of(b"gInput_Grid_P1=301.0")
        );
    }

    #[test]
    fn test_display_format() {
        assert_eq!(Checksum(0xDEADBEEF).to_string(), "crc32:deadbeef");
        assert_eq!(Checksum(1).to_string(), "crc32:00000001");
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Checksum(0xABCD1234)).unwrap();
        assert_eq!(json, "\"crc32:abcd1234\"");
    }
}
