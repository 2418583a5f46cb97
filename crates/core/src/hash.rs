//! Content fingerprints for chunk change detection

use std::fmt;
use twox_hash::XxHash3_128;

/// 128-bit digest of a chunk's raw bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(u128);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

/// Compute the fingerprint of a byte sequence
///
/// Total over all inputs, including the empty slice.
pub fn fingerprint(bytes: &[u8]) -> Fingerprint {
    Fingerprint(XxHash3_128::oneshot(bytes))
}
