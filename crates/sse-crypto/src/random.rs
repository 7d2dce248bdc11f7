//! Secure randomness source.
//!
//! Decouples nonce and key generation from the operating system so tests can
//! substitute a deterministic source. Production code uses [`OsRandom`].

use rand::{RngCore, rngs::OsRng};

/// Source of cryptographically secure random bytes.
///
/// # Invariants
///
/// - Production implementations MUST draw from a CSPRNG
/// - `fill` may block before returning (platform entropy contract) but never
///   returns a partially filled buffer
pub trait SecureRandom {
    /// Fills the provided buffer with random bytes.
    fn fill(&self, buffer: &mut [u8]);

    /// Returns an array of `N` random bytes.
    fn array<const N: usize>(&self) -> [u8; N] {
        let mut bytes = [0u8; N];
        self.fill(&mut bytes);
        bytes
    }
}

/// Operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl SecureRandom for OsRandom {
    fn fill(&self, buffer: &mut [u8]) {
        OsRng.fill_bytes(buffer);
    }
}

/// Fills `buffer` from the operating system CSPRNG.
pub fn random_bytes(buffer: &mut [u8]) {
    OsRandom.fill(buffer);
}
