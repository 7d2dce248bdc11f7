//! Keyed pseudorandom function with a fixed output length.
//!
//! `Prf<N>` maps arbitrary input to exactly `N` pseudorandom bytes using
//! HMAC-SHA-512. The output length is part of the type, so one PRF instance
//! can never be evaluated at two different lengths.
//!
//! # Construction
//!
//! ```text
//! N <= 64:   out = HMAC(key, input)[..N]
//! N >  64:   out = HMAC(key, input ‖ be32(0)) ‖ HMAC(key, input ‖ be32(1)) ‖ ...
//!                  truncated to N bytes
//! ```
//!
//! Each HMAC call stays in the single-block regime of the keyed hash; counter
//! mode only stretches the output.

use zeroize::Zeroizing;

use crate::{
    key::Key,
    mac::{self, MAC_SIZE},
};

/// PRF key size in bytes, independent of the output length
pub const KEY_SIZE: usize = 32;

/// Size of the big-endian block counter appended in counter mode
const COUNTER_SIZE: usize = 4;

/// Pseudorandom function producing `N` bytes per evaluation.
///
/// `N = 0` fails to compile when the PRF is constructed:
///
/// ```compile_fail
/// use sse_crypto::{Key, Prf};
///
/// let prf = Prf::<0>::new(Key::generate());
/// ```
pub struct Prf<const N: usize> {
    key: Key<KEY_SIZE>,
}

impl<const N: usize> Prf<N> {
    /// Output length in bytes.
    pub const OUTPUT_SIZE: usize = N;

    const NON_EMPTY: () = assert!(N > 0, "PRF output length must be strictly larger than 0");

    /// Take ownership of `key` and build the PRF.
    pub fn new(key: Key<KEY_SIZE>) -> Self {
        let () = Self::NON_EMPTY;
        tracing::debug!(output_size = N, "prf initialized");
        Self { key }
    }

    /// Evaluate the PRF on `input`.
    ///
    /// Deterministic: identical input always yields identical output.
    pub fn evaluate(&self, input: &[u8]) -> [u8; N] {
        let mut out = [0u8; N];
        self.evaluate_into(input, &mut out);
        out
    }

    /// Evaluate the PRF on `input`, writing the result into `out`.
    pub fn evaluate_into(&self, input: &[u8], out: &mut [u8; N]) {
        let key = self.key.unlock();

        let mut block = Zeroizing::new([0u8; MAC_SIZE]);

        if N <= MAC_SIZE {
            mac::mac(key.bytes(), input, &mut block);
            out.copy_from_slice(&block[..N]);
            return;
        }

        let mut buffer = Zeroizing::new(Vec::with_capacity(input.len() + COUNTER_SIZE));
        buffer.extend_from_slice(input);
        buffer.extend_from_slice(&[0u8; COUNTER_SIZE]);
        let counter_at = input.len();

        for (counter, chunk) in out.chunks_mut(MAC_SIZE).enumerate() {
            buffer[counter_at..].copy_from_slice(&(counter as u32).to_be_bytes());

            mac::mac(key.bytes(), &buffer, &mut block);
            chunk.copy_from_slice(&block[..chunk.len()]);
        }
    }

    /// Derive a new key of `N` bytes from `input`.
    ///
    /// The caller owns the returned key outright; the PRF key is untouched.
    /// Use a distinct `input` per purpose to get independent keys.
    pub fn derive_key(&self, input: &[u8]) -> Key<N> {
        let mut bytes = Zeroizing::new([0u8; N]);
        self.evaluate_into(input, &mut bytes);
        Key::from_bytes(&mut bytes)
    }
}

impl<const N: usize> std::fmt::Debug for Prf<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Prf").field("output_size", &N).field("key", &self.key).finish()
    }
}
