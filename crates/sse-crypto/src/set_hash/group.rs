//! Group abstraction underneath the multiset hash.
//!
//! [`MultisetHash`](super::MultisetHash) only needs a commutative group with
//! a hash-to-element map and a canonical encoding. Keeping those behind
//! [`CurveGroup`] lets the group be swapped without touching the
//! accumulation logic.

use curve25519_dalek::{
    ristretto::{CompressedRistretto, RistrettoPoint},
    traits::{Identity, IsIdentity},
};

use crate::hash;

/// Commutative group used as the set hash state space.
///
/// # Invariants
///
/// - `add` is associative and commutative, `identity` is neutral
/// - `add(a, negate(a)) == identity`
/// - `decode(encode(a)) == Some(a)` and `encode` output is exactly
///   `ENCODED_LEN` bytes
/// - Finding distinct multisets whose `hash_to_element` images sum to the
///   same element is computationally infeasible
pub trait CurveGroup {
    /// Group element
    type Element: Copy + Eq;

    /// Length of the canonical encoding in bytes
    const ENCODED_LEN: usize;

    /// Neutral element (the empty multiset)
    fn identity() -> Self::Element;

    /// Group law
    fn add(a: &Self::Element, b: &Self::Element) -> Self::Element;

    /// Inverse element
    fn negate(a: &Self::Element) -> Self::Element;

    /// Map arbitrary bytes to a group element
    fn hash_to_element(value: &[u8]) -> Self::Element;

    /// Canonical fixed-width encoding
    fn encode(a: &Self::Element) -> Vec<u8>;

    /// Inverse of `encode`; `None` for anything that is not a canonical
    /// encoding of a group element
    fn decode(bytes: &[u8]) -> Option<Self::Element>;

    /// Whether `a` is the neutral element
    fn is_identity(a: &Self::Element) -> bool {
        *a == Self::identity()
    }
}

/// The prime-order Ristretto255 group.
///
/// Hash-to-element feeds the SHA-512 digest of the value to Elligator
/// (`RistrettoPoint::from_uniform_bytes`).
#[derive(Debug, Clone, Copy, Default)]
pub struct Ristretto255;

impl CurveGroup for Ristretto255 {
    type Element = RistrettoPoint;

    const ENCODED_LEN: usize = 32;

    fn identity() -> RistrettoPoint {
        RistrettoPoint::identity()
    }

    fn add(a: &RistrettoPoint, b: &RistrettoPoint) -> RistrettoPoint {
        a + b
    }

    fn negate(a: &RistrettoPoint) -> RistrettoPoint {
        -a
    }

    fn hash_to_element(value: &[u8]) -> RistrettoPoint {
        RistrettoPoint::from_uniform_bytes(&hash::hash(value))
    }

    fn encode(a: &RistrettoPoint) -> Vec<u8> {
        a.compress().to_bytes().to_vec()
    }

    fn decode(bytes: &[u8]) -> Option<RistrettoPoint> {
        CompressedRistretto::from_slice(bytes).ok()?.decompress()
    }

    fn is_identity(a: &RistrettoPoint) -> bool {
        a.is_identity()
    }
}
