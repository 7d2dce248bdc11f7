//! Incremental multiset hash (ECMH).
//!
//! A multiset is summarized as one group element: the sum of the
//! hash-to-group images of its elements. Because the group is commutative
//! and every element has an inverse, the digest supports:
//!
//! - insertion in any order
//! - exact removal (subtraction of the same image)
//! - merging and splitting whole digests in one step
//! - O(1) equality between independently maintained digests
//!
//! ```text
//! {a, b, b}  ─►  H(a) + H(b) + H(b)
//! ```
//!
//! Removal cannot detect misuse: removing an element that was never added
//! is a well-defined group subtraction that simply yields a digest no real
//! multiset maps to.

mod group;

use std::{fmt, str::FromStr};

pub use group::{CurveGroup, Ristretto255};

use crate::error::{CryptoError, Result};

/// Multiset hash over Ristretto255.
pub type SetHash = MultisetHash<Ristretto255>;

/// Multiset hash over an arbitrary [`CurveGroup`].
pub struct MultisetHash<G: CurveGroup> {
    state: G::Element,
}

impl<G: CurveGroup> MultisetHash<G> {
    /// Digest of the empty multiset.
    pub fn new() -> Self {
        Self { state: G::identity() }
    }

    /// Whether this is the digest of the empty multiset.
    pub fn is_empty(&self) -> bool {
        G::is_identity(&self.state)
    }

    /// Add one occurrence of `value`.
    pub fn add_element(&mut self, value: impl AsRef<[u8]>) {
        let image = G::hash_to_element(value.as_ref());
        self.state = G::add(&self.state, &image);
    }

    /// Remove one occurrence of `value`.
    ///
    /// Only meaningful if `value` was added at least as many times as it is
    /// removed; see the module docs.
    pub fn remove_element(&mut self, value: impl AsRef<[u8]>) {
        let image = G::negate(&G::hash_to_element(value.as_ref()));
        self.state = G::add(&self.state, &image);
    }

    /// Merge another digest into this one (multiset union with multiplicity).
    pub fn add_set(&mut self, other: &Self) {
        self.state = G::add(&self.state, &other.state);
    }

    /// Subtract another digest from this one.
    pub fn remove_set(&mut self, other: &Self) {
        self.state = G::add(&self.state, &G::negate(&other.state));
    }

    /// Digest holding the group inverse of this one.
    ///
    /// `h.add_set(&h.invert_set())` yields the empty digest.
    #[must_use]
    pub fn invert_set(&self) -> Self {
        Self { state: G::negate(&self.state) }
    }

    /// Lowercase hex of the canonical state encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(G::encode(&self.state))
    }

    /// Restore a digest from [`MultisetHash::to_hex`] output.
    ///
    /// # Errors
    ///
    /// - `InvalidEncoding`: wrong length, non-hex or uppercase characters, or
    ///   bytes that are not a canonical group element
    pub fn from_hex(encoded: &str) -> Result<Self> {
        let expected = 2 * G::ENCODED_LEN;
        if encoded.len() != expected {
            return Err(CryptoError::InvalidEncoding {
                reason: format!("expected {expected} hex characters, got {}", encoded.len()),
            });
        }

        if encoded.bytes().any(|c| c.is_ascii_uppercase()) {
            return Err(CryptoError::InvalidEncoding {
                reason: "hex must be lowercase".to_string(),
            });
        }

        let bytes = hex::decode(encoded)
            .map_err(|e| CryptoError::InvalidEncoding { reason: e.to_string() })?;

        let state = G::decode(&bytes).ok_or_else(|| CryptoError::InvalidEncoding {
            reason: "not a valid group element".to_string(),
        })?;

        Ok(Self { state })
    }
}

impl<G: CurveGroup> Default for MultisetHash<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: CurveGroup> Clone for MultisetHash<G> {
    fn clone(&self) -> Self {
        Self { state: self.state }
    }
}

impl<G: CurveGroup> PartialEq for MultisetHash<G> {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state
    }
}

impl<G: CurveGroup> Eq for MultisetHash<G> {}

impl<G: CurveGroup> fmt::Display for MultisetHash<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl<G: CurveGroup> fmt::Debug for MultisetHash<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MultisetHash").field(&self.to_hex()).finish()
    }
}

impl<G: CurveGroup> FromStr for MultisetHash<G> {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}
