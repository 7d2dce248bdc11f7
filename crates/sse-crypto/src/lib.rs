//! Cryptographic Building Blocks
//!
//! Three primitives for higher-level secure protocols (searchable encryption
//! schemes in particular), built on audited hash, AEAD and curve crates:
//!
//! - [`Cipher`]: authenticated encryption with a per-message key derived
//!   from the master key and the message nonce
//! - [`Prf`]: fixed-output-length PRF over HMAC-SHA-512, with counter-mode
//!   expansion and key derivation
//! - [`SetHash`]: incremental, invertible multiset hash over Ristretto255
//!
//! # Key Handling
//!
//! Master keys live in a [`Key`]. The key is moved into the component that
//! uses it and is readable only through a [`KeyGuard`], which components hold
//! for the shortest possible window.
//!
//! ```text
//! Key<32> ──move──► Cipher ── encrypt/decrypt ──► unlock → derive → lock
//! Key<32> ──move──► Prf<N> ── evaluate/derive_key ──► Key<N> (caller owned)
//! ```
//!
//! # Security
//!
//! Misuse resistance:
//! - PRF output length is a const generic; `Prf<0>` does not compile
//! - Keys cannot be cloned and are zeroized on drop
//!
//! Failure behavior:
//! - Decryption exposes a single failure mode after length checks:
//!   [`CryptoError::AuthenticationFailure`]
//! - Derived keys and partially decrypted plaintext are zeroized before an
//!   error is returned
//!
//! Threading:
//! - `Key`, `Cipher` and `Prf` are `Send` but not `Sync`; unlock windows
//!   never race
//! - `SetHash` is a plain value type

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cipher;
pub mod error;
pub mod hash;
pub mod key;
pub mod mac;
pub mod prf;
pub mod random;
pub mod set_hash;

pub use cipher::{Cipher, NONCE_SIZE, TAG_SIZE, ciphertext_length, plaintext_length};
pub use error::{CryptoError, Result};
pub use key::{Key, KeyGuard};
pub use prf::Prf;
pub use random::{OsRandom, SecureRandom, random_bytes};
pub use set_hash::{CurveGroup, MultisetHash, Ristretto255, SetHash};
