//! Authenticated encryption with per-message key derivation.
//!
//! A single long-lived master key encrypts many independent messages. Each
//! message draws a fresh random nonce and derives its own one-time
//! `XChaCha20-Poly1305` key from (master key, nonce) with keyed BLAKE2b.
//! A nonce collision therefore only leads to AEAD key/nonce reuse if the
//! derived keys collide as well.
//!
//! ```text
//! Master Key ──┐
//!              ├─ BLAKE2b(salt = nonce[..16], personal = "encryption_key",
//! Nonce ───────┘          message = nonce[16..]) → Message Key
//!                                                       │
//! Plaintext ─────────────── XChaCha20-Poly1305(nonce) ◄─┘
//!                                   │
//!                                   ▼
//!                     nonce ‖ ciphertext ‖ tag
//! ```
//!
//! # Security
//!
//! - The master key is unlocked only for the derivation and relocked before
//!   the AEAD runs
//! - Message keys are zeroized on every path
//! - A failed tag check surfaces only [`CryptoError::AuthenticationFailure`]
//!   and the working plaintext buffer is erased first

use chacha20poly1305::{
    Tag, XChaCha20Poly1305, XNonce,
    aead::{AeadInPlace, KeyInit},
};
use zeroize::{Zeroize, Zeroizing};

use crate::{
    error::{CryptoError, Result},
    hash::{self, PERSONAL_SIZE, SALT_SIZE, SUBKEY_SIZE},
    key::Key,
    random::{OsRandom, SecureRandom},
};

/// Master key size in bytes (BLAKE2b key size)
pub const KEY_SIZE: usize = SUBKEY_SIZE;

/// `XChaCha20` nonce size in bytes, stored in front of every ciphertext
pub const NONCE_SIZE: usize = 24;

/// Poly1305 tag size in bytes
pub const TAG_SIZE: usize = 16;

/// Personalization tag separating message keys from other BLAKE2b uses
const ENCRYPTION_PERSONAL: &[u8; PERSONAL_SIZE] = b"encryption_key\0\0";

/// Ciphertext length for a plaintext of `plaintext_len` bytes.
pub const fn ciphertext_length(plaintext_len: usize) -> usize {
    plaintext_len + NONCE_SIZE + TAG_SIZE
}

/// Plaintext length carried by a ciphertext of `ciphertext_len` bytes.
///
/// Zero when the ciphertext is too short to hold a nonce, a tag and at least
/// one byte of payload.
pub const fn plaintext_length(ciphertext_len: usize) -> usize {
    if ciphertext_len > NONCE_SIZE + TAG_SIZE {
        ciphertext_len - NONCE_SIZE - TAG_SIZE
    } else {
        0
    }
}

/// Authenticated encryption under a master key.
///
/// The key is moved in at construction and zeroized when the cipher is
/// dropped.
pub struct Cipher<R = OsRandom> {
    key: Key<KEY_SIZE>,
    rng: R,
}

impl Cipher<OsRandom> {
    /// Create a cipher drawing nonces from the operating system CSPRNG.
    pub fn new(key: Key<KEY_SIZE>) -> Self {
        Self::with_random(key, OsRandom)
    }
}

impl<R: SecureRandom> Cipher<R> {
    /// Create a cipher drawing nonces from `rng`.
    pub fn with_random(key: Key<KEY_SIZE>, rng: R) -> Self {
        tracing::debug!("cipher initialized");
        Self { key, rng }
    }

    /// See [`ciphertext_length`].
    pub const fn ciphertext_length(plaintext_len: usize) -> usize {
        ciphertext_length(plaintext_len)
    }

    /// See [`plaintext_length`].
    pub const fn plaintext_length(ciphertext_len: usize) -> usize {
        plaintext_length(ciphertext_len)
    }

    /// Encrypt `plaintext` under a fresh nonce.
    ///
    /// Output layout is `nonce ‖ ciphertext ‖ tag`, exactly
    /// [`ciphertext_length`]`(plaintext.len())` bytes.
    ///
    /// # Errors
    ///
    /// - `InvalidInput`: `plaintext` is empty
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        if plaintext.is_empty() {
            return Err(CryptoError::InvalidInput {
                reason: "the minimum number of bytes to encrypt is 1".to_string(),
            });
        }

        let nonce: [u8; NONCE_SIZE] = self.rng.array();
        tracing::trace!(plaintext_len = plaintext.len(), "encrypting");

        Ok(self.seal(&nonce, plaintext))
    }

    /// Decrypt and authenticate a ciphertext produced by [`Cipher::encrypt`].
    ///
    /// The input is never modified.
    ///
    /// # Errors
    ///
    /// - `InvalidInput`: `ciphertext` is not longer than `NONCE_SIZE +
    ///   TAG_SIZE`
    /// - `AuthenticationFailure`: tag mismatch (tampering or wrong key)
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        if ciphertext.len() <= NONCE_SIZE + TAG_SIZE {
            return Err(CryptoError::InvalidInput {
                reason: format!(
                    "the minimum number of bytes to decrypt is {}",
                    ciphertext_length(1)
                ),
            });
        }
        tracing::trace!(ciphertext_len = ciphertext.len(), "decrypting");

        let (nonce, rest) = ciphertext.split_at(NONCE_SIZE);
        let (body, tag) = rest.split_at(rest.len() - TAG_SIZE);

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        nonce_bytes.copy_from_slice(nonce);
        let mut tag_bytes = [0u8; TAG_SIZE];
        tag_bytes.copy_from_slice(tag);

        let message_key = self.derive_message_key(&nonce_bytes);
        let aead = XChaCha20Poly1305::new((&*message_key).into());

        let mut plaintext = body.to_vec();
        let opened = aead.decrypt_in_place_detached(
            &XNonce::from(nonce_bytes),
            &[],
            &mut plaintext,
            &Tag::from(tag_bytes),
        );

        match opened {
            Ok(()) => Ok(plaintext),
            Err(_) => {
                plaintext.zeroize();
                Err(CryptoError::AuthenticationFailure)
            },
        }
    }

    /// Encrypt with an explicit nonce. Callers guarantee nonce freshness.
    fn seal(&self, nonce: &[u8; NONCE_SIZE], plaintext: &[u8]) -> Vec<u8> {
        let message_key = self.derive_message_key(nonce);
        let aead = XChaCha20Poly1305::new((&*message_key).into());

        let mut out = Vec::with_capacity(ciphertext_length(plaintext.len()));
        out.extend_from_slice(nonce);
        out.extend_from_slice(plaintext);

        let Ok(tag) =
            aead.encrypt_in_place_detached(&XNonce::from(*nonce), &[], &mut out[NONCE_SIZE..])
        else {
            unreachable!("XChaCha20-Poly1305 encryption cannot fail below the 256 GiB limit");
        };
        out.extend_from_slice(&tag);

        out
    }

    /// Derive the one-time message key for `nonce`.
    ///
    /// The master key is open only inside this function; the guard drops
    /// before returning.
    fn derive_message_key(&self, nonce: &[u8; NONCE_SIZE]) -> Zeroizing<[u8; KEY_SIZE]> {
        let (salt, message) = nonce.split_at(SALT_SIZE);
        let mut salt_bytes = [0u8; SALT_SIZE];
        salt_bytes.copy_from_slice(salt);

        let mut subkey = Zeroizing::new([0u8; KEY_SIZE]);
        let master = self.key.unlock();
        hash::hash_salt_personal(
            master.bytes(),
            &salt_bytes,
            ENCRYPTION_PERSONAL,
            message,
            &mut subkey,
        );
        subkey
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    /// Deterministic nonce source: every byte of draw `n` is `n`
    struct CountingRandom {
        draws: Cell<u8>,
    }

    impl CountingRandom {
        fn new() -> Self {
            Self { draws: Cell::new(0) }
        }
    }

    impl SecureRandom for CountingRandom {
        fn fill(&self, buffer: &mut [u8]) {
            buffer.fill(self.draws.get());
            self.draws.set(self.draws.get().wrapping_add(1));
        }
    }

    fn test_key(fill: u8) -> Key<KEY_SIZE> {
        let mut bytes = [0u8; KEY_SIZE];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = fill.wrapping_add(i as u8);
        }
        Key::from_bytes(&mut bytes)
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let cipher = Cipher::new(test_key(0));
        let plaintext = b"Hello, World!";

        let ciphertext = cipher.encrypt(plaintext).unwrap();
        let decrypted = cipher.decrypt(&ciphertext).unwrap();

        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn hello_scenario() {
        let cipher = Cipher::new(Key::generate());
        let ciphertext = cipher.encrypt(b"hello").unwrap();

        assert_eq!(ciphertext.len(), 5 + NONCE_SIZE + TAG_SIZE);
        assert_eq!(cipher.decrypt(&ciphertext).unwrap(), b"hello");

        let other = Cipher::new(Key::generate());
        assert_eq!(other.decrypt(&ciphertext), Err(CryptoError::AuthenticationFailure));
    }

    #[test]
    fn empty_plaintext_rejected() {
        let cipher = Cipher::new(test_key(0));
        assert!(matches!(cipher.encrypt(b""), Err(CryptoError::InvalidInput { .. })));
    }

    #[test]
    fn short_ciphertext_rejected() {
        let cipher = Cipher::new(test_key(0));

        for len in [0, 1, NONCE_SIZE, NONCE_SIZE + TAG_SIZE] {
            let result = cipher.decrypt(&vec![0u8; len]);
            assert!(
                matches!(result, Err(CryptoError::InvalidInput { .. })),
                "length {len} must be rejected before authentication"
            );
        }
    }

    #[test]
    fn minimum_length_reaches_authentication() {
        let cipher = Cipher::new(test_key(0));
        let result = cipher.decrypt(&[0u8; NONCE_SIZE + TAG_SIZE + 1]);
        assert_eq!(result, Err(CryptoError::AuthenticationFailure));
    }

    #[test]
    fn ciphertext_layout() {
        let cipher = Cipher::with_random(test_key(0), CountingRandom::new());
        let plaintext = b"layout check";

        let ciphertext = cipher.encrypt(plaintext).unwrap();

        assert_eq!(ciphertext.len(), ciphertext_length(plaintext.len()));
        assert_eq!(&ciphertext[..NONCE_SIZE], &[0u8; NONCE_SIZE], "nonce comes first");
        assert_ne!(&ciphertext[NONCE_SIZE..NONCE_SIZE + plaintext.len()], plaintext);
    }

    #[test]
    fn fresh_nonce_per_message() {
        let cipher = Cipher::with_random(test_key(0), CountingRandom::new());

        let first = cipher.encrypt(b"same").unwrap();
        let second = cipher.encrypt(b"same").unwrap();

        assert_ne!(first[..NONCE_SIZE], second[..NONCE_SIZE]);
        assert_ne!(first[NONCE_SIZE..], second[NONCE_SIZE..]);
    }

    #[test]
    fn same_nonce_same_key_is_deterministic() {
        let a = Cipher::with_random(test_key(9), CountingRandom::new());
        let b = Cipher::with_random(test_key(9), CountingRandom::new());

        assert_eq!(a.encrypt(b"payload").unwrap(), b.encrypt(b"payload").unwrap());
    }

    #[test]
    fn message_key_depends_on_every_nonce_byte() {
        let cipher = Cipher::new(test_key(0));
        let base = [0u8; NONCE_SIZE];
        let reference = cipher.derive_message_key(&base);

        for i in 0..NONCE_SIZE {
            let mut nonce = base;
            nonce[i] ^= 1;
            assert_ne!(*cipher.derive_message_key(&nonce), *reference, "nonce byte {i}");
        }
    }

    #[test]
    fn message_key_differs_from_master() {
        let cipher = Cipher::new(test_key(0));
        let message_key = cipher.derive_message_key(&[0u8; NONCE_SIZE]);
        assert_ne!(*message_key, *cipher.key.unlock().bytes());
    }

    #[test]
    fn message_key_is_salted_personalized_hash() {
        let cipher = Cipher::new(test_key(5));
        let mut nonce = [0u8; NONCE_SIZE];
        for (i, byte) in nonce.iter_mut().enumerate() {
            *byte = i as u8;
        }

        let mut salt = [0u8; SALT_SIZE];
        salt.copy_from_slice(&nonce[..SALT_SIZE]);
        let mut expected = [0u8; KEY_SIZE];
        hash::hash_salt_personal(
            cipher.key.unlock().bytes(),
            &salt,
            ENCRYPTION_PERSONAL,
            &nonce[SALT_SIZE..],
            &mut expected,
        );

        assert_eq!(*cipher.derive_message_key(&nonce), expected);
        assert!(cipher.key.is_locked());
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let cipher = Cipher::new(test_key(0));
        let ciphertext = cipher.encrypt(b"original message").unwrap();

        for position in [0, NONCE_SIZE, ciphertext.len() - 1] {
            let mut tampered = ciphertext.clone();
            tampered[position] ^= 0x01;
            assert_eq!(cipher.decrypt(&tampered), Err(CryptoError::AuthenticationFailure));
        }
    }

    #[test]
    fn truncated_ciphertext_fails() {
        let cipher = Cipher::new(test_key(0));
        let ciphertext = cipher.encrypt(b"two bytes or more").unwrap();

        let result = cipher.decrypt(&ciphertext[..ciphertext.len() - 1]);
        assert_eq!(result, Err(CryptoError::AuthenticationFailure));
    }

    #[test]
    fn key_locked_after_every_call() {
        let cipher = Cipher::new(test_key(0));

        let ciphertext = cipher.encrypt(b"data").unwrap();
        assert!(cipher.key.is_locked());

        cipher.decrypt(&ciphertext).unwrap();
        assert!(cipher.key.is_locked());

        let mut tampered = ciphertext;
        tampered[NONCE_SIZE] ^= 0xFF;
        assert!(cipher.decrypt(&tampered).is_err());
        assert!(cipher.key.is_locked());

        assert!(cipher.encrypt(b"").is_err());
        assert!(cipher.key.is_locked());
    }

    #[test]
    fn length_helpers() {
        assert_eq!(ciphertext_length(0), NONCE_SIZE + TAG_SIZE);
        assert_eq!(plaintext_length(ciphertext_length(0)), 0);
        assert_eq!(plaintext_length(ciphertext_length(1)), 1);
        assert_eq!(plaintext_length(3), 0);
        assert_eq!(Cipher::<OsRandom>::ciphertext_length(10), 10 + NONCE_SIZE + TAG_SIZE);
        assert_eq!(Cipher::<OsRandom>::plaintext_length(10 + NONCE_SIZE + TAG_SIZE), 10);
    }

    #[test]
    fn large_message_roundtrip() {
        let cipher = Cipher::new(test_key(3));
        let plaintext = vec![0x42u8; 64 * 1024];

        let ciphertext = cipher.encrypt(&plaintext).unwrap();
        assert_eq!(cipher.decrypt(&ciphertext).unwrap(), plaintext);
    }
}
