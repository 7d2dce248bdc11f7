//! Fuzz target for Cipher encryption and decryption
//!
//! # Strategy
//!
//! - Arbitrary master keys and plaintexts
//! - Attacker-controlled ciphertexts of any length
//! - Targeted corruption of valid ciphertexts
//!
//! # Invariants
//!
//! - Encrypt/decrypt roundtrip succeeds for non-empty plaintexts
//! - Ciphertext length follows `ciphertext_length`
//! - Short inputs fail with `InvalidInput`, never `AuthenticationFailure`
//! - Corrupted ciphertext fails with `AuthenticationFailure`
//! - Decryption never panics

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sse_crypto::{
    cipher::KEY_SIZE, ciphertext_length, Cipher, CryptoError, Key, NONCE_SIZE, TAG_SIZE,
};

#[derive(Debug, Clone, Arbitrary)]
struct CipherScenario {
    key: [u8; KEY_SIZE],
    plaintext: Vec<u8>,
    attacker_bytes: Vec<u8>,
    flip_index: u16,
    flip_mask: u8,
}

fuzz_target!(|scenario: CipherScenario| {
    let mut key = scenario.key;
    let cipher = Cipher::new(Key::from_bytes(&mut key));

    // INVARIANT 1: Attacker bytes never panic and never decrypt into anything
    // but a typed error (a 2^-128 forgery aside)
    match cipher.decrypt(&scenario.attacker_bytes) {
        Err(CryptoError::InvalidInput { .. }) => {
            assert!(scenario.attacker_bytes.len() <= NONCE_SIZE + TAG_SIZE);
        },
        Err(CryptoError::AuthenticationFailure) => {
            assert!(scenario.attacker_bytes.len() > NONCE_SIZE + TAG_SIZE);
        },
        Err(CryptoError::InvalidEncoding { .. }) => {
            unreachable!("decryption never reports encoding errors");
        },
        Ok(_) => {},
    }

    // INVARIANT 2: Empty plaintext is rejected
    if scenario.plaintext.is_empty() {
        assert!(cipher.encrypt(&scenario.plaintext).is_err());
        return;
    }

    // INVARIANT 3: Roundtrip with the documented length
    let ciphertext = cipher.encrypt(&scenario.plaintext).unwrap();
    assert_eq!(ciphertext.len(), ciphertext_length(scenario.plaintext.len()));
    assert_eq!(cipher.decrypt(&ciphertext).unwrap(), scenario.plaintext);

    // INVARIANT 4: Any corruption is detected
    if scenario.flip_mask != 0 {
        let mut corrupted = ciphertext;
        let index = scenario.flip_index as usize % corrupted.len();
        corrupted[index] ^= scenario.flip_mask;
        assert_eq!(cipher.decrypt(&corrupted), Err(CryptoError::AuthenticationFailure));
    }
});
