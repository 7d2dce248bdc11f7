//! Fixed-size hashing.
//!
//! SHA-512 is the base hash (PRF compression, hash-to-group oracle). Keyed
//! BLAKE2b with salt and personalization is used for per-message subkey
//! derivation in [`crate::Cipher`].

use blake2::{
    Blake2bMac,
    digest::{FixedOutput, Mac, consts::U32, generic_array::GenericArray},
};
use sha2::{Digest, Sha512};

/// SHA-512 digest size in bytes
pub const DIGEST_SIZE: usize = 64;

/// BLAKE2b salt length in bytes
pub const SALT_SIZE: usize = 16;

/// BLAKE2b personalization length in bytes
pub const PERSONAL_SIZE: usize = 16;

/// Output and key size of the salted BLAKE2b mode
pub const SUBKEY_SIZE: usize = 32;

/// Hash `input` with SHA-512.
pub fn hash(input: &[u8]) -> [u8; DIGEST_SIZE] {
    let mut digest = [0u8; DIGEST_SIZE];
    digest.copy_from_slice(&Sha512::digest(input));
    digest
}

/// Keyed BLAKE2b-256 with salt and personalization, written into `out`.
///
/// The output is secret when `key` is. It goes straight into the caller's
/// buffer so no copy is left behind on this stack frame.
pub fn hash_salt_personal(
    key: &[u8; SUBKEY_SIZE],
    salt: &[u8; SALT_SIZE],
    personal: &[u8; PERSONAL_SIZE],
    message: &[u8],
    out: &mut [u8; SUBKEY_SIZE],
) {
    let Ok(mut mac) = Blake2bMac::<U32>::new_with_salt_and_personal(key, salt, personal) else {
        unreachable!("32-byte key, 16-byte salt and personalization are valid BLAKE2b parameters");
    };
    mac.update(message);
    mac.finalize_into(GenericArray::from_mut_slice(&mut out[..]));
}
