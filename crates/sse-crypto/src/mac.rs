//! HMAC-SHA-512, the keyed hash underneath [`crate::Prf`]

use hmac::{
    Hmac, Mac,
    digest::{FixedOutput, generic_array::GenericArray},
};
use sha2::Sha512;

use crate::hash::DIGEST_SIZE;

type HmacSha512 = Hmac<Sha512>;

/// Size of the keyed hash output in bytes
pub const MAC_SIZE: usize = DIGEST_SIZE;

/// Compute `HMAC-SHA-512(key, input)` into `out`.
///
/// The tag is written directly into the caller's buffer; wrap it in
/// `Zeroizing` when the tag is key material.
pub fn mac(key: &[u8], input: &[u8], out: &mut [u8; MAC_SIZE]) {
    let Ok(mut mac) = HmacSha512::new_from_slice(key) else {
        unreachable!("HMAC-SHA512 accepts any key size");
    };
    mac.update(input);
    mac.finalize_into(GenericArray::from_mut_slice(&mut out[..]));
}
