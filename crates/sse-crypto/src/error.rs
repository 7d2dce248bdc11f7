//! Error types for cipher, PRF and set hash operations

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CryptoError>;

/// Errors from the cryptographic primitives.
///
/// Every variant is local to the failing call. None of them is fatal to the
/// process and none of them becomes retryable: all operations are
/// deterministic in their inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Caller supplied an unusable buffer (empty plaintext, undersized
    /// ciphertext)
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What was wrong with the input
        reason: String,
    },

    /// AEAD tag verification failed.
    ///
    /// Deliberately carries no detail: tampering and a wrong key are
    /// indistinguishable to the caller.
    #[error("authentication failed")]
    AuthenticationFailure,

    /// Serialized set hash state could not be decoded
    #[error("invalid encoding: {reason}")]
    InvalidEncoding {
        /// Why the encoding was rejected
        reason: String,
    },
}

impl CryptoError {
    /// Returns true if repeating the call could succeed.
    ///
    /// Every error here is a pure function of the call's inputs: a short
    /// buffer stays short, a forged tag stays forged and bad hex stays bad.
    /// Retrying with the same inputs cannot succeed, so this is `false` for
    /// every variant.
    #[allow(clippy::unused_self, reason = "callers ask the error value, not the type")]
    pub const fn is_retryable(&self) -> bool {
        false
    }
}
