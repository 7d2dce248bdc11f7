//! Protected key material with an explicit unlock window.
//!
//! A [`Key`] owns `N` bytes of secret material. The bytes can only be read
//! through a [`KeyGuard`] obtained from [`Key::unlock`]; the key goes back to
//! the locked state when the last guard is dropped, including when the
//! borrowing code returns early with an error. The buffer is zeroized when
//! the key is dropped, whatever its state.
//!
//! Keys are moved into the component that uses them and are never cloned.

use std::{cell::Cell, fmt};

use zeroize::Zeroize;

use crate::random::{OsRandom, SecureRandom};

/// `N` bytes of secret key material.
///
/// `Key` is `Send` but not `Sync`: the lock state lives in a [`Cell`], so two
/// threads can never toggle the same key concurrently.
pub struct Key<const N: usize> {
    /// Heap allocated so moving the key never copies the secret around
    content: Box<[u8; N]>,
    /// Number of live guards; zero means locked
    unlocked: Cell<usize>,
}

impl<const N: usize> Key<N> {
    /// Key size in bytes.
    pub const SIZE: usize = N;

    /// Generate a fresh key from the operating system CSPRNG.
    pub fn generate() -> Self {
        Self::generate_with(&OsRandom)
    }

    /// Generate a fresh key from the given randomness source.
    pub fn generate_with<R: SecureRandom>(rng: &R) -> Self {
        let mut content = Box::new([0u8; N]);
        rng.fill(content.as_mut_slice());
        tracing::trace!(size = N, "generated key");

        Self { content, unlocked: Cell::new(0) }
    }

    /// Take ownership of existing key material.
    ///
    /// The bytes are copied into the key and `bytes` is zeroized, so the
    /// caller is left with no copy of the secret.
    pub fn from_bytes(bytes: &mut [u8; N]) -> Self {
        let mut content = Box::new([0u8; N]);
        content.copy_from_slice(&bytes[..]);
        bytes.zeroize();

        Self { content, unlocked: Cell::new(0) }
    }

    /// Key size in bytes.
    pub const fn size(&self) -> usize {
        N
    }

    /// Whether the key material is currently unreadable.
    pub fn is_locked(&self) -> bool {
        self.unlocked.get() == 0
    }

    /// Open the key for reading.
    ///
    /// The returned guard is the only handle to the raw bytes. Dropping it
    /// locks the key again.
    pub fn unlock(&self) -> KeyGuard<'_, N> {
        self.unlocked.set(self.unlocked.get() + 1);
        KeyGuard { key: self }
    }
}

impl<const N: usize> Drop for Key<N> {
    fn drop(&mut self) {
        self.content.zeroize();
    }
}

impl<const N: usize> fmt::Debug for Key<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("size", &N)
            .field("locked", &self.is_locked())
            .finish_non_exhaustive()
    }
}

/// Read access to an unlocked [`Key`].
///
/// Not `Clone`: one guard per unlock call.
pub struct KeyGuard<'a, const N: usize> {
    key: &'a Key<N>,
}

impl<const N: usize> KeyGuard<'_, N> {
    /// Raw key bytes.
    pub fn bytes(&self) -> &[u8; N] {
        &self.key.content
    }
}

impl<const N: usize> Drop for KeyGuard<'_, N> {
    fn drop(&mut self) {
        let outstanding = self.key.unlocked.get();
        self.key.unlocked.set(outstanding.saturating_sub(1));
    }
}
