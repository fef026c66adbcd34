//! Key derivation using PBKDF2-HMAC-SHA256
//!
//! Derives encryption keys from user passphrases. The iteration count is a
//! property of the backup format version and is never stored in a backup, so
//! old files stay decryptable under a fixed rule. Raising the cost means
//! introducing a new format version.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::Passphrase;

/// Size of the random salt in bytes
pub const SALT_SIZE: usize = 16;

/// Size of the derived key in bytes (AES-256)
pub const KEY_SIZE: usize = 32;

/// PBKDF2 iterations for format version 1
const V1_ITERATIONS: u32 = 100_000;

/// Parameters for key derivation, fixed per format version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// PBKDF2 iteration count
    pub iterations: u32,
}

impl KdfParams {
    /// Look up the parameters pinned to a format version
    ///
    /// Returns `None` for versions this build has no parameters for.
    pub fn for_version(version: u32) -> Option<Self> {
        match version {
            1 => Some(Self {
                iterations: V1_ITERATIONS,
            }),
            _ => None,
        }
    }
}

/// A derived encryption key, zeroed on drop
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    /// The 32-byte key for AES-256
    key: [u8; KEY_SIZE],
}

impl DerivedKey {
    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Derive an encryption key from a passphrase and salt
///
/// Never fails. A wrong passphrase simply yields a different key, which is
/// caught later by the AEAD tag check.
pub fn derive_key(passphrase: &Passphrase, salt: &[u8; SALT_SIZE], params: KdfParams) -> DerivedKey {
    let mut key = [0u8; KEY_SIZE];
    pbkdf2_hmac::<Sha256>(passphrase.expose().as_bytes(), salt, params.iterations, &mut key);
    let derived = DerivedKey { key };
    key.zeroize();
    derived
}
