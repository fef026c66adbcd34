//! Cryptographic functions for wellplan
//!
//! Provides AES-256-GCM encryption with PBKDF2-HMAC-SHA256 key derivation
//! for passphrase-protected backup files.

pub mod encryption;
pub mod key_derivation;
pub mod secure_memory;

pub use encryption::{decrypt, encrypt, EncryptedEnvelope, EnvelopeInfo, ENVELOPE_VERSION};
pub use key_derivation::{derive_key, DerivedKey, KdfParams};
pub use secure_memory::{Passphrase, SecureBytes};
