//! AES-256-GCM encryption/decryption of backup envelopes
//!
//! Provides authenticated encryption for exported backups. Each encryption
//! operation draws a fresh salt and a fresh nonce from the OS random source,
//! so no (key, nonce) pair is ever reused.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

use crate::error::{RestoreError, WellplanError, WellplanResult};

use super::key_derivation::{derive_key, DerivedKey, KdfParams, SALT_SIZE};
use super::{Passphrase, SecureBytes};

/// Current envelope format version
pub const ENVELOPE_VERSION: u32 = 1;

/// Size of the AES-GCM nonce in bytes (96 bits)
pub const NONCE_SIZE: usize = 12;

/// Fields every envelope must carry
const REQUIRED_FIELDS: [&str; 4] = ["version", "salt", "iv", "data"];

/// The outer, version-tagged structure written to a backup file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedEnvelope {
    /// Envelope format version
    pub version: u32,
    /// KDF salt (base64 encoded)
    pub salt: String,
    /// AES-GCM nonce (base64 encoded)
    pub iv: String,
    /// Ciphertext with authentication tag (base64 encoded)
    pub data: String,
}

/// What can be learned about a backup file without its passphrase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeInfo {
    /// Envelope format version
    pub version: u32,
    /// Whether this build can decrypt the file
    pub supported: bool,
    /// Ciphertext size in bytes, including the tag
    pub ciphertext_len: usize,
}

impl EncryptedEnvelope {
    /// Create a new envelope from raw bytes
    fn new(salt: &[u8], nonce: &[u8], ciphertext: &[u8]) -> Self {
        Self {
            version: ENVELOPE_VERSION,
            salt: STANDARD.encode(salt),
            iv: STANDARD.encode(nonce),
            data: STANDARD.encode(ciphertext),
        }
    }

    /// Parse an envelope from backup file text
    ///
    /// Text that is not a JSON object is `InvalidFormat`. A JSON object that
    /// lacks one of the envelope fields, or carries one with the wrong type,
    /// is `InvalidStructure`.
    pub fn from_json(text: &str) -> Result<Self, RestoreError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|_| RestoreError::InvalidFormat)?;

        let object = value.as_object().ok_or(RestoreError::InvalidFormat)?;
        for field in REQUIRED_FIELDS {
            if object.get(field).map_or(true, |v| v.is_null()) {
                return Err(RestoreError::missing_field(field));
            }
        }

        serde_json::from_value(value).map_err(|e| RestoreError::InvalidStructure(e.to_string()))
    }

    /// Render the envelope as backup file text
    pub fn to_json(&self, pretty: bool) -> WellplanResult<String> {
        let text = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        text.map_err(|e| WellplanError::Export(format!("Failed to serialize envelope: {}", e)))
    }

    /// Describe the envelope without decrypting it
    pub fn describe(&self) -> EnvelopeInfo {
        EnvelopeInfo {
            version: self.version,
            supported: KdfParams::for_version(self.version).is_some(),
            ciphertext_len: STANDARD.decode(&self.data).map(|d| d.len()).unwrap_or(0),
        }
    }

    /// Reject versions newer than this build understands
    fn check_version(&self) -> Result<KdfParams, RestoreError> {
        KdfParams::for_version(self.version).ok_or(RestoreError::UnsupportedVersion {
            found: self.version,
            supported: ENVELOPE_VERSION,
        })
    }

    /// Decode the salt from base64
    fn decode_salt(&self) -> Result<[u8; SALT_SIZE], RestoreError> {
        let bytes = decode_field("salt", &self.salt)?;
        bytes.try_into().map_err(|b: Vec<u8>| {
            RestoreError::InvalidStructure(format!(
                "salt must be {} bytes, got {}",
                SALT_SIZE,
                b.len()
            ))
        })
    }

    /// Decode the nonce from base64
    fn decode_nonce(&self) -> Result<[u8; NONCE_SIZE], RestoreError> {
        let bytes = decode_field("iv", &self.iv)?;
        bytes.try_into().map_err(|b: Vec<u8>| {
            RestoreError::InvalidStructure(format!(
                "iv must be {} bytes, got {}",
                NONCE_SIZE,
                b.len()
            ))
        })
    }
}

fn decode_field(name: &str, encoded: &str) -> Result<Vec<u8>, RestoreError> {
    STANDARD
        .decode(encoded)
        .map_err(|e| RestoreError::InvalidStructure(format!("{} is not valid base64: {}", name, e)))
}

/// Encrypt plaintext under a passphrase
///
/// Generates a random salt and nonce for every call.
pub fn encrypt(plaintext: &[u8], passphrase: &Passphrase) -> WellplanResult<EncryptedEnvelope> {
    let params = KdfParams::for_version(ENVELOPE_VERSION).ok_or_else(|| {
        WellplanError::Encryption(format!("No KDF parameters for version {}", ENVELOPE_VERSION))
    })?;

    let mut salt = [0u8; SALT_SIZE];
    OsRng.fill_bytes(&mut salt);
    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce_bytes);

    let key = derive_key(passphrase, &salt, params);
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| WellplanError::Encryption(format!("Failed to create cipher: {}", e)))?;

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
        .map_err(|e| WellplanError::Encryption(format!("Encryption failed: {}", e)))?;

    Ok(EncryptedEnvelope::new(&salt, &nonce_bytes, &ciphertext))
}

/// Decrypt an envelope with a passphrase
///
/// The version gate runs before any key derivation, so an unsupported file
/// fails the same way whatever passphrase is supplied.
pub fn decrypt(envelope: &EncryptedEnvelope, passphrase: &Passphrase) -> Result<SecureBytes, RestoreError> {
    let params = envelope.check_version()?;

    let salt = envelope.decode_salt()?;
    let nonce_bytes = envelope.decode_nonce()?;
    let ciphertext = decode_field("data", &envelope.data)?;

    let key = derive_key(passphrase, &salt, params);
    open_with_key(&key, &nonce_bytes, &ciphertext)
}

/// AEAD decrypt and verify with an already derived key
fn open_with_key(
    key: &DerivedKey,
    nonce: &[u8; NONCE_SIZE],
    ciphertext: &[u8],
) -> Result<SecureBytes, RestoreError> {
    let cipher =
        Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| RestoreError::DecryptionFailed)?;

    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| RestoreError::DecryptionFailed)?;

    Ok(SecureBytes::new(plaintext))
}
