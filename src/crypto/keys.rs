//! Key material types.
//!
//! `EncryptionKey` and `PasswordVerifier` wipe their bytes when dropped.
//! Neither type implements `Debug` with its contents, so key bytes cannot
//! end up in a log line by accident.

use std::fmt;

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::OsRng;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of the KDF salt in bytes.
pub const SALT_LEN: usize = 16;

/// Length of the password verifier in bytes.
pub const VERIFIER_LEN: usize = 32;

/// Length of the symmetric encryption key in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// Random salt shared by both KDFs. Generated once per vault.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Salt([u8; SALT_LEN]);

impl Salt {
    /// Generate a fresh salt from the OS CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; SALT_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SALT_LEN] {
        &self.0
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Salt(..)")
    }
}

/// Output of the slow KDF. Only ever compared, never used as a key.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PasswordVerifier([u8; VERIFIER_LEN]);

impl PasswordVerifier {
    pub fn from_bytes(bytes: [u8; VERIFIER_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; VERIFIER_LEN] {
        &self.0
    }

    /// Constant-time equality: the running time does not depend on how
    /// many leading bytes match.
    pub fn matches(&self, other: &PasswordVerifier) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl fmt::Debug for PasswordVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordVerifier(..)")
    }
}

/// A 32-byte AES-256 key that zeroes its memory when dropped.
///
/// Lives only inside an unlocked session.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey {
    bytes: [u8; KEY_LEN],
}

impl EncryptionKey {
    /// Wrap raw key bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (to hand to the cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptionKey(..)")
    }
}
