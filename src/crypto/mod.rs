//! Cryptographic primitives for digisafe.
//!
//! This module provides:
//! - Key material types that wipe themselves on drop (`keys`)
//! - scrypt verifier + PBKDF2 key derivation (`kdf`)
//! - AES-256-GCM frame sealing and opening (`aead`)
//! - Random password generation (`password`)

pub mod aead;
pub mod kdf;
pub mod keys;
pub mod password;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{seal, open, KdfParams, ...};
pub use aead::{open, open_with_aad, seal, seal_with_aad};
pub use kdf::{authenticate, enroll, Enrollment, KdfParams};
pub use keys::{EncryptionKey, PasswordVerifier, Salt};
pub use password::generate_password;
