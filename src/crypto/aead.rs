//! AES-256-GCM authenticated encryption.
//!
//! Each call to `seal` generates a fresh random 12-byte nonce. The frame
//! it returns is the single at-rest format for every encrypted payload:
//!
//! ```text
//! [ 12-byte nonce | 16-byte auth tag | ciphertext ]
//! ```
//!
//! `open` splits the frame back apart by those fixed prefixes. Any
//! failure (short frame, bad tag, wrong key) is `AuthFailure`; no partial
//! plaintext is ever returned.

use aes_gcm::aead::{AeadCore, AeadInPlace, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce, Tag};

use super::keys::EncryptionKey;
use crate::errors::{VaultError, Result};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Smallest valid frame: nonce and tag around an empty ciphertext.
pub const FRAME_OVERHEAD: usize = NONCE_LEN + TAG_LEN;

/// Encrypt `plaintext` with no associated data.
pub fn seal(key: &EncryptionKey, plaintext: &[u8]) -> Result<Vec<u8>> {
    seal_with_aad(key, plaintext, &[])
}

/// Decrypt a frame produced by `seal`.
pub fn open(key: &EncryptionKey, frame: &[u8]) -> Result<Vec<u8>> {
    open_with_aad(key, frame, &[])
}

/// Encrypt `plaintext` and bind `aad` into the tag.
///
/// An empty `aad` produces exactly the same frame format as `seal`.
pub fn seal_with_aad(key: &EncryptionKey, plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| VaultError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    // Reserve room for the prefix so the ciphertext is produced in place.
    let mut frame = Vec::with_capacity(FRAME_OVERHEAD + plaintext.len());
    frame.extend_from_slice(&nonce);
    frame.extend_from_slice(&[0u8; TAG_LEN]);
    frame.extend_from_slice(plaintext);

    let tag = cipher
        .encrypt_in_place_detached(&nonce, aad, &mut frame[FRAME_OVERHEAD..])
        .map_err(|e| VaultError::EncryptionFailed(format!("encryption error: {e}")))?;

    frame[NONCE_LEN..FRAME_OVERHEAD].copy_from_slice(&tag);
    Ok(frame)
}

/// Decrypt a frame, verifying the tag over the ciphertext and `aad`.
pub fn open_with_aad(key: &EncryptionKey, frame: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
    if frame.len() < FRAME_OVERHEAD {
        return Err(VaultError::AuthFailure);
    }

    let (nonce_bytes, rest) = frame.split_at(NONCE_LEN);
    let (tag_bytes, ciphertext) = rest.split_at(TAG_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);
    let tag = Tag::from_slice(tag_bytes);

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| VaultError::AuthFailure)?;

    let mut buffer = ciphertext.to_vec();
    if cipher
        .decrypt_in_place_detached(nonce, aad, &mut buffer, tag)
        .is_err()
    {
        // aes-gcm leaves the buffer untouched on failure, but do not keep
        // anything around that could be mistaken for plaintext.
        zeroize::Zeroize::zeroize(&mut buffer);
        return Err(VaultError::AuthFailure);
    }

    Ok(buffer)
}
