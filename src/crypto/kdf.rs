//! Password-based key derivation.
//!
//! Two independent KDFs run over the same `(passphrase, salt)` pair:
//!
//! - **scrypt** (memory-hard, slow) produces the `PasswordVerifier` that is
//!   stored on disk and used to decide whether a passphrase is correct.
//! - **PBKDF2-HMAC-SHA256** (iterated hash) produces the `EncryptionKey`
//!   that seals the vault contents. It is never stored.
//!
//! Compromising the verifier does not hand out the key: the two outputs
//! come from unrelated algorithms.

use hmac::Hmac;
use sha2::Sha256;
use tracing::debug;

use super::keys::{EncryptionKey, PasswordVerifier, Salt, KEY_LEN, VERIFIER_LEN};
use crate::errors::{VaultError, Result};

/// Minimum scrypt cost exponent (N = 1024).
const MIN_SCRYPT_LOG_N: u8 = 10;

/// Minimum PBKDF2 iteration count accepted.
const MIN_PBKDF2_ITERATIONS: u32 = 1_000;

/// Tunable parameters for both KDFs.
///
/// The Config record on disk does not carry these, so every unlock of a
/// vault must use the values it was enrolled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// scrypt work factor as log2(N) (default: 14, i.e. N = 16 384).
    pub scrypt_log_n: u8,
    /// scrypt block size (default: 8).
    pub scrypt_r: u32,
    /// scrypt parallelism (default: 1).
    pub scrypt_p: u32,
    /// PBKDF2-HMAC-SHA256 iteration count (default: 100 000).
    pub pbkdf2_iterations: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            scrypt_log_n: 14,
            scrypt_r: 8,
            scrypt_p: 1,
            pbkdf2_iterations: 100_000,
        }
    }
}

impl KdfParams {
    /// Reject parameter sets too weak to be worth deriving with.
    pub fn validate(&self) -> Result<()> {
        if self.scrypt_log_n < MIN_SCRYPT_LOG_N {
            return Err(VaultError::KeyDerivationFailed(format!(
                "scrypt log_n must be at least {MIN_SCRYPT_LOG_N} (got {})",
                self.scrypt_log_n
            )));
        }
        if self.scrypt_r < 1 {
            return Err(VaultError::KeyDerivationFailed(
                "scrypt r must be at least 1".into(),
            ));
        }
        if self.scrypt_p < 1 {
            return Err(VaultError::KeyDerivationFailed(
                "scrypt p must be at least 1".into(),
            ));
        }
        if self.pbkdf2_iterations < MIN_PBKDF2_ITERATIONS {
            return Err(VaultError::KeyDerivationFailed(format!(
                "PBKDF2 iterations must be at least {MIN_PBKDF2_ITERATIONS} (got {})",
                self.pbkdf2_iterations
            )));
        }
        Ok(())
    }
}

/// Everything produced by a fresh enrollment.
pub struct Enrollment {
    pub salt: Salt,
    pub verifier: PasswordVerifier,
    pub key: EncryptionKey,
}

/// Enroll a new passphrase: fresh salt, verifier, and encryption key.
pub fn enroll(passphrase: &[u8], params: &KdfParams) -> Result<Enrollment> {
    let salt = Salt::generate();
    let verifier = derive_verifier(passphrase, &salt, params)?;
    let key = derive_encryption_key(passphrase, &salt, params)?;
    debug!("derived verifier and encryption key for new vault");
    Ok(Enrollment {
        salt,
        verifier,
        key,
    })
}

/// Check `passphrase` against a stored verifier and, on a match, derive
/// the encryption key.
///
/// A mismatch yields `AuthFailure`. The comparison is constant-time.
pub fn authenticate(
    passphrase: &[u8],
    salt: &Salt,
    expected: &PasswordVerifier,
    params: &KdfParams,
) -> Result<EncryptionKey> {
    let candidate = derive_verifier(passphrase, salt, params)?;
    if !candidate.matches(expected) {
        return Err(VaultError::AuthFailure);
    }
    derive_encryption_key(passphrase, salt, params)
}

/// SlowKDF: scrypt(passphrase, salt) -> 32-byte verifier.
pub fn derive_verifier(
    passphrase: &[u8],
    salt: &Salt,
    params: &KdfParams,
) -> Result<PasswordVerifier> {
    params.validate()?;

    let scrypt_params = scrypt::Params::new(
        params.scrypt_log_n,
        params.scrypt_r,
        params.scrypt_p,
        VERIFIER_LEN,
    )
    .map_err(|e| VaultError::KeyDerivationFailed(format!("invalid scrypt params: {e}")))?;

    let mut out = [0u8; VERIFIER_LEN];
    scrypt::scrypt(passphrase, salt.as_bytes(), &scrypt_params, &mut out)
        .map_err(|e| VaultError::KeyDerivationFailed(format!("scrypt failed: {e}")))?;

    Ok(PasswordVerifier::from_bytes(out))
}

/// FastKDF: PBKDF2-HMAC-SHA256(passphrase, salt) -> 32-byte key.
pub fn derive_encryption_key(
    passphrase: &[u8],
    salt: &Salt,
    params: &KdfParams,
) -> Result<EncryptionKey> {
    params.validate()?;

    let mut out = [0u8; KEY_LEN];
    pbkdf2::pbkdf2::<Hmac<Sha256>>(
        passphrase,
        salt.as_bytes(),
        params.pbkdf2_iterations,
        &mut out,
    )
    .map_err(|e| VaultError::KeyDerivationFailed(format!("PBKDF2 failed: {e}")))?;

    let key = EncryptionKey::new(out);
    zeroize::Zeroize::zeroize(&mut out);
    Ok(key)
}
