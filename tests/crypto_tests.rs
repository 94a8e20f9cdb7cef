//! Integration tests for the digisafe crypto module.

use std::collections::HashSet;

use digisafe::crypto::aead::{FRAME_OVERHEAD, NONCE_LEN};
use digisafe::crypto::keys::SALT_LEN;
use digisafe::crypto::{
    authenticate, enroll, generate_password, open, open_with_aad, seal, seal_with_aad,
    EncryptionKey, KdfParams, Salt,
};
use digisafe::errors::VaultError;

fn fast_params() -> KdfParams {
    KdfParams {
        scrypt_log_n: 10,
        scrypt_r: 8,
        scrypt_p: 1,
        pbkdf2_iterations: 1_000,
    }
}

fn key(byte: u8) -> EncryptionKey {
    EncryptionKey::new([byte; 32])
}

// ---------------------------------------------------------------------------
// AEAD frames
// ---------------------------------------------------------------------------

#[test]
fn seal_open_roundtrip() {
    let k = key(0xAB);
    let plaintext = b"{\"bank\":{\"type\":\"password\"}}";

    let frame = seal(&k, plaintext).expect("seal should succeed");
    assert_eq!(frame.len(), plaintext.len() + FRAME_OVERHEAD);

    let recovered = open(&k, &frame).expect("open should succeed");
    assert_eq!(recovered, plaintext);
}

#[test]
fn empty_plaintext_gives_minimal_frame() {
    let k = key(0x01);
    let frame = seal(&k, b"").unwrap();
    assert_eq!(frame.len(), FRAME_OVERHEAD);
    assert!(open(&k, &frame).unwrap().is_empty());
}

#[test]
fn ten_thousand_seals_never_repeat_a_nonce() {
    let k = key(0xCD);
    let mut nonces = HashSet::new();

    for _ in 0..10_000 {
        let frame = seal(&k, b"same plaintext").unwrap();
        let nonce: [u8; NONCE_LEN] = frame[..NONCE_LEN].try_into().unwrap();
        assert!(nonces.insert(nonce), "nonce reused");
    }
}

#[test]
fn open_with_wrong_key_is_auth_failure() {
    let frame = seal(&key(0x11), b"TOP_SECRET").unwrap();
    assert!(matches!(
        open(&key(0x22), &frame),
        Err(VaultError::AuthFailure)
    ));
}

#[test]
fn every_single_bit_flip_is_detected() {
    let k = key(0x33);
    let frame = seal(&k, b"flip me").unwrap();

    for byte in 0..frame.len() {
        for bit in 0..8 {
            let mut tampered = frame.clone();
            tampered[byte] ^= 1 << bit;
            assert!(
                matches!(open(&k, &tampered), Err(VaultError::AuthFailure)),
                "flip at byte {byte} bit {bit} went unnoticed"
            );
        }
    }
}

#[test]
fn short_frames_are_auth_failure() {
    let k = key(0x44);
    for len in [0, 1, NONCE_LEN, FRAME_OVERHEAD - 1] {
        assert!(
            matches!(open(&k, &vec![0u8; len]), Err(VaultError::AuthFailure)),
            "frame of {len} bytes"
        );
    }
}

#[test]
fn aad_must_match() {
    let k = key(0x55);
    let frame = seal_with_aad(&k, b"file bytes", b"a.enc").unwrap();

    assert_eq!(open_with_aad(&k, &frame, b"a.enc").unwrap(), b"file bytes");
    assert!(matches!(
        open_with_aad(&k, &frame, b"b.enc"),
        Err(VaultError::AuthFailure)
    ));
    assert!(open(&k, &frame).is_err());
}

// ---------------------------------------------------------------------------
// Key derivation
// ---------------------------------------------------------------------------

#[test]
fn enroll_then_authenticate_yields_same_key() {
    let params = fast_params();
    let enrollment = enroll(b"correct horse", &params).unwrap();

    let key = authenticate(
        b"correct horse",
        &enrollment.salt,
        &enrollment.verifier,
        &params,
    )
    .unwrap();
    assert_eq!(key.as_bytes(), enrollment.key.as_bytes());

    // The key is not the verifier.
    assert_ne!(key.as_bytes(), enrollment.verifier.as_bytes());
}

#[test]
fn wrong_passphrase_is_auth_failure() {
    let params = fast_params();
    let enrollment = enroll(b"right", &params).unwrap();

    let result = authenticate(b"wrong", &enrollment.salt, &enrollment.verifier, &params);
    assert!(matches!(result, Err(VaultError::AuthFailure)));
}

#[test]
fn each_enrollment_uses_a_fresh_salt() {
    let params = fast_params();
    let a = enroll(b"pw", &params).unwrap();
    let b = enroll(b"pw", &params).unwrap();

    assert_ne!(a.salt, b.salt);
    assert_ne!(a.key.as_bytes(), b.key.as_bytes());
    assert_eq!(a.salt.as_bytes().len(), SALT_LEN);
}

#[test]
fn different_params_do_not_authenticate() {
    let enrollment = enroll(b"pw", &fast_params()).unwrap();
    let stronger = KdfParams {
        pbkdf2_iterations: 2_000,
        scrypt_log_n: 11,
        ..fast_params()
    };

    let result = authenticate(b"pw", &enrollment.salt, &enrollment.verifier, &stronger);
    assert!(matches!(result, Err(VaultError::AuthFailure)));
}

#[test]
fn weak_params_are_rejected() {
    let weak = KdfParams {
        scrypt_log_n: 4,
        ..fast_params()
    };
    assert!(matches!(
        enroll(b"pw", &weak),
        Err(VaultError::KeyDerivationFailed(_))
    ));
}

#[test]
fn salt_is_preserved_through_bytes() {
    let salt = Salt::generate();
    assert_eq!(Salt::from_bytes(*salt.as_bytes()), salt);
}

// ---------------------------------------------------------------------------
// Password generator
// ---------------------------------------------------------------------------

#[test]
fn generated_passwords_use_expected_alphabet() {
    const SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

    let pw = generate_password(2_000, true);
    assert_eq!(pw.chars().count(), 2_000);
    assert!(pw
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || SYMBOLS.contains(c)));
    assert!(pw.chars().any(|c| SYMBOLS.contains(c)));

    let plain = generate_password(2_000, false);
    assert!(plain.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[test]
fn generated_passwords_differ() {
    assert_ne!(generate_password(32, true), generate_password(32, true));
}
