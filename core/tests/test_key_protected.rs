//! `KeyProtectedByPassword`: create/unlock/rotation and its serialization.

use crypto_core::{Error, KeyProtectedByPassword};

// Property 13: changePassword(old, new) followed by unlock(new) returns the
// original key; unlock(old) afterward fails.
#[test]
fn rotation_preserves_key_and_invalidates_old_password() {
    let protected = KeyProtectedByPassword::create(b"first-password").unwrap();
    let original = protected.unlock(b"first-password").unwrap();

    let rotated = protected
        .change_password(b"first-password", b"second-password")
        .unwrap();

    let after_rotation = rotated.unlock(b"second-password").unwrap();
    assert_eq!(original.raw_bytes(), after_rotation.raw_bytes());

    assert!(matches!(
        rotated.unlock(b"first-password"),
        Err(Error::WrongKeyOrModifiedCiphertext)
    ));
}

#[test]
fn create_unlock_roundtrip_is_stable_across_calls() {
    let protected = KeyProtectedByPassword::create(b"s3cr3t").unwrap();
    let a = protected.unlock(b"s3cr3t").unwrap();
    let b = protected.unlock(b"s3cr3t").unwrap();
    assert_eq!(a.raw_bytes(), b.raw_bytes());
}

#[test]
fn unlock_wrong_password_fails() {
    let protected = KeyProtectedByPassword::create(b"s3cr3t").unwrap();
    assert!(matches!(
        protected.unlock(b"not-it"),
        Err(Error::WrongKeyOrModifiedCiphertext)
    ));
}

#[test]
fn ascii_safe_serialization_roundtrip() {
    let protected = KeyProtectedByPassword::create(b"s3cr3t").unwrap();
    let encoded = protected.save_to_ascii_safe_string();
    let loaded = KeyProtectedByPassword::load_from_ascii_safe_string(&encoded).unwrap();

    let direct = protected.unlock(b"s3cr3t").unwrap();
    let via_load = loaded.unlock(b"s3cr3t").unwrap();
    assert_eq!(direct.raw_bytes(), via_load.raw_bytes());
}

#[test]
fn load_rejects_malformed_input() {
    assert!(KeyProtectedByPassword::load_from_ascii_safe_string("not a valid envelope").is_err());
}
