//! A random [`Key`] wrapped in a password-derived ciphertext, with support
//! for rotating the password without touching the inner key.

use sha2::{Digest, Sha256};

use crate::constants::VERSION_PASSWORD_KEY;
use crate::crypto::{decrypt, encrypt};
use crate::encoding::{load_ascii_safe, save_ascii_safe};
use crate::errors::Error;
use crate::key::Key;
use crate::secret::Secret;

/// A key encrypted under a password. The inner key is never exposed except
/// through [`KeyProtectedByPassword::unlock`], and only for as long as the
/// caller holds onto the returned [`Key`].
pub struct KeyProtectedByPassword {
    encrypted_key: Vec<u8>,
}

/// Pre-hash `password` and feed it back in as a `Secret::Password`, so the
/// inner encryption still runs the full password path: `derive_keys` hashes
/// it a second time and stretches the result with PBKDF2 (100,000 rounds).
/// The outer pre-hash here is a domain separator between this internal use
/// of the password and a caller's own direct `encrypt`-with-password use of
/// the same password; it is not a substitute for PBKDF2 stretching.
fn password_secret(password: &[u8]) -> Secret {
    let prehash: [u8; 32] = Sha256::digest(password).into();
    Secret::from_password(prehash.to_vec())
}

impl KeyProtectedByPassword {
    /// Generate a fresh random key and wrap it under `password`.
    pub fn create(password: &[u8]) -> Result<Self, Error> {
        let key = Key::random()?;
        let encoded = key.save_to_ascii_safe_string();
        let encrypted_key = encrypt(encoded.as_bytes(), &password_secret(password), false)?;
        Ok(Self { encrypted_key })
    }

    /// Decrypt and return the inner key. A malformed inner key after a
    /// successful outer decryption is upgraded to
    /// `WrongKeyOrModifiedCiphertext`: it would mean an attacker produced a
    /// valid ciphertext under the same password over garbage, which this
    /// crate treats identically to an authentication failure.
    pub fn unlock(&self, password: &[u8]) -> Result<Key, Error> {
        let inner = decrypt(&self.encrypted_key, &password_secret(password), false)?;
        let inner_str = std::str::from_utf8(&inner)
            .map_err(|_| Error::WrongKeyOrModifiedCiphertext)?;
        Key::load_from_ascii_safe_string(inner_str).map_err(|_| Error::WrongKeyOrModifiedCiphertext)
    }

    /// Unlock under `old_password` and re-wrap the same inner key under
    /// `new_password`.
    pub fn change_password(
        &self,
        old_password: &[u8],
        new_password: &[u8],
    ) -> Result<Self, Error> {
        let key = self.unlock(old_password)?;
        let encoded = key.save_to_ascii_safe_string();
        let encrypted_key = encrypt(encoded.as_bytes(), &password_secret(new_password), false)?;
        Ok(Self { encrypted_key })
    }

    /// Serialize as a checksummed ASCII-safe hex string tagged with
    /// [`VERSION_PASSWORD_KEY`].
    pub fn save_to_ascii_safe_string(&self) -> String {
        save_ascii_safe(&VERSION_PASSWORD_KEY, &self.encrypted_key)
    }

    /// Parse a string produced by
    /// [`KeyProtectedByPassword::save_to_ascii_safe_string`].
    pub fn load_from_ascii_safe_string(encoded: &str) -> Result<Self, Error> {
        let encrypted_key = load_ascii_safe(&VERSION_PASSWORD_KEY, encoded.as_bytes(), true)?;
        Ok(Self { encrypted_key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_unlock_roundtrip() {
        let protected = KeyProtectedByPassword::create(b"correct horse").unwrap();
        let unlocked = protected.unlock(b"correct horse").unwrap();
        let rewound = protected.unlock(b"correct horse").unwrap();
        assert_eq!(unlocked.raw_bytes(), rewound.raw_bytes());
    }

    #[test]
    fn unlock_with_wrong_password_fails() {
        let protected = KeyProtectedByPassword::create(b"right").unwrap();
        assert!(matches!(
            protected.unlock(b"wrong"),
            Err(Error::WrongKeyOrModifiedCiphertext)
        ));
    }

    #[test]
    fn change_password_rotation() {
        let protected = KeyProtectedByPassword::create(b"old-password").unwrap();
        let original_key = protected.unlock(b"old-password").unwrap();

        let rotated = protected.change_password(b"old-password", b"new-password").unwrap();

        let unlocked_with_new = rotated.unlock(b"new-password").unwrap();
        assert_eq!(original_key.raw_bytes(), unlocked_with_new.raw_bytes());

        assert!(matches!(
            rotated.unlock(b"old-password"),
            Err(Error::WrongKeyOrModifiedCiphertext)
        ));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let protected = KeyProtectedByPassword::create(b"password").unwrap();
        let encoded = protected.save_to_ascii_safe_string();
        let loaded = KeyProtectedByPassword::load_from_ascii_safe_string(&encoded).unwrap();

        let a = protected.unlock(b"password").unwrap();
        let b = loaded.unlock(b"password").unwrap();
        assert_eq!(a.raw_bytes(), b.raw_bytes());
    }

    #[test]
    fn load_rejects_wrong_header() {
        let key_protected = KeyProtectedByPassword::create(b"password").unwrap();
        let encoded = key_protected.save_to_ascii_safe_string();
        let tampered = encoded.replacen("def1", "def0", 1);
        assert!(KeyProtectedByPassword::load_from_ascii_safe_string(&tampered).is_err());
    }
}
