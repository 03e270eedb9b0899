//! [`Secret`]: a tagged union of a raw key or a password. A plain enum
//! rather than a trait object — both variants are known up front and this
//! avoids virtual dispatch for something as hot as key derivation.

use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{DERIVED_KEY_LEN, HKDF_INFO_AUTH, HKDF_INFO_ENC, SALT_LEN};
use crate::crypto::kdf::{hkdf_sha256, pbkdf2_sha256};
use crate::errors::Error;
use crate::key::Key;

/// Either a raw 256-bit key or a password. Consumed only to derive
/// `(authKey, encKey)` pairs; never compared or displayed.
#[derive(Zeroize, ZeroizeOnDrop)]
pub enum Secret {
    Key(Key),
    Password(Vec<u8>),
}

impl Secret {
    pub fn from_key(key: Key) -> Self {
        Secret::Key(key)
    }

    pub fn from_password(password: impl Into<Vec<u8>>) -> Self {
        Secret::Password(password.into())
    }

    /// Derive `(authKey, encKey)` from `salt`, which must be exactly
    /// [`SALT_LEN`] bytes — a mismatch is a programmer error, not a
    /// user-triggerable one, so it fails hard via `EnvironmentIsBroken`
    /// rather than returning a dedicated variant.
    pub fn derive_keys(
        &self,
        salt: &[u8],
    ) -> Result<([u8; DERIVED_KEY_LEN], [u8; DERIVED_KEY_LEN]), Error> {
        if salt.len() != SALT_LEN {
            return Err(Error::EnvironmentIsBroken(format!(
                "salt must be {SALT_LEN} bytes, got {}",
                salt.len()
            )));
        }

        let prekey: Vec<u8> = match self {
            Secret::Key(key) => key.raw_bytes().to_vec(),
            Secret::Password(password) => {
                let prehash = Sha256::digest(password);
                pbkdf2_sha256(&prehash, salt).to_vec()
            }
        };

        let auth_key = hkdf_sha256(&prekey, salt, HKDF_INFO_AUTH)?;
        let enc_key = hkdf_sha256(&prekey, salt, HKDF_INFO_ENC)?;
        Ok((auth_key, enc_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_secret_derives_deterministically() {
        let key = Key::from_raw_bytes([0x11u8; 32]);
        let secret = Secret::from_key(key);
        let salt = [0x22u8; SALT_LEN];

        let (auth1, enc1) = secret.derive_keys(&salt).unwrap();
        let (auth2, enc2) = secret.derive_keys(&salt).unwrap();

        assert_eq!(auth1, auth2);
        assert_eq!(enc1, enc2);
        assert_ne!(auth1, enc1);
    }

    #[test]
    fn password_secret_derives_deterministically() {
        let secret = Secret::from_password(b"hunter2".to_vec());
        let salt = [0x33u8; SALT_LEN];

        let (auth1, enc1) = secret.derive_keys(&salt).unwrap();
        let (auth2, enc2) = secret.derive_keys(&salt).unwrap();

        assert_eq!(auth1, auth2);
        assert_eq!(enc1, enc2);
    }

    #[test]
    fn different_salts_produce_different_keys() {
        let secret = Secret::from_password(b"hunter2".to_vec());
        let (auth_a, _) = secret.derive_keys(&[1u8; SALT_LEN]).unwrap();
        let (auth_b, _) = secret.derive_keys(&[2u8; SALT_LEN]).unwrap();
        assert_ne!(auth_a, auth_b);
    }

    #[test]
    fn wrong_salt_length_is_rejected() {
        let secret = Secret::from_password(b"pw".to_vec());
        assert!(secret.derive_keys(&[0u8; 16]).is_err());
    }

    #[test]
    fn key_and_password_secrets_derive_differently() {
        let key_secret = Secret::from_key(Key::from_raw_bytes([0x44u8; 32]));
        let password_secret = Secret::from_password(vec![0x44u8; 32]);
        let salt = [0x55u8; SALT_LEN];

        let (auth_key, _) = key_secret.derive_keys(&salt).unwrap();
        let (auth_pw, _) = password_secret.derive_keys(&salt).unwrap();
        assert_ne!(auth_key, auth_pw);
    }
}
