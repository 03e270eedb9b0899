//! Single-shot, in-memory authenticated encryption: encrypt-then-MAC over
//! AES-128-CTR with HMAC-SHA256, per the versioned ciphertext format in
//! [`crate::constants`].

pub mod cipher;
pub mod kdf;
pub mod mac;

use crate::constants::{BLOCK_LEN, IV_LEN, MAC_LEN, MINIMUM_CIPHERTEXT_SIZE, SALT_LEN, VERSION};
use crate::encoding::{bin_to_hex, hex_to_bin};
use crate::errors::Error;
use crate::primitives::{constant_time_eq, random_array};
use crate::secret::Secret;
use mac::HmacSha256;

/// Encrypt `plaintext` under `secret`, returning either raw bytes or
/// lowercase hex depending on `raw_output`.
pub fn encrypt(plaintext: &[u8], secret: &Secret, raw_output: bool) -> Result<Vec<u8>, Error> {
    let salt: [u8; SALT_LEN] = random_array()?;
    let iv: [u8; IV_LEN] = random_array()?;

    let (auth_key, enc_key) = secret.derive_keys(&salt)?;

    let ct = cipher::aes128_ctr_apply(&enc_key[..BLOCK_LEN], &iv, plaintext)?;

    let mut body = Vec::with_capacity(VERSION.len() + SALT_LEN + IV_LEN + ct.len());
    body.extend_from_slice(&VERSION);
    body.extend_from_slice(&salt);
    body.extend_from_slice(&iv);
    body.extend_from_slice(&ct);

    let mac = mac::hmac_sha256(&auth_key, &body)?;

    let mut out = body;
    out.extend_from_slice(&mac);

    if raw_output {
        Ok(out)
    } else {
        Ok(bin_to_hex(&out).into_bytes())
    }
}

/// Decrypt `ciphertext` produced by [`encrypt`] under `secret`. Any failure —
/// bad hex, too-short input, wrong version, MAC mismatch — collapses to
/// [`Error::WrongKeyOrModifiedCiphertext`].
pub fn decrypt(ciphertext: &[u8], secret: &Secret, raw_input: bool) -> Result<Vec<u8>, Error> {
    let raw = if raw_input {
        ciphertext.to_vec()
    } else {
        hex_to_bin(ciphertext).map_err(|_| Error::WrongKeyOrModifiedCiphertext)?
    };

    if raw.len() < MINIMUM_CIPHERTEXT_SIZE {
        return Err(Error::WrongKeyOrModifiedCiphertext);
    }

    let (version, rest) = raw.split_at(VERSION.len());
    let (salt, rest) = rest.split_at(SALT_LEN);
    let (iv, rest) = rest.split_at(IV_LEN);
    let (ct, stored_mac) = rest.split_at(rest.len() - MAC_LEN);

    if version != VERSION {
        return Err(Error::WrongKeyOrModifiedCiphertext);
    }

    let (auth_key, enc_key) = secret.derive_keys(salt)?;

    let mut signed = Vec::with_capacity(version.len() + salt.len() + iv.len() + ct.len());
    signed.extend_from_slice(version);
    signed.extend_from_slice(salt);
    signed.extend_from_slice(iv);
    signed.extend_from_slice(ct);

    let computed_mac = mac::hmac_sha256(&auth_key, &signed)?;
    if !constant_time_eq(&computed_mac, stored_mac) {
        return Err(Error::WrongKeyOrModifiedCiphertext);
    }

    let iv: [u8; IV_LEN] = iv.try_into().expect("iv slice has exactly IV_LEN bytes");
    cipher::aes128_ctr_apply(&enc_key[..BLOCK_LEN], &iv, ct)
}

/// Start a streaming HMAC context keyed by `auth_key`, for the file protocol.
pub(crate) fn new_mac(auth_key: &[u8]) -> Result<HmacSha256, Error> {
    HmacSha256::new(auth_key)
}
