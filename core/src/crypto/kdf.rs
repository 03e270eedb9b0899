//! Key derivation: HKDF (RFC 5869) and PBKDF2 (RFC 8018), both over
//! HMAC-SHA256.

use hkdf::Hkdf;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

use crate::constants::{DERIVED_KEY_LEN, PBKDF2_ITERATIONS};
use crate::errors::Error;

/// HKDF-Extract-then-Expand with SHA-256, producing exactly
/// [`DERIVED_KEY_LEN`] bytes of output. `L <= 255 * HashLen` is enforced by
/// the `hkdf` crate itself.
pub fn hkdf_sha256(ikm: &[u8], salt: &[u8], info: &[u8]) -> Result<[u8; DERIVED_KEY_LEN], Error> {
    let hk = Hkdf::<Sha256>::new(Some(salt), ikm);
    let mut out = [0u8; DERIVED_KEY_LEN];
    hk.expand(info, &mut out)
        .map_err(|_| Error::EnvironmentIsBroken("HKDF expand failed".into()))?;
    Ok(out)
}

/// PBKDF2-HMAC-SHA256 with [`PBKDF2_ITERATIONS`] rounds, producing exactly
/// [`DERIVED_KEY_LEN`] bytes.
pub fn pbkdf2_sha256(password: &[u8], salt: &[u8]) -> [u8; DERIVED_KEY_LEN] {
    let mut out = [0u8; DERIVED_KEY_LEN];
    pbkdf2_hmac::<Sha256>(password, salt, PBKDF2_ITERATIONS, &mut out);
    out
}
