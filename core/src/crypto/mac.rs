//! HMAC-SHA256, single-shot and as a clonable streaming context.
//!
//! The two-pass file protocol (see [`crate::file`]) needs to clone the
//! running HMAC state mid-stream to take a per-chunk MAC without disturbing
//! the accumulator; `hmac::Hmac` implements `Clone`, so no separate context
//! per chunk is needed.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::constants::MAC_LEN;
use crate::errors::Error;

/// Streaming HMAC-SHA256 context. Thin wrapper so callers outside this
/// module never import `hmac`/`sha2` directly.
#[derive(Clone)]
pub struct HmacSha256(Hmac<Sha256>);

impl HmacSha256 {
    /// Start a new HMAC context keyed by `auth_key`.
    pub fn new(auth_key: &[u8]) -> Result<Self, Error> {
        let mac = Hmac::<Sha256>::new_from_slice(auth_key)
            .map_err(|_| Error::EnvironmentIsBroken("HMAC key setup failed".into()))?;
        Ok(Self(mac))
    }

    /// Feed more bytes into the running MAC.
    pub fn update(&mut self, data: &[u8]) {
        self.0.update(data);
    }

    /// Clone the current state and finalize the clone, leaving `self`
    /// untouched so more bytes can still be fed into it.
    pub fn clone_finalize(&self) -> [u8; MAC_LEN] {
        self.0.clone().finalize().into_bytes().into()
    }

    /// Consume the context and return the final MAC.
    pub fn finalize(self) -> [u8; MAC_LEN] {
        self.0.finalize().into_bytes().into()
    }
}

/// One-shot HMAC-SHA256 over `data` keyed by `auth_key`.
pub fn hmac_sha256(auth_key: &[u8], data: &[u8]) -> Result<[u8; MAC_LEN], Error> {
    let mut ctx = HmacSha256::new(auth_key)?;
    ctx.update(data);
    Ok(ctx.finalize())
}
