//! Opaque 32-byte key: the raw-key half of [`crate::secret::Secret`].

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{KEY_LEN, VERSION_KEY};
use crate::encoding::{load_ascii_safe, save_ascii_safe, HEADER_LEN};
use crate::errors::Error;
use crate::primitives::random_array;

/// A 32-byte key, zeroized on drop. Never implements `Copy`, `Debug`, or
/// `Display` — those would make it too easy to accidentally leak the raw
/// bytes into a log line or a derived value.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Key([u8; KEY_LEN]);

impl Key {
    /// Generate a fresh key from the OS CSPRNG.
    pub fn random() -> Result<Self, Error> {
        Ok(Self(random_array()?))
    }

    /// Wrap an existing 32-byte value. Callers that construct a `Key` this
    /// way are responsible for the bytes' provenance.
    pub fn from_raw_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Borrow the raw 32 bytes.
    pub fn raw_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Serialize as a checksummed ASCII-safe hex string tagged with
    /// [`VERSION_KEY`].
    pub fn save_to_ascii_safe_string(&self) -> String {
        save_ascii_safe(&VERSION_KEY, &self.0)
    }

    /// Parse a string produced by [`Key::save_to_ascii_safe_string`].
    pub fn load_from_ascii_safe_string(encoded: &str) -> Result<Self, Error> {
        let payload = load_ascii_safe(&VERSION_KEY, encoded.as_bytes(), true)?;
        let bytes: [u8; KEY_LEN] = payload.as_slice().try_into().map_err(|_| {
            Error::BadFormat(crate::errors::EncodingError::BufferTooShort {
                have: payload.len(),
                need: KEY_LEN,
            })
        })?;
        Ok(Self(bytes))
    }
}

const _: () = assert!(HEADER_LEN == 4);
