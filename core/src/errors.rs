//! Public error taxonomy.
//!
//! - [`Error::BadFormat`] is raised only by the encoding layer and is
//!   upgraded to [`Error::WrongKeyOrModifiedCiphertext`] at the crypto-layer
//!   boundary, so callers need only one predicate for "did not decrypt".
//! - No variant carries secret material; messages are safe to log.

use std::fmt;

/// Errors surfaced by the encoding layer, before any cryptographic work.
/// Always upgraded to [`Error::WrongKeyOrModifiedCiphertext`] once it
/// crosses into the crypto layer (see [`Error::from_encoding`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// Non-hex byte encountered while decoding.
    InvalidHexChar { byte: u8 },
    /// Decoded payload too short to contain the expected header + checksum.
    BufferTooShort { have: usize, need: usize },
    /// Header bytes did not match the expected tag.
    HeaderMismatch,
    /// Checksum over header‖payload did not match the trailing SHA-256.
    ChecksumMismatch,
}

impl fmt::Display for EncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodingError::InvalidHexChar { byte } => {
                write!(f, "invalid hex character: 0x{byte:02x}")
            }
            EncodingError::BufferTooShort { have, need } => {
                write!(f, "encoded buffer too short: {have} < {need}")
            }
            EncodingError::HeaderMismatch => write!(f, "header does not match expected tag"),
            EncodingError::ChecksumMismatch => write!(f, "checksum verification failed"),
        }
    }
}

impl std::error::Error for EncodingError {}

/// Error kinds surfaced to callers of the public API.
#[derive(Debug)]
pub enum Error {
    /// Encoded input is structurally invalid. Only ever returned directly by
    /// the encoding layer's own `save`/`load` helpers (e.g. `Key::load_from_ascii_safe_string`);
    /// the crypto layer upgrades this to `WrongKeyOrModifiedCiphertext`.
    BadFormat(EncodingError),

    /// Integrity check failed, wrong secret was used, ciphertext was
    /// truncated or malformed, or the raw/hex format variant didn't match
    /// what the caller asked to parse.
    WrongKeyOrModifiedCiphertext,

    /// Underlying stream read/write/seek failed, input and output aliased
    /// the same resource, or EOF was reached prematurely.
    Io(std::io::Error),

    /// RNG failure, a primitive returned an unexpected result, an internal
    /// length invariant was violated, or the IV counter overflowed. Signals
    /// an unrecoverable platform problem; callers should not retry.
    EnvironmentIsBroken(String),
}

impl Error {
    /// Upgrade an encoding-layer error into the single "did not decrypt"
    /// predicate callers of `decrypt`/`decrypt_file` should branch on.
    pub(crate) fn from_encoding(_e: EncodingError) -> Self {
        Error::WrongKeyOrModifiedCiphertext
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BadFormat(e) => write!(f, "bad format: {e}"),
            Error::WrongKeyOrModifiedCiphertext => {
                write!(f, "wrong key, wrong password, or the ciphertext was modified")
            }
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::EnvironmentIsBroken(msg) => write!(f, "environment is broken: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<EncodingError> for Error {
    fn from(e: EncodingError) -> Self {
        Error::BadFormat(e)
    }
}
