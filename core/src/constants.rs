//! Wire-format constants for the versioned ciphertext layout:
//!
//! ```text
//! [ VERSION (4) | SALT (32) | IV (16) | CT (|pt|) | MAC (32) ]
//! ```
//!
//! Industry note: headers are fixed-length and compared bytewise so that one
//! key kind's header can never be mistaken for another's.

/// Current ciphertext format version tag.
pub const VERSION: [u8; 4] = [0xDE, 0xF5, 0x02, 0x00];

/// Header tag for a `Key`'s checksummed ASCII-safe serialization.
pub const VERSION_KEY: [u8; 4] = [0xDE, 0xF0, 0x00, 0x00];

/// Header tag for a `KeyProtectedByPassword`'s checksummed ASCII-safe
/// serialization.
pub const VERSION_PASSWORD_KEY: [u8; 4] = [0xDE, 0xF1, 0x00, 0x00];

/// Salt length in bytes, fed into HKDF/PBKDF2 for per-ciphertext subkeys.
pub const SALT_LEN: usize = 32;

/// IV length in bytes: the initial CTR-mode counter value.
pub const IV_LEN: usize = 16;

/// MAC length in bytes: HMAC-SHA256 output, never truncated.
pub const MAC_LEN: usize = 32;

/// Raw key length in bytes.
pub const KEY_LEN: usize = 32;

/// AES-128 block size in bytes; also the CTR counter granularity.
pub const BLOCK_LEN: usize = 16;

/// Derived subkey length (authKey and encKey are each this long). AES-128
/// only consumes the first 16 bytes of encKey; the remainder is reserved by
/// the construction.
pub const DERIVED_KEY_LEN: usize = 32;

/// Minimum size of a valid ciphertext: `VERSION + SALT + IV + MAC`, i.e. an
/// empty plaintext.
pub const MINIMUM_CIPHERTEXT_SIZE: usize = VERSION.len() + SALT_LEN + IV_LEN + MAC_LEN;

/// PBKDF2 iteration count for stretching a password into key material.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Streaming chunk size: must be a multiple of [`BLOCK_LEN`]. Large enough to
/// amortize I/O and hash updates, bounded so memory use stays predictable.
pub const BUFFER_BYTE_SIZE: usize = 1_048_576;

/// HKDF `info` string domain-separating the authentication subkey.
pub const HKDF_INFO_AUTH: &[u8] = b"DefusePHP|V2|KeyForAuthentication";

/// HKDF `info` string domain-separating the encryption subkey.
pub const HKDF_INFO_ENC: &[u8] = b"DefusePHP|V2|KeyForEncryption";

const _: () = assert!(BUFFER_BYTE_SIZE % BLOCK_LEN == 0);
