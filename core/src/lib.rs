//! crypto-core
//!
//! Authenticated symmetric encryption for strings and files at rest.
//!
//! One versioned ciphertext format, two secret kinds (a raw 256-bit key or a
//! password), and streaming file encryption for inputs larger than memory.
//! Decryption never releases plaintext before the MAC over the whole
//! ciphertext has been verified.

#![forbid(unsafe_code)]

pub mod constants;
pub mod crypto;
pub mod encoding;
pub mod errors;
pub mod file;
pub mod key;
pub mod key_protected;
pub mod primitives;
pub mod secret;

pub use crypto::{decrypt, encrypt};
pub use errors::Error;
pub use file::{decrypt_file, decrypt_file_path, encrypt_file, encrypt_file_path};
pub use key::Key;
pub use key_protected::KeyProtectedByPassword;
pub use secret::Secret;

/// Re-exports for `use crypto_core::prelude::*;`.
pub mod prelude {
    pub use crate::{
        decrypt, decrypt_file, decrypt_file_path, encrypt, encrypt_file, encrypt_file_path, Error,
        Key, KeyProtectedByPassword, Secret,
    };
}
