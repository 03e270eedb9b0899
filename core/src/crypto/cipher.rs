//! AES-128 in CTR mode. CTR is its own inverse: encrypting and decrypting
//! are the same XOR-with-keystream operation, so one function serves both.

use aes::cipher::{KeyIvInit, StreamCipher};
use aes::Aes128;
use ctr::Ctr128BE;

use crate::constants::BLOCK_LEN;
use crate::errors::Error;

type Aes128Ctr = Ctr128BE<Aes128>;

/// Apply AES-128-CTR keystream to `data`, returning a new buffer. `key` must
/// be exactly 16 bytes (the first 16 bytes of a derived 32-byte encKey);
/// `iv` is the 16-byte initial counter value.
pub fn aes128_ctr_apply(key: &[u8], iv: &[u8; BLOCK_LEN], data: &[u8]) -> Result<Vec<u8>, Error> {
    if key.len() != 16 {
        return Err(Error::EnvironmentIsBroken(format!(
            "AES-128 requires a 16-byte key, got {}",
            key.len()
        )));
    }

    let mut cipher = Aes128Ctr::new(key.into(), iv.into());
    let mut out = data.to_vec();
    cipher.apply_keystream(&mut out);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctr_is_its_own_inverse() {
        let key = [0x11u8; 16];
        let iv = [0x22u8; 16];
        let plaintext = b"the quick brown fox jumps over the lazy dog";

        let ct = aes128_ctr_apply(&key, &iv, plaintext).unwrap();
        let pt = aes128_ctr_apply(&key, &iv, &ct).unwrap();

        assert_ne!(ct, plaintext);
        assert_eq!(pt, plaintext);
    }

    #[test]
    fn ctr_rejects_wrong_key_length() {
        let key = [0u8; 24];
        let iv = [0u8; 16];
        assert!(aes128_ctr_apply(&key, &iv, b"data").is_err());
    }

    #[test]
    fn ctr_handles_empty_input() {
        let key = [0x01u8; 16];
        let iv = [0x02u8; 16];
        assert_eq!(aes128_ctr_apply(&key, &iv, &[]).unwrap(), Vec::<u8>::new());
    }
}
