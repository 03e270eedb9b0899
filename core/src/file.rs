//! Streaming encrypt/decrypt for inputs larger than memory.
//!
//! Decryption runs a strict two-pass protocol (see [`decrypt_file`]): pass 1
//! verifies the whole-file MAC and records a per-chunk MAC checkpoint list,
//! pass 2 re-derives each chunk's incremental MAC and compares it against
//! the recorded checkpoint before decrypting and writing that chunk. An
//! attacker who mutates the input between the two passes is caught before
//! any plaintext derived from the mutated region is written.

use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::constants::{BLOCK_LEN, BUFFER_BYTE_SIZE, IV_LEN, MAC_LEN, MINIMUM_CIPHERTEXT_SIZE, SALT_LEN, VERSION};
use crate::crypto::cipher::aes128_ctr_apply;
use crate::crypto::new_mac;
use crate::errors::Error;
use crate::primitives::{constant_time_eq, increment_iv, random_array};
use crate::secret::Secret;

const BLOCKS_PER_BUFFER: u64 = (BUFFER_BYTE_SIZE / BLOCK_LEN) as u64;

/// Encrypt everything readable from `input` into `output` under `secret`.
/// `input`/`output` must be distinct resources; the filename-form wrapper
/// [`encrypt_file_path`] enforces this by `realpath`.
pub fn encrypt_file<R: Read, W: Write>(
    mut input: R,
    mut output: W,
    secret: &Secret,
) -> Result<(), Error> {
    let salt: [u8; SALT_LEN] = random_array()?;
    let mut iv: [u8; IV_LEN] = random_array()?;
    let (auth_key, enc_key) = secret.derive_keys(&salt)?;
    let enc_key = &enc_key[..BLOCK_LEN];

    output.write_all(&VERSION)?;
    output.write_all(&salt)?;
    output.write_all(&iv)?;

    let mut hmac = new_mac(&auth_key)?;
    hmac.update(&VERSION);
    hmac.update(&salt);
    hmac.update(&iv);

    let mut buf = vec![0u8; BUFFER_BYTE_SIZE];
    loop {
        let n = read_up_to(&mut input, &mut buf)?;
        if n == 0 {
            break;
        }
        let chunk = &buf[..n];
        let ct = aes128_ctr_apply(enc_key, &iv, chunk)?;
        output.write_all(&ct)?;
        hmac.update(&ct);

        if n < buf.len() {
            break;
        }
        increment_iv(&mut iv, BLOCKS_PER_BUFFER)?;
    }

    let mac = hmac.finalize();
    output.write_all(&mac)?;
    Ok(())
}

/// Decrypt `input` into `output` under `secret` using the two-pass protocol.
/// `input` must be seekable; non-seekable sources are rejected by the
/// `Seek` bound at compile time rather than at runtime.
pub fn decrypt_file<R: Read + Seek, W: Write>(
    mut input: R,
    mut output: W,
    secret: &Secret,
) -> Result<(), Error> {
    let total_len = input.seek(SeekFrom::End(0))?;
    if total_len < MINIMUM_CIPHERTEXT_SIZE as u64 {
        return Err(Error::WrongKeyOrModifiedCiphertext);
    }

    input.seek(SeekFrom::Start(0))?;
    let mut version = [0u8; 4];
    input.read_exact(&mut version)?;
    if version != VERSION {
        return Err(Error::WrongKeyOrModifiedCiphertext);
    }
    let mut salt = [0u8; SALT_LEN];
    input.read_exact(&mut salt)?;
    let mut iv = [0u8; IV_LEN];
    input.read_exact(&mut iv)?;

    let header_len = (4 + SALT_LEN + IV_LEN) as u64;
    let cipher_len = total_len - header_len - MAC_LEN as u64;
    let cipher_start = header_len;

    input.seek(SeekFrom::End(-(MAC_LEN as i64)))?;
    let mut stored_mac = [0u8; MAC_LEN];
    input.read_exact(&mut stored_mac)?;

    let (auth_key, enc_key) = secret.derive_keys(&salt)?;
    let enc_key = &enc_key[..BLOCK_LEN];

    // Pass 1: verify the whole-file MAC, recording a per-chunk checkpoint.
    input.seek(SeekFrom::Start(cipher_start))?;
    let mut hmac = new_mac(&auth_key)?;
    hmac.update(&version);
    hmac.update(&salt);
    hmac.update(&iv);
    let mut hmac2 = hmac.clone();

    let mut checkpoints: Vec<[u8; MAC_LEN]> = Vec::new();
    let mut remaining = cipher_len;
    let mut buf = vec![0u8; BUFFER_BYTE_SIZE];
    while remaining > 0 {
        let want = remaining.min(BUFFER_BYTE_SIZE as u64) as usize;
        input.read_exact(&mut buf[..want])?;
        hmac.update(&buf[..want]);
        checkpoints.push(hmac.clone_finalize());
        remaining -= want as u64;
    }

    let final_mac = hmac.finalize();
    if !constant_time_eq(&final_mac, &stored_mac) {
        return Err(Error::WrongKeyOrModifiedCiphertext);
    }

    // Pass 2: recheck each chunk's incremental MAC before decrypting it.
    input.seek(SeekFrom::Start(cipher_start))?;
    let mut checkpoints = checkpoints.into_iter();
    let mut remaining = cipher_len;
    while remaining > 0 {
        let want = remaining.min(BUFFER_BYTE_SIZE as u64) as usize;
        input.read_exact(&mut buf[..want])?;
        hmac2.update(&buf[..want]);
        let running_mac = hmac2.clone_finalize();

        let expected = checkpoints
            .next()
            .ok_or(Error::WrongKeyOrModifiedCiphertext)?;
        if !constant_time_eq(&running_mac, &expected) {
            return Err(Error::WrongKeyOrModifiedCiphertext);
        }

        let pt = aes128_ctr_apply(enc_key, &iv, &buf[..want])?;
        output.write_all(&pt)?;

        remaining -= want as u64;
        if remaining > 0 {
            increment_iv(&mut iv, BLOCKS_PER_BUFFER)?;
        }
    }

    Ok(())
}

/// Encrypt the file at `in_path` into `out_path`. Rejects the two paths when
/// their canonicalized forms are identical.
pub fn encrypt_file_path(in_path: &Path, out_path: &Path, secret: &Secret) -> Result<(), Error> {
    reject_aliased_paths(in_path, out_path)?;
    let input = std::fs::File::open(in_path)?;
    let output = std::fs::File::create(out_path)?;
    encrypt_file(input, output, secret)
}

/// Decrypt the file at `in_path` into `out_path`. Rejects the two paths when
/// their canonicalized forms are identical.
pub fn decrypt_file_path(in_path: &Path, out_path: &Path, secret: &Secret) -> Result<(), Error> {
    reject_aliased_paths(in_path, out_path)?;
    let input = std::fs::File::open(in_path)?;
    let output = std::fs::File::create(out_path)?;
    decrypt_file(input, output, secret)
}

fn reject_aliased_paths(in_path: &Path, out_path: &Path) -> Result<(), Error> {
    if let (Ok(a), Ok(b)) = (in_path.canonicalize(), out_path.canonicalize()) {
        if a == b {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "input and output paths refer to the same file",
            )));
        }
    }
    Ok(())
}

/// Read until `buf` is full or the stream is exhausted, returning the number
/// of bytes actually read. Unlike `Read::read`, this never returns a short
/// read purely because the underlying reader chose to.
fn read_up_to<R: Read>(input: &mut R, buf: &mut [u8]) -> Result<usize, std::io::Error> {
    let mut filled = 0;
    while filled < buf.len() {
        match input.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Key;
    use std::io::Cursor;

    fn key_secret() -> Secret {
        Secret::Key(Key::random().unwrap())
    }

    #[test]
    fn roundtrip_small_file() {
        let secret = key_secret();
        let plaintext = b"a file smaller than one chunk".to_vec();

        let mut ciphertext = Vec::new();
        encrypt_file(Cursor::new(&plaintext), &mut ciphertext, &secret).unwrap();

        let mut decrypted = Vec::new();
        decrypt_file(Cursor::new(&ciphertext), &mut decrypted, &secret).unwrap();

        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn roundtrip_empty_file() {
        let secret = key_secret();
        let mut ciphertext = Vec::new();
        encrypt_file(Cursor::new(&[] as &[u8]), &mut ciphertext, &secret).unwrap();

        let mut decrypted = Vec::new();
        decrypt_file(Cursor::new(&ciphertext), &mut decrypted, &secret).unwrap();
        assert!(decrypted.is_empty());
    }

    #[test]
    fn roundtrip_spans_multiple_buffers() {
        let secret = key_secret();
        let plaintext: Vec<u8> = (0..(BUFFER_BYTE_SIZE * 3 + 777))
            .map(|i| (i % 251) as u8)
            .collect();

        let mut ciphertext = Vec::new();
        encrypt_file(Cursor::new(&plaintext), &mut ciphertext, &secret).unwrap();

        let mut decrypted = Vec::new();
        decrypt_file(Cursor::new(&ciphertext), &mut decrypted, &secret).unwrap();

        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn tampering_mid_file_is_detected_and_nothing_is_emitted() {
        let secret = key_secret();
        let plaintext: Vec<u8> = (0..(BUFFER_BYTE_SIZE * 2)).map(|i| (i % 256) as u8).collect();

        let mut ciphertext = Vec::new();
        encrypt_file(Cursor::new(&plaintext), &mut ciphertext, &secret).unwrap();

        let mid = ciphertext.len() / 2;
        ciphertext[mid] ^= 0x01;

        let mut decrypted = Vec::new();
        let result = decrypt_file(Cursor::new(&ciphertext), &mut decrypted, &secret);
        assert!(matches!(result, Err(Error::WrongKeyOrModifiedCiphertext)));
        assert!(decrypted.is_empty());
    }

    #[test]
    fn truncated_file_is_rejected() {
        let secret = key_secret();
        let short = vec![0u8; MINIMUM_CIPHERTEXT_SIZE - 1];
        let mut decrypted = Vec::new();
        assert!(matches!(
            decrypt_file(Cursor::new(&short), &mut decrypted, &secret),
            Err(Error::WrongKeyOrModifiedCiphertext)
        ));
    }

    #[test]
    fn wrong_secret_fails_file_decrypt() {
        let secret_a = key_secret();
        let secret_b = key_secret();
        let plaintext = b"some bytes".to_vec();

        let mut ciphertext = Vec::new();
        encrypt_file(Cursor::new(&plaintext), &mut ciphertext, &secret_a).unwrap();

        let mut decrypted = Vec::new();
        assert!(matches!(
            decrypt_file(Cursor::new(&ciphertext), &mut decrypted, &secret_b),
            Err(Error::WrongKeyOrModifiedCiphertext)
        ));
    }
}
