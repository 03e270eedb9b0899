//! Core primitives: constant-time comparison, secure randomness, and CTR
//! counter arithmetic. Nothing here branches on secret bytes or uses a
//! table lookup keyed by secret data.

use std::hint::black_box;

use rand::RngCore;

use crate::constants::BLOCK_LEN;
use crate::errors::Error;

/// Compare two byte strings without early exit. Returns true iff the
/// lengths match and every byte is equal. Used for all MAC and checksum
/// checks so that a mismatch is indistinguishable, in timing, from a match
/// at any particular byte position.
///
/// Each XOR is folded through [`black_box`] so the optimizer can't prove the
/// accumulator is redundant and collapse the loop back into a short-circuit
/// comparison.
#[inline]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut diff: u8 = 0;
    for i in 0..a.len() {
        diff |= black_box(a[i] ^ b[i]);
    }
    black_box(diff) == 0
}

/// Fill `n` bytes from the OS CSPRNG. Fails with
/// [`Error::EnvironmentIsBroken`] if the RNG is unavailable.
pub fn random_bytes(n: usize) -> Result<Vec<u8>, Error> {
    let mut buf = vec![0u8; n];
    rand::rngs::OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| Error::EnvironmentIsBroken(format!("RNG unavailable: {e}")))?;
    Ok(buf)
}

/// Fill a fixed-size array from the OS CSPRNG.
pub fn random_array<const N: usize>() -> Result<[u8; N], Error> {
    let mut buf = [0u8; N];
    rand::rngs::OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| Error::EnvironmentIsBroken(format!("RNG unavailable: {e}")))?;
    Ok(buf)
}

/// Increment a 16-byte big-endian counter (the CTR-mode IV) by `inc` blocks,
/// propagating carry from the least-significant byte toward the most
/// significant. `inc` is typically `BUFFER_BYTE_SIZE / 16`, the number of
/// 16-byte blocks encrypted under the current IV value.
///
/// The final iteration of a streaming loop may leave the IV in a value that
/// would be incorrect if reused — this is harmless because no further block
/// is encrypted under it.
///
/// Fails with [`Error::EnvironmentIsBroken`] if the increment overflows the
/// representable 128-bit range: the caller must not encrypt more data than
/// a single IV can address.
pub fn increment_iv(iv: &mut [u8; BLOCK_LEN], inc: u64) -> Result<(), Error> {
    let mut carry = inc as u128;
    for byte in iv.iter_mut().rev() {
        if carry == 0 {
            break;
        }
        let sum = *byte as u128 + (carry & 0xff);
        *byte = (sum & 0xff) as u8;
        carry = (carry >> 8) + (sum >> 8);
    }
    if carry != 0 {
        return Err(Error::EnvironmentIsBroken(
            "IV counter overflow: input too large for a single IV".into(),
        ));
    }
    Ok(())
}
