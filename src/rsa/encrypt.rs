// RSA Encryption Implementation
// Pads one plaintext chunk and applies the public-key transform

use super::bigint::{from_bytes, mod_pow, to_bytes_padded};
use super::keys::{KeySize, PublicKey};
use super::padding::PaddingScheme;
use crate::error::{CryptorError, CryptorResult};

/// Encrypt one plaintext block; the result is exactly `block_size` bytes.
///
/// Fails with `BlockTooLarge` when the block exceeds `max_plaintext_per_block`.
pub fn encrypt_block(
    public_key: &PublicKey,
    plaintext: &[u8],
    padding: PaddingScheme,
) -> CryptorResult<Vec<u8>> {
    let k = public_key.block_size();
    let padded = padding.pad(plaintext, k)?;

    // Compute c = m^e mod n
    let m = from_bytes(&padded);
    let c = mod_pow(&m, public_key.e(), public_key.n());

    // c < n always fits; a miss would mean a broken modulus
    to_bytes_padded(&c, k).ok_or(CryptorError::BlockSizeMismatch {
        len: k + 1,
        expected: k,
    })
}
