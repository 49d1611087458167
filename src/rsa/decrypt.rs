// RSA Decryption Implementation
// Implements RSA decryption with Chinese Remainder Theorem (CRT) optimization

use zeroize::Zeroizing;

use super::bigint::{from_bytes, mod_pow, to_bytes_padded, RsaBigInt};
use super::keys::{CrtParams, KeySize, PrivateKey};
use super::padding::PaddingScheme;
use crate::error::{CryptorError, CryptorResult};

/// Decrypt one ciphertext block of exactly `block_size` bytes and strip its padding
pub fn decrypt_block(
    private_key: &PrivateKey,
    ciphertext: &[u8],
    padding: PaddingScheme,
) -> CryptorResult<Zeroizing<Vec<u8>>> {
    let k = private_key.block_size();
    if ciphertext.len() != k {
        return Err(CryptorError::BlockSizeMismatch {
            len: ciphertext.len(),
            expected: k,
        });
    }

    // Not a valid ciphertext representative
    let c = from_bytes(ciphertext);
    if &c >= private_key.modulus() {
        return Err(CryptorError::PaddingInvalid);
    }

    let m = decrypt_crt(&c, &private_key.crt_params());
    let em = Zeroizing::new(to_bytes_padded(&m, k).ok_or(CryptorError::PaddingInvalid)?);

    padding.unpad(&em)
}

/// Decrypt using Chinese Remainder Theorem (CRT), Garner recombination
fn decrypt_crt(c: &RsaBigInt, key: &CrtParams) -> RsaBigInt {
    // m1 = c^d_p mod p
    let m1 = mod_pow(c, &key.d_p, &key.p);

    // m2 = c^d_q mod q
    let m2 = mod_pow(c, &key.d_q, &key.q);

    // h = (m1 - m2) * q_inv mod p, kept non-negative
    let m2_mod_p = &m2 % &key.p;
    let diff = (&m1 + &key.p - m2_mod_p) % &key.p;
    let h = (diff * &key.q_inv) % &key.p;

    // m = m2 + q * h
    m2 + &key.q * h
}
