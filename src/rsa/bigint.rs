// RSA Big Integer Operations
// Wrapper around num-bigint for the block transforms

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

/// RSA Big Integer type alias
pub type RsaBigInt = BigUint;

/// Create a big integer from bytes (big-endian)
pub fn from_bytes(bytes: &[u8]) -> RsaBigInt {
    RsaBigInt::from_bytes_be(bytes)
}

/// Convert a big integer to exactly `len` big-endian bytes, left-padded with zeros.
///
/// Returns `None` when the value does not fit.
pub fn to_bytes_padded(n: &RsaBigInt, len: usize) -> Option<Vec<u8>> {
    let bytes = n.to_bytes_be();
    // to_bytes_be yields [0] for zero
    let bytes: &[u8] = if n.is_zero() { &[] } else { &bytes };
    if bytes.len() > len {
        return None;
    }

    let mut out = vec![0u8; len];
    out[len - bytes.len()..].copy_from_slice(bytes);
    Some(out)
}

/// Number of bytes needed to hold `n`
pub fn byte_len(n: &RsaBigInt) -> usize {
    ((n.bits() + 7) / 8) as usize
}

/// Modular exponentiation: base^exp mod modulus
pub fn mod_pow(base: &RsaBigInt, exp: &RsaBigInt, modulus: &RsaBigInt) -> RsaBigInt {
    if modulus.is_one() {
        return RsaBigInt::zero();
    }
    base.modpow(exp, modulus)
}

/// Modular inverse of `a` modulo the prime `p` (Fermat: a^(p-2) mod p).
///
/// Returns `None` if `p` is too small or `a` is a multiple of `p`.
pub fn mod_inverse_prime(a: &RsaBigInt, p: &RsaBigInt) -> Option<RsaBigInt> {
    let two = RsaBigInt::from(2u8);
    if *p <= two || p.is_even() || (a % p).is_zero() {
        return None;
    }
    Some(mod_pow(a, &(p - &two), p))
}
