// RSA key handles
// Immutable public and private keys in the form the block engine consumes

use std::fmt;

use num_integer::Integer;
use num_traits::One;
#[cfg(feature = "decrypt")]
use num_traits::Zero;
#[cfg(feature = "decrypt")]
use zeroize::Zeroizing;

use super::bigint::{byte_len, RsaBigInt};
#[cfg(feature = "decrypt")]
use super::bigint::{from_bytes, mod_inverse_prime, mod_pow};
use super::padding::PaddingScheme;
use crate::error::{CryptorError, CryptorResult};

const COMPONENTS: &str = "RSA key components";

/// Size queries shared by both key halves
pub trait KeySize {
    /// The modulus
    fn modulus(&self) -> &RsaBigInt;

    /// Modulus size in bytes; every ciphertext block has exactly this length
    fn block_size(&self) -> usize {
        byte_len(self.modulus())
    }

    /// Bit length of the modulus
    fn bit_length(&self) -> u64 {
        self.modulus().bits()
    }
}

/// Modulus size in bytes (e.g. 256 for a 2048-bit key)
pub fn block_size<K: KeySize + ?Sized>(key: &K) -> usize {
    key.block_size()
}

/// Largest plaintext chunk a single block can carry under `padding`.
///
/// Zero when the key is too small for the padding scheme.
pub fn max_plaintext_per_block<K: KeySize + ?Sized>(key: &K, padding: PaddingScheme) -> usize {
    key.block_size().saturating_sub(padding.overhead())
}

/// RSA Public Key
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey {
    n: RsaBigInt, // Modulus
    e: RsaBigInt, // Public exponent
}

impl PublicKey {
    /// Build a public key from its modulus and exponent
    pub fn from_components(n: RsaBigInt, e: RsaBigInt) -> CryptorResult<Self> {
        if n <= RsaBigInt::one() || n.is_even() {
            return Err(CryptorError::parse(COMPONENTS, "modulus must be odd and greater than 1"));
        }
        if e <= RsaBigInt::one() || e >= n {
            return Err(CryptorError::parse(COMPONENTS, "public exponent out of range"));
        }
        Ok(Self { n, e })
    }

    pub fn n(&self) -> &RsaBigInt {
        &self.n
    }

    pub fn e(&self) -> &RsaBigInt {
        &self.e
    }
}

impl KeySize for PublicKey {
    fn modulus(&self) -> &RsaBigInt {
        &self.n
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("bits", &self.bit_length())
            .field("e", &self.e)
            .finish()
    }
}

/// A private integer held as big-endian bytes that are wiped on drop
#[cfg(feature = "decrypt")]
struct SecretInt(Zeroizing<Vec<u8>>);

#[cfg(feature = "decrypt")]
impl SecretInt {
    fn new(value: &RsaBigInt) -> Self {
        Self(Zeroizing::new(value.to_bytes_be()))
    }

    fn value(&self) -> RsaBigInt {
        from_bytes(&self.0)
    }
}

/// Chinese Remainder Theorem parameters materialized for one decryption
#[cfg(feature = "decrypt")]
pub(crate) struct CrtParams {
    pub p: RsaBigInt,
    pub q: RsaBigInt,
    pub d_p: RsaBigInt,   // d mod (p-1)
    pub d_q: RsaBigInt,   // d mod (q-1)
    pub q_inv: RsaBigInt, // q^(-1) mod p
}

/// RSA Private Key
///
/// Private parameters live in zeroize-on-drop buffers. The big integers the
/// engine derives from them per call are not scrubbed.
#[cfg(feature = "decrypt")]
pub struct PrivateKey {
    public: PublicKey,
    p: SecretInt,
    q: SecretInt,
    d_p: SecretInt,
    d_q: SecretInt,
    q_inv: SecretInt,
}

#[cfg(feature = "decrypt")]
impl PrivateKey {
    /// Build a two-prime private key, checking that the components belong together
    pub fn from_components(
        n: RsaBigInt,
        e: RsaBigInt,
        d: &RsaBigInt,
        p: &RsaBigInt,
        q: &RsaBigInt,
    ) -> CryptorResult<Self> {
        let public = PublicKey::from_components(n, e)?;

        if p * q != public.n {
            return Err(CryptorError::parse(COMPONENTS, "primes do not multiply to the modulus"));
        }
        if d.is_zero() || d >= &public.n {
            return Err(CryptorError::parse(COMPONENTS, "private exponent out of range"));
        }

        let d_p = d % (p - 1u8);
        let d_q = d % (q - 1u8);
        let q_inv = mod_inverse_prime(q, p)
            .ok_or_else(|| CryptorError::parse(COMPONENTS, "q has no inverse modulo p"))?;

        // e and d must be inverse exponents
        let probe = RsaBigInt::from(2u8);
        let round = mod_pow(&mod_pow(&probe, &public.e, &public.n), d, &public.n);
        if round != probe {
            return Err(CryptorError::parse(COMPONENTS, "private exponent does not match public exponent"));
        }

        Ok(Self {
            public,
            p: SecretInt::new(p),
            q: SecretInt::new(q),
            d_p: SecretInt::new(&d_p),
            d_q: SecretInt::new(&d_q),
            q_inv: SecretInt::new(&q_inv),
        })
    }

    /// The matching public half
    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    pub(crate) fn crt_params(&self) -> CrtParams {
        CrtParams {
            p: self.p.value(),
            q: self.q.value(),
            d_p: self.d_p.value(),
            d_q: self.d_q.value(),
            q_inv: self.q_inv.value(),
        }
    }
}

#[cfg(feature = "decrypt")]
impl KeySize for PrivateKey {
    fn modulus(&self) -> &RsaBigInt {
        &self.public.n
    }
}

#[cfg(feature = "decrypt")]
impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("bits", &self.bit_length())
            .field("private", &"[REDACTED]")
            .finish()
    }
}
