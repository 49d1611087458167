// Encryption padding schemes
// PKCS#1 v1.5 (EME-PKCS1-v1_5) and the scheme selector shared by both sides

use rand::RngCore;
use subtle::{ConditionallySelectable, ConstantTimeEq, ConstantTimeLess};
use zeroize::Zeroizing;

use super::oaep;
use crate::error::{CryptorError, CryptorResult};

/// Bytes PKCS#1 v1.5 adds to every block: 0x00 0x02, 8 random bytes minimum, 0x00
pub const PKCS1_V15_OVERHEAD: usize = 11;

/// Padding applied before the raw RSA transform.
///
/// Both sides of an exchange must use the same scheme; a mismatch decrypts
/// as `PaddingInvalid`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PaddingScheme {
    /// PKCS#1 v1.5 encryption padding
    #[default]
    Pkcs1v15,
    /// OAEP with SHA-256, MGF1-SHA-256 and an empty label
    OaepSha256,
}

impl PaddingScheme {
    /// Bytes of every block consumed by the padding
    pub const fn overhead(self) -> usize {
        match self {
            PaddingScheme::Pkcs1v15 => PKCS1_V15_OVERHEAD,
            PaddingScheme::OaepSha256 => oaep::OAEP_SHA256_OVERHEAD,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            PaddingScheme::Pkcs1v15 => "PKCS#1 v1.5",
            PaddingScheme::OaepSha256 => "OAEP-SHA256",
        }
    }

    /// Pad `data` into an encoded message of exactly `k` bytes
    pub fn pad(self, data: &[u8], k: usize) -> CryptorResult<Vec<u8>> {
        match self {
            PaddingScheme::Pkcs1v15 => pad_pkcs1_v15(data, k),
            PaddingScheme::OaepSha256 => oaep::pad_oaep_sha256(data, k),
        }
    }

    /// Validate and strip the padding from an encoded message
    pub fn unpad(self, em: &[u8]) -> CryptorResult<Zeroizing<Vec<u8>>> {
        match self {
            PaddingScheme::Pkcs1v15 => unpad_pkcs1_v15(em),
            PaddingScheme::OaepSha256 => oaep::unpad_oaep_sha256(em),
        }
    }
}

/// PKCS#1 v1.5 Padding for encryption
/// Format: 0x00 || 0x02 || PS || 0x00 || data
/// PS = padding string of non-zero random bytes (at least 8 bytes)
pub fn pad_pkcs1_v15(data: &[u8], k: usize) -> CryptorResult<Vec<u8>> {
    let max = k.saturating_sub(PKCS1_V15_OVERHEAD);
    if k < PKCS1_V15_OVERHEAD || data.len() > max {
        return Err(CryptorError::BlockTooLarge {
            len: data.len(),
            max,
        });
    }

    let ps_len = k - data.len() - 3;
    let mut padding = vec![0u8; ps_len];
    non_zero_random_bytes(&mut padding);

    let mut result = Vec::with_capacity(k);
    result.push(0x00);
    result.push(0x02);
    result.extend_from_slice(&padding);
    result.push(0x00);
    result.extend_from_slice(data);

    Ok(result)
}

/// Remove PKCS#1 v1.5 padding from a decrypted block.
///
/// All structural checks run without early exit and fail with the same error.
pub fn unpad_pkcs1_v15(em: &[u8]) -> CryptorResult<Zeroizing<Vec<u8>>> {
    if em.len() < PKCS1_V15_OVERHEAD {
        return Err(CryptorError::PaddingInvalid);
    }

    let header_ok = em[0].ct_eq(&0x00) & em[1].ct_eq(&0x02);

    // Position of the first zero byte after the header
    let mut looking = subtle::Choice::from(1u8);
    let mut separator = 0u32;
    for (i, byte) in em.iter().enumerate().skip(2) {
        let is_zero = byte.ct_eq(&0x00);
        separator = u32::conditional_select(&separator, &(i as u32), looking & is_zero);
        looking &= !is_zero;
    }

    // 0x00 0x02 plus at least 8 padding bytes before the separator
    let long_enough = !separator.ct_lt(&10u32);
    let valid = header_ok & !looking & long_enough;

    if bool::from(valid) {
        Ok(Zeroizing::new(em[separator as usize + 1..].to_vec()))
    } else {
        Err(CryptorError::PaddingInvalid)
    }
}

fn non_zero_random_bytes(buf: &mut [u8]) {
    let mut rng = rand::thread_rng();
    rng.fill_bytes(buf);
    for byte in buf.iter_mut() {
        while *byte == 0 {
            let mut one = [0u8; 1];
            rng.fill_bytes(&mut one);
            *byte = one[0];
        }
    }
}
