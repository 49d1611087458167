// OAEP padding (RFC 8017 section 7.1) with SHA-256 and MGF1-SHA-256, empty label

use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::{ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroizing;

use crate::error::{CryptorError, CryptorResult};

const HASH_LEN: usize = 32;

/// 2·hLen + 2 bytes of every block
pub const OAEP_SHA256_OVERHEAD: usize = 2 * HASH_LEN + 2;

/// Encode `data` as 0x00 || maskedSeed || maskedDB, `k` bytes in total
pub fn pad_oaep_sha256(data: &[u8], k: usize) -> CryptorResult<Vec<u8>> {
    let max = k.saturating_sub(OAEP_SHA256_OVERHEAD);
    if k < OAEP_SHA256_OVERHEAD || data.len() > max {
        return Err(CryptorError::BlockTooLarge {
            len: data.len(),
            max,
        });
    }

    let label_hash = Sha256::digest(b"");

    // DB = lHash || PS || 0x01 || M
    let db_len = k - HASH_LEN - 1;
    let mut db = Zeroizing::new(Vec::with_capacity(db_len));
    db.extend_from_slice(&label_hash);
    db.resize(db_len - data.len() - 1, 0x00);
    db.push(0x01);
    db.extend_from_slice(data);

    let mut seed = Zeroizing::new([0u8; HASH_LEN]);
    rand::thread_rng().fill_bytes(&mut seed[..]);

    mgf1_xor(&mut db[..], &seed[..]);
    mgf1_xor(&mut seed[..], &db[..]);

    let mut em = Vec::with_capacity(k);
    em.push(0x00);
    em.extend_from_slice(&seed[..]);
    em.extend_from_slice(&db);
    Ok(em)
}

/// Decode an OAEP encoded message; every failure is the same `PaddingInvalid`
pub fn unpad_oaep_sha256(em: &[u8]) -> CryptorResult<Zeroizing<Vec<u8>>> {
    let k = em.len();
    if k < OAEP_SHA256_OVERHEAD {
        return Err(CryptorError::PaddingInvalid);
    }

    let mut seed = Zeroizing::new([0u8; HASH_LEN]);
    seed.copy_from_slice(&em[1..1 + HASH_LEN]);
    let mut db = Zeroizing::new(em[1 + HASH_LEN..].to_vec());

    mgf1_xor(&mut seed[..], &db[..]);
    mgf1_xor(&mut db[..], &seed[..]);

    let label_hash = Sha256::digest(b"");
    let hash_ok = db[..HASH_LEN].ct_eq(label_hash.as_slice());
    let leading_zero = em[0].ct_eq(&0x00);

    // PS is all zeros up to the 0x01 marker
    let mut looking = subtle::Choice::from(1u8);
    let mut stray = subtle::Choice::from(0u8);
    let mut marker = 0u32;
    for (i, byte) in db.iter().enumerate().skip(HASH_LEN) {
        let is_zero = byte.ct_eq(&0x00);
        let is_one = byte.ct_eq(&0x01);
        marker = u32::conditional_select(&marker, &(i as u32), looking & is_one);
        stray |= looking & !is_zero & !is_one;
        looking &= !is_one;
    }

    let valid = leading_zero & hash_ok & !stray & !looking;
    if bool::from(valid) {
        Ok(Zeroizing::new(db[marker as usize + 1..].to_vec()))
    } else {
        Err(CryptorError::PaddingInvalid)
    }
}

/// XOR `out` with MGF1-SHA256(seed, out.len())
fn mgf1_xor(out: &mut [u8], seed: &[u8]) {
    for (counter, chunk) in out.chunks_mut(HASH_LEN).enumerate() {
        let mut hasher = Sha256::new();
        hasher.update(seed);
        hasher.update((counter as u32).to_be_bytes());
        let mask = hasher.finalize();
        for (b, m) in chunk.iter_mut().zip(mask.iter()) {
            *b ^= m;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_structure() {
        let em = pad_oaep_sha256(b"Hello", 256).unwrap();
        assert_eq!(em.len(), 256);
        assert_eq!(em[0], 0x00);
    }

    #[test]
    fn test_roundtrip_sizes() {
        // 2048-bit key: 256 - 66 = 190 bytes max
        for len in [0usize, 1, 32, 189, 190] {
            let data = vec![0x5Au8; len];
            let em = pad_oaep_sha256(&data, 256).unwrap();
            assert_eq!(unpad_oaep_sha256(&em).unwrap().as_slice(), data.as_slice());
        }
    }

    #[test]
    fn test_too_large() {
        assert!(matches!(
            pad_oaep_sha256(&[0u8; 191], 256),
            Err(CryptorError::BlockTooLarge { len: 191, max: 190 })
        ));
        // 512-bit key is too small for OAEP-SHA256 padding of anything
        assert!(matches!(
            pad_oaep_sha256(b"", 64),
            Err(CryptorError::BlockTooLarge { len: 0, max: 0 })
        ));
    }

    #[test]
    fn test_tampered() {
        let em = pad_oaep_sha256(b"tamper me", 128).unwrap();
        for index in [0usize, 1, 40, 127] {
            let mut bad = em.clone();
            bad[index] ^= 0x01;
            assert!(matches!(unpad_oaep_sha256(&bad), Err(CryptorError::PaddingInvalid)));
        }
    }

    #[test]
    fn test_mgf1_known_prefix() {
        // MGF1 is a pure function of its seed
        let mut a = [0u8; 40];
        let mut b = [0u8; 40];
        mgf1_xor(&mut a, b"seed");
        mgf1_xor(&mut b, b"seed");
        assert_eq!(a, b);
        assert_eq!(&a[..32], Sha256::digest(b"seed\x00\x00\x00\x00").as_slice());
    }
}
