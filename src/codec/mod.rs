// Codec - block chunking and transport encoding
// Transport: base64 (standard, padded, one line) of block_0 || block_1 || ..., no header

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{debug, trace};
#[cfg(feature = "decrypt")]
use zeroize::Zeroizing;

#[cfg(feature = "decrypt")]
use crate::rsa::{decrypt_block, PrivateKey};
use crate::error::{CryptorError, CryptorResult};
use crate::rsa::{encrypt_block, max_plaintext_per_block, KeySize, PaddingScheme, PublicKey};

/// Split plaintext into ordered chunks of at most `max` bytes.
///
/// Empty input yields exactly one empty chunk so that it still round-trips.
pub fn split_plaintext(bytes: &[u8], max: usize) -> CryptorResult<Vec<&[u8]>> {
    if max == 0 {
        return Err(CryptorError::BlockTooLarge {
            len: bytes.len(),
            max,
        });
    }
    if bytes.is_empty() {
        return Ok(vec![bytes]);
    }
    Ok(bytes.chunks(max).collect())
}

/// Split decoded ciphertext into ordered blocks of exactly `block_size` bytes
pub fn split_ciphertext(bytes: &[u8], block_size: usize) -> CryptorResult<Vec<&[u8]>> {
    if bytes.is_empty() {
        return Err(CryptorError::MalformedCiphertext("no ciphertext blocks".to_string()));
    }
    if block_size == 0 || bytes.len() % block_size != 0 {
        return Err(CryptorError::MalformedCiphertext(format!(
            "{} bytes is not a multiple of the {block_size}-byte block size",
            bytes.len()
        )));
    }
    Ok(bytes.chunks(block_size).collect())
}

/// Binary ciphertext to its transport string
pub fn encode_transport(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Transport string back to binary ciphertext
pub fn decode_transport(text: &str) -> CryptorResult<Vec<u8>> {
    STANDARD
        .decode(text)
        .map_err(|e| CryptorError::MalformedCiphertext(format!("invalid base64: {e}")))
}

/// Encrypt arbitrary-length bytes block by block; all blocks or an error
pub fn encrypt_bytes(
    plaintext: &[u8],
    public_key: &PublicKey,
    padding: PaddingScheme,
) -> CryptorResult<Vec<u8>> {
    let k = public_key.block_size();
    let chunks = split_plaintext(plaintext, max_plaintext_per_block(public_key, padding))?;

    let mut ciphertext = Vec::with_capacity(chunks.len() * k);
    for (index, chunk) in chunks.iter().enumerate() {
        trace!(index, len = chunk.len(), "encrypting block");
        ciphertext.extend_from_slice(&encrypt_block(public_key, chunk, padding)?);
    }

    debug!(
        blocks = chunks.len(),
        block_size = k,
        padding = padding.name(),
        "encrypted plaintext"
    );
    Ok(ciphertext)
}

/// Encrypt a UTF-8 string to a base64 transport string
pub fn encrypt_string(
    plaintext: &str,
    public_key: &PublicKey,
    padding: PaddingScheme,
) -> CryptorResult<String> {
    let ciphertext = encrypt_bytes(plaintext.as_bytes(), public_key, padding)?;
    Ok(encode_transport(&ciphertext))
}

/// Decrypt concatenated ciphertext blocks back into plaintext bytes
#[cfg(feature = "decrypt")]
pub fn decrypt_bytes(
    ciphertext: &[u8],
    private_key: &PrivateKey,
    padding: PaddingScheme,
) -> CryptorResult<Zeroizing<Vec<u8>>> {
    let k = private_key.block_size();
    let blocks = split_ciphertext(ciphertext, k)?;

    let mut plaintext = Zeroizing::new(Vec::with_capacity(blocks.len() * k));
    for (index, block) in blocks.iter().enumerate() {
        trace!(index, "decrypting block");
        plaintext.extend_from_slice(&decrypt_block(private_key, block, padding)?);
    }

    debug!(
        blocks = blocks.len(),
        block_size = k,
        padding = padding.name(),
        "decrypted ciphertext"
    );
    Ok(plaintext)
}

/// Decrypt a base64 transport string back into the original UTF-8 string
#[cfg(feature = "decrypt")]
pub fn decrypt_string(
    transport: &str,
    private_key: &PrivateKey,
    padding: PaddingScheme,
) -> CryptorResult<String> {
    let ciphertext = decode_transport(transport)?;
    let plaintext = decrypt_bytes(&ciphertext, private_key, padding)?;

    let text = std::str::from_utf8(&plaintext).map_err(|e| CryptorError::InvalidUtf8 {
        valid_up_to: e.valid_up_to(),
    })?;
    Ok(text.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::public_key;
    #[cfg(feature = "decrypt")]
    use crate::test_support::private_key;

    #[test]
    fn test_split_plaintext() {
        let data = [7u8; 10];
        let chunks = split_plaintext(&data, 4).unwrap();
        assert_eq!(chunks.iter().map(|c| c.len()).collect::<Vec<_>>(), vec![4, 4, 2]);

        let exact = split_plaintext(&data, 5).unwrap();
        assert_eq!(exact.len(), 2);

        let empty = split_plaintext(b"", 4).unwrap();
        assert_eq!(empty, vec![&b""[..]]);

        assert!(matches!(
            split_plaintext(&data, 0),
            Err(CryptorError::BlockTooLarge { len: 10, max: 0 })
        ));
    }

    #[test]
    fn test_split_ciphertext() {
        let data = [1u8; 512];
        assert_eq!(split_ciphertext(&data, 256).unwrap().len(), 2);

        assert!(matches!(
            split_ciphertext(&data[..511], 256),
            Err(CryptorError::MalformedCiphertext(_))
        ));
        assert!(matches!(
            split_ciphertext(&[], 256),
            Err(CryptorError::MalformedCiphertext(_))
        ));
    }

    #[test]
    fn test_transport_encoding() {
        let encoded = encode_transport(&[0xFB; 300]);
        assert!(!encoded.contains('\n'));
        assert_eq!(decode_transport(&encoded).unwrap(), vec![0xFB; 300]);

        for bad in ["not base64!", "QUJD\nREVG", "QUJDR"] {
            assert!(matches!(
                decode_transport(bad),
                Err(CryptorError::MalformedCiphertext(_))
            ));
        }
    }

    #[test]
    fn test_block_count() {
        let key = public_key();
        // 2048-bit key, PKCS#1 v1.5: 245 bytes per block
        let ciphertext = encrypt_bytes(&[b'A'; 500], key, PaddingScheme::Pkcs1v15).unwrap();
        assert_eq!(ciphertext.len(), 3 * 256);

        let ciphertext = encrypt_bytes(&[b'A'; 490], key, PaddingScheme::Pkcs1v15).unwrap();
        assert_eq!(ciphertext.len(), 2 * 256);

        let ciphertext = encrypt_bytes(b"", key, PaddingScheme::Pkcs1v15).unwrap();
        assert_eq!(ciphertext.len(), 256);
    }

    #[cfg(feature = "decrypt")]
    #[test]
    fn test_string_roundtrip() {
        let key = private_key();
        for text in ["", "hello", "héllo wörld ✓ 日本語 🎉"] {
            for padding in [PaddingScheme::Pkcs1v15, PaddingScheme::OaepSha256] {
                let transport = encrypt_string(text, key.public_key(), padding).unwrap();
                assert_eq!(decrypt_string(&transport, key, padding).unwrap(), text);
            }
        }
    }

    #[cfg(feature = "decrypt")]
    #[test]
    fn test_invalid_utf8() {
        let key = private_key();
        let ciphertext =
            encrypt_bytes(b"ok\xFF\xFE", key.public_key(), PaddingScheme::Pkcs1v15).unwrap();
        let transport = encode_transport(&ciphertext);
        assert!(matches!(
            decrypt_string(&transport, key, PaddingScheme::Pkcs1v15),
            Err(CryptorError::InvalidUtf8 { valid_up_to: 2 })
        ));
    }
}
