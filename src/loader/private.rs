// Private key loading
// Password-encrypted PKCS#8 containers, `ENCRYPTED PRIVATE KEY` PEM or raw DER

use std::path::Path;

use rsa::pkcs8::der::SecretDocument;
use rsa::pkcs8::{EncryptedPrivateKeyInfo, PrivateKeyInfo};
use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::RsaPrivateKey;
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::{CryptorError, CryptorResult};
use crate::rsa::bigint::from_bytes;
use crate::rsa::{KeySize, PrivateKey};
use crate::util::file_ops::origin;
use crate::util::{as_pem, read_key_file};

/// Read the encrypted private key at `path` and unwrap it with `password`.
///
/// Every call re-reads and re-decrypts the file; nothing is cached.
pub fn load_private_key(path: &Path, password: &str) -> CryptorResult<PrivateKey> {
    let data = read_key_file(path)?;
    let key = parse_private_key(&data, password, &origin(path))?;
    debug!(path = %path.display(), bits = key.bit_length(), "loaded private key");
    Ok(key)
}

/// Parse and decrypt an encrypted PKCS#8 private key from file contents.
///
/// A container that does not decrypt, or decrypts to something that is not a
/// PKCS#8 document, is `WrongPassword`. A document that decrypts cleanly but
/// holds no usable RSA key is `KeyParseError`.
pub fn parse_private_key(data: &[u8], password: &str, origin: &str) -> CryptorResult<PrivateKey> {
    let pem_doc: SecretDocument;
    let der: &[u8] = match as_pem(data) {
        Some(pem) => {
            let (label, doc) = SecretDocument::from_pem(pem)
                .map_err(|e| CryptorError::parse(origin, format!("invalid PEM: {e}")))?;
            match label {
                "ENCRYPTED PRIVATE KEY" => {}
                "PRIVATE KEY" | "RSA PRIVATE KEY" => {
                    return Err(CryptorError::parse(origin, "private key is not password-protected"));
                }
                other => {
                    return Err(CryptorError::parse(origin, format!("unsupported PEM label {other:?}")));
                }
            }
            pem_doc = doc;
            pem_doc.as_bytes()
        }
        None => data,
    };

    let encrypted = EncryptedPrivateKeyInfo::try_from(der)
        .map_err(|e| CryptorError::parse(origin, format!("not an encrypted PKCS#8 key: {e}")))?;

    let wrong_password = || CryptorError::WrongPassword {
        origin: origin.to_string(),
    };

    let decrypted = encrypted.decrypt(password).map_err(|_| wrong_password())?;
    let info = PrivateKeyInfo::try_from(decrypted.as_bytes()).map_err(|_| wrong_password())?;

    if info.algorithm.oid != rsa::pkcs1::ALGORITHM_OID {
        return Err(CryptorError::parse(
            origin,
            format!("not an RSA private key (algorithm {})", info.algorithm.oid),
        ));
    }

    let rsa_key = RsaPrivateKey::try_from(info)
        .map_err(|e| CryptorError::parse(origin, format!("invalid RSA private key: {e}")))?;
    to_private_key(&rsa_key).map_err(|e| match e {
        CryptorError::KeyParseError { reason, .. } => CryptorError::parse(origin, reason),
        other => other,
    })
}

fn to_private_key(key: &RsaPrivateKey) -> CryptorResult<PrivateKey> {
    let [p, q] = key.primes() else {
        return Err(CryptorError::parse("RSA key components", "only two-prime keys are supported"));
    };

    let d = Zeroizing::new(key.d().to_bytes_be());
    let p = Zeroizing::new(p.to_bytes_be());
    let q = Zeroizing::new(q.to_bytes_be());

    PrivateKey::from_components(
        from_bytes(&key.n().to_bytes_be()),
        from_bytes(&key.e().to_bytes_be()),
        &from_bytes(&d),
        &from_bytes(&p),
        &from_bytes(&q),
    )
}
