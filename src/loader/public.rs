// Public key loading
// X.509 certificates, SubjectPublicKeyInfo and PKCS#1, PEM-armored or raw DER

use std::path::Path;

use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::der::Document;
use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;
use rsa::RsaPublicKey;
use tracing::debug;
use x509_cert::der::{Decode, Encode};
use x509_cert::Certificate;

use crate::error::{CryptorError, CryptorResult};
use crate::rsa::bigint::from_bytes;
use crate::rsa::{KeySize, PublicKey};
use crate::util::file_ops::origin;
use crate::util::{as_pem, read_key_file};

/// Read and parse the public key file at `path`. Every call re-reads the file.
pub fn load_public_key(path: &Path) -> CryptorResult<PublicKey> {
    let data = read_key_file(path)?;
    let key = parse_public_key(&data, &origin(path))?;
    debug!(path = %path.display(), bits = key.bit_length(), "loaded public key");
    Ok(key)
}

/// Parse a public key from file contents; `origin` names the source in errors
pub fn parse_public_key(data: &[u8], origin: &str) -> CryptorResult<PublicKey> {
    let parsed = match as_pem(data) {
        Some(pem) => {
            let (label, doc) = Document::from_pem(pem)
                .map_err(|e| CryptorError::parse(origin, format!("invalid PEM: {e}")))?;
            match label {
                "CERTIFICATE" => from_certificate(doc.as_bytes()),
                "PUBLIC KEY" => from_spki(doc.as_bytes()),
                "RSA PUBLIC KEY" => from_pkcs1(doc.as_bytes()),
                other => Err(format!("unsupported PEM label {other:?}")),
            }
        }
        None => from_certificate(data)
            .or_else(|_| from_spki(data))
            .or_else(|_| from_pkcs1(data))
            .map_err(|_| {
                "not a DER certificate, SubjectPublicKeyInfo or PKCS#1 public key".to_string()
            }),
    };

    let rsa_key = parsed.map_err(|reason| CryptorError::parse(origin, reason))?;
    to_public_key(&rsa_key).map_err(|e| match e {
        CryptorError::KeyParseError { reason, .. } => CryptorError::parse(origin, reason),
        other => other,
    })
}

fn from_certificate(der: &[u8]) -> Result<RsaPublicKey, String> {
    let cert = Certificate::from_der(der).map_err(|e| format!("invalid X.509 certificate: {e}"))?;
    let spki = cert
        .tbs_certificate
        .subject_public_key_info
        .to_der()
        .map_err(|e| format!("invalid certificate public key: {e}"))?;
    from_spki(&spki).map_err(|e| format!("certificate subject key: {e}"))
}

fn from_spki(der: &[u8]) -> Result<RsaPublicKey, String> {
    RsaPublicKey::from_public_key_der(der).map_err(|e| format!("not an RSA SubjectPublicKeyInfo: {e}"))
}

fn from_pkcs1(der: &[u8]) -> Result<RsaPublicKey, String> {
    RsaPublicKey::from_pkcs1_der(der).map_err(|e| format!("not a PKCS#1 RSA public key: {e}"))
}

fn to_public_key(key: &RsaPublicKey) -> CryptorResult<PublicKey> {
    PublicKey::from_components(from_bytes(&key.n().to_bytes_be()), from_bytes(&key.e().to_bytes_be()))
}
