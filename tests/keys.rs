use std::fs;
use std::path::{Path, PathBuf};

use rsacryptor::loader::{load_public_key, parse_public_key, PublicKeyCache};
use rsacryptor::rsa::{block_size, max_plaintext_per_block};
use rsacryptor::{encrypt_string, CryptorError, ErrorClass, KeySize, PaddingScheme};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn test_public_key_geometry() {
    let key = load_public_key(&fixture("public_cert.pem")).unwrap();
    assert_eq!(key.bit_length(), 2048);
    assert_eq!(block_size(&key), 256);
    assert_eq!(max_plaintext_per_block(&key, PaddingScheme::Pkcs1v15), 245);
    assert_eq!(max_plaintext_per_block(&key, PaddingScheme::OaepSha256), 190);
}

#[test]
fn test_missing_key_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.pem");

    let err = encrypt_string("hello", &missing).unwrap_err();
    match &err {
        CryptorError::KeyNotFound { path, .. } => assert_eq!(path, &missing),
        other => panic!("expected KeyNotFound, got {other:?}"),
    }
    assert_eq!(err.class(), ErrorClass::KeyFile);

    // A directory cannot be read as a key either
    assert!(matches!(
        load_public_key(dir.path()),
        Err(CryptorError::KeyNotFound { .. })
    ));
}

#[test]
fn test_unparseable_public_keys() {
    for name in ["garbage.pem", "private_key.pem", "unencrypted_private_key.pem"] {
        match load_public_key(&fixture(name)) {
            Err(CryptorError::KeyParseError { origin, .. }) => {
                assert!(origin.ends_with(name), "{origin}")
            }
            other => panic!("{name}: expected KeyParseError, got {other:?}"),
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let empty = dir.path().join("empty.pem");
    fs::write(&empty, b"").unwrap();
    assert!(matches!(
        load_public_key(&empty),
        Err(CryptorError::KeyParseError { .. })
    ));
}

#[test]
fn test_pem_with_surrounding_whitespace() {
    let pem = fs::read_to_string(fixture("public_key.pem")).unwrap();
    let padded = format!("\n\n  {pem}\n\n");
    let key = parse_public_key(padded.as_bytes(), "padded").unwrap();
    assert_eq!(key, load_public_key(&fixture("public_key.pem")).unwrap());

    // Blank lines after the end boundary, as editors leave them
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cert.pem");
    let cert = fs::read_to_string(fixture("public_cert.pem")).unwrap();
    fs::write(&path, format!("{cert}\n\n")).unwrap();
    assert_eq!(load_public_key(&path).unwrap(), key);
}

#[test]
fn test_cache_shared_between_paths() {
    let cache = PublicKeyCache::new();
    let cert = cache.get_or_load(&fixture("public_cert.pem")).unwrap();
    let spki = cache.get_or_load(&fixture("public_key.pem")).unwrap();
    assert_eq!(*cert, *spki);
    assert_eq!(cache.len(), 2);
}

#[cfg(feature = "decrypt")]
mod private {
    use super::*;
    use rsacryptor::loader::load_private_key;

    const PASSWORD: &str = "correct horse battery staple";

    #[test]
    fn test_private_key_matches_certificate() {
        let private = load_private_key(&fixture("private_key.pem"), PASSWORD).unwrap();
        let public = load_public_key(&fixture("public_cert.pem")).unwrap();
        assert_eq!(private.public_key(), &public);
        assert_eq!(private.block_size(), 256);

        let other = load_private_key(&fixture("other_private_key.pem"), PASSWORD).unwrap();
        assert_ne!(other.public_key(), &public);
    }

    #[test]
    fn test_private_key_errors() {
        let err = load_private_key(&fixture("private_key.der"), "wrong").unwrap_err();
        assert!(matches!(err, CryptorError::WrongPassword { .. }));

        for name in [
            "public_cert.pem",
            "garbage.pem",
            "unencrypted_private_key.pem",
            "ec_private_key.pem",
        ] {
            let err = load_private_key(&fixture(name), PASSWORD).unwrap_err();
            assert!(
                matches!(err, CryptorError::KeyParseError { .. }),
                "{name}: {err:?}"
            );
        }

        assert!(matches!(
            load_private_key(&fixture("missing.pem"), PASSWORD),
            Err(CryptorError::KeyNotFound { .. })
        ));
    }

    #[test]
    fn test_private_key_with_trailing_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("private.pem");
        let pem = fs::read_to_string(fixture("private_key.pem")).unwrap();
        fs::write(&path, format!("\r\n{pem}\n\n\r\n")).unwrap();

        let private = load_private_key(&path, PASSWORD).unwrap();
        let public = load_public_key(&fixture("public_cert.pem")).unwrap();
        assert_eq!(private.public_key(), &public);
    }

    #[test]
    fn test_debug_output_is_redacted() {
        let private = load_private_key(&fixture("private_key.pem"), PASSWORD).unwrap();
        let debug = format!("{private:?}");
        assert!(debug.contains("REDACTED"), "{debug}");
    }
}
