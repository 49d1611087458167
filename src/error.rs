// Error types shared by the loader, the block engine and the codec

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for every fallible rsacryptor operation
pub type CryptorResult<T> = Result<T, CryptorError>;

/// Errors raised while loading keys, transforming blocks or coding strings.
///
/// Every error is terminal for the call that raised it. No variant carries
/// plaintext or key bytes.
#[derive(Debug, Error)]
pub enum CryptorError {
    #[error("key file {} not found or unreadable: {source}", path.display())]
    KeyNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot parse key from {origin}: {reason}")]
    KeyParseError { origin: String, reason: String },

    #[error("wrong password for private key {origin}")]
    WrongPassword { origin: String },

    #[error("plaintext block too large: max {max} bytes, got {len}")]
    BlockTooLarge { len: usize, max: usize },

    #[error("ciphertext block size mismatch: expected {expected} bytes, got {len}")]
    BlockSizeMismatch { len: usize, expected: usize },

    #[error("invalid padding (corrupt ciphertext, wrong key or padding scheme mismatch)")]
    PaddingInvalid,

    #[error("malformed ciphertext: {0}")]
    MalformedCiphertext(String),

    #[error("decrypted plaintext is not valid UTF-8 (valid up to byte {valid_up_to})")]
    InvalidUtf8 { valid_up_to: usize },
}

/// Coarse grouping of errors by what the caller has to change to succeed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The key file is missing, unreadable or not a key
    KeyFile,
    /// The password or the key itself does not match the data
    Credentials,
    /// The ciphertext was truncated, tampered with or produced differently
    Ciphertext,
    /// The caller asked for something the key cannot do
    Usage,
}

impl CryptorError {
    pub fn class(&self) -> ErrorClass {
        match self {
            CryptorError::KeyNotFound { .. } | CryptorError::KeyParseError { .. } => {
                ErrorClass::KeyFile
            }
            CryptorError::WrongPassword { .. } => ErrorClass::Credentials,
            // A wrong key and a corrupt block are indistinguishable after the RSA transform
            CryptorError::PaddingInvalid | CryptorError::InvalidUtf8 { .. } => {
                ErrorClass::Ciphertext
            }
            CryptorError::MalformedCiphertext(_) | CryptorError::BlockSizeMismatch { .. } => {
                ErrorClass::Ciphertext
            }
            CryptorError::BlockTooLarge { .. } => ErrorClass::Usage,
        }
    }

    pub(crate) fn parse(origin: impl Into<String>, reason: impl ToString) -> Self {
        CryptorError::KeyParseError {
            origin: origin.into(),
            reason: reason.to_string(),
        }
    }
}
