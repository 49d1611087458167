//! rsacryptor: encrypt arbitrary-length UTF-8 text under an RSA public key and
//! recover it with the matching password-protected private key.
//!
//! Plaintext is split into chunks that fit one RSA block, each chunk is padded
//! and encrypted independently, and the concatenated blocks travel as a single
//! base64 string.
//!
//! ```no_run
//! use rsacryptor::{decrypt_string, encrypt_string};
//!
//! let transport = encrypt_string("hello", "keys/public_cert.pem")?;
//! let plaintext = decrypt_string(&transport, "keys/private_key.pem", "secret")?;
//! assert_eq!(plaintext, "hello");
//! # Ok::<(), rsacryptor::CryptorError>(())
//! ```
//!
//! Private-key handling is behind the default `decrypt` feature.

pub mod codec;
pub mod config;
pub mod cryptor;
pub mod error;
pub mod loader;
pub mod rsa;
pub mod util;

pub use config::CryptorConfig;
#[cfg(feature = "decrypt")]
pub use cryptor::{decrypt_string, Decryptor};
pub use cryptor::{encrypt_string, Encryptor, RsaCryptor};
pub use error::{CryptorError, CryptorResult, ErrorClass};
pub use loader::PublicKeyCache;
#[cfg(feature = "decrypt")]
pub use crate::rsa::PrivateKey;
pub use crate::rsa::{KeySize, PaddingScheme, PublicKey};
