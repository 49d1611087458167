// Cryptor service
// Path-based string encryption and decryption over the codec

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::codec;
use crate::config::CryptorConfig;
use crate::error::CryptorResult;
use crate::loader::{load_public_key, PublicKeyCache};
#[cfg(feature = "decrypt")]
use crate::loader::load_private_key;

/// Encrypts strings under the public key found at a path
pub trait Encryptor {
    fn encrypt_string(&self, plaintext: &str, public_key_path: &Path) -> CryptorResult<String>;
}

/// Decrypts transport strings with the password-protected private key found at a path
#[cfg(feature = "decrypt")]
pub trait Decryptor {
    fn decrypt_string(
        &self,
        transport: &str,
        private_key_path: &Path,
        password: &str,
    ) -> CryptorResult<String>;
}

/// Stateless apart from its configuration and an optional shared
/// [`PublicKeyCache`]; one instance may serve any number of threads.
#[derive(Debug, Clone, Default)]
pub struct RsaCryptor {
    config: CryptorConfig,
    cache: Option<Arc<PublicKeyCache>>,
}

impl RsaCryptor {
    /// Create a cryptor; a fresh public key cache is attached when the config asks for one
    pub fn new(config: CryptorConfig) -> Self {
        let cache = config
            .cache_public_keys
            .then(|| Arc::new(PublicKeyCache::new()));
        Self { config, cache }
    }

    /// Create a cryptor that shares an existing public key cache
    pub fn with_cache(config: CryptorConfig, cache: Arc<PublicKeyCache>) -> Self {
        Self {
            config: config.with_public_key_cache(true),
            cache: Some(cache),
        }
    }

    pub fn config(&self) -> &CryptorConfig {
        &self.config
    }

    pub fn cache(&self) -> Option<&Arc<PublicKeyCache>> {
        self.cache.as_ref()
    }
}

impl Encryptor for RsaCryptor {
    fn encrypt_string(&self, plaintext: &str, public_key_path: &Path) -> CryptorResult<String> {
        let transport = match &self.cache {
            Some(cache) => {
                let key = cache.get_or_load(public_key_path)?;
                codec::encrypt_string(plaintext, &key, self.config.padding)?
            }
            None => {
                let key = load_public_key(public_key_path)?;
                codec::encrypt_string(plaintext, &key, self.config.padding)?
            }
        };
        debug!(path = %public_key_path.display(), len = transport.len(), "encrypted string");
        Ok(transport)
    }
}

#[cfg(feature = "decrypt")]
impl Decryptor for RsaCryptor {
    fn decrypt_string(
        &self,
        transport: &str,
        private_key_path: &Path,
        password: &str,
    ) -> CryptorResult<String> {
        let key = load_private_key(private_key_path, password)?;
        let plaintext = codec::decrypt_string(transport, &key, self.config.padding)?;
        debug!(path = %private_key_path.display(), "decrypted string");
        Ok(plaintext)
    }
}

/// Encrypt `plaintext` under the public key at `public_key_path` with the default configuration
pub fn encrypt_string(plaintext: &str, public_key_path: impl AsRef<Path>) -> CryptorResult<String> {
    RsaCryptor::default().encrypt_string(plaintext, public_key_path.as_ref())
}

/// Decrypt `transport` with the private key at `private_key_path` with the default configuration
#[cfg(feature = "decrypt")]
pub fn decrypt_string(
    transport: &str,
    private_key_path: impl AsRef<Path>,
    password: &str,
) -> CryptorResult<String> {
    RsaCryptor::default().decrypt_string(transport, private_key_path.as_ref(), password)
}
