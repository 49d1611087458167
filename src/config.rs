// Cryptor configuration

use crate::rsa::PaddingScheme;

/// Options shared by both directions. Encryption and decryption of the same
/// data must use the same padding scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CryptorConfig {
    /// Padding applied to every block (PKCS#1 v1.5 by default)
    pub padding: PaddingScheme,
    /// Keep parsed public keys in a shared cache instead of re-reading the file on every call
    pub cache_public_keys: bool,
}

impl CryptorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_padding(mut self, padding: PaddingScheme) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_public_key_cache(mut self, enabled: bool) -> Self {
        self.cache_public_keys = enabled;
        self
    }
}
