// RSA Module - Block Cipher Engine
// Single-block transforms, key handles and padding schemes

pub mod bigint;
#[cfg(feature = "decrypt")]
pub mod decrypt;
pub mod encrypt;
pub mod keys;
pub mod oaep;
pub mod padding;

#[cfg(feature = "decrypt")]
pub use decrypt::decrypt_block;
pub use encrypt::encrypt_block;
#[cfg(feature = "decrypt")]
pub use keys::PrivateKey;
pub use keys::{block_size, max_plaintext_per_block, KeySize, PublicKey};
pub use padding::PaddingScheme;
