// Key Material Loader
// Turns key files into engine key handles

pub mod cache;
#[cfg(feature = "decrypt")]
pub mod private;
pub mod public;

pub use cache::PublicKeyCache;
#[cfg(feature = "decrypt")]
pub use private::{load_private_key, parse_private_key};
pub use public::{load_public_key, parse_public_key};
