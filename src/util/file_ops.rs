// File Operations for key material
// Reads key files and tells PEM text apart from raw DER

use std::fs::File;
use std::io::Read;
use std::path::Path;

use zeroize::Zeroizing;

use crate::error::{CryptorError, CryptorResult};

/// Key files larger than this are not keys
pub const MAX_KEY_FILE_SIZE: u64 = 1024 * 1024;

/// Read an entire key file into a buffer that is wiped on drop.
///
/// Any failure to open or read the file is `KeyNotFound`.
pub fn read_key_file(path: &Path) -> CryptorResult<Zeroizing<Vec<u8>>> {
    let not_found = |source| CryptorError::KeyNotFound {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(not_found)?;
    let size = file.metadata().map_err(not_found)?.len();
    if size > MAX_KEY_FILE_SIZE {
        return Err(CryptorError::parse(
            origin(path),
            format!("file is {size} bytes, larger than any key"),
        ));
    }

    let mut data = Zeroizing::new(Vec::with_capacity(size as usize));
    file.read_to_end(&mut data).map_err(not_found)?;
    Ok(data)
}

/// The PEM text of `data` if it is PEM-armored, `None` for binary DER.
///
/// Blank lines and whitespace around the armor are dropped; the decoder
/// accepts nothing after the end boundary but a single line ending.
pub fn as_pem(data: &[u8]) -> Option<&str> {
    let text = std::str::from_utf8(data).ok()?;
    let trimmed = text.trim();
    trimmed.starts_with("-----BEGIN ").then_some(trimmed)
}

/// How a key file is named in errors and logs
pub fn origin(path: &Path) -> String {
    path.display().to_string()
}
