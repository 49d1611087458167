pub mod file_ops;

pub use file_ops::{as_pem, read_key_file};
