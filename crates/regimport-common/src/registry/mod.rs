use thiserror::Error;

use crate::identity::Sid;

pub mod memory;
#[cfg(windows)]
pub mod windows;

/// Registry subtree CryptoPro keeps per-user settings under.
pub const SETTINGS_ROOT: &str = r"Software\Crypto Pro\Settings\Users";

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("registry access is only available on windows")]
    Unsupported,
}

/// Path of the key holding a container's values, relative to HKLM:
/// `Software\Crypto Pro\Settings\Users\{sid}\Keys\{key_name}`.
pub fn user_keys_path(sid: &Sid, key_name: &str) -> String {
    format!(r"{SETTINGS_ROOT}\{sid}\Keys\{key_name}")
}

/// Minimal sink for imported key material. The one non-portable surface of
/// the tool lives behind this trait; everything else is plain filesystem
/// and parsing code.
pub trait BlobStore {
    fn write_blob(&mut self, name: &str, bytes: &[u8]) -> Result<(), RegistryError>;
}
