use tracing::debug;
use winreg::{enums::*, RegKey, RegValue};

use super::{BlobStore, RegistryError};

/// Store writing REG_BINARY values under a key below HKEY_LOCAL_MACHINE.
/// The key handle is closed when the store is dropped.
pub struct RegistryStore {
    key: RegKey,
}

impl RegistryStore {
    /// Opens `path` under HKLM, creating it if absent. Requires a security
    /// context allowed to write the machine hive.
    pub fn create_under_hklm(path: &str) -> Result<Self, RegistryError> {
        let hklm = RegKey::predef(HKEY_LOCAL_MACHINE);
        let (key, _disposition) = hklm.create_subkey(path)?;
        debug!(r"opened HKLM\{path}");
        Ok(Self { key })
    }
}

impl BlobStore for RegistryStore {
    fn write_blob(&mut self, name: &str, bytes: &[u8]) -> Result<(), RegistryError> {
        let value = RegValue {
            bytes: bytes.to_vec(),
            vtype: REG_BINARY,
        };
        self.key.set_raw_value(name, &value)?;
        Ok(())
    }
}
