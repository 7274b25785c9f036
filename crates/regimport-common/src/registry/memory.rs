use std::collections::BTreeMap;

use super::{BlobStore, RegistryError};

/// In-memory store, used by tests and by platforms without a registry.
/// Matches registry semantics: writing an existing name overwrites it.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.values.get(name).map(Vec::as_slice)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl BlobStore for MemoryStore {
    fn write_blob(&mut self, name: &str, bytes: &[u8]) -> Result<(), RegistryError> {
        self.values.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_overwrites_existing_name() {
        let mut store = MemoryStore::new();
        store.write_blob("primary.key", b"old").unwrap();
        store.write_blob("primary.key", b"new").unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("primary.key"), Some(&b"new"[..]));
    }
}
