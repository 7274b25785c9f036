use std::fs;

use anyhow::Context;
use regimport_common::{container::KeyContainer, registry::BlobStore};
use tracing::info;

use crate::error::Error;

/// Copies every `*.key` file of the container into the store, value name
/// equal to the file's base name, contents byte-for-byte. Any read or write
/// failure aborts the run. Returns the number of values written.
pub fn import_container<S: BlobStore>(
    container: &KeyContainer,
    store: &mut S,
) -> Result<usize, Error> {
    let mut imported = 0;
    for path in container.key_files()? {
        info!("importing {}", path.display());

        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| Error::InvalidFileName(path.clone()))?;
        let data =
            fs::read(&path).with_context(|| format!("reading {}", path.display()))?;

        store.write_blob(name, &data)?;
        imported += 1;
    }
    Ok(imported)
}
