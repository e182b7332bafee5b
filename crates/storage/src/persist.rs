//! On-disk cache of known-good snapshots, so a dashboard can render
//! before its first fetch completes.

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;

use crate::error::StoreError;
use crate::snapshot::Snapshot;

/// Write atomically: encode into a temp file beside `path`, then rename over it.
pub fn save_snapshot<E: Serialize>(path: &Path, snapshot: &Snapshot<E>) -> Result<(), StoreError> {
    let bytes = snapshot.to_msgpack()?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
    Ok(())
}

/// `Ok(None)` when no cache has been written yet.
pub fn load_snapshot<E: DeserializeOwned>(path: &Path) -> Result<Option<Snapshot<E>>, StoreError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(Snapshot::from_msgpack(&bytes)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
