// ── Gzip'd JSON snapshots ──
//
// Both caches (raw BECS object set, NetBox device mirror) persist as
// gzip-compressed JSON so a full refresh can be skipped across runs.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CoreError;

fn snapshot_err(path: &Path, err: impl std::fmt::Display) -> CoreError {
    CoreError::Snapshot {
        message: format!("{}: {err}", path.display()),
    }
}

/// Serialize `value` to `path` as gzip'd JSON, creating parent
/// directories as needed.
pub fn save<T: Serialize>(path: &Path, value: &T) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| snapshot_err(path, e))?;
    }
    let file = File::create(path).map_err(|e| snapshot_err(path, e))?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    serde_json::to_writer(&mut encoder, value).map_err(|e| snapshot_err(path, e))?;
    // Dropping the encoder would swallow write errors; finish the gzip
    // stream and flush the buffer explicitly so a short write surfaces
    // here instead of as a decode error on the next run.
    let writer = encoder.finish().map_err(|e| snapshot_err(path, e))?;
    writer
        .into_inner()
        .map_err(|e| snapshot_err(path, e.into_error()))?;
    Ok(())
}

/// Deserialize a value previously written by [`save`].
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T, CoreError> {
    let file = File::open(path).map_err(|e| snapshot_err(path, e))?;
    let decoder = GzDecoder::new(BufReader::new(file));
    serde_json::from_reader(decoder).map_err(|e| snapshot_err(path, e))
}

/// Whether a snapshot exists at `path`.
pub fn exists(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn round_trips_through_gzip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cache.json.gz");

        let mut value = BTreeMap::new();
        value.insert("sw1".to_owned(), 42_i64);
        save(&path, &value).unwrap();
        assert!(exists(&path));

        let loaded: BTreeMap<String, i64> = load(&path).unwrap();
        assert_eq!(loaded, value);
    }

    #[test]
    fn save_reports_write_failures() {
        let dir = tempfile::tempdir().unwrap();
        // The target path is occupied by a directory.
        let err = save(dir.path(), &vec![1_i64]).unwrap_err();
        assert!(matches!(err, CoreError::Snapshot { .. }));
    }

    #[test]
    fn missing_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load::<Vec<i64>>(&dir.path().join("absent.json.gz")).unwrap_err();
        assert!(matches!(err, CoreError::Snapshot { .. }));
    }
}
