//! JSON file helpers
//!
//! Writes go to a sibling temp file that is synced and renamed over the
//! target, so a crash leaves either the old or the new contents.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::PocketError;

/// Read JSON from `path`, or `T::default()` if the file doesn't exist yet
pub fn read_json<T, P>(path: P) -> Result<T, PocketError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => {
            return Err(PocketError::Storage(format!(
                "Failed to open {}: {}",
                path.display(),
                e
            )))
        }
    };

    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| PocketError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write `data` as pretty JSON, replacing `path` atomically
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), PocketError>
where
    T: Serialize + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            PocketError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension("json.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| PocketError::Storage(format!("Failed to create temp file: {}", e)))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| PocketError::Storage(format!("Failed to serialize data: {}", e)))?;
    writer
        .flush()
        .and_then(|_| writer.get_ref().sync_all())
        .map_err(|e| PocketError::Storage(format!("Failed to flush {}: {}", temp_path.display(), e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        PocketError::Storage(format!("Failed to replace {}: {}", path.display(), e))
    })
}
