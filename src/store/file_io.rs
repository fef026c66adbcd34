//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't corrupt data on failure. Used for
//! both the local record snapshot and exported backup files.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::WellplanError;

/// Read JSON from a file, returning a default value if file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<T, WellplanError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path)
        .map_err(|e| WellplanError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| WellplanError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write JSON to a file atomically (write to temp, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), WellplanError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    write_atomic(path.as_ref(), |writer| {
        serde_json::to_writer_pretty(writer, data)
            .map_err(|e| WellplanError::Storage(format!("Failed to serialize data: {}", e)))
    })
}

/// Write text to a file atomically (write to temp, then rename)
pub fn write_text_atomic<P: AsRef<Path>>(path: P, text: &str) -> Result<(), WellplanError> {
    write_atomic(path.as_ref(), |writer| {
        writer
            .write_all(text.as_bytes())
            .map_err(|e| WellplanError::Storage(format!("Failed to write data: {}", e)))
    })
}

/// The file is either completely written or not modified at all
fn write_atomic<F>(path: &Path, write: F) -> Result<(), WellplanError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), WellplanError>,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            WellplanError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Temp file must live in the same directory for the rename to be atomic
    let temp_path = temp_path_for(path);

    let file = File::create(&temp_path)
        .map_err(|e| WellplanError::Storage(format!("Failed to create temp file: {}", e)))?;
    let mut writer = BufWriter::new(file);

    let result = write(&mut writer)
        .and_then(|_| {
            writer
                .flush()
                .map_err(|e| WellplanError::Storage(format!("Failed to flush data: {}", e)))
        })
        .and_then(|_| {
            writer
                .get_ref()
                .sync_all()
                .map_err(|e| WellplanError::Storage(format!("Failed to sync data: {}", e)))
        });
    drop(writer);

    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        WellplanError::Storage(format!("Failed to rename temp file: {}", e))
    })
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
