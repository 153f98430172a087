//! Partition file layout and JSON document I/O.
//!
//! Layout under the storage root:
//!
//! ```text
//! <root>/codenotes.json               default partition (and legacy single file)
//! <root>/<project dir name>/codenotes.json
//! ```
//!
//! A partition is identified by its key: the project directory name, or the
//! empty string for the default partition.

use crate::model::code_note::CodeNote;
use crate::search::matcher::sort_newest_first;
use crate::store::error::{StoreError, StoreResult};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of every partition document.
pub const STORAGE_FILE_NAME: &str = "codenotes.json";

const TEMP_SUFFIX: &str = ".tmp";

/// Key of the default partition.
pub const DEFAULT_PARTITION: &str = "";

/// Returns the partition key for an owning project path.
///
/// Blank paths and paths without a final component fall into the default
/// partition.
pub fn partition_key(project_path: &str) -> String {
    if project_path.trim().is_empty() {
        return DEFAULT_PARTITION.to_string();
    }
    Path::new(project_path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Returns the document path for a partition key.
pub fn partition_file(root: &Path, key: &str) -> PathBuf {
    if key.is_empty() {
        root.join(STORAGE_FILE_NAME)
    } else {
        root.join(key).join(STORAGE_FILE_NAME)
    }
}

/// Lists partition documents present under `root` as `(key, path)` pairs.
///
/// The root-level document comes first, then project directories in name
/// order. Directories without a document are skipped.
pub fn discover_partitions(root: &Path) -> StoreResult<Vec<(String, PathBuf)>> {
    let mut found = Vec::new();
    if !root.is_dir() {
        return Ok(found);
    }

    let root_file = partition_file(root, DEFAULT_PARTITION);
    if root_file.is_file() {
        found.push((DEFAULT_PARTITION.to_string(), root_file));
    }

    let entries = fs::read_dir(root).map_err(|source| StoreError::Io {
        path: root.to_path_buf(),
        source,
    })?;
    let mut project_dirs = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        let file = path.join(STORAGE_FILE_NAME);
        if file.is_file() {
            project_dirs.push((name, file));
        }
    }
    project_dirs.sort_by(|left, right| left.0.cmp(&right.0));
    found.extend(project_dirs);
    Ok(found)
}

/// Reads one partition document.
///
/// A blank document is an empty partition.
pub fn read_partition_file(path: &Path) -> StoreResult<Vec<CodeNote>> {
    let content = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&content).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Overwrites one partition document with `notes`, newest first.
///
/// The document is written to a sibling temp file and renamed into place so
/// readers never observe a half-written partition.
pub fn write_partition_file(path: &Path, mut notes: Vec<CodeNote>) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    sort_newest_first(&mut notes);
    let content = serde_json::to_string_pretty(&notes).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(TEMP_SUFFIX);
    let temp_path = PathBuf::from(temp_name);
    fs::write(&temp_path, content).map_err(|source| StoreError::Io {
        path: temp_path.clone(),
        source,
    })?;
    fs::rename(&temp_path, path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}
