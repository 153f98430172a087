//! Archive-internal path helpers.
//!
//! Archive paths have the form `/path/to/lib.jar!/internal/path/Foo.class`.
//! The marker is matched case-insensitively.

use std::path::Path;

const ARCHIVE_MARKER: &str = ".jar!";
const ARCHIVE_EXTENSION: &str = "jar";
const COMPILED_EXTENSION: &str = ".class";
const SOURCE_EXTENSION: &str = ".java";

/// An archive file path and the entry path inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivePath {
    /// Path of the archive file itself, e.g. `/x/lib.jar`.
    pub archive_path: String,
    /// Entry path inside the archive, e.g. `com/Foo.class`.
    pub internal_path: String,
}

/// Whether `path` points inside an archive.
pub fn is_archive_path(path: &str) -> bool {
    marker_index(path).is_some()
}

/// Splits an archive-internal path at the first archive marker.
///
/// Returns `None` for plain filesystem paths. A leading `/` on the entry
/// path is dropped.
pub fn parse_archive_path(path: &str) -> Option<ArchivePath> {
    let index = marker_index(path)?;
    let archive_end = index + ARCHIVE_MARKER.len() - 1;
    let archive_path = &path[..archive_end];
    let internal = &path[archive_end + 1..];
    Some(ArchivePath {
        archive_path: archive_path.to_string(),
        internal_path: internal.strip_prefix('/').unwrap_or(internal).to_string(),
    })
}

/// Whether the archive file exists as a regular file with the archive extension.
pub fn archive_file_exists(archive_path: &str) -> bool {
    let path = Path::new(archive_path);
    let has_extension = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(ARCHIVE_EXTENSION));
    has_extension && path.is_file()
}

/// Builds the archive-scheme URL for an entry, `jar:file://<archive>!/<entry>`.
pub fn build_archive_url(archive_path: &str, internal_path: &str) -> String {
    format!("jar:file://{archive_path}!/{internal_path}")
}

/// Infers the source counterpart of a compiled entry (`Foo.class` → `Foo.java`).
///
/// Paths without the compiled extension are returned unchanged.
pub fn infer_source_path(entry_path: &str) -> String {
    match entry_path.strip_suffix(COMPILED_EXTENSION) {
        Some(stem) => format!("{stem}{SOURCE_EXTENSION}"),
        None => entry_path.to_string(),
    }
}

fn marker_index(path: &str) -> Option<usize> {
    // ASCII lowercasing keeps byte offsets aligned with `path`.
    path.to_ascii_lowercase().find(ARCHIVE_MARKER)
}
