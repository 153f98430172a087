//! Navigation from a stored note back to a live editor location.
//!
//! # Responsibility
//! - Parse archive-internal paths (`lib.jar!/a/B.class`).
//! - Resolve a note's file path to an openable target via the host file lookup.
//! - Compute caret line and highlight offsets for the note's line span.
//!
//! # Invariants
//! - Resolution failures are reported as `NavigationError`, never panics.
//! - Highlight offsets are clamped to document bounds.

pub mod archive_path;
pub mod line_index;
pub mod resolver;

pub use archive_path::{
    archive_file_exists, build_archive_url, infer_source_path, is_archive_path, parse_archive_path,
    ArchivePath,
};
pub use line_index::{caret_line, highlight_range, LineIndex, TextRange};
pub use resolver::{
    FileLookup, LocalFileLookup, NavigationError, NavigationPlan, NavigationResolver,
    NavigationTarget,
};
