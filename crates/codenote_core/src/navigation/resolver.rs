//! Resolution of stored file paths to openable targets.
//!
//! # Responsibility
//! - Apply the lookup order for archive-internal and plain paths.
//! - Turn a resolved target plus document text into caret/highlight data.
//!
//! # Invariants
//! - Inside an archive, the inferred source entry is tried before the
//!   compiled entry.
//! - When the archive cannot be opened directly, archive-scheme URLs are
//!   tried for both entries.
//! - Errors are returned, never raised past this boundary.

use crate::model::code_note::CodeNote;
use crate::navigation::archive_path::{
    archive_file_exists, build_archive_url, infer_source_path, parse_archive_path,
};
use crate::navigation::line_index::{caret_line, highlight_range, LineIndex, TextRange};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

const FILE_URL_PREFIX: &str = "file://";
const ARCHIVE_URL_PREFIX: &str = "jar:file://";
const ARCHIVE_URL_SEPARATOR: &str = "!/";

/// Something the host can open in an editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
    LocalFile(PathBuf),
    ArchiveEntry {
        archive_path: PathBuf,
        entry_path: String,
    },
}

/// Navigation failure reported to the user as a warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// Plain path does not exist.
    FileNotFound(String),
    /// Archive file is missing or does not have the archive extension.
    ArchiveNotFound(String),
    /// Neither the source nor the compiled entry could be located.
    EntryNotFound {
        archive_path: String,
        entry_path: String,
    },
    /// The path is blank.
    EmptyPath,
}

impl Display for NavigationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileNotFound(path) => write!(f, "file not found: {path}"),
            Self::ArchiveNotFound(path) => write!(f, "archive not found: {path}"),
            Self::EntryNotFound {
                archive_path,
                entry_path,
            } => write!(f, "entry `{entry_path}` not found in archive {archive_path}"),
            Self::EmptyPath => write!(f, "note has no file path"),
        }
    }
}

impl Error for NavigationError {}

/// Host virtual-file-system lookups.
pub trait FileLookup {
    /// Finds a plain file.
    fn find_local(&self, path: &Path) -> Option<NavigationTarget>;
    /// Whether the archive can be opened directly.
    fn archive_available(&self, archive_path: &Path) -> bool;
    /// Finds an entry inside a directly opened archive.
    fn find_archive_entry(&self, archive_path: &Path, entry_path: &str)
        -> Option<NavigationTarget>;
    /// Finds a target through a `file://` or `jar:file://` URL.
    fn find_by_url(&self, url: &str) -> Option<NavigationTarget>;
}

/// [`FileLookup`] over the local filesystem and zip-format archives.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileLookup;

impl LocalFileLookup {
    /// Reads a target's text, `None` for missing or non-UTF-8 content.
    pub fn read_text(&self, target: &NavigationTarget) -> Option<String> {
        match target {
            NavigationTarget::LocalFile(path) => std::fs::read_to_string(path).ok(),
            NavigationTarget::ArchiveEntry {
                archive_path,
                entry_path,
            } => {
                let mut archive = open_archive(archive_path)?;
                let mut entry = archive.by_name(entry_path).ok()?;
                let mut text = String::new();
                entry.read_to_string(&mut text).ok()?;
                Some(text)
            }
        }
    }
}

impl FileLookup for LocalFileLookup {
    fn find_local(&self, path: &Path) -> Option<NavigationTarget> {
        path.is_file()
            .then(|| NavigationTarget::LocalFile(path.to_path_buf()))
    }

    fn archive_available(&self, archive_path: &Path) -> bool {
        open_archive(archive_path).is_some()
    }

    fn find_archive_entry(
        &self,
        archive_path: &Path,
        entry_path: &str,
    ) -> Option<NavigationTarget> {
        let mut archive = open_archive(archive_path)?;
        let found = archive.by_name(entry_path).is_ok();
        found.then(|| NavigationTarget::ArchiveEntry {
            archive_path: archive_path.to_path_buf(),
            entry_path: entry_path.to_string(),
        })
    }

    fn find_by_url(&self, url: &str) -> Option<NavigationTarget> {
        if let Some(rest) = url.strip_prefix(ARCHIVE_URL_PREFIX) {
            let (archive, entry) = rest.split_once(ARCHIVE_URL_SEPARATOR)?;
            return self.find_archive_entry(Path::new(archive), entry);
        }
        let path = url.strip_prefix(FILE_URL_PREFIX)?;
        self.find_local(Path::new(path))
    }
}

fn open_archive(path: &Path) -> Option<ZipArchive<File>> {
    let file = File::open(path).ok()?;
    ZipArchive::new(file).ok()
}

/// Where to put the caret and what to highlight after opening a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationPlan {
    pub target: NavigationTarget,
    /// 0-based line for the caret.
    pub caret_line: usize,
    /// Full-line span for multi-line notes.
    pub highlight: Option<TextRange>,
}

impl NavigationPlan {
    /// Builds the plan for `note` once the target's document text is known.
    pub fn for_document(target: NavigationTarget, note: &CodeNote, document_text: &str) -> Self {
        let index = LineIndex::new(document_text);
        Self {
            target,
            caret_line: caret_line(note.start_line).min(index.line_count() - 1),
            highlight: highlight_range(&index, note.start_line, note.end_line),
        }
    }

    /// Plan for a target whose text is unavailable: caret only, no highlight.
    pub fn caret_only(target: NavigationTarget, note: &CodeNote) -> Self {
        Self {
            target,
            caret_line: caret_line(note.start_line),
            highlight: None,
        }
    }
}

/// Applies lookup order rules over a host [`FileLookup`].
#[derive(Debug, Clone)]
pub struct NavigationResolver<L: FileLookup> {
    lookup: L,
}

impl<L: FileLookup> NavigationResolver<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Resolves the file of `note`.
    pub fn resolve_note(&self, note: &CodeNote) -> Result<NavigationTarget, NavigationError> {
        let result = self.resolve(&note.file_path);
        match &result {
            Ok(_) => info!(
                "event=navigate_resolve module=navigation status=ok id={}",
                note.id
            ),
            Err(err) => warn!(
                "event=navigate_resolve module=navigation status=error id={} error={}",
                note.id, err
            ),
        }
        result
    }

    /// Resolves a stored file path to an openable target.
    pub fn resolve(&self, file_path: &str) -> Result<NavigationTarget, NavigationError> {
        if file_path.trim().is_empty() {
            return Err(NavigationError::EmptyPath);
        }

        let Some(archive) = parse_archive_path(file_path) else {
            let path = Path::new(file_path);
            if !path.exists() {
                return Err(NavigationError::FileNotFound(file_path.to_string()));
            }
            return self
                .lookup
                .find_local(path)
                .ok_or_else(|| NavigationError::FileNotFound(file_path.to_string()));
        };

        if !archive_file_exists(&archive.archive_path) {
            return Err(NavigationError::ArchiveNotFound(archive.archive_path));
        }

        let source_entry = infer_source_path(&archive.internal_path);
        let archive_file = Path::new(&archive.archive_path);

        let found = if self.lookup.archive_available(archive_file) {
            self.lookup
                .find_archive_entry(archive_file, &source_entry)
                .or_else(|| {
                    self.lookup
                        .find_archive_entry(archive_file, &archive.internal_path)
                })
        } else {
            debug!("event=navigate_resolve module=navigation status=retry via=url");
            self.lookup
                .find_by_url(&build_archive_url(&archive.archive_path, &source_entry))
                .or_else(|| {
                    self.lookup.find_by_url(&build_archive_url(
                        &archive.archive_path,
                        &archive.internal_path,
                    ))
                })
        };

        found.ok_or(NavigationError::EntryNotFound {
            archive_path: archive.archive_path,
            entry_path: archive.internal_path,
        })
    }
}
