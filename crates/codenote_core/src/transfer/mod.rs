//! Import and export of note collections.
//!
//! # Responsibility
//! - Wrap notes in a versioned envelope and write it to a user-chosen directory.
//! - Read envelopes (or legacy bare note lists) and apply them to the store.
//!
//! # Invariants
//! - Empty exports and empty imports perform no I/O and no mutation.
//! - A failing note never aborts the rest of an import; it is counted.

pub mod envelope;
pub mod service;

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub use envelope::{parse_import_document, ExportEnvelope, ExportScope, ENVELOPE_VERSION};
pub use service::{ExportReport, ImportExportService, ImportMode, ImportOutcome, ImportReport};

pub type TransferResult<T> = Result<T, TransferError>;

/// Error for export/import file handling.
#[derive(Debug)]
pub enum TransferError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Document is neither an envelope nor a legacy note list.
    Parse(serde_json::Error),
    Serialize(serde_json::Error),
}

impl Display for TransferError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot access `{}`: {source}", path.display()),
            Self::Parse(err) => write!(f, "unrecognized notes document: {err}"),
            Self::Serialize(err) => write!(f, "cannot serialize notes: {err}"),
        }
    }
}

impl Error for TransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) | Self::Serialize(err) => Some(err),
        }
    }
}
