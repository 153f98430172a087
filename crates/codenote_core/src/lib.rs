//! Core domain logic for CodeNote.
//! This crate is the single source of truth for note invariants; IDE hosts
//! supply editors, trees, keymaps and file systems through traits.

pub mod analysis;
pub mod context;
pub mod logging;
pub mod model;
pub mod navigation;
pub mod search;
pub mod service;
pub mod settings;
pub mod store;
pub mod transfer;

pub use analysis::{CodeAnalyzer, CodeStructureInfo, SourceDialect, SourceTree, SyntaxTree};
pub use context::CodeNoteContext;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::code_note::{CodeNote, NoteId, NoteValidationError};
pub use navigation::{
    FileLookup, LocalFileLookup, NavigationError, NavigationPlan, NavigationResolver,
    NavigationTarget,
};
pub use service::note_service::{
    apply_edits, parse_tags, CaptureError, CapturedSelection, NoteService,
};
pub use settings::{CodeNoteSettings, SettingsError};
pub use store::{NoteStore, StoreConfig, StoreError, StoreEvent, StoreResult};
pub use transfer::{
    ExportEnvelope, ExportReport, ExportScope, ImportExportService, ImportMode, ImportOutcome,
    ImportReport, TransferError,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
