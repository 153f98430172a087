//! Note capture and edit use-cases.
//!
//! # Responsibility
//! - Build new notes from a host selection plus structure metadata.
//! - Apply title/body/tag edits from the note editor.
//!
//! # Invariants
//! - Captured notes always carry a fresh id and equal created/updated times.
//! - Tag input keeps order and duplicates; only blank entries are dropped.

use crate::analysis::CodeStructureInfo;
use crate::model::code_note::{CodeNote, NoteId, DEFAULT_TITLE_PREFIX};
use crate::store::{NoteStore, StoreError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::Arc;

/// Selection reported by the host editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedSelection {
    /// Selected text, stored verbatim.
    pub text: String,
    /// Absolute path of the edited file; may point inside an archive.
    pub file_path: String,
    /// 0-based line of the selection start.
    pub start_line: u32,
    /// 0-based line of the selection end.
    pub end_line: u32,
    /// Base path of the host project, if it has one.
    pub project_base_path: Option<String>,
}

/// Error for capture/edit use-cases.
#[derive(Debug)]
pub enum CaptureError {
    /// Selection text is blank.
    EmptySelection,
    /// Target note does not exist.
    NoteNotFound(NoteId),
    Store(StoreError),
}

impl Display for CaptureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySelection => write!(f, "select some code first"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CaptureError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for CaptureError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Splits comma separated tag input, trimming entries and dropping blanks.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Applies editor fields to `note`; the caller persists the result.
pub fn apply_edits(note: &mut CodeNote, title: &str, body: &str, tags_input: &str) {
    note.title = title.trim().to_string();
    note.note = body.trim().to_string();
    note.tags = parse_tags(tags_input);
}

/// Note service facade over a shared [`NoteStore`].
pub struct NoteService {
    store: Arc<NoteStore>,
}

impl NoteService {
    pub fn new(store: Arc<NoteStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<NoteStore> {
        &self.store
    }

    /// Builds a note for `selection` without storing it.
    ///
    /// # Errors
    /// - Returns `CaptureError::EmptySelection` for blank selected text.
    pub fn capture(
        &self,
        selection: CapturedSelection,
        structure: CodeStructureInfo,
    ) -> Result<CodeNote, CaptureError> {
        if selection.text.trim().is_empty() {
            return Err(CaptureError::EmptySelection);
        }

        let file_name = Path::new(&selection.file_path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| selection.file_path.clone());
        let mut note = CodeNote::new(
            format!("{DEFAULT_TITLE_PREFIX}{file_name}"),
            selection.text,
            selection.file_path,
            selection.start_line + 1,
            selection.end_line.max(selection.start_line) + 1,
            selection.project_base_path.unwrap_or_default(),
        );
        note.id = CodeNote::generate_id();
        note.class_name = structure.class_name;
        note.method_name = structure.method_name;
        note.method_signature = structure.method_signature;
        Ok(note)
    }

    /// Captures `selection` and adds the note to the store.
    pub fn capture_and_save(
        &self,
        selection: CapturedSelection,
        structure: CodeStructureInfo,
    ) -> Result<NoteId, CaptureError> {
        let note = self.capture(selection, structure)?;
        let id = self.store.add(note)?;
        info!("event=note_capture module=service status=ok id={id}");
        Ok(id)
    }

    /// Applies editor fields to the stored note `id`.
    ///
    /// # Errors
    /// - Returns `CaptureError::NoteNotFound` when `id` is absent.
    pub fn edit(
        &self,
        id: &str,
        title: &str,
        body: &str,
        tags_input: &str,
    ) -> Result<CodeNote, CaptureError> {
        let mut note = self
            .store
            .get(id)
            .ok_or_else(|| CaptureError::NoteNotFound(id.to_string()))?;
        apply_edits(&mut note, title, body, tags_input);
        if !self.store.update(id, note)? {
            return Err(CaptureError::NoteNotFound(id.to_string()));
        }
        self.store
            .get(id)
            .ok_or_else(|| CaptureError::NoteNotFound(id.to_string()))
    }
}
