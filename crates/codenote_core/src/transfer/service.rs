//! Export/import use-cases over the note store.

use crate::model::code_note::CodeNote;
use crate::model::timestamp;
use crate::store::NoteStore;
use crate::transfer::envelope::{parse_import_document, ExportEnvelope, ExportScope};
use crate::transfer::{TransferError, TransferResult};
use log::{info, warn};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const EXPORT_FILE_PREFIX: &str = "codenotes";
const EXPORT_FILE_TIME_FORMAT: &str = "%Y%m%d_%H%M%S";

/// How imported notes combine with existing ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Skip notes whose id already exists.
    Merge,
    /// Delete every existing note, then add all incoming notes.
    Replace,
    /// Add every incoming note under a fresh id and creation time.
    AddAll,
}

impl ImportMode {
    /// Short description for confirmation prompts.
    pub fn description(self) -> &'static str {
        match self {
            Self::Merge => "Merge - skip duplicate notes",
            Self::Replace => "Replace - clear existing notes",
            Self::AddAll => "Add all - duplicates get new ids",
        }
    }
}

/// Result of an export request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportReport {
    /// The scope held no notes; nothing was written.
    NothingToExport,
    Written { path: PathBuf, count: usize },
}

/// Per-note counts of an applied import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub duplicates: usize,
    pub failed: usize,
}

/// Result of an import request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The document held no notes; the store was not touched.
    NothingFound,
    Completed(ImportReport),
}

/// Export/import facade over a shared [`NoteStore`].
pub struct ImportExportService {
    store: Arc<NoteStore>,
}

impl ImportExportService {
    pub fn new(store: Arc<NoteStore>) -> Self {
        Self { store }
    }

    /// Notes covered by `scope`, newest first.
    pub fn notes_for_scope(&self, scope: &ExportScope) -> Vec<CodeNote> {
        match scope {
            ExportScope::AllNotes => self.store.get_all(),
            ExportScope::CurrentProject {
                project_path: Some(path),
                ..
            } => self.store.get_by_project(path),
            ExportScope::CurrentProject {
                project_path: None, ..
            } => Vec::new(),
        }
    }

    /// Writes the notes of `scope` into `directory` under a generated name.
    ///
    /// # Errors
    /// - Returns `TransferError::Io` when the file cannot be written.
    pub fn export(&self, scope: &ExportScope, directory: &Path) -> TransferResult<ExportReport> {
        let notes = self.notes_for_scope(scope);
        if notes.is_empty() {
            info!(
                "event=notes_export module=transfer status=skip reason=empty scope={}",
                scope.tag()
            );
            return Ok(ExportReport::NothingToExport);
        }

        let envelope = ExportEnvelope::new(scope, notes);
        let content = envelope.to_json()?;
        let path = directory.join(export_file_name(scope));
        fs::write(&path, content).map_err(|source| TransferError::Io {
            path: path.clone(),
            source,
        })?;

        info!(
            "event=notes_export module=transfer status=ok scope={} count={} path={}",
            scope.tag(),
            envelope.total_count,
            path.display()
        );
        Ok(ExportReport::Written {
            path,
            count: envelope.total_count,
        })
    }

    /// Reads and parses an import file without touching the store.
    ///
    /// # Errors
    /// - Returns `TransferError::Io` when the file cannot be read.
    /// - Returns `TransferError::Parse` when it is not a notes document.
    pub fn read_import_file(&self, path: &Path) -> TransferResult<ExportEnvelope> {
        let content = fs::read_to_string(path).map_err(|source| TransferError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let envelope = parse_import_document(&content)?;
        info!(
            "event=import_read module=transfer status=ok version={} count={}",
            envelope.version,
            envelope.notes.len()
        );
        Ok(envelope)
    }

    /// Reads `path` and applies it with `mode`.
    pub fn import_file(&self, path: &Path, mode: ImportMode) -> TransferResult<ImportOutcome> {
        let envelope = self.read_import_file(path)?;
        Ok(self.apply_import(&envelope, mode))
    }

    /// Applies an already parsed envelope to the store.
    pub fn apply_import(&self, envelope: &ExportEnvelope, mode: ImportMode) -> ImportOutcome {
        if envelope.notes.is_empty() {
            info!("event=notes_import module=transfer status=skip reason=empty");
            return ImportOutcome::NothingFound;
        }

        let mut report = ImportReport::default();
        match mode {
            ImportMode::Merge => {
                let existing: HashSet<String> =
                    self.store.get_all().into_iter().map(|note| note.id).collect();
                for note in &envelope.notes {
                    if existing.contains(&note.id) {
                        report.duplicates += 1;
                    } else {
                        self.add_counted(note.clone(), &mut report);
                    }
                }
            }
            ImportMode::Replace => {
                for note in self.store.get_all() {
                    self.store.delete(&note.id);
                }
                for note in &envelope.notes {
                    self.add_counted(note.clone(), &mut report);
                }
            }
            ImportMode::AddAll => {
                for note in &envelope.notes {
                    let mut fresh = note.clone();
                    let now = timestamp::now();
                    fresh.id = CodeNote::generate_id();
                    fresh.created_time = now;
                    fresh.updated_time = fresh.updated_time.max(now);
                    self.add_counted(fresh, &mut report);
                }
            }
        }

        info!(
            "event=notes_import module=transfer status=ok mode={:?} imported={} duplicates={} failed={}",
            mode, report.imported, report.duplicates, report.failed
        );
        ImportOutcome::Completed(report)
    }

    fn add_counted(&self, note: CodeNote, report: &mut ImportReport) {
        match self.store.add(note) {
            Ok(_) => report.imported += 1,
            Err(err) => {
                warn!("event=notes_import module=transfer status=error error={err}");
                report.failed += 1;
            }
        }
    }
}

/// `codenotes[_<project>]_<yyyyMMdd_HHmmss>.json`.
fn export_file_name(scope: &ExportScope) -> String {
    let stamp = timestamp::now().format(EXPORT_FILE_TIME_FORMAT);
    match scope {
        ExportScope::CurrentProject { project_name, .. } if !project_name.trim().is_empty() => {
            let safe_name: String = project_name
                .trim()
                .chars()
                .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
                .collect();
            format!("{EXPORT_FILE_PREFIX}_{safe_name}_{stamp}.json")
        }
        _ => format!("{EXPORT_FILE_PREFIX}_{stamp}.json"),
    }
}

#[cfg(test)]
mod tests {
    use super::export_file_name;
    use crate::transfer::envelope::ExportScope;

    #[test]
    fn export_file_name_embeds_project_and_timestamp() {
        let all = export_file_name(&ExportScope::AllNotes);
        assert!(all.starts_with("codenotes_"));
        assert!(all.ends_with(".json"));
        // codenotes_YYYYMMDD_HHMMSS.json
        assert_eq!(all.len(), "codenotes_".len() + 15 + ".json".len());

        let scoped = export_file_name(&ExportScope::CurrentProject {
            project_name: "demo/app".to_string(),
            project_path: Some("/work/demo".to_string()),
        });
        assert!(scoped.starts_with("codenotes_demo_app_"));
    }
}
