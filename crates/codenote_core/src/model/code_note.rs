//! Code note domain model.
//!
//! # Responsibility
//! - Define the canonical annotation record attached to a captured code span.
//! - Provide display projections used by list/tree views.
//!
//! # Invariants
//! - `id` is never rewritten once the store has assigned it.
//! - `end_line` should not be earlier than `start_line`.
//! - `updated_time` should not be earlier than `created_time`.

use crate::model::timestamp;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque identifier of one note.
///
/// Kept as a plain string because imported documents may carry ids that were
/// not generated as UUIDs.
pub type NoteId = String;

/// Title prefix used when a note has no explicit title.
pub const DEFAULT_TITLE_PREFIX: &str = "Snippet - ";

/// Validation error for note invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    /// `end_line` is before `start_line`.
    InvertedLineRange { start_line: u32, end_line: u32 },
    /// `updated_time` is before `created_time`.
    UpdatedBeforeCreated {
        created_time: NaiveDateTime,
        updated_time: NaiveDateTime,
    },
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvertedLineRange {
                start_line,
                end_line,
            } => write!(
                f,
                "end_line ({end_line}) must be >= start_line ({start_line})"
            ),
            Self::UpdatedBeforeCreated {
                created_time,
                updated_time,
            } => write!(
                f,
                "updated_time ({}) must be >= created_time ({})",
                timestamp::format(updated_time),
                timestamp::format(created_time)
            ),
        }
    }
}

impl Error for NoteValidationError {}

/// One user-authored annotation of a code span.
///
/// Serialized with camelCase keys; optional fields default when absent so
/// documents written by older versions still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeNote {
    /// Empty until the store assigns one.
    pub id: NoteId,
    pub title: String,
    /// Verbatim captured source text.
    pub content: String,
    /// Absolute path; may point inside an archive (`lib.jar!/a/B.class`).
    pub file_path: String,
    /// 1-based, inclusive.
    pub start_line: u32,
    /// 1-based, inclusive.
    pub end_line: u32,
    /// Owning project base path. Empty means the default partition.
    pub project_path: String,
    /// Free-text note body.
    #[serde(default)]
    pub note: String,
    /// Ordered tags; uniqueness is not enforced.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub method_name: Option<String>,
    #[serde(default)]
    pub method_signature: Option<String>,
    #[serde(with = "timestamp", default = "timestamp::now")]
    pub created_time: NaiveDateTime,
    #[serde(with = "timestamp", default = "timestamp::now")]
    pub updated_time: NaiveDateTime,
}

impl CodeNote {
    /// Creates a note for a captured span with an empty id and both
    /// timestamps set to now.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        file_path: impl Into<String>,
        start_line: u32,
        end_line: u32,
        project_path: impl Into<String>,
    ) -> Self {
        let now = timestamp::now();
        Self {
            id: NoteId::new(),
            title: title.into(),
            content: content.into(),
            file_path: file_path.into(),
            start_line,
            end_line,
            project_path: project_path.into(),
            note: String::new(),
            tags: Vec::new(),
            class_name: None,
            method_name: None,
            method_signature: None,
            created_time: now,
            updated_time: now,
        }
    }

    /// Generates a fresh opaque note id.
    pub fn generate_id() -> NoteId {
        Uuid::new_v4().to_string()
    }

    /// Validates line-range and timestamp ordering invariants.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.end_line < self.start_line {
            return Err(NoteValidationError::InvertedLineRange {
                start_line: self.start_line,
                end_line: self.end_line,
            });
        }
        if self.updated_time < self.created_time {
            return Err(NoteValidationError::UpdatedBeforeCreated {
                created_time: self.created_time,
                updated_time: self.updated_time,
            });
        }
        Ok(())
    }

    /// `"<file_path>:<start_line>-<end_line>"`.
    pub fn location_info(&self) -> String {
        format!("{}:{}-{}", self.file_path, self.start_line, self.end_line)
    }

    /// File path relative to the owning project, or the full path when the
    /// file lives outside it.
    pub fn relative_path(&self) -> &str {
        match self.file_path.strip_prefix(self.project_path.as_str()) {
            Some(rest) if !self.project_path.is_empty() => {
                rest.strip_prefix('/').unwrap_or(rest)
            }
            _ => self.file_path.as_str(),
        }
    }

    /// Title for list rendering; falls back to the relative path.
    pub fn display_title(&self) -> String {
        if self.title.trim().is_empty() {
            format!("{DEFAULT_TITLE_PREFIX}{}", self.relative_path())
        } else {
            self.title.clone()
        }
    }

    /// Enclosing class and method, space separated. Empty when neither is known.
    pub fn structure_summary(&self) -> String {
        let mut parts = Vec::with_capacity(2);
        if let Some(class_name) = &self.class_name {
            parts.push(class_name.as_str());
        }
        if let Some(method_name) = &self.method_name {
            parts.push(self.method_signature.as_deref().unwrap_or(method_name));
        }
        parts.join(" ")
    }

    /// Whether the note spans more than one line.
    pub fn is_multi_line(&self) -> bool {
        self.start_line != self.end_line
    }
}

#[cfg(test)]
mod tests {
    use super::{CodeNote, NoteValidationError};
    use chrono::Duration;

    fn sample() -> CodeNote {
        CodeNote::new(
            "",
            "fn main() {}",
            "/work/app/src/main.rs",
            3,
            5,
            "/work/app",
        )
    }

    #[test]
    fn relative_path_strips_project_prefix() {
        let note = sample();
        assert_eq!(note.relative_path(), "src/main.rs");
        assert_eq!(note.display_title(), "Snippet - src/main.rs");
    }

    #[test]
    fn relative_path_keeps_foreign_paths() {
        let mut note = sample();
        note.file_path = "/opt/lib.jar!/com/Foo.class".to_string();
        assert_eq!(note.relative_path(), "/opt/lib.jar!/com/Foo.class");

        note.project_path.clear();
        assert_eq!(note.relative_path(), "/opt/lib.jar!/com/Foo.class");
    }

    #[test]
    fn structure_summary_prefers_signature() {
        let mut note = sample();
        assert_eq!(note.structure_summary(), "");

        note.class_name = Some("Parser".to_string());
        note.method_name = Some("parse".to_string());
        assert_eq!(note.structure_summary(), "Parser parse");

        note.method_signature = Some("parse(...)".to_string());
        assert_eq!(note.structure_summary(), "Parser parse(...)");
    }

    #[test]
    fn validate_rejects_inverted_ranges_and_times() {
        let mut note = sample();
        assert!(note.validate().is_ok());

        note.end_line = 1;
        assert!(matches!(
            note.validate(),
            Err(NoteValidationError::InvertedLineRange { .. })
        ));

        let mut note = sample();
        note.updated_time = note.created_time - Duration::seconds(1);
        assert!(matches!(
            note.validate(),
            Err(NoteValidationError::UpdatedBeforeCreated { .. })
        ));
    }

    #[test]
    fn deserialize_defaults_optional_fields() {
        let json = r#"{
            "id": "n1",
            "title": "t",
            "content": "c",
            "filePath": "/p/a.kt",
            "startLine": 1,
            "endLine": 2,
            "projectPath": "/p",
            "createdTime": "2024-01-02T03:04:05",
            "updatedTime": "2024-01-02T03:04",
            "unknownKey": true
        }"#;
        let note: CodeNote = serde_json::from_str(json).expect("legacy note parses");
        assert_eq!(note.id, "n1");
        assert!(note.tags.is_empty());
        assert!(note.note.is_empty());
        assert!(note.class_name.is_none());
    }
}
