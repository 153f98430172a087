//! Export envelope format.
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "exportTime": "2024-05-01T10:00:00.123",
//!   "exportType": "ALL_NOTES",
//!   "projectName": null,
//!   "projectPath": null,
//!   "totalCount": 1,
//!   "notes": [ ... ]
//! }
//! ```
//!
//! Field order is fixed by declaration order. A bare JSON array of notes is
//! accepted on import as the legacy format.

use crate::model::code_note::CodeNote;
use crate::model::timestamp;
use crate::transfer::{TransferError, TransferResult};
use serde::{Deserialize, Serialize};

/// Version tag written by this implementation.
pub const ENVELOPE_VERSION: &str = "1.0";
/// Version tag synthesized for bare note lists.
pub const LEGACY_VERSION: &str = "legacy";

const LEGACY_EXPORT_TIME: &str = "unknown";
const LEGACY_EXPORT_TYPE: &str = "UNKNOWN";

/// Which notes an export covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportScope {
    AllNotes,
    /// Notes of one project. `project_path` is `None` when the host project
    /// has no base path, which exports nothing.
    CurrentProject {
        project_name: String,
        project_path: Option<String>,
    },
}

impl ExportScope {
    /// Tag stored in `exportType`.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::AllNotes => "ALL_NOTES",
            Self::CurrentProject { .. } => "CURRENT_PROJECT",
        }
    }
}

/// Versioned wrapper written by exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope {
    pub version: String,
    pub export_time: String,
    pub export_type: String,
    pub project_name: Option<String>,
    pub project_path: Option<String>,
    pub total_count: usize,
    pub notes: Vec<CodeNote>,
}

impl ExportEnvelope {
    /// Wraps `notes` for `scope`, stamped with the current time.
    pub fn new(scope: &ExportScope, notes: Vec<CodeNote>) -> Self {
        let (project_name, project_path) = match scope {
            ExportScope::AllNotes => (None, None),
            ExportScope::CurrentProject {
                project_name,
                project_path,
            } => (Some(project_name.clone()), project_path.clone()),
        };
        Self {
            version: ENVELOPE_VERSION.to_string(),
            export_time: timestamp::format(&timestamp::now()),
            export_type: scope.tag().to_string(),
            project_name,
            project_path,
            total_count: notes.len(),
            notes,
        }
    }

    /// Synthesized envelope for a legacy bare note list.
    pub fn legacy(notes: Vec<CodeNote>) -> Self {
        Self {
            version: LEGACY_VERSION.to_string(),
            export_time: LEGACY_EXPORT_TIME.to_string(),
            export_type: LEGACY_EXPORT_TYPE.to_string(),
            project_name: None,
            project_path: None,
            total_count: notes.len(),
            notes,
        }
    }

    pub fn is_legacy(&self) -> bool {
        self.version == LEGACY_VERSION
    }

    /// Pretty-printed JSON document.
    pub fn to_json(&self) -> TransferResult<String> {
        serde_json::to_string_pretty(self).map_err(TransferError::Serialize)
    }
}

/// Parses an import document as an envelope, falling back to a bare note list.
///
/// # Errors
/// - Returns `TransferError::Parse` when neither shape matches. The error of
///   the shape the document most resembles is reported.
pub fn parse_import_document(content: &str) -> TransferResult<ExportEnvelope> {
    let envelope_error = match serde_json::from_str::<ExportEnvelope>(content) {
        Ok(envelope) => return Ok(envelope),
        Err(err) => err,
    };

    match serde_json::from_str::<Vec<CodeNote>>(content) {
        Ok(notes) => Ok(ExportEnvelope::legacy(notes)),
        Err(legacy_error) => {
            if content.trim_start().starts_with('[') {
                Err(TransferError::Parse(legacy_error))
            } else {
                Err(TransferError::Parse(envelope_error))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_import_document, ExportEnvelope, ExportScope, ENVELOPE_VERSION};
    use crate::model::code_note::CodeNote;

    #[test]
    fn envelope_keys_follow_declaration_order() {
        let note = CodeNote::new("t", "c", "/p/a.rs", 1, 1, "/p");
        let envelope = ExportEnvelope::new(
            &ExportScope::CurrentProject {
                project_name: "p".to_string(),
                project_path: Some("/p".to_string()),
            },
            vec![note],
        );
        let json = envelope.to_json().unwrap();

        let keys = [
            "\"version\"",
            "\"exportTime\"",
            "\"exportType\"",
            "\"projectName\"",
            "\"projectPath\"",
            "\"totalCount\"",
            "\"notes\"",
        ];
        let positions: Vec<usize> = keys.iter().map(|key| json.find(key).unwrap()).collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(json.contains("\"CURRENT_PROJECT\""));
        assert_eq!(envelope.version, ENVELOPE_VERSION);
        assert_eq!(envelope.total_count, 1);
    }

    #[test]
    fn bare_list_becomes_legacy_envelope() {
        let document = r#"[{
            "id": "a", "title": "t", "content": "c", "filePath": "/p/a.rs",
            "startLine": 1, "endLine": 1, "projectPath": "/p",
            "createdTime": "2024-01-01T00:00:00", "updatedTime": "2024-01-01T00:00:00"
        }]"#;
        let envelope = parse_import_document(document).unwrap();
        assert!(envelope.is_legacy());
        assert_eq!(envelope.export_time, "unknown");
        assert_eq!(envelope.export_type, "UNKNOWN");
        assert_eq!(envelope.total_count, 1);
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(parse_import_document("{\"hello\": 1}").is_err());
        assert!(parse_import_document("[1, 2]").is_err());
        assert!(parse_import_document("").is_err());
    }
}
