//! Case-insensitive substring matching for notes.
//!
//! # Invariants
//! - A blank query matches every note.
//! - Matching covers title, content, note body, each tag, and file path.
//! - Result ordering is `created_time DESC`, ties broken by `id ASC`.

use crate::model::code_note::CodeNote;
use std::cmp::Ordering;

/// Normalized search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteQuery {
    needle: Option<String>,
}

impl NoteQuery {
    /// Builds a query from raw user input.
    pub fn new(text: &str) -> Self {
        let trimmed = text.trim();
        let needle = if trimmed.is_empty() {
            None
        } else {
            Some(text.to_lowercase())
        };
        Self { needle }
    }

    /// Whether this query matches every note.
    pub fn is_blank(&self) -> bool {
        self.needle.is_none()
    }

    /// Returns whether `note` matches this query.
    pub fn matches(&self, note: &CodeNote) -> bool {
        let Some(needle) = self.needle.as_deref() else {
            return true;
        };

        contains_ignore_case(&note.title, needle)
            || contains_ignore_case(&note.content, needle)
            || contains_ignore_case(&note.note, needle)
            || note.tags.iter().any(|tag| contains_ignore_case(tag, needle))
            || contains_ignore_case(&note.file_path, needle)
    }
}

/// Ordering used by every listing: newest first.
pub fn newest_first(left: &CodeNote, right: &CodeNote) -> Ordering {
    right
        .created_time
        .cmp(&left.created_time)
        .then_with(|| left.id.cmp(&right.id))
}

/// Sorts `notes` in place with [`newest_first`].
pub fn sort_newest_first(notes: &mut [CodeNote]) {
    notes.sort_by(newest_first);
}

fn contains_ignore_case(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}

#[cfg(test)]
mod tests {
    use super::{sort_newest_first, NoteQuery};
    use crate::model::code_note::CodeNote;
    use chrono::Duration;

    fn note(id: &str, title: &str) -> CodeNote {
        let mut note = CodeNote::new(title, "let x = 1;", "/p/src/lib.rs", 1, 1, "/p");
        note.id = id.to_string();
        note
    }

    #[test]
    fn blank_query_matches_everything() {
        let query = NoteQuery::new("   ");
        assert!(query.is_blank());
        assert!(query.matches(&note("a", "anything")));
    }

    #[test]
    fn query_matches_each_field_case_insensitively() {
        let mut tagged = note("a", "untitled");
        tagged.tags = vec!["Perf".to_string()];
        assert!(NoteQuery::new("PERF").matches(&tagged));

        let mut body = note("b", "untitled");
        body.note = "Remember the Cache".to_string();
        assert!(NoteQuery::new("cache").matches(&body));

        assert!(NoteQuery::new("LIB.RS").matches(&note("c", "x")));
        assert!(NoteQuery::new("X = 1").matches(&note("d", "x")));
        assert!(!NoteQuery::new("missing").matches(&note("e", "x")));
    }

    #[test]
    fn sort_orders_by_created_time_descending() {
        let older = note("older", "a");
        let mut newer = note("newer", "b");
        newer.created_time = older.created_time + Duration::seconds(5);

        let mut notes = vec![older, newer];
        sort_newest_first(&mut notes);
        assert_eq!(notes[0].id, "newer");
        assert_eq!(notes[1].id, "older");
    }
}
