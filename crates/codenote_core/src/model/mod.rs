//! Domain model for code annotations.
//!
//! # Responsibility
//! - Define the canonical `CodeNote` record persisted by the store and
//!   carried through import/export envelopes.
//! - Own the timestamp wire format shared by every JSON document.
//!
//! # Invariants
//! - Every note is identified by an opaque, stable `NoteId`.
//! - `start_line <= end_line` and `created_time <= updated_time`.

pub mod code_note;
pub mod timestamp;
