//! Keyword search over in-memory notes.
//!
//! # Responsibility
//! - Match notes against a free-text query across user-visible fields.
//! - Keep ordering rules for listings in one place.

pub mod matcher;
