//! Core use-case services.
//!
//! # Responsibility
//! - Turn host selections into notes and apply user edits.
//! - Keep UI/host layers decoupled from storage details.

pub mod note_service;
