//! Durable note storage.
//!
//! # Responsibility
//! - Hold the process-wide note collection in a concurrent map.
//! - Persist the collection as one JSON document per project partition.
//!
//! # Invariants
//! - Every mutation rewrites the affected partition files in full.
//! - Unreadable or malformed partition files are logged and skipped on load.
//! - Note ids are unique within one store.

mod error;
pub mod note_store;
pub mod partition;

pub use error::{StoreError, StoreResult};
pub use note_store::{NoteStore, StoreConfig, StoreEvent, StoreListener};
