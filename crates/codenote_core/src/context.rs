//! Explicitly constructed application context.
//!
//! # Responsibility
//! - Build the store and every service from one settings value.
//! - Offer a single shutdown point that flushes pending state.
//!
//! # Invariants
//! - All services share the same store instance.
//! - Nothing here is process-global; hosts own the context value.

use crate::analysis::CodeAnalyzer;
use crate::model::code_note::CodeNote;
use crate::navigation::{
    LocalFileLookup, NavigationError, NavigationPlan, NavigationResolver,
};
use crate::service::note_service::NoteService;
use crate::settings::shortcut::ShortcutManager;
use crate::settings::CodeNoteSettings;
use crate::store::{NoteStore, StoreConfig, StoreResult};
use crate::transfer::ImportExportService;
use log::info;
use std::sync::Arc;

/// Owner of the store and the services built on it.
pub struct CodeNoteContext {
    settings: CodeNoteSettings,
    store: Arc<NoteStore>,
    notes: NoteService,
    transfer: ImportExportService,
    analyzer: CodeAnalyzer,
    shortcuts: ShortcutManager,
    navigator: NavigationResolver<LocalFileLookup>,
}

impl CodeNoteContext {
    /// Opens the store under the settings' storage root and wires services.
    pub fn start(settings: CodeNoteSettings) -> Self {
        let settings = settings.sanitized();
        let store = Arc::new(NoteStore::open(StoreConfig::from_settings(&settings)));
        info!(
            "event=context_start module=context status=ok notes={} root={}",
            store.len(),
            store.root().display()
        );
        Self {
            notes: NoteService::new(Arc::clone(&store)),
            transfer: ImportExportService::new(Arc::clone(&store)),
            analyzer: CodeAnalyzer::new(),
            shortcuts: ShortcutManager::new(),
            navigator: NavigationResolver::new(LocalFileLookup),
            settings,
            store,
        }
    }

    pub fn settings(&self) -> &CodeNoteSettings {
        &self.settings
    }

    pub fn store(&self) -> &Arc<NoteStore> {
        &self.store
    }

    pub fn notes(&self) -> &NoteService {
        &self.notes
    }

    pub fn transfer(&self) -> &ImportExportService {
        &self.transfer
    }

    pub fn analyzer(&self) -> &CodeAnalyzer {
        &self.analyzer
    }

    pub fn shortcuts(&self) -> &ShortcutManager {
        &self.shortcuts
    }

    pub fn navigator(&self) -> &NavigationResolver<LocalFileLookup> {
        &self.navigator
    }

    /// Resolves `note` and computes caret/highlight data against the
    /// target's current text. Unreadable text yields a caret-only plan.
    pub fn plan_navigation(&self, note: &CodeNote) -> Result<NavigationPlan, NavigationError> {
        let target = self.navigator.resolve_note(note)?;
        let plan = match self.navigator.lookup().read_text(&target) {
            Some(text) => NavigationPlan::for_document(target, note, &text),
            None => NavigationPlan::caret_only(target, note),
        };
        Ok(plan)
    }

    /// Rewrites every partition and consumes the context.
    ///
    /// # Errors
    /// - Returns the first partition write failure.
    pub fn shutdown(self) -> StoreResult<()> {
        let result = self.store.flush();
        match &result {
            Ok(()) => info!(
                "event=context_shutdown module=context status=ok notes={}",
                self.store.len()
            ),
            Err(err) => log::error!(
                "event=context_shutdown module=context status=error error={err}"
            ),
        }
        result
    }
}
