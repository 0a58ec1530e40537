//! # API Facade
//!
//! The single entry point for catalog operations, whatever the UI. It owns the
//! client-side state (record store, filter criteria, sort state, edit session)
//! and dispatches to the command functions in [`crate::commands`].
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: filtering, sorting and validation live in `commands/*.rs`
//! - **Presentation**: methods return [`CmdResult`] values, never strings for stdout
//!
//! ## Generic Over Backend
//!
//! `CatalogApi<B: Backend>` runs against:
//! - Production: `CatalogApi<HttpBackend>`
//! - Testing: `CatalogApi<InMemoryBackend>`
//!
//! ## Visible List
//!
//! The visible list is always derived: `sort(filter(store, criteria), sort_state)`.
//! Every mutation (load, edit, delete, criteria or sort change) is followed by
//! the next call to [`CatalogApi::visible`] or [`CatalogApi::list`] seeing the
//! new state; nothing is cached.

use crate::backend::Backend;
use crate::commands::config::ConfigAction;
use crate::commands::filter::FilterCriteria;
use crate::commands::register::{IsbnBatch, ManualEntry};
use crate::commands::sort::SortState;
use crate::commands::{self, CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{BookField, BookId, BookRecord};
use crate::session::{EditMode, EditSession};
use crate::store::RecordStore;
use std::path::Path;
use tracing::info;

pub struct CatalogApi<B: Backend> {
    backend: B,
    store: RecordStore,
    criteria: FilterCriteria,
    sort: SortState,
    session: EditSession,
}

impl<B: Backend> CatalogApi<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            store: RecordStore::new(),
            criteria: FilterCriteria::default(),
            sort: SortState::default(),
            session: EditSession::new(),
        }
    }

    /// Fetches all books, replacing the store. Failures leave it empty.
    pub fn load(&mut self) -> CmdResult {
        commands::load::run(&self.backend, &mut self.store)
    }

    pub fn visible(&self) -> Vec<&BookRecord> {
        let filtered = commands::filter::apply(self.store.records(), &self.criteria);
        commands::sort::apply(filtered, &self.sort)
    }

    /// Recomputes the visible list.
    pub fn list(&self) -> CmdResult {
        let books = self.visible().into_iter().cloned().collect();
        CmdResult::default().with_listed_books(books)
    }

    /// Title/ISBN quick search, sorted like the main list. Ignores the criteria.
    pub fn search(&self, term: &str) -> CmdResult {
        let found = commands::filter::quick_search(self.store.records(), term);
        let books = commands::sort::apply(found, &self.sort)
            .into_iter()
            .cloned()
            .collect();
        CmdResult::default().with_listed_books(books)
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn criteria_mut(&mut self) -> &mut FilterCriteria {
        &mut self.criteria
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
    }

    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortState) {
        self.sort = sort;
    }

    /// Same as clicking a column header.
    pub fn toggle_sort(&mut self, key: BookField) -> SortState {
        self.sort.toggle(key);
        self.sort
    }

    pub fn mode(&self) -> EditMode {
        self.session.mode()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.session.last_error()
    }

    pub fn enter_edit(&mut self) -> CmdResult {
        let mut result = CmdResult::default();
        if self.session.enter() {
            info!("Entered edit mode");
            result.add_message(CmdMessage::info("Edit mode on"));
        }
        result
    }

    pub fn set_field(&mut self, id: &BookId, field: BookField, raw: &str) -> Result<CmdResult> {
        self.session.ensure_editing()?;
        Ok(commands::edit::set_field(&mut self.store, id, field, raw))
    }

    pub fn delete(&mut self, id: &BookId) -> Result<CmdResult> {
        self.session.ensure_editing()?;
        Ok(commands::edit::delete(&mut self.store, id))
    }

    /// Sends the whole store. On failure the session stays in edit mode with
    /// the error recorded, and the error is returned.
    pub fn save(&mut self) -> Result<CmdResult> {
        self.session.ensure_editing()?;
        match commands::save::run(&mut self.backend, &self.store) {
            Ok(result) => {
                self.session.save_succeeded();
                info!("Left edit mode after save");
                Ok(result)
            }
            Err(e) => {
                self.session.save_failed(e.to_string());
                Err(e)
            }
        }
    }

    /// The single edit/finish control: enters edit mode, or saves when already editing.
    pub fn toggle_edit_mode(&mut self) -> Result<CmdResult> {
        match self.session.mode() {
            EditMode::Viewing => Ok(self.enter_edit()),
            EditMode::Editing => self.save(),
        }
    }

    pub fn register_isbns(&mut self, batch: &IsbnBatch) -> Result<CmdResult> {
        commands::register::submit_isbns(&mut self.backend, batch)
    }

    pub fn register_manual(&mut self, entry: &ManualEntry) -> Result<CmdResult> {
        commands::register::submit_manual(&mut self.backend, entry)
    }

    pub fn records(&self) -> &[BookRecord] {
        self.store.records()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

/// Config does not depend on a backend, so it is not a method.
pub fn configure(config_dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    commands::config::run(config_dir, action)
}
