//! Edit-session state machine.
//!
//! ```text
//!             enter
//!   Viewing ─────────▶ Editing ──┐ save fails
//!      ▲                 │  ▲    │ (error kept)
//!      └─── save ok ─────┘  └────┘
//! ```
//!
//! Field edits and deletions are only permitted while `Editing`.

use crate::error::{CatalogError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Viewing,
    Editing,
}

#[derive(Debug, Clone, Default)]
pub struct EditSession {
    mode: EditMode,
    last_error: Option<String>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode == EditMode::Editing
    }

    /// The error from the most recent failed save, cleared on the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Returns `true` if this call moved the session into `Editing`.
    pub fn enter(&mut self) -> bool {
        let changed = self.mode == EditMode::Viewing;
        self.mode = EditMode::Editing;
        changed
    }

    pub fn ensure_editing(&self) -> Result<()> {
        if self.is_editing() {
            Ok(())
        } else {
            Err(CatalogError::NotEditing)
        }
    }

    pub fn save_succeeded(&mut self) {
        self.mode = EditMode::Viewing;
        self.last_error = None;
    }

    pub fn save_failed(&mut self, message: impl Into<String>) {
        self.mode = EditMode::Editing;
        self.last_error = Some(message.into());
    }
}
