//! # Registration
//!
//! Two ways to add books, both validated client-side before any request:
//!
//! - **ISBN batch**: up to [`MAX_BATCH`] ISBN inputs. Blank inputs are ignored;
//!   a batch with nothing left is rejected.
//! - **Manual entry**: a single record typed in by hand. Title, author, ISBN
//!   and registered date are required.
//!
//! The server resolves ISBN metadata and assigns ids; this module only
//! collects input and reports what the server said.

use crate::backend::{Backend, RegistrationAck};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{CatalogError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const MAX_BATCH: usize = 10;

/// The fixed set of ISBN input slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsbnBatch {
    slots: Vec<String>,
}

impl Default for IsbnBatch {
    fn default() -> Self {
        Self {
            slots: vec![String::new(); MAX_BATCH],
        }
    }
}

impl IsbnBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills slots in order. More than [`MAX_BATCH`] inputs is an error.
    pub fn from_inputs<I, S>(inputs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut batch = Self::new();
        for (index, input) in inputs.into_iter().enumerate() {
            batch.set(index, input)?;
        }
        Ok(batch)
    }

    pub fn set(&mut self, index: usize, value: impl Into<String>) -> Result<()> {
        let slot = self.slots.get_mut(index).ok_or_else(|| {
            CatalogError::Validation(format!(
                "At most {} ISBNs can be registered at once",
                MAX_BATCH
            ))
        })?;
        *slot = value.into();
        Ok(())
    }

    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    /// Trimmed, non-blank inputs in slot order.
    pub fn entries(&self) -> Vec<String> {
        self.slots
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Manual-entry form contents, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualEntry {
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub shelf: String,
    pub year: String,
    pub pages: String,
    pub isbn: String,
    pub added: String,
}

impl ManualEntry {
    pub fn missing_required(&self) -> Vec<&'static str> {
        [
            ("title", &self.title),
            ("author", &self.author),
            ("isbn", &self.isbn),
            ("added", &self.added),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Checks required fields and formats, producing the record to submit.
    pub fn validate(&self) -> Result<ManualRecord> {
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(CatalogError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        let year = match self.year.trim() {
            "" => None,
            raw => Some(four_digit_year(raw).ok_or_else(|| {
                CatalogError::Validation(format!("year must look like YYYY, got '{}'", raw))
            })?),
        };

        let pages = match self.pages.trim() {
            "" => None,
            raw => Some(raw.parse::<u32>().map_err(|_| {
                CatalogError::Validation(format!(
                    "pages must be a non-negative whole number, got '{}'",
                    raw
                ))
            })?),
        };

        let added = self.added.trim();
        NaiveDate::parse_from_str(added, "%Y-%m-%d").map_err(|_| {
            CatalogError::Validation(format!("added must be a YYYY-MM-DD date, got '{}'", added))
        })?;

        Ok(ManualRecord {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            publisher: self.publisher.trim().to_string(),
            shelf: self.shelf.trim().to_string(),
            year,
            pages,
            isbn: self.isbn.trim().to_string(),
            added: added.to_string(),
        })
    }
}

/// The manual form takes a bare year; year-month input is rejected rather
/// than cut down to the year.
fn four_digit_year(raw: &str) -> Option<i32> {
    if raw.len() == 4 && raw.bytes().all(|b| b.is_ascii_digit()) {
        raw.parse().ok()
    } else {
        None
    }
}

/// A validated manual entry as sent to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualRecord {
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub shelf: String,
    pub year: Option<i32>,
    pub pages: Option<u32>,
    pub isbn: String,
    pub added: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegistrationRequest {
    Isbns { isbns: Vec<String> },
    Manual(ManualRecord),
}

pub fn submit_isbns<B: Backend>(backend: &mut B, batch: &IsbnBatch) -> Result<CmdResult> {
    let isbns = batch.entries();
    if isbns.is_empty() {
        return Err(CatalogError::Validation(
            "Enter at least one ISBN to register".to_string(),
        ));
    }

    debug!(count = isbns.len(), "Submitting ISBN batch");
    let count = isbns.len();
    let ack = backend.register(&RegistrationRequest::Isbns { isbns })?;
    let summary = format!("Registered {} ISBN(s)", count);
    into_result(ack, summary)
}

pub fn submit_manual<B: Backend>(backend: &mut B, entry: &ManualEntry) -> Result<CmdResult> {
    let record = entry.validate()?;
    let summary = format!("Registered \"{}\"", record.title);

    debug!(isbn = %record.isbn, "Submitting manual entry");
    let ack = backend.register(&RegistrationRequest::Manual(record))?;
    into_result(ack, summary)
}

fn into_result(ack: RegistrationAck, summary: String) -> Result<CmdResult> {
    if !ack.success {
        let message = ack
            .message
            .unwrap_or_else(|| "server rejected the registration".to_string());
        warn!(%message, "Registration rejected");
        return Err(CatalogError::Registration(message));
    }

    let mut result = CmdResult::default();
    if ack.results.is_empty() {
        result.add_message(CmdMessage::success(summary));
    } else {
        for item in &ack.results {
            if item.success {
                result.add_message(CmdMessage::success(format!("Registered {}", item.isbn)));
            } else {
                result.add_message(CmdMessage::warning(format!(
                    "{}: {}",
                    item.isbn,
                    item.message.as_deref().unwrap_or("not registered")
                )));
            }
        }
    }
    if let Some(message) = ack.message {
        result.add_message(CmdMessage::info(message));
    }
    result.registrations = ack.results;
    Ok(result)
}
