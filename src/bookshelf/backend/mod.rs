//! # Backend Boundary
//!
//! Persistence and ISBN lookup live on a server this crate does not own. The
//! [`Backend`] trait is the whole contract with it:
//!
//! | operation      | request                         | response                          |
//! |----------------|---------------------------------|-----------------------------------|
//! | `fetch_books`  | none                            | `{"books": [...]}`                |
//! | `update_books` | `{"books": [...]}` (full store) | `{"success": bool, "message"?}`   |
//! | `register`     | `{"isbns": [...]}` or a record  | `{"success", "message"?, "results"?}` |
//!
//! ## Implementations
//!
//! - [`http::HttpBackend`]: production, blocking JSON over HTTP
//! - [`memory::InMemoryBackend`]: records every request, for tests
//!
//! Each operation is a single synchronous round-trip, so there is never more
//! than one request in flight per backend.
//!
//! ## Nothing Is Lost On Save
//!
//! A save replaces the server's catalog, so whatever a load could not turn
//! into a [`BookRecord`] is carried as raw JSON in [`BookList::unreadable`]
//! and written back unchanged, after the readable records.

use crate::commands::register::RegistrationRequest;
use crate::error::Result;
use crate::model::BookRecord;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use tracing::warn;

pub mod http;
pub mod memory;

pub trait Backend {
    /// Fetch every book the server knows about.
    fn fetch_books(&self) -> Result<BookList>;

    /// Replace the server's catalog with the payload.
    fn update_books(&mut self, payload: &BooksPayload<'_>) -> Result<SaveAck>;

    /// Submit an ISBN batch or a manually entered record.
    fn register(&mut self, request: &RegistrationRequest) -> Result<RegistrationAck>;
}

/// A decoded load response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookList {
    pub books: Vec<BookRecord>,
    /// Entries that are not readable records, kept verbatim.
    pub unreadable: Vec<Value>,
}

/// Body of the save request: `{"books": [records..., unreadable...]}`.
#[derive(Debug, Clone, Copy)]
pub struct BooksPayload<'a> {
    pub books: &'a [BookRecord],
    pub unreadable: &'a [Value],
}

impl<'a> BooksPayload<'a> {
    pub fn new(books: &'a [BookRecord]) -> Self {
        Self {
            books,
            unreadable: &[],
        }
    }

    pub fn with_unreadable(mut self, unreadable: &'a [Value]) -> Self {
        self.unreadable = unreadable;
        self
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum PayloadEntry<'a> {
    Book(&'a BookRecord),
    Raw(&'a Value),
}

impl Serialize for BooksPayload<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let entries: Vec<PayloadEntry<'_>> = self
            .books
            .iter()
            .map(PayloadEntry::Book)
            .chain(self.unreadable.iter().map(PayloadEntry::Raw))
            .collect();
        let mut state = serializer.serialize_struct("BooksPayload", 1)?;
        state.serialize_field("books", &entries)?;
        state.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveAck {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl SaveAck {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationAck {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub results: Vec<IsbnResult>,
}

/// Per-ISBN outcome reported for batch registrations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsbnResult {
    pub isbn: String,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Deserialize)]
struct BooksEnvelope {
    #[serde(default)]
    books: Option<Vec<Value>>,
}

/// Decodes a load response.
///
/// A missing or `null` `books` key is an empty catalog. Entries that are not
/// readable records do not fail the load; they are kept aside, unparsed.
pub fn decode_books(body: &[u8]) -> Result<BookList> {
    let envelope: BooksEnvelope = serde_json::from_slice(body)?;
    let raw = envelope.books.unwrap_or_default();

    let mut list = BookList {
        books: Vec::with_capacity(raw.len()),
        unreadable: Vec::new(),
    };
    for (position, value) in raw.into_iter().enumerate() {
        let decoded = match &value {
            Value::Object(map) => BookRecord::from_wire(map.clone()),
            other => Err(format!("entry is {}, not an object", json_kind(other))),
        };
        match decoded {
            Ok(book) => list.books.push(book),
            Err(e) => {
                warn!(position, error = %e, "Keeping unreadable book entry as-is");
                list.unreadable.push(value);
            }
        }
    }
    Ok(list)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
