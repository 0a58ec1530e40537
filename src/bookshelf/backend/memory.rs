use crate::backend::{Backend, BookList, BooksPayload, IsbnResult, RegistrationAck, SaveAck};
use crate::commands::register::RegistrationRequest;
use crate::error::{CatalogError, Result};
use crate::model::BookRecord;
use serde_json::Value;

/// Backend double that keeps everything in memory and records what it was sent.
#[derive(Debug, Default, Clone)]
pub struct InMemoryBackend {
    books: Vec<BookRecord>,
    unreadable: Vec<Value>,
    saved_payloads: Vec<Vec<BookRecord>>,
    registrations: Vec<RegistrationRequest>,
    reject_saves: Option<String>,
    reject_registrations: Option<String>,
    offline: bool,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_books(mut self, books: Vec<BookRecord>) -> Self {
        self.books = books;
        self
    }

    /// Entries served alongside the books that are not readable records.
    pub fn with_unreadable(mut self, entries: Vec<Value>) -> Self {
        self.unreadable = entries;
        self
    }

    /// Saves are answered with `success: false` and this message.
    pub fn rejecting_saves(mut self, message: impl Into<String>) -> Self {
        self.reject_saves = Some(message.into());
        self
    }

    pub fn rejecting_registrations(mut self, message: impl Into<String>) -> Self {
        self.reject_registrations = Some(message.into());
        self
    }

    /// Every request fails as if the server could not be reached.
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    pub fn accept_saves(&mut self) {
        self.reject_saves = None;
    }

    pub fn books(&self) -> &[BookRecord] {
        &self.books
    }

    pub fn unreadable(&self) -> &[Value] {
        &self.unreadable
    }

    /// The records of every payload passed to `update_books`, accepted or not.
    pub fn saved_payloads(&self) -> &[Vec<BookRecord>] {
        &self.saved_payloads
    }

    pub fn registrations(&self) -> &[RegistrationRequest] {
        &self.registrations
    }

    fn check_online(&self) -> Result<()> {
        if self.offline {
            return Err(CatalogError::Unreachable("in-memory backend is offline".into()));
        }
        Ok(())
    }
}

impl Backend for InMemoryBackend {
    fn fetch_books(&self) -> Result<BookList> {
        self.check_online()?;
        Ok(BookList {
            books: self.books.clone(),
            unreadable: self.unreadable.clone(),
        })
    }

    fn update_books(&mut self, payload: &BooksPayload<'_>) -> Result<SaveAck> {
        self.check_online()?;
        self.saved_payloads.push(payload.books.to_vec());

        if let Some(message) = &self.reject_saves {
            return Ok(SaveAck::rejected(message.clone()));
        }
        self.books = payload.books.to_vec();
        self.unreadable = payload.unreadable.to_vec();
        Ok(SaveAck::ok())
    }

    fn register(&mut self, request: &RegistrationRequest) -> Result<RegistrationAck> {
        self.check_online()?;
        self.registrations.push(request.clone());

        if let Some(message) = &self.reject_registrations {
            return Ok(RegistrationAck {
                success: false,
                message: Some(message.clone()),
                results: Vec::new(),
            });
        }

        let results = match request {
            RegistrationRequest::Isbns { isbns } => isbns
                .iter()
                .map(|isbn| IsbnResult {
                    isbn: isbn.clone(),
                    success: true,
                    message: None,
                })
                .collect(),
            RegistrationRequest::Manual(_) => Vec::new(),
        };

        Ok(RegistrationAck {
            success: true,
            message: None,
            results,
        })
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use crate::model::BookRecord;
    use crate::store::RecordStore;

    #[allow(clippy::too_many_arguments)]
    fn book(
        id: i64,
        title: &str,
        author: &str,
        publisher: &str,
        shelf: &str,
        published: &str,
        isbn: &str,
        pages: u32,
        added: &str,
    ) -> BookRecord {
        let mut record = BookRecord::new(id, title);
        record.author = author.into();
        record.publisher = publisher.into();
        record.shelf = shelf.into();
        record.published_date = published.into();
        record.isbn = isbn.into();
        record.pages = Some(pages);
        record.added_at = added.into();
        record
    }

    /// Four records with distinct pages, years and registered dates.
    #[rustfmt::skip]
    pub fn sample_books() -> Vec<BookRecord> {
        vec![
            book(1, "吾輩は猫である", "夏目漱石", "大倉書店", "A-1", "1905-10", "9784003101018", 300, "2024-01-10"),
            book(2, "走れメロス", "太宰治", "新潮社", "B-2", "1940", "9784101006062", 96, "2024-02-15"),
            book(3, "こころ", "夏目漱石", "岩波書店", "A-2", "1914.04", "9784101010137", 280, "2024-03-01"),
            book(4, "人間失格", "太宰治", "筑摩書房", "B-1", "1948-07", "9784101006048", 176, "2024-04-20"),
        ]
    }

    pub fn sample_store() -> RecordStore {
        let mut store = RecordStore::new();
        store.replace_all(sample_books());
        store
    }
}
