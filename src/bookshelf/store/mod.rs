//! # Record Store
//!
//! The in-memory, ordered list of books for the current session. It is the
//! single source of truth that every other layer reads from:
//!
//! - the filter and sort engines derive views from it without mutating it
//! - edit operations change it in place (there is no shadow copy)
//! - a save sends exactly what it holds at that moment
//!
//! The store is created empty, filled by a load, and replaced wholesale on
//! reload. Record ids are unique at all times: [`RecordStore::replace_all`]
//! keeps the first occurrence of an id and sets later duplicates aside.
//!
//! Set-aside duplicates and load entries that were not readable records are
//! held as raw JSON. They are never listed or edited, but a save sends them
//! back so the server keeps them.

use crate::model::{BookId, BookRecord};
use serde_json::Value;
use std::collections::HashSet;
use tracing::warn;

#[derive(Debug, Default, Clone)]
pub struct RecordStore {
    records: Vec<BookRecord>,
    unreadable: Vec<Value>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole store, returning how many duplicate ids were set aside.
    pub fn replace_all(&mut self, records: Vec<BookRecord>) -> usize {
        // Display form is the identity key: Int(7) and Text("7") collide.
        let mut seen = HashSet::with_capacity(records.len());
        let mut unique = Vec::with_capacity(records.len());
        self.unreadable.clear();

        for record in records {
            if !seen.insert(record.id.to_string()) {
                warn!(id = %record.id, "Setting aside record with duplicate id");
                self.unreadable.push(Value::Object(record.to_wire()));
                continue;
            }
            unique.push(record);
        }

        self.records = unique;
        self.unreadable.len()
    }

    /// Holds entries that are not records so the next save returns them.
    pub fn keep_unreadable(&mut self, entries: Vec<Value>) {
        self.unreadable.extend(entries);
    }

    pub fn unreadable(&self) -> &[Value] {
        &self.unreadable
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.unreadable.clear();
    }

    pub fn records(&self) -> &[BookRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn position(&self, id: &BookId) -> Option<usize> {
        self.records.iter().position(|r| r.id.same_as(id))
    }

    pub fn get(&self, id: &BookId) -> Option<&BookRecord> {
        self.position(id).map(|i| &self.records[i])
    }

    /// Swaps in `record` at the position of the record with the same id.
    ///
    /// Returns `false` (and stores nothing) when no such record exists.
    pub fn replace(&mut self, record: BookRecord) -> bool {
        match self.position(&record.id) {
            Some(i) => {
                self.records[i] = record;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &BookId) -> Option<BookRecord> {
        self.position(id).map(|i| self.records.remove(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_of(ids: &[i64]) -> RecordStore {
        let mut store = RecordStore::new();
        store.replace_all(
            ids.iter()
                .map(|id| BookRecord::new(*id, format!("Book {}", id)))
                .collect(),
        );
        store
    }

    #[test]
    fn starts_empty() {
        let store = RecordStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn replace_all_sets_duplicate_ids_aside() {
        let mut store = RecordStore::new();
        let dropped = store.replace_all(vec![
            BookRecord::new(1, "first"),
            BookRecord::new(BookId::Text("1".into()), "dup"),
            BookRecord::new(2, "second"),
        ]);

        assert_eq!(dropped, 1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&BookId::Int(1)).unwrap().title, "first");
        assert_eq!(store.unreadable()[0]["title"], "dup");
    }

    #[test]
    fn reload_and_clear_forget_unreadable_entries() {
        let mut store = store_of(&[1]);
        store.keep_unreadable(vec![serde_json::json!({"title": "no id"})]);
        assert_eq!(store.unreadable().len(), 1);

        store.replace_all(vec![BookRecord::new(2, "two")]);
        assert!(store.unreadable().is_empty());

        store.keep_unreadable(vec![serde_json::json!(42)]);
        store.clear();
        assert!(store.is_empty());
        assert!(store.unreadable().is_empty());
    }

    #[test]
    fn replace_all_is_wholesale() {
        let mut store = store_of(&[1, 2, 3]);
        store.replace_all(vec![BookRecord::new(9, "other")]);
        assert_eq!(store.len(), 1);
        assert!(store.get(&BookId::Int(1)).is_none());
    }

    #[test]
    fn replace_keeps_position() {
        let mut store = store_of(&[1, 2, 3]);
        assert!(store.replace(BookRecord::new(2, "changed")));
        assert_eq!(store.records()[1].title, "changed");
        assert!(!store.replace(BookRecord::new(42, "ghost")));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn remove_by_id() {
        let mut store = store_of(&[1, 2, 3]);
        let removed = store.remove(&BookId::Int(2)).unwrap();
        assert_eq!(removed.title, "Book 2");
        assert_eq!(store.len(), 2);
        assert!(store.remove(&BookId::Int(2)).is_none());
    }
}
