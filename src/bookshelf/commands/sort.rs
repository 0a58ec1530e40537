//! # Sort Engine
//!
//! Orders a (filtered) list by one column. At most one column is active at a
//! time. Ties keep their input order in both directions, so re-sorting with
//! the same [`SortState`] is a no-op.
//!
//! Column comparison:
//! - text columns compare lexicographically
//! - `pages` compares numerically; unset pages sort before any number
//! - `published_date` and `added_at` compare as strings, which is correct for
//!   zero-padded ISO dates; `YYYY.MM` publication dates compare as `YYYY-MM`

use crate::dates;
use crate::model::{BookField, BookRecord};
use std::borrow::Cow;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub key: Option<BookField>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn by(key: BookField, direction: SortDirection) -> Self {
        Self {
            key: Some(key),
            direction,
        }
    }

    /// Column-header click: flips the active column, or activates a new one
    /// ascending.
    pub fn toggle(&mut self, key: BookField) {
        if self.key == Some(key) {
            self.direction = self.direction.flipped();
        } else {
            self.key = Some(key);
            self.direction = SortDirection::Ascending;
        }
    }

    pub fn indicator(&self, key: BookField) -> &'static str {
        match (self.key == Some(key), self.direction) {
            (false, _) => "⇅",
            (true, SortDirection::Ascending) => "▲",
            (true, SortDirection::Descending) => "▼",
        }
    }
}

pub fn compare(a: &BookRecord, b: &BookRecord, key: BookField) -> Ordering {
    match key {
        BookField::Pages => a.pages.cmp(&b.pages),
        BookField::PublishedDate => published_key(a).cmp(&published_key(b)),
        _ => a.text(key).cmp(&b.text(key)),
    }
}

fn published_key(record: &BookRecord) -> Cow<'_, str> {
    let normalized = dates::normalize_month_format(&record.published_date);
    if normalized.is_empty() {
        Cow::Borrowed(record.published_date.as_str())
    } else {
        Cow::Owned(normalized)
    }
}

pub fn apply<'a>(mut records: Vec<&'a BookRecord>, sort: &SortState) -> Vec<&'a BookRecord> {
    let Some(key) = sort.key else {
        return records;
    };
    // sort_by is stable; reversing the comparator (not the output) keeps ties in input order.
    records.sort_by(|a, b| {
        let ord = compare(a, b, key);
        match sort.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
    records
}
