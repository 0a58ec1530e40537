//! # Filter Engine
//!
//! Narrows a list of records to the ones matching a [`FilterCriteria`].
//! Pure and linear: nothing is cached, the input is never mutated, and the
//! relative order of the input is preserved.
//!
//! A present range bound only admits records whose value can be confirmed to
//! satisfy it. Records with an empty or unparsable value for that column are
//! dropped while the bound is active; they are never treated as 0 or infinity.

use crate::model::{BookField, BookRecord};
use std::borrow::Borrow;

/// An inclusive range with optional ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bounds<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T> Default for Bounds<T> {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
        }
    }
}

impl<T> Bounds<T> {
    pub fn new(min: Option<T>, max: Option<T>) -> Self {
        Self { min, max }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn admits<V>(&self, value: Option<&V>) -> bool
    where
        T: Borrow<V>,
        V: PartialOrd + ?Sized,
    {
        if self.is_unbounded() {
            return true;
        }
        let Some(value) = value else {
            return false;
        };
        let above_min = self.min.as_ref().map_or(true, |min| value >= min.borrow());
        let below_max = self.max.as_ref().map_or(true, |max| value <= max.borrow());
        above_min && below_max
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub shelf: String,
    pub isbn: String,
    pub year: Bounds<i32>,
    pub pages: Bounds<u32>,
    pub added: Bounds<String>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        *self == FilterCriteria::default()
    }

    /// Sets one of the five substring filters.
    ///
    /// Returns `false` for columns that only support range filtering.
    pub fn set_text(&mut self, field: BookField, value: impl Into<String>) -> bool {
        let slot = match field {
            BookField::Title => &mut self.title,
            BookField::Author => &mut self.author,
            BookField::Publisher => &mut self.publisher,
            BookField::Shelf => &mut self.shelf,
            BookField::Isbn => &mut self.isbn,
            BookField::PublishedDate | BookField::Pages | BookField::AddedAt => return false,
        };
        *slot = value.into();
        true
    }

    pub fn matches(&self, record: &BookRecord) -> bool {
        record.title.contains(self.title.as_str())
            && record.author.contains(self.author.as_str())
            && record.publisher.contains(self.publisher.as_str())
            && record.shelf.contains(self.shelf.as_str())
            && record.isbn.contains(self.isbn.as_str())
            && self.year.admits(record.published_year().as_ref())
            && self.pages.admits(record.pages.as_ref())
            && self.added.admits::<str>(record.added_date())
    }
}

pub fn apply<'a>(records: &'a [BookRecord], criteria: &FilterCriteria) -> Vec<&'a BookRecord> {
    records.iter().filter(|r| criteria.matches(r)).collect()
}

/// Header-bar search: title or ISBN contains `term`.
pub fn quick_search<'a>(records: &'a [BookRecord], term: &str) -> Vec<&'a BookRecord> {
    let term = term.trim();
    records
        .iter()
        .filter(|r| r.title.contains(term) || r.isbn.contains(term))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::fixtures::sample_books;
    use crate::model::BookId;

    fn ids(records: &[&BookRecord]) -> Vec<BookId> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn empty_criteria_is_identity() {
        let books = sample_books();
        let result = apply(&books, &FilterCriteria::default());
        assert_eq!(
            ids(&result),
            books.iter().map(|b| b.id.clone()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn author_substring_keeps_input_order() {
        let books = sample_books();
        let criteria = FilterCriteria {
            author: "夏目漱石".into(),
            ..Default::default()
        };
        assert_eq!(
            ids(&apply(&books, &criteria)),
            vec![BookId::Int(1), BookId::Int(3)]
        );
    }

    #[test]
    fn text_filters_are_case_sensitive() {
        let mut books = sample_books();
        books[0].publisher = "Iwanami".into();
        let criteria = FilterCriteria {
            publisher: "iwanami".into(),
            ..Default::default()
        };
        assert!(apply(&books, &criteria).is_empty());
    }

    #[test]
    fn stricter_substring_never_grows_result() {
        let books = sample_books();
        let mut previous = usize::MAX;
        for needle in ["", "A", "A-", "A-1"] {
            let criteria = FilterCriteria {
                shelf: needle.into(),
                ..Default::default()
            };
            let count = apply(&books, &criteria).len();
            assert!(count <= previous, "{} grew the result", needle);
            previous = count;
        }
    }

    #[test]
    fn pages_range_is_inclusive() {
        let books = sample_books();
        let criteria = FilterCriteria {
            pages: Bounds::new(Some(250), Some(300)),
            ..Default::default()
        };
        assert_eq!(
            ids(&apply(&books, &criteria)),
            vec![BookId::Int(1), BookId::Int(3)]
        );
    }

    #[test]
    fn year_range_uses_published_year() {
        let books = sample_books();
        let criteria = FilterCriteria {
            year: Bounds::new(Some(1910), Some(1945)),
            ..Default::default()
        };
        assert_eq!(
            ids(&apply(&books, &criteria)),
            vec![BookId::Int(2), BookId::Int(3)]
        );
    }

    #[test]
    fn inverted_year_range_is_empty() {
        let books = sample_books();
        for (min, max) in [(1950, 1900), (1906, 1905), (2000, 1)] {
            let criteria = FilterCriteria {
                year: Bounds::new(Some(min), Some(max)),
                ..Default::default()
            };
            assert!(apply(&books, &criteria).is_empty());
        }
    }

    #[test]
    fn unparsable_values_fail_present_bounds() {
        let mut books = sample_books();
        books[0].published_date = "不明".into();
        books[1].pages = None;
        books[2].added_at = "0000-00-00".into();

        let by_year = FilterCriteria {
            year: Bounds::new(None, Some(3000)),
            ..Default::default()
        };
        assert!(!ids(&apply(&books, &by_year)).contains(&BookId::Int(1)));

        let by_pages = FilterCriteria {
            pages: Bounds::new(Some(0), None),
            ..Default::default()
        };
        assert!(!ids(&apply(&books, &by_pages)).contains(&BookId::Int(2)));

        let by_added = FilterCriteria {
            added: Bounds::new(None, Some("9999-12-31".into())),
            ..Default::default()
        };
        assert!(!ids(&apply(&books, &by_added)).contains(&BookId::Int(3)));
    }

    #[test]
    fn unparsable_values_pass_when_unbounded() {
        let mut books = sample_books();
        books[0].published_date = "garbage".into();
        books[0].pages = None;
        assert_eq!(apply(&books, &FilterCriteria::default()).len(), books.len());
    }

    #[test]
    fn added_range_compares_date_strings() {
        let books = sample_books();
        let criteria = FilterCriteria {
            added: Bounds::new(Some("2024-02-01".into()), Some("2024-03-31".into())),
            ..Default::default()
        };
        assert_eq!(
            ids(&apply(&books, &criteria)),
            vec![BookId::Int(2), BookId::Int(3)]
        );
    }

    #[test]
    fn set_text_rejects_range_columns() {
        let mut criteria = FilterCriteria::default();
        assert!(criteria.set_text(BookField::Isbn, "978"));
        assert!(!criteria.set_text(BookField::Pages, "100"));
        assert_eq!(criteria.isbn, "978");
        assert!(!criteria.is_empty());
    }

    #[test]
    fn quick_search_matches_title_or_isbn() {
        let books = sample_books();
        assert_eq!(
            ids(&quick_search(&books, "人間")),
            vec![BookId::Int(4)]
        );
        assert_eq!(
            ids(&quick_search(&books, "9784101006")),
            vec![BookId::Int(2), BookId::Int(4)]
        );
        assert_eq!(quick_search(&books, "").len(), books.len());
    }
}
