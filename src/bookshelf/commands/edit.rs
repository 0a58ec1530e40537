use crate::commands::{CmdMessage, CmdResult};
use crate::model::{BookField, BookId, FieldValue};
use crate::store::RecordStore;
use tracing::{debug, warn};

/// Replaces one field of the record with `id`, in place.
///
/// Unknown ids are a no-op. A `pages` value that does not parse is rejected
/// and the record keeps its previous value; the rejection is reported as a
/// warning rather than an error so the rest of an edit batch still applies.
pub fn set_field(store: &mut RecordStore, id: &BookId, field: BookField, raw: &str) -> CmdResult {
    let mut result = CmdResult::default();

    let Some(current) = store.get(id) else {
        result.add_message(CmdMessage::info(format!(
            "No book with id {}, nothing changed",
            id
        )));
        return result;
    };

    let value = match FieldValue::parse(field, raw) {
        Ok(value) => value,
        Err(reason) => {
            warn!(%id, %field, raw, "Rejected field edit");
            result.add_message(CmdMessage::warning(format!(
                "Book {}: {} kept (was not updated): {}",
                id, field, reason
            )));
            return result;
        }
    };

    let updated = current.with_value(value);
    store.replace(updated.clone());
    debug!(%id, %field, "Field updated");

    result.add_message(CmdMessage::success(format!(
        "Book {}: {} updated",
        id, field
    )));
    result.with_affected_books(vec![updated])
}

/// Removes the record with `id` immediately. Unknown ids are a no-op.
pub fn delete(store: &mut RecordStore, id: &BookId) -> CmdResult {
    let mut result = CmdResult::default();

    match store.remove(id) {
        Some(removed) => {
            debug!(%id, "Book removed from store");
            result.add_message(CmdMessage::success(format!(
                "Book {} deleted: {}",
                id, removed.title
            )));
            result.affected_books.push(removed);
        }
        None => {
            result.add_message(CmdMessage::info(format!(
                "No book with id {}, nothing deleted",
                id
            )));
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::fixtures::sample_store;
    use crate::commands::MessageLevel;

    #[test]
    fn set_field_replaces_only_that_field() {
        let mut store = sample_store();
        let before = store.get(&BookId::Int(2)).unwrap().clone();

        let result = set_field(&mut store, &BookId::Int(2), BookField::Title, "新タイトル");

        let after = store.get(&BookId::Int(2)).unwrap();
        assert_eq!(after.title, "新タイトル");
        assert_eq!(after.author, before.author);
        assert_eq!(after.pages, before.pages);
        assert_eq!(result.affected_books.len(), 1);
        assert!(result.has_level(MessageLevel::Success));
    }

    #[test]
    fn set_field_on_unknown_id_is_noop() {
        let mut store = sample_store();
        let before = store.records().to_vec();

        let result = set_field(&mut store, &BookId::Int(99), BookField::Title, "x");

        assert_eq!(store.records(), before.as_slice());
        assert!(result.affected_books.is_empty());
        assert!(result.has_level(MessageLevel::Info));
    }

    #[test]
    fn set_pages_parses_integer() {
        let mut store = sample_store();
        set_field(&mut store, &BookId::Int(1), BookField::Pages, "512");
        assert_eq!(store.get(&BookId::Int(1)).unwrap().pages, Some(512));

        set_field(&mut store, &BookId::Int(1), BookField::Pages, "");
        assert_eq!(store.get(&BookId::Int(1)).unwrap().pages, None);
    }

    #[test]
    fn unparsable_pages_keep_previous_value() {
        let mut store = sample_store();
        let result = set_field(&mut store, &BookId::Int(1), BookField::Pages, "lots");

        assert_eq!(store.get(&BookId::Int(1)).unwrap().pages, Some(300));
        assert!(result.has_level(MessageLevel::Warning));
        assert!(result.affected_books.is_empty());
    }

    #[test]
    fn delete_removes_exactly_one() {
        let mut store = sample_store();
        let others: Vec<_> = store
            .records()
            .iter()
            .filter(|r| r.id != BookId::Int(3))
            .cloned()
            .collect();

        let result = delete(&mut store, &BookId::Int(3));

        assert_eq!(store.len(), 3);
        assert_eq!(store.records(), others.as_slice());
        assert_eq!(result.affected_books[0].title, "こころ");
    }

    #[test]
    fn delete_unknown_id_is_noop() {
        let mut store = sample_store();
        let before = store.records().to_vec();
        delete(&mut store, &BookId::Int(42));
        assert_eq!(store.records(), before.as_slice());
    }
}
