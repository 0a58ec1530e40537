use crate::backend::Backend;
use crate::commands::{CmdMessage, CmdResult};
use crate::store::RecordStore;
use tracing::{error, info};

/// Replaces the store with whatever the backend returns.
///
/// A failed load never aborts the caller: the store is left empty, the
/// failure is logged and a warning is returned instead.
pub fn run<B: Backend>(backend: &B, store: &mut RecordStore) -> CmdResult {
    let mut result = CmdResult::default();

    match backend.fetch_books() {
        Ok(list) => {
            let fetched = list.books.len();
            let unreadable = list.unreadable.len();
            let duplicates = store.replace_all(list.books);
            store.keep_unreadable(list.unreadable);
            info!(count = store.len(), "Books loaded");
            if duplicates > 0 {
                result.add_message(CmdMessage::warning(format!(
                    "Hid {} of {} books with duplicate ids; saving keeps them unchanged",
                    duplicates, fetched
                )));
            }
            if unreadable > 0 {
                result.add_message(CmdMessage::warning(format!(
                    "Could not read {} catalog entries; saving keeps them unchanged",
                    unreadable
                )));
            }
        }
        Err(e) => {
            error!(error = %e, "Failed to load books");
            store.clear();
            result.add_message(CmdMessage::warning(format!(
                "Could not load books: {}",
                e
            )));
        }
    }

    result
}
