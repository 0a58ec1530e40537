use crate::backend::{Backend, BooksPayload};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{CatalogError, Result};
use crate::store::RecordStore;
use tracing::{debug, warn};

/// Sends the whole store to the backend.
///
/// Any failure, whether the server declines or the request never completes,
/// comes back as [`CatalogError::Save`] so the caller can stay in edit mode.
pub fn run<B: Backend>(backend: &mut B, store: &RecordStore) -> Result<CmdResult> {
    debug!(count = store.len(), "Saving books");

    let payload = BooksPayload::new(store.records()).with_unreadable(store.unreadable());
    let ack = backend
        .update_books(&payload)
        .map_err(|e| match e {
            CatalogError::Save(message) => CatalogError::Save(message),
            other => CatalogError::Save(other.to_string()),
        })?;

    if !ack.success {
        let message = ack
            .message
            .unwrap_or_else(|| "server did not accept the changes".to_string());
        warn!(%message, "Save rejected");
        return Err(CatalogError::Save(message));
    }

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(
        ack.message
            .unwrap_or_else(|| format!("Saved {} books", store.len())),
    ));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::{fixtures::sample_store, InMemoryBackend};

    #[test]
    fn save_sends_full_store() {
        let store = sample_store();
        let mut backend = InMemoryBackend::new();

        run(&mut backend, &store).unwrap();

        assert_eq!(backend.saved_payloads().len(), 1);
        assert_eq!(backend.saved_payloads()[0], store.records());
    }

    #[test]
    fn save_returns_unreadable_entries() {
        let mut store = sample_store();
        store.keep_unreadable(vec![serde_json::json!({"title": "no id"})]);
        let mut backend = InMemoryBackend::new();

        run(&mut backend, &store).unwrap();

        assert_eq!(backend.unreadable(), store.unreadable());
    }

    #[test]
    fn rejected_save_carries_server_message() {
        let store = sample_store();
        let mut backend = InMemoryBackend::new().rejecting_saves("locked");

        let err = run(&mut backend, &store).unwrap_err();

        assert!(matches!(err, CatalogError::Save(ref m) if m == "locked"));
    }

    #[test]
    fn transport_failure_becomes_save_error() {
        let store = sample_store();
        let mut backend = InMemoryBackend::new().offline();

        let err = run(&mut backend, &store).unwrap_err();

        assert!(matches!(err, CatalogError::Save(_)));
    }
}
