//! HTTP backend using a blocking reqwest client

use crate::backend::{decode_books, Backend, BookList, BooksPayload, RegistrationAck, SaveAck};
use crate::commands::register::RegistrationRequest;
use crate::config::CatalogConfig;
use crate::error::{CatalogError, Result};
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("bookshelf/", env!("CARGO_PKG_VERSION"));

/// Talks JSON to the catalog server.
///
/// One request per operation, no retries: a failed save is retried by the
/// user saving again.
pub struct HttpBackend {
    client: Client,
    load_url: String,
    save_url: String,
    register_url: String,
}

impl HttpBackend {
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            load_url: config.endpoint(&config.load_path),
            save_url: config.endpoint(&config.save_path),
            register_url: config.endpoint(&config.register_path),
        })
    }

    pub fn load_url(&self) -> &str {
        &self.load_url
    }

    fn send(&self, request: RequestBuilder, url: &str) -> Result<(u16, Vec<u8>)> {
        debug!(url, "Sending request");

        let response = request.send().map_err(|e| {
            warn!(url, error = %e, "Request failed");
            if e.is_connect() || e.is_timeout() {
                CatalogError::Unreachable(format!("{}: {}", url, e))
            } else {
                CatalogError::Transport(e)
            }
        })?;

        let status = response.status().as_u16();
        let body = response.bytes()?.to_vec();
        debug!(url, status, bytes = body.len(), "Response received");
        Ok((status, body))
    }
}

impl Backend for HttpBackend {
    fn fetch_books(&self) -> Result<BookList> {
        let (status, body) = self.send(self.client.get(&self.load_url), &self.load_url)?;
        if !is_success(status) {
            warn!(status, "Load returned an error status");
            return Err(CatalogError::UnexpectedStatus(status));
        }
        decode_books(&body)
    }

    fn update_books(&mut self, payload: &BooksPayload<'_>) -> Result<SaveAck> {
        let request = self.client.post(&self.save_url).json(payload);
        let (status, body) = self.send(request, &self.save_url)?;

        let mut ack: SaveAck = read_ack(status, &body)?;
        if !is_success(status) {
            ack.success = false;
        }
        Ok(ack)
    }

    fn register(&mut self, request: &RegistrationRequest) -> Result<RegistrationAck> {
        let builder = self.client.post(&self.register_url).json(request);
        let (status, body) = self.send(builder, &self.register_url)?;

        let mut ack: RegistrationAck = read_ack(status, &body)?;
        if !is_success(status) {
            ack.success = false;
        }
        Ok(ack)
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Decodes an acknowledgment body. Error statuses without a readable body
/// surface as the status itself.
fn read_ack<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<T> {
    match serde_json::from_slice::<T>(body) {
        Ok(ack) => Ok(ack),
        Err(_) if !is_success(status) => Err(CatalogError::UnexpectedStatus(status)),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_come_from_config() {
        let mut config = CatalogConfig::default();
        config.set_server_url("http://books.local:9000/");
        let backend = HttpBackend::new(&config).unwrap();
        assert_eq!(backend.load_url(), "http://books.local:9000/fetch_books.php");
        assert_eq!(backend.save_url, "http://books.local:9000/update_books.php");
        assert_eq!(
            backend.register_url,
            "http://books.local:9000/register_books.php"
        );
    }

    #[test]
    fn rejects_non_http_server() {
        let mut config = CatalogConfig::default();
        config.set_server_url("books.local");
        assert!(matches!(
            HttpBackend::new(&config),
            Err(CatalogError::Config(_))
        ));
    }

    #[test]
    fn read_ack_uses_error_body_when_readable() {
        let ack: SaveAck = read_ack(500, br#"{"success":false,"message":"db down"}"#).unwrap();
        assert_eq!(ack.message.as_deref(), Some("db down"));
    }

    #[test]
    fn read_ack_reports_status_for_unreadable_errors() {
        let err = read_ack::<SaveAck>(502, b"Bad Gateway").unwrap_err();
        assert!(matches!(err, CatalogError::UnexpectedStatus(502)));
    }

    #[test]
    fn read_ack_garbage_success_is_decode_error() {
        let err = read_ack::<SaveAck>(200, b"<html>").unwrap_err();
        assert!(matches!(err, CatalogError::Serialization(_)));
    }
}
