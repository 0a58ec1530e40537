#![allow(dead_code)]

use bookshelf::model::BookRecord;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

pub fn book(
    id: i64,
    title: &str,
    author: &str,
    shelf: &str,
    published: &str,
    pages: u32,
    added: &str,
) -> BookRecord {
    let mut record = BookRecord::new(id, title);
    record.author = author.into();
    record.shelf = shelf.into();
    record.published_date = published.into();
    record.pages = Some(pages);
    record.added_at = added.into();
    record.isbn = format!("97841010{:05}", id);
    record
}

pub fn sample_books() -> Vec<BookRecord> {
    vec![
        book(1, "吾輩は猫である", "夏目漱石", "A-1", "1905-10", 300, "2024-01-10"),
        book(2, "走れメロス", "太宰治", "B-2", "1940", 96, "2024-02-15"),
        book(3, "こころ", "夏目漱石", "A-2", "1914.04", 280, "2024-03-01"),
        book(4, "人間失格", "太宰治", "B-1", "1948-07", 176, "2024-04-20"),
    ]
}

pub fn books_json(books: &[BookRecord]) -> String {
    serde_json::json!({ "books": books }).to_string()
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub body: String,
}

/// A tiny HTTP/1.1 server answering each path with a fixed status and body.
/// Unknown paths get a 404 with an empty body. Every request is recorded.
pub struct CannedServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl CannedServer {
    pub fn start(routes: &[(&str, u16, &str)]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let routes: HashMap<String, (u16, String)> = routes
            .iter()
            .map(|(path, status, body)| (path.to_string(), (*status, body.to_string())))
            .collect();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                handle(stream, &routes, &recorded);
            }
        });

        Self { base_url, requests }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

fn handle(
    mut stream: TcpStream,
    routes: &HashMap<String, (u16, String)>,
    recorded: &Arc<Mutex<Vec<Recorded>>>,
) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 || line == "\r\n" {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
    }

    let mut body = vec![0u8; content_length];
    let _ = reader.read_exact(&mut body);
    recorded.lock().unwrap().push(Recorded {
        method,
        path: path.clone(),
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    let (status, payload) = routes
        .get(&path)
        .cloned()
        .unwrap_or((404, String::new()));
    let response = format!(
        "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        payload.len(),
        payload
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

/// A base URL nothing is listening on.
pub fn dead_server_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    url
}
