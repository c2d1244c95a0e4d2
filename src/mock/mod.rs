//! In-memory mock of the book service
//!
//! Implements the wire contract over an in-memory store so the harness can
//! be exercised without a real deployment. Integration tests run it
//! in-process; the `mock-server` binary serves the same loop standalone.
//! Being test tooling, it favors `unwrap` over error plumbing.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

use crate::common::Result;
use crate::wire::{Book, Command, Response};

/// Book storage keyed by server-assigned identifiers
pub struct BookStore {
    books: RwLock<HashMap<String, Book>>,
    next_id: AtomicU64,
}

impl BookStore {
    pub fn new() -> Self {
        Self {
            books: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn get_books(&self) -> HashMap<String, Book> {
        self.books.read().unwrap().clone()
    }

    pub fn get_book(&self, id: &str) -> Option<Book> {
        self.books.read().unwrap().get(id).cloned()
    }

    /// Insert a book under a fresh identifier and return it
    ///
    /// The identifier is opaque to clients; only round-trip equality
    /// matters.
    pub fn add_book(&self, book: Book) -> String {
        let id = format!("book-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.books.write().unwrap().insert(id.clone(), book);
        id
    }

    pub fn update_book(&self, id: &str, book: Book) -> bool {
        if let Some(existing) = self.books.write().unwrap().get_mut(id) {
            *existing = book;
            true
        } else {
            false
        }
    }

    pub fn delete_book(&self, id: &str) -> bool {
        self.books.write().unwrap().remove(id).is_some()
    }
}

impl Default for BookStore {
    fn default() -> Self {
        Self::new()
    }
}

/// WebSocket server wrapping a [`BookStore`]
pub struct MockServer {
    listener: TcpListener,
    addr: SocketAddr,
    store: Arc<BookStore>,
}

impl MockServer {
    /// Bind to an address; use port 0 to let the OS pick one
    pub async fn bind(addr: &str) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        Ok(Self {
            listener,
            addr,
            store: Arc::new(BookStore::new()),
        })
    }

    /// The ws:// URL clients should connect to
    pub fn url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Accept connections until the task is dropped
    ///
    /// Each connection gets its own task; all of them share the store.
    pub async fn run(self) -> Result<()> {
        loop {
            let (stream, peer) = self.listener.accept().await?;
            tracing::debug!(%peer, "client connected");
            tokio::spawn(handle_connection(stream, Arc::clone(&self.store)));
        }
    }
}

async fn handle_connection(stream: TcpStream, store: Arc<BookStore>) {
    let mut ws = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            tracing::warn!(error = %e, "handshake failed");
            return;
        }
    };

    while let Some(msg) = ws.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(error = %e, "read failed, dropping connection");
                break;
            }
        };

        match msg {
            Message::Text(text) => {
                let response = dispatch(&store, &text);
                let json = serde_json::to_string(&response).unwrap();
                if ws.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }
}

/// Map one command to one response, mirroring the real service
fn dispatch(store: &BookStore, text: &str) -> Response {
    match serde_json::from_str::<Command>(text) {
        Ok(Command::GetBooks) => Response::Success {
            data: json!(store.get_books()),
        },
        Ok(Command::GetBook { id }) => match store.get_book(&id) {
            Some(book) => Response::Success { data: json!(book) },
            None => not_found(),
        },
        Ok(Command::AddBook { book }) => Response::Success {
            data: json!(store.add_book(book)),
        },
        Ok(Command::UpdateBook { id, book }) => {
            if store.update_book(&id, book) {
                Response::Success { data: json!(null) }
            } else {
                not_found()
            }
        }
        Ok(Command::DeleteBook { id }) => {
            if store.delete_book(&id) {
                Response::Success { data: json!(null) }
            } else {
                not_found()
            }
        }
        Err(e) => Response::Error {
            message: Some(format!("Invalid command format: {}", e)),
        },
    }
}

fn not_found() -> Response {
    Response::Error {
        message: Some("Book not found".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_assigns_distinct_ids() {
        let store = BookStore::new();
        let a = store.add_book(Book::new("T", "A", 2023));
        let b = store.add_book(Book::new("U", "B", 2024));
        assert_ne!(a, b);
        assert_eq!(store.get_books().len(), 2);
    }

    #[test]
    fn store_round_trips_records() {
        let store = BookStore::new();
        let id = store.add_book(Book::new("T", "A", 2023));
        assert_eq!(store.get_book(&id), Some(Book::new("T", "A", 2023)));
    }

    #[test]
    fn update_and_delete_require_existing_id() {
        let store = BookStore::new();
        assert!(!store.update_book("book-99", Book::new("T", "A", 2023)));
        assert!(!store.delete_book("book-99"));

        let id = store.add_book(Book::new("T", "A", 2023));
        assert!(store.update_book(&id, Book::new("U", "A", 2024)));
        assert_eq!(store.get_book(&id).unwrap().title, "U");
        assert!(store.delete_book(&id));
        assert!(store.get_book(&id).is_none());
    }

    #[test]
    fn dispatch_mirrors_the_wire_contract() {
        let store = BookStore::new();

        let resp = dispatch(
            &store,
            r#"{"action":"add_book","book":{"title":"T","author":"A","year":2023}}"#,
        );
        let id = match resp {
            Response::Success { data } => data.as_str().unwrap().to_string(),
            other => panic!("Expected Success, got {:?}", other),
        };

        let resp = dispatch(&store, &format!(r#"{{"action":"get_book","id":"{}"}}"#, id));
        match resp {
            Response::Success { data } => assert_eq!(data["title"], "T"),
            other => panic!("Expected Success, got {:?}", other),
        }

        let resp = dispatch(&store, r#"{"action":"get_book","id":"missing"}"#);
        assert!(!resp.is_success());
    }

    #[test]
    fn dispatch_rejects_malformed_commands_as_error_response() {
        let store = BookStore::new();
        let resp = dispatch(&store, "not json");
        assert!(!resp.is_success());

        let resp = dispatch(&store, r#"{"action":"burn_book","id":"book-1"}"#);
        assert!(!resp.is_success());
    }
}
