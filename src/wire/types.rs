//! Wire protocol message types
//!
//! Every exchange is one JSON object per UTF-8 text frame. Commands are
//! tagged by `action`, responses by `type`. The shape of a success `data`
//! payload depends on the originating command (an identifier for
//! `add_book`, a record for `get_book`, a map for `get_books`, null for
//! `update_book`/`delete_book`), so it stays an opaque [`serde_json::Value`]
//! until the caller interprets it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A book record as it travels on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub author: String,
    #[serde(deserialize_with = "year_from_number_or_string")]
    pub year: u16,
}

/// The server tolerates `"year": "2023"` alongside `"year": 2023`.
fn year_from_number_or_string<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum YearRepr {
        Num(u16),
        Str(String),
    }

    match YearRepr::deserialize(deserializer)? {
        YearRepr::Num(n) => Ok(n),
        YearRepr::Str(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

impl Book {
    pub fn new(title: &str, author: &str, year: u16) -> Self {
        Self {
            title: title.to_string(),
            author: author.to_string(),
            year,
        }
    }
}

/// Out-bound command sent to the book service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Command {
    /// List all books
    GetBooks,

    /// Fetch one book by identifier
    GetBook { id: String },

    /// Create a book; the server assigns and returns the identifier
    AddBook { book: Book },

    /// Replace the record stored under an identifier
    UpdateBook { id: String, book: Book },

    /// Remove the record stored under an identifier
    DeleteBook { id: String },
}

impl Command {
    /// The wire-level action name, used in step diagnostics.
    pub fn action(&self) -> &'static str {
        match self {
            Command::GetBooks => "get_books",
            Command::GetBook { .. } => "get_book",
            Command::AddBook { .. } => "add_book",
            Command::UpdateBook { .. } => "update_book",
            Command::DeleteBook { .. } => "delete_book",
        }
    }
}

/// In-bound response from the book service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    Success {
        #[serde(default)]
        data: Value,
    },
    Error {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl Response {
    /// The outcome discriminator as it appears on the wire.
    pub fn outcome(&self) -> &'static str {
        match self {
            Response::Success { .. } => "Success",
            Response::Error { .. } => "Error",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success { .. })
    }

    /// Unwrap a success payload; a server `Error` becomes [`crate::Error::ServerError`].
    ///
    /// For one-shot commands where the server's refusal is the answer, not a
    /// broken contract.
    pub fn into_data(self, action: &str) -> crate::Result<Value> {
        match self {
            Response::Success { data } => Ok(data),
            Response::Error { message } => Err(crate::Error::server_error(action, message)),
        }
    }
}
