//! Wire contract for the book service: message types and the client

pub mod client;
pub mod types;

pub use client::BookClient;
pub use types::{Book, Command, Response};
