//! CLI command handling
//!
//! Dispatches CLI commands over the wire client and formats output. Every
//! command opens one connection, holds one conversation, and closes the
//! channel before returning, whatever the outcome.

use std::collections::HashMap;

use crate::commands::Commands;
use crate::common::config::Timeouts;
use crate::common::{Error, Result};
use crate::driver;
use crate::scenario;
use crate::wire::{Book, BookClient, Command};

/// Dispatch a CLI command
pub async fn dispatch(url: &str, timeouts: &Timeouts, command: Commands) -> Result<()> {
    match command {
        Commands::Run { verbose } => {
            println!("Running conversation against {}", url);

            let mut client = BookClient::connect(url, timeouts).await?;
            let result = driver::run_crud_flow(&mut client, verbose).await;
            let _ = client.close().await;
            result
        }

        Commands::Test { path, verbose } => {
            let result = scenario::run_scenario(&path, url, timeouts, verbose).await?;

            if result.passed {
                Ok(())
            } else {
                Err(Error::ScenarioFailed(format!(
                    "'{}' failed at step {}/{}: {}",
                    result.name,
                    result.steps_run,
                    result.steps_total,
                    result.error.unwrap_or_else(|| "unknown cause".to_string())
                )))
            }
        }

        Commands::Add { title, author, year } => {
            let mut client = BookClient::connect(url, timeouts).await?;
            let result = client
                .send_command(&Command::AddBook {
                    book: Book::new(&title, &author, year),
                })
                .await;
            let _ = client.close().await;

            let data = result?.into_data("add_book")?;
            match data.as_str() {
                Some(id) => println!("Added book {}", id),
                None => println!("Added book (no identifier returned)"),
            }

            Ok(())
        }

        Commands::Get { id } => {
            let mut client = BookClient::connect(url, timeouts).await?;
            let result = client.send_command(&Command::GetBook { id }).await;
            let _ = client.close().await;

            let data = result?.into_data("get_book")?;
            let book: Book = serde_json::from_value(data)?;
            print_book(&book);

            Ok(())
        }

        Commands::Update {
            id,
            title,
            author,
            year,
        } => {
            let mut client = BookClient::connect(url, timeouts).await?;
            let result = client
                .send_command(&Command::UpdateBook {
                    id: id.clone(),
                    book: Book::new(&title, &author, year),
                })
                .await;
            let _ = client.close().await;

            result?.into_data("update_book")?;
            println!("Updated book {}", id);

            Ok(())
        }

        Commands::Delete { id } => {
            let mut client = BookClient::connect(url, timeouts).await?;
            let result = client
                .send_command(&Command::DeleteBook { id: id.clone() })
                .await;
            let _ = client.close().await;

            result?.into_data("delete_book")?;
            println!("Deleted book {}", id);

            Ok(())
        }

        Commands::List => {
            let mut client = BookClient::connect(url, timeouts).await?;
            let result = client.send_command(&Command::GetBooks).await;
            let _ = client.close().await;

            let data = result?.into_data("get_books")?;
            let books: HashMap<String, Book> = serde_json::from_value(data)?;

            if books.is_empty() {
                println!("No books stored");
            } else {
                let mut entries: Vec<_> = books.into_iter().collect();
                entries.sort_by(|(a, _), (b, _)| a.cmp(b));
                for (id, book) in entries {
                    println!("{}  {} by {} ({})", id, book.title, book.author, book.year);
                }
            }

            Ok(())
        }
    }
}

fn print_book(book: &Book) {
    println!("Title:  {}", book.title);
    println!("Author: {}", book.author);
    println!("Year:   {}", book.year);
}
