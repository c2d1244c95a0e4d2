//! Scripted CRUD conversation
//!
//! Drives the fixed add → get → update → get → delete → get sequence over
//! one open channel and fails the run on the first deviation. There is
//! exactly one conversation, run once, to completion or first failure; the
//! caller owns the channel and closes it on every exit path.

use colored::Colorize;
use serde_json::Value;

use crate::common::{Error, Result};
use crate::wire::{Book, BookClient, Command, Response};

const STEPS_TOTAL: usize = 6;

/// Run the built-in conversation against an open channel
///
/// With `verbose` set, every frame is echoed as pretty-printed JSON.
pub async fn run_crud_flow(client: &mut BookClient, verbose: bool) -> Result<()> {
    let created = Book::new("The Rust Programming Language", "Steve Klabnik", 2023);
    let revised = Book::new(
        "The Rust Programming Language - Second Edition",
        "Steve Klabnik",
        2024,
    );

    // Step 1: create, capturing the server-assigned identifier
    let response = exchange(client, &Command::AddBook { book: created.clone() }, verbose).await?;
    let data = expect_success("add_book", response)?;
    let id = id_from_data("add_book", &data)?;
    report_step(1, &format!("add_book (id {})", id));

    // Step 2: read back, title must match what was sent
    let response = exchange(client, &Command::GetBook { id: id.clone() }, verbose).await?;
    let data = expect_success("get_book", response)?;
    let book = book_from_data("get_book", &data)?;
    check_field("get_book", "title", &created.title, &book.title)?;
    report_step(2, "get_book");

    // Step 3: replace the record
    let response = exchange(
        client,
        &Command::UpdateBook {
            id: id.clone(),
            book: revised.clone(),
        },
        verbose,
    )
    .await?;
    expect_success("update_book", response)?;
    report_step(3, "update_book");

    // Step 4: read again, must reflect the revision
    let response = exchange(client, &Command::GetBook { id: id.clone() }, verbose).await?;
    let data = expect_success("get_book (after update)", response)?;
    let book = book_from_data("get_book (after update)", &data)?;
    check_field("get_book (after update)", "title", &revised.title, &book.title)?;
    report_step(4, "get_book (after update)");

    // Step 5: destroy
    let response = exchange(client, &Command::DeleteBook { id: id.clone() }, verbose).await?;
    expect_success("delete_book", response)?;
    report_step(5, "delete_book");

    // Step 6: the record must be gone
    let response = exchange(client, &Command::GetBook { id }, verbose).await?;
    expect_error("get_book (after delete)", response)?;
    report_step(6, "get_book (after delete)");

    println!("\n{} {}\n", "✓".green().bold(), "All steps passed".green().bold());

    Ok(())
}

async fn exchange(
    client: &mut BookClient,
    command: &Command,
    verbose: bool,
) -> Result<Response> {
    if verbose {
        println!("{}", serde_json::to_string_pretty(command)?.dimmed());
    }
    let response = client.send_command(command).await?;
    if verbose {
        println!("{}", serde_json::to_string_pretty(&response)?.dimmed());
    }
    Ok(response)
}

fn report_step(num: usize, label: &str) {
    println!(
        "  {} Step {}/{}: {}",
        "✓".green(),
        num,
        STEPS_TOTAL,
        label.dimmed()
    );
}

/// Unwrap a success payload, or fail the step with expected vs. actual
fn expect_success(step: &str, response: Response) -> Result<Value> {
    match response {
        Response::Success { data } => Ok(data),
        Response::Error { message } => Err(Error::unexpected_outcome(
            step,
            "Success",
            &match message {
                Some(msg) => format!("Error ({})", msg),
                None => "Error".to_string(),
            },
        )),
    }
}

/// Require an error outcome, or fail the step
fn expect_error(step: &str, response: Response) -> Result<()> {
    match response {
        Response::Error { .. } => Ok(()),
        Response::Success { data } => Err(Error::unexpected_outcome(
            step,
            "Error",
            &format!("Success (data: {})", data),
        )),
    }
}

/// Pull the created identifier out of an `add_book` payload
fn id_from_data(step: &str, data: &Value) -> Result<String> {
    data.as_str()
        .map(str::to_string)
        .ok_or_else(|| Error::missing_data(step, "identifier"))
}

/// Parse a book record out of a `get_book` payload
fn book_from_data(step: &str, data: &Value) -> Result<Book> {
    serde_json::from_value(data.clone())
        .map_err(|_| Error::missing_data(step, "book record"))
}

fn check_field(step: &str, field: &str, expected: &str, actual: &str) -> Result<()> {
    if expected != actual {
        return Err(Error::field_mismatch(step, field, expected, actual));
    }
    Ok(())
}
