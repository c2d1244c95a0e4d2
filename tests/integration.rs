//! End-to-end tests for the harness
//!
//! Each test spins up its own in-process mock service on an ephemeral port
//! and drives it through the wire client, so state never leaks between
//! tests and no external server is needed.

use std::collections::HashMap;
use std::path::PathBuf;

use bookwire::common::config::Timeouts;
use bookwire::driver;
use bookwire::mock::MockServer;
use bookwire::scenario;
use bookwire::wire::{Book, BookClient, Command, Response};
use bookwire::FaultKind;

/// Start a fresh mock service and return its endpoint URL
async fn start_mock() -> String {
    let server = MockServer::bind("127.0.0.1:0").await.expect("bind mock server");
    let url = server.url();
    tokio::spawn(server.run());
    url
}

async fn connect(url: &str) -> BookClient {
    BookClient::connect(url, &Timeouts::default())
        .await
        .expect("connect to mock server")
}

/// Add a book and return the assigned identifier
async fn add_book(client: &mut BookClient, title: &str, author: &str, year: u16) -> String {
    let response = client
        .send_command(&Command::AddBook {
            book: Book::new(title, author, year),
        })
        .await
        .expect("send add_book");

    match response {
        Response::Success { data } => data.as_str().expect("identifier").to_string(),
        other => panic!("Expected Success, got {:?}", other),
    }
}

async fn get_book(client: &mut BookClient, id: &str) -> Response {
    client
        .send_command(&Command::GetBook { id: id.to_string() })
        .await
        .expect("send get_book")
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

// ============== Tests ==============

#[tokio::test]
async fn crud_flow_passes_against_mock() {
    let url = start_mock().await;
    let mut client = connect(&url).await;

    driver::run_crud_flow(&mut client, false)
        .await
        .expect("built-in conversation should pass");

    let _ = client.close().await;
}

#[tokio::test]
async fn add_then_get_returns_the_same_record() {
    let url = start_mock().await;
    let mut client = connect(&url).await;

    let id = add_book(&mut client, "The Rust Programming Language", "Steve Klabnik", 2023).await;

    match get_book(&mut client, &id).await {
        Response::Success { data } => {
            let book: Book = serde_json::from_value(data).expect("book record");
            assert_eq!(
                book,
                Book::new("The Rust Programming Language", "Steve Klabnik", 2023)
            );
        }
        other => panic!("Expected Success, got {:?}", other),
    }

    let _ = client.close().await;
}

#[tokio::test]
async fn repeated_get_without_mutation_is_stable() {
    let url = start_mock().await;
    let mut client = connect(&url).await;

    let id = add_book(&mut client, "T", "A", 2023).await;

    let first = get_book(&mut client, &id).await;
    let second = get_book(&mut client, &id).await;

    match (first, second) {
        (Response::Success { data: a }, Response::Success { data: b }) => assert_eq!(a, b),
        other => panic!("Expected two Success responses, got {:?}", other),
    }

    let _ = client.close().await;
}

#[tokio::test]
async fn update_is_reflected_by_the_next_get() {
    let url = start_mock().await;
    let mut client = connect(&url).await;

    let id = add_book(&mut client, "T", "A", 2023).await;

    let response = client
        .send_command(&Command::UpdateBook {
            id: id.clone(),
            book: Book::new("U", "B", 2024),
        })
        .await
        .expect("send update_book");
    assert!(response.is_success(), "update failed: {:?}", response);

    match get_book(&mut client, &id).await {
        Response::Success { data } => {
            let book: Book = serde_json::from_value(data).expect("book record");
            assert_eq!(book, Book::new("U", "B", 2024));
        }
        other => panic!("Expected Success, got {:?}", other),
    }

    let _ = client.close().await;
}

#[tokio::test]
async fn deleted_book_stays_deleted() {
    let url = start_mock().await;
    let mut client = connect(&url).await;

    let id = add_book(&mut client, "T", "A", 2023).await;

    let response = client
        .send_command(&Command::DeleteBook { id: id.clone() })
        .await
        .expect("send delete_book");
    assert!(response.is_success(), "delete failed: {:?}", response);

    // No resurrection on retry
    for _ in 0..3 {
        let response = get_book(&mut client, &id).await;
        assert!(
            !response.is_success(),
            "deleted book came back: {:?}",
            response
        );
    }

    let _ = client.close().await;
}

#[tokio::test]
async fn never_created_identifier_yields_error_outcome() {
    let url = start_mock().await;
    let mut client = connect(&url).await;

    let response = get_book(&mut client, "no-such-book").await;
    match response {
        Response::Error { .. } => {}
        other => panic!("Expected Error, got {:?}", other),
    }

    let _ = client.close().await;
}

#[tokio::test]
async fn listing_reflects_additions() {
    let url = start_mock().await;
    let mut client = connect(&url).await;

    let id_a = add_book(&mut client, "T", "A", 2023).await;
    let id_b = add_book(&mut client, "U", "B", 2024).await;

    let response = client
        .send_command(&Command::GetBooks)
        .await
        .expect("send get_books");

    match response {
        Response::Success { data } => {
            let books: HashMap<String, Book> =
                serde_json::from_value(data).expect("book listing");
            assert_eq!(books.len(), 2);
            assert_eq!(books[&id_a].title, "T");
            assert_eq!(books[&id_b].title, "U");
        }
        other => panic!("Expected Success, got {:?}", other),
    }

    let _ = client.close().await;
}

#[tokio::test]
async fn unreachable_endpoint_reports_connectivity_fault() {
    // Grab an ephemeral port, then free it so nothing is listening there
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe listener");
    let addr = listener.local_addr().expect("probe addr");
    drop(listener);

    let url = format!("ws://{}/ws", addr);
    let err = BookClient::connect(&url, &Timeouts::default())
        .await
        .err()
        .expect("connect should fail");

    assert_eq!(err.kind(), FaultKind::Connectivity);
    assert!(
        err.to_string().contains("Is the server running?"),
        "missing hint in: {}",
        err
    );
}

#[tokio::test]
async fn scenario_fixture_passes_against_mock() {
    let url = start_mock().await;

    let result = scenario::run_scenario(&fixture("crud.yaml"), &url, &Timeouts::default(), false)
        .await
        .expect("scenario should run");

    assert!(result.passed, "scenario failed: {:?}", result.error);
    assert_eq!(result.steps_run, result.steps_total);
}

#[tokio::test]
async fn missing_book_fixture_passes_against_mock() {
    let url = start_mock().await;

    let result = scenario::run_scenario(
        &fixture("missing_book.yaml"),
        &url,
        &Timeouts::default(),
        false,
    )
    .await
    .expect("scenario should run");

    assert!(result.passed, "scenario failed: {:?}", result.error);
}

#[tokio::test]
async fn scenario_reports_field_mismatch_in_result() {
    let url = start_mock().await;

    let dir = std::env::temp_dir().join("bookwire-tests");
    std::fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join("wrong_title.yaml");
    std::fs::write(
        &path,
        r#"
name: wrong title
steps:
  - action: add_book
    book:
      title: "T"
      author: "A"
      year: 2023
  - action: get_book
    expect:
      title: "Something Else"
"#,
    )
    .expect("write scenario");

    let result = scenario::run_scenario(&path, &url, &Timeouts::default(), false)
        .await
        .expect("scenario should run");

    assert!(!result.passed);
    assert_eq!(result.steps_run, 2);
    let error = result.error.expect("failure cause");
    assert!(error.contains("title"), "unexpected cause: {}", error);
}

#[tokio::test]
async fn scenario_without_captured_id_fails_cleanly() {
    let url = start_mock().await;

    let dir = std::env::temp_dir().join("bookwire-tests");
    std::fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join("no_capture.yaml");
    std::fs::write(
        &path,
        r#"
name: no capture
steps:
  - action: delete_book
"#,
    )
    .expect("write scenario");

    let result = scenario::run_scenario(&path, &url, &Timeouts::default(), false)
        .await
        .expect("scenario should run");

    assert!(!result.passed);
    let error = result.error.expect("failure cause");
    assert!(error.contains("id"), "unexpected cause: {}", error);
}
