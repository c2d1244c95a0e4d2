//! Test scenario runner
//!
//! Executes YAML scenarios against the service using the wire client, so
//! assertions are made against structured responses rather than output
//! scraping. Assertion failures land in the returned [`TestResult`];
//! only setup problems (unreadable file, unreachable server) are errors.

use std::path::Path;

use colored::Colorize;
use serde_json::Value;

use crate::common::config::Timeouts;
use crate::common::{Error, Result};
use crate::wire::{Book, BookClient, Command, Response};

use super::config::{ExpectedOutcome, StepExpectation, TestScenario, TestStep};

/// Result of a scenario run
#[derive(Debug)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub steps_run: usize,
    pub steps_total: usize,
    pub error: Option<String>,
}

/// Run a test scenario from a YAML file
pub async fn run_scenario(
    path: &Path,
    default_url: &str,
    timeouts: &Timeouts,
    verbose: bool,
) -> Result<TestResult> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Scenario(format!(
            "Failed to read test scenario '{}': {}",
            path.display(),
            e
        ))
    })?;

    let scenario: TestScenario = serde_yaml::from_str(&content)
        .map_err(|e| Error::Scenario(format!("Failed to parse test scenario: {}", e)))?;

    let steps_total = scenario.steps.len();
    let url = scenario.url.as_deref().unwrap_or(default_url);

    println!(
        "\n{} {}",
        "Running Scenario:".blue().bold(),
        scenario.name.white().bold()
    );

    if let Some(desc) = &scenario.description {
        println!("  {}", desc.dimmed());
    }

    if verbose {
        println!("  endpoint: {}", url.dimmed());
    }

    let mut client = BookClient::connect(url, timeouts).await?;

    println!("\n{}", "Steps:".cyan());

    // Identifier captured from the last successful add_book
    let mut last_id: Option<String> = None;

    for (i, step) in scenario.steps.iter().enumerate() {
        let step_num = i + 1;

        match execute_step(&mut client, step, &mut last_id, step_num, verbose).await {
            Ok(()) => {}
            Err(e) => {
                println!("  {} Step {}: {}", "✗".red(), step_num, e);

                let _ = client.close().await;

                return Ok(TestResult {
                    name: scenario.name.clone(),
                    passed: false,
                    steps_run: step_num,
                    steps_total,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    let _ = client.close().await;

    println!("\n{} {}\n", "✓".green().bold(), "Scenario Passed".green().bold());

    Ok(TestResult {
        name: scenario.name,
        passed: true,
        steps_run: steps_total,
        steps_total,
        error: None,
    })
}

/// Execute a single step: build the command, exchange, check expectations
async fn execute_step(
    client: &mut BookClient,
    step: &TestStep,
    last_id: &mut Option<String>,
    step_num: usize,
    verbose: bool,
) -> Result<()> {
    let (command, expect) = match step {
        TestStep::AddBook { book, expect } => (Command::AddBook { book: book.clone() }, expect),
        TestStep::GetBook { id, expect } => (
            Command::GetBook {
                id: resolve_id(id, last_id, step_num)?,
            },
            expect,
        ),
        TestStep::UpdateBook { id, book, expect } => (
            Command::UpdateBook {
                id: resolve_id(id, last_id, step_num)?,
                book: book.clone(),
            },
            expect,
        ),
        TestStep::DeleteBook { id, expect } => (
            Command::DeleteBook {
                id: resolve_id(id, last_id, step_num)?,
            },
            expect,
        ),
        TestStep::GetBooks { expect } => (Command::GetBooks, expect),
    };

    let action = command.action();

    if verbose {
        println!("  > {}", serde_json::to_string(&command)?.dimmed());
    }

    let response = client.send_command(&command).await?;

    let default_expect = StepExpectation::default();
    let expect = expect.as_ref().unwrap_or(&default_expect);
    let expected_outcome = expect.outcome.unwrap_or_default();

    let step_label = format!("{} (step {})", action, step_num);

    match (expected_outcome, response) {
        (ExpectedOutcome::Success, Response::Success { data }) => {
            check_data(&step_label, &command, expect, &data)?;
            if let Command::AddBook { .. } = command {
                *last_id = Some(data.as_str().map(str::to_string).ok_or_else(|| {
                    Error::missing_data(&step_label, "identifier")
                })?);
            }
        }
        (ExpectedOutcome::Error, Response::Error { .. }) => {}
        (ExpectedOutcome::Success, Response::Error { message }) => {
            return Err(Error::unexpected_outcome(
                &step_label,
                "Success",
                &match message {
                    Some(msg) => format!("Error ({})", msg),
                    None => "Error".to_string(),
                },
            ));
        }
        (ExpectedOutcome::Error, Response::Success { data }) => {
            return Err(Error::unexpected_outcome(
                &step_label,
                "Error",
                &format!("Success (data: {})", data),
            ));
        }
    }

    println!("  {} Step {}: {}", "✓".green(), step_num, action.dimmed());

    Ok(())
}

/// Pick the explicit id or fall back to the last captured one
fn resolve_id(
    explicit: &Option<String>,
    last_id: &Option<String>,
    step_num: usize,
) -> Result<String> {
    explicit
        .clone()
        .or_else(|| last_id.clone())
        .ok_or_else(|| {
            Error::Scenario(format!(
                "step {} needs an id but no add_book has captured one yet",
                step_num
            ))
        })
}

/// Check field expectations against a success payload
fn check_data(
    step_label: &str,
    command: &Command,
    expect: &StepExpectation,
    data: &Value,
) -> Result<()> {
    if expect.title.is_some() || expect.author.is_some() || expect.year.is_some() {
        let book: Book = serde_json::from_value(data.clone())
            .map_err(|_| Error::missing_data(step_label, "book record"))?;

        if let Some(title) = &expect.title {
            if &book.title != title {
                return Err(Error::field_mismatch(step_label, "title", title, &book.title));
            }
        }
        if let Some(author) = &expect.author {
            if &book.author != author {
                return Err(Error::field_mismatch(
                    step_label,
                    "author",
                    author,
                    &book.author,
                ));
            }
        }
        if let Some(year) = expect.year {
            if book.year != year {
                return Err(Error::field_mismatch(
                    step_label,
                    "year",
                    &year.to_string(),
                    &book.year.to_string(),
                ));
            }
        }
    }

    if let Some(count) = expect.count {
        let actual = match (command, data) {
            (Command::GetBooks, Value::Object(map)) => map.len(),
            _ => {
                return Err(Error::missing_data(step_label, "book listing"));
            }
        };
        if actual != count {
            return Err(Error::field_mismatch(
                step_label,
                "count",
                &count.to_string(),
                &actual.to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolve_id_prefers_explicit() {
        let explicit = Some("book-x".to_string());
        let last = Some("book-y".to_string());
        assert_eq!(resolve_id(&explicit, &last, 1).unwrap(), "book-x");
        assert_eq!(resolve_id(&None, &last, 1).unwrap(), "book-y");
        assert!(resolve_id(&None, &None, 1).is_err());
    }

    #[test]
    fn check_data_asserts_book_fields() {
        let expect = StepExpectation {
            title: Some("T".to_string()),
            year: Some(2023),
            ..Default::default()
        };
        let cmd = Command::GetBook {
            id: "book-1".to_string(),
        };
        let data = json!({"title": "T", "author": "A", "year": 2023});
        assert!(check_data("get_book (step 2)", &cmd, &expect, &data).is_ok());

        let data = json!({"title": "U", "author": "A", "year": 2023});
        let err = check_data("get_book (step 2)", &cmd, &expect, &data).unwrap_err();
        assert!(matches!(err, Error::FieldMismatch { .. }));
    }

    #[test]
    fn check_data_counts_listings() {
        let expect = StepExpectation {
            count: Some(2),
            ..Default::default()
        };
        let data = json!({
            "book-1": {"title": "T", "author": "A", "year": 2023},
            "book-2": {"title": "U", "author": "B", "year": 2024},
        });
        assert!(check_data("get_books (step 1)", &Command::GetBooks, &expect, &data).is_ok());

        let expect = StepExpectation {
            count: Some(3),
            ..Default::default()
        };
        assert!(check_data("get_books (step 1)", &Command::GetBooks, &expect, &data).is_err());
    }
}
