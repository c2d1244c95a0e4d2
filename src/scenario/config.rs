//! Test scenario configuration types
//!
//! Defines the data structures for deserializing YAML test scenarios.
//! A scenario is one conversation: steps run in order over a single
//! connection and the first failing step ends the run.

use serde::Deserialize;

use crate::wire::Book;

/// A complete test scenario loaded from a YAML file
#[derive(Deserialize, Debug)]
pub struct TestScenario {
    /// Name of the test scenario
    pub name: String,
    /// Optional description of what the scenario verifies
    pub description: Option<String>,
    /// Endpoint override; defaults to the harness-wide URL
    pub url: Option<String>,
    /// The sequence of steps to execute
    pub steps: Vec<TestStep>,
}

/// A single step in the conversation
///
/// Steps that operate on an identifier may omit `id` to reuse the one
/// captured by the most recent successful `add_book`; an explicit `id`
/// overrides that (useful for probing identifiers that were never created).
#[derive(Deserialize, Debug)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TestStep {
    AddBook {
        book: Book,
        expect: Option<StepExpectation>,
    },
    GetBook {
        #[serde(default)]
        id: Option<String>,
        expect: Option<StepExpectation>,
    },
    UpdateBook {
        #[serde(default)]
        id: Option<String>,
        book: Book,
        expect: Option<StepExpectation>,
    },
    DeleteBook {
        #[serde(default)]
        id: Option<String>,
        expect: Option<StepExpectation>,
    },
    GetBooks {
        expect: Option<StepExpectation>,
    },
}

/// Expectations for a step's response
#[derive(Deserialize, Debug, Default)]
pub struct StepExpectation {
    /// Expected outcome discriminator (default: success)
    pub outcome: Option<ExpectedOutcome>,
    /// Expected title of the returned record (`get_book` only)
    pub title: Option<String>,
    /// Expected author of the returned record (`get_book` only)
    pub author: Option<String>,
    /// Expected year of the returned record (`get_book` only)
    pub year: Option<u16>,
    /// Expected number of listed records (`get_books` only)
    pub count: Option<usize>,
}

/// Which outcome discriminator a step expects
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExpectedOutcome {
    #[default]
    Success,
    Error,
}
