//! CLI command definitions
//!
//! Defines the clap commands for the harness.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Run the built-in CRUD conversation against the server
    Run {
        /// Echo every frame as pretty-printed JSON
        #[arg(long, short)]
        verbose: bool,
    },

    /// Execute a test scenario defined in a YAML file
    Test {
        /// Path to the YAML scenario file
        path: PathBuf,

        /// Verbose output
        #[arg(long, short)]
        verbose: bool,
    },

    /// Add a book and print the assigned identifier
    Add {
        #[arg(long)]
        title: String,

        #[arg(long)]
        author: String,

        #[arg(long)]
        year: u16,
    },

    /// Fetch a book by identifier
    Get {
        /// Identifier returned by a previous add
        id: String,
    },

    /// Replace the record stored under an identifier
    Update {
        /// Identifier returned by a previous add
        id: String,

        #[arg(long)]
        title: String,

        #[arg(long)]
        author: String,

        #[arg(long)]
        year: u16,
    },

    /// Delete a book by identifier
    Delete {
        /// Identifier returned by a previous add
        id: String,
    },

    /// List all books
    List,
}
