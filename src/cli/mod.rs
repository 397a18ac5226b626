//! CLI support for mexpr
//!
//! Provides programmatic access to the `mexpr` commands so other tools can
//! embed them without spawning a process.

mod check;
mod tokens;

pub use check::{CheckOptions, CheckResult, execute_check};
pub use tokens::list_tokens;

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    /// Lexing, parsing, type checking or evaluation failed. The expression
    /// text is kept for caret rendering.
    #[error("{}", render(.error, .expression))]
    Expr {
        #[source]
        error: crate::Error,
        expression: String,
    },

    #[error("invalid JSON in {what}: {error}")]
    Json {
        what: &'static str,
        #[source]
        error: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("no input provided, use --input or pipe JSON to stdin")]
    NoInput,
}

impl CliError {
    pub(crate) fn expr(error: crate::Error, source: &str) -> Self {
        CliError::Expr {
            error,
            expression: source.to_string(),
        }
    }
}

fn render(error: &crate::Error, expression: &str) -> String {
    error.pretty(expression)
}
