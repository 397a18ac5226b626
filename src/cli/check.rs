//! Compile and run expressions against JSON input

use super::CliError;
use crate::{Lexer, Options, Parser, json_to_value, run, type_check_with, value_to_json};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The expression to run
    pub expression: String,
    /// JSON input string
    pub input: Option<String>,
    /// JSON example to type check the expression against before running it
    pub example: Option<String>,
    /// Missing properties are errors
    pub strict: bool,
    /// Unresolved identifiers read as their own name
    pub unquoted: bool,
    /// Pretty-print the output
    pub pretty: bool,
    /// Only validate syntax (and the example, if given), don't execute
    pub syntax_only: bool,
}

impl CheckOptions {
    fn options(&self) -> Options {
        Options {
            strict: self.strict,
            unquoted_strings: self.unquoted,
        }
    }
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Expression ran successfully with JSON output
    Success(serde_json::Value),
}

fn parse_json(text: &str, what: &'static str) -> Result<crate::Value, CliError> {
    let json = serde_json::from_str(text).map_err(|error| CliError::Json { what, error })?;
    Ok(json_to_value(json))
}

/// Execute a check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let source = options.expression.as_str();
    let expr_error = |e: crate::Error| CliError::expr(e, source);

    let ast = Parser::new(Lexer::new(source))
        .and_then(Parser::parse)
        .map_err(expr_error)?;

    if let Some(example) = &options.example {
        let example = parse_json(example, "example")?;
        type_check_with(&ast, &example, &options.options()).map_err(expr_error)?;
    }

    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid);
    }

    let input = options.input.as_deref().ok_or(CliError::NoInput)?;
    let input = parse_json(input, "input")?;

    let result = run(&ast, &input, &options.options()).map_err(expr_error)?;
    Ok(CheckResult::Success(value_to_json(result)))
}
