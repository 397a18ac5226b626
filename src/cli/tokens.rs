//! Token listing for debugging expressions

use super::CliError;
use crate::Lexer;

/// Lexes `expression` into one `offset kind text` line per token.
///
/// ```
/// use mexpr::cli::list_tokens;
///
/// let lines = list_tokens("a.b >= 2").unwrap();
/// assert_eq!(lines, ["0 identifier a", "1 dot .", "2 identifier b", "4 comparison >=", "7 number 2"]);
/// ```
pub fn list_tokens(expression: &str) -> Result<Vec<String>, CliError> {
    Lexer::new(expression)
        .map(|token| {
            token
                .map(|t| t.to_string())
                .map_err(|e| CliError::expr(e, expression))
        })
        .collect()
}
