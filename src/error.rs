//! Errors raised while lexing, parsing, type checking or evaluating.
//!
//! Every error carries the [`Span`] of the source text it refers to, so callers
//! can build their own presentation or use [`Error::pretty`].

use thiserror::Error;

use crate::ast::Span;

/// The layer that produced an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lex,
    Parse,
    Type,
    Runtime,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed operator or unterminated string
    #[error("{message}")]
    Lex { span: Span, message: String },

    /// Unexpected token, missing delimiter or trailing input
    #[error("{message}")]
    Parse { span: Span, message: String },

    /// Operand kinds rejected against the example value's schema
    #[error("{message}")]
    Type { span: Span, message: String },

    /// Failure while evaluating against a concrete value
    #[error("{message}")]
    Runtime { span: Span, message: String },

    #[error("cannot divide by zero")]
    DivisionByZero { span: Span },
}

impl Error {
    pub fn lex(span: Span, message: impl Into<String>) -> Self {
        Error::Lex {
            span,
            message: message.into(),
        }
    }

    pub fn parse(span: Span, message: impl Into<String>) -> Self {
        Error::Parse {
            span,
            message: message.into(),
        }
    }

    pub fn type_error(span: Span, message: impl Into<String>) -> Self {
        Error::Type {
            span,
            message: message.into(),
        }
    }

    pub fn runtime(span: Span, message: impl Into<String>) -> Self {
        Error::Runtime {
            span,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Lex { .. } => ErrorKind::Lex,
            Error::Parse { .. } => ErrorKind::Parse,
            Error::Type { .. } => ErrorKind::Type,
            Error::Runtime { .. } | Error::DivisionByZero { .. } => ErrorKind::Runtime,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Error::Lex { span, .. }
            | Error::Parse { span, .. }
            | Error::Type { span, .. }
            | Error::Runtime { span, .. }
            | Error::DivisionByZero { span } => *span,
        }
    }

    /// Byte offset of the error within the expression.
    pub fn offset(&self) -> usize {
        self.span().offset
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Renders the message followed by the offending source line and a caret
    /// under the error location.
    ///
    /// ```
    /// use mexpr::Error;
    /// use mexpr::ast::Span;
    ///
    /// let err = Error::parse(Span::new(4, 1), "unexpected right-paren");
    /// assert_eq!(
    ///     err.pretty("1 + )"),
    ///     "unexpected right-paren\n1 + )\n    ^"
    /// );
    /// ```
    pub fn pretty(&self, source: &str) -> String {
        let span = self.span();
        let offset = floor_char_boundary(source, span.offset);

        let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
        let line_end = source[offset..]
            .find('\n')
            .map_or(source.len(), |i| offset + i);
        let line = &source[line_start..line_end];

        let column = source[line_start..offset].chars().count();
        let underline = source[offset..line_end.min(offset + span.length)]
            .chars()
            .count();

        let mut out = format!("{}\n{}\n", self, line);
        out.push_str(&" ".repeat(column));
        out.push('^');
        out.push_str(&"~".repeat(underline.saturating_sub(1)));
        out
    }
}

fn floor_char_boundary(source: &str, offset: usize) -> usize {
    let mut offset = offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
