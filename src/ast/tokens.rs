use std::borrow::Cow;
use std::fmt;

/// Byte range in the source expression, used to pinpoint errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Byte offset of the first character
    pub offset: usize,
    /// Length in bytes (zero for end of input)
    pub length: usize,
}

impl Span {
    pub fn new(offset: usize, length: usize) -> Self {
        Span { offset, length }
    }
}

/// Classification of a lexical token.
///
/// Several operators share a kind (`+`/`-`, `*`/`/`/`%`, all comparisons)
/// because they share a binding power; the parser looks at the token text to
/// pick the concrete operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Property name or the `@` self reference
    ///
    /// # Examples
    /// ```text
    /// foo
    /// @
    /// items
    /// ```
    Identifier,

    /// Numeric literal, `_` allowed as a group separator
    ///
    /// # Examples
    /// ```text
    /// 42
    /// .5
    /// 1_000_000
    /// ```
    Number,

    /// Double quoted string, `\"` is the only escape
    String,

    /// Field selection (`.`)
    Dot,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,

    /// Slice separator inside brackets (`:`)
    Slice,

    /// `+` or `-`, binary or unary depending on position
    AddSub,

    /// `*`, `/` or `%`
    MulDiv,

    /// Exponentiation (`^`), right associative
    Power,

    /// `==`, `!=`, `<`, `<=`, `>`, `>=`
    Comparison,

    /// Logical AND (word, not symbol)
    And,

    /// Logical OR (word, not symbol)
    Or,

    /// Logical negation (`not`)
    Not,

    /// `in`, `contains`, `startsWith`, `endsWith`, `before`, `after`
    StringCompare,

    /// Array filter (`where`)
    ///
    /// # Example
    /// ```text
    /// items where price > 100
    /// ```
    Where,

    /// End of input
    Eof,
}

impl TokenKind {
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Dot => "dot",
            TokenKind::LeftParen => "left-paren",
            TokenKind::RightParen => "right-paren",
            TokenKind::LeftBracket => "left-bracket",
            TokenKind::RightBracket => "right-bracket",
            TokenKind::Slice => "slice",
            TokenKind::AddSub => "add-sub",
            TokenKind::MulDiv => "mul-div",
            TokenKind::Power => "power",
            TokenKind::Comparison => "comparison",
            TokenKind::And => "and",
            TokenKind::Or => "or",
            TokenKind::Not => "not",
            TokenKind::StringCompare => "string-compare",
            TokenKind::Where => "where",
            TokenKind::Eof => "eof",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single token produced by the lexer.
///
/// Tokens borrow from the source whenever possible; only string literals
/// containing an escape own their decoded text.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Source text of the token; decoded contents for strings
    pub text: Cow<'a, str>,
    pub span: Span,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, text: impl Into<Cow<'a, str>>, span: Span) -> Self {
        Token {
            kind,
            text: text.into(),
            span,
        }
    }

    pub fn offset(&self) -> usize {
        self.span.offset
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.offset(), self.kind, self.text)
    }
}
