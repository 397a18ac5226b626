use std::borrow::Cow;

use crate::ast::{Span, Token, TokenKind};
use crate::error::Error;

/// Turns an expression into tokens, one call to [`Lexer::next_token`] at a time.
///
/// ```
/// use mexpr::ast::TokenKind;
/// use mexpr::Lexer;
///
/// let mut lexer = Lexer::new("foo.bar >= 10");
/// let kinds: Vec<_> = std::iter::from_fn(|| {
///     let token = lexer.next_token().ok()?;
///     (token.kind != TokenKind::Eof).then_some(token.kind)
/// })
/// .collect();
/// assert_eq!(
///     kinds,
///     [TokenKind::Identifier, TokenKind::Dot, TokenKind::Identifier, TokenKind::Comparison, TokenKind::Number]
/// );
/// ```
pub struct Lexer<'a> {
    source: &'a str,
    position: usize,
}

/// Single character punctuation and the token kind it produces.
fn punctuation(ch: char) -> Option<TokenKind> {
    let kind = match ch {
        '.' => TokenKind::Dot,
        '(' => TokenKind::LeftParen,
        ')' => TokenKind::RightParen,
        '[' => TokenKind::LeftBracket,
        ']' => TokenKind::RightBracket,
        ':' => TokenKind::Slice,
        '+' | '-' => TokenKind::AddSub,
        '*' | '/' | '%' => TokenKind::MulDiv,
        '^' => TokenKind::Power,
        _ => return None,
    };
    Some(kind)
}

fn ends_identifier(ch: char) -> bool {
    ch.is_whitespace() || punctuation(ch).is_some() || matches!(ch, '<' | '>' | '=' | '!' | '"')
}

/// Keyword classification for a scanned identifier.
fn keyword(ident: &str) -> TokenKind {
    match ident {
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "not" => TokenKind::Not,
        "where" => TokenKind::Where,
        "in" | "contains" | "startsWith" | "endsWith" | "before" | "after" => {
            TokenKind::StringCompare
        }
        _ => TokenKind::Identifier,
    }
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source,
            position: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.source[self.position..].chars().next()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.source[self.position..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.position += ch.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token<'a> {
        Token::new(
            kind,
            &self.source[start..self.position],
            Span::new(start, self.position - start),
        )
    }

    fn read_number(&mut self, start: usize) -> Token<'a> {
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() || ch == '.' || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }
        self.token(TokenKind::Number, start)
    }

    fn read_identifier(&mut self, start: usize) -> Token<'a> {
        while let Some(ch) = self.current_char() {
            if ends_identifier(ch) {
                break;
            }
            self.advance();
        }
        let text = &self.source[start..self.position];
        self.token(keyword(text), start)
    }

    fn read_string(&mut self, start: usize) -> Result<Token<'a>, Error> {
        self.advance(); // opening quote
        let content_start = self.position;
        let mut escaped: Option<String> = None;

        loop {
            match self.current_char() {
                None => {
                    return Err(Error::lex(
                        Span::new(start, self.position - start),
                        "unterminated string",
                    ));
                }
                Some('"') => break,
                Some('\\') if self.peek_char(1) == Some('"') => {
                    let buf = escaped.get_or_insert_with(|| {
                        self.source[content_start..self.position].to_string()
                    });
                    buf.push('"');
                    self.advance();
                    self.advance();
                }
                Some(ch) => {
                    if let Some(buf) = escaped.as_mut() {
                        buf.push(ch);
                    }
                    self.advance();
                }
            }
        }

        let content_end = self.position;
        self.advance(); // closing quote

        let text = match escaped {
            Some(buf) => Cow::Owned(buf),
            None => Cow::Borrowed(&self.source[content_start..content_end]),
        };
        Ok(Token::new(
            TokenKind::String,
            text,
            Span::new(start, self.position - start),
        ))
    }

    /// Returns the next token, or an [`TokenKind::Eof`] token once the input
    /// is exhausted (and on every call after that).
    pub fn next_token(&mut self) -> Result<Token<'a>, Error> {
        self.skip_whitespace();
        let start = self.position;

        let Some(ch) = self.current_char() else {
            return Ok(Token::new(TokenKind::Eof, "", Span::new(start, 0)));
        };

        match ch {
            '.' if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) => {
                Ok(self.read_number(start))
            }
            c if c.is_ascii_digit() => Ok(self.read_number(start)),
            '"' => self.read_string(start),
            '=' => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    Ok(self.token(TokenKind::Comparison, start))
                } else {
                    Err(Error::lex(Span::new(start, 1), "`=` should be `==`"))
                }
            }
            '<' | '>' | '!' => {
                self.advance();
                if self.current_char() == Some('=') {
                    self.advance();
                }
                Ok(self.token(TokenKind::Comparison, start))
            }
            c => {
                if let Some(kind) = punctuation(c) {
                    self.advance();
                    Ok(self.token(kind, start))
                } else {
                    Ok(self.read_identifier(start))
                }
            }
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, Error>;

    /// Yields tokens up to, but not including, the end of input.
    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok(token) if token.is(TokenKind::Eof) => None,
            other => Some(other),
        }
    }
}

#[test]
fn test_keywords() {
    let mut lexer = Lexer::new("and or not where in contains startsWith endsWith before after");
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::And);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Or);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Not);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Where);
    for _ in 0..6 {
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::StringCompare);
    }
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
}

#[test]
fn test_string_without_escape_borrows() {
    let mut lexer = Lexer::new(r#""plain""#);
    let token = lexer.next_token().unwrap();
    assert!(matches!(token.text, Cow::Borrowed("plain")));
    assert_eq!(token.span, Span::new(0, 7));
}
