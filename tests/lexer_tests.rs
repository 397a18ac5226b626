// tests/lexer_tests.rs

use mexpr::ast::{Span, TokenKind};
use mexpr::{ErrorKind, Lexer};
use pretty_assertions::assert_eq;

fn kinds(source: &str) -> Vec<TokenKind> {
    Lexer::new(source)
        .map(|token| token.unwrap().kind)
        .collect()
}

fn texts(source: &str) -> Vec<String> {
    Lexer::new(source)
        .map(|token| token.unwrap().text.into_owned())
        .collect()
}

// ============================================================================
// Punctuation and Operators
// ============================================================================

#[test]
fn test_single_char_tokens() {
    let test_cases = vec![
        (".", TokenKind::Dot),
        ("(", TokenKind::LeftParen),
        (")", TokenKind::RightParen),
        ("[", TokenKind::LeftBracket),
        ("]", TokenKind::RightBracket),
        (":", TokenKind::Slice),
        ("+", TokenKind::AddSub),
        ("-", TokenKind::AddSub),
        ("*", TokenKind::MulDiv),
        ("/", TokenKind::MulDiv),
        ("%", TokenKind::MulDiv),
        ("^", TokenKind::Power),
        ("<", TokenKind::Comparison),
        (">", TokenKind::Comparison),
    ];

    for (input, expected) in test_cases {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token().unwrap();
        assert_eq!(token.kind, expected, "Failed for input: {}", input);
        assert_eq!(token.text, input);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    }
}

#[test]
fn test_comparison_operators() {
    assert_eq!(texts("== != < <= > >="), ["==", "!=", "<", "<=", ">", ">="]);
    assert!(kinds("== != < <= > >=")
        .iter()
        .all(|kind| *kind == TokenKind::Comparison));
}

#[test]
fn test_operators_need_no_whitespace() {
    assert_eq!(
        kinds("a<=b+1"),
        [
            TokenKind::Identifier,
            TokenKind::Comparison,
            TokenKind::Identifier,
            TokenKind::AddSub,
            TokenKind::Number,
        ]
    );
    assert_eq!(texts("a<=b+1"), ["a", "<=", "b", "+", "1"]);
}

#[test]
fn test_single_equals_is_an_error() {
    let mut lexer = Lexer::new("a = 1");
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Identifier);
    let err = lexer.next_token().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Lex);
    assert_eq!(err.message(), "`=` should be `==`");
    assert_eq!(err.offset(), 2);
}

// ============================================================================
// Keywords and Identifiers
// ============================================================================

#[test]
fn test_keywords() {
    assert_eq!(
        kinds("and or not where"),
        [TokenKind::And, TokenKind::Or, TokenKind::Not, TokenKind::Where]
    );
    for keyword in ["in", "contains", "startsWith", "endsWith", "before", "after"] {
        assert_eq!(kinds(keyword), [TokenKind::StringCompare], "{}", keyword);
    }
}

#[test]
fn test_keyword_prefix_is_an_identifier() {
    assert_eq!(kinds("android"), [TokenKind::Identifier]);
    assert_eq!(kinds("index"), [TokenKind::Identifier]);
    assert_eq!(kinds("notes"), [TokenKind::Identifier]);
}

#[test]
fn test_identifiers() {
    assert_eq!(texts("foo_bar @ $id é"), ["foo_bar", "@", "$id", "é"]);
    assert!(kinds("foo_bar @ $id é")
        .iter()
        .all(|kind| *kind == TokenKind::Identifier));
}

#[test]
fn test_field_path() {
    assert_eq!(
        kinds("user.tags[0]"),
        [
            TokenKind::Identifier,
            TokenKind::Dot,
            TokenKind::Identifier,
            TokenKind::LeftBracket,
            TokenKind::Number,
            TokenKind::RightBracket,
        ]
    );
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_numbers() {
    assert_eq!(texts("0 42 3.14 .5 1_000"), ["0", "42", "3.14", ".5", "1_000"]);
    assert!(kinds("0 42 3.14 .5 1_000")
        .iter()
        .all(|kind| *kind == TokenKind::Number));
}

#[test]
fn test_negative_number_is_two_tokens() {
    assert_eq!(kinds("-1"), [TokenKind::AddSub, TokenKind::Number]);
}

#[test]
fn test_strings() {
    let mut lexer = Lexer::new(r#""hello world""#);
    let token = lexer.next_token().unwrap();
    assert_eq!(token.kind, TokenKind::String);
    assert_eq!(token.text, "hello world");
    assert_eq!(token.span, Span::new(0, 13));
}

#[test]
fn test_string_escaped_quote() {
    let mut lexer = Lexer::new(r#""say \"hi\"""#);
    let token = lexer.next_token().unwrap();
    assert_eq!(token.text, r#"say "hi""#);
    assert_eq!(token.span.length, 12);
}

#[test]
fn test_other_backslashes_are_kept() {
    assert_eq!(texts(r#""a\nb""#), [r"a\nb"]);
}

#[test]
fn test_unterminated_string() {
    let err = Lexer::new(r#"name == "abc"#).nth(2).unwrap().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Lex);
    assert_eq!(err.message(), "unterminated string");
    assert_eq!(err.offset(), 8);
}

// ============================================================================
// Positions
// ============================================================================

#[test]
fn test_offsets_are_byte_positions() {
    let offsets: Vec<usize> = Lexer::new("é == \"ü\" and x")
        .map(|token| token.unwrap().offset())
        .collect();
    assert_eq!(offsets, [0, 3, 6, 11, 15]);
}

#[test]
fn test_eof_repeats() {
    let mut lexer = Lexer::new("  ");
    let eof = lexer.next_token().unwrap();
    assert_eq!(eof.kind, TokenKind::Eof);
    assert_eq!(eof.span, Span::new(2, 0));
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
}
