//! Pratt (top-down operator precedence) parser.
//!
//! `parse_expr(min)` reads one operand through its prefix rule, then keeps
//! folding infix operators into it while the next token binds tighter than
//! `min`.

use crate::{
    ast::{Ast, AstBuilder, BinOp, Expr, NodeId, Span, Token, TokenKind, UnaryOp},
    error::Error,
    lexer::Lexer,
    value::Value,
};

/// Maximum nesting of operands, counted both as parser recursion and as the
/// depth of the produced tree.
///
/// Tree depth includes left-associative chains: `1 + 1 + ... + 1` nests one
/// level per operator, so a flat chain of more than 256 terms is rejected
/// even without parentheses. Use [`Parser::with_max_depth`] to raise it.
pub const DEFAULT_MAX_DEPTH: usize = 256;

// Binding powers, loosest first.
const OR: u8 = 1;
const WHERE: u8 = 1;
const AND: u8 = 2;
const STRING_COMPARE: u8 = 3;
const COMPARISON: u8 = 5;
const SLICE: u8 = 5;
const ADD_SUB: u8 = 10;
const MUL_DIV: u8 = 15;
const DOT: u8 = 40;
const POWER: u8 = 50;
const BRACKET: u8 = 60;
const PAREN: u8 = 70;

/// `not` applies to everything that binds tighter than `.`, so
/// `not foo.bar` negates `foo.bar`.
const NOT_OPERAND: u8 = DOT - 1;

/// Power of a token in infix position; zero ends the current operand.
fn binding_power(kind: TokenKind) -> u8 {
    match kind {
        TokenKind::Or => OR,
        TokenKind::Where => WHERE,
        TokenKind::And => AND,
        TokenKind::StringCompare => STRING_COMPARE,
        TokenKind::Comparison => COMPARISON,
        TokenKind::Slice => SLICE,
        TokenKind::AddSub => ADD_SUB,
        TokenKind::MulDiv => MUL_DIV,
        TokenKind::Dot => DOT,
        TokenKind::Power => POWER,
        TokenKind::LeftBracket => BRACKET,
        TokenKind::LeftParen => PAREN,
        _ => 0,
    }
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current_token: Token<'a>,
    previous: Option<TokenKind>,
    nodes: AstBuilder,
    depths: Vec<usize>,
    nesting: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    /// Creates a parser and reads the first token.
    pub fn new(mut lexer: Lexer<'a>) -> Result<Self, Error> {
        let current_token = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current_token,
            previous: None,
            nodes: AstBuilder::default(),
            depths: Vec::new(),
            nesting: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        })
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parses the whole input into a compiled [`Ast`].
    pub fn parse(mut self) -> Result<Ast, Error> {
        let root = self.parse_expr(0)?;
        if !self.current_token.is(TokenKind::Eof) {
            return Err(Error::parse(
                self.current_token.span,
                format!("expected eof but found {}", self.current_token.kind),
            ));
        }
        Ok(self.nodes.finish(root))
    }

    /// Moves to the next token and returns the one just consumed.
    fn advance(&mut self) -> Result<Token<'a>, Error> {
        let next = self.lexer.next_token()?;
        let token = std::mem::replace(&mut self.current_token, next);
        self.previous = Some(token.kind);
        Ok(token)
    }

    fn expect(&mut self, expected: TokenKind) -> Result<Token<'a>, Error> {
        if !self.current_token.is(expected) {
            return Err(Error::parse(
                self.current_token.span,
                format!(
                    "expected {} but found {}",
                    expected, self.current_token.kind
                ),
            ));
        }
        self.advance()
    }

    fn push(&mut self, expr: Expr, span: Span) -> Result<NodeId, Error> {
        let depth = match &expr {
            Expr::Literal(_) | Expr::Identifier(_) => 1,
            Expr::Unary { operand, .. } => self.depths[operand.index()] + 1,
            Expr::FieldSelect { object: a, field: b }
            | Expr::Index { object: a, index: b }
            | Expr::Slice { start: a, end: b }
            | Expr::BinaryOp { left: a, right: b, .. }
            | Expr::Where { items: a, predicate: b } => {
                self.depths[a.index()].max(self.depths[b.index()]) + 1
            }
        };
        if depth > self.max_depth {
            tracing::debug!(depth, max = self.max_depth, "rejecting deeply nested expression");
            return Err(Error::parse(span, "expression too complex"));
        }
        self.depths.push(depth);
        Ok(self.nodes.push(expr, span))
    }

    fn parse_expr(&mut self, min_power: u8) -> Result<NodeId, Error> {
        self.nesting += 1;
        if self.nesting > self.max_depth {
            return Err(Error::parse(
                self.current_token.span,
                "expression too complex",
            ));
        }

        let preceding = self.previous;
        let token = self.advance()?;
        let mut left = self.nud(token, preceding)?;

        while min_power < binding_power(self.current_token.kind) {
            let token = self.advance()?;
            left = self.led(token, left)?;
        }

        self.nesting -= 1;
        Ok(left)
    }

    /// Prefix rules: the token starts an operand. `preceding` is the kind of
    /// the token consumed before it, if any.
    fn nud(&mut self, token: Token<'a>, preceding: Option<TokenKind>) -> Result<NodeId, Error> {
        match token.kind {
            TokenKind::Identifier => {
                self.push(Expr::Identifier(token.text.into_owned()), token.span)
            }
            TokenKind::Number => {
                let digits = token.text.replace('_', "");
                let n = digits.parse::<f64>().map_err(|_| {
                    Error::parse(token.span, format!("invalid number `{}`", token.text))
                })?;
                self.push(Expr::Literal(Value::Number(n)), token.span)
            }
            TokenKind::String => {
                self.push(Expr::Literal(Value::String(token.text.into_owned())), token.span)
            }
            TokenKind::LeftParen => {
                let inner = self.parse_expr(0)?;
                self.expect(TokenKind::RightParen)?;
                Ok(inner)
            }
            TokenKind::Not => {
                let operand = self.parse_expr(NOT_OPERAND)?;
                self.push(
                    Expr::Unary {
                        op: UnaryOp::Not,
                        operand,
                    },
                    token.span,
                )
            }
            TokenKind::AddSub => {
                let op = if token.text == "-" {
                    UnaryOp::Minus
                } else {
                    UnaryOp::Plus
                };
                let operand = self.parse_expr(ADD_SUB)?;
                self.push(Expr::Unary { op, operand }, token.span)
            }
            TokenKind::Slice => {
                // `[:end]` starts at the first element
                let start = self.push(Expr::Literal(Value::Number(0.0)), token.span)?;
                self.finish_slice(start, token.span)
            }
            TokenKind::Eof => Err(Error::parse(
                token.span,
                "incomplete expression, EOF found",
            )),
            TokenKind::RightParen | TokenKind::RightBracket | TokenKind::LeftBracket => Err(
                Error::parse(token.span, format!("unexpected {}", token.kind)),
            ),
            _ => {
                let message = match preceding {
                    Some(kind) if is_operator(kind) => "missing right operand".to_string(),
                    _ => format!("unexpected {} `{}`", token.kind, token.text),
                };
                Err(Error::parse(token.span, message))
            }
        }
    }
}

fn is_operator(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::AddSub
            | TokenKind::MulDiv
            | TokenKind::Power
            | TokenKind::Comparison
            | TokenKind::And
            | TokenKind::Or
            | TokenKind::Not
            | TokenKind::StringCompare
            | TokenKind::Where
            | TokenKind::Dot
            | TokenKind::Slice
    )
}

impl<'a> Parser<'a> {
    /// Infix rules: the token continues an expression whose left operand is
    /// already parsed.
    fn led(&mut self, token: Token<'a>, left: NodeId) -> Result<NodeId, Error> {
        match token.kind {
            TokenKind::AddSub
            | TokenKind::MulDiv
            | TokenKind::Comparison
            | TokenKind::And
            | TokenKind::Or
            | TokenKind::StringCompare => {
                let op = self.binary_op(&token)?;
                let right = self.parse_expr(binding_power(token.kind))?;
                self.push(Expr::BinaryOp { op, left, right }, token.span)
            }
            TokenKind::Power => {
                // right associative: `2^3^2` is `2^(3^2)`
                let right = self.parse_expr(POWER - 1)?;
                self.push(
                    Expr::BinaryOp {
                        op: BinOp::Power,
                        left,
                        right,
                    },
                    token.span,
                )
            }
            TokenKind::Dot => {
                let field = self.parse_expr(DOT)?;
                self.push(
                    Expr::FieldSelect {
                        object: left,
                        field,
                    },
                    token.span,
                )
            }
            TokenKind::LeftBracket => {
                let index = self.parse_expr(0)?;
                self.expect(TokenKind::RightBracket)?;
                self.push(
                    Expr::Index {
                        object: left,
                        index,
                    },
                    token.span,
                )
            }
            TokenKind::Slice => self.finish_slice(left, token.span),
            TokenKind::Where => {
                let predicate = self.parse_expr(WHERE - 1)?;
                self.push(
                    Expr::Where {
                        items: left,
                        predicate,
                    },
                    token.span,
                )
            }
            _ => Err(Error::parse(
                token.span,
                format!("unexpected {}", token.kind),
            )),
        }
    }

    fn binary_op(&self, token: &Token<'a>) -> Result<BinOp, Error> {
        BinOp::from_symbol(&token.text).ok_or_else(|| {
            Error::parse(
                token.span,
                format!("unknown operator `{}`, use `not` for negation", token.text),
            )
        })
    }

    /// Parses the end bound after `:`; `[start:]` runs to the last element.
    fn finish_slice(&mut self, start: NodeId, span: Span) -> Result<NodeId, Error> {
        let end = if self.current_token.is(TokenKind::RightBracket) {
            let at = Span::new(self.current_token.span.offset, 0);
            self.push(Expr::Literal(Value::Number(-1.0)), at)?
        } else {
            self.parse_expr(SLICE)?
        };
        self.push(Expr::Slice { start, end }, span)
    }
}
