//! # mexpr - Abstract Syntax Tree
//!
//! Shared vocabulary of the lexer, parser, type checker and evaluator.
//!
//! - **[tokens]** - Lexical tokens and source spans
//! - **[expressions]** - Expression nodes stored in a flat arena ([`Ast`])
//! - **[operators]** - Binary and prefix operators
//!
//! ## Quick Start
//!
//! ```text
//! items where price > 100 and name startsWith "pro"
//! ```
//!
//! ## Core Concepts
//!
//! ### Ambient value
//!
//! Every identifier is resolved against the *ambient* value. At the top level
//! that is the input; `.` and `where` narrow it:
//!
//! ```text
//! user.name          // `name` is looked up in `user`
//! items where id > 3 // `id` is looked up in each item
//! ```
//!
//! `@` always refers to the ambient value itself.
//!
//! ### Indexing and slicing
//!
//! ```text
//! items[0]    // first element
//! items[-1]   // last element
//! items[1:2]  // second and third element, bounds inclusive
//! name[:2]    // first three characters
//! ```
//!
//! ### Numbers
//!
//! There is a single numeric kind (64-bit float). `1_000` and `.5` are valid
//! literals.
pub mod expressions;
pub mod operators;
pub mod tokens;

pub use expressions::{Ast, Expr, Node, NodeId};
pub(crate) use expressions::AstBuilder;
pub use operators::{BinOp, UnaryOp};
pub use tokens::{Span, Token, TokenKind};
