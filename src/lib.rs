//! A micro expression language for querying, comparing and filtering
//! JSON-like values.
//!
//! An expression is compiled once into an immutable [`Ast`] and can then be run
//! against any number of inputs:
//!
//! ```
//! use mexpr::{Options, Value, parse, run};
//! use mexpr::value::Map;
//!
//! let ast = parse(r#"name startsWith "pro" and price < 100"#, None).unwrap();
//!
//! let mut item = Map::new();
//! item.insert("name".into(), Value::from("product"));
//! item.insert("price".into(), Value::from(42.0));
//!
//! let result = run(&ast, &Value::Object(item), &Options::default()).unwrap();
//! assert_eq!(result, Value::Boolean(true));
//! ```
//!
//! Passing an example value to [`parse`] also type checks the expression
//! against the example's shape.

pub mod ast;
pub mod checker;
pub mod cli;
pub mod convert;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod options;
pub mod output;
pub mod parser;
pub mod schema;
pub mod value;
mod walk;

pub use ast::{Ast, BinOp, Expr, NodeId, Span, Token, TokenKind, UnaryOp};
pub use checker::TypeChecker;
pub use convert::{json_to_value, value_to_json};
pub use error::{Error, ErrorKind};
pub use evaluator::Evaluator;
pub use lexer::Lexer;
pub use options::Options;
pub use output::{to_json, to_json_pretty};
pub use parser::{DEFAULT_MAX_DEPTH, Parser};
pub use schema::Schema;
pub use value::Value;

/// Compiles `source`; with an `example` the result is also type checked.
pub fn parse(source: &str, example: Option<&Value>) -> Result<Ast, Error> {
    parse_with(source, example, &Options::default())
}

/// Like [`parse`], type checking with `options`.
pub fn parse_with(source: &str, example: Option<&Value>, options: &Options) -> Result<Ast, Error> {
    let ast = Parser::new(Lexer::new(source))?.parse()?;
    tracing::trace!(nodes = ast.len(), source, "parsed expression");
    if let Some(example) = example {
        type_check_with(&ast, example, options)?;
    }
    Ok(ast)
}

/// Checks a compiled expression against the shape of `example`.
///
/// ```
/// use mexpr::{ErrorKind, Value, parse, type_check};
///
/// let ast = parse(r#"1 + "a" * 2"#, None).unwrap();
/// let err = type_check(&ast, &Value::Null).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::Type);
/// assert_eq!(err.offset(), 8);
/// ```
pub fn type_check(ast: &Ast, example: &Value) -> Result<(), Error> {
    type_check_with(ast, example, &Options::default())
}

pub fn type_check_with(ast: &Ast, example: &Value, options: &Options) -> Result<(), Error> {
    TypeChecker::with_options(*options).check(ast, example)?;
    Ok(())
}

/// Evaluates a compiled expression against `input`.
pub fn run(ast: &Ast, input: &Value, options: &Options) -> Result<Value, Error> {
    Evaluator::with_options(*options).run(ast, input)
}

/// Compiles and runs `source` in one step, without type checking.
///
/// ```
/// use mexpr::{Options, Value, eval};
///
/// let result = eval("(1 + 2) * 3 ^ 2", &Value::Null, &Options::default()).unwrap();
/// assert_eq!(result, Value::Number(27.0));
///
/// let err = eval("1 / 0", &Value::Null, &Options::default()).unwrap_err();
/// assert_eq!(err.pretty("1 / 0"), "cannot divide by zero\n1 / 0\n  ^");
/// ```
pub fn eval(source: &str, input: &Value, options: &Options) -> Result<Value, Error> {
    let ast = parse(source, None)?;
    run(&ast, input, options)
}
