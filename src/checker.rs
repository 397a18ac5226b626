//! Static checking of a compiled expression against the shape of an example
//! input.
//!
//! Validating once against a representative sample catches most missing
//! properties and incompatible operands before the expression is run against
//! real inputs. `unknown` shapes (from `null` or empty arrays in the example)
//! are accepted by every operator.

use std::borrow::Cow;

use crate::{
    ast::{Ast, BinOp, Span, UnaryOp},
    error::Error,
    options::Options,
    schema::Schema,
    value::Value,
    walk::{Domain, walk},
};

/// Infers the [`Schema`] of an expression's result from an example input.
#[derive(Debug, Clone, Default)]
pub struct TypeChecker {
    options: Options,
}

impl TypeChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only `unquoted_strings` changes checking: unresolved identifiers are
    /// typed as strings.
    pub fn with_options(options: Options) -> Self {
        TypeChecker { options }
    }

    /// Checks `ast` against the shape of `example` and returns the schema of
    /// the result.
    ///
    /// ```
    /// use mexpr::{Schema, TypeChecker, Value, parse};
    /// use mexpr::value::Map;
    ///
    /// let mut example = Map::new();
    /// example.insert("name".into(), Value::from("widget"));
    /// let example = Value::Object(example);
    ///
    /// let ast = parse("name.length > 3", None).unwrap();
    /// assert_eq!(TypeChecker::new().check(&ast, &example).unwrap(), Schema::Boolean);
    ///
    /// let ast = parse("price * 2", None).unwrap();
    /// let err = TypeChecker::new().check(&ast, &example).unwrap_err();
    /// assert_eq!(err.to_string(), "no property price in object with keys [name]");
    /// ```
    pub fn check(&self, ast: &Ast, example: &Value) -> Result<Schema, Error> {
        let schema = Schema::of(example);
        self.check_schema(ast, &schema)
    }

    /// Like [`TypeChecker::check`] for an already derived schema.
    pub fn check_schema(&self, ast: &Ast, schema: &Schema) -> Result<Schema, Error> {
        let ambient = Cow::Borrowed(schema);
        let result = walk(self, ast, ast.root(), &ambient);
        if let Err(err) = &result {
            tracing::debug!(error = %err, offset = err.offset(), "type check failed");
        }
        result.map(Cow::into_owned)
    }
}

fn array_of(item: Schema) -> Schema {
    Schema::Array(Box::new(item))
}

impl<'a> Domain<'a> for TypeChecker {
    type Item = Cow<'a, Schema>;

    fn literal(&self, value: &Value, _span: Span) -> Result<Self::Item, Error> {
        Ok(Cow::Owned(Schema::of(value)))
    }

    fn identifier(
        &self,
        name: &str,
        ambient: &Self::Item,
        span: Span,
    ) -> Result<Self::Item, Error> {
        // Special names only apply where the evaluator applies them; on
        // objects they are ordinary keys.
        match (name, ambient.as_ref()) {
            ("@", _) => return Ok(ambient.clone()),
            ("length", Schema::String | Schema::Array(_)) => {
                return Ok(Cow::Owned(Schema::Number));
            }
            ("lower" | "upper", Schema::String) => return Ok(Cow::Owned(Schema::String)),
            _ => {}
        }

        let found = match ambient {
            Cow::Borrowed(schema) => schema.property(name).map(Cow::Borrowed),
            Cow::Owned(schema) => schema.property(name).cloned().map(Cow::Owned),
        };
        match found {
            Some(schema) => Ok(schema),
            None if ambient.is_unknown() => Ok(Cow::Owned(Schema::Unknown)),
            None if self.options.falls_back_to_name() => Ok(Cow::Owned(Schema::String)),
            None => Err(Error::type_error(
                span,
                format!("no property {} in {}", name, ambient),
            )),
        }
    }

    fn indexable(&self, object: &Self::Item, span: Span) -> Result<(), Error> {
        match object.as_ref() {
            Schema::String | Schema::Array(_) | Schema::Unknown => Ok(()),
            other => Err(Error::type_error(
                span,
                format!("can only index strings or arrays but got {}", other.type_name()),
            )),
        }
    }

    fn index(
        &self,
        object: Self::Item,
        index: Self::Item,
        span: Span,
    ) -> Result<Self::Item, Error> {
        match index.as_ref() {
            // slice: same container
            Schema::Array(_) => Ok(object),
            Schema::Number => Ok(match object {
                Cow::Borrowed(Schema::Array(items)) => Cow::Borrowed(&**items),
                Cow::Owned(Schema::Array(items)) => Cow::Owned(*items),
                other => other,
            }),
            Schema::Unknown => Ok(Cow::Owned(Schema::Unknown)),
            other => Err(Error::type_error(
                span,
                format!(
                    "array index must be number or slice but found {}",
                    other.type_name()
                ),
            )),
        }
    }

    fn slice(&self, start: Self::Item, end: Self::Item, span: Span) -> Result<Self::Item, Error> {
        for bound in [&start, &end] {
            if !(bound.is_number() || bound.is_unknown()) {
                return Err(Error::type_error(
                    span,
                    format!("slice index must be a number but found {}", bound.type_name()),
                ));
            }
        }
        Ok(Cow::Owned(array_of(Schema::Number)))
    }

    fn unary(&self, op: UnaryOp, operand: Self::Item, span: Span) -> Result<Self::Item, Error> {
        match op {
            UnaryOp::Not => Ok(Cow::Owned(Schema::Boolean)),
            UnaryOp::Plus | UnaryOp::Minus => {
                if operand.is_number() || operand.is_unknown() {
                    Ok(Cow::Owned(Schema::Number))
                } else {
                    Err(Error::type_error(
                        span,
                        format!("expected number but found {}", operand.type_name()),
                    ))
                }
            }
        }
    }

    fn binary(
        &self,
        op: BinOp,
        left: Self::Item,
        right: Self::Item,
        span: Span,
    ) -> Result<Self::Item, Error> {
        if op.is_arithmetic() {
            return arithmetic(op, left, right, span);
        }
        if op.is_ordering() {
            let comparable = |s: &Schema| s.is_number() || s.is_unknown();
            if !comparable(&left) || !comparable(&right) {
                return Err(Error::type_error(
                    span,
                    format!(
                        "cannot compare {} with {}",
                        left.type_name(),
                        right.type_name()
                    ),
                ));
            }
        }
        // Equality, logic, membership and string tests accept any operands.
        Ok(Cow::Owned(Schema::Boolean))
    }

    fn filter(
        &self,
        items: Self::Item,
        span: Span,
        predicate: &mut dyn FnMut(&Self::Item) -> Result<Self::Item, Error>,
    ) -> Result<Self::Item, Error> {
        let item = match items.as_ref() {
            Schema::Array(item) => item.as_ref().clone(),
            Schema::Unknown => Schema::Unknown,
            other => {
                return Err(Error::type_error(
                    span,
                    format!("where requires an array but found {}", other.type_name()),
                ));
            }
        };
        predicate(&Cow::Owned(item))?;
        Ok(items)
    }
}

fn arithmetic<'a>(
    op: BinOp,
    left: Cow<'a, Schema>,
    right: Cow<'a, Schema>,
    span: Span,
) -> Result<Cow<'a, Schema>, Error> {
    if op == BinOp::Add {
        if left.is_string() || right.is_string() {
            return Ok(Cow::Owned(Schema::String));
        }
        if let (Some(l), Some(r)) = (left.items(), right.items()) {
            if r.is_unknown() || l.type_name() == r.type_name() {
                return Ok(left);
            }
            if l.is_unknown() {
                return Ok(right);
            }
            return Err(Error::type_error(
                span,
                format!(
                    "array item types don't match: {} vs {}",
                    l.type_name(),
                    r.type_name()
                ),
            ));
        }
    }
    if left.is_unknown() || right.is_unknown() {
        return Ok(Cow::Owned(Schema::Unknown));
    }
    if left.is_number() && right.is_number() {
        return Ok(Cow::Owned(Schema::Number));
    }
    Err(Error::type_error(
        span,
        format!(
            "cannot operate on incompatible types {} and {}",
            left.type_name(),
            right.type_name()
        ),
    ))
}
