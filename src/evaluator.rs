use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::{
    ast::{Ast, BinOp, Span, UnaryOp},
    error::Error,
    options::Options,
    value::Value,
    walk::{Domain, walk},
};

/// Runs compiled expressions against concrete input values.
///
/// An `Evaluator` holds only its [`Options`]; the [`Ast`] and the input are
/// borrowed for the duration of [`Evaluator::run`] and never modified, so one
/// compiled expression can be run any number of times, from any number of
/// threads.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    options: Options,
}

impl Evaluator {
    /// Creates an evaluator with default (non-strict) options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: Options) -> Self {
        Evaluator { options }
    }

    /// Evaluates `ast` with `input` as the ambient value.
    ///
    /// # Examples
    ///
    /// ```
    /// use mexpr::{Evaluator, Value, parse};
    /// use mexpr::value::Map;
    ///
    /// let ast = parse("items where @ > 1", None).unwrap();
    ///
    /// let mut input = Map::new();
    /// input.insert("items".into(), Value::Array(vec![1.0.into(), 2.0.into(), 3.0.into()]));
    /// let input = Value::Object(input);
    ///
    /// let result = Evaluator::new().run(&ast, &input).unwrap();
    /// assert_eq!(result, Value::Array(vec![2.0.into(), 3.0.into()]));
    /// ```
    pub fn run(&self, ast: &Ast, input: &Value) -> Result<Value, Error> {
        let ambient = Cow::Borrowed(input);
        walk(self, ast, ast.root(), &ambient).map(Cow::into_owned)
    }

    /// Elements of a `where` operand whose predicate is truthy. A failing
    /// predicate aborts in strict mode and drops the element otherwise.
    fn keep<'a>(
        &self,
        items: impl Iterator<Item = Cow<'a, Value>>,
        predicate: &mut dyn FnMut(&Cow<'a, Value>) -> Result<Cow<'a, Value>, Error>,
    ) -> Result<Vec<Value>, Error> {
        let mut kept = Vec::new();
        for (position, item) in items.enumerate() {
            match predicate(&item) {
                Ok(result) => {
                    if result.is_truthy() {
                        kept.push(item.into_owned());
                    }
                }
                Err(err) if self.options.strict => return Err(err),
                Err(err) => {
                    tracing::debug!(position, error = %err, "excluding item from where");
                }
            }
        }
        Ok(kept)
    }

    fn number(&self, value: &Value, span: Span) -> Result<f64, Error> {
        value.as_number().ok_or_else(|| {
            Error::runtime(
                span,
                format!("unable to convert {} to number", value.type_name()),
            )
        })
    }
}

impl<'a> Domain<'a> for Evaluator {
    type Item = Cow<'a, Value>;

    fn literal(&self, value: &Value, _span: Span) -> Result<Self::Item, Error> {
        Ok(Cow::Owned(value.clone()))
    }

    fn identifier(
        &self,
        name: &str,
        ambient: &Self::Item,
        span: Span,
    ) -> Result<Self::Item, Error> {
        match (name, ambient.as_ref()) {
            ("@", _) => return Ok(ambient.clone()),
            ("length", Value::String(s)) => return Ok(Cow::Owned(s.chars().count().into())),
            ("length", Value::Array(items)) => return Ok(Cow::Owned(items.len().into())),
            ("lower", Value::String(s)) => return Ok(Cow::Owned(s.to_lowercase().into())),
            ("upper", Value::String(s)) => return Ok(Cow::Owned(s.to_uppercase().into())),
            _ => {}
        }

        let found = match ambient {
            Cow::Borrowed(value) => value.get(name).map(Cow::Borrowed),
            Cow::Owned(value) => value.get(name).cloned().map(Cow::Owned),
        };
        if let Some(value) = found {
            return Ok(value);
        }

        if self.options.falls_back_to_name() {
            return Ok(Cow::Owned(Value::from(name)));
        }
        match ambient.as_ref() {
            Value::Object(_) if !self.options.strict => Ok(Cow::Owned(Value::Null)),
            other => Err(Error::runtime(
                span,
                format!("cannot get {} from {}", name, other.type_name()),
            )),
        }
    }

    fn indexable(&self, object: &Self::Item, span: Span) -> Result<(), Error> {
        match object.as_ref() {
            Value::String(_) | Value::Array(_) => Ok(()),
            other => Err(Error::runtime(
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
            Value::Number(n) => element(object, *n, span),
            Value::Array(bounds) => match bounds.as_slice() {
                [Value::Number(start), Value::Number(end)] => {
                    slice_of(object.as_ref(), *start, *end, span).map(Cow::Owned)
                }
                _ => Err(Error::runtime(
                    span,
                    "slice bounds must be a pair of numbers",
                )),
            },
            other => Err(Error::runtime(
                span,
                format!(
                    "array index must be number or slice but found {}",
                    other.type_name()
                ),
            )),
        }
    }

    fn slice(&self, start: Self::Item, end: Self::Item, span: Span) -> Result<Self::Item, Error> {
        let bound = |value: &Value| {
            value.as_number().ok_or_else(|| {
                Error::runtime(
                    span,
                    format!("slice index must be a number but found {}", value.type_name()),
                )
            })
        };
        let pair = vec![Value::Number(bound(&start)?), Value::Number(bound(&end)?)];
        Ok(Cow::Owned(Value::Array(pair)))
    }

    fn unary(&self, op: UnaryOp, operand: Self::Item, span: Span) -> Result<Self::Item, Error> {
        let result = match op {
            UnaryOp::Not => Value::Boolean(!operand.is_truthy()),
            UnaryOp::Plus => Value::Number(self.number(&operand, span)?),
            UnaryOp::Minus => Value::Number(-self.number(&operand, span)?),
        };
        Ok(Cow::Owned(result))
    }

    fn binary(
        &self,
        op: BinOp,
        left: Self::Item,
        right: Self::Item,
        span: Span,
    ) -> Result<Self::Item, Error> {
        let (left, right) = (left.as_ref(), right.as_ref());
        let result = match op {
            BinOp::Add
            | BinOp::Subtract
            | BinOp::Multiply
            | BinOp::Divide
            | BinOp::Modulo
            | BinOp::Power => arithmetic(op, left, right, span)?,

            BinOp::Equal => Value::Boolean(left == right),
            BinOp::NotEqual => Value::Boolean(left != right),
            BinOp::LessThan | BinOp::LessEqual | BinOp::GreaterThan | BinOp::GreaterEqual => {
                let (l, r) = (self.number(left, span)?, self.number(right, span)?);
                Value::Boolean(match op {
                    BinOp::LessThan => l < r,
                    BinOp::LessEqual => l <= r,
                    BinOp::GreaterThan => l > r,
                    _ => l >= r,
                })
            }

            BinOp::And => Value::Boolean(left.is_truthy() && right.is_truthy()),
            BinOp::Or => Value::Boolean(left.is_truthy() || right.is_truthy()),

            BinOp::In => Value::Boolean(contains(right, left)),
            BinOp::Contains => Value::Boolean(contains(left, right)),
            BinOp::StartsWith => Value::Boolean(left.as_string().starts_with(&right.as_string())),
            BinOp::EndsWith => Value::Boolean(left.as_string().ends_with(&right.as_string())),
            BinOp::Before => Value::Boolean(timestamp(left, span)? < timestamp(right, span)?),
            BinOp::After => Value::Boolean(timestamp(left, span)? > timestamp(right, span)?),
        };
        Ok(Cow::Owned(result))
    }

    fn filter(
        &self,
        items: Self::Item,
        span: Span,
        predicate: &mut dyn FnMut(&Self::Item) -> Result<Self::Item, Error>,
    ) -> Result<Self::Item, Error> {
        let kept = match items {
            Cow::Borrowed(Value::Array(array)) => {
                self.keep(array.iter().map(Cow::Borrowed), predicate)?
            }
            Cow::Owned(Value::Array(array)) => {
                self.keep(array.into_iter().map(Cow::Owned), predicate)?
            }
            other => {
                return Err(Error::runtime(
                    span,
                    format!("where requires an array but found {}", other.type_name()),
                ));
            }
        };
        Ok(Cow::Owned(Value::Array(kept)))
    }
}

/// Resolves a possibly negative index against `len`.
fn normalize(index: f64, len: usize, span: Span) -> Result<usize, Error> {
    let mut i = index.trunc() as i64;
    if i < 0 {
        i += len as i64;
    }
    if i < 0 || i >= len as i64 {
        return Err(Error::runtime(
            span,
            format!("index {} out of range for length {}", index, len),
        ));
    }
    Ok(i as usize)
}

fn element(object: Cow<'_, Value>, index: f64, span: Span) -> Result<Cow<'_, Value>, Error> {
    match object {
        Cow::Borrowed(Value::Array(items)) => {
            let i = normalize(index, items.len(), span)?;
            Ok(Cow::Borrowed(&items[i]))
        }
        Cow::Owned(Value::Array(mut items)) => {
            let i = normalize(index, items.len(), span)?;
            Ok(Cow::Owned(items.swap_remove(i)))
        }
        other => match other.as_ref() {
            Value::String(s) => {
                let i = normalize(index, s.chars().count(), span)?;
                let ch: String = s.chars().skip(i).take(1).collect();
                Ok(Cow::Owned(Value::String(ch)))
            }
            value => Err(Error::runtime(
                span,
                format!("can only index strings or arrays but got {}", value.type_name()),
            )),
        },
    }
}

/// Inclusive `[start:end]` of a string (by character) or an array.
fn slice_of(object: &Value, start: f64, end: f64, span: Span) -> Result<Value, Error> {
    let bounds = |len: usize| -> Result<(usize, usize), Error> {
        let from = normalize(start, len, span)?;
        let to = normalize(end, len, span)?;
        if from > to {
            return Err(Error::runtime(
                span,
                format!("slice start {} is after end {}", start, end),
            ));
        }
        Ok((from, to))
    };

    match object {
        Value::String(s) => {
            let (from, to) = bounds(s.chars().count())?;
            Ok(Value::String(s.chars().skip(from).take(to - from + 1).collect()))
        }
        Value::Array(items) => {
            let (from, to) = bounds(items.len())?;
            Ok(Value::Array(items[from..=to].to_vec()))
        }
        other => Err(Error::runtime(
            span,
            format!("can only slice strings or arrays but got {}", other.type_name()),
        )),
    }
}

fn arithmetic(op: BinOp, left: &Value, right: &Value, span: Span) -> Result<Value, Error> {
    if op == BinOp::Add {
        match (left, right) {
            (Value::String(_), _) | (_, Value::String(_)) => {
                return Ok(Value::String(left.as_string() + &right.as_string()));
            }
            (Value::Array(l), Value::Array(r)) => {
                return Ok(Value::Array(l.iter().chain(r).cloned().collect()));
            }
            _ => {}
        }
    }

    let (Value::Number(l), Value::Number(r)) = (left, right) else {
        return Err(Error::runtime(
            span,
            format!(
                "cannot operate on incompatible types {} and {}",
                left.type_name(),
                right.type_name()
            ),
        ));
    };
    let (l, r) = (*l, *r);

    Ok(Value::Number(match op {
        BinOp::Add => l + r,
        BinOp::Subtract => l - r,
        BinOp::Multiply => l * r,
        BinOp::Divide => {
            if r == 0.0 {
                return Err(Error::DivisionByZero { span });
            }
            l / r
        }
        BinOp::Modulo => {
            let (l, r) = (l.trunc(), r.trunc());
            if r == 0.0 {
                return Err(Error::DivisionByZero { span });
            }
            l % r
        }
        _ => l.powf(r),
    }))
}

/// Membership: array element, object key or substring.
fn contains(container: &Value, needle: &Value) -> bool {
    match container {
        Value::Array(items) => items.contains(needle),
        Value::Object(map) => map.contains_key(needle.as_string().as_str()),
        other => other.as_string().contains(needle.as_string().as_str()),
    }
}

/// Parses RFC 3339, then a zone-less date-time, then a bare date (midnight
/// UTC).
fn timestamp(value: &Value, span: Span) -> Result<DateTime<Utc>, Error> {
    let text = value.as_string();
    let text = text.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(parsed.and_utc());
        }
    }
    if let Some(midnight) = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }

    Err(Error::runtime(
        span,
        format!("unable to parse `{}` as a date or time", text),
    ))
}
