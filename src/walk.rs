//! Single traversal of a compiled [`Ast`], shared by the type checker and the
//! evaluator.
//!
//! The walk decides *which* subtrees are visited and with which ambient
//! payload; a [`Domain`] decides what each node produces. The checker's
//! payload is a [`Schema`](crate::Schema), the evaluator's a
//! [`Value`](crate::Value).

use crate::{
    ast::{Ast, BinOp, Expr, NodeId, Span, UnaryOp},
    error::Error,
    value::Value,
};

/// Per-node semantics plugged into [`walk`].
///
/// `'a` is the lifetime of the root payload, so domains can hand out borrowed
/// sub-payloads instead of copies.
pub(crate) trait Domain<'a> {
    type Item: Clone;

    fn literal(&self, value: &Value, span: Span) -> Result<Self::Item, Error>;

    fn identifier(&self, name: &str, ambient: &Self::Item, span: Span)
    -> Result<Self::Item, Error>;

    /// Rejects a left operand of `[` before its index is visited.
    fn indexable(&self, object: &Self::Item, span: Span) -> Result<(), Error>;

    fn index(&self, object: Self::Item, index: Self::Item, span: Span)
    -> Result<Self::Item, Error>;

    fn slice(&self, start: Self::Item, end: Self::Item, span: Span) -> Result<Self::Item, Error>;

    fn unary(&self, op: UnaryOp, operand: Self::Item, span: Span) -> Result<Self::Item, Error>;

    fn binary(
        &self,
        op: BinOp,
        left: Self::Item,
        right: Self::Item,
        span: Span,
    ) -> Result<Self::Item, Error>;

    /// Applies `predicate` to the items of `items` as ambient payloads.
    fn filter(
        &self,
        items: Self::Item,
        span: Span,
        predicate: &mut dyn FnMut(&Self::Item) -> Result<Self::Item, Error>,
    ) -> Result<Self::Item, Error>;
}

/// Visits `id` with `ambient` as the payload identifiers resolve against.
///
/// The first error aborts the walk and is returned unchanged.
pub(crate) fn walk<'a, D: Domain<'a>>(
    domain: &D,
    ast: &Ast,
    id: NodeId,
    ambient: &D::Item,
) -> Result<D::Item, Error> {
    let span = ast.span(id);
    match ast.expr(id) {
        Expr::Literal(value) => domain.literal(value, span),
        Expr::Identifier(name) => domain.identifier(name, ambient, span),
        Expr::FieldSelect { object, field } => {
            let selected = walk(domain, ast, *object, ambient)?;
            walk(domain, ast, *field, &selected)
        }
        Expr::Index { object, index } => {
            let object = walk(domain, ast, *object, ambient)?;
            domain.indexable(&object, span)?;
            let index = walk(domain, ast, *index, ambient)?;
            domain.index(object, index, span)
        }
        Expr::Slice { start, end } => {
            let start = walk(domain, ast, *start, ambient)?;
            let end = walk(domain, ast, *end, ambient)?;
            domain.slice(start, end, span)
        }
        Expr::Unary { op, operand } => {
            let operand = walk(domain, ast, *operand, ambient)?;
            domain.unary(*op, operand, span)
        }
        Expr::BinaryOp { op, left, right } => {
            let left = walk(domain, ast, *left, ambient)?;
            let right = walk(domain, ast, *right, ambient)?;
            domain.binary(*op, left, right, span)
        }
        Expr::Where { items, predicate } => {
            let items = walk(domain, ast, *items, ambient)?;
            domain.filter(items, span, &mut |item| walk(domain, ast, *predicate, item))
        }
    }
}
