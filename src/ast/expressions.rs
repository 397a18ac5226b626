use crate::ast::{BinOp, Span, UnaryOp};
use crate::value::Value;

/// Index of a node inside an [`Ast`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Expression node payload.
///
/// Children are [`NodeId`]s into the owning [`Ast`], never boxes, so a compiled
/// tree is a flat read-only table that can be shared between threads.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal number or string
    ///
    /// # Example
    /// ```text
    /// 42
    /// "hello"
    /// ```
    Literal(Value),

    /// Property name resolved against the ambient value.
    ///
    /// `@` is the ambient value itself; `length`, `lower` and `upper` are
    /// pseudo-properties of strings and arrays.
    Identifier(String),

    /// Field selection: evaluates `field` with `object` as the ambient value
    ///
    /// # Example
    /// ```text
    /// user.address.city
    /// ```
    FieldSelect { object: NodeId, field: NodeId },

    /// Element, character or slice access
    ///
    /// # Examples
    /// ```text
    /// items[0]
    /// items[-1]
    /// name[1:3]
    /// ```
    Index { object: NodeId, index: NodeId },

    /// Inclusive slice bounds, only meaningful as the index of [`Expr::Index`]
    Slice { start: NodeId, end: NodeId },

    /// Prefix operator
    Unary { op: UnaryOp, operand: NodeId },

    /// Binary operation (arithmetic, comparison, logical, string tests)
    BinaryOp {
        op: BinOp,
        left: NodeId,
        right: NodeId,
    },

    /// Array filter: keeps the items for which `predicate` is truthy
    ///
    /// # Example
    /// ```text
    /// items where id > 3
    /// ```
    Where { items: NodeId, predicate: NodeId },
}

/// A node together with the source range it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub expr: Expr,
    pub span: Span,
}

/// A compiled expression.
///
/// Produced once by the parser and never modified afterwards; evaluation and
/// type checking only take `&Ast`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ast {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Ast {
    pub(crate) fn new(nodes: Vec<Node>, root: NodeId) -> Self {
        Ast { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn expr(&self, id: NodeId) -> &Expr {
        &self.node(id).expr
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.node(id).span
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Children of a node in left-to-right order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        match *self.expr(id) {
            Expr::Literal(_) | Expr::Identifier(_) => vec![],
            Expr::Unary { operand, .. } => vec![operand],
            Expr::FieldSelect { object, field } => vec![object, field],
            Expr::Index { object, index } => vec![object, index],
            Expr::Slice { start, end } => vec![start, end],
            Expr::BinaryOp { left, right, .. } => vec![left, right],
            Expr::Where { items, predicate } => vec![items, predicate],
        }
    }
}

/// Appends nodes to an arena and hands out their ids.
#[derive(Debug, Default)]
pub(crate) struct AstBuilder {
    nodes: Vec<Node>,
}

impl AstBuilder {
    pub fn push(&mut self, expr: Expr, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { expr, span });
        id
    }

    pub fn finish(self, root: NodeId) -> Ast {
        Ast::new(self.nodes, root)
    }
}
