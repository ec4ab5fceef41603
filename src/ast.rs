//! AST node model for the template preprocessor.
//!
//! Nodes form a tree-of-lists: every node owns its children and an optional
//! `next` sibling, the latter exclusively owned by its predecessor. Sibling
//! chains represent document order within one syntactic block. There is no
//! sharing and there are no cycles, so plain `Box` ownership suffices.

/// The label carried by the `%DEFAULT` arm of a `%SWITCH`.
pub const DEFAULT_LABEL: &str = "DEFAULT";

/// Operator arity, determined by the operator name at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Unary,
    Binary,
}

/// One node of the template tree plus its sibling link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub next: Option<Box<Node>>,
}

/// The closed set of node shapes produced by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Verbatim passthrough text.
    Content(String),
    /// A bracketed `[...]` construct wrapping a literal or an operator.
    Expression(Box<Node>),
    /// A quoted string, bare word, or `<name>` reference.
    Literal(String),
    /// `NOT` (unary) or `AND`/`OR`/`EQUALS`/`CONTAINS` (binary).
    Operator {
        name: String,
        arity: Arity,
        lhs: Option<Box<Node>>,
        rhs: Option<Box<Node>>,
    },
    /// `%IF`, with the `%ELSE` body (an `Unconditional`) as its else branch.
    Conditional {
        condition: Box<Node>,
        then_branch: Option<Box<Node>>,
        else_branch: Option<Box<Node>>,
    },
    /// The `%ELSE` body.
    Unconditional { branch: Option<Box<Node>> },
    /// `%SWITCH`, with a chain of `MatchCase` arms and an optional default arm.
    Match {
        selector: Box<Node>,
        cases: Option<Box<Node>>,
        default: Option<Box<Node>>,
    },
    /// One `%CASE` (or the `%DEFAULT`, whose label is [`DEFAULT_LABEL`]).
    MatchCase {
        label: Box<Node>,
        branch: Option<Box<Node>>,
    },
    /// `%PRINT`, a diagnostic side effect that never reaches the output text.
    Print { content: Box<Node> },
}

impl Node {
    pub fn new(kind: NodeKind) -> Box<Node> {
        Box::new(Node { kind, next: None })
    }

    /// Name of the node kind, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            NodeKind::Content(_) => "CONTENT",
            NodeKind::Expression(_) => "EXPRESSION",
            NodeKind::Literal(_) => "LITERAL",
            NodeKind::Operator { .. } => "OPERATOR",
            NodeKind::Conditional { .. } => "CONDITIONAL",
            NodeKind::Unconditional { .. } => "UNCONDITIONAL",
            NodeKind::Match { .. } => "MATCH",
            NodeKind::MatchCase { .. } => "MATCH_CASE",
            NodeKind::Print { .. } => "PRINT",
        }
    }
}
