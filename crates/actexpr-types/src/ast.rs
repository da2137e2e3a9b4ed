//! AST node types for the GitHub Actions expression dialect.
//!
//! Every node carries a [`Span`]. The set of node kinds is closed: an
//! evaluator matches [`ExprKind`] exhaustively, so adding a kind here is a
//! compile-time change for every consumer.
//!
//! The `Expr::*` constructors build nodes with [`Span::DUMMY`]; they exist for
//! callers (and tests) that assemble trees without a parser.

use crate::Span;

// ══════════════════════════════════════════════════════════════════════════════
// Identifiers
// ══════════════════════════════════════════════════════════════════════════════

/// A spanned identifier (property or function name).
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// An expression node. Uses `Box` for recursive variants.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

/// The kind of expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    // ── Literals ──
    /// `null`
    NullLit,
    /// `true` / `false`
    BoolLit(bool),
    /// `42`, `-12`, `0xff`
    IntLit(i64),
    /// `3.14`, `1e5`
    FloatLit(f64),
    /// `'hello'`
    StringLit(String),

    // ── Context access ──
    /// `github`, `inputs`
    Variable(String),
    /// `expr.property`
    ObjectDeref {
        receiver: Box<Expr>,
        property: Ident,
    },
    /// `expr[index]`
    IndexAccess {
        operand: Box<Expr>,
        index: Box<Expr>,
    },

    // ── Operators ──
    /// `!expr`
    Not(Box<Expr>),
    /// `a == b`, `a < b`, etc.
    Compare {
        left: Box<Expr>,
        op: CompareOp,
        right: Box<Expr>,
    },
    /// `a && b`, `a || b`
    Logical {
        left: Box<Expr>,
        op: LogicalOp,
        right: Box<Expr>,
    },

    // ── Calls ──
    /// `startsWith(a, b)`
    FuncCall { callee: Ident, args: Vec<Expr> },
}

// ── Operators ─────────────────────────────────────────────────────────────────

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
}

impl CompareOp {
    /// Returns the operator symbol for error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::NotEq => "!=",
            CompareOp::Less => "<",
            CompareOp::LessEq => "<=",
            CompareOp::Greater => ">",
            CompareOp::GreaterEq => ">=",
        }
    }
}

/// Logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
        }
    }
}

// ── Construction ──────────────────────────────────────────────────────────────

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    fn dummy(kind: ExprKind) -> Self {
        Self::new(kind, Span::DUMMY)
    }

    pub fn null() -> Self {
        Self::dummy(ExprKind::NullLit)
    }

    pub fn bool(b: bool) -> Self {
        Self::dummy(ExprKind::BoolLit(b))
    }

    pub fn int(i: i64) -> Self {
        Self::dummy(ExprKind::IntLit(i))
    }

    pub fn float(f: f64) -> Self {
        Self::dummy(ExprKind::FloatLit(f))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::dummy(ExprKind::StringLit(s.into()))
    }

    pub fn var(name: impl Into<String>) -> Self {
        Self::dummy(ExprKind::Variable(name.into()))
    }

    /// `receiver.property`
    pub fn deref(receiver: Expr, property: impl Into<String>) -> Self {
        Self::dummy(ExprKind::ObjectDeref {
            receiver: Box::new(receiver),
            property: Ident::new(property, Span::DUMMY),
        })
    }

    /// `operand[index]`
    pub fn index(operand: Expr, index: Expr) -> Self {
        Self::dummy(ExprKind::IndexAccess {
            operand: Box::new(operand),
            index: Box::new(index),
        })
    }

    pub fn not(operand: Expr) -> Self {
        Self::dummy(ExprKind::Not(Box::new(operand)))
    }

    pub fn compare(left: Expr, op: CompareOp, right: Expr) -> Self {
        Self::dummy(ExprKind::Compare {
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    pub fn logical(left: Expr, op: LogicalOp, right: Expr) -> Self {
        Self::dummy(ExprKind::Logical {
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    pub fn and(left: Expr, right: Expr) -> Self {
        Self::logical(left, LogicalOp::And, right)
    }

    pub fn or(left: Expr, right: Expr) -> Self {
        Self::logical(left, LogicalOp::Or, right)
    }

    pub fn call(callee: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::dummy(ExprKind::FuncCall {
            callee: Ident::new(callee, Span::DUMMY),
            args,
        })
    }

    /// Same node with a different span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_chain_nests_receivers() {
        let e = Expr::deref(Expr::deref(Expr::var("input"), "test2"), "test");
        let ExprKind::ObjectDeref { receiver, property } = &e.kind else {
            panic!("expected ObjectDeref, got {:?}", e.kind);
        };
        assert_eq!(property.name, "test");
        assert!(matches!(
            &receiver.kind,
            ExprKind::ObjectDeref { property, .. } if property.name == "test2"
        ));
    }

    #[test]
    fn test_builders_use_dummy_span() {
        assert_eq!(Expr::int(1).span, Span::DUMMY);
        assert_eq!(Expr::int(1).with_span(Span::new(0, 1)).span, Span::new(0, 1));
    }

    #[test]
    fn test_operator_symbols() {
        assert_eq!(CompareOp::GreaterEq.as_str(), ">=");
        assert_eq!(CompareOp::NotEq.as_str(), "!=");
        assert_eq!(LogicalOp::Or.as_str(), "||");
    }
}
