//! Canonical expression nodes

use super::ops::{BinOp, LiteralKind, UnaryOp};
use serde::{Deserialize, Serialize};

/// Canonical expression. A closed set: generators match exhaustively and the
/// compiler enforces that every variant is handled everywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", content = "fields")]
pub enum CanonExpr {
    /// Literal value. `value` holds the normalized in-memory form: string and
    /// char literals are stored unescaped (a real newline, not `\n`), numbers
    /// and booleans as their canonical digits/words.
    Literal { value: String, kind: LiteralKind },
    /// Variable reference
    Ident(String),
    /// Binary operation
    Binary {
        left: Box<CanonExpr>,
        op: BinOp,
        right: Box<CanonExpr>,
    },
    /// Unary operation
    Unary {
        op: UnaryOp,
        operand: Box<CanonExpr>,
    },
    /// Conditional expression, normalized from both `cond ? a : b` and
    /// `a if cond else b` source shapes.
    Ternary {
        condition: Box<CanonExpr>,
        then_value: Box<CanonExpr>,
        else_value: Box<CanonExpr>,
    },
    /// Call by (possibly dotted) name. Length and conversion idioms are
    /// canonicalized by the source parsers to the names "len" and "str".
    Call { name: String, args: Vec<CanonExpr> },
    /// Element access on a named array.
    ArrayAccess {
        array: String,
        index: Box<CanonExpr>,
    },
    /// Array/list initializer; nests for multi-dimensional initializers.
    ArrayLiteral(Vec<CanonExpr>),
    /// Verbatim source fragment for sub-expressions outside the supported
    /// grammar. Rendered as-is, never inspected.
    Raw(String),
}

impl CanonExpr {
    pub fn int(value: i64) -> Self {
        CanonExpr::Literal {
            value: value.to_string(),
            kind: LiteralKind::Int,
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        CanonExpr::Literal {
            value: value.into(),
            kind: LiteralKind::Str,
        }
    }

    pub fn ident(name: impl Into<String>) -> Self {
        CanonExpr::Ident(name.into())
    }

    /// The integer value of this expression when it is a plain or negated
    /// integer literal. Used for negative-index rewriting.
    pub fn as_const_int(&self) -> Option<i64> {
        match self {
            CanonExpr::Literal {
                value,
                kind: LiteralKind::Int,
            } => value.parse().ok(),
            CanonExpr::Unary {
                op: UnaryOp::Neg,
                operand,
            } => operand.as_const_int().map(|n| -n),
            _ => None,
        }
    }

    /// Whether this is a string literal (after normalization).
    pub fn is_string_literal(&self) -> bool {
        matches!(
            self,
            CanonExpr::Literal {
                kind: LiteralKind::Str,
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_const_int_through_negation() {
        let expr = CanonExpr::Unary {
            op: UnaryOp::Neg,
            operand: Box::new(CanonExpr::int(1)),
        };
        assert_eq!(expr.as_const_int(), Some(-1));
    }

    #[test]
    fn test_serializes_with_node_tag_alongside_kind_field() {
        let value = serde_json::to_value(CanonExpr::int(3)).unwrap();
        assert_eq!(value["node"], "Literal");
        assert_eq!(value["fields"]["kind"], "Int");
        assert_eq!(value["fields"]["value"], "3");

        // Newtype variants must serialize too.
        let value = serde_json::to_value(CanonExpr::ident("x")).unwrap();
        assert_eq!(value["node"], "Ident");
        assert_eq!(value["fields"], "x");
    }

    #[test]
    fn test_const_int_rejects_float() {
        let expr = CanonExpr::Literal {
            value: "1.5".to_string(),
            kind: LiteralKind::Float,
        };
        assert_eq!(expr.as_const_int(), None);
    }
}
