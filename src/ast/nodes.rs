//! Canonical statement nodes

use super::exprs::CanonExpr;
use super::location::{ParseStrategy, SourceSpan};
use super::ops::AssignOp;
use serde::{Deserialize, Serialize};

/// One piece of a decomposed print format. Text pieces carry normalized
/// literal text; placeholders consume one argument positionally and remember
/// the original printf specifier when the source had one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PrintPiece {
    Text(String),
    Placeholder { spec: Option<String> },
}

/// Loop header shapes, normalized across the three grammars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LoopKind {
    /// Counted loop: Python `range(start, end[, step])`, C/Java
    /// `for (int i = start; i < end; i += step)`.
    ForRange {
        var: String,
        start: CanonExpr,
        end: CanonExpr,
        /// Absent means step 1.
        step: Option<CanonExpr>,
        /// True when the source compared with `<=`.
        inclusive: bool,
    },
    /// Iteration over a collection: Python `for x in xs`, Java
    /// `for (int x : xs)`.
    ForEach { var: String, iterable: CanonExpr },
    While { cond: CanonExpr },
    DoWhile { cond: CanonExpr },
}

/// Canonical statement node. Closed tagged-variant type; every field a
/// generator reads is populated by every parser that can produce the
/// variant (explicit `None`, never omission).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", content = "fields")]
pub enum CanonNode {
    /// Scalar variable declaration. `declared_type` is the source-language
    /// type name; mapping to the target happens at generation time.
    VarDecl {
        name: String,
        declared_type: String,
        init: Option<CanonExpr>,
    },
    /// Array declaration. `dimensions` length equals the bracket depth the
    /// generator emits; an entry is the declared size when the source named
    /// one. An empty `dimensions` never occurs here - scalars are `VarDecl`.
    ArrayDecl {
        name: String,
        element_type: String,
        dimensions: Vec<Option<usize>>,
        init: Option<CanonExpr>,
    },
    /// Print statement. `pieces` and `args` zip positionally: each
    /// `Placeholder` consumes the next argument. The trailing-newline
    /// convention of the source primitive lives in `newline`, not in the
    /// text pieces.
    Print {
        pieces: Vec<PrintPiece>,
        args: Vec<CanonExpr>,
        newline: bool,
    },
    Comment {
        text: String,
        is_inline: bool,
    },
    /// Blank source line, kept for spacing reconciliation.
    Blank,
    If {
        cond: CanonExpr,
        then_branch: Vec<CanonStmt>,
        elif_branches: Vec<(CanonExpr, Vec<CanonStmt>)>,
        else_branch: Option<Vec<CanonStmt>>,
    },
    Loop {
        kind: LoopKind,
        body: Vec<CanonStmt>,
    },
    /// Assignment to an identifier or array element.
    Assign {
        target: CanonExpr,
        op: AssignOp,
        value: CanonExpr,
    },
    /// Bare expression statement (usually a call).
    ExprStmt(CanonExpr),
    /// Construct outside the supported subset: rendered as a comment in the
    /// target, accompanied by a warning.
    Passthrough { original: String },
}

/// A canonical node plus the reconciliation metadata the orchestrator needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonStmt {
    pub node: CanonNode,
    /// Original line span and raw text; used only for output layout.
    pub span: Option<SourceSpan>,
    /// Same-line comment to re-attach to the rendered statement.
    pub trailing_comment: Option<String>,
    pub strategy: ParseStrategy,
}

impl CanonStmt {
    pub fn structural(node: CanonNode) -> Self {
        Self {
            node,
            span: None,
            trailing_comment: None,
            strategy: ParseStrategy::Structural,
        }
    }

    pub fn pattern(node: CanonNode) -> Self {
        Self {
            node,
            span: None,
            trailing_comment: None,
            strategy: ParseStrategy::Pattern,
        }
    }

    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = Some(span);
        self
    }

    pub fn blank() -> Self {
        Self::structural(CanonNode::Blank)
    }

    pub fn is_blank(&self) -> bool {
        matches!(self.node, CanonNode::Blank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canon_stmt_defaults() {
        let stmt = CanonStmt::structural(CanonNode::Blank);
        assert!(stmt.is_blank());
        assert!(stmt.span.is_none());
        assert!(stmt.trailing_comment.is_none());
        assert_eq!(stmt.strategy, ParseStrategy::Structural);
    }

    #[test]
    fn test_loop_serializes_with_node_tag_alongside_kind_field() {
        let node = CanonNode::Loop {
            kind: LoopKind::While {
                cond: CanonExpr::ident("going"),
            },
            body: Vec::new(),
        };
        let value = serde_json::to_value(node).unwrap();
        assert_eq!(value["node"], "Loop");
        assert!(value["fields"]["kind"].is_object());
    }

    #[test]
    fn test_print_pieces_zip_shape() {
        // "Sum: %d\n" with one argument: one text piece, one placeholder,
        // newline recorded as a flag rather than a trailing piece.
        let node = CanonNode::Print {
            pieces: vec![
                PrintPiece::Text("Sum: ".to_string()),
                PrintPiece::Placeholder {
                    spec: Some("%d".to_string()),
                },
            ],
            args: vec![CanonExpr::ident("x")],
            newline: true,
        };
        if let CanonNode::Print { pieces, args, newline } = node {
            let placeholders = pieces
                .iter()
                .filter(|p| matches!(p, PrintPiece::Placeholder { .. }))
                .count();
            assert_eq!(placeholders, args.len());
            assert!(newline);
        }
    }
}
