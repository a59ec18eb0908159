//! Construct parsers shared across source languages
//!
//! Conditionals, while loops, assignments and bare expression statements
//! have the same canonical shape in all three grammars once the native
//! layer has stripped the concrete syntax; only the expression dialect
//! differs, and that is parameterized through the frontend's language.

use super::expr::{parse_expr_or_raw, parse_expression, split_assignment};
use super::{Frontend, SourceParser};
use crate::ast::{AssignOp, CanonExpr, CanonNode, CanonStmt, LoopKind, UnaryOp};
use crate::context::TranslationContext;
use crate::error::{Result, TranslateError};
use crate::lang::Language;
use crate::syntax::{LoopStyle, NativeKind, NativeNode};
use crate::typemap;

pub(crate) struct IfParser;

impl SourceParser for IfParser {
    fn can_parse(&self, node: &NativeNode) -> bool {
        node.kind == NativeKind::If
    }

    fn parse(
        &self,
        node: &NativeNode,
        fe: &Frontend,
        ctx: &mut TranslationContext,
    ) -> Result<Option<Vec<CanonStmt>>> {
        let cond = parse_expr_or_raw(&node.text, fe.lang());
        let then_branch = fe.parse_block(&node.children, ctx);
        let elif_branches = node
            .elif_arms
            .iter()
            .map(|(cond_text, body)| {
                (
                    parse_expr_or_raw(cond_text, fe.lang()),
                    fe.parse_block(body, ctx),
                )
            })
            .collect();
        let else_branch = node
            .else_children
            .as_ref()
            .map(|body| fe.parse_block(body, ctx));
        Ok(Some(vec![CanonStmt::structural(CanonNode::If {
            cond,
            then_branch,
            elif_branches,
            else_branch,
        })]))
    }
}

pub(crate) struct WhileParser;

impl SourceParser for WhileParser {
    fn can_parse(&self, node: &NativeNode) -> bool {
        matches!(
            node.kind,
            NativeKind::Loop(LoopStyle::While) | NativeKind::Loop(LoopStyle::DoWhile)
        )
    }

    fn parse(
        &self,
        node: &NativeNode,
        fe: &Frontend,
        ctx: &mut TranslationContext,
    ) -> Result<Option<Vec<CanonStmt>>> {
        let cond = parse_expr_or_raw(&node.text, fe.lang());
        let body = fe.parse_block(&node.children, ctx);
        let kind = if node.kind == NativeKind::Loop(LoopStyle::DoWhile) {
            LoopKind::DoWhile { cond }
        } else {
            LoopKind::While { cond }
        };
        Ok(Some(vec![CanonStmt::structural(CanonNode::Loop {
            kind,
            body,
        })]))
    }
}

/// Assignment to an already-established identifier or array element,
/// plain or augmented.
pub(crate) struct AssignParser;

impl SourceParser for AssignParser {
    fn can_parse(&self, node: &NativeNode) -> bool {
        node.kind == NativeKind::Simple && split_assignment(&node.text).is_some()
    }

    fn parse(
        &self,
        node: &NativeNode,
        fe: &Frontend,
        _ctx: &mut TranslationContext,
    ) -> Result<Option<Vec<CanonStmt>>> {
        let (target_text, op, value_text) =
            split_assignment(&node.text).expect("can_parse checked");
        let target = parse_expr_or_raw(&target_text, fe.lang());
        if !matches!(target, CanonExpr::Ident(_) | CanonExpr::ArrayAccess { .. }) {
            return Err(TranslateError::ExprError {
                message: format!("unsupported assignment target '{target_text}'"),
            });
        }
        let value = parse_expr_or_raw(&value_text, fe.lang());
        Ok(Some(vec![CanonStmt::structural(CanonNode::Assign {
            target,
            op,
            value,
        })]))
    }
}

/// `x++` / `x--` statements (C and Java), normalized to augmented
/// assignment by one.
pub(crate) struct IncDecParser;

impl SourceParser for IncDecParser {
    fn can_parse(&self, node: &NativeNode) -> bool {
        node.kind == NativeKind::Simple
            && (node.text.ends_with("++") || node.text.ends_with("--"))
    }

    fn parse(
        &self,
        node: &NativeNode,
        fe: &Frontend,
        _ctx: &mut TranslationContext,
    ) -> Result<Option<Vec<CanonStmt>>> {
        let (body, op) = if let Some(rest) = node.text.strip_suffix("++") {
            (rest, AssignOp::AddAssign)
        } else {
            (node.text.strip_suffix("--").expect("can_parse checked"), AssignOp::SubAssign)
        };
        let target = parse_expr_or_raw(body.trim(), fe.lang());
        if !matches!(target, CanonExpr::Ident(_) | CanonExpr::ArrayAccess { .. }) {
            return Ok(None);
        }
        Ok(Some(vec![CanonStmt::structural(CanonNode::Assign {
            target,
            op,
            value: CanonExpr::int(1),
        })]))
    }
}

/// Bare expression statement, usually a call. Declines anything the
/// expression grammar rejects so the node can degrade further down.
pub(crate) struct ExprStmtParser;

impl SourceParser for ExprStmtParser {
    fn can_parse(&self, node: &NativeNode) -> bool {
        node.kind == NativeKind::Simple
    }

    fn parse(
        &self,
        node: &NativeNode,
        fe: &Frontend,
        _ctx: &mut TranslationContext,
    ) -> Result<Option<Vec<CanonStmt>>> {
        match parse_expression(&node.text, fe.lang()) {
            Ok(expr) => Ok(Some(vec![CanonStmt::structural(CanonNode::ExprStmt(
                expr,
            ))])),
            Err(_) => Ok(None),
        }
    }
}

/// Read a C-style `init; cond; update` for-header into a counted range.
/// Returns `None` when the three parts do not line up on one loop
/// variable; the caller degrades the loop.
pub(crate) fn c_style_for_range(
    interior: &str,
    lang: Language,
    ctx: &mut TranslationContext,
) -> Option<LoopKind> {
    let parts: Vec<&str> = interior.split(';').map(|p| p.trim()).collect();
    if parts.len() != 3 {
        return None;
    }

    let (init_target, init_op, start_text) = split_assignment(parts[0])?;
    if init_op != AssignOp::Assign {
        return None;
    }
    let words: Vec<&str> = init_target.split_whitespace().collect();
    let var = (*words.last()?).to_string();
    if words.len() > 1 {
        let declared = words[..words.len() - 1].join(" ");
        if !typemap::is_known_type(lang, &declared) {
            return None;
        }
        ctx.add_variable(&var, &declared, false);
    }
    let start = parse_expr_or_raw(&start_text, lang);

    let (end, inclusive) = match parse_expression(parts[1], lang).ok()? {
        CanonExpr::Binary { left, op, right } => {
            if !matches!(*left, CanonExpr::Ident(ref n) if *n == var) {
                return None;
            }
            use crate::ast::BinOp;
            match op {
                BinOp::Lt | BinOp::Gt => (*right, false),
                BinOp::LtEq | BinOp::GtEq => (*right, true),
                _ => return None,
            }
        }
        _ => return None,
    };

    let update = parts[2].trim();
    let step = if update == format!("{var}++") || update == format!("++{var}") {
        None
    } else if update == format!("{var}--") || update == format!("--{var}") {
        Some(CanonExpr::int(-1))
    } else {
        let (t, op, v) = split_assignment(update)?;
        if t != var {
            return None;
        }
        let amount = parse_expr_or_raw(&v, lang);
        match op {
            AssignOp::AddAssign => Some(amount),
            AssignOp::SubAssign => Some(negate(amount)),
            AssignOp::Assign => match amount {
                // i = i + k / i = i - k
                CanonExpr::Binary { left, op, right }
                    if matches!(*left, CanonExpr::Ident(ref n) if *n == var) =>
                {
                    use crate::ast::BinOp;
                    match op {
                        BinOp::Add => Some(*right),
                        BinOp::Sub => Some(negate(*right)),
                        _ => return None,
                    }
                }
                _ => return None,
            },
            _ => return None,
        }
    };

    Some(LoopKind::ForRange {
        var,
        start,
        end,
        step,
        inclusive,
    })
}

fn negate(expr: CanonExpr) -> CanonExpr {
    match expr.as_const_int() {
        Some(k) => CanonExpr::int(-k),
        None => CanonExpr::Unary {
            op: UnaryOp::Neg,
            operand: Box::new(expr),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::LanguagePair;

    fn ctx() -> TranslationContext {
        TranslationContext::new(LanguagePair::new(Language::C, Language::Python))
    }

    #[test]
    fn test_c_for_range_ascending() {
        let mut ctx = ctx();
        let kind = c_style_for_range("int i = 0; i < 10; i++", Language::C, &mut ctx).unwrap();
        match kind {
            LoopKind::ForRange {
                var,
                start,
                end,
                step,
                inclusive,
            } => {
                assert_eq!(var, "i");
                assert_eq!(start.as_const_int(), Some(0));
                assert_eq!(end.as_const_int(), Some(10));
                assert!(step.is_none());
                assert!(!inclusive);
            }
            other => panic!("unexpected kind: {other:?}"),
        }
        assert_eq!(ctx.variable_type("i"), Some("int"));
    }

    #[test]
    fn test_c_for_range_descending_inclusive() {
        let mut ctx = ctx();
        let kind =
            c_style_for_range("int i = 10; i >= 1; i--", Language::C, &mut ctx).unwrap();
        match kind {
            LoopKind::ForRange { step, inclusive, .. } => {
                assert_eq!(step.and_then(|s| s.as_const_int()), Some(-1));
                assert!(inclusive);
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn test_c_for_range_stepped() {
        let mut ctx = ctx();
        let kind =
            c_style_for_range("i = 0; i < n; i += 2", Language::C, &mut ctx).unwrap();
        match kind {
            LoopKind::ForRange { step, .. } => {
                assert_eq!(step.and_then(|s| s.as_const_int()), Some(2));
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn test_c_for_rejects_foreign_shapes() {
        let mut ctx = ctx();
        assert!(c_style_for_range("int i = 0; i != 10; i++", Language::C, &mut ctx).is_none());
        assert!(c_style_for_range("; x < 3; x++", Language::C, &mut ctx).is_none());
        assert!(c_style_for_range("int i = 0; j < 10; i++", Language::C, &mut ctx).is_none());
    }

    #[test]
    fn test_c_for_rejects_unknown_init_type() {
        let mut ctx = ctx();
        assert!(
            c_style_for_range("size_t i = 0; i < 10; i++", Language::C, &mut ctx).is_none()
        );
        assert!(ctx.variable_type("i").is_none());
    }
}
