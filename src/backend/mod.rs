//! Target-language generators
//!
//! One generator per target. Statement generation is an exhaustive match
//! over the closed canonical node set; expression generation likewise.
//! Indentation is an explicit depth parameter (four spaces per level),
//! and the program shell (includes, `main`, class wrapper) is supplied by
//! `assemble` after the body is rendered, so one-shot import flags set
//! during generation land in the prologue.

use crate::ast::{BinOp, CanonExpr, CanonStmt};
use crate::context::TranslationContext;
use crate::lang::Language;
use crate::typemap;

pub mod c;
pub mod java;
pub mod python;

pub trait Generator {
    fn target(&self) -> Language;

    /// Indent depth of program statements inside this target's shell.
    fn body_depth(&self) -> usize;

    /// Render one canonical statement into `out`, one element per line.
    fn generate(
        &self,
        stmt: &CanonStmt,
        ctx: &mut TranslationContext,
        depth: usize,
        out: &mut Vec<String>,
    );

    fn generate_expr(&self, expr: &CanonExpr, ctx: &TranslationContext) -> String;

    /// Wrap rendered body lines in the target's program shell, injecting
    /// the imports flagged during generation.
    fn assemble(&self, body: Vec<String>, ctx: &TranslationContext) -> String;
}

pub fn generator_for(target: Language) -> Box<dyn Generator> {
    match target {
        Language::Python => Box::new(python::PythonGenerator),
        Language::C => Box::new(c::CGenerator),
        Language::Java => Box::new(java::JavaGenerator),
    }
}

pub fn generate_block(
    gen: &dyn Generator,
    stmts: &[CanonStmt],
    ctx: &mut TranslationContext,
    depth: usize,
    out: &mut Vec<String>,
) {
    for stmt in stmts {
        let first = out.len();
        gen.generate(stmt, ctx, depth, out);
        if let Some(comment) = &stmt.trailing_comment {
            if let Some(line) = out.get_mut(first) {
                if !line.trim().is_empty() {
                    line.push_str("  ");
                    line.push_str(gen.target().comment_prefix());
                    line.push(' ');
                    line.push_str(comment);
                }
            }
        }
    }
}

pub(crate) fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Re-escape a normalized string for a double-quoted literal. All three
/// targets share the C-style escape set.
pub(crate) fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            other => out.push(other),
        }
    }
    out
}

pub(crate) fn bin_prec(op: BinOp) -> u8 {
    match op {
        BinOp::Or => 1,
        BinOp::And => 2,
        BinOp::Eq | BinOp::NotEq | BinOp::Lt | BinOp::Gt | BinOp::LtEq | BinOp::GtEq => 3,
        BinOp::Add | BinOp::Sub => 4,
        BinOp::Mul | BinOp::Div | BinOp::Mod => 5,
    }
}

pub(crate) fn expr_prec(expr: &CanonExpr) -> u8 {
    match expr {
        CanonExpr::Ternary { .. } => 0,
        CanonExpr::Binary { op, .. } => bin_prec(*op),
        CanonExpr::Unary { .. } => 6,
        _ => 7,
    }
}

pub(crate) fn paren_if(needs: bool, text: String) -> String {
    if needs {
        format!("({text})")
    } else {
        text
    }
}

/// Operand of a binary expression needs parentheses when it binds looser
/// than the parent, or equally on the right of a left-associative chain.
pub(crate) fn operand_needs_parens(parent: BinOp, child: &CanonExpr, right_side: bool) -> bool {
    let child_prec = expr_prec(child);
    let parent_prec = bin_prec(parent);
    if right_side {
        child_prec <= parent_prec && matches!(child, CanonExpr::Binary { .. } | CanonExpr::Ternary { .. })
    } else {
        child_prec < parent_prec
    }
}

/// Boolean-naming heuristic (literal rendering only): a 0/1 value bound
/// to a boolean-named variable renders as the target's boolean literal.
pub(crate) fn bool_override(
    name: &str,
    value: &CanonExpr,
    ctx: &TranslationContext,
) -> Option<bool> {
    if ctx.strict_types || !typemap::is_boolean_like_name(name) {
        return None;
    }
    match value {
        CanonExpr::Literal { .. } => match value.as_const_int() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        _ => None,
    }
}

/// Original source lines rendered behind the target's comment marker.
pub(crate) fn passthrough_lines(
    original: &str,
    prefix: &str,
    depth: usize,
    out: &mut Vec<String>,
) {
    let pad = indent(depth);
    for line in original.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            out.push(format!("{pad}{prefix}"));
        } else {
            out.push(format!("{pad}{prefix} {}", line.trim()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_string_round_trip() {
        let original = "Sum: %d\n\twith \"quotes\" and \\";
        let escaped = escape_string(original);
        assert_eq!(escaped, "Sum: %d\\n\\twith \\\"quotes\\\" and \\\\");
        assert_eq!(crate::frontend::expr::unescape(&escaped), original);
    }

    #[test]
    fn test_precedence_ordering() {
        assert!(bin_prec(BinOp::Mul) > bin_prec(BinOp::Add));
        assert!(bin_prec(BinOp::Add) > bin_prec(BinOp::Lt));
        assert!(bin_prec(BinOp::Lt) > bin_prec(BinOp::And));
        assert!(bin_prec(BinOp::And) > bin_prec(BinOp::Or));
    }

    #[test]
    fn test_operand_parens() {
        // (a + b) * c keeps its parentheses
        let sum = CanonExpr::Binary {
            left: Box::new(CanonExpr::ident("a")),
            op: BinOp::Add,
            right: Box::new(CanonExpr::ident("b")),
        };
        assert!(operand_needs_parens(BinOp::Mul, &sum, false));
        // a + b * c does not parenthesize the product
        let product = CanonExpr::Binary {
            left: Box::new(CanonExpr::ident("b")),
            op: BinOp::Mul,
            right: Box::new(CanonExpr::ident("c")),
        };
        assert!(!operand_needs_parens(BinOp::Add, &product, true));
        // a - (b - c) keeps the right-side parentheses
        assert!(operand_needs_parens(BinOp::Sub, &sum, true));
    }
}
