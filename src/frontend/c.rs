//! C source parsers
//!
//! Declarations are recognized by pattern: a regex anchors the base type
//! and the declarator list carries pointers, array brackets and
//! initializers. `printf` is decomposed against its format string. A
//! `char` array or pointer initialized with a string literal collapses to
//! the string type so targets with native strings render it naturally.

use super::common::{
    c_style_for_range, AssignParser, ExprStmtParser, IfParser, IncDecParser, WhileParser,
};
use super::expr::{parse_expr_or_raw, parse_expression, split_assignment, split_top_commas};
use super::format;
use super::{Frontend, SourceParser};
use crate::ast::{AssignOp, CanonExpr, CanonNode, CanonStmt};
use crate::context::TranslationContext;
use crate::error::{Result, TranslateError};
use crate::lang::Language;
use crate::syntax::{paren_interior, LoopStyle, NativeKind, NativeNode};
use crate::typemap;
use once_cell::sync::Lazy;
use regex::Regex;

pub(crate) fn parsers() -> Vec<Box<dyn SourceParser>> {
    vec![
        Box::new(IfParser),
        Box::new(WhileParser),
        Box::new(CForParser),
        Box::new(CPrintParser),
        Box::new(CDeclParser),
        Box::new(IncDecParser),
        Box::new(AssignParser),
        Box::new(ExprStmtParser),
    ]
}

static DECL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<ty>(?:unsigned\s+|signed\s+)?(?:long\s+long|long|short|int|float|double|char|bool|_Bool))\s+(?P<rest>[*A-Za-z_].*)$",
    )
    .expect("declaration pattern")
});

static DECLARATOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<stars>\*+\s*)?(?P<name>[A-Za-z_]\w*)\s*(?P<dims>(?:\[\s*\d*\s*\])*)$")
        .expect("declarator pattern")
});

static DIM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\s*(\d*)\s*\]").expect("dimension pattern"));

pub(crate) fn parse_dimensions(dims_text: &str) -> Vec<Option<usize>> {
    DIM_RE
        .captures_iter(dims_text)
        .map(|c| c[1].parse::<usize>().ok())
        .collect()
}

struct CForParser;

impl SourceParser for CForParser {
    fn can_parse(&self, node: &NativeNode) -> bool {
        node.kind == NativeKind::Loop(LoopStyle::For)
    }

    fn parse(
        &self,
        node: &NativeNode,
        fe: &Frontend,
        ctx: &mut TranslationContext,
    ) -> Result<Option<Vec<CanonStmt>>> {
        let kind = c_style_for_range(&node.text, fe.lang(), ctx).ok_or_else(|| {
            TranslateError::ParseError {
                line: node.start_line,
                message: format!("for header outside the counted-range shape: '{}'", node.text),
            }
        })?;
        let body = fe.parse_block(&node.children, ctx);
        Ok(Some(vec![CanonStmt::structural(CanonNode::Loop {
            kind,
            body,
        })]))
    }
}

struct CPrintParser;

impl SourceParser for CPrintParser {
    fn can_parse(&self, node: &NativeNode) -> bool {
        node.kind == NativeKind::Simple
            && (node.text.starts_with("printf(")
                || node.text.starts_with("printf (")
                || node.text.starts_with("puts(")
                || node.text.starts_with("puts ("))
    }

    fn parse(
        &self,
        node: &NativeNode,
        _fe: &Frontend,
        _ctx: &mut TranslationContext,
    ) -> Result<Option<Vec<CanonStmt>>> {
        let interior = paren_interior(&node.text).ok_or(TranslateError::ParseError {
            line: node.start_line,
            message: "malformed print call".to_string(),
        })?;
        if node.text.starts_with("puts") {
            // puts takes exactly one argument and appends the newline.
            let expr = parse_expr_or_raw(interior, Language::C);
            let (pieces, args) = format::from_single(expr);
            return Ok(Some(vec![CanonStmt::structural(CanonNode::Print {
                pieces,
                args,
                newline: true,
            })]));
        }
        let mut parts = split_top_commas(interior).into_iter();
        let fmt_text = parts.next().ok_or(TranslateError::ParseError {
            line: node.start_line,
            message: "printf() without a format string".to_string(),
        })?;
        let fmt = match parse_expression(&fmt_text, Language::C) {
            Ok(CanonExpr::Literal { value, kind }) if kind == crate::ast::LiteralKind::Str => {
                value
            }
            _ => {
                return Err(TranslateError::ParseError {
                    line: node.start_line,
                    message: "printf format is not a string literal".to_string(),
                })
            }
        };
        let args: Vec<CanonExpr> = parts
            .map(|p| parse_expr_or_raw(&p, Language::C))
            .collect();
        let (pieces, args, newline) = format::from_printf(&fmt, args);
        Ok(Some(vec![CanonStmt::structural(CanonNode::Print {
            pieces,
            args,
            newline,
        })]))
    }
}

struct CDeclParser;

impl SourceParser for CDeclParser {
    fn can_parse(&self, node: &NativeNode) -> bool {
        node.kind == NativeKind::Simple && DECL_RE.is_match(&node.text)
    }

    fn parse(
        &self,
        node: &NativeNode,
        fe: &Frontend,
        ctx: &mut TranslationContext,
    ) -> Result<Option<Vec<CanonStmt>>> {
        let caps = DECL_RE.captures(&node.text).expect("can_parse checked");
        let base_type = caps["ty"].split_whitespace().collect::<Vec<_>>().join(" ");
        let rest = &caps["rest"];
        let mut stmts = Vec::new();
        for declarator in split_top_commas(rest) {
            let (decl_text, init_text) = match split_assignment(&declarator) {
                Some((d, AssignOp::Assign, v)) => (d, Some(v)),
                Some(_) => {
                    return Err(TranslateError::ParseError {
                        line: node.start_line,
                        message: format!("malformed declarator '{declarator}'"),
                    })
                }
                None => (declarator.clone(), None),
            };
            let dcaps =
                DECLARATOR_RE
                    .captures(decl_text.trim())
                    .ok_or(TranslateError::ParseError {
                        line: node.start_line,
                        message: format!("malformed declarator '{declarator}'"),
                    })?;
            let name = dcaps["name"].to_string();
            let declared_type = if dcaps.name("stars").is_some() {
                format!("{base_type} *")
            } else {
                base_type.clone()
            };
            let dims = parse_dimensions(dcaps.name("dims").map(|m| m.as_str()).unwrap_or(""));
            let init = init_text.map(|t| parse_expr_or_raw(&t, fe.lang()));
            let string_init = init.as_ref().map(|e| e.is_string_literal()).unwrap_or(false);
            let node = if dims.len() <= 1
                && typemap::collapses_to_string(&declared_type, string_init)
            {
                // char buf[20] = "Alice" / char *name = "Alice"
                ctx.add_variable(&name, "char *", false);
                CanonNode::VarDecl {
                    name,
                    declared_type: "char *".to_string(),
                    init,
                }
            } else if !dims.is_empty() {
                let dims = fill_dimensions(dims, init.as_ref());
                ctx.add_variable(&name, &declared_type, true);
                CanonNode::ArrayDecl {
                    name,
                    element_type: declared_type,
                    dimensions: dims,
                    init,
                }
            } else {
                ctx.add_variable(&name, &declared_type, false);
                CanonNode::VarDecl {
                    name,
                    declared_type,
                    init,
                }
            };
            stmts.push(CanonStmt::pattern(node));
        }
        Ok(Some(stmts))
    }
}

/// Take unsized dimensions from the initializer shape: `int a[] = {1, 2}`
/// has a known size after all.
pub(crate) fn fill_dimensions(
    dims: Vec<Option<usize>>,
    init: Option<&CanonExpr>,
) -> Vec<Option<usize>> {
    let mut out = dims;
    let mut level = init;
    for dim in out.iter_mut() {
        match level {
            Some(CanonExpr::ArrayLiteral(items)) => {
                if dim.is_none() {
                    *dim = Some(items.len());
                }
                level = items.first();
            }
            _ => break,
        }
    }
    out
}
