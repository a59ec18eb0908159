//! Python source parsers
//!
//! Python declares variables by first assignment, so the declaration
//! parser owns the "first time this name appears" case and infers the
//! declared type from the initializer; later assignments fall through to
//! the shared assignment parser. `print` is decomposed into pieces and
//! arguments, with f-strings expanded inline.

use super::common::{AssignParser, ExprStmtParser, IfParser, WhileParser};
use super::expr::{parse_expr_or_raw, split_assignment, split_top_commas, unescape};
use super::format;
use super::{Frontend, SourceParser};
use crate::ast::{AssignOp, BinOp, CanonExpr, CanonNode, CanonStmt, LiteralKind, LoopKind, PrintPiece};
use crate::context::TranslationContext;
use crate::error::{Result, TranslateError};
use crate::lang::Language;
use crate::syntax::{paren_interior, LoopStyle, NativeKind, NativeNode};

pub(crate) fn parsers() -> Vec<Box<dyn SourceParser>> {
    vec![
        Box::new(IfParser),
        Box::new(WhileParser),
        Box::new(PyForParser),
        Box::new(PyPrintParser),
        Box::new(PyDeclParser),
        Box::new(AssignParser),
        Box::new(ExprStmtParser),
    ]
}

/// Infer the Python type name of an initializer expression, falling back
/// to `object` when nothing more precise is known.
pub(crate) fn infer_type(expr: &CanonExpr, ctx: &TranslationContext) -> String {
    match expr {
        CanonExpr::Literal { kind, .. } => match kind {
            LiteralKind::Int => "int",
            LiteralKind::Float => "float",
            LiteralKind::Str | LiteralKind::Char => "str",
            LiteralKind::Bool => "bool",
        }
        .to_string(),
        CanonExpr::Ident(name) => ctx
            .variable_type(name)
            .unwrap_or("object")
            .to_string(),
        CanonExpr::Unary { op, operand } => match op {
            crate::ast::UnaryOp::Neg => infer_type(operand, ctx),
            crate::ast::UnaryOp::Not => "bool".to_string(),
        },
        CanonExpr::Binary { left, op, right } => {
            if op.is_comparison() || op.is_logical() {
                return "bool".to_string();
            }
            let lt = infer_type(left, ctx);
            let rt = infer_type(right, ctx);
            if *op == BinOp::Add && (lt == "str" || rt == "str") {
                "str".to_string()
            } else if *op == BinOp::Div || lt == "float" || rt == "float" {
                // True division always yields a float.
                "float".to_string()
            } else if lt == "int" && rt == "int" {
                "int".to_string()
            } else {
                "object".to_string()
            }
        }
        CanonExpr::Ternary { then_value, .. } => infer_type(then_value, ctx),
        CanonExpr::Call { name, args: _ } => match name.as_str() {
            "len" | "int" => "int".to_string(),
            "float" => "float".to_string(),
            "str" | "input" => "str".to_string(),
            "bool" => "bool".to_string(),
            _ => "object".to_string(),
        },
        CanonExpr::ArrayAccess { array, .. } => ctx
            .variable_type(array)
            .unwrap_or("object")
            .to_string(),
        CanonExpr::ArrayLiteral(_) => "list".to_string(),
        CanonExpr::Raw(_) => "object".to_string(),
    }
}

struct PyForParser;

impl SourceParser for PyForParser {
    fn can_parse(&self, node: &NativeNode) -> bool {
        node.kind == NativeKind::Loop(LoopStyle::For)
    }

    fn parse(
        &self,
        node: &NativeNode,
        fe: &Frontend,
        ctx: &mut TranslationContext,
    ) -> Result<Option<Vec<CanonStmt>>> {
        // Header interior looks like "i in range(3)" or "x in xs".
        let (var, iterable_text) = match node.text.split_once(" in ") {
            Some((var, rest)) => (var.trim().to_string(), rest.trim().to_string()),
            None => {
                return Err(TranslateError::ParseError {
                    line: node.start_line,
                    message: format!("malformed for header '{}'", node.text),
                })
            }
        };
        let kind = if iterable_text.starts_with("range") {
            let interior = paren_interior(&iterable_text).ok_or(TranslateError::ParseError {
                line: node.start_line,
                message: "malformed range()".to_string(),
            })?;
            let args: Vec<CanonExpr> = split_top_commas(interior)
                .iter()
                .map(|a| parse_expr_or_raw(a, Language::Python))
                .collect();
            ctx.add_variable(&var, "int", false);
            match args.len() {
                1 => LoopKind::ForRange {
                    var,
                    start: CanonExpr::int(0),
                    end: args.into_iter().next().expect("checked length"),
                    step: None,
                    inclusive: false,
                },
                2 | 3 => {
                    let mut it = args.into_iter();
                    let start = it.next().expect("checked length");
                    let end = it.next().expect("checked length");
                    LoopKind::ForRange {
                        var,
                        start,
                        end,
                        step: it.next(),
                        inclusive: false,
                    }
                }
                n => {
                    return Err(TranslateError::ParseError {
                        line: node.start_line,
                        message: format!("range() with {n} arguments"),
                    })
                }
            }
        } else {
            let iterable = parse_expr_or_raw(&iterable_text, Language::Python);
            let element_type = match &iterable {
                CanonExpr::Ident(name) => {
                    ctx.variable_type(name).unwrap_or("object").to_string()
                }
                _ => "object".to_string(),
            };
            ctx.add_variable(&var, &element_type, false);
            LoopKind::ForEach { var, iterable }
        };
        let body = fe.parse_block(&node.children, ctx);
        Ok(Some(vec![CanonStmt::structural(CanonNode::Loop {
            kind,
            body,
        })]))
    }
}

/// Body of an f-string literal, when `text` is exactly one.
fn fstring_body(text: &str) -> Option<String> {
    let rest = text.strip_prefix('f').or_else(|| text.strip_prefix('F'))?;
    let quote = rest.chars().next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }
    let inner = rest.strip_prefix(quote)?.strip_suffix(quote)?;
    Some(unescape(inner))
}

struct PyPrintParser;

impl SourceParser for PyPrintParser {
    fn can_parse(&self, node: &NativeNode) -> bool {
        node.kind == NativeKind::Simple
            && (node.text.starts_with("print(") || node.text.starts_with("print ("))
    }

    fn parse(
        &self,
        node: &NativeNode,
        _fe: &Frontend,
        _ctx: &mut TranslationContext,
    ) -> Result<Option<Vec<CanonStmt>>> {
        let interior = paren_interior(&node.text).ok_or(TranslateError::ParseError {
            line: node.start_line,
            message: "malformed print()".to_string(),
        })?;
        let mut pieces: Vec<PrintPiece> = Vec::new();
        let mut args: Vec<CanonExpr> = Vec::new();
        let mut newline = true;
        let mut end_text: Option<String> = None;
        let mut sep = " ".to_string();
        let mut first = true;
        for part in split_top_commas(interior) {
            if let Some(value) = keyword_string(&part, "end") {
                newline = value == "\n";
                if !newline && !value.is_empty() {
                    end_text = Some(value);
                }
                continue;
            }
            if let Some(value) = keyword_string(&part, "sep") {
                sep = value;
                continue;
            }
            if !first && !sep.is_empty() {
                push_text(&mut pieces, &sep);
            }
            first = false;
            if let Some(body) = fstring_body(&part) {
                let (p, a) = format::from_fstring(&body, Language::Python);
                pieces.extend(p);
                args.extend(a);
                continue;
            }
            let expr = parse_expr_or_raw(&part, Language::Python);
            let (p, a) = format::from_concat(expr);
            pieces.extend(p);
            args.extend(a);
        }
        if let Some(text) = end_text {
            push_text(&mut pieces, &text);
        }
        Ok(Some(vec![CanonStmt::structural(CanonNode::Print {
            pieces,
            args,
            newline,
        })]))
    }
}

fn push_text(pieces: &mut Vec<PrintPiece>, text: &str) {
    if let Some(PrintPiece::Text(prev)) = pieces.last_mut() {
        prev.push_str(text);
    } else {
        pieces.push(PrintPiece::Text(text.to_string()));
    }
}

/// Value of a `kw="..."` keyword argument, unescaped.
fn keyword_string(part: &str, kw: &str) -> Option<String> {
    let rest = part.strip_prefix(kw)?.trim_start();
    let rest = rest.strip_prefix('=')?.trim();
    let quote = rest.chars().next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }
    let inner = rest.strip_prefix(quote)?.strip_suffix(quote)?;
    Some(unescape(inner))
}

/// First assignment to a fresh name: a declaration with an inferred type.
/// Annotated form `x: int = 5` takes the annotation as the declared type.
struct PyDeclParser;

impl SourceParser for PyDeclParser {
    fn can_parse(&self, node: &NativeNode) -> bool {
        node.kind == NativeKind::Simple && split_assignment(&node.text).is_some()
    }

    fn parse(
        &self,
        node: &NativeNode,
        _fe: &Frontend,
        ctx: &mut TranslationContext,
    ) -> Result<Option<Vec<CanonStmt>>> {
        let (target_text, op, value_text) =
            split_assignment(&node.text).expect("can_parse checked");
        if op != AssignOp::Assign {
            return Ok(None);
        }
        let (name, annotation) = match target_text.split_once(':') {
            Some((name, ann)) => (name.trim().to_string(), Some(ann.trim().to_string())),
            None => (target_text.trim().to_string(), None),
        };
        if !is_identifier(&name) {
            return Ok(None);
        }
        if ctx.has_variable(&name) && annotation.is_none() {
            // Reassignment, not a declaration.
            return Ok(None);
        }
        let init = parse_expr_or_raw(&value_text, Language::Python);
        let node = if let CanonExpr::ArrayLiteral(items) = &init {
            let element_type = annotation
                .clone()
                .unwrap_or_else(|| element_type_of(items, ctx));
            let dimensions = literal_dimensions(items);
            ctx.add_variable(&name, &element_type, true);
            CanonNode::ArrayDecl {
                name,
                element_type,
                dimensions,
                init: Some(init),
            }
        } else {
            let declared_type = annotation.unwrap_or_else(|| infer_type(&init, ctx));
            ctx.add_variable(&name, &declared_type, false);
            CanonNode::VarDecl {
                name,
                declared_type,
                init: Some(init),
            }
        };
        Ok(Some(vec![CanonStmt::structural(node)]))
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn element_type_of(items: &[CanonExpr], ctx: &TranslationContext) -> String {
    match items.first() {
        Some(CanonExpr::ArrayLiteral(inner)) => element_type_of(inner, ctx),
        Some(first) => infer_type(first, ctx),
        None => "object".to_string(),
    }
}

fn literal_dimensions(items: &[CanonExpr]) -> Vec<Option<usize>> {
    let mut dims = vec![Some(items.len())];
    if let Some(CanonExpr::ArrayLiteral(inner)) = items.first() {
        dims.extend(literal_dimensions(inner));
    }
    dims
}
