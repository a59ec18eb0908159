//! Java source parsers
//!
//! `System.out` calls cover three print shapes (`println` concatenation,
//! `print`, `printf`), all reduced to the same pieces-and-args form.
//! Declarations put array brackets on either the type or the name, and
//! initializers may be brace literals, `new T[]{...}` or `new T[n]`.

use super::c::{fill_dimensions, parse_dimensions};
use super::common::{
    c_style_for_range, AssignParser, ExprStmtParser, IfParser, IncDecParser, WhileParser,
};
use super::expr::{parse_expr_or_raw, parse_expression, split_assignment, split_top_commas};
use super::format;
use super::{Frontend, SourceParser};
use crate::ast::{AssignOp, CanonExpr, CanonNode, CanonStmt, LoopKind};
use crate::context::TranslationContext;
use crate::error::{Result, TranslateError};
use crate::lang::Language;
use crate::syntax::{paren_interior, LoopStyle, NativeKind, NativeNode};
use once_cell::sync::Lazy;
use regex::Regex;

pub(crate) fn parsers() -> Vec<Box<dyn SourceParser>> {
    vec![
        Box::new(IfParser),
        Box::new(WhileParser),
        Box::new(JavaForParser),
        Box::new(JavaPrintParser),
        Box::new(JavaDeclParser),
        Box::new(IncDecParser),
        Box::new(AssignParser),
        Box::new(ExprStmtParser),
    ]
}

static DECL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:final\s+)?(?P<ty>int|short|long|byte|float|double|boolean|char|String)(?P<tydims>(?:\s*\[\s*\])*)\s+(?P<rest>[A-Za-z_].*)$",
    )
    .expect("declaration pattern")
});

static DECLARATOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>[A-Za-z_]\w*)(?P<dims>(?:\s*\[\s*\])*)$").expect("declarator pattern")
});

static NEW_ARRAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^new\s+\w+\s*(?P<dims>(?:\[[^\]]*\]\s*)*)(?P<init>\{.*\})?$")
        .expect("array allocation pattern")
});

struct JavaForParser;

impl SourceParser for JavaForParser {
    fn can_parse(&self, node: &NativeNode) -> bool {
        node.kind == NativeKind::Loop(LoopStyle::For)
    }

    fn parse(
        &self,
        node: &NativeNode,
        fe: &Frontend,
        ctx: &mut TranslationContext,
    ) -> Result<Option<Vec<CanonStmt>>> {
        let kind = if let Some((decl, iterable_text)) = split_for_each(&node.text) {
            let words: Vec<&str> = decl.split_whitespace().collect();
            let var = (*words.last().ok_or(TranslateError::ParseError {
                line: node.start_line,
                message: "malformed for-each header".to_string(),
            })?)
            .to_string();
            if words.len() > 1 {
                ctx.add_variable(&var, &words[..words.len() - 1].join(" "), false);
            }
            LoopKind::ForEach {
                var,
                iterable: parse_expr_or_raw(&iterable_text, Language::Java),
            }
        } else {
            c_style_for_range(&node.text, fe.lang(), ctx).ok_or_else(|| {
                TranslateError::ParseError {
                    line: node.start_line,
                    message: format!(
                        "for header outside the counted-range shape: '{}'",
                        node.text
                    ),
                }
            })?
        };
        let body = fe.parse_block(&node.children, ctx);
        Ok(Some(vec![CanonStmt::structural(CanonNode::Loop {
            kind,
            body,
        })]))
    }
}

/// Split an enhanced-for header `int x : xs` at its top-level colon.
fn split_for_each(interior: &str) -> Option<(String, String)> {
    let bytes = interior.as_bytes();
    let mut in_string = false;
    let mut depth = 0i32;
    for (i, &c) in bytes.iter().enumerate() {
        match c {
            b'"' | b'\'' => in_string = !in_string,
            _ if in_string => {}
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth -= 1,
            b'?' => return None,
            b':' if depth == 0 => {
                return Some((
                    interior[..i].trim().to_string(),
                    interior[i + 1..].trim().to_string(),
                ));
            }
            _ => {}
        }
    }
    None
}

struct JavaPrintParser;

impl SourceParser for JavaPrintParser {
    fn can_parse(&self, node: &NativeNode) -> bool {
        node.kind == NativeKind::Simple && node.text.starts_with("System.out.")
    }

    fn parse(
        &self,
        node: &NativeNode,
        _fe: &Frontend,
        _ctx: &mut TranslationContext,
    ) -> Result<Option<Vec<CanonStmt>>> {
        let call = &node.text["System.out.".len()..];
        let interior = paren_interior(call).ok_or(TranslateError::ParseError {
            line: node.start_line,
            message: "malformed System.out call".to_string(),
        })?;
        let (pieces, args, newline) = if call.starts_with("printf") {
            let mut parts = split_top_commas(interior).into_iter();
            let fmt = match parts.next().map(|t| parse_expression(&t, Language::Java)) {
                Some(Ok(CanonExpr::Literal { value, kind }))
                    if kind == crate::ast::LiteralKind::Str =>
                {
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
                .map(|p| parse_expr_or_raw(&p, Language::Java))
                .collect();
            // %n is the platform newline, not a conversion.
            format::from_printf(&fmt.replace("%n", "\n"), args)
        } else if call.starts_with("println") || call.starts_with("print") {
            let newline = call.starts_with("println");
            if interior.trim().is_empty() {
                (Vec::new(), Vec::new(), newline)
            } else {
                let expr = parse_expr_or_raw(interior, Language::Java);
                let (pieces, args) = format::from_concat(expr);
                (pieces, args, newline)
            }
        } else {
            return Ok(None);
        };
        Ok(Some(vec![CanonStmt::structural(CanonNode::Print {
            pieces,
            args,
            newline,
        })]))
    }
}

struct JavaDeclParser;

impl SourceParser for JavaDeclParser {
    fn can_parse(&self, node: &NativeNode) -> bool {
        node.kind == NativeKind::Simple && DECL_RE.is_match(&node.text)
    }

    fn parse(
        &self,
        node: &NativeNode,
        _fe: &Frontend,
        ctx: &mut TranslationContext,
    ) -> Result<Option<Vec<CanonStmt>>> {
        let caps = DECL_RE.captures(&node.text).expect("can_parse checked");
        let base_type = caps["ty"].to_string();
        let type_dims = bracket_count(caps.name("tydims").map(|m| m.as_str()).unwrap_or(""));
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
            let mut dims: Vec<Option<usize>> = vec![None; type_dims];
            dims.extend(vec![
                None;
                bracket_count(
                    dcaps.name("dims").map(|m| m.as_str()).unwrap_or("")
                )
            ]);
            let (init, alloc_dims) = match init_text {
                Some(text) => parse_initializer(&text)?,
                None => (None, Vec::new()),
            };
            // `new int[5]` sizes win over the bare brackets on the left.
            for (slot, size) in dims.iter_mut().zip(alloc_dims) {
                if slot.is_none() {
                    *slot = size;
                }
            }
            let node = if dims.is_empty() {
                ctx.add_variable(&name, &base_type, false);
                CanonNode::VarDecl {
                    name,
                    declared_type: base_type.clone(),
                    init,
                }
            } else {
                let dims = fill_dimensions(dims, init.as_ref());
                ctx.add_variable(&name, &base_type, true);
                CanonNode::ArrayDecl {
                    name,
                    element_type: base_type.clone(),
                    dimensions: dims,
                    init,
                }
            };
            stmts.push(CanonStmt::pattern(node));
        }
        Ok(Some(stmts))
    }
}

fn bracket_count(text: &str) -> usize {
    text.matches('[').count()
}

/// A declaration initializer: a brace literal, `new T[]{...}`, `new T[n]`
/// or a plain expression. Returns the expression (when there is one) and
/// any allocation sizes.
fn parse_initializer(text: &str) -> Result<(Option<CanonExpr>, Vec<Option<usize>>)> {
    let trimmed = text.trim();
    if let Some(caps) = NEW_ARRAY_RE.captures(trimmed) {
        let sizes = parse_dimensions(caps.name("dims").map(|m| m.as_str()).unwrap_or(""));
        let init = caps
            .name("init")
            .map(|m| parse_expr_or_raw(m.as_str(), Language::Java));
        return Ok((init, sizes));
    }
    Ok((Some(parse_expr_or_raw(trimmed, Language::Java)), Vec::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::PrintPiece;
    use crate::lang::LanguagePair;
    use pretty_assertions::assert_eq;

    fn parse_all(src: &str) -> (Vec<CanonStmt>, TranslationContext) {
        let mut ctx =
            TranslationContext::new(LanguagePair::new(Language::Java, Language::Python));
        let fe = Frontend::new(Language::Java);
        let stmts = fe.parse_program(src, &mut ctx).unwrap();
        (stmts, ctx)
    }

    #[test]
    fn test_scalar_declaration() {
        let (stmts, ctx) = parse_all("int score = 70;\n");
        assert!(matches!(
            stmts[0].node,
            CanonNode::VarDecl { ref declared_type, .. } if declared_type == "int"
        ));
        assert_eq!(ctx.variable_type("score"), Some("int"));
    }

    #[test]
    fn test_ternary_declaration() {
        let (stmts, _) =
            parse_all("int score = 70;\nString grade = score >= 60 ? \"Pass\" : \"Fail\";\n");
        match &stmts[1].node {
            CanonNode::VarDecl { declared_type, init, .. } => {
                assert_eq!(declared_type, "String");
                assert!(matches!(init, Some(CanonExpr::Ternary { .. })));
            }
            other => panic!("unexpected node: {other:?}"),
        }
    }

    #[test]
    fn test_array_brace_literal() {
        let (stmts, ctx) = parse_all("int[] xs = {1, 2, 3};\n");
        match &stmts[0].node {
            CanonNode::ArrayDecl { dimensions, .. } => {
                assert_eq!(dimensions, &vec![Some(3)]);
            }
            other => panic!("unexpected node: {other:?}"),
        }
        assert!(ctx.is_array("xs"));
    }

    #[test]
    fn test_array_new_with_initializer() {
        let (stmts, _) = parse_all("int[] xs = new int[]{1, 2};\n");
        match &stmts[0].node {
            CanonNode::ArrayDecl { dimensions, init, .. } => {
                assert_eq!(dimensions, &vec![Some(2)]);
                assert!(matches!(init, Some(CanonExpr::ArrayLiteral(_))));
            }
            other => panic!("unexpected node: {other:?}"),
        }
    }

    #[test]
    fn test_array_new_sized() {
        let (stmts, _) = parse_all("int[] xs = new int[5];\n");
        match &stmts[0].node {
            CanonNode::ArrayDecl { dimensions, init, .. } => {
                assert_eq!(dimensions, &vec![Some(5)]);
                assert!(init.is_none());
            }
            other => panic!("unexpected node: {other:?}"),
        }
    }

    #[test]
    fn test_brackets_on_name() {
        let (stmts, _) = parse_all("int xs[] = {1};\n");
        assert!(matches!(stmts[0].node, CanonNode::ArrayDecl { .. }));
    }

    #[test]
    fn test_println_concat() {
        let (stmts, _) =
            parse_all("int total = 3;\nSystem.out.println(\"Total: \" + total);\n");
        match &stmts[1].node {
            CanonNode::Print { pieces, args, newline } => {
                assert_eq!(pieces[0], PrintPiece::Text("Total: ".to_string()));
                assert!(matches!(pieces[1], PrintPiece::Placeholder { spec: None }));
                assert_eq!(args.len(), 1);
                assert!(newline);
            }
            other => panic!("unexpected node: {other:?}"),
        }
    }

    #[test]
    fn test_print_without_newline() {
        let (stmts, _) = parse_all("System.out.print(\"x\");\n");
        match &stmts[0].node {
            CanonNode::Print { newline, .. } => assert!(!newline),
            other => panic!("unexpected node: {other:?}"),
        }
    }

    #[test]
    fn test_printf_form() {
        let (stmts, _) = parse_all("int x = 1;\nSystem.out.printf(\"x=%d%n\", x);\n");
        match &stmts[1].node {
            CanonNode::Print { pieces, .. } => {
                assert!(matches!(pieces[1], PrintPiece::Placeholder { .. }));
            }
            other => panic!("unexpected node: {other:?}"),
        }
    }

    #[test]
    fn test_for_each_loop() {
        let (stmts, ctx) =
            parse_all("int[] xs = {1, 2};\nfor (int x : xs) {\n    System.out.println(x);\n}\n");
        match &stmts[1].node {
            CanonNode::Loop {
                kind: LoopKind::ForEach { var, .. },
                ..
            } => assert_eq!(var, "x"),
            other => panic!("unexpected node: {other:?}"),
        }
        assert_eq!(ctx.variable_type("x"), Some("int"));
    }

    #[test]
    fn test_counted_for_loop() {
        let (stmts, _) =
            parse_all("for (int i = 0; i < 3; i++) {\n    System.out.println(i);\n}\n");
        assert!(matches!(
            stmts[0].node,
            CanonNode::Loop { kind: LoopKind::ForRange { .. }, .. }
        ));
    }
}
