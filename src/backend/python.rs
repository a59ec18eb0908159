//! Python target generator

use super::{
    bool_override, escape_string, generate_block, indent, operand_needs_parens, paren_if,
    passthrough_lines, Generator,
};
use crate::ast::{
    AssignOp, BinOp, CanonExpr, CanonNode, CanonStmt, LiteralKind, LoopKind, PrintPiece, UnaryOp,
};
use crate::context::TranslationContext;
use crate::lang::Language;
use crate::typemap;

pub struct PythonGenerator;

impl Generator for PythonGenerator {
    fn target(&self) -> Language {
        Language::Python
    }

    fn body_depth(&self) -> usize {
        0
    }

    fn generate(
        &self,
        stmt: &CanonStmt,
        ctx: &mut TranslationContext,
        depth: usize,
        out: &mut Vec<String>,
    ) {
        let pad = indent(depth);
        match &stmt.node {
            CanonNode::VarDecl {
                name,
                declared_type,
                init,
            } => {
                let value = match init {
                    Some(expr) => self.init_value(name, expr, ctx),
                    None => default_value(declared_type, ctx),
                };
                out.push(format!("{pad}{name} = {value}"));
            }
            CanonNode::ArrayDecl {
                name,
                element_type,
                dimensions,
                init,
            } => {
                let value = match init {
                    Some(expr) => self.generate_expr(expr, ctx),
                    None => empty_list(element_type, dimensions, ctx),
                };
                out.push(format!("{pad}{name} = {value}"));
            }
            CanonNode::Print {
                pieces,
                args,
                newline,
            } => {
                out.push(format!("{pad}{}", self.render_print(pieces, args, *newline, ctx)));
            }
            CanonNode::Comment { text, .. } => {
                out.push(format!("{pad}# {text}"));
            }
            CanonNode::Blank => out.push(String::new()),
            CanonNode::If {
                cond,
                then_branch,
                elif_branches,
                else_branch,
            } => {
                out.push(format!("{pad}if {}:", self.generate_expr(cond, ctx)));
                self.block(then_branch, ctx, depth + 1, out);
                for (cond, body) in elif_branches {
                    out.push(format!("{pad}elif {}:", self.generate_expr(cond, ctx)));
                    self.block(body, ctx, depth + 1, out);
                }
                if let Some(body) = else_branch {
                    out.push(format!("{pad}else:"));
                    self.block(body, ctx, depth + 1, out);
                }
            }
            CanonNode::Loop { kind, body } => match kind {
                LoopKind::ForRange {
                    var,
                    start,
                    end,
                    step,
                    inclusive,
                } => {
                    let range = self.render_range(start, end, step.as_ref(), *inclusive, ctx);
                    out.push(format!("{pad}for {var} in {range}:"));
                    self.block(body, ctx, depth + 1, out);
                }
                LoopKind::ForEach { var, iterable } => {
                    out.push(format!(
                        "{pad}for {var} in {}:",
                        self.generate_expr(iterable, ctx)
                    ));
                    self.block(body, ctx, depth + 1, out);
                }
                LoopKind::While { cond } => {
                    out.push(format!("{pad}while {}:", self.generate_expr(cond, ctx)));
                    self.block(body, ctx, depth + 1, out);
                }
                LoopKind::DoWhile { cond } => {
                    // Body-first loop: run once, then test at the bottom.
                    out.push(format!("{pad}while True:"));
                    self.block(body, ctx, depth + 1, out);
                    let inner = indent(depth + 1);
                    out.push(format!(
                        "{inner}if not ({}):",
                        self.generate_expr(cond, ctx)
                    ));
                    out.push(format!("{}break", indent(depth + 2)));
                }
            },
            CanonNode::Assign { target, op, value } => {
                let value_text = match target {
                    CanonExpr::Ident(name) if *op == AssignOp::Assign => {
                        self.init_value(name, value, ctx)
                    }
                    _ => self.generate_expr(value, ctx),
                };
                out.push(format!(
                    "{pad}{} {} {value_text}",
                    self.generate_expr(target, ctx),
                    assign_symbol(*op)
                ));
            }
            CanonNode::ExprStmt(expr) => {
                out.push(format!("{pad}{}", self.generate_expr(expr, ctx)));
            }
            CanonNode::Passthrough { original } => {
                passthrough_lines(original, "#", depth, out);
            }
        }
    }

    fn generate_expr(&self, expr: &CanonExpr, ctx: &TranslationContext) -> String {
        match expr {
            CanonExpr::Literal { value, kind } => match kind {
                LiteralKind::Bool => {
                    if value == "true" {
                        "True".to_string()
                    } else {
                        "False".to_string()
                    }
                }
                LiteralKind::Str | LiteralKind::Char => {
                    format!("\"{}\"", escape_string(value))
                }
                LiteralKind::Int | LiteralKind::Float => value.clone(),
            },
            CanonExpr::Ident(name) => name.clone(),
            CanonExpr::Binary { left, op, right } => {
                let l = paren_if(
                    operand_needs_parens(*op, left, false),
                    self.generate_expr(left, ctx),
                );
                let r = paren_if(
                    operand_needs_parens(*op, right, true),
                    self.generate_expr(right, ctx),
                );
                format!("{l} {} {r}", bin_symbol(*op))
            }
            CanonExpr::Unary { op, operand } => {
                let inner = paren_if(
                    matches!(**operand, CanonExpr::Binary { .. } | CanonExpr::Ternary { .. }),
                    self.generate_expr(operand, ctx),
                );
                match op {
                    UnaryOp::Neg => format!("-{inner}"),
                    UnaryOp::Not => format!("not {inner}"),
                }
            }
            CanonExpr::Ternary {
                condition,
                then_value,
                else_value,
            } => format!(
                "{} if {} else {}",
                self.generate_expr(then_value, ctx),
                self.generate_expr(condition, ctx),
                self.generate_expr(else_value, ctx)
            ),
            CanonExpr::Call { name, args } => {
                let rendered: Vec<String> =
                    args.iter().map(|a| self.generate_expr(a, ctx)).collect();
                format!("{name}({})", rendered.join(", "))
            }
            CanonExpr::ArrayAccess { array, index } => {
                format!("{array}[{}]", self.generate_expr(index, ctx))
            }
            CanonExpr::ArrayLiteral(items) => {
                let rendered: Vec<String> =
                    items.iter().map(|i| self.generate_expr(i, ctx)).collect();
                format!("[{}]", rendered.join(", "))
            }
            CanonExpr::Raw(text) => text.clone(),
        }
    }

    fn assemble(&self, body: Vec<String>, ctx: &TranslationContext) -> String {
        let mut lines: Vec<String> = ctx.imports().map(|i| format!("import {i}")).collect();
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.extend(body);
        let mut text = lines.join("\n");
        text.push('\n');
        text
    }
}

impl PythonGenerator {
    fn block(
        &self,
        stmts: &[CanonStmt],
        ctx: &mut TranslationContext,
        depth: usize,
        out: &mut Vec<String>,
    ) {
        if stmts.iter().all(|s| s.is_blank()) {
            out.push(format!("{}pass", indent(depth)));
            return;
        }
        generate_block(self, stmts, ctx, depth, out);
    }

    fn init_value(&self, name: &str, expr: &CanonExpr, ctx: &TranslationContext) -> String {
        match bool_override(name, expr, ctx) {
            Some(true) => "True".to_string(),
            Some(false) => "False".to_string(),
            None => self.generate_expr(expr, ctx),
        }
    }

    fn render_range(
        &self,
        start: &CanonExpr,
        end: &CanonExpr,
        step: Option<&CanonExpr>,
        inclusive: bool,
        ctx: &TranslationContext,
    ) -> String {
        let descending = step.and_then(|s| s.as_const_int()).map(|k| k < 0).unwrap_or(false);
        let end_text = if inclusive {
            match end.as_const_int() {
                Some(k) if descending => (k - 1).to_string(),
                Some(k) => (k + 1).to_string(),
                None => {
                    let base = paren_if(
                        matches!(end, CanonExpr::Binary { .. } | CanonExpr::Ternary { .. }),
                        self.generate_expr(end, ctx),
                    );
                    if descending {
                        format!("{base} - 1")
                    } else {
                        format!("{base} + 1")
                    }
                }
            }
        } else {
            self.generate_expr(end, ctx)
        };
        let start_text = self.generate_expr(start, ctx);
        match step {
            Some(step) => format!(
                "range({start_text}, {end_text}, {})",
                self.generate_expr(step, ctx)
            ),
            None if start.as_const_int() == Some(0) => format!("range({end_text})"),
            None => format!("range({start_text}, {end_text})"),
        }
    }

    fn render_print(
        &self,
        pieces: &[PrintPiece],
        args: &[CanonExpr],
        newline: bool,
        ctx: &TranslationContext,
    ) -> String {
        let suffix = if newline { "" } else { ", end=\"\"" };
        if pieces.is_empty() && args.is_empty() {
            return format!("print({})", suffix.trim_start_matches(", "));
        }
        // A single bare placeholder prints the value directly.
        if pieces.len() == 1 && matches!(pieces[0], PrintPiece::Placeholder { .. }) && args.len() == 1
        {
            return format!("print({}{suffix})", self.generate_expr(&args[0], ctx));
        }
        let only_text = pieces
            .iter()
            .all(|p| matches!(p, PrintPiece::Text(_)));
        if only_text {
            let text: String = pieces
                .iter()
                .map(|p| match p {
                    PrintPiece::Text(t) => escape_string(t),
                    PrintPiece::Placeholder { .. } => unreachable!("checked only_text"),
                })
                .collect();
            return format!("print(\"{text}\"{suffix})");
        }
        let mut body = String::new();
        let mut arg_iter = args.iter();
        for piece in pieces {
            match piece {
                PrintPiece::Text(text) => {
                    body.push_str(&escape_string(text).replace('{', "{{").replace('}', "}}"));
                }
                PrintPiece::Placeholder { spec } => {
                    let arg = match arg_iter.next() {
                        Some(arg) => self.generate_expr(arg, ctx),
                        None => continue,
                    };
                    match spec.as_deref().and_then(py_format_spec) {
                        Some(fspec) => body.push_str(&format!("{{{arg}:{fspec}}}")),
                        None => body.push_str(&format!("{{{arg}}}")),
                    }
                }
            }
        }
        let mut call = format!("print(f\"{body}\"");
        // printf calls can carry more arguments than conversions.
        for extra in arg_iter {
            call.push_str(", ");
            call.push_str(&self.generate_expr(extra, ctx));
        }
        call.push_str(suffix);
        call.push(')');
        call
    }
}

/// Translate a printf conversion spec into a Python format spec. Plain
/// integer/string conversions need none at all.
fn py_format_spec(spec: &str) -> Option<String> {
    let cleaned: String = spec.chars().filter(|c| *c != 'l' && *c != 'h').collect();
    match cleaned.as_str() {
        "d" | "i" | "s" | "c" | "u" => None,
        "f" => Some("f".to_string()),
        other => Some(other.to_string()),
    }
}

fn default_value(declared_type: &str, ctx: &TranslationContext) -> String {
    match typemap::map_type(declared_type, ctx.pair).as_str() {
        "int" => "0".to_string(),
        "float" => "0.0".to_string(),
        "str" => "\"\"".to_string(),
        "bool" => "False".to_string(),
        "list" => "[]".to_string(),
        _ => "None".to_string(),
    }
}

fn element_default(element_type: &str, ctx: &TranslationContext) -> String {
    match typemap::map_type(element_type, ctx.pair).as_str() {
        "int" => "0".to_string(),
        "float" => "0.0".to_string(),
        "str" => "\"\"".to_string(),
        "bool" => "False".to_string(),
        _ => "None".to_string(),
    }
}

fn empty_list(
    element_type: &str,
    dimensions: &[Option<usize>],
    ctx: &TranslationContext,
) -> String {
    match dimensions {
        [Some(n)] => format!("[{}] * {n}", element_default(element_type, ctx)),
        [Some(rows), rest @ ..] => {
            format!("[{} for _ in range({rows})]", empty_list(element_type, rest, ctx))
        }
        _ => "[]".to_string(),
    }
}

fn assign_symbol(op: AssignOp) -> &'static str {
    match op {
        AssignOp::Assign => "=",
        AssignOp::AddAssign => "+=",
        AssignOp::SubAssign => "-=",
        AssignOp::MulAssign => "*=",
        AssignOp::DivAssign => "/=",
        AssignOp::ModAssign => "%=",
    }
}

fn bin_symbol(op: BinOp) -> &'static str {
    match op {
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Mul => "*",
        BinOp::Div => "/",
        BinOp::Mod => "%",
        BinOp::Eq => "==",
        BinOp::NotEq => "!=",
        BinOp::Lt => "<",
        BinOp::Gt => ">",
        BinOp::LtEq => "<=",
        BinOp::GtEq => ">=",
        BinOp::And => "and",
        BinOp::Or => "or",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Generator;
    use crate::lang::LanguagePair;
    use pretty_assertions::assert_eq;

    fn render(stmt: CanonStmt) -> (Vec<String>, TranslationContext) {
        let mut ctx = TranslationContext::new(LanguagePair::new(Language::C, Language::Python));
        let gen = PythonGenerator;
        let mut out = Vec::new();
        generate_block(&gen, &[stmt], &mut ctx, 0, &mut out);
        (out, ctx)
    }

    #[test]
    fn test_printf_pieces_become_fstring() {
        let stmt = CanonStmt::structural(CanonNode::Print {
            pieces: vec![
                PrintPiece::Text("Sum: ".to_string()),
                PrintPiece::Placeholder {
                    spec: Some("d".to_string()),
                },
            ],
            args: vec![CanonExpr::Binary {
                left: Box::new(CanonExpr::ident("x")),
                op: BinOp::Add,
                right: Box::new(CanonExpr::ident("y")),
            }],
            newline: true,
        });
        let (out, _) = render(stmt);
        assert_eq!(out, vec!["print(f\"Sum: {x + y}\")".to_string()]);
    }

    #[test]
    fn test_plain_text_print_stays_plain() {
        let stmt = CanonStmt::structural(CanonNode::Print {
            pieces: vec![PrintPiece::Text("Adult".to_string())],
            args: vec![],
            newline: true,
        });
        let (out, _) = render(stmt);
        assert_eq!(out, vec!["print(\"Adult\")".to_string()]);
    }

    #[test]
    fn test_print_without_newline() {
        let stmt = CanonStmt::structural(CanonNode::Print {
            pieces: vec![PrintPiece::Placeholder { spec: None }],
            args: vec![CanonExpr::ident("x")],
            newline: false,
        });
        let (out, _) = render(stmt);
        assert_eq!(out, vec!["print(x, end=\"\")".to_string()]);
    }

    #[test]
    fn test_ternary_renders_postfix() {
        let stmt = CanonStmt::structural(CanonNode::VarDecl {
            name: "grade".to_string(),
            declared_type: "String".to_string(),
            init: Some(CanonExpr::Ternary {
                condition: Box::new(CanonExpr::Binary {
                    left: Box::new(CanonExpr::ident("score")),
                    op: BinOp::GtEq,
                    right: Box::new(CanonExpr::int(60)),
                }),
                then_value: Box::new(CanonExpr::string("Pass")),
                else_value: Box::new(CanonExpr::string("Fail")),
            }),
        });
        let (out, _) = render(stmt);
        assert_eq!(
            out,
            vec!["grade = \"Pass\" if score >= 60 else \"Fail\"".to_string()]
        );
    }

    #[test]
    fn test_do_while_shape() {
        let stmt = CanonStmt::structural(CanonNode::Loop {
            kind: LoopKind::DoWhile {
                cond: CanonExpr::Binary {
                    left: Box::new(CanonExpr::ident("x")),
                    op: BinOp::Gt,
                    right: Box::new(CanonExpr::int(0)),
                },
            },
            body: vec![CanonStmt::structural(CanonNode::Assign {
                target: CanonExpr::ident("x"),
                op: AssignOp::SubAssign,
                value: CanonExpr::int(1),
            })],
        });
        let (out, _) = render(stmt);
        assert_eq!(
            out,
            vec![
                "while True:".to_string(),
                "    x -= 1".to_string(),
                "    if not (x > 0):".to_string(),
                "        break".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_branch_gets_pass() {
        let stmt = CanonStmt::structural(CanonNode::If {
            cond: CanonExpr::ident("flag"),
            then_branch: vec![],
            elif_branches: vec![],
            else_branch: None,
        });
        let (out, _) = render(stmt);
        assert_eq!(out, vec!["if flag:".to_string(), "    pass".to_string()]);
    }

    #[test]
    fn test_inclusive_range() {
        let stmt = CanonStmt::structural(CanonNode::Loop {
            kind: LoopKind::ForRange {
                var: "i".to_string(),
                start: CanonExpr::int(1),
                end: CanonExpr::int(10),
                step: None,
                inclusive: true,
            },
            body: vec![CanonStmt::structural(CanonNode::ExprStmt(
                CanonExpr::ident("i"),
            ))],
        });
        let (out, _) = render(stmt);
        assert_eq!(out[0], "for i in range(1, 11):");
    }

    #[test]
    fn test_boolean_name_heuristic_on_literal() {
        let stmt = CanonStmt::structural(CanonNode::VarDecl {
            name: "is_valid".to_string(),
            declared_type: "int".to_string(),
            init: Some(CanonExpr::int(1)),
        });
        let (out, _) = render(stmt);
        assert_eq!(out, vec!["is_valid = True".to_string()]);
    }

    #[test]
    fn test_strict_types_disables_heuristic() {
        let mut ctx = TranslationContext::new(LanguagePair::new(Language::C, Language::Python));
        ctx.strict_types = true;
        let gen = PythonGenerator;
        let mut out = Vec::new();
        let stmt = CanonStmt::structural(CanonNode::VarDecl {
            name: "is_valid".to_string(),
            declared_type: "int".to_string(),
            init: Some(CanonExpr::int(1)),
        });
        generate_block(&gen, &[stmt], &mut ctx, 0, &mut out);
        assert_eq!(out, vec!["is_valid = 1".to_string()]);
    }

    #[test]
    fn test_trailing_comment_attached() {
        let mut stmt = CanonStmt::structural(CanonNode::ExprStmt(CanonExpr::ident("x")));
        stmt.trailing_comment = Some("counter".to_string());
        let (out, _) = render(stmt);
        assert_eq!(out, vec!["x  # counter".to_string()]);
    }

    #[test]
    fn test_sized_array_default() {
        let stmt = CanonStmt::structural(CanonNode::ArrayDecl {
            name: "xs".to_string(),
            element_type: "int".to_string(),
            dimensions: vec![Some(5)],
            init: None,
        });
        let (out, _) = render(stmt);
        assert_eq!(out, vec!["xs = [0] * 5".to_string()]);
    }
}
