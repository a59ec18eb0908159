//! Java target generator
//!
//! Print statements render as `System.out.println` concatenation;
//! placeholders carrying a precision spec go through `String.format`.
//! The shell is a `Main` class with the standard entry point, so program
//! statements sit two levels deep.

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

pub struct JavaGenerator;

impl Generator for JavaGenerator {
    fn target(&self) -> Language {
        Language::Java
    }

    fn body_depth(&self) -> usize {
        2
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
                let mut mapped = typemap::map_type(declared_type, ctx.pair);
                match init {
                    Some(expr) => {
                        let value = self.init_value(name, expr, ctx);
                        // A 0/1 literal promoted to true/false needs the
                        // declaration promoted with it.
                        if bool_override(name, expr, ctx).is_some() {
                            mapped = "boolean".to_string();
                        }
                        out.push(format!("{pad}{mapped} {name} = {value};"));
                    }
                    None => out.push(format!("{pad}{mapped} {name};")),
                }
            }
            CanonNode::ArrayDecl {
                name,
                element_type,
                dimensions,
                init,
            } => {
                let mapped = typemap::map_type(element_type, ctx.pair);
                let brackets = "[]".repeat(dimensions.len());
                match init {
                    Some(expr) => out.push(format!(
                        "{pad}{mapped}{brackets} {name} = {};",
                        self.braced(expr, ctx)
                    )),
                    None => {
                        let sizes: String = dimensions
                            .iter()
                            .map(|d| format!("[{}]", d.unwrap_or(0)))
                            .collect();
                        out.push(format!(
                            "{pad}{mapped}{brackets} {name} = new {mapped}{sizes};"
                        ));
                    }
                }
            }
            CanonNode::Print {
                pieces,
                args,
                newline,
            } => {
                out.push(format!("{pad}{}", self.render_print(pieces, args, *newline, ctx)));
            }
            CanonNode::Comment { text, .. } => out.push(format!("{pad}// {text}")),
            CanonNode::Blank => out.push(String::new()),
            CanonNode::If {
                cond,
                then_branch,
                elif_branches,
                else_branch,
            } => {
                out.push(format!("{pad}if ({}) {{", self.generate_expr(cond, ctx)));
                generate_block(self, then_branch, ctx, depth + 1, out);
                for (cond, body) in elif_branches {
                    out.push(format!(
                        "{pad}}} else if ({}) {{",
                        self.generate_expr(cond, ctx)
                    ));
                    generate_block(self, body, ctx, depth + 1, out);
                }
                if let Some(body) = else_branch {
                    out.push(format!("{pad}}} else {{"));
                    generate_block(self, body, ctx, depth + 1, out);
                }
                out.push(format!("{pad}}}"));
            }
            CanonNode::Loop { kind, body } => match kind {
                LoopKind::ForRange {
                    var,
                    start,
                    end,
                    step,
                    inclusive,
                } => {
                    let header =
                        self.range_header(var, start, end, step.as_ref(), *inclusive, ctx);
                    out.push(format!("{pad}{header}"));
                    generate_block(self, body, ctx, depth + 1, out);
                    out.push(format!("{pad}}}"));
                }
                LoopKind::ForEach { var, iterable } => {
                    let elem_type = ctx
                        .variable_type(var)
                        .map(|t| typemap::map_type(t, ctx.pair))
                        .unwrap_or_else(|| "int".to_string());
                    out.push(format!(
                        "{pad}for ({elem_type} {var} : {}) {{",
                        self.generate_expr(iterable, ctx)
                    ));
                    generate_block(self, body, ctx, depth + 1, out);
                    out.push(format!("{pad}}}"));
                }
                LoopKind::While { cond } => {
                    out.push(format!("{pad}while ({}) {{", self.generate_expr(cond, ctx)));
                    generate_block(self, body, ctx, depth + 1, out);
                    out.push(format!("{pad}}}"));
                }
                LoopKind::DoWhile { cond } => {
                    out.push(format!("{pad}do {{"));
                    generate_block(self, body, ctx, depth + 1, out);
                    out.push(format!("{pad}}} while ({});", self.generate_expr(cond, ctx)));
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
                    "{pad}{} {} {value_text};",
                    self.generate_expr(target, ctx),
                    assign_symbol(*op)
                ));
            }
            CanonNode::ExprStmt(expr) => {
                out.push(format!("{pad}{};", self.generate_expr(expr, ctx)));
            }
            CanonNode::Passthrough { original } => {
                passthrough_lines(original, "//", depth, out);
            }
        }
    }

    fn generate_expr(&self, expr: &CanonExpr, ctx: &TranslationContext) -> String {
        match expr {
            CanonExpr::Literal { value, kind } => match kind {
                LiteralKind::Bool => value.clone(),
                LiteralKind::Str => format!("\"{}\"", escape_string(value)),
                LiteralKind::Char => format!("'{}'", escape_char(value)),
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
                    UnaryOp::Not => format!("!{inner}"),
                }
            }
            CanonExpr::Ternary {
                condition,
                then_value,
                else_value,
            } => format!(
                "{} ? {} : {}",
                self.generate_expr(condition, ctx),
                self.generate_expr(then_value, ctx),
                self.generate_expr(else_value, ctx)
            ),
            CanonExpr::Call { name, args } if name == "len" && args.len() == 1 => {
                let arg = self.generate_expr(&args[0], ctx);
                if is_string_valued(&args[0], ctx) {
                    format!("{arg}.length()")
                } else {
                    format!("{arg}.length")
                }
            }
            CanonExpr::Call { name, args } if name == "str" && args.len() == 1 => {
                format!("String.valueOf({})", self.generate_expr(&args[0], ctx))
            }
            CanonExpr::Call { name, args } if name == "int" && args.len() == 1 => {
                format!("Integer.parseInt({})", self.generate_expr(&args[0], ctx))
            }
            CanonExpr::Call { name, args } => {
                let rendered: Vec<String> =
                    args.iter().map(|a| self.generate_expr(a, ctx)).collect();
                format!("{name}({})", rendered.join(", "))
            }
            CanonExpr::ArrayAccess { array, index } => match index.as_const_int() {
                Some(k) if k < 0 => format!("{array}[{array}.length - {}]", -k),
                _ => format!("{array}[{}]", self.generate_expr(index, ctx)),
            },
            CanonExpr::ArrayLiteral(items) => {
                let rendered: Vec<String> =
                    items.iter().map(|i| self.generate_expr(i, ctx)).collect();
                format!("{{{}}}", rendered.join(", "))
            }
            CanonExpr::Raw(text) => text.clone(),
        }
    }

    fn assemble(&self, body: Vec<String>, ctx: &TranslationContext) -> String {
        let mut lines: Vec<String> = ctx.imports().map(|i| format!("import {i};")).collect();
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push("public class Main {".to_string());
        lines.push("    public static void main(String[] args) {".to_string());
        lines.extend(body);
        lines.push("    }".to_string());
        lines.push("}".to_string());
        let mut text = lines.join("\n");
        text.push('\n');
        text
    }
}

impl JavaGenerator {
    fn init_value(&self, name: &str, expr: &CanonExpr, ctx: &TranslationContext) -> String {
        match bool_override(name, expr, ctx) {
            Some(true) => "true".to_string(),
            Some(false) => "false".to_string(),
            None => self.generate_expr(expr, ctx),
        }
    }

    fn braced(&self, expr: &CanonExpr, ctx: &TranslationContext) -> String {
        match expr {
            CanonExpr::ArrayLiteral(items) => {
                let rendered: Vec<String> = items.iter().map(|i| self.braced(i, ctx)).collect();
                format!("{{{}}}", rendered.join(", "))
            }
            other => self.generate_expr(other, ctx),
        }
    }

    fn range_header(
        &self,
        var: &str,
        start: &CanonExpr,
        end: &CanonExpr,
        step: Option<&CanonExpr>,
        inclusive: bool,
        ctx: &TranslationContext,
    ) -> String {
        let descending = step.and_then(|s| s.as_const_int()).map(|k| k < 0).unwrap_or(false);
        let cmp = match (descending, inclusive) {
            (false, false) => "<",
            (false, true) => "<=",
            (true, false) => ">",
            (true, true) => ">=",
        };
        let update = match step.map(|s| (s, s.as_const_int())) {
            None | Some((_, Some(1))) => format!("{var}++"),
            Some((_, Some(-1))) => format!("{var}--"),
            Some((_, Some(k))) if k < 0 => format!("{var} -= {}", -k),
            Some((s, _)) => format!("{var} += {}", self.generate_expr(s, ctx)),
        };
        format!(
            "for (int {var} = {}; {var} {cmp} {}; {update}) {{",
            self.generate_expr(start, ctx),
            self.generate_expr(end, ctx)
        )
    }

    fn render_print(
        &self,
        pieces: &[PrintPiece],
        args: &[CanonExpr],
        newline: bool,
        ctx: &TranslationContext,
    ) -> String {
        let call = if newline { "println" } else { "print" };
        if pieces.is_empty() && args.is_empty() {
            return format!("System.out.{call}();");
        }
        let mut parts: Vec<String> = Vec::new();
        let mut arg_iter = args.iter();
        for piece in pieces {
            match piece {
                PrintPiece::Text(text) => {
                    parts.push(format!("\"{}\"", escape_string(text)));
                }
                PrintPiece::Placeholder { spec } => {
                    let arg = match arg_iter.next() {
                        Some(arg) => arg,
                        None => continue,
                    };
                    let rendered = self.generate_expr(arg, ctx);
                    match spec.as_deref().filter(|s| s.contains('.')) {
                        Some(spec) => {
                            parts.push(format!("String.format(\"%{spec}\", {rendered})"));
                        }
                        None => parts.push(paren_if(
                            matches!(arg, CanonExpr::Binary { .. } | CanonExpr::Ternary { .. }),
                            rendered,
                        )),
                    }
                }
            }
        }
        for extra in arg_iter {
            parts.push(self.generate_expr(extra, ctx));
        }
        // Concatenation must start from a string so numeric arguments
        // stringify instead of adding.
        let leading_text = matches!(pieces.first(), Some(PrintPiece::Text(_)));
        if !leading_text && parts.len() > 1 {
            parts.insert(0, "\"\"".to_string());
        }
        format!("System.out.{call}({});", parts.join(" + "))
    }
}

fn is_string_valued(expr: &CanonExpr, ctx: &TranslationContext) -> bool {
    match expr {
        CanonExpr::Literal { kind, .. } => *kind == LiteralKind::Str,
        CanonExpr::Ident(name) => matches!(
            ctx.variable_type(name),
            Some("str") | Some("String") | Some("char *")
        ),
        _ => false,
    }
}

fn escape_char(value: &str) -> String {
    let mut out = String::new();
    for c in value.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            other => out.push(other),
        }
    }
    out
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
        BinOp::And => "&&",
        BinOp::Or => "||",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Generator;
    use crate::lang::LanguagePair;
    use pretty_assertions::assert_eq;

    fn ctx() -> TranslationContext {
        TranslationContext::new(LanguagePair::new(Language::Python, Language::Java))
    }

    fn render_with(ctx: &mut TranslationContext, stmt: CanonStmt) -> Vec<String> {
        let gen = JavaGenerator;
        let mut out = Vec::new();
        generate_block(&gen, &[stmt], ctx, 2, &mut out);
        out
    }

    #[test]
    fn test_var_decl_maps_str_to_string() {
        let mut ctx = ctx();
        let out = render_with(
            &mut ctx,
            CanonStmt::structural(CanonNode::VarDecl {
                name: "name".to_string(),
                declared_type: "str".to_string(),
                init: Some(CanonExpr::string("Ann")),
            }),
        );
        assert_eq!(out, vec!["        String name = \"Ann\";".to_string()]);
    }

    #[test]
    fn test_println_text() {
        let mut ctx = ctx();
        let out = render_with(
            &mut ctx,
            CanonStmt::structural(CanonNode::Print {
                pieces: vec![PrintPiece::Text("Adult".to_string())],
                args: vec![],
                newline: true,
            }),
        );
        assert_eq!(out, vec!["        System.out.println(\"Adult\");".to_string()]);
    }

    #[test]
    fn test_println_concatenation() {
        let mut ctx = ctx();
        ctx.add_variable("total", "int", false);
        let out = render_with(
            &mut ctx,
            CanonStmt::structural(CanonNode::Print {
                pieces: vec![
                    PrintPiece::Text("Total: ".to_string()),
                    PrintPiece::Placeholder { spec: None },
                ],
                args: vec![CanonExpr::ident("total")],
                newline: true,
            }),
        );
        assert_eq!(
            out,
            vec!["        System.out.println(\"Total: \" + total);".to_string()]
        );
    }

    #[test]
    fn test_bare_numeric_pair_gets_string_anchor() {
        let mut ctx = ctx();
        let out = render_with(
            &mut ctx,
            CanonStmt::structural(CanonNode::Print {
                pieces: vec![
                    PrintPiece::Placeholder { spec: None },
                    PrintPiece::Placeholder { spec: None },
                ],
                args: vec![CanonExpr::ident("a"), CanonExpr::ident("b")],
                newline: true,
            }),
        );
        assert_eq!(
            out,
            vec!["        System.out.println(\"\" + a + b);".to_string()]
        );
    }

    #[test]
    fn test_precision_spec_uses_string_format() {
        let mut ctx = ctx();
        let out = render_with(
            &mut ctx,
            CanonStmt::structural(CanonNode::Print {
                pieces: vec![
                    PrintPiece::Text("avg = ".to_string()),
                    PrintPiece::Placeholder {
                        spec: Some(".2f".to_string()),
                    },
                ],
                args: vec![CanonExpr::ident("avg")],
                newline: true,
            }),
        );
        assert_eq!(
            out,
            vec![
                "        System.out.println(\"avg = \" + String.format(\"%.2f\", avg));"
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_array_decl_brace_literal() {
        let mut ctx = ctx();
        let out = render_with(
            &mut ctx,
            CanonStmt::structural(CanonNode::ArrayDecl {
                name: "numbers".to_string(),
                element_type: "int".to_string(),
                dimensions: vec![Some(3)],
                init: Some(CanonExpr::ArrayLiteral(vec![
                    CanonExpr::int(10),
                    CanonExpr::int(20),
                    CanonExpr::int(30),
                ])),
            }),
        );
        assert_eq!(out, vec!["        int[] numbers = {10, 20, 30};".to_string()]);
    }

    #[test]
    fn test_negative_index_uses_length() {
        let ctx = ctx();
        let gen = JavaGenerator;
        let text = gen.generate_expr(
            &CanonExpr::ArrayAccess {
                array: "numbers".to_string(),
                index: Box::new(CanonExpr::int(-1)),
            },
            &ctx,
        );
        assert_eq!(text, "numbers[numbers.length - 1]");
    }

    #[test]
    fn test_len_on_string_variable() {
        let mut ctx = ctx();
        ctx.add_variable("name", "str", false);
        let gen = JavaGenerator;
        let text = gen.generate_expr(
            &CanonExpr::Call {
                name: "len".to_string(),
                args: vec![CanonExpr::ident("name")],
            },
            &ctx,
        );
        assert_eq!(text, "name.length()");
    }

    #[test]
    fn test_assemble_shell() {
        let ctx = ctx();
        let gen = JavaGenerator;
        let text = gen.assemble(vec!["        int x = 1;".to_string()], &ctx);
        assert_eq!(
            text,
            "public class Main {\n    public static void main(String[] args) {\n        int x = 1;\n    }\n}\n"
        );
    }
}
