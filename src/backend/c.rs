//! C target generator
//!
//! Includes are one-shot flags: `<stdio.h>` on the first print,
//! `<stdbool.h>` on the first boolean, injected into the prologue at
//! assembly. Length and negative indexing render through the
//! `sizeof(a) / sizeof(a[0])` idiom since C arrays carry no length.

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

pub struct CGenerator;

impl Generator for CGenerator {
    fn target(&self) -> Language {
        Language::C
    }

    fn body_depth(&self) -> usize {
        1
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
                if let Some(expr) = init {
                    flag_bool_literals(expr, ctx);
                    // A 0/1 literal promoted to true/false needs the
                    // declaration promoted with it.
                    if bool_override(name, expr, ctx).is_some() {
                        mapped = "bool".to_string();
                    }
                }
                if mapped == "bool" {
                    ctx.require_import("<stdbool.h>");
                }
                let decl = declare(&mapped, name);
                match init {
                    Some(expr) => {
                        let value = self.init_value(name, expr, ctx);
                        out.push(format!("{pad}{decl} = {value};"));
                    }
                    None => out.push(format!("{pad}{decl};")),
                }
            }
            CanonNode::ArrayDecl {
                name,
                element_type,
                dimensions,
                init,
            } => {
                let mapped = typemap::map_type(element_type, ctx.pair);
                if mapped == "bool" {
                    ctx.require_import("<stdbool.h>");
                }
                let dims: String = dimensions
                    .iter()
                    .map(|d| match d {
                        Some(n) => format!("[{n}]"),
                        None => "[]".to_string(),
                    })
                    .collect();
                match init {
                    Some(expr) => {
                        flag_bool_literals(expr, ctx);
                        out.push(format!(
                            "{pad}{} {name}{dims} = {};",
                            mapped.trim_end_matches(" *"),
                            self.braced(expr, ctx)
                        ));
                    }
                    None => out.push(format!("{pad}{mapped} {name}{dims};")),
                }
            }
            CanonNode::Print {
                pieces,
                args,
                newline,
            } => {
                ctx.require_import("<stdio.h>");
                out.push(format!("{pad}{}", self.render_printf(pieces, args, *newline, ctx)));
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
                    let var_type = ctx
                        .variable_type(var)
                        .map(|t| typemap::map_type(t, ctx.pair))
                        .unwrap_or_else(|| "int".to_string());
                    let header = self.range_header(
                        var,
                        &var_type,
                        start,
                        end,
                        step.as_ref(),
                        *inclusive,
                        ctx,
                    );
                    out.push(format!("{pad}{header}"));
                    generate_block(self, body, ctx, depth + 1, out);
                    out.push(format!("{pad}}}"));
                }
                LoopKind::ForEach { var, iterable } => {
                    // No native for-each; count through the array.
                    let it = self.generate_expr(iterable, ctx);
                    let idx = format!("{var}_idx");
                    let elem_type = ctx
                        .variable_type(var)
                        .map(|t| typemap::map_type(t, ctx.pair))
                        .unwrap_or_else(|| "int".to_string());
                    out.push(format!(
                        "{pad}for (int {idx} = 0; {idx} < (int)(sizeof({it}) / sizeof({it}[0])); {idx}++) {{"
                    ));
                    out.push(format!(
                        "{}{} = {it}[{idx}];",
                        indent(depth + 1),
                        declare(&elem_type, var)
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
                flag_bool_literals(value, ctx);
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
                format!("sizeof({arg}) / sizeof({arg}[0])")
            }
            CanonExpr::Call { name, args } => {
                let rendered: Vec<String> =
                    args.iter().map(|a| self.generate_expr(a, ctx)).collect();
                format!("{name}({})", rendered.join(", "))
            }
            CanonExpr::ArrayAccess { array, index } => match index.as_const_int() {
                Some(k) if k < 0 => format!(
                    "{array}[sizeof({array}) / sizeof({array}[0]) - {}]",
                    -k
                ),
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
        let mut lines: Vec<String> = ctx
            .imports()
            .map(|i| format!("#include {i}"))
            .collect();
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push("int main(void) {".to_string());
        lines.extend(body);
        lines.push("    return 0;".to_string());
        lines.push("}".to_string());
        let mut text = lines.join("\n");
        text.push('\n');
        text
    }
}

impl CGenerator {
    fn init_value(&self, name: &str, expr: &CanonExpr, ctx: &TranslationContext) -> String {
        match bool_override(name, expr, ctx) {
            Some(true) => "true".to_string(),
            Some(false) => "false".to_string(),
            None => self.generate_expr(expr, ctx),
        }
    }

    /// Array initializers render with braces at every nesting level.
    fn braced(&self, expr: &CanonExpr, ctx: &TranslationContext) -> String {
        match expr {
            CanonExpr::ArrayLiteral(items) => {
                let rendered: Vec<String> = items.iter().map(|i| self.braced(i, ctx)).collect();
                format!("{{{}}}", rendered.join(", "))
            }
            other => self.generate_expr(other, ctx),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn range_header(
        &self,
        var: &str,
        var_type: &str,
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
            "for ({} = {}; {var} {cmp} {}; {update}) {{",
            declare(var_type, var),
            self.generate_expr(start, ctx),
            self.generate_expr(end, ctx)
        )
    }

    fn render_printf(
        &self,
        pieces: &[PrintPiece],
        args: &[CanonExpr],
        newline: bool,
        ctx: &TranslationContext,
    ) -> String {
        let mut fmt = String::new();
        let mut arg_iter = args.iter();
        let mut rendered_args = Vec::new();
        for piece in pieces {
            match piece {
                PrintPiece::Text(text) => {
                    fmt.push_str(&escape_string(&text.replace('%', "%%")));
                }
                PrintPiece::Placeholder { spec } => {
                    let arg = match arg_iter.next() {
                        Some(arg) => arg,
                        None => continue,
                    };
                    let spec = spec
                        .clone()
                        .unwrap_or_else(|| infer_spec(arg, ctx).to_string());
                    fmt.push('%');
                    fmt.push_str(&spec);
                    rendered_args.push(self.generate_expr(arg, ctx));
                }
            }
        }
        for extra in arg_iter {
            rendered_args.push(self.generate_expr(extra, ctx));
        }
        if newline {
            fmt.push_str("\\n");
        }
        if rendered_args.is_empty() {
            format!("printf(\"{fmt}\");")
        } else {
            format!("printf(\"{fmt}\", {});", rendered_args.join(", "))
        }
    }
}

/// Type-then-name, with the pointer star hugging the name.
fn declare(mapped: &str, name: &str) -> String {
    if let Some(base) = mapped.strip_suffix('*') {
        format!("{}*{name}", base.trim_end().to_string() + " ")
    } else {
        format!("{mapped} {name}")
    }
}

/// printf conversion for an argument with no recorded spec.
fn infer_spec(arg: &CanonExpr, ctx: &TranslationContext) -> &'static str {
    match arg {
        CanonExpr::Literal { kind, .. } => match kind {
            LiteralKind::Str => "s",
            LiteralKind::Char => "c",
            LiteralKind::Float => "f",
            LiteralKind::Int | LiteralKind::Bool => "d",
        },
        CanonExpr::Ident(name) => spec_for_var(name, ctx),
        CanonExpr::ArrayAccess { array, .. } => spec_for_var(array, ctx),
        CanonExpr::Binary { left, op, right } => {
            if op.is_comparison() || op.is_logical() {
                return "d";
            }
            let l = infer_spec(left, ctx);
            if l != "d" {
                l
            } else {
                infer_spec(right, ctx)
            }
        }
        CanonExpr::Unary { operand, .. } => infer_spec(operand, ctx),
        CanonExpr::Ternary { then_value, .. } => infer_spec(then_value, ctx),
        CanonExpr::Call { name, .. } if name == "str" => "s",
        _ => "d",
    }
}

fn spec_for_var(name: &str, ctx: &TranslationContext) -> &'static str {
    match ctx.variable_type(name) {
        Some(t) if t.contains("float") || t.contains("double") => "f",
        Some("str") | Some("String") | Some("char *") => "s",
        Some("char") => "c",
        _ => "d",
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

/// Boolean literals need `<stdbool.h>`; flag them before rendering.
fn flag_bool_literals(expr: &CanonExpr, ctx: &mut TranslationContext) {
    match expr {
        CanonExpr::Literal { kind, .. } => {
            if *kind == LiteralKind::Bool {
                ctx.require_import("<stdbool.h>");
            }
        }
        CanonExpr::Binary { left, right, .. } => {
            flag_bool_literals(left, ctx);
            flag_bool_literals(right, ctx);
        }
        CanonExpr::Unary { operand, .. } => flag_bool_literals(operand, ctx),
        CanonExpr::Ternary {
            condition,
            then_value,
            else_value,
        } => {
            flag_bool_literals(condition, ctx);
            flag_bool_literals(then_value, ctx);
            flag_bool_literals(else_value, ctx);
        }
        CanonExpr::Call { args, .. } => {
            for arg in args {
                flag_bool_literals(arg, ctx);
            }
        }
        CanonExpr::ArrayAccess { index, .. } => flag_bool_literals(index, ctx),
        CanonExpr::ArrayLiteral(items) => {
            for item in items {
                flag_bool_literals(item, ctx);
            }
        }
        _ => {}
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
        TranslationContext::new(LanguagePair::new(Language::Python, Language::C))
    }

    fn render_with(ctx: &mut TranslationContext, stmt: CanonStmt) -> Vec<String> {
        let gen = CGenerator;
        let mut out = Vec::new();
        generate_block(&gen, &[stmt], ctx, 1, &mut out);
        out
    }

    #[test]
    fn test_var_decl_maps_type() {
        let mut ctx = ctx();
        let out = render_with(
            &mut ctx,
            CanonStmt::structural(CanonNode::VarDecl {
                name: "name".to_string(),
                declared_type: "str".to_string(),
                init: Some(CanonExpr::string("Alice")),
            }),
        );
        assert_eq!(out, vec!["    char *name = \"Alice\";".to_string()]);
    }

    #[test]
    fn test_print_flags_stdio() {
        let mut ctx = ctx();
        let out = render_with(
            &mut ctx,
            CanonStmt::structural(CanonNode::Print {
                pieces: vec![PrintPiece::Text("Adult".to_string())],
                args: vec![],
                newline: true,
            }),
        );
        assert_eq!(out, vec!["    printf(\"Adult\\n\");".to_string()]);
        assert!(ctx.imports().any(|i| i == "<stdio.h>"));
    }

    #[test]
    fn test_placeholder_spec_inference() {
        let mut ctx = ctx();
        ctx.add_variable("x", "int", false);
        let out = render_with(
            &mut ctx,
            CanonStmt::structural(CanonNode::Print {
                pieces: vec![
                    PrintPiece::Text("x = ".to_string()),
                    PrintPiece::Placeholder { spec: None },
                ],
                args: vec![CanonExpr::ident("x")],
                newline: true,
            }),
        );
        assert_eq!(out, vec!["    printf(\"x = %d\\n\", x);".to_string()]);
    }

    #[test]
    fn test_negative_index_uses_sizeof_idiom() {
        let mut ctx = ctx();
        ctx.add_variable("numbers", "int", true);
        let gen = CGenerator;
        let text = gen.generate_expr(
            &CanonExpr::ArrayAccess {
                array: "numbers".to_string(),
                index: Box::new(CanonExpr::int(-1)),
            },
            &ctx,
        );
        assert_eq!(text, "numbers[sizeof(numbers) / sizeof(numbers[0]) - 1]");
    }

    #[test]
    fn test_bool_flags_stdbool() {
        let mut ctx = ctx();
        render_with(
            &mut ctx,
            CanonStmt::structural(CanonNode::VarDecl {
                name: "ok".to_string(),
                declared_type: "bool".to_string(),
                init: Some(CanonExpr::Literal {
                    value: "true".to_string(),
                    kind: LiteralKind::Bool,
                }),
            }),
        );
        assert!(ctx.imports().any(|i| i == "<stdbool.h>"));
    }

    #[test]
    fn test_if_else_layout() {
        let mut ctx = ctx();
        let out = render_with(
            &mut ctx,
            CanonStmt::structural(CanonNode::If {
                cond: CanonExpr::Binary {
                    left: Box::new(CanonExpr::ident("age")),
                    op: BinOp::GtEq,
                    right: Box::new(CanonExpr::int(18)),
                },
                then_branch: vec![CanonStmt::structural(CanonNode::ExprStmt(
                    CanonExpr::ident("a"),
                ))],
                elif_branches: vec![],
                else_branch: Some(vec![CanonStmt::structural(CanonNode::ExprStmt(
                    CanonExpr::ident("b"),
                ))]),
            }),
        );
        assert_eq!(
            out,
            vec![
                "    if (age >= 18) {".to_string(),
                "        a;".to_string(),
                "    } else {".to_string(),
                "        b;".to_string(),
                "    }".to_string(),
            ]
        );
    }

    #[test]
    fn test_range_loop_header() {
        let mut ctx = ctx();
        ctx.add_variable("i", "int", false);
        let out = render_with(
            &mut ctx,
            CanonStmt::structural(CanonNode::Loop {
                kind: LoopKind::ForRange {
                    var: "i".to_string(),
                    start: CanonExpr::int(0),
                    end: CanonExpr::int(3),
                    step: None,
                    inclusive: false,
                },
                body: vec![],
            }),
        );
        assert_eq!(out[0], "    for (int i = 0; i < 3; i++) {");
    }

    #[test]
    fn test_array_decl_with_initializer() {
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
        assert_eq!(out, vec!["    int numbers[3] = {10, 20, 30};".to_string()]);
    }

    #[test]
    fn test_assemble_shell() {
        let mut ctx = ctx();
        ctx.require_import("<stdio.h>");
        let gen = CGenerator;
        let text = gen.assemble(vec!["    printf(\"hi\\n\");".to_string()], &ctx);
        assert_eq!(
            text,
            "#include <stdio.h>\n\nint main(void) {\n    printf(\"hi\\n\");\n    return 0;\n}\n"
        );
    }
}
