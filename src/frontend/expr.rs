//! Shared expression parser
//!
//! Tokenizer plus precedence-climbing parser, parameterized by source
//! language: Python spells logic `and`/`or`/`not` and its conditional
//! expression postfix (`a if cond else b`); C and Java use `&&`/`||`/`!`
//! and the prefix ternary (`cond ? a : b`). Both normalize to the same
//! canonical shapes. String and char literals are unescaped here, once, so
//! generators can re-escape idempotently for their target syntax.

use crate::ast::{BinOp, CanonExpr, LiteralKind, UnaryOp};
use crate::error::{Result, TranslateError};
use crate::lang::Language;

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Int(String),
    Float(String),
    Str(String),
    Char(String),
    Ident(String),
    Sym(&'static str),
}

fn err(message: impl Into<String>) -> TranslateError {
    TranslateError::ExprError {
        message: message.into(),
    }
}

/// Decode source escape sequences into the canonical in-memory form.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn tokenize(text: &str, lang: Language) -> Result<Vec<Tok>> {
    let mut toks = Vec::new();
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if c.is_ascii_digit() {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            let mut is_float = false;
            if i + 1 < chars.len() && chars[i] == '.' && chars[i + 1].is_ascii_digit() {
                is_float = true;
                i += 1;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
            }
            let value: String = chars[start..i].iter().collect();
            // Numeric suffixes (1.5f, 10L) are dropped from the canonical value.
            while i < chars.len() && matches!(chars[i], 'f' | 'F' | 'l' | 'L' | 'd' | 'D') {
                is_float |= matches!(chars[i], 'f' | 'F' | 'd' | 'D');
                i += 1;
            }
            toks.push(if is_float {
                Tok::Float(value)
            } else {
                Tok::Int(value)
            });
            continue;
        }
        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            toks.push(Tok::Ident(chars[start..i].iter().collect()));
            continue;
        }
        if c == '"' || (c == '\'' && lang == Language::Python) {
            let quote = c;
            i += 1;
            let mut value = String::new();
            let mut closed = false;
            while i < chars.len() {
                let d = chars[i];
                if d == '\\' && i + 1 < chars.len() {
                    value.push('\\');
                    value.push(chars[i + 1]);
                    i += 2;
                    continue;
                }
                if d == quote {
                    closed = true;
                    i += 1;
                    break;
                }
                value.push(d);
                i += 1;
            }
            if !closed {
                return Err(err(format!("unterminated string literal in '{text}'")));
            }
            toks.push(Tok::Str(unescape(&value)));
            continue;
        }
        if c == '\'' {
            // C/Java char literal
            i += 1;
            let mut value = String::new();
            let mut closed = false;
            while i < chars.len() {
                let d = chars[i];
                if d == '\\' && i + 1 < chars.len() {
                    value.push('\\');
                    value.push(chars[i + 1]);
                    i += 2;
                    continue;
                }
                if d == '\'' {
                    closed = true;
                    i += 1;
                    break;
                }
                value.push(d);
                i += 1;
            }
            if !closed {
                return Err(err(format!("unterminated char literal in '{text}'")));
            }
            toks.push(Tok::Char(unescape(&value)));
            continue;
        }
        let two: String = chars[i..(i + 2).min(chars.len())].iter().collect();
        let sym: &'static str = match two.as_str() {
            "==" => "==",
            "!=" => "!=",
            "<=" => "<=",
            ">=" => ">=",
            "&&" => "&&",
            "||" => "||",
            _ => "",
        };
        if !sym.is_empty() {
            toks.push(Tok::Sym(sym));
            i += 2;
            continue;
        }
        let one: &'static str = match c {
            '+' => "+",
            '-' => "-",
            '*' => "*",
            '/' => "/",
            '%' => "%",
            '<' => "<",
            '>' => ">",
            '!' => "!",
            '?' => "?",
            ':' => ":",
            '.' => ".",
            ',' => ",",
            '(' => "(",
            ')' => ")",
            '[' => "[",
            ']' => "]",
            '{' => "{",
            '}' => "}",
            _ => {
                return Err(err(format!("unsupported character '{c}' in '{text}'")));
            }
        };
        toks.push(Tok::Sym(one));
        i += 1;
    }
    Ok(toks)
}

struct ExprParser {
    toks: Vec<Tok>,
    pos: usize,
    lang: Language,
}

/// Parse one expression in the given source language.
pub fn parse_expression(text: &str, lang: Language) -> Result<CanonExpr> {
    let toks = tokenize(text, lang)?;
    if toks.is_empty() {
        return Err(err("empty expression"));
    }
    let mut parser = ExprParser { toks, pos: 0, lang };
    let expr = parser.parse_ternary()?;
    if parser.pos < parser.toks.len() {
        return Err(err(format!("trailing tokens in expression '{text}'")));
    }
    Ok(canonicalize(expr, lang))
}

/// Parse an expression, degrading to a verbatim `Raw` fragment when the
/// text is outside the supported grammar.
pub fn parse_expr_or_raw(text: &str, lang: Language) -> CanonExpr {
    match parse_expression(text, lang) {
        Ok(expr) => expr,
        Err(_) => CanonExpr::Raw(text.trim().to_string()),
    }
}

impl ExprParser {
    fn peek(&self) -> Option<&Tok> {
        self.toks.get(self.pos)
    }

    fn eat_sym(&mut self, sym: &str) -> bool {
        if matches!(self.peek(), Some(Tok::Sym(s)) if *s == sym) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, kw: &str) -> bool {
        if matches!(self.peek(), Some(Tok::Ident(id)) if id == kw) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_sym(&mut self, sym: &'static str) -> Result<()> {
        if self.eat_sym(sym) {
            Ok(())
        } else {
            Err(err(format!("expected '{sym}'")))
        }
    }

    fn parse_ternary(&mut self) -> Result<CanonExpr> {
        let first = self.parse_or()?;
        match self.lang {
            Language::Python => {
                // Postfix shape: then_value if condition else else_value
                if self.eat_keyword("if") {
                    let condition = self.parse_or()?;
                    if !self.eat_keyword("else") {
                        return Err(err("conditional expression missing 'else'"));
                    }
                    let else_value = self.parse_ternary()?;
                    return Ok(CanonExpr::Ternary {
                        condition: Box::new(condition),
                        then_value: Box::new(first),
                        else_value: Box::new(else_value),
                    });
                }
                Ok(first)
            }
            Language::C | Language::Java => {
                // Prefix shape: condition ? then_value : else_value
                if self.eat_sym("?") {
                    let then_value = self.parse_ternary()?;
                    self.expect_sym(":")?;
                    let else_value = self.parse_ternary()?;
                    return Ok(CanonExpr::Ternary {
                        condition: Box::new(first),
                        then_value: Box::new(then_value),
                        else_value: Box::new(else_value),
                    });
                }
                Ok(first)
            }
        }
    }

    fn parse_or(&mut self) -> Result<CanonExpr> {
        let mut left = self.parse_and()?;
        loop {
            let matched = match self.lang {
                Language::Python => self.eat_keyword("or"),
                _ => self.eat_sym("||"),
            };
            if !matched {
                return Ok(left);
            }
            let right = self.parse_and()?;
            left = CanonExpr::Binary {
                left: Box::new(left),
                op: BinOp::Or,
                right: Box::new(right),
            };
        }
    }

    fn parse_and(&mut self) -> Result<CanonExpr> {
        let mut left = self.parse_not()?;
        loop {
            let matched = match self.lang {
                Language::Python => self.eat_keyword("and"),
                _ => self.eat_sym("&&"),
            };
            if !matched {
                return Ok(left);
            }
            let right = self.parse_not()?;
            left = CanonExpr::Binary {
                left: Box::new(left),
                op: BinOp::And,
                right: Box::new(right),
            };
        }
    }

    /// Python `not` binds looser than comparison; C/Java `!` is handled at
    /// the unary level instead.
    fn parse_not(&mut self) -> Result<CanonExpr> {
        if self.lang == Language::Python && self.eat_keyword("not") {
            let operand = self.parse_not()?;
            return Ok(CanonExpr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            });
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<CanonExpr> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek() {
                Some(Tok::Sym("==")) => BinOp::Eq,
                Some(Tok::Sym("!=")) => BinOp::NotEq,
                Some(Tok::Sym("<=")) => BinOp::LtEq,
                Some(Tok::Sym(">=")) => BinOp::GtEq,
                Some(Tok::Sym("<")) => BinOp::Lt,
                Some(Tok::Sym(">")) => BinOp::Gt,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.parse_additive()?;
            left = CanonExpr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
    }

    fn parse_additive(&mut self) -> Result<CanonExpr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(Tok::Sym("+")) => BinOp::Add,
                Some(Tok::Sym("-")) => BinOp::Sub,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.parse_multiplicative()?;
            left = CanonExpr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
    }

    fn parse_multiplicative(&mut self) -> Result<CanonExpr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Tok::Sym("*")) => BinOp::Mul,
                Some(Tok::Sym("/")) => BinOp::Div,
                Some(Tok::Sym("%")) => BinOp::Mod,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.parse_unary()?;
            left = CanonExpr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
    }

    fn parse_unary(&mut self) -> Result<CanonExpr> {
        if self.eat_sym("-") {
            let operand = self.parse_unary()?;
            return Ok(CanonExpr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(operand),
            });
        }
        if self.eat_sym("+") {
            return self.parse_unary();
        }
        if self.lang != Language::Python && self.eat_sym("!") {
            let operand = self.parse_unary()?;
            return Ok(CanonExpr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<CanonExpr> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.eat_sym(".") {
                let field = match self.peek() {
                    Some(Tok::Ident(id)) => id.clone(),
                    _ => return Err(err("expected identifier after '.'")),
                };
                self.pos += 1;
                expr = match expr {
                    CanonExpr::Ident(name) => CanonExpr::Ident(format!("{name}.{field}")),
                    _ => return Err(err("unsupported attribute access")),
                };
                continue;
            }
            if self.eat_sym("(") {
                let name = match &expr {
                    CanonExpr::Ident(name) => name.clone(),
                    _ => return Err(err("call on non-identifier")),
                };
                let mut args = Vec::new();
                if !self.eat_sym(")") {
                    loop {
                        args.push(self.parse_ternary()?);
                        if self.eat_sym(",") {
                            continue;
                        }
                        self.expect_sym(")")?;
                        break;
                    }
                }
                expr = CanonExpr::Call { name, args };
                continue;
            }
            if self.eat_sym("[") {
                let array = match &expr {
                    CanonExpr::Ident(name) => name.clone(),
                    _ => return Err(err("index on non-identifier")),
                };
                let index = self.parse_ternary()?;
                self.expect_sym("]")?;
                expr = CanonExpr::ArrayAccess {
                    array,
                    index: Box::new(index),
                };
                continue;
            }
            return Ok(expr);
        }
    }

    fn parse_primary(&mut self) -> Result<CanonExpr> {
        let tok = match self.peek() {
            Some(tok) => tok.clone(),
            None => return Err(err("unexpected end of expression")),
        };
        match tok {
            Tok::Int(value) => {
                self.pos += 1;
                Ok(CanonExpr::Literal {
                    value,
                    kind: LiteralKind::Int,
                })
            }
            Tok::Float(value) => {
                self.pos += 1;
                Ok(CanonExpr::Literal {
                    value,
                    kind: LiteralKind::Float,
                })
            }
            Tok::Str(value) => {
                self.pos += 1;
                Ok(CanonExpr::Literal {
                    value,
                    kind: LiteralKind::Str,
                })
            }
            Tok::Char(value) => {
                self.pos += 1;
                Ok(CanonExpr::Literal {
                    value,
                    kind: LiteralKind::Char,
                })
            }
            Tok::Ident(id) => {
                self.pos += 1;
                match (self.lang, id.as_str()) {
                    (Language::Python, "True") => Ok(CanonExpr::Literal {
                        value: "true".to_string(),
                        kind: LiteralKind::Bool,
                    }),
                    (Language::Python, "False") => Ok(CanonExpr::Literal {
                        value: "false".to_string(),
                        kind: LiteralKind::Bool,
                    }),
                    (Language::C | Language::Java, "true") => Ok(CanonExpr::Literal {
                        value: "true".to_string(),
                        kind: LiteralKind::Bool,
                    }),
                    (Language::C | Language::Java, "false") => Ok(CanonExpr::Literal {
                        value: "false".to_string(),
                        kind: LiteralKind::Bool,
                    }),
                    _ => Ok(CanonExpr::Ident(id)),
                }
            }
            Tok::Sym("(") => {
                self.pos += 1;
                let inner = self.parse_ternary()?;
                self.expect_sym(")")?;
                Ok(inner)
            }
            Tok::Sym("[") if self.lang == Language::Python => {
                self.pos += 1;
                self.parse_bracketed_list("]")
            }
            Tok::Sym("{") => {
                self.pos += 1;
                self.parse_bracketed_list("}")
            }
            other => Err(err(format!("unexpected token {other:?}"))),
        }
    }

    /// List/initializer literal: `[1, 2, 3]` or `{1, 2, 3}`, nesting allowed.
    fn parse_bracketed_list(&mut self, close: &'static str) -> Result<CanonExpr> {
        let mut items = Vec::new();
        if self.eat_sym(close) {
            return Ok(CanonExpr::ArrayLiteral(items));
        }
        loop {
            items.push(self.parse_ternary()?);
            if self.eat_sym(",") {
                // Trailing comma before the closer is tolerated.
                if self.eat_sym(close) {
                    return Ok(CanonExpr::ArrayLiteral(items));
                }
                continue;
            }
            self.expect_sym(close)?;
            return Ok(CanonExpr::ArrayLiteral(items));
        }
    }
}

/// Rewrite language idioms into canonical calls: length constructs become
/// `len(x)` and string conversion becomes `str(x)`.
fn canonicalize(expr: CanonExpr, lang: Language) -> CanonExpr {
    let expr = map_children(expr, lang);
    match expr {
        // sizeof(a) / sizeof(a[0])  =>  len(a)
        CanonExpr::Binary { left, op: BinOp::Div, right } if lang == Language::C => {
            if let (
                CanonExpr::Call { name: ln, args: la },
                CanonExpr::Call { name: rn, args: ra },
            ) = (left.as_ref(), right.as_ref())
            {
                if ln == "sizeof" && rn == "sizeof" && la.len() == 1 && ra.len() == 1 {
                    if let (CanonExpr::Ident(a), CanonExpr::ArrayAccess { array, index }) =
                        (&la[0], &ra[0])
                    {
                        if a == array && index.as_const_int() == Some(0) {
                            return CanonExpr::Call {
                                name: "len".to_string(),
                                args: vec![CanonExpr::Ident(a.clone())],
                            };
                        }
                    }
                }
            }
            CanonExpr::Binary {
                left,
                op: BinOp::Div,
                right,
            }
        }
        // arr.length / s.length() / xs.size()  =>  len(arr)
        CanonExpr::Ident(name) if lang == Language::Java && name.ends_with(".length") => {
            let base = name.trim_end_matches(".length").to_string();
            if base.is_empty() || base.contains('.') {
                CanonExpr::Ident(name)
            } else {
                CanonExpr::Call {
                    name: "len".to_string(),
                    args: vec![CanonExpr::Ident(base)],
                }
            }
        }
        CanonExpr::Call { name, args } if lang == Language::Java => {
            if args.is_empty() && (name.ends_with(".length") || name.ends_with(".size")) {
                let base = name[..name.rfind('.').expect("dotted")].to_string();
                if !base.is_empty() && !base.contains('.') {
                    return CanonExpr::Call {
                        name: "len".to_string(),
                        args: vec![CanonExpr::Ident(base)],
                    };
                }
            }
            if name == "String.valueOf" && args.len() == 1 {
                return CanonExpr::Call {
                    name: "str".to_string(),
                    args,
                };
            }
            if name == "Integer.parseInt" && args.len() == 1 {
                return CanonExpr::Call {
                    name: "int".to_string(),
                    args,
                };
            }
            CanonExpr::Call { name, args }
        }
        other => other,
    }
}

fn map_children(expr: CanonExpr, lang: Language) -> CanonExpr {
    match expr {
        CanonExpr::Binary { left, op, right } => CanonExpr::Binary {
            left: Box::new(canonicalize(*left, lang)),
            op,
            right: Box::new(canonicalize(*right, lang)),
        },
        CanonExpr::Unary { op, operand } => CanonExpr::Unary {
            op,
            operand: Box::new(canonicalize(*operand, lang)),
        },
        CanonExpr::Ternary {
            condition,
            then_value,
            else_value,
        } => CanonExpr::Ternary {
            condition: Box::new(canonicalize(*condition, lang)),
            then_value: Box::new(canonicalize(*then_value, lang)),
            else_value: Box::new(canonicalize(*else_value, lang)),
        },
        CanonExpr::Call { name, args } => CanonExpr::Call {
            name,
            args: args.into_iter().map(|a| canonicalize(a, lang)).collect(),
        },
        CanonExpr::ArrayAccess { array, index } => CanonExpr::ArrayAccess {
            array,
            index: Box::new(canonicalize(*index, lang)),
        },
        CanonExpr::ArrayLiteral(items) => {
            CanonExpr::ArrayLiteral(items.into_iter().map(|i| canonicalize(i, lang)).collect())
        }
        other => other,
    }
}

/// Split `text` on a top-level assignment operator, outside strings,
/// parentheses and brackets. Returns (target, operator, value).
pub(crate) fn split_assignment(text: &str) -> Option<(String, crate::ast::AssignOp, String)> {
    use crate::ast::AssignOp;
    let bytes = text.as_bytes();
    let mut in_string = false;
    let mut string_char = b'"';
    let mut escape = false;
    let mut depth = 0i32;
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        if in_string {
            if escape {
                escape = false;
            } else if c == b'\\' {
                escape = true;
            } else if c == string_char {
                in_string = false;
            }
            i += 1;
            continue;
        }
        match c {
            b'"' | b'\'' => {
                in_string = true;
                string_char = c;
                i += 1;
            }
            b'(' | b'[' | b'{' => {
                depth += 1;
                i += 1;
            }
            b')' | b']' | b'}' => {
                depth -= 1;
                i += 1;
            }
            b'=' if depth == 0 => {
                let next = bytes.get(i + 1).copied();
                let prev = if i > 0 { Some(bytes[i - 1]) } else { None };
                if next == Some(b'=') {
                    i += 2;
                    continue;
                }
                // Comparison operators ending in '='.
                if matches!(prev, Some(b'=') | Some(b'!') | Some(b'<') | Some(b'>')) {
                    i += 1;
                    continue;
                }
                let (op, target_end) = match prev {
                    Some(b'+') => (AssignOp::AddAssign, i - 1),
                    Some(b'-') => (AssignOp::SubAssign, i - 1),
                    Some(b'*') => (AssignOp::MulAssign, i - 1),
                    Some(b'/') => (AssignOp::DivAssign, i - 1),
                    Some(b'%') => (AssignOp::ModAssign, i - 1),
                    _ => (AssignOp::Assign, i),
                };
                let target = text[..target_end].trim().to_string();
                let value = text[i + 1..].trim().to_string();
                if target.is_empty() || value.is_empty() {
                    return None;
                }
                return Some((target, op, value));
            }
            _ => i += 1,
        }
    }
    None
}

/// Split on top-level commas, respecting strings, parens, brackets and
/// initializer braces.
pub(crate) fn split_top_commas(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut buf = String::new();
    let mut in_string = false;
    let mut string_char = '"';
    let mut escape = false;
    let mut depth = 0i32;
    for c in text.chars() {
        if in_string {
            buf.push(c);
            if escape {
                escape = false;
            } else if c == '\\' {
                escape = true;
            } else if c == string_char {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' | '\'' => {
                in_string = true;
                string_char = c;
                buf.push(c);
            }
            '(' | '[' | '{' => {
                depth += 1;
                buf.push(c);
            }
            ')' | ']' | '}' => {
                depth -= 1;
                buf.push(c);
            }
            ',' if depth == 0 => {
                parts.push(buf.trim().to_string());
                buf.clear();
            }
            _ => buf.push(c),
        }
    }
    if !buf.trim().is_empty() {
        parts.push(buf.trim().to_string());
    }
    parts
}
