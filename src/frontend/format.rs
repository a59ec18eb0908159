//! Print decomposition
//!
//! Every source print idiom (printf with a format string, f-string
//! interpolation, string concatenation, a bare expression) is reduced to
//! the same canonical form: a sequence of literal-text and placeholder
//! pieces plus the argument expressions that fill the placeholders, in
//! order. The trailing newline is a flag, not a piece, so `printf("..\n")`
//! and `print(..)` and `System.out.println(..)` all meet in the middle.
//!
//! Placeholder specs are kept printf-style without the leading `%`
//! (`"d"`, `"s"`, `".2f"`); an f-string `{x:.2f}` records the same spec.

use super::expr::parse_expr_or_raw;
use crate::ast::{CanonExpr, PrintPiece};
use crate::lang::Language;

fn push_text(pieces: &mut Vec<PrintPiece>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(PrintPiece::Text(prev)) = pieces.last_mut() {
        prev.push_str(text);
    } else {
        pieces.push(PrintPiece::Text(text.to_string()));
    }
}

/// Strip one trailing newline from the final text piece. Returns whether
/// a newline was present.
fn take_trailing_newline(pieces: &mut Vec<PrintPiece>) -> bool {
    if let Some(PrintPiece::Text(text)) = pieces.last_mut() {
        if let Some(stripped) = text.strip_suffix('\n') {
            let stripped = stripped.to_string();
            if stripped.is_empty() {
                pieces.pop();
            } else {
                *text = stripped;
            }
            return true;
        }
    }
    false
}

/// Decompose an unescaped printf format string. Conversions become
/// placeholders carrying their spec; `%%` is literal text.
pub fn from_printf(fmt: &str, args: Vec<CanonExpr>) -> (Vec<PrintPiece>, Vec<CanonExpr>, bool) {
    let mut pieces = Vec::new();
    let chars: Vec<char> = fmt.chars().collect();
    let mut buf = String::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] != '%' {
            buf.push(chars[i]);
            i += 1;
            continue;
        }
        if chars.get(i + 1) == Some(&'%') {
            buf.push('%');
            i += 2;
            continue;
        }
        // Conversion: flags, width, precision, length, then the letter.
        let start = i + 1;
        let mut j = start;
        while j < chars.len()
            && (chars[j].is_ascii_digit()
                || matches!(chars[j], '-' | '+' | ' ' | '#' | '.' | 'l' | 'h'))
        {
            j += 1;
        }
        if j < chars.len() && chars[j].is_ascii_alphabetic() {
            push_text(&mut pieces, &buf);
            buf.clear();
            let spec: String = chars[start..=j].iter().collect();
            pieces.push(PrintPiece::Placeholder { spec: Some(spec) });
            i = j + 1;
        } else {
            // Lone '%' with no conversion letter: keep it as text.
            buf.push('%');
            i += 1;
        }
    }
    push_text(&mut pieces, &buf);
    let newline = take_trailing_newline(&mut pieces);
    (pieces, args, newline)
}

/// Decompose an f-string body (already unescaped, quotes removed).
/// `{expr}` and `{expr:spec}` become placeholders; `{{`/`}}` are literal
/// braces.
pub fn from_fstring(body: &str, lang: Language) -> (Vec<PrintPiece>, Vec<CanonExpr>) {
    let mut pieces = Vec::new();
    let mut args = Vec::new();
    let chars: Vec<char> = body.chars().collect();
    let mut buf = String::new();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '{' if chars.get(i + 1) == Some(&'{') => {
                buf.push('{');
                i += 2;
            }
            '}' if chars.get(i + 1) == Some(&'}') => {
                buf.push('}');
                i += 2;
            }
            '{' => {
                let mut j = i + 1;
                let mut depth = 1;
                while j < chars.len() && depth > 0 {
                    match chars[j] {
                        '{' => depth += 1,
                        '}' => depth -= 1,
                        _ => {}
                    }
                    j += 1;
                }
                if depth != 0 {
                    // Unclosed brace: treat the rest as text.
                    buf.extend(&chars[i..]);
                    i = chars.len();
                    continue;
                }
                let interior: String = chars[i + 1..j - 1].iter().collect();
                let (expr_text, spec) = match interior.rfind(':') {
                    // A ':' outside any nesting separates the format spec.
                    Some(pos) if !interior[pos + 1..].contains(|c| c == '(' || c == ')') => {
                        (interior[..pos].to_string(), Some(interior[pos + 1..].to_string()))
                    }
                    _ => (interior, None),
                };
                push_text(&mut pieces, &buf);
                buf.clear();
                pieces.push(PrintPiece::Placeholder { spec });
                args.push(parse_expr_or_raw(&expr_text, lang));
                i = j;
            }
            c => {
                buf.push(c);
                i += 1;
            }
        }
    }
    push_text(&mut pieces, &buf);
    (pieces, args)
}

/// Flatten a `+` concatenation chain: string literals become text pieces,
/// everything else a placeholder.
pub fn from_concat(expr: CanonExpr) -> (Vec<PrintPiece>, Vec<CanonExpr>) {
    let mut pieces = Vec::new();
    let mut args = Vec::new();
    flatten_concat(expr, &mut pieces, &mut args);
    (pieces, args)
}

fn flatten_concat(expr: CanonExpr, pieces: &mut Vec<PrintPiece>, args: &mut Vec<CanonExpr>) {
    use crate::ast::BinOp;
    match expr {
        CanonExpr::Binary {
            left,
            op: BinOp::Add,
            right,
        } if concat_has_string(&left) || concat_has_string(&right) => {
            flatten_concat(*left, pieces, args);
            flatten_concat(*right, pieces, args);
        }
        CanonExpr::Literal { value, kind } if kind == crate::ast::LiteralKind::Str => {
            push_text(pieces, &value);
        }
        other => {
            pieces.push(PrintPiece::Placeholder { spec: None });
            args.push(other);
        }
    }
}

/// Whether any leaf of a `+` chain is a string literal. Only then is the
/// chain a concatenation rather than arithmetic.
fn concat_has_string(expr: &CanonExpr) -> bool {
    use crate::ast::BinOp;
    match expr {
        CanonExpr::Literal { kind, .. } => *kind == crate::ast::LiteralKind::Str,
        CanonExpr::Binary {
            left,
            op: BinOp::Add,
            right,
        } => concat_has_string(left) || concat_has_string(right),
        _ => false,
    }
}

/// A single print argument that is not a format construct.
pub fn from_single(expr: CanonExpr) -> (Vec<PrintPiece>, Vec<CanonExpr>) {
    match expr {
        CanonExpr::Literal { value, kind } if kind == crate::ast::LiteralKind::Str => {
            let mut pieces = Vec::new();
            push_text(&mut pieces, &value);
            (pieces, Vec::new())
        }
        other => (
            vec![PrintPiece::Placeholder { spec: None }],
            vec![other],
        ),
    }
}
