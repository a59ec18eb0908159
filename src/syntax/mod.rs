//! Native parse layer
//!
//! Line/block structurers, one per source language. They group raw source
//! into `NativeNode` trees (statements, comments, blanks, compound blocks)
//! without classifying statement contents - that is the frontend's job.
//!
//! Malformed block structure (unbalanced braces, dangling `elif`) is the
//! whole-pipeline failure mode: it surfaces as a `ParseError` and the
//! orchestrator never emits a partial program for it.

mod braces;
pub mod c;
pub mod java;
pub mod python;
mod tree;

pub use tree::{LoopStyle, NativeKind, NativeNode};

use crate::error::Result;
use crate::lang::Language;

/// Parse one source unit into its native node sequence.
pub fn parse_native(source: &str, lang: Language) -> Result<Vec<NativeNode>> {
    match lang {
        Language::Python => python::parse(source),
        Language::C => c::parse(source),
        Language::Java => java::parse(source),
    }
}

/// Split a line of code from its trailing comment, string-aware: the marker
/// is only a comment start outside string and char literals.
pub(crate) fn split_trailing_comment(line: &str, marker: &str) -> (String, Option<String>) {
    let bytes = line.as_bytes();
    let marker_bytes = marker.as_bytes();
    let mut in_string = false;
    let mut string_char = b'"';
    let mut escape = false;
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
            _ if bytes[i..].starts_with(marker_bytes) => {
                let code = line[..i].trim_end().to_string();
                let comment = line[i + marker.len()..].trim().to_string();
                return (code, Some(comment));
            }
            _ => i += 1,
        }
    }
    (line.trim_end().to_string(), None)
}

/// Leading indentation width, tabs counted as four columns.
pub(crate) fn indent_width(line: &str) -> usize {
    let mut width = 0;
    for c in line.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width += 4,
            _ => break,
        }
    }
    width
}

/// Interior of the first balanced parenthesis group, e.g. the condition of
/// `if (x >= 18)`.
pub(crate) fn paren_interior(text: &str) -> Option<&str> {
    let open = text.find('(')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut string_char = b'"';
    let mut escape = false;
    let bytes = text.as_bytes();
    for (i, &c) in bytes.iter().enumerate().skip(open) {
        if in_string {
            if escape {
                escape = false;
            } else if c == b'\\' {
                escape = true;
            } else if c == string_char {
                in_string = false;
            }
            continue;
        }
        match c {
            b'"' | b'\'' => {
                in_string = true;
                string_char = c;
            }
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[open + 1..i]);
                }
            }
            _ => {}
        }
    }
    None
}
