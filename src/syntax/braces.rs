//! Shared brace-block scanner for C and Java
//!
//! Two passes: a string-aware lexical pass slicing physical lines into
//! segments (statements, block openers, block closers, comments, blanks),
//! then a tree-building pass that folds `if`/`else if`/`else`, `for`,
//! `while` and `do ... while` openers into compound native nodes. Brace
//! imbalance is a whole-pipeline parse error.

use super::tree::{LoopStyle, NativeKind, NativeNode};
use super::{paren_interior, split_trailing_comment};
use crate::error::{Result, TranslateError};

#[derive(Debug, Clone, PartialEq)]
enum Seg {
    Blank,
    Comment(String),
    Stmt(String),
    Open(String),
    Close,
}

#[derive(Debug, Clone)]
struct SegItem {
    line: usize,
    seg: Seg,
    trailing: Option<String>,
}

/// Whether `text` starts with the whole word `kw`.
fn starts_with_word(text: &str, kw: &str) -> bool {
    if !text.starts_with(kw) {
        return false;
    }
    match text.as_bytes().get(kw.len()) {
        None => true,
        Some(&c) => !(c.is_ascii_alphanumeric() || c == b'_'),
    }
}

/// Strip a single-line `/* ... */` comment out of a code line, returning the
/// remaining code and the comment text. A `/*` without `*/` on the same
/// line switches the caller into block-comment mode.
fn strip_inline_block_comment(code: &str) -> (String, Option<String>, bool) {
    let mut in_string = false;
    let mut string_char = b'"';
    let mut escape = false;
    let bytes = code.as_bytes();
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
            b'/' if bytes[i..].starts_with(b"/*") => {
                if let Some(end) = code[i + 2..].find("*/") {
                    let comment = code[i + 2..i + 2 + end].trim().to_string();
                    let rest = format!("{}{}", &code[..i], &code[i + 2 + end + 2..]);
                    return (rest, Some(comment), false);
                }
                let comment = code[i + 2..].trim().to_string();
                return (code[..i].to_string(), Some(comment), true);
            }
            _ => i += 1,
        }
    }
    (code.to_string(), None, false)
}

/// Lexical pass: physical lines into segments.
fn scan_segments(source: &str) -> Vec<SegItem> {
    let mut items: Vec<SegItem> = Vec::new();
    let mut in_block_comment = false;
    for (idx, raw) in source.lines().enumerate() {
        let line_no = idx + 1;
        if in_block_comment {
            match raw.find("*/") {
                Some(end) => {
                    let text = raw[..end].trim().trim_start_matches('*').trim();
                    if !text.is_empty() {
                        items.push(SegItem {
                            line: line_no,
                            seg: Seg::Comment(text.to_string()),
                            trailing: None,
                        });
                    }
                    in_block_comment = false;
                    // Anything after "*/" on this line is rare in the
                    // supported subset; scan it as code.
                    let rest = raw[end + 2..].trim();
                    if !rest.is_empty() {
                        scan_code_line(rest, line_no, None, &mut items);
                    }
                }
                None => {
                    let text = raw.trim().trim_start_matches('*').trim();
                    items.push(SegItem {
                        line: line_no,
                        seg: Seg::Comment(text.to_string()),
                        trailing: None,
                    });
                }
            }
            continue;
        }
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            items.push(SegItem {
                line: line_no,
                seg: Seg::Blank,
                trailing: None,
            });
            continue;
        }
        if let Some(text) = trimmed.strip_prefix("//") {
            items.push(SegItem {
                line: line_no,
                seg: Seg::Comment(text.trim().to_string()),
                trailing: None,
            });
            continue;
        }
        if trimmed.starts_with('#') {
            // Preprocessor directive (C); never a comment in this scanner.
            items.push(SegItem {
                line: line_no,
                seg: Seg::Stmt(trimmed.to_string()),
                trailing: None,
            });
            continue;
        }
        let (code, line_comment) = split_trailing_comment(trimmed, "//");
        let (code, block_comment, opens_block_comment) = strip_inline_block_comment(&code);
        in_block_comment = opens_block_comment;
        let trailing = line_comment.or(block_comment);
        let code = code.trim();
        if code.is_empty() {
            if let Some(text) = trailing {
                items.push(SegItem {
                    line: line_no,
                    seg: Seg::Comment(text),
                    trailing: None,
                });
            }
            continue;
        }
        scan_code_line(code, line_no, trailing, &mut items);
    }
    items
}

/// Slice one comment-free code line into statement/open/close segments.
/// `;` splits only at parenthesis depth zero, so `for` headers survive.
fn scan_code_line(code: &str, line_no: usize, trailing: Option<String>, items: &mut Vec<SegItem>) {
    let mut buf = String::new();
    let mut in_string = false;
    let mut string_char = '"';
    let mut escape = false;
    let mut paren_depth = 0usize;
    // Depth of `= { ... }` initializer braces, which are expression text,
    // not block structure.
    let mut init_depth = 0usize;
    let first_item = items.len();
    for c in code.chars() {
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
            '(' => {
                paren_depth += 1;
                buf.push(c);
            }
            ')' => {
                paren_depth = paren_depth.saturating_sub(1);
                buf.push(c);
            }
            ';' if paren_depth == 0 && init_depth == 0 => {
                let text = buf.trim().to_string();
                buf.clear();
                if !text.is_empty() {
                    items.push(SegItem {
                        line: line_no,
                        seg: Seg::Stmt(text),
                        trailing: None,
                    });
                }
            }
            '{' if paren_depth == 0 => {
                // `]` covers `new int[]{..}` and `new int[2]{..}` allocations.
                let tail = buf.trim_end();
                if init_depth > 0
                    || tail.ends_with('=')
                    || tail.ends_with(',')
                    || tail.ends_with('{')
                    || tail.ends_with(']')
                {
                    init_depth += 1;
                    buf.push(c);
                } else {
                    let header = buf.trim().to_string();
                    buf.clear();
                    items.push(SegItem {
                        line: line_no,
                        seg: Seg::Open(header),
                        trailing: None,
                    });
                }
            }
            '}' if paren_depth == 0 => {
                if init_depth > 0 {
                    init_depth -= 1;
                    buf.push(c);
                } else {
                    let text = buf.trim().to_string();
                    buf.clear();
                    if !text.is_empty() {
                        items.push(SegItem {
                            line: line_no,
                            seg: Seg::Stmt(text),
                            trailing: None,
                        });
                    }
                    items.push(SegItem {
                        line: line_no,
                        seg: Seg::Close,
                        trailing: None,
                    });
                }
            }
            _ => buf.push(c),
        }
    }
    let leftover = buf.trim().to_string();
    if !leftover.is_empty() {
        items.push(SegItem {
            line: line_no,
            seg: Seg::Stmt(leftover),
            trailing: None,
        });
    }
    // The line's trailing comment belongs to its last segment.
    if let Some(comment) = trailing {
        if items.len() > first_item {
            if let Some(last) = items.last_mut() {
                last.trailing = Some(comment);
            }
        }
    }
}

struct TreeBuilder {
    items: Vec<SegItem>,
    source_lines: Vec<String>,
    pos: usize,
}

/// Parse brace-structured source (C or Java) into native nodes.
pub(crate) fn parse_tree(source: &str) -> Result<Vec<NativeNode>> {
    let mut builder = TreeBuilder {
        items: scan_segments(source),
        source_lines: source.lines().map(|l| l.to_string()).collect(),
        pos: 0,
    };
    builder.parse_nodes(true)
}

impl TreeBuilder {
    fn raw_of(&self, start_line: usize, end_line: usize) -> String {
        if start_line == 0 || end_line > self.source_lines.len() {
            return String::new();
        }
        self.source_lines[start_line - 1..end_line].join("\n")
    }

    fn peek(&self) -> Option<&SegItem> {
        self.items.get(self.pos)
    }

    fn parse_nodes(&mut self, top: bool) -> Result<Vec<NativeNode>> {
        let mut nodes = Vec::new();
        loop {
            let item = match self.peek() {
                Some(item) => item.clone(),
                None => {
                    if top {
                        return Ok(nodes);
                    }
                    return Err(TranslateError::ParseError {
                        line: self.source_lines.len(),
                        message: "missing '}'".to_string(),
                    });
                }
            };
            match item.seg {
                Seg::Close => {
                    if top {
                        return Err(TranslateError::ParseError {
                            line: item.line,
                            message: "unmatched '}'".to_string(),
                        });
                    }
                    self.pos += 1;
                    return Ok(nodes);
                }
                Seg::Blank => {
                    self.pos += 1;
                    nodes.push(NativeNode::blank(item.line));
                }
                Seg::Comment(text) => {
                    self.pos += 1;
                    let mut node = NativeNode::comment(text, item.line);
                    node.raw = self.raw_of(item.line, item.line);
                    nodes.push(node);
                }
                Seg::Stmt(text) => {
                    self.pos += 1;
                    // Allman style: header on its own line, `{` on the next.
                    if is_block_header(&text)
                        && matches!(self.peek().map(|i| &i.seg), Some(Seg::Open(h)) if h.is_empty())
                    {
                        self.pos += 1;
                        nodes.push(self.parse_open(text, item.line, item.trailing)?);
                        continue;
                    }
                    let mut node = NativeNode::simple(text.clone(), item.line);
                    node.trailing_comment = item.trailing;
                    node.raw = format!("{text};");
                    nodes.push(node);
                }
                Seg::Open(header) => {
                    self.pos += 1;
                    nodes.push(self.parse_open(header, item.line, item.trailing)?);
                }
            }
        }
    }

    fn close_line(&self) -> usize {
        // Line of the segment just consumed.
        self.items
            .get(self.pos.saturating_sub(1))
            .map(|i| i.line)
            .unwrap_or(self.source_lines.len())
    }

    fn parse_open(
        &mut self,
        header: String,
        line: usize,
        trailing: Option<String>,
    ) -> Result<NativeNode> {
        if starts_with_word(&header, "if") {
            return self.parse_if(header, line, trailing);
        }
        if starts_with_word(&header, "for") {
            return self.parse_loop(header, line, LoopStyle::For, trailing);
        }
        if starts_with_word(&header, "while") {
            return self.parse_loop(header, line, LoopStyle::While, trailing);
        }
        if header == "do" {
            return self.parse_do_while(line, trailing);
        }
        if starts_with_word(&header, "else") {
            return Err(TranslateError::ParseError {
                line,
                message: "'else' without a matching 'if'".to_string(),
            });
        }
        // Anything else that opens a block (function, class member, switch,
        // try) is foreign; consume it whole.
        let children = self.parse_nodes(false)?;
        let mut node = NativeNode::new(NativeKind::Foreign, header, line);
        node.children = children;
        node.end_line = self.close_line();
        node.raw = self.raw_of(line, node.end_line);
        node.trailing_comment = trailing;
        Ok(node)
    }

    fn parse_if(
        &mut self,
        header: String,
        line: usize,
        trailing: Option<String>,
    ) -> Result<NativeNode> {
        let cond = match paren_interior(&header) {
            Some(c) => c.trim().to_string(),
            None => {
                return Err(TranslateError::ParseError {
                    line,
                    message: "malformed 'if' header".to_string(),
                })
            }
        };
        let mut node = NativeNode::new(NativeKind::If, cond, line);
        node.trailing_comment = trailing;
        node.children = self.parse_nodes(false)?;
        loop {
            let (else_header, else_line) = match self.peek() {
                Some(SegItem {
                    seg: Seg::Open(h),
                    line,
                    ..
                }) if starts_with_word(h, "else") => (h.clone(), *line),
                _ => break,
            };
            self.pos += 1;
            let body = self.parse_nodes(false)?;
            let after_else = else_header["else".len()..].trim();
            if starts_with_word(after_else, "if") {
                let cond = paren_interior(after_else).unwrap_or("").trim().to_string();
                if cond.is_empty() {
                    return Err(TranslateError::ParseError {
                        line: else_line,
                        message: "malformed 'else if' header".to_string(),
                    });
                }
                node.elif_arms.push((cond, body));
            } else {
                node.else_children = Some(body);
                break;
            }
        }
        node.end_line = self.close_line();
        node.raw = self.raw_of(line, node.end_line);
        Ok(node)
    }

    fn parse_loop(
        &mut self,
        header: String,
        line: usize,
        style: LoopStyle,
        trailing: Option<String>,
    ) -> Result<NativeNode> {
        let interior = match paren_interior(&header) {
            Some(c) => c.trim().to_string(),
            None => {
                return Err(TranslateError::ParseError {
                    line,
                    message: "malformed loop header".to_string(),
                })
            }
        };
        let mut node = NativeNode::new(NativeKind::Loop(style), interior, line);
        node.trailing_comment = trailing;
        node.children = self.parse_nodes(false)?;
        node.end_line = self.close_line();
        node.raw = self.raw_of(line, node.end_line);
        Ok(node)
    }

    fn parse_do_while(&mut self, line: usize, trailing: Option<String>) -> Result<NativeNode> {
        let children = self.parse_nodes(false)?;
        let cond = match self.peek() {
            Some(SegItem {
                seg: Seg::Stmt(text),
                ..
            }) if starts_with_word(text, "while") => {
                let cond = paren_interior(text).unwrap_or("").trim().to_string();
                self.pos += 1;
                cond
            }
            _ => {
                return Err(TranslateError::ParseError {
                    line,
                    message: "expected 'while (...)' after 'do' block".to_string(),
                })
            }
        };
        let mut node = NativeNode::new(NativeKind::Loop(LoopStyle::DoWhile), cond, line);
        node.trailing_comment = trailing;
        node.children = children;
        node.end_line = self.close_line();
        node.raw = self.raw_of(line, node.end_line);
        Ok(node)
    }
}

fn is_block_header(text: &str) -> bool {
    starts_with_word(text, "if")
        || starts_with_word(text, "else")
        || starts_with_word(text, "for")
        || starts_with_word(text, "while")
        || text == "do"
}
