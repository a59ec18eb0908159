//! Python native parser - indentation-block structurer

use super::tree::{LoopStyle, NativeKind, NativeNode};
use super::{indent_width, split_trailing_comment};
use crate::error::{Result, TranslateError};

/// Parse Python source into native nodes.
pub fn parse(source: &str) -> Result<Vec<NativeNode>> {
    let lines: Vec<String> = source.lines().map(|l| l.to_string()).collect();
    let mut parser = PyParser { lines, pos: 0 };
    let nodes = parser.parse_block(0)?;
    if parser.pos < parser.lines.len() {
        return Err(TranslateError::ParseError {
            line: parser.pos + 1,
            message: "unexpected dedent below top level".to_string(),
        });
    }
    Ok(nodes)
}

struct PyParser {
    lines: Vec<String>,
    pos: usize,
}

/// Compound header split into keyword and interior, when the line is one.
fn compound_header(code: &str) -> Option<(&str, String)> {
    let body = code.strip_suffix(':')?.trim_end();
    let keyword: String = body.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
    let rest = body[keyword.len()..].trim().to_string();
    let kw: &'static str = match keyword.as_str() {
        "if" => "if",
        "elif" => "elif",
        "else" => "else",
        "for" => "for",
        "while" => "while",
        "def" => "def",
        "class" => "class",
        "try" => "try",
        "except" => "except",
        "finally" => "finally",
        "with" => "with",
        "match" => "match",
        _ => return None,
    };
    Some((kw, rest))
}

impl PyParser {
    fn line(&self, idx: usize) -> &str {
        &self.lines[idx]
    }

    fn raw_of(&self, start_line: usize, end_line: usize) -> String {
        self.lines[start_line - 1..end_line].join("\n")
    }

    /// Parse statements at exactly `indent`, stopping on dedent.
    fn parse_block(&mut self, indent: usize) -> Result<Vec<NativeNode>> {
        let mut nodes = Vec::new();
        while self.pos < self.lines.len() {
            let raw = self.line(self.pos).to_string();
            if raw.trim().is_empty() {
                nodes.push(NativeNode::blank(self.pos + 1));
                self.pos += 1;
                continue;
            }
            let ind = indent_width(&raw);
            if ind < indent {
                break;
            }
            if ind > indent {
                return Err(TranslateError::ParseError {
                    line: self.pos + 1,
                    message: "unexpected indent".to_string(),
                });
            }
            let line_no = self.pos + 1;
            let trimmed = raw.trim_start();
            if let Some(text) = trimmed.strip_prefix('#') {
                let mut node = NativeNode::comment(text.trim(), line_no);
                node.raw = raw.clone();
                nodes.push(node);
                self.pos += 1;
                continue;
            }
            let (code, trailing) = split_trailing_comment(&raw, "#");
            let code = code.trim().to_string();
            match compound_header(&code) {
                Some(("if", cond)) => {
                    self.pos += 1;
                    nodes.push(self.parse_if(indent, line_no, cond, trailing)?);
                }
                Some(("for", header)) => {
                    self.pos += 1;
                    nodes.push(self.parse_loop(
                        indent,
                        line_no,
                        LoopStyle::For,
                        header,
                        trailing,
                    )?);
                }
                Some(("while", cond)) => {
                    self.pos += 1;
                    nodes.push(self.parse_loop(
                        indent,
                        line_no,
                        LoopStyle::While,
                        cond,
                        trailing,
                    )?);
                }
                Some(("elif", _)) | Some(("else", _)) | Some(("except", _))
                | Some(("finally", _)) => {
                    return Err(TranslateError::ParseError {
                        line: line_no,
                        message: format!("'{code}' without a matching block opener"),
                    });
                }
                Some((_, _)) => {
                    self.pos += 1;
                    nodes.push(self.parse_foreign(indent, line_no, &raw)?);
                }
                None => {
                    let mut node = NativeNode::simple(code, line_no);
                    node.trailing_comment = trailing;
                    node.raw = raw.clone();
                    nodes.push(node);
                    self.pos += 1;
                }
            }
        }
        Ok(nodes)
    }

    /// Indent of the first non-blank line after a header; must be deeper
    /// than the header's own indent.
    fn child_indent(&self, parent_indent: usize, header_line: usize) -> Result<usize> {
        let mut j = self.pos;
        while j < self.lines.len() && self.line(j).trim().is_empty() {
            j += 1;
        }
        if j >= self.lines.len() {
            return Err(TranslateError::ParseError {
                line: header_line,
                message: "expected an indented block".to_string(),
            });
        }
        let ind = indent_width(self.line(j));
        if ind <= parent_indent {
            return Err(TranslateError::ParseError {
                line: header_line,
                message: "expected an indented block".to_string(),
            });
        }
        Ok(ind)
    }

    fn parse_body(&mut self, parent_indent: usize, header_line: usize) -> Result<Vec<NativeNode>> {
        let child = self.child_indent(parent_indent, header_line)?;
        let mut body = self.parse_block(child)?;
        // Trailing blanks belong to the enclosing level, not the block.
        while body.last().map(|n| n.kind == NativeKind::Blank).unwrap_or(false) {
            body.pop();
            self.pos -= 1;
        }
        Ok(body)
    }

    /// Same-indent continuation header (`elif`/`else`/...), skipping blank
    /// lines in between. Consumes the blanks only when a match is found.
    fn peek_continuation(&mut self, indent: usize, keywords: &[&str]) -> Option<(String, usize)> {
        let mut j = self.pos;
        while j < self.lines.len() && self.line(j).trim().is_empty() {
            j += 1;
        }
        if j >= self.lines.len() || indent_width(self.line(j)) != indent {
            return None;
        }
        let (code, _) = split_trailing_comment(self.line(j), "#");
        let code = code.trim().to_string();
        let (kw, _) = compound_header(&code)?;
        if keywords.contains(&kw) {
            self.pos = j;
            Some((code, j + 1))
        } else {
            None
        }
    }

    fn parse_if(
        &mut self,
        indent: usize,
        line_no: usize,
        cond: String,
        trailing: Option<String>,
    ) -> Result<NativeNode> {
        let mut node = NativeNode::new(NativeKind::If, cond, line_no);
        node.trailing_comment = trailing;
        node.children = self.parse_body(indent, line_no)?;
        loop {
            match self.peek_continuation(indent, &["elif", "else"]) {
                Some((code, header_line)) => {
                    let (kw, rest) = compound_header(&code).expect("peeked header");
                    self.pos += 1;
                    let body = self.parse_body(indent, header_line)?;
                    if kw == "elif" {
                        node.elif_arms.push((rest, body));
                    } else {
                        node.else_children = Some(body);
                        break;
                    }
                }
                None => break,
            }
        }
        node.end_line = self.pos;
        node.raw = self.raw_of(line_no, node.end_line);
        Ok(node)
    }

    fn parse_loop(
        &mut self,
        indent: usize,
        line_no: usize,
        style: LoopStyle,
        header: String,
        trailing: Option<String>,
    ) -> Result<NativeNode> {
        let mut node = NativeNode::new(NativeKind::Loop(style), header, line_no);
        node.trailing_comment = trailing;
        node.children = self.parse_body(indent, line_no)?;
        node.end_line = self.pos;
        node.raw = self.raw_of(line_no, node.end_line);
        Ok(node)
    }

    /// Block construct outside the supported subset (def/class/try/with/
    /// match). The whole block, chained arms included, becomes one node.
    fn parse_foreign(&mut self, indent: usize, line_no: usize, header: &str) -> Result<NativeNode> {
        let mut node = NativeNode::new(NativeKind::Foreign, header.trim(), line_no);
        node.children = self.parse_body(indent, line_no)?;
        while let Some((_, header_line)) =
            self.peek_continuation(indent, &["except", "finally", "else", "elif"])
        {
            self.pos += 1;
            let body = self.parse_body(indent, header_line)?;
            node.elif_arms.push((String::new(), body));
        }
        node.end_line = self.pos;
        node.raw = self.raw_of(line_no, node.end_line);
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_statements() {
        let nodes = parse("x = 1\ny = 2\n").unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].kind, NativeKind::Simple);
        assert_eq!(nodes[0].text, "x = 1");
        assert_eq!(nodes[1].start_line, 2);
    }

    #[test]
    fn test_if_else_block() {
        let src = "if age >= 18:\n    print(\"Adult\")\nelse:\n    print(\"Minor\")\n";
        let nodes = parse(src).unwrap();
        assert_eq!(nodes.len(), 1);
        let node = &nodes[0];
        assert_eq!(node.kind, NativeKind::If);
        assert_eq!(node.text, "age >= 18");
        assert_eq!(node.children.len(), 1);
        assert!(node.else_children.is_some());
        assert_eq!(node.end_line, 4);
    }

    #[test]
    fn test_elif_chain() {
        let src = "if a:\n    x = 1\nelif b:\n    x = 2\nelif c:\n    x = 3\nelse:\n    x = 4\n";
        let node = &parse(src).unwrap()[0];
        assert_eq!(node.elif_arms.len(), 2);
        assert_eq!(node.elif_arms[0].0, "b");
        assert!(node.else_children.is_some());
    }

    #[test]
    fn test_for_and_while() {
        let src = "for i in range(3):\n    x = i\nwhile x > 0:\n    x = x - 1\n";
        let nodes = parse(src).unwrap();
        assert_eq!(nodes[0].kind, NativeKind::Loop(LoopStyle::For));
        assert_eq!(nodes[0].text, "i in range(3)");
        assert_eq!(nodes[1].kind, NativeKind::Loop(LoopStyle::While));
        assert_eq!(nodes[1].text, "x > 0");
    }

    #[test]
    fn test_comment_and_trailing_comment() {
        let nodes = parse("# header\nx = 1  # count\n").unwrap();
        assert_eq!(nodes[0].kind, NativeKind::Comment);
        assert_eq!(nodes[0].text, "header");
        assert_eq!(nodes[1].trailing_comment.as_deref(), Some("count"));
    }

    #[test]
    fn test_blank_lines_kept() {
        let nodes = parse("x = 1\n\n\ny = 2\n").unwrap();
        let blanks = nodes.iter().filter(|n| n.kind == NativeKind::Blank).count();
        assert_eq!(blanks, 2);
    }

    #[test]
    fn test_foreign_try_block() {
        let src = "try:\n    x = 1\nexcept ValueError:\n    x = 2\n";
        let nodes = parse(src).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].kind, NativeKind::Foreign);
        assert_eq!(nodes[0].end_line, 4);
        assert!(nodes[0].raw.contains("except ValueError"));
    }

    #[test]
    fn test_missing_block_is_parse_error() {
        let err = parse("if x:\n").unwrap_err();
        assert!(matches!(err, TranslateError::ParseError { line: 1, .. }));
    }

    #[test]
    fn test_dangling_else_is_parse_error() {
        let err = parse("else:\n    x = 1\n").unwrap_err();
        assert!(matches!(err, TranslateError::ParseError { .. }));
    }

    #[test]
    fn test_blank_line_before_else() {
        let src = "if a:\n    x = 1\n\nelse:\n    x = 2\n";
        let node = &parse(src).unwrap()[0];
        assert!(node.else_children.is_some());
    }
}
