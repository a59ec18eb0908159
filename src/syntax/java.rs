//! Java native parser - brace scanner plus class/main unwrapping
//!
//! `package`/`import` lines and the `class X { public static void main }`
//! wrapper are shell; the statements of `main` are the program. Class
//! members other than `main` stay foreign and degrade to passthrough.
//! Bare statement sequences without a class are accepted as-is.

use super::braces;
use super::tree::{NativeKind, NativeNode};
use crate::error::Result;

pub fn parse(source: &str) -> Result<Vec<NativeNode>> {
    let top = braces::parse_tree(source)?;
    Ok(unwrap_shell(top))
}

fn is_class_header(header: &str) -> bool {
    header.split_whitespace().any(|w| w == "class")
}

fn is_main_header(header: &str) -> bool {
    header.contains("static") && (header.contains("main(") || header.contains("main ("))
}

fn unwrap_shell(top: Vec<NativeNode>) -> Vec<NativeNode> {
    let mut out = Vec::new();
    for node in top {
        match node.kind {
            NativeKind::Simple
                if node.text.starts_with("package ") || node.text.starts_with("import ") => {}
            NativeKind::Foreign if is_class_header(&node.text) => {
                for member in node.children {
                    if member.kind == NativeKind::Foreign && is_main_header(&member.text) {
                        let mut body = member.children;
                        while body.last().map(|n| n.kind == NativeKind::Blank).unwrap_or(false) {
                            body.pop();
                        }
                        out.extend(body);
                    } else {
                        out.push(member);
                    }
                }
            }
            _ => out.push(node),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwraps_class_and_main() {
        let src = "public class Main {\n    public static void main(String[] args) {\n        int x = 10;\n        System.out.println(x);\n    }\n}\n";
        let nodes = parse(src).unwrap();
        let texts: Vec<_> = nodes.iter().map(|n| n.text.as_str()).collect();
        assert_eq!(texts, vec!["int x = 10", "System.out.println(x)"]);
    }

    #[test]
    fn test_bare_statement() {
        let nodes =
            parse("String grade = score >= 60 ? \"Pass\" : \"Fail\";").unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].kind, NativeKind::Simple);
    }

    #[test]
    fn test_import_lines_dropped() {
        let nodes = parse("import java.util.Arrays;\nint x = 1;\n").unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].text, "int x = 1");
    }

    #[test]
    fn test_other_members_stay_foreign() {
        let src = "class A {\n    static int add(int a, int b) {\n        return a + b;\n    }\n    public static void main(String[] args) {\n        int x = 1;\n    }\n}\n";
        let nodes = parse(src).unwrap();
        assert!(nodes.iter().any(|n| n.kind == NativeKind::Foreign));
        assert!(nodes.iter().any(|n| n.text == "int x = 1"));
    }
}
