//! C native parser - brace scanner plus program-shell unwrapping
//!
//! `#include` lines and the `int main` wrapper are shell, not statements:
//! they are dropped here and re-synthesized by the target side. Bare
//! statement sequences without a `main` are accepted as-is.

use super::braces;
use super::tree::{NativeKind, NativeNode};
use crate::error::Result;

pub fn parse(source: &str) -> Result<Vec<NativeNode>> {
    let top = braces::parse_tree(source)?;
    Ok(unwrap_shell(top))
}

fn is_main_header(header: &str) -> bool {
    header.contains("main(") || header.contains("main (")
}

fn is_trailing_return_zero(node: &NativeNode) -> bool {
    node.kind == NativeKind::Simple && node.text.trim() == "return 0"
}

fn unwrap_shell(top: Vec<NativeNode>) -> Vec<NativeNode> {
    let mut out = Vec::new();
    for node in top {
        match node.kind {
            NativeKind::Simple if node.text.starts_with("#include") => {
                // Re-created from generator flags on the way out.
            }
            NativeKind::Foreign if is_main_header(&node.text) => {
                let mut body = node.children;
                // `return 0;` at the end of main is shell, not program.
                while body
                    .last()
                    .map(|n| n.kind == NativeKind::Blank || is_trailing_return_zero(n))
                    .unwrap_or(false)
                {
                    let last = body.pop().expect("checked non-empty");
                    if last.kind == NativeKind::Blank {
                        continue;
                    }
                    break;
                }
                out.extend(body);
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
    fn test_unwraps_main() {
        let src = "#include <stdio.h>\n\nint main(void) {\n    int x = 10;\n    printf(\"%d\\n\", x);\n    return 0;\n}\n";
        let nodes = parse(src).unwrap();
        let texts: Vec<_> = nodes
            .iter()
            .filter(|n| n.kind == NativeKind::Simple)
            .map(|n| n.text.as_str())
            .collect();
        assert_eq!(texts, vec!["int x = 10", "printf(\"%d\\n\", x)"]);
    }

    #[test]
    fn test_bare_statements_without_main() {
        let nodes = parse("int x = 10; int y = 20;").unwrap();
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn test_other_functions_stay_foreign() {
        let src = "int add(int a, int b) {\n    return a + b;\n}\nint main() {\n    int x = 1;\n    return 0;\n}\n";
        let nodes = parse(src).unwrap();
        assert_eq!(nodes[0].kind, NativeKind::Foreign);
        assert!(nodes.iter().any(|n| n.text == "int x = 1"));
    }
}
