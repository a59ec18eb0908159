//! Source position metadata
//!
//! Spans are carried for output reconciliation (line order, comment and
//! blank-line placement) only. Nothing semantic may depend on them.

use serde::{Deserialize, Serialize};

/// Original line span and raw text of a translated construct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    /// 1-based first line.
    pub start_line: usize,
    /// 1-based last line (equal to `start_line` for single-line nodes).
    pub end_line: usize,
    /// Raw source text, used for commented passthrough rendering.
    pub raw: String,
}

impl SourceSpan {
    pub fn new(start_line: usize, end_line: usize, raw: impl Into<String>) -> Self {
        Self {
            start_line,
            end_line,
            raw: raw.into(),
        }
    }

    pub fn line(line: usize, raw: impl Into<String>) -> Self {
        Self::new(line, line, raw)
    }
}

/// Which parse strategy produced a canonical node. The structural parser is
/// always tried first; the pattern (regex) strategy is an explicit secondary
/// path, recorded here so tests can observe which one fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseStrategy {
    Structural,
    Pattern,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_span() {
        let span = SourceSpan::line(7, "x = 1");
        assert_eq!(span.start_line, 7);
        assert_eq!(span.end_line, 7);
        assert_eq!(span.raw, "x = 1");
    }
}
