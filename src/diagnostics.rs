//! Warning records accumulated while a translation runs
//!
//! Warnings are non-fatal: a construct the pipeline could not translate
//! degrades to a commented passthrough and leaves one of these behind.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Serialize)]
pub struct Warning {
    /// 1-based source line the warning refers to (0 = whole unit).
    pub line: usize,
    pub message: String,
}

impl Warning {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            f.write_str(&self.message)
        } else {
            write!(f, "line {}: {}", self.line, self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display_with_line() {
        let w = Warning::new(4, "unsupported construct");
        assert_eq!(format!("{w}"), "line 4: unsupported construct");
    }

    #[test]
    fn test_warning_display_unit_scope() {
        let w = Warning::new(0, "fallback translator used");
        assert_eq!(format!("{w}"), "fallback translator used");
    }
}
