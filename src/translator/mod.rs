//! Translation orchestrator
//!
//! Owns one run end to end: validate the pair, canonicalize the source,
//! render the body at the target shell's depth, tidy the rendered lines,
//! then assemble the shell with whatever imports generation flagged.

use crate::backend;
use crate::context::TranslationContext;
use crate::error::Result;
use crate::frontend::Frontend;
use crate::lang::{check_pair, LanguagePair};

pub mod fallback;

/// Rendered program plus the warnings accumulated while producing it.
#[derive(Debug, Clone)]
pub struct TranslationResult {
    pub code: String,
    pub warnings: Vec<String>,
}

#[derive(Debug)]
pub struct Translator {
    pair: LanguagePair,
}

impl Translator {
    /// Rejects unsupported pairs up front, before any parsing.
    pub fn new(pair: LanguagePair) -> Result<Self> {
        Ok(Self { pair: check_pair(pair)? })
    }

    pub fn pair(&self) -> LanguagePair {
        self.pair
    }

    pub fn translate(&self, source: &str) -> Result<TranslationResult> {
        let mut ctx = TranslationContext::new(self.pair);
        self.translate_with(source, &mut ctx)
    }

    /// Same as `translate` but on a caller-prepared context, so flags like
    /// `strict_types` can be set first.
    pub fn translate_with(
        &self,
        source: &str,
        ctx: &mut TranslationContext,
    ) -> Result<TranslationResult> {
        let frontend = Frontend::new(self.pair.source);
        let stmts = frontend.parse_program(source, ctx)?;

        let gen = backend::generator_for(self.pair.target);
        let mut body = Vec::new();
        backend::generate_block(gen.as_ref(), &stmts, ctx, gen.body_depth(), &mut body);
        let body = reconcile(body);

        let code = gen.assemble(body, ctx);
        Ok(TranslationResult {
            code,
            warnings: ctx.warning_messages(),
        })
    }
}

/// Tidy the rendered body: drop leading and trailing blank lines and
/// collapse every interior run of two or more blanks to exactly one.
fn reconcile(lines: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    for line in lines {
        if line.trim().is_empty() {
            if out.is_empty() || out.last().map(|l| l.trim().is_empty()).unwrap_or(false) {
                continue;
            }
            out.push(String::new());
        } else {
            out.push(line);
        }
    }
    while out.last().map(|l| l.trim().is_empty()).unwrap_or(false) {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TranslateError;
    use crate::lang::Language;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reconcile_collapses_blank_runs() {
        let lines = vec![
            String::new(),
            "a".to_string(),
            String::new(),
            String::new(),
            String::new(),
            "b".to_string(),
            String::new(),
        ];
        assert_eq!(
            reconcile(lines),
            vec!["a".to_string(), String::new(), "b".to_string()]
        );
    }

    #[test]
    fn test_identity_pair_rejected() {
        let err = Translator::new(LanguagePair::new(Language::Java, Language::Java)).unwrap_err();
        assert!(matches!(err, TranslateError::UnsupportedPair { .. }));
    }

    #[test]
    fn test_python_to_c_program() {
        let translator =
            Translator::new(LanguagePair::new(Language::Python, Language::C)).unwrap();
        let result = translator.translate("x = 10\nprint(x)\n").unwrap();
        assert_eq!(
            result.code,
            "#include <stdio.h>\n\nint main(void) {\n    int x = 10;\n    printf(\"%d\\n\", x);\n    return 0;\n}\n"
        );
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_warnings_surface_in_result() {
        let translator =
            Translator::new(LanguagePair::new(Language::Python, Language::Java)).unwrap();
        let result = translator.translate("with open(\"f\") as f:\n    pass\n").unwrap();
        assert!(!result.warnings.is_empty());
        assert!(result.code.contains("//"));
    }
}
