//! Triglot: source-to-source translation among Python, C and Java
//!
//! The pipeline canonicalizes a source program into a language-neutral
//! statement list, then renders it in the target language:
//!
//! ```text
//! source text -> syntax (native blocks) -> frontend (canonical AST)
//!             -> backend (target lines) -> translator (shell assembly)
//! ```
//!
//! [`translate`] runs the pipeline for one of the six supported ordered
//! pairs; [`translate_or_fallback`] additionally degrades to a commented
//! shell when the pipeline cannot run at all.

pub mod ast;
pub mod backend;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod frontend;
pub mod lang;
pub mod syntax;
pub mod translator;
pub mod typemap;

use serde::Serialize;

pub use crate::error::{Result, TranslateError};
pub use crate::lang::{Language, LanguagePair, SUPPORTED_PAIRS};
pub use crate::translator::{TranslationResult, Translator};

/// Outcome of one translation call, shaped for direct serialization.
#[derive(Debug, Clone, Serialize)]
pub struct TranslationOutcome {
    pub success: bool,
    pub translated_code: Option<String>,
    pub warnings: Vec<String>,
    pub error: Option<String>,
    /// Which path produced the result: "pipeline" or "fallback".
    pub service_used: String,
}

impl TranslationOutcome {
    fn pipeline_ok(result: TranslationResult) -> Self {
        Self {
            success: true,
            translated_code: Some(result.code),
            warnings: result.warnings,
            error: None,
            service_used: "pipeline".to_string(),
        }
    }

    fn pipeline_err(err: TranslateError) -> Self {
        Self {
            success: false,
            translated_code: None,
            warnings: Vec::new(),
            error: Some(err.to_string()),
            service_used: "pipeline".to_string(),
        }
    }
}

/// Translate `source_code` from `source` to `target` through the full
/// pipeline. Per-construct problems degrade to warnings inside a
/// successful outcome; unsupported pairs and file-level structure errors
/// fail the call.
pub fn translate(source_code: &str, source: Language, target: Language) -> TranslationOutcome {
    let translator = match Translator::new(LanguagePair::new(source, target)) {
        Ok(t) => t,
        Err(err) => return TranslationOutcome::pipeline_err(err),
    };
    match translator.translate(source_code) {
        Ok(result) => TranslationOutcome::pipeline_ok(result),
        Err(err) => TranslationOutcome::pipeline_err(err),
    }
}

/// Like [`translate`], but never fails: when the pipeline cannot produce
/// a program, the source is returned inside a commented target shell and
/// the pipeline error joins the warnings.
pub fn translate_or_fallback(
    source_code: &str,
    source: Language,
    target: Language,
) -> TranslationOutcome {
    let attempt = translate(source_code, source, target);
    if attempt.success {
        return attempt;
    }
    let mut result = translator::fallback::fallback_translate(source_code, source, target);
    if let Some(error) = attempt.error {
        result.warnings.insert(0, error);
    }
    TranslationOutcome {
        success: true,
        translated_code: Some(result.code),
        warnings: result.warnings,
        error: None,
        service_used: "fallback".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_reports_service() {
        let outcome = translate("x = 1\n", Language::Python, Language::Java);
        assert!(outcome.success);
        assert_eq!(outcome.service_used, "pipeline");
        assert!(outcome.translated_code.unwrap().contains("int x = 1;"));
    }

    #[test]
    fn test_unsupported_pair_fails_closed() {
        let outcome = translate("x = 1\n", Language::Python, Language::Python);
        assert!(!outcome.success);
        assert!(outcome.translated_code.is_none());
        assert!(outcome.error.unwrap().contains("Unsupported language pair"));
    }

    #[test]
    fn test_fallback_rescues_structure_error() {
        // Unbalanced brace is a file-level parse error for the pipeline.
        let outcome = translate_or_fallback("int x = 1; {\n", Language::C, Language::Python);
        assert!(outcome.success);
        assert_eq!(outcome.service_used, "fallback");
        assert!(outcome.warnings.iter().any(|w| w.contains("Parse error")));
    }
}
