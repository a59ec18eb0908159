//! Last-resort degradation path
//!
//! When the pipeline cannot produce a program at all (unsupported pair,
//! file-level structure error), the fallback still returns something a
//! human can work from: a valid target shell with every source line kept
//! behind the target's comment marker.

use super::TranslationResult;
use crate::backend::{self, passthrough_lines};
use crate::context::TranslationContext;
use crate::lang::{Language, LanguagePair};

/// Wrap `source` in the target's program shell as comments. Identity
/// pairs return the source untouched.
pub fn fallback_translate(source: &str, source_lang: Language, target: Language) -> TranslationResult {
    if source_lang == target {
        return TranslationResult {
            code: source.to_string(),
            warnings: vec!["source and target are the same language, returning input".to_string()],
        };
    }
    let ctx = TranslationContext::new(LanguagePair::new(source_lang, target));
    let gen = backend::generator_for(target);
    let mut body = Vec::new();
    passthrough_lines(source, target.comment_prefix(), gen.body_depth(), &mut body);
    TranslationResult {
        code: gen.assemble(body, &ctx),
        warnings: vec![format!(
            "translation pipeline unavailable for {source_lang}->{target}, source kept as comments"
        )],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_returns_source() {
        let result = fallback_translate("x = 1\n", Language::Python, Language::Python);
        assert_eq!(result.code, "x = 1\n");
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_commented_shell_for_real_pair() {
        let result = fallback_translate("x = 1\nprint(x)\n", Language::Python, Language::C);
        assert!(result.code.contains("int main(void) {"));
        assert!(result.code.contains("    // x = 1"));
        assert!(result.code.contains("    // print(x)"));
        assert!(result.code.contains("    return 0;"));
    }
}
