//! Per-translation mutable state
//!
//! One context is created per translation call, threaded through every
//! parser and generator, and discarded after assembly. Nothing is shared
//! between calls.

use crate::diagnostics::Warning;
use crate::lang::LanguagePair;
use std::collections::{BTreeSet, HashMap};

/// Information recorded when a variable is first declared.
#[derive(Debug, Clone)]
pub struct VarInfo {
    pub name: String,
    /// Type name as written in the source language.
    pub declared_type: String,
    pub is_array: bool,
}

/// Mutable translation-run state: variable bindings, one-shot generation
/// flags and accumulated warnings.
///
/// The supported subset has a flat scope per translation unit: a binding,
/// once created, is never retyped, only looked up.
#[derive(Debug)]
pub struct TranslationContext {
    pub pair: LanguagePair,
    variables: HashMap<String, VarInfo>,
    /// Includes/imports the generated program needs; consulted once by the
    /// orchestrator at final assembly. BTreeSet for stable output order.
    imports: BTreeSet<String>,
    warnings: Vec<Warning>,
    /// Disables the boolean-name heuristic for callers that need exact
    /// type fidelity.
    pub strict_types: bool,
}

impl TranslationContext {
    pub fn new(pair: LanguagePair) -> Self {
        Self {
            pair,
            variables: HashMap::new(),
            imports: BTreeSet::new(),
            warnings: Vec::new(),
            strict_types: false,
        }
    }

    /// Record a variable binding. A name already bound keeps its original
    /// type: declare once, never retype.
    pub fn add_variable(&mut self, name: &str, declared_type: &str, is_array: bool) {
        self.variables.entry(name.to_string()).or_insert(VarInfo {
            name: name.to_string(),
            declared_type: declared_type.to_string(),
            is_array,
        });
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Declared source-language type of `name`, if bound.
    pub fn variable_type(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(|v| v.declared_type.as_str())
    }

    pub fn is_array(&self, name: &str) -> bool {
        self.variables.get(name).map(|v| v.is_array).unwrap_or(false)
    }

    /// One-shot flag: the emitted program needs this include/import line.
    pub fn require_import(&mut self, import: &str) {
        self.imports.insert(import.to_string());
    }

    pub fn imports(&self) -> impl Iterator<Item = &str> {
        self.imports.iter().map(|s| s.as_str())
    }

    pub fn warn(&mut self, line: usize, message: impl Into<String>) {
        self.warnings.push(Warning::new(line, message));
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(|w| w.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::{Language, LanguagePair};

    fn ctx() -> TranslationContext {
        TranslationContext::new(LanguagePair::new(Language::Python, Language::Java))
    }

    #[test]
    fn test_declare_once_never_retype() {
        let mut ctx = ctx();
        ctx.add_variable("x", "int", false);
        ctx.add_variable("x", "str", false);
        assert_eq!(ctx.variable_type("x"), Some("int"));
    }

    #[test]
    fn test_unknown_variable() {
        let ctx = ctx();
        assert!(!ctx.has_variable("y"));
        assert_eq!(ctx.variable_type("y"), None);
        assert!(!ctx.is_array("y"));
    }

    #[test]
    fn test_imports_are_deduplicated_and_ordered() {
        let mut ctx = ctx();
        ctx.require_import("<stdio.h>");
        ctx.require_import("<stdbool.h>");
        ctx.require_import("<stdio.h>");
        let imports: Vec<_> = ctx.imports().collect();
        assert_eq!(imports, vec!["<stdbool.h>", "<stdio.h>"]);
    }

    #[test]
    fn test_warnings_render_with_line() {
        let mut ctx = ctx();
        ctx.warn(3, "no translator for construct");
        assert_eq!(
            ctx.warning_messages(),
            vec!["line 3: no translator for construct".to_string()]
        );
    }
}
