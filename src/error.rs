//! Error types for the Triglot translator

use thiserror::Error;

/// Main error type for Triglot
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("Unsupported language pair: {source_lang} -> {target_lang} (supported: {supported})")]
    UnsupportedPair {
        source_lang: String,
        target_lang: String,
        supported: String,
    },

    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("Expression error: {message}")]
    ExprError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TranslateError>;
