//! Language identifiers and the supported-pair table

use crate::error::TranslateError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Languages the translator understands, as source or target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    C,
    Java,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::C => "c",
            Language::Java => "java",
        }
    }

    /// Line-comment prefix in this language's concrete syntax.
    pub fn comment_prefix(&self) -> &'static str {
        match self {
            Language::Python => "#",
            Language::C | Language::Java => "//",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Language> {
        match ext {
            "py" => Some(Language::Python),
            "c" | "h" => Some(Language::C),
            "java" => Some(Language::Java),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(Language::Python),
            "c" => Ok(Language::C),
            "java" => Ok(Language::Java),
            other => Err(format!("unknown language: {other}")),
        }
    }
}

/// One ordered source->target combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LanguagePair {
    pub source: Language,
    pub target: Language,
}

impl LanguagePair {
    pub fn new(source: Language, target: Language) -> Self {
        Self { source, target }
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.source, self.target)
    }
}

/// The six ordered pairs the pipeline supports. There is no implicit
/// chaining through an intermediate pair.
pub const SUPPORTED_PAIRS: [LanguagePair; 6] = [
    LanguagePair { source: Language::Python, target: Language::Java },
    LanguagePair { source: Language::C, target: Language::Java },
    LanguagePair { source: Language::Java, target: Language::Python },
    LanguagePair { source: Language::C, target: Language::Python },
    LanguagePair { source: Language::Java, target: Language::C },
    LanguagePair { source: Language::Python, target: Language::C },
];

pub fn is_supported(pair: LanguagePair) -> bool {
    SUPPORTED_PAIRS.contains(&pair)
}

pub fn supported_pairs_text() -> String {
    SUPPORTED_PAIRS
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validate a pair before any parsing happens.
pub fn check_pair(pair: LanguagePair) -> Result<LanguagePair, TranslateError> {
    if is_supported(pair) {
        Ok(pair)
    } else {
        Err(TranslateError::UnsupportedPair {
            source_lang: pair.source.to_string(),
            target_lang: pair.target.to_string(),
            supported: supported_pairs_text(),
        })
    }
}
