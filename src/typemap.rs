//! Type Resolution Table
//!
//! Static bidirectional type-name mapping per ordered language pair, plus
//! the pointer/array/string disambiguation heuristics. `map_type` is total:
//! an unrecognized source type resolves to the target's generic object type
//! and never fails.

use crate::lang::{Language, LanguagePair};
use once_cell::sync::Lazy;
use std::collections::HashMap;

type TypeTable = HashMap<&'static str, &'static str>;

static PYTHON_TO_JAVA: Lazy<TypeTable> = Lazy::new(|| {
    HashMap::from([
        ("int", "int"),
        ("float", "double"),
        ("str", "String"),
        ("bool", "boolean"),
    ])
});

static PYTHON_TO_C: Lazy<TypeTable> = Lazy::new(|| {
    HashMap::from([
        ("int", "int"),
        ("float", "double"),
        ("str", "char *"),
        ("bool", "bool"),
    ])
});

static C_TO_JAVA: Lazy<TypeTable> = Lazy::new(|| {
    HashMap::from([
        ("int", "int"),
        ("short", "short"),
        ("long", "long"),
        ("long long", "long"),
        ("unsigned int", "int"),
        ("unsigned long", "long"),
        ("float", "float"),
        ("double", "double"),
        ("char", "char"),
        ("char *", "String"),
        ("bool", "boolean"),
        ("_Bool", "boolean"),
        ("void", "void"),
    ])
});

static C_TO_PYTHON: Lazy<TypeTable> = Lazy::new(|| {
    HashMap::from([
        ("int", "int"),
        ("short", "int"),
        ("long", "int"),
        ("long long", "int"),
        ("unsigned int", "int"),
        ("unsigned long", "int"),
        ("float", "float"),
        ("double", "float"),
        ("char", "str"),
        ("char *", "str"),
        ("bool", "bool"),
        ("_Bool", "bool"),
    ])
});

static JAVA_TO_PYTHON: Lazy<TypeTable> = Lazy::new(|| {
    HashMap::from([
        ("int", "int"),
        ("short", "int"),
        ("long", "int"),
        ("byte", "int"),
        ("float", "float"),
        ("double", "float"),
        ("String", "str"),
        ("char", "str"),
        ("boolean", "bool"),
    ])
});

static JAVA_TO_C: Lazy<TypeTable> = Lazy::new(|| {
    HashMap::from([
        ("int", "int"),
        ("short", "short"),
        ("long", "long"),
        ("byte", "char"),
        ("float", "float"),
        ("double", "double"),
        ("String", "char *"),
        ("char", "char"),
        ("boolean", "bool"),
    ])
});

fn table_for(pair: LanguagePair) -> Option<&'static TypeTable> {
    match (pair.source, pair.target) {
        (Language::Python, Language::Java) => Some(&PYTHON_TO_JAVA),
        (Language::Python, Language::C) => Some(&PYTHON_TO_C),
        (Language::C, Language::Java) => Some(&C_TO_JAVA),
        (Language::C, Language::Python) => Some(&C_TO_PYTHON),
        (Language::Java, Language::Python) => Some(&JAVA_TO_PYTHON),
        (Language::Java, Language::C) => Some(&JAVA_TO_C),
        _ => None,
    }
}

/// The target's generic object type, used for anything unresolved. C has no
/// object type, so `void *` stands in.
pub fn generic_object_type(target: Language) -> &'static str {
    match target {
        Language::Python => "object",
        Language::Java => "Object",
        Language::C => "void *",
    }
}

/// Normalize a source type name: collapse interior whitespace and pull the
/// pointer star into the canonical `T *` spelling.
fn normalize(source_type: &str) -> String {
    let collapsed = source_type.split_whitespace().collect::<Vec<_>>().join(" ");
    if let Some(base) = collapsed.strip_suffix('*') {
        format!("{} *", base.trim_end())
    } else {
        collapsed
    }
}

/// Map a source-language type name to the target-language type name for the
/// given ordered pair. Total: never fails, unknown types become the target's
/// generic object type.
pub fn map_type(source_type: &str, pair: LanguagePair) -> String {
    let key = normalize(source_type);
    if let Some(table) = table_for(pair) {
        if let Some(mapped) = table.get(key.as_str()) {
            return (*mapped).to_string();
        }
    }
    // Pointer to an unmapped base collapses to array-of-base when the base
    // itself maps; otherwise fall through to the generic type.
    if let Some(base) = key.strip_suffix(" *") {
        if let Some(table) = table_for(pair) {
            if let Some(mapped) = table.get(base) {
                return match pair.target {
                    Language::Java => format!("{mapped}[]"),
                    Language::C => format!("{mapped} *"),
                    Language::Python => "list".to_string(),
                };
            }
        }
    }
    generic_object_type(pair.target).to_string()
}

/// Whether a C declaration with this type and initializer shape collapses to
/// the target's native string type: a pointer-to-char or fixed-size char
/// array only ever assigned a string literal.
pub fn collapses_to_string(element_type: &str, initialized_with_string: bool) -> bool {
    let key = normalize(element_type);
    (key == "char *" || key == "char") && initialized_with_string
}

/// Boolean-naming heuristic: integer variables with these names get their
/// 0/1 initializers rendered as target booleans, with the emitted
/// declaration promoted to match. The recorded source type is untouched.
/// Opt out through `TranslationContext::strict_types`.
pub fn is_boolean_like_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.starts_with("is_")
        || lower.starts_with("has_")
        || lower.contains("flag")
        || lower == "enabled"
        || lower == "done"
}

/// Known scalar type names of a source language. Loop-header parsing uses
/// this to accept `int i = 0` as a declaring init and reject typedef'd or
/// user types it cannot map.
pub fn is_known_type(source: Language, name: &str) -> bool {
    let key = normalize(name);
    match source {
        Language::Python => matches!(key.as_str(), "int" | "float" | "str" | "bool"),
        Language::C => matches!(
            key.as_str(),
            "int"
                | "short"
                | "long"
                | "long long"
                | "unsigned int"
                | "unsigned long"
                | "float"
                | "double"
                | "char"
                | "char *"
                | "bool"
                | "_Bool"
                | "void"
        ),
        Language::Java => matches!(
            key.as_str(),
            "int" | "short" | "long" | "byte" | "float" | "double" | "String" | "char" | "boolean"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pair(source: Language, target: Language) -> LanguagePair {
        LanguagePair::new(source, target)
    }

    #[test]
    fn test_python_to_java_scalars() {
        let p = pair(Language::Python, Language::Java);
        assert_eq!(map_type("int", p), "int");
        assert_eq!(map_type("str", p), "String");
        assert_eq!(map_type("bool", p), "boolean");
        assert_eq!(map_type("float", p), "double");
    }

    #[test]
    fn test_char_pointer_to_java_string() {
        let p = pair(Language::C, Language::Java);
        assert_eq!(map_type("char *", p), "String");
        assert_eq!(map_type("char*", p), "String");
        assert_eq!(map_type("char  *", p), "String");
    }

    #[test]
    fn test_unknown_type_maps_to_generic_object() {
        assert_eq!(
            map_type("struct foo", pair(Language::C, Language::Java)),
            "Object"
        );
        assert_eq!(
            map_type("whatever", pair(Language::Java, Language::Python)),
            "object"
        );
        assert_eq!(
            map_type("mystery", pair(Language::Python, Language::C)),
            "void *"
        );
    }

    #[test]
    fn test_pointer_collapses_to_array_of_base() {
        assert_eq!(map_type("int *", pair(Language::C, Language::Java)), "int[]");
        assert_eq!(
            map_type("int *", pair(Language::C, Language::Python)),
            "list"
        );
    }

    #[test]
    fn test_map_type_never_panics_on_garbage() {
        for junk in ["", "***", "int int int", "\u{1F980}"] {
            for &p in &crate::lang::SUPPORTED_PAIRS {
                let _ = map_type(junk, p);
            }
        }
    }

    #[test]
    fn test_boolean_like_names() {
        assert!(is_boolean_like_name("is_valid"));
        assert!(is_boolean_like_name("has_next"));
        assert!(is_boolean_like_name("errorFlag"));
        assert!(is_boolean_like_name("done"));
        assert!(!is_boolean_like_name("count"));
        assert!(!is_boolean_like_name("island"));
    }

    #[test]
    fn test_string_collapse() {
        assert!(collapses_to_string("char *", true));
        assert!(collapses_to_string("char", true));
        assert!(!collapses_to_string("char *", false));
        assert!(!collapses_to_string("int", true));
    }
}
