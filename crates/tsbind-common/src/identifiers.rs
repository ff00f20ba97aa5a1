//! Reserved-identifier handling for emitted names.
//!
//! The target type system rejects its keywords, primitive type names,
//! and modifier words as declaration identifiers. The sanitizer appends
//! exactly one trailing underscore to a reserved request; the result is
//! never itself reserved, so sanitation is idempotent and injective on
//! reserved inputs.

use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;

static RESERVED: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    let mut set = FxHashSet::default();
    // Control-flow and declaration keywords
    for word in [
        "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete",
        "do", "else", "enum", "export", "extends", "false", "finally", "for", "function", "if",
        "import", "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw",
        "true", "try", "typeof", "var", "void", "while", "with",
    ] {
        set.insert(word);
    }
    // Strict-mode and contextual modifier words
    for word in [
        "as", "async", "await", "declare", "from", "get", "implements", "interface", "let",
        "module", "namespace", "of", "package", "private", "protected", "public", "readonly",
        "require", "set", "static", "type", "yield",
    ] {
        set.insert(word);
    }
    // Primitive and built-in type names
    for word in [
        "any", "bigint", "boolean", "never", "number", "object", "string", "symbol", "undefined",
        "unknown",
    ] {
        set.insert(word);
    }
    // Names claimed by the binding runtime support module
    for word in ["Delegate", "Enum", "ValueType"] {
        set.insert(word);
    }
    set
});

/// Whether `name` cannot be used verbatim as an emitted identifier.
#[must_use]
pub fn is_reserved(name: &str) -> bool {
    RESERVED.contains(name)
}

/// Sanitize a requested identifier against the reserved set.
///
/// Returns the final identifier and whether sanitation fired. Appends
/// exactly one trailing underscore; `delete` → `delete_`, and a second
/// application leaves `delete_` unchanged.
#[must_use]
pub fn sanitize_identifier(raw: &str) -> (String, bool) {
    if is_reserved(raw) {
        (format!("{raw}_"), true)
    } else {
        (raw.to_string(), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_sanitized() {
        assert_eq!(sanitize_identifier("delete"), ("delete_".to_string(), true));
        assert_eq!(sanitize_identifier("default"), ("default_".to_string(), true));
        assert_eq!(sanitize_identifier("number"), ("number_".to_string(), true));
    }

    #[test]
    fn runtime_globals_are_sanitized() {
        assert_eq!(
            sanitize_identifier("Delegate"),
            ("Delegate_".to_string(), true)
        );
    }

    #[test]
    fn ordinary_names_pass_through() {
        assert_eq!(
            sanitize_identifier("GetEnumerator"),
            ("GetEnumerator".to_string(), false)
        );
    }

    #[test]
    fn sanitation_is_idempotent() {
        let (once, changed) = sanitize_identifier("void");
        assert!(changed);
        let (twice, changed_again) = sanitize_identifier(&once);
        assert!(!changed_again);
        assert_eq!(once, twice);
    }
}
