use tsbind_common::{is_reserved, sanitize_identifier};

#[test]
fn control_flow_keywords_are_reserved() {
    for word in ["if", "while", "return", "switch", "default"] {
        assert!(is_reserved(word), "{word} should be reserved");
    }
}

#[test]
fn modifier_words_are_reserved() {
    for word in ["readonly", "declare", "namespace", "static"] {
        assert!(is_reserved(word), "{word} should be reserved");
    }
}

#[test]
fn sanitized_form_is_never_reserved() {
    for word in ["class", "number", "Delegate", "yield"] {
        let (sanitized, changed) = sanitize_identifier(word);
        assert!(changed);
        assert!(!is_reserved(&sanitized), "{sanitized} leaked into the set");
    }
}

#[test]
fn injective_on_reserved_inputs() {
    // Distinct reserved words map to distinct sanitized names.
    let mut seen = std::collections::BTreeSet::new();
    for word in ["for", "in", "of", "as", "do"] {
        let (sanitized, _) = sanitize_identifier(word);
        assert!(seen.insert(sanitized));
    }
}
