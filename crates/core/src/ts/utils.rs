//! Identifier and property-key helpers.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Words that cannot name a namespace or interface.
pub static TS_RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete",
        "do", "else", "enum", "export", "extends", "false", "finally", "for", "function", "if",
        "import", "in", "instanceof", "new", "null", "return", "super", "switch", "this",
        "throw", "true", "try", "typeof", "var", "void", "while", "with",
        // strict mode and contextual
        "yield", "let", "static", "implements", "interface", "package", "private", "protected",
        "public", "await", "async",
    ]
    .into_iter()
    .collect()
});

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Whether `key` must be written as a string literal in an object type.
pub fn needs_quoting(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if is_ident_start(first) => !chars.all(is_ident_continue),
        _ => true,
    }
}

/// Whether `name` can be used as a declaration name.
pub fn is_ts_identifier(name: &str) -> bool {
    !needs_quoting(name) && !TS_RESERVED_WORDS.contains(name)
}

/// Property key as written in generated code, e.g. `"first-name"`.
pub fn quote_if_needed(key: &str) -> String {
    if needs_quoting(key) {
        let escaped = key.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{escaped}\"")
    } else {
        key.to_string()
    }
}

/// `song_ids` -> `songIds`. Leading underscores are kept.
pub fn to_camel_case(name: &str) -> String {
    let body = name.trim_start_matches('_');
    let mut result = name[..name.len() - body.len()].to_string();

    for (i, word) in body.split('_').filter(|w| !w.is_empty()).enumerate() {
        let mut chars = word.chars();
        match chars.next() {
            Some(first) if i > 0 => {
                result.extend(first.to_uppercase());
                result.push_str(chars.as_str());
            }
            _ => result.push_str(word),
        }
    }
    result
}
