//! Source primitive type to TypeScript type table.
//!
//! The table is built once per run from [`DEFAULT_TYPES`] merged with user
//! overrides and is never mutated afterwards.

use std::collections::BTreeMap;

/// Target type used when a source type has no entry.
pub const UNKNOWN_TYPE: &str = "unknown";

/// Built-in column type mapping. Synonyms are listed explicitly.
pub const DEFAULT_TYPES: &[(&str, &str)] = &[
    // text-like
    ("string", "string"),
    ("text", "string"),
    ("citext", "string"),
    ("char", "string"),
    ("varchar", "string"),
    ("uuid", "string"),
    ("inet", "string"),
    ("cidr", "string"),
    ("macaddr", "string"),
    ("binary", "string"),
    ("blob", "string"),
    ("enum", "string"),
    // date/time, serialized as ISO strings
    ("date", "string"),
    ("datetime", "string"),
    ("time", "string"),
    ("timestamp", "string"),
    ("timestamptz", "string"),
    // numeric
    ("integer", "number"),
    ("bigint", "number"),
    ("smallint", "number"),
    ("float", "number"),
    ("decimal", "number"),
    ("numeric", "number"),
    ("double", "number"),
    ("real", "number"),
    ("primary_key", "number"),
    ("serial", "number"),
    ("bigserial", "number"),
    ("boolean", "boolean"),
    // structured
    ("json", "Record<string, unknown>"),
    ("jsonb", "Record<string, unknown>"),
    ("hstore", "Record<string, unknown>"),
];

/// Outcome of resolving a source type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved<'a> {
    Known(&'a str),
    Unknown,
}

impl<'a> Resolved<'a> {
    /// The TypeScript type expression, falling back to [`UNKNOWN_TYPE`].
    pub fn ts_type(self) -> &'a str {
        match self {
            Resolved::Known(ty) => ty,
            Resolved::Unknown => UNKNOWN_TYPE,
        }
    }
}

/// Immutable snapshot of the primitive type table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMap {
    entries: BTreeMap<String, String>,
}

impl Default for TypeMap {
    fn default() -> Self {
        Self {
            entries: DEFAULT_TYPES
                .iter()
                .map(|(source, target)| (normalize_key(source), (*target).to_string()))
                .collect(),
        }
    }
}

impl TypeMap {
    /// Defaults merged with `overrides`; an override wins on key collision.
    pub fn with_overrides<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut map = Self::default();
        map.merge(overrides);
        map
    }

    fn merge<I, K, V>(&mut self, overrides: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (source, target) in overrides {
            let target = target.into();
            // An empty target would render `name: ;`, so treat it as unmapped.
            if target.trim().is_empty() {
                self.entries.remove(&normalize_key(source.as_ref()));
                continue;
            }
            self.entries.insert(normalize_key(source.as_ref()), target);
        }
    }

    /// Look up the target type for `source_type`.
    pub fn lookup(&self, source_type: &str) -> Option<&str> {
        self.entries
            .get(&normalize_key(source_type))
            .map(String::as_str)
    }

    pub fn resolve(&self, source_type: &str) -> Resolved<'_> {
        self.lookup(source_type)
            .map_or(Resolved::Unknown, Resolved::Known)
    }

    /// Entries sorted by source type.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(source, target)| (source.as_str(), target.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_lowercase()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_citext_maps_like_text() {
        let map = TypeMap::default();
        assert_eq!(map.lookup("citext"), Some("string"));
        assert_eq!(map.lookup("citext"), map.lookup("text"));
    }

    #[test]
    fn test_defaults_cover_common_kinds() {
        let map = TypeMap::default();
        assert_eq!(map.lookup("integer"), Some("number"));
        assert_eq!(map.lookup("decimal"), Some("number"));
        assert_eq!(map.lookup("boolean"), Some("boolean"));
        assert_eq!(map.lookup("datetime"), Some("string"));
        assert_eq!(map.lookup("uuid"), Some("string"));
        assert_eq!(map.lookup("jsonb"), Some("Record<string, unknown>"));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let map = TypeMap::default();
        assert_eq!(map.lookup("CITEXT"), Some("string"));
        assert_eq!(map.lookup(" Integer "), Some("number"));
    }

    #[test]
    fn test_unknown_resolves_to_sentinel() {
        let map = TypeMap::default();
        let resolved = map.resolve("tsvector");
        assert_eq!(resolved, Resolved::Unknown);
        assert_eq!(resolved.ts_type(), UNKNOWN_TYPE);
        assert!(!resolved.ts_type().is_empty());
    }

    #[test]
    fn test_override_wins() {
        let map = TypeMap::with_overrides([("datetime", "Date"), ("tsvector", "string")]);
        assert_eq!(map.lookup("datetime"), Some("Date"));
        assert_eq!(map.lookup("tsvector"), Some("string"));
        // untouched defaults survive the merge
        assert_eq!(map.lookup("text"), Some("string"));
    }

    #[test]
    fn test_empty_override_unmaps_key() {
        let map = TypeMap::with_overrides([("json", "")]);
        assert_eq!(map.resolve("json"), Resolved::Unknown);
    }

    #[test]
    fn test_iter_is_sorted() {
        let map = TypeMap::default();
        let keys: Vec<_> = map.iter().map(|(k, _)| k).collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        assert_eq!(keys, sorted);
        assert_eq!(map.len(), DEFAULT_TYPES.len());
    }
}
