//! Document reference - a source file name extracted from tool output.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A bare file name such as `query-language.md`.
///
/// Only produced by [`super::ResultExtractor`]; there is no public
/// constructor that bypasses the pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentReference(String);

impl DocumentReference {
    pub(super) fn from_match(file_name: &str) -> Self {
        Self(file_name.to_string())
    }

    /// Returns the file name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the reference and returns the file name.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for DocumentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for DocumentReference {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Drops repeated references, keeping the first occurrence of each.
pub fn dedupe_preserving_order(references: Vec<DocumentReference>) -> Vec<DocumentReference> {
    let mut seen = HashSet::with_capacity(references.len());
    references
        .into_iter()
        .filter(|reference| seen.insert(reference.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs(names: &[&str]) -> Vec<DocumentReference> {
        names.iter().map(|n| DocumentReference::from_match(n)).collect()
    }

    #[test]
    fn dedupe_keeps_first_occurrence_order() {
        let deduped = dedupe_preserving_order(refs(&["b.md", "a.md", "b.md", "c.md", "a.md"]));
        let names: Vec<_> = deduped.iter().map(DocumentReference::as_str).collect();
        assert_eq!(names, vec!["b.md", "a.md", "c.md"]);
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&DocumentReference::from_match("intro.md")).unwrap();
        assert_eq!(json, "\"intro.md\"");
    }
}
