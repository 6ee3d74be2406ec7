//! Result extractor - scans tool output for `(File: name.md)` clauses.

use once_cell::sync::Lazy;
use regex::Regex;

use super::DocumentReference;
use crate::domain::tools::ToolCallResult;

/// Pattern for a file reference clause: `(File: <letters|digits|_|->.md)`.
pub const FILE_REFERENCE_PATTERN: &str = r"\(File: ([a-zA-Z0-9_\-]+\.md)\)";

static FILE_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(FILE_REFERENCE_PATTERN).expect("file reference pattern is valid"));

/// Extracts document references from raw tool output.
///
/// Returns every non-overlapping match, left to right, without
/// deduplication. A non-text first block yields nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultExtractor;

impl ResultExtractor {
    /// Creates a new extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extracts references from the first content block of a tool result.
    pub fn extract(&self, result: &ToolCallResult) -> Vec<DocumentReference> {
        match result.first_text() {
            Some(text) => self.extract_from_text(text),
            None => Vec::new(),
        }
    }

    /// Extracts references from free text.
    pub fn extract_from_text(&self, text: &str) -> Vec<DocumentReference> {
        FILE_REFERENCE
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| DocumentReference::from_match(m.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tools::ContentBlock;
    use proptest::prelude::*;
    use serde_json::json;

    fn names(refs: &[DocumentReference]) -> Vec<&str> {
        refs.iter().map(DocumentReference::as_str).collect()
    }

    #[test]
    fn extracts_in_order_of_appearance() {
        let result = ToolCallResult::text(
            "1 (File: intro.md): some text 2 (File: query-language.md): more",
        );
        let refs = ResultExtractor::new().extract(&result);
        assert_eq!(names(&refs), vec!["intro.md", "query-language.md"]);
    }

    #[test]
    fn no_clause_yields_empty() {
        let result = ToolCallResult::text("No relevant documents were found for your query.");
        assert!(ResultExtractor::new().extract(&result).is_empty());
    }

    #[test]
    fn non_text_first_block_yields_empty() {
        let result = ToolCallResult::new(vec![
            ContentBlock::Other(json!({"type": "image", "mimeType": "image/png"})),
            ContentBlock::text("1 (File: hidden.md): never read"),
        ]);
        assert!(ResultExtractor::new().extract(&result).is_empty());
    }

    #[test]
    fn empty_content_yields_empty() {
        assert!(ResultExtractor::new()
            .extract(&ToolCallResult::default())
            .is_empty());
    }

    #[test]
    fn only_first_text_block_is_scanned() {
        let result = ToolCallResult::new(vec![
            ContentBlock::text("(File: first.md)"),
            ContentBlock::text("(File: second.md)"),
        ]);
        assert_eq!(names(&ResultExtractor::new().extract(&result)), vec!["first.md"]);
    }

    #[test]
    fn duplicates_are_kept() {
        let refs = ResultExtractor::new()
            .extract_from_text("(File: a.md) then (File: b.md) then (File: a.md)");
        assert_eq!(names(&refs), vec!["a.md", "b.md", "a.md"]);
    }

    #[test]
    fn rejects_names_outside_the_character_set() {
        let refs = ResultExtractor::new().extract_from_text(
            "(File: has space.md) (File: dir/nested.md) (File: notes.txt) (File: ok_name-2.md)",
        );
        assert_eq!(names(&refs), vec!["ok_name-2.md"]);
    }

    #[test]
    fn requires_closing_parenthesis_right_after_extension() {
        let refs = ResultExtractor::new().extract_from_text("(File: intro.md, score 0.9)");
        assert!(refs.is_empty());
    }

    proptest! {
        #[test]
        fn finds_every_embedded_file_name(
            stems in prop::collection::vec("[a-zA-Z0-9_-]{1,24}", 0..8),
            filler in "[a-z ]{0,40}",
        ) {
            let text: String = stems
                .iter()
                .enumerate()
                .map(|(i, stem)| format!("{} (File: {}.md): {}\n", i + 1, stem, filler))
                .collect();

            let refs = ResultExtractor::new().extract_from_text(&text);
            let expected: Vec<String> = stems.iter().map(|s| format!("{}.md", s)).collect();
            let actual: Vec<String> = refs.into_iter().map(DocumentReference::into_inner).collect();
            prop_assert_eq!(actual, expected);
        }

        #[test]
        fn never_panics_on_arbitrary_text(text in ".*") {
            let _ = ResultExtractor::new().extract_from_text(&text);
        }
    }
}
