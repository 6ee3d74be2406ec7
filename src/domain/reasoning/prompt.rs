//! Query prompt sent to the reasoning model.

/// Template wrapping an operator query. `{query}` is replaced verbatim.
pub const QUERY_PROMPT_TEMPLATE: &str = "
Use your tools to retrieve the most relevant information from the given query.

Query:
{query}
";

/// Renders the prompt for a single query.
pub fn render_query_prompt(query: &str) -> String {
    QUERY_PROMPT_TEMPLATE.replace("{query}", query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_embedded_after_marker() {
        let prompt = render_query_prompt("how do I build an HNSW index?");
        assert!(prompt.contains("Use your tools to retrieve"));
        assert!(prompt.ends_with("Query:\nhow do I build an HNSW index?\n"));
    }

    #[test]
    fn braces_in_query_are_kept() {
        let prompt = render_query_prompt("filter {\"age\": 3}");
        assert!(prompt.contains("filter {\"age\": 3}"));
    }
}
