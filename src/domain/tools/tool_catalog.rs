//! Tool catalog - the ordered set of tools available in a session.

use serde::{Deserialize, Serialize};

use super::ToolDescriptor;

/// Ordered collection of tool descriptors.
///
/// Order is the backend's declared order and is preserved when the catalog
/// is presented to the model. Descriptors are immutable once fetched; a
/// refresh replaces the whole catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCatalog {
    tools: Vec<ToolDescriptor>,
}

impl ToolCatalog {
    /// Creates a catalog from discovered descriptors.
    ///
    /// A repeated name keeps its first occurrence.
    pub fn new(tools: Vec<ToolDescriptor>) -> Self {
        let mut unique: Vec<ToolDescriptor> = Vec::with_capacity(tools.len());
        for tool in tools {
            if unique.iter().any(|t| t.name() == tool.name()) {
                tracing::warn!(tool = tool.name(), "Backend declared duplicate tool name, ignoring");
                continue;
            }
            unique.push(tool);
        }
        Self { tools: unique }
    }

    /// Returns the descriptors in backend order.
    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    /// Returns the tool names in backend order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(ToolDescriptor::name).collect()
    }

    /// Looks up a tool by name.
    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Check if a tool exists.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns true if the backend offers no tools.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Tool list in the shape the Anthropic messages API expects.
    pub fn to_anthropic_format(&self) -> Vec<serde_json::Value> {
        self.tools
            .iter()
            .map(ToolDescriptor::to_anthropic_format)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tool(name: &str) -> ToolDescriptor {
        ToolDescriptor::new(name, format!("{} tool", name), json!({"type": "object"}))
    }

    #[test]
    fn preserves_backend_order() {
        let catalog = ToolCatalog::new(vec![tool("zeta"), tool("alpha"), tool("mid")]);
        assert_eq!(catalog.names(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn duplicate_names_keep_first() {
        let first = ToolDescriptor::new("search", "first", json!({}));
        let second = ToolDescriptor::new("search", "second", json!({}));
        let catalog = ToolCatalog::new(vec![first, second]);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("search").unwrap().description(), "first");
    }

    #[test]
    fn lookup_by_name() {
        let catalog = ToolCatalog::new(vec![tool("search")]);
        assert!(catalog.contains("search"));
        assert!(!catalog.contains("missing"));
    }

    #[test]
    fn default_is_empty() {
        assert!(ToolCatalog::default().is_empty());
    }

    #[test]
    fn anthropic_format_matches_order() {
        let catalog = ToolCatalog::new(vec![tool("b"), tool("a")]);
        let tools = catalog.to_anthropic_format();
        assert_eq!(tools[0]["name"], "b");
        assert_eq!(tools[1]["name"], "a");
    }
}
