//! Conversation tool capabilities
//!
//! The xAI chat API exposes a small set of server-side tools that are
//! enabled per request. A conversation carries its active subset; the
//! selection UI replaces the whole set at once.

use serde::{Deserialize, Serialize};

/// A server-side tool the model may use during a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    WebSearch,
    XSearch,
    CodeExecution,
    CollectionsSearch,
}

impl ToolKind {
    /// Every tool the gateway knows about, in display order
    pub const ALL: [ToolKind; 4] = [
        ToolKind::WebSearch,
        ToolKind::XSearch,
        ToolKind::CodeExecution,
        ToolKind::CollectionsSearch,
    ];

    /// Wire name used by the API and by select-menu values
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::WebSearch => "web_search",
            ToolKind::XSearch => "x_search",
            ToolKind::CodeExecution => "code_execution",
            ToolKind::CollectionsSearch => "collections_search",
        }
    }

    /// Human-readable label for UI menus
    pub fn label(self) -> &'static str {
        match self {
            ToolKind::WebSearch => "Web Search",
            ToolKind::XSearch => "X Search",
            ToolKind::CodeExecution => "Code Execution",
            ToolKind::CollectionsSearch => "Collections Search",
        }
    }

    /// Short description for UI menus
    pub fn description(self) -> &'static str {
        match self {
            ToolKind::WebSearch => "Search the web in real time.",
            ToolKind::XSearch => "Search X posts and threads.",
            ToolKind::CodeExecution => "Run Python code in a sandbox.",
            ToolKind::CollectionsSearch => "Search configured collections.",
        }
    }

    /// Parse a wire name; unknown names yield `None`
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    /// Wire form attached to chat requests
    pub fn spec(self) -> ToolSpec {
        ToolSpec {
            kind: self.name().to_string(),
        }
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Wire form of a server-side tool: `{"type": "<name>"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSpec {
    #[serde(rename = "type")]
    pub kind: String,
}

/// Resolve a list of selected names to known tools.
///
/// Unrecognized names are silently dropped; duplicates collapse to the
/// first occurrence. Input order is preserved.
pub fn filter_known<I, S>(names: I) -> Vec<ToolKind>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tools = Vec::new();
    for name in names {
        if let Some(tool) = ToolKind::from_name(name.as_ref()) {
            if !tools.contains(&tool) {
                tools.push(tool);
            }
        }
    }
    tools
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_round_trip() {
        for tool in ToolKind::ALL {
            assert_eq!(ToolKind::from_name(tool.name()), Some(tool));
        }
    }

    #[test]
    fn test_from_name_unknown() {
        assert_eq!(ToolKind::from_name("telepathy"), None);
        assert_eq!(ToolKind::from_name(""), None);
    }

    #[test]
    fn test_filter_known_drops_unrecognized() {
        let tools = filter_known(["web_search", "telepathy", "x_search"]);
        assert_eq!(tools, vec![ToolKind::WebSearch, ToolKind::XSearch]);
    }

    #[test]
    fn test_filter_known_dedups() {
        let tools = filter_known(["code_execution", "code_execution"]);
        assert_eq!(tools, vec![ToolKind::CodeExecution]);
    }

    #[test]
    fn test_spec_serialization() {
        let json = serde_json::to_string(&ToolKind::WebSearch.spec()).unwrap();
        assert_eq!(json, r#"{"type":"web_search"}"#);
    }
}
