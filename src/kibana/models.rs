use serde::{Deserialize, Serialize};

/// Description attached to the recipe search tool
pub const RECIPE_TOOL_DESCRIPTION: &str = "Search kitchen recipes including ingredients, \
allergens, dietary restrictions, preparation procedures, and cooking times. Uses semantic \
search to find relevant recipes even without exact keyword matches.";

/// Agent Builder tool registration payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub id: String,
    #[serde(rename = "type")]
    pub tool_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub configuration: ToolConfiguration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolConfiguration {
    /// Index pattern searched by an `index_search` tool
    pub pattern: String,
}

impl ToolDefinition {
    /// An `index_search` tool over `index_pattern`
    pub fn index_search(id: impl Into<String>, index_pattern: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tool_type: "index_search".to_string(),
            description: None,
            tags: Vec::new(),
            configuration: ToolConfiguration {
                pattern: index_pattern.into(),
            },
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// The semantic recipe search tool the kitchen agent is bound to
    pub fn recipe_semantic_search(tool_id: &str, index_name: &str) -> Self {
        Self::index_search(tool_id, index_name)
            .with_description(RECIPE_TOOL_DESCRIPTION)
            .with_tag("semantic")
    }
}

/// Result of an idempotent tool registration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ToolOutcome {
    Created,
    AlreadyExists,
    Rejected { status: u16, body: String },
}

impl ToolOutcome {
    /// Classify a registration response.
    ///
    /// A 400 whose body mentions "already exists" is the platform's way of
    /// reporting a duplicate id.
    pub fn from_response(status: u16, body: &str) -> Self {
        match status {
            200 => ToolOutcome::Created,
            400 if body.to_lowercase().contains("already exists") => ToolOutcome::AlreadyExists,
            _ => ToolOutcome::Rejected {
                status,
                body: body.to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ToolOutcome::Created | ToolOutcome::AlreadyExists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recipe_tool_payload() {
        let tool = ToolDefinition::recipe_semantic_search("recipe_semantic_search", "cooking-recipes");
        let value = serde_json::to_value(&tool).unwrap();

        assert_eq!(value["id"], "recipe_semantic_search");
        assert_eq!(value["type"], "index_search");
        assert_eq!(value["tags"], json!(["semantic"]));
        assert_eq!(value["configuration"]["pattern"], "cooking-recipes");
        assert!(value["description"].as_str().unwrap().starts_with("Search kitchen recipes"));
    }

    #[test]
    fn test_minimal_payload_omits_optional_fields() {
        let value = serde_json::to_value(ToolDefinition::index_search("t", "idx-*")).unwrap();
        assert!(value.get("description").is_none());
        assert!(value.get("tags").is_none());
    }

    #[test]
    fn test_outcome_from_response() {
        assert_eq!(ToolOutcome::from_response(200, "{}"), ToolOutcome::Created);
        assert_eq!(
            ToolOutcome::from_response(400, r#"{"message":"Tool recipe_semantic_search Already Exists"}"#),
            ToolOutcome::AlreadyExists
        );
        assert!(!ToolOutcome::from_response(400, "invalid pattern").is_success());
        assert!(!ToolOutcome::from_response(500, "already exists").is_success());
    }
}
