pub mod bridge;
pub mod toolset;

pub use bridge::{BridgeProcess, McpSession, ToolInfo};
pub use toolset::{McpToolset, StdioConnectionParams, StdioServerParameters};

use crate::config::Settings;
use serde::{Deserialize, Serialize};

pub const AGENT_NAME: &str = "kitchen_assistant_agent";

pub const INSTRUCTION: &str = "You are a kitchen assistant that helps chefs during busy dinner service.
You can answer questions about recipes.

Use the Elasticsearch tools to search the cooking-recipes index and provide quick answers like:
- Does a dish contain specific allergens (e.g., shellfish)?
- Recipes that can be prepared with given ingredients
- I would like to prepare a seafood dish
- Find recipes by category or dietary restrictions

Always be concise and practical - chefs need quick answers!";

/// Chat agent handed to the hosting runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDefinition {
    pub name: String,
    pub model: String,
    pub instruction: String,
    pub tools: Vec<McpToolset>,
}

impl AgentDefinition {
    /// The kitchen assistant, bound to the recipe search tool only
    pub fn kitchen_assistant(settings: &Settings) -> Self {
        let toolset = McpToolset::agent_builder(
            &settings.agent.mcp_command,
            &settings.kibana.endpoint,
            &settings.auth_header(),
            settings.http.timeout_seconds,
            vec![settings.agent.tool_id.clone()],
        );

        Self {
            name: AGENT_NAME.to_string(),
            model: settings.agent.model.clone(),
            instruction: INSTRUCTION.replace("cooking-recipes", &settings.index.name),
            tools: vec![toolset],
        }
    }

    /// Copy safe to print or commit
    pub fn redacted(&self) -> Self {
        Self {
            tools: self.tools.iter().map(McpToolset::redacted).collect(),
            ..self.clone()
        }
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml(&self) -> crate::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
