use kitchen_agent::agent::{AgentDefinition, McpToolset};
use kitchen_agent::kibana::ToolDefinition;
use kitchen_agent::Settings;
use std::collections::HashMap;

fn settings() -> Settings {
    let vars: HashMap<&str, &str> = [
        ("ES_ENDPOINT", "https://kitchen.es.example.com"),
        ("ES_API_KEY", "c2VjcmV0"),
        ("KIBANA_ENDPOINT", "https://kitchen.kb.example.com/"),
    ]
    .into_iter()
    .collect();

    Settings::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap()
}

#[test]
fn test_agent_uses_the_tool_setup_registers() {
    let settings = settings();
    let agent = AgentDefinition::kitchen_assistant(&settings);
    let registered = ToolDefinition::recipe_semantic_search(
        &settings.agent.tool_id,
        &settings.index.name,
    );

    assert_eq!(agent.tools.len(), 1);
    let toolset: &McpToolset = &agent.tools[0];
    assert_eq!(toolset.tool_filter, vec![registered.id.clone()]);
    assert!(toolset.allows(&registered.id));
    assert_eq!(registered.configuration.pattern, "cooking-recipes");
}

#[test]
fn test_bridge_targets_agent_builder_mcp() {
    let agent = AgentDefinition::kitchen_assistant(&settings());
    let params = &agent.tools[0].connection_params.server_params;

    assert_eq!(params.command, "npx");
    assert_eq!(
        params.remote_url(),
        Some("https://kitchen.kb.example.com/api/agent_builder/mcp")
    );
    assert!(params
        .args
        .contains(&"Authorization:ApiKey c2VjcmV0".to_string()));
}

#[test]
fn test_exported_definition_parses_back() {
    let agent = AgentDefinition::kitchen_assistant(&settings());

    let yaml = agent.to_yaml().unwrap();
    let parsed: AgentDefinition = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(parsed, agent);

    let redacted: AgentDefinition = serde_json::from_str(&agent.redacted().to_json().unwrap()).unwrap();
    assert_eq!(redacted.instruction, agent.instruction);
    assert_ne!(redacted.tools, agent.tools);
}
