use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Path under the Kibana endpoint where Agent Builder speaks MCP
pub const AGENT_BUILDER_MCP_PATH: &str = "/api/agent_builder/mcp";

const REDACTED: &str = "ApiKey <redacted>";

/// Process the hosting runtime launches to reach the tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StdioServerParameters {
    pub command: String,
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StdioConnectionParams {
    pub server_params: StdioServerParameters,
    pub timeout_seconds: u64,
}

/// A set of MCP tools reached through one stdio connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpToolset {
    pub connection_params: StdioConnectionParams,
    /// Tool names exposed to the agent; empty means all
    pub tool_filter: Vec<String>,
}

impl StdioServerParameters {
    /// `mcp-remote` proxying stdio to a remote MCP endpoint with a header
    pub fn mcp_remote(command: &str, endpoint: &str, authorization: &str) -> Self {
        Self {
            command: command.to_string(),
            args: vec![
                "-y".to_string(),
                "mcp-remote".to_string(),
                endpoint.to_string(),
                "--header".to_string(),
                format!("Authorization:{authorization}"),
            ],
            env: BTreeMap::new(),
        }
    }

    /// Copy with any authorization header value masked
    pub fn redacted(&self) -> Self {
        let args = self
            .args
            .iter()
            .map(|arg| {
                if arg.starts_with("Authorization:") {
                    format!("Authorization:{REDACTED}")
                } else {
                    arg.clone()
                }
            })
            .collect();

        Self {
            command: self.command.clone(),
            args,
            env: self.env.clone(),
        }
    }

    /// Remote URL the bridge connects to, if present in the arguments
    pub fn remote_url(&self) -> Option<&str> {
        self.args
            .iter()
            .map(String::as_str)
            .find(|a| a.starts_with("http://") || a.starts_with("https://"))
    }
}

impl McpToolset {
    /// Toolset reaching Agent Builder through `mcp-remote`
    pub fn agent_builder(
        command: &str,
        kibana_endpoint: &str,
        authorization: &str,
        timeout_seconds: u64,
        tool_filter: Vec<String>,
    ) -> Self {
        let endpoint = format!("{kibana_endpoint}{AGENT_BUILDER_MCP_PATH}");

        Self {
            connection_params: StdioConnectionParams {
                server_params: StdioServerParameters::mcp_remote(command, &endpoint, authorization),
                timeout_seconds,
            },
            tool_filter,
        }
    }

    /// Whether the filter lets this tool through
    pub fn allows(&self, tool_name: &str) -> bool {
        self.tool_filter.is_empty() || self.tool_filter.iter().any(|t| t == tool_name)
    }

    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.connection_params.server_params = self.connection_params.server_params.redacted();
        copy
    }
}
