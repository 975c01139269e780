use crate::config::Settings;
use crate::kibana::models::{ToolDefinition, ToolOutcome};
use crate::{Error, Result};
use reqwest::{header, Client};
use std::time::Duration;
use tracing::{debug, error};

/// Kibana Agent Builder client
#[derive(Clone)]
pub struct KibanaClient {
    client: Client,
    base_url: String,
}

impl KibanaClient {
    /// Create a new client; every request carries the API key and `kbn-xsrf`
    pub fn new(settings: &Settings) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&settings.auth_header())
                .map_err(|e| Error::Config(format!("Invalid ES_API_KEY: {e}")))?,
        );
        headers.insert("kbn-xsrf", header::HeaderValue::from_static("true"));

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(settings.http.user_agent.clone())
            .timeout(Duration::from_secs(settings.http.timeout_seconds))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: settings.kibana.endpoint.clone(),
        })
    }

    fn tools_url(&self) -> String {
        format!("{}/api/agent_builder/tools", self.base_url)
    }

    /// Register a tool, failing on any non-success status
    pub async fn create_tool(&self, tool: &ToolDefinition) -> Result<serde_json::Value> {
        let url = self.tools_url();
        debug!("Kibana request: POST {} (tool {})", url, tool.id);

        let response = self.client.post(&url).json(tool).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            error!("Agent Builder API error: {} - {}", status, body);
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }

    /// Register a tool, treating a duplicate id as success
    pub async fn ensure_tool(&self, tool: &ToolDefinition) -> Result<ToolOutcome> {
        let url = self.tools_url();
        debug!("Kibana request: POST {} (tool {})", url, tool.id);

        let response = self.client.post(&url).json(tool).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        Ok(ToolOutcome::from_response(status, &body))
    }
}
