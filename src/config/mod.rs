use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub elastic: ElasticConfig,
    pub kibana: KibanaConfig,
    pub index: IndexConfig,
    pub agent: AgentConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElasticConfig {
    pub endpoint: String,
    #[serde(skip_serializing)]
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KibanaConfig {
    pub endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    pub name: String,
    pub inference_id: String,
    pub embedding_model_id: String,
    pub dataset_path: PathBuf,
    pub bulk_chunk_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub tool_id: String,
    pub model: String,
    pub mcp_command: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings from an arbitrary key lookup, so callers (and tests)
    /// don't have to mutate the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| Error::Config(format!("{key} must be set")))
        };
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let es_endpoint = required("ES_ENDPOINT")?;
        let api_key = required("ES_API_KEY")?;
        let kibana_endpoint = required("KIBANA_ENDPOINT")?;

        let bulk_chunk_size = or_default("BULK_CHUNK_SIZE", "500")
            .parse()
            .map_err(|_| Error::Config("Invalid BULK_CHUNK_SIZE value".to_string()))?;

        let timeout_seconds = or_default("HTTP_TIMEOUT_SECONDS", "30")
            .parse()
            .map_err(|_| Error::Config("Invalid HTTP_TIMEOUT_SECONDS value".to_string()))?;

        Ok(Settings {
            elastic: ElasticConfig {
                endpoint: trim_base_url(&es_endpoint),
                api_key,
            },
            kibana: KibanaConfig {
                endpoint: trim_base_url(&kibana_endpoint),
            },
            index: IndexConfig {
                name: or_default("INDEX_NAME", "cooking-recipes"),
                inference_id: or_default("INFERENCE_ID", "jina-embeddings"),
                embedding_model_id: or_default("EMBEDDING_MODEL_ID", "jina-embeddings-v3"),
                dataset_path: or_default("DATASET_PATH", "data/dataset.json").into(),
                bulk_chunk_size,
            },
            agent: AgentConfig {
                tool_id: or_default("TOOL_ID", "recipe_semantic_search"),
                model: or_default("AGENT_MODEL", "gemini-2.0-flash-exp"),
                mcp_command: or_default("MCP_COMMAND", "npx"),
            },
            http: HttpConfig {
                timeout_seconds,
                user_agent: format!("Kitchen-Agent/{}", env!("CARGO_PKG_VERSION")),
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        validate_endpoint("ES_ENDPOINT", &self.elastic.endpoint)?;
        validate_endpoint("KIBANA_ENDPOINT", &self.kibana.endpoint)?;

        if self.index.name.is_empty() || self.index.name != self.index.name.to_lowercase() {
            return Err(Error::Config(
                "INDEX_NAME must be a non-empty lowercase name".to_string(),
            ));
        }

        // Both names end up as URL path segments
        if let Some(c) = self.index.name.chars().find(|c| is_reserved_in_name(*c)) {
            return Err(Error::Config(format!(
                "INDEX_NAME must not contain {c:?}"
            )));
        }

        if self.index.inference_id.is_empty() {
            return Err(Error::Config("INFERENCE_ID must be non-empty".to_string()));
        }

        if let Some(c) = self.index.inference_id.chars().find(|c| is_reserved_in_name(*c)) {
            return Err(Error::Config(format!(
                "INFERENCE_ID must not contain {c:?}"
            )));
        }

        if self.agent.tool_id.is_empty() {
            return Err(Error::Config("TOOL_ID must be non-empty".to_string()));
        }

        if self.index.bulk_chunk_size == 0 {
            return Err(Error::Config("Bulk chunk size must be non-zero".to_string()));
        }

        if self.http.timeout_seconds == 0 {
            return Err(Error::Config("HTTP timeout must be non-zero".to_string()));
        }

        Ok(())
    }

    /// Value of the `Authorization` header shared by Elasticsearch and Kibana
    pub fn auth_header(&self) -> String {
        format!("ApiKey {}", self.elastic.api_key)
    }
}

fn trim_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Characters Elasticsearch forbids in index names, plus URL delimiters
fn is_reserved_in_name(c: char) -> bool {
    c.is_whitespace() || matches!(c, '/' | '\\' | '?' | '#' | '*' | '"' | '<' | '>' | '|' | ',')
}

fn validate_endpoint(key: &str, value: &str) -> Result<Url> {
    let url = Url::parse(value)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Error::Config(format!(
            "{key} must use http or https, got {other}"
        ))),
    }
}
