use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("MCP bridge error: {0}")]
    Bridge(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Get a sanitized error message safe for logging
    /// Filters out potentially sensitive information
    pub fn log_safe(&self) -> String {
        match self {
            // reqwest errors carry the request URL, which may embed credentials
            Error::Http(_) => "External HTTP request failed".to_string(),

            Error::Api { status, body } => {
                if contains_secret_marker(body) {
                    format!("API error ({status}): details redacted")
                } else {
                    format!("API error ({status}): {body}")
                }
            }

            Error::Internal(msg) => {
                if contains_secret_marker(msg) {
                    "Internal error (details redacted)".to_string()
                } else {
                    self.to_string()
                }
            }

            Error::Bridge(msg) => {
                if contains_secret_marker(msg) {
                    "MCP bridge error (details redacted)".to_string()
                } else {
                    self.to_string()
                }
            }

            Error::Json(_) => "Malformed JSON payload".to_string(),
            Error::Yaml(_) => "YAML serialization failed".to_string(),
            Error::InvalidUrl(_) => "Invalid URL provided".to_string(),
            Error::Io(_) => "File system operation failed".to_string(),
            Error::Config(msg) => format!("Configuration error: {msg}"),
            Error::Dataset(msg) => format!("Dataset error: {msg}"),
        }
    }

    /// Status code of a management API rejection, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

fn contains_secret_marker(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("apikey")
        || lower.contains("api_key")
        || lower.contains("authorization")
        || lower.contains("secret")
        || lower.contains("token")
}
