pub mod client;
pub mod models;

pub use client::KibanaClient;
pub use models::{ToolDefinition, ToolOutcome};
