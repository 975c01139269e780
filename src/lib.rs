pub mod config;
pub mod error;

// Platform clients
pub mod elastic;
pub mod kibana;

// Setup
pub mod dataset;
pub mod provision;

// Chat agent
pub mod agent;

pub mod cli;

// Re-exports
pub use config::Settings;
pub use error::{Error, Result};
