pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "kitchen-agent")]
#[command(about = "Kitchen assistant - recipe search backend setup and agent definition", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Provision the inference endpoint, recipe index, dataset and search tool
    Setup {
        /// Index to create and load
        #[arg(long, env = "INDEX_NAME")]
        index: Option<String>,

        /// JSON dataset loaded when the index is created
        #[arg(short, long, env = "DATASET_PATH")]
        dataset: Option<PathBuf>,
    },

    /// Print the chat agent definition for the hosting runtime
    Agent {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Include the API key in the bridge arguments
        #[arg(long)]
        show_secrets: bool,
    },

    /// Start the MCP bridge and list the tools the agent will see
    Tools,

    /// Check a dataset file without touching the platform
    ValidateDataset {
        /// Dataset path
        #[arg(env = "DATASET_PATH", default_value = "data/dataset.json")]
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}
