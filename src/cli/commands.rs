use crate::agent::{AgentDefinition, BridgeProcess};
use crate::cli::OutputFormat;
use crate::config::Settings;
use crate::dataset::{self, DatasetSummary};
use crate::provision::{LoadOutcome, ProvisionReport, Provisioner, StepOutcome};
use crate::{Error, Result};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Run the bootstrap and print a summary
pub async fn setup(settings: Settings) -> Result<ProvisionReport> {
    info!("Setting up Elasticsearch index and data...");

    let provisioner = Provisioner::new(settings)?;
    let report = provisioner.run().await?;

    print_report(&report);
    Ok(report)
}

/// Render the agent definition
pub fn agent(settings: &Settings, format: OutputFormat, show_secrets: bool) -> Result<String> {
    let definition = AgentDefinition::kitchen_assistant(settings);
    let definition = if show_secrets {
        definition
    } else {
        definition.redacted()
    };

    match format {
        OutputFormat::Json => definition.to_json(),
        OutputFormat::Yaml => definition.to_yaml(),
    }
}

/// Start the bridge, list the tools the agent can use, then stop it
pub async fn tools(settings: &Settings) -> Result<()> {
    let definition = AgentDefinition::kitchen_assistant(settings);
    let toolset = definition
        .tools
        .first()
        .ok_or_else(|| Error::Internal("agent has no toolset".to_string()))?;

    let mut bridge = BridgeProcess::spawn(
        &toolset.connection_params.server_params,
        Duration::from_secs(toolset.connection_params.timeout_seconds),
    )?;

    let result = bridge.filtered_tools(toolset).await;
    bridge.shutdown().await?;
    let tools = result?;

    if tools.is_empty() {
        warn!(
            "⚠️  None of {:?} is exposed by the bridge - run `kitchen-agent setup` first",
            toolset.tool_filter
        );
        return Ok(());
    }

    println!("Tools available to {}:", definition.name);
    for tool in &tools {
        match &tool.description {
            Some(desc) => println!("  ✓ {} - {}", tool.name, desc),
            None => println!("  ✓ {}", tool.name),
        }
    }

    Ok(())
}

/// Parse a dataset and print what it contains
pub fn validate_dataset(path: &Path) -> Result<DatasetSummary> {
    let recipes = dataset::load_dataset(path)?;
    let summary = DatasetSummary::from_recipes(&recipes);

    println!("✓ {} is valid", path.display());
    println!("  Recipes: {}", summary.total);
    for (category, count) in &summary.by_category {
        println!("    {category}: {count}");
    }
    if !summary.allergens.is_empty() {
        let allergens: Vec<String> = summary
            .allergens
            .iter()
            .map(|(name, count)| format!("{name} ({count})"))
            .collect();
        println!("  Allergens: {}", allergens.join(", "));
    }

    Ok(summary)
}

fn print_report(report: &ProvisionReport) {
    println!("\n========================================");
    println!("Kitchen Agent Setup");
    println!("========================================");
    println!("Inference endpoint: {}", describe(&report.inference));
    println!("Index:              {}", describe(&report.index));
    let load = match &report.load {
        LoadOutcome::Skipped => "skipped (index already existed)".to_string(),
        LoadOutcome::Loaded(bulk) => {
            format!("{} indexed, {} failed", bulk.indexed, bulk.failed())
        }
        LoadOutcome::Failed(msg) => format!("failed: {msg}"),
    };
    println!("Dataset:            {load}");
    println!("Search tool:        {}", describe(&report.tool));
    println!("========================================\n");
}

fn describe(outcome: &StepOutcome) -> String {
    match outcome {
        StepOutcome::Created => "created".to_string(),
        StepOutcome::AlreadyExists => "already exists".to_string(),
        StepOutcome::Failed(msg) => format!("failed: {msg}"),
    }
}
