//! One-shot bootstrap of the recipe search backend.
//!
//! Order matters: the index mapping references the inference endpoint, and the
//! search tool references the index. Every step is create-if-absent, so a run
//! that stopped halfway is repaired by running again.

use crate::config::Settings;
use crate::dataset;
use crate::elastic::{BulkReport, ElasticClient};
use crate::kibana::{KibanaClient, ToolDefinition, ToolOutcome};
use crate::Result;
use serde::Serialize;
use tracing::{error, info, warn};

/// What happened to one provisioned resource
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum StepOutcome {
    Created,
    AlreadyExists,
    Failed(String),
}

impl StepOutcome {
    pub fn created(&self) -> bool {
        matches!(self, StepOutcome::Created)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, StepOutcome::Failed(_))
    }
}

/// Result of the dataset load step
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum LoadOutcome {
    /// Index already existed, so its contents are left alone
    Skipped,
    Loaded(BulkReport),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvisionReport {
    pub inference: StepOutcome,
    pub index: StepOutcome,
    pub load: LoadOutcome,
    pub tool: StepOutcome,
}

impl ProvisionReport {
    /// True when nothing failed, including individual bulk documents
    pub fn is_complete(&self) -> bool {
        !self.inference.is_failure()
            && !self.index.is_failure()
            && !self.tool.is_failure()
            && match &self.load {
                LoadOutcome::Failed(_) => false,
                LoadOutcome::Loaded(report) => report.is_clean(),
                LoadOutcome::Skipped => true,
            }
    }
}

pub struct Provisioner {
    settings: Settings,
    elastic: ElasticClient,
    kibana: KibanaClient,
}

impl Provisioner {
    pub fn new(settings: Settings) -> Result<Self> {
        let elastic = ElasticClient::new(&settings)?;
        let kibana = KibanaClient::new(&settings)?;

        Ok(Self {
            settings,
            elastic,
            kibana,
        })
    }

    /// Run the full bootstrap.
    ///
    /// Only an inference endpoint failure is returned as an error; later steps
    /// log their failures and the run carries on.
    pub async fn run(&self) -> Result<ProvisionReport> {
        let inference = self.ensure_inference_endpoint().await?;
        let index = self.ensure_index().await;

        let load = if index.created() {
            info!(
                "Index created, loading data from {}...",
                self.settings.index.dataset_path.display()
            );
            self.load_dataset().await
        } else {
            LoadOutcome::Skipped
        };

        let tool = self.ensure_search_tool().await;

        Ok(ProvisionReport {
            inference,
            index,
            load,
            tool,
        })
    }

    /// Create the text-embedding inference endpoint unless it already exists
    pub async fn ensure_inference_endpoint(&self) -> Result<StepOutcome> {
        self.create_inference_if_absent()
            .await
            .inspect_err(|e| error!("❌ Error creating inference endpoint: {}", e.log_safe()))
    }

    async fn create_inference_if_absent(&self) -> Result<StepOutcome> {
        let inference_id = &self.settings.index.inference_id;

        if self.elastic.inference_exists(inference_id).await? {
            info!(
                "ℹ️  Inference endpoint '{}' already exists. Skipping creation.",
                inference_id
            );
            return Ok(StepOutcome::AlreadyExists);
        }

        self.elastic
            .put_inference(inference_id, &self.settings.index.embedding_model_id)
            .await?;
        info!("✅ Inference endpoint '{}' created successfully", inference_id);
        Ok(StepOutcome::Created)
    }

    /// Create the recipe index unless it already exists
    pub async fn ensure_index(&self) -> StepOutcome {
        let index_name = &self.settings.index.name;

        match self.elastic.index_exists(index_name).await {
            Ok(true) => {
                info!("ℹ️  Index '{}' already exists. Skipping creation.", index_name);
                return StepOutcome::AlreadyExists;
            }
            Ok(false) => {}
            Err(e) => {
                error!("❌ Error checking index '{}': {}", index_name, e.log_safe());
                return StepOutcome::Failed(e.log_safe());
            }
        }

        match self
            .elastic
            .create_index(index_name, &self.settings.index.inference_id)
            .await
        {
            Ok(()) => {
                info!("✅ Index '{}' created successfully", index_name);
                StepOutcome::Created
            }
            Err(e) => {
                error!("❌ Error creating index '{}': {}", index_name, e.log_safe());
                StepOutcome::Failed(e.log_safe())
            }
        }
    }

    /// Read the dataset and bulk index it
    pub async fn load_dataset(&self) -> LoadOutcome {
        let documents = match dataset::load_documents(&self.settings.index.dataset_path) {
            Ok(documents) => documents,
            Err(e) => {
                error!("❌ Error during bulk indexing: {}", e.log_safe());
                return LoadOutcome::Failed(e.log_safe());
            }
        };

        match self
            .elastic
            .bulk_index(
                &self.settings.index.name,
                &documents,
                self.settings.index.bulk_chunk_size,
            )
            .await
        {
            Ok(report) => {
                info!("📥 {} documents indexed successfully", report.indexed);
                for failure in &report.failures {
                    warn!(
                        "⚠️  Recipe #{} rejected ({}): {}",
                        failure.position, failure.status, failure.reason
                    );
                }
                LoadOutcome::Loaded(report)
            }
            Err(e) => {
                error!("❌ Error during bulk indexing: {}", e.log_safe());
                LoadOutcome::Failed(e.log_safe())
            }
        }
    }

    /// Register the semantic recipe search tool unless it already exists
    pub async fn ensure_search_tool(&self) -> StepOutcome {
        let tool = ToolDefinition::recipe_semantic_search(
            &self.settings.agent.tool_id,
            &self.settings.index.name,
        );

        match self.kibana.ensure_tool(&tool).await {
            Ok(ToolOutcome::Created) => {
                info!("✅ Recipe semantic search tool created successfully");
                StepOutcome::Created
            }
            Ok(ToolOutcome::AlreadyExists) => {
                info!("ℹ️  Recipe search tool already exists, continuing...");
                StepOutcome::AlreadyExists
            }
            Ok(ToolOutcome::Rejected { status, body }) => {
                warn!("⚠️  Failed to create tool: {}", status);
                warn!("Response: {}", body);
                StepOutcome::Failed(format!("HTTP {status}"))
            }
            Err(e) => {
                error!("❌ Error creating tool: {}", e.log_safe());
                StepOutcome::Failed(e.log_safe())
            }
        }
    }
}
