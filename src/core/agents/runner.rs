use anyhow::{Context, Result};
use tracing::{info, warn};

use super::registry::AgentRegistry;
use super::types::{AgentContext, AgentResult, AgentRole};
use crate::core::store::{ProjectStore, TaskRecord};

/// Uniform execution envelope for every agent role: record the task,
/// dispatch `process`, persist artifacts, settle the task status.
///
/// Task and asset writes are separate statements; a crash between them can
/// leave persisted artifacts with a task still `processing`. The design
/// accepts that over cross-write transactions.
pub struct AgentRunner {
    store: ProjectStore,
    registry: AgentRegistry,
}

impl AgentRunner {
    pub fn new(store: ProjectStore, registry: AgentRegistry) -> Self {
        Self { store, registry }
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    /// Runs one agent invocation end to end. Returns the task record
    /// alongside the result so callers can correlate artifacts.
    ///
    /// On a `process` error the task is marked failed and the error
    /// propagates; the envelope never swallows it.
    pub async fn execute(
        &self,
        role: AgentRole,
        ctx: &AgentContext,
    ) -> Result<(TaskRecord, AgentResult)> {
        let agent = self.registry.get(role)?;
        let input_json =
            serde_json::to_string(&ctx.input).context("serializing agent input")?;
        let task = self
            .store
            .create_task(role, "execute", &ctx.project.id, &input_json)
            .await?;
        info!(
            "Agent [{}] task {} started for project {}",
            role.as_str(),
            task.id,
            ctx.project.id
        );

        match agent.process(ctx).await {
            Ok(result) => {
                for artifact in &result.artifacts {
                    self.store
                        .add_asset(&ctx.project.id, &task.id, artifact)
                        .await?;
                }
                let output_json =
                    serde_json::to_string(&result.output).context("serializing agent output")?;
                self.store.complete_task(&task.id, &output_json).await?;
                info!(
                    "Agent [{}] task {} completed ({} artifacts, {} hand-offs)",
                    role.as_str(),
                    task.id,
                    result.artifacts.len(),
                    result.next_steps.len()
                );
                Ok((task, result))
            }
            Err(e) => {
                warn!("Agent [{}] task {} failed: {e:#}", role.as_str(), task.id);
                self.store.fail_task(&task.id, &format!("{e:#}")).await?;
                Err(e)
            }
        }
    }
}
