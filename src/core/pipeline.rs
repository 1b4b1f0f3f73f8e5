use anyhow::Result;
use serde_json::Value;
use std::collections::{HashSet, VecDeque};
use tracing::info;

use crate::core::agents::AgentRunner;
use crate::core::agents::types::{AgentContext, AgentResult, AgentRole, ProjectBrief};

#[derive(Debug)]
pub struct PipelineStep {
    pub role: AgentRole,
    pub task_id: String,
    pub result: AgentResult,
}

/// Walks the advisory hand-off graph starting from one role. Hand-offs are
/// followed breadth-first; each role runs at most once per pipeline and the
/// total execution count is capped, so a mis-emitted cycle cannot loop.
///
/// Any failed invocation aborts the walk; tasks already completed stay
/// completed.
pub async fn run_pipeline(
    runner: &AgentRunner,
    start: AgentRole,
    project: ProjectBrief,
    input: Value,
    max_steps: usize,
) -> Result<Vec<PipelineStep>> {
    let mut queue = VecDeque::new();
    queue.push_back((start, input));
    let mut visited: HashSet<AgentRole> = HashSet::new();
    let mut steps = Vec::new();

    while let Some((role, input)) = queue.pop_front() {
        if steps.len() >= max_steps {
            info!("Pipeline step cap {max_steps} reached; remaining hand-offs dropped");
            break;
        }
        if !visited.insert(role) {
            continue;
        }
        let ctx = AgentContext {
            project: project.clone(),
            input,
        };
        let (task, result) = runner.execute(role, &ctx).await?;
        for step in &result.next_steps {
            if !visited.contains(&step.role) {
                queue.push_back((step.role, step.input.clone()));
            }
        }
        steps.push(PipelineStep {
            role,
            task_id: task.id,
            result,
        });
    }

    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::agents::registry::AgentRegistry;
    use crate::core::llm::GenAi;
    use crate::core::store::ProjectStore;
    use serde_json::json;
    use std::sync::Arc;

    fn project() -> ProjectBrief {
        ProjectBrief {
            id: "p1".to_string(),
            name: "Acme".to_string(),
            description: "AI widget".to_string(),
            strategy: None,
            stack: None,
        }
    }

    fn offline_runner() -> AgentRunner {
        AgentRunner::new(
            ProjectStore::open_in_memory().unwrap(),
            AgentRegistry::new(Arc::new(GenAi::disabled())),
        )
    }

    #[tokio::test]
    async fn ceo_pipeline_reaches_cto_pm_and_frontend() {
        let runner = offline_runner();
        let steps = run_pipeline(
            &runner,
            AgentRole::Ceo,
            project(),
            json!({"idea": "AI widget for SMBs"}),
            10,
        )
        .await
        .unwrap();

        let roles: Vec<AgentRole> = steps.iter().map(|s| s.role).collect();
        assert_eq!(
            roles,
            vec![
                AgentRole::Ceo,
                AgentRole::Cto,
                AgentRole::Pm,
                AgentRole::FrontendDev
            ]
        );
        assert_eq!(runner.store().list_tasks("p1", 20).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn step_cap_limits_executions() {
        let runner = offline_runner();
        let steps = run_pipeline(
            &runner,
            AgentRole::Ceo,
            project(),
            json!({"idea": "AI widget"}),
            2,
        )
        .await
        .unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(runner.store().list_tasks("p1", 20).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn leaf_role_runs_alone() {
        let runner = offline_runner();
        let steps = run_pipeline(&runner, AgentRole::Marketing, project(), json!({}), 10)
            .await
            .unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].role, AgentRole::Marketing);
    }
}
