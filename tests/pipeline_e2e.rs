use std::sync::Arc;

use serde_json::json;
use startlabx::core::agents::registry::AgentRegistry;
use startlabx::core::agents::types::{AgentContext, AgentRole, ProjectBrief, TaskStatus};
use startlabx::core::agents::AgentRunner;
use startlabx::core::llm::GenAi;
use startlabx::core::pipeline::run_pipeline;
use startlabx::core::store::ProjectStore;

fn acme() -> ProjectBrief {
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
async fn ceo_execute_without_credential_completes_with_plan_and_cto_handoff() {
    let runner = offline_runner();
    let ctx = AgentContext {
        project: acme(),
        input: json!({"idea": "AI widget for SMBs"}),
    };

    let (task, result) = runner.execute(AgentRole::Ceo, &ctx).await.unwrap();

    let stored = runner.store().get_task(&task.id).await.unwrap().unwrap();
    assert_eq!(stored.status(), Some(TaskStatus::Completed));
    assert_eq!(stored.project_id, "p1");
    assert!(stored.input.contains("AI widget for SMBs"));

    let assets = runner.store().list_assets("p1").await.unwrap();
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0].title, "Strategic_Plan_v1.md");
    assert_eq!(assets[0].format, "markdown");
    assert!(assets[0].content.contains("Acme"));
    assert_eq!(assets[0].task_id, task.id);

    assert!(result.next_steps.iter().any(|s| s.role == AgentRole::Cto));
}

#[tokio::test]
async fn full_build_pipeline_persists_every_artifact() {
    let runner = offline_runner();
    let steps = run_pipeline(
        &runner,
        AgentRole::Ceo,
        acme(),
        json!({"idea": "AI widget for SMBs"}),
        10,
    )
    .await
    .unwrap();

    // ceo -> {cto, pm} -> frontend_dev
    assert_eq!(steps.len(), 4);

    let expected: usize = steps.iter().map(|s| s.result.artifacts.len()).sum();
    let assets = runner.store().list_assets("p1").await.unwrap();
    assert_eq!(assets.len(), expected);

    let tasks = runner.store().list_tasks("p1", 20).await.unwrap();
    assert_eq!(tasks.len(), steps.len());
    assert!(tasks
        .iter()
        .all(|t| t.status() == Some(TaskStatus::Completed)));

    // Every asset traces back to a task from this pipeline.
    for asset in &assets {
        assert!(steps.iter().any(|s| s.task_id == asset.task_id));
    }
}

#[tokio::test]
async fn repeated_offline_builds_yield_identical_artifact_sets() {
    let first_runner = offline_runner();
    let second_runner = offline_runner();
    let input = json!({"idea": "AI widget for SMBs"});

    run_pipeline(&first_runner, AgentRole::Ceo, acme(), input.clone(), 10)
        .await
        .unwrap();
    run_pipeline(&second_runner, AgentRole::Ceo, acme(), input, 10)
        .await
        .unwrap();

    let first: Vec<(String, String)> = first_runner
        .store()
        .list_assets("p1")
        .await
        .unwrap()
        .into_iter()
        .map(|a| (a.title, a.kind))
        .collect();
    let second: Vec<(String, String)> = second_runner
        .store()
        .list_assets("p1")
        .await
        .unwrap()
        .into_iter()
        .map(|a| (a.title, a.kind))
        .collect();
    assert_eq!(first, second);
}
