use anyhow::{Result, anyhow};
use console::style;
use std::sync::Arc;

use crate::core::agents::registry::AgentRegistry;
use crate::core::agents::types::{AgentContext, AgentRole, ProjectBrief};
use crate::core::agents::{AgentRunner, CandidateProfile, MatchmakerAgent};
use crate::core::config::Config;
use crate::core::llm::GenAi;
use crate::core::pipeline::run_pipeline;
use crate::core::store::ProjectStore;

const PIPELINE_STEP_CAP: usize = 10;

fn print_help() {
    println!("\n {} startlabx <command> [flags]\n", style("Usage:").bold());
    let rows = [
        ("agents", "List registered agent roles"),
        ("build", "Run the full pipeline from the CEO agent"),
        ("run", "Run a single agent role"),
        ("fit", "Score a candidate against a tech stack"),
        ("tasks", "List task records for a project"),
        ("assets", "List generated assets for a project"),
    ];
    for (cmd, blurb) in rows {
        println!("   {:<8} {}", style(cmd).green(), blurb);
    }
    println!(
        "\n Flags: --project <id> --name <name> --description <text> --idea <text>"
    );
    println!(" fit:   --description <text> --stack <a,b,c> --candidate <name> --skills <x,y>\n");
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProjectArgs {
    pub project_id: String,
    pub name: String,
    pub description: String,
    pub idea: Option<String>,
    pub role: Option<String>,
}

pub(crate) fn parse_project_args(args: &[String], start: usize) -> ProjectArgs {
    let mut parsed = ProjectArgs {
        project_id: "default".to_string(),
        name: "Untitled".to_string(),
        description: String::new(),
        idea: None,
        role: None,
    };
    let mut i = start;
    while i < args.len() {
        let take = |i: usize| args.get(i + 1).cloned();
        match args[i].as_str() {
            "--project" | "-p" => {
                if let Some(v) = take(i) {
                    parsed.project_id = v;
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "--name" | "-n" => {
                if let Some(v) = take(i) {
                    parsed.name = v;
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "--description" | "-d" => {
                if let Some(v) = take(i) {
                    parsed.description = v;
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "--idea" => {
                if let Some(v) = take(i) {
                    parsed.idea = Some(v);
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "--role" | "-r" => {
                if let Some(v) = take(i) {
                    parsed.role = Some(v);
                    i += 2;
                } else {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
    parsed
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FitArgs {
    pub description: String,
    pub stack: Vec<String>,
    pub candidate: String,
    pub headline: String,
    pub skills: Vec<String>,
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

pub(crate) fn parse_fit_args(args: &[String], start: usize) -> FitArgs {
    let mut parsed = FitArgs {
        description: String::new(),
        stack: Vec::new(),
        candidate: "Candidate".to_string(),
        headline: String::new(),
        skills: Vec::new(),
    };
    let mut i = start;
    while i < args.len() {
        let take = |i: usize| args.get(i + 1).cloned();
        match args[i].as_str() {
            "--description" | "-d" => {
                if let Some(v) = take(i) {
                    parsed.description = v;
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "--stack" => {
                if let Some(v) = take(i) {
                    parsed.stack = split_list(&v);
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "--candidate" => {
                if let Some(v) = take(i) {
                    parsed.candidate = v;
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "--headline" => {
                if let Some(v) = take(i) {
                    parsed.headline = v;
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "--skills" => {
                if let Some(v) = take(i) {
                    parsed.skills = split_list(&v);
                    i += 2;
                } else {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
    parsed
}

fn make_runner(config: &Config) -> Result<AgentRunner> {
    let genai = Arc::new(GenAi::from_config(config));
    let registry = AgentRegistry::new(genai);
    let store = ProjectStore::open(&config.db_path)?;
    Ok(AgentRunner::new(store, registry))
}

fn brief_from(parsed: &ProjectArgs) -> ProjectBrief {
    ProjectBrief {
        id: parsed.project_id.clone(),
        name: parsed.name.clone(),
        description: parsed.description.clone(),
        strategy: None,
        stack: None,
    }
}

fn input_from(parsed: &ProjectArgs) -> serde_json::Value {
    match &parsed.idea {
        Some(idea) => serde_json::json!({ "idea": idea }),
        None => serde_json::json!({}),
    }
}

pub async fn run_main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let Some(command) = args.get(1).map(|s| s.as_str()) else {
        print_help();
        return Ok(());
    };
    let config = Config::from_env();

    match command {
        "agents" => {
            let registry = AgentRegistry::new(Arc::new(GenAi::from_config(&config)));
            println!("\n {}", style("Registered agents").bold());
            for info in registry.available_agents() {
                println!("   {:<14} {}", style(info.role.as_str()).green(), info.description);
            }
            println!();
        }
        "build" => {
            let parsed = parse_project_args(&args, 2);
            let runner = make_runner(&config)?;
            let steps = run_pipeline(
                &runner,
                AgentRole::Ceo,
                brief_from(&parsed),
                input_from(&parsed),
                PIPELINE_STEP_CAP,
            )
            .await?;
            println!("\n {}", style("Pipeline complete").bold());
            for step in &steps {
                println!(
                    "   {:<14} task {} ({} artifacts)",
                    style(step.role.as_str()).green(),
                    step.task_id,
                    step.result.artifacts.len()
                );
                for artifact in &step.result.artifacts {
                    println!("       - {}", artifact.title);
                }
            }
            println!();
        }
        "run" => {
            let parsed = parse_project_args(&args, 2);
            let role_name = parsed
                .role
                .clone()
                .ok_or_else(|| anyhow!("run requires --role <role>"))?;
            let role = AgentRole::from_name(&role_name).ok_or_else(|| {
                anyhow!(
                    "unknown role '{}'; valid roles: {}",
                    role_name,
                    AgentRole::ALL.map(|r| r.as_str()).join(", ")
                )
            })?;
            let runner = make_runner(&config)?;
            let ctx = AgentContext {
                project: brief_from(&parsed),
                input: input_from(&parsed),
            };
            let (task, result) = runner.execute(role, &ctx).await?;
            println!("\n Task {} completed", style(&task.id).green());
            println!("{}", serde_json::to_string_pretty(&result.output)?);
        }
        "fit" => {
            let parsed = parse_fit_args(&args, 2);
            // Deliberately bypasses the task envelope: scoring leaves no rows.
            let matchmaker = MatchmakerAgent::new(Arc::new(GenAi::from_config(&config)));
            let candidate = CandidateProfile {
                name: parsed.candidate.clone(),
                headline: parsed.headline.clone(),
                skills: parsed.skills.clone(),
            };
            let report = matchmaker
                .analyze_fit(&parsed.description, &parsed.stack, &candidate)
                .await;
            println!(
                "\n {} scores {} / 100",
                style(&candidate.name).bold(),
                style(report.score).green()
            );
            println!("   {}", report.reasoning);
            for pro in &report.pros {
                println!("   {} {}", style("+").green(), pro);
            }
            for con in &report.cons {
                println!("   {} {}", style("-").red(), con);
            }
            println!();
        }
        "tasks" => {
            let parsed = parse_project_args(&args, 2);
            let store = ProjectStore::open(&config.db_path)?;
            let tasks = store.list_tasks(&parsed.project_id, 50).await?;
            println!("\n {} tasks for project {}", tasks.len(), parsed.project_id);
            for task in tasks {
                println!(
                    "   {} {:<14} {:<10} {}",
                    task.id,
                    task.agent_role,
                    task.status,
                    task.created_at
                );
            }
            println!();
        }
        "assets" => {
            let parsed = parse_project_args(&args, 2);
            let store = ProjectStore::open(&config.db_path)?;
            let assets = store.list_assets(&parsed.project_id).await?;
            println!("\n {} assets for project {}", assets.len(), parsed.project_id);
            for asset in assets {
                println!(
                    "   {:<28} {:<10} {:<10} task {}",
                    asset.title, asset.kind, asset.format, asset.task_id
                );
            }
            println!();
        }
        "help" | "--help" | "-h" => print_help(),
        other => {
            println!(" {} unknown command '{}'", style("Error:").red(), other);
            print_help();
        }
    }

    Ok(())
}
