use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

use super::Agent;
use super::types::{
    AgentContext, AgentOutput, AgentResult, AgentRole, Artifact, AssetFormat, AssetKind,
    NextStep, RoadmapOutput, RoadmapPhase,
};
use crate::core::llm::GenAi;

const ROADMAP_SCHEMA: &str = r#"{"mvp_scope": ["string"], "phases": [{"name": "string", "weeks": 0, "deliverables": ["string"]}]}"#;

/// Cuts the strategy down to an MVP scope and a phased roadmap, then hands
/// the page list to the frontend developer.
pub struct PmAgent {
    genai: Arc<GenAi>,
}

impl PmAgent {
    pub fn new(genai: Arc<GenAi>) -> Self {
        Self { genai }
    }

    fn fallback(project_name: &str) -> RoadmapOutput {
        RoadmapOutput {
            mvp_scope: vec![
                "Landing page with waitlist signup".to_string(),
                "Core workflow, one happy path only".to_string(),
                "Email login, no SSO".to_string(),
            ],
            phases: vec![
                RoadmapPhase {
                    name: "Discovery".to_string(),
                    weeks: 2,
                    deliverables: vec![
                        "Problem interviews".to_string(),
                        format!("{project_name} positioning one-pager"),
                    ],
                },
                RoadmapPhase {
                    name: "Build".to_string(),
                    weeks: 6,
                    deliverables: vec![
                        "MVP scope implemented".to_string(),
                        "Closed beta with 10 users".to_string(),
                    ],
                },
                RoadmapPhase {
                    name: "Launch".to_string(),
                    weeks: 4,
                    deliverables: vec![
                        "Public launch".to_string(),
                        "Feedback loop and iteration backlog".to_string(),
                    ],
                },
            ],
        }
    }

    fn render_roadmap(project_name: &str, roadmap: &RoadmapOutput) -> String {
        let scope = roadmap
            .mvp_scope
            .iter()
            .map(|s| format!("- {s}"))
            .collect::<Vec<_>>()
            .join("\n");
        let phases = roadmap
            .phases
            .iter()
            .map(|p| {
                let deliverables = p
                    .deliverables
                    .iter()
                    .map(|d| format!("  - {d}"))
                    .collect::<Vec<_>>()
                    .join("\n");
                format!("### {} ({} weeks)\n{deliverables}", p.name, p.weeks)
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        format!(
            "# MVP Roadmap: {project_name}\n\n## MVP Scope\n{scope}\n\n## Phases\n\n{phases}\n"
        )
    }
}

#[async_trait]
impl Agent for PmAgent {
    fn role(&self) -> AgentRole {
        AgentRole::Pm
    }

    fn description(&self) -> &'static str {
        "Defines MVP scope and a phased roadmap, then hands off to the frontend developer"
    }

    async fn process(&self, ctx: &AgentContext) -> Result<AgentResult> {
        let idea = ctx
            .input
            .get("idea")
            .and_then(|v| v.as_str())
            .unwrap_or(&ctx.project.description);

        let prompt = format!(
            "You are the product manager of \"{}\" ({}). Idea under development: {}. \
             Define the smallest shippable MVP scope and a three-phase roadmap with week counts.",
            ctx.project.name, ctx.project.description, idea
        );

        let roadmap = match self
            .genai
            .generate_json::<RoadmapOutput>(&prompt, ROADMAP_SCHEMA)
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!("PM agent using template roadmap: {e:#}");
                Self::fallback(&ctx.project.name)
            }
        };

        let next_steps = vec![NextStep {
            role: AgentRole::FrontendDev,
            action: "execute".to_string(),
            input: json!({ "mvp_scope": roadmap.mvp_scope }),
        }];

        Ok(AgentResult {
            artifacts: vec![Artifact {
                title: "MVP_Roadmap.md".to_string(),
                kind: AssetKind::Document,
                content: Self::render_roadmap(&ctx.project.name, &roadmap),
                format: AssetFormat::Markdown,
            }],
            output: AgentOutput::Roadmap(roadmap),
            next_steps,
        })
    }
}
