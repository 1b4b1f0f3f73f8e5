use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

use super::Agent;
use super::types::{
    AgentContext, AgentOutput, AgentResult, AgentRole, Artifact, AssetFormat, AssetKind,
    NextStep, ProjectBrief, StrategyOutput,
};
use crate::core::llm::GenAi;

const STRATEGY_SCHEMA: &str = r#"{"vision": "string", "mission": "string", "business_model": "string", "target_market": "string", "milestones": ["string"]}"#;

/// Turns a raw idea into a business strategy document and hands off to the
/// CTO and PM. Always emits exactly those two hand-offs, on both the
/// generated and the template path.
pub struct CeoAgent {
    genai: Arc<GenAi>,
}

impl CeoAgent {
    pub fn new(genai: Arc<GenAi>) -> Self {
        Self { genai }
    }

    fn fallback(project: &ProjectBrief, idea: &str) -> StrategyOutput {
        StrategyOutput {
            vision: format!(
                "{} becomes the default way its market solves \"{}\".",
                project.name, idea
            ),
            mission: format!(
                "Ship a focused first version of {} and learn from real users within one quarter.",
                project.name
            ),
            business_model: "Freemium SaaS: free tier for discovery, paid tier for teams, annual plans for scale.".to_string(),
            target_market: format!(
                "Early adopters underserved by incumbents: {}",
                project.description
            ),
            milestones: vec![
                "Validate the problem with 20 customer interviews".to_string(),
                "Ship an MVP to a closed beta".to_string(),
                "Reach 100 weekly active users".to_string(),
                "Close the first 10 paying customers".to_string(),
            ],
        }
    }

    fn render_plan(project: &ProjectBrief, idea: &str, strategy: &StrategyOutput) -> String {
        let milestones = strategy
            .milestones
            .iter()
            .enumerate()
            .map(|(i, m)| format!("{}. {}", i + 1, m))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "# Strategic Plan: {name}\n\n\
             ## Idea\n{idea}\n\n\
             ## Vision\n{vision}\n\n\
             ## Mission\n{mission}\n\n\
             ## Business Model\n{model}\n\n\
             ## Target Market\n{market}\n\n\
             ## Milestones\n{milestones}\n",
            name = project.name,
            vision = strategy.vision,
            mission = strategy.mission,
            model = strategy.business_model,
            market = strategy.target_market,
        )
    }
}

#[async_trait]
impl Agent for CeoAgent {
    fn role(&self) -> AgentRole {
        AgentRole::Ceo
    }

    fn description(&self) -> &'static str {
        "Turns a raw idea into a business strategy and hands off to the CTO and PM"
    }

    async fn process(&self, ctx: &AgentContext) -> Result<AgentResult> {
        let idea = ctx
            .input
            .get("idea")
            .and_then(|v| v.as_str())
            .unwrap_or(&ctx.project.description)
            .to_string();

        let prompt = format!(
            "You are the acting CEO of the startup \"{}\" ({}). \
             Draft a concise business strategy for this idea: {}",
            ctx.project.name, ctx.project.description, idea
        );

        let strategy = match self
            .genai
            .generate_json::<StrategyOutput>(&prompt, STRATEGY_SCHEMA)
            .await
        {
            Ok(s) => s,
            Err(e) => {
                warn!("CEO agent using template strategy: {e:#}");
                Self::fallback(&ctx.project, &idea)
            }
        };

        let plan = Self::render_plan(&ctx.project, &idea, &strategy);
        let next_steps = vec![
            NextStep {
                role: AgentRole::Cto,
                action: "execute".to_string(),
                input: json!({
                    "idea": idea,
                    "strategy": strategy.business_model,
                    "target_market": strategy.target_market,
                }),
            },
            NextStep {
                role: AgentRole::Pm,
                action: "execute".to_string(),
                input: json!({
                    "idea": idea,
                    "milestones": strategy.milestones,
                }),
            },
        ];

        Ok(AgentResult {
            output: AgentOutput::Strategy(strategy),
            artifacts: vec![Artifact {
                title: "Strategic_Plan_v1.md".to_string(),
                kind: AssetKind::Document,
                content: plan,
                format: AssetFormat::Markdown,
            }],
            next_steps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> AgentContext {
        AgentContext {
            project: ProjectBrief {
                id: "p1".to_string(),
                name: "Acme".to_string(),
                description: "AI widget".to_string(),
                strategy: None,
                stack: None,
            },
            input: json!({"idea": "AI widget for SMBs"}),
        }
    }

    #[tokio::test]
    async fn offline_run_emits_plan_naming_the_project() {
        let agent = CeoAgent::new(Arc::new(GenAi::disabled()));
        let result = agent.process(&ctx()).await.unwrap();

        assert_eq!(result.artifacts.len(), 1);
        let plan = &result.artifacts[0];
        assert_eq!(plan.title, "Strategic_Plan_v1.md");
        assert_eq!(plan.format, AssetFormat::Markdown);
        assert!(plan.content.contains("Acme"));
        assert!(plan.content.contains("AI widget for SMBs"));
    }

    #[tokio::test]
    async fn hand_offs_name_cto_and_pm_exactly() {
        let agent = CeoAgent::new(Arc::new(GenAi::disabled()));
        let result = agent.process(&ctx()).await.unwrap();
        let roles: Vec<AgentRole> = result.next_steps.iter().map(|s| s.role).collect();
        assert_eq!(roles, vec![AgentRole::Cto, AgentRole::Pm]);
        assert!(result.next_steps.iter().all(|s| s.action == "execute"));
    }

    #[tokio::test]
    async fn offline_output_is_deterministic() {
        let agent = CeoAgent::new(Arc::new(GenAi::disabled()));
        let first = agent.process(&ctx()).await.unwrap();
        let second = agent.process(&ctx()).await.unwrap();
        assert_eq!(first.output, second.output);
        assert_eq!(first.artifacts[0].content, second.artifacts[0].content);
    }

    #[tokio::test]
    async fn missing_idea_falls_back_to_project_description() {
        let agent = CeoAgent::new(Arc::new(GenAi::disabled()));
        let mut context = ctx();
        context.input = json!({});
        let result = agent.process(&context).await.unwrap();
        let AgentOutput::Strategy(strategy) = &result.output else {
            panic!("expected strategy output");
        };
        assert!(strategy.vision.contains("AI widget"));
    }
}
