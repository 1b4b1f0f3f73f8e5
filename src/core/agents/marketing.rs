use anyhow::Result;
use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;
use tracing::warn;

use super::Agent;
use super::types::{
    AgentContext, AgentOutput, AgentResult, AgentRole, Artifact, AssetFormat, AssetKind,
    MarketingOutput,
};
use crate::core::llm::GenAi;

const MARKETING_SCHEMA: &str = r#"{"positioning": "string", "channels": ["string"], "market_size_musd": 0, "cagr_pct": 0}"#;

/// Drafts the go-to-market plan. The template path invents cosmetic market
/// numbers in fixed ranges (size 10-60 M USD, CAGR 5-15%); they flavor the
/// document, nothing downstream computes with them.
pub struct MarketingAgent {
    genai: Arc<GenAi>,
}

impl MarketingAgent {
    pub fn new(genai: Arc<GenAi>) -> Self {
        Self { genai }
    }

    fn fallback(project_name: &str, description: &str) -> MarketingOutput {
        let mut rng = rand::thread_rng();
        MarketingOutput {
            positioning: format!(
                "{project_name} is the fastest way for its audience to get \"{description}\" \
                 without hiring or tooling overhead."
            ),
            channels: vec![
                "Founder-led content on LinkedIn and X".to_string(),
                "Launch on Product Hunt".to_string(),
                "Niche community partnerships".to_string(),
                "SEO on problem-intent keywords".to_string(),
            ],
            market_size_musd: rng.gen_range(10..=60),
            cagr_pct: rng.gen_range(5..=15),
        }
    }

    fn render_plan(project_name: &str, plan: &MarketingOutput) -> String {
        let channels = plan
            .channels
            .iter()
            .map(|c| format!("- {c}"))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "# Go-To-Market: {project_name}\n\n\
             ## Positioning\n{positioning}\n\n\
             ## Market\nEstimated addressable market: ${size}M USD, growing ~{cagr}% annually.\n\n\
             ## Channels\n{channels}\n",
            positioning = plan.positioning,
            size = plan.market_size_musd,
            cagr = plan.cagr_pct,
        )
    }
}

#[async_trait]
impl Agent for MarketingAgent {
    fn role(&self) -> AgentRole {
        AgentRole::Marketing
    }

    fn description(&self) -> &'static str {
        "Drafts positioning, channel strategy, and a go-to-market document"
    }

    async fn process(&self, ctx: &AgentContext) -> Result<AgentResult> {
        let prompt = format!(
            "You run marketing for \"{}\" ({}). Draft positioning, four launch channels, \
             and rough market size/growth estimates.",
            ctx.project.name, ctx.project.description
        );

        let plan = match self
            .genai
            .generate_json::<MarketingOutput>(&prompt, MARKETING_SCHEMA)
            .await
        {
            Ok(p) => p,
            Err(e) => {
                warn!("Marketing agent using template plan: {e:#}");
                Self::fallback(&ctx.project.name, &ctx.project.description)
            }
        };

        Ok(AgentResult {
            artifacts: vec![Artifact {
                title: "Go_To_Market.md".to_string(),
                kind: AssetKind::Document,
                content: Self::render_plan(&ctx.project.name, &plan),
                format: AssetFormat::Markdown,
            }],
            output: AgentOutput::Marketing(plan),
            next_steps: vec![],
        })
    }
}
