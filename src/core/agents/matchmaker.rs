use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use super::Agent;
use super::types::{AgentContext, AgentOutput, AgentResult, AgentRole, FitReport};
use crate::core::llm::GenAi;

const FIT_SCHEMA: &str =
    r#"{"score": 0, "reasoning": "string", "pros": ["string"], "cons": ["string"]}"#;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub name: String,
    pub headline: String,
    pub skills: Vec<String>,
}

/// Scores how well a candidate fits a project's stack. The swipe UI calls
/// `analyze_fit` directly, outside the task envelope, so scoring stays
/// low-latency and leaves no task rows.
pub struct MatchmakerAgent {
    genai: Arc<GenAi>,
}

impl MatchmakerAgent {
    pub fn new(genai: Arc<GenAi>) -> Self {
        Self { genai }
    }

    pub async fn analyze_fit(
        &self,
        project_description: &str,
        stack: &[String],
        candidate: &CandidateProfile,
    ) -> FitReport {
        let prompt = format!(
            "Project: {project_description}\nTech stack: {}\nCandidate: {} ({}), skills: {}.\n\
             Score this candidate's fit for the project from 0 to 100 and justify it.",
            stack.join(", "),
            candidate.name,
            candidate.headline,
            candidate.skills.join(", "),
        );

        match self.genai.generate_json::<FitReport>(&prompt, FIT_SCHEMA).await {
            Ok(mut report) => {
                report.score = report.score.min(100);
                report
            }
            Err(e) => {
                warn!("Matchmaker using heuristic fit: {e:#}");
                Self::heuristic_fit(stack, candidate)
            }
        }
    }

    /// Substring match of declared skills against the lowercased stack,
    /// 10 points per hit on a base of 60, capped at 98. A placeholder, not a
    /// matching algorithm: no weighting, stemming, or synonyms.
    pub fn heuristic_fit(stack: &[String], candidate: &CandidateProfile) -> FitReport {
        let haystack = stack.join(" ").to_lowercase();
        let mut pros = Vec::new();
        let mut cons = Vec::new();
        for skill in &candidate.skills {
            let needle = skill.trim().to_lowercase();
            if needle.is_empty() {
                continue;
            }
            if haystack.contains(&needle) {
                pros.push(format!("Hands-on with {skill}"));
            } else {
                cons.push(format!("No stack overlap for {skill}"));
            }
        }
        let score = (60 + 10 * pros.len() as u32).min(98) as u8;
        FitReport {
            score,
            reasoning: format!(
                "{} of {} declared skills appear in the project stack.",
                pros.len(),
                candidate.skills.len()
            ),
            pros,
            cons,
        }
    }
}

#[async_trait]
impl Agent for MatchmakerAgent {
    fn role(&self) -> AgentRole {
        AgentRole::Matchmaker
    }

    fn description(&self) -> &'static str {
        "Scores candidate/stack fit for talent matching"
    }

    async fn process(&self, ctx: &AgentContext) -> Result<AgentResult> {
        let candidate: CandidateProfile = serde_json::from_value(
            ctx.input
                .get("candidate")
                .cloned()
                .ok_or_else(|| anyhow!("matchmaker input requires a 'candidate' object"))?,
        )?;
        let stack: Vec<String> = ctx
            .project
            .stack
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let report = self
            .analyze_fit(&ctx.project.description, &stack, &candidate)
            .await;

        Ok(AgentResult {
            output: AgentOutput::Fit(report),
            artifacts: vec![],
            next_steps: vec![],
        })
    }
}
