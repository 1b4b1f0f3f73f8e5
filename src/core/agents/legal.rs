use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use super::Agent;
use super::types::{
    AgentContext, AgentOutput, AgentResult, AgentRole, Artifact, AssetFormat, AssetKind,
    LegalOutput,
};
use crate::core::llm::{GenAi, strip_code_fences};

/// Produces the starter legal pack: a founders agreement and a privacy
/// policy. Each document falls back to its template independently.
pub struct LegalAgent {
    genai: Arc<GenAi>,
}

impl LegalAgent {
    pub fn new(genai: Arc<GenAi>) -> Self {
        Self { genai }
    }

    async fn draft(&self, prompt: &str, fallback: String, doc: &str) -> String {
        match self.genai.generate(prompt, None).await {
            Ok(raw) => strip_code_fences(&raw).to_string(),
            Err(e) => {
                warn!("Legal agent using template for {doc}: {e:#}");
                fallback
            }
        }
    }

    fn fallback_founders(project_name: &str) -> String {
        format!(
            "# Founders Agreement: {project_name}\n\n\
             This agreement is made between the founders of {project_name}.\n\n\
             ## 1. Equity\nEquity splits are recorded in the cap table and vest over four years \
             with a one-year cliff.\n\n\
             ## 2. Roles\nEach founder's role and decision authority is listed in Schedule A.\n\n\
             ## 3. Intellectual Property\nAll work product created for {project_name} is assigned \
             to the company.\n\n\
             ## 4. Departure\nA departing founder retains only vested equity.\n\n\
             This template is a starting point, not legal advice. Review with counsel before signing.\n"
        )
    }

    fn fallback_privacy(project_name: &str) -> String {
        format!(
            "# Privacy Policy: {project_name}\n\n\
             ## Data We Collect\nAccount details you provide and usage data needed to operate the \
             service.\n\n\
             ## How We Use It\nTo provide and improve {project_name}. We do not sell personal data.\n\n\
             ## Retention\nData is kept while your account is active and deleted on request.\n\n\
             ## Contact\nPrivacy questions: privacy@{domain}.example\n",
            domain = project_name.to_lowercase().replace(' ', "-"),
        )
    }
}

#[async_trait]
impl Agent for LegalAgent {
    fn role(&self) -> AgentRole {
        AgentRole::Legal
    }

    fn description(&self) -> &'static str {
        "Drafts the starter legal pack: founders agreement and privacy policy"
    }

    async fn process(&self, ctx: &AgentContext) -> Result<AgentResult> {
        let name = &ctx.project.name;
        let founders = self
            .draft(
                &format!(
                    "Draft a concise founders agreement in markdown for the startup \"{name}\" \
                     ({}). Include equity, roles, IP assignment, and departure terms.",
                    ctx.project.description
                ),
                Self::fallback_founders(name),
                "founders agreement",
            )
            .await;
        let privacy = self
            .draft(
                &format!(
                    "Draft a plain-language privacy policy in markdown for \"{name}\" ({}).",
                    ctx.project.description
                ),
                Self::fallback_privacy(name),
                "privacy policy",
            )
            .await;

        let artifacts = vec![
            Artifact {
                title: "Founders_Agreement.md".to_string(),
                kind: AssetKind::Document,
                content: founders,
                format: AssetFormat::Markdown,
            },
            Artifact {
                title: "Privacy_Policy.md".to_string(),
                kind: AssetKind::Document,
                content: privacy,
                format: AssetFormat::Markdown,
            },
        ];

        Ok(AgentResult {
            output: AgentOutput::Legal(LegalOutput {
                documents: artifacts.iter().map(|a| a.title.clone()).collect(),
            }),
            artifacts,
            next_steps: vec![],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::agents::types::ProjectBrief;
    use serde_json::json;

    fn ctx() -> AgentContext {
        AgentContext {
            project: ProjectBrief {
                id: "p1".to_string(),
                name: "Acme".to_string(),
                description: "AI widget".to_string(),
                strategy: None,
                stack: None,
            },
            input: json!({}),
        }
    }

    #[tokio::test]
    async fn offline_pack_contains_both_documents() {
        let agent = LegalAgent::new(Arc::new(GenAi::disabled()));
        let result = agent.process(&ctx()).await.unwrap();

        let AgentOutput::Legal(out) = &result.output else {
            panic!("expected legal output");
        };
        assert_eq!(
            out.documents,
            vec!["Founders_Agreement.md", "Privacy_Policy.md"]
        );
        assert_eq!(result.artifacts.len(), 2);
        assert!(result.artifacts.iter().all(|a| a.content.contains("Acme")));
        assert!(result.artifacts[1].content.contains("privacy@acme.example"));
    }

    #[tokio::test]
    async fn offline_pack_is_deterministic() {
        let agent = LegalAgent::new(Arc::new(GenAi::disabled()));
        let first = agent.process(&ctx()).await.unwrap();
        let second = agent.process(&ctx()).await.unwrap();
        assert_eq!(first.artifacts[0].content, second.artifacts[0].content);
        assert_eq!(first.artifacts[1].content, second.artifacts[1].content);
    }
}
