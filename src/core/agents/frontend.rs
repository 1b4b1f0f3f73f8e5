use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use super::Agent;
use super::types::{
    AgentContext, AgentOutput, AgentResult, AgentRole, Artifact, AssetFormat, AssetKind,
    ScaffoldOutput,
};
use crate::core::llm::{GenAi, strip_code_fences};

/// Scaffolds the first UI: a landing page and a hero component. The model
/// is asked for raw TSX; the fallback ships a static scaffold.
pub struct FrontendDevAgent {
    genai: Arc<GenAi>,
}

impl FrontendDevAgent {
    pub fn new(genai: Arc<GenAi>) -> Self {
        Self { genai }
    }

    fn fallback_page(project_name: &str, description: &str) -> String {
        format!(
            "import {{ Hero }} from \"../components/Hero\";\n\n\
             export default function LandingPage() {{\n\
             \x20 return (\n\
             \x20   <main className=\"min-h-screen bg-slate-950 text-white\">\n\
             \x20     <Hero title=\"{project_name}\" subtitle=\"{description}\" />\n\
             \x20     <section className=\"mx-auto max-w-3xl py-16\">\n\
             \x20       <h2 className=\"text-2xl font-semibold\">Why {project_name}</h2>\n\
             \x20       <p className=\"mt-4 text-slate-300\">{description}</p>\n\
             \x20     </section>\n\
             \x20   </main>\n\
             \x20 );\n\
             }}\n"
        )
    }

    fn fallback_hero() -> String {
        "type HeroProps = { title: string; subtitle: string };\n\n\
         export function Hero({ title, subtitle }: HeroProps) {\n\
         \x20 return (\n\
         \x20   <header className=\"py-24 text-center\">\n\
         \x20     <h1 className=\"text-5xl font-bold\">{title}</h1>\n\
         \x20     <p className=\"mt-6 text-xl text-slate-300\">{subtitle}</p>\n\
         \x20     <button className=\"mt-10 rounded bg-indigo-500 px-6 py-3\">Join the waitlist</button>\n\
         \x20   </header>\n\
         \x20 );\n\
         }\n"
            .to_string()
    }
}

#[async_trait]
impl Agent for FrontendDevAgent {
    fn role(&self) -> AgentRole {
        AgentRole::FrontendDev
    }

    fn description(&self) -> &'static str {
        "Scaffolds the landing page and first components as TSX"
    }

    async fn process(&self, ctx: &AgentContext) -> Result<AgentResult> {
        let scope = ctx
            .input
            .get("mvp_scope")
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join("; ")
            })
            .unwrap_or_else(|| "landing page with waitlist".to_string());

        let prompt = format!(
            "Write a single React TSX landing page component for \"{}\" ({}). \
             MVP scope: {}. Return only the TSX source, no explanation.",
            ctx.project.name, ctx.project.description, scope
        );

        let page = match self.genai.generate(&prompt, None).await {
            Ok(raw) => strip_code_fences(&raw).to_string(),
            Err(e) => {
                warn!("Frontend agent using template scaffold: {e:#}");
                Self::fallback_page(&ctx.project.name, &ctx.project.description)
            }
        };

        let output = ScaffoldOutput {
            pages: vec!["/".to_string()],
            components: vec!["Hero".to_string()],
        };

        Ok(AgentResult {
            output: AgentOutput::Scaffold(output),
            artifacts: vec![
                Artifact {
                    title: "LandingPage.tsx".to_string(),
                    kind: AssetKind::Code,
                    content: page,
                    format: AssetFormat::Tsx,
                },
                Artifact {
                    title: "Hero.tsx".to_string(),
                    kind: AssetKind::Code,
                    content: Self::fallback_hero(),
                    format: AssetFormat::Tsx,
                },
            ],
            next_steps: vec![],
        })
    }
}
