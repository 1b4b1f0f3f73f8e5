use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use super::Agent;
use super::types::{
    AgentContext, AgentOutput, AgentResult, AgentRole, ArchitectureOutput, Artifact, AssetFormat,
    AssetKind,
};
use crate::core::llm::GenAi;

const ARCHITECTURE_SCHEMA: &str =
    r#"{"stack": ["string"], "summary": "string"}"#;

/// Picks a tech stack and produces the architecture pack: a write-up, a
/// system diagram, and a starter data schema.
pub struct CtoAgent {
    genai: Arc<GenAi>,
}

impl CtoAgent {
    pub fn new(genai: Arc<GenAi>) -> Self {
        Self { genai }
    }

    fn fallback(project_name: &str) -> ArchitectureOutput {
        ArchitectureOutput {
            stack: vec![
                "Next.js".to_string(),
                "TypeScript".to_string(),
                "PostgreSQL".to_string(),
                "Prisma".to_string(),
                "Vercel".to_string(),
            ],
            summary: format!(
                "{project_name} ships as a single Next.js application: server components for \
                 rendering, API routes for mutations, PostgreSQL through Prisma for state, \
                 deployed on Vercel. Boring on purpose until usage demands otherwise."
            ),
        }
    }

    fn render_writeup(project_name: &str, arch: &ArchitectureOutput) -> String {
        let stack_list = arch
            .stack
            .iter()
            .map(|s| format!("- {s}"))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "# Technical Architecture: {project_name}\n\n\
             ## Stack\n{stack_list}\n\n\
             ## Summary\n{summary}\n",
            summary = arch.summary,
        )
    }

    fn render_diagram(project_name: &str) -> String {
        format!(
            "flowchart TD\n\
             \x20   Client[\"Browser ({project_name})\"] --> App[Next.js App]\n\
             \x20   App --> Api[API Routes]\n\
             \x20   Api --> Orm[Prisma]\n\
             \x20   Orm --> Db[(PostgreSQL)]\n\
             \x20   Api --> Llm[Generative Text API]\n"
        )
    }

    fn render_schema() -> String {
        "generator client {\n  provider = \"prisma-client-js\"\n}\n\n\
         datasource db {\n  provider = \"postgresql\"\n  url      = env(\"DATABASE_URL\")\n}\n\n\
         model User {\n  id        String   @id @default(cuid())\n  email     String   @unique\n  name      String?\n  createdAt DateTime @default(now())\n  projects  Project[]\n}\n\n\
         model Project {\n  id          String   @id @default(cuid())\n  name        String\n  description String\n  ownerId     String\n  owner       User     @relation(fields: [ownerId], references: [id])\n  createdAt   DateTime @default(now())\n}\n"
            .to_string()
    }
}

#[async_trait]
impl Agent for CtoAgent {
    fn role(&self) -> AgentRole {
        AgentRole::Cto
    }

    fn description(&self) -> &'static str {
        "Selects the tech stack and produces architecture docs, a diagram, and a starter schema"
    }

    async fn process(&self, ctx: &AgentContext) -> Result<AgentResult> {
        let strategy = ctx
            .input
            .get("strategy")
            .and_then(|v| v.as_str())
            .or(ctx.project.strategy.as_deref())
            .unwrap_or("no strategy recorded yet");

        let prompt = format!(
            "You are the founding CTO of \"{}\" ({}). The business strategy is: {}. \
             Propose a pragmatic tech stack and a one-paragraph architecture summary.",
            ctx.project.name, ctx.project.description, strategy
        );

        let arch = match self
            .genai
            .generate_json::<ArchitectureOutput>(&prompt, ARCHITECTURE_SCHEMA)
            .await
        {
            Ok(a) => a,
            Err(e) => {
                warn!("CTO agent using template architecture: {e:#}");
                Self::fallback(&ctx.project.name)
            }
        };

        let artifacts = vec![
            Artifact {
                title: "Tech_Architecture.md".to_string(),
                kind: AssetKind::Document,
                content: Self::render_writeup(&ctx.project.name, &arch),
                format: AssetFormat::Markdown,
            },
            Artifact {
                title: "Architecture_Diagram.mmd".to_string(),
                kind: AssetKind::Diagram,
                content: Self::render_diagram(&ctx.project.name),
                format: AssetFormat::Mermaid,
            },
            Artifact {
                title: "schema.prisma".to_string(),
                kind: AssetKind::Code,
                content: Self::render_schema(),
                format: AssetFormat::Prisma,
            },
        ];

        Ok(AgentResult {
            output: AgentOutput::Architecture(arch),
            artifacts,
            next_steps: vec![],
        })
    }
}
