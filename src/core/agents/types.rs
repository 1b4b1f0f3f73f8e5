use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canonical role identifiers. Hand-offs name roles through this enum, so an
/// emitter can never reference a role the registry does not know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Ceo,
    Cto,
    Pm,
    FrontendDev,
    Marketing,
    Legal,
    Matchmaker,
}

impl AgentRole {
    pub const ALL: [AgentRole; 7] = [
        AgentRole::Ceo,
        AgentRole::Cto,
        AgentRole::Pm,
        AgentRole::FrontendDev,
        AgentRole::Marketing,
        AgentRole::Legal,
        AgentRole::Matchmaker,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AgentRole::Ceo => "ceo",
            AgentRole::Cto => "cto",
            AgentRole::Pm => "pm",
            AgentRole::FrontendDev => "frontend_dev",
            AgentRole::Marketing => "marketing",
            AgentRole::Legal => "legal",
            AgentRole::Matchmaker => "matchmaker",
        }
    }

    pub fn from_name(value: &str) -> Option<Self> {
        match value {
            "ceo" => Some(AgentRole::Ceo),
            "cto" => Some(AgentRole::Cto),
            "pm" => Some(AgentRole::Pm),
            "frontend_dev" => Some(AgentRole::FrontendDev),
            "marketing" => Some(AgentRole::Marketing),
            "legal" => Some(AgentRole::Legal),
            "matchmaker" => Some(AgentRole::Matchmaker),
            _ => None,
        }
    }
}

/// Lifecycle of one persisted agent invocation. Transitions
/// processing -> completed or processing -> failed, exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Processing,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Processing => "processing",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }

    pub fn from_status(value: &str) -> Option<Self> {
        match value {
            "processing" => Some(TaskStatus::Processing),
            "completed" => Some(TaskStatus::Completed),
            "failed" => Some(TaskStatus::Failed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Document,
    Diagram,
    Code,
}

impl AssetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AssetKind::Document => "document",
            AssetKind::Diagram => "diagram",
            AssetKind::Code => "code",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetFormat {
    Markdown,
    Mermaid,
    Prisma,
    Tsx,
    Json,
}

impl AssetFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            AssetFormat::Markdown => "markdown",
            AssetFormat::Mermaid => "mermaid",
            AssetFormat::Prisma => "prisma",
            AssetFormat::Tsx => "tsx",
            AssetFormat::Json => "json",
        }
    }
}

/// A generated document/diagram/code blob destined for the asset store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub title: String,
    pub kind: AssetKind,
    pub content: String,
    pub format: AssetFormat,
}

/// Advisory hand-off: which role should run next and with what input.
/// Never auto-executed by the runner; the caller (or the pipeline walker)
/// decides whether to follow it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextStep {
    pub role: AgentRole,
    pub action: String,
    pub input: Value,
}

/// Read-only project context supplied by the caller. `strategy` and `stack`
/// carry output of earlier runs into later prompts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectBrief {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentContext {
    pub project: ProjectBrief,
    pub input: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyOutput {
    pub vision: String,
    pub mission: String,
    pub business_model: String,
    pub target_market: String,
    pub milestones: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureOutput {
    pub stack: Vec<String>,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapPhase {
    pub name: String,
    pub weeks: u32,
    pub deliverables: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapOutput {
    pub mvp_scope: Vec<String>,
    pub phases: Vec<RoadmapPhase>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaffoldOutput {
    pub pages: Vec<String>,
    pub components: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingOutput {
    pub positioning: String,
    pub channels: Vec<String>,
    pub market_size_musd: u32,
    pub cagr_pct: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegalOutput {
    pub documents: Vec<String>,
}

/// Candidate/stack fit verdict produced by the matchmaker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitReport {
    pub score: u8,
    pub reasoning: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

/// Structured output of one agent run, tagged by producing role so
/// downstream consumers get shape checking instead of blind JSON access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgentOutput {
    Strategy(StrategyOutput),
    Architecture(ArchitectureOutput),
    Roadmap(RoadmapOutput),
    Scaffold(ScaffoldOutput),
    Marketing(MarketingOutput),
    Legal(LegalOutput),
    Fit(FitReport),
}

/// What every agent's `process` returns on success. A failed run is an
/// `Err`, not a flag on this struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResult {
    pub output: AgentOutput,
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
    #[serde(default)]
    pub next_steps: Vec<NextStep>,
}
