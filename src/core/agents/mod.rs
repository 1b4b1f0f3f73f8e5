mod ceo;
mod cto;
mod frontend;
mod legal;
mod marketing;
mod matchmaker;
mod pm;
pub mod registry;
mod runner;
pub mod types;

pub use ceo::CeoAgent;
pub use cto::CtoAgent;
pub use frontend::FrontendDevAgent;
pub use legal::LegalAgent;
pub use marketing::MarketingAgent;
pub use matchmaker::{CandidateProfile, MatchmakerAgent};
pub use pm::PmAgent;
pub use registry::{AgentInfo, AgentRegistry};
pub use runner::AgentRunner;

use anyhow::Result;
use async_trait::async_trait;

use types::{AgentContext, AgentResult, AgentRole};

/// One role-specific unit of work. `process` builds prompts from the
/// context, calls the generative-text facade, and substitutes a
/// deterministic template when the call fails. An `Err` from `process` is a
/// genuinely unexpected condition and fails the surrounding task.
#[async_trait]
pub trait Agent: Send + Sync {
    fn role(&self) -> AgentRole;

    fn description(&self) -> &'static str;

    async fn process(&self, ctx: &AgentContext) -> Result<AgentResult>;
}

impl std::fmt::Debug for dyn Agent + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent").field("role", &self.role()).finish()
    }
}
