use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::sync::Arc;

use super::types::AgentRole;
use super::{
    Agent, CeoAgent, CtoAgent, FrontendDevAgent, LegalAgent, MarketingAgent, MatchmakerAgent,
    PmAgent,
};
use crate::core::llm::GenAi;

#[derive(Debug, Clone, serde::Serialize)]
pub struct AgentInfo {
    pub role: AgentRole,
    pub description: &'static str,
}

/// Role -> agent lookup, built once at startup and passed to callers.
/// Constructed explicitly (not a module-level singleton) so tests can build
/// registries holding fakes.
pub struct AgentRegistry {
    agents: HashMap<AgentRole, Arc<dyn Agent>>,
}

impl AgentRegistry {
    /// Registry with the full role roster wired to the given facade.
    pub fn new(genai: Arc<GenAi>) -> Self {
        let mut registry = Self::empty();
        registry.insert(Arc::new(CeoAgent::new(genai.clone())));
        registry.insert(Arc::new(CtoAgent::new(genai.clone())));
        registry.insert(Arc::new(PmAgent::new(genai.clone())));
        registry.insert(Arc::new(FrontendDevAgent::new(genai.clone())));
        registry.insert(Arc::new(MarketingAgent::new(genai.clone())));
        registry.insert(Arc::new(LegalAgent::new(genai.clone())));
        registry.insert(Arc::new(MatchmakerAgent::new(genai)));
        registry
    }

    pub fn empty() -> Self {
        Self {
            agents: HashMap::new(),
        }
    }

    /// Registers (or replaces) the agent under its own role.
    pub fn insert(&mut self, agent: Arc<dyn Agent>) {
        self.agents.insert(agent.role(), agent);
    }

    pub fn get(&self, role: AgentRole) -> Result<&dyn Agent> {
        self.agents
            .get(&role)
            .map(|a| a.as_ref())
            .ok_or_else(|| anyhow!("no agent registered for role '{}'", role.as_str()))
    }

    pub fn available_agents(&self) -> Vec<AgentInfo> {
        let mut out: Vec<AgentInfo> = self
            .agents
            .values()
            .map(|a| AgentInfo {
                role: a.role(),
                description: a.description(),
            })
            .collect();
        out.sort_by_key(|info| info.role.as_str());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_registry_covers_every_role() {
        let registry = AgentRegistry::new(Arc::new(GenAi::disabled()));
        let infos = registry.available_agents();
        assert_eq!(infos.len(), AgentRole::ALL.len());
        for role in AgentRole::ALL {
            let agent = registry.get(role).unwrap();
            assert_eq!(agent.role(), role);
            assert!(!agent.description().is_empty());
        }
    }

    #[test]
    fn empty_registry_rejects_lookups() {
        let registry = AgentRegistry::empty();
        let err = registry.get(AgentRole::Ceo).unwrap_err();
        assert!(err.to_string().contains("ceo"));
    }

    #[test]
    fn insert_replaces_existing_role() {
        let genai = Arc::new(GenAi::disabled());
        let mut registry = AgentRegistry::empty();
        registry.insert(Arc::new(CeoAgent::new(genai.clone())));
        registry.insert(Arc::new(CeoAgent::new(genai)));
        assert_eq!(registry.available_agents().len(), 1);
    }
}
