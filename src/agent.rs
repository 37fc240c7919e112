use crate::api::{Agent, AgentDefinition, AgentService, ToolDefinition};
use crate::config::Config;
use crate::error::Result;
use crate::ui::debug;

/// What a newly created agent looks like.
#[derive(Debug, Clone)]
pub struct AgentBlueprint {
    pub model: String,
    pub instructions: String,
}

impl AgentBlueprint {
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.model.clone(),
            instructions: config.instructions.clone(),
        }
    }

    fn definition(&self, name: &str) -> AgentDefinition {
        AgentDefinition {
            name: name.to_string(),
            model: self.model.clone(),
            instructions: self.instructions.clone(),
            tools: vec![ToolDefinition::CodeInterpreter],
        }
    }
}

/// How the session's agent was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Existing,
    Created,
}

/// Find the caller's agent called `name` (exact, case-sensitive), or create it.
///
/// If several agents share the name, the first one the service lists wins.
pub async fn resolve_agent(
    service: &dyn AgentService,
    name: &str,
    blueprint: &AgentBlueprint,
    verbose: bool,
) -> Result<(Agent, Resolution)> {
    let agents = service.list_agents().await?;
    debug(verbose, "agent", format!("Service lists {} agent(s)", agents.len()));

    if let Some(agent) = agents
        .into_iter()
        .find(|agent| agent.name.as_deref() == Some(name))
    {
        debug(verbose, "agent", format!("Reusing agent {} ({})", name, agent.id));
        return Ok((agent, Resolution::Existing));
    }

    debug(
        verbose,
        "agent",
        format!("No agent named {}, creating one with model {}", name, blueprint.model),
    );
    let agent = service.create_agent(&blueprint.definition(name)).await?;
    Ok((agent, Resolution::Created))
}
