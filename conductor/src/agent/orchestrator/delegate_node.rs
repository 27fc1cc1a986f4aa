//! Delegate node: run the chosen managed agent and merge what it produced.
//!
//! An unknown name is answered with a diagnostic message instead of an error.
//! Failures of the delegated run itself propagate.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::agent::{Agent, AgentInput};
use crate::error::{format_names, AgentError};
use crate::graph::{Next, Node};
use crate::message::{last_user_message, Message};

use super::OrchestratorState;

pub struct DelegateNode {
    agents: HashMap<String, Arc<dyn Agent>>,
    /// Agent names in construction order, for diagnostics.
    order: Vec<String>,
}

impl DelegateNode {
    pub fn new(agents: &[Arc<dyn Agent>]) -> Self {
        Self {
            agents: agents
                .iter()
                .map(|a| (a.name().to_string(), a.clone()))
                .collect(),
            order: agents.iter().map(|a| a.name().to_string()).collect(),
        }
    }
}

pub(super) fn missing_agent_message(name: &str, available: &[String]) -> String {
    format!(
        "Agent '{}' not found. Available agents: {}",
        name,
        format_names(available)
    )
}

#[async_trait]
impl Node<OrchestratorState> for DelegateNode {
    fn id(&self) -> &str {
        "delegate"
    }

    async fn run(
        &self,
        state: OrchestratorState,
    ) -> Result<(OrchestratorState, Next), AgentError> {
        let mut state = state;
        let Some(agent) = self.agents.get(&state.active_agent) else {
            tracing::warn!(agent = %state.active_agent, "delegation target not available");
            let text = missing_agent_message(&state.active_agent, &self.order);
            state.messages.push(Message::assistant(text));
            return Ok((state, Next::Continue));
        };

        let input = last_user_message(&state.messages)
            .map(str::to_string)
            .unwrap_or_default();
        tracing::info!(agent = %agent.name(), "delegating");
        let output = agent.run(AgentInput::user(input)).await?;
        tracing::debug!(agent = %agent.name(), produced = output.produced.len(), "delegate returned");
        state.messages.extend(output.produced);
        Ok((state, Next::Continue))
    }
}
