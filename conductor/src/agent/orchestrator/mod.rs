//! Orchestrator agent: answer directly or delegate to one managed agent.
//!
//! `analyze` asks the model for a [`RouteDecision`](crate::llm::RouteDecision);
//! the `none` sentinel routes to `respond`, anything else to `delegate`, which
//! validates the name against the managed set before dispatching.

mod analyze_node;
mod delegate_node;
mod respond_node;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;
use crate::graph::{StateGraph, END, START};
use crate::message::Message;

use super::registry::AgentArgs;
use super::{Agent, AgentCore, AgentInput, AgentOutput, AgentState};

pub use analyze_node::AnalyzeNode;
pub use delegate_node::DelegateNode;
pub use respond_node::RespondNode;

/// Routing value meaning "answer directly".
pub const DIRECT_RESPONSE: &str = "none";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrchestratorState {
    pub messages: Vec<Message>,
    /// Agent chosen by the last `analyze`, or the direct-response sentinel.
    pub active_agent: String,
    /// Names the orchestrator may delegate to.
    pub specialized_agents: Vec<String>,
}

impl AgentState for OrchestratorState {
    fn messages(&self) -> &[Message] {
        &self.messages
    }

    fn messages_mut(&mut self) -> &mut Vec<Message> {
        &mut self.messages
    }
}

/// True for the sentinel in any casing, and for an empty choice.
pub fn is_direct_response(chosen: &str) -> bool {
    let chosen = chosen.trim();
    chosen.is_empty() || chosen.eq_ignore_ascii_case(DIRECT_RESPONSE)
}

pub fn route_from_analyze(state: &OrchestratorState) -> String {
    if is_direct_response(&state.active_agent) {
        "respond".to_string()
    } else {
        "delegate".to_string()
    }
}

pub struct OrchestratorAgent {
    core: AgentCore<OrchestratorState>,
}

impl OrchestratorAgent {
    pub const NAME: &'static str = "orchestrator";
    pub const DESCRIPTION: &'static str =
        "Central coordinator that manages specialized agents to handle tasks";

    /// Delegates to `args.managed_agents`; they must be bound to the same thread.
    pub fn new(args: AgentArgs) -> Result<Self, AgentError> {
        let managed = args.managed_agents;
        if let Some(other) = managed.iter().find(|a| a.thread_id() != args.thread_id) {
            return Err(AgentError::InvalidConfig(format!(
                "managed agent '{}' is bound to thread '{}', not '{}'",
                other.name(),
                other.thread_id(),
                args.thread_id
            )));
        }
        if let Some(nested) = managed.iter().find(|a| a.name() == Self::NAME) {
            return Err(AgentError::InvalidConfig(format!(
                "agent '{}' cannot be managed by an orchestrator",
                nested.name()
            )));
        }

        let mut core = AgentCore::new(Self::NAME, Self::DESCRIPTION, args.thread_id, args.model)
            .with_recursion_limit(args.settings.recursion_limit);
        let model = core.model().clone();
        let listing: Vec<(String, String)> = managed
            .iter()
            .map(|a| (a.name().to_string(), a.description().to_string()))
            .collect();

        let mut graph = StateGraph::<OrchestratorState>::new();
        graph
            .add_node("analyze", Arc::new(AnalyzeNode::new(model.clone(), listing)))
            .add_node("respond", Arc::new(RespondNode::new(model)))
            .add_node("delegate", Arc::new(DelegateNode::new(&managed)));
        graph
            .add_edge(START, "analyze")
            .add_edge("respond", END)
            .add_edge("delegate", END);
        let path_map: HashMap<String, String> = ["respond", "delegate"]
            .iter()
            .map(|t| (t.to_string(), t.to_string()))
            .collect();
        graph.add_conditional_edges("analyze", Arc::new(route_from_analyze), Some(path_map));
        core.install(graph)?;

        Ok(Self { core })
    }

    /// Latest checkpointed state of this thread.
    pub async fn state(&self) -> Result<Option<OrchestratorState>, AgentError> {
        self.core.latest_state().await
    }
}

#[async_trait]
impl Agent for OrchestratorAgent {
    fn name(&self) -> &str {
        self.core.name()
    }

    fn description(&self) -> &str {
        self.core.description()
    }

    fn thread_id(&self) -> &str {
        self.core.thread_id()
    }

    async fn run(&self, input: AgentInput) -> Result<AgentOutput, AgentError> {
        self.core.run(input).await
    }
}
