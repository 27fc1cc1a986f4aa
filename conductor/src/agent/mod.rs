//! Agents: the shared run contract, the name-keyed registry, and the three built-ins.
//!
//! Every agent owns one compiled [`StateGraph`](crate::graph::StateGraph) over its
//! own state type and is bound to exactly one conversation thread. A run appends the
//! input messages to the thread's last completed state, drives the graph to END and
//! reports the messages it produced.
//!
//! - [`OrchestratorAgent`]: `analyze` → `respond` | `delegate`.
//! - [`PlanningAgent`]: `create_plan` → `execute_step` ⇄ `tools` → `process_tools` → `respond`.
//! - [`RetrievalAgent`]: `retrieve`.

mod base;
pub mod orchestrator;
pub mod planning;
mod prompts;
mod registry;
pub mod retrieval;

pub use base::{AgentCore, AgentState};
pub use orchestrator::{OrchestratorAgent, OrchestratorState};
pub use planning::{PlanState, PlanningAgent};
pub use registry::{register_builtin_agents, AgentArgs, AgentConstructor, AgentInfo, AgentRegistry};
pub use retrieval::{RetrievalAgent, RetrievalState};

use async_trait::async_trait;

use crate::error::AgentError;
use crate::knowledge::Document;
use crate::message::Message;

/// Input of one run: new user messages, oldest first.
#[derive(Debug, Clone, Default)]
pub struct AgentInput {
    pub messages: Vec<String>,
}

impl AgentInput {
    pub fn user(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }
}

/// Result of one run.
#[derive(Debug, Clone, Default)]
pub struct AgentOutput {
    /// Full transcript after the run.
    pub messages: Vec<Message>,
    /// Messages this run appended after the inputs.
    pub produced: Vec<Message>,
    /// Documents held by the agent state after the run (retrieval only).
    pub documents: Vec<Document>,
}

impl AgentOutput {
    /// Content of the last produced message, if any.
    pub fn reply(&self) -> Option<&str> {
        self.produced.last().map(Message::content)
    }
}

/// Shared contract of every agent.
///
/// Not reentrant per thread: a second `run` while one is in flight fails with
/// `AgentError::ThreadBusy`.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Registry key and orchestrator routing target.
    fn name(&self) -> &str;

    /// Capability summary shown to the orchestrator's routing step.
    fn description(&self) -> &str;

    fn thread_id(&self) -> &str;

    async fn run(&self, input: AgentInput) -> Result<AgentOutput, AgentError>;

    /// Ingests documents into the agent's knowledge store, outside any run.
    ///
    /// Default rejects; only agents backed by a knowledge store accept documents.
    async fn add_documents(&self, documents: Vec<Document>) -> Result<usize, AgentError> {
        let _ = documents;
        Err(AgentError::InvalidConfig(format!(
            "agent '{}' does not accept documents",
            self.name()
        )))
    }
}
