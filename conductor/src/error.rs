//! Agent execution error types.
//!
//! Used by `Agent::run`, graph nodes, the registry and every capability adapter
//! (model, knowledge store, checkpointer) that surfaces a failure into a run.

use thiserror::Error;

use crate::graph::CompilationError;
use crate::knowledge::KnowledgeError;
use crate::memory::CheckpointError;

/// Renders names the way diagnostics list them: `['a', 'b']`.
pub fn format_names(names: &[String]) -> String {
    let quoted: Vec<String> = names.iter().map(|n| format!("'{}'", n)).collect();
    format!("[{}]", quoted.join(", "))
}

/// Agent execution error.
///
/// Recoverable outcomes (missing delegation target, tool failure) never reach this
/// type; they are written into the transcript by the node that observed them.
#[derive(Debug, Error)]
pub enum AgentError {
    /// External capability failed (model call, tool transport, unparsable structured reply).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// Lookup by name failed; lists what is currently available.
    #[error("No {kind} registered with the name '{name}'. Available {kind}s: {}", format_names(.available))]
    NotFound {
        kind: &'static str,
        name: String,
        available: Vec<String>,
    },

    /// The agent's state machine was used before it was built.
    #[error("agent '{0}' is not initialized: state machine not built")]
    Uninitialized(String),

    /// Construction arguments are missing or inconsistent.
    #[error("invalid agent configuration: {0}")]
    InvalidConfig(String),

    /// A run is already in flight for this thread.
    #[error("thread '{0}' already has a run in progress")]
    ThreadBusy(String),

    /// The graph executed `recursion_limit` nodes without reaching END.
    #[error("recursion limit of {0} reached without hitting END")]
    RecursionLimit(usize),

    #[error("checkpoint: {0}")]
    Checkpoint(#[from] CheckpointError),

    #[error("knowledge store: {0}")]
    Knowledge(#[from] KnowledgeError),

    #[error("graph compilation: {0}")]
    Compilation(#[from] CompilationError),
}
