//! Invoke config: thread_id, checkpoint_id, recursion_limit.
//!
//! Passed to `CompiledStateGraph::invoke` and to every `Checkpointer` call.

/// Maximum number of nodes one invocation may execute.
pub const DEFAULT_RECURSION_LIMIT: usize = 64;

/// Config for a single invoke. Identifies the thread and optional checkpoint.
///
/// When using a checkpointer, invoke must provide at least `thread_id`;
/// without it the graph runs but nothing is persisted.
#[derive(Debug, Clone)]
pub struct RunnableConfig {
    /// Conversation/thread partition key.
    pub thread_id: Option<String>,
    /// If set, load state from this checkpoint instead of the latest.
    pub checkpoint_id: Option<String>,
    /// Node executions allowed per invocation before `AgentError::RecursionLimit`.
    pub recursion_limit: usize,
}

impl Default for RunnableConfig {
    fn default() -> Self {
        Self {
            thread_id: None,
            checkpoint_id: None,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

impl RunnableConfig {
    /// Config bound to one thread with default limits.
    pub fn for_thread(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: Some(thread_id.into()),
            ..Self::default()
        }
    }

    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn with_checkpoint_id(mut self, checkpoint_id: impl Into<String>) -> Self {
        self.checkpoint_id = Some(checkpoint_id.into());
        self
    }
}
