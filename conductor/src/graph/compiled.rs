//! Executable graph.
//!
//! With a checkpointer and a thread id in the config, a run saves an `Input`
//! checkpoint before the entry node and a `Loop` checkpoint after each node,
//! both naming the node due next. A failing node saves nothing, so the newest
//! checkpoint is always one a resume can start from.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use crate::error::AgentError;
use crate::memory::{Checkpoint, CheckpointError, CheckpointSource, Checkpointer, RunnableConfig};

use super::edge::{successor, Edge};
use super::node::Node;
use super::state_graph::END;

#[derive(Clone)]
pub struct CompiledStateGraph<S> {
    pub(super) nodes: HashMap<String, Arc<dyn Node<S>>>,
    pub(super) entry: String,
    pub(super) edges: HashMap<String, Edge<S>>,
    pub(super) checkpointer: Option<Arc<dyn Checkpointer<S>>>,
}

impl<S> CompiledStateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Runs from the entry node until END, a `Next::End`, or the recursion limit.
    pub async fn invoke(&self, state: S, config: Option<RunnableConfig>) -> Result<S, AgentError> {
        let config = config.unwrap_or_default();
        let step = match self.get_state(&latest(&config)).await? {
            Some(cp) => cp.metadata.step + 1,
            None => 0,
        };
        self.save(&config, &state, Some(&self.entry), CheckpointSource::Input, step)
            .await?;
        self.drive(state, &config, self.entry.clone(), step + 1).await
    }

    /// Picks the thread's newest run back up at the node it had pending.
    ///
    /// A thread whose newest checkpoint is complete returns that state as is.
    pub async fn resume(&self, config: RunnableConfig) -> Result<S, AgentError> {
        let config = latest(&config);
        let Some(checkpoint) = self.get_state(&config).await? else {
            let thread = config.thread_id.clone().unwrap_or_default();
            return Err(CheckpointError::NoCheckpoint(thread).into());
        };
        let Checkpoint {
            state,
            pending_node,
            metadata,
            ..
        } = checkpoint;
        match pending_node {
            None => Ok(state),
            Some(node) => {
                tracing::info!(thread_id = ?config.thread_id, node = %node, "resuming run");
                self.drive(state, &config, node, metadata.step + 1).await
            }
        }
    }

    /// Checkpoint selected by `config` (newest unless it names one).
    pub async fn get_state(
        &self,
        config: &RunnableConfig,
    ) -> Result<Option<Checkpoint<S>>, AgentError> {
        match self.store(config) {
            Some(cp) => Ok(cp.get(config).await?),
            None => Ok(None),
        }
    }

    /// State at the end of the newest run that reached END.
    ///
    /// Checkpoints left by a run that failed midway are passed over.
    pub async fn last_completed_state(
        &self,
        config: &RunnableConfig,
    ) -> Result<Option<S>, AgentError> {
        let Some(cp) = self.store(config) else {
            return Ok(None);
        };
        let summaries = cp.list(config, None).await?;
        let Some(done) = summaries.into_iter().rev().find(|s| s.pending_node.is_none()) else {
            return Ok(None);
        };
        let at = config.clone().with_checkpoint_id(done.id);
        Ok(cp.get(&at).await?.map(|c| c.state))
    }

    /// The checkpointer, when the config names a thread to write to.
    fn store(&self, config: &RunnableConfig) -> Option<&Arc<dyn Checkpointer<S>>> {
        config.thread_id.as_ref().and(self.checkpointer.as_ref())
    }

    async fn save(
        &self,
        config: &RunnableConfig,
        state: &S,
        pending: Option<&String>,
        source: CheckpointSource,
        step: i64,
    ) -> Result<(), AgentError> {
        if let Some(cp) = self.store(config) {
            let checkpoint = Checkpoint::new(state.clone(), pending.cloned(), source, step);
            cp.put(config, checkpoint).await?;
        }
        Ok(())
    }

    async fn drive(
        &self,
        mut state: S,
        config: &RunnableConfig,
        mut current: String,
        mut step: i64,
    ) -> Result<S, AgentError> {
        let thread_id = config.thread_id.as_deref();
        tracing::info!(thread_id = ?thread_id, entry = %current, "graph run started");

        for executed in 0.. {
            if executed >= config.recursion_limit {
                let err = AgentError::RecursionLimit(config.recursion_limit);
                tracing::error!(error = %err, "graph run aborted");
                return Err(err);
            }
            let node = self.nodes.get(&current).ok_or_else(|| {
                AgentError::ExecutionFailed(format!("graph has no node '{}'", current))
            })?;
            tracing::debug!(node = %current, "node started");
            tracing::trace!(node = %current, state = ?state, "node input");

            let (updated, next) = node.run(state).await.map_err(|e| {
                tracing::error!(node = %current, error = %e, "node failed");
                e
            })?;
            state = updated;

            let pending = successor(self.edges.get(&current), &state, next).filter(|n| n != END);
            tracing::debug!(node = %current, next = ?pending, "node finished");
            self.save(config, &state, pending.as_ref(), CheckpointSource::Loop, step)
                .await?;
            step += 1;

            match pending {
                Some(next) => current = next,
                None => {
                    tracing::info!(thread_id = ?thread_id, nodes = executed + 1, "graph run finished");
                    break;
                }
            }
        }
        Ok(state)
    }
}

/// Same thread, newest checkpoint.
fn latest(config: &RunnableConfig) -> RunnableConfig {
    RunnableConfig {
        checkpoint_id: None,
        ..config.clone()
    }
}
