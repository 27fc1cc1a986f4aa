//! Process-local checkpointer. Contents vanish with the process.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::checkpoint::{Checkpoint, CheckpointSummary};
use super::checkpointer::{CheckpointError, Checkpointer};
use super::config::RunnableConfig;

/// Checkpoints per thread, oldest first.
///
/// Storing a completed checkpoint drops everything older than the thread's previous
/// completed checkpoint, so a thread holds at most its last finished run plus what
/// came after it.
pub struct MemorySaver<S> {
    threads: RwLock<HashMap<String, Vec<Checkpoint<S>>>>,
}

impl<S> MemorySaver<S> {
    pub fn new() -> Self {
        Self {
            threads: RwLock::new(HashMap::new()),
        }
    }
}

impl<S> Default for MemorySaver<S> {
    fn default() -> Self {
        Self::new()
    }
}

fn thread_of(config: &RunnableConfig) -> Result<&str, CheckpointError> {
    config
        .thread_id
        .as_deref()
        .ok_or(CheckpointError::MissingThreadId)
}

#[async_trait]
impl<S> Checkpointer<S> for MemorySaver<S>
where
    S: Clone + Send + Sync + 'static,
{
    async fn put(
        &self,
        config: &RunnableConfig,
        checkpoint: Checkpoint<S>,
    ) -> Result<String, CheckpointError> {
        let thread = thread_of(config)?;
        let id = checkpoint.id.clone();
        let mut threads = self.threads.write().await;
        let all = threads.entry(thread.to_string()).or_default();
        if checkpoint.is_complete() {
            if let Some(base) = all.iter().rposition(Checkpoint::is_complete) {
                all.drain(..base);
            }
        }
        all.push(checkpoint);
        Ok(id)
    }

    async fn get(&self, config: &RunnableConfig) -> Result<Option<Checkpoint<S>>, CheckpointError> {
        let thread = thread_of(config)?;
        let threads = self.threads.read().await;
        let stored = threads.get(thread).and_then(|all| match &config.checkpoint_id {
            Some(wanted) => all.iter().find(|cp| &cp.id == wanted),
            None => all.last(),
        });
        Ok(stored.cloned())
    }

    async fn list(
        &self,
        config: &RunnableConfig,
        limit: Option<usize>,
    ) -> Result<Vec<CheckpointSummary>, CheckpointError> {
        let thread = thread_of(config)?;
        let threads = self.threads.read().await;
        let all = threads.get(thread).map(Vec::as_slice).unwrap_or_default();
        let skip = limit.map_or(0, |n| all.len().saturating_sub(n));
        Ok(all[skip..].iter().map(Checkpoint::summary).collect())
    }

    async fn delete_thread(&self, thread_id: &str) -> Result<usize, CheckpointError> {
        let removed = self.threads.write().await.remove(thread_id);
        Ok(removed.map_or(0, |all| all.len()))
    }
}
