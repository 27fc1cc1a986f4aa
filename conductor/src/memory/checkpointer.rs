use async_trait::async_trait;

use super::checkpoint::{Checkpoint, CheckpointSummary};
use super::config::RunnableConfig;

#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    /// The config names no thread, so there is nowhere to read or write.
    #[error("checkpoint access needs a thread id")]
    MissingThreadId,
    #[error("no checkpoint stored for thread '{0}'")]
    NoCheckpoint(String),
    #[error("checkpoint backend failed: {0}")]
    Backend(String),
}

/// Storage for the checkpoints of graph runs, partitioned by thread.
///
/// Every method except `delete_thread` reads the thread from the config and
/// fails with [`CheckpointError::MissingThreadId`] when it has none.
#[async_trait]
pub trait Checkpointer<S>: Send + Sync
where
    S: Clone + Send + Sync + 'static,
{
    /// Appends a checkpoint to the thread and returns its id.
    async fn put(
        &self,
        config: &RunnableConfig,
        checkpoint: Checkpoint<S>,
    ) -> Result<String, CheckpointError>;

    /// The checkpoint named by `config.checkpoint_id`, or the newest one.
    async fn get(&self, config: &RunnableConfig) -> Result<Option<Checkpoint<S>>, CheckpointError>;

    /// Summaries in write order; with `limit`, only the newest `limit` of them.
    async fn list(
        &self,
        config: &RunnableConfig,
        limit: Option<usize>,
    ) -> Result<Vec<CheckpointSummary>, CheckpointError>;

    /// Removes the whole thread. Returns the number of checkpoints dropped.
    async fn delete_thread(&self, thread_id: &str) -> Result<usize, CheckpointError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_name_the_thread() {
        let msg = CheckpointError::NoCheckpoint("t9".into()).to_string();
        assert_eq!(msg, "no checkpoint stored for thread 't9'");
        assert!(CheckpointError::MissingThreadId.to_string().contains("thread id"));
    }
}
