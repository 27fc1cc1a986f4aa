//! Snapshots written by the graph run loop.

use chrono::{DateTime, Utc};

/// Which part of the run loop wrote a checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointSource {
    /// The initial state, saved before the entry node runs.
    Input,
    /// The state right after a node returned.
    Loop,
}

#[derive(Debug, Clone)]
pub struct CheckpointMetadata {
    pub source: CheckpointSource,
    /// Increases by one per write, across every invocation on the thread.
    pub step: i64,
    pub created_at: DateTime<Utc>,
}

/// State of one thread at a node boundary.
///
/// `pending_node` is the node the run would execute next. A checkpoint without
/// one closes an invocation that reached END.
#[derive(Debug, Clone)]
pub struct Checkpoint<S> {
    pub id: String,
    pub state: S,
    pub pending_node: Option<String>,
    pub metadata: CheckpointMetadata,
}

/// Lightweight view of a stored checkpoint, without its state.
#[derive(Debug, Clone)]
pub struct CheckpointSummary {
    pub id: String,
    pub pending_node: Option<String>,
    pub metadata: CheckpointMetadata,
}

impl<S> Checkpoint<S> {
    pub fn new(state: S, pending_node: Option<String>, source: CheckpointSource, step: i64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            state,
            pending_node,
            metadata: CheckpointMetadata {
                source,
                step,
                created_at: Utc::now(),
            },
        }
    }

    pub fn is_complete(&self) -> bool {
        self.pending_node.is_none()
    }

    pub fn summary(&self) -> CheckpointSummary {
        CheckpointSummary {
            id: self.id.clone(),
            pending_node: self.pending_node.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_per_checkpoint() {
        let a = Checkpoint::new(1, None, CheckpointSource::Input, 0);
        let b = Checkpoint::new(1, None, CheckpointSource::Input, 0);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn summary_carries_pending_node_and_step() {
        let cp = Checkpoint::new("s", Some("respond".into()), CheckpointSource::Loop, 3);
        assert!(!cp.is_complete());
        let summary = cp.summary();
        assert_eq!(summary.id, cp.id);
        assert_eq!(summary.pending_node.as_deref(), Some("respond"));
        assert_eq!(summary.metadata.step, 3);
        assert_eq!(summary.metadata.source, CheckpointSource::Loop);
    }
}
