//! Per-thread checkpoint persistence.
//!
//! A compiled graph writes one [`Checkpoint`] after every node it runs for a
//! thread; agents read the latest completed one back on their next run.

mod checkpoint;
mod checkpointer;
mod config;
mod memory_saver;

pub use checkpoint::{Checkpoint, CheckpointMetadata, CheckpointSource, CheckpointSummary};
pub use checkpointer::{CheckpointError, Checkpointer};
pub use config::{RunnableConfig, DEFAULT_RECURSION_LIMIT};
pub use memory_saver::MemorySaver;
