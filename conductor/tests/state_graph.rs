//! Integration tests for StateGraph: invoke, conditional loops, checkpoints and resume.
//!
//! - `common`: shared state and nodes
//! - `invoke`: linear and looping runs, recursion limit
//! - `checkpoint`: per-node checkpoints, resume after a failed node


#[path = "state_graph/common.rs"]
mod common;

#[path = "state_graph/invoke.rs"]
mod invoke;

#[path = "state_graph/checkpoint.rs"]
mod checkpoint;
