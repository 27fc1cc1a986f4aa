//! Typed state machines for agents.
//!
//! An agent describes its control flow as a [`StateGraph`] over its own state
//! type: nodes, fixed edges and routed branches between `START` and `END`.
//! Compiling checks the wiring once; the resulting [`CompiledStateGraph`]
//! drives runs and writes a checkpoint at every node boundary.

mod compile_error;
mod compiled;
mod edge;
mod next;
mod node;
mod state_graph;

pub use compile_error::CompilationError;
pub use compiled::CompiledStateGraph;
pub use edge::RouteFn;
pub use next::Next;
pub use node::Node;
pub use state_graph::{StateGraph, END, START};
