//! Graph builder.
//!
//! Nodes are added by id, then wired with `add_edge` (one fixed successor) or
//! `add_conditional_edges` (successor picked from the state). `START` and `END`
//! are the pseudo nodes at either side. A node takes one kind of edge, never
//! both. Loops are fine: each run is capped by its recursion limit instead.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::Arc;

use crate::memory::Checkpointer;

use super::compile_error::CompilationError;
use super::compiled::CompiledStateGraph;
use super::edge::{Edge, RouteFn};
use super::node::Node;

pub const START: &str = "__start__";
pub const END: &str = "__end__";

pub struct StateGraph<S> {
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    fixed: Vec<(String, String)>,
    branches: Vec<(String, RouteFn<S>, Option<HashMap<String, String>>)>,
}

impl<S> Default for StateGraph<S> {
    fn default() -> Self {
        Self {
            nodes: HashMap::new(),
            fixed: Vec::new(),
            branches: Vec::new(),
        }
    }
}

impl<S> StateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `node` under `id`, replacing an earlier node with that id.
    pub fn add_node(&mut self, id: impl Into<String>, node: Arc<dyn Node<S>>) -> &mut Self {
        self.nodes.insert(id.into(), node);
        self
    }

    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        self.fixed.push((from.into(), to.into()));
        self
    }

    /// After `source` runs, `route(state)` yields a key; `targets[key]` (or the key
    /// itself when unmapped) is the next node.
    pub fn add_conditional_edges(
        &mut self,
        source: impl Into<String>,
        route: RouteFn<S>,
        targets: Option<HashMap<String, String>>,
    ) -> &mut Self {
        let source = source.into();
        self.branches.retain(|(s, _, _)| *s != source);
        self.branches.push((source, route, targets));
        self
    }

    pub fn compile(self) -> Result<CompiledStateGraph<S>, CompilationError> {
        self.build(None)
    }

    /// Like `compile`, but runs that carry a thread id are checkpointed.
    pub fn compile_with_checkpointer(
        self,
        checkpointer: Arc<dyn Checkpointer<S>>,
    ) -> Result<CompiledStateGraph<S>, CompilationError> {
        self.build(Some(checkpointer))
    }

    fn known(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    fn check(&self) -> Result<String, CompilationError> {
        for (from, to) in &self.fixed {
            if from != START && !self.known(from) {
                return Err(CompilationError::UnknownNode(from.clone()));
            }
            if to != END && !self.known(to) {
                return Err(CompilationError::UnknownNode(to.clone()));
            }
        }
        for (source, _, targets) in &self.branches {
            if !self.known(source) {
                return Err(CompilationError::UnknownNode(source.clone()));
            }
            let bad = targets
                .iter()
                .flat_map(|t| t.values())
                .find(|to| *to != END && !self.known(to));
            if let Some(to) = bad {
                return Err(CompilationError::UnknownBranchTarget(to.clone()));
            }
        }

        let entries: Vec<&String> = self
            .fixed
            .iter()
            .filter(|(from, _)| from == START)
            .map(|(_, to)| to)
            .collect();
        let [entry] = entries.as_slice() else {
            return Err(CompilationError::NoEntry);
        };

        // An unmapped branch can return END directly, so it counts as an exit.
        let fixed_exit = self.fixed.iter().any(|(_, to)| to == END);
        let branch_exit = self
            .branches
            .iter()
            .any(|(_, _, t)| t.as_ref().map_or(true, |t| t.values().any(|to| to == END)));
        if !fixed_exit && !branch_exit {
            return Err(CompilationError::NoExit);
        }

        let mut sources = HashSet::new();
        for (from, _) in self.fixed.iter().filter(|(from, _)| from != START) {
            if !sources.insert(from.as_str()) {
                return Err(CompilationError::MultipleEdges(from.clone()));
            }
            if self.branches.iter().any(|(s, _, _)| s == from) {
                return Err(CompilationError::EdgeAndBranch(from.clone()));
            }
        }
        Ok((*entry).clone())
    }

    fn build(
        self,
        checkpointer: Option<Arc<dyn Checkpointer<S>>>,
    ) -> Result<CompiledStateGraph<S>, CompilationError> {
        let entry = self.check()?;
        let mut edges: HashMap<String, Edge<S>> = HashMap::new();
        for (from, to) in self.fixed {
            if from != START {
                edges.insert(from, Edge::Fixed(to));
            }
        }
        for (source, route, targets) in self.branches {
            edges.insert(source, Edge::Branch { route, targets });
        }
        Ok(CompiledStateGraph {
            nodes: self.nodes,
            entry,
            edges,
            checkpointer,
        })
    }
}
