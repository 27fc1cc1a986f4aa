/// What a node asks the run loop to do after it returns.
///
/// Routed nodes (those with a branch) have this overridden by their router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Next {
    /// Take the node's outgoing edge. A node without one ends the run.
    Continue,
    /// Jump to the named node.
    Node(String),
    /// Finish the run with the current state.
    End,
}
