use thiserror::Error;

/// Wiring mistakes found by `StateGraph::compile`.
#[derive(Debug, Error)]
pub enum CompilationError {
    /// An edge or branch mentions an id that was never added with `add_node`.
    #[error("edge refers to unknown node '{0}'")]
    UnknownNode(String),

    #[error("expected exactly one edge leaving START")]
    NoEntry,

    #[error("no edge or branch ever reaches END")]
    NoExit,

    #[error("node '{0}' has more than one fixed edge")]
    MultipleEdges(String),

    #[error("node '{0}' has both a fixed edge and a branch")]
    EdgeAndBranch(String),

    /// A branch target that is neither a node nor END.
    #[error("branch target '{0}' is not a node")]
    UnknownBranchTarget(String),
}
