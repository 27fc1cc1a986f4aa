use thiserror::Error;

use crate::error::AgentError;

/// Errors at the chat service boundary.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Unknown thread id.
    #[error("chat not found")]
    NotFound(String),

    /// A submit is already in flight for the thread.
    #[error("chat '{0}' is busy with another request")]
    Busy(String),

    /// Rejected input (e.g. unsupported upload).
    #[error("{0}")]
    BadRequest(String),

    /// Model, tool, store or delegation failure; the thread keeps its prior state.
    #[error("Error processing request: {0}")]
    Internal(#[from] AgentError),
}

impl ServiceError {
    /// Caller errors (4xx class) as opposed to internal failures.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ServiceError::Internal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_and_internal_classes() {
        assert!(ServiceError::NotFound("t".into()).is_client_error());
        assert!(ServiceError::Busy("t".into()).is_client_error());
        let internal = ServiceError::from(AgentError::ExecutionFailed("boom".into()));
        assert!(!internal.is_client_error());
        assert_eq!(
            internal.to_string(),
            "Error processing request: execution failed: boom"
        );
        assert_eq!(ServiceError::NotFound("t".into()).to_string(), "chat not found");
    }
}
