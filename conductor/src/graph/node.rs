use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::AgentError;

use super::Next;

/// A step of an agent's state machine.
///
/// Takes the whole state by value and hands back the updated state; the run
/// loop checkpoints whatever comes back before it moves on.
#[async_trait]
pub trait Node<S>: Send + Sync
where
    S: Clone + Send + Sync + Debug + 'static,
{
    fn id(&self) -> &str;

    async fn run(&self, state: S) -> Result<(S, Next), AgentError>;
}
