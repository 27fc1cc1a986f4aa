//! Shared types for StateGraph integration tests: CounterState and nodes.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use conductor::{AgentError, Message, Next, Node};

#[derive(Debug, Clone, Default)]
pub struct CounterState {
    pub messages: Vec<Message>,
    pub count: usize,
}

/// Increments `count` and records the node id as an assistant message.
pub struct IncrementNode(pub &'static str);

#[async_trait]
impl Node<CounterState> for IncrementNode {
    fn id(&self) -> &str {
        self.0
    }
    async fn run(&self, mut state: CounterState) -> Result<(CounterState, Next), AgentError> {
        state.count += 1;
        state.messages.push(Message::assistant(self.0));
        Ok((state, Next::Continue))
    }
}

/// Fails the first `failures` times it runs, then behaves like `IncrementNode`.
pub struct FlakyNode {
    id: &'static str,
    failures: AtomicUsize,
}

impl FlakyNode {
    pub fn new(id: &'static str, failures: usize) -> Self {
        Self {
            id,
            failures: AtomicUsize::new(failures),
        }
    }
}

#[async_trait]
impl Node<CounterState> for FlakyNode {
    fn id(&self) -> &str {
        self.id
    }
    async fn run(&self, mut state: CounterState) -> Result<(CounterState, Next), AgentError> {
        let left = self.failures.load(Ordering::SeqCst);
        if left > 0 {
            self.failures.store(left - 1, Ordering::SeqCst);
            return Err(AgentError::ExecutionFailed("transient failure".into()));
        }
        state.count += 1;
        state.messages.push(Message::assistant(self.id));
        Ok((state, Next::Continue))
    }
}
