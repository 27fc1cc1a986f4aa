//! Shared agent machinery: identity, bound model, per-thread checkpoints, compiled graph.

use std::fmt::Debug;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::AgentError;
use crate::graph::{CompiledStateGraph, StateGraph};
use crate::knowledge::Document;
use crate::llm::LlmClient;
use crate::memory::{MemorySaver, RunnableConfig, DEFAULT_RECURSION_LIMIT};
use crate::message::Message;

use super::{AgentInput, AgentOutput};

/// State an agent graph runs over: a transcript plus agent-specific fields.
pub trait AgentState: Clone + Default + Debug + Send + Sync + 'static {
    fn messages(&self) -> &[Message];

    fn messages_mut(&mut self) -> &mut Vec<Message>;

    /// Documents carried by the state; empty unless the agent retrieves.
    fn documents(&self) -> Vec<Document> {
        Vec::new()
    }

    /// Applies a run's inputs to the state loaded from the last completed run.
    ///
    /// Default appends one user message per input.
    fn apply_input(&mut self, inputs: &[String]) {
        self.messages_mut()
            .extend(inputs.iter().map(|m| Message::user(m.as_str())));
    }
}

/// Identity, model, memory and graph shared by every agent variant.
///
/// The graph is installed once after construction; until then `run` fails with
/// `AgentError::Uninitialized`.
pub struct AgentCore<S>
where
    S: AgentState,
{
    name: String,
    description: String,
    thread_id: String,
    model: Arc<dyn LlmClient>,
    memory: Arc<MemorySaver<S>>,
    graph: Option<CompiledStateGraph<S>>,
    recursion_limit: usize,
    running: Mutex<()>,
}

impl<S> AgentCore<S>
where
    S: AgentState,
{
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        thread_id: impl Into<String>,
        model: Arc<dyn LlmClient>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            thread_id: thread_id.into(),
            model,
            memory: Arc::new(MemorySaver::new()),
            graph: None,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            running: Mutex::new(()),
        }
    }

    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }

    /// Compiles `graph` against this agent's checkpointer and installs it.
    pub fn install(&mut self, graph: StateGraph<S>) -> Result<(), AgentError> {
        self.graph = Some(graph.compile_with_checkpointer(self.memory.clone())?);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    pub fn model(&self) -> &Arc<dyn LlmClient> {
        &self.model
    }

    pub fn config(&self) -> RunnableConfig {
        RunnableConfig::for_thread(self.thread_id.clone()).with_recursion_limit(self.recursion_limit)
    }

    fn graph(&self) -> Result<&CompiledStateGraph<S>, AgentError> {
        self.graph
            .as_ref()
            .ok_or_else(|| AgentError::Uninitialized(self.name.clone()))
    }

    /// State of the latest checkpoint of this thread, completed or not.
    pub async fn latest_state(&self) -> Result<Option<S>, AgentError> {
        Ok(self
            .graph()?
            .get_state(&self.config())
            .await?
            .map(|c| c.state))
    }

    /// One run: last completed state + inputs, driven from the entry node to END.
    ///
    /// A failed run leaves its partial checkpoints behind but the next run starts
    /// from the last completed one, so the failure is never observed.
    pub async fn run(&self, input: AgentInput) -> Result<AgentOutput, AgentError> {
        let _guard = self
            .running
            .try_lock()
            .map_err(|_| AgentError::ThreadBusy(self.thread_id.clone()))?;
        let graph = self.graph()?;
        let config = self.config();

        let mut state = graph.last_completed_state(&config).await?.unwrap_or_default();
        state.apply_input(&input.messages);
        let start = state.messages().len();
        tracing::info!(
            agent = %self.name,
            thread_id = %self.thread_id,
            inputs = input.messages.len(),
            "agent run"
        );

        let state = graph.invoke(state, Some(config)).await?;
        let produced = state.messages().get(start..).unwrap_or_default().to_vec();
        tracing::debug!(agent = %self.name, produced = produced.len(), "agent run complete");
        Ok(AgentOutput {
            messages: state.messages().to_vec(),
            produced,
            documents: state.documents(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;

    use crate::graph::{Next, Node, END, START};
    use crate::llm::MockLlm;

    #[derive(Debug, Clone, Default)]
    struct EchoState {
        messages: Vec<Message>,
    }

    impl AgentState for EchoState {
        fn messages(&self) -> &[Message] {
            &self.messages
        }
        fn messages_mut(&mut self) -> &mut Vec<Message> {
            &mut self.messages
        }
    }

    struct EchoNode;

    #[async_trait]
    impl Node<EchoState> for EchoNode {
        fn id(&self) -> &str {
            "echo"
        }
        async fn run(&self, mut state: EchoState) -> Result<(EchoState, Next), AgentError> {
            let last = state.messages.last().map(|m| m.content().to_string()).unwrap_or_default();
            state.messages.push(Message::assistant(format!("echo: {}", last)));
            Ok((state, Next::Continue))
        }
    }

    fn echo_core() -> AgentCore<EchoState> {
        let mut core = AgentCore::new("echo", "Echoes", "t1", Arc::new(MockLlm::new(vec![])));
        let mut graph = StateGraph::<EchoState>::new();
        graph.add_node("echo", Arc::new(EchoNode));
        graph.add_edge(START, "echo");
        graph.add_edge("echo", END);
        core.install(graph).unwrap();
        core
    }

    /// **Scenario**: Running before the graph is installed fails with Uninitialized.
    #[tokio::test]
    async fn run_without_graph_is_uninitialized() {
        let core: AgentCore<EchoState> =
            AgentCore::new("bare", "", "t1", Arc::new(MockLlm::new(vec![])));
        let err = core.run(AgentInput::user("hi")).await.unwrap_err();
        assert!(matches!(err, AgentError::Uninitialized(ref n) if n == "bare"));
    }

    /// **Scenario**: Consecutive runs continue the same transcript; produced holds only the new reply.
    #[tokio::test]
    async fn runs_accumulate_and_report_delta() {
        let core = echo_core();
        let first = core.run(AgentInput::user("a")).await.unwrap();
        assert_eq!(first.messages.len(), 2);
        assert_eq!(first.produced, vec![Message::assistant("echo: a")]);

        let second = core.run(AgentInput::user("b")).await.unwrap();
        assert_eq!(second.messages.len(), 4);
        assert_eq!(second.produced, vec![Message::assistant("echo: b")]);
        assert_eq!(second.reply(), Some("echo: b"));

        let latest = core.latest_state().await.unwrap().unwrap();
        assert_eq!(latest.messages.len(), 4);
    }

    /// **Scenario**: A run while another holds the thread is rejected with ThreadBusy.
    #[tokio::test]
    async fn concurrent_run_is_busy() {
        let core = echo_core();
        let _held = core.running.lock().await;
        let err = core.run(AgentInput::user("x")).await.unwrap_err();
        assert!(matches!(err, AgentError::ThreadBusy(ref t) if t == "t1"));
    }
}
