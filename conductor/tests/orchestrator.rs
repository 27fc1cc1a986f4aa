//! Orchestrator: direct answers, delegation, unknown targets.


use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use conductor::{
    Agent, AgentArgs, AgentError, AgentInput, AgentOutput, Message, MockLlm, MockReply,
    OrchestratorAgent,
};
use serde_json::json;

/// Managed agent that answers with a fixed text and counts its runs.
struct StubAgent {
    thread_id: String,
    reply: String,
    runs: AtomicUsize,
    last_input: std::sync::Mutex<Vec<String>>,
}

impl StubAgent {
    fn new(thread_id: &str, reply: &str) -> Self {
        Self {
            thread_id: thread_id.to_string(),
            reply: reply.to_string(),
            runs: AtomicUsize::new(0),
            last_input: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Agent for StubAgent {
    fn name(&self) -> &str {
        "stub"
    }
    fn description(&self) -> &str {
        "Answers everything with one sentence"
    }
    fn thread_id(&self) -> &str {
        &self.thread_id
    }
    async fn run(&self, input: AgentInput) -> Result<AgentOutput, AgentError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        *self.last_input.lock().unwrap() = input.messages.clone();
        let produced = vec![
            Message::assistant("working on it"),
            Message::assistant(self.reply.clone()),
        ];
        Ok(AgentOutput {
            messages: produced.clone(),
            produced,
            documents: vec![],
        })
    }
}

fn orchestrator(mock: Arc<MockLlm>, stub: Arc<StubAgent>) -> OrchestratorAgent {
    let args = AgentArgs::new("t1", mock).with_managed_agents(vec![stub]);
    OrchestratorAgent::new(args).unwrap()
}

/// **Scenario**: The `none` sentinel answers directly with exactly one assistant message.
#[tokio::test]
async fn sentinel_answers_directly() {
    let mock = Arc::new(MockLlm::new(vec![
        MockReply::json(json!({"reason": "small talk", "chosen_agent": "None"})),
        MockReply::text("Hello! How can I help?"),
    ]));
    let stub = Arc::new(StubAgent::new("t1", "unused"));
    let agent = orchestrator(mock.clone(), stub.clone());

    let out = agent.run(AgentInput::user("hi")).await.unwrap();
    assert_eq!(out.produced, vec![Message::assistant("Hello! How can I help?")]);
    assert_eq!(stub.runs.load(Ordering::SeqCst), 0);

    // The routing prompt lists the managed agents.
    let calls = mock.calls();
    let system = calls[0].messages[0].content();
    assert!(system.contains("- 'stub': Answers everything with one sentence"), "{}", system);

    let state = agent.state().await.unwrap().unwrap();
    assert_eq!(state.specialized_agents, vec!["stub".to_string()]);
}

/// **Scenario**: Delegation runs the managed agent on the last user message and merges its output.
#[tokio::test]
async fn delegation_merges_managed_output() {
    let mock = Arc::new(MockLlm::new(vec![MockReply::json(
        json!({"reason": "needs work", "chosen_agent": "stub"}),
    )]));
    let stub = Arc::new(StubAgent::new("t1", "done by stub"));
    let agent = orchestrator(mock.clone(), stub.clone());

    let out = agent.run(AgentInput::user("do the thing")).await.unwrap();
    assert_eq!(stub.runs.load(Ordering::SeqCst), 1);
    assert_eq!(*stub.last_input.lock().unwrap(), vec!["do the thing".to_string()]);
    let produced: Vec<&str> = out.produced.iter().map(|m| m.content()).collect();
    assert_eq!(produced, vec!["working on it", "done by stub"]);
    assert_eq!(out.reply(), Some("done by stub"));
    // Only the routing call hit the model.
    assert_eq!(mock.calls().len(), 1);
}

/// **Scenario**: An unknown agent name yields a diagnostic message, not an error.
#[tokio::test]
async fn unknown_agent_yields_diagnostic() {
    let mock = Arc::new(MockLlm::new(vec![MockReply::json(
        json!({"reason": "?", "chosen_agent": "coder"}),
    )]));
    let stub = Arc::new(StubAgent::new("t1", "unused"));
    let agent = orchestrator(mock, stub.clone());

    let out = agent.run(AgentInput::user("write code")).await.unwrap();
    assert_eq!(
        out.reply(),
        Some("Agent 'coder' not found. Available agents: ['stub']")
    );
    assert_eq!(stub.runs.load(Ordering::SeqCst), 0);
}

/// **Scenario**: An unparsable routing reply is retried once before the run fails.
#[tokio::test]
async fn unparsable_route_fails_after_retry() {
    let mock = Arc::new(MockLlm::with_no_tool_calls("I think planning?"));
    let stub = Arc::new(StubAgent::new("t1", "unused"));
    let agent = orchestrator(mock.clone(), stub);

    let err = agent.run(AgentInput::user("hi")).await.unwrap_err();
    assert!(matches!(err, AgentError::ExecutionFailed(_)), "{:?}", err);
    assert_eq!(mock.calls().len(), 2);
}

#[test]
fn orchestrator_cannot_manage_orchestrator() {
    let mock: Arc<MockLlm> = Arc::new(MockLlm::new(vec![]));
    let inner = Arc::new(OrchestratorAgent::new(AgentArgs::new("t1", mock.clone())).unwrap());
    let result = OrchestratorAgent::new(AgentArgs::new("t1", mock).with_managed_agents(vec![inner]));
    assert!(matches!(result, Err(AgentError::InvalidConfig(_))));
}
