//! Checkpointing: one checkpoint per node, resume from the pending node.

use std::sync::Arc;

use conductor::{AgentError, Checkpointer, MemorySaver, RunnableConfig, StateGraph, END, START};

use crate::common::{CounterState, FlakyNode, IncrementNode};

/// **Scenario**: Invoke with a thread writes an input checkpoint plus one per node.
#[tokio::test]
async fn checkpoint_written_after_every_node() {
    let saver = Arc::new(MemorySaver::<CounterState>::new());
    let mut graph = StateGraph::<CounterState>::new();
    graph
        .add_node("a", Arc::new(IncrementNode("a")))
        .add_node("b", Arc::new(IncrementNode("b")))
        .add_edge(START, "a")
        .add_edge("a", "b")
        .add_edge("b", END);
    let compiled = graph.compile_with_checkpointer(saver.clone()).unwrap();
    let config = RunnableConfig::for_thread("t1");

    compiled
        .invoke(CounterState::default(), Some(config.clone()))
        .await
        .unwrap();
    let items = saver.list(&config, None).await.unwrap();
    let pending: Vec<Option<&str>> = items.iter().map(|i| i.pending_node.as_deref()).collect();
    assert_eq!(pending, vec![Some("a"), Some("b"), None]);
    let steps: Vec<i64> = items.iter().map(|i| i.metadata.step).collect();
    assert_eq!(steps, vec![0, 1, 2]);

    let latest = compiled.get_state(&config).await.unwrap().unwrap();
    assert!(latest.is_complete());
    assert_eq!(latest.state.count, 2);
}

/// **Scenario**: A failed node leaves the previous checkpoint; resume reruns only that node.
#[tokio::test]
async fn resume_continues_from_failed_node() {
    let saver = Arc::new(MemorySaver::<CounterState>::new());
    let mut graph = StateGraph::<CounterState>::new();
    graph
        .add_node("a", Arc::new(IncrementNode("a")))
        .add_node("flaky", Arc::new(FlakyNode::new("flaky", 1)))
        .add_edge(START, "a")
        .add_edge("a", "flaky")
        .add_edge("flaky", END);
    let compiled = graph.compile_with_checkpointer(saver).unwrap();
    let config = RunnableConfig::for_thread("t1");

    let err = compiled
        .invoke(CounterState::default(), Some(config.clone()))
        .await
        .unwrap_err();
    assert!(matches!(err, AgentError::ExecutionFailed(_)));
    let stuck = compiled.get_state(&config).await.unwrap().unwrap();
    assert_eq!(stuck.pending_node.as_deref(), Some("flaky"));
    assert_eq!(stuck.state.count, 1);
    assert!(compiled.last_completed_state(&config).await.unwrap().is_none());

    let out = compiled.resume(config.clone()).await.unwrap();
    assert_eq!(out.count, 2);
    let ids: Vec<&str> = out.messages.iter().map(|m| m.content()).collect();
    assert_eq!(ids, vec!["a", "flaky"]);

    let done = compiled.last_completed_state(&config).await.unwrap().unwrap();
    assert_eq!(done.count, 2);
    // Completed thread: resume returns the stored state unchanged.
    assert_eq!(compiled.resume(config).await.unwrap().count, 2);
}

#[tokio::test]
async fn resume_unknown_thread_is_not_found() {
    let mut graph = StateGraph::<CounterState>::new();
    graph
        .add_node("a", Arc::new(IncrementNode("a")))
        .add_edge(START, "a")
        .add_edge("a", END);
    let compiled = graph
        .compile_with_checkpointer(Arc::new(MemorySaver::new()))
        .unwrap();
    let err = compiled
        .resume(RunnableConfig::for_thread("ghost"))
        .await
        .unwrap_err();
    assert!(matches!(err, AgentError::Checkpoint(_)), "{:?}", err);
}
