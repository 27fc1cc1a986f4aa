//! StateGraph invoke: linear chains, conditional loops, recursion limit.

use std::collections::HashMap;
use std::sync::Arc;

use conductor::{AgentError, RunnableConfig, StateGraph, END, START};

use crate::common::{CounterState, IncrementNode};

#[tokio::test]
async fn invoke_linear_chain_runs_each_node_once() {
    let mut graph = StateGraph::<CounterState>::new();
    graph
        .add_node("a", Arc::new(IncrementNode("a")))
        .add_node("b", Arc::new(IncrementNode("b")))
        .add_edge(START, "a")
        .add_edge("a", "b")
        .add_edge("b", END);
    let compiled = graph.compile().unwrap();

    let out = compiled.invoke(CounterState::default(), None).await.unwrap();
    assert_eq!(out.count, 2);
    let ids: Vec<&str> = out.messages.iter().map(|m| m.content()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

fn looping_graph(target: usize) -> StateGraph<CounterState> {
    let mut graph = StateGraph::<CounterState>::new();
    graph
        .add_node("inc", Arc::new(IncrementNode("inc")))
        .add_node("done", Arc::new(IncrementNode("done")))
        .add_edge(START, "inc")
        .add_edge("done", END);
    let path_map: HashMap<String, String> = [("again", "inc"), ("stop", "done")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    graph.add_conditional_edges(
        "inc",
        Arc::new(move |s: &CounterState| {
            if s.count < target {
                "again".to_string()
            } else {
                "stop".to_string()
            }
        }),
        Some(path_map),
    );
    graph
}

/// **Scenario**: A conditional self-loop runs until the router sends it on.
#[tokio::test]
async fn conditional_loop_runs_until_condition() {
    let compiled = looping_graph(3).compile().unwrap();
    let out = compiled.invoke(CounterState::default(), None).await.unwrap();
    assert_eq!(out.count, 4);
    assert_eq!(out.messages.last().unwrap().content(), "done");
}

/// **Scenario**: A loop longer than the recursion limit fails with RecursionLimit.
#[tokio::test]
async fn recursion_limit_stops_runaway_loop() {
    let compiled = looping_graph(1000).compile().unwrap();
    let config = RunnableConfig::default().with_recursion_limit(5);
    let err = compiled
        .invoke(CounterState::default(), Some(config))
        .await
        .unwrap_err();
    assert!(matches!(err, AgentError::RecursionLimit(5)), "{:?}", err);
}
