//! Retrieval agent: query expansion, per-query top-k, dedup, summary message.


use std::collections::HashSet;
use std::sync::Arc;

use conductor::{
    Agent, AgentArgs, AgentError, AgentInput, Document, HashingEmbedder, InMemoryKnowledgeStore,
    KnowledgeStore, MockLlm, MockReply, RetrievalAgent, Settings,
};
use serde_json::json;

fn store() -> Arc<InMemoryKnowledgeStore> {
    Arc::new(InMemoryKnowledgeStore::new(Arc::new(HashingEmbedder::default())))
}

fn agent(mock: Arc<MockLlm>, store: Arc<InMemoryKnowledgeStore>, settings: Settings) -> RetrievalAgent {
    let args = AgentArgs::new("t1", mock)
        .with_knowledge(store)
        .with_settings(settings);
    RetrievalAgent::new(args).unwrap()
}

async fn seed(agent: &RetrievalAgent) {
    let docs = vec![
        Document::new("Rust ownership rules prevent data races at compile time."),
        Document::new("Tokio is an asynchronous runtime for the Rust language."),
        Document::new("Bread needs flour, water, salt and yeast."),
    ];
    assert_eq!(agent.add_documents(docs).await.unwrap(), 3);
}

#[test]
fn requires_knowledge_store() {
    let args = AgentArgs::new("t1", Arc::new(MockLlm::new(vec![])));
    assert!(matches!(
        RetrievalAgent::new(args),
        Err(AgentError::InvalidConfig(_))
    ));
}

/// **Scenario**: The question plus distinct reformulations are searched; results are merged without duplicates.
#[tokio::test]
async fn expands_queries_and_dedups_results() {
    let mock = Arc::new(MockLlm::new(vec![MockReply::json(json!({
        "queries": ["async runtime for Rust", "async runtime for Rust", " ", "Tokio runtime", "extra query"]
    }))]));
    let settings = Settings {
        top_k: 2,
        query_variants: 2,
        ..Settings::default()
    };
    let agent = agent(mock.clone(), store(), settings);
    seed(&agent).await;

    let out = agent.run(AgentInput::user("What is Tokio?")).await.unwrap();
    assert_eq!(mock.calls().len(), 1);
    let prompt = mock.calls()[0].messages[0].content().to_string();
    assert!(prompt.contains("What is Tokio?"), "{}", prompt);

    let ids: HashSet<&str> = out.documents.iter().filter_map(|d| d.uuid()).collect();
    assert_eq!(ids.len(), out.documents.len());
    assert!(!out.documents.is_empty() && out.documents.len() <= 3);

    assert_eq!(out.produced.len(), 1);
    let summary = out.reply().unwrap();
    assert!(summary.starts_with(&format!(
        "Retrieving {} documents relevant to the query.",
        out.documents.len()
    )));
    assert!(summary.contains("\n\n[1] "));

    let state = agent.state().await.unwrap().unwrap();
    assert_eq!(state.question, "What is Tokio?");
}

/// **Scenario**: With zero variants the model is never called.
#[tokio::test]
async fn zero_variants_skips_model() {
    let mock = Arc::new(MockLlm::new(vec![]));
    let settings = Settings {
        top_k: 1,
        query_variants: 0,
        ..Settings::default()
    };
    let agent = agent(mock.clone(), store(), settings);
    seed(&agent).await;

    let out = agent.run(AgentInput::user("bread ingredients")).await.unwrap();
    assert!(mock.calls().is_empty());
    assert_eq!(out.documents.len(), 1);
}

/// **Scenario**: Each run replaces the documents of the previous one.
#[tokio::test]
async fn documents_do_not_leak_across_runs() {
    let mock = Arc::new(MockLlm::new(vec![]));
    let settings = Settings {
        top_k: 1,
        query_variants: 0,
        ..Settings::default()
    };
    let store = store();
    let agent = agent(mock, store.clone(), settings);
    seed(&agent).await;

    agent.run(AgentInput::user("bread")).await.unwrap();
    let out = agent.run(AgentInput::user("ownership")).await.unwrap();
    assert_eq!(out.documents.len(), 1);
    // Re-adding identical content is a no-op.
    assert_eq!(
        store
            .add(vec![Document::new("Bread needs flour, water, salt and yeast.").with_identity()])
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn empty_store_reports_zero_documents() {
    let mock = Arc::new(MockLlm::new(vec![]));
    let settings = Settings {
        query_variants: 0,
        ..Settings::default()
    };
    let agent = agent(mock, store(), settings);
    let out = agent.run(AgentInput::user("anything")).await.unwrap();
    assert!(out.documents.is_empty());
    assert_eq!(
        out.reply(),
        Some("Retrieving 0 documents relevant to the query.")
    );
}
