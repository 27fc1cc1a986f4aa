//! Runs the `conductor` binary for the paths that need no model access.

use std::process::{Command, Output};

fn conductor(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_conductor"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("LOG_FILE")
        .output()
        .expect("failed to run conductor binary")
}

#[test]
fn help_mentions_agents_subcommand() {
    let out = conductor(&["--help"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("conductor"));
    assert!(stdout.contains("agents"));
    assert!(stdout.contains("--doc"));
}

#[test]
fn agents_json_lists_builtins() {
    let out = conductor(&["agents", "--json"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let agents: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let names: Vec<&str> = agents
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|a| a["name"].as_str())
        .collect();
    assert_eq!(names, vec!["orchestrator", "planning", "retrieval"]);
}

#[test]
fn missing_message_fails() {
    let out = conductor(&[]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("provide a message"));
}

/// **Scenario**: Non-text uploads are rejected before any model call.
#[test]
fn non_text_document_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("slides.pdf");
    std::fs::write(&path, "%PDF-1.4").unwrap();

    let out = conductor(&["--doc", path.to_str().unwrap(), "summarize"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Unsupported file type: slides.pdf"), "{}", stderr);
}
