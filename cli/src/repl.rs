//! Interactive loop: read a line, answer it, repeat until EOF or `/quit`.
//!
//! Slash commands: `/ingest FILE...`, `/history`, `/agents`, `/new`, `/quit`.

use std::io::Write;
use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, BufReader};

use cli::{render_agents, render_history, render_reply, CliError, OutputFormat, Session};

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Message(String),
    Ingest(Vec<PathBuf>),
    History,
    Agents,
    New,
    Quit,
    Unknown(String),
}

fn parse_line(line: &str) -> Option<Input> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if !line.starts_with('/') {
        return Some(Input::Message(line.to_string()));
    }
    let mut parts = line.split_whitespace();
    let cmd = parts.next().unwrap_or_default();
    Some(match cmd.to_lowercase().as_str() {
        "/quit" | "/exit" => Input::Quit,
        "/history" => Input::History,
        "/agents" => Input::Agents,
        "/new" => Input::New,
        "/ingest" => Input::Ingest(parts.map(PathBuf::from).collect()),
        _ => Input::Unknown(cmd.to_string()),
    })
}

async fn handle(session: &mut Session, input: Input, format: OutputFormat) -> Result<(), CliError> {
    match input {
        Input::Message(text) => {
            let res = session.ask(&text).await?;
            println!("{}", render_reply(&res, format)?);
        }
        Input::Ingest(paths) if paths.is_empty() => eprintln!("usage: /ingest FILE..."),
        Input::Ingest(paths) => {
            let added = session.ingest(&paths).await?;
            println!("Added {} chunks.", added);
        }
        Input::History => {
            let history = session.history().await?;
            let thread = session.thread_id().unwrap_or_default().to_string();
            println!("{}", render_history(&thread, &history, format)?);
        }
        Input::Agents => println!("{}", render_agents(&session.service().list_agents(), format)?),
        Input::New => {
            session.reset()?;
            println!("Started a new conversation.");
        }
        Input::Unknown(cmd) => eprintln!("unknown command: {}", cmd),
        Input::Quit => {}
    }
    Ok(())
}

/// Runs until EOF or `/quit`. Errors of one turn are printed and the loop continues.
pub async fn run(session: &mut Session, format: OutputFormat) -> Result<(), CliError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let Some(input) = parse_line(&line) else {
            continue;
        };
        if input == Input::Quit {
            break;
        }
        if let Err(e) = handle(session, input, format).await {
            eprintln!("error: {}", e);
        }
    }
    if let Some(id) = session.thread_id() {
        eprintln!("thread: {}", id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_messages_and_commands() {
        assert_eq!(parse_line("   "), None);
        assert_eq!(parse_line(" hello "), Some(Input::Message("hello".into())));
        assert_eq!(parse_line("/QUIT"), Some(Input::Quit));
        assert_eq!(parse_line("/exit"), Some(Input::Quit));
        assert_eq!(parse_line("/history"), Some(Input::History));
        assert_eq!(
            parse_line("/ingest a.txt b.txt"),
            Some(Input::Ingest(vec!["a.txt".into(), "b.txt".into()]))
        );
        assert_eq!(parse_line("/frobnicate"), Some(Input::Unknown("/frobnicate".into())));
    }
}
