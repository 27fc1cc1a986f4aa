//! Rendering of replies, history and agent listings.

use conductor::{AgentInfo, ChatMessage, SubmitResponse};
use serde_json::json;

use crate::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    /// One compact JSON document per output.
    Json,
}

pub fn render_reply(res: &SubmitResponse, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Text => Ok(res.reply.clone()),
        OutputFormat::Json => Ok(serde_json::to_string(res)?),
    }
}

pub fn render_agents(agents: &[AgentInfo], format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Text => {
            let width = agents.iter().map(|a| a.name.len()).max().unwrap_or(0);
            Ok(agents
                .iter()
                .map(|a| format!("{:width$}  {}", a.name, a.description, width = width))
                .collect::<Vec<_>>()
                .join("\n"))
        }
        OutputFormat::Json => Ok(serde_json::to_string(agents)?),
    }
}

pub fn render_history(
    thread_id: &str,
    history: &[ChatMessage],
    format: OutputFormat,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Text => Ok(history
            .iter()
            .map(|m| format!("{}: {}", m.role, m.content))
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Json => Ok(serde_json::to_string(
            &json!({ "thread_id": thread_id, "messages": history }),
        )?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_as_text_and_json() {
        let res = SubmitResponse {
            thread_id: "t1".into(),
            reply: "hi".into(),
        };
        assert_eq!(render_reply(&res, OutputFormat::Text).unwrap(), "hi");
        assert_eq!(
            render_reply(&res, OutputFormat::Json).unwrap(),
            r#"{"thread_id":"t1","reply":"hi"}"#
        );
    }

    #[test]
    fn agents_text_is_aligned() {
        let agents = vec![
            AgentInfo {
                name: "planning".into(),
                description: "Plans".into(),
            },
            AgentInfo {
                name: "rag".into(),
                description: "Finds".into(),
            },
        ];
        let text = render_agents(&agents, OutputFormat::Text).unwrap();
        assert_eq!(text, "planning  Plans\nrag       Finds");
    }

    #[test]
    fn history_json_carries_thread() {
        let history = vec![ChatMessage {
            role: "user".into(),
            content: "q".into(),
        }];
        let out = render_history("t9", &history, OutputFormat::Json).unwrap();
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["thread_id"], "t9");
        assert_eq!(v["messages"][0]["role"], "user");
    }
}
