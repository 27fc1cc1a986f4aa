//! `conductor` binary: ask the agent system from the command line.
//!
//! ```text
//! conductor "what is the weather in Paris?"
//! conductor --doc handbook.txt "how many vacation days do I get?"
//! conductor -i
//! conductor agents --json
//! ```

mod logging;
mod repl;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use cli::{build_service, render_agents, render_reply, CliError, OutputFormat, Session};
use conductor::{AgentRegistry, Settings};

#[derive(Parser, Debug)]
#[command(name = "conductor", version)]
#[command(about = "conductor: an orchestrator that answers directly or delegates to planning and retrieval agents")]
struct Args {
    #[command(subcommand)]
    cmd: Option<Command>,

    /// Message to send (words are joined with spaces)
    #[arg(trailing_var_arg = true)]
    message: Vec<String>,

    /// Continue an existing conversation thread
    #[arg(long, value_name = "ID")]
    thread_id: Option<String>,

    /// Text files (.txt) to ingest into the thread before the message
    #[arg(long = "doc", value_name = "FILE")]
    docs: Vec<PathBuf>,

    /// Interactive session after the optional first message
    #[arg(short, long)]
    interactive: bool,

    /// Print replies as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the registered agent types
    Agents,
}

async fn run(args: Args) -> Result<(), CliError> {
    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    if let Some(Command::Agents) = args.cmd {
        let agents = AgentRegistry::global().list_agents();
        println!("{}", render_agents(&agents, format)?);
        return Ok(());
    }

    let message = Some(args.message.join(" ")).filter(|m| !m.trim().is_empty());
    if message.is_none() && !args.interactive {
        return Err(CliError::NoMessage);
    }

    let settings = Settings::from_env();
    tracing::debug!(model = %settings.model, web_search = settings.tavily_api_key.is_some(), "settings loaded");
    let mut session = Session::new(Arc::new(build_service(settings)), args.thread_id);

    if !args.docs.is_empty() {
        let added = session.ingest(&args.docs).await?;
        eprintln!("Added {} chunks from {} file(s).", added, args.docs.len());
    }
    if let Some(message) = message {
        let res = session.ask(&message).await?;
        println!("{}", render_reply(&res, format)?);
    }
    if args.interactive {
        repl::run(&mut session, format).await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let applied = config::load_and_apply("conductor", None);
    if let Err(e) = logging::init(args.verbose) {
        eprintln!("conductor: {}", e);
    }
    match applied {
        Ok(applied) => tracing::debug!(
            dotenv = ?applied.from_dotenv,
            config_file = ?applied.from_config_file,
            "configuration applied"
        ),
        Err(e) => eprintln!("conductor: {}", e),
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("conductor: {}", e);
            ExitCode::FAILURE
        }
    }
}
