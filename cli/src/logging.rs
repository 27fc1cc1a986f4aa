//! Logging initialization for the binary.
//!
//! `RUST_LOG` sets the filter (default `warn`, `debug` with `-v`). When `LOG_FILE` is
//! set, logs are appended to that file as plain text; otherwise they go to stderr so
//! stdout carries only replies.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use cli::CliError;

pub fn init(verbose: bool) -> Result<(), CliError> {
    let default = if verbose {
        "debug,hyper_util=off,reqwest=info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let result = match std::env::var("LOG_FILE") {
        Ok(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|source| CliError::Read {
                    path: path.clone().into(),
                    source,
                })?;
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .with_filter(filter);
            tracing_subscriber::registry().with(layer).try_init()
        }
        Err(_) => {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter);
            tracing_subscriber::registry().with(layer).try_init()
        }
    };
    result.map_err(|e| CliError::Logging(e.to_string()))
}
