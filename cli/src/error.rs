use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("config: {0}")]
    Config(#[from] config::LoadError),

    #[error("{0}")]
    Service(#[from] conductor::ServiceError),

    #[error("read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{} is not valid UTF-8 text", path.display())]
    NotUtf8 { path: PathBuf },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("json output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("provide a message, or use -i for an interactive session")]
    NoMessage,

    #[error("logging: {0}")]
    Logging(String),
}
