//! Library side of the `conductor` binary.
//!
//! - [`Session`]: one conversation thread over a [`conductor::ChatService`].
//! - [`read_documents`]: files on disk → raw documents for ingest.
//! - [`OutputFormat`] and the `render_*` helpers: what gets printed.

mod documents;
mod error;
mod output;
mod session;

pub use documents::read_documents;
pub use error::CliError;
pub use output::{render_agents, render_history, render_reply, OutputFormat};
pub use session::{build_service, Session};
