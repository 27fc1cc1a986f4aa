//! Built-in tools and the registry that exposes them as a `ToolSource`.

mod registry;
mod r#trait;
mod web_search;

pub use r#trait::Tool;
pub use registry::ToolRegistry;
pub use web_search::{WebSearchTool, TOOL_WEB_SEARCH};
