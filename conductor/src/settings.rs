//! Runtime settings read from the environment.
//!
//! Call after `config::load_and_apply` so `.env` and the XDG config file have been
//! merged into the process environment.

use crate::knowledge::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use crate::memory::DEFAULT_RECURSION_LIMIT;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-large";
pub const DEFAULT_TOP_K: usize = 4;
pub const DEFAULT_QUERY_VARIANTS: usize = 3;
pub const DEFAULT_MAX_PLAN_STEPS: usize = 10;

#[derive(Debug, Clone)]
pub struct Settings {
    /// Chat model name (`CONDUCTOR_MODEL`).
    pub model: String,
    /// Embedding model name (`CONDUCTOR_EMBEDDING_MODEL`).
    pub embedding_model: String,
    /// Enables the `web_search` tool when set (`TAVILY_API_KEY`).
    pub tavily_api_key: Option<String>,
    /// Documents fetched per retrieval sub-query (`CONDUCTOR_TOP_K`).
    pub top_k: usize,
    /// Reformulations requested per retrieval question (`CONDUCTOR_QUERY_VARIANTS`).
    pub query_variants: usize,
    /// Plans longer than this are truncated (`CONDUCTOR_MAX_PLAN_STEPS`).
    pub max_plan_steps: usize,
    /// Node executions allowed per agent run (`CONDUCTOR_RECURSION_LIMIT`).
    pub recursion_limit: usize,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            tavily_api_key: None,
            top_k: DEFAULT_TOP_K,
            query_variants: DEFAULT_QUERY_VARIANTS,
            max_plan_steps: DEFAULT_MAX_PLAN_STEPS,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            model: env_string("CONDUCTOR_MODEL").unwrap_or(defaults.model),
            embedding_model: env_string("CONDUCTOR_EMBEDDING_MODEL")
                .unwrap_or(defaults.embedding_model),
            tavily_api_key: env_string("TAVILY_API_KEY"),
            top_k: env_usize("CONDUCTOR_TOP_K", defaults.top_k),
            query_variants: env_usize("CONDUCTOR_QUERY_VARIANTS", defaults.query_variants),
            max_plan_steps: env_usize("CONDUCTOR_MAX_PLAN_STEPS", defaults.max_plan_steps),
            recursion_limit: env_usize("CONDUCTOR_RECURSION_LIMIT", defaults.recursion_limit),
            chunk_size: env_usize("CONDUCTOR_CHUNK_SIZE", defaults.chunk_size),
            chunk_overlap: env_usize("CONDUCTOR_CHUNK_OVERLAP", defaults.chunk_overlap),
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Unset or unparsable values fall back to `default`; the latter is logged.
fn env_usize(key: &str, default: usize) -> usize {
    match env_string(key) {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, default, "ignoring invalid numeric setting");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let s = Settings::default();
        assert_eq!(s.model, "gpt-4o-mini");
        assert_eq!(s.embedding_model, "text-embedding-3-large");
        assert_eq!(s.top_k, 4);
        assert_eq!(s.max_plan_steps, 10);
        assert_eq!(s.recursion_limit, 64);
        assert_eq!((s.chunk_size, s.chunk_overlap), (1000, 200));
        assert!(s.tavily_api_key.is_none());
    }

    /// **Scenario**: Environment overrides apply; garbage numbers keep the default.
    #[test]
    fn from_env_reads_overrides() {
        std::env::set_var("CONDUCTOR_TOP_K", "7");
        std::env::set_var("CONDUCTOR_QUERY_VARIANTS", "many");
        let s = Settings::from_env();
        assert_eq!(s.top_k, 7);
        assert_eq!(s.query_variants, DEFAULT_QUERY_VARIANTS);
        std::env::remove_var("CONDUCTOR_TOP_K");
        std::env::remove_var("CONDUCTOR_QUERY_VARIANTS");
    }
}
