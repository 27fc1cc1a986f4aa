//! `$XDG_CONFIG_HOME/<app>/config.toml`.
//!
//! ```toml
//! [settings]          # becomes <APP>_<KEY>, e.g. CONDUCTOR_TOP_K
//! model = "gpt-4o"
//! top_k = 6
//!
//! [env]               # copied verbatim
//! OPENAI_API_KEY = "sk-..."
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;
use toml::Value;

use crate::LoadError;

/// `XDG_CONFIG_HOME` when set and non-empty, else the platform config directory.
pub(crate) fn config_home() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
}

pub(crate) fn config_path(app_name: &str) -> Option<PathBuf> {
    config_home().map(|home| home.join(app_name).join("config.toml"))
}

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    settings: HashMap<String, Value>,
    #[serde(default)]
    env: HashMap<String, Value>,
}

/// Scalars only: strings as-is, numbers and booleans in TOML notation.
fn scalar(key: &str, value: Value) -> Result<String, LoadError> {
    match value {
        Value::String(s) => Ok(s),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Boolean(b) => Ok(b.to_string()),
        other => Err(LoadError::InvalidValue {
            key: key.to_string(),
            kind: other.type_str(),
        }),
    }
}

fn settings_key(app_name: &str, key: &str) -> String {
    format!("{}_{}", app_name, key)
        .replace('-', "_")
        .to_uppercase()
}

/// Env pairs from the config file; `[env]` wins over `[settings]` for the same name.
/// A missing file is empty.
pub(crate) fn load_env_map(app_name: &str) -> Result<HashMap<String, String>, LoadError> {
    let Some(path) = config_path(app_name).filter(|p| p.is_file()) else {
        return Ok(HashMap::new());
    };
    let content = std::fs::read_to_string(&path).map_err(|source| LoadError::Read {
        path: path.clone(),
        source,
    })?;
    let file: ConfigFile = toml::from_str(&content).map_err(|source| LoadError::Parse {
        path: path.clone(),
        source,
    })?;

    let mut out = HashMap::new();
    for (key, value) in file.settings {
        let value = scalar(&key, value)?;
        out.insert(settings_key(app_name, &key), value);
    }
    for (key, value) in file.env {
        let value = scalar(&key, value)?;
        out.insert(key, value);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_keys_are_prefixed_and_uppercased() {
        assert_eq!(settings_key("conductor", "top_k"), "CONDUCTOR_TOP_K");
        assert_eq!(settings_key("conductor", "max-plan-steps"), "CONDUCTOR_MAX_PLAN_STEPS");
    }

    #[test]
    fn scalars_render_as_env_strings() {
        assert_eq!(scalar("a", Value::Integer(6)).unwrap(), "6");
        assert_eq!(scalar("a", Value::Boolean(true)).unwrap(), "true");
        assert_eq!(scalar("a", Value::String("x".into())).unwrap(), "x");
        let err = scalar("a", Value::Array(vec![])).unwrap_err();
        assert!(matches!(err, LoadError::InvalidValue { kind: "array", .. }));
    }
}
