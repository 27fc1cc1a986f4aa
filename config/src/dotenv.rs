//! Project `.env` as a key/value map.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::LoadError;

/// `.env` in `dir`, or in the current directory when `dir` is `None`.
pub(crate) fn dotenv_path(dir: Option<&Path>) -> Option<PathBuf> {
    let dir = match dir {
        Some(d) => d.to_path_buf(),
        None => std::env::current_dir().ok()?,
    };
    let path = dir.join(".env");
    path.is_file().then_some(path)
}

/// Parses the `.env` without touching the process environment. A missing file is empty.
pub(crate) fn load_env_map(dir: Option<&Path>) -> Result<HashMap<String, String>, LoadError> {
    let Some(path) = dotenv_path(dir) else {
        return Ok(HashMap::new());
    };
    let iter = dotenv::from_path_iter(&path).map_err(|e| LoadError::Dotenv {
        path: path.clone(),
        message: e.to_string(),
    })?;
    let mut out = HashMap::new();
    for item in iter {
        let (key, value) = item.map_err(|e| LoadError::Dotenv {
            path: path.clone(),
            message: e.to_string(),
        })?;
        out.insert(key, value);
    }
    Ok(out)
}
