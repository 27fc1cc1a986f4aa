//! Layered configuration for conductor.
//!
//! Sources, highest priority first:
//! 1. the process environment (never overwritten)
//! 2. the project `.env` (current directory, or the directory passed in)
//! 3. `$XDG_CONFIG_HOME/<app>/config.toml`: `[env]` verbatim, `[settings]` as `<APP>_<KEY>`
//!
//! [`load_and_apply`] merges the file sources into the process environment so the
//! rest of the program reads plain env vars.

mod dotenv;
mod xdg_toml;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("parse {}: {message}", path.display())]
    Dotenv { path: PathBuf, message: String },
    #[error("config key '{key}' must be a string, number or boolean, found {kind}")]
    InvalidValue { key: String, kind: &'static str },
}

/// Which keys were set, by source. Keys already in the environment appear in neither list.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Applied {
    pub from_dotenv: Vec<String>,
    pub from_config_file: Vec<String>,
}

impl Applied {
    pub fn is_empty(&self) -> bool {
        self.from_dotenv.is_empty() && self.from_config_file.is_empty()
    }
}

/// Location of the config file for `app_name`, whether or not it exists.
pub fn config_file_path(app_name: &str) -> Option<PathBuf> {
    xdg_toml::config_path(app_name)
}

/// Loads `.env` and the XDG config file and sets every key not already present in
/// the process environment. Both files are parsed before anything is set, so a
/// parse error leaves the environment untouched.
pub fn load_and_apply(app_name: &str, dotenv_dir: Option<&Path>) -> Result<Applied, LoadError> {
    let from_file = xdg_toml::load_env_map(app_name)?;
    let from_dotenv = dotenv::load_env_map(dotenv_dir)?;

    let keys: BTreeSet<&String> = from_file.keys().chain(from_dotenv.keys()).collect();
    let mut applied = Applied::default();
    for key in keys {
        if std::env::var_os(key).is_some() {
            continue;
        }
        if let Some(v) = from_dotenv.get(key) {
            std::env::set_var(key, v);
            applied.from_dotenv.push(key.clone());
        } else if let Some(v) = from_file.get(key) {
            std::env::set_var(key, v);
            applied.from_config_file.push(key.clone());
        }
    }
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Tests below mutate XDG_CONFIG_HOME; run them one at a time.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    struct XdgHome {
        prev: Option<std::ffi::OsString>,
        dir: tempfile::TempDir,
    }

    impl XdgHome {
        fn with_config(app: &str, toml: &str) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let app_dir = dir.path().join(app);
            std::fs::create_dir_all(&app_dir).unwrap();
            std::fs::write(app_dir.join("config.toml"), toml).unwrap();
            let prev = env::var_os("XDG_CONFIG_HOME");
            env::set_var("XDG_CONFIG_HOME", dir.path());
            Self { prev, dir }
        }
    }

    impl Drop for XdgHome {
        fn drop(&mut self) {
            match self.prev.take() {
                Some(v) => env::set_var("XDG_CONFIG_HOME", v),
                None => env::remove_var("XDG_CONFIG_HOME"),
            }
        }
    }

    fn dotenv_dir(content: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env"), content).unwrap();
        dir
    }

    #[test]
    fn precedence_env_then_dotenv_then_file() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let _home = XdgHome::with_config(
            "cfgtest-precedence",
            "[env]\nCFGTEST_A = \"file\"\nCFGTEST_B = \"file\"\nCFGTEST_C = \"file\"\n",
        );
        let dotenv = dotenv_dir("CFGTEST_A=dotenv\nCFGTEST_B=dotenv\n");
        env::set_var("CFGTEST_A", "process");
        env::remove_var("CFGTEST_B");
        env::remove_var("CFGTEST_C");

        let applied = load_and_apply("cfgtest-precedence", Some(dotenv.path())).unwrap();
        let values: Vec<String> = ["CFGTEST_A", "CFGTEST_B", "CFGTEST_C"]
            .iter()
            .map(|k| env::var(k).unwrap())
            .collect();
        for k in ["CFGTEST_A", "CFGTEST_B", "CFGTEST_C"] {
            env::remove_var(k);
        }

        assert_eq!(values, vec!["process", "dotenv", "file"]);
        assert_eq!(applied.from_dotenv, vec!["CFGTEST_B".to_string()]);
        assert_eq!(applied.from_config_file, vec!["CFGTEST_C".to_string()]);
    }

    #[test]
    fn settings_table_maps_to_prefixed_vars() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let _home = XdgHome::with_config("cfgtest", "[settings]\ntop_k = 6\nmodel = \"gpt-4o\"\n");
        let empty = tempfile::tempdir().unwrap();
        env::remove_var("CFGTEST_TOP_K");
        env::remove_var("CFGTEST_MODEL");

        load_and_apply("cfgtest", Some(empty.path())).unwrap();
        let top_k = env::var("CFGTEST_TOP_K").ok();
        let model = env::var("CFGTEST_MODEL").ok();
        env::remove_var("CFGTEST_TOP_K");
        env::remove_var("CFGTEST_MODEL");

        assert_eq!(top_k.as_deref(), Some("6"));
        assert_eq!(model.as_deref(), Some("gpt-4o"));
    }

    #[test]
    fn invalid_file_fails_without_applying_anything() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let home = XdgHome::with_config("cfgtest-bad", "invalid [[[\n");
        let dotenv = dotenv_dir("CFGTEST_UNTOUCHED=1\n");
        env::remove_var("CFGTEST_UNTOUCHED");

        let result = load_and_apply("cfgtest-bad", Some(dotenv.path()));
        assert!(matches!(result, Err(LoadError::Parse { .. })), "{:?}", result);
        assert!(env::var("CFGTEST_UNTOUCHED").is_err());
        assert_eq!(
            config_file_path("cfgtest-bad"),
            Some(home.dir.path().join("cfgtest-bad").join("config.toml"))
        );
    }

    #[test]
    fn no_sources_is_empty() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let _home = XdgHome::with_config("cfgtest-other", "");
        let empty = tempfile::tempdir().unwrap();
        let applied = load_and_apply("cfgtest-none", Some(empty.path())).unwrap();
        assert!(applied.is_empty());
    }
}
