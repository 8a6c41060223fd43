//! Configuration file handling.
//!
//! Lookup order: an explicit `--config` path, the project file
//! `.msdelta/config.json`, the user file under the platform config
//! directory, then built-in defaults. Command-line flags override whatever
//! the file says.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const CONFIG_DIR: &str = ".msdelta";
pub const CONFIG_FILE: &str = "config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub version: String,

    /// Microservices emitted as nodes. `None` emits all of them.
    pub nodes: Option<Vec<String>>,

    /// Where graph JSON goes when no `--output` is given.
    pub output: Option<PathBuf>,

    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            nodes: None,
            output: None,
            pretty: true,
        }
    }
}

impl Config {
    /// Path of the project configuration file under `root`.
    pub fn project_path(root: &Path) -> PathBuf {
        root.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    fn user_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("msdelta").join(CONFIG_FILE))
    }

    /// Loads the effective configuration.
    ///
    /// An explicit path must exist; implicit locations are skipped when
    /// absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let candidates = std::iter::once(Self::project_path(Path::new(".")))
            .chain(Self::user_path());
        Self::load_first(candidates)
    }

    fn load_first(candidates: impl IntoIterator<Item = PathBuf>) -> Result<Self, ConfigError> {
        for candidate in candidates {
            if candidate.is_file() {
                return Self::from_file(&candidate);
            }
        }
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = serde_json::from_str(&source).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Node filter with a command-line list taking precedence.
    pub fn node_filter(&self, cli: Option<Vec<String>>) -> Option<Vec<String>> {
        cli.or_else(|| self.nodes.clone())
    }

    /// Output path with a command-line path taking precedence.
    pub fn output_path<'a>(&'a self, cli: Option<&'a Path>) -> Option<&'a Path> {
        cli.or(self.output.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{ "nodes": ["orders", "users"] }"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(
            config.nodes,
            Some(vec!["orders".to_string(), "users".to_string()])
        );
        assert!(config.pretty);
        assert_eq!(config.version, "1.0");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "nodes = [").unwrap();

        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempdir().unwrap();
        let absent = dir.path().join("absent.json");
        let result = Config::load(Some(absent.as_path()));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_first_existing_candidate_wins() {
        let dir = tempdir().unwrap();
        let present = dir.path().join("present.json");
        fs::write(&present, r#"{ "pretty": false }"#).unwrap();

        let config =
            Config::load_first(vec![dir.path().join("absent.json"), present]).unwrap();
        assert!(!config.pretty);

        let fallback = Config::load_first(vec![dir.path().join("absent.json")]).unwrap();
        assert_eq!(fallback, Config::default());
    }

    #[test]
    fn test_cli_overrides_file() {
        let config = Config {
            nodes: Some(vec!["a".into()]),
            output: Some(PathBuf::from("graph.json")),
            ..Config::default()
        };

        assert_eq!(config.node_filter(Some(vec!["b".into()])), Some(vec!["b".to_string()]));
        assert_eq!(config.node_filter(None), Some(vec!["a".to_string()]));
        assert_eq!(config.output_path(None), Some(Path::new("graph.json")));
        assert_eq!(
            config.output_path(Some(Path::new("other.json"))),
            Some(Path::new("other.json"))
        );
    }
}
