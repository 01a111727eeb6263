//! Configuration management for the CLI
//!
//! Configuration is read from, in order of preference:
//! - the file named by `--config` or `DRAFTCHECK_CONFIG`
//! - `config.yaml`, `config.yml` or `config.json` in the user's
//!   `draftcheck` configuration directory
//! - built-in defaults
//!
//! Copyright (c) 2025 Draftcheck Team
//! Licensed under the Apache-2.0 license

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use draftcheck_schemas::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Settings handed to every schema engine
    pub engine: EngineConfig,

    pub logging: LoggingSection,

    pub output: OutputSection,
}

/// Logging preferences; command-line verbosity and environment win
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level (trace, debug, info, warn, error)
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<String>,

    /// Include thread IDs
    pub thread_ids: bool,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Default output format
    pub format: OutputFormat,

    /// Use colored output by default
    pub color: bool,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            color: true,
        }
    }
}

impl Config {
    /// Load configuration from a file, YAML or JSON by extension
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("cannot read {}: {}", path.display(), e))
        })?;

        if is_yaml(path) {
            serde_yaml::from_str(&content)
                .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))
        } else {
            serde_json::from_str(&content)
                .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))
        }
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        // Logging is not up yet
                        eprintln!("Warning: Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        match file {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    fn default_config_paths() -> Vec<PathBuf> {
        let base = dirs::config_dir().or_else(|| dirs::home_dir().map(|home| home.join(".config")));
        let Some(base) = base else {
            return Vec::new();
        };
        let dir = base.join("draftcheck");
        ["config.yaml", "config.yml", "config.json"]
            .iter()
            .map(|name| dir.join(name))
            .collect()
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftcheck_schemas::DraftVersion;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.engine, EngineConfig::default());
        assert_eq!(config.output.format, OutputFormat::Human);
        assert!(config.output.color);
        assert_eq!(config.logging.level, None);
    }

    #[test]
    fn test_yaml_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "engine:\n  default_draft: 4\n  assert_formats: false\noutput:\n  format: json-pretty\n  color: false\nlogging:\n  level: debug\n",
        )
        .unwrap();

        let config = Config::load_with_file(Some(&path)).unwrap();
        assert_eq!(config.engine.default_draft, DraftVersion::Draft4);
        assert!(!config.engine.assert_formats);
        assert_eq!(config.engine.max_reference_depth, 100);
        assert_eq!(config.output.format, OutputFormat::JsonPretty);
        assert!(!config.output.color);
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_json_file_with_partial_sections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"output": {"format": "json"}}"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.color);
        assert_eq!(config.engine, EngineConfig::default());
    }

    #[test]
    fn test_invalid_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"engine": {"default_draft": 5}}"#).unwrap();
        assert!(matches!(Config::from_file(&path), Err(Error::Config(_))));

        let missing = dir.path().join("absent.yaml");
        let err = Config::load_with_file(Some(&missing)).unwrap_err();
        assert_eq!(err.exit_code(), 6);
    }
}
