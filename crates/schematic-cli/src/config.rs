//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (YAML/TOML/JSON)
//! - Command-line overrides for the schema text

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Schema text every path is validated against
    pub schema: Option<String>,

    /// Where variables and variable sets get their values
    pub inputs: Vec<InputConfig>,

    /// Logging settings
    pub logging: LoggingSettings,
}

/// One named input of the variable store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputConfig {
    /// `$name` resolved from a process environment variable at lookup time
    Environment { name: String, from: String },
    /// `$[name]` members listed inline
    VariableSet { name: String, content: Vec<String> },
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level used when no `-v` flag is given (trace, debug, info, warn, error)
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<String>,
}

impl InputConfig {
    pub fn name(&self) -> &str {
        match self {
            InputConfig::Environment { name, .. } | InputConfig::VariableSet { name, .. } => name,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;

        let config: Config = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            _ => serde_json::from_str(&content)?,
        };

        config.check()?;
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in &Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        // Return default config if no config file found
        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            Self::from_file(path)
        } else {
            Self::load()
        }
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("schematic.yaml"),
            PathBuf::from("schematic.yml"),
            PathBuf::from("schematic.toml"),
            PathBuf::from("schematic.json"),
        ];

        // User config directory
        if let Some(config_dir) = dirs::config_dir() {
            let schematic_dir = config_dir.join("schematic");
            paths.push(schematic_dir.join("config.yaml"));
            paths.push(schematic_dir.join("config.toml"));
            paths.push(schematic_dir.join("config.json"));
        }

        paths
    }

    /// Schema text to use, preferring the command-line override
    pub fn schema_text(&self, cli_override: Option<&str>) -> Result<String> {
        cli_override
            .map(str::to_string)
            .or_else(|| self.schema.clone())
            .ok_or(Error::MissingSchema)
    }

    /// Reject input lists that name the same input twice
    fn check(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for input in &self.inputs {
            if !seen.insert(input.name()) {
                return Err(Error::config(format!("input '{}' is defined more than once", input.name())));
            }
        }
        Ok(())
    }
}
