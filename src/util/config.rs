//! Configuration file support.
//!
//! Settings are read from `girbind.toml` in the working directory, or from
//! the file passed with `--config`. Command-line flags override file values.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::ops::GenerateOptions;

/// Default configuration file name.
pub const CONFIG_FILE: &str = "girbind.toml";

/// girbind configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Generation settings
    pub generate: GenerateConfig,
}

/// Generation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GenerateConfig {
    /// Skip failing declarations (default: true)
    pub best_effort: Option<bool>,

    /// Declarations that must be generated
    pub mandatory: Vec<String>,

    /// Namespaces to emit; empty means all
    pub namespaces: Vec<String>,

    /// Worker threads (None = one per core)
    pub jobs: Option<usize>,

    /// Output directory
    pub output: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file doesn't
    /// exist or can't be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        let other = other.generate;

        if other.best_effort.is_some() {
            self.generate.best_effort = other.best_effort;
        }
        if !other.mandatory.is_empty() {
            self.generate.mandatory = other.mandatory;
        }
        if !other.namespaces.is_empty() {
            self.generate.namespaces = other.namespaces;
        }
        if other.jobs.is_some() {
            self.generate.jobs = other.jobs;
        }
        if other.output.is_some() {
            self.generate.output = other.output;
        }
    }

    pub fn best_effort(&self) -> bool {
        self.generate.best_effort.unwrap_or(true)
    }

    /// Options for [`crate::ops::generate`].
    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            best_effort: self.best_effort(),
            mandatory: self.generate.mandatory.clone(),
            namespaces: self.generate.namespaces.clone(),
            jobs: self.generate.jobs,
        }
    }
}

/// Load `path`, or `girbind.toml` in `dir` when no path is given.
///
/// An explicitly named file must exist; the default one is optional.
pub fn load_config(path: Option<&Path>, dir: &Path) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Ok(Config::load_or_default(&dir.join(CONFIG_FILE))),
    }
}
