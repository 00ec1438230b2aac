//! Configuration loading from cmdbench.toml
//!
//! Defaults can be kept in a `cmdbench.toml` discovered by walking up from
//! the current directory; command-line flags override file values.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// cmdbench configuration file contents.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BenchConfig {
    /// Runner configuration.
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Output configuration.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Runner configuration for benchmark execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Number of measured runs per command.
    #[serde(default = "default_runs")]
    pub runs: u64,
    /// Number of warmup runs before measurement.
    #[serde(default)]
    pub warmup: u64,
    /// Intermediate shell to run commands in. Unset means the platform
    /// default.
    #[serde(default)]
    pub shell: Option<String>,
    /// Run commands directly instead of through a shell.
    #[serde(default)]
    pub no_shell: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            runs: default_runs(),
            warmup: 0,
            shell: None,
            no_shell: false,
        }
    }
}

fn default_runs() -> u64 {
    10
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Disable coloured output.
    #[serde(default)]
    pub no_color: bool,
}

/// Effective settings after layering `cmdbench.toml` under CLI flags.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Measured runs per command.
    pub runs: u64,
    /// Warmup runs per command.
    pub warmup: u64,
    /// Intermediate shell, or `None` to run commands directly.
    pub shell: Option<String>,
    /// Command to run once before all benchmarks.
    pub setup: Option<String>,
    /// Disable coloured output.
    pub no_color: bool,
}

impl BenchConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Discover and load configuration by walking up from the current
    /// directory.
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join("cmdbench.toml");
            if config_path.exists() {
                return Self::load(&config_path).ok();
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }
}
