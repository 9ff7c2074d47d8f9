use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Seconds a run may take when neither the caller nor the config says otherwise.
pub const DEFAULT_TIMEOUT_SECS: f64 = 30.0;

pub const CONFIG_FILE: &str = "testlens.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub runner: RunnerConfig,
    #[serde(default)]
    pub vitest: BackendConfig,
    #[serde(default)]
    pub jest: BackendConfig,
}

/// Controls how backend processes are launched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RunnerConfig {
    /// Program (plus leading arguments) used to start the backend.
    /// Example: "pnpm exec" or "yarn"
    pub launcher: Option<String>,
    /// Default deadline in seconds.
    pub timeout: Option<f64>,
}

/// Per-backend extra arguments, inserted before the target path.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub args: Vec<String>,
}

impl Config {
    /// Load `testlens.toml` from the project root, falling back to defaults if absent or invalid.
    pub fn load(project_root: &Path) -> Self {
        let path = project_root.join(CONFIG_FILE);
        let Ok(content) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        match Self::parse(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %format!("{e:#}"), "ignoring invalid config");
                Self::default()
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("failed to parse testlens.toml")
    }

    /// Launcher split into program and leading arguments.
    pub fn launcher(&self) -> Result<(String, Vec<String>)> {
        let Some(launcher) = self.runner.launcher.as_deref() else {
            return Ok((default_launcher().to_string(), Vec::new()));
        };
        let mut words = shell_words::split(launcher)
            .with_context(|| format!("invalid launcher `{launcher}`"))?
            .into_iter();
        let program = words
            .next()
            .with_context(|| format!("launcher `{launcher}` names no program"))?;
        Ok((program, words.collect()))
    }

    /// Resolve the deadline: explicit value, then config, then the default.
    pub fn timeout_secs(&self, requested: Option<f64>) -> f64 {
        requested
            .into_iter()
            .chain(self.runner.timeout)
            .find(|&secs| usable_timeout(secs))
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
    }
}

/// A timeout is usable when it is positive and fits a `Duration`.
pub(crate) fn usable_timeout(secs: f64) -> bool {
    secs > 0.0 && Duration::try_from_secs_f64(secs).is_ok()
}

fn default_launcher() -> &'static str {
    if cfg!(windows) { "npx.cmd" } else { "npx" }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
