use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

use crate::config::Config;
use crate::models::{Backend, TestStatus};

use super::{Report, TestRunner, assertion_result, launch_command, parse_json, suite_failure};

/// Vitest adapter: `vitest run --reporter=json`.
pub struct VitestRunner {
    config: Config,
}

impl VitestRunner {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl TestRunner for VitestRunner {
    fn backend(&self) -> Backend {
        Backend::Vitest
    }

    fn command(&self, target: &Path) -> Result<(String, Vec<String>)> {
        launch_command(
            &self.config,
            &["vitest", "run", "--reporter=json", "--includeTaskLocation"],
            &self.config.vitest.args,
            target,
        )
    }

    fn parse_report(&self, stdout: &str) -> Result<Report> {
        let report: VitestReport = parse_json(stdout)?;
        Ok(report.into_report())
    }
}

// --- JSON reporter deserialization types ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VitestReport {
    success: bool,
    test_results: Vec<VitestFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VitestFile {
    name: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    assertion_results: Vec<VitestAssertion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VitestAssertion {
    title: String,
    status: VitestState,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    failure_messages: Vec<String>,
    #[serde(default)]
    location: Option<VitestLocation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum VitestState {
    Passed,
    Failed,
    Skipped,
    Pending,
    Todo,
    Disabled,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
struct VitestLocation {
    line: u32,
    column: u32,
}

impl VitestState {
    fn status(&self) -> TestStatus {
        match self {
            VitestState::Passed => TestStatus::Passed,
            VitestState::Failed => TestStatus::Failed,
            VitestState::Skipped
            | VitestState::Pending
            | VitestState::Todo
            | VitestState::Disabled
            | VitestState::Unknown => TestStatus::Skipped,
        }
    }
}

impl VitestReport {
    fn into_report(self) -> Report {
        let mut results = Vec::new();
        for file in self.test_results {
            let crashed = file.status.as_deref() == Some("failed") && file.assertion_results.is_empty();
            if crashed && let Some(message) = file.message.as_deref().filter(|m| !m.trim().is_empty()) {
                results.push(suite_failure(&file.name, message));
                continue;
            }

            for assertion in file.assertion_results {
                results.push(assertion_result(
                    &file.name,
                    assertion.title,
                    assertion.status.status(),
                    assertion.duration,
                    assertion.failure_messages.first().map(String::as_str),
                    assertion.location.map(|l| (l.line, l.column)),
                ));
            }
        }
        Report {
            success: self.success,
            results,
        }
    }
}

#[cfg(test)]
#[path = "vitest_tests.rs"]
mod tests;
