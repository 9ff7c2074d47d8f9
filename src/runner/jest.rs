use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

use crate::config::Config;
use crate::models::{Backend, TestStatus};

use super::{Report, TestRunner, assertion_result, launch_command, parse_json, suite_failure};

/// Jest adapter: `jest --json`.
pub struct JestRunner {
    config: Config,
}

impl JestRunner {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl TestRunner for JestRunner {
    fn backend(&self) -> Backend {
        Backend::Jest
    }

    fn command(&self, target: &Path) -> Result<(String, Vec<String>)> {
        launch_command(
            &self.config,
            &["jest", "--json", "--testLocationInResults"],
            &self.config.jest.args,
            target,
        )
    }

    fn parse_report(&self, stdout: &str) -> Result<Report> {
        let report: JestReport = parse_json(stdout)?;
        Ok(report.into_report())
    }
}

// --- `--json` output deserialization types ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JestReport {
    success: bool,
    test_results: Vec<JestSuite>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JestSuite {
    /// Absolute path of the test file.
    name: String,
    #[serde(default)]
    status: Option<String>,
    /// Suite-level failure text; empty when the suite ran.
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    assertion_results: Vec<JestAssertion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JestAssertion {
    title: String,
    status: JestStatus,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    failure_messages: Vec<String>,
    /// Present with `--testLocationInResults`.
    #[serde(default)]
    location: Option<JestLocation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum JestStatus {
    Passed,
    Failed,
    Skipped,
    Pending,
    Todo,
    Disabled,
    Focused,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
struct JestLocation {
    line: u32,
    #[serde(default)]
    column: u32,
}

impl JestStatus {
    fn status(&self) -> TestStatus {
        match self {
            JestStatus::Passed | JestStatus::Focused => TestStatus::Passed,
            JestStatus::Failed => TestStatus::Failed,
            JestStatus::Skipped
            | JestStatus::Pending
            | JestStatus::Todo
            | JestStatus::Disabled
            | JestStatus::Unknown => TestStatus::Skipped,
        }
    }
}

impl JestReport {
    fn into_report(self) -> Report {
        let mut results = Vec::new();
        for suite in self.test_results {
            let message = suite.message.as_deref().unwrap_or_default();
            if suite.status.as_deref() == Some("failed")
                && suite.assertion_results.is_empty()
                && !message.trim().is_empty()
            {
                results.push(suite_failure(&suite.name, message));
                continue;
            }

            for assertion in suite.assertion_results {
                results.push(assertion_result(
                    &suite.name,
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
#[path = "jest_tests.rs"]
mod tests;
