use serde::{Deserialize, Serialize};

use super::backend::Backend;
use super::status::TestStatus;

/// Normalized response for one `execute` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutput {
    pub success: bool,
    pub backend: Backend,
    pub summary: Summary,
    pub results: Vec<TestResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl RunOutput {
    /// A completed run. Counts and duration are derived from `results`.
    pub fn completed(backend: Backend, success: bool, results: Vec<TestResult>) -> Self {
        Self {
            success,
            backend,
            summary: Summary::from_results(&results),
            results,
            error: None,
            warning: None,
        }
    }

    /// An engine-level failure: no results, zero counts.
    pub fn failed(backend: Backend, error: impl Into<String>) -> Self {
        Self {
            success: false,
            backend,
            summary: Summary::default(),
            results: Vec::new(),
            error: Some(error.into()),
            warning: None,
        }
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.summary.duration = duration;
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warning = Some(warning.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Milliseconds. Sum of per-test durations, not wall-clock.
    pub duration: f64,
}

impl Summary {
    pub fn from_results(results: &[TestResult]) -> Self {
        let mut summary = Self::default();
        for result in results {
            match result.status {
                TestStatus::Passed => summary.passed += 1,
                TestStatus::Failed => summary.failed += 1,
                TestStatus::Skipped => summary.skipped += 1,
            }
            summary.duration += result.duration;
        }
        summary.total = summary.passed + summary.failed + summary.skipped;
        summary
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub name: String,
    pub status: TestStatus,
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_context: Option<String>,
}

impl TestResult {
    /// The compact form kept for non-failing entries once a run has failures.
    pub fn compact(&self) -> Self {
        Self {
            name: self.name.clone(),
            status: self.status,
            duration: 0.0,
            error: None,
            location: None,
            source_context: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Raw failure text exactly as the backend reported it.
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

impl Location {
    pub fn file(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line: None,
            column: None,
        }
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
