pub mod jest;
pub(crate) mod process;
pub mod vitest;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::config::{Config, DEFAULT_TIMEOUT_SECS, usable_timeout};
use crate::diagnostics;
use crate::models::{Backend, Location, RunOutput, TestResult, TestStatus};
use process::Exit;

/// A backend report translated into the common model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    /// The backend's own verdict for the run.
    pub success: bool,
    pub results: Vec<TestResult>,
}

/// Trait for backend-specific test runner adapters.
///
/// Implementors only describe their command line and native report schema;
/// spawning, the deadline and error mapping are shared.
#[async_trait]
pub trait TestRunner: Send + Sync {
    fn backend(&self) -> Backend;

    /// Program and arguments selecting JSON output for `target`.
    fn command(&self, target: &Path) -> Result<(String, Vec<String>)>;

    /// Translate the backend's JSON report from stdout.
    fn parse_report(&self, stdout: &str) -> Result<Report>;

    /// Run the backend against `target` from `project_root`. Never fails: every
    /// outcome, including launch errors and timeouts, is a `RunOutput`.
    async fn execute(&self, target: &Path, project_root: &Path, timeout_secs: f64) -> RunOutput {
        drive(self, target, project_root, timeout_secs).await
    }
}

/// Construct the adapter for `backend`, or `None` when it is unknown.
pub fn for_backend(backend: Backend, config: Config) -> Option<Arc<dyn TestRunner>> {
    match backend {
        Backend::Vitest => Some(Arc::new(vitest::VitestRunner::new(config))),
        Backend::Jest => Some(Arc::new(jest::JestRunner::new(config))),
        Backend::Unknown => None,
    }
}

async fn drive<R: TestRunner + ?Sized>(
    runner: &R,
    target: &Path,
    project_root: &Path,
    timeout_secs: f64,
) -> RunOutput {
    let backend = runner.backend();
    let (program, args) = match runner.command(target) {
        Ok(command) => command,
        Err(e) => return RunOutput::failed(backend, format!("{e:#}")),
    };
    let (timeout_secs, timeout) = deadline(timeout_secs);

    let captured = match process::run_with_timeout(&program, &args, project_root, timeout).await {
        Ok(Exit::Completed(captured)) => captured,
        Ok(Exit::TimedOut) => {
            return RunOutput::failed(backend, timeout_message(timeout_secs))
                .with_duration(timeout_secs * 1000.0);
        }
        Err(e) => {
            tracing::warn!(%backend, error = %format!("{e:#}"), "backend could not be launched");
            return RunOutput::failed(backend, format!("{e:#}"));
        }
    };

    match runner.parse_report(&captured.stdout) {
        Ok(report) => {
            let output = RunOutput::completed(backend, report.success, report.results);
            tracing::info!(
                %backend,
                total = output.summary.total,
                passed = output.summary.passed,
                failed = output.summary.failed,
                skipped = output.summary.skipped,
                "test run finished"
            );
            if output.results.is_empty() {
                output.with_warning(format!("no tests found for {}", target.display()))
            } else {
                output
            }
        }
        Err(e) => {
            tracing::warn!(%backend, status = %captured.status, error = %format!("{e:#}"), "unparseable backend report");
            let error = if captured.stderr.trim().is_empty() {
                format!("{backend} execution failed ({})", captured.status)
            } else {
                captured.stderr
            };
            RunOutput::failed(backend, error)
        }
    }
}

/// The deadline actually applied: `timeout_secs` when usable, else the default.
pub(crate) fn deadline(timeout_secs: f64) -> (f64, Duration) {
    let secs = if usable_timeout(timeout_secs) {
        timeout_secs
    } else {
        tracing::warn!(timeout_secs, "unusable timeout, using the default");
        DEFAULT_TIMEOUT_SECS
    };
    (secs, Duration::from_secs_f64(secs))
}

pub(crate) fn timeout_message(timeout_secs: f64) -> String {
    format!(
        "Test execution timed out after {timeout_secs}s. Check for long-running async work \
         (unresolved promises, open handles) or a misconfigured test environment."
    )
}

/// Parse a JSON report, tolerating banner text printed before it.
pub(crate) fn parse_json<T: DeserializeOwned>(stdout: &str) -> Result<T> {
    let trimmed = stdout.trim();
    match serde_json::from_str(trimmed) {
        Ok(report) => Ok(report),
        Err(first) => {
            let start = trimmed.find('{').context("no JSON report on stdout")?;
            if start == 0 {
                return Err(first).context("malformed JSON report");
            }
            serde_json::from_str(&trimmed[start..]).context("malformed JSON report")
        }
    }
}

/// Program plus launcher arguments followed by the backend's own arguments.
pub(crate) fn launch_command(
    config: &Config,
    backend_args: &[&str],
    extra_args: &[String],
    target: &Path,
) -> Result<(String, Vec<String>)> {
    let (program, mut args) = config.launcher()?;
    args.extend(backend_args.iter().map(|a| a.to_string()));
    args.extend(extra_args.iter().cloned());
    args.push(target.to_string_lossy().to_string());
    Ok((program, args))
}

/// Build the result for one native assertion record, diagnosing it when it failed.
pub(crate) fn assertion_result(
    file: &str,
    name: String,
    status: TestStatus,
    duration: Option<f64>,
    failure: Option<&str>,
    task_location: Option<(u32, u32)>,
) -> TestResult {
    let duration = duration.unwrap_or(0.0);
    match failure.filter(|_| status.is_failed()) {
        Some(raw) => {
            let diagnosis = diagnostics::diagnose(raw, file, task_location);
            TestResult {
                name,
                status,
                duration,
                error: Some(diagnosis.error),
                location: Some(diagnosis.location),
                source_context: diagnosis.source_context,
            }
        }
        None => {
            let mut location = Location::file(file);
            if let Some((line, column)) = task_location {
                location.line = Some(line);
                location.column = Some(column);
            }
            TestResult {
                name,
                status,
                duration,
                error: None,
                location: Some(location),
                source_context: None,
            }
        }
    }
}

/// A test file that failed before any of its tests ran (syntax error, failed import).
pub(crate) fn suite_failure(file: &str, message: &str) -> TestResult {
    assertion_result(
        file,
        file.to_string(),
        TestStatus::Failed,
        None,
        Some(message),
        None,
    )
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
