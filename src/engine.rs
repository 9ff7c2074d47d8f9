//! Entry point: resolve the project, pick the adapter, run, compact.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::format::format;
use crate::models::{Backend, RunOutput};
use crate::runner;

/// Decides which backend a project uses.
pub trait BackendDetector: Send + Sync {
    fn detect(&self, project_root: &Path) -> Backend;
}

impl<F> BackendDetector for F
where
    F: Fn(&Path) -> Backend + Send + Sync,
{
    fn detect(&self, project_root: &Path) -> Backend {
        self(project_root)
    }
}

/// Finds the project root (the ancestor holding the manifest) for a target path.
pub trait ProjectRootResolver: Send + Sync {
    fn resolve(&self, target: &Path) -> Option<PathBuf>;
}

impl<F> ProjectRootResolver for F
where
    F: Fn(&Path) -> Option<PathBuf> + Send + Sync,
{
    fn resolve(&self, target: &Path) -> Option<PathBuf> {
        self(target)
    }
}

/// Runs test suites on request and returns compacted, normalized reports.
///
/// Holds no per-run state, so one engine can serve concurrent calls.
#[derive(Clone)]
pub struct Engine {
    detector: Arc<dyn BackendDetector>,
    resolver: Arc<dyn ProjectRootResolver>,
}

impl Engine {
    pub fn new(
        detector: impl BackendDetector + 'static,
        resolver: impl ProjectRootResolver + 'static,
    ) -> Self {
        Self {
            detector: Arc::new(detector),
            resolver: Arc::new(resolver),
        }
    }

    /// Run the tests at `target`.
    ///
    /// `project_root` defaults to the resolver's answer and `timeout_secs` to
    /// the project's configured timeout (30 seconds unless configured).
    pub async fn execute(
        &self,
        target: &Path,
        project_root: Option<&Path>,
        timeout_secs: Option<f64>,
    ) -> RunOutput {
        let root = match project_root {
            Some(root) => root.to_path_buf(),
            None => match self.resolver.resolve(target) {
                Some(root) => root,
                None => {
                    return RunOutput::failed(
                        Backend::Unknown,
                        format!("could not find a project root for {}", target.display()),
                    );
                }
            },
        };
        let backend = self.detector.detect(&root);
        self.execute_with(backend, target, &root, timeout_secs).await
    }

    /// Run with an already-known backend, skipping detection.
    pub async fn execute_with(
        &self,
        backend: Backend,
        target: &Path,
        project_root: &Path,
        timeout_secs: Option<f64>,
    ) -> RunOutput {
        let config = Config::load(project_root);
        let timeout_secs = config.timeout_secs(timeout_secs);
        let Some(runner) = runner::for_backend(backend, config) else {
            return RunOutput::failed(
                backend,
                format!(
                    "could not detect a test backend (vitest/jest) in {}",
                    project_root.display()
                ),
            );
        };

        tracing::info!(
            %backend,
            target = %target.display(),
            root = %project_root.display(),
            timeout_secs,
            "running tests"
        );
        let output = runner.execute(target, project_root, timeout_secs).await;
        format(&output)
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
