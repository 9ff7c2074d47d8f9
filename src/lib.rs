//! Test execution and result normalization for JavaScript test backends.
//!
//! [`Engine::execute`] launches Vitest or Jest against a file or directory,
//! enforces a deadline, translates the backend's JSON report into
//! [`RunOutput`] and compacts it for consumption by automated callers.

pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod format;
pub mod models;
pub mod runner;

pub use config::Config;
pub use engine::{BackendDetector, Engine, ProjectRootResolver};
pub use models::{Backend, ErrorInfo, Location, RunOutput, Summary, TestResult, TestStatus};
pub use runner::TestRunner;
