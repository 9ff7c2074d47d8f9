use serde::{Deserialize, Serialize};

/// Normalized outcome of a single assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    #[default]
    Passed,
    Failed,
    Skipped,
}

impl TestStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, TestStatus::Failed)
    }
}
