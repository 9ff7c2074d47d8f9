use std::fmt;

use serde::{Deserialize, Serialize};

/// Test-execution backend a project runs its suite with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Vitest,
    Jest,
    #[default]
    Unknown,
}

impl Backend {
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Vitest => "vitest",
            Backend::Jest => "jest",
            Backend::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
