//! Adaptive compaction of run output.

use crate::models::RunOutput;

/// Bound the size of `output` without losing failure detail.
///
/// With no failures every result is dropped and only the summary remains.
/// Otherwise failed results pass through untouched and the rest shrink to
/// name, status and a zero duration.
pub fn format(output: &RunOutput) -> RunOutput {
    let results = if output.summary.failed == 0 {
        Vec::new()
    } else {
        output
            .results
            .iter()
            .map(|r| if r.status.is_failed() { r.clone() } else { r.compact() })
            .collect()
    };
    RunOutput {
        results,
        ..output.clone()
    }
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;
