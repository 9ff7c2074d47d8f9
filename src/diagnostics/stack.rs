//! Call-stack frame filtering and failure-site extraction.

use std::sync::LazyLock;

use regex::Regex;

const FRAME_MARKER: &str = "at ";

/// Path fragments that identify runtime internals or third-party code.
const LIBRARY_MARKERS: &[&str] = &["node_modules", "node:", "(internal/"];

// `at fn (path:line:col)`, `at path:line:col`, column optional.
static FRAME_SITE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*at (?:.*?\()?([^()]+?):(\d+)(?::(\d+))?\)?$").expect("valid regex")
});

// CSI sequences (colors), OSC sequences (hyperlinks) ended by BEL or ST, and
// two-byte escapes.
static ANSI_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b(?:\[[0-?]*[ -/]*[@-~]|\][^\x07\x1b\n]*(?:\x07|\x1b\\)?|[@-Z\\-_])")
        .expect("valid regex")
});

/// A failure site recovered from a stack frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameLocation {
    /// Path named by the frame, with any `file://` scheme removed.
    pub file: String,
    pub line: u32,
    pub column: Option<u32>,
}

/// Keep only the frames attributable to the project's own source, innermost first.
pub fn filter_frames(raw: &str) -> Vec<String> {
    strip_ansi(raw)
        .lines()
        .filter(|line| line.trim_start().starts_with(FRAME_MARKER))
        .filter(|line| !LIBRARY_MARKERS.iter().any(|m| line.contains(m)))
        .map(str::to_string)
        .collect()
}

/// Line/column of the first frame that carries a usable `:line[:column]` suffix.
pub fn extract_location<S: AsRef<str>>(frames: &[S]) -> Option<FrameLocation> {
    frames
        .iter()
        .map(AsRef::as_ref)
        .filter(|frame| !is_eval_frame(frame))
        .find_map(|frame| parse_suffix(frame.trim_end()))
}

fn is_eval_frame(frame: &str) -> bool {
    let frame = frame.trim_start();
    frame.starts_with("at eval ") || frame.contains("eval at ") || frame.contains("<anonymous>:")
}

fn parse_suffix(frame: &str) -> Option<FrameLocation> {
    let caps = FRAME_SITE.captures(frame)?;
    let file = &caps[1];
    Some(FrameLocation {
        file: file.strip_prefix("file://").unwrap_or(file).to_string(),
        line: caps[2].parse().ok()?,
        column: caps.get(3).and_then(|c| c.as_str().parse().ok()),
    })
}

/// Strip terminal escape sequences from a string.
pub fn strip_ansi(s: &str) -> String {
    ANSI_ESCAPE.replace_all(s, "").into_owned()
}

#[cfg(test)]
#[path = "stack_tests.rs"]
mod tests;
