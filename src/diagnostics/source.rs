//! Annotated source excerpts around a failing line.

use std::path::Path;

/// Lines shown on each side of the failing line.
pub const CONTEXT_LINES: usize = 3;

/// Read `path` and return the lines around `line` (1-based), or `None` when the
/// file is unreadable, empty, or the line falls outside it.
///
/// Each line is rendered as `> 1234 | text` for the failing line and
/// `  1234 | text` for its neighbours.
pub fn read_context(path: &Path, line: u32) -> Option<String> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "source context unavailable");
            return None;
        }
    };
    render(&content, line)
}

fn render(content: &str, line: u32) -> Option<String> {
    let line = usize::try_from(line).ok().filter(|&l| l > 0)?;
    let lines: Vec<&str> = content.lines().collect();
    if line > lines.len() {
        return None;
    }

    let start = line.saturating_sub(CONTEXT_LINES + 1);
    let end = (line + CONTEXT_LINES).min(lines.len());

    let excerpt = lines[start..end]
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let number = start + i + 1;
            let marker = if number == line { '>' } else { ' ' };
            format!("{marker} {number:>4} | {text}")
        })
        .collect::<Vec<_>>()
        .join("\n");
    Some(excerpt)
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
