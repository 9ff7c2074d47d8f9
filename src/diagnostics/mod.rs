//! Failure diagnostics: expected/actual recovery, stack filtering, source excerpts.

pub mod message;
pub mod source;
pub mod stack;

use std::path::Path;

use crate::models::{ErrorInfo, Location};

/// Everything recovered from one raw failure message.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnosis {
    pub error: ErrorInfo,
    pub location: Location,
    pub source_context: Option<String>,
}

/// Run a failure message through the parser, the stack extractor and the
/// source reader.
///
/// `test_file` is the file the backend attributed the test to and `fallback`
/// is the backend's own (line, column) for the test. The failure site is the
/// first frame in the test file, else the fallback, else the first usable frame
/// in any other file. The location and source excerpt always name the file the
/// line came from.
pub fn diagnose(raw: &str, test_file: &str, fallback: Option<(u32, u32)>) -> Diagnosis {
    let mut error = message::parse(raw);
    let frames = stack::filter_frames(raw);

    let in_test_file: Vec<&String> = frames.iter().filter(|f| f.contains(test_file)).collect();
    let site = stack::extract_location(&in_test_file)
        .map(|site| (test_file.to_string(), site.line, site.column))
        .or_else(|| fallback.map(|(line, column)| (test_file.to_string(), line, Some(column))))
        .or_else(|| stack::extract_location(&frames).map(|site| (site.file, site.line, site.column)));

    let (location, source_context) = match site {
        Some((file, line, column)) => {
            let source_context = source::read_context(Path::new(&file), line);
            let location = Location {
                file,
                line: Some(line),
                column,
            };
            (location, source_context)
        }
        None => (Location::file(test_file), None),
    };

    if !frames.is_empty() {
        error.stack = Some(frames);
    }

    Diagnosis {
        error,
        location,
        source_context,
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
