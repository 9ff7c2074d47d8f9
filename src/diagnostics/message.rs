//! Best-effort recovery of expected/actual values from assertion failure text.
//!
//! Assertion libraries print failures as prose, so each known shape is an
//! independent matcher tried in priority order. The first one that recognises
//! the text wins; anything unrecognised leaves both values unset.

use std::sync::LazyLock;

use regex::Regex;

use super::stack::strip_ansi;
use crate::models::ErrorInfo;

/// An expected/actual pair pulled out of failure text. Either side may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comparison {
    pub expected: Option<String>,
    pub actual: Option<String>,
}

type Matcher = fn(&str) -> Option<Comparison>;

/// Matchers in priority order.
const MATCHERS: &[(&str, Matcher)] = &[
    ("labeled-fields", labeled_fields),
    ("inline-quoted", inline_quoted),
    ("inline-object", inline_object),
    ("inline-bare", inline_bare),
];

// `Expected: "x"`, `Received string: 'y'`, `Expected length: 3`
static EXPECTED_FIELD: LazyLock<Regex> = LazyLock::new(|| labeled_field("expected"));
static RECEIVED_FIELD: LazyLock<Regex> = LazyLock::new(|| labeled_field("received"));

static INLINE_QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\bexpected[ \t]+(?:'([^'\n]*)'|"([^"\n]*)")[ \t]+to[ \t]+[a-z][a-z ]*?[ \t]+(?:'([^'\n]*)'|"([^"\n]*)")"#,
    )
    .expect("valid regex")
});

static INLINE_OBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bexpected\s+(\{.*\})\s+to\s+[a-z][a-z ]*?\s+(\{.*\})\s*$")
        .expect("valid regex")
});

static INLINE_BARE: LazyLock<Regex> = LazyLock::new(|| {
    const SCALAR: &str =
        r"(-?\d+(?:\.\d+)?(?:e[+-]?\d+)?n?|true|false|null|undefined|NaN|-?Infinity)";
    Regex::new(&format!(
        r"(?im)\bexpected[ \t]+{SCALAR}[ \t]+to[ \t]+[a-z][a-z ]*?[ \t]+{SCALAR}[ \t]*(?://.*)?$"
    ))
    .expect("valid regex")
});

fn labeled_field(label: &str) -> Regex {
    Regex::new(&format!(
        r#"(?im)^[ \t]*{label}(?:[ \t]+[a-z]+)?:[ \t]*(?:"([^"\n]*)"|'([^'\n]*)'|(\S+))"#
    ))
    .expect("valid regex")
}

/// Build the `ErrorInfo` for one raw failure message. `message` is always `raw`.
pub fn parse(raw: &str) -> ErrorInfo {
    let comparison = compare(raw).unwrap_or_default();
    ErrorInfo {
        message: raw.to_string(),
        expected: comparison.expected,
        actual: comparison.actual,
        stack: None,
    }
}

/// Run the matchers against the escape-stripped text, stopping at the first match.
pub fn compare(raw: &str) -> Option<Comparison> {
    let text = strip_ansi(raw);
    MATCHERS.iter().find_map(|(name, matcher)| {
        let found = matcher(&text)?;
        tracing::trace!(matcher = *name, "recognised failure message");
        Some(found)
    })
}

fn first_group(caps: &regex::Captures<'_>, groups: &[usize]) -> Option<String> {
    groups
        .iter()
        .find_map(|&i| caps.get(i))
        .map(|m| m.as_str().to_string())
}

fn labeled_fields(text: &str) -> Option<Comparison> {
    let field = |re: &Regex| {
        re.captures(text)
            .and_then(|caps| first_group(&caps, &[1, 2, 3]))
    };
    let expected = field(&EXPECTED_FIELD);
    let actual = field(&RECEIVED_FIELD);
    if expected.is_none() && actual.is_none() {
        return None;
    }
    Some(Comparison { expected, actual })
}

fn inline_quoted(text: &str) -> Option<Comparison> {
    let caps = INLINE_QUOTED.captures(text)?;
    Some(Comparison {
        actual: first_group(&caps, &[1, 2]),
        expected: first_group(&caps, &[3, 4]),
    })
}

fn inline_object(text: &str) -> Option<Comparison> {
    let first_line = text.lines().next()?;
    let line = match first_line.find("//") {
        Some(i) => &first_line[..i],
        None => first_line,
    };
    let caps = INLINE_OBJECT.captures(line.trim_end())?;
    Some(Comparison {
        actual: Some(caps[1].to_string()),
        expected: Some(caps[2].to_string()),
    })
}

fn inline_bare(text: &str) -> Option<Comparison> {
    let caps = INLINE_BARE.captures(text)?;
    Some(Comparison {
        actual: Some(caps[1].to_string()),
        expected: Some(caps[2].to_string()),
    })
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
