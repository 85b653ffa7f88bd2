//! Compare a trace written by the core against a reference trace.
//!
//! Lines are compared after collapsing runs of whitespace and folding case,
//! so column padding and hex case may differ between tools. Blank lines are
//! ignored.

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceMismatch {
    /// 1-based, counting non-blank lines.
    pub line: usize,
    /// Normalised lines; empty when that trace ended early.
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for TraceMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |s: &str| if s.is_empty() { "<end of trace>".to_string() } else { s.to_string() };
        write!(
            f,
            "line {}:\n  expected: {}\n  actual:   {}",
            self.line,
            show(&self.expected),
            show(&self.actual)
        )
    }
}

fn normalise(line: &str) -> String {
    line.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase()
}

fn lines(trace: &str) -> impl Iterator<Item = String> + '_ {
    trace.lines().map(normalise).filter(|l| !l.is_empty())
}

/// First line where the traces disagree, or `None` if they match.
pub fn diff_traces(expected: &str, actual: &str) -> Option<TraceMismatch> {
    let mut expected = lines(expected);
    let mut actual = lines(actual);
    let mut line = 0;
    loop {
        line += 1;
        match (expected.next(), actual.next()) {
            (None, None) => return None,
            (Some(e), Some(a)) if e == a => {}
            (e, a) => {
                return Some(TraceMismatch {
                    line,
                    expected: e.unwrap_or_default(),
                    actual: a.unwrap_or_default(),
                });
            }
        }
    }
}
