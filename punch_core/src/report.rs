//! # Verification Report Buffer
//!
//! Ordered, append-only log of report lines built up during a verification
//! run. Insertion order is significant: lines are never reordered or
//! pruned, and the rendered text is the lines joined with newlines.
//!
//! Formatting contract (consumed by downstream parsers):
//! - every numeric quantity is rendered with exactly three decimal places
//! - stresses carry a " MPa" suffix, lengths " m", forces " kN",
//!   reinforcement ratios " %"
//! - logical segments are delimited by "--- title ---" marker lines

use serde::{Deserialize, Serialize};

/// Append-only sequence of report lines.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Report {
    lines: Vec<String>,
}

impl Report {
    /// Create an empty report.
    pub fn new() -> Self {
        Report { lines: Vec::new() }
    }

    /// Append a line.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Append an empty line.
    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    /// Append a segment marker ("--- title ---") preceded by a blank line.
    pub fn section(&mut self, title: impl AsRef<str>) {
        self.blank();
        self.lines.push(format!("--- {} ---", title.as_ref()));
    }

    /// The accumulated lines, in insertion order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Render the report as a single newline-joined string.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Number of lines appended so far.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether no lines have been appended.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Consume the report, yielding the raw line vector.
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_preserved() {
        let mut report = Report::new();
        report.push("first");
        report.push("second");
        report.section("Checks");
        report.push("third");
        assert_eq!(
            report.lines(),
            &["first", "second", "", "--- Checks ---", "third"]
        );
    }

    #[test]
    fn test_text_joins_with_newlines() {
        let mut report = Report::new();
        report.push("a");
        report.push("b");
        assert_eq!(report.text(), "a\nb");
    }

    #[test]
    fn test_three_decimal_rendering() {
        let mut report = Report::new();
        report.push(format!("Design stress v_Ed(u0): {:.3} MPa", 1.9602));
        assert_eq!(report.lines()[0], "Design stress v_Ed(u0): 1.960 MPa");
    }

    #[test]
    fn test_serialization_is_transparent() {
        let mut report = Report::new();
        report.push("line");
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(json, r#"["line"]"#);
    }
}
