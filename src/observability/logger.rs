//! Structured logging for version-store events
//!
//! One event per line, rendered as a single JSON object with a fixed key
//! order (`event`, then `severity`, then fields sorted by name) so runs
//! diff cleanly. Writes are synchronous and unbuffered; a log line that
//! fails to write must never fail the operation that produced it.
//!
//! Severity tops out at ERROR. No store error is fatal to the process,
//! so there is no FATAL level (ERRORS.md §3).

use std::fmt;
use std::io::{self, Write};

/// Severity of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Normal lifecycle: connects, table creation, commits
    Info,
    /// Expected but notable, such as a lost optimistic-commit race
    Warn,
    /// A failed operation; the store itself continues
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emits version-store events as JSON lines.
///
/// Info and warn lines go to stdout; error lines go to stderr.
pub struct Logger;

impl Logger {
    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::write_line(&mut io::stdout(), Severity::Info, event, fields);
    }

    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::write_line(&mut io::stdout(), Severity::Warn, event, fields);
    }

    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::write_line(&mut io::stderr(), Severity::Error, event, fields);
    }

    fn write_line<W: Write>(writer: &mut W, severity: Severity, event: &str, fields: &[(&str, &str)]) {
        let mut line = String::with_capacity(128);
        line.push_str("{\"event\":\"");
        push_escaped(&mut line, event);
        line.push_str("\",\"severity\":\"");
        line.push_str(severity.as_str());
        line.push('"');

        let mut ordered: Vec<&(&str, &str)> = fields.iter().collect();
        ordered.sort_by_key(|(name, _)| *name);
        for (name, value) in ordered {
            line.push_str(",\"");
            push_escaped(&mut line, name);
            line.push_str("\":\"");
            push_escaped(&mut line, value);
            line.push('"');
        }
        line.push_str("}\n");

        // Single write call per line keeps interleaving between threads at
        // line granularity
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }
}

fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                use fmt::Write as _;
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
        let mut buffer = Vec::new();
        Logger::write_line(&mut buffer, severity, event, fields);
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_commit_line_is_valid_json() {
        let line = rendered(
            Severity::Info,
            "VERSION_COMMITTED",
            &[("table", "quotes"), ("version", "3"), ("row_count", "5")],
        );

        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["event"], "VERSION_COMMITTED");
        assert_eq!(parsed["severity"], "INFO");
        assert_eq!(parsed["table"], "quotes");
        assert_eq!(parsed["version"], "3");
    }

    #[test]
    fn test_conflict_line_is_field_order_independent() {
        let a = rendered(
            Severity::Warn,
            "COMMIT_CONFLICT",
            &[("table", "quotes"), ("expected", "2"), ("actual", "3")],
        );
        let b = rendered(
            Severity::Warn,
            "COMMIT_CONFLICT",
            &[("actual", "3"), ("expected", "2"), ("table", "quotes")],
        );

        assert_eq!(a, b);
        // Fields land in name order after the fixed prefix
        let actual_pos = a.find("\"actual\"").unwrap();
        let expected_pos = a.find("\"expected\"").unwrap();
        let table_pos = a.find("\"table\"").unwrap();
        assert!(actual_pos < expected_pos && expected_pos < table_pos);
    }

    #[test]
    fn test_event_and_severity_lead_the_line() {
        let line = rendered(Severity::Info, "VERSION_RESTORED", &[("new_version", "4")]);

        assert!(line.starts_with("{\"event\":\"VERSION_RESTORED\""));
        let severity_pos = line.find("\"severity\"").unwrap();
        let field_pos = line.find("\"new_version\"").unwrap();
        assert!(severity_pos < field_pos);
    }

    #[test]
    fn test_field_values_are_escaped() {
        let line = rendered(
            Severity::Error,
            "DATA_CORRUPTION",
            &[("details", "checksum mismatch on \"quotes\"\nref abc")],
        );

        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["details"], "checksum mismatch on \"quotes\"\nref abc");
    }

    #[test]
    fn test_exactly_one_line_per_event() {
        let line = rendered(Severity::Info, "CHECKOUT", &[("table", "quotes"), ("version", "2")]);

        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);
    }
}
