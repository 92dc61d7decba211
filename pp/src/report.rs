//! Execution failure reports
//!
//! When a plan step fails, the executor writes a short report: the failed
//! step's line number followed by the facts it observed.
//!
//! ```text
//! linenumber: 3
//! (at robot room2)
//! (not (holding obj1))
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const LINE_NUMBER_LABEL: &str = "linenumber";

/// Errors reading a failure report
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to read report {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Report is empty")]
    Empty,

    #[error("Invalid line number '{0}' (expected a positive plan step)")]
    InvalidLineNumber(String),
}

impl ReportError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, ReportError::Io { .. })
    }
}

/// A parsed execution failure report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReport {
    /// 1-based number of the plan step that failed
    pub failed_step: usize,
    /// Observed facts, lower-cased, in report order
    pub facts: Vec<String>,
}

impl FailureReport {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ReportError> {
        let lowered = text.to_lowercase();
        let mut lines = lowered.lines();

        let first = lines.next().map(str::trim).filter(|l| !l.is_empty()).ok_or(ReportError::Empty)?;
        let number = first
            .strip_prefix(LINE_NUMBER_LABEL)
            .map(|rest| rest.trim_start().trim_start_matches(':'))
            .unwrap_or(first)
            .trim();
        let failed_step = number
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| ReportError::InvalidLineNumber(number.to_string()))?;

        let facts: Vec<String> = lines.map(str::trim).filter(|l| !l.is_empty()).map(String::from).collect();
        debug!(failed_step, facts = facts.len(), "FailureReport::parse: done");

        Ok(Self { failed_step, facts })
    }

    /// Trace index of the state to restart from
    pub fn state_index(&self) -> usize {
        self.failed_step - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_report() {
        let report = FailureReport::parse("LineNumber: 3\n(AT Robot Room2)\n\n(not (holding obj1))\n").unwrap();
        assert_eq!(report.failed_step, 3);
        assert_eq!(report.state_index(), 2);
        assert_eq!(report.facts, vec!["(at robot room2)", "(not (holding obj1))"]);
    }

    #[test]
    fn test_bare_number_accepted() {
        let report = FailureReport::parse("1\n").unwrap();
        assert_eq!(report.state_index(), 0);
        assert!(report.facts.is_empty());
    }

    #[test]
    fn test_zero_rejected() {
        let err = FailureReport::parse("linenumber: 0\n(a)").unwrap_err();
        assert!(matches!(err, ReportError::InvalidLineNumber(_)));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            FailureReport::parse("linenumber: three").unwrap_err(),
            ReportError::InvalidLineNumber(_)
        ));
        assert!(matches!(FailureReport::parse("").unwrap_err(), ReportError::Empty));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        assert!(FailureReport::load("/nonexistent/err.txt").unwrap_err().is_fatal());
    }
}
