//! Trace parsing error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or querying a planner trace
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Trace delimiter '{delimiter}' not found")]
    MissingDelimiter { delimiter: String },

    #[error("State index {index} out of range for trace of {len} states")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Plan marker '{marker}' not found")]
    PlanNotFound { marker: String },
}

impl TraceError {
    /// Check if this error should end the process rather than be handled by the caller
    pub fn is_fatal(&self) -> bool {
        matches!(self, TraceError::Io { .. })
    }
}

/// A trace line that could not be read as a proposition
///
/// Never fatal: the parser logs it, skips the line and keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a proposition: {text}")]
pub struct MalformedProposition {
    /// The offending text, trimmed
    pub text: String,
}

impl MalformedProposition {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_io_is_fatal() {
        let err = TraceError::Io {
            path: PathBuf::from("/tmp/missing.out"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.is_fatal());
        assert!(err.to_string().contains("/tmp/missing.out"));

        assert!(
            !TraceError::MissingDelimiter {
                delimiter: "*** States ***".to_string()
            }
            .is_fatal()
        );
        assert!(!TraceError::IndexOutOfRange { index: 5, len: 2 }.is_fatal());
        assert!(
            !TraceError::PlanNotFound {
                marker: "found legal plan as follows".to_string()
            }
            .is_fatal()
        );
    }

    #[test]
    fn test_index_out_of_range_message() {
        let msg = TraceError::IndexOutOfRange { index: 5, len: 2 }.to_string();
        assert!(msg.contains('5'));
        assert!(msg.contains('2'));
    }
}
