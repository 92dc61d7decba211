//! Patch error types

use plantrace::TraceError;
use thiserror::Error;

use crate::problem::ProblemError;
use crate::report::ReportError;

/// Errors that can occur during a patch workflow
#[derive(Debug, Error)]
pub enum PatchError {
    #[error(transparent)]
    Trace(#[from] TraceError),

    #[error(transparent)]
    Problem(#[from] ProblemError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("Invalid fact: {0}")]
    InvalidFact(String),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl PatchError {
    /// Fatal errors (I/O) end the process; everything else is for the caller to handle
    pub fn is_fatal(&self) -> bool {
        match self {
            PatchError::Trace(e) => e.is_fatal(),
            PatchError::Problem(e) => e.is_fatal(),
            PatchError::Report(e) => e.is_fatal(),
            PatchError::InvalidFact(_) => false,
            PatchError::Output(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_fatal_delegates_to_source() {
        let io = PatchError::from(TraceError::Io {
            path: PathBuf::from("ff.out"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        });
        assert!(io.is_fatal());

        let range = PatchError::from(TraceError::IndexOutOfRange { index: 9, len: 3 });
        assert!(!range.is_fatal());
        assert!(range.to_string().contains('9'));

        assert!(!PatchError::InvalidFact("at a".to_string()).is_fatal());
    }
}
