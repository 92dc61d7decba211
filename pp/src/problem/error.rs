//! Problem file error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, editing or writing a problem's initial state
#[derive(Debug, Error)]
pub enum ProblemError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No (:init ...) section found in {origin}")]
    MissingInit { origin: String },

    #[error("Unbalanced parentheses in (:init ...) section of {origin}")]
    Unbalanced { origin: String },

    #[error("Checkpoint {requested} does not exist ({available} available)")]
    CheckpointOutOfRange { requested: usize, available: usize },

    #[error("Invalid fact in initial state: {0}")]
    InvalidFact(String),
}

impl ProblemError {
    /// Check if this error should end the process rather than be handled by the caller
    pub fn is_fatal(&self) -> bool {
        matches!(self, ProblemError::Io { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkpoint_message() {
        let msg = ProblemError::CheckpointOutOfRange {
            requested: 4,
            available: 2,
        }
        .to_string();
        assert!(msg.contains('4'));
        assert!(msg.contains('2'));
    }

    #[test]
    fn test_only_io_is_fatal() {
        let err = ProblemError::Io {
            path: PathBuf::from("/tmp/prob.pddl"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.is_fatal());
        assert!(
            !ProblemError::MissingInit {
                origin: "prob.pddl".to_string()
            }
            .is_fatal()
        );
    }
}
