//! Live initial state of a planning problem
//!
//! The patcher never edits problem text itself. It computes delta states and
//! hands them to a `ProblemStateManager`, which owns the facts, their
//! checkpoint history and serialization. `InitFileManager` is the default
//! implementation, backed by a PDDL problem file.

mod error;
mod init_file;

pub use error::ProblemError;
pub use init_file::InitFileManager;

use plantrace::{Proposition, WorldState};
use std::io::{self, Write};
use std::path::Path;

/// Capabilities the patcher needs from whoever owns the initial state
///
/// Checkpoints are numbered from 0 (the state as loaded). Merging a delta
/// changes the facts without moving to a new checkpoint.
pub trait ProblemStateManager {
    /// Apply the delta's literals in order; later literals win
    fn merge_delta(&mut self, delta: &dyn WorldState);

    /// Drop every fact whose predicate is `symbol`; returns how many were dropped
    fn purge_facts_with_symbol(&mut self, symbol: &str) -> usize;

    /// Record the current facts as a new checkpoint and return its number
    fn checkpoint(&mut self) -> usize;

    /// Restore checkpoint `checkpoint`, discarding everything recorded after it
    fn rollback_to(&mut self, checkpoint: usize) -> Result<(), ProblemError>;

    /// Current facts in order
    fn facts(&self) -> &[Proposition];

    /// Write a human-readable rendering of the current initial state
    fn write_init_state(&self, out: &mut dyn Write) -> io::Result<()>;

    /// Write the full problem description with the current initial state
    fn serialize(&self, path: &Path) -> Result<(), ProblemError>;

    /// Print the current initial state to stdout
    fn print(&self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.write_init_state(&mut lock)
    }
}
