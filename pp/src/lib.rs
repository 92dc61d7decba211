//! PddlPatch - incremental initial-state patching for re-planning
//!
//! When executing a plan fails partway through, the planner has to restart
//! from the world as it actually is. PddlPatch rebuilds that world from the
//! planner's own state trace, completes it under the closed-world assumption,
//! layers facts observed during execution on top and writes a problem file
//! with the corrected `(:init ...)` block.
//!
//! # Workflows
//!
//! - [`StatePatcher::patch_from_trace`] - merge a CWA-completed trace state
//! - [`StatePatcher::patch_from_facts`] - merge caller-supplied literals
//! - [`StatePatcher::patch_from_trace_then_facts`] - reset, then both of the above
//! - [`StatePatcher::patch_with_replacement`] - swap out every fact about a symbol
//! - [`StatePatcher::replan`] - apply an execution [`FailureReport`]
//!
//! # Example
//!
//! ```ignore
//! use pddlpatch::{Config, StatePatcher};
//! use plantrace::Source;
//!
//! let mut patcher = StatePatcher::open("prob.pddl", &Config::default())?;
//! patcher.patch_from_trace(&Source::file("ff.out"), 3)?;
//! patcher.patch_from_facts(&["(not (holding obj1))"])?;
//! patcher.serialize_current_state("prob2.pddl".as_ref())?;
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod patcher;
pub mod problem;
pub mod report;

pub use config::Config;
pub use error::PatchError;
pub use patcher::{PatchReport, StatePatcher};
pub use problem::{InitFileManager, ProblemError, ProblemStateManager};
pub use report::{FailureReport, ReportError};
