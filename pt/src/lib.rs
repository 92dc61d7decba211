//! PlanTrace - planner state traces as world-state snapshots
//!
//! A symbolic planner (FF and friends) can dump every state it visits while
//! building a plan. This crate turns that dump into an ordered [`Trace`] of
//! [`Snapshot`]s and pulls the plan itself out of the planner's solution text.
//!
//! # Trace layout
//!
//! ```text
//! ...planner chatter...
//! *** States ***
//! State
//! (at robot room1)
//! (holding obj1)
//! State
//! (at robot room2)
//! ...
//! ```
//!
//! # Example
//!
//! ```ignore
//! use plantrace::{Source, TraceParser};
//!
//! let parser = TraceParser::default();
//! let parsed = parser.parse_trace(&Source::file("ff.out"))?;
//! let universe = parser.global_propositions(&parsed.trace);
//! let state = parser.state_at(&parsed.trace, 3)?;
//! ```

pub mod error;
pub mod format;
pub mod parser;
pub mod plan;
pub mod proposition;
pub mod state;

pub use error::{MalformedProposition, TraceError};
pub use format::{IndexBound, TraceFormat};
pub use parser::{ParsedTrace, Source, Trace, TraceParser};
pub use plan::{PlanStep, parse_plan_steps};
pub use proposition::Proposition;
pub use state::{Snapshot, WorldState};
