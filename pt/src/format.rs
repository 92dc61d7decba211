//! Trace format configuration
//!
//! The delimiters differ between planner builds, so they are injected into
//! each parser instead of living in process-wide constants.

use serde::{Deserialize, Serialize};

/// Marker starting the state-trace section of planner output
pub const DEFAULT_STATE_LIST_DELIMITER: &str = "*** States ***";

/// Marker starting each state within the trace section
pub const DEFAULT_STATE_DELIMITER: &str = "State";

/// Marker preceding the plan in planner output
pub const DEFAULT_PLAN_MARKER: &str = "found legal plan as follows";

/// Marker ending the plan (FF prints timing stats right after it)
pub const DEFAULT_PLAN_END_MARKER: &str = "time";

/// Per-line step prefix stripped from the plan body
pub const DEFAULT_STEP_TOKEN: &str = "step";

/// Which trace indices `state_at` accepts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexBound {
    /// `[0, len - 1]`
    #[default]
    Strict,
    /// `[0, len - 2]`, for callers written against the old off-by-one check
    Legacy,
}

impl IndexBound {
    /// Check `index` against a trace of `len` states
    pub fn allows(self, index: usize, len: usize) -> bool {
        match self {
            IndexBound::Strict => index < len,
            IndexBound::Legacy => index + 1 < len,
        }
    }
}

/// Literal markers used to slice planner output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TraceFormat {
    pub state_list_delimiter: String,
    pub state_delimiter: String,
    pub plan_marker: String,
    pub plan_end_marker: String,
    pub step_token: String,
    pub index_bound: IndexBound,
}

impl Default for TraceFormat {
    fn default() -> Self {
        Self {
            state_list_delimiter: DEFAULT_STATE_LIST_DELIMITER.to_string(),
            state_delimiter: DEFAULT_STATE_DELIMITER.to_string(),
            plan_marker: DEFAULT_PLAN_MARKER.to_string(),
            plan_end_marker: DEFAULT_PLAN_END_MARKER.to_string(),
            step_token: DEFAULT_STEP_TOKEN.to_string(),
            index_bound: IndexBound::default(),
        }
    }
}
