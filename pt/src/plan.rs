//! Plan steps from an extracted plan body

use serde::{Deserialize, Serialize};

/// One numbered action of a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    /// Step number as printed by the planner (0-based for FF)
    pub number: usize,
    /// Ground action, lower-cased, e.g. `pick obj1 room1`
    pub action: String,
}

/// Split a plan body into steps
///
/// Expects lines of the form `N: ACTION ARGS`. Anything else (blank lines,
/// planner chatter) is skipped.
pub fn parse_plan_steps(body: &str) -> Vec<PlanStep> {
    body.lines()
        .filter_map(|line| {
            let (number, action) = line.trim().split_once(':')?;
            let number = number.trim().parse().ok()?;
            let action = action.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
            (!action.is_empty()).then_some(PlanStep { number, action })
        })
        .collect()
}
