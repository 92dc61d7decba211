//! StatePatcher - patch workflows over the live initial state
//!
//! Each workflow builds a delta state and merges it through a
//! [`ProblemStateManager`]. Trace-derived deltas are completed under the
//! closed-world assumption against every proposition the planner ever
//! mentioned, so facts that were false by omission become explicit negatives.

use plantrace::{MalformedProposition, Proposition, Snapshot, Source, TraceParser, WorldState};
use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::PatchError;
use crate::problem::{InitFileManager, ProblemStateManager};
use crate::report::FailureReport;

/// Outcome of patching from a trace
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchReport {
    /// Trace index the delta was taken from
    pub state_index: usize,
    /// Literals merged, positives and negatives together
    pub literals: usize,
    /// Negatives added by CWA completion
    pub negated: usize,
    /// Trace lines skipped while parsing
    pub warnings: Vec<MalformedProposition>,
}

/// Drives patch workflows against a problem state manager
pub struct StatePatcher<M: ProblemStateManager = InitFileManager> {
    manager: M,
    parser: TraceParser,
    /// Predicates never completed under CWA
    open_world: BTreeSet<String>,
}

impl StatePatcher<InitFileManager> {
    /// Open a problem file and configure the parser from `config`
    pub fn open(problem: impl AsRef<Path>, config: &Config) -> Result<Self, PatchError> {
        let manager = InitFileManager::load(problem)?;
        Ok(Self::new(manager, TraceParser::new(config.trace.clone()))
            .with_open_world_predicates(config.open_world_predicates.iter().cloned()))
    }
}

impl<M: ProblemStateManager> StatePatcher<M> {
    pub fn new(manager: M, parser: TraceParser) -> Self {
        Self {
            manager,
            parser,
            open_world: BTreeSet::new(),
        }
    }

    /// Exclude predicates from CWA completion
    pub fn with_open_world_predicates<I, S>(mut self, predicates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.open_world = predicates.into_iter().map(|p| p.as_ref().trim().to_lowercase()).collect();
        self
    }

    pub fn manager(&self) -> &M {
        &self.manager
    }

    /// Merge the CWA-completed state `state_index` of a trace into the initial state
    pub fn patch_from_trace(&mut self, source: &Source, state_index: usize) -> Result<PatchReport, PatchError> {
        let (delta, report) = self.trace_delta(source, state_index)?;
        self.manager.merge_delta(&delta);
        debug!(state_index, literals = report.literals, "StatePatcher::patch_from_trace: merged");
        Ok(report)
    }

    /// Merge caller-supplied literals, as given, into the initial state
    ///
    /// Every fact is validated before anything is merged. No CWA completion.
    pub fn patch_from_facts<S: AsRef<str>>(&mut self, facts: &[S]) -> Result<usize, PatchError> {
        let delta = fact_delta(facts)?;
        self.merge_facts(&delta);
        Ok(delta.size())
    }

    /// Restart from checkpoint 0, patch from the trace, then apply `facts` on top
    ///
    /// The facts land last so they can override trace-derived negatives.
    pub fn patch_from_trace_then_facts<S: AsRef<str>>(
        &mut self,
        state_index: usize,
        source: &Source,
        facts: &[S],
    ) -> Result<PatchReport, PatchError> {
        let delta = fact_delta(facts)?;
        let (trace_state, report) = self.trace_delta(source, state_index)?;

        self.manager.rollback_to(0)?;
        self.manager.merge_delta(&trace_state);
        self.merge_facts(&delta);
        Ok(report)
    }

    /// Replace every fact about `symbol` with `facts`
    pub fn patch_with_replacement<S: AsRef<str>>(&mut self, symbol: &str, facts: &[S]) -> Result<usize, PatchError> {
        let delta = fact_delta(facts)?;
        info!("Replacing facts with symbol '{}'", symbol);
        let purged = self.manager.purge_facts_with_symbol(symbol);
        self.merge_facts(&delta);
        Ok(purged)
    }

    /// Apply an execution failure report: restart state from the trace, then observed facts
    pub fn replan(&mut self, source: &Source, report: &FailureReport) -> Result<PatchReport, PatchError> {
        info!("Replanning after failure at plan step {}", report.failed_step);
        let delta = fact_delta(&report.facts)?;
        let (trace_state, patch) = self.trace_delta(source, report.state_index())?;

        self.manager.merge_delta(&trace_state);
        self.merge_facts(&delta);
        Ok(patch)
    }

    /// Record a checkpoint of the current initial state
    pub fn checkpoint(&mut self) -> usize {
        self.manager.checkpoint()
    }

    /// Return the initial state to checkpoint `checkpoint`
    pub fn rollback_to(&mut self, checkpoint: usize) -> Result<(), PatchError> {
        info!("Rolling back initial state to checkpoint {}", checkpoint);
        self.manager.rollback_to(checkpoint)?;
        Ok(())
    }

    pub fn print_current_state(&self) -> Result<(), PatchError> {
        self.manager.print()?;
        Ok(())
    }

    pub fn write_current_state(&self, out: &mut dyn Write) -> Result<(), PatchError> {
        self.manager.write_init_state(out)?;
        Ok(())
    }

    pub fn serialize_current_state(&self, destination: &Path) -> Result<(), PatchError> {
        self.manager.serialize(destination)?;
        Ok(())
    }

    /// Parse the trace and build the CWA-completed delta without touching the manager
    fn trace_delta(&self, source: &Source, state_index: usize) -> Result<(Snapshot, PatchReport), PatchError> {
        info!("Patching with state {} from {}", state_index, source.describe());

        let parsed = self.parser.parse_trace(source)?;
        let universe = self.closed_world_universe(self.parser.global_propositions(&parsed.trace));
        let mut delta = self.parser.state_at(&parsed.trace, state_index)?.clone();
        let negated = delta.complete_under_cwa(&universe);

        let report = PatchReport {
            state_index,
            literals: delta.size(),
            negated,
            warnings: parsed.warnings,
        };
        Ok((delta, report))
    }

    fn merge_facts(&mut self, delta: &Snapshot) {
        let listed: Vec<&str> = delta.iter().map(Proposition::as_str).collect();
        info!("Patching with props: [{}]", listed.join(", "));
        self.manager.merge_delta(delta);
    }

    fn closed_world_universe(&self, universe: BTreeSet<Proposition>) -> BTreeSet<Proposition> {
        if self.open_world.is_empty() {
            return universe;
        }
        universe
            .into_iter()
            .filter(|p| !self.open_world.contains(p.predicate()))
            .collect()
    }
}

fn fact_delta<S: AsRef<str>>(facts: &[S]) -> Result<Snapshot, PatchError> {
    facts
        .iter()
        .map(|fact| Proposition::literal(fact.as_ref()).map_err(|e| PatchError::InvalidFact(e.text)))
        .collect()
}
