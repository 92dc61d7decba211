//! TraceParser - planner output to world-state snapshots

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{MalformedProposition, TraceError};
use crate::format::TraceFormat;
use crate::proposition::Proposition;
use crate::state::{Snapshot, WorldState};

/// Where planner output comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Read the whole file up front
    File(PathBuf),
    /// Use this text as-is
    Text(String),
}

impl Source {
    pub fn file(path: impl AsRef<Path>) -> Self {
        Source::File(path.as_ref().to_path_buf())
    }

    pub fn text(text: impl Into<String>) -> Self {
        Source::Text(text.into())
    }

    /// Load the full text, fully buffered
    pub fn read(&self) -> Result<Cow<'_, str>, TraceError> {
        match self {
            Source::File(path) => fs::read_to_string(path).map(Cow::Owned).map_err(|source| TraceError::Io {
                path: path.clone(),
                source,
            }),
            Source::Text(text) => Ok(Cow::Borrowed(text)),
        }
    }

    /// Short description for log lines
    pub fn describe(&self) -> String {
        match self {
            Source::File(path) => path.display().to_string(),
            Source::Text(text) => format!("<{} bytes of text>", text.len()),
        }
    }
}

/// Ordered snapshots; index 0 is the state before the first action
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    states: Vec<Snapshot>,
}

impl Trace {
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.states.iter()
    }
}

impl FromIterator<Snapshot> for Trace {
    fn from_iter<I: IntoIterator<Item = Snapshot>>(iter: I) -> Self {
        Self {
            states: iter.into_iter().collect(),
        }
    }
}

/// A parsed trace together with the lines that were skipped
#[derive(Debug, Clone, Default)]
pub struct ParsedTrace {
    pub trace: Trace,
    pub warnings: Vec<MalformedProposition>,
}

/// Splits planner output into snapshots according to a [`TraceFormat`]
#[derive(Debug, Clone, Default)]
pub struct TraceParser {
    format: TraceFormat,
}

impl TraceParser {
    pub fn new(format: TraceFormat) -> Self {
        debug!(?format, "TraceParser::new: called");
        Self { format }
    }

    /// Parse the state trace out of planner output
    ///
    /// Everything after the first state-list delimiter is cut into sections
    /// on the state delimiter. Sections that end up with no propositions
    /// (leading fragments, trailing whitespace) are dropped.
    pub fn parse_trace(&self, source: &Source) -> Result<ParsedTrace, TraceError> {
        info!("Parsing planner trace from {}", source.describe());
        let text = source.read()?;

        let (_, relevant) = text
            .split_once(self.format.state_list_delimiter.as_str())
            .ok_or_else(|| TraceError::MissingDelimiter {
                delimiter: self.format.state_list_delimiter.clone(),
            })?;

        let mut states = Vec::new();
        let mut warnings = Vec::new();
        for section in relevant.split(self.format.state_delimiter.as_str()) {
            let snapshot = self.parse_state(section, &mut warnings);
            if snapshot.size() > 0 {
                states.push(snapshot);
            }
        }

        debug!(
            states = states.len(),
            warnings = warnings.len(),
            "TraceParser::parse_trace: done"
        );
        Ok(ParsedTrace {
            trace: Trace { states },
            warnings,
        })
    }

    /// Build one snapshot from the lines of a state section
    pub fn parse_state(&self, section: &str, warnings: &mut Vec<MalformedProposition>) -> Snapshot {
        let mut snapshot = Snapshot::new();
        for line in section.lines() {
            match Proposition::normalize(line) {
                Ok(Some(prop)) => {
                    snapshot.add_proposition(prop);
                }
                Ok(None) => {}
                Err(malformed) => {
                    warn!("{}", malformed);
                    warnings.push(malformed);
                }
            }
        }
        snapshot
    }

    /// Union of every state's propositions, in trace order
    pub fn global_propositions(&self, trace: &Trace) -> BTreeSet<Proposition> {
        let mut universe = BTreeSet::new();
        for state in trace.iter() {
            universe.extend(state.all_propositions());
        }
        universe
    }

    /// Bounds-checked access to one snapshot
    pub fn state_at<'a>(&self, trace: &'a Trace, index: usize) -> Result<&'a Snapshot, TraceError> {
        if !self.format.index_bound.allows(index, trace.len()) {
            return Err(TraceError::IndexOutOfRange {
                index,
                len: trace.len(),
            });
        }
        Ok(&trace.states[index])
    }

    /// Extract the plan body from planner solution output
    ///
    /// Takes the text between the plan marker and the next end marker and
    /// removes the step token. Without an end marker the rest of the text is used.
    pub fn extract_plan(&self, source: &Source) -> Result<String, TraceError> {
        info!("Extracting plan from {}", source.describe());
        let text = source.read()?;

        let (_, after) = text
            .split_once(self.format.plan_marker.as_str())
            .ok_or_else(|| TraceError::PlanNotFound {
                marker: self.format.plan_marker.clone(),
            })?;
        let body = after
            .split_once(self.format.plan_end_marker.as_str())
            .map_or(after, |(body, _)| body);

        Ok(body.replace(self.format.step_token.as_str(), ""))
    }
}
