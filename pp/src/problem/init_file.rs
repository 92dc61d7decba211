//! InitFileManager - initial state backed by a PDDL problem file
//!
//! Only the `(:init ...)` block is interpreted. Everything before and after
//! it is carried through serialization byte-for-byte, so loading a file this
//! manager wrote and writing it again gives identical output.

use regex::Regex;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info};

use plantrace::{Proposition, WorldState};

use super::{ProblemError, ProblemStateManager};

static INIT_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\(\s*:init\b").expect("valid regex"));

const FACT_INDENT: &str = "    ";

/// Problem file with an editable, checkpointed initial state
#[derive(Debug, Clone)]
pub struct InitFileManager {
    /// Where the problem came from, for error messages
    origin: String,
    /// Text before `(:init`
    prefix: String,
    /// Text after the `)` closing the init block
    suffix: String,
    /// Current facts in order
    facts: Vec<Proposition>,
    /// Saved fact lists; index is the checkpoint number
    checkpoints: Vec<Vec<Proposition>>,
}

impl InitFileManager {
    /// Load a problem file; its initial state becomes checkpoint 0
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProblemError> {
        let path = path.as_ref();
        info!("Loading problem file {}", path.display());
        let text = fs::read_to_string(path).map_err(|source| ProblemError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, &path.display().to_string())
    }

    /// Build from problem text already in memory
    pub fn from_text(text: &str) -> Result<Self, ProblemError> {
        Self::parse(text, "<text>")
    }

    fn parse(text: &str, origin: &str) -> Result<Self, ProblemError> {
        let open = find_init(text).ok_or_else(|| ProblemError::MissingInit {
            origin: origin.to_string(),
        })?;
        let (raw_facts, end) = scan_init_body(text, open.1, origin)?;

        let mut facts = Vec::with_capacity(raw_facts.len());
        for fact in raw_facts {
            if !facts.contains(&fact) {
                facts.push(fact);
            }
        }
        debug!(facts = facts.len(), %origin, "InitFileManager::parse: loaded init block");

        Ok(Self {
            origin: origin.to_string(),
            prefix: text[..open.0].to_string(),
            suffix: text[end..].to_string(),
            checkpoints: vec![facts.clone()],
            facts,
        })
    }

    /// Number of checkpoints recorded so far (at least 1)
    pub fn checkpoint_count(&self) -> usize {
        self.checkpoints.len()
    }

    /// The `(:init ...)` block as it will be written
    pub fn render_init(&self) -> String {
        let mut out = String::from("(:init\n");
        for fact in &self.facts {
            out.push_str(FACT_INDENT);
            out.push_str(fact.as_str());
            out.push('\n');
        }
        out.push_str("  )");
        out
    }

    /// The whole problem description with the current initial state
    pub fn to_pddl(&self) -> String {
        format!("{}{}{}", self.prefix, self.render_init(), self.suffix)
    }
}

impl ProblemStateManager for InitFileManager {
    fn merge_delta(&mut self, delta: &dyn WorldState) {
        let before = self.facts.len();
        for literal in delta.literals() {
            if literal.is_negated() {
                let atom = literal.positive();
                self.facts.retain(|fact| *fact != atom);
            } else if !self.facts.contains(literal) {
                self.facts.push(literal.clone());
            }
        }
        debug!(
            before,
            after = self.facts.len(),
            delta = delta.size(),
            "InitFileManager::merge_delta: merged"
        );
    }

    fn purge_facts_with_symbol(&mut self, symbol: &str) -> usize {
        let symbol = symbol.trim().to_lowercase();
        let before = self.facts.len();
        self.facts.retain(|fact| fact.predicate() != symbol);
        let purged = before - self.facts.len();
        info!("Purged {} facts with symbol '{}' from {}", purged, symbol, self.origin);
        purged
    }

    fn checkpoint(&mut self) -> usize {
        self.checkpoints.push(self.facts.clone());
        self.checkpoints.len() - 1
    }

    fn rollback_to(&mut self, checkpoint: usize) -> Result<(), ProblemError> {
        let saved = self
            .checkpoints
            .get(checkpoint)
            .cloned()
            .ok_or(ProblemError::CheckpointOutOfRange {
                requested: checkpoint,
                available: self.checkpoints.len(),
            })?;
        self.facts = saved;
        self.checkpoints.truncate(checkpoint + 1);
        debug!(checkpoint, facts = self.facts.len(), "InitFileManager::rollback_to: restored");
        Ok(())
    }

    fn facts(&self) -> &[Proposition] {
        &self.facts
    }

    fn write_init_state(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{}", self.render_init())
    }

    fn serialize(&self, path: &Path) -> Result<(), ProblemError> {
        info!("Writing problem file {}", path.display());
        fs::write(path, self.to_pddl()).map_err(|source| ProblemError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Byte range of the first `(:init` outside a `;` comment
fn find_init(text: &str) -> Option<(usize, usize)> {
    INIT_OPEN
        .find_iter(text)
        .find(|m| {
            let line_start = text[..m.start()].rfind('\n').map_or(0, |i| i + 1);
            !text[line_start..m.start()].contains(';')
        })
        .map(|m| (m.start(), m.end()))
}

/// Collect the facts of an init block whose body starts at `start`
///
/// Returns the facts and the offset just past the closing parenthesis.
fn scan_init_body(text: &str, start: usize, origin: &str) -> Result<(Vec<Proposition>, usize), ProblemError> {
    let mut facts = Vec::new();
    let mut current = String::new();
    let mut depth = 1usize;
    let mut in_comment = false;

    for (offset, c) in text[start..].char_indices() {
        if in_comment {
            if c == '\n' {
                in_comment = false;
                if depth > 1 {
                    current.push(' ');
                }
            }
            continue;
        }
        match c {
            ';' => in_comment = true,
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((facts, start + offset + 1));
                }
                current.push(c);
                if depth == 1 {
                    let fact = Proposition::literal(&current).map_err(|e| ProblemError::InvalidFact(e.text))?;
                    facts.push(fact);
                    current.clear();
                }
            }
            c if depth == 1 => {
                if !c.is_whitespace() {
                    return Err(ProblemError::InvalidFact(format!("stray symbol '{}' in {}", c, origin)));
                }
            }
            c => current.push(c),
        }
    }

    Err(ProblemError::Unbalanced {
        origin: origin.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use plantrace::Snapshot;
    use tempfile::TempDir;

    const PROBLEM: &str = "(define (problem move-obj)\n  (:domain robotics)\n  (:objects obj1 room1 room2)\n  (:INIT (at robot room1) ; robot starts here\n         (AT obj1 room1)\n         (clear   obj1))\n  (:goal (at obj1 room2)))\n";

    fn prop(text: &str) -> Proposition {
        Proposition::literal(text).unwrap()
    }

    fn delta(literals: &[&str]) -> Snapshot {
        literals.iter().map(|l| prop(l)).collect()
    }

    fn facts_of(mgr: &InitFileManager) -> Vec<&str> {
        mgr.facts().iter().map(Proposition::as_str).collect()
    }

    #[test]
    fn test_parse_init_block() {
        let mgr = InitFileManager::from_text(PROBLEM).unwrap();
        assert_eq!(facts_of(&mgr), vec!["(at robot room1)", "(at obj1 room1)", "(clear obj1)"]);
        assert_eq!(mgr.checkpoint_count(), 1);
    }

    #[test]
    fn test_commented_init_is_ignored() {
        let text = "(define (problem p)\n ; (:init (bogus))\n (:init (real a)))";
        let mgr = InitFileManager::from_text(text).unwrap();
        assert_eq!(facts_of(&mgr), vec!["(real a)"]);
    }

    #[test]
    fn test_missing_init() {
        let err = InitFileManager::from_text("(define (problem p) (:goal (x)))").unwrap_err();
        assert!(matches!(err, ProblemError::MissingInit { .. }));
    }

    #[test]
    fn test_unbalanced_init() {
        let err = InitFileManager::from_text("(define (problem p) (:init (at a)").unwrap_err();
        assert!(matches!(err, ProblemError::Unbalanced { .. }));
    }

    #[test]
    fn test_stray_symbol_in_init() {
        let err = InitFileManager::from_text("(define (problem p) (:init at a))").unwrap_err();
        assert!(matches!(err, ProblemError::InvalidFact(_)));
    }

    #[test]
    fn test_merge_adds_and_removes() {
        let mut mgr = InitFileManager::from_text(PROBLEM).unwrap();
        mgr.merge_delta(&delta(&["(not (at obj1 room1))", "(at obj1 room2)", "(at robot room1)"]));
        assert_eq!(facts_of(&mgr), vec!["(at robot room1)", "(clear obj1)", "(at obj1 room2)"]);
    }

    #[test]
    fn test_merge_last_write_wins() {
        let mut mgr = InitFileManager::from_text(PROBLEM).unwrap();
        mgr.merge_delta(&delta(&["(not (clear obj1))"]));
        mgr.merge_delta(&delta(&["(clear obj1)"]));
        assert!(mgr.facts().contains(&prop("(clear obj1)")));

        mgr.merge_delta(&delta(&["(holding obj1)", "(not (holding obj1))"]));
        assert!(!mgr.facts().contains(&prop("(holding obj1)")));
    }

    #[test]
    fn test_purge_by_predicate() {
        let mut mgr = InitFileManager::from_text(PROBLEM).unwrap();
        assert_eq!(mgr.purge_facts_with_symbol("AT"), 2);
        assert_eq!(facts_of(&mgr), vec!["(clear obj1)"]);
        assert_eq!(mgr.purge_facts_with_symbol("at"), 0);
    }

    #[test]
    fn test_checkpoint_and_rollback() {
        let mut mgr = InitFileManager::from_text(PROBLEM).unwrap();
        mgr.merge_delta(&delta(&["(p1)"]));
        assert_eq!(mgr.checkpoint(), 1);
        mgr.merge_delta(&delta(&["(p2)"]));
        assert_eq!(mgr.checkpoint(), 2);
        mgr.merge_delta(&delta(&["(p3)"]));

        mgr.rollback_to(1).unwrap();
        assert!(mgr.facts().contains(&prop("(p1)")));
        assert!(!mgr.facts().contains(&prop("(p2)")));
        assert_eq!(mgr.checkpoint_count(), 2);

        mgr.rollback_to(0).unwrap();
        assert_eq!(mgr.facts().len(), 3);
        assert_eq!(mgr.checkpoint_count(), 1);
    }

    #[test]
    fn test_rollback_to_unknown_checkpoint() {
        let mut mgr = InitFileManager::from_text(PROBLEM).unwrap();
        let err = mgr.rollback_to(3).unwrap_err();
        assert!(matches!(
            err,
            ProblemError::CheckpointOutOfRange {
                requested: 3,
                available: 1
            }
        ));
    }

    #[test]
    fn test_to_pddl_keeps_surrounding_text() {
        let mgr = InitFileManager::from_text(PROBLEM).unwrap();
        let out = mgr.to_pddl();
        assert!(out.starts_with("(define (problem move-obj)\n  (:domain robotics)\n"));
        assert!(out.contains("(:init\n    (at robot room1)\n    (at obj1 room1)\n    (clear obj1)\n  )"));
        assert!(out.ends_with("\n  (:goal (at obj1 room2)))\n"));
    }

    #[test]
    fn test_serialize_round_trip_is_byte_identical() {
        let temp = TempDir::new().unwrap();
        let first = temp.path().join("first.pddl");
        let second = temp.path().join("second.pddl");

        let mut mgr = InitFileManager::from_text(PROBLEM).unwrap();
        mgr.merge_delta(&delta(&["(holding obj1)", "(not (clear obj1))"]));
        mgr.serialize(&first).unwrap();

        let reloaded = InitFileManager::load(&first).unwrap();
        reloaded.serialize(&second).unwrap();

        assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
        assert_eq!(reloaded.facts(), mgr.facts());
    }

    #[test]
    fn test_load_missing_file_is_fatal() {
        let err = InitFileManager::load("/nonexistent/prob.pddl").unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_write_init_state() {
        let mgr = InitFileManager::from_text("(define (problem p) (:init (a)))").unwrap();
        let mut buf = Vec::new();
        mgr.write_init_state(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "(:init\n    (a)\n  )\n");
    }
}
