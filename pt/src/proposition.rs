//! Proposition - one ground fact in canonical form

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use crate::error::MalformedProposition;

/// A raw trace line must already be parenthesized to count as a fact
static PROPOSITION_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\(.*\)$").expect("valid regex"));

const NEGATION: &str = "not";

/// A single ground fact, e.g. `(on b c)` or `(not (on b c))`
///
/// Two propositions are equal iff their canonical strings are equal. The
/// canonical form is lower-case, uses single spaces between symbols and has
/// no space just inside a parenthesis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Proposition(String);

impl Proposition {
    /// Normalize one line of a planner state dump
    ///
    /// All parentheses are flattened away and the symbols re-wrapped in a
    /// single pair, so `((AT  A))` becomes `(at a)`. A leading `not` wraps the
    /// rest as its atom. Blank lines and lines holding nothing but parentheses
    /// yield `Ok(None)`.
    pub fn normalize(line: &str) -> Result<Option<Self>, MalformedProposition> {
        let trimmed = line.trim();
        let flattened = trimmed.replace(['(', ')'], " ").to_lowercase();
        let symbols: Vec<&str> = flattened.split_whitespace().collect();
        if symbols.is_empty() {
            return Ok(None);
        }
        if !PROPOSITION_LINE.is_match(trimmed) {
            return Err(MalformedProposition::new(trimmed));
        }
        match symbols.as_slice() {
            [NEGATION, atom @ ..] => match atom.first() {
                Some(&head) if head != NEGATION => Ok(Some(Self(format!("({} ({}))", NEGATION, atom.join(" "))))),
                _ => Err(MalformedProposition::new(trimmed)),
            },
            _ => Ok(Some(Self(format!("({})", symbols.join(" "))))),
        }
    }

    /// Parse a caller-supplied literal, keeping any nesting
    ///
    /// Accepts positive facts as well as negated ones like `(not (p a))`.
    /// The text must be exactly one balanced, non-empty parenthesized group,
    /// and a `not` group must hold exactly one positive atom.
    pub fn literal(text: &str) -> Result<Self, MalformedProposition> {
        canonical_literal(text)
            .map(Self)
            .ok_or_else(|| MalformedProposition::new(text.trim()))
    }

    /// The canonical text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First symbol inside the outer parenthesis (`not` for negated literals)
    pub fn head_symbol(&self) -> &str {
        head_of(&self.0)
    }

    /// True for literals of the form `(not (...))`
    pub fn is_negated(&self) -> bool {
        self.head_symbol() == NEGATION
    }

    /// Predicate symbol of the underlying atom, looking through negation
    pub fn predicate(&self) -> &str {
        head_of(self.atom())
    }

    /// The underlying atom, without negation
    pub fn positive(&self) -> Proposition {
        Self(self.atom().to_string())
    }

    /// Flip the polarity of this literal
    pub fn negate(&self) -> Proposition {
        if self.is_negated() {
            self.positive()
        } else {
            Self(format!("({} {})", NEGATION, self.0))
        }
    }

    fn atom(&self) -> &str {
        if self.is_negated() {
            negated_atom(&self.0)
        } else {
            &self.0
        }
    }
}

fn head_of(text: &str) -> &str {
    let inner = text.strip_prefix('(').unwrap_or(text);
    let end = inner
        .find(|c: char| c.is_whitespace() || c == '(' || c == ')')
        .unwrap_or(inner.len());
    &inner[..end]
}

/// Canonicalize a nested literal, or `None` if it is not one balanced group
fn canonical_literal(text: &str) -> Option<String> {
    let lowered = text.trim().to_lowercase();
    if !lowered.starts_with('(') {
        return None;
    }

    let mut out = String::with_capacity(lowered.len());
    let mut depth = 0usize;
    let mut closed = false;
    let mut pending_space = false;

    for c in lowered.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if closed {
            return None;
        }
        match c {
            '(' => {
                if !out.is_empty() && !out.ends_with('(') {
                    out.push(' ');
                }
                out.push('(');
                depth += 1;
            }
            ')' => {
                if out.ends_with('(') {
                    return None;
                }
                out.push(')');
                depth -= 1;
                closed = depth == 0;
            }
            _ => {
                if out.ends_with(')') || (pending_space && !out.ends_with('(')) {
                    out.push(' ');
                }
                out.push(c);
            }
        }
        pending_space = false;
    }

    // The head of the outer group must be a symbol, not another group
    let head_ok = out.chars().nth(1).is_some_and(|c| c != '(');
    if !(closed && head_ok) {
        return None;
    }
    if head_of(&out) == NEGATION && !is_single_atom(negated_atom(&out)) {
        return None;
    }
    Some(out)
}

/// Text between `(not ` and the final `)` of a canonical negation
fn negated_atom(canonical: &str) -> &str {
    canonical
        .strip_prefix("(not ")
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or_default()
}

/// One canonical, non-negated group, e.g. `(at a)`
fn is_single_atom(text: &str) -> bool {
    text.starts_with('(') && head_of(text) != NEGATION && canonical_literal(text).as_deref() == Some(text)
}

impl fmt::Display for Proposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Proposition {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Proposition {
    type Error = MalformedProposition;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::literal(&value)
    }
}

impl From<Proposition> for String {
    fn from(value: Proposition) -> Self {
        value.0
    }
}
