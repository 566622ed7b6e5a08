//! Production rules.
//!
//! A rule consumes a set of precondition facts (`from`) and yields a set of
//! consequence facts (`to`). Rules are immutable once built and are identified
//! by the ordinal they were loaded with, never by their content.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fact::{is_subset, FactSet};
use crate::knowledge::KnowledgeBase;

/// Ordinal identity of a rule, assigned in load order starting at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuleId(pub usize);

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "R{}", self.0)
    }
}

/// A production rule `from => to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RuleData")]
pub struct Rule {
    /// Load-order identity.
    pub id: RuleId,
    /// Preconditions; all must be known for the rule to fire.
    pub from: FactSet,
    /// Consequences added to the known facts when the rule fires.
    pub to: FactSet,
}

#[derive(Deserialize)]
struct RuleData {
    id: RuleId,
    from: Vec<String>,
    to: Vec<String>,
}

impl TryFrom<RuleData> for Rule {
    type Error = Error;

    fn try_from(data: RuleData) -> Result<Self> {
        Rule::new(data.id, data.from, data.to)
    }
}

impl Rule {
    /// Creates a rule, rejecting empty precondition or consequence sets.
    pub fn new<F, T, S1, S2>(id: RuleId, from: F, to: T) -> Result<Self>
    where
        F: IntoIterator<Item = S1>,
        T: IntoIterator<Item = S2>,
        S1: Into<String>,
        S2: Into<String>,
    {
        let from: FactSet = from.into_iter().map(Into::into).collect();
        let to: FactSet = to.into_iter().map(Into::into).collect();

        if from.is_empty() {
            return Err(Error::InvalidRule(format!("{id} has no preconditions")));
        }
        if to.is_empty() {
            return Err(Error::InvalidRule(format!("{id} has no consequences")));
        }

        Ok(Self { id, from, to })
    }

    /// Returns `true` if every precondition is in `current`.
    pub fn is_applicable(&self, current: &FactSet) -> bool {
        is_subset(&self.from, current)
    }

    /// Returns `true` if firing the rule would add at least one fact to `current`.
    pub fn adds_to(&self, current: &FactSet) -> bool {
        !is_subset(&self.to, current)
    }

    /// Returns `true` if `fact` is one of the rule's consequences.
    pub fn produces(&self, fact: &str) -> bool {
        self.to.contains(fact)
    }

    /// Preconditions that are not yet in `current`, in declaration order.
    pub fn missing_preconditions<'a>(
        &'a self,
        current: &'a FactSet,
    ) -> impl Iterator<Item = &'a String> + 'a {
        self.from.iter().filter(move |fact| !current.contains(*fact))
    }

    /// Renders the rule with fact descriptions in place of names.
    pub fn display_with(&self, kb: &KnowledgeBase) -> String {
        format!(
            "{} => {}",
            stringify_set(self.from.iter().map(|name| kb.describe(name))),
            stringify_set(self.to.iter().map(|name| kb.describe(name)))
        )
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} => {}",
            stringify_set(self.from.iter()),
            stringify_set(self.to.iter())
        )
    }
}

/// Renders items as `[a, b, c]`, or `[]` when there are none.
pub fn stringify_set<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined: Vec<String> = items.into_iter().map(|s| s.as_ref().to_string()).collect();
    format!("[{}]", joined.join(", "))
}
