//! Facts and fact sets.
//!
//! A fact is an atomic named proposition. Its name is its identity; the
//! optional description only exists for display.

use std::hash::{Hash, Hasher};

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// A set of fact names.
///
/// Insertion order is preserved so that rules and results render stably.
pub type FactSet = IndexSet<String>;

/// Builds a [`FactSet`] from anything that yields fact names.
pub fn fact_set<I, S>(names: I) -> FactSet
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names.into_iter().map(Into::into).collect()
}

/// Returns `true` if every fact of `subset` is contained in `superset`.
///
/// An empty `subset` is contained in everything.
pub fn is_subset(subset: &FactSet, superset: &FactSet) -> bool {
    subset.iter().all(|fact| superset.contains(fact))
}

/// A named proposition registered in a [`KnowledgeBase`](crate::KnowledgeBase).
///
/// Equality and hashing only consider the name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fact {
    /// Unique identifier of the fact.
    pub name: String,
    /// Human-readable description, if one was given.
    pub description: Option<String>,
}

impl Fact {
    /// Creates a fact with a description.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
        }
    }

    /// Creates a fact that only has a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Returns the description, or the name when there is none.
    pub fn label(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.name)
    }
}

impl PartialEq for Fact {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Fact {}

impl Hash for Fact {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl std::fmt::Display for Fact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_fact_identity_is_name() {
        let a = Fact::new("A", "Fact A");
        let b = Fact::new("A", "something else");
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(!set.insert(b));
    }

    #[test]
    fn test_fact_label() {
        assert_eq!(Fact::new("A", "Fact A").label(), "Fact A");
        assert_eq!(Fact::named("B").label(), "B");
    }

    #[test]
    fn test_is_subset() {
        let known = fact_set(["A", "B", "C"]);
        assert!(is_subset(&fact_set(["A", "C"]), &known));
        assert!(!is_subset(&fact_set(["A", "D"]), &known));
        assert!(is_subset(&FactSet::new(), &known));
        assert!(is_subset(&FactSet::new(), &FactSet::new()));
    }

    #[test]
    fn test_fact_set_dedups_and_keeps_order() {
        let set = fact_set(["B", "A", "B"]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["B", "A"]);
    }
}
