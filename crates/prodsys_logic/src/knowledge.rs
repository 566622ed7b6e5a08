//! The knowledge base: fact registry plus ordered rule list.
//!
//! Both solvers read the knowledge base and never mutate it. Rule order is
//! load order and decides which rule wins when several are usable at once.

use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fact::Fact;
use crate::rule::{Rule, RuleId};

/// Owns every registered [`Fact`] and [`Rule`].
///
/// Deserialization rebuilds the knowledge base through [`insert_fact`] and
/// [`add_rule`], so rule ids in the input are ignored and reassigned in load
/// order.
///
/// [`insert_fact`]: KnowledgeBase::insert_fact
/// [`add_rule`]: KnowledgeBase::add_rule
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "KnowledgeBaseData")]
pub struct KnowledgeBase {
    facts: IndexMap<String, Fact>,
    rules: Vec<Rule>,
}

/// Serialized shape of a [`KnowledgeBase`], before validation.
#[derive(Deserialize)]
struct KnowledgeBaseData {
    #[serde(default)]
    facts: IndexMap<String, Fact>,
    #[serde(default)]
    rules: Vec<RuleSides>,
}

#[derive(Deserialize)]
struct RuleSides {
    from: Vec<String>,
    to: Vec<String>,
}

impl TryFrom<KnowledgeBaseData> for KnowledgeBase {
    type Error = Error;

    fn try_from(data: KnowledgeBaseData) -> Result<Self> {
        let mut kb = KnowledgeBase::new();
        for fact in data.facts.into_values() {
            kb.insert_fact(fact)?;
        }
        for rule in data.rules {
            kb.add_rule(rule.from, rule.to)?;
        }
        Ok(kb)
    }
}

impl KnowledgeBase {
    /// Creates an empty knowledge base.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a fact.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateFact`] if `name` is already registered.
    pub fn add_fact(&mut self, name: impl Into<String>, description: impl Into<String>) -> Result<()> {
        self.insert_fact(Fact::new(name, description))
    }

    /// Registers a fact given as a [`Fact`] value.
    pub fn insert_fact(&mut self, fact: Fact) -> Result<()> {
        if self.facts.contains_key(&fact.name) {
            return Err(Error::DuplicateFact(fact.name));
        }
        self.facts.insert(fact.name.clone(), fact);
        Ok(())
    }

    /// Appends a rule and returns the id it was assigned.
    ///
    /// Fact names that are not registered are accepted; they simply render as
    /// their own name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRule`] if either side is empty.
    pub fn add_rule<F, T, S1, S2>(&mut self, from: F, to: T) -> Result<RuleId>
    where
        F: IntoIterator<Item = S1>,
        T: IntoIterator<Item = S2>,
        S1: Into<String>,
        S2: Into<String>,
    {
        let id = RuleId(self.rules.len());
        let rule = Rule::new(id, from, to)?;

        for name in rule.from.iter().chain(rule.to.iter()) {
            if !self.facts.contains_key(name) {
                warn!("Rule {} references unregistered fact '{}'", id, name);
            }
        }

        self.rules.push(rule);
        Ok(id)
    }

    /// Returns the fact's description, or the name itself when the fact is
    /// unknown or has no description.
    pub fn describe<'a>(&'a self, name: &'a str) -> &'a str {
        self.facts.get(name).map(Fact::label).unwrap_or(name)
    }

    /// Returns the name of the first fact, in registration order, whose
    /// description is exactly `text`.
    pub fn lookup_by_description(&self, text: &str) -> Option<&str> {
        self.facts
            .values()
            .find(|fact| fact.description.as_deref() == Some(text))
            .map(|fact| fact.name.as_str())
    }

    /// Maps a fact name or description to a fact name.
    ///
    /// A registered name wins over a matching description. Unknown tokens are
    /// returned unchanged.
    pub fn resolve(&self, token: &str) -> String {
        if self.facts.contains_key(token) {
            return token.to_string();
        }
        self.lookup_by_description(token)
            .unwrap_or(token)
            .to_string()
    }

    /// Looks up a fact by name.
    pub fn fact(&self, name: &str) -> Option<&Fact> {
        self.facts.get(name)
    }

    /// Returns `true` if a fact named `name` is registered.
    pub fn contains_fact(&self, name: &str) -> bool {
        self.facts.contains_key(name)
    }

    /// All facts in registration order.
    pub fn facts(&self) -> impl Iterator<Item = &Fact> {
        self.facts.values()
    }

    /// All rules in load order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Looks up a rule by id.
    pub fn rule(&self, id: RuleId) -> Option<&Rule> {
        self.rules.get(id.0)
    }

    /// Rules whose consequences contain `fact`, in load order.
    pub fn producers_of<'a>(&'a self, fact: &'a str) -> impl Iterator<Item = &'a Rule> + 'a {
        self.rules.iter().filter(move |rule| rule.produces(fact))
    }

    /// Number of registered facts.
    pub fn fact_count(&self) -> usize {
        self.facts.len()
    }

    /// Number of rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Serializes the knowledge base into a JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Error::from)
    }

    /// Deserializes a knowledge base from a JSON string.
    ///
    /// # Errors
    ///
    /// Besides malformed JSON, returns [`Error::DuplicateFact`] or
    /// [`Error::InvalidRule`] exactly as building the knowledge base by hand
    /// would.
    pub fn from_json(json: &str) -> Result<Self> {
        let data: KnowledgeBaseData = serde_json::from_str(json)?;
        KnowledgeBase::try_from(data)
    }
}
