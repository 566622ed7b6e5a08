//! The solver capability and its result type.
//!
//! Forward and backward chaining are two implementations of [`Solver`]. The
//! knowledge base is passed to every call as a read-only argument; solvers
//! keep all working state local to the call.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fact::{is_subset, FactSet};
use crate::knowledge::KnowledgeBase;
use crate::rule::{Rule, RuleId};

/// Derives a target fact set from a current fact set.
pub trait Solver {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Tries to derive `target` from `current` using the rules of `kb`.
    ///
    /// An underivable target is reported through [`SolveResult::success`],
    /// not as an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StepLimitExceeded`] only when a step limit is configured
    /// and reached.
    fn solve(&self, kb: &KnowledgeBase, current: &FactSet, target: &FactSet)
        -> Result<SolveResult>;
}

/// Per-call counters collected by a solver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveStats {
    /// Loop iterations executed.
    pub iterations: usize,
    /// Rules fired against the working fact set.
    pub rules_applied: usize,
    /// Rules whose missing preconditions were pushed as new goals.
    pub back_propagations: usize,
    /// Facts popped from the goal frontier.
    pub frontier_pops: usize,
}

/// The outcome of a solve call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveResult {
    /// Whether the target was derived.
    pub success: bool,
    /// Rules in execution order. Always empty when `success` is `false`.
    pub rules: Vec<Rule>,
    /// Counters for this call.
    pub stats: SolveStats,
}

impl SolveResult {
    /// A successful result with the given plan.
    pub fn success(rules: Vec<Rule>, stats: SolveStats) -> Self {
        Self {
            success: true,
            rules,
            stats,
        }
    }

    /// A failed result; the plan is empty.
    pub fn failure(stats: SolveStats) -> Self {
        Self {
            success: false,
            rules: Vec::new(),
            stats,
        }
    }

    /// Ids of the plan's rules, in execution order.
    pub fn rule_ids(&self) -> Vec<RuleId> {
        self.rules.iter().map(|rule| rule.id).collect()
    }

    /// Re-applies the plan to `current` and returns the resulting fact set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPlan`] if some rule's preconditions are not
    /// known at its position.
    pub fn replay(&self, current: &FactSet) -> Result<FactSet> {
        replay_plan(current, &self.rules)
    }

    /// Returns `true` if the result is successful and replaying its plan from
    /// `current` derives `target`.
    pub fn verify(&self, current: &FactSet, target: &FactSet) -> bool {
        self.success
            && self
                .replay(current)
                .map(|facts| is_subset(target, &facts))
                .unwrap_or(false)
    }

    /// Serializes the result into a JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Error::from)
    }
}

/// Applies `rules` in order starting from `current`.
///
/// # Errors
///
/// Returns [`Error::InvalidPlan`] at the first rule whose preconditions are
/// not yet known.
pub fn replay_plan(current: &FactSet, rules: &[Rule]) -> Result<FactSet> {
    let mut facts = current.clone();
    for (position, rule) in rules.iter().enumerate() {
        if !rule.is_applicable(&facts) {
            let missing: Vec<_> = rule.missing_preconditions(&facts).cloned().collect();
            return Err(Error::InvalidPlan(format!(
                "step {} ({}) is missing {:?}",
                position, rule.id, missing
            )));
        }
        facts.extend(rule.to.iter().cloned());
    }
    Ok(facts)
}

/// Counts loop iterations against an optional limit.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StepBudget {
    limit: Option<usize>,
    used: usize,
}

impl StepBudget {
    pub(crate) fn new(limit: Option<usize>) -> Self {
        Self { limit, used: 0 }
    }

    pub(crate) fn tick(&mut self) -> Result<()> {
        self.used += 1;
        match self.limit {
            Some(limit) if self.used > limit => Err(Error::StepLimitExceeded { limit }),
            _ => Ok(()),
        }
    }

    pub(crate) fn used(&self) -> usize {
        self.used
    }
}
