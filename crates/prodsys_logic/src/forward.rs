//! Forward chaining.
//!
//! Data-driven saturation: fire the first rule (in load order) whose
//! preconditions are known and which would add a new fact, then rescan.
//! The solver stops as soon as the target is covered (early exit) or when no
//! such rule remains.

use log::{debug, trace};

use crate::error::Result;
use crate::fact::{is_subset, FactSet};
use crate::knowledge::KnowledgeBase;
use crate::rule::Rule;
use crate::solver::{SolveResult, SolveStats, Solver, StepBudget};

/// Rules that can fire against `current` and would add at least one fact,
/// in load order.
pub fn applicable_rules<'a>(kb: &'a KnowledgeBase, current: &FactSet) -> Vec<&'a Rule> {
    kb.rules()
        .iter()
        .filter(|rule| rule.is_applicable(current) && rule.adds_to(current))
        .collect()
}

/// Data-driven solver with early exit on the target.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardSolver {
    max_steps: Option<usize>,
}

impl ForwardSolver {
    /// Creates an unbounded forward solver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounds the number of rule scans per call.
    pub fn with_max_steps(mut self, max_steps: Option<usize>) -> Self {
        self.max_steps = max_steps;
        self
    }
}

impl Solver for ForwardSolver {
    fn name(&self) -> &'static str {
        "forward"
    }

    fn solve(
        &self,
        kb: &KnowledgeBase,
        current: &FactSet,
        target: &FactSet,
    ) -> Result<SolveResult> {
        let mut current = current.clone();
        let mut stats = SolveStats::default();
        let mut budget = StepBudget::new(self.max_steps);
        let mut applied: Vec<Rule> = Vec::new();

        debug!(
            "Forward solve: {} known, {} wanted, {} rules",
            current.len(),
            target.len(),
            kb.rule_count()
        );

        if is_subset(target, &current) {
            debug!("Forward solve: target already known");
            return Ok(SolveResult::success(applied, stats));
        }

        loop {
            budget.tick()?;
            stats.iterations += 1;

            // Each application can both unlock and exhaust rules, so rescan.
            let Some(rule) = applicable_rules(kb, &current).into_iter().next() else {
                break;
            };

            trace!("Forward apply {}: {}", rule.id, rule);
            current.extend(rule.to.iter().cloned());
            applied.push(rule.clone());
            stats.rules_applied += 1;

            if is_subset(target, &current) {
                debug!(
                    "Forward solve succeeded after {} rule(s)",
                    applied.len()
                );
                return Ok(SolveResult::success(applied, stats));
            }
        }

        debug!(
            "Forward solve reached a fixed point with {} fact(s); target not derived",
            current.len()
        );
        Ok(SolveResult::failure(stats))
    }
}
