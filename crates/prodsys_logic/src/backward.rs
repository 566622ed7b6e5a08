//! Backward chaining.
//!
//! Goal-directed search over a frontier (stack) of wanted facts. For the fact
//! on top of the frontier the solver either fires a producing rule whose
//! preconditions are already known, or pushes the missing preconditions of
//! every producing rule it has not expanded yet. Once the target is covered,
//! the plan is rebuilt by walking from the target facts through the rule that
//! produced each fact.
//!
//! There is no backtracking: the first usable rule in load order is
//! committed to.

use std::collections::{HashMap, HashSet};

use log::{debug, trace};

use crate::error::Result;
use crate::fact::{is_subset, FactSet};
use crate::knowledge::KnowledgeBase;
use crate::rule::{Rule, RuleId};
use crate::solver::{SolveResult, SolveStats, Solver, StepBudget};

/// Goal-directed solver producing a minimal, ordered plan.
#[derive(Debug, Clone, Copy, Default)]
pub struct BackwardSolver {
    max_steps: Option<usize>,
}

impl BackwardSolver {
    /// Creates an unbounded backward solver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounds the number of frontier iterations per call.
    pub fn with_max_steps(mut self, max_steps: Option<usize>) -> Self {
        self.max_steps = max_steps;
        self
    }
}

/// Working state of one backward search.
struct Search<'kb> {
    kb: &'kb KnowledgeBase,
    current: FactSet,
    frontier: Vec<String>,
    /// Rule that added each derived fact. Facts known up front have no entry.
    producer: HashMap<String, &'kb Rule>,
    applied: HashSet<RuleId>,
    back_propagated: HashSet<RuleId>,
    stats: SolveStats,
}

impl<'kb> Search<'kb> {
    fn new(kb: &'kb KnowledgeBase, current: &FactSet, target: &FactSet) -> Self {
        Self {
            kb,
            current: current.clone(),
            // The last target fact ends up on top of the stack.
            frontier: target.iter().cloned().collect(),
            producer: HashMap::new(),
            applied: HashSet::new(),
            back_propagated: HashSet::new(),
            stats: SolveStats::default(),
        }
    }

    fn pop(&mut self) {
        if let Some(fact) = self.frontier.pop() {
            trace!("Backward pop '{}'", fact);
            self.stats.frontier_pops += 1;
        }
    }

    fn apply(&mut self, rule: &'kb Rule) {
        trace!("Backward apply {}: {}", rule.id, rule);
        for fact in &rule.to {
            // Only a rule that adds the fact becomes its producer. Overwriting
            // on re-derivation can make a known fact depend on its own
            // consequences and send reconstruction around a cycle.
            if self.current.insert(fact.clone()) {
                self.producer.insert(fact.clone(), rule);
            }
        }
        self.applied.insert(rule.id);
        self.stats.rules_applied += 1;
    }

    fn back_propagate(&mut self, rules: Vec<&'kb Rule>) {
        for rule in rules {
            self.back_propagated.insert(rule.id);
            self.stats.back_propagations += 1;

            let missing: Vec<String> = rule
                .missing_preconditions(&self.current)
                .cloned()
                .collect();
            trace!("Backward expand {}: wants {:?}", rule.id, missing);
            self.frontier.extend(missing);
        }
    }

    /// Runs the frontier loop until it empties or the target is covered.
    fn run(&mut self, target: &FactSet, budget: &mut StepBudget) -> Result<()> {
        while let Some(next) = self.frontier.last().cloned() {
            if is_subset(target, &self.current) {
                break;
            }
            budget.tick()?;
            self.stats.iterations += 1;

            if self.current.contains(&next) {
                self.pop();
                continue;
            }

            let useful: Vec<&'kb Rule> = self
                .kb
                .rules()
                .iter()
                .filter(|rule| rule.produces(&next))
                .collect();
            if useful.is_empty() {
                trace!("Backward: nothing produces '{}'", next);
                self.pop();
                continue;
            }

            // Leave `next` on the frontier; it pops cleanly on the next pass.
            if let Some(rule) = useful.iter().copied().find(|r| r.is_applicable(&self.current)) {
                self.apply(rule);
                continue;
            }

            let fresh: Vec<&'kb Rule> = useful
                .into_iter()
                .filter(|rule| !self.back_propagated.contains(&rule.id))
                .collect();
            if fresh.is_empty() {
                trace!("Backward: dead end for '{}'", next);
                self.pop();
                continue;
            }

            self.back_propagate(fresh);
        }
        Ok(())
    }

    /// Walks from the target facts through their producers and returns the
    /// rules in execution order, each rule at most once.
    fn reconstruct(&self, target: &FactSet) -> Vec<Rule> {
        // Consequence-to-cause order, possibly with repeats.
        let mut raw: Vec<&Rule> = Vec::new();
        let mut stack: Vec<&str> = target.iter().map(String::as_str).collect();

        while let Some(fact) = stack.pop() {
            let Some(&rule) = self.producer.get(fact) else {
                continue;
            };
            raw.push(rule);
            stack.extend(rule.from.iter().map(String::as_str));
        }

        // Keeping each rule's last mention and reading backwards yields
        // execution order.
        let mut seen = HashSet::new();
        raw.iter()
            .rev()
            .filter(|rule| seen.insert(rule.id))
            .map(|&rule| rule.clone())
            .collect()
    }
}

impl Solver for BackwardSolver {
    fn name(&self) -> &'static str {
        "backward"
    }

    fn solve(
        &self,
        kb: &KnowledgeBase,
        current: &FactSet,
        target: &FactSet,
    ) -> Result<SolveResult> {
        let mut search = Search::new(kb, current, target);
        let mut budget = StepBudget::new(self.max_steps);

        debug!(
            "Backward solve: {} known, {} wanted, {} rules",
            current.len(),
            target.len(),
            kb.rule_count()
        );

        search.run(target, &mut budget)?;

        if !is_subset(target, &search.current) {
            debug!("Backward solve failed after {} step(s)", budget.used());
            return Ok(SolveResult::failure(search.stats));
        }

        let plan = search.reconstruct(target);
        debug!(
            "Backward solve succeeded: {} rule(s) in plan, {} applied during search",
            plan.len(),
            search.applied.len()
        );
        Ok(SolveResult::success(plan, search.stats))
    }
}
