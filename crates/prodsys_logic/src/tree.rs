//! AND/OR reachability trees.
//!
//! A yes/no check, separate from plan synthesis: the tree is built against a
//! fixed snapshot of known facts and never grows it, so it cannot produce an
//! execution order. Use [`BackwardSolver`](crate::BackwardSolver) when a plan
//! is needed.
//!
//! ```text
//!            OR(D)
//!              │
//!        AND(R1: C => D)
//!              │
//!            OR(C)
//!              │
//!      AND(R0: A, B => C)
//!          ┌───┴───┐
//!      Known(A) Known(B)
//! ```

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::fact::{is_subset, FactSet};
use crate::knowledge::KnowledgeBase;
use crate::rule::RuleId;

/// A node of an AND/OR tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreeNode {
    /// The fact is in the known snapshot.
    Known(String),
    /// The fact holds if any alternative holds; one `And` child per producing rule.
    Or {
        fact: String,
        alternatives: Vec<TreeNode>,
    },
    /// The rule fires if every precondition subtree holds.
    And { rule: RuleId, children: Vec<TreeNode> },
    /// No rule produces the fact.
    Unreachable(String),
    /// The fact is already being proven higher up this branch.
    Cycle(String),
}

impl TreeNode {
    /// Boolean evaluation: `And` needs all children, `Or` needs any.
    pub fn evaluate(&self) -> bool {
        match self {
            TreeNode::Known(_) => true,
            TreeNode::Or { alternatives, .. } => alternatives.iter().any(TreeNode::evaluate),
            TreeNode::And { children, .. } => children.iter().all(TreeNode::evaluate),
            TreeNode::Unreachable(_) | TreeNode::Cycle(_) => false,
        }
    }

    fn depth(&self) -> usize {
        match self {
            TreeNode::Or { alternatives, .. } => {
                1 + alternatives.iter().map(TreeNode::depth).max().unwrap_or(0)
            }
            TreeNode::And { children, .. } => {
                1 + children.iter().map(TreeNode::depth).max().unwrap_or(0)
            }
            _ => 1,
        }
    }

    fn count(&self) -> usize {
        match self {
            TreeNode::Or { alternatives, .. } => {
                1 + alternatives.iter().map(TreeNode::count).sum::<usize>()
            }
            TreeNode::And { children, .. } => 1 + children.iter().map(TreeNode::count).sum::<usize>(),
            _ => 1,
        }
    }

    fn collect_rules(&self, out: &mut IndexSet<RuleId>) {
        match self {
            TreeNode::Or { alternatives, .. } => {
                alternatives.iter().for_each(|node| node.collect_rules(out))
            }
            TreeNode::And { rule, children } => {
                out.insert(*rule);
                children.iter().for_each(|node| node.collect_rules(out));
            }
            _ => {}
        }
    }
}

/// An AND/OR tree rooted at a single fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofTree {
    /// The root node, always describing the requested fact.
    pub root: TreeNode,
}

impl ProofTree {
    /// Builds the tree for `fact` against the `known` snapshot.
    ///
    /// Every producing rule of every fact is expanded, so the tree can grow
    /// exponentially with the rule count; branches stop at known facts, facts
    /// nothing produces, and facts already open on the same branch. Use
    /// [`ProofTree::build_bounded`] on untrusted input.
    pub fn build(kb: &KnowledgeBase, known: &FactSet, fact: &str) -> Self {
        Self::build_bounded(kb, known, fact, usize::MAX).unwrap_or_else(|| Self {
            // An unbounded build never runs out of nodes.
            root: TreeNode::Unreachable(fact.to_string()),
        })
    }

    /// Like [`ProofTree::build`], but gives up with `None` once the tree
    /// would exceed `max_nodes` nodes.
    pub fn build_bounded(
        kb: &KnowledgeBase,
        known: &FactSet,
        fact: &str,
        max_nodes: usize,
    ) -> Option<Self> {
        let mut builder = Builder {
            kb,
            known,
            path: IndexSet::new(),
            remaining: max_nodes,
        };
        builder.node(fact).map(|root| Self { root })
    }

    /// Returns `true` if the root fact is reachable.
    pub fn evaluate(&self) -> bool {
        self.root.evaluate()
    }

    /// Number of levels in the tree.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        self.root.count()
    }

    /// Ids of every rule mentioned in the tree, in first-visit order.
    pub fn rules_used(&self) -> Vec<RuleId> {
        let mut rules = IndexSet::new();
        self.root.collect_rules(&mut rules);
        rules.into_iter().collect()
    }
}

struct Builder<'a> {
    kb: &'a KnowledgeBase,
    known: &'a FactSet,
    /// Facts open on the current branch.
    path: IndexSet<String>,
    remaining: usize,
}

impl Builder<'_> {
    fn take(&mut self) -> Option<()> {
        self.remaining = self.remaining.checked_sub(1)?;
        Some(())
    }

    fn node(&mut self, fact: &str) -> Option<TreeNode> {
        self.take()?;
        if self.known.contains(fact) {
            return Some(TreeNode::Known(fact.to_string()));
        }
        if self.path.contains(fact) {
            return Some(TreeNode::Cycle(fact.to_string()));
        }

        self.path.insert(fact.to_string());
        let alternatives = self.alternatives(fact);
        self.path.pop();
        let alternatives = alternatives?;

        if alternatives.is_empty() {
            return Some(TreeNode::Unreachable(fact.to_string()));
        }
        Some(TreeNode::Or {
            fact: fact.to_string(),
            alternatives,
        })
    }

    fn alternatives(&mut self, fact: &str) -> Option<Vec<TreeNode>> {
        let kb = self.kb;
        let mut alternatives = Vec::new();
        for rule in kb.producers_of(fact) {
            self.take()?;
            let mut children = Vec::with_capacity(rule.from.len());
            for pre in &rule.from {
                children.push(self.node(pre)?);
            }
            alternatives.push(TreeNode::And {
                rule: rule.id,
                children,
            });
        }
        Some(alternatives)
    }
}

/// Every fact derivable from `known`, `known` included.
///
/// Saturates the rule set without building any tree, so the cost is
/// polynomial in the number of rules and facts.
pub fn derivable_facts(kb: &KnowledgeBase, known: &FactSet) -> FactSet {
    let mut facts = known.clone();
    loop {
        let before = facts.len();
        for rule in kb.rules() {
            if rule.is_applicable(&facts) {
                facts.extend(rule.to.iter().cloned());
            }
        }
        if facts.len() == before {
            return facts;
        }
    }
}

/// Returns `true` if every fact of `target` is reachable from `known`.
///
/// Agrees with [`ProofTree::evaluate`] on each target fact.
pub fn is_reachable(kb: &KnowledgeBase, known: &FactSet, target: &FactSet) -> bool {
    is_subset(target, &derivable_facts(kb, known))
}
