//! Plain-text rendering of solve results.

use std::fmt::Write;

use crate::knowledge::KnowledgeBase;
use crate::solver::SolveResult;
use crate::tree::{ProofTree, TreeNode};

/// Renders a result as a report, resolving fact names to descriptions.
///
/// ```text
/// > Success: true
/// > Productions:
///     [Fact A, Fact B] => [Fact C]
///     [Fact C] => [Fact D]
/// ```
pub fn render_result(kb: &KnowledgeBase, result: &SolveResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "> Success: {}", result.success);
    if result.success {
        let _ = writeln!(out, "> Productions:");
        for rule in &result.rules {
            let _ = writeln!(out, "\t{}", rule.display_with(kb));
        }
    }
    out
}

/// Renders an AND/OR tree as an indented outline.
pub fn render_tree(kb: &KnowledgeBase, tree: &ProofTree) -> String {
    let mut out = String::new();
    let verdicts = Verdict::of(&tree.root);
    render_node(kb, &tree.root, &verdicts, 0, &mut out);
    out
}

/// Truth value of every node, computed once bottom-up and shaped like the tree.
struct Verdict {
    holds: bool,
    children: Vec<Verdict>,
}

impl Verdict {
    fn of(node: &TreeNode) -> Self {
        match node {
            TreeNode::Known(_) => Self::leaf(true),
            TreeNode::Unreachable(_) | TreeNode::Cycle(_) => Self::leaf(false),
            TreeNode::Or { alternatives, .. } => {
                let children: Vec<Verdict> = alternatives.iter().map(Verdict::of).collect();
                let holds = children.iter().any(|child| child.holds);
                Self { holds, children }
            }
            TreeNode::And { children, .. } => {
                let children: Vec<Verdict> = children.iter().map(Verdict::of).collect();
                let holds = children.iter().all(|child| child.holds);
                Self { holds, children }
            }
        }
    }

    fn leaf(holds: bool) -> Self {
        Self {
            holds,
            children: Vec::new(),
        }
    }
}

fn render_node(
    kb: &KnowledgeBase,
    node: &TreeNode,
    verdict: &Verdict,
    indent: usize,
    out: &mut String,
) {
    let pad = "  ".repeat(indent);
    let mark = if verdict.holds { "yes" } else { "no" };
    match node {
        TreeNode::Known(fact) => {
            let _ = writeln!(out, "{pad}{} (known)", kb.describe(fact));
        }
        TreeNode::Unreachable(fact) => {
            let _ = writeln!(out, "{pad}{} (no rule)", kb.describe(fact));
        }
        TreeNode::Cycle(fact) => {
            let _ = writeln!(out, "{pad}{} (cycle)", kb.describe(fact));
        }
        TreeNode::Or { fact, alternatives } => {
            let _ = writeln!(out, "{pad}OR {} [{mark}]", kb.describe(fact));
            for (child, verdict) in alternatives.iter().zip(&verdict.children) {
                render_node(kb, child, verdict, indent + 1, out);
            }
        }
        TreeNode::And { rule, children } => {
            let label = kb
                .rule(*rule)
                .map(|r| r.display_with(kb))
                .unwrap_or_else(|| rule.to_string());
            let _ = writeln!(out, "{pad}AND {rule}: {label} [{mark}]");
            for (child, verdict) in children.iter().zip(&verdict.children) {
                render_node(kb, child, verdict, indent + 1, out);
            }
        }
    }
}
