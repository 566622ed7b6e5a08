//! Prodsys Logic - Production-Rule Inference Engine
//!
//! Given a knowledge base of named facts and production rules (each rule
//! turning a set of precondition facts into a set of consequence facts), this
//! crate decides whether a target fact set is derivable from an initial one
//! and, if so, returns the ordered list of rules that derives it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Production System                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │                 Knowledge Base                        │   │
//! │  │  Fact Registry │ Ordered Rules │ Text Loader         │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │                           │ (read-only)                      │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │                     Solvers                           │   │
//! │  │  Forward Chaining │ Backward Chaining │ AND/OR Tree  │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │                           │                                  │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │                   SolveResult                         │   │
//! │  │  success │ ordered plan │ replay │ text/JSON render  │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │                                                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use prodsys_logic::{fact_set, BackwardSolver, KnowledgeBase, RuleId, Solver};
//!
//! let mut kb = KnowledgeBase::new();
//! kb.add_fact("A", "Fact A")?;
//! kb.add_fact("B", "Fact B")?;
//! kb.add_rule(["A", "B"], ["C"])?;
//! kb.add_rule(["C"], ["D"])?;
//!
//! let result = BackwardSolver::new().solve(&kb, &fact_set(["A", "B"]), &fact_set(["D"]))?;
//! assert!(result.success);
//! assert_eq!(result.rule_ids(), vec![RuleId(0), RuleId(1)]);
//! # Ok::<(), prodsys_logic::Error>(())
//! ```

pub mod backward;
pub mod config;
pub mod error;
pub mod fact;
pub mod forward;
pub mod knowledge;
pub mod loader;
pub mod render;
pub mod rule;
pub mod solver;
pub mod tree;

// Re-exports
pub use backward::BackwardSolver;
pub use config::{SolverConfig, Strategy};
pub use error::{Error, Result};
pub use fact::{fact_set, Fact, FactSet};
pub use forward::ForwardSolver;
pub use knowledge::KnowledgeBase;
pub use rule::{Rule, RuleId};
pub use solver::{replay_plan, SolveResult, SolveStats, Solver};
pub use tree::{derivable_facts, is_reachable, ProofTree, TreeNode};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
