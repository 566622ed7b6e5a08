//! Integration tests for the forward and backward solvers
//!
//! Runs both strategies over the same knowledge bases and checks the
//! documented scenarios plus plan validity, de-duplication and termination.

use prodsys_logic::loader::load_str;
use prodsys_logic::{
    fact_set, is_reachable, BackwardSolver, FactSet, ForwardSolver, KnowledgeBase, ProofTree,
    RuleId, SolveResult, Solver, SolverConfig, Strategy,
};
use std::collections::HashSet;

fn solvers() -> Vec<Box<dyn Solver>> {
    vec![
        SolverConfig::new(Strategy::Forward).build(),
        SolverConfig::new(Strategy::Backward).build(),
    ]
}

fn chain_kb() -> KnowledgeBase {
    let mut kb = KnowledgeBase::new();
    kb.add_fact("A", "Fact A").unwrap();
    kb.add_fact("B", "Fact B").unwrap();
    kb.add_fact("C", "Fact C").unwrap();
    kb.add_fact("D", "Fact D").unwrap();
    kb.add_rule(["A", "B"], ["C"]).unwrap();
    kb.add_rule(["C"], ["D"]).unwrap();
    kb
}

/// Tiny deterministic generator so the sweep below is reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: usize) -> usize {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.0 >> 33) as usize) % bound
    }
}

fn random_kb(seed: u64, facts: usize, rules: usize) -> KnowledgeBase {
    let mut rng = Lcg(seed);
    let mut kb = KnowledgeBase::new();
    for i in 0..facts {
        kb.add_fact(format!("f{i}"), format!("Fact {i}")).unwrap();
    }
    for _ in 0..rules {
        let from: Vec<String> = (0..1 + rng.next(3))
            .map(|_| format!("f{}", rng.next(facts)))
            .collect();
        let to: Vec<String> = (0..1 + rng.next(2))
            .map(|_| format!("f{}", rng.next(facts)))
            .collect();
        kb.add_rule(from, to).unwrap();
    }
    kb
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_scenario_forward_chain() {
    let kb = chain_kb();
    let result = ForwardSolver::new()
        .solve(&kb, &fact_set(["A", "B"]), &fact_set(["D"]))
        .unwrap();

    assert!(result.success);
    assert_eq!(result.rule_ids(), vec![RuleId(0), RuleId(1)]);
}

#[test]
fn test_scenario_backward_chain_same_order() {
    let kb = chain_kb();
    let result = BackwardSolver::new()
        .solve(&kb, &fact_set(["A", "B"]), &fact_set(["D"]))
        .unwrap();

    assert!(result.success);
    assert_eq!(result.rule_ids(), vec![RuleId(0), RuleId(1)]);
}

#[test]
fn test_scenario_unproducible_target() {
    let kb = chain_kb();
    for solver in solvers() {
        let result = solver
            .solve(&kb, &fact_set(["A", "B"]), &fact_set(["E"]))
            .unwrap();
        assert!(!result.success, "{} should fail", solver.name());
        assert!(result.rules.is_empty());
    }
}

#[test]
fn test_scenario_cycle_without_bootstrap() {
    let mut kb = KnowledgeBase::new();
    kb.add_rule(["X"], ["Y"]).unwrap();
    kb.add_rule(["Y"], ["X"]).unwrap();

    for solver in solvers() {
        let result = solver.solve(&kb, &FactSet::new(), &fact_set(["X"])).unwrap();
        assert!(!result.success, "{} should fail", solver.name());
        assert!(result.rules.is_empty());
    }
    assert!(!is_reachable(&kb, &FactSet::new(), &fact_set(["X"])));
}

#[test]
fn test_scenario_target_already_known() {
    let kb = chain_kb();
    for solver in solvers() {
        let result = solver
            .solve(&kb, &fact_set(["A", "B", "D"]), &fact_set(["D", "A"]))
            .unwrap();
        assert!(result.success, "{} should succeed", solver.name());
        assert!(result.rules.is_empty());
    }
}

// ============================================================================
// Properties
// ============================================================================

fn assert_valid_plan(result: &SolveResult, current: &FactSet, target: &FactSet) {
    if result.success {
        assert!(result.verify(current, target), "plan does not replay");
    } else {
        assert!(result.rules.is_empty());
    }
}

#[test]
fn test_plans_replay_on_random_knowledge_bases() {
    for seed in 0..200 {
        let kb = random_kb(seed, 8, 10);
        let current = fact_set(["f0", "f1"]);
        let target = fact_set([format!("f{}", seed % 8)]);

        for solver in solvers() {
            let result = solver.solve(&kb, &current, &target).unwrap();
            assert_valid_plan(&result, &current, &target);
        }
    }
}

#[test]
fn test_backward_plans_have_no_duplicates() {
    for seed in 0..200 {
        let kb = random_kb(seed, 10, 14);
        let current = fact_set(["f0", "f1", "f2"]);
        let target = fact_set(["f7", "f9"]);

        let result = BackwardSolver::new().solve(&kb, &current, &target).unwrap();
        let unique: HashSet<_> = result.rule_ids().into_iter().collect();
        assert_eq!(unique.len(), result.rules.len(), "seed {seed}");
    }
}

#[test]
fn test_forward_agrees_with_reachability() {
    for seed in 0..200 {
        let kb = random_kb(seed, 7, 9);
        let current = fact_set(["f0"]);
        let target = fact_set([format!("f{}", 1 + seed % 6)]);

        let forward = ForwardSolver::new().solve(&kb, &current, &target).unwrap();
        assert_eq!(
            forward.success,
            is_reachable(&kb, &current, &target),
            "seed {seed}"
        );

        let fact = format!("f{}", 1 + seed % 6);
        assert_eq!(
            forward.success,
            ProofTree::build(&kb, &current, &fact).evaluate(),
            "seed {seed}"
        );
    }
}

#[test]
fn test_backward_success_implies_reachable() {
    for seed in 0..200 {
        let kb = random_kb(seed, 7, 9);
        let current = fact_set(["f0", "f3"]);
        let target = fact_set([format!("f{}", seed % 7)]);

        let backward = BackwardSolver::new().solve(&kb, &current, &target).unwrap();
        if backward.success {
            assert!(is_reachable(&kb, &current, &target), "seed {seed}");
        }
    }
}

#[test]
fn test_iterations_are_bounded() {
    for seed in 0..100 {
        let kb = random_kb(seed, 9, 12);
        let bound = kb.rule_count() * kb.fact_count() + kb.fact_count() + 1;
        let current = fact_set(["f0"]);
        let target = fact_set(["f8"]);

        for solver in solvers() {
            let result = solver.solve(&kb, &current, &target).unwrap();
            assert!(result.stats.iterations <= bound, "seed {seed}");
        }
    }
}

#[test]
fn test_solvers_do_not_mutate_knowledge_base() {
    let kb = chain_kb();
    let before = kb.to_json().unwrap();
    for solver in solvers() {
        solver
            .solve(&kb, &fact_set(["A", "B"]), &fact_set(["D"]))
            .unwrap();
        solver
            .solve(&kb, &fact_set(["A", "B"]), &fact_set(["D"]))
            .unwrap();
    }
    assert_eq!(kb.to_json().unwrap(), before);
}

// ============================================================================
// Loaded knowledge base
// ============================================================================

const GAME_FACTS: &str = "\
# Game genres
multiplayer: Plays with other people
online: Needs an internet connection
shooter: Involves shooting
team: Team based
tactical: Tactical shooter
battle_royale: Battle royale
last_standing: Last one standing wins
";

const GAME_RULES: &str = "\
multiplayer;online->team
shooter;team->tactical
multiplayer;last_standing->battle_royale
shooter;battle_royale->tactical
";

#[test]
fn test_loaded_knowledge_base_both_strategies() {
    let kb = load_str(GAME_FACTS, GAME_RULES).unwrap();
    let current = fact_set(["multiplayer", "online", "shooter"]);
    let target = fact_set([kb.resolve("Tactical shooter")]);

    let forward = ForwardSolver::new().solve(&kb, &current, &target).unwrap();
    let backward = BackwardSolver::new().solve(&kb, &current, &target).unwrap();

    assert_eq!(forward.rule_ids(), vec![RuleId(0), RuleId(1)]);
    assert_eq!(backward.rule_ids(), vec![RuleId(0), RuleId(1)]);
}

#[test]
fn test_backward_is_goal_directed() {
    let kb = load_str(GAME_FACTS, GAME_RULES).unwrap();
    let current = fact_set(["multiplayer", "online", "shooter", "last_standing"]);
    let target = fact_set(["battle_royale"]);

    let forward = ForwardSolver::new().solve(&kb, &current, &target).unwrap();
    let backward = BackwardSolver::new().solve(&kb, &current, &target).unwrap();

    // Forward fires the earlier, unrelated rules first.
    assert_eq!(forward.rule_ids(), vec![RuleId(0), RuleId(1), RuleId(2)]);
    assert_eq!(backward.rule_ids(), vec![RuleId(2)]);
}
