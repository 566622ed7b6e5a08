//! Prodsys - Production System Solver
//!
//! Loads a knowledge base from a facts file and a rules file, then derives a
//! target fact set from an initial one using forward or backward chaining.

mod error;

use clap::Parser;
use error::{Error, Result};
use log::{info, warn};
use prodsys_logic::loader::load_files;
use prodsys_logic::render::{render_result, render_tree};
use prodsys_logic::{derivable_facts, FactSet, KnowledgeBase, ProofTree, SolverConfig, Strategy};
use std::fmt::Write;
use std::path::PathBuf;

/// Production-rule inference from the command line
#[derive(Parser, Debug)]
#[command(name = "prodsys")]
#[command(author = "Apilium Technologies")]
#[command(version)]
#[command(about = "Forward and backward chaining over a production-rule knowledge base", long_about = None)]
struct Args {
    /// Facts file, one `name: description` per line
    #[arg(short, long)]
    facts: PathBuf,

    /// Rules file, one `a;b->c` per line
    #[arg(short, long)]
    rules: PathBuf,

    /// Initially known facts (names or descriptions, comma separated)
    #[arg(short, long, value_delimiter = ',')]
    initial: Vec<String>,

    /// Facts to derive (names or descriptions, comma separated)
    #[arg(short, long, value_delimiter = ',', required = true)]
    target: Vec<String>,

    /// Inference strategy; overrides PRODSYS_STRATEGY
    #[arg(short, long)]
    strategy: Option<Strategy>,

    /// Bound on solver iterations; overrides PRODSYS_MAX_STEPS
    #[arg(long)]
    max_steps: Option<usize>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Also print the AND/OR reachability tree of every target fact
    #[arg(long)]
    reachability: bool,

    /// Largest reachability tree to print; bigger trees only report the verdict
    #[arg(long, default_value_t = 10_000)]
    max_tree_nodes: usize,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let output = run(&args)?;
    print!("{}", output);
    Ok(())
}

/// Executes one solve and returns the text to print.
fn run(args: &Args) -> Result<String> {
    let kb = load_files(&args.facts, &args.rules)?;
    info!(
        "Loaded {} facts and {} rules",
        kb.fact_count(),
        kb.rule_count()
    );

    let current = resolve_selection(&kb, &args.initial);
    let target = resolve_selection(&kb, &args.target);
    if target.is_empty() {
        return Err(Error::Usage("the target selection is empty".into()));
    }

    let mut config = SolverConfig::from_env();
    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }
    if args.max_steps.is_some() {
        config.max_steps = args.max_steps;
    }

    let solver = config.build();
    info!("Solving with the {} strategy", solver.name());
    let result = solver.solve(&kb, &current, &target)?;

    if args.json {
        let mut value = serde_json::json!({
            "strategy": config.strategy,
            "result": result,
        });
        if args.reachability {
            let derivable = derivable_facts(&kb, &current);
            let verdicts: serde_json::Map<String, serde_json::Value> = target
                .iter()
                .map(|fact| (fact.clone(), serde_json::Value::Bool(derivable.contains(fact))))
                .collect();
            value["reachable"] = serde_json::Value::Object(verdicts);
        }
        let mut json = serde_json::to_string_pretty(&value)?;
        json.push('\n');
        return Ok(json);
    }

    let mut output = render_result(&kb, &result);
    if args.reachability {
        output.push_str("> Reachability:\n");
        let derivable = derivable_facts(&kb, &current);
        for fact in &target {
            match ProofTree::build_bounded(&kb, &current, fact, args.max_tree_nodes) {
                Some(tree) => output.push_str(&render_tree(&kb, &tree)),
                None => {
                    warn!(
                        "Reachability tree for '{}' exceeds {} nodes",
                        fact, args.max_tree_nodes
                    );
                    let verdict = if derivable.contains(fact) { "yes" } else { "no" };
                    let _ = writeln!(
                        output,
                        "{} [{verdict}] (tree exceeds {} nodes)",
                        kb.describe(fact),
                        args.max_tree_nodes
                    );
                }
            }
        }
    }
    Ok(output)
}

/// Maps each comma-separated token to a fact name.
fn resolve_selection(kb: &KnowledgeBase, tokens: &[String]) -> FactSet {
    tokens
        .iter()
        .map(|token| token.trim())
        .filter(|token| !token.is_empty())
        .map(|token| {
            let name = kb.resolve(token);
            if !kb.contains_fact(&name) {
                warn!("'{}' is not a registered fact", token);
            }
            name
        })
        .collect()
}
