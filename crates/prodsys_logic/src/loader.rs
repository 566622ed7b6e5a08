//! Text knowledge-base loader.
//!
//! Two line-oriented formats, one for facts and one for rules:
//!
//! ```text
//! # facts
//! A: Fact A
//! B: Fact B
//!
//! # rules
//! A;B->C
//! C->D
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. Any malformed line
//! aborts the whole load.

use std::path::Path;

use log::debug;

use crate::error::{Error, Result};
use crate::fact::Fact;
use crate::knowledge::KnowledgeBase;

const DESCRIPTION_SEPARATOR: &str = ": ";
const RULE_ARROW: &str = "->";
const FACT_SEPARATOR: char = ';';

/// Parsed `pre1;pre2->post1;post2` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSpec {
    /// Precondition names, in declaration order.
    pub from: Vec<String>,
    /// Consequence names, in declaration order.
    pub to: Vec<String>,
}

/// Yields `(line_number, line)` for lines that carry content.
fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line))
        .filter(|(_, line)| !line.trim().is_empty() && !line.starts_with('#'))
}

/// Parses the facts format.
///
/// Each line is `name: description`, split at the first `": "`. A line
/// without a separator registers a fact with no description.
pub fn parse_facts(text: &str) -> Result<Vec<Fact>> {
    content_lines(text)
        .map(|(line_no, line)| {
            let (name, description) = match line.split_once(DESCRIPTION_SEPARATOR) {
                Some((name, description)) => (name.trim(), Some(description.trim())),
                None => (line.trim(), None),
            };
            if name.is_empty() {
                return Err(Error::parse(line_no, "fact name is empty"));
            }
            Ok(match description {
                Some(description) if !description.is_empty() => Fact::new(name, description),
                _ => Fact::named(name),
            })
        })
        .collect()
}

fn parse_names(side: &str, line_no: usize, what: &str) -> Result<Vec<String>> {
    side.split(FACT_SEPARATOR)
        .map(str::trim)
        .map(|name| {
            if name.is_empty() {
                Err(Error::parse(line_no, format!("empty fact name in {what}")))
            } else {
                Ok(name.to_string())
            }
        })
        .collect()
}

/// Parses the rules format.
pub fn parse_rules(text: &str) -> Result<Vec<RuleSpec>> {
    content_lines(text)
        .map(|(line_no, line)| {
            let (from, to) = line
                .split_once(RULE_ARROW)
                .ok_or_else(|| Error::parse(line_no, format!("missing '{RULE_ARROW}'")))?;
            if to.contains(RULE_ARROW) {
                return Err(Error::parse(line_no, format!("more than one '{RULE_ARROW}'")));
            }
            Ok(RuleSpec {
                from: parse_names(from, line_no, "preconditions")?,
                to: parse_names(to, line_no, "consequences")?,
            })
        })
        .collect()
}

/// Builds a knowledge base from the two text formats.
///
/// # Errors
///
/// Any parse error, duplicate fact or invalid rule aborts the load; no partial
/// knowledge base is returned.
pub fn load_str(facts: &str, rules: &str) -> Result<KnowledgeBase> {
    let mut kb = KnowledgeBase::new();

    for fact in parse_facts(facts)? {
        kb.insert_fact(fact)?;
    }
    for spec in parse_rules(rules)? {
        kb.add_rule(spec.from, spec.to)?;
    }

    debug!(
        "Loaded knowledge base: {} facts, {} rules",
        kb.fact_count(),
        kb.rule_count()
    );
    Ok(kb)
}

/// Reads both files and builds a knowledge base from them.
pub fn load_files(
    facts_path: impl AsRef<Path>,
    rules_path: impl AsRef<Path>,
) -> Result<KnowledgeBase> {
    let facts_path = facts_path.as_ref();
    let rules_path = rules_path.as_ref();
    debug!(
        "Loading facts from {} and rules from {}",
        facts_path.display(),
        rules_path.display()
    );

    let facts = std::fs::read_to_string(facts_path)?;
    let rules = std::fs::read_to_string(rules_path)?;
    load_str(&facts, &rules)
}
