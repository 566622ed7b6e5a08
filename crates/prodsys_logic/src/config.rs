//! Solver configuration.
//!
//! The strategy is chosen by configuration rather than by type: callers build
//! a [`SolverConfig`] (by hand, from serde, or from the environment) and ask
//! it for a boxed [`Solver`].
//!
//! # Examples
//!
//! ```
//! # use prodsys_logic::{Solver, SolverConfig, Strategy};
//! let mut config = SolverConfig::default();
//! config.strategy = Strategy::Backward;
//! config.max_steps = Some(10_000);
//! let solver = config.build();
//! assert_eq!(solver.name(), "backward");
//! ```

use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::backward::BackwardSolver;
use crate::error::{Error, Result};
use crate::forward::ForwardSolver;
use crate::solver::Solver;

/// Environment variable selecting the strategy (`forward` or `backward`).
pub const ENV_STRATEGY: &str = "PRODSYS_STRATEGY";

/// Environment variable bounding solver iterations.
pub const ENV_MAX_STEPS: &str = "PRODSYS_MAX_STEPS";

/// The inference strategy used to solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Data-driven saturation with early exit on the target.
    #[default]
    Forward,
    /// Goal-driven search with plan reconstruction.
    Backward,
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forward" | "fwd" => Ok(Strategy::Forward),
            "backward" | "bwd" => Ok(Strategy::Backward),
            other => Err(Error::InvalidConfig(format!("unknown strategy '{other}'"))),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Forward => f.write_str("forward"),
            Strategy::Backward => f.write_str("backward"),
        }
    }
}

/// Selects and parameterizes a solver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Which solver to build.
    pub strategy: Strategy,
    /// Optional bound on solver loop iterations; `None` is unbounded.
    #[serde(default)]
    pub max_steps: Option<usize>,
}

impl SolverConfig {
    /// Creates a config for `strategy` with no step bound.
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            max_steps: None,
        }
    }

    /// Loads the defaults and applies [`ENV_STRATEGY`] and [`ENV_MAX_STEPS`].
    ///
    /// Values that fail to parse are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(value) = std::env::var(ENV_STRATEGY) {
            match value.parse() {
                Ok(strategy) => config.strategy = strategy,
                Err(e) => warn!("Ignoring {}: {}", ENV_STRATEGY, e),
            }
        }

        if let Ok(value) = std::env::var(ENV_MAX_STEPS) {
            match value.trim().parse::<usize>() {
                Ok(steps) => config.max_steps = Some(steps),
                Err(e) => warn!("Ignoring {}='{}': {}", ENV_MAX_STEPS, value, e),
            }
        }

        config
    }

    /// Builds the configured solver.
    pub fn build(&self) -> Box<dyn Solver> {
        match self.strategy {
            Strategy::Forward => Box::new(ForwardSolver::new().with_max_steps(self.max_steps)),
            Strategy::Backward => Box::new(BackwardSolver::new().with_max_steps(self.max_steps)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_parse() {
        assert_eq!("forward".parse::<Strategy>().unwrap(), Strategy::Forward);
        assert_eq!(" Backward ".parse::<Strategy>().unwrap(), Strategy::Backward);
        assert!(matches!(
            "sideways".parse::<Strategy>(),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_strategy_display_roundtrip() {
        for strategy in [Strategy::Forward, Strategy::Backward] {
            assert_eq!(strategy.to_string().parse::<Strategy>().unwrap(), strategy);
        }
    }

    #[test]
    fn test_default_config() {
        let config = SolverConfig::default();
        assert_eq!(config.strategy, Strategy::Forward);
        assert_eq!(config.max_steps, None);
        assert_eq!(config.build().name(), "forward");
    }

    #[test]
    fn test_build_backward() {
        assert_eq!(SolverConfig::new(Strategy::Backward).build().name(), "backward");
    }

    #[test]
    fn test_config_serde() {
        let config: SolverConfig = serde_json::from_str(r#"{"strategy":"backward"}"#).unwrap();
        assert_eq!(config, SolverConfig::new(Strategy::Backward));

        let json = serde_json::to_string(&SolverConfig {
            strategy: Strategy::Forward,
            max_steps: Some(5),
        })
        .unwrap();
        assert_eq!(json, r#"{"strategy":"forward","max_steps":5}"#);
    }
}
