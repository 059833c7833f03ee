//! Configuration options for the CFR solver.
//!
//! The three flags below are independent; every one of the eight
//! combinations runs through the same traversal.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cfr::error::SolverResult;

/// Configuration for the CFR solver.
///
/// # Example
/// ```
/// use cfr_engine::cfr::CFRConfig;
///
/// let config = CFRConfig::cfr_plus();
/// assert!(config.regret_matching_plus);
/// assert!(config.linear_averaging);
/// assert!(config.alternating_updates);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CFRConfig {
    /// Floor accumulated regrets at 0 after every pass (CFR+).
    ///
    /// When disabled regrets may go negative and only their positive part is
    /// used by regret matching.
    #[serde(default)]
    pub regret_matching_plus: bool,

    /// Weight the average-strategy contribution of iteration `t` by `t`.
    ///
    /// Later iterations count more toward the average policy.
    #[serde(default)]
    pub linear_averaging: bool,

    /// Traverse once per player per iteration, updating only that player.
    ///
    /// When disabled a single traversal updates every player against the
    /// strategies in place at the start of the iteration.
    #[serde(default)]
    pub alternating_updates: bool,
}

impl Default for CFRConfig {
    fn default() -> Self {
        Self::cfr()
    }
}

impl CFRConfig {
    /// Create a new CFRConfig with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain CFR with simultaneous updates and uniform averaging.
    pub fn vanilla() -> Self {
        Self {
            regret_matching_plus: false,
            linear_averaging: false,
            alternating_updates: false,
        }
    }

    /// The classic CFR solver: vanilla regret matching with alternating updates.
    pub fn cfr() -> Self {
        Self {
            alternating_updates: true,
            ..Self::vanilla()
        }
    }

    /// CFR+: regret-matching-plus, linear averaging and alternating updates.
    pub fn cfr_plus() -> Self {
        Self {
            regret_matching_plus: true,
            linear_averaging: true,
            alternating_updates: true,
        }
    }

    /// All eight flag combinations, vanilla first.
    pub fn all_variants() -> Vec<Self> {
        (0..8u8)
            .map(|bits| Self {
                regret_matching_plus: bits & 1 != 0,
                linear_averaging: bits & 2 != 0,
                alternating_updates: bits & 4 != 0,
            })
            .collect()
    }

    /// Builder method: set whether to floor regrets at zero.
    pub fn with_regret_matching_plus(mut self, enable: bool) -> Self {
        self.regret_matching_plus = enable;
        self
    }

    /// Builder method: set whether to use linear averaging.
    pub fn with_linear_averaging(mut self, enable: bool) -> Self {
        self.linear_averaging = enable;
        self
    }

    /// Builder method: set whether to alternate player updates.
    pub fn with_alternating_updates(mut self, enable: bool) -> Self {
        self.alternating_updates = enable;
        self
    }

    /// Short human-readable label, e.g. `"rm+/linear/alternating"`.
    pub fn label(&self) -> String {
        let parts = [
            if self.regret_matching_plus { "rm+" } else { "rm" },
            if self.linear_averaging { "linear" } else { "uniform" },
            if self.alternating_updates { "alternating" } else { "simultaneous" },
        ];
        parts.join("/")
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> SolverResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Parse configuration from a JSON string. Missing flags default to off.
    pub fn from_json_str(json: &str) -> SolverResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Statistics tracked during CFR training.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CFRStats {
    /// Total number of iterations completed.
    pub iterations: u64,

    /// Number of unique information sets discovered.
    pub info_sets: usize,

    /// Total time spent training (in seconds).
    pub elapsed_seconds: f64,

    /// Iterations per second.
    pub iterations_per_second: f64,
}

impl CFRStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }
}
