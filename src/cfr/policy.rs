//! Policies: read-only maps from information set to action distribution.
//!
//! Policies handed out by the solver are snapshots; they own their data and
//! stay valid after the solver keeps training or is dropped.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cfr::game::Action;
use crate::cfr::storage::InfostateTable;

/// A mapping from information-set key to a distribution over actions.
pub trait Policy<A: Action> {
    /// Action probabilities at `info_key`, or `None` if the policy has no
    /// entry for that key.
    fn action_probabilities(&self, info_key: &str) -> Option<Vec<(A, f64)>>;

    /// Probabilities aligned with `legal_actions`.
    ///
    /// Unknown keys fall back to the uniform distribution.
    ///
    /// # Panics
    /// Panics if the stored entry has a different number of actions.
    fn probabilities(&self, info_key: &str, legal_actions: &[A]) -> Vec<f64> {
        match self.action_probabilities(info_key) {
            Some(entry) => {
                assert_eq!(
                    entry.len(),
                    legal_actions.len(),
                    "Action count mismatch for info set {}",
                    info_key
                );
                entry.into_iter().map(|(_, p)| p).collect()
            }
            None => vec![1.0 / legal_actions.len() as f64; legal_actions.len()],
        }
    }
}

/// Policy playing every legal action with equal probability.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformPolicy;

impl<A: Action> Policy<A> for UniformPolicy {
    fn action_probabilities(&self, _info_key: &str) -> Option<Vec<(A, f64)>> {
        None
    }
}

/// A snapshot policy stored as a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabularPolicy<A> {
    entries: FxHashMap<String, Vec<(A, f64)>>,
}

impl<A> Default for TabularPolicy<A> {
    fn default() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }
}

impl<A: Action> TabularPolicy<A> {
    /// Create an empty policy (uniform everywhere).
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the regret-matched policy of every visited information set.
    pub fn current(table: &InfostateTable<A>) -> Self {
        Self::from_table(table, |node| node.regret_matched_strategy())
    }

    /// Snapshot the time-averaged policy of every visited information set.
    pub fn average(table: &InfostateTable<A>) -> Self {
        Self::from_table(table, |node| node.average_strategy())
    }

    fn from_table<F>(table: &InfostateTable<A>, strategy: F) -> Self
    where
        F: Fn(&crate::cfr::storage::InfostateNode<A>) -> Vec<f64>,
    {
        let entries = table
            .iter()
            .map(|(key, node)| {
                let probs = node
                    .legal_actions
                    .iter()
                    .cloned()
                    .zip(strategy(node))
                    .collect();
                (key.clone(), probs)
            })
            .collect();
        Self { entries }
    }

    /// Set the distribution for an information set.
    pub fn insert(&mut self, info_key: impl Into<String>, probs: Vec<(A, f64)>) {
        self.entries.insert(info_key.into(), probs);
    }

    /// Borrow the entry for an information set.
    pub fn get(&self, info_key: &str) -> Option<&[(A, f64)]> {
        self.entries.get(info_key).map(Vec::as_slice)
    }

    /// Probability of a single action, if the key and action are known.
    pub fn probability(&self, info_key: &str, action: &A) -> Option<f64> {
        self.get(info_key)?
            .iter()
            .find(|(a, _)| a == action)
            .map(|&(_, p)| p)
    }

    /// Keys with an entry.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Number of information sets covered.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the policy has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<A: Action> Policy<A> for TabularPolicy<A> {
    fn action_probabilities(&self, info_key: &str) -> Option<Vec<(A, f64)>> {
        self.entries.get(info_key).cloned()
    }
}
