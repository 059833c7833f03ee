//! Storage for CFR regrets and strategies.
//!
//! This module provides the information-set table: a growable map from
//! information-set key to the per-action accumulators used by CFR, plus the
//! regret-matching rule that turns accumulated regret into a strategy.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Regret matching: strategy proportional to positive regrets.
///
/// If no action has positive regret the result is uniform. Always returns a
/// probability distribution for a non-empty regret vector.
///
/// # Example
/// ```
/// use cfr_engine::cfr::storage::regret_matching;
///
/// assert_eq!(regret_matching(&[3.0, -1.0, 1.0]), vec![0.75, 0.0, 0.25]);
/// assert_eq!(regret_matching(&[-2.0, 0.0]), vec![0.5, 0.5]);
/// ```
pub fn regret_matching(regrets: &[f64]) -> Vec<f64> {
    let mut strategy = vec![0.0; regrets.len()];
    regret_matching_into(regrets, &mut strategy);
    strategy
}

/// In-place variant of [`regret_matching`] writing into `strategy`.
pub fn regret_matching_into(regrets: &[f64], strategy: &mut [f64]) {
    debug_assert_eq!(regrets.len(), strategy.len());

    let positive_sum: f64 = regrets.iter().map(|&r| r.max(0.0)).sum();

    if positive_sum > 0.0 {
        for (s, &r) in strategy.iter_mut().zip(regrets) {
            *s = r.max(0.0) / positive_sum;
        }
    } else {
        let uniform = 1.0 / strategy.len() as f64;
        strategy.fill(uniform);
    }
}

/// Normalize a cumulative strategy into a distribution, uniform if empty.
pub fn normalize_or_uniform(sums: &[f64]) -> Vec<f64> {
    let total: f64 = sums.iter().sum();
    if total > 0.0 {
        sums.iter().map(|&x| x / total).collect()
    } else {
        vec![1.0 / sums.len() as f64; sums.len()]
    }
}

/// Accumulators for a single information set.
///
/// All vectors are indexed by the position of the action in
/// `legal_actions`, which is the order the game enumerates them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfostateNode<A> {
    /// Legal actions at this information set, in enumeration order.
    pub legal_actions: Vec<A>,
    /// Running sum of counterfactual regret per action.
    pub cumulative_regret: Vec<f64>,
    /// Running sum of reach- and iteration-weighted action probabilities.
    pub cumulative_strategy: Vec<f64>,
    /// Strategy used by the traversal; refreshed by regret matching between
    /// passes so every visit within a pass sees the same distribution.
    pub current_strategy: Vec<f64>,
}

impl<A: Clone> InfostateNode<A> {
    /// Create a node with zeroed accumulators and a uniform strategy.
    pub fn new(legal_actions: &[A]) -> Self {
        let num_actions = legal_actions.len();
        Self {
            legal_actions: legal_actions.to_vec(),
            cumulative_regret: vec![0.0; num_actions],
            cumulative_strategy: vec![0.0; num_actions],
            current_strategy: vec![1.0 / num_actions as f64; num_actions],
        }
    }
}

impl<A> InfostateNode<A> {
    /// Number of legal actions.
    pub fn num_actions(&self) -> usize {
        self.legal_actions.len()
    }

    /// Strategy implied by regret matching over the current regrets.
    pub fn regret_matched_strategy(&self) -> Vec<f64> {
        regret_matching(&self.cumulative_regret)
    }

    /// Time-averaged strategy (normalized cumulative strategy).
    pub fn average_strategy(&self) -> Vec<f64> {
        normalize_or_uniform(&self.cumulative_strategy)
    }

    /// Recompute `current_strategy` from `cumulative_regret`.
    pub fn apply_regret_matching(&mut self) {
        regret_matching_into(&self.cumulative_regret, &mut self.current_strategy);
    }

    /// Regret-matching-plus reset: floor every accumulated regret at 0.
    pub fn floor_regrets(&mut self) {
        for r in self.cumulative_regret.iter_mut() {
            if *r < 0.0 {
                *r = 0.0;
            }
        }
    }
}

/// The information-set table.
///
/// Entries are created lazily on first visit and never removed. The table
/// is owned by one solver and only mutated during an update call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfostateTable<A> {
    nodes: FxHashMap<String, InfostateNode<A>>,
}

impl<A> Default for InfostateTable<A> {
    fn default() -> Self {
        Self {
            nodes: FxHashMap::default(),
        }
    }
}

impl<A: Clone> InfostateTable<A> {
    /// Create new empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Look up the node for `info_key`, creating it if this is the first visit.
    ///
    /// # Panics
    /// Panics if the key already exists with a different number of actions.
    /// Two decision nodes sharing a key must offer the same actions; anything
    /// else is a bug in the game description.
    pub fn get_or_insert(&mut self, info_key: &str, legal_actions: &[A]) -> &mut InfostateNode<A> {
        let node = self
            .nodes
            .entry(info_key.to_string())
            .or_insert_with(|| {
                log::trace!("new information set {} ({} actions)", info_key, legal_actions.len());
                InfostateNode::new(legal_actions)
            });
        check_action_count(node, legal_actions.len(), info_key);
        node
    }

    /// Current strategy at `info_key` for one traversal visit.
    ///
    /// Creates the node on first visit; the key is only copied then.
    ///
    /// # Panics
    /// Same contract as [`get_or_insert`](Self::get_or_insert).
    pub fn visit(&mut self, info_key: &str, legal_actions: &[A]) -> Vec<f64> {
        if let Some(node) = self.nodes.get(info_key) {
            check_action_count(node, legal_actions.len(), info_key);
            return node.current_strategy.clone();
        }

        log::trace!("new information set {} ({} actions)", info_key, legal_actions.len());
        let node = InfostateNode::new(legal_actions);
        let strategy = node.current_strategy.clone();
        self.nodes.insert(info_key.to_string(), node);
        strategy
    }
}

fn check_action_count<A>(node: &InfostateNode<A>, num_actions: usize, info_key: &str) {
    assert_eq!(
        node.num_actions(),
        num_actions,
        "Action count mismatch for info set {}",
        info_key
    );
}

impl<A> InfostateTable<A> {
    /// Get the node for an information set, if it has been visited.
    pub fn get(&self, info_key: &str) -> Option<&InfostateNode<A>> {
        self.nodes.get(info_key)
    }

    /// Mutable access to a visited information set.
    pub fn get_mut(&mut self, info_key: &str) -> Option<&mut InfostateNode<A>> {
        self.nodes.get_mut(info_key)
    }

    /// Refresh the current strategy of every node from its regrets.
    pub fn apply_regret_matching(&mut self) {
        for node in self.nodes.values_mut() {
            node.apply_regret_matching();
        }
    }

    /// Floor all accumulated regrets at 0 (CFR+ reset).
    pub fn floor_regrets(&mut self) {
        for node in self.nodes.values_mut() {
            node.floor_regrets();
        }
    }

    /// Get the number of information sets stored.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check whether no information set has been visited yet.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check if an info set exists in storage.
    pub fn contains(&self, info_key: &str) -> bool {
        self.nodes.contains_key(info_key)
    }

    /// Iterate over all `(key, node)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &InfostateNode<A>)> {
        self.nodes.iter()
    }

    /// Iterate over all information-set keys.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.nodes.keys()
    }

    /// Clear all stored data.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_regret_matching_proportional_to_positive_regret() {
        let strategy = regret_matching(&[2.0, 6.0, -4.0]);
        assert_abs_diff_eq!(strategy[0], 0.25);
        assert_abs_diff_eq!(strategy[1], 0.75);
        assert_abs_diff_eq!(strategy[2], 0.0);
    }

    #[test]
    fn test_regret_matching_uniform_fallback() {
        assert_eq!(regret_matching(&[0.0, 0.0, 0.0, 0.0]), vec![0.25; 4]);
        assert_eq!(regret_matching(&[-1.0, -0.5, 0.0]), vec![1.0 / 3.0; 3]);
        assert_eq!(regret_matching(&[-7.0]), vec![1.0]);
    }

    #[test]
    fn test_regret_matching_is_pure() {
        let regrets = [0.3, -1.2, 4.5, 0.0, 1e-12];
        let first = regret_matching(&regrets);
        let second = regret_matching(&regrets);
        assert_eq!(first, second);
        assert_abs_diff_eq!(first.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_normalize_or_uniform() {
        assert_eq!(normalize_or_uniform(&[1.0, 3.0]), vec![0.25, 0.75]);
        assert_eq!(normalize_or_uniform(&[0.0, 0.0, 0.0]), vec![1.0 / 3.0; 3]);
    }

    #[test]
    fn test_lazy_creation_is_uniform() {
        let mut table: InfostateTable<u8> = InfostateTable::new();
        assert!(table.is_empty());

        let node = table.get_or_insert("a", &[0, 1, 2]);
        assert_eq!(node.current_strategy, vec![1.0 / 3.0; 3]);
        assert_eq!(node.cumulative_regret, vec![0.0; 3]);
        assert_eq!(node.average_strategy(), vec![1.0 / 3.0; 3]);

        table.get_or_insert("a", &[0, 1, 2]);
        assert_eq!(table.len(), 1);
        assert!(table.contains("a"));
    }

    #[test]
    #[should_panic(expected = "Action count mismatch")]
    fn test_action_count_mismatch_is_fatal() {
        let mut table: InfostateTable<u8> = InfostateTable::new();
        table.get_or_insert("a", &[0, 1]);
        table.get_or_insert("a", &[0, 1, 2]);
    }

    #[test]
    fn test_visit_reads_cached_strategy() {
        let mut table: InfostateTable<u8> = InfostateTable::new();
        assert_eq!(table.visit("a", &[0, 1]), vec![0.5, 0.5]);
        assert!(table.contains("a"));

        table.get_mut("a").unwrap().current_strategy = vec![0.2, 0.8];
        // Regrets are not consulted until the next refresh.
        table.get_mut("a").unwrap().cumulative_regret = vec![5.0, 0.0];
        assert_eq!(table.visit("a", &[0, 1]), vec![0.2, 0.8]);
        assert_eq!(table.len(), 1);
        assert!(table.get_mut("b").is_none());
    }

    #[test]
    #[should_panic(expected = "Action count mismatch")]
    fn test_visit_with_wrong_action_count_is_fatal() {
        let mut table: InfostateTable<u8> = InfostateTable::new();
        table.visit("a", &[0, 1, 2]);
        table.visit("a", &[0, 1]);
    }

    #[test]
    fn test_floor_and_refresh() {
        let mut table: InfostateTable<u8> = InfostateTable::new();
        let node = table.get_or_insert("a", &[0, 1]);
        node.cumulative_regret = vec![-3.0, 1.0];

        table.apply_regret_matching();
        assert_eq!(table.get("a").unwrap().current_strategy, vec![0.0, 1.0]);

        table.floor_regrets();
        assert_eq!(table.get("a").unwrap().cumulative_regret, vec![0.0, 1.0]);
    }
}
