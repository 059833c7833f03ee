//! Counterfactual Regret Minimization solver.
//!
//! This module implements the full-traversal CFR algorithm with three
//! independent switches (see [`CFRConfig`]):
//! - **Regret matching plus**: floors accumulated regrets at zero
//! - **Linear averaging**: weights iteration `t` by `t` in the average
//! - **Alternating updates**: one traversal per player per iteration
//!
//! The solver is generic over any game that implements the `Game` trait.

use std::fs;
use std::path::Path;
use std::time::Instant;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::cfr::config::{CFRConfig, CFRStats};
use crate::cfr::error::{SolverError, SolverResult};
use crate::cfr::game::{Game, InfoState, Turn};
use crate::cfr::policy::TabularPolicy;
use crate::cfr::storage::InfostateTable;

/// Allowed deviation of a chance distribution's total from 1.
const CHANCE_TOLERANCE: f64 = 1e-6;

/// The main CFR solver.
///
/// Owns the game and the information-set table. Each call to
/// [`evaluate_and_update_policy`](Self::evaluate_and_update_policy) walks the
/// whole game tree (once, or once per player under alternating updates).
///
/// # Example
/// ```
/// use cfr_engine::cfr::{CFRConfig, CFRSolver};
/// use cfr_engine::games::kuhn::KuhnPoker;
///
/// let mut solver = CFRSolver::new(KuhnPoker::new(), CFRConfig::cfr_plus());
/// for _ in 0..50 {
///     solver.evaluate_and_update_policy();
/// }
/// let policy = solver.average_policy();
/// assert_eq!(policy.len(), 12);
/// ```
pub struct CFRSolver<G: Game> {
    /// The game being solved.
    game: G,

    /// Configuration for the solver.
    config: CFRConfig,

    /// Regrets and strategy sums per information set.
    table: InfostateTable<G::Action>,

    /// Current iteration count (first iteration is 1).
    iteration: u64,

    /// Statistics tracking.
    stats: CFRStats,
}

impl<G: Game> CFRSolver<G> {
    /// Create a new CFR solver for the given game.
    ///
    /// # Panics
    /// Panics if the game has no players.
    pub fn new(game: G, config: CFRConfig) -> Self {
        Self::with_capacity(game, config, 0)
    }

    /// Create a solver with pre-allocated table capacity.
    ///
    /// Use this when you have an estimate of how many info sets the game has
    /// to avoid reallocations during training.
    pub fn with_capacity(game: G, config: CFRConfig, capacity: usize) -> Self {
        assert!(game.num_players() >= 1, "game must have at least one player");

        Self {
            game,
            config,
            table: InfostateTable::with_capacity(capacity),
            iteration: 0,
            stats: CFRStats::new(),
        }
    }

    /// Run one CFR iteration.
    ///
    /// Under alternating updates the tree is traversed once per player in
    /// order `0..N`, each pass updating only that player and refreshing the
    /// current policy before the next pass. Otherwise a single traversal
    /// updates every player against the policy at the start of the iteration.
    pub fn evaluate_and_update_policy(&mut self) {
        self.iteration += 1;

        let root = self.game.initial_state();
        let num_players = self.game.num_players();
        // One entry per player, chance last.
        let reach_probs = vec![1.0; num_players + 1];

        if self.config.alternating_updates {
            for player in 0..num_players {
                self.compute_counterfactual_values(&root, Some(player), &reach_probs);
                self.finish_pass();
            }
        } else {
            self.compute_counterfactual_values(&root, None, &reach_probs);
            self.finish_pass();
        }
    }

    fn finish_pass(&mut self) {
        if self.config.regret_matching_plus {
            self.table.floor_regrets();
        }
        self.table.apply_regret_matching();
    }

    /// Train the solver for a specified number of iterations.
    ///
    /// # Returns
    /// Statistics from the training run.
    pub fn train(&mut self, iterations: u64) -> &CFRStats {
        self.train_with_callback(iterations, 0, |_| {})
    }

    /// Train with a callback for progress tracking.
    ///
    /// # Arguments
    /// * `iterations` - Number of iterations to run
    /// * `callback_interval` - How often to call the callback (0 disables it)
    /// * `callback` - Function called every `callback_interval` iterations
    pub fn train_with_callback<F>(
        &mut self,
        iterations: u64,
        callback_interval: u64,
        mut callback: F,
    ) -> &CFRStats
    where
        F: FnMut(&CFRStats),
    {
        log::info!(
            "training {} iterations ({}) from iteration {}",
            iterations,
            self.config.label(),
            self.iteration
        );
        let start_time = Instant::now();
        let start_iteration = self.iteration;

        for i in 0..iterations {
            self.evaluate_and_update_policy();

            if callback_interval > 0 && (i + 1) % callback_interval == 0 {
                self.refresh_stats(start_iteration, &start_time);
                log::debug!(
                    "iteration {}: {} info sets, {:.1} it/s",
                    self.stats.iterations,
                    self.stats.info_sets,
                    self.stats.iterations_per_second
                );
                callback(&self.stats);
            }
        }

        self.refresh_stats(start_iteration, &start_time);
        log::info!(
            "finished at iteration {}: {} info sets in {:.2}s",
            self.stats.iterations,
            self.stats.info_sets,
            self.stats.elapsed_seconds
        );

        &self.stats
    }

    fn refresh_stats(&mut self, start_iteration: u64, start_time: &Instant) {
        self.stats.iterations = self.iteration;
        self.stats.info_sets = self.table.len();
        self.stats.elapsed_seconds = start_time.elapsed().as_secs_f64();
        if self.stats.elapsed_seconds > 0.0 {
            self.stats.iterations_per_second =
                (self.iteration - start_iteration) as f64 / self.stats.elapsed_seconds;
        }
    }

    /// Core recursive traversal.
    ///
    /// Returns the expected value of the subtree for every player under the
    /// current policy. `reach_probs` holds each player's own contribution to
    /// reaching `state`, with chance's contribution in the last slot.
    /// `update_player` selects whose regrets are updated; `None` updates all.
    fn compute_counterfactual_values(
        &mut self,
        state: &G::State,
        update_player: Option<usize>,
        reach_probs: &[f64],
    ) -> Vec<f64> {
        match self.game.current_player(state) {
            Turn::Terminal => {
                let returns = self.game.returns(state);
                assert_eq!(
                    returns.len(),
                    self.game.num_players(),
                    "terminal returns must have one entry per player"
                );
                returns
            }
            Turn::Chance => self.chance_node_values(state, update_player, reach_probs),
            Turn::Player(player) => {
                self.decision_node_values(state, player, update_player, reach_probs)
            }
        }
    }

    fn chance_node_values(
        &mut self,
        state: &G::State,
        update_player: Option<usize>,
        reach_probs: &[f64],
    ) -> Vec<f64> {
        let outcomes = self.game.chance_outcomes(state);
        assert!(!outcomes.is_empty(), "chance node has no outcomes");

        let total: f64 = outcomes.iter().map(|(_, prob)| prob).sum();
        assert!(
            (total - 1.0).abs() <= CHANCE_TOLERANCE,
            "chance outcomes sum to {} instead of 1",
            total
        );

        let chance = reach_probs.len() - 1;
        let mut values = vec![0.0; self.game.num_players()];
        let mut child_reach = reach_probs.to_vec();

        for (outcome, prob) in &outcomes {
            child_reach[chance] = reach_probs[chance] * prob;
            let child = self.game.apply_action(state, outcome);
            let child_values = self.compute_counterfactual_values(&child, update_player, &child_reach);

            for (v, cv) in values.iter_mut().zip(&child_values) {
                *v += prob * cv;
            }
        }

        values
    }

    fn decision_node_values(
        &mut self,
        state: &G::State,
        player: usize,
        update_player: Option<usize>,
        reach_probs: &[f64],
    ) -> Vec<f64> {
        let num_players = self.game.num_players();
        assert!(
            player < num_players,
            "acting player {} out of range for {} players",
            player,
            num_players
        );

        // Nothing below contributes to any regret or average once every
        // player's reach is zero.
        if reach_probs[..num_players].iter().all(|&r| r == 0.0) {
            return vec![0.0; num_players];
        }

        let actions = self.game.legal_actions(state);
        assert!(
            !actions.is_empty(),
            "decision node for player {} has no legal actions",
            player
        );

        let info_key = self.game.info_state(state, player).key();
        let strategy = self.table.visit(&info_key, &actions);

        let mut node_values = vec![0.0; num_players];
        let mut action_values = Vec::with_capacity(actions.len());
        let mut child_reach = reach_probs.to_vec();

        for (i, action) in actions.iter().enumerate() {
            child_reach[player] = reach_probs[player] * strategy[i];
            let child = self.game.apply_action(state, action);
            let child_values = self.compute_counterfactual_values(&child, update_player, &child_reach);

            for (v, cv) in node_values.iter_mut().zip(&child_values) {
                *v += strategy[i] * cv;
            }
            action_values.push(child_values[player]);
        }

        if update_player.map_or(true, |p| p == player) {
            // Reach of everyone except the acting player, chance included.
            let cfr_reach: f64 = reach_probs
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != player)
                .map(|(_, &r)| r)
                .product();
            let average_weight = if self.config.linear_averaging {
                self.iteration as f64 * reach_probs[player]
            } else {
                reach_probs[player]
            };

            if let Some(node) = self.table.get_mut(&info_key) {
                for (i, &value) in action_values.iter().enumerate() {
                    node.cumulative_regret[i] += cfr_reach * (value - node_values[player]);
                    node.cumulative_strategy[i] += average_weight * strategy[i];
                }
            }
        }

        node_values
    }

    /// Snapshot of the time-averaged policy.
    ///
    /// Valid before any iteration (the policy is then empty and every
    /// lookup falls back to uniform).
    pub fn average_policy(&self) -> TabularPolicy<G::Action> {
        TabularPolicy::average(&self.table)
    }

    /// Snapshot of the policy regret matching currently prescribes.
    pub fn current_policy(&self) -> TabularPolicy<G::Action> {
        TabularPolicy::current(&self.table)
    }

    /// Get the current strategy for an information set.
    ///
    /// Unvisited information sets return the uniform strategy.
    pub fn get_current_strategy(&self, info_key: &str, num_actions: usize) -> Vec<f64> {
        match self.table.get(info_key) {
            Some(node) => node.regret_matched_strategy(),
            None => vec![1.0 / num_actions as f64; num_actions],
        }
    }

    /// Get the average strategy for an information set.
    ///
    /// This returns the time-averaged strategy which converges to Nash
    /// equilibrium in two-player zero-sum games.
    pub fn get_average_strategy(&self, info_key: &str, num_actions: usize) -> Vec<f64> {
        match self.table.get(info_key) {
            Some(node) => node.average_strategy(),
            None => vec![1.0 / num_actions as f64; num_actions],
        }
    }

    /// Get the current iteration count.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Get the number of information sets discovered.
    pub fn num_info_sets(&self) -> usize {
        self.table.len()
    }

    /// Get all information set keys discovered during training.
    pub fn info_set_keys(&self) -> Vec<String> {
        self.table.keys().cloned().collect()
    }

    /// Get current statistics.
    pub fn stats(&self) -> &CFRStats {
        &self.stats
    }

    /// Get reference to the information-set table for analysis.
    pub fn table(&self) -> &InfostateTable<G::Action> {
        &self.table
    }

    /// Get reference to the game.
    pub fn game(&self) -> &G {
        &self.game
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &CFRConfig {
        &self.config
    }

    /// Export solver state for checkpointing.
    pub fn export_state(&self) -> SolverState<G::Action> {
        SolverState {
            num_players: self.game.num_players(),
            iteration: self.iteration,
            table: self.table.clone(),
            stats: self.stats.clone(),
        }
    }

    /// Import solver state from checkpoint.
    pub fn import_state(&mut self, state: SolverState<G::Action>) -> SolverResult<()> {
        if state.num_players != self.game.num_players() {
            return Err(SolverError::PlayerCountMismatch {
                expected: self.game.num_players(),
                found: state.num_players,
            });
        }
        self.iteration = state.iteration;
        self.table = state.table;
        self.stats = state.stats;
        Ok(())
    }

    /// Reset the solver to initial state.
    pub fn reset(&mut self) {
        self.table.clear();
        self.iteration = 0;
        self.stats = CFRStats::new();
    }
}

impl<G> CFRSolver<G>
where
    G: Game,
    G::Action: Serialize + DeserializeOwned,
{
    /// Write the solver state to a JSON checkpoint.
    pub fn save_checkpoint<P: AsRef<Path>>(&self, path: P) -> SolverResult<()> {
        let json = serde_json::to_string(&self.export_state())?;
        fs::write(path.as_ref(), json)?;
        log::debug!(
            "saved checkpoint at iteration {} to {}",
            self.iteration,
            path.as_ref().display()
        );
        Ok(())
    }

    /// Restore the solver state from a JSON checkpoint.
    pub fn load_checkpoint<P: AsRef<Path>>(&mut self, path: P) -> SolverResult<()> {
        let content = fs::read_to_string(path.as_ref())?;
        let state: SolverState<G::Action> = serde_json::from_str(&content)?;
        self.import_state(state)?;
        log::debug!(
            "loaded checkpoint at iteration {} from {}",
            self.iteration,
            path.as_ref().display()
        );
        Ok(())
    }
}

impl<G: Game> Clone for CFRSolver<G> {
    fn clone(&self) -> Self {
        Self {
            game: self.game.clone(),
            config: self.config,
            table: self.table.clone(),
            iteration: self.iteration,
            stats: self.stats.clone(),
        }
    }
}

/// Serializable solver state for checkpointing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverState<A> {
    /// Player count of the game the state was produced for.
    pub num_players: usize,
    /// Current iteration.
    pub iteration: u64,
    /// Information-set table.
    pub table: InfostateTable<A>,
    /// Statistics.
    pub stats: CFRStats,
}
