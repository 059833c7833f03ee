//! CFR (Counterfactual Regret Minimization) Solver Module.
//!
//! This module provides a generic implementation of the CFR algorithm family
//! for computing approximate Nash equilibria in extensive-form games with
//! imperfect information and any number of players.
//!
//! # Overview
//!
//! CFR is an iterative algorithm that converges to Nash equilibrium (in
//! two-player zero-sum games) by:
//! 1. Computing counterfactual regret for each action at each information set
//! 2. Deriving the next strategy from positive regret (regret matching)
//! 3. Averaging strategies across iterations; the average converges
//!
//! # Supported Variants
//!
//! Three independent switches in [`CFRConfig`]:
//! - **Regret matching plus**: floors negative regrets to zero
//! - **Linear averaging**: weights later iterations more heavily
//! - **Alternating updates**: updates one player per traversal
//!
//! Vanilla CFR has all three off, CFR+ has all three on.
//!
//! # Usage
//!
//! 1. Implement the `Game` trait for your game
//! 2. Create a `CFRSolver` with your game and configuration
//! 3. Call `evaluate_and_update_policy()` (or `train(n)`)
//! 4. Extract the equilibrium approximation with `average_policy()`
//!
//! # Example
//!
//! ```
//! use cfr_engine::cfr::{exploitability, CFRConfig, CFRSolver};
//! use cfr_engine::games::kuhn::KuhnPoker;
//!
//! let game = KuhnPoker::new();
//! let mut solver = CFRSolver::new(game.clone(), CFRConfig::cfr_plus());
//! solver.train(200);
//!
//! let policy = solver.average_policy();
//! assert!(exploitability(&game, &policy) < 0.05);
//! ```
//!
//! # Theory
//!
//! **Regret**: The difference between the value of an action and the value of
//! the current strategy, weighted by the probability that everyone else plays
//! to reach the information set.
//! ```text
//! Regret(I, a) += reach_{-i}(h) * (Value(h·a) - Value(h))   for h in I
//! ```
//!
//! **Regret Matching**: Set strategy proportional to positive regrets.
//! ```text
//! Strategy(a) = max(0, Regret(a)) / sum(max(0, Regret(a')))
//! ```
//!
//! # References
//!
//! - Zinkevich, M., et al. "Regret Minimization in Games with Incomplete Information" (2007)
//! - Tammelin, O. "Solving Large Imperfect Information Games Using CFR+" (2014)

pub mod config;
pub mod error;
pub mod exploitability;
pub mod game;
pub mod policy;
pub mod solver;
pub mod storage;
pub mod sweep;

// Re-export main types for convenient access
pub use config::{CFRConfig, CFRStats};
pub use error::{SolverError, SolverResult};
pub use exploitability::{best_response_value, expected_returns, exploitability, nash_conv, BestResponse};
pub use game::{Action, Game, GameState, InfoState, Turn};
pub use policy::{Policy, TabularPolicy, UniformPolicy};
pub use solver::{CFRSolver, SolverState};
pub use storage::{regret_matching, InfostateNode, InfostateTable};
pub use sweep::{solve_configurations, SweepResult};
