//! # CFR Engine
//!
//! A generic Counterfactual Regret Minimization (CFR) engine for computing
//! approximate Nash equilibria in extensive-form games with any number of
//! players.
//!
//! ## Features
//!
//! - **Generic CFR Engine**: Works with any game implementing the `Game` trait
//! - **Eight Variants**: Regret matching plus, linear averaging and alternating
//!   updates toggle independently (vanilla CFR and CFR+ are the extremes)
//! - **Policies**: Current and average strategies as tabular policies
//! - **Checkpointing**: Save and resume solver state
//! - **Exploitability Calculation**: Best response, NashConv and exploitability
//! - **Parallel Sweeps**: Solve several configurations at once with rayon
//!
//! ## Quick Start
//!
//! ```
//! use cfr_engine::cfr::{CFRConfig, CFRSolver};
//! use cfr_engine::games::kuhn::KuhnPoker;
//!
//! // 1. Implement the Game trait for your game (Kuhn Poker ships built in)
//! // 2. Create a solver
//! let mut solver = CFRSolver::new(KuhnPoker::new(), CFRConfig::cfr_plus());
//!
//! // 3. Train
//! solver.train(100);
//!
//! // 4. Get strategies
//! let strategy = solver.get_average_strategy("0:", 2);
//! assert!((strategy.iter().sum::<f64>() - 1.0).abs() < 1e-9);
//! ```
//!
//! ## Modules
//!
//! - [`cfr`]: Core CFR algorithm, policies and evaluation
//! - [`games`]: Game implementations (Kuhn Poker, Leduc Hold'em, matrix games, explicit trees)
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      CFR Solver (Generic)                       │
//! │  - Regret accumulation    - Strategy averaging                  │
//! │  - Full tree traversal    - Best response / NashConv            │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               │ implements Game trait
//!                               ▼
//!         ┌─────────────────────┼─────────────────────┐
//!         │                     │                     │
//!         ▼                     ▼                     ▼
//!    ┌─────────┐         ┌───────────┐         ┌───────────┐
//!    │  Kuhn   │         │  Matrix   │         │ Explicit  │
//!    │  Poker  │         │  Games    │         │   Trees   │
//!    └─────────┘         └───────────┘         └───────────┘
//! ```

#![warn(missing_docs)]

/// CFR (Counterfactual Regret Minimization) solver module.
///
/// This is the core module containing the generic CFR algorithm.
pub mod cfr;

/// Game implementations module.
///
/// Contains games like Kuhn Poker for testing and validation.
pub mod games;

// Re-export commonly used types at crate root for convenience
pub use cfr::{
    exploitability, nash_conv, Action, CFRConfig, CFRSolver, CFRStats, Game, GameState, InfoState,
    Policy, SolverError, TabularPolicy, Turn,
};
