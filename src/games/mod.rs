//! Game implementations for the CFR solver.
//!
//! These serve as:
//!
//! 1. **Validation**: Games with known equilibria (Kuhn Poker, matrix games)
//!    verify that the CFR implementation is correct.
//!
//! 2. **Examples**: Demonstrate how to implement the `Game` trait for new games.
//!
//! 3. **Benchmarks**: Provide standardized games for performance testing.
//!
//! ## Available Games
//!
//! - [`kuhn`]: N-player Kuhn Poker
//! - [`leduc`]: Two-player Leduc Hold'em
//! - [`matrix`]: One-shot normal-form games (rock-paper-scissors, Shapley's
//!   game, three-player matching pennies) played as sequential turns
//! - [`tree`]: Arbitrary small trees given node by node
//!
//! ## Adding New Games
//!
//! 1. Create a new module under `src/games/`
//! 2. Define state, action, and info state types
//! 3. Implement the `Game` trait
//! 4. Add tests that verify expected behavior
//!
//! See the [`kuhn`] module for a complete example.

pub mod kuhn;
pub mod leduc;
pub mod matrix;
pub mod tree;
