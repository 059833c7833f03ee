//! Recoverable errors.
//!
//! Only I/O at the edges (configs, checkpoints) can fail recoverably.
//! A game that breaks the `Game` contract during traversal is a bug in
//! the game and makes the solver panic instead.

use thiserror::Error;

/// Errors returned by configuration and checkpoint loading/saving.
#[derive(Error, Debug)]
pub enum SolverError {
    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A config or checkpoint was not valid JSON for the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A checkpoint was produced for a game with a different player count.
    #[error("checkpoint is for {found} players, game has {expected}")]
    PlayerCountMismatch {
        /// Players in the game being solved.
        expected: usize,
        /// Players recorded in the checkpoint.
        found: usize,
    },
}

/// Result alias for fallible solver operations.
pub type SolverResult<T> = Result<T, SolverError>;
