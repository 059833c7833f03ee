//! Game trait definition for the CFR solver.
//!
//! Any extensive-form game that implements the `Game` trait can be solved
//! with CFR. The trait exposes exactly what the traversal needs: whose turn
//! it is, the legal actions or chance outcomes, terminal returns, and the
//! information-set identity of a decision node.

use std::fmt::Debug;
use std::hash::Hash;

/// Trait for actions that can be taken in a game.
///
/// Actions must be cloneable, comparable, and hashable so that policies can
/// be keyed and compared by action.
pub trait Action: Clone + Eq + Hash + Debug + Send + Sync {
    /// Convert action to a string representation for display/storage.
    fn to_string(&self) -> String;
}

/// Trait for information states (what a player knows at a decision point).
///
/// Two histories that are indistinguishable to the acting player must
/// produce the same information state, and the game must respect perfect
/// recall: the player's own past actions and all information revealed to
/// them are part of the state.
pub trait InfoState: Clone + Eq + Hash + Debug + Send + Sync {
    /// Generate a unique string key for this information state.
    /// This key is used for storing regrets and strategies.
    fn key(&self) -> String;
}

/// Trait for game states.
///
/// A game state contains all information about the current history,
/// including private information that players may not see.
pub trait GameState: Clone + Debug + Send + Sync {}

/// Who acts at a given state.
///
/// Every node of the tree is exactly one of these three kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Turn {
    /// The game is over; returns are defined.
    Terminal,
    /// Nature moves according to `Game::chance_outcomes`.
    Chance,
    /// A player (0-indexed) chooses among `Game::legal_actions`.
    Player(usize),
}

/// The main Game trait that defines the interface for any game.
///
/// # Type Parameters
/// - `State`: The game state (history) type
/// - `Action`: The action type
/// - `InfoState`: The information state type
///
/// # Example
/// ```ignore
/// struct MyGame;
///
/// impl Game for MyGame {
///     type State = MyGameState;
///     type Action = MyAction;
///     type InfoState = MyInfoState;
///
///     // ... implement required methods
/// }
/// ```
pub trait Game: Clone + Send + Sync {
    /// The type representing a complete game state.
    type State: GameState;

    /// The type representing an action (player move or chance outcome).
    type Action: Action;

    /// The type representing what a player knows at a decision point.
    type InfoState: InfoState;

    /// Get the total number of players in the game.
    fn num_players(&self) -> usize;

    /// Create the initial game state (the root of the tree).
    fn initial_state(&self) -> Self::State;

    /// Get the kind of node at `state` and, for decision nodes, the actor.
    fn current_player(&self, state: &Self::State) -> Turn;

    /// Get the legal actions at a decision node.
    ///
    /// The order must be stable for a given information set: it fixes the
    /// indexing of the regret and strategy accumulators.
    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Get the outcome distribution at a chance node.
    ///
    /// Probabilities must sum to 1. Only called when `current_player`
    /// returns `Turn::Chance`.
    fn chance_outcomes(&self, _state: &Self::State) -> Vec<(Self::Action, f64)> {
        Vec::new()
    }

    /// Apply an action to a state and return the resulting new state.
    ///
    /// This must not modify the input state (immutable transition).
    fn apply_action(&self, state: &Self::State, action: &Self::Action) -> Self::State;

    /// Get the utility of every player at a terminal state.
    ///
    /// # Panics
    /// May panic if called on a non-terminal state.
    fn returns(&self, state: &Self::State) -> Vec<f64>;

    /// Get the information state of `player` at `state`.
    ///
    /// Only defined when `player` is the acting player at `state`.
    fn info_state(&self, state: &Self::State, player: usize) -> Self::InfoState;

    /// Check if the given state is terminal (game over).
    fn is_terminal(&self, state: &Self::State) -> bool {
        self.current_player(state) == Turn::Terminal
    }

    /// Check if the current state is a chance node.
    fn is_chance(&self, state: &Self::State) -> bool {
        self.current_player(state) == Turn::Chance
    }

    /// Get a human-readable name for an action.
    fn action_name(&self, action: &Self::Action) -> String {
        action.to_string()
    }
}

/// Macro to simplify implementing the Action trait for simple enums.
#[macro_export]
macro_rules! impl_action {
    ($type:ty) => {
        impl $crate::cfr::game::Action for $type {
            fn to_string(&self) -> String {
                format!("{:?}", self)
            }
        }
    };
}

/// Macro to simplify implementing the GameState trait.
#[macro_export]
macro_rules! impl_game_state {
    ($type:ty) => {
        impl $crate::cfr::game::GameState for $type {}
    };
}
