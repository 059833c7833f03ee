//! Kuhn Poker implementation for CFR validation.
//!
//! Kuhn Poker is a simplified poker game used to validate CFR implementations
//! because the two-player game has a known, mathematically proven Nash
//! equilibrium. This version supports any number of players.
//!
//! ## Game Rules
//!
//! - `N` players, `N + 1` cards ranked 0 (Jack) upward
//! - Every player antes 1 chip and is dealt one card (chance node per deal)
//! - Players act in turn: Pass or Bet (1 chip)
//! - Once someone bets, every other player acts exactly once more:
//!   Bet to call, Pass to fold
//! - Highest card among the players still in wins the pot
//!
//! ## Two-Player Game Tree
//!
//! ```text
//! P1 (first to act)
//! ├── Pass
//! │   └── P2
//! │       ├── Pass → Showdown (pot = 2)
//! │       └── Bet
//! │           └── P1
//! │               ├── Pass → P2 wins (pot = 3)
//! │               └── Bet → Showdown (pot = 4)
//! └── Bet
//!     └── P2
//!         ├── Pass → P1 wins (pot = 3)
//!         └── Bet → Showdown (pot = 4)
//! ```
//!
//! ## Known Nash Equilibrium (two players)
//!
//! - **Player 1 with Jack**: Bet with probability α ∈ [0, 1/3]
//! - **Player 1 with Queen**: Always Pass
//! - **Player 1 with King**: Bet with probability 3α
//! - **Player 2 facing Bet with Jack**: Always Fold
//! - **Player 2 facing Bet with Queen**: Call with probability 1/3
//! - **Player 2 facing Bet with King**: Always Call
//!
//! **Expected Value**: Player 1 EV = -1/18 ≈ -0.0556

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cfr::game::{Action, Game, GameState, InfoState, Turn};

/// Actions in Kuhn Poker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KuhnAction {
    /// Pass (check if no bet, fold if facing bet)
    Pass,
    /// Bet (or call if facing bet)
    Bet,
    /// Chance: deal this card to the next player
    Deal(u8),
}

impl Action for KuhnAction {
    fn to_string(&self) -> String {
        match self {
            KuhnAction::Pass => "p".to_string(),
            KuhnAction::Bet => "b".to_string(),
            KuhnAction::Deal(card) => format!("d{}", card),
        }
    }
}

impl fmt::Display for KuhnAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KuhnAction::Pass => write!(f, "Pass"),
            KuhnAction::Bet => write!(f, "Bet"),
            KuhnAction::Deal(card) => write!(f, "Deal {}", KuhnPoker::card_name(*card)),
        }
    }
}

/// Information state in Kuhn Poker.
///
/// What a player knows: their card and the public betting history.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KuhnInfoState {
    /// Player's card (0=Jack, 1=Queen, 2=King, ...)
    pub card: u8,
    /// Action history as string (e.g., "pb" = pass then bet)
    pub history: String,
}

impl InfoState for KuhnInfoState {
    fn key(&self) -> String {
        format!("{}:{}", self.card, self.history)
    }
}

impl fmt::Display for KuhnInfoState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", KuhnPoker::card_name(self.card), self.history)
    }
}

/// Complete game state in Kuhn Poker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KuhnState {
    /// Cards dealt so far; `cards[i]` belongs to player `i`.
    pub cards: Vec<u8>,
    /// Betting history as string of 'p' and 'b'.
    pub history: String,
    /// Amount each player has invested in the pot.
    pub pot: Vec<i32>,
}

impl GameState for KuhnState {}

impl fmt::Display for KuhnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cards: Vec<&str> = self.cards.iter().map(|&c| KuhnPoker::card_name(c)).collect();
        write!(f, "Cards:{:?} History:{} Pot:{:?}", cards, self.history, self.pot)
    }
}

/// Kuhn Poker game.
#[derive(Debug, Clone)]
pub struct KuhnPoker {
    num_players: usize,
}

impl Default for KuhnPoker {
    fn default() -> Self {
        Self::new()
    }
}

impl KuhnPoker {
    /// Create the classic two-player game.
    pub fn new() -> Self {
        Self::with_players(2)
    }

    /// Create a game for `num_players` players (at least 2).
    pub fn with_players(num_players: usize) -> Self {
        assert!(num_players >= 2, "Kuhn poker needs at least 2 players");
        Self { num_players }
    }

    /// Number of cards in the deck.
    pub fn num_cards(&self) -> usize {
        self.num_players + 1
    }

    /// Get card name for display.
    pub fn card_name(card: u8) -> &'static str {
        match card {
            0 => "J",
            1 => "Q",
            2 => "K",
            3 => "A",
            _ => "?",
        }
    }

    /// Index in the history of the first bet, if any.
    fn first_bet(history: &str) -> Option<usize> {
        history.find('b')
    }

    fn all_dealt(&self, state: &KuhnState) -> bool {
        state.cards.len() == self.num_players
    }
}

impl Game for KuhnPoker {
    type State = KuhnState;
    type Action = KuhnAction;
    type InfoState = KuhnInfoState;

    fn num_players(&self) -> usize {
        self.num_players
    }

    fn initial_state(&self) -> Self::State {
        KuhnState {
            cards: Vec::with_capacity(self.num_players),
            history: String::new(),
            pot: vec![1; self.num_players], // Everyone antes 1
        }
    }

    fn current_player(&self, state: &Self::State) -> Turn {
        if !self.all_dealt(state) {
            return Turn::Chance;
        }

        let h = &state.history;
        // No bet: everyone passed once. Bet at i: everyone else answered.
        let finished = match Self::first_bet(h) {
            None => h.len() == self.num_players,
            Some(i) => h.len() == i + self.num_players,
        };

        if finished {
            Turn::Terminal
        } else {
            Turn::Player(h.len() % self.num_players)
        }
    }

    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action> {
        match self.current_player(state) {
            Turn::Player(_) => vec![KuhnAction::Pass, KuhnAction::Bet],
            _ => vec![],
        }
    }

    fn chance_outcomes(&self, state: &Self::State) -> Vec<(Self::Action, f64)> {
        let remaining: Vec<u8> = (0..self.num_cards() as u8)
            .filter(|card| !state.cards.contains(card))
            .collect();
        let prob = 1.0 / remaining.len() as f64;
        remaining
            .into_iter()
            .map(|card| (KuhnAction::Deal(card), prob))
            .collect()
    }

    fn apply_action(&self, state: &Self::State, action: &Self::Action) -> Self::State {
        let mut new_state = state.clone();

        match action {
            KuhnAction::Deal(card) => {
                debug_assert!(!state.cards.contains(card), "card {} dealt twice", card);
                new_state.cards.push(*card);
            }
            KuhnAction::Pass => {
                new_state.history.push('p');
            }
            KuhnAction::Bet => {
                // Add 1 to current player's pot contribution
                let player = state.history.len() % self.num_players;
                new_state.history.push('b');
                new_state.pot[player] += 1;
            }
        }

        new_state
    }

    fn returns(&self, state: &Self::State) -> Vec<f64> {
        debug_assert!(self.is_terminal(state), "returns called on non-terminal state");

        // After a bet only the players who put in a second chip contest the pot.
        let contested = Self::first_bet(&state.history).is_some();
        let winner = (0..self.num_players)
            .filter(|&p| !contested || state.pot[p] == 2)
            .max_by_key(|&p| state.cards[p])
            .unwrap_or(0);

        let total: i32 = state.pot.iter().sum();
        (0..self.num_players)
            .map(|p| {
                if p == winner {
                    (total - state.pot[p]) as f64
                } else {
                    -state.pot[p] as f64
                }
            })
            .collect()
    }

    fn info_state(&self, state: &Self::State, player: usize) -> Self::InfoState {
        KuhnInfoState {
            card: state.cards[player],
            history: state.history.clone(),
        }
    }

    fn action_name(&self, action: &Self::Action) -> String {
        format!("{}", action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dealt(cards: &[u8], history: &str) -> KuhnState {
        let game = KuhnPoker::with_players(cards.len());
        let mut state = game.initial_state();
        for &card in cards {
            state = game.apply_action(&state, &KuhnAction::Deal(card));
        }
        for c in history.chars() {
            let action = if c == 'b' { KuhnAction::Bet } else { KuhnAction::Pass };
            state = game.apply_action(&state, &action);
        }
        state
    }

    #[test]
    fn test_kuhn_game_tree() {
        let game = KuhnPoker::new();

        // Dealing is one chance node per player
        let state = game.initial_state();
        assert!(game.is_chance(&state));
        let outcomes = game.chance_outcomes(&state);
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|&(_, p)| p == 1.0 / 3.0));

        let one_card = game.apply_action(&state, &KuhnAction::Deal(2));
        assert!(game.is_chance(&one_card));
        assert_eq!(
            game.chance_outcomes(&one_card),
            vec![(KuhnAction::Deal(0), 0.5), (KuhnAction::Deal(1), 0.5)]
        );

        let dealt_state = dealt(&[2, 0], "");
        assert!(!game.is_chance(&dealt_state));
        assert!(!game.is_terminal(&dealt_state));
        assert_eq!(game.current_player(&dealt_state), Turn::Player(0));
        assert_eq!(
            game.legal_actions(&dealt_state),
            vec![KuhnAction::Pass, KuhnAction::Bet]
        );
        assert_eq!(game.current_player(&dealt(&[2, 0], "pb")), Turn::Player(0));
    }

    #[test]
    fn test_kuhn_terminal_payoffs() {
        let game = KuhnPoker::new();

        // "pp" - both pass, higher card wins
        let pp_state = dealt(&[2, 0], "pp");
        assert!(game.is_terminal(&pp_state));
        assert_eq!(game.returns(&pp_state), vec![1.0, -1.0]);

        // "bp" - bet then fold
        let bp_state = dealt(&[0, 2], "bp");
        assert!(game.is_terminal(&bp_state));
        assert_eq!(game.returns(&bp_state), vec![1.0, -1.0]);

        // "pbp" - pass, bet, fold
        let pbp_state = dealt(&[2, 0], "pbp");
        assert!(game.is_terminal(&pbp_state));
        assert_eq!(game.returns(&pbp_state), vec![-1.0, 1.0]);

        // "bb" - bet then call, showdown
        let bb_state = dealt(&[0, 2], "bb");
        assert!(game.is_terminal(&bb_state));
        assert_eq!(game.returns(&bb_state), vec![-2.0, 2.0]);

        assert!(!game.is_terminal(&dealt(&[0, 2], "pb")));
    }

    #[test]
    fn test_three_player_payoffs() {
        let game = KuhnPoker::with_players(3);

        // Everyone passes: the ace (3) wins the 3 antes.
        let all_pass = dealt(&[3, 1, 0], "ppp");
        assert!(game.is_terminal(&all_pass));
        assert_eq!(game.returns(&all_pass), vec![2.0, -1.0, -1.0]);

        // Player 1 bets, player 2 folds, player 0 calls with the best card.
        let called = dealt(&[3, 1, 0], "pbpb");
        assert!(game.is_terminal(&called));
        assert_eq!(game.returns(&called), vec![3.0, -2.0, -1.0]);

        // Player 0 bets, nobody calls.
        let stolen = dealt(&[0, 3, 2], "bpp");
        assert!(game.is_terminal(&stolen));
        assert_eq!(game.returns(&stolen), vec![2.0, -1.0, -1.0]);

        assert_eq!(game.current_player(&dealt(&[0, 3, 2], "pb")), Turn::Player(2));
        assert_eq!(game.current_player(&dealt(&[0, 3, 2], "ppb")), Turn::Player(0));
        assert!(!game.is_terminal(&dealt(&[0, 3, 2], "ppbp")));
    }

    #[test]
    fn test_returns_are_zero_sum() {
        for players in 2..=4 {
            let game = KuhnPoker::with_players(players);
            let cards: Vec<u8> = (0..players as u8).rev().collect();
            for history in ["pp", "bp", "pbp", "bb", "pbb"] {
                let state = dealt(&cards, history);
                if game.is_terminal(&state) {
                    assert_eq!(game.returns(&state).iter().sum::<f64>(), 0.0);
                }
            }
        }
    }

    #[test]
    fn test_kuhn_info_states() {
        let game = KuhnPoker::new();

        let state = dealt(&[1, 2], "p"); // Q vs K
        assert_eq!(game.current_player(&state), Turn::Player(1));

        // Info state should show P2's card (K=2) and history
        let info = game.info_state(&state, 1);
        assert_eq!(info.card, 2);
        assert_eq!(info.history, "p");
        assert_eq!(info.key(), "2:p");
        assert_eq!(format!("{}", info), "K|p");
    }
}
