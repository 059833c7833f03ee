//! Two-player Leduc Hold'em.
//!
//! A step up from Kuhn Poker: two betting rounds and a public card, small
//! enough for a full-traversal solver.
//!
//! ## Game Rules
//!
//! - Six cards: two suits of Jack, Queen and King
//! - Both players ante 1 chip and get one private card
//! - Round 1: fixed raise of 2 chips, at most two raises
//! - One public card is dealt
//! - Round 2: fixed raise of 4 chips, at most two raises
//! - Player 0 opens both rounds. Folding is only allowed when facing a raise
//! - Showdown: pairing the public card wins, otherwise the higher rank wins,
//!   equal ranks split the pot
//!
//! Suits never matter, so information states only record ranks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cfr::game::{Action, Game, GameState, InfoState, Turn};

/// Number of cards in the deck.
pub const DECK_SIZE: u8 = 6;

/// Maximum raises per betting round.
pub const MAX_RAISES: usize = 2;

/// Raise size of each round.
const RAISE_SIZES: [i32; 2] = [2, 4];

/// Actions in Leduc Hold'em.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeducAction {
    /// Give up the pot (only when facing a raise)
    Fold,
    /// Check, or match the outstanding raise
    Call,
    /// Put in the round's raise size on top of the current bet
    Raise,
    /// Chance: deal this card (0..6, rank = card / 2)
    Deal(u8),
}

impl Action for LeducAction {
    fn to_string(&self) -> String {
        match self {
            LeducAction::Fold => "f".to_string(),
            LeducAction::Call => "c".to_string(),
            LeducAction::Raise => "r".to_string(),
            LeducAction::Deal(card) => format!("d{}", card),
        }
    }
}

impl fmt::Display for LeducAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeducAction::Fold => write!(f, "Fold"),
            LeducAction::Call => write!(f, "Call"),
            LeducAction::Raise => write!(f, "Raise"),
            LeducAction::Deal(card) => write!(f, "Deal {}", LeducPoker::rank_name(*card)),
        }
    }
}

/// What a player knows: own rank, public rank once dealt, betting so far.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeducInfoState {
    /// Rank of the private card (0=Jack, 1=Queen, 2=King)
    pub rank: u8,
    /// Rank of the public card, if dealt
    pub public_rank: Option<u8>,
    /// Betting of each round, e.g. `["rc", "c"]`
    pub rounds: [String; 2],
}

impl InfoState for LeducInfoState {
    fn key(&self) -> String {
        let mut cards = String::with_capacity(2);
        cards.push(LeducPoker::rank_char(self.rank));
        if let Some(public) = self.public_rank {
            cards.push(LeducPoker::rank_char(public));
        }
        format!("{}:{}/{}", cards, self.rounds[0], self.rounds[1])
    }
}

/// Complete game state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeducState {
    /// Private cards dealt so far; `cards[i]` belongs to player `i`.
    pub cards: Vec<u8>,
    /// The public card, dealt between the rounds.
    pub public_card: Option<u8>,
    /// Betting of each round as 'f', 'c' and 'r'.
    pub rounds: [String; 2],
    /// Chips each player has put in.
    pub contributions: [i32; 2],
    /// Player who folded, if any.
    pub folded: Option<usize>,
}

impl GameState for LeducState {}

impl LeducState {
    /// Index of the betting round in progress.
    pub fn round(&self) -> usize {
        if self.public_card.is_some() {
            1
        } else {
            0
        }
    }

    fn round_closed(history: &str) -> bool {
        history.len() >= 2 && history.ends_with('c')
    }

    fn raises(&self) -> usize {
        self.rounds[self.round()].matches('r').count()
    }
}

impl fmt::Display for LeducState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cards: Vec<&str> = self.cards.iter().map(|&c| LeducPoker::rank_name(c)).collect();
        let public = self.public_card.map(LeducPoker::rank_name).unwrap_or("-");
        write!(
            f,
            "Cards:{:?} Public:{} Betting:{}/{} Pot:{:?}",
            cards, public, self.rounds[0], self.rounds[1], self.contributions
        )
    }
}

/// Leduc Hold'em game.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeducPoker;

impl LeducPoker {
    /// Create the game.
    pub fn new() -> Self {
        Self
    }

    /// Rank of a card.
    pub fn rank(card: u8) -> u8 {
        card / 2
    }

    /// Rank name of a card for display.
    pub fn rank_name(card: u8) -> &'static str {
        match Self::rank(card) {
            0 => "J",
            1 => "Q",
            2 => "K",
            _ => "?",
        }
    }

    fn rank_char(rank: u8) -> char {
        match rank {
            0 => 'J',
            1 => 'Q',
            2 => 'K',
            _ => '?',
        }
    }

    /// Hand strength at showdown; higher wins.
    fn strength(card: u8, public_card: u8) -> u8 {
        let rank = Self::rank(card);
        if rank == Self::rank(public_card) {
            10 + rank
        } else {
            rank
        }
    }
}

impl Game for LeducPoker {
    type State = LeducState;
    type Action = LeducAction;
    type InfoState = LeducInfoState;

    fn num_players(&self) -> usize {
        2
    }

    fn initial_state(&self) -> Self::State {
        LeducState {
            cards: Vec::with_capacity(2),
            public_card: None,
            rounds: [String::new(), String::new()],
            contributions: [1, 1],
            folded: None,
        }
    }

    fn current_player(&self, state: &Self::State) -> Turn {
        if state.cards.len() < 2 {
            return Turn::Chance;
        }
        if state.folded.is_some() {
            return Turn::Terminal;
        }

        let round = state.round();
        if LeducState::round_closed(&state.rounds[round]) {
            return if round == 0 { Turn::Chance } else { Turn::Terminal };
        }
        Turn::Player(state.rounds[round].len() % 2)
    }

    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action> {
        let player = match self.current_player(state) {
            Turn::Player(p) => p,
            _ => return Vec::new(),
        };

        let mut actions = Vec::with_capacity(3);
        if state.contributions[player] < state.contributions[1 - player] {
            actions.push(LeducAction::Fold);
        }
        actions.push(LeducAction::Call);
        if state.raises() < MAX_RAISES {
            actions.push(LeducAction::Raise);
        }
        actions
    }

    fn chance_outcomes(&self, state: &Self::State) -> Vec<(Self::Action, f64)> {
        let remaining: Vec<u8> = (0..DECK_SIZE)
            .filter(|card| !state.cards.contains(card) && state.public_card != Some(*card))
            .collect();
        let prob = 1.0 / remaining.len() as f64;
        remaining
            .into_iter()
            .map(|card| (LeducAction::Deal(card), prob))
            .collect()
    }

    fn apply_action(&self, state: &Self::State, action: &Self::Action) -> Self::State {
        let mut new_state = state.clone();
        let round = state.round();
        let player = state.rounds[round].len() % 2;
        let to_match = state.contributions[0].max(state.contributions[1]);

        match action {
            LeducAction::Deal(card) => {
                if state.cards.len() < 2 {
                    new_state.cards.push(*card);
                } else {
                    new_state.public_card = Some(*card);
                }
            }
            LeducAction::Fold => {
                new_state.rounds[round].push('f');
                new_state.folded = Some(player);
            }
            LeducAction::Call => {
                new_state.rounds[round].push('c');
                new_state.contributions[player] = to_match;
            }
            LeducAction::Raise => {
                new_state.rounds[round].push('r');
                new_state.contributions[player] = to_match + RAISE_SIZES[round];
            }
        }

        new_state
    }

    fn returns(&self, state: &Self::State) -> Vec<f64> {
        debug_assert!(self.is_terminal(state), "returns called on non-terminal state");

        let winner = match (state.folded, state.public_card) {
            (Some(loser), _) => Some(1 - loser),
            (None, Some(public)) => {
                let s0 = Self::strength(state.cards[0], public);
                let s1 = Self::strength(state.cards[1], public);
                match s0.cmp(&s1) {
                    std::cmp::Ordering::Greater => Some(0),
                    std::cmp::Ordering::Less => Some(1),
                    std::cmp::Ordering::Equal => None,
                }
            }
            (None, None) => None,
        };

        match winner {
            Some(w) => {
                let won = state.contributions[1 - w] as f64;
                let mut returns = vec![-won; 2];
                returns[w] = won;
                returns
            }
            // Contributions are equal at showdown, so a split nets zero.
            None => vec![0.0, 0.0],
        }
    }

    fn info_state(&self, state: &Self::State, player: usize) -> Self::InfoState {
        LeducInfoState {
            rank: Self::rank(state.cards[player]),
            public_rank: state.public_card.map(Self::rank),
            rounds: state.rounds.clone(),
        }
    }

    fn action_name(&self, action: &Self::Action) -> String {
        format!("{}", action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deal `cards` (private, private, then optional public) and replay betting.
    fn play(cards: &[u8], betting: &str) -> LeducState {
        let game = LeducPoker::new();
        let mut state = game.initial_state();
        for &card in &cards[..2] {
            state = game.apply_action(&state, &LeducAction::Deal(card));
        }
        for c in betting.chars() {
            if c == '/' {
                assert!(game.is_chance(&state));
                state = game.apply_action(&state, &LeducAction::Deal(cards[2]));
                continue;
            }
            let action = match c {
                'f' => LeducAction::Fold,
                'c' => LeducAction::Call,
                _ => LeducAction::Raise,
            };
            assert!(game.legal_actions(&state).contains(&action), "{} illegal at {}", c, state);
            state = game.apply_action(&state, &action);
        }
        state
    }

    #[test]
    fn test_leduc_deal() {
        let game = LeducPoker::new();
        let state = game.initial_state();
        assert!(game.is_chance(&state));
        assert_eq!(game.chance_outcomes(&state).len(), 6);

        let one = game.apply_action(&state, &LeducAction::Deal(4));
        let outcomes = game.chance_outcomes(&one);
        assert_eq!(outcomes.len(), 5);
        assert!(outcomes.iter().all(|&(_, p)| p == 0.2));

        let between = play(&[0, 3, 5], "cc");
        assert!(game.is_chance(&between));
        assert_eq!(game.chance_outcomes(&between).len(), 4);
    }

    #[test]
    fn test_leduc_betting_structure() {
        let game = LeducPoker::new();
        let open = play(&[0, 3], "");
        assert_eq!(game.current_player(&open), Turn::Player(0));
        assert_eq!(game.legal_actions(&open), vec![LeducAction::Call, LeducAction::Raise]);

        let facing = play(&[0, 3], "r");
        assert_eq!(game.current_player(&facing), Turn::Player(1));
        assert_eq!(
            game.legal_actions(&facing),
            vec![LeducAction::Fold, LeducAction::Call, LeducAction::Raise]
        );
        assert_eq!(facing.contributions, [3, 1]);

        // Two raises cap the round.
        let capped = play(&[0, 3], "rr");
        assert_eq!(game.legal_actions(&capped), vec![LeducAction::Fold, LeducAction::Call]);
        assert_eq!(capped.contributions, [3, 5]);

        // Second round raises are 4 and player 0 opens again.
        let second = play(&[0, 3, 4], "rc/r");
        assert_eq!(second.round(), 1);
        assert_eq!(second.contributions, [7, 3]);
        assert_eq!(game.current_player(&second), Turn::Player(1));
        assert!(!game.is_terminal(&play(&[0, 3, 4], "cc/c")));
    }

    #[test]
    fn test_leduc_payoffs() {
        let game = LeducPoker::new();

        // Fold after a raise loses the ante.
        let fold = play(&[0, 5], "rf");
        assert!(game.is_terminal(&fold));
        assert_eq!(game.returns(&fold), vec![1.0, -1.0]);

        // Pair beats a higher card.
        let pair = play(&[0, 5, 1], "cc/rc");
        assert!(game.is_terminal(&pair));
        assert_eq!(game.returns(&pair), vec![5.0, -5.0]);

        // Higher card wins without pairs.
        let high = play(&[0, 5, 2], "rc/cc");
        assert_eq!(game.returns(&high), vec![-3.0, 3.0]);

        // Same rank splits.
        let split = play(&[4, 5, 0], "cc/cc");
        assert_eq!(game.returns(&split), vec![0.0, 0.0]);
    }

    #[test]
    fn test_leduc_info_states() {
        let game = LeducPoker::new();

        let first = play(&[2, 5], "r");
        assert_eq!(game.info_state(&first, 1).key(), "K:r/");

        // Suits are hidden: the other Queen gives the same key.
        let a = play(&[2, 0, 4], "cc/");
        let b = play(&[3, 1, 4], "cc/");
        assert_eq!(game.info_state(&a, 0).key(), "QK:cc/");
        assert_eq!(game.info_state(&a, 0).key(), game.info_state(&b, 0).key());
        assert_ne!(game.info_state(&a, 1).key(), game.info_state(&a, 0).key());
    }
}
