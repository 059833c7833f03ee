//! One-shot normal-form games played as sequential turns.
//!
//! Every player picks one action in turn order without seeing the earlier
//! picks, so each player has a single information set. This is how
//! simultaneous-move games are fed to the extensive-form solver.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cfr::game::{Action, Game, InfoState, Turn};

/// Index of the chosen action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Choice(pub usize);

impl Action for Choice {
    fn to_string(&self) -> String {
        self.0.to_string()
    }
}

/// Actions chosen so far, in player order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NormalFormState {
    /// `choices[i]` is player `i`'s action.
    pub choices: Vec<usize>,
}

crate::impl_game_state!(NormalFormState);

/// A player's only information: who they are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeatInfoState {
    /// Acting player.
    pub player: usize,
}

impl InfoState for SeatInfoState {
    fn key(&self) -> String {
        format!("p{}", self.player)
    }
}

/// A normal-form game over any number of players.
#[derive(Debug, Clone)]
pub struct NormalFormGame {
    name: String,
    action_names: Vec<Vec<String>>,
    /// One utility vector per joint action, row-major over players.
    utilities: Vec<Vec<f64>>,
}

impl NormalFormGame {
    /// Build a game by evaluating `utility` on every joint action.
    pub fn from_fn<F>(name: &str, action_names: Vec<Vec<String>>, utility: F) -> Self
    where
        F: Fn(&[usize]) -> Vec<f64>,
    {
        let counts: Vec<usize> = action_names.iter().map(Vec::len).collect();
        let total: usize = counts.iter().product();

        let mut utilities = Vec::with_capacity(total);
        let mut joint = vec![0; counts.len()];
        for _ in 0..total {
            let u = utility(&joint);
            assert_eq!(u.len(), counts.len(), "one utility per player");
            utilities.push(u);

            // Advance the last player's choice fastest.
            for p in (0..joint.len()).rev() {
                joint[p] += 1;
                if joint[p] < counts[p] {
                    break;
                }
                joint[p] = 0;
            }
        }

        Self {
            name: name.to_string(),
            action_names,
            utilities,
        }
    }

    /// Two-player bimatrix game from row and column payoff matrices.
    pub fn matrix(
        name: &str,
        row_actions: &[&str],
        col_actions: &[&str],
        row_utilities: &[&[f64]],
        col_utilities: &[&[f64]],
    ) -> Self {
        let names = vec![
            row_actions.iter().map(|s| s.to_string()).collect(),
            col_actions.iter().map(|s| s.to_string()).collect(),
        ];
        Self::from_fn(name, names, |joint| {
            vec![
                row_utilities[joint[0]][joint[1]],
                col_utilities[joint[0]][joint[1]],
            ]
        })
    }

    /// Zero-sum game from the row player's payoffs.
    pub fn zero_sum(name: &str, actions: &[&str], row_utilities: &[&[f64]]) -> Self {
        let col: Vec<Vec<f64>> = row_utilities
            .iter()
            .map(|row| row.iter().map(|u| -u).collect())
            .collect();
        let col_refs: Vec<&[f64]> = col.iter().map(Vec::as_slice).collect();
        Self::matrix(name, actions, actions, row_utilities, &col_refs)
    }

    /// Rock-paper-scissors.
    pub fn rock_paper_scissors() -> Self {
        Self::zero_sum(
            "rock_paper_scissors",
            &["Rock", "Paper", "Scissors"],
            &[&[0.0, -1.0, 1.0], &[1.0, 0.0, -1.0], &[-1.0, 1.0, 0.0]],
        )
    }

    /// Shapley's general-sum game; its only equilibrium is uniform.
    pub fn shapleys_game() -> Self {
        Self::matrix(
            "shapleys_game",
            &["Rock", "Paper", "Scissors"],
            &["Rock", "Paper", "Scissors"],
            &[&[0.0, 0.0, 1.0], &[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]],
            &[&[0.0, 1.0, 0.0], &[0.0, 0.0, 1.0], &[1.0, 0.0, 0.0]],
        )
    }

    /// Three-player matching pennies.
    ///
    /// Player 0 wants to match player 1, player 1 wants to match player 2,
    /// player 2 wants to differ from player 0. The only equilibrium is uniform.
    pub fn matching_pennies_3p() -> Self {
        let coin = || vec!["Heads".to_string(), "Tails".to_string()];
        Self::from_fn("matching_pennies_3p", vec![coin(), coin(), coin()], |c| {
            let sign = |win: bool| if win { 1.0 } else { -1.0 };
            vec![sign(c[0] == c[1]), sign(c[1] == c[2]), sign(c[2] != c[0])]
        })
    }

    /// Game name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Action names of one player.
    pub fn action_names(&self, player: usize) -> &[String] {
        &self.action_names[player]
    }

    /// Utilities of a complete joint action.
    pub fn utilities(&self, joint: &[usize]) -> &[f64] {
        let index = joint
            .iter()
            .zip(&self.action_names)
            .fold(0, |acc, (&choice, names)| acc * names.len() + choice);
        &self.utilities[index]
    }
}

impl fmt::Display for NormalFormGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} players)", self.name, self.action_names.len())
    }
}

impl Game for NormalFormGame {
    type State = NormalFormState;
    type Action = Choice;
    type InfoState = SeatInfoState;

    fn num_players(&self) -> usize {
        self.action_names.len()
    }

    fn initial_state(&self) -> Self::State {
        NormalFormState::default()
    }

    fn current_player(&self, state: &Self::State) -> Turn {
        if state.choices.len() == self.num_players() {
            Turn::Terminal
        } else {
            Turn::Player(state.choices.len())
        }
    }

    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action> {
        match self.current_player(state) {
            Turn::Player(p) => (0..self.action_names[p].len()).map(Choice).collect(),
            _ => Vec::new(),
        }
    }

    fn apply_action(&self, state: &Self::State, action: &Self::Action) -> Self::State {
        let mut new_state = state.clone();
        new_state.choices.push(action.0);
        new_state
    }

    fn returns(&self, state: &Self::State) -> Vec<f64> {
        self.utilities(&state.choices).to_vec()
    }

    fn info_state(&self, _state: &Self::State, player: usize) -> Self::InfoState {
        SeatInfoState { player }
    }

    fn action_name(&self, action: &Self::Action) -> String {
        // Names of the first player; all built-in games share action labels.
        self.action_names[0]
            .get(action.0)
            .cloned()
            .unwrap_or_else(|| action.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(game: &NormalFormGame, choices: &[usize]) -> Vec<f64> {
        let mut state = game.initial_state();
        for &c in choices {
            assert!(matches!(game.current_player(&state), Turn::Player(_)));
            state = game.apply_action(&state, &Choice(c));
        }
        assert!(game.is_terminal(&state));
        game.returns(&state)
    }

    #[test]
    fn test_rock_paper_scissors() {
        let game = NormalFormGame::rock_paper_scissors();
        assert_eq!(play(&game, &[1, 0]), vec![1.0, -1.0]); // paper beats rock
        assert_eq!(play(&game, &[2, 0]), vec![-1.0, 1.0]);
        assert_eq!(play(&game, &[2, 2]), vec![0.0, 0.0]);
        assert_eq!(game.action_name(&Choice(1)), "Paper");
    }

    #[test]
    fn test_shapleys_game() {
        let game = NormalFormGame::shapleys_game();
        assert_eq!(play(&game, &[0, 2]), vec![1.0, 0.0]);
        assert_eq!(play(&game, &[0, 1]), vec![0.0, 1.0]);
        assert_eq!(play(&game, &[1, 1]), vec![0.0, 0.0]);
    }

    #[test]
    fn test_matching_pennies_3p() {
        let game = NormalFormGame::matching_pennies_3p();
        assert_eq!(game.num_players(), 3);
        assert_eq!(play(&game, &[0, 0, 0]), vec![1.0, 1.0, -1.0]);
        assert_eq!(play(&game, &[0, 1, 0]), vec![-1.0, -1.0, -1.0]);
        assert_eq!(play(&game, &[1, 1, 0]), vec![1.0, -1.0, 1.0]);
    }

    #[test]
    fn test_players_share_no_information() {
        let game = NormalFormGame::rock_paper_scissors();
        let a = game.apply_action(&game.initial_state(), &Choice(0));
        let b = game.apply_action(&game.initial_state(), &Choice(2));
        assert_eq!(game.info_state(&a, 1).key(), game.info_state(&b, 1).key());
        assert_eq!(game.info_state(&game.initial_state(), 0).key(), "p0");
    }
}
