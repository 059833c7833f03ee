//! Policy evaluation: expected returns, best responses and NashConv.
//!
//! These walk the full game tree, so they are meant for the small benchmark
//! games used to validate the solver.

use rustc_hash::FxHashMap;

use crate::cfr::game::{Game, InfoState, Turn};
use crate::cfr::policy::Policy;

/// Expected return of every player when all players follow `policy`.
pub fn expected_returns<G, P>(game: &G, policy: &P) -> Vec<f64>
where
    G: Game,
    P: Policy<G::Action>,
{
    state_values(game, policy, &game.initial_state())
}

fn state_values<G, P>(game: &G, policy: &P, state: &G::State) -> Vec<f64>
where
    G: Game,
    P: Policy<G::Action>,
{
    let weighted_children: Vec<(f64, G::State)> = match game.current_player(state) {
        Turn::Terminal => return game.returns(state),
        Turn::Chance => game
            .chance_outcomes(state)
            .into_iter()
            .map(|(outcome, prob)| (prob, game.apply_action(state, &outcome)))
            .collect(),
        Turn::Player(player) => {
            let actions = game.legal_actions(state);
            let key = game.info_state(state, player).key();
            policy
                .probabilities(&key, &actions)
                .into_iter()
                .zip(&actions)
                .map(|(prob, action)| (prob, game.apply_action(state, action)))
                .collect()
        }
    };

    let mut values = vec![0.0; game.num_players()];
    for (prob, child) in weighted_children {
        if prob == 0.0 {
            continue;
        }
        for (v, cv) in values.iter_mut().zip(state_values(game, policy, &child)) {
            *v += prob * cv;
        }
    }
    values
}

/// Best response of one player against a fixed policy for everyone else.
///
/// The responder picks one action per information set, maximizing value
/// summed over the histories in that set weighted by the opponents' and
/// chance's reach.
pub struct BestResponse<'a, G: Game, P> {
    game: &'a G,
    policy: &'a P,
    player: usize,
    /// Histories of each responder information set with their weights.
    infosets: FxHashMap<String, Vec<(G::State, f64)>>,
    /// Chosen action index per responder information set.
    best_actions: FxHashMap<String, usize>,
}

impl<'a, G, P> BestResponse<'a, G, P>
where
    G: Game,
    P: Policy<G::Action>,
{
    /// Prepare a best response for `player` against `policy`.
    pub fn new(game: &'a G, policy: &'a P, player: usize) -> Self {
        let mut response = Self {
            game,
            policy,
            player,
            infosets: FxHashMap::default(),
            best_actions: FxHashMap::default(),
        };
        response.collect_infosets(&game.initial_state(), 1.0);
        response
    }

    fn collect_infosets(&mut self, state: &G::State, reach: f64) {
        match self.game.current_player(state) {
            Turn::Terminal => {}
            Turn::Chance => {
                for (outcome, prob) in self.game.chance_outcomes(state) {
                    let child = self.game.apply_action(state, &outcome);
                    self.collect_infosets(&child, reach * prob);
                }
            }
            Turn::Player(p) if p == self.player => {
                let key = self.game.info_state(state, p).key();
                self.infosets
                    .entry(key)
                    .or_default()
                    .push((state.clone(), reach));
                for action in self.game.legal_actions(state) {
                    let child = self.game.apply_action(state, &action);
                    self.collect_infosets(&child, reach);
                }
            }
            Turn::Player(p) => {
                let actions = self.game.legal_actions(state);
                let key = self.game.info_state(state, p).key();
                let probs = self.policy.probabilities(&key, &actions);
                for (action, prob) in actions.iter().zip(probs) {
                    let child = self.game.apply_action(state, action);
                    self.collect_infosets(&child, reach * prob);
                }
            }
        }
    }

    /// Value of the responder at the root.
    pub fn value(&mut self) -> f64 {
        let root = self.game.initial_state();
        self.state_value(&root)
    }

    fn state_value(&mut self, state: &G::State) -> f64 {
        match self.game.current_player(state) {
            Turn::Terminal => self.game.returns(state)[self.player],
            Turn::Chance => {
                let mut value = 0.0;
                for (outcome, prob) in self.game.chance_outcomes(state) {
                    let child = self.game.apply_action(state, &outcome);
                    value += prob * self.state_value(&child);
                }
                value
            }
            Turn::Player(p) if p == self.player => {
                let key = self.game.info_state(state, p).key();
                let actions = self.game.legal_actions(state);
                let best = self.best_action(&key, actions.len());
                let child = self.game.apply_action(state, &actions[best]);
                self.state_value(&child)
            }
            Turn::Player(p) => {
                let actions = self.game.legal_actions(state);
                let key = self.game.info_state(state, p).key();
                let probs = self.policy.probabilities(&key, &actions);
                let mut value = 0.0;
                for (action, prob) in actions.iter().zip(probs) {
                    if prob == 0.0 {
                        continue;
                    }
                    let child = self.game.apply_action(state, action);
                    value += prob * self.state_value(&child);
                }
                value
            }
        }
    }

    /// Index of the best action at a responder information set.
    ///
    /// Ties go to the first action in enumeration order.
    pub fn best_action(&mut self, info_key: &str, num_actions: usize) -> usize {
        if let Some(&best) = self.best_actions.get(info_key) {
            return best;
        }

        let histories = self.infosets.get(info_key).cloned().unwrap_or_default();
        let mut action_values = vec![0.0; num_actions];
        for (state, weight) in &histories {
            let actions = self.game.legal_actions(state);
            for (i, action) in actions.iter().enumerate() {
                let child = self.game.apply_action(state, action);
                action_values[i] += weight * self.state_value(&child);
            }
        }

        let mut best = 0;
        for (i, &v) in action_values.iter().enumerate() {
            if v > action_values[best] {
                best = i;
            }
        }
        self.best_actions.insert(info_key.to_string(), best);
        best
    }
}

/// Value `player` obtains by best-responding to `policy`.
pub fn best_response_value<G, P>(game: &G, policy: &P, player: usize) -> f64
where
    G: Game,
    P: Policy<G::Action>,
{
    BestResponse::new(game, policy, player).value()
}

/// Sum over players of what each gains by deviating to a best response.
///
/// Zero exactly at a Nash equilibrium.
pub fn nash_conv<G, P>(game: &G, policy: &P) -> f64
where
    G: Game,
    P: Policy<G::Action>,
{
    let on_policy = expected_returns(game, policy);
    (0..game.num_players())
        .map(|player| best_response_value(game, policy, player) - on_policy[player])
        .sum()
}

/// Average per-player deviation gain, `nash_conv / N`.
pub fn exploitability<G, P>(game: &G, policy: &P) -> f64
where
    G: Game,
    P: Policy<G::Action>,
{
    nash_conv(game, policy) / game.num_players() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfr::policy::{TabularPolicy, UniformPolicy};
    use crate::games::tree::{Branch, TreeGame};
    use approx::assert_abs_diff_eq;

    /// Player 1 guesses a coin player 0 saw; a right guess wins 1.
    fn guess_game() -> TreeGame {
        let mut game = TreeGame::new(2);
        let mut chance = Vec::new();
        for coin in ["heads", "tails"] {
            let mut announce = Vec::new();
            for said in ["H", "T"] {
                let guesses = (0..2)
                    .map(|guess| {
                        let right = (guess == 0) == (coin == "heads");
                        let u = if right { 1.0 } else { -1.0 };
                        game.add_terminal(vec![-u, u])
                    })
                    .collect();
                announce.push(game.add_decision(1, format!("p1:{}", said), guesses));
            }
            let p0 = game.add_decision(0, format!("p0:{}", coin), announce);
            chance.push((0.5, p0));
        }
        let root = game.add_chance(chance);
        game.set_root(root);
        game
    }

    #[test]
    fn test_expected_returns_uniform() {
        let returns = expected_returns(&guess_game(), &UniformPolicy);
        assert_abs_diff_eq!(returns[0], 0.0);
        assert_abs_diff_eq!(returns[1], 0.0);
    }

    #[test]
    fn test_best_response_respects_information_sets() {
        // Player 0 always announces the truth: player 1 can read the coin.
        let mut truthful = TabularPolicy::new();
        truthful.insert("p0:heads", vec![(Branch(0), 1.0), (Branch(1), 0.0)]);
        truthful.insert("p0:tails", vec![(Branch(0), 0.0), (Branch(1), 1.0)]);
        let game = guess_game();
        assert_abs_diff_eq!(best_response_value(&game, &truthful, 1), 1.0);

        // Uniform announcements carry no information.
        assert_abs_diff_eq!(best_response_value(&game, &UniformPolicy, 1), 0.0);
        // Player 0 against a uniform guesser cannot do better than 0.
        assert_abs_diff_eq!(best_response_value(&game, &UniformPolicy, 0), 0.0);
    }

    #[test]
    fn test_nash_conv_of_truthful_policy() {
        let mut truthful = TabularPolicy::new();
        truthful.insert("p0:heads", vec![(Branch(0), 1.0), (Branch(1), 0.0)]);
        truthful.insert("p0:tails", vec![(Branch(0), 0.0), (Branch(1), 1.0)]);
        let game = guess_game();

        // On policy: player 1 still guesses uniformly (value 0). Player 1
        // gains 1 by reading the announcement; player 0 gains nothing.
        assert_abs_diff_eq!(nash_conv(&game, &truthful), 1.0);
        assert_abs_diff_eq!(exploitability(&game, &truthful), 0.5);
        assert_abs_diff_eq!(nash_conv(&game, &UniformPolicy), 0.0);
    }
}
