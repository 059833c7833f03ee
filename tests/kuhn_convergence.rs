//! Convergence of the solver on Kuhn poker.

use approx::assert_abs_diff_eq;
use cfr_engine::cfr::{exploitability, expected_returns, nash_conv, CFRConfig, CFRSolver};
use cfr_engine::games::kuhn::{KuhnAction, KuhnPoker};

const NASH_VALUE: f64 = 1.0 / 18.0;

fn solve(game: &KuhnPoker, config: CFRConfig, iterations: u64) -> CFRSolver<KuhnPoker> {
    let mut solver = CFRSolver::new(game.clone(), config);
    for _ in 0..iterations {
        solver.evaluate_and_update_policy();
    }
    solver
}

fn check_nash_kuhn(solver: &CFRSolver<KuhnPoker>) {
    let game = solver.game();
    let policy = solver.average_policy();

    let values = expected_returns(game, &policy);
    assert_eq!(values.len(), 2);
    assert_abs_diff_eq!(values[0], -NASH_VALUE, epsilon = 1e-3);
    assert_abs_diff_eq!(values[1], NASH_VALUE, epsilon = 1e-3);

    assert!(exploitability(game, &policy) <= 0.05);
}

#[test]
fn test_cfr_kuhn_two_players() {
    let solver = solve(&KuhnPoker::new(), CFRConfig::cfr(), 300);
    assert_eq!(solver.iteration(), 300);
    check_nash_kuhn(&solver);
}

#[test]
fn test_cfr_plus_kuhn_two_players() {
    let solver = solve(&KuhnPoker::new(), CFRConfig::cfr_plus(), 200);
    check_nash_kuhn(&solver);
}

#[test]
fn test_vanilla_simultaneous_kuhn_converges() {
    let game = KuhnPoker::new();
    let solver = solve(&game, CFRConfig::vanilla(), 1000);
    assert!(exploitability(&game, &solver.average_policy()) <= 0.05);
}

#[test]
fn test_cfr_kuhn_three_and_four_players() {
    for num_players in [3, 4] {
        let game = KuhnPoker::with_players(num_players);
        let solver = solve(&game, CFRConfig::cfr(), 10);
        let conv = nash_conv(&game, &solver.average_policy());
        assert!(conv <= 1.0, "{} players: NashConv {}", num_players, conv);
    }
}

#[test]
fn test_kuhn_three_players_flag_combinations() {
    let game = KuhnPoker::with_players(3);
    let configs = [
        CFRConfig::vanilla(),
        CFRConfig::vanilla().with_regret_matching_plus(true),
        CFRConfig::vanilla()
            .with_regret_matching_plus(true)
            .with_alternating_updates(true),
        CFRConfig::cfr_plus(),
    ];

    for config in configs {
        let solver = solve(&game, config, 10);
        let conv = nash_conv(&game, &solver.average_policy());
        assert!(conv <= 1.0, "{}: NashConv {}", config.label(), conv);
    }
}

#[test]
fn test_kuhn_equilibrium_strategies() {
    let solver = solve(&KuhnPoker::new(), CFRConfig::cfr_plus(), 1000);
    let policy = solver.average_policy();
    let bet = |key: &str| {
        policy
            .probability(key, &KuhnAction::Bet)
            .unwrap_or_else(|| panic!("missing info set {}", key))
    };

    // Second player facing a bet: Jack folds, Queen calls a third, King calls.
    assert_abs_diff_eq!(bet("0:b"), 0.0, epsilon = 0.05);
    assert_abs_diff_eq!(bet("1:b"), 1.0 / 3.0, epsilon = 0.05);
    assert_abs_diff_eq!(bet("2:b"), 1.0, epsilon = 0.05);

    // First player: Queen checks, King bets three times as often as Jack.
    assert_abs_diff_eq!(bet("1:"), 0.0, epsilon = 0.05);
    let jack = bet("0:");
    assert!(jack <= 1.0 / 3.0 + 0.05);
    assert_abs_diff_eq!(bet("2:"), 3.0 * jack, epsilon = 0.1);
}

#[test]
fn test_average_policy_covers_every_info_set() {
    let game = KuhnPoker::with_players(3);
    let solver = solve(&game, CFRConfig::cfr(), 1);
    let policy = solver.average_policy();

    assert_eq!(policy.len(), solver.num_info_sets());
    for key in policy.keys() {
        let probs = policy.get(key).unwrap();
        assert_eq!(probs.len(), 2);
        assert_abs_diff_eq!(probs.iter().map(|(_, p)| p).sum::<f64>(), 1.0, epsilon = 1e-9);
    }
}
