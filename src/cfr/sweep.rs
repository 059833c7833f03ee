//! Running independent solvers in parallel.
//!
//! A single solver is strictly sequential. Parallelism comes from solving
//! several configurations (or games) at once, one solver per rayon task.

use rayon::prelude::*;

use crate::cfr::config::{CFRConfig, CFRStats};
use crate::cfr::game::Game;
use crate::cfr::policy::TabularPolicy;
use crate::cfr::solver::CFRSolver;

/// Outcome of one solver in a sweep.
#[derive(Debug, Clone)]
pub struct SweepResult<A> {
    /// Configuration the solver ran with.
    pub config: CFRConfig,
    /// Average policy after the last iteration.
    pub average_policy: TabularPolicy<A>,
    /// Training statistics.
    pub stats: CFRStats,
}

/// Train one fresh solver per configuration for `iterations` iterations.
///
/// Results come back in the order of `configs`.
pub fn solve_configurations<G: Game>(
    game: &G,
    configs: &[CFRConfig],
    iterations: u64,
) -> Vec<SweepResult<G::Action>> {
    log::info!(
        "sweeping {} configurations for {} iterations",
        configs.len(),
        iterations
    );

    configs
        .par_iter()
        .map(|&config| {
            let mut solver = CFRSolver::new(game.clone(), config);
            let stats = solver.train(iterations).clone();
            SweepResult {
                config,
                average_policy: solver.average_policy(),
                stats,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::kuhn::KuhnPoker;

    #[test]
    fn test_sweep_matches_sequential_solver() {
        let game = KuhnPoker::new();
        let configs = CFRConfig::all_variants();
        let results = solve_configurations(&game, &configs, 5);

        assert_eq!(results.len(), configs.len());
        for (result, config) in results.iter().zip(&configs) {
            assert_eq!(&result.config, config);
            assert_eq!(result.stats.iterations, 5);

            let mut solver = CFRSolver::new(game.clone(), *config);
            solver.train(5);
            let expected = solver.average_policy();
            for key in expected.keys() {
                assert_eq!(result.average_policy.get(key), expected.get(key));
            }
        }
    }
}
