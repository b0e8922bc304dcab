//! Metaheuristic drivers and the top-level dispatch that picks one from
//! configuration.

mod aco;
mod cached_aco;
mod cached_grasp;
mod common;
mod grasp;
mod ts;
mod vns;

use rand::Rng;

use crate::config::{Metaheuristic, SolverConfig, StartHeuristic};
use crate::constructive::solomon_deterministic;
use crate::model::{Problem, Solution};
use crate::state::SearchState;

/// Runs the configured metaheuristic to termination and returns the
/// incumbent solution alongside the run's statistics.
///
/// `Metaheuristic::None` runs construction plus local search exactly once
/// (no outer loop) and is also what `deterministic` mode resolves to; when
/// `config.deterministic` is set, construction skips the configured
/// `start_heuristic` entirely and uses the plain deterministic Solomon I1
/// pass, since "deterministic insertion" names a distinct, non-random
/// construction rule, not merely a seeded one.
/// `Metaheuristic::Gaco` ("greedy ACO") is the ACO driver with
/// `start_heuristic` forced to `Parallel` regardless of what the config
/// says, since the parallel-construction variant described alongside TS
/// and VNS is the only construction strategy that behaves greedily
/// (seed-then-fill one insertion at a time) rather than node-at-a-time
/// along a single growing route.
pub fn solve<R: Rng + ?Sized>(problem: &Problem, config: &SolverConfig, rng: &mut R) -> (Solution, crate::state::Stats) {
    let with_cache = matches!(config.metaheuristic, Metaheuristic::CachedAco | Metaheuristic::CachedGrasp);
    let tabu_active = matches!(config.metaheuristic, Metaheuristic::Ts);
    let mut state = SearchState::new(problem, config, Solution::new(Vec::new()), tabu_active, with_cache);

    match config.metaheuristic {
        Metaheuristic::None => {
            let mut scratch = if config.deterministic {
                solomon_deterministic(problem, config.max_workers)
            } else {
                common::aco_construct_routes(problem, config, &mut state, rng)
            };
            crate::local_search::run(problem, &mut scratch, &mut state.tabu, config);
            scratch.recompute_totals(problem);
            state.incumbent = scratch;
            state.stats.iterations_done = 1;
        }
        Metaheuristic::Aco => aco::run(problem, &mut state, config, rng),
        Metaheuristic::CachedAco => cached_aco::run(problem, &mut state, config, rng),
        Metaheuristic::Gaco => {
            let mut forced = config.clone();
            forced.start_heuristic = StartHeuristic::Parallel;
            aco::run(problem, &mut state, &forced, rng);
        }
        Metaheuristic::Grasp => grasp::run(problem, &mut state, config, rng),
        Metaheuristic::CachedGrasp => cached_grasp::run(problem, &mut state, config, rng),
        Metaheuristic::Ts => ts::run(problem, &mut state, config, rng),
        Metaheuristic::Vns => vns::run(problem, &mut state, config, rng),
    }

    (state.incumbent, state.stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::problem::{CostWeights, I1Params};
    use crate::model::Node;
    use crate::rng::seeded_rng;

    fn tiny_problem() -> Problem {
        let nodes = vec![
            Node::new(0, 0.0, 0.0, 0, 0.0, 1000.0, 0.0),
            Node::new(1, 10.0, 0.0, 10, 0.0, 1000.0, 1.0),
            Node::new(2, 20.0, 0.0, 10, 0.0, 1000.0, 1.0),
        ];
        Problem::new(
            "t".into(),
            nodes,
            100,
            1,
            I1Params { alpha: 1.0, mu: 1.0, lambda: 2.0 },
            CostWeights { truck: 1e6, worker: 1e3, distance: 1.0 },
        )
    }

    #[test]
    fn test_none_solves_in_a_single_pass() {
        let problem = tiny_problem();
        let config = SolverConfig { metaheuristic: Metaheuristic::None, ..SolverConfig::default() };
        let mut rng = seeded_rng(1);
        let (solution, stats) = solve(&problem, &config, &mut rng);
        let mut ids = solution.routed_ids();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(stats.iterations_done, 1);
    }

    #[test]
    fn test_gaco_dispatches_to_aco_with_parallel_construction() {
        let problem = tiny_problem();
        let config = SolverConfig {
            metaheuristic: Metaheuristic::Gaco,
            ants: 2,
            max_iterations: 2,
            runtime: 0,
            ..SolverConfig::default()
        };
        let mut rng = seeded_rng(2);
        let (solution, _) = solve(&problem, &config, &mut rng);
        let mut ids = solution.routed_ids();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_ts_enables_tabu_list() {
        let problem = tiny_problem();
        let config = SolverConfig { metaheuristic: Metaheuristic::Ts, max_iterations: 3, runtime: 0, ..SolverConfig::default() };
        let mut rng = seeded_rng(3);
        let (solution, _) = solve(&problem, &config, &mut rng);
        let mut ids = solution.routed_ids();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2]);
    }
}
