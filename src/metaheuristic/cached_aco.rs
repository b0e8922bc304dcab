//! Cached variant of the ACO driver: a solution whose cost hash has been
//! seen before skips local search entirely.

use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use super::common::aco_construct_routes;
use crate::config::SolverConfig;
use crate::local_search;
use crate::model::{Problem, MIN_DELTA};
use crate::state::SearchState;

/// Same outer structure as [`super::aco::run`], but after construction the
/// solution's cost is hashed and looked up in `state.cache` before local
/// search runs; a hit skips local search and records the saturation time
/// on its first occurrence.
pub fn run<R: Rng + ?Sized>(problem: &Problem, state: &mut SearchState, config: &SolverConfig, rng: &mut R) {
    let ants = if config.ants == 0 { problem.num_customers().max(1) } else { config.ants };
    let runtime_budget = Duration::from_secs(config.runtime);

    while state.should_continue(runtime_budget, config.max_iterations) {
        for _ in 0..ants {
            let mut scratch = aco_construct_routes(problem, config, state, rng);
            scratch.recompute_totals(problem);
            let cost = scratch.cost();

            let hit = {
                let cache = state.cache.as_mut().expect("cached_aco requires a solution cache");
                cache.contains(cost)
            };
            if hit > 0 {
                state.mark_saturation_if_unset();
                state.stats.ants_run += 1;
                continue;
            }
            state.cache.as_mut().expect("cached_aco requires a solution cache").add(cost);

            local_search::run(problem, &mut scratch, &mut state.tabu, config);
            scratch.recompute_totals(problem);

            if state.incumbent.trucks() == 0 || scratch.cost() < state.incumbent.cost() - MIN_DELTA {
                state.incumbent = scratch;
                info!(cost = state.incumbent.cost(), trucks = state.incumbent.trucks(), "new incumbent found");
            }
            state.stats.ants_run += 1;
        }

        state.pheromone.update(&state.incumbent, config.rho, config.min_pheromone);
        state.stats.iterations_done += 1;
        debug!(iteration = state.stats.iterations_done, "cached aco round complete");
    }

    info!(iterations = state.stats.iterations_done, "cached aco terminated");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::problem::{CostWeights, I1Params};
    use crate::model::{Node, Solution};
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
    fn test_cached_run_populates_incumbent_and_cache() {
        let problem = tiny_problem();
        let mut config = SolverConfig::default();
        config.ants = 3;
        config.max_iterations = 3;
        config.runtime = 0;
        let mut state = SearchState::new(&problem, &config, Solution::new(Vec::new()), false, true);
        let mut rng = seeded_rng(7);
        run(&problem, &mut state, &config, &mut rng);
        assert!(state.incumbent.trucks() > 0);
        assert!(!state.cache.as_ref().unwrap().is_empty());
    }
}
