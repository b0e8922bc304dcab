//! Cached variant of the GRASP driver.

use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use crate::config::SolverConfig;
use crate::constructive::grasp_construct;
use crate::local_search;
use crate::model::{Problem, MIN_DELTA};
use crate::state::SearchState;

pub fn run<R: Rng + ?Sized>(problem: &Problem, state: &mut SearchState, config: &SolverConfig, rng: &mut R) {
    let runtime_budget = Duration::from_secs(config.runtime);

    while state.should_continue(runtime_budget, config.max_iterations) {
        let mut scratch = grasp_construct(problem, config.max_workers, config.rcl_size, config.use_weights, rng);
        scratch.recompute_totals(problem);
        let cost = scratch.cost();

        let hit = {
            let cache = state.cache.as_mut().expect("cached_grasp requires a solution cache");
            cache.contains(cost)
        };
        if hit > 0 {
            state.mark_saturation_if_unset();
            state.stats.iterations_done += 1;
            continue;
        }
        state.cache.as_mut().expect("cached_grasp requires a solution cache").add(cost);

        local_search::run(problem, &mut scratch, &mut state.tabu, config);
        scratch.recompute_totals(problem);

        if state.incumbent.trucks() == 0 || scratch.cost() < state.incumbent.cost() - MIN_DELTA {
            state.incumbent = scratch;
            info!(cost = state.incumbent.cost(), trucks = state.incumbent.trucks(), "new incumbent found");
        }

        state.stats.iterations_done += 1;
        debug!(iteration = state.stats.iterations_done, "cached grasp iteration complete");
    }

    info!(iterations = state.stats.iterations_done, "cached grasp terminated");
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
    fn test_cached_run_eventually_hits_the_cache() {
        let problem = tiny_problem();
        let mut config = SolverConfig::default();
        config.max_iterations = 5;
        config.runtime = 0;
        config.rcl_size = 0;
        config.use_weights = false;
        let mut state = SearchState::new(&problem, &config, Solution::new(Vec::new()), false, true);
        let mut rng = seeded_rng(3);
        run(&problem, &mut state, &config, &mut rng);
        assert!(state.incumbent.trucks() > 0);
    }
}
