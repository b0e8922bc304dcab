//! GRASP driver: one construct-and-improve cycle per iteration, no
//! pheromone feedback.

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
        local_search::run(problem, &mut scratch, &mut state.tabu, config);
        scratch.recompute_totals(problem);

        if state.incumbent.trucks() == 0 || scratch.cost() < state.incumbent.cost() - MIN_DELTA {
            state.incumbent = scratch;
            info!(cost = state.incumbent.cost(), trucks = state.incumbent.trucks(), "new incumbent found");
        }

        state.stats.iterations_done += 1;
        debug!(iteration = state.stats.iterations_done, "grasp iteration complete");
    }

    info!(iterations = state.stats.iterations_done, "grasp terminated");
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
    fn test_run_produces_a_feasible_incumbent() {
        let problem = tiny_problem();
        let mut config = SolverConfig::default();
        config.max_iterations = 3;
        config.runtime = 0;
        let mut state = SearchState::new(&problem, &config, Solution::new(Vec::new()), false, false);
        let mut rng = seeded_rng(11);
        run(&problem, &mut state, &config, &mut rng);
        let mut ids = state.incumbent.routed_ids();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2]);
    }
}
