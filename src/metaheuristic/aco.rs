//! Ant Colony Optimization driver.

use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use super::common::aco_construct_routes;
use crate::config::SolverConfig;
use crate::local_search;
use crate::model::{Problem, MIN_DELTA};
use crate::state::SearchState;

/// Runs one outer round of `ants` constructions per iteration, keeping the
/// cheapest as the incumbent and updating the pheromone trail from it once
/// per round. `ants == 0` is resolved to the customer count.
pub fn run<R: Rng + ?Sized>(problem: &Problem, state: &mut SearchState, config: &SolverConfig, rng: &mut R) {
    let ants = if config.ants == 0 { problem.num_customers().max(1) } else { config.ants };
    let runtime_budget = Duration::from_secs(config.runtime);

    while state.should_continue(runtime_budget, config.max_iterations) {
        for _ in 0..ants {
            let mut scratch = aco_construct_routes(problem, config, state, rng);
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
        debug!(iteration = state.stats.iterations_done, "aco round complete");
    }

    info!(iterations = state.stats.iterations_done, "aco terminated");
}
