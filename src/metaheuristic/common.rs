//! Shared construction dispatch used by the ACO-family drivers.

use rand::Rng;
use tracing::debug;

use crate::config::{SolverConfig, StartHeuristic};
use crate::constructive::{parallel_construct, sequential_finish, solomon_stochastic};
use crate::model::{Problem, Solution};
use crate::state::{ReductionState, SearchState};

/// Builds one scratch solution per the configured `start_heuristic`.
///
/// `SolomonMr` ("multi-restart") is not detailed further in the design
/// notes beyond its name; it is implemented here as a small fixed number
/// of independent `solomon_stochastic` restarts, keeping the cheapest.
pub(crate) fn aco_construct_routes<R: Rng + ?Sized>(problem: &Problem, config: &SolverConfig, state: &mut SearchState, rng: &mut R) -> Solution {
    match config.start_heuristic {
        StartHeuristic::Solomon => {
            let mut solution = solomon_stochastic(problem, config.max_workers, &state.pheromone, rng);
            solution.recompute_totals(problem);
            solution
        }
        StartHeuristic::SolomonMr => {
            const RESTARTS: usize = 3;
            let mut best: Option<Solution> = None;
            for _ in 0..RESTARTS {
                let mut candidate = solomon_stochastic(problem, config.max_workers, &state.pheromone, rng);
                candidate.recompute_totals(problem);
                let keep = best.as_ref().map(|b| candidate.cost() < b.cost()).unwrap_or(true);
                if keep {
                    best = Some(candidate);
                }
            }
            best.expect("SolomonMr runs at least one restart")
        }
        StartHeuristic::Parallel => {
            let best_trucks = if state.incumbent.trucks() == 0 {
                problem.num_customers().max(1)
            } else {
                state.incumbent.trucks()
            };
            let mut solution = parallel_construct(problem, config.max_workers, &state.pheromone, best_trucks, rng);
            if !solution.unrouted().is_empty() {
                sequential_finish(problem, config.max_workers, &state.pheromone, &mut solution, rng);
                if state.reduction_state == ReductionState::ReduceTrucks {
                    state.failed_attempts += 1;
                    if state.failed_attempts > config.max_failed_attempts {
                        debug!(failed_attempts = state.failed_attempts, "advancing to reduce-workers after repeated parallel-construction fallbacks");
                        state.reduction_state = ReductionState::ReduceWorkers;
                    }
                }
            }
            solution.recompute_totals(problem);
            solution
        }
    }
}
