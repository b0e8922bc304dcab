//! Tabu Search driver: walks to the single best neighbor every iteration,
//! improving or not, while the tabu matrix prevents cycling.

use std::time::Duration;

use rand::Rng;
use tracing::info;

use crate::config::SolverConfig;
use crate::constructive::solomon_deterministic;
use crate::local_search;
use crate::model::{Problem, MIN_DELTA};
use crate::state::{ReductionState, SearchState};

/// Constructs once (deterministic Solomon I1), then repeatedly applies the
/// single best available relocation, accepting it as the new incumbent
/// only when it strictly improves on the running best. Switches the
/// reduction objective from trucks to workers at the halfway point of
/// whichever budget (iterations or runtime) is finite; with both budgets
/// unlimited the run stays in the trucks-reduction phase throughout.
pub fn run<R: Rng + ?Sized>(problem: &Problem, state: &mut SearchState, config: &SolverConfig, rng: &mut R) {
    let _ = rng; // TS's neighborhood exploration is deterministic; kept for a uniform driver signature.

    let mut current = solomon_deterministic(problem, config.max_workers);
    local_search::run(problem, &mut current, &mut state.tabu, config);
    current.recompute_totals(problem);
    state.incumbent = current.clone();

    let runtime_budget = Duration::from_secs(config.runtime);
    let half_iterations = (config.max_iterations > 0).then(|| config.max_iterations / 2);
    let half_runtime = (config.runtime > 0).then(|| Duration::from_secs(config.runtime / 2));

    while state.should_continue(runtime_budget, config.max_iterations) {
        if half_iterations.is_some_and(|half| state.stats.iterations_done >= half) || half_runtime.is_some_and(|half| state.elapsed() >= half) {
            state.reduction_state = ReductionState::ReduceWorkers;
        }

        if let Some(mv) = local_search::best_move(problem, &current, &state.tabu, state.reduction_state, config.max_move as usize) {
            local_search::apply_move(problem, &mut current, &mut state.tabu, mv);
            current.recompute_totals(problem);
            if current.cost() < state.incumbent.cost() - MIN_DELTA {
                state.incumbent = current.clone();
                info!(cost = state.incumbent.cost(), trucks = state.incumbent.trucks(), "new incumbent found");
            }
        }

        state.stats.iterations_done += 1;
    }

    info!(iterations = state.stats.iterations_done, "tabu search terminated");
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
            Node::new(3, -10.0, 0.0, 10, 0.0, 1000.0, 1.0),
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
    fn test_run_terminates_and_covers_all_customers() {
        let problem = tiny_problem();
        let mut config = SolverConfig::default();
        config.max_iterations = 10;
        config.runtime = 0;
        let mut state = SearchState::new(&problem, &config, Solution::new(Vec::new()), true, false);
        let mut rng = seeded_rng(5);
        run(&problem, &mut state, &config, &mut rng);
        let mut ids = state.incumbent.routed_ids();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(state.stats.iterations_done, 10);
    }

    #[test]
    fn test_run_switches_to_reduce_workers_at_halfway() {
        let problem = tiny_problem();
        let mut config = SolverConfig::default();
        config.max_iterations = 4;
        config.runtime = 0;
        let mut state = SearchState::new(&problem, &config, Solution::new(Vec::new()), true, false);
        let mut rng = seeded_rng(5);
        run(&problem, &mut state, &config, &mut rng);
        assert_eq!(state.reduction_state, ReductionState::ReduceWorkers);
    }
}
