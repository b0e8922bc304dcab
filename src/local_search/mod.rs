//! Local search in three phases reflecting the hierarchical objective:
//! reduce trucks, then workers, then (as a no-op stub) distance.

mod brute;
mod moves;
mod swap;
mod workers;

pub use brute::brute_reduce_trucks;
pub use moves::{apply_move, best_move, move_all};
pub use swap::swap_all;
pub use workers::{reduce_service_workers, reduce_service_workers_all};

use crate::config::SolverConfig;
use crate::model::{Problem, Solution};
use crate::state::ReductionState;
use crate::tabu::TabuList;

/// Phase 1: repeat `brute_reduce_trucks`, `move_all`, `swap_all` until a
/// full round changes nothing.
pub fn reduce_trucks(problem: &Problem, solution: &mut Solution, tabu: &mut TabuList, config: &SolverConfig) {
    loop {
        let mut changed = false;
        changed |= brute_reduce_trucks(problem, solution) > 0;
        changed |= move_all(problem, solution, tabu, ReductionState::ReduceTrucks, config.max_move as usize, config.best_moves) > 0;
        changed |= swap_all(problem, solution, config.max_swap) > 0;
        if !changed {
            break;
        }
    }
    solution.recompute_totals(problem);
}

/// Phase 2: shed service workers on every route, then repeat `move_all` +
/// `swap_all` under the `ReduceWorkers` objective until a round changes
/// nothing.
pub fn reduce_workers(problem: &Problem, solution: &mut Solution, tabu: &mut TabuList, config: &SolverConfig) {
    reduce_service_workers_all(problem, solution);
    loop {
        let mut changed = false;
        changed |= move_all(problem, solution, tabu, ReductionState::ReduceWorkers, config.max_move as usize, config.best_moves) > 0;
        changed |= swap_all(problem, solution, config.max_swap) > 0;
        if !changed {
            break;
        }
    }
    solution.recompute_totals(problem);
}

/// Phase 3: a non-goal. Kept as a stub only so the three-phase structure
/// mirrors the hierarchical objective in full; the public driver API never
/// reaches it.
pub fn reduce_distance(_problem: &Problem, _solution: &mut Solution) {}

/// Runs the full local-search pipeline, or just
/// [`reduce_service_workers_all`] when `config.do_ls` is `false`.
pub fn run(problem: &Problem, solution: &mut Solution, tabu: &mut TabuList, config: &SolverConfig) {
    if !config.do_ls {
        reduce_service_workers_all(problem, solution);
        return;
    }
    reduce_trucks(problem, solution, tabu, config);
    reduce_workers(problem, solution, tabu, config);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::problem::{CostWeights, I1Params};
    use crate::model::{Node, Route};

    fn problem() -> Problem {
        let nodes = vec![
            Node::new(0, 0.0, 0.0, 0, 0.0, 10000.0, 0.0),
            Node::new(1, 1.0, 0.0, 5, 0.0, 10000.0, 0.0),
            Node::new(2, -1.0, 0.0, 5, 0.0, 10000.0, 0.0),
        ];
        Problem::new(
            "t".into(),
            nodes,
            100,
            1,
            I1Params { alpha: 1.0, mu: 1.0, lambda: 2.0 },
            CostWeights { truck: 1_000_000.0, worker: 1_000.0, distance: 1.0 },
        )
    }

    #[test]
    fn test_do_ls_false_only_sheds_workers() {
        let p = problem();
        let depot = p.depot().clone();
        let mut solution = Solution::new(Vec::new());
        let mut r0 = Route::new_with_seed(0, 2, &depot, p.nodes[1].record(), 1);
        r0.recompute_all(|i, j| p.tau(1, i, j));
        let mut r1 = Route::new_with_seed(1, 3, &depot, p.nodes[2].record(), 1);
        r1.recompute_all(|i, j| p.tau(1, i, j));
        solution.push_route(r0);
        solution.push_route(r1);

        let mut config = SolverConfig::default();
        config.do_ls = false;
        let mut tabu = TabuList::new(p.n(), 5, false);
        run(&p, &mut solution, &mut tabu, &config);
        assert_eq!(solution.routes().len(), 2);
    }

    #[test]
    fn test_run_reduces_trucks_when_ls_enabled() {
        let p = problem();
        let depot = p.depot().clone();
        let mut solution = Solution::new(Vec::new());
        let mut r0 = Route::new_with_seed(0, 2, &depot, p.nodes[1].record(), 1);
        r0.recompute_all(|i, j| p.tau(1, i, j));
        let mut r1 = Route::new_with_seed(1, 3, &depot, p.nodes[2].record(), 1);
        r1.recompute_all(|i, j| p.tau(1, i, j));
        solution.push_route(r0);
        solution.push_route(r1);

        let config = SolverConfig::default();
        let mut tabu = TabuList::new(p.n(), 5, false);
        run(&p, &mut solution, &mut tabu, &config);
        assert_eq!(solution.routes().len(), 1);
    }
}
