//! `reduce_service_workers`: shrink a route's worker count as far as
//! time-window feasibility allows.

use crate::feasibility::is_feasible_with;
use crate::model::{Problem, Route, Solution};

fn tau_fn(problem: &Problem, w: usize) -> impl Fn(usize, usize) -> f64 + '_ {
    move |i, j| problem.tau(w, i, j)
}

/// Decrements `route.workers()` one at a time while it stays `>= 1` and the
/// route remains feasible at the lower count, committing `aest`/`alst` at
/// the new worker count after each step. Returns how many workers were
/// shed. A route already at one worker, or infeasible at `w − 1`, is left
/// untouched and returns `0` (idempotent).
pub fn reduce_service_workers(problem: &Problem, route: &mut Route) -> usize {
    let mut shed = 0;
    while route.workers() > 1 && is_feasible_with(problem, route, route.workers() - 1) {
        let new_w = route.workers() - 1;
        route.set_workers(new_w);
        route.recompute_all(tau_fn(problem, new_w));
        shed += 1;
    }
    shed
}

/// Applies [`reduce_service_workers`] to every route in `solution`.
/// Returns the total number of workers shed across all routes.
pub fn reduce_service_workers_all(problem: &Problem, solution: &mut Solution) -> usize {
    let mut total = 0;
    for route in solution.routes_mut() {
        total += reduce_service_workers(problem, route);
    }
    solution.recompute_totals(problem);
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::problem::{CostWeights, I1Params};
    use crate::model::Node;

    fn problem() -> Problem {
        let nodes = vec![
            Node::new(0, 0.0, 0.0, 0, 0.0, 10000.0, 0.0),
            Node::new(1, 5.0, 0.0, 5, 0.0, 10000.0, 10.0),
        ];
        Problem::new(
            "t".into(),
            nodes,
            100,
            3,
            I1Params { alpha: 1.0, mu: 1.0, lambda: 2.0 },
            CostWeights { truck: 1_000_000.0, worker: 1_000.0, distance: 1.0 },
        )
    }

    #[test]
    fn test_reduce_service_workers_sheds_down_to_feasible_floor() {
        let p = problem();
        let depot = p.depot().clone();
        let mut route = Route::new_with_seed(0, 1, &depot, p.nodes[1].record(), 3);
        route.recompute_all(|i, j| p.tau(3, i, j));
        let shed = reduce_service_workers(&p, &mut route);
        assert!(shed > 0);
        assert!(route.workers() >= 1);
    }

    #[test]
    fn test_reduce_service_workers_idempotent_on_second_call() {
        let p = problem();
        let depot = p.depot().clone();
        let mut route = Route::new_with_seed(0, 1, &depot, p.nodes[1].record(), 3);
        route.recompute_all(|i, j| p.tau(3, i, j));
        reduce_service_workers(&p, &mut route);
        let w_after_first = route.workers();
        let shed_again = reduce_service_workers(&p, &mut route);
        assert_eq!(shed_again, 0);
        assert_eq!(route.workers(), w_after_first);
    }
}
