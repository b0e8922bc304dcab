//! `brute_reduce_trucks`: try to empty each route entirely by relocating
//! every one of its customers elsewhere via best insertion.

use crate::constructive::insertion_cost;
use crate::model::{Problem, Route, Solution};

fn tau_fn(problem: &Problem, w: usize) -> impl Fn(usize, usize) -> f64 + '_ {
    move |i, j| problem.tau(w, i, j)
}

/// Best feasible `(after_idx, cost)` to insert `node` onto `route`.
fn best_position(problem: &Problem, route: &Route, w: usize, node: &crate::model::Node) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for after_idx in route.iter_all() {
        if after_idx == route.tail() {
            continue;
        }
        if let Some(cost) = insertion_cost(problem, route, after_idx, w, node) {
            if best.map(|(_, c)| cost < c).unwrap_or(true) {
                best = Some((after_idx, cost));
            }
        }
    }
    best
}

/// Attempts, on a clone of the whole solution, to relocate every customer
/// of each route (in route-id order) onto some other route via best
/// insertion. If every customer of a route relocates feasibly, the clone
/// is committed and the route dropped. Returns the number of routes
/// removed this way.
pub fn brute_reduce_trucks(problem: &Problem, solution: &mut Solution) -> usize {
    let mut removed_count = 0;
    let mut route_idx = 0;
    while route_idx < solution.routes().len() {
        let mut trial = solution.clone();
        let customers: Vec<_> = trial.routes()[route_idx].iter_interior().map(|idx| *trial.routes()[route_idx].record(idx)).collect();

        let mut all_relocated = true;
        for rec in &customers {
            let source_idx = trial.routes()[route_idx].iter_interior().find(|&idx| trial.routes()[route_idx].record(idx).id == rec.id);
            if let Some(idx) = source_idx {
                trial.routes_mut()[route_idx].remove_one(idx);
            }

            let node = problem.node(rec.id);
            let mut placed = false;
            for target_idx in 0..trial.routes().len() {
                if target_idx == route_idx {
                    continue;
                }
                let w = trial.routes()[target_idx].workers();
                if let Some((after_idx, _)) = best_position(problem, &trial.routes()[target_idx], w, node) {
                    let target = &mut trial.routes_mut()[target_idx];
                    let new_idx = target.insert_after(after_idx, *rec);
                    target.recompute_aest_forward(after_idx, tau_fn(problem, w));
                    target.recompute_alst_backward(new_idx, tau_fn(problem, w));
                    placed = true;
                    break;
                }
            }
            if !placed {
                all_relocated = false;
                break;
            }
        }

        if all_relocated {
            debug_assert!(trial.routes()[route_idx].is_empty(), "source route should be fully emptied");
            trial.remove_route(route_idx, problem.n());
            trial.recompute_totals(problem);
            *solution = trial;
            removed_count += 1;
        } else {
            route_idx += 1;
        }
    }
    removed_count
}
