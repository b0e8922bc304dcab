//! Exchanging one customer between two routes (swap1).

use crate::model::{Problem, Route, Solution, MIN_DELTA};

fn tau_fn(problem: &Problem, w: usize) -> impl Fn(usize, usize) -> f64 + '_ {
    move |i, j| problem.tau(w, i, j)
}

fn edge_sum(problem: &Problem, route: &Route, idx: usize) -> f64 {
    let prev = route.prev(idx).expect("edge_sum: no predecessor");
    let next = route.next(idx).expect("edge_sum: no successor");
    problem.distance(route.record(prev).id, route.record(idx).id) + problem.distance(route.record(idx).id, route.record(next).id)
}

fn swapped_edge_sum(problem: &Problem, route: &Route, idx: usize, new_id: usize) -> f64 {
    let prev = route.prev(idx).expect("swapped_edge_sum: no predecessor");
    let next = route.next(idx).expect("swapped_edge_sum: no successor");
    problem.distance(route.record(prev).id, new_id) + problem.distance(new_id, route.record(next).id)
}

/// Would swapping the payload at `idx1` on `r1` with `idx2` on `r2` keep
/// both routes capacity- and time-window-feasible?
fn swap_feasible(problem: &Problem, r1: &Route, idx1: usize, r2: &Route, idx2: usize) -> bool {
    let a = *r1.record(idx1);
    let b = *r2.record(idx2);

    if r1.load() - a.demand + b.demand > problem.capacity {
        return false;
    }
    if r2.load() - b.demand + a.demand > problem.capacity {
        return false;
    }

    let mut clone1 = r1.clone();
    clone1.record_mut(idx1).id = b.id;
    clone1.record_mut(idx1).demand = b.demand;
    clone1.record_mut(idx1).est = b.est;
    clone1.record_mut(idx1).lst = b.lst;
    clone1.record_mut(idx1).service = b.service;
    if !crate::feasibility::is_feasible_with(problem, &mut clone1, clone1.workers()) {
        return false;
    }

    let mut clone2 = r2.clone();
    clone2.record_mut(idx2).id = a.id;
    clone2.record_mut(idx2).demand = a.demand;
    clone2.record_mut(idx2).est = a.est;
    clone2.record_mut(idx2).lst = a.lst;
    clone2.record_mut(idx2).service = a.service;
    crate::feasibility::is_feasible_with(problem, &mut clone2, clone2.workers())
}

fn scan(problem: &Problem, solution: &Solution) -> Option<(usize, usize, usize, usize)> {
    let n_routes = solution.routes().len();
    for r1_idx in 0..n_routes {
        for r2_idx in 0..r1_idx {
            let r1 = &solution.routes()[r1_idx];
            let r2 = &solution.routes()[r2_idx];
            for idx1 in r1.iter_interior() {
                for idx2 in r2.iter_interior() {
                    let id1 = r1.record(idx1).id;
                    let id2 = r2.record(idx2).id;

                    let before = edge_sum(problem, r1, idx1) + edge_sum(problem, r2, idx2);
                    let after = swapped_edge_sum(problem, r1, idx1, id2) + swapped_edge_sum(problem, r2, idx2, id1);
                    if after >= before - MIN_DELTA {
                        continue;
                    }
                    if !swap_feasible(problem, r1, idx1, r2, idx2) {
                        continue;
                    }
                    return Some((r1_idx, idx1, r2_idx, idx2));
                }
            }
        }
    }
    None
}

/// Exchanges single customers between route pairs while it strictly
/// reduces total distance, restarting the scan after each swap. Returns
/// the number of swaps applied.
pub fn swap_all(problem: &Problem, solution: &mut Solution, max_swap: u8) -> usize {
    if max_swap == 0 {
        return 0;
    }
    let mut applied = 0;
    // `scan` always returns r2_idx < r1_idx.
    while let Some((r1_idx, idx1, r2_idx, idx2)) = scan(problem, solution) {
        {
            let (left, right) = solution.routes_mut().split_at_mut(r1_idx);
            let r2 = &mut left[r2_idx];
            let r1 = &mut right[0];
            r1.swap_payload(idx1, r2, idx2);
        }
        let w1 = solution.routes()[r1_idx].workers();
        solution.routes_mut()[r1_idx].recompute_all(tau_fn(problem, w1));
        let w2 = solution.routes()[r2_idx].workers();
        solution.routes_mut()[r2_idx].recompute_all(tau_fn(problem, w2));
        applied += 1;
    }
    applied
}
