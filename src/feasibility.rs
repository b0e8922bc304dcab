//! Time-window and capacity feasibility checks.
//!
//! These are pure predicates over a [`Problem`] and a [`Route`]: they never
//! commit `aest`/`alst`, only read the route's already-committed values (or
//! write its scratch `aest_cache` fields when probing). Callers recompute
//! the committed values afterwards via [`Route::recompute_aest_forward`]
//! and [`Route::recompute_alst_backward`].

use crate::error::{Result, SolverError};
use crate::model::{NodeRecord, Problem, Route, Solution};

/// Is inserting a single node with the given template fields, directly
/// after `after_idx` on `route` run with `w` workers, feasible?
///
/// Capacity, both time-window bounds, and their overlap are all checked
/// (§4.1 of the design notes).
#[allow(clippy::too_many_arguments)]
pub fn can_insert_one(
    problem: &Problem,
    route: &Route,
    after_idx: usize,
    w: usize,
    node_id: usize,
    demand: i32,
    est: f64,
    lst: f64,
) -> bool {
    if route.load() + demand > problem.capacity {
        return false;
    }
    let next_idx = route.next(after_idx).expect("can_insert_one: dangling successor");
    let prev = route.record(after_idx);
    let arrival = prev.aest + problem.tau(w, prev.id, node_id);
    if arrival.max(est) > lst {
        return false;
    }
    let next = route.record(next_idx);
    let latest_departure = next.alst - problem.tau(w, node_id, next.id);
    if latest_departure < est {
        return false;
    }
    arrival <= latest_departure
}

/// Is inserting the ordered run of records `run` directly after `after_idx`
/// feasible? Used by move2 (two consecutive nodes relocated together) and
/// by the insertion engine when seeding or extending with runs.
///
/// Simulates the forward propagation through the run without touching the
/// route's committed `aest` values, then checks the closing edge against
/// the successor's committed `alst`.
pub fn can_insert_run(problem: &Problem, route: &Route, after_idx: usize, w: usize, run: &[NodeRecord]) -> bool {
    let total_demand: i32 = run.iter().map(|r| r.demand).sum();
    if route.load() + total_demand > problem.capacity {
        return false;
    }
    let next_idx = route.next(after_idx).expect("can_insert_run: dangling successor");
    let after = route.record(after_idx);
    let mut prev_aest = after.aest;
    let mut prev_id = after.id;
    for node in run {
        let arrival = prev_aest + problem.tau(w, prev_id, node.id);
        let aest = arrival.max(node.est);
        if aest > node.lst {
            return false;
        }
        prev_aest = aest;
        prev_id = node.id;
    }
    let next = route.record(next_idx);
    prev_aest + problem.tau(w, prev_id, next.id) <= next.alst
}

/// Would `route` remain time-window feasible start to finish if it ran
/// with `w_probe` workers instead of its current count?
///
/// Propagates into each node's `aest_cache` scratch field using `τ_w_probe`
/// (leaving the committed `aest` untouched) and rejects as soon as a node's
/// `aest_cache` exceeds its `lst`.
pub fn is_feasible_with(problem: &Problem, route: &mut Route, w_probe: usize) -> bool {
    let head = route.head();
    let mut prev_aest = route.record(head).aest;
    let mut prev_id = route.record(head).id;
    route.record_mut(head).aest_cache = prev_aest;

    let mut idx = head;
    loop {
        let next = match route.next(idx) {
            Some(n) => n,
            None => return true,
        };
        let next_rec = *route.record(next);
        let arrival = prev_aest + problem.tau(w_probe, prev_id, next_rec.id);
        let aest = arrival.max(next_rec.est);
        route.record_mut(next).aest_cache = aest;
        if aest > next_rec.lst {
            return false;
        }
        prev_aest = aest;
        prev_id = next_rec.id;
        idx = next;
        if idx == route.tail() {
            return true;
        }
    }
}

/// Re-validates a finished solution from scratch: every customer appears
/// exactly once across routes, every route is time-window feasible when
/// its `aest`/`alst` are recomputed from nothing, and every route respects
/// capacity and its worker bound. Used as the final check before a solve
/// is reported as successful.
pub fn validate_solution(problem: &Problem, solution: &Solution) -> Result<()> {
    let mut seen = vec![false; problem.n()];
    for route in solution.routes() {
        if route.workers() == 0 || route.workers() > problem.w_max {
            return Err(SolverError::Validation(format!(
                "route {} has {} workers, outside [1, {}]",
                route.id(),
                route.workers(),
                problem.w_max
            )));
        }
        if route.load() > problem.capacity {
            return Err(SolverError::Validation(format!(
                "route {} load {} exceeds capacity {}",
                route.id(),
                route.load(),
                problem.capacity
            )));
        }

        let mut probe = route.clone();
        let w = probe.workers();
        probe.recompute_all(|i, j| problem.tau(w, i, j));
        for idx in probe.iter_interior() {
            let rec = probe.record(idx);
            if rec.aest > rec.lst + 1e-6 {
                return Err(SolverError::Validation(format!(
                    "route {} node {} infeasible: aest {} > lst {}",
                    route.id(),
                    rec.id,
                    rec.aest,
                    rec.lst
                )));
            }
            if rec.id == 0 || rec.id >= seen.len() {
                return Err(SolverError::Validation(format!("route {} contains out-of-range node id {}", route.id(), rec.id)));
            }
            if seen[rec.id] {
                return Err(SolverError::Validation(format!("customer {} appears in more than one route", rec.id)));
            }
            seen[rec.id] = true;
        }
    }

    for (id, found) in seen.iter().enumerate().skip(1) {
        if !found {
            return Err(SolverError::Validation(format!("customer {id} is unrouted")));
        }
    }
    Ok(())
}
