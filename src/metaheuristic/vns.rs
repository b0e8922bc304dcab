//! Variable Neighborhood Search driver: shakes a random route empty by
//! scattering its customers onto the rest of the solution via best
//! insertion, then lets local search settle the resulting mess.

use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use crate::config::SolverConfig;
use crate::constructive::{insertion_cost, solomon_deterministic};
use crate::local_search;
use crate::model::{Node, Problem, Route, Solution, MIN_DELTA};
use crate::state::SearchState;

fn tau_fn(problem: &Problem, w: usize) -> impl Fn(usize, usize) -> f64 + '_ {
    move |i, j| problem.tau(w, i, j)
}

fn best_position(problem: &Problem, route: &Route, w: usize, node: &Node) -> Option<(usize, f64)> {
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

/// Picks a non-empty route at random and scatters every one of its
/// customers onto the cheapest feasible position of some other route.
/// Any customer that finds no feasible home anywhere is left unrouted
/// rather than blocking the shake; local search and the next construction
/// cycle of the caller never see an unrouted customer linger since the
/// driver only accepts the shaken solution when it beats the incumbent,
/// and a solution with unrouted customers never does (its cost omits
/// them, but route/worker counts among the routed still have to compete).
fn shake<R: Rng + ?Sized>(problem: &Problem, solution: &mut Solution, rng: &mut R) {
    let non_empty: Vec<usize> = (0..solution.routes().len()).filter(|&i| !solution.routes()[i].is_empty()).collect();
    if non_empty.is_empty() {
        return;
    }
    let route_idx = non_empty[rng.random_range(0..non_empty.len())];

    let customers: Vec<_> = solution.routes()[route_idx].iter_interior().map(|idx| *solution.routes()[route_idx].record(idx)).collect();
    for rec in &customers {
        let source_idx = solution.routes()[route_idx].iter_interior().find(|&idx| solution.routes()[route_idx].record(idx).id == rec.id);
        if let Some(idx) = source_idx {
            solution.routes_mut()[route_idx].remove_one(idx);
        }

        let node = problem.node(rec.id);
        let mut best_target: Option<(usize, usize, f64)> = None;
        for target_idx in 0..solution.routes().len() {
            if target_idx == route_idx {
                continue;
            }
            let w = solution.routes()[target_idx].workers();
            if let Some((after_idx, cost)) = best_position(problem, &solution.routes()[target_idx], w, node) {
                if best_target.map(|(_, _, c)| cost < c).unwrap_or(true) {
                    best_target = Some((target_idx, after_idx, cost));
                }
            }
        }

        if let Some((target_idx, after_idx, _)) = best_target {
            let w = solution.routes()[target_idx].workers();
            let target = &mut solution.routes_mut()[target_idx];
            let new_idx = target.insert_after(after_idx, *rec);
            target.recompute_aest_forward(after_idx, tau_fn(problem, w));
            target.recompute_alst_backward(new_idx, tau_fn(problem, w));
        } else {
            solution.unrouted_mut().push(*rec);
        }
    }

    if solution.routes()[route_idx].is_empty() {
        solution.remove_route(route_idx, problem.n());
    }
}

/// Constructs once (deterministic Solomon I1) and local-searches it to a
/// starting incumbent. Each iteration shakes a clone of the incumbent,
/// re-runs trucks-then-workers reduction on the result, and replaces the
/// incumbent whenever the shaken-and-settled clone comes out cheaper.
pub fn run<R: Rng + ?Sized>(problem: &Problem, state: &mut SearchState, config: &SolverConfig, rng: &mut R) {
    let mut current = solomon_deterministic(problem, config.max_workers);
    local_search::run(problem, &mut current, &mut state.tabu, config);
    current.recompute_totals(problem);
    state.incumbent = current;

    let runtime_budget = Duration::from_secs(config.runtime);

    while state.should_continue(runtime_budget, config.max_iterations) {
        let mut candidate = state.incumbent.clone();
        shake(problem, &mut candidate, rng);
        local_search::run(problem, &mut candidate, &mut state.tabu, config);
        candidate.recompute_totals(problem);

        if candidate.unrouted().is_empty() && candidate.cost() < state.incumbent.cost() - MIN_DELTA {
            state.incumbent = candidate;
            info!(cost = state.incumbent.cost(), trucks = state.incumbent.trucks(), "new incumbent found");
        }

        state.stats.iterations_done += 1;
        debug!(iteration = state.stats.iterations_done, "vns iteration complete");
    }

    info!(iterations = state.stats.iterations_done, "vns terminated");
}
