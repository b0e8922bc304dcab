//! Deterministic and stochastic (ACO-style) Solomon I1 construction.

use rand::Rng;

use super::cost::insertion_cost;
use super::roulette_select;
use crate::model::{Node, NodeRecord, Problem, Route, Solution};
use crate::pheromone::PheromoneStore;

fn all_unrouted(problem: &Problem) -> Vec<NodeRecord> {
    problem.nodes[1..].iter().map(Node::record).collect()
}

fn tau_fn(problem: &Problem, w: usize) -> impl Fn(usize, usize) -> f64 + '_ {
    move |i, j| problem.tau(w, i, j)
}

/// Index (within `unrouted`) of the node farthest from the depot.
fn farthest_from_depot(problem: &Problem, unrouted: &[NodeRecord]) -> usize {
    let mut best_idx = 0;
    let mut best_dist = -1.0;
    for (i, rec) in unrouted.iter().enumerate() {
        let d = problem.distance(0, rec.id);
        if d > best_dist {
            best_dist = d;
            best_idx = i;
        }
    }
    best_idx
}

/// Weighted roulette over `d(0,k) · (P[depot_vr,k] + P[k,depot_vr])`.
fn weighted_seed_choice<R: Rng + ?Sized>(
    problem: &Problem,
    unrouted: &[NodeRecord],
    pheromone: &PheromoneStore,
    depot_vr: usize,
    rng: &mut R,
) -> usize {
    let weights: Vec<f64> = unrouted
        .iter()
        .map(|rec| {
            let d = problem.distance(0, rec.id);
            let trail = pheromone.get(depot_vr, rec.id) + pheromone.get(rec.id, depot_vr);
            (d * trail).max(1e-9)
        })
        .collect();
    roulette_select(&weights, rng)
}

/// Best feasible `(after_idx, cost)` for inserting `node` anywhere on
/// `route`, or `None` if no feasible position exists.
fn best_position_on_route(problem: &Problem, route: &Route, w: usize, node: &Node) -> Option<(usize, f64)> {
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

/// The non-depot node id at `idx`, or `None` if `idx` is a depot sentinel
/// (the pheromone trail substitutes the route's virtual depot id then).
fn trail_id(route: &Route, idx: usize) -> Option<usize> {
    (!route.is_depot(idx)).then(|| route.record(idx).id)
}

/// Best feasible `(after_idx, cost)` for inserting `node` anywhere on
/// `route`, scoring each candidate position by its I1 cost adjusted by the
/// learned pheromone trail at that edge (§4.4).
fn best_position_on_route_with_trail(problem: &Problem, route: &Route, w: usize, node: &Node, pheromone: &PheromoneStore) -> Option<(usize, f64)> {
    let depot_vr = route.depot_vr_id();
    let mut best: Option<(usize, f64)> = None;
    for after_idx in route.iter_all() {
        if after_idx == route.tail() {
            continue;
        }
        if let Some(cost) = insertion_cost(problem, route, after_idx, w, node) {
            let next_idx = route.next(after_idx).expect("best_position_on_route_with_trail: dangling successor");
            let trail = pheromone.trail(depot_vr, trail_id(route, after_idx), node.id, trail_id(route, next_idx));
            let adjusted = pheromone.adjust_cost(cost, trail);
            if best.map(|(_, c)| adjusted < c).unwrap_or(true) {
                best = Some((after_idx, adjusted));
            }
        }
    }
    best
}

/// Grows `route` by repeatedly inserting the unrouted node and position
/// minimizing `c1 − λ·d(0,k)` until none remain feasible, ties broken by
/// earliest-tested predecessor.
pub(crate) fn grow_route_deterministic(problem: &Problem, route: &mut Route, w: usize, unrouted: &mut Vec<NodeRecord>) {
    loop {
        let mut best: Option<(usize, usize, f64)> = None;
        for (ui, rec) in unrouted.iter().enumerate() {
            let node = problem.node(rec.id);
            if let Some((after_idx, cost)) = best_position_on_route(problem, route, w, node) {
                let score = cost - problem.i1.lambda * problem.distance(0, rec.id);
                if best.as_ref().map(|&(_, _, best_score)| score < best_score).unwrap_or(true) {
                    best = Some((ui, after_idx, score));
                }
            }
        }
        match best {
            Some((ui, after_idx, _)) => {
                let rec = unrouted.remove(ui);
                let new_idx = route.insert_after(after_idx, rec);
                route.recompute_aest_forward(after_idx, tau_fn(problem, w));
                route.recompute_alst_backward(new_idx, tau_fn(problem, w));
            }
            None => break,
        }
    }
}

/// Grows `route` stochastically: per unrouted node keep its single best
/// position scored by trail-adjusted cost (§4.4), then pick one via
/// roulette over `1/(cost − min_cost + 1)`.
pub(crate) fn grow_route_stochastic<R: Rng + ?Sized>(
    problem: &Problem,
    route: &mut Route,
    w: usize,
    pheromone: &PheromoneStore,
    unrouted: &mut Vec<NodeRecord>,
    rng: &mut R,
) {
    loop {
        let mut candidates: Vec<(usize, usize, f64)> = Vec::new();
        for (ui, rec) in unrouted.iter().enumerate() {
            let node = problem.node(rec.id);
            if let Some((after_idx, cost)) = best_position_on_route_with_trail(problem, route, w, node, pheromone) {
                candidates.push((ui, after_idx, cost));
            }
        }
        if candidates.is_empty() {
            break;
        }
        let min_cost = candidates.iter().map(|c| c.2).fold(f64::INFINITY, f64::min);
        let weights: Vec<f64> = candidates.iter().map(|c| 1.0 / (c.2 - min_cost + 1.0)).collect();
        let chosen = roulette_select(&weights, rng);
        let (ui, after_idx, _) = candidates[chosen];
        let rec = unrouted.remove(ui);
        let new_idx = route.insert_after(after_idx, rec);
        route.recompute_aest_forward(after_idx, tau_fn(problem, w));
        route.recompute_alst_backward(new_idx, tau_fn(problem, w));
    }
}

/// The `(route_id, depot_vr_id)` pair a freshly opened route should use.
fn open_route(problem: &Problem, solution: &Solution) -> (usize, usize) {
    (solution.next_route_id(), solution.next_depot_vr_id(problem.n()))
}

/// Exposed for the parallel-construction fallback: opens and stochastically
/// grows one fresh route, consuming from `unrouted`.
pub(crate) fn open_and_grow_stochastic<R: Rng + ?Sized>(
    problem: &Problem,
    w: usize,
    pheromone: &PheromoneStore,
    unrouted: &mut Vec<NodeRecord>,
    route_id: usize,
    depot_vr: usize,
    rng: &mut R,
) -> Route {
    let seed_pos = weighted_seed_choice(problem, unrouted, pheromone, depot_vr, rng);
    let seed = unrouted.remove(seed_pos);
    let depot_node = problem.depot().clone();
    let mut route = Route::new_with_seed(route_id, depot_vr, &depot_node, seed, w);
    route.recompute_all(tau_fn(problem, w));
    grow_route_stochastic(problem, &mut route, w, pheromone, unrouted, rng);
    route
}

/// Deterministic Solomon I1: no randomness, used when `deterministic` is
/// set or for debugging. Implies no metaheuristic wrapper.
pub fn solomon_deterministic(problem: &Problem, max_workers: usize) -> Solution {
    let mut unrouted = all_unrouted(problem);
    let mut solution = Solution::new(Vec::new());
    while !unrouted.is_empty() {
        let (route_id, depot_vr) = open_route(problem, &solution);
        let seed_pos = farthest_from_depot(problem, &unrouted);
        let seed = unrouted.remove(seed_pos);
        let depot_node = problem.depot().clone();
        let mut route = Route::new_with_seed(route_id, depot_vr, &depot_node, seed, max_workers);
        route.recompute_all(tau_fn(problem, max_workers));
        grow_route_deterministic(problem, &mut route, max_workers, &mut unrouted);
        solution.push_route(route);
    }
    solution.recompute_totals(problem);
    solution
}

/// Stochastic (ACO-style) Solomon I1 construction.
pub fn solomon_stochastic<R: Rng + ?Sized>(problem: &Problem, max_workers: usize, pheromone: &PheromoneStore, rng: &mut R) -> Solution {
    let mut unrouted = all_unrouted(problem);
    let mut solution = Solution::new(Vec::new());
    while !unrouted.is_empty() {
        let (route_id, depot_vr) = open_route(problem, &solution);
        let route = open_and_grow_stochastic(problem, max_workers, pheromone, &mut unrouted, route_id, depot_vr, rng);
        solution.push_route(route);
    }
    solution.recompute_totals(problem);
    solution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::problem::{CostWeights, I1Params};
    use crate::rng::seeded_rng;

    fn small_problem() -> Problem {
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
    fn test_solomon_deterministic_routes_every_customer_exactly_once() {
        let problem = small_problem();
        let sol = solomon_deterministic(&problem, 1);
        let mut ids = sol.routed_ids();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(sol.unrouted().is_empty());
    }

    #[test]
    fn test_solomon_deterministic_seeds_farthest_first() {
        let problem = small_problem();
        let sol = solomon_deterministic(&problem, 1);
        let first_route = &sol.routes()[0];
        let seed_idx = first_route.first_interior().unwrap();
        // node 2 is farthest (distance 20) from the depot.
        assert_eq!(first_route.record(seed_idx).id, 2);
    }

    #[test]
    fn test_solomon_stochastic_routes_every_customer_exactly_once() {
        let problem = small_problem();
        let pheromone = PheromoneStore::new(problem.n(), 0.5);
        let mut rng = seeded_rng(3);
        let sol = solomon_stochastic(&problem, 1, &pheromone, &mut rng);
        let mut ids = sol.routed_ids();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
