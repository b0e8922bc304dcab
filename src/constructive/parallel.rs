//! ACO parallel-route construction: builds several routes side by side
//! instead of closing one before opening the next, picking insertions
//! from one global weighted pool.

use rand::Rng;

use super::cost::{attractiveness, insertion_cost};
use super::roulette_select;
use super::solomon::open_and_grow_stochastic;
use crate::model::{Insertion, Node, NodeRecord, Problem, Route, Solution};
use crate::pheromone::PheromoneStore;

fn all_unrouted(problem: &Problem) -> Vec<NodeRecord> {
    problem.nodes[1..].iter().map(Node::record).collect()
}

fn tau_fn(problem: &Problem, w: usize) -> impl Fn(usize, usize) -> f64 + '_ {
    move |i, j| problem.tau(w, i, j)
}

fn weighted_seed_choice<R: Rng + ?Sized>(problem: &Problem, unrouted: &[NodeRecord], pheromone: &PheromoneStore, depot_vr: usize, rng: &mut R) -> usize {
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

/// The non-depot node id at `idx`, or `None` if `idx` is a depot sentinel
/// (the pheromone trail substitutes the route's virtual depot id then).
fn trail_id(route: &Route, idx: usize) -> Option<usize> {
    (!route.is_depot(idx)).then(|| route.record(idx).id)
}

/// Best feasible insertion of each unrouted node onto `route`, scored by
/// I1 cost adjusted by the learned pheromone trail at each candidate edge
/// (§4.4).
fn best_insertions_for_route(problem: &Problem, route: &Route, w: usize, pheromone: &PheromoneStore, unrouted: &[NodeRecord]) -> Vec<Insertion> {
    let depot_vr = route.depot_vr_id();
    let mut out = Vec::new();
    for rec in unrouted {
        let node = problem.node(rec.id);
        let mut best: Option<(usize, f64)> = None;
        for after_idx in route.iter_all() {
            if after_idx == route.tail() {
                continue;
            }
            if let Some(cost) = insertion_cost(problem, route, after_idx, w, node) {
                let next_idx = route.next(after_idx).expect("best_insertions_for_route: dangling successor");
                let trail = pheromone.trail(depot_vr, trail_id(route, after_idx), node.id, trail_id(route, next_idx));
                let adjusted = pheromone.adjust_cost(cost, trail);
                if best.map(|(_, c)| adjusted < c).unwrap_or(true) {
                    best = Some((after_idx, adjusted));
                }
            }
        }
        if let Some((after_idx, cost)) = best {
            let attract = attractiveness(problem, cost, rec.id);
            out.push(Insertion::new(route.id(), rec.id, after_idx, cost, attract));
        }
    }
    out
}

/// Builds `max(1, best_trucks − 1)` routes in parallel: seeds them all
/// up front by pheromone-weighted roulette, then repeatedly draws one
/// insertion from a pooled, weighted candidate list across every open
/// route, regenerating only the entries invalidated by the applied move.
///
/// Returns the partial solution and whatever remains unrouted once the
/// pool runs dry (every remaining node is infeasible on every open
/// route) — the caller finishes those off with [`sequential_finish`].
pub fn parallel_construct<R: Rng + ?Sized>(problem: &Problem, max_workers: usize, pheromone: &PheromoneStore, best_trucks: usize, rng: &mut R) -> Solution {
    let num_routes = best_trucks.saturating_sub(1).max(1);
    let mut unrouted = all_unrouted(problem);
    let mut solution = Solution::new(Vec::new());
    let depot_node = problem.depot().clone();

    for _ in 0..num_routes {
        if unrouted.is_empty() {
            break;
        }
        let route_id = solution.next_route_id();
        let depot_vr = solution.next_depot_vr_id(problem.n());
        let seed_pos = weighted_seed_choice(problem, &unrouted, pheromone, depot_vr, rng);
        let seed = unrouted.remove(seed_pos);
        let mut route = Route::new_with_seed(route_id, depot_vr, &depot_node, seed, max_workers);
        route.recompute_all(tau_fn(problem, max_workers));
        solution.push_route(route);
    }

    let mut candidates: Vec<Insertion> = solution
        .routes()
        .iter()
        .flat_map(|route| best_insertions_for_route(problem, route, max_workers, pheromone, &unrouted))
        .collect();

    while !candidates.is_empty() {
        let weights: Vec<f64> = candidates.iter().map(|c| c.attractiveness).collect();
        let chosen = roulette_select(&weights, rng);
        let insertion = candidates[chosen];

        let ui = unrouted
            .iter()
            .position(|r| r.id == insertion.node_id)
            .expect("candidate references a node still in the unrouted list");
        let rec = unrouted.remove(ui);

        {
            let route = &mut solution.routes_mut()[insertion.route_index];
            let new_idx = route.insert_after(insertion.after, rec);
            route.recompute_aest_forward(insertion.after, tau_fn(problem, max_workers));
            route.recompute_alst_backward(new_idx, tau_fn(problem, max_workers));
        }

        candidates.retain(|c| c.node_id != insertion.node_id && c.route_index != insertion.route_index);
        let route = &solution.routes()[insertion.route_index];
        candidates.extend(best_insertions_for_route(problem, route, max_workers, pheromone, &unrouted));
    }

    solution.unrouted_mut().extend(unrouted);
    solution
}

/// Finishes a partially built solution sequentially: repeatedly inserts
/// the cheapest feasible remaining node anywhere on any existing route;
/// when none fits anywhere, opens one more route by pheromone-weighted
/// seeding and continues growing it stochastically.
pub fn sequential_finish<R: Rng + ?Sized>(problem: &Problem, max_workers: usize, pheromone: &PheromoneStore, solution: &mut Solution, rng: &mut R) {
    loop {
        if solution.unrouted().is_empty() {
            return;
        }

        let mut best: Option<(usize, usize, usize, f64)> = None;
        for (ui, rec) in solution.unrouted().iter().enumerate() {
            let node = problem.node(rec.id);
            for route in solution.routes() {
                for after_idx in route.iter_all() {
                    if after_idx == route.tail() {
                        continue;
                    }
                    if let Some(cost) = insertion_cost(problem, route, after_idx, max_workers, node) {
                        let better = best.as_ref().map(|&(_, _, _, c)| cost < c).unwrap_or(true);
                        if better {
                            best = Some((ui, route.id(), after_idx, cost));
                        }
                    }
                }
            }
        }

        match best {
            Some((ui, route_idx, after_idx, _)) => {
                let rec = solution.unrouted_mut().remove(ui);
                let route = &mut solution.routes_mut()[route_idx];
                let new_idx = route.insert_after(after_idx, rec);
                route.recompute_aest_forward(after_idx, tau_fn(problem, max_workers));
                route.recompute_alst_backward(new_idx, tau_fn(problem, max_workers));
            }
            None => {
                let depot_vr = solution.next_depot_vr_id(problem.n());
                let route_id = solution.next_route_id();
                let route = open_and_grow_stochastic(problem, max_workers, pheromone, solution.unrouted_mut(), route_id, depot_vr, rng);
                solution.push_route(route);
            }
        }
    }
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
            Node::new(4, -20.0, 0.0, 10, 0.0, 1000.0, 1.0),
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
    fn test_parallel_then_sequential_finish_routes_everyone() {
        let problem = small_problem();
        let pheromone = PheromoneStore::new(problem.n(), 0.5);
        let mut rng = seeded_rng(9);
        let mut sol = parallel_construct(&problem, 1, &pheromone, 3, &mut rng);
        sequential_finish(&problem, 1, &pheromone, &mut sol, &mut rng);
        sol.recompute_totals(&problem);
        let mut ids = sol.routed_ids();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert!(sol.unrouted().is_empty());
    }

    #[test]
    fn test_parallel_construct_opens_at_least_one_route() {
        let problem = small_problem();
        let pheromone = PheromoneStore::new(problem.n(), 0.5);
        let mut rng = seeded_rng(2);
        let sol = parallel_construct(&problem, 1, &pheromone, 1, &mut rng);
        assert!(!sol.routes().is_empty());
    }
}
