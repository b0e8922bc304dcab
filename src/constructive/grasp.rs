//! GRASP construction: a restricted candidate list of the cheapest
//! insertions, drawn from uniformly or by weighted roulette.

use rand::Rng;

use super::cost::{attractiveness, insertion_cost};
use super::roulette_select;
use crate::model::{Node, NodeRecord, Problem, Route, Solution};

fn all_unrouted(problem: &Problem) -> Vec<NodeRecord> {
    problem.nodes[1..].iter().map(Node::record).collect()
}

fn tau_fn(problem: &Problem, w: usize) -> impl Fn(usize, usize) -> f64 + '_ {
    move |i, j| problem.tau(w, i, j)
}

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

fn grow_route_grasp<R: Rng + ?Sized>(
    problem: &Problem,
    route: &mut Route,
    w: usize,
    unrouted: &mut Vec<NodeRecord>,
    rcl_size: usize,
    use_weights: bool,
    rng: &mut R,
) {
    loop {
        let mut candidates: Vec<(usize, usize, f64)> = Vec::new();
        for (ui, rec) in unrouted.iter().enumerate() {
            let node = problem.node(rec.id);
            if let Some((after_idx, cost)) = best_position_on_route(problem, route, w, node) {
                candidates.push((ui, after_idx, cost));
            }
        }
        if candidates.is_empty() {
            break;
        }
        candidates.sort_by(|a, b| {
            let attract_a = attractiveness(problem, a.2, unrouted[a.0].id);
            let attract_b = attractiveness(problem, b.2, unrouted[b.0].id);
            attract_b.partial_cmp(&attract_a).expect("attractiveness is never NaN")
        });
        let bound = if rcl_size == 0 { candidates.len() } else { rcl_size.min(candidates.len()) };
        let rcl = &candidates[..bound];

        let chosen = if use_weights {
            let weights: Vec<f64> = rcl.iter().map(|&(ui, _, cost)| attractiveness(problem, cost, unrouted[ui].id)).collect();
            roulette_select(&weights, rng)
        } else {
            rng.random_range(0..rcl.len())
        };

        let (ui, after_idx, _) = rcl[chosen];
        let rec = unrouted.remove(ui);
        let new_idx = route.insert_after(after_idx, rec);
        route.recompute_aest_forward(after_idx, tau_fn(problem, w));
        route.recompute_alst_backward(new_idx, tau_fn(problem, w));
    }
}

/// GRASP construction: seeds routes deterministically (farthest unrouted
/// node), then grows each via a restricted candidate list of bounded size
/// `rcl_size` (`0` = unbounded), drawn from uniformly or by weighted
/// roulette per `use_weights`.
pub fn grasp_construct<R: Rng + ?Sized>(problem: &Problem, max_workers: usize, rcl_size: usize, use_weights: bool, rng: &mut R) -> Solution {
    let mut unrouted = all_unrouted(problem);
    let mut solution = Solution::new(Vec::new());
    while !unrouted.is_empty() {
        let route_id = solution.next_route_id();
        let depot_vr = solution.next_depot_vr_id(problem.n());
        let seed_pos = farthest_from_depot(problem, &unrouted);
        let seed = unrouted.remove(seed_pos);
        let depot_node = problem.depot().clone();
        let mut route = Route::new_with_seed(route_id, depot_vr, &depot_node, seed, max_workers);
        route.recompute_all(tau_fn(problem, max_workers));
        grow_route_grasp(problem, &mut route, max_workers, &mut unrouted, rcl_size, use_weights, rng);
        solution.push_route(route);
    }
    solution.recompute_totals(problem);
    solution
}
