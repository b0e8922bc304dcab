//! A collection of routes plus the currently unrouted customers.

use super::node::NodeRecord;
use super::problem::Problem;
use super::route::Route;

/// An array of routes plus the unrouted customer list, with totals cached
/// on demand.
///
/// Route ids double as their index in `routes`; whenever a route is
/// removed the remaining routes are reindexed so `routes[i].id() == i`
/// always holds, keeping virtual pheromone depot ids (`n + id`) dense.
#[derive(Debug, Clone)]
pub struct Solution {
    routes: Vec<Route>,
    unrouted: Vec<NodeRecord>,
    trucks: usize,
    workers: usize,
    distance: f64,
    cost: f64,
}

impl Solution {
    /// A fresh, empty solution: every customer record unrouted.
    pub fn new(unrouted: Vec<NodeRecord>) -> Self {
        Self {
            routes: Vec::new(),
            unrouted,
            trucks: 0,
            workers: 0,
            distance: 0.0,
            cost: 0.0,
        }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn routes_mut(&mut self) -> &mut [Route] {
        &mut self.routes
    }

    pub fn unrouted(&self) -> &[NodeRecord] {
        &self.unrouted
    }

    pub fn unrouted_mut(&mut self) -> &mut Vec<NodeRecord> {
        &mut self.unrouted
    }

    pub fn num_unrouted(&self) -> usize {
        self.unrouted.len()
    }

    /// The id a newly constructed route should be given (always a dense
    /// append, since removal reindexes).
    pub fn next_route_id(&self) -> usize {
        self.routes.len()
    }

    /// Derives the virtual pheromone depot id for the route about to be
    /// opened, given the instance size `n`.
    pub fn next_depot_vr_id(&self, n: usize) -> usize {
        n + self.next_route_id()
    }

    pub fn push_route(&mut self, route: Route) {
        debug_assert_eq!(route.id(), self.routes.len(), "route id must equal its append index");
        self.routes.push(route);
    }

    /// Removes an empty route and reindexes the routes after it so ids
    /// stay dense. Panics (debug) on a non-empty route, matching the
    /// `remove_route` invariant.
    pub fn remove_route(&mut self, index: usize, n: usize) -> Route {
        debug_assert!(self.routes[index].is_empty(), "remove_route on a non-empty route");
        let removed = self.routes.remove(index);
        for (offset, route) in self.routes[index..].iter_mut().enumerate() {
            let new_id = index + offset;
            route.set_identity(new_id, n + new_id);
        }
        removed
    }

    pub fn trucks(&self) -> usize {
        self.trucks
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Recomputes `trucks`, `workers`, `distance`, and `cost` from the
    /// current routes. The totals are cached fields that go stale the
    /// moment a route is mutated; callers recompute at the points the
    /// design notes call out (after local search, before a cache lookup,
    /// before comparing to the incumbent).
    pub fn recompute_totals(&mut self, problem: &Problem) {
        self.trucks = self.routes.len();
        self.workers = self.routes.iter().map(|r| r.workers()).sum();
        self.distance = self
            .routes
            .iter()
            .map(|route| route_distance(route, problem))
            .sum();
        self.cost = self.trucks as f64 * problem.weights.truck
            + self.workers as f64 * problem.weights.worker
            + self.distance * problem.weights.distance;
    }

    /// Resets to the empty state: no routes, every customer unrouted
    /// again, cached totals zeroed.
    pub fn reset(&mut self, unrouted: Vec<NodeRecord>) {
        self.routes.clear();
        self.unrouted = unrouted;
        self.trucks = 0;
        self.workers = 0;
        self.distance = 0.0;
        self.cost = 0.0;
    }

    /// Every customer id currently assigned to a route, in no particular
    /// order. Used by post-solve validation.
    pub fn routed_ids(&self) -> Vec<usize> {
        self.routes
            .iter()
            .flat_map(|r| r.iter_interior().map(move |idx| r.record(idx).id))
            .collect()
    }
}

fn route_distance(route: &Route, problem: &Problem) -> f64 {
    let mut total = 0.0;
    let mut prev: Option<usize> = None;
    for idx in route.iter_all() {
        let id = route.record(idx).id;
        if let Some(p) = prev {
            total += problem.distance(p, id);
        }
        prev = Some(id);
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::Node;
    use crate::model::problem::{CostWeights, I1Params};

    fn tiny_problem() -> Problem {
        let nodes = vec![
            Node::new(0, 0.0, 0.0, 0, 0.0, 1000.0, 0.0),
            Node::new(1, 3.0, 0.0, 10, 0.0, 1000.0, 0.0),
            Node::new(2, 6.0, 0.0, 10, 0.0, 1000.0, 0.0),
        ];
        Problem::new(
            "tiny".to_string(),
            nodes,
            200,
            1,
            I1Params { alpha: 1.0, mu: 1.0, lambda: 2.0 },
            CostWeights { truck: 1_000_000.0, worker: 1_000.0, distance: 1.0 },
        )
    }

    #[test]
    fn test_new_solution_is_all_unrouted() {
        let problem = tiny_problem();
        let unrouted: Vec<NodeRecord> = problem.nodes[1..].iter().map(|n| n.record()).collect();
        let sol = Solution::new(unrouted);
        assert_eq!(sol.num_unrouted(), 2);
        assert_eq!(sol.trucks(), 0);
    }

    #[test]
    fn test_recompute_totals_sums_distance_and_cost() {
        let problem = tiny_problem();
        let depot = problem.depot().clone();
        let seed = problem.nodes[1].record();
        let route = Route::new_with_seed(0, 3, &depot, seed, 1);
        let mut sol = Solution::new(vec![problem.nodes[2].record()]);
        sol.push_route(route);
        sol.recompute_totals(&problem);
        assert_eq!(sol.trucks(), 1);
        assert_eq!(sol.workers(), 1);
        assert!((sol.distance() - 6.0).abs() < 1e-9);
        let expected_cost = 1_000_000.0 + 1_000.0 + 6.0;
        assert!((sol.cost() - expected_cost).abs() < 1e-6);
    }

    #[test]
    fn test_remove_route_reindexes_remaining() {
        let problem = tiny_problem();
        let depot = problem.depot().clone();
        let r0 = Route::new_empty(0, 3, &depot, 1);
        let r1 = Route::new_with_seed(1, 4, &depot, problem.nodes[1].record(), 1);
        let r2 = Route::new_with_seed(2, 5, &depot, problem.nodes[2].record(), 1);
        let mut sol = Solution::new(Vec::new());
        sol.push_route(r0);
        sol.push_route(r1);
        sol.push_route(r2);

        sol.remove_route(0, 3);

        assert_eq!(sol.routes().len(), 2);
        assert_eq!(sol.routes()[0].id(), 0);
        assert_eq!(sol.routes()[0].depot_vr_id(), 3);
        assert_eq!(sol.routes()[1].id(), 1);
        assert_eq!(sol.routes()[1].depot_vr_id(), 4);
    }

    #[test]
    fn test_reset_restores_empty_state() {
        let problem = tiny_problem();
        let depot = problem.depot().clone();
        let mut sol = Solution::new(Vec::new());
        sol.push_route(Route::new_with_seed(0, 3, &depot, problem.nodes[1].record(), 1));
        sol.recompute_totals(&problem);
        assert_eq!(sol.trucks(), 1);

        let fresh: Vec<NodeRecord> = problem.nodes[1..].iter().map(|n| n.record()).collect();
        sol.reset(fresh);
        assert_eq!(sol.trucks(), 0);
        assert_eq!(sol.routes().len(), 0);
        assert_eq!(sol.num_unrouted(), 2);
    }
}
