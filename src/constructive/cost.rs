//! Solomon I1 insertion cost and attractiveness.
//!
//! c1(p,k,next) = α·(d(p,k) + d(k,next) − μ·d(p,next)) + (1−α)·(est_succ' − aest(next))
//!
//! The first term (`c11`) is the classic detour cost of splicing `k` into
//! the edge `(p, next)`; the second (`c12`) is how much later `next` would
//! now start, using `aest` consistently on both sides of the subtraction
//! (the source mixes `est`/`aest` here; this implementation always uses
//! `aest`, see the design notes).
//!
//! Reference: Solomon, M.M. (1987), "Algorithms for the Vehicle Routing and
//! Scheduling Problems with Time Window Constraints".

use crate::feasibility::can_insert_one;
use crate::model::{Node, Problem, Route};

/// The I1 insertion cost of `node` directly after `after_idx` on `route`
/// run with `w` workers, or `None` if the insertion is infeasible.
pub fn insertion_cost(problem: &Problem, route: &Route, after_idx: usize, w: usize, node: &Node) -> Option<f64> {
    if !can_insert_one(problem, route, after_idx, w, node.id, node.demand, node.est, node.lst) {
        return None;
    }
    let next_idx = route.next(after_idx).expect("insertion_cost: dangling successor");
    let prev = *route.record(after_idx);
    let next = *route.record(next_idx);

    let d_pk = problem.distance(prev.id, node.id);
    let d_kn = problem.distance(node.id, next.id);
    let d_pn = problem.distance(prev.id, next.id);

    let arrival_k = prev.aest + problem.tau(w, prev.id, node.id);
    let aest_k = arrival_k.max(node.est);
    let arrival_next = aest_k + problem.tau(w, node.id, next.id);
    let est_succ_new = arrival_next.max(next.est);

    let i1 = problem.i1;
    let c11 = d_pk + d_kn - i1.mu * d_pn;
    let c12 = est_succ_new - next.aest;
    Some(i1.alpha * c11 + (1.0 - i1.alpha) * c12)
}

/// Stochastic-variant attractiveness: `λ·d(0,k) − cost`, floored to keep
/// roulette weights strictly positive.
pub fn attractiveness(problem: &Problem, cost: f64, node_id: usize) -> f64 {
    let raw = problem.i1.lambda * problem.distance(0, node_id) - cost;
    raw.max(1e-9)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::problem::{CostWeights, I1Params};

    fn problem() -> Problem {
        let nodes = vec![
            Node::new(0, 0.0, 0.0, 0, 0.0, 1000.0, 0.0),
            Node::new(1, 10.0, 0.0, 10, 0.0, 1000.0, 0.0),
            Node::new(2, 20.0, 0.0, 10, 0.0, 1000.0, 0.0),
        ];
        Problem::new(
            "t".into(),
            nodes,
            200,
            1,
            I1Params { alpha: 1.0, mu: 1.0, lambda: 2.0 },
            CostWeights { truck: 1e6, worker: 1e3, distance: 1.0 },
        )
    }

    #[test]
    fn test_insertion_cost_on_direct_depot_edge() {
        let p = problem();
        let depot = p.depot().clone();
        let route = crate::model::Route::new_with_seed(0, 3, &depot, p.nodes[2].record(), 1);
        let after = route.head();
        let cost = insertion_cost(&p, &route, after, 1, &p.nodes[1]).expect("feasible");
        // alpha=1 so c1 == c11 = d(0,1)+d(1,2)-mu*d(0,2) = 10+10-20 = 0
        assert!((cost - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_attractiveness_is_never_negative() {
        let p = problem();
        let a = attractiveness(&p, 1e9, 1);
        assert!(a >= 1e-9);
    }
}
