//! The problem instance: nodes, capacity, and derived cost matrices.
//!
//! This holds everything that is fixed for the lifetime of a solve. The
//! mutable search-driver state (incumbent, pheromone matrix, tabu matrix,
//! statistics, reduction-state, wallclock start, failed-attempts counter)
//! lives in [`crate::state::SearchState`] instead of here, so that routes
//! and solutions never need a back-pointer into anything mutable — the
//! arena-based [`super::Route`] already avoids a back-pointer entirely, and
//! splitting immutable instance data from driver state keeps that property
//! intact one level up.

use crate::distance::CostMatrices;
use super::node::Node;

/// Hierarchical cost weights: `cost = trucks*cost_truck + workers*cost_worker
/// + distance*cost_distance`.
#[derive(Debug, Clone, Copy)]
pub struct CostWeights {
    pub truck: f64,
    pub worker: f64,
    pub distance: f64,
}

/// Solomon I1 insertion parameters.
#[derive(Debug, Clone, Copy)]
pub struct I1Params {
    pub alpha: f64,
    pub mu: f64,
    pub lambda: f64,
}

/// A loaded, immutable problem instance.
///
/// `nodes[0]` is always the depot. `w_max` bounds the worker count any
/// route may run with.
#[derive(Debug, Clone)]
pub struct Problem {
    pub name: String,
    pub nodes: Vec<Node>,
    pub capacity: i32,
    pub cost_matrices: CostMatrices,
    pub w_max: usize,
    pub i1: I1Params,
    pub weights: CostWeights,
}

impl Problem {
    pub fn new(
        name: String,
        nodes: Vec<Node>,
        capacity: i32,
        w_max: usize,
        i1: I1Params,
        weights: CostWeights,
    ) -> Self {
        let cost_matrices = CostMatrices::build(&nodes, w_max);
        Self {
            name,
            nodes,
            capacity,
            cost_matrices,
            w_max,
            i1,
            weights,
        }
    }

    /// Number of nodes including the depot (`n` in the design notes).
    pub fn n(&self) -> usize {
        self.nodes.len()
    }

    /// Number of customers, excluding the depot.
    pub fn num_customers(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    pub fn depot(&self) -> &Node {
        &self.nodes[0]
    }

    pub fn node(&self, id: usize) -> &Node {
        &self.nodes[id]
    }

    /// `τ_w(i,j)`, delegating to the cost matrices.
    pub fn tau(&self, w: usize, i: usize, j: usize) -> f64 {
        self.cost_matrices.tau(w, i, j)
    }

    /// Plain Euclidean distance, ignoring service time.
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.cost_matrices.distance(i, j)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_problem() -> Problem {
        let nodes = vec![
            Node::new(0, 0.0, 0.0, 0, 0.0, 1000.0, 0.0),
            Node::new(1, 3.0, 4.0, 10, 0.0, 1000.0, 5.0),
            Node::new(2, 6.0, 8.0, 10, 0.0, 1000.0, 5.0),
        ];
        Problem::new(
            "tiny".to_string(),
            nodes,
            200,
            3,
            I1Params { alpha: 1.0, mu: 1.0, lambda: 2.0 },
            CostWeights { truck: 1_000_000.0, worker: 1_000.0, distance: 1.0 },
        )
    }

    #[test]
    fn test_problem_basic_accessors() {
        let p = tiny_problem();
        assert_eq!(p.n(), 3);
        assert_eq!(p.num_customers(), 2);
        assert_eq!(p.depot().id, 0);
        assert!((p.distance(0, 1) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_problem_tau_matches_cost_matrices() {
        let p = tiny_problem();
        assert!((p.tau(0, 0, 1) - p.distance(0, 1)).abs() < 1e-9);
        assert!(p.tau(1, 0, 1) > p.distance(0, 1));
    }
}
