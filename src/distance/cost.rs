//! Per-worker travel-plus-service cost matrices and Reimann service-time
//! adaptation.

use super::DistanceMatrix;
use crate::model::Node;

/// `c_m[0]` is plain distance; `c_m[w]` for `w ∈ [1, w_max]` is
/// `d(i,j) + service_time(i) / w`, the time a truck with `w` workers
/// spends at `i` before departing for `j`.
#[derive(Debug, Clone)]
pub struct CostMatrices {
    distance: DistanceMatrix,
    per_worker: Vec<DistanceMatrix>,
    w_max: usize,
}

impl CostMatrices {
    /// Builds the distance matrix plus one travel+service matrix per
    /// worker count `1..=w_max`, from (possibly Reimann-adapted) service
    /// times.
    pub fn build(nodes: &[Node], w_max: usize) -> Self {
        let distance = DistanceMatrix::from_nodes(nodes);
        let n = nodes.len();
        let mut per_worker = Vec::with_capacity(w_max);
        for w in 1..=w_max {
            let mut m = DistanceMatrix::new(n);
            for i in 0..n {
                for j in 0..n {
                    if i == j {
                        continue;
                    }
                    m.set(i, j, distance.get(i, j) + nodes[i].service / w as f64);
                }
            }
            per_worker.push(m);
        }
        Self {
            distance,
            per_worker,
            w_max,
        }
    }

    pub fn w_max(&self) -> usize {
        self.w_max
    }

    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.distance.get(i, j)
    }

    /// `τ_w(i,j)`: distance plus `w`-way-shared service time at `i`.
    /// `w == 0` yields plain distance (the distance-only matrix `c_m[0]`).
    pub fn tau(&self, w: usize, i: usize, j: usize) -> f64 {
        if w == 0 {
            self.distance.get(i, j)
        } else {
            self.per_worker[w - 1].get(i, j)
        }
    }
}

/// Adapts service times per Reimann (2011): clamps each customer's service
/// time so a single truck at cruising speed `v` could still reach the
/// customer no earlier than its `est`, serve it, and return to the depot
/// before the depot's closing time.
///
/// `depot` must be `nodes[0]`. Mutates `nodes[1..]` in place.
pub fn adapt_service_times(nodes: &mut [Node], service_rate: f64, truck_velocity: f64) {
    if nodes.is_empty() {
        return;
    }
    let depot = nodes[0].clone();
    for node in nodes.iter_mut().skip(1) {
        let to_depot = node.distance_to(&depot);
        let from_depot = depot.distance_to(node);
        let earliest_departure = node.est.max(from_depot / truck_velocity);
        let budget = depot.lst - earliest_departure - to_depot / truck_velocity;
        let cap = service_rate * node.demand as f64;
        node.service = cap.min(budget).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tau_zero_is_plain_distance() {
        let nodes = vec![
            Node::new(0, 0.0, 0.0, 0, 0.0, 1000.0, 0.0),
            Node::new(1, 3.0, 4.0, 10, 0.0, 1000.0, 10.0),
        ];
        let cm = CostMatrices::build(&nodes, 2);
        assert!((cm.tau(0, 0, 1) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_tau_includes_service_split_by_workers() {
        let nodes = vec![
            Node::new(0, 0.0, 0.0, 0, 0.0, 1000.0, 0.0),
            Node::new(1, 3.0, 4.0, 10, 0.0, 1000.0, 10.0),
        ];
        let cm = CostMatrices::build(&nodes, 2);
        // d(1,0) = 5, service(1) = 10
        assert!((cm.tau(1, 1, 0) - 15.0).abs() < 1e-10);
        assert!((cm.tau(2, 1, 0) - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_reimann_adaptation_bounds_service_time() {
        let mut nodes = vec![
            Node::new(0, 0.0, 0.0, 0, 0.0, 100.0, 0.0),
            Node::new(1, 10.0, 0.0, 5, 0.0, 100.0, 999.0),
        ];
        adapt_service_times(&mut nodes, 1000.0, 1.0);
        // budget = 100 - max(0, 10/1) - 10/1 = 80
        assert!((nodes[1].service - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_reimann_adaptation_never_negative() {
        let mut nodes = vec![
            Node::new(0, 0.0, 0.0, 0, 0.0, 5.0, 0.0),
            Node::new(1, 10.0, 0.0, 5, 0.0, 5.0, 1.0),
        ];
        adapt_service_times(&mut nodes, 1.0, 1.0);
        assert!(nodes[1].service >= 0.0);
    }
}
