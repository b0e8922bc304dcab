//! Hierarchical deltas and candidate moves.

/// Minimum distance improvement considered significant; smaller changes
/// are treated as ties. See §4.3 of the design notes.
pub const MIN_DELTA: f64 = 1e-13;

/// A hierarchical `(Δtrucks, Δworkers, Δdistance)` triple.
///
/// Comparisons are lexicographic: trucks dominate workers dominate
/// distance. More negative is better (a reduction). Distance comparisons
/// use [`MIN_DELTA`] tolerance so that near-equal distances are treated as
/// ties rather than spurious improvements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Delta {
    pub trucks: i32,
    pub workers: i32,
    pub distance: f64,
}

impl Delta {
    pub const ZERO: Delta = Delta {
        trucks: 0,
        workers: 0,
        distance: 0.0,
    };

    pub fn new(trucks: i32, workers: i32, distance: f64) -> Self {
        Self {
            trucks,
            workers,
            distance,
        }
    }

    /// `true` if `self` is a strictly better (more negative) hierarchical
    /// delta than `other`.
    pub fn is_better_than(&self, other: &Delta) -> bool {
        if self.trucks != other.trucks {
            return self.trucks < other.trucks;
        }
        if self.workers != other.workers {
            return self.workers < other.workers;
        }
        self.distance < other.distance - MIN_DELTA
    }
}

/// A candidate relocation of the run `[first..last]` (one or two
/// consecutive interior nodes) from `source` to immediately after `after`
/// on `target`.
#[derive(Debug, Clone, Copy)]
pub struct Move {
    pub source_route: usize,
    pub target_route: usize,
    pub first: usize,
    pub last: usize,
    pub after: usize,
    pub len: usize,
    pub delta: Delta,
    /// Set when this move empties the source route entirely.
    pub truck_saving: bool,
    /// Set when this move additionally allows the source route's worker
    /// count to drop to this value (only meaningful when not a truck
    /// saving).
    pub new_source_workers: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truck_reduction_dominates() {
        let fewer_trucks = Delta::new(-1, 5, 100.0);
        let fewer_workers = Delta::new(0, -5, -100.0);
        assert!(fewer_trucks.is_better_than(&fewer_workers));
    }

    #[test]
    fn test_distance_tie_tolerance() {
        let a = Delta::new(0, 0, -1e-14);
        let b = Delta::ZERO;
        assert!(!a.is_better_than(&b));
    }

    #[test]
    fn test_distance_real_improvement() {
        let a = Delta::new(0, 0, -1.0);
        let b = Delta::ZERO;
        assert!(a.is_better_than(&b));
    }
}
