//! Mutable search-driver state: everything that changes across iterations
//! but is not part of the problem instance itself.
//!
//! Kept separate from [`crate::model::Problem`] (see that module's doc
//! comment) so routes and solutions never need a back-pointer into
//! anything mutable.

use std::time::{Duration, Instant};

use crate::cache::SolutionCache;
use crate::config::SolverConfig;
use crate::model::{Problem, Solution};
use crate::pheromone::PheromoneStore;
use crate::tabu::TabuList;

/// Which phase of the hierarchical objective local search is currently
/// attacking. Declared in objective order so `state >= ReduceWorkers`
/// compares correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReductionState {
    ReduceTrucks,
    ReduceWorkers,
    ReduceDistance,
}

/// Running statistics surfaced in the final report.
#[derive(Debug, Clone, Default)]
pub struct Stats {
    pub iterations_done: usize,
    pub ants_run: usize,
    pub saturation_time: Option<Duration>,
}

/// Everything a metaheuristic driver mutates over the course of a solve.
pub struct SearchState {
    pub incumbent: Solution,
    pub pheromone: PheromoneStore,
    pub tabu: TabuList,
    pub cache: Option<SolutionCache>,
    pub reduction_state: ReductionState,
    pub failed_attempts: usize,
    pub stats: Stats,
    start_time: Instant,
}

impl SearchState {
    pub fn new(problem: &Problem, config: &SolverConfig, incumbent: Solution, tabu_active: bool, with_cache: bool) -> Self {
        let n = problem.n();
        Self {
            incumbent,
            pheromone: PheromoneStore::new(n, config.initial_pheromone),
            tabu: TabuList::new(n, config.tabutime, tabu_active),
            cache: with_cache.then(|| SolutionCache::new(n)),
            reduction_state: ReductionState::ReduceTrucks,
            failed_attempts: 0,
            stats: Stats::default(),
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn mark_saturation_if_unset(&mut self) {
        if self.stats.saturation_time.is_none() {
            self.stats.saturation_time = Some(self.elapsed());
        }
    }

    /// The termination predicate shared by all drivers: continue while
    /// neither budget has been exhausted. `0` means "unlimited" for both.
    pub fn should_continue(&self, runtime_budget: Duration, max_iterations: usize) -> bool {
        let runtime_ok = runtime_budget.is_zero() || self.elapsed() < runtime_budget;
        let iterations_ok = max_iterations == 0 || self.stats.iterations_done < max_iterations;
        runtime_ok && iterations_ok
    }
}
