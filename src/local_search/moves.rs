//! Relocation of one or two consecutive interior nodes between routes
//! (move1/move2).

use crate::model::{Delta, Move, Problem, Route, Solution};
use crate::state::ReductionState;
use crate::tabu::TabuList;

fn tau_fn(problem: &Problem, w: usize) -> impl Fn(usize, usize) -> f64 + '_ {
    move |i, j| problem.tau(w, i, j)
}

/// Interior runs of exactly `len` consecutive nodes, as `(first, last)`
/// slot index pairs, in route order.
fn runs_of_len(route: &Route, len: usize) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let interior: Vec<usize> = route.iter_interior().collect();
    if interior.len() < len {
        return out;
    }
    for window in interior.windows(len) {
        out.push((window[0], window[len - 1]));
    }
    out
}

/// Largest worker reduction `k` (`1 <= k <= w-1`) for which `route` stays
/// time-window feasible after the run `[first..last]` is removed, searched
/// starting above `floor`. Returns `0` if none is feasible.
fn best_worker_reduction(problem: &Problem, route: &Route, first: usize, last: usize, floor: i32) -> i32 {
    let w = route.workers();
    if w <= 1 {
        return 0;
    }
    let mut probe = route.clone();
    probe.remove_run(first, last);
    let mut best = 0;
    for k in (floor + 1)..(w as i32) {
        let w_probe = (w as i32 - k) as usize;
        if w_probe == 0 {
            break;
        }
        if crate::feasibility::is_feasible_with(problem, &mut probe, w_probe) {
            best = k;
        }
    }
    best
}

/// Exact closed-form distance delta for relocating `[first..last]` from
/// `source` (after `source_prev`, before `source_next`) to directly after
/// `after` on `target`.
fn relocation_distance_delta(problem: &Problem, source_prev_id: usize, first_id: usize, last_id: usize, source_next_id: usize, after_id: usize, after_next_id: usize) -> f64 {
    let removed = problem.distance(source_prev_id, first_id) + problem.distance(last_id, source_next_id) + problem.distance(after_id, after_next_id);
    let added = problem.distance(source_prev_id, source_next_id) + problem.distance(after_id, first_id) + problem.distance(last_id, after_next_id);
    added - removed
}

struct Candidate {
    mv: Move,
}

fn evaluate_run(problem: &Problem, solution: &Solution, tabu: &TabuList, reduction_state: ReductionState, source_idx: usize, target_idx: usize, first: usize, last: usize, len: usize) -> Option<Candidate> {
    let source = &solution.routes()[source_idx];
    let target = &solution.routes()[target_idx];

    let truck_saving = source.interior_len() == len;
    let source_prev = source.prev(first).expect("evaluate_run: run has no predecessor");
    let source_next = source.next(last).expect("evaluate_run: run has no successor");
    let source_prev_id = source.record(source_prev).id;
    let source_next_id = source.record(source_next).id;

    let run: Vec<_> = {
        let mut idx = first;
        let mut out = Vec::with_capacity(len);
        loop {
            out.push(*source.record(idx));
            if idx == last {
                break;
            }
            idx = source.next(idx).expect("evaluate_run: run truncated");
        }
        out
    };

    let new_source_workers = if !truck_saving && reduction_state >= ReductionState::ReduceWorkers {
        let k = best_worker_reduction(problem, source, first, last, -1);
        if k > 0 {
            Some(source.workers() - k as usize)
        } else {
            None
        }
    } else {
        None
    };
    let delta_workers = if truck_saving {
        0
    } else {
        new_source_workers.map(|w| w as i32 - source.workers() as i32).unwrap_or(0)
    };

    let mut best_candidate: Option<Candidate> = None;
    for after in target.iter_all() {
        if after == target.tail() {
            continue;
        }
        if !crate::feasibility::can_insert_run(problem, target, after, target.workers(), &run) {
            continue;
        }
        if run.iter().any(|rec| tabu.is_move_tabu(rec.id, target_idx)) {
            continue;
        }
        let after_next = target.next(after).expect("evaluate_run: dangling target successor");
        let after_id = target.record(after).id;
        let after_next_id = target.record(after_next).id;
        let dist = relocation_distance_delta(problem, source_prev_id, run[0].id, run[run.len() - 1].id, source_next_id, after_id, after_next_id);
        let delta = Delta::new(if truck_saving { -1 } else { 0 }, delta_workers, dist);

        let better = best_candidate.as_ref().map(|c| delta.is_better_than(&c.mv.delta)).unwrap_or(true);
        if better {
            best_candidate = Some(Candidate {
                mv: Move {
                    source_route: source_idx,
                    target_route: target_idx,
                    first,
                    last,
                    after,
                    len,
                    delta,
                    truck_saving,
                    new_source_workers,
                },
            });
        }
    }
    best_candidate
}

fn scan(problem: &Problem, solution: &Solution, tabu: &TabuList, reduction_state: ReductionState, max_move: usize, best_moves: bool, require_improving: bool) -> Option<Move> {
    let lens: Vec<usize> = if best_moves { (1..=max_move).collect() } else { (1..=max_move).rev().collect() };
    let n_routes = solution.routes().len();
    let mut best: Option<Move> = None;

    for &len in &lens {
        for source_idx in 0..n_routes {
            if solution.routes()[source_idx].interior_len() < len {
                continue;
            }
            for (first, last) in runs_of_len(&solution.routes()[source_idx], len) {
                for target_idx in 0..n_routes {
                    if target_idx == source_idx {
                        continue;
                    }
                    let Some(candidate) = evaluate_run(problem, solution, tabu, reduction_state, source_idx, target_idx, first, last, len) else {
                        continue;
                    };
                    if require_improving && !candidate.mv.delta.is_better_than(&Delta::ZERO) {
                        continue;
                    }
                    if !best_moves {
                        return Some(candidate.mv);
                    }
                    let better = best.as_ref().map(|b| candidate.mv.delta.is_better_than(&b.delta)).unwrap_or(true);
                    if better {
                        best = Some(candidate.mv);
                    }
                }
            }
        }
    }
    best
}

/// The single globally best move across every route pair and run length,
/// regardless of whether it actually improves the hierarchical objective.
/// Used by Tabu Search, which walks to the best neighbor even when that
/// neighbor is worse, to escape local optima.
pub fn best_move(problem: &Problem, solution: &Solution, tabu: &TabuList, reduction_state: ReductionState, max_move: usize) -> Option<Move> {
    scan(problem, solution, tabu, reduction_state, max_move, true, false)
}

/// Applies a previously found [`Move`], relinking both routes, dropping
/// the source route if it was emptied, and updating the tabu matrix.
pub fn apply_move(problem: &Problem, solution: &mut Solution, tabu: &mut TabuList, mv: Move) {
    let (before_idx, after_gap_idx, moved_ids) = {
        let source = &solution.routes()[mv.source_route];
        let before = source.prev(mv.first).expect("apply: run has no predecessor");
        let after_gap = source.next(mv.last).expect("apply: run has no successor");
        let ids: Vec<usize> = {
            let mut idx = mv.first;
            let mut out = Vec::new();
            loop {
                out.push(source.record(idx).id);
                if idx == mv.last {
                    break;
                }
                idx = source.next(idx).expect("apply: run truncated");
            }
            out
        };
        (before, after_gap, ids)
    };

    let removed = solution.routes_mut()[mv.source_route].remove_run(mv.first, mv.last);

    {
        let target = &mut solution.routes_mut()[mv.target_route];
        let mut cursor = mv.after;
        for rec in removed {
            cursor = target.insert_after(cursor, rec);
        }
        let w = target.workers();
        target.recompute_aest_forward(mv.after, tau_fn(problem, w));
        target.recompute_alst_backward(cursor, tau_fn(problem, w));
    }

    if mv.truck_saving {
        solution.remove_route(mv.source_route, problem.n());
    } else {
        let source = &mut solution.routes_mut()[mv.source_route];
        if let Some(w) = mv.new_source_workers {
            source.set_workers(w);
        }
        let w = source.workers();
        source.recompute_aest_forward(before_idx, tau_fn(problem, w));
        source.recompute_alst_backward(after_gap_idx, tau_fn(problem, w));
    }

    tabu.update_tabulist_move(&moved_ids, mv.source_route);
}

/// Relocates one or two consecutive nodes between routes until no further
/// improving move exists. Returns the number of moves applied.
pub fn move_all(problem: &Problem, solution: &mut Solution, tabu: &mut TabuList, reduction_state: ReductionState, max_move: usize, best_moves: bool) -> usize {
    if max_move == 0 {
        return 0;
    }
    let mut applied = 0;
    while let Some(mv) = scan(problem, solution, tabu, reduction_state, max_move, best_moves, true) {
        apply_move(problem, solution, tabu, mv);
        applied += 1;
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::problem::{CostWeights, I1Params};
    use crate::model::Node;

    fn problem_two_routes_one_node_each_far_apart() -> Problem {
        let nodes = vec![
            Node::new(0, 0.0, 0.0, 0, 0.0, 10000.0, 0.0),
            Node::new(1, 1.0, 0.0, 5, 0.0, 10000.0, 0.0),
            Node::new(2, -1.0, 0.0, 5, 0.0, 10000.0, 0.0),
        ];
        Problem::new(
            "t".into(),
            nodes,
            100,
            1,
            I1Params { alpha: 1.0, mu: 1.0, lambda: 2.0 },
            CostWeights { truck: 1_000_000.0, worker: 1_000.0, distance: 1.0 },
        )
    }

    #[test]
    fn test_move_all_empties_singleton_route_when_cheaper() {
        let problem = problem_two_routes_one_node_each_far_apart();
        let depot = problem.depot().clone();
        let mut solution = crate::model::Solution::new(Vec::new());
        let mut r0 = Route::new_with_seed(0, 3, &depot, problem.nodes[1].record(), 1);
        r0.recompute_all(tau_fn(&problem, 1));
        let mut r1 = Route::new_with_seed(1, 4, &depot, problem.nodes[2].record(), 1);
        r1.recompute_all(tau_fn(&problem, 1));
        solution.push_route(r0);
        solution.push_route(r1);

        let mut tabu = TabuList::new(problem.n(), 5, false);
        let applied = move_all(&problem, &mut solution, &mut tabu, ReductionState::ReduceTrucks, 2, false);
        assert_eq!(applied, 1);
        assert_eq!(solution.routes().len(), 1);
    }

    #[test]
    fn test_move_all_noop_when_max_move_zero() {
        let problem = problem_two_routes_one_node_each_far_apart();
        let depot = problem.depot().clone();
        let mut solution = crate::model::Solution::new(Vec::new());
        solution.push_route(Route::new_with_seed(0, 3, &depot, problem.nodes[1].record(), 1));
        let mut tabu = TabuList::new(problem.n(), 5, false);
        assert_eq!(move_all(&problem, &mut solution, &mut tabu, ReductionState::ReduceTrucks, 0, false), 0);
    }
}
