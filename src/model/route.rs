//! Arena-backed doubly linked route.
//!
//! A route is an arena of node slots, each carrying a `prev`/`next` index
//! into the same arena. The first and last slots are depot sentinels
//! (distinct instances, both clones of node 0); interior slots hold
//! customer [`NodeRecord`]s. Splicing a node or a run of nodes in or out is
//! O(1) relinking plus O(k) record copies, with no shifting of unrelated
//! slots — the property the source's doubly linked list exists for.

use super::node::{Node, NodeRecord};

#[derive(Debug, Clone)]
struct Slot {
    record: NodeRecord,
    prev: Option<usize>,
    next: Option<usize>,
}

/// A vehicle route: a sequence of depot → customers → depot with a
/// current worker count and cached load.
#[derive(Debug, Clone)]
pub struct Route {
    id: usize,
    depot_vr_id: usize,
    slots: Vec<Option<Slot>>,
    free: Vec<usize>,
    head: usize,
    tail: usize,
    load: i32,
    workers: usize,
    interior_len: usize,
}

impl Route {
    /// Creates an empty route (just the two depot sentinels).
    pub fn new_empty(id: usize, depot_vr_id: usize, depot: &Node, workers: usize) -> Self {
        let head_slot = Slot {
            record: depot.record(),
            prev: None,
            next: Some(1),
        };
        let tail_slot = Slot {
            record: depot.record(),
            prev: Some(0),
            next: None,
        };
        Self {
            id,
            depot_vr_id,
            slots: vec![Some(head_slot), Some(tail_slot)],
            free: Vec::new(),
            head: 0,
            tail: 1,
            load: 0,
            workers,
            interior_len: 0,
        }
    }

    /// Creates a route seeded with a single customer.
    pub fn new_with_seed(
        id: usize,
        depot_vr_id: usize,
        depot: &Node,
        seed: NodeRecord,
        workers: usize,
    ) -> Self {
        let mut route = Self::new_empty(id, depot_vr_id, depot, workers);
        route.insert_after(route.head, seed);
        route
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn depot_vr_id(&self) -> usize {
        self.depot_vr_id
    }

    /// Reassigns this route's id and virtual pheromone depot id, used by
    /// [`super::solution::Solution::remove_route`] to keep ids dense after
    /// a route is dropped.
    pub fn set_identity(&mut self, id: usize, depot_vr_id: usize) {
        self.id = id;
        self.depot_vr_id = depot_vr_id;
    }

    pub fn head(&self) -> usize {
        self.head
    }

    pub fn tail(&self) -> usize {
        self.tail
    }

    pub fn is_depot(&self, idx: usize) -> bool {
        idx == self.head || idx == self.tail
    }

    fn slot(&self, idx: usize) -> &Slot {
        self.slots[idx].as_ref().expect("dangling route slot index")
    }

    fn slot_mut(&mut self, idx: usize) -> &mut Slot {
        self.slots[idx].as_mut().expect("dangling route slot index")
    }

    pub fn record(&self, idx: usize) -> &NodeRecord {
        &self.slot(idx).record
    }

    pub fn record_mut(&mut self, idx: usize) -> &mut NodeRecord {
        &mut self.slot_mut(idx).record
    }

    pub fn next(&self, idx: usize) -> Option<usize> {
        self.slot(idx).next
    }

    pub fn prev(&self, idx: usize) -> Option<usize> {
        self.slot(idx).prev
    }

    pub fn first_interior(&self) -> Option<usize> {
        self.next(self.head).filter(|&i| i != self.tail)
    }

    pub fn last_interior(&self) -> Option<usize> {
        self.prev(self.tail).filter(|&i| i != self.head)
    }

    /// Interior node slot indices in route order (excludes the depot
    /// sentinels).
    pub fn iter_interior(&self) -> impl Iterator<Item = usize> + '_ {
        let mut cur = self.first_interior();
        std::iter::from_fn(move || {
            let idx = cur?;
            cur = self.next(idx).filter(|&i| i != self.tail);
            Some(idx)
        })
    }

    /// Total slot count, including both depot sentinels.
    pub fn len(&self) -> usize {
        self.interior_len + 2
    }

    /// All slot indices in route order, including both depot sentinels.
    pub fn iter_all(&self) -> impl Iterator<Item = usize> + '_ {
        let mut cur = Some(self.head);
        std::iter::from_fn(move || {
            let idx = cur?;
            cur = self.next(idx);
            Some(idx)
        })
    }

    pub fn is_empty(&self) -> bool {
        self.interior_len == 0
    }

    pub fn interior_len(&self) -> usize {
        self.interior_len
    }

    pub fn load(&self) -> i32 {
        self.load
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn set_workers(&mut self, w: usize) {
        self.workers = w;
    }

    fn alloc(&mut self, record: NodeRecord, prev: Option<usize>, next: Option<usize>) -> usize {
        let slot = Slot { record, prev, next };
        if let Some(idx) = self.free.pop() {
            self.slots[idx] = Some(slot);
            idx
        } else {
            self.slots.push(Some(slot));
            self.slots.len() - 1
        }
    }

    /// Splices a new node in directly after `after`. Returns its slot index.
    pub fn insert_after(&mut self, after: usize, record: NodeRecord) -> usize {
        let next = self.next(after).expect("insert_after: dangling successor");
        self.load += record.demand;
        self.interior_len += 1;
        let new_idx = self.alloc(record, Some(after), Some(next));
        self.slot_mut(after).next = Some(new_idx);
        self.slot_mut(next).prev = Some(new_idx);
        new_idx
    }

    /// Removes and returns the run of interior nodes `[first..=last]`
    /// (inclusive, walking `next` from `first` to `last`), relinking the
    /// gap. Both `first` and `last` must be interior nodes.
    pub fn remove_run(&mut self, first: usize, last: usize) -> Vec<NodeRecord> {
        let before = self.prev(first).expect("remove_run: first has no prev");
        let after = self.next(last).expect("remove_run: last has no next");

        let mut records = Vec::new();
        let mut idx = first;
        loop {
            let next = self.next(idx);
            let slot = self.slots[idx].take().expect("remove_run: dangling slot");
            self.load -= slot.record.demand;
            self.interior_len -= 1;
            records.push(slot.record);
            self.free.push(idx);
            if idx == last {
                break;
            }
            idx = next.expect("remove_run: run ended before reaching `last`");
        }

        self.slot_mut(before).next = Some(after);
        self.slot_mut(after).prev = Some(before);
        records
    }

    /// Removes a single interior node.
    pub fn remove_one(&mut self, idx: usize) -> NodeRecord {
        self.remove_run(idx, idx).remove(0)
    }

    /// Swaps the customer-facing payload (id/demand/est/lst/service) of
    /// two interior slots in place, leaving `aest`/`alst` to be recomputed
    /// by the caller. Used by the swap operator, including the degenerate
    /// case of swapping within the same route (`other` aliasing `self` is
    /// not supported — call sites always operate on two distinct routes).
    pub fn swap_payload(&mut self, idx: usize, other: &mut Route, other_idx: usize) {
        let a = *self.record(idx);
        let b = *other.record(other_idx);

        self.record_mut(idx).id = b.id;
        self.record_mut(idx).demand = b.demand;
        self.record_mut(idx).est = b.est;
        self.record_mut(idx).lst = b.lst;
        self.record_mut(idx).service = b.service;

        other.record_mut(other_idx).id = a.id;
        other.record_mut(other_idx).demand = a.demand;
        other.record_mut(other_idx).est = a.est;
        other.record_mut(other_idx).lst = a.lst;
        other.record_mut(other_idx).service = a.service;

        self.load += b.demand - a.demand;
        other.load += a.demand - b.demand;
    }

    /// Recomputes `aest` forward from `start` to the tail depot sentinel,
    /// using `tau(i, j)` as the travel-plus-service time from `i` to `j`.
    pub fn recompute_aest_forward<F: Fn(usize, usize) -> f64>(&mut self, start: usize, tau: F) {
        let mut idx = start;
        if idx == self.head {
            idx = match self.next(idx) {
                Some(n) => n,
                None => return,
            };
        }
        loop {
            let prev = self.prev(idx).expect("recompute_aest_forward: no prev");
            let prev_aest = self.record(prev).aest;
            let prev_id = self.record(prev).id;
            let cur_id = self.record(idx).id;
            let travel = tau(prev_id, cur_id);
            let new_aest = (prev_aest + travel).max(self.record(idx).est);
            self.record_mut(idx).aest = new_aest;
            if idx == self.tail {
                break;
            }
            idx = self.next(idx).expect("recompute_aest_forward: no next");
        }
    }

    /// Recomputes `alst` backward from `start` to the head depot sentinel.
    pub fn recompute_alst_backward<F: Fn(usize, usize) -> f64>(&mut self, start: usize, tau: F) {
        let mut idx = start;
        if idx == self.tail {
            idx = match self.prev(idx) {
                Some(p) => p,
                None => return,
            };
        }
        loop {
            let next = self.next(idx).expect("recompute_alst_backward: no next");
            let next_alst = self.record(next).alst;
            let next_id = self.record(next).id;
            let cur_id = self.record(idx).id;
            let travel = tau(cur_id, next_id);
            let new_alst = (next_alst - travel).min(self.record(idx).lst);
            self.record_mut(idx).alst = new_alst;
            if idx == self.head {
                break;
            }
            idx = self.prev(idx).expect("recompute_alst_backward: no prev");
        }
    }

    /// Full recomputation of `aest`/`alst` across the whole route. Used
    /// after heavier structural changes (splices spanning several nodes).
    pub fn recompute_all<F: Fn(usize, usize) -> f64>(&mut self, tau: F) {
        self.recompute_aest_forward(self.head, &tau);
        self.recompute_alst_backward(self.tail, &tau);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depot() -> Node {
        Node::new(0, 0.0, 0.0, 0, 0.0, 1000.0, 0.0)
    }

    fn tau_zero(_i: usize, _j: usize) -> f64 {
        0.0
    }

    #[test]
    fn test_empty_route_len() {
        let r = Route::new_empty(0, 10, &depot(), 1);
        assert_eq!(r.len(), 2);
        assert!(r.is_empty());
        assert_eq!(r.load(), 0);
    }

    #[test]
    fn test_seeded_route() {
        let seed = Node::new(1, 5.0, 0.0, 10, 0.0, 100.0, 2.0).record();
        let r = Route::new_with_seed(0, 10, &depot(), seed, 1);
        assert_eq!(r.len(), 3);
        assert_eq!(r.load(), 10);
        let interior: Vec<usize> = r.iter_interior().collect();
        assert_eq!(interior.len(), 1);
        assert_eq!(r.record(interior[0]).id, 1);
    }

    #[test]
    fn test_insert_and_remove_run() {
        let mut r = Route::new_empty(0, 10, &depot(), 1);
        let a = Node::new(1, 1.0, 0.0, 5, 0.0, 100.0, 0.0).record();
        let b = Node::new(2, 2.0, 0.0, 5, 0.0, 100.0, 0.0).record();
        let ia = r.insert_after(r.head(), a);
        let ib = r.insert_after(ia, b);
        assert_eq!(r.interior_len(), 2);
        assert_eq!(r.load(), 10);

        let removed = r.remove_run(ia, ib);
        assert_eq!(removed.len(), 2);
        assert_eq!(removed[0].id, 1);
        assert_eq!(removed[1].id, 2);
        assert_eq!(r.interior_len(), 0);
        assert_eq!(r.load(), 0);
        assert_eq!(r.next(r.head()), Some(r.tail()));
    }

    #[test]
    fn test_recompute_forward_respects_est() {
        let mut r = Route::new_empty(0, 10, &depot(), 1);
        let a = Node::new(1, 0.0, 0.0, 0, 50.0, 100.0, 0.0).record();
        let idx = r.insert_after(r.head(), a);
        r.recompute_aest_forward(r.head(), tau_zero);
        assert_eq!(r.record(idx).aest, 50.0);
    }
}
