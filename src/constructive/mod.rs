//! Constructive heuristics: deterministic and stochastic Solomon I1,
//! GRASP with a restricted candidate list, and the ACO parallel-route
//! construction variant.

mod cost;
mod grasp;
mod parallel;
mod solomon;

pub use cost::{attractiveness, insertion_cost};
pub use grasp::grasp_construct;
pub use parallel::{parallel_construct, sequential_finish};
pub use solomon::{solomon_deterministic, solomon_stochastic};

use rand::Rng;

/// Weighted roulette-wheel selection over non-negative `weights`. Falls
/// back to index 0 if every weight is non-positive.
pub(crate) fn roulette_select<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> usize {
    let total: f64 = weights.iter().sum();
    if !(total > 0.0) {
        return 0;
    }
    let mut pick = rng.random_range(0.0..total);
    for (i, &w) in weights.iter().enumerate() {
        if pick < w {
            return i;
        }
        pick -= w;
    }
    weights.len() - 1
}
