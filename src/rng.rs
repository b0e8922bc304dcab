//! A single reproducible randomness source.
//!
//! The solver is single-threaded and uses exactly one PRNG stream, seeded
//! once at startup. Reproducibility across runs with the same seed also
//! requires deterministic iteration order everywhere the PRNG is consulted
//! (insertion order for unrouted lists, ascending id order for route-pair
//! enumeration) — the PRNG alone is not sufficient.

use rand::rngs::StdRng;
use rand::SeedableRng;

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_same_seed_yields_same_sequence() {
        let mut a = seeded_rng(42);
        let mut b = seeded_rng(42);
        let xs: Vec<u32> = (0..10).map(|_| a.random()).collect();
        let ys: Vec<u32> = (0..10).map(|_| b.random()).collect();
        assert_eq!(xs, ys);
    }
}
