//! Distance and travel-time matrices.
//!
//! - [`DistanceMatrix`] — dense Euclidean distance matrix
//! - [`CostMatrices`] — per-worker travel+service matrices (`τ_w`)
//! - [`adapt_service_times`] — Reimann (2011) service-time adaptation

mod cost;
mod matrix;

pub use cost::{adapt_service_times, CostMatrices};
pub use matrix::DistanceMatrix;
