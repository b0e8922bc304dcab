//! # vrptwms-solver
//!
//! A metaheuristic solver for the vehicle routing problem with time
//! windows and multiple service workers per stop (VRPTWMS): trucks carry
//! a configurable number of workers, and a stop's service time shortens
//! with more workers assigned to it.
//!
//! ## Modules
//!
//! - [`model`] — nodes, routes, solutions, and the immutable problem instance
//! - [`distance`] — per-worker travel+service cost matrices and Reimann service-time adaptation
//! - [`feasibility`] — time-window and capacity feasibility checks
//! - [`pheromone`] — the ACO pheromone store over virtual per-route depots
//! - [`cache`] — the cost-hash solution cache
//! - [`tabu`] — the tabu bookkeeping matrix
//! - [`state`] — mutable search-driver state shared across metaheuristics
//! - [`constructive`] — Solomon I1 (deterministic/stochastic), GRASP-RCL, and parallel construction
//! - [`local_search`] — relocation, swap, and worker-shedding operators
//! - [`metaheuristic`] — ACO, cached ACO, GRASP, cached GRASP, TS, and VNS drivers
//! - [`config`] — solver configuration, CLI overrides, and validation
//! - [`parser`] — Solomon-format instance file parsing
//! - [`report`] — human-readable and CSV result reporting
//! - [`error`] — the crate's error type
//! - [`rng`] — seeded RNG construction

pub mod cache;
pub mod config;
pub mod constructive;
pub mod distance;
pub mod error;
pub mod feasibility;
pub mod local_search;
pub mod metaheuristic;
pub mod model;
pub mod parser;
pub mod pheromone;
pub mod report;
pub mod rng;
pub mod state;
pub mod tabu;
