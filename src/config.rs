//! Typed solver configuration: serde (de)serialization from a JSON config
//! file, layered with `clap` CLI overrides.

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SolverError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Metaheuristic {
    None,
    Aco,
    CachedAco,
    Gaco,
    Grasp,
    CachedGrasp,
    Ts,
    Vns,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum StartHeuristic {
    Solomon,
    #[serde(rename = "solomon-mr")]
    SolomonMr,
    Parallel,
}

/// Mirrors every key in the configuration table: runtime/iteration
/// budgets, the chosen metaheuristic and construction heuristic, I1
/// parameters, ACO/GRASP/TS parameters, local-search toggles, and the
/// PRNG seed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub runtime: u64,
    pub max_iterations: usize,
    pub metaheuristic: Metaheuristic,
    pub start_heuristic: StartHeuristic,
    pub deterministic: bool,

    pub max_workers: usize,

    pub adapt_service_times: bool,
    pub service_rate: f64,
    pub truck_velocity: f64,

    pub cost_truck: f64,
    pub cost_worker: f64,
    pub cost_distance: f64,

    pub alpha: f64,
    pub mu: f64,
    pub lambda: f64,

    pub ants: usize,
    pub rho: f64,
    pub min_pheromone: f64,
    pub initial_pheromone: f64,

    pub use_weights: bool,
    pub rcl_size: usize,

    pub tabutime: usize,

    pub do_ls: bool,
    pub max_move: u8,
    pub best_moves: bool,
    pub max_swap: u8,

    pub max_failed_attempts: usize,

    pub seed: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            runtime: 0,
            max_iterations: 0,
            metaheuristic: Metaheuristic::Aco,
            start_heuristic: StartHeuristic::Solomon,
            deterministic: false,
            max_workers: 3,
            adapt_service_times: false,
            service_rate: 1.0,
            truck_velocity: 1.0,
            cost_truck: 1_000_000.0,
            cost_worker: 1_000.0,
            cost_distance: 1.0,
            alpha: 1.0,
            mu: 1.0,
            lambda: 2.0,
            ants: 0,
            rho: 0.9,
            min_pheromone: 0.01,
            initial_pheromone: 0.5,
            use_weights: true,
            rcl_size: 5,
            tabutime: 10,
            do_ls: true,
            max_move: 2,
            best_moves: false,
            max_swap: 1,
            max_failed_attempts: 10,
            seed: 0,
        }
    }
}

impl SolverConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: SolverConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_move > 2 {
            return Err(SolverError::Configuration(format!(
                "max_move must be in 0..=2, got {}",
                self.max_move
            )));
        }
        if self.max_swap > 1 {
            return Err(SolverError::Configuration(format!(
                "max_swap must be in 0..=1, got {}",
                self.max_swap
            )));
        }
        if self.max_workers == 0 {
            return Err(SolverError::Configuration("max_workers must be >= 1".into()));
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(SolverError::Configuration(format!("alpha must be in [0,1], got {}", self.alpha)));
        }
        if self.rho <= 0.0 || self.rho > 1.0 {
            return Err(SolverError::Configuration(format!("rho must be in (0,1], got {}", self.rho)));
        }
        if self.min_pheromone < 0.0 {
            return Err(SolverError::Configuration("min_pheromone must be >= 0".into()));
        }
        for (name, value) in [
            ("cost_truck", self.cost_truck),
            ("cost_worker", self.cost_worker),
            ("cost_distance", self.cost_distance),
            ("mu", self.mu),
            ("lambda", self.lambda),
            ("service_rate", self.service_rate),
            ("truck_velocity", self.truck_velocity),
        ] {
            if value < 0.0 {
                return Err(SolverError::Configuration(format!("{name} must be >= 0, got {value}")));
            }
        }
        Ok(())
    }

    /// Applies any CLI overrides the user actually passed.
    pub fn apply_overrides(&mut self, overrides: &CliOverrides) {
        if let Some(v) = overrides.runtime {
            self.runtime = v;
        }
        if let Some(v) = overrides.max_iterations {
            self.max_iterations = v;
        }
        if let Some(v) = overrides.metaheuristic {
            self.metaheuristic = v;
        }
        if let Some(v) = overrides.start_heuristic {
            self.start_heuristic = v;
        }
        if overrides.deterministic {
            self.deterministic = true;
        }
        if let Some(v) = overrides.seed {
            self.seed = v;
        }
        if let Some(v) = overrides.max_workers {
            self.max_workers = v;
        }
    }
}

/// CLI-argument overrides layered on top of a loaded (or default) config.
#[derive(Debug, Parser, Default)]
#[command(name = "vrptwms-solver", about = "Metaheuristic VRPTWMS solver")]
pub struct CliOverrides {
    /// Solomon-format instance file(s) to solve.
    pub instances: Vec<String>,

    /// Path to a JSON configuration file; defaults are used if omitted.
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long)]
    pub runtime: Option<u64>,

    #[arg(long)]
    pub max_iterations: Option<usize>,

    #[arg(long, value_enum)]
    pub metaheuristic: Option<Metaheuristic>,

    #[arg(long, value_enum)]
    pub start_heuristic: Option<StartHeuristic>,

    #[arg(long)]
    pub deterministic: bool,

    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long)]
    pub max_workers: Option<usize>,

    /// Write a CSV summary row instead of the human-readable table.
    #[arg(long)]
    pub csv: bool,

    /// Append a per-route detail dump to this file.
    #[arg(long)]
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        assert!(SolverConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_max_move_out_of_range() {
        let mut config = SolverConfig::default();
        config.max_move = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_alpha_out_of_range() {
        let mut config = SolverConfig::default();
        config.alpha = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_roundtrip() {
        let config = SolverConfig::default();
        let text = serde_json::to_string(&config).expect("serialize");
        let parsed = SolverConfig::from_json(&text).expect("parse");
        assert_eq!(parsed.seed, config.seed);
        assert_eq!(parsed.max_move, config.max_move);
    }

    #[test]
    fn test_from_json_rejects_unknown_metaheuristic() {
        let bad = r#"{"metaheuristic": "not_a_real_one"}"#;
        assert!(SolverConfig::from_json(bad).is_err());
    }
}
