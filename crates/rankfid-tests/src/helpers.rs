//! Shared test helpers for end-to-end and statistical tests.

use rankfid_core::config::SimulationConfig;
use rankfid_core::types::{AttributeMatrix, NoiseRegime, NoiseRule};
use rankfid_sim::{Simulation, SimulationRun};

/// Regime with so little noise that observations equal the truth to ~1e-9.
pub const NOISELESS: &str = "noiseless";

pub fn noiseless_regime() -> NoiseRegime {
    NoiseRegime::new(NOISELESS, NoiseRule::Constant { sd: 1e-9 })
}

/// Reference configuration with a different population size and seed.
pub fn config(population_size: usize, seed: u64) -> SimulationConfig {
    SimulationConfig {
        population_size,
        seed,
        ..SimulationConfig::default()
    }
}

/// Reference regimes plus the noiseless baseline.
pub fn config_with_baseline(population_size: usize, seed: u64) -> SimulationConfig {
    let mut cfg = config(population_size, seed);
    cfg.regimes.push(noiseless_regime());
    cfg
}

pub fn run(cfg: SimulationConfig) -> SimulationRun {
    Simulation::new(cfg).unwrap().run().unwrap()
}

/// Matrix with every cell equal to `value`.
pub fn flat_matrix(value: f64, rows: usize, cols: usize) -> AttributeMatrix {
    AttributeMatrix::from_row_major(rows, cols, vec![value; rows * cols]).unwrap()
}

/// `(mean, sample sd)` of a series.
pub fn moments(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, var.sqrt())
}

/// `|a - b| <= tol * |b|`
pub fn within(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol * b.abs()
}
