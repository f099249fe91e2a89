//! Noise injection.
//!
//! Each regime produces its own noisy copy of the true matrix. For a cell with
//! true value `v` the observation is log-normal with linear-scale mean `v` and
//! sd `regime.sd_for(v)`, so observations stay strictly positive and unbiased.
//!
//! Random streams: the regime at position `i` of the configured list draws from
//! ChaCha stream `i + 1` of the run seed (the population uses stream 0). A
//! regime's matrix therefore depends only on the seed and its position, never
//! on which other regimes ran before it.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rankfid_core::error::SimError;
use rankfid_core::types::{AttributeMatrix, NoiseRegime, NoisyMatrix};
use tracing::{debug, info};

use crate::lognormal::LogNormalParams;

/// Stream reserved for the population draw.
pub const POPULATION_STREAM: u64 = 0;

/// Random source for the population.
pub fn population_rng(seed: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(POPULATION_STREAM);
    rng
}

/// Random source for the regime at `index` in the configured list.
pub fn regime_rng(seed: u64, index: usize) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(index as u64 + 1);
    rng
}

/// Draw one noisy observation of `true_value` under `regime`.
pub fn observe<R: Rng + ?Sized>(
    true_value: f64,
    regime: &NoiseRegime,
    rng: &mut R,
) -> Result<f64, SimError> {
    let params = LogNormalParams::from_moments(true_value, regime.sd_for(true_value))?;
    Ok(params.sample(rng)?)
}

/// Noisy copy of `truth` under one regime. Cells are drawn in row-major order.
pub fn inject<R: Rng + ?Sized>(
    truth: &AttributeMatrix,
    regime: &NoiseRegime,
    rng: &mut R,
) -> Result<AttributeMatrix, SimError> {
    truth.ensure_positive("noise")?;
    let values = truth
        .as_slice()
        .iter()
        .map(|&v| observe(v, regime, &mut *rng))
        .collect::<Result<Vec<_>, _>>()?;

    let noisy = AttributeMatrix::from_row_major(truth.rows(), truth.cols(), values)?;
    noisy.ensure_positive("noise")?;
    debug!(regime = %regime.name, cells = noisy.as_slice().len(), "noise: regime applied");
    Ok(noisy)
}

/// Apply every regime independently to the same true matrix.
pub fn inject_all(
    truth: &AttributeMatrix,
    regimes: &[NoiseRegime],
    seed: u64,
) -> Result<Vec<NoisyMatrix>, SimError> {
    let noisy = regimes
        .iter()
        .enumerate()
        .map(|(index, regime)| {
            let mut rng = regime_rng(seed, index);
            inject(truth, regime, &mut rng).map(|matrix| NoisyMatrix {
                regime: regime.clone(),
                matrix,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    info!(regimes = noisy.len(), "noise: all regimes applied");
    Ok(noisy)
}
