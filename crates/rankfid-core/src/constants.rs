//! Reference parameters of the study. All values are linear scale.

/// Number of simulated entities in a reference run.
pub const DEFAULT_POPULATION_SIZE: usize = 10_000;

/// Latent attributes per entity.
pub const DEFAULT_ATTRIBUTE_COUNT: usize = 10;

/// Target mean of every latent attribute.
pub const DEFAULT_ATTRIBUTE_MEAN: f64 = 2.0;

/// Target standard deviation of every latent attribute.
pub const DEFAULT_ATTRIBUTE_SD: f64 = 1.0;

/// Weight applied to the second sub-product of the `mixed` true rating.
pub const DEFAULT_MIXED_WEIGHT: f64 = 5.0;

/// Seed of the reference run.
pub const DEFAULT_SEED: u64 = 13;

/// Standard deviations of the three constant noise regimes (small, medium, large).
pub const CONSTANT_NOISE_SDS: [f64; 3] = [0.125, 0.25, 1.0];

/// Default population slices as `(name, fraction of the population)`.
///
/// Fractions select the top entities by true rank.
pub const DEFAULT_SLICES: [(&str, f64); 3] = [("all", 1.0), ("top-10pct", 0.10), ("top-1pct", 0.01)];

/// Environment variable prefix recognised by the configuration loader.
pub const ENV_PREFIX: &str = "RANKFID";
