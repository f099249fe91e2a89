//! # rankfid-sim: Monte Carlo study of rating aggregation.
//!
//! The pipeline runs once per configuration, each phase allocating new data:
//! - **Parameterizer** ([`lognormal`]): linear-scale mean/sd to log-space
//!   normal parameters, so every sampled value is strictly positive.
//! - **Population** ([`population`]): `N x K` latent attributes from one target distribution.
//! - **Ground truth** ([`truth`]): `product` and `mixed` true ratings with rankings.
//! - **Noise** ([`noise`]): one noisy copy of the matrix per regime, centred on the true values.
//! - **Aggregation** ([`aggregate`]): `sum` and `product` estimates per regime.
//! - **Evaluation** ([`evaluate`]): rank-error spread and log-scale correlation per
//!   population slice, with slices fixed by true rank.
//!
//! [`pipeline::Simulation`] drives the phases in order.

pub mod aggregate;
pub mod evaluate;
pub mod lognormal;
pub mod noise;
pub mod pipeline;
pub mod population;
pub mod ranking;
pub mod stats;
pub mod truth;

pub use lognormal::LogNormalParams;
pub use pipeline::{Simulation, SimulationRun};
