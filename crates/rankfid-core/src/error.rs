//! Error types for the rankfid pipeline.
use thiserror::Error;

/// A log-normal parameterisation was requested with unusable moments.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("mean must be positive and finite, got {0}")] NonPositiveMean(f64),
    #[error("standard deviation must be positive and finite, got {0}")] NonPositiveSd(f64),
    #[error("log-space parameters not finite for mean {mean}, sd {sd}")] NonFiniteResult { mean: f64, sd: f64 },
}

/// A precondition checked at a phase boundary did not hold.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhaseError {
    #[error("{phase}: non-positive value {value} at entity {entity}, attribute {attribute}")] NonPositiveCell { phase: &'static str, entity: usize, attribute: usize, value: f64 },
    #[error("{phase}: non-positive or non-finite value {value} at entity {entity}")] InvalidScalar { phase: &'static str, entity: usize, value: f64 },
    #[error("{phase}: length mismatch, expected {expected}, got {got}")] ShapeMismatch { phase: &'static str, expected: usize, got: usize },
    #[error("{phase}: empty input")] Empty { phase: &'static str },
}

/// A population slice cannot support the requested statistic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SliceError {
    #[error("degenerate slice with {size} member(s)")] Degenerate { size: usize },
    #[error("zero variance across {size} members")] ZeroVariance { size: usize },
    #[error("series length mismatch: {left} != {right}")] LengthMismatch { left: usize, right: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")] Invalid(String),
    #[error("failed to load configuration: {0}")] Load(String),
}

#[derive(Error, Debug)]
pub enum SimError {
    #[error(transparent)] Parameter(#[from] ParameterError),
    #[error(transparent)] Phase(#[from] PhaseError),
    #[error(transparent)] Slice(#[from] SliceError),
    #[error(transparent)] Config(#[from] ConfigError),
}
