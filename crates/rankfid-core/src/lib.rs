//! # rankfid-core
//! Shared types, configuration, and errors for the rankfid simulation.

pub mod config;
pub mod constants;
pub mod error;
pub mod table;
pub mod traits;
pub mod types;
