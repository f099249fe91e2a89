//! One-shot driver running every phase in dependency order.
//!
//! population -> truth -> noise -> aggregation -> evaluation
//!
//! Each phase reads earlier outputs by reference and allocates its own. The
//! returned [`SimulationRun`] keeps all of them so reports can slice or plot
//! any series without recomputation.

use rankfid_core::config::SimulationConfig;
use rankfid_core::error::SimError;
use rankfid_core::table::EvaluationTable;
use rankfid_core::types::{
    AttributeMatrix, CombinationRule, Estimate, NoisyMatrix, SliceSpec, TrueRating, TruthDefinition,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::aggregate::aggregate_all;
use crate::evaluate::{evaluate, slice_members};
use crate::noise::{inject_all, population_rng};
use crate::population::PopulationGenerator;
use crate::truth::compose_all;

/// A validated configuration ready to run.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run the full pipeline once.
    pub fn run(&self) -> Result<SimulationRun, SimError> {
        let cfg = &self.config;
        info!(
            entities = cfg.population_size,
            attributes = cfg.attribute_count,
            regimes = cfg.regimes.len(),
            slices = cfg.slices.len(),
            seed = cfg.seed,
            "simulation: starting"
        );

        let truth = PopulationGenerator::from_config(cfg)?.generate(&mut population_rng(cfg.seed))?;
        let ratings = compose_all(&truth, &TruthDefinition::ALL, cfg.mixed_weight)?;
        let noisy = inject_all(&truth, &cfg.regimes, cfg.seed)?;
        let estimates = aggregate_all(&noisy, &CombinationRule::ALL)?;
        let table = evaluate(&ratings, &estimates, &cfg.slices)?;

        info!(cells = table.len(), "simulation: finished");
        Ok(SimulationRun {
            config: cfg.clone(),
            truth,
            ratings,
            noisy,
            estimates,
            table,
        })
    }
}

/// Everything one run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRun {
    pub config: SimulationConfig,
    /// True latent attributes, `population_size x attribute_count`.
    pub truth: AttributeMatrix,
    pub ratings: Vec<TrueRating>,
    /// One matrix per configured regime, in configured order.
    pub noisy: Vec<NoisyMatrix>,
    /// One estimate per (regime, rule), regime-major.
    pub estimates: Vec<Estimate>,
    pub table: EvaluationTable,
}

impl SimulationRun {
    pub fn rating(&self, definition: TruthDefinition) -> Option<&TrueRating> {
        self.ratings.iter().find(|r| r.definition == definition)
    }

    pub fn noisy(&self, regime: &str) -> Option<&NoisyMatrix> {
        self.noisy.iter().find(|n| n.regime.name == regime)
    }

    pub fn estimate(&self, regime: &str, rule: CombinationRule) -> Option<&Estimate> {
        self.estimates
            .iter()
            .find(|e| e.regime == regime && e.rule == rule)
    }

    pub fn slice(&self, name: &str) -> Option<&SliceSpec> {
        self.config.slices.iter().find(|s| s.name == name)
    }

    /// `(ln(true_rating), ln(estimate))` for each member of a slice, best entity first.
    ///
    /// This is the scatter series a report plots for one evaluation cell.
    pub fn log_pairs(
        &self,
        definition: TruthDefinition,
        regime: &str,
        rule: CombinationRule,
        slice: &str,
    ) -> Option<Vec<(f64, f64)>> {
        let truth = self.rating(definition)?;
        let estimate = self.estimate(regime, rule)?;
        let slice = self.slice(slice)?;
        Some(
            slice_members(truth, slice)
                .iter()
                .map(|&e| (truth.values[e].ln(), estimate.values[e].ln()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankfid_core::error::ConfigError;

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            population_size: 400,
            attribute_count: 6,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn invalid_config_rejected_up_front() {
        let cfg = SimulationConfig {
            population_size: 0,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            Simulation::new(cfg),
            Err(SimError::Config(ConfigError::Invalid(_)))
        ));
    }

    #[test]
    fn run_produces_every_artifact() {
        let run = Simulation::new(small_config()).unwrap().run().unwrap();
        assert_eq!((run.truth.rows(), run.truth.cols()), (400, 6));
        assert_eq!(run.ratings.len(), 2);
        assert_eq!(run.noisy.len(), 5);
        assert_eq!(run.estimates.len(), 10);
        assert_eq!(run.table.len(), 2 * 5 * 2 * 3);
    }

    #[test]
    fn lookups_by_name() {
        let run = Simulation::new(small_config()).unwrap().run().unwrap();
        assert!(run.rating(TruthDefinition::Mixed).is_some());
        assert!(run.noisy("constant-0.25").is_some());
        assert!(run.noisy("missing").is_none());
        assert!(run.estimate("sqrt-proportional", CombinationRule::Product).is_some());
    }

    #[test]
    fn log_pairs_follow_slice_size() {
        let run = Simulation::new(small_config()).unwrap().run().unwrap();
        let pairs = run
            .log_pairs(TruthDefinition::Product, "constant-1", CombinationRule::Sum, "top-10pct")
            .unwrap();
        assert_eq!(pairs.len(), 40);
        // Best true entity first.
        assert!(pairs.windows(2).all(|w| w[0].0 >= w[1].0));
        assert!(run
            .log_pairs(TruthDefinition::Product, "constant-1", CombinationRule::Sum, "nope")
            .is_none());
    }

    #[test]
    fn truth_is_untouched_by_later_phases() {
        let sim = Simulation::new(small_config()).unwrap();
        let run = sim.run().unwrap();
        let fresh = PopulationGenerator::from_config(sim.config())
            .unwrap()
            .generate(&mut population_rng(sim.config().seed))
            .unwrap();
        assert_eq!(run.truth, fresh);
    }
}
