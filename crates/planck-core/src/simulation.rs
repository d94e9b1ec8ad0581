// ─────────────────────────────────────────────────────────────────────
// Planck Epoch Lab — Simulation Pipeline
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Integrate, sample derived series, evaluate hypotheses and stability.

use crate::cosmology::CosmologyModel;
use crate::driver::{IntegrationDriver, IntegrationOutcome, METHOD_NAME};
use crate::experiments::StandardModelReference;
use crate::hypothesis::HypothesisEvaluator;
use crate::stability::assess_stability;
use ndarray::Array1;
use planck_types::config::ModelConfig;
use planck_types::constants::PhysicalConstant;
use planck_types::error::PlanckResult;
use planck_types::results::{HypothesisReport, SimulationSummary, StabilityAssessment};
use planck_types::state::Trajectory;
use std::collections::BTreeMap;
use tracing::info;

/// Quantities evaluated at every accepted time.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedSeries {
    /// Clipped ȧ/a
    pub hubble: Vec<f64>,
    pub compression: Vec<f64>,
    pub constants: BTreeMap<PhysicalConstant, Vec<f64>>,
}

impl DerivedSeries {
    pub fn sample(model: &CosmologyModel, trajectory: &Trajectory) -> Self {
        let hubble = trajectory
            .states()
            .iter()
            .map(|s| model.hubble_rate(s))
            .collect();
        let compression = model.compression.series(trajectory.times());
        let constants = PhysicalConstant::ALL
            .into_iter()
            .map(|c| {
                let values = trajectory.times().iter().map(|&t| model.law.value(c, t)).collect();
                (c, values)
            })
            .collect();
        DerivedSeries {
            hubble,
            compression,
            constants,
        }
    }

    /// Named 1-D arrays: `hubble`, `compression`, then one per constant
    /// symbol.
    pub fn named_arrays(&self) -> Vec<(String, Array1<f64>)> {
        let mut out = vec![
            ("hubble".to_string(), Array1::from_vec(self.hubble.clone())),
            ("compression".to_string(), Array1::from_vec(self.compression.clone())),
        ];
        for (c, values) in &self.constants {
            out.push((c.symbol().to_string(), Array1::from_vec(values.clone())));
        }
        out
    }

    /// Each constant divided by its present-day value.
    pub fn normalized_constants(&self) -> BTreeMap<PhysicalConstant, Vec<f64>> {
        self.constants
            .iter()
            .map(|(&c, v)| (c, v.iter().map(|x| x / c.base_value()).collect()))
            .collect()
    }
}

/// Everything one run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRun {
    pub model_name: String,
    pub time_span: [f64; 2],
    pub outcome: IntegrationOutcome,
    pub derived: DerivedSeries,
    pub hypotheses: HypothesisReport,
    pub stability: StabilityAssessment,
}

impl SimulationRun {
    pub fn trajectory(&self) -> &Trajectory {
        &self.outcome.trajectory
    }

    pub fn success(&self) -> bool {
        self.outcome.success
    }

    pub fn to_summary(&self, timestamp: impl Into<String>) -> SimulationSummary {
        let last = self.trajectory().last().map(|(_, s)| s).unwrap_or_default();
        SimulationSummary {
            timestamp: timestamp.into(),
            model_name: self.model_name.clone(),
            method: METHOD_NAME.to_string(),
            simulation_success: self.outcome.success,
            message: self.outcome.message.clone(),
            points_simulated: self.trajectory().len(),
            time_range: self.time_span,
            solver_stats: self.outcome.stats,
            hypothesis_tests: self.hypotheses.clone(),
            numerical_stability: self.stability,
            final_scale_factor: last.scale_factor,
            final_temperature: last.temperature,
            final_compression: self.derived.compression.last().copied().unwrap_or(1.0),
            standard_model: StandardModelReference::from_trajectory(self.trajectory())
                .and_then(|r| r.summary()),
            additional_tests: None,
        }
    }
}

pub struct Simulator {
    config: ModelConfig,
    model: CosmologyModel,
    driver: IntegrationDriver,
    evaluator: HypothesisEvaluator,
}

impl Simulator {
    pub fn new(config: ModelConfig) -> PlanckResult<Self> {
        config.validate()?;
        let model = CosmologyModel::from_config(&config);
        let driver = IntegrationDriver::new(&config.solver)?;
        let evaluator = HypothesisEvaluator::new(config.thresholds);
        Ok(Simulator {
            config,
            model,
            driver,
            evaluator,
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn model(&self) -> &CosmologyModel {
        &self.model
    }

    pub fn run(&self) -> PlanckResult<SimulationRun> {
        let span = self.config.time_span;
        let outcome = self
            .driver
            .integrate(&self.model, span, self.config.initial_state)?;

        let derived = DerivedSeries::sample(&self.model, &outcome.trajectory);
        let hypotheses = self.evaluator.evaluate(&outcome.trajectory, &derived);
        let stability = assess_stability(&outcome.trajectory);

        info!(
            model = %self.config.model_name,
            success = outcome.success,
            constants_supported = hypotheses.dynamic_constants.supported,
            compression_supported = hypotheses.compression.supported,
            stability_score = stability.stability_score,
            "simulation finished"
        );

        Ok(SimulationRun {
            model_name: self.config.model_name.clone(),
            time_span: [span.start, span.end],
            outcome,
            derived,
            hypotheses,
            stability,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planck_types::config::TimeSpan;

    fn short_config() -> ModelConfig {
        ModelConfig {
            time_span: TimeSpan { start: 0.0, end: 50.0 },
            ..ModelConfig::default()
        }
    }

    #[test]
    fn test_derived_series_align_with_trajectory() {
        let run = Simulator::new(short_config()).unwrap().run().unwrap();
        let n = run.trajectory().len();
        assert_eq!(run.derived.hubble.len(), n);
        assert_eq!(run.derived.compression.len(), n);
        assert_eq!(run.derived.constants.len(), 4);
        assert!(run.derived.constants.values().all(|v| v.len() == n));
        assert_eq!(run.derived.named_arrays().len(), 6);
    }

    #[test]
    fn test_summary_fields() {
        let run = Simulator::new(short_config()).unwrap().run().unwrap();
        let summary = run.to_summary("20260101_000000");
        assert_eq!(summary.method, "DOP853");
        assert_eq!(summary.points_simulated, run.trajectory().len());
        assert_eq!(summary.time_range, [0.0, 50.0]);
        assert_eq!(summary.simulation_success, run.success());
        assert_eq!(summary.final_compression, *run.derived.compression.last().unwrap());
        let standard = summary.standard_model.unwrap();
        assert!(standard.reference_time > 0.0);
        assert!(standard.scale_factor_ratio.is_finite());
        assert!(summary.additional_tests.is_none());
    }

    #[test]
    fn test_normalized_constants_start_at_big_bang_multiplier() {
        let run = Simulator::new(short_config()).unwrap().run().unwrap();
        let norm = run.derived.normalized_constants();
        let g0 = norm[&PhysicalConstant::Gravitational][0];
        assert!((g0 - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut cfg = ModelConfig::default();
        cfg.time_span.end = -1.0;
        assert!(Simulator::new(cfg).is_err());
    }
}
