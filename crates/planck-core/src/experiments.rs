// ─────────────────────────────────────────────────────────────────────
// Planck Epoch Lab — Secondary Experiments
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Sweeps that re-run the pipeline around one configuration, and the
//! radiation-era reference curve the main run is compared against.
//!
//! | Experiment | Varies | Verdict |
//! |------------|--------|---------|
//! | initial-conditions sensitivity | `initial_state` × factors | std/mean of final a and T below threshold |
//! | tolerance robustness | `solver.rtol`, `solver.atol` | enough runs end successfully and finite |
//!
//! Sweep members are independent and run on the rayon pool.

use crate::simulation::Simulator;
use planck_math::stats;
use planck_types::config::ModelConfig;
use planck_types::error::PlanckResult;
use planck_types::results::{
    AdditionalTests, ExperimentRun, SensitivityResult, StandardModelSummary,
    ToleranceRobustnessResult, ToleranceRun,
};
use planck_types::state::{SimulationState, Trajectory};
use rayon::prelude::*;
use tracing::{info, warn};

/// a ∝ t^(2/3)
const SCALE_FACTOR_EXPONENT: f64 = 2.0 / 3.0;
/// T ∝ t^(-1/2)
const TEMPERATURE_EXPONENT: f64 = -0.5;

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

/// std / mean of the successful finals; 0 when nothing succeeded.
fn spread(values: &[f64]) -> f64 {
    stats::coefficient_of_variation(values)
        .map(f64::abs)
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

pub fn scaled_state(base: SimulationState, factors: [f64; 4]) -> SimulationState {
    let y = base.to_array();
    SimulationState::from_array([
        y[0] * factors[0],
        y[1] * factors[1],
        y[2] * factors[2],
        y[3] * factors[3],
    ])
}

/// Re-run the model from each scaled initial state and measure how far
/// the final scale factor and temperature drift apart.
pub fn initial_conditions_sensitivity(config: &ModelConfig) -> PlanckResult<SensitivityResult> {
    let exp = &config.experiments;
    let runs = exp
        .sensitivity_factors
        .par_iter()
        .enumerate()
        .map(|(run_id, &factors)| -> PlanckResult<ExperimentRun> {
            let mut cfg = config.clone();
            cfg.initial_state = scaled_state(config.initial_state, factors);
            let run = Simulator::new(cfg)?.run()?;
            let last = run.trajectory().last().map(|(_, s)| s);
            Ok(ExperimentRun {
                run_id,
                success: run.success(),
                final_scale_factor: last.and_then(|s| finite(s.scale_factor)),
                final_temperature: last.and_then(|s| finite(s.temperature)),
            })
        })
        .collect::<PlanckResult<Vec<_>>>()?;

    let (scales, temps): (Vec<f64>, Vec<f64>) = runs
        .iter()
        .filter(|r| r.success)
        .filter_map(|r| Some((r.final_scale_factor?, r.final_temperature?)))
        .unzip();

    let scale_factor_sensitivity = spread(&scales);
    let temperature_sensitivity = spread(&temps);
    let threshold = exp.sensitivity_threshold;
    let model_stable = scale_factor_sensitivity < threshold && temperature_sensitivity < threshold;

    info!(
        runs = runs.len(),
        successful = scales.len(),
        scale_factor_sensitivity,
        temperature_sensitivity,
        model_stable,
        "initial-conditions sensitivity"
    );

    Ok(SensitivityResult {
        successful_runs: scales.len(),
        runs,
        scale_factor_sensitivity,
        temperature_sensitivity,
        threshold,
        model_stable,
    })
}

/// Integrate the same configuration at each relative tolerance, with
/// atol tied to rtol by `atol_ratio`.
pub fn tolerance_robustness(config: &ModelConfig) -> PlanckResult<ToleranceRobustnessResult> {
    let exp = &config.experiments;
    let runs = exp
        .tolerances
        .par_iter()
        .map(|&rtol| -> PlanckResult<ToleranceRun> {
            let mut cfg = config.clone();
            cfg.solver.rtol = rtol;
            cfg.solver.atol = rtol * exp.atol_ratio;
            let atol = cfg.solver.atol;
            let run = Simulator::new(cfg)?.run()?;
            let success = run.success();
            let final_scale_factor = if success {
                run.trajectory().last().map(|(_, s)| s.scale_factor)
            } else {
                None
            };
            let computation_stable = final_scale_factor.is_some_and(f64::is_finite);
            Ok(ToleranceRun {
                rtol,
                atol,
                success,
                final_scale_factor: final_scale_factor.and_then(finite),
                computation_stable,
            })
        })
        .collect::<PlanckResult<Vec<_>>>()?;

    let stable = runs.iter().filter(|r| r.computation_stable).count();
    let numerical_stability = if runs.is_empty() {
        0.0
    } else {
        stable as f64 / runs.len() as f64
    };
    let model_robust = stable >= exp.min_stable_runs;
    if !model_robust {
        warn!(stable, total = runs.len(), "model not robust across tolerances");
    }
    info!(numerical_stability, model_robust, "tolerance robustness");

    Ok(ToleranceRobustnessResult {
        runs,
        numerical_stability,
        recommended_tolerance: exp.recommended_tolerance,
        model_robust,
    })
}

/// Both sweeps.
pub fn run_experiments(config: &ModelConfig) -> PlanckResult<AdditionalTests> {
    config.validate()?;
    Ok(AdditionalTests {
        sensitivity: initial_conditions_sensitivity(config)?,
        tolerance_robustness: tolerance_robustness(config)?,
    })
}

/// Radiation-era expansion anchored at the first sample with t > 0.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardModelReference {
    pub anchor_time: f64,
    /// Sample times from the anchor onwards
    pub times: Vec<f64>,
    pub scale_factor: Vec<f64>,
    pub temperature: Vec<f64>,
    /// Model values over `times`, aligned with the reference
    model_scale_factor: Vec<f64>,
    model_temperature: Vec<f64>,
}

impl StandardModelReference {
    /// `None` when no sample has t > 0 with positive, finite a and T.
    pub fn from_trajectory(trajectory: &Trajectory) -> Option<Self> {
        let start = trajectory.iter().position(|(t, s)| {
            t > 0.0
                && s.scale_factor.is_finite()
                && s.scale_factor > 0.0
                && s.temperature.is_finite()
                && s.temperature > 0.0
        })?;
        let (t0, s0) = trajectory.iter().nth(start)?;

        let mut reference = StandardModelReference {
            anchor_time: t0,
            times: Vec::new(),
            scale_factor: Vec::new(),
            temperature: Vec::new(),
            model_scale_factor: Vec::new(),
            model_temperature: Vec::new(),
        };
        for (t, s) in trajectory.iter().skip(start) {
            let x = t / t0;
            reference.times.push(t);
            reference.scale_factor.push(s0.scale_factor * x.powf(SCALE_FACTOR_EXPONENT));
            reference.temperature.push(s0.temperature * x.powf(TEMPERATURE_EXPONENT));
            reference.model_scale_factor.push(s.scale_factor);
            reference.model_temperature.push(s.temperature);
        }
        Some(reference)
    }

    /// Model / reference at every sample.
    pub fn scale_factor_ratio(&self) -> Vec<f64> {
        self.model_scale_factor
            .iter()
            .zip(&self.scale_factor)
            .map(|(m, r)| m / r)
            .collect()
    }

    pub fn temperature_ratio(&self) -> Vec<f64> {
        self.model_temperature
            .iter()
            .zip(&self.temperature)
            .map(|(m, r)| m / r)
            .collect()
    }

    /// Final-time ratios; `None` if any of them is not finite.
    pub fn summary(&self) -> Option<StandardModelSummary> {
        let summary = StandardModelSummary {
            reference_time: self.anchor_time,
            standard_final_scale_factor: *self.scale_factor.last()?,
            standard_final_temperature: *self.temperature.last()?,
            scale_factor_ratio: *self.scale_factor_ratio().last()?,
            temperature_ratio: *self.temperature_ratio().last()?,
        };
        let all_finite = [
            summary.standard_final_scale_factor,
            summary.standard_final_temperature,
            summary.scale_factor_ratio,
            summary.temperature_ratio,
        ]
        .iter()
        .all(|v| v.is_finite());
        all_finite.then_some(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planck_types::config::TimeSpan;

    fn short_config() -> ModelConfig {
        ModelConfig {
            time_span: TimeSpan { start: 0.0, end: 20.0 },
            ..ModelConfig::default()
        }
    }

    #[test]
    fn test_scaled_state() {
        let base = SimulationState::new(1.0, 2.0, 3.0, 4.0);
        let s = scaled_state(base, [0.5, 2.0, 0.5, 2.0]);
        assert_eq!(s, SimulationState::new(0.5, 4.0, 1.5, 8.0));
    }

    #[test]
    fn test_spread_of_identical_values_is_zero() {
        assert_eq!(spread(&[3.0, 3.0, 3.0]), 0.0);
        assert_eq!(spread(&[]), 0.0);
        assert!((spread(&[1.0, 3.0]) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_sensitivity_sweep_runs_every_variant() {
        let result = initial_conditions_sensitivity(&short_config()).unwrap();
        assert_eq!(result.runs.len(), 3);
        let ids: Vec<usize> = result.runs.iter().map(|r| r.run_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(result.successful_runs, 3);
        assert!(result.scale_factor_sensitivity >= 0.0);
        assert!(result.temperature_sensitivity >= 0.0);
        assert_eq!(
            result.model_stable,
            result.scale_factor_sensitivity < 0.1 && result.temperature_sensitivity < 0.1
        );
    }

    #[test]
    fn test_unit_factors_give_zero_spread() {
        let mut cfg = short_config();
        cfg.experiments.sensitivity_factors = vec![[1.0; 4], [1.0; 4]];
        let result = initial_conditions_sensitivity(&cfg).unwrap();
        assert_eq!(result.scale_factor_sensitivity, 0.0);
        assert_eq!(result.temperature_sensitivity, 0.0);
        assert!(result.model_stable);
    }

    #[test]
    fn test_tolerance_sweep_applies_each_tolerance() {
        let result = tolerance_robustness(&short_config()).unwrap();
        let rtols: Vec<f64> = result.runs.iter().map(|r| r.rtol).collect();
        assert_eq!(rtols, vec![1e-6, 1e-8, 1e-10]);
        for run in &result.runs {
            assert!((run.atol - run.rtol * 1e-2).abs() <= 1e-24);
            assert_eq!(run.computation_stable, run.success && run.final_scale_factor.is_some());
        }
        assert_eq!(result.numerical_stability, 1.0);
        assert!(result.model_robust);
        assert_eq!(result.recommended_tolerance, 1e-8);
    }

    #[test]
    fn test_starved_solver_is_not_robust() {
        let mut cfg = short_config();
        cfg.solver.max_steps = 3;
        let result = tolerance_robustness(&cfg).unwrap();
        assert!(result.runs.iter().all(|r| !r.success && r.final_scale_factor.is_none()));
        assert_eq!(result.numerical_stability, 0.0);
        assert!(!result.model_robust);
    }

    #[test]
    fn test_run_experiments_rejects_invalid_config() {
        let mut cfg = short_config();
        cfg.experiments.tolerances = vec![-1.0];
        assert!(run_experiments(&cfg).is_err());
    }

    #[test]
    fn test_standard_model_anchor_and_powers() {
        let times = vec![0.0, 1.0, 8.0];
        let states = vec![
            SimulationState::new(1.0, 1.0, 1.0, 1.0),
            SimulationState::new(2.0, 1.0, 1.0, 10.0),
            SimulationState::new(8.0, 1.0, 1.0, 10.0),
        ];
        let traj = Trajectory::from_samples(times, states).unwrap();
        let reference = StandardModelReference::from_trajectory(&traj).unwrap();
        assert_eq!(reference.anchor_time, 1.0);
        assert_eq!(reference.times, vec![1.0, 8.0]);
        // 8^(2/3) = 4, 8^(-1/2) = 1/(2√2)
        assert!((reference.scale_factor[1] - 8.0).abs() < 1e-12);
        assert!((reference.temperature[1] - 10.0 / 8f64.sqrt()).abs() < 1e-12);

        let summary = reference.summary().unwrap();
        assert!((summary.scale_factor_ratio - 1.0).abs() < 1e-12);
        assert!((summary.temperature_ratio - 8f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_standard_model_needs_positive_time() {
        let traj = Trajectory::from_samples(
            vec![-2.0, 0.0],
            vec![SimulationState::default(), SimulationState::default()],
        )
        .unwrap();
        assert!(StandardModelReference::from_trajectory(&traj).is_none());
    }
}
