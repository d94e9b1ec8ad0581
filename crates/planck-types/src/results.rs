// ─────────────────────────────────────────────────────────────────────
// Planck Epoch Lab — Results
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::constants::PhysicalConstant;
use crate::error::PlanckResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Variation statistics of one constant along a trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstantVariation {
    pub initial: f64,
    #[serde(rename = "final")]
    pub final_value: f64,
    /// |last - first| / first · 100
    pub change_percent: f64,
    /// (max - min) / first · 100
    pub max_variation_percent: f64,
}

/// Verdict on the time-varying-constants hypothesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicConstantsResult {
    pub supported: bool,
    pub threshold_percent: f64,
    pub variations: BTreeMap<PhysicalConstant, ConstantVariation>,
    pub most_variable: Option<PhysicalConstant>,
}

/// Verdict on the compression (fixed external boundary) hypothesis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompressionResult {
    pub supported: bool,
    pub threshold_growth: f64,
    /// Last / first compression ratio
    pub compression_growth: f64,
    /// Last / first scale factor
    pub scale_growth: f64,
    /// Coefficient of variation (std / mean) of the compression series
    pub compression_signature: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypothesisReport {
    pub dynamic_constants: DynamicConstantsResult,
    pub compression: CompressionResult,
}

impl HypothesisReport {
    pub fn all_supported(&self) -> bool {
        self.dynamic_constants.supported && self.compression.supported
    }
}

/// Heuristic health check of a raw trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StabilityAssessment {
    pub stability_score: f64,
    pub has_negative_values: bool,
    pub has_infinite_values: bool,
    pub max_time_gap: f64,
    pub max_scale_discontinuity: f64,
    pub numerically_stable: bool,
}

/// Integrator bookkeeping carried into the summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverStats {
    pub accepted_steps: usize,
    pub rejected_steps: usize,
    pub rhs_evaluations: usize,
}

/// Final state of one sweep member.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExperimentRun {
    pub run_id: usize,
    pub success: bool,
    /// `None` when the run ended on a non-finite value
    pub final_scale_factor: Option<f64>,
    pub final_temperature: Option<f64>,
}

/// Spread of final values across perturbed initial conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityResult {
    pub runs: Vec<ExperimentRun>,
    /// std / mean of the final scale factor over successful runs
    pub scale_factor_sensitivity: f64,
    /// std / mean of the final temperature over successful runs
    pub temperature_sensitivity: f64,
    pub threshold: f64,
    pub model_stable: bool,
    pub successful_runs: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToleranceRun {
    pub rtol: f64,
    pub atol: f64,
    pub success: bool,
    pub final_scale_factor: Option<f64>,
    pub computation_stable: bool,
}

/// Re-integration of the same model across solver tolerances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToleranceRobustnessResult {
    pub runs: Vec<ToleranceRun>,
    /// Fraction of runs that succeeded with a finite final scale factor
    pub numerical_stability: f64,
    pub recommended_tolerance: f64,
    pub model_robust: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalTests {
    pub sensitivity: SensitivityResult,
    pub tolerance_robustness: ToleranceRobustnessResult,
}

/// Final-time comparison against radiation-dominated expansion
/// (a ∝ t^(2/3), T ∝ t^(-1/2)) anchored at the first positive sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardModelSummary {
    pub reference_time: f64,
    pub standard_final_scale_factor: f64,
    pub standard_final_temperature: f64,
    pub scale_factor_ratio: f64,
    pub temperature_ratio: f64,
}

/// Persisted record of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub timestamp: String,
    pub model_name: String,
    pub method: String,
    pub simulation_success: bool,
    pub message: String,
    pub points_simulated: usize,
    pub time_range: [f64; 2],
    pub solver_stats: SolverStats,
    pub hypothesis_tests: HypothesisReport,
    pub numerical_stability: StabilityAssessment,
    pub final_scale_factor: f64,
    pub final_temperature: f64,
    pub final_compression: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_model: Option<StandardModelSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_tests: Option<AdditionalTests>,
}

impl SimulationSummary {
    pub fn from_file(path: impl AsRef<Path>) -> PlanckResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_summary() -> SimulationSummary {
        let mut variations = BTreeMap::new();
        variations.insert(
            PhysicalConstant::Gravitational,
            ConstantVariation {
                initial: 1.2,
                final_value: 1.0,
                change_percent: 16.7,
                max_variation_percent: 20.0,
            },
        );
        SimulationSummary {
            timestamp: "20250828_202132".to_string(),
            model_name: "test".to_string(),
            method: "DOP853".to_string(),
            simulation_success: true,
            message: "ok".to_string(),
            points_simulated: 10,
            time_range: [0.0, 1e7],
            solver_stats: SolverStats {
                accepted_steps: 9,
                rejected_steps: 1,
                rhs_evaluations: 120,
            },
            hypothesis_tests: HypothesisReport {
                dynamic_constants: DynamicConstantsResult {
                    supported: true,
                    threshold_percent: 1.0,
                    variations,
                    most_variable: Some(PhysicalConstant::Gravitational),
                },
                compression: CompressionResult {
                    supported: true,
                    threshold_growth: 5.0,
                    compression_growth: 100.0,
                    scale_growth: 1e10,
                    compression_signature: 0.8,
                },
            },
            numerical_stability: StabilityAssessment {
                stability_score: 1.0,
                has_negative_values: false,
                has_infinite_values: false,
                max_time_gap: 1e4,
                max_scale_discontinuity: 1e7,
                numerically_stable: true,
            },
            final_scale_factor: 1e10,
            final_temperature: 10.0,
            final_compression: 5e4,
            standard_model: None,
            additional_tests: None,
        }
    }

    #[test]
    fn test_summary_json_shape() {
        let json = serde_json::to_value(sample_summary()).unwrap();
        let variations = &json["hypothesis_tests"]["dynamic_constants"]["variations"];
        assert!(variations["G"]["final"].is_number());
        assert_eq!(json["hypothesis_tests"]["dynamic_constants"]["most_variable"], "G");
    }

    #[test]
    fn test_additional_tests_optional_in_json() {
        let json = serde_json::to_value(sample_summary()).unwrap();
        assert!(json.get("additional_tests").is_none());

        let mut summary = sample_summary();
        summary.additional_tests = Some(AdditionalTests {
            sensitivity: SensitivityResult {
                runs: vec![ExperimentRun {
                    run_id: 0,
                    success: true,
                    final_scale_factor: Some(2.0),
                    final_temperature: Some(3.0),
                }],
                scale_factor_sensitivity: 0.0,
                temperature_sensitivity: 0.0,
                threshold: 0.1,
                model_stable: true,
                successful_runs: 1,
            },
            tolerance_robustness: ToleranceRobustnessResult {
                runs: vec![ToleranceRun {
                    rtol: 1e-6,
                    atol: 1e-8,
                    success: false,
                    final_scale_factor: None,
                    computation_stable: false,
                }],
                numerical_stability: 0.0,
                recommended_tolerance: 1e-8,
                model_robust: false,
            },
        });
        let text = serde_json::to_string(&summary).unwrap();
        let back: SimulationSummary = serde_json::from_str(&text).unwrap();
        assert_eq!(back, summary);
    }

    #[test]
    fn test_summary_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        let summary = sample_summary();
        std::fs::write(&path, serde_json::to_string_pretty(&summary).unwrap()).unwrap();
        let loaded = SimulationSummary::from_file(&path).unwrap();
        assert_eq!(loaded, summary);
        assert!(loaded.hypothesis_tests.all_supported());
    }
}
