// ─────────────────────────────────────────────────────────────────────
// Planck Epoch Lab — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::constants::{PhysicalConstant, K_BOLTZMANN};
use crate::error::{PlanckError, PlanckResult};
use crate::state::SimulationState;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level simulation configuration.
/// Every section defaults independently, so a JSON file only needs the
/// fields it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub model_name: String,
    pub initial_state: SimulationState,
    pub time_span: TimeSpan,
    pub constant_law: ConstantLawConfig,
    pub compression: CompressionConfig,
    pub dynamics: DynamicsConfig,
    pub solver: SolverConfig,
    pub thresholds: HypothesisThresholds,
    pub output: OutputConfig,
    pub experiments: ExperimentsConfig,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            model_name: "planck-epoch-v2".to_string(),
            initial_state: SimulationState::default(),
            time_span: TimeSpan::default(),
            constant_law: ConstantLawConfig::default(),
            compression: CompressionConfig::default(),
            dynamics: DynamicsConfig::default(),
            solver: SolverConfig::default(),
            thresholds: HypothesisThresholds::default(),
            output: OutputConfig::default(),
            experiments: ExperimentsConfig::default(),
        }
    }
}

/// Integration interval in Planck time units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeSpan {
    pub start: f64,
    pub end: f64,
}

impl Default for TimeSpan {
    fn default() -> Self {
        TimeSpan {
            start: 0.0,
            end: 1e7,
        }
    }
}

/// Per-constant intensity coefficients of the dynamic-constant law.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstantIntensities {
    #[serde(rename = "G")]
    pub gravitational: f64,
    #[serde(rename = "c")]
    pub speed_of_light: f64,
    #[serde(rename = "h")]
    pub planck: f64,
    #[serde(rename = "alpha")]
    pub fine_structure: f64,
}

impl ConstantIntensities {
    pub fn get(&self, constant: PhysicalConstant) -> f64 {
        match constant {
            PhysicalConstant::Gravitational => self.gravitational,
            PhysicalConstant::SpeedOfLight => self.speed_of_light,
            PhysicalConstant::Planck => self.planck,
            PhysicalConstant::FineStructure => self.fine_structure,
        }
    }
}

impl Default for ConstantIntensities {
    fn default() -> Self {
        ConstantIntensities {
            gravitational: 0.20,
            speed_of_light: 0.18,
            planck: 0.16,
            fine_structure: 0.12,
        }
    }
}

/// Regime boundaries and shape parameters of the dynamic-constant law.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstantLawConfig {
    /// Bound on |fractional variation| (0.3 = ±30%)
    pub max_variation: f64,
    pub intensities: ConstantIntensities,
    /// End of the Big Bang decay regime
    pub big_bang_end: f64,
    pub big_bang_decay_rate: f64,
    /// End of the oscillatory inflation regime
    pub inflation_end: f64,
    pub inflation_amplitude: f64,
    pub inflation_period: f64,
    pub inflation_damping: f64,
    /// End of the log-cosine late-time regime; no variation afterwards
    pub late_time_end: f64,
    pub late_time_amplitude: f64,
    pub late_time_damping: f64,
}

impl Default for ConstantLawConfig {
    fn default() -> Self {
        ConstantLawConfig {
            max_variation: 0.3,
            intensities: ConstantIntensities::default(),
            big_bang_end: 1.0,
            big_bang_decay_rate: 3.0,
            inflation_end: 1000.0,
            inflation_amplitude: 0.6,
            inflation_period: 100.0,
            inflation_damping: 5000.0,
            late_time_end: 1e6,
            late_time_amplitude: 0.3,
            late_time_damping: 1e7,
        }
    }
}

/// Piecewise compression-ratio schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// Slope of the linear ramp before `big_bang_end`
    pub initial_slope: f64,
    pub big_bang_end: f64,
    pub inflation_end: f64,
    /// e-folding time of the exponential inflation segment
    pub inflation_timescale: f64,
    /// Exponent of the late power-law segment
    pub late_power_index: f64,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        CompressionConfig {
            initial_slope: 50.0,
            big_bang_end: 1.0,
            inflation_end: 1000.0,
            inflation_timescale: 200.0,
            late_power_index: 0.3,
        }
    }
}

/// Regularization bounds and coefficients of the cosmology right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicsConfig {
    /// Floor applied to a, ρ and T
    pub epsilon: f64,
    /// |ȧ/a| bound
    pub hubble_limit: f64,
    /// |ä| bound before the compression correction
    pub acceleration_limit: f64,
    /// Equation-of-state parameter w in p = wρ
    pub equation_of_state: f64,
    pub quantum_pressure_timescale: f64,
    /// Quantum pressure is capped at this fraction of ρ
    pub quantum_pressure_cap: f64,
    pub quantum_cooling_offset: f64,
    pub quantum_cooling_timescale: f64,
    /// Quantum cooling is capped at this fraction of ρ
    pub quantum_cooling_cap: f64,
    /// |dρ/dt| ≤ density_rate_limit · ρ
    pub density_rate_limit: f64,
    /// |dT/dt| ≤ temperature_rate_limit · T
    pub temperature_rate_limit: f64,
    pub temperature_correction_timescale: f64,
    pub temperature_correction_min: f64,
    pub temperature_correction_max: f64,
    pub boltzmann: f64,
}

impl Default for DynamicsConfig {
    fn default() -> Self {
        DynamicsConfig {
            epsilon: 1e-15,
            hubble_limit: 1e4,
            acceleration_limit: 1e4,
            equation_of_state: 0.33,
            quantum_pressure_timescale: 1e6,
            quantum_pressure_cap: 0.1,
            quantum_cooling_offset: 1e-20,
            quantum_cooling_timescale: 1e6,
            quantum_cooling_cap: 0.1,
            density_rate_limit: 20.0,
            temperature_rate_limit: 20.0,
            temperature_correction_timescale: 1e3,
            temperature_correction_min: 0.5,
            temperature_correction_max: 2.0,
            boltzmann: K_BOLTZMANN,
        }
    }
}

/// Adaptive integrator settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub rtol: f64,
    pub atol: f64,
    pub max_step: f64,
    /// Initial step; `None` selects one automatically
    pub first_step: Option<f64>,
    /// Budget of attempted steps (accepted + rejected)
    pub max_steps: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            rtol: 1e-8,
            atol: 1e-10,
            max_step: 1e4,
            first_step: Some(1e-2),
            max_steps: 500_000,
        }
    }
}

/// Thresholds above which a hypothesis is reported as supported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HypothesisThresholds {
    /// Max-range variation of any constant, in percent
    pub variation_percent: f64,
    /// Last/first compression ratio
    pub compression_growth: f64,
}

impl Default for HypothesisThresholds {
    fn default() -> Self {
        HypothesisThresholds {
            variation_percent: 1.0,
            compression_growth: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub save_json: bool,
    pub save_arrays: bool,
    pub save_plots: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            directory: PathBuf::from("results"),
            save_json: true,
            save_arrays: true,
            save_plots: true,
        }
    }
}

/// Secondary sweeps run after the main simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentsConfig {
    pub enabled: bool,
    /// Per-component multipliers (a, ȧ, ρ, T) applied to `initial_state`,
    /// one entry per sensitivity run
    pub sensitivity_factors: Vec<[f64; 4]>,
    /// Relative spread (std / mean) below which final values count as stable
    pub sensitivity_threshold: f64,
    /// Relative tolerances of the robustness sweep
    pub tolerances: Vec<f64>,
    /// atol = rtol · atol_ratio for every robustness run
    pub atol_ratio: f64,
    pub recommended_tolerance: f64,
    /// Stable runs needed to call the model robust
    pub min_stable_runs: usize,
}

impl Default for ExperimentsConfig {
    fn default() -> Self {
        ExperimentsConfig {
            enabled: true,
            sensitivity_factors: vec![
                [1.0, 1.0, 1.0, 1.0],
                [0.5, 2.0, 0.5, 2.0],
                [2.0, 0.5, 2.0, 0.5],
            ],
            sensitivity_threshold: 0.1,
            tolerances: vec![1e-6, 1e-8, 1e-10],
            atol_ratio: 1e-2,
            recommended_tolerance: 1e-8,
            min_stable_runs: 2,
        }
    }
}

fn require(condition: bool, message: impl FnOnce() -> String) -> PlanckResult<()> {
    if condition {
        Ok(())
    } else {
        Err(PlanckError::ConfigError(message()))
    }
}

impl ModelConfig {
    /// Load from a JSON file and validate.
    pub fn from_file(path: impl AsRef<Path>) -> PlanckResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> PlanckResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check solver settings and schedule boundaries. The initial state is
    /// deliberately left unchecked; the right-hand side floors it.
    pub fn validate(&self) -> PlanckResult<()> {
        let span = self.time_span;
        require(span.start.is_finite() && span.end.is_finite(), || {
            format!("time_span must be finite, got [{}, {}]", span.start, span.end)
        })?;
        require(span.end > span.start, || {
            format!("time_span.end must exceed start, got [{}, {}]", span.start, span.end)
        })?;

        self.solver.validate()?;

        let law = &self.constant_law;
        require(law.max_variation.is_finite() && law.max_variation >= 0.0, || {
            format!("constant_law.max_variation must be finite and >= 0, got {}", law.max_variation)
        })?;
        require(
            law.big_bang_end > 0.0
                && law.big_bang_end <= law.inflation_end
                && law.inflation_end <= law.late_time_end,
            || {
                format!(
                    "constant_law regimes must satisfy 0 < big_bang_end <= inflation_end <= late_time_end, got {} / {} / {}",
                    law.big_bang_end, law.inflation_end, law.late_time_end
                )
            },
        )?;
        require(
            law.inflation_period > 0.0 && law.inflation_damping > 0.0 && law.late_time_damping > 0.0,
            || "constant_law period and damping scales must be > 0".to_string(),
        )?;

        let comp = &self.compression;
        require(comp.big_bang_end > 0.0 && comp.big_bang_end <= comp.inflation_end, || {
            format!(
                "compression regimes must satisfy 0 < big_bang_end <= inflation_end, got {} / {}",
                comp.big_bang_end, comp.inflation_end
            )
        })?;
        require(comp.inflation_timescale > 0.0, || {
            format!(
                "compression.inflation_timescale must be > 0, got {}",
                comp.inflation_timescale
            )
        })?;
        require(comp.initial_slope >= 0.0 && comp.late_power_index >= 0.0, || {
            "compression slope and power index must be >= 0 for a non-decreasing schedule".to_string()
        })?;

        let dyn_cfg = &self.dynamics;
        require(dyn_cfg.epsilon > 0.0 && dyn_cfg.epsilon.is_finite(), || {
            format!("dynamics.epsilon must be finite and > 0, got {}", dyn_cfg.epsilon)
        })?;
        require(
            dyn_cfg.temperature_correction_min <= dyn_cfg.temperature_correction_max,
            || {
                format!(
                    "dynamics temperature correction bounds inverted: [{}, {}]",
                    dyn_cfg.temperature_correction_min, dyn_cfg.temperature_correction_max
                )
            },
        )?;
        require(
            dyn_cfg.hubble_limit >= 0.0
                && dyn_cfg.acceleration_limit >= 0.0
                && dyn_cfg.density_rate_limit >= 0.0
                && dyn_cfg.temperature_rate_limit >= 0.0
                && dyn_cfg.quantum_pressure_cap >= 0.0
                && dyn_cfg.quantum_cooling_cap >= 0.0,
            || "dynamics clamp bounds must be >= 0".to_string(),
        )?;

        self.experiments.validate()
    }
}

impl ExperimentsConfig {
    pub fn validate(&self) -> PlanckResult<()> {
        require(
            self.sensitivity_factors
                .iter()
                .flatten()
                .all(|f| f.is_finite() && *f > 0.0),
            || "experiments.sensitivity_factors must be finite and > 0".to_string(),
        )?;
        require(
            self.tolerances.iter().all(|t| t.is_finite() && *t > 0.0),
            || format!("experiments.tolerances must be finite and > 0, got {:?}", self.tolerances),
        )?;
        require(self.atol_ratio.is_finite() && self.atol_ratio > 0.0, || {
            format!("experiments.atol_ratio must be finite and > 0, got {}", self.atol_ratio)
        })?;
        require(self.sensitivity_threshold >= 0.0, || {
            format!(
                "experiments.sensitivity_threshold must be >= 0, got {}",
                self.sensitivity_threshold
            )
        })
    }
}

impl SolverConfig {
    pub fn validate(&self) -> PlanckResult<()> {
        require(self.rtol.is_finite() && self.rtol > 0.0, || {
            format!("solver.rtol must be finite and > 0, got {}", self.rtol)
        })?;
        require(self.atol.is_finite() && self.atol > 0.0, || {
            format!("solver.atol must be finite and > 0, got {}", self.atol)
        })?;
        require(self.max_step > 0.0, || {
            format!("solver.max_step must be > 0, got {}", self.max_step)
        })?;
        if let Some(h0) = self.first_step {
            require(h0.is_finite() && h0 > 0.0, || {
                format!("solver.first_step must be finite and > 0, got {h0}")
            })?;
        }
        require(self.max_steps > 0, || "solver.max_steps must be > 0".to_string())
    }
}
