// ─────────────────────────────────────────────────────────────────────
// Planck Epoch Lab — Compression Schedule
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Compression ratio of space inside a fixed external boundary.
//!
//! Linear ramp, then exponential inflation, then a power law anchored at
//! the end value of the inflation segment. Never below 1.

use planck_types::config::CompressionConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionSchedule {
    config: CompressionConfig,
}

impl CompressionSchedule {
    pub fn new(config: CompressionConfig) -> Self {
        CompressionSchedule { config }
    }

    pub fn config(&self) -> &CompressionConfig {
        &self.config
    }

    fn inflation_segment(&self, t: f64) -> f64 {
        let cfg = &self.config;
        let start = 1.0 + cfg.initial_slope * cfg.big_bang_end;
        start * ((t - cfg.big_bang_end) / cfg.inflation_timescale).exp()
    }

    pub fn ratio(&self, t: f64) -> f64 {
        let cfg = &self.config;
        let c = if t <= 0.0 {
            1.0
        } else if t < cfg.big_bang_end {
            1.0 + cfg.initial_slope * t
        } else if t < cfg.inflation_end {
            self.inflation_segment(t)
        } else {
            self.inflation_segment(cfg.inflation_end)
                * (t / cfg.inflation_end).powf(cfg.late_power_index)
        };
        c.max(1.0)
    }

    pub fn series(&self, times: &[f64]) -> Vec<f64> {
        times.iter().map(|&t| self.ratio(t)).collect()
    }
}

impl Default for CompressionSchedule {
    fn default() -> Self {
        CompressionSchedule::new(CompressionConfig::default())
    }
}
