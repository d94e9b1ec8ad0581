// ─────────────────────────────────────────────────────────────────────
// Planck Epoch Lab — Hypothesis Evaluator
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Descriptive verdicts computed once from a finished trajectory.
//!
//! Both checks use strict `>` against their threshold, so raising a
//! threshold can only turn a supported verdict into an unsupported one.

use crate::simulation::DerivedSeries;
use planck_math::stats;
use planck_types::config::HypothesisThresholds;
use planck_types::constants::PhysicalConstant;
use planck_types::results::{
    CompressionResult, ConstantVariation, DynamicConstantsResult, HypothesisReport,
};
use planck_types::state::Trajectory;
use std::collections::BTreeMap;

/// last / first, or 1 when the series is too short or the ratio is not
/// finite.
fn growth(series: &[f64]) -> f64 {
    match (series.first(), series.last()) {
        (Some(&first), Some(&last)) if series.len() >= 2 => {
            let r = last / first;
            if r.is_finite() {
                r
            } else {
                1.0
            }
        }
        _ => 1.0,
    }
}

fn percent_of(delta: f64, reference: f64) -> f64 {
    let p = delta / reference * 100.0;
    if p.is_finite() {
        p
    } else {
        0.0
    }
}

pub fn constant_variation(series: &[f64]) -> Option<ConstantVariation> {
    let (&first, &last) = (series.first()?, series.last()?);
    let (lo, hi) = stats::min_max(series)?;
    Some(ConstantVariation {
        initial: first,
        final_value: last,
        change_percent: percent_of((last - first).abs(), first),
        max_variation_percent: percent_of(hi - lo, first),
    })
}

pub fn evaluate_dynamic_constants(
    series: &BTreeMap<PhysicalConstant, Vec<f64>>,
    threshold_percent: f64,
) -> DynamicConstantsResult {
    let variations: BTreeMap<PhysicalConstant, ConstantVariation> = series
        .iter()
        .filter(|(_, values)| values.len() >= 2)
        .filter_map(|(&c, values)| Some((c, constant_variation(values)?)))
        .collect();

    let most_variable = variations
        .iter()
        .fold(None::<(PhysicalConstant, f64)>, |best, (&c, v)| match best {
            Some((_, m)) if m >= v.max_variation_percent => best,
            _ => Some((c, v.max_variation_percent)),
        })
        .map(|(c, _)| c);

    let supported = variations
        .values()
        .any(|v| v.max_variation_percent > threshold_percent);

    DynamicConstantsResult {
        supported,
        threshold_percent,
        variations,
        most_variable,
    }
}

pub fn evaluate_compression(
    compression: &[f64],
    scale_factors: &[f64],
    threshold_growth: f64,
) -> CompressionResult {
    let enough = compression.len() >= 2;
    let compression_growth = growth(compression);
    CompressionResult {
        supported: enough && compression_growth > threshold_growth,
        threshold_growth,
        compression_growth,
        scale_growth: growth(scale_factors),
        compression_signature: stats::coefficient_of_variation(compression).unwrap_or(0.0),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HypothesisEvaluator {
    pub thresholds: HypothesisThresholds,
}

impl HypothesisEvaluator {
    pub fn new(thresholds: HypothesisThresholds) -> Self {
        HypothesisEvaluator { thresholds }
    }

    pub fn evaluate(&self, trajectory: &Trajectory, derived: &DerivedSeries) -> HypothesisReport {
        HypothesisReport {
            dynamic_constants: evaluate_dynamic_constants(
                &derived.constants,
                self.thresholds.variation_percent,
            ),
            compression: evaluate_compression(
                &derived.compression,
                &trajectory.scale_factors(),
                self.thresholds.compression_growth,
            ),
        }
    }
}

impl Default for HypothesisEvaluator {
    fn default() -> Self {
        HypothesisEvaluator::new(HypothesisThresholds::default())
    }
}
