// ─────────────────────────────────────────────────────────────────────
// Planck Epoch Lab — Dynamic-Constant Law
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Time-dependent multiplier applied to each physical constant.
//!
//! Simulated time is split into half-open, contiguous regimes:
//!
//! | Regime     | Interval            | Fractional variation                     |
//! |------------|---------------------|------------------------------------------|
//! | Big Bang   | t < t_bb            | k · exp(-λ t)                            |
//! | Inflation  | t_bb ≤ t < t_inf    | k · A_i · sin(t / P) · exp(-t / τ_i)     |
//! | Late time  | t_inf ≤ t < t_late  | k · A_l · cos(log10 t) · exp(-t / τ_l)   |
//! | Settled    | t ≥ t_late          | 0                                        |
//!
//! The variation is clamped to ±max_variation before scaling the base value.

use planck_types::config::ConstantLawConfig;
use planck_types::constants::PhysicalConstant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    BigBang,
    Inflation,
    LateTime,
    Settled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicConstantLaw {
    config: ConstantLawConfig,
}

impl DynamicConstantLaw {
    pub fn new(config: ConstantLawConfig) -> Self {
        DynamicConstantLaw { config }
    }

    pub fn config(&self) -> &ConstantLawConfig {
        &self.config
    }

    pub fn regime(&self, t: f64) -> Regime {
        let cfg = &self.config;
        if t < cfg.big_bang_end {
            Regime::BigBang
        } else if t < cfg.inflation_end {
            Regime::Inflation
        } else if t < cfg.late_time_end {
            Regime::LateTime
        } else {
            Regime::Settled
        }
    }

    /// Fractional variation before clamping.
    pub fn raw_variation(&self, constant: PhysicalConstant, t: f64) -> f64 {
        let cfg = &self.config;
        let k = cfg.intensities.get(constant);
        match self.regime(t) {
            Regime::BigBang => k * (-cfg.big_bang_decay_rate * t).exp(),
            Regime::Inflation => {
                k * cfg.inflation_amplitude
                    * (t / cfg.inflation_period).sin()
                    * (-t / cfg.inflation_damping).exp()
            }
            Regime::LateTime => {
                k * cfg.late_time_amplitude
                    * t.log10().cos()
                    * (-t / cfg.late_time_damping).exp()
            }
            Regime::Settled => 0.0,
        }
    }

    /// Clamped fractional variation in [-max_variation, max_variation].
    pub fn variation(&self, constant: PhysicalConstant, t: f64) -> f64 {
        let bound = self.config.max_variation;
        self.raw_variation(constant, t).clamp(-bound, bound)
    }

    /// base · (1 + clamped variation)
    pub fn value_with_base(&self, constant: PhysicalConstant, base: f64, t: f64) -> f64 {
        base * (1.0 + self.variation(constant, t))
    }

    pub fn value(&self, constant: PhysicalConstant, t: f64) -> f64 {
        self.value_with_base(constant, constant.base_value(), t)
    }

    /// All four constants at `t`, in [`PhysicalConstant::ALL`] order.
    pub fn values(&self, t: f64) -> [f64; 4] {
        PhysicalConstant::ALL.map(|c| self.value(c, t))
    }
}

impl Default for DynamicConstantLaw {
    fn default() -> Self {
        DynamicConstantLaw::new(ConstantLawConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_t_zero_is_big_bang_formula() {
        let law = DynamicConstantLaw::default();
        for c in PhysicalConstant::ALL {
            let k = law.config().intensities.get(c);
            assert_eq!(law.regime(0.0), Regime::BigBang);
            assert_eq!(law.value(c, 0.0), c.base_value() * (1.0 + k));
        }
    }

    #[test]
    fn test_regime_boundaries_are_half_open() {
        let law = DynamicConstantLaw::default();
        assert_eq!(law.regime(0.999), Regime::BigBang);
        assert_eq!(law.regime(1.0), Regime::Inflation);
        assert_eq!(law.regime(1000.0), Regime::LateTime);
        assert_eq!(law.regime(1e6), Regime::Settled);
    }

    #[test]
    fn test_inflation_formula() {
        let law = DynamicConstantLaw::default();
        let t: f64 = 250.0;
        let expected = 0.20 * 0.6 * (t / 100.0_f64).sin() * (-t / 5000.0_f64).exp();
        let got = law.variation(PhysicalConstant::Gravitational, t);
        assert!((got - expected).abs() < 1e-15);
    }

    #[test]
    fn test_late_time_formula() {
        let law = DynamicConstantLaw::default();
        let t: f64 = 5e4;
        let expected = 0.12 * 0.3 * t.log10().cos() * (-t / 1e7_f64).exp();
        let got = law.variation(PhysicalConstant::FineStructure, t);
        assert!((got - expected).abs() < 1e-15);
    }

    #[test]
    fn test_settled_regime_returns_base() {
        let law = DynamicConstantLaw::default();
        for c in PhysicalConstant::ALL {
            assert_eq!(law.value(c, 5e6), c.base_value());
        }
        let all = law.values(5e6);
        assert_eq!(all[0], PhysicalConstant::Gravitational.base_value());
        assert_eq!(all[3], PhysicalConstant::FineStructure.base_value());
    }

    #[test]
    fn test_clamp_applies() {
        let mut cfg = ConstantLawConfig::default();
        cfg.intensities.gravitational = 5.0;
        let law = DynamicConstantLaw::new(cfg);
        assert_eq!(law.variation(PhysicalConstant::Gravitational, 0.0), 0.3);
        assert!((law.value_with_base(PhysicalConstant::Gravitational, 2.0, 0.0) - 2.6).abs() < 1e-15);
    }
}
