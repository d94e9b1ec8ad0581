// ─────────────────────────────────────────────────────────────────────
// Planck Epoch Lab — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};
use std::fmt;

/// Gravitational constant (m³·kg⁻¹·s⁻²)
pub const G_NEWTON: f64 = 6.67430e-11;

/// Speed of light in vacuum (m/s)
pub const C_LIGHT: f64 = 299_792_458.0;

/// Planck constant (J·s)
pub const H_PLANCK: f64 = 6.62607015e-34;

/// Fine-structure constant (dimensionless)
pub const ALPHA_FINE: f64 = 7.2973525693e-3;

/// Boltzmann constant (J/K). Held fixed; it is not part of the dynamic set.
pub const K_BOLTZMANN: f64 = 1.380649e-23;

/// The physical constants whose values drift with simulated time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PhysicalConstant {
    #[serde(rename = "G")]
    Gravitational,
    #[serde(rename = "c")]
    SpeedOfLight,
    #[serde(rename = "h")]
    Planck,
    #[serde(rename = "alpha")]
    FineStructure,
}

impl PhysicalConstant {
    pub const ALL: [PhysicalConstant; 4] = [
        PhysicalConstant::Gravitational,
        PhysicalConstant::SpeedOfLight,
        PhysicalConstant::Planck,
        PhysicalConstant::FineStructure,
    ];

    /// Present-day (CODATA) value.
    pub fn base_value(self) -> f64 {
        match self {
            PhysicalConstant::Gravitational => G_NEWTON,
            PhysicalConstant::SpeedOfLight => C_LIGHT,
            PhysicalConstant::Planck => H_PLANCK,
            PhysicalConstant::FineStructure => ALPHA_FINE,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            PhysicalConstant::Gravitational => "G",
            PhysicalConstant::SpeedOfLight => "c",
            PhysicalConstant::Planck => "h",
            PhysicalConstant::FineStructure => "alpha",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.symbol() == symbol)
    }
}

impl fmt::Display for PhysicalConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_roundtrip() {
        for constant in PhysicalConstant::ALL {
            assert_eq!(PhysicalConstant::from_symbol(constant.symbol()), Some(constant));
        }
        assert_eq!(PhysicalConstant::from_symbol("k_B"), None);
    }

    #[test]
    fn test_serde_uses_symbols() {
        let json = serde_json::to_string(&PhysicalConstant::FineStructure).unwrap();
        assert_eq!(json, "\"alpha\"");
        let back: PhysicalConstant = serde_json::from_str("\"G\"").unwrap();
        assert_eq!(back, PhysicalConstant::Gravitational);
    }

    #[test]
    fn test_base_values_positive() {
        for constant in PhysicalConstant::ALL {
            assert!(constant.base_value() > 0.0, "{constant} base must be positive");
        }
    }
}
