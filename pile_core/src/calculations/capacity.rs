//! # Bearing Capacities
//!
//! Characteristic resistances and limit-state capacities from the
//! pressuremeter resistances (NF P94-262 Annex F, "model" procedure).
//!
//! ```text
//! R_b;k   = R_b / (γ_Rd1,c · γ_Rd2)
//! R_s;k   = R_s / (γ_Rd1,c · γ_Rd2)       compression
//! R_s;k,t = −R_s / (γ_Rd1,t · γ_Rd2)      tension (negative)
//! ```
//!
//! | Capacity            | Compression                    | Tension        |
//! |---------------------|--------------------------------|----------------|
//! | Creep load R_cr;k   | 0.5·R_b;k + 0.7·R_s;k          | 0.7·R_s;k,t    |
//! | SLS quasi-permanent | R_cr;k / 1.1                   | R_cr;k / 1.5   |
//! | SLS characteristic  | R_cr;k / 0.9                   | R_cr;k / 1.1   |
//! | ULS fundamental     | R_b;k / 1.1 + R_s;k / 1.1      | R_s;k,t / 1.15 |
//! | ULS accidental      | R_b;k / 1.0 + R_s;k / 1.0      | R_s;k,t / 1.05 |

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::pile::{PileGeometry, PileResistances};
use crate::standard::{FrictionCurve, PileCategory, GAMMA_RD2};

/// Capacities for one loading direction (MN). Tension values are negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LimitStateCapacities {
    pub creep_load: f64,
    pub sls_quasi_permanent: f64,
    pub sls_characteristic: f64,
    pub uls_fundamental: f64,
    pub uls_accidental: f64,
}

/// Resistances, model factors and capacities of a pile (MN).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BearingCapacities {
    /// R_b
    pub base_resistance: f64,
    /// R_s
    pub shaft_resistance: f64,
    /// R_b + R_s
    pub total_resistance: f64,
    pub gamma_rd1_compression: f64,
    pub gamma_rd1_tension: f64,
    /// R_b;k
    pub characteristic_base: f64,
    /// R_s;k in compression
    pub characteristic_shaft: f64,
    /// R_s;k in tension (negative)
    pub characteristic_shaft_tension: f64,
    pub compression: LimitStateCapacities,
    pub tension: LimitStateCapacities,
}

impl BearingCapacities {
    /// Capacities of a pile, with model factors read for its tip soil curve.
    pub fn calculate(pile: &PileGeometry) -> CalcResult<Self> {
        let tip_curve = pile.tip_soil()?.friction_curve;
        let resistances = pile.resistances()?;
        Ok(Self::from_resistances(pile.category, tip_curve, &resistances))
    }

    pub fn from_resistances(
        category: PileCategory,
        tip_curve: FrictionCurve,
        resistances: &PileResistances,
    ) -> Self {
        let gamma_c = category.gamma_rd1_compression(tip_curve);
        let gamma_t = category.gamma_rd1_tension(tip_curve);
        let rb = resistances.base_resistance;
        let rs = resistances.shaft_resistance;

        let rbk = rb / (gamma_c * GAMMA_RD2);
        let rsk = rs / (gamma_c * GAMMA_RD2);
        let rsk_t = -rs / (gamma_t * GAMMA_RD2);

        let creep = 0.5 * rbk + 0.7 * rsk;
        let compression = LimitStateCapacities {
            creep_load: creep,
            sls_quasi_permanent: creep / 1.1,
            sls_characteristic: creep / 0.9,
            uls_fundamental: rbk / 1.1 + rsk / 1.1,
            uls_accidental: rbk / 1.0 + rsk / 1.0,
        };

        let creep_t = 0.7 * rsk_t;
        let tension = LimitStateCapacities {
            creep_load: creep_t,
            sls_quasi_permanent: creep_t / 1.5,
            sls_characteristic: creep_t / 1.1,
            uls_fundamental: rsk_t / 1.15,
            uls_accidental: rsk_t / 1.05,
        };

        BearingCapacities {
            base_resistance: rb,
            shaft_resistance: rs,
            total_resistance: rb + rs,
            gamma_rd1_compression: gamma_c,
            gamma_rd1_tension: gamma_t,
            characteristic_base: rbk,
            characteristic_shaft: rsk,
            characteristic_shaft_tension: rsk_t,
            compression,
            tension,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pile::tests::homogeneous_pile;
    use approx::assert_abs_diff_eq;

    fn resistances(rb: f64, rs: f64) -> PileResistances {
        PileResistances {
            equivalent_limit_pressure: 0.0,
            effective_embedment: 0.0,
            kp_max: 1.0,
            bearing_factor: 1.0,
            unit_base_resistance: 0.0,
            base_resistance: rb,
            shaft_resistance: rs,
        }
    }

    #[test]
    fn test_compression_capacities() {
        let c = BearingCapacities::from_resistances(
            PileCategory::BoredSimple,
            FrictionCurve::Q2,
            &resistances(1.265, 2.53),
        );
        assert_eq!(c.gamma_rd1_compression, 1.15);
        assert_abs_diff_eq!(c.characteristic_base, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.characteristic_shaft, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.compression.creep_load, 1.9, epsilon = 1e-12);
        assert_abs_diff_eq!(c.compression.sls_quasi_permanent, 1.9 / 1.1, epsilon = 1e-12);
        assert_abs_diff_eq!(c.compression.sls_characteristic, 1.9 / 0.9, epsilon = 1e-12);
        assert_abs_diff_eq!(c.compression.uls_fundamental, 3.0 / 1.1, epsilon = 1e-12);
        assert_abs_diff_eq!(c.compression.uls_accidental, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tension_capacities_are_negative() {
        let c = BearingCapacities::from_resistances(
            PileCategory::BoredSimple,
            FrictionCurve::Q3,
            &resistances(1.0, 1.87),
        );
        assert_eq!(c.gamma_rd1_tension, 1.70);
        assert_abs_diff_eq!(c.characteristic_shaft_tension, -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.tension.creep_load, -0.7, epsilon = 1e-12);
        assert_abs_diff_eq!(c.tension.sls_quasi_permanent, -0.7 / 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(c.tension.sls_characteristic, -0.7 / 1.1, epsilon = 1e-12);
        assert_abs_diff_eq!(c.tension.uls_fundamental, -1.0 / 1.15, epsilon = 1e-12);
        assert_abs_diff_eq!(c.tension.uls_accidental, -1.0 / 1.05, epsilon = 1e-12);
    }

    #[test]
    fn test_high_model_factors() {
        let c = BearingCapacities::from_resistances(
            PileCategory::from_code(10).unwrap(),
            FrictionCurve::Q1,
            &resistances(1.0, 1.0),
        );
        assert_eq!(c.gamma_rd1_compression, 2.0);
        assert_eq!(c.gamma_rd1_tension, 2.0);
    }

    #[test]
    fn test_capacities_from_pile() {
        let pile = homogeneous_pile();
        let c = BearingCapacities::calculate(&pile).unwrap();
        let r = pile.resistances().unwrap();
        assert_abs_diff_eq!(c.total_resistance, r.total(), epsilon = 1e-12);
        assert!(c.compression.sls_quasi_permanent < c.compression.uls_fundamental);
        assert!(c.tension.uls_fundamental < 0.0);
    }
}
