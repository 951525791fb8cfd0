//! # Pile Geometry
//!
//! A single pile with its surrounding stratigraphy. Besides validation and
//! discretization into [`PileSlice`]s, this module computes the
//! pressuremeter resistances of NF P94-262 Annex F:
//!
//! ```text
//! a     = max(D_p/2, 0.5)      b = min(a, pile height)
//! p_le* = mean of p_l between (tip + b) and (tip − 3a)
//! D_ef  = ∫ p_l dz from tip to tip + 10·D_s, divided by p_le*
//! k_p   = k_p,max                              if D_ef/D_s ≥ 5
//!       = 1 + (k_p,max − 1)·D_ef/(5·D_s)       otherwise
//! R_b   = A_b·k_p·p_le*        R_s = Σ P·q_s,lim·dh
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::mobilization::EndBearingLaw;
use crate::calculations::slice::{PileSection, PileSlice};
use crate::curves::Curve;
use crate::errors::{CalcError, CalcResult};
use crate::soils::SoilLayer;
use crate::standard::PileCategory;

/// Default slice thickness (m)
pub const DEFAULT_SLICE_THICKNESS: f64 = 0.20;

/// Upper bound on the number of slices a pile may be split into
pub const MAX_SLICES: usize = 100_000;

/// Slices thinner than this are dropped when truncating at layer edges (m)
const LEVEL_EPSILON: f64 = 1e-9;

fn default_slice_thickness() -> f64 {
    DEFAULT_SLICE_THICKNESS
}

/// Pile definition and the soil layers it crosses, top-down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PileGeometry {
    /// Pile category (Table A.1)
    pub category: PileCategory,
    /// Level of the pile head (m)
    pub top_level: f64,
    /// Level of the pile tip (m)
    pub bottom_level: f64,
    /// Young's modulus of the pile material (MPa)
    pub young_modulus: f64,
    /// Equivalent diameter for section and end bearing D_p (m)
    pub bearing_diameter: f64,
    /// Equivalent diameter for shaft friction D_s (m)
    pub shaft_diameter: f64,
    /// Target slice thickness for discretization (m)
    #[serde(default = "default_slice_thickness")]
    pub slice_thickness: f64,
    /// Soil layers ordered from top to bottom
    pub layers: Vec<SoilLayer>,
}

/// Pressuremeter resistances of the pile (MN, MPa, m).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PileResistances {
    /// p_le* (MPa)
    pub equivalent_limit_pressure: f64,
    /// D_ef (m)
    pub effective_embedment: f64,
    /// k_p,max for the tip soil
    pub kp_max: f64,
    /// k_p retained after the embedment reduction
    pub bearing_factor: f64,
    /// q_b = k_p·p_le* (MPa)
    pub unit_base_resistance: f64,
    /// R_b (MN)
    pub base_resistance: f64,
    /// R_s (MN)
    pub shaft_resistance: f64,
}

impl PileResistances {
    /// R_b + R_s (MN)
    pub fn total(&self) -> f64 {
        self.base_resistance + self.shaft_resistance
    }
}

impl PileGeometry {
    pub fn section(&self) -> PileSection {
        PileSection {
            young_modulus: self.young_modulus,
            bearing_diameter: self.bearing_diameter,
            shaft_diameter: self.shaft_diameter,
        }
    }

    /// Pile length from head to tip (m)
    pub fn height(&self) -> f64 {
        self.top_level - self.bottom_level
    }

    /// Check the geometry, every layer, and the standard tables for crossed layers.
    pub fn validate(&self) -> CalcResult<()> {
        if !self.top_level.is_finite() || !self.bottom_level.is_finite() {
            return Err(CalcError::invalid_input("pile levels", "non-finite", "Pile levels must be finite"));
        }
        if self.bottom_level >= self.top_level {
            return Err(CalcError::invalid_input(
                "bottom_level",
                self.bottom_level.to_string(),
                format!("Pile tip must be below the pile head ({})", self.top_level),
            ));
        }
        for (field, value) in [
            ("young_modulus", self.young_modulus),
            ("bearing_diameter", self.bearing_diameter),
            ("shaft_diameter", self.shaft_diameter),
            ("slice_thickness", self.slice_thickness),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(CalcError::invalid_input(field, value.to_string(), "Must be positive"));
            }
        }
        self.check_slice_count()?;
        if self.layers.is_empty() {
            return Err(CalcError::invalid_input("layers", "[]", "At least one soil layer is required"));
        }
        for layer in &self.layers {
            layer.validate()?;
        }
        if self.soil_at_level(self.bottom_level).is_none() {
            return Err(CalcError::invalid_input(
                "layers",
                self.bottom_level.to_string(),
                "No soil layer contains the pile tip",
            ));
        }
        for layer in self.crossed_layers() {
            layer.qs_lim(self.category)?;
        }
        Ok(())
    }

    fn check_slice_count(&self) -> CalcResult<()> {
        let count = (self.height() / self.slice_thickness).ceil();
        if !(count <= MAX_SLICES as f64) {
            return Err(CalcError::invalid_input(
                "slice_thickness",
                self.slice_thickness.to_string(),
                format!("Splits the pile into more than {} slices", MAX_SLICES),
            ));
        }
        Ok(())
    }

    fn crossed_layers(&self) -> impl Iterator<Item = &SoilLayer> {
        self.layers.iter().filter(move |layer| {
            self.top_level.min(layer.top_level) - self.bottom_level.max(layer.bottom_level) > 0.0
        })
    }

    /// Whether each layer starts where the previous one ends.
    ///
    /// Not enforced: a gap simply produces no slices over its height.
    pub fn check_stratigraphy(&self) -> bool {
        self.layers
            .windows(2)
            .all(|pair| pair[0].bottom_level == pair[1].top_level)
    }

    /// First layer whose level range contains `level`.
    pub fn soil_at_level(&self, level: f64) -> Option<&SoilLayer> {
        self.layers.iter().find(|layer| layer.contains_level(level))
    }

    /// Layer containing the pile tip.
    pub fn tip_soil(&self) -> CalcResult<&SoilLayer> {
        self.soil_at_level(self.bottom_level).ok_or_else(|| {
            CalcError::invalid_input("layers", self.bottom_level.to_string(), "No soil layer contains the pile tip")
        })
    }

    /// Split the embedded length into slices, top-down.
    ///
    /// Within each layer slices have the target thickness; the last slice of
    /// a layer is truncated at the layer edge. Each slice takes the soil found
    /// at its midpoint.
    pub fn discretize(&self) -> CalcResult<Vec<PileSlice>> {
        self.check_slice_count()?;
        let section = self.section();
        let thickness = self.slice_thickness;
        let mut slices = Vec::new();

        for layer in &self.layers {
            let level_max = self.top_level.min(layer.top_level);
            let level_min = self.bottom_level.max(layer.bottom_level);
            if level_max - level_min <= 0.0 {
                continue;
            }

            let mut i = 0usize;
            loop {
                let top = level_max - i as f64 * thickness;
                if top - level_min <= LEVEL_EPSILON {
                    break;
                }
                let bottom = (top - thickness).max(level_min);
                let dh = top - bottom;
                let soil = self.soil_at_level(top - dh / 2.0).unwrap_or(layer);
                slices.push(PileSlice::new(top, dh, soil, self.category, section)?);
                i += 1;
            }
        }

        Ok(slices)
    }

    /// Limit pressure along the stratigraphy as (level, p_l) steps.
    pub fn limit_pressure_profile(&self) -> CalcResult<Curve> {
        let mut levels = Vec::with_capacity(2 * self.layers.len());
        let mut pressures = Vec::with_capacity(2 * self.layers.len());
        for layer in &self.layers {
            levels.push(layer.top_level);
            levels.push(layer.bottom_level);
            pressures.push(layer.limit_pressure);
            pressures.push(layer.limit_pressure);
        }
        Curve::new(&levels, &pressures)
    }

    /// Length a of the p_le* averaging window (m)
    pub fn a_length(&self) -> f64 {
        (self.bearing_diameter / 2.0).max(0.5)
    }

    /// Length b of the p_le* averaging window (m)
    pub fn b_length(&self) -> f64 {
        self.a_length().min(self.height())
    }

    /// Equivalent net limit pressure p_le* (MPa).
    ///
    /// Zero when the stratigraphy stops above tip − 3a.
    pub fn equivalent_limit_pressure(&self) -> CalcResult<f64> {
        let profile = self.limit_pressure_profile()?;
        let upper = self.bottom_level + self.b_length();
        let lower = self.bottom_level - 3.0 * self.a_length();
        if lower < profile.x_min() {
            return Ok(0.0);
        }
        Ok(profile.mean(upper, lower))
    }

    /// Effective embedment D_ef (m); zero when p_le* is zero.
    pub fn effective_embedment(&self) -> CalcResult<f64> {
        let ple = self.equivalent_limit_pressure()?;
        if ple == 0.0 {
            return Ok(0.0);
        }
        let profile = self.limit_pressure_profile()?;
        let upper = self.bottom_level + 10.0 * self.shaft_diameter;
        Ok(profile.integral(upper, self.bottom_level) / ple)
    }

    /// All pressuremeter resistances in one pass.
    pub fn resistances(&self) -> CalcResult<PileResistances> {
        let tip_soil = self.tip_soil()?;
        let ple = self.equivalent_limit_pressure()?;
        let embedment = self.effective_embedment()?;
        let kp_max = self.category.kp_max(tip_soil.friction_curve);
        let bearing_factor = if embedment / self.shaft_diameter >= 5.0 {
            kp_max
        } else {
            1.0 + (kp_max - 1.0) * embedment / (5.0 * self.shaft_diameter)
        };
        let unit_base_resistance = bearing_factor * ple;
        let shaft_resistance = self.discretize()?.iter().map(PileSlice::shaft_resistance).sum();

        Ok(PileResistances {
            equivalent_limit_pressure: ple,
            effective_embedment: embedment,
            kp_max,
            bearing_factor,
            unit_base_resistance,
            base_resistance: self.section().area() * unit_base_resistance,
            shaft_resistance,
        })
    }

    /// q-z law at the tip: q_b = k_p·p_le*, k_q from the tip soil.
    pub fn tip_law(&self, unit_base_resistance: f64) -> CalcResult<EndBearingLaw> {
        let kq = self.tip_soil()?.module_kq(self.bearing_diameter);
        EndBearingLaw::new(unit_base_resistance, kq)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::soils::tests::layer;
    use crate::soils::SoilClass;
    use crate::standard::FrictionCurve;
    use approx::assert_abs_diff_eq;

    /// Ø600 bored pile, 10 m long, in a uniform clay down to −20.
    pub(crate) fn homogeneous_pile() -> PileGeometry {
        PileGeometry {
            category: PileCategory::BoredSimple,
            top_level: 0.0,
            bottom_level: -10.0,
            young_modulus: 20_000.0,
            bearing_diameter: 0.6,
            shaft_diameter: 0.6,
            slice_thickness: 0.5,
            layers: vec![layer("Clay", 0.0, -20.0, FrictionCurve::Q2, 1.5, 15.0, SoilClass::Fine)],
        }
    }

    fn layered_pile() -> PileGeometry {
        PileGeometry {
            category: PileCategory::BoredSimple,
            top_level: 0.0,
            bottom_level: -10.0,
            young_modulus: 20_000.0,
            bearing_diameter: 0.6,
            shaft_diameter: 0.6,
            slice_thickness: 0.4,
            layers: vec![
                layer("Silt", 0.0, -3.0, FrictionCurve::Q1, 0.6, 5.0, SoilClass::Fine),
                layer("Sand", -3.0, -15.0, FrictionCurve::Q3, 2.0, 18.0, SoilClass::Granular),
            ],
        }
    }

    #[test]
    fn test_validate() {
        assert!(homogeneous_pile().validate().is_ok());

        let mut pile = homogeneous_pile();
        pile.bottom_level = 1.0;
        assert!(pile.validate().is_err());

        let mut pile = homogeneous_pile();
        pile.bottom_level = -25.0;
        assert!(pile.validate().is_err(), "tip below the last layer");

        let mut pile = homogeneous_pile();
        pile.slice_thickness = 0.0;
        assert!(pile.validate().is_err());

        let mut pile = homogeneous_pile();
        pile.slice_thickness = 1e-9;
        assert!(pile.validate().is_err(), "too many slices");
        assert!(pile.discretize().is_err());

        let mut pile = homogeneous_pile();
        pile.category = PileCategory::MicropileType1;
        assert!(pile.validate().is_err(), "no friction values for micropile type I");
    }

    #[test]
    fn test_check_stratigraphy() {
        let mut pile = layered_pile();
        assert!(pile.check_stratigraphy());
        pile.layers[1].top_level = -3.5;
        assert!(!pile.check_stratigraphy());
    }

    #[test]
    fn test_soil_at_level() {
        let pile = layered_pile();
        assert_eq!(pile.soil_at_level(-1.0).unwrap().name, "Silt");
        assert_eq!(pile.soil_at_level(-3.0).unwrap().name, "Silt");
        assert_eq!(pile.soil_at_level(-3.1).unwrap().name, "Sand");
        assert!(pile.soil_at_level(-30.0).is_none());
    }

    #[test]
    fn test_discretize_truncates_at_layer_edges() {
        let slices = layered_pile().discretize().unwrap();
        assert_eq!(slices.len(), 8 + 18);

        assert_abs_diff_eq!(slices[7].thickness(), 0.2, epsilon = 1e-9);
        assert_abs_diff_eq!(slices[7].bottom_level(), -3.0, epsilon = 1e-9);
        assert_eq!(slices[7].soil().name, "Silt");
        assert_eq!(slices[8].soil().name, "Sand");

        let total: f64 = slices.iter().map(PileSlice::thickness).sum();
        assert_abs_diff_eq!(total, 10.0, epsilon = 1e-9);

        for pair in slices.windows(2) {
            assert_abs_diff_eq!(pair[0].bottom_level(), pair[1].top_level(), epsilon = 1e-9);
        }
        assert_abs_diff_eq!(slices.last().unwrap().bottom_level(), -10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_homogeneous_resistances() {
        let pile = homogeneous_pile();
        let r = pile.resistances().unwrap();

        assert_abs_diff_eq!(r.equivalent_limit_pressure, 1.5, epsilon = 1e-9);
        assert_abs_diff_eq!(r.effective_embedment, 6.0, epsilon = 1e-9);
        assert_eq!(r.kp_max, 1.10);
        assert_eq!(r.bearing_factor, 1.10);
        assert_abs_diff_eq!(r.base_resistance, 0.4665, epsilon = 1e-3);
        assert_abs_diff_eq!(r.shaft_resistance, 1.1800, epsilon = 1e-3);
        assert_abs_diff_eq!(r.total(), r.base_resistance + r.shaft_resistance, epsilon = 1e-12);
    }

    #[test]
    fn test_short_stratigraphy_gives_no_base_resistance() {
        let mut pile = homogeneous_pile();
        pile.layers[0].bottom_level = -11.0;
        assert_eq!(pile.equivalent_limit_pressure().unwrap(), 0.0);
        assert_eq!(pile.effective_embedment().unwrap(), 0.0);

        let r = pile.resistances().unwrap();
        assert_eq!(r.bearing_factor, 1.0);
        assert_eq!(r.base_resistance, 0.0);
    }

    #[test]
    fn test_reduced_bearing_factor() {
        let mut pile = layered_pile();
        pile.bottom_level = -4.0;
        let r = pile.resistances().unwrap();
        // Embedment is computed over tip + 10·D_s, mostly in the weak silt
        assert!(r.effective_embedment / pile.shaft_diameter < 5.0);
        let expected = 1.0 + (r.kp_max - 1.0) * r.effective_embedment / (5.0 * pile.shaft_diameter);
        assert_abs_diff_eq!(r.bearing_factor, expected, epsilon = 1e-12);
        assert!(r.bearing_factor < r.kp_max);
    }

    #[test]
    fn test_tip_law() {
        let pile = homogeneous_pile();
        let r = pile.resistances().unwrap();
        let law = pile.tip_law(r.unit_base_resistance).unwrap();
        assert_abs_diff_eq!(law.stiffness, 11.0 * 15.0 / 0.6, epsilon = 1e-9);
        assert_abs_diff_eq!(law.limit, 1.65, epsilon = 1e-9);
    }
}
