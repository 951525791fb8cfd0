//! Ménard pressuremeter test logs.
//!
//! A log records creep pressure p_f, limit pressure p_l and modulus E_M at
//! test levels. Values between tests are interpolated linearly on depth
//! below the highest test level; layer parameters are averaged with the
//! trapezoidal rule.

use serde::{Deserialize, Serialize};

use crate::curves::Curve;
use crate::errors::{CalcError, CalcResult};
use crate::standard::FrictionCurve;

use super::{SoilClass, SoilLayer};

/// Rheological coefficient given to layers built from a log
pub const DEFAULT_RHEOLOGICAL_COEFFICIENT: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressuremeterLog {
    /// Borehole reference
    pub name: String,
    /// Highest test level; depths are measured from here
    pub top_level: f64,
    creep_pressure: Curve,
    limit_pressure: Curve,
    modulus: Curve,
}

impl PressuremeterLog {
    /// Build a log from test levels and the three measured series.
    pub fn new(
        name: impl Into<String>,
        levels: &[f64],
        creep_pressures: &[f64],
        limit_pressures: &[f64],
        moduli: &[f64],
    ) -> CalcResult<Self> {
        let top_level = levels
            .iter()
            .copied()
            .fold(None, |acc: Option<f64>, z| Some(acc.map_or(z, |a| a.max(z))))
            .ok_or_else(|| CalcError::invalid_input("levels", "[]", "Pressuremeter log needs at least one test"))?;

        let depths: Vec<f64> = levels.iter().map(|z| top_level - z).collect();

        Ok(PressuremeterLog {
            name: name.into(),
            top_level,
            creep_pressure: Curve::new(&depths, creep_pressures)?,
            limit_pressure: Curve::new(&depths, limit_pressures)?,
            modulus: Curve::new(&depths, moduli)?,
        })
    }

    pub fn depth_of(&self, level: f64) -> f64 {
        self.top_level - level
    }

    pub fn level_of(&self, depth: f64) -> f64 {
        self.top_level - depth
    }

    /// p_f at a level (MPa)
    pub fn creep_pressure_at(&self, level: f64) -> f64 {
        self.creep_pressure.value_at(self.depth_of(level))
    }

    /// p_l at a level (MPa)
    pub fn limit_pressure_at(&self, level: f64) -> f64 {
        self.limit_pressure.value_at(self.depth_of(level))
    }

    /// E_M at a level (MPa)
    pub fn modulus_at(&self, level: f64) -> f64 {
        self.modulus.value_at(self.depth_of(level))
    }

    pub fn mean_creep_pressure(&self, level_1: f64, level_2: f64) -> f64 {
        self.creep_pressure.mean(self.depth_of(level_1), self.depth_of(level_2))
    }

    pub fn mean_limit_pressure(&self, level_1: f64, level_2: f64) -> f64 {
        self.limit_pressure.mean(self.depth_of(level_1), self.depth_of(level_2))
    }

    pub fn mean_modulus(&self, level_1: f64, level_2: f64) -> f64 {
        self.modulus.mean(self.depth_of(level_1), self.depth_of(level_2))
    }
}

impl SoilLayer {
    /// Build a layer whose parameters are the log means over its level range.
    ///
    /// The layer is granular with α = 0.5; adjust `soil_class` and
    /// `rheological_coefficient` afterwards when the soil description calls
    /// for other values.
    pub fn from_pressuremeter_log(
        name: impl Into<String>,
        top_level: f64,
        bottom_level: f64,
        friction_curve: FrictionCurve,
        log: &PressuremeterLog,
    ) -> CalcResult<Self> {
        let layer = SoilLayer {
            name: name.into(),
            top_level,
            bottom_level,
            friction_curve,
            creep_pressure: log.mean_creep_pressure(top_level, bottom_level),
            limit_pressure: log.mean_limit_pressure(top_level, bottom_level),
            pressuremeter_modulus: log.mean_modulus(top_level, bottom_level),
            rheological_coefficient: DEFAULT_RHEOLOGICAL_COEFFICIENT,
            soil_class: SoilClass::default(),
            tip_class: None,
        };
        layer.validate()?;
        Ok(layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn borehole() -> PressuremeterLog {
        PressuremeterLog::new(
            "SP2",
            &[97.0, 95.5, 94.0, 92.5, 91.0, 89.5, 88.0, 86.5, 85.0, 83.5, 82.0, 80.5],
            &[0.78, 0.84, 1.01, 0.81, 0.4, 0.61, 0.83, 1.10, 0.62, 1.72, 1.12, 1.13],
            &[1.06, 1.13, 1.50, 1.09, 0.74, 1.13, 1.52, 2.06, 1.28, 3.12, 2.17, 1.81],
            &[6.2, 10.6, 9.2, 8.3, 5.8, 7.5, 9.3, 14.8, 8.0, 29.5, 15.5, 12.1],
        )
        .unwrap()
    }

    #[test]
    fn test_depths() {
        let log = borehole();
        assert_eq!(log.top_level, 97.0);
        assert_abs_diff_eq!(log.depth_of(94.0), 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(log.level_of(3.0), 94.0, epsilon = 1e-12);
    }

    #[test]
    fn test_interpolation() {
        let log = borehole();
        assert_abs_diff_eq!(log.limit_pressure_at(96.25), 1.095, epsilon = 1e-9);
        assert_abs_diff_eq!(log.creep_pressure_at(95.5), 0.84, epsilon = 1e-12);
        assert_abs_diff_eq!(log.modulus_at(100.0), 6.2, epsilon = 1e-12);
        assert_abs_diff_eq!(log.modulus_at(70.0), 12.1, epsilon = 1e-12);
    }

    #[test]
    fn test_mean_values() {
        let log = borehole();
        assert_abs_diff_eq!(log.mean_limit_pressure(97.0, 94.0), 1.205, epsilon = 1e-9);
        assert_abs_diff_eq!(log.mean_limit_pressure(94.0, 97.0), 1.205, epsilon = 1e-9);
    }

    #[test]
    fn test_layer_from_log() {
        let log = borehole();
        let layer = SoilLayer::from_pressuremeter_log("Silt", 97.0, 94.0, FrictionCurve::Q2, &log).unwrap();
        assert_abs_diff_eq!(layer.limit_pressure, 1.205, epsilon = 1e-9);
        assert!(layer.pressuremeter_modulus > 6.2);
        assert_eq!(layer.rheological_coefficient, DEFAULT_RHEOLOGICAL_COEFFICIENT);

        assert!(SoilLayer::from_pressuremeter_log("Bad", 90.0, 94.0, FrictionCurve::Q2, &log).is_err());
    }

    #[test]
    fn test_mismatched_series_rejected() {
        assert!(PressuremeterLog::new("X", &[10.0, 9.0], &[0.5], &[1.0, 1.2], &[5.0, 6.0]).is_err());
        assert!(PressuremeterLog::new("X", &[], &[], &[], &[]).is_err());
    }

    #[test]
    fn test_stored_log_with_empty_series_rejected() {
        let mut value = serde_json::to_value(borehole()).unwrap();
        assert!(serde_json::from_value::<PressuremeterLog>(value.clone()).is_ok());

        value["limit_pressure"]["points"] = serde_json::json!([]);
        assert!(serde_json::from_value::<PressuremeterLog>(value).is_err());
    }
}
