//! # Soil Layers
//!
//! A soil layer carries the Ménard pressuremeter parameters of one stratum
//! and derives from them the quantities the load-transfer model needs:
//!
//! | Quantity | Expression | Reference |
//! |----------|------------|-----------|
//! | f_sol    | (a·p_l + b)(1 − e^(−c·p_l)) | Table F.5.2.2 |
//! | q_s,lim  | min(α_pile-soil·f_sol, q_s,max) | F.5.2 |
//! | k_t      | 2.0·E_M/D_s (fine), 0.8·E_M/D_s (granular) | Annex L |
//! | k_q      | 11·E_M/D_p (fine), 4.8·E_M/D_p (granular) | Annex L |
//! | k_f      | Ménard lateral reaction modulus | Annex I |
//!
//! All pressures and moduli are in MPa, lengths in m.

pub mod pressuremeter;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::standard::{FrictionCurve, PileCategory};

pub use pressuremeter::PressuremeterLog;

/// Reference width B0 of the Ménard lateral modulus (m)
pub const REFERENCE_WIDTH: f64 = 0.6;

/// Soil class for the Frank & Zhao stiffness coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SoilClass {
    /// Clays and silts
    #[serde(alias = "fin")]
    Fine,
    /// Sands and gravels
    #[default]
    #[serde(alias = "granulaire")]
    Granular,
}

impl SoilClass {
    /// k_t = factor · E_M / D_s
    pub fn shaft_stiffness_factor(&self) -> f64 {
        match self {
            SoilClass::Fine => 2.0,
            SoilClass::Granular => 0.8,
        }
    }

    /// k_q = factor · E_M / D_p
    pub fn tip_stiffness_factor(&self) -> f64 {
        match self {
            SoilClass::Fine => 11.0,
            SoilClass::Granular => 4.8,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SoilClass::Fine => "Fine",
            SoilClass::Granular => "Granular",
        }
    }
}

impl fmt::Display for SoilClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Design situation for the lateral soil reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LateralSituation {
    #[default]
    ShortTerm,
    LongTerm,
    UltimateLimitState,
    Seismic,
}

/// One soil stratum along the pile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilLayer {
    /// Layer name for reports
    pub name: String,
    /// Level of the top of the layer (m)
    pub top_level: f64,
    /// Level of the bottom of the layer (m)
    pub bottom_level: f64,
    /// Skin-friction curve class
    pub friction_curve: FrictionCurve,
    /// Creep pressure p_f (MPa)
    pub creep_pressure: f64,
    /// Net limit pressure p_l (MPa)
    pub limit_pressure: f64,
    /// Pressuremeter modulus E_M (MPa)
    pub pressuremeter_modulus: f64,
    /// Ménard rheological coefficient α
    pub rheological_coefficient: f64,
    /// Soil class used by the shaft (t-z) law
    #[serde(default)]
    pub soil_class: SoilClass,
    /// Soil class used by the tip (q-z) law, when it differs from the shaft class
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip_class: Option<SoilClass>,
}

impl SoilLayer {
    /// Layer thickness (m)
    pub fn thickness(&self) -> f64 {
        self.top_level - self.bottom_level
    }

    /// Whether `level` lies within the layer, bounds included
    pub fn contains_level(&self, level: f64) -> bool {
        self.bottom_level <= level && level <= self.top_level
    }

    /// Soil class governing the tip law
    pub fn tip_soil_class(&self) -> SoilClass {
        self.tip_class.unwrap_or(self.soil_class)
    }

    pub fn validate(&self) -> CalcResult<()> {
        let field = |name: &str| format!("soil '{}'.{}", self.name, name);

        if !self.top_level.is_finite() || !self.bottom_level.is_finite() {
            return Err(CalcError::invalid_input(field("levels"), "non-finite", "Levels must be finite"));
        }
        if self.bottom_level >= self.top_level {
            return Err(CalcError::invalid_input(
                field("bottom_level"),
                self.bottom_level.to_string(),
                format!("Bottom level must be below top level ({})", self.top_level),
            ));
        }
        if !(self.limit_pressure >= 0.0) {
            return Err(CalcError::invalid_input(
                field("limit_pressure"),
                self.limit_pressure.to_string(),
                "Limit pressure cannot be negative",
            ));
        }
        if !(self.creep_pressure >= 0.0) {
            return Err(CalcError::invalid_input(
                field("creep_pressure"),
                self.creep_pressure.to_string(),
                "Creep pressure cannot be negative",
            ));
        }
        if !(self.pressuremeter_modulus > 0.0) {
            return Err(CalcError::invalid_input(
                field("pressuremeter_modulus"),
                self.pressuremeter_modulus.to_string(),
                "Pressuremeter modulus must be positive",
            ));
        }
        if !(0.0..=1.0).contains(&self.rheological_coefficient) {
            return Err(CalcError::invalid_input(
                field("rheological_coefficient"),
                self.rheological_coefficient.to_string(),
                "Rheological coefficient must be between 0 and 1",
            ));
        }
        Ok(())
    }

    /// f_sol for this layer's limit pressure (MPa)
    pub fn fsol(&self) -> f64 {
        self.friction_curve.fsol(self.limit_pressure)
    }

    /// Limit unit skin friction q_s,lim = min(α·f_sol, q_s,max) (MPa).
    ///
    /// Fails when the standard gives no value for this pile category and curve.
    pub fn qs_lim(&self, category: PileCategory) -> CalcResult<f64> {
        let curve = self.friction_curve;
        match (category.alpha_pile_soil(curve), category.qs_max(curve)) {
            (Some(alpha), Some(qs_max)) => Ok((alpha * self.fsol()).min(qs_max)),
            _ => Err(CalcError::invalid_input(
                format!("soil '{}'.friction_curve", self.name),
                curve.code(),
                format!(
                    "Curve {} is not applicable to pile category {} (Tables F.5.2.1 / F.5.2.3)",
                    curve,
                    category.display_name()
                ),
            )),
        }
    }

    /// Shaft shear stiffness k_t for shaft diameter `ds` (MPa/m)
    pub fn module_kt(&self, ds: f64) -> f64 {
        self.soil_class.shaft_stiffness_factor() * self.pressuremeter_modulus / ds
    }

    /// Tip stiffness k_q for bearing diameter `dp` (MPa/m)
    pub fn module_kq(&self, dp: f64) -> f64 {
        self.tip_soil_class().tip_stiffness_factor() * self.pressuremeter_modulus / dp
    }

    /// Ménard lateral reaction modulus k_f for width `b` (MPa/m)
    pub fn module_kf(&self, b: f64) -> f64 {
        let alpha = self.rheological_coefficient;
        let em = self.pressuremeter_modulus;
        if b >= REFERENCE_WIDTH {
            12.0 * em / (4.0 / 3.0 * REFERENCE_WIDTH / b * (2.65 * b / REFERENCE_WIDTH).powf(alpha) + alpha)
        } else {
            12.0 * em / (4.0 / 3.0 * 2.65_f64.powf(alpha) + alpha)
        }
    }
}
