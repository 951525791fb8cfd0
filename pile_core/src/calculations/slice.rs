//! # Pile Slices
//!
//! A slice is a short length of pile embedded in a single soil layer. Its
//! axial response is condensed at mid-height: the mobilized friction is
//! evaluated at the midpoint displacement `w_m`, and the slice is
//! transferred across in two half-steps.
//!
//! ```text
//!   bottom → top                         top → bottom
//!   Q_m(w) = Q_b + half·τ(w)             Q_m(w) = Q_t − half·τ(w)
//!   w      = w_b + dh/(2EA)·Q_m(w)       w      = w_t − dh/(2EA)·Q_m(w)
//!   Q_t    = Q_m + half·τ(w_m)           Q_b    = Q_m − half·τ(w_m)
//!   w_t    = w_b + dh/EA·Q_m             w_b    = w_t − dh/EA·Q_m
//!
//!   half = P·dh/2     P = π·D_s     EA = E·π·D_p²/4
//! ```
//!
//! Slices are immutable. [`PileSlice::propagate`] returns a fresh
//! [`SliceState`], so one discretized pile can be evaluated from several
//! threads at once.

use std::f64::consts::PI;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::calculations::mobilization::{SkinFrictionLaw, TriLinearLaw};
use crate::calculations::root_finder::ScalarRootFinder;
use crate::errors::CalcResult;
use crate::soils::{LateralSituation, SoilLayer};
use crate::standard::PileCategory;

/// Cross-section data shared by every slice of a pile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PileSection {
    /// Young's modulus of the pile material (MPa)
    pub young_modulus: f64,
    /// Equivalent diameter for the section and end bearing D_p (m)
    pub bearing_diameter: f64,
    /// Equivalent diameter for the perimeter D_s (m)
    pub shaft_diameter: f64,
}

impl PileSection {
    /// Section area A = π·D_p²/4 (m²)
    pub fn area(&self) -> f64 {
        PI * self.bearing_diameter.powi(2) / 4.0
    }

    /// Axial stiffness EA (MN)
    pub fn axial_stiffness(&self) -> f64 {
        self.young_modulus * self.area()
    }

    /// Perimeter P = π·D_s (m)
    pub fn perimeter(&self) -> f64 {
        PI * self.shaft_diameter
    }
}

/// Direction in which forces and displacements are carried across a slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropagationDirection {
    /// Input at the bottom face, output at the top face
    BottomToTop,
    /// Input at the top face, output at the bottom face
    TopToBottom,
}

/// Forces, displacements and friction of one slice after propagation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliceState {
    pub top_level: f64,
    pub bottom_level: f64,
    /// Axial force at the top face (MN, compression positive)
    pub force_top: f64,
    pub force_mid: f64,
    pub force_bottom: f64,
    /// Settlement of the top face (m, downward positive)
    pub displacement_top: f64,
    pub displacement_mid: f64,
    pub displacement_bottom: f64,
    /// Mobilized unit skin friction (MPa)
    pub friction: f64,
    /// Limit unit skin friction q_s,lim (MPa)
    pub friction_limit: f64,
    /// Whether the midpoint equation converged
    pub converged: bool,
}

/// One discretized length of pile within a single soil layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PileSlice {
    top_level: f64,
    thickness: f64,
    soil: SoilLayer,
    section: PileSection,
    friction: SkinFrictionLaw,
}

impl PileSlice {
    /// Build a slice and derive its friction law from the soil layer.
    pub fn new(
        top_level: f64,
        thickness: f64,
        soil: &SoilLayer,
        category: PileCategory,
        section: PileSection,
    ) -> CalcResult<Self> {
        let qs_lim = soil.qs_lim(category)?;
        let kt = soil.module_kt(section.shaft_diameter);
        Ok(PileSlice {
            top_level,
            thickness,
            soil: soil.clone(),
            section,
            friction: SkinFrictionLaw::new(qs_lim, kt)?,
        })
    }

    pub fn top_level(&self) -> f64 {
        self.top_level
    }

    pub fn bottom_level(&self) -> f64 {
        self.top_level - self.thickness
    }

    pub fn mid_level(&self) -> f64 {
        self.top_level - self.thickness / 2.0
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    pub fn soil(&self) -> &SoilLayer {
        &self.soil
    }

    pub fn section(&self) -> &PileSection {
        &self.section
    }

    /// q_s,lim (MPa)
    pub fn qs_lim(&self) -> f64 {
        self.friction.limit
    }

    /// k_t (MPa/m)
    pub fn kt(&self) -> f64 {
        self.friction.stiffness
    }

    /// Mobilized unit skin friction for a midpoint displacement
    pub fn friction_at(&self, displacement: f64) -> f64 {
        self.friction.evaluate(displacement)
    }

    /// Ultimate shaft resistance of the slice, P·q_s,lim·dh (MN)
    pub fn shaft_resistance(&self) -> f64 {
        self.section.perimeter() * self.qs_lim() * self.thickness
    }

    /// Carry (force, displacement) across the slice with the default solver.
    pub fn propagate(
        &self,
        direction: PropagationDirection,
        force_in: f64,
        displacement_in: f64,
        mid_guess: Option<f64>,
    ) -> SliceState {
        self.propagate_with(&ScalarRootFinder::default(), direction, force_in, displacement_in, mid_guess)
    }

    /// Carry (force, displacement) across the slice.
    ///
    /// `mid_guess` seeds the midpoint iteration and defaults to the incoming
    /// face displacement. If the midpoint equation does not converge, the
    /// midpoint displacement falls back to zero and the state is flagged.
    pub fn propagate_with(
        &self,
        finder: &ScalarRootFinder,
        direction: PropagationDirection,
        force_in: f64,
        displacement_in: f64,
        mid_guess: Option<f64>,
    ) -> SliceState {
        let dh = self.thickness;
        let ea = self.section.axial_stiffness();
        let half = 0.5 * self.section.perimeter() * dh;
        let guess = mid_guess.unwrap_or(displacement_in);

        // +1 adds friction going up, −1 removes it going down
        let sign = match direction {
            PropagationDirection::BottomToTop => 1.0,
            PropagationDirection::TopToBottom => -1.0,
        };

        let force_mid_at = |w: f64| force_in + sign * half * self.friction.evaluate(w);
        let residual = |w: f64| displacement_in + sign * dh / (2.0 * ea) * force_mid_at(w) - w;

        let solution = finder.solve(residual, 0.0, guess);
        if !solution.converged() {
            warn!(
                "slice {:.3}..{:.3}: midpoint equation did not converge ({:?}), using w_m = 0",
                self.top_level,
                self.bottom_level(),
                solution.status
            );
        }

        let w_mid = solution.root;
        let tau = self.friction.evaluate(w_mid);
        let force_mid = force_mid_at(w_mid);
        let force_out = force_mid + sign * half * tau;
        let displacement_out = displacement_in + sign * dh / ea * force_mid;

        let (force_top, force_bottom, displacement_top, displacement_bottom) = match direction {
            PropagationDirection::BottomToTop => (force_out, force_in, displacement_out, displacement_in),
            PropagationDirection::TopToBottom => (force_in, force_out, displacement_in, displacement_out),
        };

        SliceState {
            top_level: self.top_level,
            bottom_level: self.bottom_level(),
            force_top,
            force_mid,
            force_bottom,
            displacement_top,
            displacement_mid: w_mid,
            displacement_bottom,
            friction: tau,
            friction_limit: self.qs_lim(),
            converged: solution.converged(),
        }
    }

    /// Linear lateral spring stiffness of the slice for a pile width `width` (MN/m).
    pub fn linear_spring(&self, width: f64, situation: LateralSituation) -> f64 {
        let k = self.thickness * self.soil.module_kf(width);
        match situation {
            LateralSituation::ShortTerm | LateralSituation::UltimateLimitState => k,
            LateralSituation::LongTerm => k / 2.0,
            LateralSituation::Seismic => 3.0 * k,
        }
    }

    /// Lateral soil reaction of the slice (MN) for a displacement `dy` towards the soil.
    pub fn lateral_reaction(&self, dy: f64, width: f64, situation: LateralSituation) -> CalcResult<f64> {
        let dh = self.thickness;
        let kf = dh * self.soil.module_kf(width);
        let creep = dh * width * self.soil.creep_pressure;
        let limit = dh * width * self.soil.limit_pressure;

        let law = match situation {
            LateralSituation::ShortTerm => TriLinearLaw::bilinear(creep, kf)?,
            LateralSituation::LongTerm => TriLinearLaw::bilinear(creep, kf / 2.0)?,
            LateralSituation::UltimateLimitState => TriLinearLaw::new(creep, kf, Some(limit), Some(kf / 2.0))?,
            LateralSituation::Seismic => TriLinearLaw::bilinear(limit, 3.0 * kf)?,
        };
        Ok(law.evaluate(dy))
    }
}
