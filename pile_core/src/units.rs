//! # Unit Types
//!
//! Lightweight newtype wrappers for the SI units used by the engine.
//!
//! ## Internal Units
//!
//! Every calculation works in a single consistent system:
//! - Length: metres (m)
//! - Force: meganewtons (MN)
//! - Stress / pressure: megapascals (MPa = MN/m²)
//!
//! Tables in NF P94-262 give unit skin friction in kPa and reports usually
//! show loads in kN and displacements in mm, so conversions live here.
//!
//! ## Example
//!
//! ```rust
//! use pile_core::units::{KiloNewtons, MegaNewtons, Meters, Millimeters};
//!
//! let load: KiloNewtons = MegaNewtons(1.5).into();
//! assert_eq!(load.0, 1500.0);
//!
//! let settlement: Millimeters = Meters(0.012).into();
//! assert!((settlement.0 - 12.0).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// Length Units
// ============================================================================

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

// ============================================================================
// Force Units
// ============================================================================

/// Force in meganewtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MegaNewtons(pub f64);

/// Force in kilonewtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloNewtons(pub f64);

impl From<MegaNewtons> for KiloNewtons {
    fn from(mn: MegaNewtons) -> Self {
        KiloNewtons(mn.0 * 1000.0)
    }
}

impl From<KiloNewtons> for MegaNewtons {
    fn from(kn: KiloNewtons) -> Self {
        MegaNewtons(kn.0 / 1000.0)
    }
}

// ============================================================================
// Pressure Units
// ============================================================================

/// Pressure in megapascals (MN/m²)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MegaPascals(pub f64);

/// Pressure in kilopascals (kN/m²)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloPascals(pub f64);

impl From<MegaPascals> for KiloPascals {
    fn from(mpa: MegaPascals) -> Self {
        KiloPascals(mpa.0 * 1000.0)
    }
}

impl From<KiloPascals> for MegaPascals {
    fn from(kpa: KiloPascals) -> Self {
        MegaPascals(kpa.0 / 1000.0)
    }
}
