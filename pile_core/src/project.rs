//! # Pile Case
//!
//! `PileCase` is the root record of a load-transfer analysis. Cases
//! serialize to `.pile` files as human-readable JSON.
//!
//! ```text
//! PileCase
//! ├── meta: CaseMetadata (version, id, name, engineer, timestamps)
//! ├── pile: PileGeometry (category, levels, section, layers)
//! └── settings: AnalysisSettings (target load, search and sweep options)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use pile_core::project::PileCase;
//!
//! let case = PileCase::demo();
//! let json = serde_json::to_string_pretty(&case).unwrap();
//! assert!(json.contains("Marnes"));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::equilibrium::EquilibriumOptions;
use crate::calculations::settlement::SettlementOptions;
use crate::pile::PileGeometry;
use crate::soils::{SoilClass, SoilLayer};
use crate::standard::{FrictionCurve, PileCategory};

/// Current schema version for case files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Default target head load (MN)
pub const DEFAULT_TARGET_LOAD: f64 = 1.5;

/// A pile, its soil, and how to analyze it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PileCase {
    pub meta: CaseMetadata,
    pub pile: PileGeometry,
    #[serde(default)]
    pub settings: AnalysisSettings,
}

impl PileCase {
    /// Create a case with fresh metadata and default settings.
    pub fn new(name: impl Into<String>, engineer: impl Into<String>, pile: PileGeometry) -> Self {
        let now = Utc::now();
        PileCase {
            meta: CaseMetadata {
                version: SCHEMA_VERSION.to_string(),
                id: Uuid::new_v4(),
                name: name.into(),
                engineer: engineer.into(),
                created: now,
                modified: now,
            },
            pile,
            settings: AnalysisSettings::default(),
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Ø800 pile with permanent casing, 10 m long, in two marl layers.
    pub fn demo() -> Self {
        let marl = |top: f64, bottom: f64, pf: f64, pl: f64, em: f64, alpha: f64| SoilLayer {
            name: "Marnes".to_string(),
            top_level: top,
            bottom_level: bottom,
            friction_curve: FrictionCurve::Q4,
            creep_pressure: pf,
            limit_pressure: pl,
            pressuremeter_modulus: em,
            rheological_coefficient: alpha,
            soil_class: SoilClass::Granular,
            tip_class: Some(SoilClass::Fine),
        };

        let pile = PileGeometry {
            category: PileCategory::BoredCasedPermanent,
            top_level: 0.0,
            bottom_level: -10.0,
            young_modulus: 10_000.0,
            bearing_diameter: 0.8,
            shaft_diameter: 0.8,
            slice_thickness: 0.05,
            layers: vec![
                marl(0.0, -5.0, 0.7, 1.0, 5.0, 2.0 / 3.0),
                marl(-5.0, -12.0, 2.5, 5.0, 20.0, 0.5),
            ],
        };

        PileCase::new("NDC_Pieu", "", pile)
    }
}

/// Case metadata stored in the file header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,
    pub id: Uuid,
    /// Case name used in reports
    pub name: String,
    /// Name of the responsible engineer
    #[serde(default)]
    pub engineer: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// What to compute for a case.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Head load for the equilibrium profile (MN)
    pub target_head_load: f64,
    #[serde(default)]
    pub equilibrium: EquilibriumOptions,
    #[serde(default)]
    pub settlement: SettlementOptions,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            target_head_load: DEFAULT_TARGET_LOAD,
            equilibrium: EquilibriumOptions::default(),
            settlement: SettlementOptions::default(),
        }
    }
}

impl AnalysisSettings {
    pub fn with_target_head_load(mut self, load: f64) -> Self {
        self.target_head_load = load;
        self
    }

    pub fn with_equilibrium(mut self, options: EquilibriumOptions) -> Self {
        self.equilibrium = options;
        self
    }

    pub fn with_settlement(mut self, options: SettlementOptions) -> Self {
        self.settlement = options;
        self
    }
}
