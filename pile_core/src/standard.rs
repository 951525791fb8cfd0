//! # NF P94-262 Tables
//!
//! Coefficients for pressuremeter-based design of deep foundations per
//! NF P94-262 (French application standard of Eurocode 7 for piles).
//!
//! ## Overview
//!
//! ```text
//! f_sol     = (a·p_l + b)·(1 − e^(−c·p_l))          Table F.5.2.2
//! q_s,lim   = min(α_pile-soil · f_sol, q_s,max)     Tables F.5.2.1 / F.5.2.3
//! R_b       = A_b · k_p · p_le*                     Table F.4.2.1 (k_p,max)
//! R_k       = R / (γ_Rd1 · γ_Rd2)                   Annex F
//! ```
//!
//! Entries that the standard marks as "not applicable" are returned as `None`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::units::{KiloPascals, MegaPascals};

// ============================================================================
// Clause References
// ============================================================================

/// NF P94-262 clause references for traceability in reports.
pub mod nfp94_262_ref {
    /// Pile categories and classes
    pub const PILE_CATEGORIES: &str = "NF P94-262 Table A.1";
    /// Equivalent net limit pressure p_le*
    pub const EQUIVALENT_LIMIT_PRESSURE: &str = "NF P94-262 F.4.2 (3)";
    /// Effective embedment D_ef
    pub const EFFECTIVE_EMBEDMENT: &str = "NF P94-262 Eq. F.4.2.6";
    /// Pressuremeter bearing factor k_p,max
    pub const BEARING_FACTOR: &str = "NF P94-262 Table F.4.2.1";
    /// Pile-soil coefficient α
    pub const ALPHA_PILE_SOIL: &str = "NF P94-262 Table F.5.2.1";
    /// f_sol curve parameters
    pub const FSOL_PARAMETERS: &str = "NF P94-262 Table F.5.2.2";
    /// Maximum unit skin friction q_s,max
    pub const QS_MAX: &str = "NF P94-262 Table F.5.2.3";
    /// Model factors γ_Rd1 and γ_Rd2
    pub const MODEL_FACTORS: &str = "NF P94-262 Annex F";
    /// Frank & Zhao mobilization laws
    pub const FRANK_ZHAO: &str = "NF P94-262 Annex L";
}

/// Model factor γ_Rd2 (pressuremeter method).
pub const GAMMA_RD2: f64 = 1.1;

// ============================================================================
// Friction Curves
// ============================================================================

/// Skin-friction curve class of a soil layer (Table F.5.2.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FrictionCurve {
    Q1,
    Q12,
    #[default]
    Q2,
    Q3,
    Q4,
    Q5,
}

impl FrictionCurve {
    /// All curve classes, in table column order
    pub const ALL: [FrictionCurve; 6] = [
        FrictionCurve::Q1,
        FrictionCurve::Q12,
        FrictionCurve::Q2,
        FrictionCurve::Q3,
        FrictionCurve::Q4,
        FrictionCurve::Q5,
    ];

    fn column(&self) -> usize {
        match self {
            FrictionCurve::Q1 => 0,
            FrictionCurve::Q12 => 1,
            FrictionCurve::Q2 => 2,
            FrictionCurve::Q3 => 3,
            FrictionCurve::Q4 => 4,
            FrictionCurve::Q5 => 5,
        }
    }

    /// Curve code as printed in the standard
    pub fn code(&self) -> &'static str {
        match self {
            FrictionCurve::Q1 => "Q1",
            FrictionCurve::Q12 => "Q12",
            FrictionCurve::Q2 => "Q2",
            FrictionCurve::Q3 => "Q3",
            FrictionCurve::Q4 => "Q4",
            FrictionCurve::Q5 => "Q5",
        }
    }

    /// Parse a curve code, ignoring case and surrounding whitespace.
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let code = s.trim().to_uppercase();
        FrictionCurve::ALL
            .iter()
            .copied()
            .find(|c| c.code() == code)
            .ok_or_else(|| CalcError::invalid_input("friction_curve", s, "Expected one of Q1, Q12, Q2, Q3, Q4, Q5"))
    }

    /// (a, b, c) parameters of the f_sol function
    pub fn fsol_parameters(&self) -> (f64, f64, f64) {
        match self {
            FrictionCurve::Q1 => (0.003, 0.04, 3.5),
            FrictionCurve::Q12 | FrictionCurve::Q2 => (0.010, 0.06, 1.2),
            FrictionCurve::Q3 => (0.007, 0.07, 1.3),
            FrictionCurve::Q4 => (0.008, 0.08, 3.0),
            FrictionCurve::Q5 => (0.010, 0.08, 3.0),
        }
    }

    /// f_sol(p_l) in MPa, with p_l the net limit pressure in MPa
    pub fn fsol(&self, limit_pressure: f64) -> f64 {
        let (a, b, c) = self.fsol_parameters();
        (a * limit_pressure + b) * (1.0 - (-c * limit_pressure).exp())
    }
}

impl fmt::Display for FrictionCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Pile Categories (Table A.1)
// ============================================================================

/// Pile category per Table A.1. Serialized as its numeric code (1 to 20).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum PileCategory {
    #[default]
    BoredSimple = 1,
    BoredSlurry,
    BoredCasedPermanent,
    BoredCasedRecovered,
    BoredGrooved,
    ContinuousFlightAuger,
    ScrewCast,
    ScrewCased,
    DrivenPrecast,
    DrivenCoated,
    DrivenCast,
    DrivenSteelClosed,
    DrivenSteelOpen,
    DrivenHSection,
    DrivenHSectionGrouted,
    SheetPile,
    MicropileType1,
    MicropileType2,
    GroutedIgu,
    GroutedIrs,
}

impl PileCategory {
    /// All categories, in code order
    pub const ALL: [PileCategory; 20] = [
        PileCategory::BoredSimple,
        PileCategory::BoredSlurry,
        PileCategory::BoredCasedPermanent,
        PileCategory::BoredCasedRecovered,
        PileCategory::BoredGrooved,
        PileCategory::ContinuousFlightAuger,
        PileCategory::ScrewCast,
        PileCategory::ScrewCased,
        PileCategory::DrivenPrecast,
        PileCategory::DrivenCoated,
        PileCategory::DrivenCast,
        PileCategory::DrivenSteelClosed,
        PileCategory::DrivenSteelOpen,
        PileCategory::DrivenHSection,
        PileCategory::DrivenHSectionGrouted,
        PileCategory::SheetPile,
        PileCategory::MicropileType1,
        PileCategory::MicropileType2,
        PileCategory::GroutedIgu,
        PileCategory::GroutedIrs,
    ];

    /// Numeric category code (1 to 20)
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Look up a category by its numeric code.
    pub fn from_code(code: u8) -> CalcResult<Self> {
        if (1..=20).contains(&code) {
            Ok(PileCategory::ALL[code as usize - 1])
        } else {
            Err(CalcError::invalid_input(
                "category",
                code.to_string(),
                "Pile category must be between 1 and 20 (Table A.1)",
            ))
        }
    }

    fn row(&self) -> usize {
        self.code() as usize - 1
    }

    /// Pile class (1 to 8)
    pub fn class(&self) -> u8 {
        match self.code() {
            1..=5 | 17 | 18 => 1,
            6 => 2,
            7 | 8 => 3,
            9..=12 => 4,
            13 => 5,
            14 | 15 => 6,
            16 => 7,
            _ => 8,
        }
    }

    /// Abbreviation used in Table A.1
    pub fn abbreviation(&self) -> &'static str {
        match self {
            PileCategory::BoredSimple => "FS",
            PileCategory::BoredSlurry => "FB",
            PileCategory::BoredCasedPermanent => "FTP",
            PileCategory::BoredCasedRecovered => "FTR",
            PileCategory::BoredGrooved => "FSR, FBR, PU",
            PileCategory::ContinuousFlightAuger => "FTC, FTCD",
            PileCategory::ScrewCast => "VM",
            PileCategory::ScrewCased => "VT",
            PileCategory::DrivenPrecast => "BPF, BPR",
            PileCategory::DrivenCoated => "BE",
            PileCategory::DrivenCast => "BM",
            PileCategory::DrivenSteelClosed => "BAF",
            PileCategory::DrivenSteelOpen => "BAO",
            PileCategory::DrivenHSection => "HB",
            PileCategory::DrivenHSectionGrouted => "HBi",
            PileCategory::SheetPile => "PP",
            PileCategory::MicropileType1 => "M1",
            PileCategory::MicropileType2 => "M2",
            PileCategory::GroutedIgu => "PIGU, MIGU",
            PileCategory::GroutedIrs => "PIRS, MIRS",
        }
    }

    /// Description for reports
    pub fn description(&self) -> &'static str {
        match self {
            PileCategory::BoredSimple => "Bored pile or barrette, unsupported",
            PileCategory::BoredSlurry => "Bored pile or barrette under slurry",
            PileCategory::BoredCasedPermanent => "Bored pile, permanent casing",
            PileCategory::BoredCasedRecovered => "Bored pile, recovered casing",
            PileCategory::BoredGrooved => "Bored pile with grooving, or hand-dug shaft",
            PileCategory::ContinuousFlightAuger => "Continuous flight auger, single or double rotation",
            PileCategory::ScrewCast => "Screw pile, cast in place",
            PileCategory::ScrewCased => "Screw pile, cased",
            PileCategory::DrivenPrecast => "Driven precast or prestressed concrete",
            PileCategory::DrivenCoated => "Driven, coated (concrete, mortar or grout)",
            PileCategory::DrivenCast => "Driven, cast in place",
            PileCategory::DrivenSteelClosed => "Driven steel, closed-ended",
            PileCategory::DrivenSteelOpen => "Driven steel, open-ended",
            PileCategory::DrivenHSection => "Driven H-section",
            PileCategory::DrivenHSectionGrouted => "Driven H-section, grouted",
            PileCategory::SheetPile => "Driven sheet piles",
            PileCategory::MicropileType1 => "Micropile type I",
            PileCategory::MicropileType2 => "Micropile type II",
            PileCategory::GroutedIgu => "Pile or micropile grouted in single phase (IGU), type III",
            PileCategory::GroutedIrs => "Pile or micropile grouted repeatedly (IRS), type IV",
        }
    }

    /// Display name for reports, e.g. "1 - FS"
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.code(), self.abbreviation())
    }

    /// Pile-soil coefficient α (Table F.5.2.1)
    pub fn alpha_pile_soil(&self, curve: FrictionCurve) -> Option<f64> {
        ALPHA_PILE_SOIL[self.row()][curve.column()]
    }

    /// Maximum unit skin friction q_s,max in MPa (Table F.5.2.3)
    pub fn qs_max(&self, curve: FrictionCurve) -> Option<f64> {
        QS_MAX_KPA[self.row()][curve.column()].map(|kpa| MegaPascals::from(KiloPascals(kpa)).0)
    }

    /// Bearing factor k_p,max for this pile's class (Table F.4.2.1)
    pub fn kp_max(&self, curve: FrictionCurve) -> f64 {
        KP_MAX[self.class() as usize - 1][curve.column()]
    }

    /// Whether both shaft-friction entries exist for this soil curve
    pub fn is_applicable(&self, curve: FrictionCurve) -> bool {
        self.alpha_pile_soil(curve).is_some() && self.qs_max(curve).is_some()
    }

    fn uses_high_model_factors(&self) -> bool {
        matches!(self.code(), 10 | 15 | 17 | 18 | 19 | 20)
    }

    /// Model factor γ_Rd1 in compression, by tip soil curve.
    ///
    /// The standard gives no Q12 column; Q12 is read in the Q2 column.
    pub fn gamma_rd1_compression(&self, curve: FrictionCurve) -> f64 {
        let row = if self.uses_high_model_factors() {
            [2.00, 1.40, 2.00, 2.00, 1.40]
        } else {
            [1.15, 1.15, 1.40, 1.15, 1.15]
        };
        row[gamma_column(curve)]
    }

    /// Model factor γ_Rd1 in tension, by tip soil curve.
    pub fn gamma_rd1_tension(&self, curve: FrictionCurve) -> f64 {
        let row = if self.uses_high_model_factors() {
            [2.00, 1.70, 2.00, 2.00, 1.70]
        } else {
            [1.40, 1.40, 1.70, 1.40, 1.40]
        };
        row[gamma_column(curve)]
    }
}

fn gamma_column(curve: FrictionCurve) -> usize {
    match curve {
        FrictionCurve::Q1 => 0,
        FrictionCurve::Q12 | FrictionCurve::Q2 => 1,
        FrictionCurve::Q3 => 2,
        FrictionCurve::Q4 => 3,
        FrictionCurve::Q5 => 4,
    }
}

impl TryFrom<u8> for PileCategory {
    type Error = CalcError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        PileCategory::from_code(code)
    }
}

impl From<PileCategory> for u8 {
    fn from(category: PileCategory) -> u8 {
        category.code()
    }
}

impl fmt::Display for PileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name(), self.description())
    }
}

// ============================================================================
// Tables
// ============================================================================

// Columns: Q1, Q12, Q2, Q3, Q4, Q5

/// Table F.4.2.1, rows by pile class 1..=8
const KP_MAX: [[f64; 6]; 8] = [
    [1.15, 1.10, 1.10, 1.45, 1.45, 1.45],
    [1.30, 1.65, 1.65, 1.60, 1.60, 2.00],
    [1.55, 3.20, 3.20, 2.35, 2.10, 2.10],
    [1.35, 3.10, 3.10, 2.30, 2.30, 2.30],
    [1.00, 1.90, 1.90, 1.40, 1.40, 1.20],
    [1.20, 3.10, 3.10, 1.70, 2.20, 1.50],
    [1.00, 1.00, 1.00, 1.00, 1.00, 1.20],
    [1.15, 1.10, 1.10, 1.45, 1.45, 1.45],
];

const NA: Option<f64> = None;

/// Table F.5.2.1, rows by pile category 1..=20
const ALPHA_PILE_SOIL: [[Option<f64>; 6]; 20] = [
    [Some(1.10), Some(1.0), Some(1.0), Some(1.8), Some(1.5), Some(1.6)],
    [Some(1.25), Some(1.4), Some(1.4), Some(1.8), Some(1.5), Some(1.6)],
    [Some(0.70), Some(0.6), Some(0.6), Some(0.5), Some(0.9), NA],
    [Some(1.25), Some(1.4), Some(1.4), Some(1.7), Some(1.4), NA],
    [Some(1.30), NA, NA, NA, NA, NA],
    [Some(1.50), Some(1.8), Some(1.8), Some(2.1), Some(1.6), Some(1.6)],
    [Some(1.90), Some(2.1), Some(2.1), Some(1.7), Some(1.7), NA],
    [Some(0.60), Some(0.6), Some(0.6), Some(1.0), Some(0.7), NA],
    [Some(1.10), Some(1.4), Some(1.4), Some(1.0), Some(0.9), NA],
    [Some(2.00), Some(2.1), Some(2.1), Some(1.9), Some(1.6), NA],
    [Some(1.20), Some(1.4), Some(1.4), Some(2.1), Some(1.0), NA],
    [Some(0.80), Some(1.2), Some(1.2), Some(0.4), Some(0.9), NA],
    [Some(1.20), Some(0.7), Some(0.7), Some(0.5), Some(1.0), Some(1.0)],
    [Some(1.10), Some(1.0), Some(1.0), Some(0.4), Some(1.0), Some(0.9)],
    [Some(2.70), Some(2.9), Some(2.9), Some(2.4), Some(2.4), Some(2.4)],
    [Some(0.90), Some(0.8), Some(0.8), Some(0.4), Some(1.2), Some(1.2)],
    [NA, NA, NA, NA, NA, NA],
    [NA, NA, NA, NA, NA, NA],
    [Some(2.70), Some(2.9), Some(2.9), Some(2.4), Some(2.4), Some(2.4)],
    [Some(3.40), Some(3.8), Some(3.8), Some(3.1), Some(3.1), Some(3.1)],
];

/// Table F.5.2.3 in kPa, rows by pile category 1..=20
const QS_MAX_KPA: [[Option<f64>; 6]; 20] = [
    [Some(90.0), Some(90.0), Some(90.0), Some(200.0), Some(170.0), Some(200.0)],
    [Some(90.0), Some(90.0), Some(90.0), Some(200.0), Some(170.0), Some(200.0)],
    [Some(50.0), Some(50.0), Some(50.0), Some(50.0), Some(90.0), NA],
    [Some(90.0), Some(90.0), Some(90.0), Some(170.0), Some(170.0), NA],
    [Some(90.0), Some(90.0), NA, NA, NA, NA],
    [Some(90.0), Some(90.0), Some(170.0), Some(200.0), Some(200.0), Some(200.0)],
    [Some(130.0), Some(130.0), Some(200.0), Some(170.0), Some(170.0), NA],
    [Some(50.0), Some(50.0), Some(90.0), Some(90.0), Some(90.0), NA],
    [Some(130.0), Some(130.0), Some(130.0), Some(90.0), Some(90.0), NA],
    [Some(170.0), Some(170.0), Some(260.0), Some(200.0), Some(200.0), NA],
    [Some(90.0), Some(90.0), Some(130.0), Some(260.0), Some(200.0), NA],
    [Some(90.0), Some(90.0), Some(90.0), Some(50.0), Some(90.0), NA],
    [Some(90.0), Some(90.0), Some(50.0), Some(50.0), Some(90.0), Some(90.0)],
    [Some(90.0), Some(90.0), Some(130.0), Some(50.0), Some(90.0), Some(90.0)],
    [Some(200.0), Some(200.0), Some(380.0), Some(320.0), Some(320.0), Some(320.0)],
    [Some(90.0), Some(90.0), Some(50.0), Some(50.0), Some(90.0), Some(90.0)],
    [NA, NA, NA, NA, NA, NA],
    [NA, NA, NA, NA, NA, NA],
    [Some(200.0), Some(200.0), Some(380.0), Some(320.0), Some(320.0), Some(320.0)],
    [Some(200.0), Some(200.0), Some(440.0), Some(440.0), Some(440.0), Some(500.0)],
];
