//! # Load-Transfer Calculations
//!
//! The axial model is built bottom-up:
//!
//! - [`mobilization`] - Tri-linear t-z and q-z laws (Frank & Zhao)
//! - [`root_finder`] - Scalar Newton solver used by every local equation
//! - [`slice`] - One pile slice and its force/displacement propagation
//! - [`equilibrium`] - Whole-pile shooting method
//! - [`settlement`] - Load-settlement sweep
//! - [`capacity`] - Characteristic and limit-state bearing capacities
//!
//! [`analyze`] runs all of them for a [`PileCase`].

pub mod capacity;
pub mod equilibrium;
pub mod mobilization;
pub mod root_finder;
pub mod settlement;
pub mod slice;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::pile::PileResistances;
use crate::project::PileCase;

pub use capacity::{BearingCapacities, LimitStateCapacities};
pub use equilibrium::{EquilibriumOptions, EquilibriumResult, EquilibriumStatus, PileEquilibriumEngine};
pub use mobilization::{end_bearing, skin_friction, tri_linear, EndBearingLaw, SkinFrictionLaw, TriLinearLaw};
pub use root_finder::{RootSolution, RootStatus, ScalarRootFinder};
pub use settlement::{SettlementCurve, SettlementCurveBuilder, SettlementOptions, SettlementPoint};
pub use slice::{PileSection, PileSlice, PropagationDirection, SliceState};

/// Everything computed for one case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseReport {
    pub case_name: String,
    pub slice_count: usize,
    /// Whether every layer starts where the previous one ends
    pub continuous_stratigraphy: bool,
    pub resistances: PileResistances,
    pub capacities: BearingCapacities,
    /// Equilibrium under the target head load
    pub equilibrium: EquilibriumResult,
    pub settlement: SettlementCurve,
}

/// Run capacities, target equilibrium and settlement sweep for a case.
///
/// The sweep runs on a scoped thread next to the target solve; both share
/// one engine.
pub fn analyze(case: &PileCase) -> CalcResult<CaseReport> {
    let pile = &case.pile;
    let settings = &case.settings;

    let engine = PileEquilibriumEngine::new(pile)?;
    let resistances = *engine.resistances();
    let tip_curve = pile.tip_soil()?.friction_curve;
    let capacities = BearingCapacities::from_resistances(pile.category, tip_curve, &resistances);

    let continuous_stratigraphy = pile.check_stratigraphy();
    if !continuous_stratigraphy {
        warn!("case '{}': soil layers are not contiguous", case.meta.name);
    }

    info!(
        "case '{}': {} slices, R_b = {:.3} MN, R_s = {:.3} MN",
        case.meta.name,
        engine.slices().len(),
        resistances.base_resistance,
        resistances.shaft_resistance
    );

    let (equilibrium, settlement) = std::thread::scope(|scope| {
        let sweep = scope.spawn(|| {
            SettlementCurveBuilder::new(&engine)
                .with_equilibrium_options(settings.equilibrium)
                .build(&settings.settlement)
        });
        let equilibrium = engine.solve_head_load(settings.target_head_load, &settings.equilibrium);
        let settlement = sweep.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic));
        (equilibrium, settlement)
    });
    let equilibrium = equilibrium?;
    let settlement = settlement?;

    info!(
        "case '{}': Q = {:.3} MN -> w = {:.2} mm ({:?}), {} curve points",
        case.meta.name,
        equilibrium.head_load,
        equilibrium.head_displacement * 1000.0,
        equilibrium.status,
        settlement.len()
    );

    Ok(CaseReport {
        case_name: case.meta.name.clone(),
        slice_count: engine.slices().len(),
        continuous_stratigraphy,
        resistances,
        capacities,
        equilibrium,
        settlement,
    })
}
