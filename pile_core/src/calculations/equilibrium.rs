//! # Pile Equilibrium
//!
//! Whole-pile axial equilibrium by a shooting method.
//!
//! ## Head-load driven (primary)
//!
//! For a target head load `Q`, find the head displacement `w` such that
//! propagating `(Q, w)` down through every slice gives a base state
//! `(Q_base, w_base)` consistent with the tip law:
//!
//! ```text
//! residual(w) = Q_base − R_tip(w_base)
//! R_tip = 0                               Q < 0 (uplift: tip inactive)
//!       = 0                               w_base ≤ 0 (no tension contact)
//!       = A_b · end_bearing(w_base)       otherwise
//! ```
//!
//! The head displacement is searched in `[0, w_max]` for compression and
//! `[−w_max, 0]` for uplift: the initial guess is tried first, then the
//! range is scanned for a sign change, then bisected. If no sign change is
//! found the best sample is returned, flagged [`EquilibriumStatus::BracketNotFound`].
//!
//! ## Tip-displacement driven (secondary)
//!
//! Impose a tip displacement, compute the tip reaction and propagate upward
//! to obtain the head force. [`PileEquilibriumEngine::solve_head_load_from_tip`]
//! wraps this in a Newton search for a target head force.
//!
//! The engine never mutates after construction; every evaluation builds its
//! own slice states.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::calculations::mobilization::EndBearingLaw;
use crate::calculations::root_finder::ScalarRootFinder;
use crate::calculations::slice::{PileSlice, PropagationDirection, SliceState};
use crate::errors::{CalcError, CalcResult};
use crate::pile::{PileGeometry, PileResistances};

/// Default bound on the head displacement search (m)
pub const MAX_HEAD_DISPLACEMENT: f64 = 0.20;

/// Default number of scan samples over the search range
pub const BRACKET_SAMPLES: usize = 40;

/// Default number of bisection steps
pub const BISECTION_ITERATIONS: usize = 70;

/// Search settings for [`PileEquilibriumEngine::solve_head_load`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquilibriumOptions {
    /// First head displacement tried (m), clamped into the search range
    pub head_guess: f64,
    /// Half-width of the head displacement search range (m)
    pub max_head_displacement: f64,
    /// Number of evenly spaced samples scanned for a sign change
    pub bracket_samples: usize,
    /// Maximum number of bisection steps
    pub bisection_iterations: usize,
    /// Force tolerance (MN); `1e-5·max(1, |Q|)` when unset
    pub force_tolerance: Option<f64>,
}

impl Default for EquilibriumOptions {
    fn default() -> Self {
        EquilibriumOptions {
            head_guess: 0.0,
            max_head_displacement: MAX_HEAD_DISPLACEMENT,
            bracket_samples: BRACKET_SAMPLES,
            bisection_iterations: BISECTION_ITERATIONS,
            force_tolerance: None,
        }
    }
}

impl EquilibriumOptions {
    pub fn with_head_guess(mut self, guess: f64) -> Self {
        self.head_guess = guess;
        self
    }

    pub fn with_max_head_displacement(mut self, w_max: f64) -> Self {
        self.max_head_displacement = w_max;
        self
    }

    pub fn with_bracket_samples(mut self, samples: usize) -> Self {
        self.bracket_samples = samples;
        self
    }

    pub fn with_bisection_iterations(mut self, iterations: usize) -> Self {
        self.bisection_iterations = iterations;
        self
    }

    pub fn with_force_tolerance(mut self, tolerance: f64) -> Self {
        self.force_tolerance = Some(tolerance);
        self
    }

    /// Tolerance on the tip residual for a head load (MN)
    pub fn tolerance_for(&self, head_load: f64) -> f64 {
        self.force_tolerance.unwrap_or(1e-5 * head_load.abs().max(1.0))
    }

    pub fn validate(&self) -> CalcResult<()> {
        if !self.head_guess.is_finite() {
            return Err(CalcError::invalid_input(
                "head_guess",
                self.head_guess.to_string(),
                "Initial guess must be finite",
            ));
        }
        if !(self.max_head_displacement > 0.0) || !self.max_head_displacement.is_finite() {
            return Err(CalcError::invalid_input(
                "max_head_displacement",
                self.max_head_displacement.to_string(),
                "Search range must be positive",
            ));
        }
        if self.bracket_samples == 0 {
            return Err(CalcError::invalid_input("bracket_samples", "0", "At least one scan sample is required"));
        }
        if let Some(tol) = self.force_tolerance {
            if !(tol > 0.0) {
                return Err(CalcError::invalid_input("force_tolerance", tol.to_string(), "Tolerance must be positive"));
            }
        }
        Ok(())
    }
}

/// How an equilibrium search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EquilibriumStatus {
    /// Residual within tolerance
    Converged,
    /// No sign change over the search range; best sample returned
    BracketNotFound,
    /// Bisection steps exhausted; interval midpoint returned
    BisectionLimit,
    /// Newton search on the tip displacement failed
    NonConvergence,
}

/// Snapshot of one equilibrium solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumResult {
    /// Head load (MN)
    pub head_load: f64,
    /// Head settlement (m)
    pub head_displacement: f64,
    /// Axial force at the base of the last slice (MN)
    pub base_force: f64,
    /// Displacement at the base of the last slice (m)
    pub base_displacement: f64,
    /// Tip reaction from the q-z law (MN)
    pub tip_reaction: f64,
    /// Remaining mismatch at the tip (MN)
    pub residual: f64,
    pub status: EquilibriumStatus,
    /// Every slice midpoint equation converged
    pub slices_converged: bool,
    /// Slice states, top-down
    pub slices: Vec<SliceState>,
}

impl EquilibriumResult {
    /// Search converged and every slice midpoint equation converged
    pub fn converged(&self) -> bool {
        self.status == EquilibriumStatus::Converged && self.slices_converged
    }

    /// Number of slices whose midpoint displacement fell back to zero
    pub fn failed_slices(&self) -> usize {
        self.slices.iter().filter(|s| !s.converged).count()
    }

    /// Load carried by the shaft, head load minus base force (MN)
    pub fn shaft_load(&self) -> f64 {
        self.head_load - self.base_force
    }

    /// Largest ratio of mobilized to limit friction over the slices
    pub fn max_friction_mobilization(&self) -> f64 {
        self.slices
            .iter()
            .filter(|s| s.friction_limit > 0.0)
            .map(|s| s.friction.abs() / s.friction_limit)
            .fold(0.0, f64::max)
    }
}

/// Axial load-transfer solver for one discretized pile.
#[derive(Debug, Clone)]
pub struct PileEquilibriumEngine {
    slices: Vec<PileSlice>,
    tip_law: EndBearingLaw,
    tip_area: f64,
    resistances: PileResistances,
    slice_solver: ScalarRootFinder,
}

impl PileEquilibriumEngine {
    /// Validate and discretize a pile, and build its tip law.
    pub fn new(pile: &PileGeometry) -> CalcResult<Self> {
        pile.validate()?;
        let slices = pile.discretize()?;
        if slices.is_empty() {
            return Err(CalcError::invalid_input(
                "layers",
                format!("{} layer(s)", pile.layers.len()),
                "The pile does not cross any soil layer",
            ));
        }
        let resistances = pile.resistances()?;
        let tip_law = pile.tip_law(resistances.unit_base_resistance)?;

        debug!(
            "engine: {} slices, R_s = {:.4} MN, R_b = {:.4} MN, q_b = {:.4} MPa, k_q = {:.2} MPa/m",
            slices.len(),
            resistances.shaft_resistance,
            resistances.base_resistance,
            tip_law.limit,
            tip_law.stiffness
        );

        Ok(PileEquilibriumEngine {
            slices,
            tip_law,
            tip_area: pile.section().area(),
            resistances,
            slice_solver: ScalarRootFinder::default(),
        })
    }

    /// Use a specific solver for the slice midpoint equations.
    pub fn with_slice_solver(mut self, solver: ScalarRootFinder) -> Self {
        self.slice_solver = solver;
        self
    }

    pub fn slices(&self) -> &[PileSlice] {
        &self.slices
    }

    pub fn resistances(&self) -> &PileResistances {
        &self.resistances
    }

    pub fn tip_law(&self) -> &EndBearingLaw {
        &self.tip_law
    }

    /// Tip reaction for a base displacement (MN). Inactive in uplift.
    pub fn tip_reaction(&self, base_displacement: f64, uplift: bool) -> f64 {
        if uplift || base_displacement <= 0.0 {
            return 0.0;
        }
        self.tip_area * self.tip_law.evaluate(base_displacement)
    }

    fn base_state(&self, head_load: f64, head_displacement: f64) -> (f64, f64) {
        self.slices.iter().fold((head_load, head_displacement), |(q, w), slice| {
            let state = slice.propagate_with(&self.slice_solver, PropagationDirection::TopToBottom, q, w, None);
            (state.force_bottom, state.displacement_bottom)
        })
    }

    /// Propagate a head state down to the tip; states are top-down.
    pub fn propagate_from_head(&self, head_load: f64, head_displacement: f64) -> Vec<SliceState> {
        let mut states = Vec::with_capacity(self.slices.len());
        let (mut q, mut w) = (head_load, head_displacement);
        for slice in &self.slices {
            let state = slice.propagate_with(&self.slice_solver, PropagationDirection::TopToBottom, q, w, None);
            q = state.force_bottom;
            w = state.displacement_bottom;
            states.push(state);
        }
        states
    }

    /// Propagate from an imposed tip displacement up to the head.
    ///
    /// Returns the tip reaction and the slice states, top-down.
    pub fn propagate_from_tip(&self, tip_displacement: f64) -> (f64, Vec<SliceState>) {
        let reaction = self.tip_area * self.tip_law.evaluate(tip_displacement);
        let mut states = Vec::with_capacity(self.slices.len());
        let (mut q, mut w) = (reaction, tip_displacement);
        for slice in self.slices.iter().rev() {
            let state = slice.propagate_with(&self.slice_solver, PropagationDirection::BottomToTop, q, w, None);
            q = state.force_top;
            w = state.displacement_top;
            states.push(state);
        }
        states.reverse();
        (reaction, states)
    }

    /// Solve for the head displacement under a target head load.
    pub fn solve_head_load(&self, head_load: f64, options: &EquilibriumOptions) -> CalcResult<EquilibriumResult> {
        if !head_load.is_finite() {
            return Err(CalcError::invalid_input("head_load", head_load.to_string(), "Head load must be finite"));
        }
        options.validate()?;

        let tolerance = options.tolerance_for(head_load);
        let uplift = head_load < 0.0;
        let residual = |w_head: f64| {
            let (q_base, w_base) = self.base_state(head_load, w_head);
            q_base - self.tip_reaction(w_base, uplift)
        };

        let w_max = options.max_head_displacement;
        let (w_lo, w_hi) = if uplift { (-w_max, 0.0) } else { (0.0, w_max) };

        let start = options.head_guess.clamp(w_lo, w_hi);
        let r_start = residual(start);
        if r_start.abs() <= tolerance {
            return Ok(self.snapshot(head_load, start, EquilibriumStatus::Converged));
        }

        // Scan for the first sign change
        let (mut best_w, mut best_r) = (start, r_start.abs());
        let (mut prev_w, mut prev_r) = (start, r_start);
        let mut bracket = None;
        let n = options.bracket_samples;
        for i in 1..=n {
            let w = w_lo + (w_hi - w_lo) * i as f64 / n as f64;
            let r = residual(w);
            if r.abs() <= tolerance {
                return Ok(self.snapshot(head_load, w, EquilibriumStatus::Converged));
            }
            if r.abs() < best_r {
                best_w = w;
                best_r = r.abs();
            }
            if prev_r * r < 0.0 {
                bracket = Some((prev_w, prev_r, w));
                break;
            }
            prev_w = w;
            prev_r = r;
        }

        let Some((mut lo, mut r_lo, mut hi)) = bracket else {
            warn!(
                "Q = {:.4} MN: no sign change in [{:.3}, {:.3}] m, best residual {:.3e} MN",
                head_load, w_lo, w_hi, best_r
            );
            let status = if best_r <= tolerance {
                EquilibriumStatus::Converged
            } else {
                EquilibriumStatus::BracketNotFound
            };
            return Ok(self.snapshot(head_load, best_w, status));
        };

        for _ in 0..options.bisection_iterations {
            let mid = 0.5 * (lo + hi);
            let r_mid = residual(mid);
            if r_mid.abs() <= tolerance {
                return Ok(self.snapshot(head_load, mid, EquilibriumStatus::Converged));
            }
            if r_lo * r_mid < 0.0 {
                hi = mid;
            } else {
                lo = mid;
                r_lo = r_mid;
            }
        }

        warn!(
            "Q = {:.4} MN: bisection stopped after {} iterations",
            head_load, options.bisection_iterations
        );
        Ok(self.snapshot(head_load, 0.5 * (lo + hi), EquilibriumStatus::BisectionLimit))
    }

    fn snapshot(&self, head_load: f64, head_displacement: f64, status: EquilibriumStatus) -> EquilibriumResult {
        let slices = self.propagate_from_head(head_load, head_displacement);
        let (base_force, base_displacement) = slices
            .last()
            .map(|s| (s.force_bottom, s.displacement_bottom))
            .unwrap_or((head_load, head_displacement));
        let tip_reaction = self.tip_reaction(base_displacement, head_load < 0.0);

        EquilibriumResult {
            head_load,
            head_displacement,
            base_force,
            base_displacement,
            tip_reaction,
            residual: base_force - tip_reaction,
            status,
            slices_converged: slices.iter().all(|s| s.converged),
            slices,
        }
    }

    /// Equilibrium for an imposed tip displacement.
    pub fn equilibrium_at_tip_displacement(&self, tip_displacement: f64) -> EquilibriumResult {
        let (reaction, slices) = self.propagate_from_tip(tip_displacement);
        let (head_load, head_displacement) = slices
            .first()
            .map(|s| (s.force_top, s.displacement_top))
            .unwrap_or((reaction, tip_displacement));

        EquilibriumResult {
            head_load,
            head_displacement,
            base_force: reaction,
            base_displacement: tip_displacement,
            tip_reaction: reaction,
            residual: 0.0,
            status: EquilibriumStatus::Converged,
            slices_converged: slices.iter().all(|s| s.converged),
            slices,
        }
    }

    /// Head force produced by an imposed tip displacement (MN)
    pub fn head_force_for_tip(&self, tip_displacement: f64) -> f64 {
        let reaction = self.tip_area * self.tip_law.evaluate(tip_displacement);
        self.slices
            .iter()
            .rev()
            .fold((reaction, tip_displacement), |(q, w), slice| {
                let state = slice.propagate_with(&self.slice_solver, PropagationDirection::BottomToTop, q, w, None);
                (state.force_top, state.displacement_top)
            })
            .0
    }

    /// Find the tip displacement that reproduces a target head load.
    ///
    /// The tolerance follows the target magnitude. A failed search returns
    /// the state at zero tip displacement, flagged `NonConvergence`.
    pub fn solve_head_load_from_tip(&self, head_load: f64) -> CalcResult<EquilibriumResult> {
        if !head_load.is_finite() {
            return Err(CalcError::invalid_input("head_load", head_load.to_string(), "Head load must be finite"));
        }

        let solution = ScalarRootFinder::default().solve(|w| self.head_force_for_tip(w), head_load, 0.0);
        let mut result = self.equilibrium_at_tip_displacement(solution.root);
        result.residual = result.head_load - head_load;
        if !solution.converged() {
            warn!(
                "Q = {:.4} MN: tip displacement search failed ({:?})",
                head_load, solution.status
            );
            result.status = EquilibriumStatus::NonConvergence;
        }
        Ok(result)
    }
}
