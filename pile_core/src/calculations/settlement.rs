//! # Settlement Curve
//!
//! Load-settlement curve of the pile head, from uplift to compression.
//!
//! The head load is swept over `nb_pas + 1` evenly spaced values
//! `Q_i = Q_min + i·(Q_max − Q_min)/nb_pas` and the head-load driven
//! equilibrium is solved at each. Defaults follow the pile resistances:
//! `Q_min = −0.99·R_s` and `Q_max = 0.99·(R_b + R_s)`.
//!
//! Points whose equilibrium gives a non-finite displacement are skipped and
//! listed in [`SettlementCurve::skipped_loads`]. Non-converged points are kept
//! with `converged = false`.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::calculations::equilibrium::{EquilibriumOptions, PileEquilibriumEngine};
use crate::errors::{CalcError, CalcResult};

/// Default number of load steps
pub const DEFAULT_STEPS: usize = 20;

/// Fraction of the resistances used for the default sweep bounds
pub const RESISTANCE_FRACTION: f64 = 0.99;

/// Below this head displacement (m) no secant stiffness is reported
const MIN_SECANT_DISPLACEMENT: f64 = 1e-9;

fn default_steps() -> usize {
    DEFAULT_STEPS
}

/// Sweep bounds and resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SettlementOptions {
    /// Lowest head load (MN); −0.99·R_s when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_load: Option<f64>,
    /// Highest head load (MN); 0.99·(R_b + R_s) when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_load: Option<f64>,
    /// Number of load intervals
    #[serde(default = "default_steps")]
    pub steps: usize,
}

impl Default for SettlementOptions {
    fn default() -> Self {
        SettlementOptions {
            min_load: None,
            max_load: None,
            steps: DEFAULT_STEPS,
        }
    }
}

impl SettlementOptions {
    pub fn with_min_load(mut self, load: f64) -> Self {
        self.min_load = Some(load);
        self
    }

    pub fn with_max_load(mut self, load: f64) -> Self {
        self.max_load = Some(load);
        self
    }

    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }
}

/// One point of the load-settlement curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SettlementPoint {
    /// Head load (MN)
    pub head_load: f64,
    /// Head settlement (m)
    pub head_displacement: f64,
    pub converged: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SettlementCurve {
    /// Points in sweep order, from the lowest load to the highest
    pub points: Vec<SettlementPoint>,
    /// Loads whose equilibrium could not be used
    pub skipped_loads: Vec<f64>,
}

impl SettlementCurve {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn all_converged(&self) -> bool {
        self.points.iter().all(|p| p.converged)
    }

    fn branch(&self, keep: impl Fn(f64) -> bool) -> Vec<SettlementPoint> {
        let mut points: Vec<SettlementPoint> = self
            .points
            .iter()
            .filter(|p| keep(p.head_load) && p.head_load != 0.0)
            .copied()
            .collect();
        points.push(SettlementPoint {
            head_load: 0.0,
            head_displacement: 0.0,
            converged: true,
        });
        points.sort_by(|a, b| a.head_load.abs().total_cmp(&b.head_load.abs()));
        points
    }

    /// Points with Q ≥ 0, from the origin outward
    pub fn compression_branch(&self) -> Vec<SettlementPoint> {
        self.branch(|q| q >= 0.0)
    }

    /// Points with Q ≤ 0, from the origin outward
    pub fn uplift_branch(&self) -> Vec<SettlementPoint> {
        self.branch(|q| q <= 0.0)
    }

    /// (Q, Q/w) for every point with a non-negligible displacement (MN, MN/m)
    pub fn secant_stiffness(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .filter(|p| p.head_displacement.abs() > MIN_SECANT_DISPLACEMENT)
            .map(|p| (p.head_load, p.head_load / p.head_displacement))
            .collect()
    }
}

/// Builds a [`SettlementCurve`] by repeated equilibrium solves.
#[derive(Debug, Clone, Copy)]
pub struct SettlementCurveBuilder<'a> {
    engine: &'a PileEquilibriumEngine,
    equilibrium: EquilibriumOptions,
}

impl<'a> SettlementCurveBuilder<'a> {
    pub fn new(engine: &'a PileEquilibriumEngine) -> Self {
        SettlementCurveBuilder {
            engine,
            equilibrium: EquilibriumOptions::default(),
        }
    }

    pub fn with_equilibrium_options(mut self, options: EquilibriumOptions) -> Self {
        self.equilibrium = options;
        self
    }

    /// Sweep bounds after applying the resistance-based defaults
    pub fn load_range(&self, options: &SettlementOptions) -> (f64, f64) {
        let r = self.engine.resistances();
        let q_min = options
            .min_load
            .unwrap_or(-RESISTANCE_FRACTION * r.shaft_resistance);
        let q_max = options.max_load.unwrap_or(RESISTANCE_FRACTION * r.total());
        (q_min, q_max)
    }

    pub fn build(&self, options: &SettlementOptions) -> CalcResult<SettlementCurve> {
        if options.steps == 0 {
            return Err(CalcError::invalid_input("steps", "0", "At least one load step is required"));
        }
        let (q_min, q_max) = self.load_range(options);
        if !q_min.is_finite() || !q_max.is_finite() {
            return Err(CalcError::invalid_input(
                "load range",
                format!("[{}, {}]", q_min, q_max),
                "Load bounds must be finite",
            ));
        }
        if q_min > q_max {
            return Err(CalcError::invalid_range(q_min, q_max));
        }

        let n = options.steps;
        let mut curve = SettlementCurve::default();
        for i in 0..=n {
            let q = q_min + i as f64 * (q_max - q_min) / n as f64;
            let result = self.engine.solve_head_load(q, &self.equilibrium)?;
            if !result.head_displacement.is_finite() {
                warn!("Q = {:.4} MN: unusable equilibrium, step skipped", q);
                curve.skipped_loads.push(q);
                continue;
            }
            debug!(
                "Q = {:.4} MN -> w = {:.3} mm ({:?})",
                q,
                result.head_displacement * 1000.0,
                result.status
            );
            curve.points.push(SettlementPoint {
                head_load: q,
                head_displacement: result.head_displacement,
                converged: result.converged(),
            });
        }

        Ok(curve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::root_finder::ScalarRootFinder;
    use crate::pile::tests::homogeneous_pile;
    use approx::assert_abs_diff_eq;

    fn engine() -> PileEquilibriumEngine {
        PileEquilibriumEngine::new(&homogeneous_pile())
            .unwrap()
            .with_slice_solver(ScalarRootFinder::default().with_tolerance(1e-12))
    }

    #[test]
    fn test_default_range() {
        let e = engine();
        let (q_min, q_max) = SettlementCurveBuilder::new(&e).load_range(&SettlementOptions::default());
        assert_abs_diff_eq!(q_min, -0.99 * e.resistances().shaft_resistance, epsilon = 1e-12);
        assert_abs_diff_eq!(q_max, 0.99 * e.resistances().total(), epsilon = 1e-12);
    }

    #[test]
    fn test_sweep_is_monotone() {
        let e = engine();
        let curve = SettlementCurveBuilder::new(&e).build(&SettlementOptions::default()).unwrap();

        assert_eq!(curve.len(), 21);
        assert!(curve.skipped_loads.is_empty());
        for pair in curve.points.windows(2) {
            assert!(pair[1].head_load > pair[0].head_load);
            assert!(pair[1].head_displacement >= pair[0].head_displacement);
        }
        assert!(curve.points[0].head_displacement < 0.0);
        assert!(curve.points[20].head_displacement > 0.0);
    }

    #[test]
    fn test_explicit_bounds() {
        let e = engine();
        let options = SettlementOptions::default()
            .with_min_load(0.0)
            .with_max_load(1.0)
            .with_steps(4);
        let curve = SettlementCurveBuilder::new(&e).build(&options).unwrap();
        let loads: Vec<f64> = curve.points.iter().map(|p| p.head_load).collect();
        assert_eq!(loads, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(curve.points[0].head_displacement, 0.0);
        assert!(curve.all_converged());
    }

    #[test]
    fn test_invalid_range() {
        let e = engine();
        let options = SettlementOptions::default().with_min_load(1.0).with_max_load(-1.0);
        let err = SettlementCurveBuilder::new(&e).build(&options).unwrap_err();
        assert!(matches!(err, CalcError::InvalidRange { .. }));

        let options = SettlementOptions::default().with_steps(0);
        assert!(SettlementCurveBuilder::new(&e).build(&options).is_err());
    }

    #[test]
    fn test_single_load() {
        let e = engine();
        let options = SettlementOptions::default()
            .with_min_load(0.5)
            .with_max_load(0.5)
            .with_steps(2);
        let curve = SettlementCurveBuilder::new(&e).build(&options).unwrap();
        assert_eq!(curve.len(), 3);
        assert!(curve.points.iter().all(|p| p.head_load == 0.5));
    }

    #[test]
    fn test_branches_and_stiffness() {
        let curve = SettlementCurve {
            points: vec![
                SettlementPoint { head_load: -0.4, head_displacement: -0.002, converged: true },
                SettlementPoint { head_load: 0.5, head_displacement: 0.002, converged: true },
                SettlementPoint { head_load: 1.0, head_displacement: 0.005, converged: true },
            ],
            skipped_loads: vec![],
        };

        let compression = curve.compression_branch();
        assert_eq!(compression.len(), 3);
        assert_eq!(compression[0].head_load, 0.0);
        assert_eq!(compression[2].head_load, 1.0);

        let uplift = curve.uplift_branch();
        assert_eq!(uplift.len(), 2);
        assert_eq!(uplift[1].head_load, -0.4);

        let k = curve.secant_stiffness();
        assert_eq!(k.len(), 3);
        assert_abs_diff_eq!(k[0].1, 200.0, epsilon = 1e-9);
        assert_abs_diff_eq!(k[2].1, 200.0, epsilon = 1e-9);
    }
}
