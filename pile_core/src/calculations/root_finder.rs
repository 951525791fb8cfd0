//! # Scalar Root Finder
//!
//! Newton-Raphson iteration on a scalar function with a central-difference
//! derivative estimate:
//!
//! ```text
//! f'(x) ≈ (f(x + h) − f(x − h)) / 2h          h = 1e-5
//! x     ← x + (T − f(x)) / f'(x)
//! ```
//!
//! Iteration stops once `|f(x) − T| <= tol` or after `max_iterations`
//! evaluations. The default tolerance is derived from the magnitude of the
//! target (see [`reference_tolerance`]).
//!
//! A failed solve is not an error: the solution carries a status flag and
//! the root / residual are the zero sentinel, so callers can keep going and
//! report the point as non-converged.

use log::debug;
use serde::{Deserialize, Serialize};

/// Default iteration cap for local solves
pub const MAX_ITERATIONS: usize = 20;

/// Central-difference step for the derivative estimate
pub const DERIVATIVE_STEP: f64 = 1e-5;

/// Convergence tolerance scaled on reference values.
///
/// `min(|smallest non-zero value|, |largest non-zero value|) / 10 000`.
/// When every reference value is zero, the pair (0.1, 1.0) is used instead,
/// giving 1e-5.
pub fn reference_tolerance(values: &[f64]) -> f64 {
    let mut small: Option<f64> = None;
    let mut big: Option<f64> = None;
    for &v in values.iter().filter(|v| **v != 0.0) {
        small = Some(small.map_or(v, |s| s.min(v)));
        big = Some(big.map_or(v, |b| b.max(v)));
    }

    match (small, big) {
        (Some(small), Some(big)) => small.abs().min(big.abs()) / 10_000.0,
        _ => 0.1_f64.min(1.0) / 10_000.0,
    }
}

/// Outcome of a root search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RootStatus {
    /// Residual within tolerance
    Converged,
    /// Iteration cap reached
    IterationLimit,
    /// The estimated derivative was exactly zero
    ZeroDerivative,
}

/// Result of a scalar root search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RootSolution {
    pub status: RootStatus,
    /// Number of function evaluations at trial points
    pub iterations: usize,
    /// Root (0.0 when not converged)
    pub root: f64,
    /// f(root) − target (0.0 when not converged)
    pub residual: f64,
}

impl RootSolution {
    pub fn converged(&self) -> bool {
        self.status == RootStatus::Converged
    }

    fn failed(status: RootStatus, iterations: usize) -> Self {
        RootSolution {
            status,
            iterations,
            root: 0.0,
            residual: 0.0,
        }
    }
}

/// Newton-Raphson solver settings.
///
/// # Example
///
/// ```rust
/// use pile_core::calculations::root_finder::ScalarRootFinder;
///
/// let solution = ScalarRootFinder::default().solve(|x| x * x * x, 8.0, 1.0);
/// assert!(solution.converged());
/// assert!((solution.root - 2.0).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalarRootFinder {
    pub max_iterations: usize,
    pub derivative_step: f64,
    /// Absolute tolerance on `f(x) − target`; derived from the target when unset
    pub tolerance: Option<f64>,
}

impl Default for ScalarRootFinder {
    fn default() -> Self {
        ScalarRootFinder {
            max_iterations: MAX_ITERATIONS,
            derivative_step: DERIVATIVE_STEP,
            tolerance: None,
        }
    }
}

impl ScalarRootFinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    pub fn with_derivative_step(mut self, step: f64) -> Self {
        self.derivative_step = step;
        self
    }

    /// Solve `f(x) = target` starting from `guess`.
    pub fn solve<F>(&self, f: F, target: f64, guess: f64) -> RootSolution
    where
        F: Fn(f64) -> f64,
    {
        let tolerance = self.tolerance.unwrap_or_else(|| reference_tolerance(&[target]));
        let h = self.derivative_step;
        let mut x = guess;

        for iteration in 1..=self.max_iterations {
            let value = f(x);
            let residual = value - target;
            if residual.abs() <= tolerance {
                return RootSolution {
                    status: RootStatus::Converged,
                    iterations: iteration,
                    root: x,
                    residual,
                };
            }

            let derivative = (f(x + h) - f(x - h)) / (2.0 * h);
            if derivative == 0.0 {
                debug!("Newton-Raphson: zero derivative at x = {:e} (iteration {})", x, iteration);
                return RootSolution::failed(RootStatus::ZeroDerivative, iteration);
            }
            x += (target - value) / derivative;
        }

        debug!(
            "Newton-Raphson: no convergence after {} iterations (target {:e}, tol {:e})",
            self.max_iterations, target, tolerance
        );
        RootSolution::failed(RootStatus::IterationLimit, self.max_iterations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_reference_tolerance() {
        assert_abs_diff_eq!(reference_tolerance(&[0.0]), 1e-5, epsilon = 1e-18);
        assert_abs_diff_eq!(reference_tolerance(&[]), 1e-5, epsilon = 1e-18);
        assert_abs_diff_eq!(reference_tolerance(&[500.0]), 0.05, epsilon = 1e-15);
        assert_abs_diff_eq!(reference_tolerance(&[-3.0, 2.0, 0.0]), 2e-4, epsilon = 1e-15);
    }

    #[test]
    fn test_linear_root() {
        let solution = ScalarRootFinder::default().solve(|x| x - 2.0, 0.0, 3.0);
        assert!(solution.converged());
        assert_abs_diff_eq!(solution.root, 2.0, epsilon = 1e-5);
        assert!(solution.iterations <= 3);
    }

    #[test]
    fn test_nonzero_target() {
        let solution = ScalarRootFinder::default().solve(|x| x - 2.0, 3.0, 0.0);
        assert!(solution.converged());
        assert_abs_diff_eq!(solution.root, 5.0, epsilon = 1e-3);
    }

    #[test]
    fn test_cubic() {
        let solution = ScalarRootFinder::default().solve(|x| x * x * x, 8.0, 1.0);
        assert!(solution.converged());
        assert_abs_diff_eq!(solution.root, 2.0, epsilon = 1e-3);
        assert!(solution.residual.abs() <= 8.0 / 10_000.0);
    }

    #[test]
    fn test_zero_derivative_returns_sentinel() {
        let solution = ScalarRootFinder::default().solve(|_| 1.0, 0.0, 4.0);
        assert_eq!(solution.status, RootStatus::ZeroDerivative);
        assert_eq!(solution.root, 0.0);
        assert_eq!(solution.residual, 0.0);
    }

    #[test]
    fn test_iteration_limit_returns_sentinel() {
        let solution = ScalarRootFinder::default()
            .with_max_iterations(2)
            .solve(|x| x.exp() - 10.0, 0.0, 0.0);
        assert_eq!(solution.status, RootStatus::IterationLimit);
        assert_eq!(solution.iterations, 2);
        assert_eq!(solution.root, 0.0);
        assert!(!solution.converged());
    }

    #[test]
    fn test_explicit_tolerance() {
        let loose = ScalarRootFinder::default().with_tolerance(0.5).solve(|x| x - 2.0, 0.0, 2.4);
        assert!(loose.converged());
        assert_eq!(loose.iterations, 1);
        assert_eq!(loose.root, 2.4);
    }
}
