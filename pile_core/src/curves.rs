//! # Sampled Curves
//!
//! Piecewise-linear curves y(x) sampled on a monotone abscissa. Used for
//! limit-pressure profiles along the pile and for pressuremeter logs.
//!
//! Abscissae may be given in ascending or descending order (levels are
//! usually listed top-down) and may repeat, which encodes a step between two
//! layers. Integrals are taken over the interval spanned by the two bounds,
//! whichever order they are passed in, so the result is always oriented
//! positively.
//!
//! ```rust
//! use pile_core::curves::Curve;
//!
//! let profile = Curve::new(&[0.0, -1.0, -1.0, -8.0], &[0.0, 0.0, 1.2, 1.2]).unwrap();
//! assert!((profile.integral(0.0, -8.0) - 8.4).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// A piecewise-linear curve, stored with ascending abscissae.
///
/// Deserialization goes through [`Curve::new`], so a stored curve is
/// rejected on load if it is empty, non-finite or non-monotone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CurvePoints")]
pub struct Curve {
    points: Vec<(f64, f64)>,
}

/// Serialized form of a [`Curve`], checked before use.
#[derive(Deserialize)]
struct CurvePoints {
    points: Vec<(f64, f64)>,
}

impl TryFrom<CurvePoints> for Curve {
    type Error = CalcError;

    fn try_from(raw: CurvePoints) -> CalcResult<Self> {
        let (xs, ys): (Vec<f64>, Vec<f64>) = raw.points.into_iter().unzip();
        Curve::new(&xs, &ys)
    }
}

impl Curve {
    /// Build a curve from matching abscissa / ordinate slices.
    ///
    /// The abscissae must be monotone (non-strictly) in either direction.
    pub fn new(xs: &[f64], ys: &[f64]) -> CalcResult<Self> {
        if xs.is_empty() {
            return Err(CalcError::invalid_input("curve", "[]", "Curve needs at least one point"));
        }
        if xs.len() != ys.len() {
            return Err(CalcError::invalid_input(
                "curve",
                format!("{} abscissae / {} ordinates", xs.len(), ys.len()),
                "Abscissae and ordinates must have the same length",
            ));
        }
        if xs.iter().chain(ys).any(|v| !v.is_finite()) {
            return Err(CalcError::invalid_input("curve", "non-finite", "Curve values must be finite"));
        }

        let mut points: Vec<(f64, f64)> = xs.iter().copied().zip(ys.iter().copied()).collect();
        if !is_ascending(xs) {
            points.reverse();
            if !points.windows(2).all(|w| w[0].0 <= w[1].0) {
                return Err(CalcError::invalid_input(
                    "curve",
                    format!("{:?}", xs),
                    "Abscissae must be monotone",
                ));
            }
        }

        Ok(Curve { points })
    }

    /// Sample points in ascending abscissa order.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Smallest abscissa.
    pub fn x_min(&self) -> f64 {
        self.points[0].0
    }

    /// Largest abscissa.
    pub fn x_max(&self) -> f64 {
        self.points[self.points.len() - 1].0
    }

    /// Linear interpolation, clamped to the end values outside the range.
    pub fn value_at(&self, x: f64) -> f64 {
        let pts = &self.points;
        if x <= pts[0].0 {
            return pts[0].1;
        }
        let last = pts[pts.len() - 1];
        if x >= last.0 {
            return last.1;
        }
        for w in pts.windows(2) {
            let ((x0, y0), (x1, y1)) = (w[0], w[1]);
            if x >= x0 && x <= x1 {
                if x1 == x0 {
                    return y1;
                }
                return y0 + (y1 - y0) * (x - x0) / (x1 - x0);
            }
        }
        last.1
    }

    /// Trapezoidal integral between two abscissae (order-agnostic).
    pub fn integral(&self, a: f64, b: f64) -> f64 {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };

        let mut xs = vec![lo];
        let mut ys = vec![self.value_at(lo)];
        for &(x, y) in &self.points {
            if x >= lo && x <= hi {
                xs.push(x);
                ys.push(y);
            }
        }
        xs.push(hi);
        ys.push(self.value_at(hi));

        xs.windows(2)
            .zip(ys.windows(2))
            .map(|(x, y)| 0.5 * (y[0] + y[1]) * (x[1] - x[0]))
            .sum()
    }

    /// Mean value between two abscissae: integral divided by the interval length.
    ///
    /// A zero-length interval returns the point value.
    pub fn mean(&self, a: f64, b: f64) -> f64 {
        let width = (b - a).abs();
        if width == 0.0 {
            return self.value_at(a);
        }
        self.integral(a, b) / width
    }
}

/// Whether a sequence is non-decreasing.
pub fn is_ascending(xs: &[f64]) -> bool {
    xs.windows(2).all(|w| w[0] <= w[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn rising() -> Curve {
        Curve::new(&[0.0, 2.0, 4.0, 6.0, 8.0, 10.0], &[3.0, 2.0, 5.0, 4.0, 6.0, 2.0]).unwrap()
    }

    fn stepped_levels() -> Curve {
        Curve::new(
            &[0.0, -1.0, -1.0, -8.0, -8.0, -12.0, -12.0, -20.0],
            &[0.0, 0.0, 1.2, 1.2, 0.8, 0.8, 1.8, 1.8],
        )
        .unwrap()
    }

    #[test]
    fn test_integral_rising_curve() {
        let c = rising();
        assert_abs_diff_eq!(c.integral(3.0, 8.0), 23.25, epsilon = 1e-9);
        assert_abs_diff_eq!(c.integral(0.0, 10.0), 39.0, epsilon = 1e-9);
        assert_abs_diff_eq!(c.integral(4.0, 4.1), 0.4975, epsilon = 1e-9);
    }

    #[test]
    fn test_mean_rising_curve() {
        let c = rising();
        assert_abs_diff_eq!(c.mean(3.0, 8.0), 4.65, epsilon = 1e-9);
        assert_abs_diff_eq!(c.mean(0.0, 10.0), 3.9, epsilon = 1e-9);
        assert_abs_diff_eq!(c.mean(4.0, 4.1), 4.975, epsilon = 1e-9);
    }

    #[test]
    fn test_descending_levels_with_steps() {
        let c = stepped_levels();
        assert_abs_diff_eq!(c.integral(0.0, -20.0), 26.0, epsilon = 1e-9);
        assert_abs_diff_eq!(c.integral(-20.0, 0.0), 26.0, epsilon = 1e-9);
        assert_abs_diff_eq!(c.mean(0.0, -20.0), 1.3, epsilon = 1e-9);
    }

    #[test]
    fn test_interpolation_clamps() {
        let c = rising();
        assert_eq!(c.value_at(-5.0), 3.0);
        assert_eq!(c.value_at(50.0), 2.0);
        assert_abs_diff_eq!(c.value_at(1.0), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_non_monotone() {
        assert!(Curve::new(&[0.0, 2.0, 1.0], &[1.0, 1.0, 1.0]).is_err());
        assert!(Curve::new(&[0.0, 1.0], &[1.0]).is_err());
        assert!(Curve::new(&[], &[]).is_err());
    }

    #[test]
    fn test_deserialize_validates_points() {
        let c: Curve = serde_json::from_str(r#"{"points":[[0.0,1.0],[-2.0,3.0]]}"#).unwrap();
        assert_eq!(c.x_min(), -2.0);
        assert_eq!(c.value_at(-1.0), 2.0);

        assert!(serde_json::from_str::<Curve>(r#"{"points":[]}"#).is_err());
        assert!(serde_json::from_str::<Curve>(r#"{"points":[[0.0,1.0],[2.0,1.0],[1.0,1.0]]}"#).is_err());
    }

    #[test]
    fn test_serialized_curve_reloads() {
        let c = stepped_levels();
        let json = serde_json::to_string(&c).unwrap();
        let back: Curve = serde_json::from_str(&json).unwrap();
        assert_eq!(back.points().len(), c.points().len());
        assert_abs_diff_eq!(back.integral(0.0, -20.0), 26.0, epsilon = 1e-9);
    }
}
