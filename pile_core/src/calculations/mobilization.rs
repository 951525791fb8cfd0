//! # Mobilization Laws
//!
//! Displacement-dependent laws for unit skin friction (t-z) and unit end
//! bearing (q-z), after Frank & Zhao (1982) as recommended by NF P94-262.
//!
//! ## Tri-linear law
//!
//! ```text
//!  q
//!  q2 ┤              ┌───────────
//!     │           ╱ k2
//!  q1 ┤      ┌──╱
//!     │   ╱ k1
//!   0 ┼─╱──────┬─────┬──────────── s
//!            s1    s2
//! s1 = q1 / k1          s2 = s1 + (q2 − q1) / k2
//! ```
//!
//! Skin friction uses `(qs/2, ks, qs, ks/5)` and is odd-symmetric. End
//! bearing uses `(qp/2, kp, qp, kp/5)` and is zero for non-positive
//! displacement (the tip cannot pull on the soil).
//!
//! The free functions validate their arguments on every call. Slices and
//! the tip hold pre-validated law values instead, whose evaluation is
//! infallible.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Tri-linear law. When `q2`/`k2` are omitted the law is bilinear
/// (q2 defaults to q1, k2 to 1).
///
/// Fails with `InvalidStiffness` when `k1` or `k2` is zero.
pub fn tri_linear(s: f64, q1: f64, k1: f64, q2: Option<f64>, k2: Option<f64>) -> CalcResult<f64> {
    Ok(TriLinearLaw::new(q1, k1, q2, k2)?.evaluate(s))
}

/// Unit skin friction for a relative displacement `s` (odd-symmetric).
pub fn skin_friction(s: f64, qs: f64, ks: f64) -> CalcResult<f64> {
    Ok(SkinFrictionLaw::new(qs, ks)?.evaluate(s))
}

/// Unit end bearing for a relative displacement `s` (zero for `s <= 0`).
pub fn end_bearing(s: f64, qp: f64, kp: f64) -> CalcResult<f64> {
    Ok(EndBearingLaw::new(qp, kp)?.evaluate(s))
}

/// Validated tri-linear law parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriLinearLaw {
    /// First plateau value
    pub q1: f64,
    /// Initial slope
    pub k1: f64,
    /// Final plateau value
    pub q2: f64,
    /// Second slope
    pub k2: f64,
}

impl TriLinearLaw {
    pub fn new(q1: f64, k1: f64, q2: Option<f64>, k2: Option<f64>) -> CalcResult<Self> {
        let q2 = q2.unwrap_or(q1);
        let k2 = k2.unwrap_or(1.0);
        if k1 == 0.0 {
            return Err(CalcError::invalid_stiffness("tri_linear", "k1", k1));
        }
        if k2 == 0.0 {
            return Err(CalcError::invalid_stiffness("tri_linear", "k2", k2));
        }
        Ok(TriLinearLaw { q1, k1, q2, k2 })
    }

    /// Elastic-plateau law reaching `q1` with slope `k1`.
    pub fn bilinear(q1: f64, k1: f64) -> CalcResult<Self> {
        TriLinearLaw::new(q1, k1, None, None)
    }

    /// Displacement at the end of the first branch
    pub fn s1(&self) -> f64 {
        self.q1 / self.k1
    }

    /// Displacement at which the final plateau is reached
    pub fn s2(&self) -> f64 {
        self.s1() + (self.q2 - self.q1) / self.k2
    }

    pub fn evaluate(&self, s: f64) -> f64 {
        let s1 = self.s1();
        let s2 = self.s2();
        if s <= 0.0 {
            0.0
        } else if s <= s1 {
            s * self.k1
        } else if s <= s2 {
            self.q1 + (s - s1) * self.k2
        } else {
            self.q2
        }
    }
}

/// Frank & Zhao skin-friction law.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkinFrictionLaw {
    /// Limit unit skin friction q_s (MPa)
    pub limit: f64,
    /// Initial shear stiffness k_t (MPa/m)
    pub stiffness: f64,
    law: TriLinearLaw,
}

impl SkinFrictionLaw {
    pub fn new(qs: f64, ks: f64) -> CalcResult<Self> {
        let law = TriLinearLaw::new(qs / 2.0, ks, Some(qs), Some(ks / 5.0)).map_err(|_| {
            CalcError::invalid_stiffness("skin_friction", "ks", ks)
        })?;
        Ok(SkinFrictionLaw {
            limit: qs,
            stiffness: ks,
            law,
        })
    }

    pub fn evaluate(&self, s: f64) -> f64 {
        if s == 0.0 {
            return 0.0;
        }
        s.signum() * self.law.evaluate(s.abs())
    }
}

/// Frank & Zhao end-bearing law.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EndBearingLaw {
    /// Limit unit end bearing q_b (MPa)
    pub limit: f64,
    /// Initial stiffness k_q (MPa/m)
    pub stiffness: f64,
    law: TriLinearLaw,
}

impl EndBearingLaw {
    pub fn new(qp: f64, kp: f64) -> CalcResult<Self> {
        let law = TriLinearLaw::new(qp / 2.0, kp, Some(qp), Some(kp / 5.0)).map_err(|_| {
            CalcError::invalid_stiffness("end_bearing", "kp", kp)
        })?;
        Ok(EndBearingLaw {
            limit: qp,
            stiffness: kp,
            law,
        })
    }

    pub fn evaluate(&self, s: f64) -> f64 {
        self.law.evaluate(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_tri_linear_breakpoints() {
        let law = TriLinearLaw::new(0.1, 4.0, Some(0.2), Some(0.8)).unwrap();
        assert_eq!(law.evaluate(0.0), 0.0);
        assert_abs_diff_eq!(law.evaluate(law.s1()), 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(law.evaluate(law.s2()), 0.2, epsilon = 1e-12);
        assert_eq!(law.evaluate(10.0), 0.2);
    }

    #[test]
    fn test_tri_linear_monotone_then_constant() {
        let law = TriLinearLaw::new(0.1, 4.0, Some(0.2), Some(0.8)).unwrap();
        let s2 = law.s2();
        let mut previous = law.evaluate(0.0);
        for i in 1..=200 {
            let s = s2 * i as f64 / 200.0;
            let value = law.evaluate(s);
            assert!(value >= previous, "law decreases at s = {}", s);
            previous = value;
        }
        for i in 1..=20 {
            assert_eq!(law.evaluate(s2 + i as f64 * 0.05), 0.2);
        }
    }

    #[test]
    fn test_bilinear_default() {
        let law = TriLinearLaw::bilinear(0.3, 10.0).unwrap();
        assert_eq!(law.q2, 0.3);
        assert_eq!(law.k2, 1.0);
        assert_abs_diff_eq!(law.evaluate(0.01), 0.1, epsilon = 1e-12);
        assert_eq!(law.evaluate(1.0), 0.3);
        assert_abs_diff_eq!(tri_linear(0.02, 0.3, 10.0, None, None).unwrap(), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_stiffness_rejected() {
        assert!(matches!(
            tri_linear(0.1, 1.0, 0.0, None, None),
            Err(CalcError::InvalidStiffness { .. })
        ));
        assert!(matches!(
            tri_linear(0.1, 1.0, 2.0, Some(2.0), Some(0.0)),
            Err(CalcError::InvalidStiffness { .. })
        ));
        assert!(skin_friction(0.01, 0.2, 0.0).is_err());
        assert!(end_bearing(0.01, 0.2, 0.0).is_err());
    }

    #[test]
    fn test_skin_friction_values() {
        assert_abs_diff_eq!(skin_friction(0.0125, 0.2, 4.0).unwrap(), 0.050, epsilon = 1e-12);
        assert_abs_diff_eq!(skin_friction(0.0875, 0.2, 4.0).unwrap(), 0.150, epsilon = 1e-12);
        assert_abs_diff_eq!(skin_friction(0.200, 0.2, 4.0).unwrap(), 0.200, epsilon = 1e-12);
        // Odd symmetry carries the first branch into negative displacements
        assert_abs_diff_eq!(skin_friction(-0.010, 0.2, 4.0).unwrap(), -0.040, epsilon = 1e-12);
    }

    #[test]
    fn test_skin_friction_kpa_values() {
        assert_abs_diff_eq!(skin_friction(0.01, 200.0, 5000.0).unwrap(), 50.0, epsilon = 1e-9);
        assert_abs_diff_eq!(skin_friction(0.07, 200.0, 5000.0).unwrap(), 150.0, epsilon = 1e-9);
        assert_abs_diff_eq!(skin_friction(0.15, 200.0, 5000.0).unwrap(), 200.0, epsilon = 1e-9);
    }

    #[test]
    fn test_skin_friction_is_odd() {
        let law = SkinFrictionLaw::new(0.08, 120.0).unwrap();
        for i in 0..50 {
            let s = i as f64 * 0.0007;
            assert_eq!(law.evaluate(-s), -law.evaluate(s));
        }
    }

    #[test]
    fn test_end_bearing_values() {
        assert_eq!(end_bearing(-0.010, 0.2, 4.0).unwrap(), 0.0);
        assert_eq!(end_bearing(0.0, 0.2, 4.0).unwrap(), 0.0);
        assert_abs_diff_eq!(end_bearing(0.0125, 0.2, 4.0).unwrap(), 0.050, epsilon = 1e-12);
        assert_abs_diff_eq!(end_bearing(0.0875, 0.2, 4.0).unwrap(), 0.150, epsilon = 1e-12);
        assert_abs_diff_eq!(end_bearing(0.200, 0.2, 4.0).unwrap(), 0.200, epsilon = 1e-12);
    }

    #[test]
    fn test_end_bearing_never_pulls() {
        let law = EndBearingLaw::new(1.65, 275.0).unwrap();
        for i in 1..100 {
            assert_eq!(law.evaluate(-(i as f64) * 0.001), 0.0);
        }
    }
}
