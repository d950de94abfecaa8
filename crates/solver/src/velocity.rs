//! Velocity reconstruction from the converged universal variable.
//!
//! With the Lagrange coefficients
//! - f = 1 − y/r1
//! - g = A √(y/μ)
//! - ġ = 1 − y/r2
//!
//! the terminal velocities are v1 = (r2 − f r1)/g and v2 = (ġ r2 − r1)/g.

use uvlambert_core::vector::{self, Vector3};

use crate::geometry::TransferGeometry;

/// Lagrange coefficients at the converged root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LagrangeCoefficients {
    pub f: f64,
    pub g: f64,
    pub g_dot: f64,
}

impl LagrangeCoefficients {
    pub fn from_root(geom: &TransferGeometry, y: f64, mu: f64) -> Self {
        Self {
            f: 1.0 - y / geom.r1_norm,
            g: geom.a * (y / mu).sqrt(),
            g_dot: 1.0 - y / geom.r2_norm,
        }
    }

    /// `g` must be finite and non-zero for the velocities to exist.
    #[inline]
    pub fn is_singular(&self) -> bool {
        self.g == 0.0 || !self.g.is_finite()
    }
}

/// Terminal velocities, or `None` when `g` is singular.
pub fn compute_velocities(
    geom: &TransferGeometry,
    coeffs: &LagrangeCoefficients,
) -> Option<(Vector3, Vector3)> {
    if coeffs.is_singular() {
        return None;
    }
    let inv_g = 1.0 / coeffs.g;
    let v1 = vector::scale(&vector::sub(&geom.r2, &vector::scale(&geom.r1, coeffs.f)), inv_g);
    let v2 = vector::scale(&vector::sub(&vector::scale(&geom.r2, coeffs.g_dot), &geom.r1), inv_g);
    Some((v1, v2))
}
