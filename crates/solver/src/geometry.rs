//! Transfer-angle geometry.
//!
//! Computes the two radii, the transfer angle θ swept in the requested direction, and
//! the universal-variable parameter `A = sin θ · √(r1·r2 / (1 − cos θ))`.

use std::f64::consts::PI;

use uvlambert_core::vector::{self, Vector3};

use crate::error::{InputFault, LambertError};
use crate::lambert::TransferRequest;

/// Transfer direction relative to the reference normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Counter-clockwise about the reference normal.
    Prograde,
    /// Clockwise about the reference normal.
    Retrograde,
}

impl Direction {
    #[inline]
    pub fn is_prograde(self) -> bool {
        matches!(self, Direction::Prograde)
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Prograde => "prograde",
            Direction::Retrograde => "retrograde",
        }
    }
}

impl From<bool> for Direction {
    /// `true` selects prograde, matching the boolean flag used by callers.
    fn from(prograde: bool) -> Self {
        if prograde {
            Direction::Prograde
        } else {
            Direction::Retrograde
        }
    }
}

/// Reference normal used when the caller does not supply one: the +Z axis.
pub const DEFAULT_REFERENCE_NORMAL: Vector3 = [0.0, 0.0, 1.0];

/// Geometric quantities fixed for the whole iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferGeometry {
    pub r1: Vector3,
    pub r2: Vector3,
    pub r1_norm: f64,
    pub r2_norm: f64,
    pub cos_theta: f64,
    /// Signed by the direction rule, so `sin_theta < 0` denotes a transfer beyond π.
    pub sin_theta: f64,
    /// Transfer angle in `[0, 2π)`.
    pub theta: f64,
    pub a: f64,
}

impl TransferGeometry {
    /// Derive the transfer geometry for `request`.
    ///
    /// The sweep direction is decided by the sign of `(r1 × r2) · reference_normal`:
    /// a prograde transfer whose angular momentum points against the normal, or a
    /// retrograde one whose angular momentum does not, goes the long way round.
    pub fn new(request: &TransferRequest, reference_normal: &Vector3) -> Result<Self, LambertError> {
        let r1 = request.r1;
        let r2 = request.r2;
        if !vector::is_finite(&r1) || !vector::is_finite(&r2) {
            return Err(InputFault::NonFiniteComponent.into());
        }

        let r1_norm = vector::norm(&r1);
        let r2_norm = vector::norm(&r2);
        if r1_norm == 0.0 {
            return Err(InputFault::ZeroInitialPosition.into());
        }
        if r2_norm == 0.0 {
            return Err(InputFault::ZeroFinalPosition.into());
        }

        let radii = r1_norm * r2_norm;
        let cos_theta = (vector::dot(&r1, &r2) / radii).clamp(-1.0, 1.0);
        let momentum = vector::cross(&r1, &r2);
        let mut sin_theta = vector::norm(&momentum) / radii;

        let alignment = vector::dot(&momentum, reference_normal);
        let long_way = match request.direction {
            Direction::Prograde => alignment < 0.0,
            Direction::Retrograde => alignment >= 0.0,
        };
        if long_way {
            sin_theta = -sin_theta;
        }

        let mut theta = sin_theta.atan2(cos_theta);
        if theta < 0.0 {
            theta += 2.0 * PI;
        }

        // cos θ = 1 makes this 0 · ∞, which is NaN rather than zero
        let a = sin_theta * (radii / (1.0 - cos_theta)).sqrt();
        if a == 0.0 || !a.is_finite() {
            return Err(LambertError::DegenerateGeometry {
                a,
                theta_rad: theta,
                request: *request,
            });
        }

        Ok(Self {
            r1,
            r2,
            r1_norm,
            r2_norm,
            cos_theta,
            sin_theta,
            theta,
            a,
        })
    }

    /// True when the transfer sweeps more than half a revolution.
    #[inline]
    pub fn is_long_way(&self) -> bool {
        self.theta > PI
    }
}
