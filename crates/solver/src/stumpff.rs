//! Stumpff functions C(z) and S(z).
//!
//! ```text
//! C(z) = (1 - cos √z) / z              z > 0
//!      = (cosh √-z - 1) / -z           z < 0
//! S(z) = (√z - sin √z) / z^(3/2)       z > 0
//!      = (sinh √-z - √-z) / (-z)^(3/2) z < 0
//! ```
//!
//! Both closed forms cancel to 0/0 at the origin, so a truncated Taylor series is used
//! for `|z| < SERIES_THRESHOLD`. The series alternates in sign; it is the expansion of
//! the closed forms and agrees with them across the threshold to well below 1e-8.

/// Half-width of the interval around zero evaluated by series.
pub const SERIES_THRESHOLD: f64 = 1e-6;

/// C(z) and S(z) evaluated at the same point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stumpff {
    pub c: f64,
    pub s: f64,
}

/// Evaluate both Stumpff functions at `z`.
#[inline]
pub fn evaluate(z: f64) -> Stumpff {
    Stumpff {
        c: stumpff_c(z),
        s: stumpff_s(z),
    }
}

/// C(z). Positive for every finite z below the first elliptic pole at 4π².
pub fn stumpff_c(z: f64) -> f64 {
    if z.abs() < SERIES_THRESHOLD {
        1.0 / 2.0 - z / 24.0 + z * z / 720.0 - z * z * z / 40_320.0
    } else if z > 0.0 {
        // 1 - cos x == 2 sin²(x/2), without the cancellation near x = 2π
        let half = 0.5 * z.sqrt();
        2.0 * half.sin() * half.sin() / z
    } else {
        ((-z).sqrt().cosh() - 1.0) / (-z)
    }
}

/// S(z).
pub fn stumpff_s(z: f64) -> f64 {
    if z.abs() < SERIES_THRESHOLD {
        1.0 / 6.0 - z / 120.0 + z * z / 5_040.0 - z * z * z / 362_880.0
    } else if z > 0.0 {
        let sqrt_z = z.sqrt();
        (sqrt_z - sqrt_z.sin()) / (z * sqrt_z)
    } else {
        let sqrt_neg_z = (-z).sqrt();
        (sqrt_neg_z.sinh() - sqrt_neg_z) / (-z * sqrt_neg_z)
    }
}
