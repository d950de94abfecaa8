//! Two-body orbit helpers used to sanity-check Lambert solutions.
use std::f64::consts::PI;

use uvlambert_core::vector::{self, Vector3};

pub mod propagate;

pub use propagate::{StateVector, rk4};

/// Specific orbital energy `v²/2 − μ/r` (km²/s²).
pub fn specific_energy(r_km: &Vector3, v_km_s: &Vector3, mu_km3_s2: f64) -> f64 {
    let v = vector::norm(v_km_s);
    0.5 * v * v - mu_km3_s2 / vector::norm(r_km)
}

/// Specific angular momentum `r × v` (km²/s).
pub fn angular_momentum(r_km: &Vector3, v_km_s: &Vector3) -> Vector3 {
    vector::cross(r_km, v_km_s)
}

/// Period of a circular orbit of the given radius (s).
pub fn circular_period(radius_km: f64, mu_km3_s2: f64) -> f64 {
    2.0 * PI * (radius_km.powi(3) / mu_km3_s2).sqrt()
}

/// Half the period of the ellipse tangent to both circular orbits (s).
pub fn hohmann_transfer_time(r1_km: f64, r2_km: f64, mu_km3_s2: f64) -> f64 {
    let a_t = 0.5 * (r1_km + r2_km);
    PI * (a_t.powi(3) / mu_km3_s2).sqrt()
}

/// Rough lower bound on the time of flight between two points: `π √(c³ / 8μ)` with `c`
/// the chord length.
pub fn minimum_transfer_time(r1_km: &Vector3, r2_km: &Vector3, mu_km3_s2: f64) -> f64 {
    let chord = vector::distance(r1_km, r2_km);
    PI * (chord.powi(3) / (8.0 * mu_km3_s2)).sqrt()
}
