//! Fixed-step fourth-order Runge-Kutta propagation of the two-body problem.

use uvlambert_core::vector::{self, Vector3};

/// Position (km) and velocity (km/s).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    pub r: Vector3,
    pub v: Vector3,
}

impl StateVector {
    pub fn new(r: Vector3, v: Vector3) -> Self {
        Self { r, v }
    }
}

fn acceleration(r: &Vector3, mu: f64) -> Vector3 {
    let n = vector::norm(r);
    vector::scale(r, -mu / (n * n * n))
}

fn derivative(state: &StateVector, mu: f64) -> StateVector {
    StateVector::new(state.v, acceleration(&state.r, mu))
}

fn advance(state: &StateVector, k: &StateVector, h: f64) -> StateVector {
    StateVector::new(
        vector::add(&state.r, &vector::scale(&k.r, h)),
        vector::add(&state.v, &vector::scale(&k.v, h)),
    )
}

/// Propagate `initial` over `dt_s` seconds in `steps` equal RK4 steps. `steps == 0`
/// returns the initial state.
pub fn rk4(initial: StateVector, dt_s: f64, mu_km3_s2: f64, steps: usize) -> StateVector {
    if steps == 0 {
        return initial;
    }
    let h = dt_s / steps as f64;
    let mut state = initial;
    for _ in 0..steps {
        let k1 = derivative(&state, mu_km3_s2);
        let k2 = derivative(&advance(&state, &k1, 0.5 * h), mu_km3_s2);
        let k3 = derivative(&advance(&state, &k2, 0.5 * h), mu_km3_s2);
        let k4 = derivative(&advance(&state, &k3, h), mu_km3_s2);

        let weighted = |a: &Vector3, b: &Vector3, c: &Vector3, d: &Vector3| {
            let mid = vector::scale(&vector::add(b, c), 2.0);
            vector::scale(&vector::add(&vector::add(a, &mid), d), h / 6.0)
        };
        state = StateVector::new(
            vector::add(&state.r, &weighted(&k1.r, &k2.r, &k3.r, &k4.r)),
            vector::add(&state.v, &weighted(&k1.v, &k2.v, &k3.v, &k4.v)),
        );
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circular_period;

    const MU: f64 = 398_600.441_8;

    #[test]
    fn circular_orbit_returns_after_one_period() {
        let r = 7000.0;
        let v = (MU / r).sqrt();
        let start = StateVector::new([r, 0.0, 0.0], [0.0, v, 0.0]);
        let end = rk4(start, circular_period(r, MU), MU, 2000);
        let miss = vector::distance(&start.r, &end.r);
        assert!(miss < 1e-3, "missed start by {miss} km");
        assert!(vector::distance(&start.v, &end.v) < 1e-6);
    }

    #[test]
    fn quarter_period_reaches_y_axis() {
        let r = 7000.0;
        let v = (MU / r).sqrt();
        let start = StateVector::new([r, 0.0, 0.0], [0.0, v, 0.0]);
        let end = rk4(start, 0.25 * circular_period(r, MU), MU, 500);
        assert!(end.r[0].abs() < 1e-2, "x = {}", end.r[0]);
        assert!((end.r[1] - r).abs() < 1e-2, "y = {}", end.r[1]);
    }

    #[test]
    fn zero_steps_is_identity() {
        let start = StateVector::new([7000.0, 0.0, 0.0], [0.0, 7.5, 0.0]);
        assert_eq!(rk4(start, 100.0, MU, 0), start);
    }
}
