//! Independent checks on a solved transfer: conserved quantities at both ends and an
//! RK4 re-propagation of the departure state.

use crate::orbits::{self, StateVector};
use crate::solver::{TransferRequest, TransferSolution};
use crate::vector;

/// Step count used when the caller has no preference.
pub const DEFAULT_PROPAGATION_STEPS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationReport {
    pub departure_energy: f64,
    pub arrival_energy: f64,
    pub energy_difference: f64,
    pub departure_angular_momentum: f64,
    pub arrival_angular_momentum: f64,
    /// Distance between the propagated end point and `r2` (km).
    pub position_error_km: f64,
    /// Distance between the propagated end velocity and `v2` (km/s).
    pub velocity_error_km_s: f64,
    pub relative_position_error: f64,
    pub relative_velocity_error: f64,
    pub minimum_transfer_time_s: f64,
    pub propagation_steps: usize,
}

impl ValidationReport {
    /// True when the request asks for less time than the chord estimate.
    pub fn faster_than_minimum(&self, time_of_flight_s: f64) -> bool {
        time_of_flight_s < self.minimum_transfer_time_s
    }
}

pub fn validate(
    request: &TransferRequest,
    solution: &TransferSolution,
    mu_km3_s2: f64,
    steps: usize,
) -> ValidationReport {
    let departure_energy = orbits::specific_energy(&request.r1, &solution.v1, mu_km3_s2);
    let arrival_energy = orbits::specific_energy(&request.r2, &solution.v2, mu_km3_s2);
    let h1 = orbits::angular_momentum(&request.r1, &solution.v1);
    let h2 = orbits::angular_momentum(&request.r2, &solution.v2);

    let end = orbits::rk4(
        StateVector::new(request.r1, solution.v1),
        request.time_of_flight,
        mu_km3_s2,
        steps,
    );
    let position_error_km = vector::distance(&end.r, &request.r2);
    let velocity_error_km_s = vector::distance(&end.v, &solution.v2);

    let report = ValidationReport {
        departure_energy,
        arrival_energy,
        energy_difference: (departure_energy - arrival_energy).abs(),
        departure_angular_momentum: vector::norm(&h1),
        arrival_angular_momentum: vector::norm(&h2),
        position_error_km,
        velocity_error_km_s,
        relative_position_error: position_error_km / vector::norm(&request.r2),
        relative_velocity_error: velocity_error_km_s / vector::norm(&solution.v2),
        minimum_transfer_time_s: orbits::minimum_transfer_time(&request.r1, &request.r2, mu_km3_s2),
        propagation_steps: steps,
    };
    tracing::debug!(
        position_error_km = report.position_error_km,
        velocity_error_km_s = report.velocity_error_km_s,
        energy_difference = report.energy_difference,
        steps,
        "propagated lambert solution"
    );
    report
}
