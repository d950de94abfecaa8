//! Conversion of solved transfers into export rows and documents.

use crate::export::csv;
use crate::export::json::{TransferReport, ValidationSummary};
use crate::orbits;
use crate::solver::{TransferRequest, TransferSolution};
use crate::validation::ValidationReport;

impl From<&ValidationReport> for ValidationSummary {
    fn from(report: &ValidationReport) -> Self {
        ValidationSummary {
            departure_energy_km2_s2: report.departure_energy,
            arrival_energy_km2_s2: report.arrival_energy,
            energy_difference_km2_s2: report.energy_difference,
            departure_angular_momentum_km2_s: report.departure_angular_momentum,
            arrival_angular_momentum_km2_s: report.arrival_angular_momentum,
            position_error_km: report.position_error_km,
            velocity_error_km_s: report.velocity_error_km_s,
            relative_position_error: report.relative_position_error,
            relative_velocity_error: report.relative_velocity_error,
            minimum_transfer_time_s: report.minimum_transfer_time_s,
            propagation_steps: report.propagation_steps,
        }
    }
}

pub fn transfer_report(
    scenario: Option<&str>,
    mu_km3_s2: f64,
    request: &TransferRequest,
    solution: &TransferSolution,
    validation: Option<&ValidationReport>,
) -> TransferReport {
    TransferReport {
        scenario: scenario.map(str::to_string),
        mu_km3_s2,
        direction: request.direction.label().to_string(),
        time_of_flight_s: request.time_of_flight,
        r1_km: request.r1,
        r2_km: request.r2,
        v1_km_s: solution.v1,
        v2_km_s: solution.v2,
        transfer_angle_deg: solution.transfer_angle_rad.to_degrees(),
        z: solution.z,
        y_km: solution.y,
        iterations: solution.iterations,
        residual: solution.residual,
        validation: validation.map(ValidationSummary::from),
    }
}

/// CSV row for one transfer. Energies are recomputed when no validation was run.
pub fn csv_record<'a>(
    scenario: &'a str,
    mu_km3_s2: f64,
    request: &TransferRequest,
    solution: &TransferSolution,
    validation: Option<&ValidationReport>,
) -> csv::Record<'a> {
    let (departure_energy, arrival_energy) = match validation {
        Some(v) => (v.departure_energy, v.arrival_energy),
        None => (
            orbits::specific_energy(&request.r1, &solution.v1, mu_km3_s2),
            orbits::specific_energy(&request.r2, &solution.v2, mu_km3_s2),
        ),
    };
    csv::Record {
        scenario,
        direction: request.direction.label(),
        time_of_flight_s: request.time_of_flight,
        r1_km: request.r1,
        r2_km: request.r2,
        v1_km_s: solution.v1,
        v2_km_s: solution.v2,
        z: solution.z,
        iterations: solution.iterations,
        residual: solution.residual,
        departure_energy,
        arrival_energy,
        position_error_km: validation.map(|v| v.position_error_km),
    }
}
