//! Export helpers for CSV and JSON artifacts.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

pub mod csv {
    use std::io::{self, Write};

    const HEADER: &str = "scenario,direction,tof_s,r1_x_km,r1_y_km,r1_z_km,r2_x_km,r2_y_km,r2_z_km,v1_x_km_s,v1_y_km_s,v1_z_km_s,v2_x_km_s,v2_y_km_s,v2_z_km_s,z,iterations,residual,energy_dep_km2_s2,energy_arr_km2_s2,position_error_km";

    /// Write the transfer CSV header.
    pub fn write_header(writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)
    }

    /// One solved transfer.
    #[derive(Debug, Clone)]
    pub struct Record<'a> {
        pub scenario: &'a str,
        pub direction: &'a str,
        pub time_of_flight_s: f64,
        pub r1_km: [f64; 3],
        pub r2_km: [f64; 3],
        pub v1_km_s: [f64; 3],
        pub v2_km_s: [f64; 3],
        pub z: f64,
        pub iterations: usize,
        pub residual: f64,
        pub departure_energy: f64,
        pub arrival_energy: f64,
        /// Empty column when the transfer was not propagated.
        pub position_error_km: Option<f64>,
    }

    impl Record<'_> {
        /// Serialize the record to CSV, matching the header ordering.
        pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
            let position_error = self
                .position_error_km
                .map(|e| format!("{e:.6}"))
                .unwrap_or_default();
            writeln!(
                writer,
                "{},{},{:.3},{:.3},{:.3},{:.3},{:.3},{:.3},{:.3},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.9},{},{:e},{:.6},{:.6},{}",
                self.scenario,
                self.direction,
                self.time_of_flight_s,
                self.r1_km[0],
                self.r1_km[1],
                self.r1_km[2],
                self.r2_km[0],
                self.r2_km[1],
                self.r2_km[2],
                self.v1_km_s[0],
                self.v1_km_s[1],
                self.v1_km_s[2],
                self.v2_km_s[0],
                self.v2_km_s[1],
                self.v2_km_s[2],
                self.z,
                self.iterations,
                self.residual,
                self.departure_energy,
                self.arrival_energy,
                position_error,
            )
        }
    }
}

pub mod json {
    use std::io::{self, Write};
    use std::path::Path;

    use serde::Serialize;
    use serde_json::to_writer_pretty;

    /// Consistency figures from re-propagating the departure state.
    #[derive(Debug, Clone, Serialize, PartialEq)]
    pub struct ValidationSummary {
        pub departure_energy_km2_s2: f64,
        pub arrival_energy_km2_s2: f64,
        pub energy_difference_km2_s2: f64,
        pub departure_angular_momentum_km2_s: f64,
        pub arrival_angular_momentum_km2_s: f64,
        pub position_error_km: f64,
        pub velocity_error_km_s: f64,
        pub relative_position_error: f64,
        pub relative_velocity_error: f64,
        pub minimum_transfer_time_s: f64,
        pub propagation_steps: usize,
    }

    /// JSON document describing one solved transfer.
    #[derive(Debug, Clone, Serialize, PartialEq)]
    pub struct TransferReport {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub scenario: Option<String>,
        pub mu_km3_s2: f64,
        pub direction: String,
        pub time_of_flight_s: f64,
        pub r1_km: [f64; 3],
        pub r2_km: [f64; 3],
        pub v1_km_s: [f64; 3],
        pub v2_km_s: [f64; 3],
        pub transfer_angle_deg: f64,
        pub z: f64,
        pub y_km: f64,
        pub iterations: usize,
        pub residual: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub validation: Option<ValidationSummary>,
    }

    /// Write a pretty-printed report to `path` (`-` for stdout).
    pub fn write_report(path: &Path, report: &TransferReport) -> io::Result<()> {
        let mut writer = super::writer_for_path(path)?;
        to_writer_pretty(&mut writer, report)?;
        writeln!(writer)?;
        writer.flush()
    }
}
