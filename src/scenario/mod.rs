//! Named transfer cases: the built-in Earth catalog and cases loaded from files.

use std::path::Path;

use thiserror::Error;

use crate::config::{self, BodyConfig, ConfigError, ScenarioConfig, SolverSettings};
use crate::constants::{EARTH_RADIUS_KM, GEO_ALTITUDE_KM, MOON_DISTANCE_KM, MU_EARTH};
use crate::solver::{Direction, LambertError, LambertSolver, SolverConfig, TransferRequest};

/// Target phase angle of the built-in cases, measured from +X.
const BUILTIN_LEAD_DEG: f64 = 10.0;
const LEO_ALTITUDE_KM: f64 = 400.0;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Lambert(#[from] LambertError),
    #[error("unknown scenario `{0}`")]
    UnknownScenario(String),
    #[error("scenario `{scenario}` references unknown body `{body}`")]
    UnknownBody { scenario: String, body: String },
}

/// A transfer case ready to hand to the solver.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub description: String,
    pub body: BodyConfig,
    pub request: TransferRequest,
}

impl Scenario {
    pub fn mu(&self) -> f64 {
        self.body.mu_km3_s2
    }

    /// Solver for this scenario's body with `settings` applied.
    pub fn solver(&self, settings: &SolverSettings) -> Result<LambertSolver, ScenarioError> {
        Ok(LambertSolver::new(solver_config(settings, self.mu()))?)
    }
}

/// The body every built-in case uses.
pub fn earth() -> BodyConfig {
    BodyConfig {
        name: "Earth".to_string(),
        mu_km3_s2: MU_EARTH,
        radius_km: EARTH_RADIUS_KM,
    }
}

fn leading_position(radius_km: f64) -> [f64; 3] {
    let lead = BUILTIN_LEAD_DEG.to_radians();
    [radius_km * lead.cos(), radius_km * lead.sin(), 0.0]
}

fn builtin(name: &str, description: &str, r1: [f64; 3], r2: [f64; 3], tof: f64) -> Scenario {
    Scenario {
        name: name.to_string(),
        description: description.to_string(),
        body: earth(),
        request: TransferRequest::new(r1, r2, tof, Direction::Prograde),
    }
}

/// Earth-centred catalog: surface to LEO, LEO to GEO, and surface to lunar distance, each
/// arriving 10° ahead of the departure point.
pub fn builtin_scenarios() -> Vec<Scenario> {
    let surface = [EARTH_RADIUS_KM, 0.0, 0.0];
    let leo = EARTH_RADIUS_KM + LEO_ALTITUDE_KM;
    vec![
        builtin(
            "surface-to-leo",
            "Earth surface to a 400 km orbit in 1000 s",
            surface,
            leading_position(leo),
            1000.0,
        ),
        builtin(
            "leo-to-geo",
            "400 km orbit to geostationary altitude in 5 h",
            [leo, 0.0, 0.0],
            leading_position(EARTH_RADIUS_KM + GEO_ALTITUDE_KM),
            18_000.0,
        ),
        builtin(
            "earth-to-moon",
            "Earth surface to lunar distance in about 3.5 days",
            surface,
            leading_position(MOON_DISTANCE_KM),
            300_000.0,
        ),
    ]
}

/// Case-insensitive lookup in the built-in catalog.
pub fn find_builtin(name: &str) -> Result<Scenario, ScenarioError> {
    builtin_scenarios()
        .into_iter()
        .find(|s| s.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| ScenarioError::UnknownScenario(name.to_string()))
}

/// Resolve a loaded record against `bodies`; records without a body use [`earth`].
pub fn from_config(record: ScenarioConfig, bodies: &[BodyConfig]) -> Result<Scenario, ScenarioError> {
    let body = match &record.body {
        None => earth(),
        Some(name) if name.eq_ignore_ascii_case("earth") && config::find_body(bodies, name).is_none() => earth(),
        Some(name) => config::find_body(bodies, name)
            .cloned()
            .ok_or_else(|| ScenarioError::UnknownBody {
                scenario: record.name.clone(),
                body: name.clone(),
            })?,
    };
    let direction = Direction::from(record.direction.is_prograde());
    Ok(Scenario {
        description: record.description.unwrap_or_default(),
        request: TransferRequest::new(record.r1_km, record.r2_km, record.time_of_flight_s, direction),
        name: record.name,
        body,
    })
}

/// Load scenario records from `path` and resolve each against `bodies`.
pub fn load_scenarios<P: AsRef<Path>>(path: P, bodies: &[BodyConfig]) -> Result<Vec<Scenario>, ScenarioError> {
    config::load_scenarios(path)?
        .into_iter()
        .map(|record| from_config(record, bodies))
        .collect()
}

/// Apply file overrides on top of the solver defaults for `mu`.
pub fn solver_config(settings: &SolverSettings, mu: f64) -> SolverConfig {
    let defaults = SolverConfig::new(mu);
    SolverConfig {
        mu,
        tolerance: settings.tolerance.unwrap_or(defaults.tolerance),
        max_iterations: settings.max_iterations.unwrap_or(defaults.max_iterations),
        damping: settings.damping.unwrap_or(defaults.damping),
        max_step: settings.max_step.unwrap_or(defaults.max_step),
        divergence_limit: settings.divergence_limit.unwrap_or(defaults.divergence_limit),
        reference_normal: settings.reference_normal.unwrap_or(defaults.reference_normal),
    }
}
