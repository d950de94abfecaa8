//! Configuration models and loaders for central bodies, solver settings, and transfer
//! scenarios.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Central body parsed from a body catalog.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BodyConfig {
    pub name: String,
    pub mu_km3_s2: f64,
    pub radius_km: f64,
}

impl BodyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.mu_km3_s2 > 0.0 && self.mu_km3_s2.is_finite()) {
            return Err(ConfigError::invalid(
                &self.name,
                format!("mu_km3_s2 must be positive, got {}", self.mu_km3_s2),
            ));
        }
        if !(self.radius_km >= 0.0 && self.radius_km.is_finite()) {
            return Err(ConfigError::invalid(
                &self.name,
                format!("radius_km must be non-negative, got {}", self.radius_km),
            ));
        }
        Ok(())
    }
}

/// Iteration overrides. Unset fields keep the solver defaults.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SolverSettings {
    pub tolerance: Option<f64>,
    pub max_iterations: Option<usize>,
    pub damping: Option<f64>,
    pub max_step: Option<f64>,
    pub divergence_limit: Option<f64>,
    pub reference_normal: Option<[f64; 3]>,
    /// Trace every n-th iteration when tracing is enabled.
    pub trace_every: Option<usize>,
}

/// Sense of travel as written in scenario files.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DirectionConfig {
    #[default]
    Prograde,
    Retrograde,
}

impl DirectionConfig {
    pub fn is_prograde(self) -> bool {
        matches!(self, DirectionConfig::Prograde)
    }
}

/// One transfer case.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ScenarioConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Central body name; the catalog default applies when absent.
    #[serde(default)]
    pub body: Option<String>,
    pub r1_km: [f64; 3],
    pub r2_km: [f64; 3],
    pub time_of_flight_s: f64,
    #[serde(default)]
    pub direction: DirectionConfig,
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid record `{record}`: {reason}")]
    Invalid { record: String, reason: String },
}

impl ConfigError {
    fn invalid(record: &str, reason: String) -> Self {
        ConfigError::Invalid {
            record: record.to_string(),
            reason,
        }
    }
}

/// Load central bodies from a YAML list, a single TOML record, or a directory of TOML files.
pub fn load_bodies<P: AsRef<Path>>(path: P) -> Result<Vec<BodyConfig>, ConfigError> {
    let bodies: Vec<BodyConfig> = load_records(path)?;
    for body in &bodies {
        body.validate()?;
    }
    Ok(bodies)
}

/// Load transfer scenarios; same file layouts as [`load_bodies`].
pub fn load_scenarios<P: AsRef<Path>>(path: P) -> Result<Vec<ScenarioConfig>, ConfigError> {
    load_records(path)
}

/// Load solver overrides from a single TOML or YAML document.
pub fn load_solver_settings<P: AsRef<Path>>(path: P) -> Result<SolverSettings, ConfigError> {
    let path = path.as_ref();
    if is_toml(path) {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

/// Case-insensitive lookup by name.
pub fn find_body<'a>(bodies: &'a [BodyConfig], name: &str) -> Option<&'a BodyConfig> {
    bodies.iter().find(|body| body.name.eq_ignore_ascii_case(name))
}

fn is_toml(path: &Path) -> bool {
    path.extension().map(|ext| ext == "toml").unwrap_or(false)
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if is_toml(path) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_toml(path))
        .collect();
    entries.sort();

    let mut records = Vec::with_capacity(entries.len());
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        records.push(toml::from_str(&contents)?);
    }
    Ok(records)
}
