use std::fmt;

use uvlambert_core::vector::{self, Vector3};

use crate::error::{InputFault, LambertError};
use crate::geometry::{DEFAULT_REFERENCE_NORMAL, Direction, TransferGeometry};
use crate::observer::{IterationObserver, NoopObserver};
use crate::root::{self, UniversalRoot, Z_LIMIT};
use crate::velocity::{self, LagrangeCoefficients};

/// Solver parameters. Only `mu` describes the physics; the rest tune the iteration and
/// default to the values the algorithm is defined with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Gravitational parameter of the central body (km³/s²).
    pub mu: f64,
    /// Absolute bound on the time-of-flight residual |F| (km^1.5).
    pub tolerance: f64,
    pub max_iterations: usize,
    /// Fraction of the Newton step actually taken.
    pub damping: f64,
    /// Largest |Δz| per iteration.
    pub max_step: f64,
    /// |z| beyond which the iteration is abandoned as divergent.
    pub divergence_limit: f64,
    /// Normal defining the prograde sense.
    pub reference_normal: Vector3,
}

impl SolverConfig {
    pub const DEFAULT_TOLERANCE: f64 = 1e-8;
    pub const DEFAULT_MAX_ITERATIONS: usize = 1000;
    pub const DEFAULT_DAMPING: f64 = 0.5;
    pub const DEFAULT_MAX_STEP: f64 = 10.0;
    pub const DEFAULT_DIVERGENCE_LIMIT: f64 = 1e6;

    pub fn new(mu: f64) -> Self {
        Self {
            mu,
            tolerance: Self::DEFAULT_TOLERANCE,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            damping: Self::DEFAULT_DAMPING,
            max_step: Self::DEFAULT_MAX_STEP,
            divergence_limit: Self::DEFAULT_DIVERGENCE_LIMIT,
            reference_normal: DEFAULT_REFERENCE_NORMAL,
        }
    }

    pub fn with_reference_normal(mut self, normal: Vector3) -> Self {
        self.reference_normal = normal;
        self
    }

    pub fn validate(&self) -> Result<(), LambertError> {
        let invalid = |msg: String| Err(LambertError::InvalidConfig(msg));
        if !(self.mu > 0.0 && self.mu.is_finite()) {
            return invalid(format!("mu must be positive and finite, got {}", self.mu));
        }
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return invalid(format!("tolerance must be positive, got {}", self.tolerance));
        }
        if self.max_iterations == 0 {
            return invalid("max_iterations must be at least 1".to_string());
        }
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return invalid(format!("damping must lie in (0, 1], got {}", self.damping));
        }
        if !(self.max_step > 0.0 && self.max_step.is_finite()) {
            return invalid(format!("max_step must be positive, got {}", self.max_step));
        }
        if !(self.divergence_limit > Z_LIMIT) {
            return invalid(format!(
                "divergence_limit must exceed 4π² ({Z_LIMIT}), got {}",
                self.divergence_limit
            ));
        }
        if !vector::is_finite(&self.reference_normal) || vector::norm(&self.reference_normal) == 0.0 {
            return invalid("reference_normal must be a finite, non-zero vector".to_string());
        }
        Ok(())
    }
}

/// Boundary conditions of one transfer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferRequest {
    /// Initial position (km).
    pub r1: Vector3,
    /// Final position (km).
    pub r2: Vector3,
    /// Time of flight (s).
    pub time_of_flight: f64,
    pub direction: Direction,
}

impl TransferRequest {
    pub fn new(r1: Vector3, r2: Vector3, time_of_flight: f64, direction: Direction) -> Self {
        Self {
            r1,
            r2,
            time_of_flight,
            direction,
        }
    }

    fn check_time_of_flight(&self) -> Result<(), InputFault> {
        if self.time_of_flight > 0.0 && self.time_of_flight.is_finite() {
            Ok(())
        } else {
            Err(InputFault::NonPositiveTimeOfFlight)
        }
    }
}

impl fmt::Display for TransferRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "r1 = ({}, {}, {}) km, r2 = ({}, {}, {}) km, tof = {} s, {}",
            self.r1[0],
            self.r1[1],
            self.r1[2],
            self.r2[0],
            self.r2[1],
            self.r2[2],
            self.time_of_flight,
            self.direction.label()
        )
    }
}

/// Endpoint velocities plus the iteration diagnostics that produced them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferSolution {
    /// Velocity at r1 (km/s).
    pub v1: Vector3,
    /// Velocity at r2 (km/s).
    pub v2: Vector3,
    pub z: f64,
    pub y: f64,
    pub residual: f64,
    pub iterations: usize,
    pub transfer_angle_rad: f64,
    pub lagrange: LagrangeCoefficients,
}

/// Lambert solver bound to one central body.
///
/// Holds no mutable state, so one instance can serve any number of threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambertSolver {
    config: SolverConfig,
}

impl LambertSolver {
    pub fn new(config: SolverConfig) -> Result<Self, LambertError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Solver with default iteration settings.
    pub fn with_mu(mu: f64) -> Result<Self, LambertError> {
        Self::new(SolverConfig::new(mu))
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn mu(&self) -> f64 {
        self.config.mu
    }

    /// Solve for the velocities connecting `r1` to `r2` in `time_of_flight` seconds.
    pub fn solve(
        &self,
        r1: Vector3,
        r2: Vector3,
        time_of_flight: f64,
        direction: impl Into<Direction>,
    ) -> Result<TransferSolution, LambertError> {
        self.solve_request(&TransferRequest::new(r1, r2, time_of_flight, direction.into()))
    }

    pub fn solve_request(&self, request: &TransferRequest) -> Result<TransferSolution, LambertError> {
        self.solve_observed(request, &mut NoopObserver)
    }

    /// Solve while reporting every iteration to `observer`.
    pub fn solve_observed(
        &self,
        request: &TransferRequest,
        observer: &mut dyn IterationObserver,
    ) -> Result<TransferSolution, LambertError> {
        request.check_time_of_flight()?;
        let geom = TransferGeometry::new(request, &self.config.reference_normal)?;
        let root = root::find_root(&geom, request, &self.config, observer)?;
        let (lagrange, v1, v2) = reconstruct(&geom, &root, self.config.mu, request)?;

        Ok(TransferSolution {
            v1,
            v2,
            z: root.z,
            y: root.y,
            residual: root.residual,
            iterations: root.iterations,
            transfer_angle_rad: geom.theta,
            lagrange,
        })
    }
}

/// Lagrange coefficients and terminal velocities for a converged root.
pub(crate) fn reconstruct(
    geom: &TransferGeometry,
    root: &UniversalRoot,
    mu: f64,
    request: &TransferRequest,
) -> Result<(LagrangeCoefficients, Vector3, Vector3), LambertError> {
    let lagrange = LagrangeCoefficients::from_root(geom, root.y, mu);
    let (v1, v2) = velocity::compute_velocities(geom, &lagrange).ok_or(
        LambertError::ReconstructionSingularity {
            g: lagrange.g,
            z: root.z,
            y: root.y,
            request: *request,
        },
    )?;
    Ok((lagrange, v1, v2))
}

/// One-shot solve returning just the two velocities.
pub fn solve(
    r1_km: Vector3,
    r2_km: Vector3,
    time_of_flight_s: f64,
    mu_km3_s2: f64,
    prograde: bool,
) -> Result<(Vector3, Vector3), LambertError> {
    let solution = LambertSolver::with_mu(mu_km3_s2)?.solve(r1_km, r2_km, time_of_flight_s, prograde)?;
    Ok((solution.v1, solution.v2))
}
