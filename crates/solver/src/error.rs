//! Failure taxonomy of the Lambert core.

use thiserror::Error;

use crate::lambert::TransferRequest;

/// Reason a transfer request was rejected before any geometry was computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputFault {
    #[error("initial position vector has zero magnitude")]
    ZeroInitialPosition,
    #[error("final position vector has zero magnitude")]
    ZeroFinalPosition,
    #[error("position vectors must have finite components")]
    NonFiniteComponent,
    #[error("time of flight must be positive and finite")]
    NonPositiveTimeOfFlight,
}

/// Errors surfaced by the solver. Every variant terminates the call; no partial
/// solution is ever returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LambertError {
    #[error("invalid input: {0}")]
    InvalidInput(InputFault),
    #[error(
        "degenerate transfer geometry: A = {a} at transfer angle {theta_rad} rad ({request})"
    )]
    DegenerateGeometry {
        a: f64,
        theta_rad: f64,
        request: TransferRequest,
    },
    #[error("universal variable diverged at iteration {iteration}: z = {z} ({request})")]
    NumericalDivergence {
        iteration: usize,
        z: f64,
        request: TransferRequest,
    },
    #[error(
        "lambert solver did not converge after {iterations} iterations: F = {residual:e}, z = {z}, y = {y} ({request})"
    )]
    ConvergenceFailure {
        iterations: usize,
        residual: f64,
        z: f64,
        y: f64,
        request: TransferRequest,
    },
    #[error("Lagrange coefficient g = {g} at z = {z}, y = {y}; velocities are undefined ({request})")]
    ReconstructionSingularity {
        g: f64,
        z: f64,
        y: f64,
        request: TransferRequest,
    },
    #[error("invalid solver configuration: {0}")]
    InvalidConfig(String),
}

impl From<InputFault> for LambertError {
    fn from(fault: InputFault) -> Self {
        LambertError::InvalidInput(fault)
    }
}

impl LambertError {
    /// The request that produced the failure, when the failure happened past input
    /// validation.
    pub fn request(&self) -> Option<&TransferRequest> {
        match self {
            LambertError::DegenerateGeometry { request, .. }
            | LambertError::NumericalDivergence { request, .. }
            | LambertError::ConvergenceFailure { request, .. }
            | LambertError::ReconstructionSingularity { request, .. } => Some(request),
            LambertError::InvalidInput(_) | LambertError::InvalidConfig(_) => None,
        }
    }
}
