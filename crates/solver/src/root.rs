//! Universal-variable root search.
//!
//! Solves the time-of-flight equation
//!
//! ```text
//! y(z) = r1 + r2 + A (z S(z) - 1) / √C(z)
//! F(z) = (y / C)^(3/2) S + A √y - √μ Δt = 0
//! ```
//!
//! for the universal variable `z` with a damped Newton iteration. Before a residual is
//! evaluated the iterate must satisfy `y(z) ≥ 0`; [`repair_domain`] bisects an
//! inadmissible iterate back into the domain. Newton steps are clamped to a maximum
//! magnitude and to a bracket that tightens as residual signs are observed.

use std::f64::consts::{PI, SQRT_2};

use crate::error::LambertError;
use crate::geometry::TransferGeometry;
use crate::lambert::{SolverConfig, TransferRequest};
use crate::observer::{DomainRepair, IterationObserver, IterationRecord};
use crate::stumpff::{self, SERIES_THRESHOLD, Stumpff};

/// 4π², the single-revolution limit of z. C(z) vanishes here.
pub const Z_LIMIT: f64 = 4.0 * PI * PI;

/// Halvings attempted by [`repair_domain`] before giving up.
pub const MAX_REPAIR_HALVINGS: usize = 100;

/// Rounding floor of the residual, in units of `ε·√μ Δt`.
pub const RESIDUAL_ULPS: f64 = 4.0;

/// Iterations without a smaller |F| after which the residual is taken to be at its
/// noise floor.
pub const STALL_LIMIT: usize = 6;

/// y(z) for the given geometry.
#[inline]
pub fn y_of_z(geom: &TransferGeometry, z: f64, st: &Stumpff) -> f64 {
    geom.r1_norm + geom.r2_norm + geom.a * (z * st.s - 1.0) / st.c.sqrt()
}

/// F(z): the time-of-flight residual scaled by √μ.
#[inline]
pub fn time_residual(geom: &TransferGeometry, y: f64, st: &Stumpff, sqrt_mu_tof: f64) -> f64 {
    (y / st.c).powf(1.5) * st.s + geom.a * y.sqrt() - sqrt_mu_tof
}

/// dF/dz. Near the origin the closed form is 0/0 and its z → 0 limit is used.
pub fn residual_derivative(geom: &TransferGeometry, z: f64, y: f64, st: &Stumpff) -> f64 {
    let a = geom.a;
    if z.abs() < SERIES_THRESHOLD {
        SQRT_2 / 40.0 * y.powf(1.5) + a / 8.0 * (y.sqrt() + a * (1.0 / (2.0 * y)).sqrt())
    } else {
        let (c, s) = (st.c, st.s);
        (y / c).powf(1.5) * ((c - 1.5 * s / c) / (2.0 * z) + 0.75 * s * s / c)
            + a / 8.0 * (3.0 * s / c * y.sqrt() + a * (c / y).sqrt())
    }
}

/// Starting iterate: the lower bracket end for transfers beyond π, otherwise one
/// maximum step below the 4π² pole.
pub fn seed(geom: &TransferGeometry, config: &SolverConfig) -> f64 {
    if geom.is_long_way() {
        -Z_LIMIT
    } else {
        (Z_LIMIT - config.max_step).max(0.0)
    }
}

/// Interval the iterate is confined to.
///
/// The upper end starts at 4π² and is always enforced. The lower end starts at -4π²
/// but only becomes binding once an evaluation below the root has been seen; until then
/// a step past it moves it instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub low: f64,
    pub up: f64,
    low_established: bool,
}

impl Bracket {
    pub fn initial() -> Self {
        Self {
            low: -Z_LIMIT,
            up: Z_LIMIT,
            low_established: false,
        }
    }

    #[inline]
    pub fn low_established(&self) -> bool {
        self.low_established
    }

    /// F is increasing in z, so its sign tells which side of the root `z` lies on.
    pub fn record_residual(&mut self, z: f64, residual: f64) {
        if residual > 0.0 {
            self.up = self.up.min(z);
        } else if residual < 0.0 {
            self.raise_low(z);
        }
    }

    /// Every z at or below `z` is outside the admissible domain.
    pub fn reject_below(&mut self, z: f64) {
        self.raise_low(z);
    }

    fn raise_low(&mut self, z: f64) {
        self.low = if self.low_established { self.low.max(z) } else { z };
        self.low_established = true;
    }

    /// Keep a Newton candidate inside the bracket, falling back to bisection against
    /// whichever end it overshot.
    pub fn constrain(&mut self, current: f64, candidate: f64) -> f64 {
        if candidate >= self.up {
            0.5 * (current + self.up)
        } else if candidate <= self.low {
            if self.low_established {
                0.5 * (current + self.low)
            } else {
                self.low = candidate;
                candidate
            }
        } else {
            candidate
        }
    }
}

/// Transient state of one root search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationState {
    pub z: f64,
    pub bracket: Bracket,
    pub stumpff: Stumpff,
    pub y: f64,
    pub residual: f64,
    pub df_dz: f64,
    pub iteration: usize,
}

impl IterationState {
    pub fn seeded(z: f64) -> Self {
        Self {
            z,
            bracket: Bracket::initial(),
            stumpff: stumpff::evaluate(z),
            y: f64::NAN,
            residual: f64::NAN,
            df_dz: f64::NAN,
            iteration: 0,
        }
    }
}

/// Result of [`repair_domain`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Repaired {
    pub z: f64,
    pub y: f64,
    /// Last midpoint that still had `y < 0`, or the original iterate.
    pub last_rejected: f64,
    pub halvings: usize,
}

/// Bisect from an iterate with `y(z) < 0` towards the probe (`0` for negative `z`,
/// `2z` otherwise) until `y ≥ 0`. Returns `None` if no admissible midpoint appears
/// within [`MAX_REPAIR_HALVINGS`].
pub fn repair_domain(geom: &TransferGeometry, z: f64) -> Option<Repaired> {
    let probe = if z < 0.0 { 0.0 } else { 2.0 * z };
    let mut rejected = z;
    for halvings in 1..=MAX_REPAIR_HALVINGS {
        let mid = 0.5 * (rejected + probe);
        let y = y_of_z(geom, mid, &stumpff::evaluate(mid));
        if y >= 0.0 {
            return Some(Repaired {
                z: mid,
                y,
                last_rejected: rejected,
                halvings,
            });
        }
        rejected = mid;
    }
    None
}

/// Converged universal variable and the quantities reconstruction needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniversalRoot {
    pub z: f64,
    pub y: f64,
    pub stumpff: Stumpff,
    pub residual: f64,
    pub iterations: usize,
}

/// Iterate on z until the time-of-flight residual meets the configured tolerance.
///
/// The tolerance is absolute, `|F| < tolerance`, raised to [`RESIDUAL_ULPS`]`·ε·√μ Δt`
/// where f64 cannot resolve it. Steep elliptic transfers near 4π² can have a noisier
/// residual than that; once |F| has not improved for [`STALL_LIMIT`] iterations and lies
/// within `tolerance · max(1, √μ Δt)` the iterate is accepted.
pub fn find_root(
    geom: &TransferGeometry,
    request: &TransferRequest,
    config: &SolverConfig,
    observer: &mut dyn IterationObserver,
) -> Result<UniversalRoot, LambertError> {
    let sqrt_mu_tof = config.mu.sqrt() * request.time_of_flight;
    let threshold = config.tolerance.max(RESIDUAL_ULPS * f64::EPSILON * sqrt_mu_tof);
    let noise_bound = config.tolerance * sqrt_mu_tof.max(1.0);
    let mut best_residual = f64::INFINITY;
    let mut stalled = 0;
    let mut state = IterationState::seeded(seed(geom, config));

    while state.iteration < config.max_iterations {
        state.iteration += 1;
        state.stumpff = stumpff::evaluate(state.z);
        state.y = y_of_z(geom, state.z, &state.stumpff);

        if state.y < 0.0 {
            let Some(repaired) = repair_domain(geom, state.z) else {
                return Err(LambertError::ConvergenceFailure {
                    iterations: state.iteration,
                    residual: state.residual,
                    z: state.z,
                    y: state.y,
                    request: *request,
                });
            };
            observer.on_domain_repair(&DomainRepair {
                index: state.iteration,
                rejected_z: state.z,
                repaired_z: repaired.z,
                halvings: repaired.halvings,
            });
            state.bracket.reject_below(repaired.last_rejected);
            state.z = repaired.z;
            continue;
        }

        state.residual = time_residual(geom, state.y, &state.stumpff, sqrt_mu_tof);
        if !state.residual.is_finite() {
            return Err(divergence(&state, request));
        }

        if state.residual.abs() < best_residual {
            best_residual = state.residual.abs();
            stalled = 0;
        } else {
            stalled += 1;
        }
        let at_floor = stalled >= STALL_LIMIT && state.residual.abs() < noise_bound;

        if state.residual.abs() < threshold || at_floor {
            observer.on_iteration(&record(&state, None));
            return Ok(UniversalRoot {
                z: state.z,
                y: state.y,
                stumpff: state.stumpff,
                residual: state.residual,
                iterations: state.iteration,
            });
        }

        state.bracket.record_residual(state.z, state.residual);
        state.df_dz = residual_derivative(geom, state.z, state.y, &state.stumpff);
        if !state.df_dz.is_finite() || state.df_dz == 0.0 {
            return Err(divergence(&state, request));
        }
        observer.on_iteration(&record(&state, Some(state.df_dz)));

        let step = (config.damping * state.residual / state.df_dz)
            .clamp(-config.max_step, config.max_step);
        let candidate = state.z - step;
        if candidate.abs() > config.divergence_limit {
            return Err(LambertError::NumericalDivergence {
                iteration: state.iteration,
                z: candidate,
                request: *request,
            });
        }
        state.z = state.bracket.constrain(state.z, candidate);
    }

    Err(LambertError::ConvergenceFailure {
        iterations: state.iteration,
        residual: state.residual,
        z: state.z,
        y: state.y,
        request: *request,
    })
}

fn record(state: &IterationState, df_dz: Option<f64>) -> IterationRecord {
    IterationRecord {
        index: state.iteration,
        z: state.z,
        c: state.stumpff.c,
        s: state.stumpff.s,
        y: state.y,
        residual: state.residual,
        df_dz,
    }
}

fn divergence(state: &IterationState, request: &TransferRequest) -> LambertError {
    LambertError::NumericalDivergence {
        iteration: state.iteration,
        z: state.z,
        request: *request,
    }
}
