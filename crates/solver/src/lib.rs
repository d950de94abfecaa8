//! Universal-variable Lambert solver.
//!
//! Given two position vectors about a central body, a time of flight and a direction of
//! travel, [`LambertSolver`] finds the single-revolution two-body transfer between them
//! and returns its endpoint velocities.
//!
//! ```
//! use uvlambert_solver::{Direction, LambertSolver};
//!
//! let solver = LambertSolver::with_mu(398_600.441_8)?;
//! let solution = solver.solve([7000.0, 0.0, 0.0], [0.0, 7000.0, 0.0], 1800.0, Direction::Prograde)?;
//! assert!(solution.v1[1] > 6.0);
//! # Ok::<(), uvlambert_solver::LambertError>(())
//! ```

pub mod error;
pub mod geometry;
pub mod lambert;
pub mod observer;
pub mod root;
pub mod stumpff;
pub mod velocity;

pub use error::{InputFault, LambertError};
pub use geometry::{DEFAULT_REFERENCE_NORMAL, Direction, TransferGeometry};
pub use lambert::{LambertSolver, SolverConfig, TransferRequest, TransferSolution, solve};
pub use observer::{DomainRepair, IterationObserver, IterationRecord, NoopObserver, TracingObserver};
pub use velocity::LagrangeCoefficients;
