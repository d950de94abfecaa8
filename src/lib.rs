//! Lambert transfers about a single central body.
//!
//! The solver itself lives in [`solver`]; this crate adds the built-in scenario catalog,
//! conversion of configuration records into solver inputs, and validation of solutions
//! by numerical propagation. Front-ends (the `lambert` CLI) only talk to this crate.

pub use uvlambert_config as config;
pub use uvlambert_core::{constants, units, vector};
pub use uvlambert_export as export;
pub use uvlambert_orbits as orbits;
pub use uvlambert_solver as solver;

pub mod report;
pub mod scenario;
pub mod validation;

pub use solver::{Direction, LambertError, LambertSolver, SolverConfig, TransferRequest, TransferSolution};
