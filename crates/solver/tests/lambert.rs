use uvlambert_core::vector;
use uvlambert_orbits::{StateVector, angular_momentum, rk4, specific_energy};
use uvlambert_solver::{
    Direction, InputFault, IterationRecord, LambertError, LambertSolver, SolverConfig, TransferRequest,
};

const MU: f64 = 398_600.441_8; // km^3 / s^2

fn solver() -> LambertSolver {
    LambertSolver::with_mu(MU).expect("valid mu")
}

fn assert_close(actual: &[f64; 3], expected: &[f64; 3], tol: f64, label: &str) {
    for i in 0..3 {
        assert!(
            (actual[i] - expected[i]).abs() < tol,
            "{label}[{i}]: got {:?}, expected {:?}",
            actual,
            expected
        );
    }
}

#[test]
fn curtis_example_5_2() {
    let sol = solver()
        .solve([5000.0, 10000.0, 2100.0], [-14600.0, 2500.0, 7000.0], 3600.0, Direction::Prograde)
        .expect("lambert solve");
    assert_close(&sol.v1, &[-5.9925, 1.9254, 3.2456], 1e-3, "v1");
    assert_close(&sol.v2, &[-3.3125, -4.1966, -0.38529], 1e-3, "v2");
}

#[test]
fn inclined_transfer_beyond_half_revolution() {
    // (r1 × r2)·ẑ < 0, so the prograde sweep is the long way round
    let sol = solver()
        .solve([-6045.0, -3490.0, 2500.0], [-3738.0, 3000.0, 5000.0], 3600.0, Direction::Prograde)
        .expect("lambert solve");
    assert!(sol.transfer_angle_rad > std::f64::consts::PI);
    assert_close(&sol.v1, &[1.51951, -4.64995, -4.32970], 1e-3, "v1");
    assert_close(&sol.v2, &[-5.11430, -4.83391, 0.85533], 1e-3, "v2");
    assert!(sol.residual.abs() < 1e-8, "F = {}", sol.residual);
}

#[test]
fn quarter_orbit_in_thirty_minutes() {
    let sol = solver()
        .solve([7000.0, 0.0, 0.0], [0.0, 7000.0, 0.0], 1800.0, Direction::Prograde)
        .expect("lambert solve");
    assert_close(&sol.v1, &[1.41322, 6.87246, 0.0], 1e-3, "v1");
    assert_close(&sol.v2, &[-6.87246, -1.41322, 0.0], 1e-3, "v2");
    assert!(sol.residual.abs() < 1e-8, "F = {}", sol.residual);
}

#[test]
fn three_quarter_orbit_prograde() {
    let sol = solver()
        .solve([7000.0, 0.0, 0.0], [0.0, -7000.0, 0.0], 5400.0, Direction::Prograde)
        .expect("lambert solve");
    assert_close(&sol.v1, &[0.62005, 7.86244, 0.0], 1e-3, "v1");
    assert_close(&sol.v2, &[7.86244, 0.62005, 0.0], 1e-3, "v2");
    assert!(sol.residual.abs() < 1e-8, "F = {}", sol.residual);
}

#[test]
fn retrograde_mirrors_prograde() {
    // the retrograde quarter turn to +Y is the mirror image of the prograde turn to -Y
    let pro = solver()
        .solve([7000.0, 0.0, 0.0], [0.0, -7000.0, 0.0], 5400.0, Direction::Prograde)
        .unwrap();
    let retro = solver()
        .solve([7000.0, 0.0, 0.0], [0.0, 7000.0, 0.0], 5400.0, Direction::Retrograde)
        .unwrap();
    assert_close(&retro.v1, &[pro.v1[0], -pro.v1[1], 0.0], 1e-9, "v1");
    assert_close(&retro.v2, &[pro.v2[0], -pro.v2[1], 0.0], 1e-9, "v2");
}

#[test]
fn near_hohmann_transfer_matches_burn() {
    let r1: f64 = 7000.0;
    let r2 = 42_000.0;
    let tof = std::f64::consts::PI * ((0.5 * (r1 + r2)).powi(3) / MU).sqrt();
    let sol = solver()
        .solve([r1, 0.0, 0.0], [-r2, 100.0, 0.0], tof, Direction::Prograde)
        .expect("lambert solve");
    let v_circ = (MU / r1).sqrt();
    let expected_dv = v_circ * ((2.0 * r2 / (r1 + r2)).sqrt() - 1.0);
    assert!(
        (sol.v1[1] - v_circ - expected_dv).abs() < 0.05,
        "dv = {}, expected {expected_dv}",
        sol.v1[1] - v_circ
    );
}

#[test]
fn near_antipodal_minimum_energy_transfer_is_bound() {
    let r1 = [7000.0, 0.0, 0.0];
    let tof = std::f64::consts::PI * (7000.0_f64.powi(3) / MU).sqrt();
    for (r2, label) in [([-6999.9, 100.0, 0.0], "0.8 deg short"), ([-7000.0, 1e-3, 0.0], "1e-3 km off")] {
        let sol = solver().solve(r1, r2, tof, Direction::Prograde).expect("lambert solve");
        assert!(sol.transfer_angle_rad < std::f64::consts::PI, "{label}");
        assert!(sol.z > 0.0 && sol.z < 4.0 * std::f64::consts::PI.powi(2), "{label}: z = {}", sol.z);
        assert!(specific_energy(&r1, &sol.v1, MU) < 0.0, "{label}: escape orbit");
        assert!(sol.residual.abs() < 1e-8, "{label}: F = {}", sol.residual);

        // half a period of the 7000 km circle: the transfer is that circle
        assert!((vector::norm(&sol.v1) - (MU / 7000.0).sqrt()).abs() < 1e-3, "{label}: v1 = {:?}", sol.v1);
        assert!(sol.v1[1] > 7.5, "{label}: v1 = {:?}", sol.v1);
    }

    let tight = solver()
        .solve(r1, [-7000.0, 1e-3, 0.0], tof, Direction::Prograde)
        .unwrap();
    assert!(tight.v1[0].abs() < 1e-4, "v1 = {:?}", tight.v1);
    assert_close(&tight.v2, &[0.0, -7.54605, 0.0], 1e-4, "v2");
}

#[test]
fn quarter_orbit_speeds_stay_below_escape() {
    let r1 = [7000.0, 0.0, 0.0];
    let r2 = [0.0, 7000.0, 0.0];
    let sol = solver().solve(r1, r2, 3600.0, Direction::Prograde).unwrap();
    let escape = (2.0 * MU / 7000.0).sqrt();
    assert!(vector::norm(&sol.v1) < escape, "|v1| = {}", vector::norm(&sol.v1));
    assert!(vector::norm(&sol.v2) < escape, "|v2| = {}", vector::norm(&sol.v2));
    assert!(vector::norm(&sol.v1) > 0.0);
}

#[test]
fn steep_long_way_transfer_converges_at_its_noise_floor() {
    let r1 = [7000.0, 0.0, 0.0];
    let angle = 345.0_f64.to_radians();
    let r2 = [8000.0 * angle.cos(), 8000.0 * angle.sin(), 1000.0];
    let sol = solver().solve(r1, r2, 3600.0, Direction::Prograde).expect("lambert solve");
    assert!(sol.z > 30.0, "z = {}", sol.z);
    assert!(sol.iterations < 200, "{} iterations", sol.iterations);
    assert!(sol.residual.abs() < 1e-8 * MU.sqrt() * 3600.0, "F = {}", sol.residual);

    let end = rk4(StateVector::new(r1, sol.v1), 3600.0, MU, 4000);
    let miss = vector::distance(&end.r, &r2);
    assert!(miss < 1.0, "missed r2 by {miss} km");
}

#[test]
fn round_trip_propagation_reaches_target() {
    let cases = [
        ([7000.0, 0.0, 0.0], [0.0, 7000.0, 0.0], 1800.0, Direction::Prograde),
        ([7000.0, 0.0, 0.0], [0.0, 7000.0, 0.0], 60.0, Direction::Prograde),
        ([7000.0, 0.0, 0.0], [0.0, 5000.0, 5000.0], 2400.0, Direction::Prograde),
        ([7000.0, 0.0, 0.0], [0.0, 7000.0, 0.0], 5400.0, Direction::Retrograde),
        ([5000.0, 10000.0, 2100.0], [-14600.0, 2500.0, 7000.0], 3600.0, Direction::Prograde),
    ];
    for (r1, r2, tof, direction) in cases {
        let sol = solver().solve(r1, r2, tof, direction).expect("lambert solve");
        let end = rk4(StateVector::new(r1, sol.v1), tof, MU, 2000);
        let miss = vector::distance(&end.r, &r2);
        assert!(miss < 1.0, "missed r2 by {miss} km for tof {tof}");
        let dv = vector::distance(&end.v, &sol.v2);
        assert!(dv < 1e-3, "arrival velocity off by {dv} km/s for tof {tof}");
    }
}

#[test]
fn endpoints_share_energy_and_angular_momentum() {
    let r1 = [5000.0, 10000.0, 2100.0];
    let r2 = [-14600.0, 2500.0, 7000.0];
    let sol = solver().solve(r1, r2, 3600.0, true).unwrap();
    let e1 = specific_energy(&r1, &sol.v1, MU);
    let e2 = specific_energy(&r2, &sol.v2, MU);
    assert!((e1 - e2).abs() < 1e-6, "energy {e1} vs {e2}");
    let h1 = angular_momentum(&r1, &sol.v1);
    let h2 = angular_momentum(&r2, &sol.v2);
    assert_close(&h1, &h2, 1e-4, "h");
}

#[test]
fn hyperbolic_transfer_has_negative_z() {
    let sol = solver().solve([7000.0, 0.0, 0.0], [0.0, 7000.0, 0.0], 60.0, true).unwrap();
    assert!(sol.z < 0.0, "z = {}", sol.z);
    assert!(specific_energy(&[7000.0, 0.0, 0.0], &sol.v1, MU) > 0.0);
}

#[test]
fn repeated_solves_are_bit_identical() {
    let s = solver();
    let a = s.solve([5000.0, 10000.0, 2100.0], [-14600.0, 2500.0, 7000.0], 3600.0, true).unwrap();
    let b = s.solve([5000.0, 10000.0, 2100.0], [-14600.0, 2500.0, 7000.0], 3600.0, true).unwrap();
    assert_eq!(a, b);
}

#[test]
fn parallel_solves_match_serial() {
    let s = solver();
    let requests: Vec<TransferRequest> = (1..=8)
        .map(|i| {
            let angle = (20.0 * i as f64).to_radians();
            TransferRequest::new(
                [7000.0, 0.0, 0.0],
                [8000.0 * angle.cos(), 8000.0 * angle.sin(), 0.0],
                1200.0 + 300.0 * i as f64,
                Direction::Prograde,
            )
        })
        .collect();
    let serial: Vec<_> = requests.iter().map(|r| s.solve_request(r)).collect();

    let parallel: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = requests
            .iter()
            .map(|r| scope.spawn(move || s.solve_request(r)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(serial, parallel);
}

#[test]
fn observer_sees_every_iteration() {
    let request = TransferRequest::new([7000.0, 0.0, 0.0], [0.0, 7000.0, 0.0], 1800.0, Direction::Prograde);
    let mut records: Vec<IterationRecord> = Vec::new();
    let sol = solver()
        .solve_observed(&request, &mut |r: &IterationRecord| records.push(*r))
        .unwrap();
    let last = records.last().expect("at least one iteration");
    assert!(last.converged());
    assert_eq!(last.index, sol.iterations);
    assert_eq!(last.z, sol.z);
    assert!(records.iter().all(|r| r.y >= 0.0));
    assert!(records[..records.len() - 1].iter().all(|r| !r.converged()));
}

#[test]
fn zero_vectors_are_invalid_input() {
    let err = solver().solve([0.0; 3], [0.0, 7000.0, 0.0], 1800.0, true).unwrap_err();
    assert_eq!(err, LambertError::InvalidInput(InputFault::ZeroInitialPosition));
    let err = solver().solve([7000.0, 0.0, 0.0], [0.0; 3], 1800.0, true).unwrap_err();
    assert_eq!(err, LambertError::InvalidInput(InputFault::ZeroFinalPosition));
}

#[test]
fn collinear_vectors_are_degenerate() {
    let err = solver().solve([7000.0, 0.0, 0.0], [14000.0, 0.0, 0.0], 1800.0, true).unwrap_err();
    assert!(matches!(err, LambertError::DegenerateGeometry { .. }), "{err}");
    assert!(err.request().is_some());
}

#[test]
fn non_positive_time_of_flight_is_invalid_input() {
    let err = solver().solve([7000.0, 0.0, 0.0], [0.0, 7000.0, 0.0], -1.0, true).unwrap_err();
    assert_eq!(err, LambertError::InvalidInput(InputFault::NonPositiveTimeOfFlight));
    assert!(err.request().is_none());
}

#[test]
fn invalid_mu_is_rejected() {
    assert!(matches!(LambertSolver::with_mu(-1.0), Err(LambertError::InvalidConfig(_))));
    assert!(matches!(
        uvlambert_solver::solve([7000.0, 0.0, 0.0], [0.0, 7000.0, 0.0], 1800.0, 0.0, true),
        Err(LambertError::InvalidConfig(_))
    ));
}

#[test]
fn iteration_ceiling_error_carries_request() {
    let config = SolverConfig {
        max_iterations: 2,
        ..SolverConfig::new(MU)
    };
    let request = TransferRequest::new([7000.0, 0.0, 0.0], [0.0, 7000.0, 0.0], 1800.0, Direction::Prograde);
    let err = LambertSolver::new(config).unwrap().solve_request(&request).unwrap_err();
    assert!(matches!(err, LambertError::ConvergenceFailure { iterations: 2, .. }), "{err}");
    assert_eq!(err.request(), Some(&request));
    assert!(err.to_string().contains("tof = 1800 s"));
}
