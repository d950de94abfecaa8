use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uvlambert::config::{SolverSettings, load_bodies, load_solver_settings};
use uvlambert::constants::MU_EARTH;
use uvlambert::export::{csv, json, writer_for_path};
use uvlambert::report;
use uvlambert::scenario::{self, Scenario};
use uvlambert::solver::{NoopObserver, TracingObserver};
use uvlambert::units;
use uvlambert::validation::{self, DEFAULT_PROPAGATION_STEPS, ValidationReport};
use uvlambert::{Direction, LambertSolver, TransferRequest, TransferSolution};

#[derive(Parser)]
#[command(author, version, about = "Universal-variable Lambert solver")]
struct Cli {
    /// Log solver iterations to stderr
    #[arg(long, global = true, default_value_t = false)]
    trace: bool,

    /// Solver overrides (TOML or YAML)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a single transfer given on the command line
    Solve(SolveArgs),
    /// Solve a built-in scenario or every scenario in a file
    Scenario(ScenarioArgs),
    /// List the built-in scenarios
    List,
}

#[derive(Args)]
struct SolveArgs {
    /// Initial position in km, as X,Y,Z
    #[arg(long, value_parser = parse_vector, allow_hyphen_values = true)]
    r1: [f64; 3],

    /// Final position in km, as X,Y,Z
    #[arg(long, value_parser = parse_vector, allow_hyphen_values = true)]
    r2: [f64; 3],

    /// Time of flight in seconds
    #[arg(long, allow_hyphen_values = true)]
    tof: f64,

    /// Travel clockwise about +Z
    #[arg(long, default_value_t = false)]
    retrograde: bool,

    /// Gravitational parameter in km^3/s^2 (defaults to Earth)
    #[arg(long, default_value_t = MU_EARTH)]
    mu: f64,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct ScenarioArgs {
    /// Scenario name (case-insensitive); with --file, restricts the run to that entry
    name: Option<String>,

    /// Scenario catalog (YAML list, TOML record, or directory of TOML files)
    #[arg(long)]
    file: Option<PathBuf>,

    /// Body catalog used to resolve scenario bodies
    #[arg(long, default_value = "configs/bodies")]
    bodies: PathBuf,

    /// Write one CSV row per scenario (`-` for stdout)
    #[arg(long)]
    csv: Option<PathBuf>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct OutputArgs {
    /// Propagate the departure state and report consistency errors
    #[arg(long, default_value_t = false)]
    validate: bool,

    /// RK4 steps used by --validate
    #[arg(long, default_value_t = DEFAULT_PROPAGATION_STEPS)]
    steps: usize,

    /// Write a JSON report (`-` for stdout)
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.trace);

    let settings = match &cli.settings {
        Some(path) => load_solver_settings(path)
            .with_context(|| format!("loading solver settings from {}", path.display()))?,
        None => SolverSettings::default(),
    };

    match cli.command {
        Command::Solve(args) => run_solve(&args, &settings, cli.trace),
        Command::Scenario(args) => run_scenarios(&args, &settings, cli.trace),
        Command::List => {
            for s in scenario::builtin_scenarios() {
                println!("{:<16} {}", s.name, s.description);
            }
            Ok(())
        }
    }
}

fn init_tracing(trace: bool) {
    let filter = if trace {
        EnvFilter::new("uvlambert=debug,uvlambert_solver=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_solve(args: &SolveArgs, settings: &SolverSettings, trace: bool) -> anyhow::Result<()> {
    let solver = LambertSolver::new(scenario::solver_config(settings, args.mu))?;
    let direction = Direction::from(!args.retrograde);
    let request = TransferRequest::new(args.r1, args.r2, args.tof, direction);

    let solution = solve(&solver, &request, settings, trace)?;
    let check = args
        .output
        .validate
        .then(|| validation::validate(&request, &solution, args.mu, args.output.steps));
    print_solution(None, &request, &solution, check.as_ref());

    if let Some(path) = &args.output.json {
        let doc = report::transfer_report(None, args.mu, &request, &solution, check.as_ref());
        json::write_report(path, &doc).with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(())
}

fn run_scenarios(args: &ScenarioArgs, settings: &SolverSettings, trace: bool) -> anyhow::Result<()> {
    let scenarios = select_scenarios(args)?;

    let mut csv_out = match &args.csv {
        Some(path) => {
            let mut writer = writer_for_path(path).with_context(|| format!("creating {}", path.display()))?;
            csv::write_header(writer.as_mut())?;
            Some(writer)
        }
        None => None,
    };

    let mut documents = Vec::with_capacity(scenarios.len());
    for s in &scenarios {
        let solver = s.solver(settings)?;
        let solution = solve(&solver, &s.request, settings, trace)
            .with_context(|| format!("scenario `{}`", s.name))?;
        let check = args
            .output
            .validate
            .then(|| validation::validate(&s.request, &solution, s.mu(), args.output.steps));
        print_solution(Some(s), &s.request, &solution, check.as_ref());

        if let Some(writer) = csv_out.as_mut() {
            report::csv_record(&s.name, s.mu(), &s.request, &solution, check.as_ref()).write_to(writer.as_mut())?;
        }
        documents.push(report::transfer_report(
            Some(&s.name),
            s.mu(),
            &s.request,
            &solution,
            check.as_ref(),
        ));
    }
    if let Some(writer) = csv_out.as_mut() {
        writer.flush()?;
    }

    if let Some(path) = &args.output.json {
        for doc in &documents {
            let target = json_target(path, doc.scenario.as_deref(), documents.len());
            json::write_report(&target, doc).with_context(|| format!("writing {}", target.display()))?;
        }
    }
    Ok(())
}

fn select_scenarios(args: &ScenarioArgs) -> anyhow::Result<Vec<Scenario>> {
    let Some(file) = &args.file else {
        let name = args
            .name
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("give a scenario name or --file (see `lambert list`)"))?;
        return Ok(vec![scenario::find_builtin(name)?]);
    };

    let bodies = if args.bodies.exists() {
        load_bodies(&args.bodies).with_context(|| format!("loading bodies from {}", args.bodies.display()))?
    } else {
        Vec::new()
    };
    let mut scenarios = scenario::load_scenarios(file, &bodies)
        .with_context(|| format!("loading scenarios from {}", file.display()))?;
    if let Some(name) = &args.name {
        scenarios.retain(|s| s.name.eq_ignore_ascii_case(name));
        if scenarios.is_empty() {
            anyhow::bail!("scenario `{name}` not found in {}", file.display());
        }
    }
    Ok(scenarios)
}

fn solve(
    solver: &LambertSolver,
    request: &TransferRequest,
    settings: &SolverSettings,
    trace: bool,
) -> Result<TransferSolution, uvlambert::LambertError> {
    if trace {
        let every = settings.trace_every.unwrap_or(TracingObserver::DEFAULT_EVERY);
        solver.solve_observed(request, &mut TracingObserver::new(every))
    } else {
        solver.solve_observed(request, &mut NoopObserver)
    }
}

/// Several reports share one `--json` path by suffixing the scenario name to its stem.
fn json_target(path: &Path, scenario: Option<&str>, count: usize) -> PathBuf {
    match scenario {
        Some(name) if count > 1 && path != Path::new("-") => {
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("report");
            path.with_file_name(format!("{stem}_{name}.json"))
        }
        _ => path.to_path_buf(),
    }
}

fn print_solution(
    scenario: Option<&Scenario>,
    request: &TransferRequest,
    solution: &TransferSolution,
    check: Option<&ValidationReport>,
) {
    if let Some(s) = scenario {
        println!("=== {} ({}) ===", s.name, s.body.name);
    } else {
        println!("=== Lambert transfer ===");
    }
    println!("Initial position (km)   : {}", format_vector(&request.r1));
    println!("Final position (km)     : {}", format_vector(&request.r2));
    println!(
        "Time of flight (s)      : {} ({:.2} h, {})",
        request.time_of_flight,
        units::seconds_to_hours(request.time_of_flight),
        request.direction.label()
    );
    println!("Initial velocity (km/s) : {}", format_vector(&solution.v1));
    println!("Final velocity (km/s)   : {}", format_vector(&solution.v2));
    println!(
        "Transfer angle          : {:.3} deg, z = {:.6}, {} iterations",
        solution.transfer_angle_rad.to_degrees(),
        solution.z,
        solution.iterations
    );

    if let Some(v) = check {
        println!("Initial orbital energy  : {:.2} km^2/s^2", v.departure_energy);
        println!("Final orbital energy    : {:.2} km^2/s^2", v.arrival_energy);
        println!("Energy difference       : {:.2e} km^2/s^2", v.energy_difference);
        println!(
            "Angular momentum        : {:.3} / {:.3} km^2/s",
            v.departure_angular_momentum, v.arrival_angular_momentum
        );
        println!(
            "Propagation error       : {:.3} km, {:.2e} km/s ({} RK4 steps)",
            v.position_error_km, v.velocity_error_km_s, v.propagation_steps
        );
        println!(
            "Relative errors         : {:.2e} position, {:.2e} velocity",
            v.relative_position_error, v.relative_velocity_error
        );
        println!("Minimum transfer time   : {:.2} s", v.minimum_transfer_time_s);
        if v.faster_than_minimum(request.time_of_flight) {
            tracing::warn!(
                tof = request.time_of_flight,
                minimum = v.minimum_transfer_time_s,
                "time of flight is below the chord estimate"
            );
        }
    }
}

fn format_vector(v: &[f64; 3]) -> String {
    format!("[{:.5}, {:.5}, {:.5}]", v[0], v[1], v[2])
}

fn parse_vector(raw: &str) -> Result<[f64; 3], String> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    let [x, y, z] = parts.as_slice() else {
        return Err(format!("expected X,Y,Z but got `{raw}`"));
    };
    let parse = |s: &str| s.parse::<f64>().map_err(|e| format!("`{s}`: {e}"));
    Ok([parse(*x)?, parse(*y)?, parse(*z)?])
}
