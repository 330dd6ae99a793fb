//! Equilibria CLI.
//!
//! Commands:
//! - solve: Newton–Raphson search for the Lotka–Volterra coexistence point
//! - inspect: Analytic equilibria of a parameter set and their stability

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use equilibria_core::config::SolverConfig;
use equilibria_core::equilibrium::{EquilibriumSolver, Termination};
use equilibria_core::lotka_volterra::LotkaVolterra;
use equilibria_core::stability::{classify_equilibrium, StabilityReport};

#[derive(Parser)]
#[command(name = "equilibria")]
#[command(version)]
#[command(about = "Newton-Raphson equilibrium solver for the Lotka-Volterra system")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Iterate from an initial guess toward the coexistence equilibrium
    Solve {
        #[command(flatten)]
        model: ModelArgs,

        /// Prey component of the initial guess
        #[arg(long)]
        x0: Option<f64>,

        /// Predator component of the initial guess
        #[arg(long)]
        y0: Option<f64>,

        /// Absolute tolerance on the prey component
        #[arg(long)]
        tol_prey: Option<f64>,

        /// Absolute tolerance on the predator component
        #[arg(long)]
        tol_predator: Option<f64>,

        /// Maximum number of Newton updates
        #[arg(long)]
        max_steps: Option<usize>,

        /// Print the final report as JSON instead of the iterate trace
        #[arg(long)]
        json: bool,
    },

    /// Print the analytic equilibria and their linear stability
    Inspect {
        #[command(flatten)]
        model: ModelArgs,
    },
}

/// Model parameters shared by every command. Flags override the config file.
#[derive(Args, Default)]
struct ModelArgs {
    /// JSON config file (missing fields use the built-in defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Prey growth rate
    #[arg(long)]
    alpha: Option<f64>,

    /// Predation rate
    #[arg(long)]
    beta: Option<f64>,

    /// Predator death rate
    #[arg(long)]
    gamma: Option<f64>,

    /// Predator growth per prey consumed
    #[arg(long)]
    delta: Option<f64>,
}

impl ModelArgs {
    fn load(&self) -> Result<SolverConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => SolverConfig::default(),
        };
        let params = &mut config.params;
        if let Some(alpha) = self.alpha {
            params.alpha = alpha;
        }
        if let Some(beta) = self.beta {
            params.beta = beta;
        }
        if let Some(gamma) = self.gamma {
            params.gamma = gamma;
        }
        if let Some(delta) = self.delta {
            params.delta = delta;
        }
        Ok(config)
    }
}

fn load_config(path: &Path) -> Result<SolverConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

fn format_state(state: &[f64; 2]) -> String {
    format!("[{}, {}]", state[0], state[1])
}

fn print_stability(label: &str, state: &[f64; 2], report: &StabilityReport) {
    println!("{}: {}", label, format_state(state));
    println!("  stability: {:?}", report.kind);
    for eig in &report.eigenvalues {
        println!("  eigenvalue: {:.6} {:+.6}i", eig.re, eig.im);
    }
}

fn run_solve(
    mut config: SolverConfig,
    x0: Option<f64>,
    y0: Option<f64>,
    tol_prey: Option<f64>,
    tol_predator: Option<f64>,
    max_steps: Option<usize>,
    json: bool,
) -> Result<()> {
    if let Some(x0) = x0 {
        config.initial_guess[0] = x0;
    }
    if let Some(y0) = y0 {
        config.initial_guess[1] = y0;
    }
    if let Some(tol) = tol_prey {
        config.tolerance[0] = tol;
    }
    if let Some(tol) = tol_predator {
        config.tolerance[1] = tol;
    }
    if let Some(max_steps) = max_steps {
        config.max_steps = max_steps;
    }
    config.validate().context("Invalid configuration")?;

    let system = LotkaVolterra::new(config.params)?;
    let target = config.params.coexistence_equilibrium();
    info!(
        x = target[0],
        y = target[1],
        "analytic equilibrium (gamma/delta, alpha/beta)"
    );

    let mut solver =
        EquilibriumSolver::new(system, target, config.initial_guess(), config.settings())?;
    while !solver.is_done() {
        solver.step().context("Newton iteration failed")?;
        if !json {
            if let Some(iterate) = solver.trace().last() {
                println!("{:>4}: {}", solver.iterations(), format_state(iterate));
            }
        }
    }

    let report = solver
        .report()
        .context("Solver stopped without a termination reason")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match report.termination {
        Termination::Converged => println!(
            "Converged to {} after {} iterations (|error| = {}).",
            format_state(&report.state),
            report.iterations,
            format_state(&report.error)
        ),
        Termination::Degenerate => println!("{}", report.termination.message()),
        Termination::CapExhausted => println!(
            "No convergence after {} iterations; last iterate {}.",
            report.iterations,
            format_state(&report.state)
        ),
    }
    Ok(())
}

fn run_inspect(config: SolverConfig) -> Result<()> {
    let system = LotkaVolterra::new(config.params).context("Invalid model parameters")?;
    let params = system.params();

    let coexistence = params.coexistence_equilibrium();
    let extinction = params.extinction_equilibrium();
    print_stability(
        "coexistence",
        &[coexistence[0], coexistence[1]],
        &classify_equilibrium(&system, &coexistence),
    );
    print_stability(
        "extinction",
        &[extinction[0], extinction[1]],
        &classify_equilibrium(&system, &extinction),
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Solve {
            model,
            x0,
            y0,
            tol_prey,
            tol_predator,
            max_steps,
            json,
        } => run_solve(model.load()?, x0, y0, tol_prey, tol_predator, max_steps, json),
        Commands::Inspect { model } => run_inspect(model.load()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_solve_flags() {
        let cli = Cli::try_parse_from([
            "equilibria",
            "solve",
            "--alpha",
            "2",
            "--x0",
            "4",
            "--max-steps",
            "5",
            "--json",
        ])
        .expect("parse");

        match cli.command {
            Commands::Solve {
                model,
                x0,
                max_steps,
                json,
                ..
            } => {
                assert_eq!(model.alpha, Some(2.0));
                assert_eq!(x0, Some(4.0));
                assert_eq!(max_steps, Some(5));
                assert!(json);
            }
            Commands::Inspect { .. } => panic!("expected solve"),
        }
    }

    #[test]
    fn flags_override_config_file() {
        let path = std::env::temp_dir().join(format!(
            "equilibria-cli-test-{}.json",
            std::process::id()
        ));
        let mut file = fs::File::create(&path).expect("create config");
        write!(
            file,
            r#"{{ "params": {{ "alpha": 2.0, "beta": 1.0, "gamma": 1.0, "delta": 0.5 }}, "max_steps": 9 }}"#
        )
        .expect("write config");

        let args = ModelArgs {
            config: Some(path.clone()),
            gamma: Some(3.0),
            ..ModelArgs::default()
        };
        let config = args.load().expect("load");
        fs::remove_file(&path).ok();

        assert_eq!(config.params.alpha, 2.0);
        assert_eq!(config.params.gamma, 3.0);
        assert_eq!(config.max_steps, 9);
    }

    #[test]
    fn missing_config_file_is_reported() {
        let args = ModelArgs {
            config: Some(PathBuf::from("/nonexistent/equilibria.json")),
            ..ModelArgs::default()
        };
        let err = args.load().expect_err("missing file");
        assert!(format!("{err:#}").contains("Failed to read config file"));
    }

    #[test]
    fn solve_rejects_invalid_overrides() {
        let err = run_solve(
            SolverConfig::default(),
            None,
            None,
            Some(-1.0),
            None,
            None,
            true,
        )
        .expect_err("negative tolerance");
        assert!(format!("{err:#}").contains("Invalid configuration"));
    }

    #[test]
    fn solve_default_config_succeeds() {
        run_solve(SolverConfig::default(), None, None, None, None, None, true).expect("solve");
    }
}
