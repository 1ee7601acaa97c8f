use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use sf_core::Tolerances;
use sf_lci::{InventoryConfig, InventoryData, InventoryError};
use sf_solver::{
    NamedAssignment, ReplaySolver, RunResult, SolverError, SolverSettings, solve_model,
};
use sf_superstructure::{AssemblyError, Connector, Superstructure};

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid --pin {0}: expected <flow name>=<value>")]
    Pin(String),

    #[error("Solve did not produce a solution: {0}")]
    NoSolution(String),
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "sf-cli")]
#[command(about = "synflow CLI - superstructure and life-cycle inventory models", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check inventory data and configuration, and list what they contain
    Inventory {
        /// Technology matrix (YAML)
        data_path: PathBuf,
        /// Scale, scenarios, deactivations and caps (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate solver settings
    Settings {
        /// Solver settings (YAML)
        settings_path: PathBuf,
    },
    /// Report an externally solved technology-choice run
    Report {
        /// Technology matrix (YAML)
        data_path: PathBuf,
        /// Assignment written by the external solver (JSON)
        solution_path: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        settings: Option<PathBuf>,
        /// Fix a connector, e.g. "Hydrogen (H2) [kg]=-1000"
        #[arg(long = "pin")]
        pins: Vec<String>,
        /// Output JSON file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> CliResult<()> {
    // Logs go to stderr so a report printed to stdout stays valid JSON.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inventory { data_path, config } => cmd_inventory(&data_path, config.as_deref()),
        Commands::Settings { settings_path } => cmd_settings(&settings_path),
        Commands::Report {
            data_path,
            solution_path,
            config,
            settings,
            pins,
            output,
        } => cmd_report(
            &data_path,
            &solution_path,
            config.as_deref(),
            settings.as_deref(),
            &pins,
            output.as_deref(),
        ),
    }
}

fn load_config(path: Option<&Path>) -> CliResult<InventoryConfig> {
    Ok(match path {
        Some(p) => InventoryConfig::load_yaml(p)?,
        None => InventoryConfig::default(),
    })
}

fn parse_pin(raw: &str) -> CliResult<(Connector, f64)> {
    let (name, value) = raw
        .rsplit_once('=')
        .ok_or_else(|| CliError::Pin(raw.to_string()))?;
    let connector: Connector = name.trim().parse()?;
    let value = value
        .trim()
        .parse()
        .map_err(|_| CliError::Pin(raw.to_string()))?;
    Ok((connector, value))
}

fn cmd_inventory(data_path: &Path, config_path: Option<&Path>) -> CliResult<()> {
    println!("Loading inventory: {}", data_path.display());
    let data = InventoryData::load_yaml(data_path)?;
    let config = load_config(config_path)?;
    let model = Superstructure::inventory_only("inventory", data, &config, [])?;

    let Some(lci) = model.inventory() else {
        return Ok(());
    };
    println!("✓ Inventory is valid");
    println!("  Processes: {}", lci.processes().len());
    println!("  Flows: {}", lci.flows().len());
    println!("  Scale: {}", lci.scale());
    for scenario in config.scenarios()? {
        println!("  Scenario: {}", scenario.name());
    }
    for block in lci.blocks() {
        println!("  {}: {} constraints", block.name(), block.len());
    }
    Ok(())
}

fn cmd_settings(settings_path: &Path) -> CliResult<()> {
    let s = SolverSettings::load_yaml(settings_path)?;
    println!("✓ Settings are valid");
    println!("  NLP solver: {}", s.nlp_solver);
    println!("  MIP solver: {}", s.mip_solver);
    println!("  LP solver: {}", s.lp_solver);
    println!("  Tolerance: {:e}", s.tolerance);
    match s.time_limit_s {
        Some(t) => println!("  Time limit: {t} s"),
        None => println!("  Time limit: none"),
    }
    println!("  Init strategy: {}", s.init_strategy.as_str());
    Ok(())
}

fn cmd_report(
    data_path: &Path,
    solution_path: &Path,
    config_path: Option<&Path>,
    settings_path: Option<&Path>,
    pins: &[String],
    output: Option<&Path>,
) -> CliResult<()> {
    let data = InventoryData::load_yaml(data_path)?;
    let config = load_config(config_path)?;
    let settings = match settings_path {
        Some(p) => SolverSettings::load_yaml(p)?,
        None => SolverSettings::default(),
    };
    let pinned = pins
        .iter()
        .map(|p| parse_pin(p))
        .collect::<CliResult<Vec<_>>>()?;
    info!(pins = pinned.len(), "assembling inventory model");
    let mut model = Superstructure::inventory_only("inventory", data, &config, pinned)?;

    let assignment = NamedAssignment::load_json(solution_path)?;
    info!(
        solution = %solution_path.display(),
        values = assignment.values.len(),
        "replaying external solution"
    );
    let solver = ReplaySolver::new(assignment);
    let run = solve_model(&mut model, &solver, &settings, Tolerances::feasibility())?;

    let solved = match run.result {
        RunResult::Solved(s) => s,
        RunResult::Infeasible => {
            warn!("external solver reported the model infeasible");
            return Err(CliError::NoSolution("infeasible".to_string()));
        }
        RunResult::Failed(msg) => return Err(CliError::NoSolution(msg)),
    };
    let json = solved.to_json()?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            println!("✓ Report written to {}", path.display());
        }
        None => println!("{json}"),
    }
    info!(
        objective = solved.objective.value,
        cradle_to_gate = ?solved.objective.cradle_to_gate,
        gate_to_grave = ?solved.objective.gate_to_grave,
        total_time_s = run.timing.total_time_s,
        "report complete"
    );
    Ok(())
}
