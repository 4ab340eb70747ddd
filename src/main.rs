#![forbid(unsafe_code)]
//! Evidence Map Command Line Interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;

use evmap::commands::{
    execute_burden, execute_evolution, execute_init, execute_interventions, execute_matrix,
    execute_rigor, execute_synthesis, execute_validate, BurdenOptions, EvolutionOptions,
    InitOptions, InterventionsOptions, MatrixOptions, RigorOptions, SynthesisOptions,
    ValidateOptions,
};
use evmap::Config;

#[derive(Parser)]
#[command(name = "evmap")]
#[command(about = "Evidence scoring and aggregation for education research maps")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true, default_value = ".evmap.config.json")]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize an evidence-map project
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,

        /// Snapshot file path
        #[arg(long)]
        store: Option<PathBuf>,

        /// Synthesis cache file path
        #[arg(long)]
        synthesis_cache: Option<PathBuf>,

        /// Skip interactive prompts (use defaults + CLI args)
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Build the outcome-centric problem burden map
    Burden {
        /// Write JSON to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Human-readable table instead of JSON
        #[arg(long)]
        table: bool,
    },

    /// Build the objective-centric intervention evidence map
    Interventions {
        /// Write JSON to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Human-readable table instead of JSON
        #[arg(long)]
        table: bool,
    },

    /// Build the rigor-filtered map, or drill into one objective
    Rigor {
        /// Drill down into one broadened objective's interventions
        #[arg(long)]
        objective: Option<String>,

        /// Write JSON to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Human-readable table instead of JSON
        #[arg(long)]
        table: bool,
    },

    /// Chart cumulative evidence over time for a broadened objective
    Evolution {
        /// Broadened objective to chart
        objective: String,

        /// One series per intervention instead of the objective aggregate
        #[arg(long)]
        by_intervention: bool,

        /// Write JSON to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Human-readable table instead of JSON
        #[arg(long)]
        table: bool,
    },

    /// Show the objective × outcome evidence matrix, or one cell's records
    Matrix {
        /// List one cell's records instead of the full grid
        #[arg(long)]
        objective: Option<String>,

        /// Outcome for cell listing (requires --objective)
        #[arg(long)]
        outcome: Option<String>,

        /// Write JSON to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Human-readable grid instead of JSON
        #[arg(long)]
        table: bool,
    },

    /// Generate or refresh AI syntheses for matrix cells
    Synthesis {
        /// Implementation objective of the cell
        #[arg(long)]
        objective: Option<String>,

        /// Outcome of the cell
        #[arg(long)]
        outcome: Option<String>,

        /// Regenerate even when a cached entry exists
        #[arg(long)]
        force: bool,

        /// Walk every objective × outcome cell
        #[arg(long)]
        all: bool,

        /// Write JSON to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a snapshot file
    Validate {
        /// Snapshot file to validate
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    // Load config
    let config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        Config::default()
    };

    // Most commands require an initialized project
    let requires_config = !matches!(
        cli.command,
        Commands::Init { .. } | Commands::Validate { .. }
    );
    if requires_config && !cli.config.exists() {
        eprintln!(
            "{} No {} found in project root",
            style("✗").red(),
            cli.config.display()
        );
        eprintln!("  Run 'evmap init' to initialize the project");
        std::process::exit(1);
    }

    match cli.command {
        Commands::Init {
            force,
            store,
            synthesis_cache,
            yes,
        } => {
            let options = InitOptions {
                force,
                store,
                synthesis_cache,
                yes,
            };
            execute_init(options)?;
        }

        Commands::Burden { output, table } => {
            let options = BurdenOptions { output, table };
            execute_burden(options, config)?;
        }

        Commands::Interventions { output, table } => {
            let options = InterventionsOptions { output, table };
            execute_interventions(options, config)?;
        }

        Commands::Rigor {
            objective,
            output,
            table,
        } => {
            let options = RigorOptions {
                objective,
                output,
                table,
            };
            execute_rigor(options, config)?;
        }

        Commands::Evolution {
            objective,
            by_intervention,
            output,
            table,
        } => {
            let options = EvolutionOptions {
                objective,
                by_intervention,
                output,
                table,
            };
            execute_evolution(options, config)?;
        }

        Commands::Matrix {
            objective,
            outcome,
            output,
            table,
        } => {
            let options = MatrixOptions {
                objective,
                outcome,
                output,
                table,
            };
            execute_matrix(options, config)?;
        }

        Commands::Synthesis {
            objective,
            outcome,
            force,
            all,
            output,
        } => {
            let options = SynthesisOptions {
                objective,
                outcome,
                force,
                all,
                output,
            };
            execute_synthesis(options, config)?;
        }

        Commands::Validate { file } => {
            let options = ValidateOptions { file };
            execute_validate(options)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "evmap=debug" } else { "evmap=warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_env("EVMAP_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
