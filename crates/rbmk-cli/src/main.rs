//! RBMK channel case command-line interface.
//!
//! Build a fuel channel model from a TOML case file, write the OpenMC input
//! documents and run the engine:
//! ```sh
//! rbmk run cases/rbmk_reference.toml --threads 8
//! rbmk export cases/rbmk_reference.toml -o ./openmc
//! rbmk validate
//! rbmk layout --json
//! rbmk materials
//! ```
//! Without a case file the reference case is used.

mod config;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rbmk")]
#[command(about = "RBMK fuel channel model builder for OpenMC")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the model, write the engine inputs and run OpenMC.
    Run {
        /// Path to the case file.
        config: Option<PathBuf>,
        /// Output directory (overrides case file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// OpenMC executable (overrides case file setting).
        #[arg(long)]
        openmc: Option<PathBuf>,
        /// OpenMP threads passed to OpenMC.
        #[arg(long)]
        threads: Option<usize>,
        /// Run OpenMC in geometry debug mode (overlap checking).
        #[arg(long)]
        geometry_debug: bool,
    },
    /// Build the model and write the engine inputs without running.
    Export {
        /// Path to the case file.
        config: Option<PathBuf>,
        /// Output directory (overrides case file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Build the model and check it for gaps and overlaps.
    Validate {
        /// Path to the case file.
        config: Option<PathBuf>,
    },
    /// Print the pin positions of the channel.
    Layout {
        /// Path to the case file.
        config: Option<PathBuf>,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// List the standard materials.
    Materials {
        /// Fuel enrichment (wt% U235).
        #[arg(long, default_value_t = rbmk_materials::catalog::DEFAULT_ENRICHMENT)]
        enrichment: f64,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            output,
            openmc,
            threads,
            geometry_debug,
        } => {
            println!("RBMK Channel Model");
            println!("==================");
            let case = config::load_config(config.as_deref())?;
            let model = runner::build_model(&case)?;

            let mut engine = case.engine();
            if let Some(path) = openmc {
                engine.executable = path;
            }
            if threads.is_some() {
                engine.threads = threads;
            }
            engine.geometry_debug |= geometry_debug;

            let out_dir = runner::output_dir(&case, output);
            runner::run_case(&model, &engine, &out_dir)?;
            println!("Run complete.");
            Ok(())
        }
        Commands::Export { config, output } => {
            let case = config::load_config(config.as_deref())?;
            let model = runner::build_model(&case)?;
            let out_dir = runner::output_dir(&case, output);
            runner::export_model(&model, &out_dir)?;
            Ok(())
        }
        Commands::Validate { config } => {
            let case = config::load_config(config.as_deref())?;
            let model = runner::build_model(&case)?;
            if runner::check_coverage(&model) {
                println!("Model is valid.");
                Ok(())
            } else {
                anyhow::bail!("Model has gaps or overlaps");
            }
        }
        Commands::Layout { config, json } => {
            let case = config::load_config(config.as_deref())?;
            let pins = runner::pin_layout(&case)?;
            if json {
                runner::print_layout_json(&pins)?;
            } else {
                runner::print_layout(&pins);
            }
            Ok(())
        }
        Commands::Materials { enrichment } => {
            println!("Standard materials:");
            println!();
            runner::print_materials(enrichment)?;
            Ok(())
        }
    }
}
