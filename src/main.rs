use clap::{Parser, Subcommand};
use spimkit::{init_logging, AxisCoordinate};
use std::path::PathBuf;
use std::process::ExitCode;

mod cli;

#[derive(Parser)]
#[command(name = "spimkit")]
#[command(about = "Tile geometry and axis remapping for light-sheet microscopes")]
#[command(version)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file, .toml or .json (default: <config dir>/spimkit/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the tile grid for the configured tile specs
    Plan {
        /// Corner of the first tile in micrometers, as x,y,z
        #[arg(short, long, value_parser = cli::parse_coordinate, allow_hyphen_values = true)]
        start: Option<AxisCoordinate<f64>>,

        /// Print the planned grid as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check the configured scan against the simulated stage travel limits
    Check {
        /// Corner of the first tile in micrometers, as x,y,z (default: current stage position)
        #[arg(short, long, value_parser = cli::parse_coordinate, allow_hyphen_values = true)]
        start: Option<AxisCoordinate<f64>>,
    },

    /// Convert a native stage coordinate to display axes
    Remap {
        /// Coordinate as x,y,z
        #[arg(value_parser = cli::parse_coordinate, allow_hyphen_values = true)]
        coords: AxisCoordinate<f64>,

        /// Convert display axes back to native stage axes
        #[arg(short, long)]
        inverse: bool,
    },

    /// Show one tile-spec field, or every field with its allowed range
    Get {
        /// Field name
        key: Option<String>,
    },

    /// Change a tile-spec field and save the configuration
    Set {
        /// Field name
        key: String,

        /// New value
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Write a default configuration file
    InitConfig {
        /// Destination (default: the --config path or the platform config dir)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Set RUST_LOG to override, e.g. RUST_LOG=spimkit_tiling=debug
    init_logging(cli.verbose)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Plan { start, json } => cli::plan(config_path, start, json),
        Commands::Check { start } => cli::check(config_path, start),
        Commands::Remap { coords, inverse } => cli::remap(config_path, coords, inverse),
        Commands::Get { key } => cli::get(config_path, key.as_deref()),
        Commands::Set { key, value } => cli::set(config_path, &key, &value),
        Commands::InitConfig { path, force } => {
            cli::init_config(path.as_deref().or(config_path), force)
        }
    }
}
