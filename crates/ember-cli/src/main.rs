//! Ember CLI - Command-line interface for Ember particle descriptors

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{convert, inspect, simulate};

#[derive(Parser)]
#[command(name = "ember")]
#[command(about = "Inspect, simulate and convert particle descriptors", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a summary of a descriptor
    Inspect {
        /// Path to a .pex or .toml descriptor
        descriptor: String,

        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = parse_format)]
        format: String,
    },

    /// Run a descriptor headlessly and report live particle counts
    Simulate {
        /// Path to a .pex or .toml descriptor
        descriptor: String,

        /// Simulated time in seconds
        #[arg(long, default_value = "5.0")]
        seconds: f64,

        /// Frames per second
        #[arg(long, default_value = "60")]
        fps: u32,

        /// Variance generator seed
        #[arg(long, default_value_t = ember_particles::DEFAULT_SEED)]
        seed: u32,

        /// Emit a burst of this many seconds instead of starting the emitter
        #[arg(long)]
        burst: Option<f32>,
    },

    /// Convert between .pex and .toml descriptors
    Convert {
        /// Source descriptor
        input: String,

        /// Destination descriptor; the extension picks the format
        output: String,
    },
}

fn parse_format(s: &str) -> Result<String, String> {
    match s {
        "text" | "json" => Ok(s.to_string()),
        _ => Err(format!("unknown format '{}'; valid values: text, json", s)),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { descriptor, format } => inspect::run(&descriptor, &format),
        Commands::Simulate {
            descriptor,
            seconds,
            fps,
            seed,
            burst,
        } => simulate::run(simulate::SimulateArgs {
            descriptor,
            seconds,
            fps,
            seed,
            burst,
        }),
        Commands::Convert { input, output } => convert::run(&input, &output),
    }
}
