//! Digitlens CLI — Command-line interface for digit recognition.
//!
//! Usage:
//!   digitlens classify <IMAGE>   Classify a digit in a still image
//!   digitlens demo [OPTIONS]     Run a synthetic recognition session
//!   digitlens config             Show the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "digitlens",
    about = "Live digit recognition from camera-style frames",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify the digit in a still image
    Classify {
        /// Path to the image file
        image: PathBuf,

        /// Print only the winning digit
        #[arg(long)]
        top: bool,

        /// Emit the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a recognition session over synthetic frames
    Demo {
        /// Number of frames to produce
        #[arg(long, default_value = "30")]
        frames: u64,

        /// Frame width
        #[arg(long, default_value = "640")]
        width: u32,

        /// Frame height
        #[arg(long, default_value = "480")]
        height: u32,

        /// Milliseconds between frames (0 = as fast as possible)
        #[arg(long, default_value = "33")]
        interval_ms: u64,

        /// Print only the winning digit per frame
        #[arg(long)]
        top: bool,
    },

    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    digitlens_common::logging::init_logging(&digitlens_common::config::LoggingConfig {
        level: log_level.to_string(),
        json: false,
    });

    match cli.command {
        Commands::Classify { image, top, json } => commands::classify::run(image, top, json).await,
        Commands::Demo {
            frames,
            width,
            height,
            interval_ms,
            top,
        } => commands::demo::run(frames, width, height, interval_ms, top).await,
        Commands::Config => commands::config::run(),
    }
}
