//! tokenc CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokenc_core::export::DEFAULT_MAX_PASSES;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "tokenc")]
#[command(version)]
#[command(about = "Compile design tokens for each target platform", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export every configured platform (or the selected ones) to JSON
    Build {
        /// Config file (JSON or YAML)
        #[arg(short, long, default_value = "tokenc.json")]
        config: PathBuf,

        /// Platform to export; repeat for several (defaults to all)
        #[arg(short, long)]
        platform: Vec<String>,

        /// Write output to DIR instead of each platform's buildPath
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Print the exported trees to stdout instead of writing files
        #[arg(long)]
        stdout: bool,

        /// Maximum transform/resolve passes per platform
        #[arg(
            long,
            default_value_t = DEFAULT_MAX_PASSES,
            value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
        )]
        max_passes: usize,
    },

    /// List the built-in transforms and transform groups
    Transforms,
}

fn main() -> Result<()> {
    // Initialize logging; stdout is reserved for `build --stdout`
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tokenc=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            config,
            platform,
            out_dir,
            stdout,
            max_passes,
        } => commands::build::execute(commands::build::BuildArgs {
            config,
            platforms: platform,
            out_dir,
            stdout,
            max_passes,
        }),
        Commands::Transforms => commands::transforms::execute(),
    }
}
