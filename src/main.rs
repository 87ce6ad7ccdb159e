// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, ValueEnum};
use isp_pipeline::{AppResult, FrameworkBackendType, PipelineConfig};
use std::path::PathBuf;
use std::process::ExitCode;

mod cli;

#[derive(Parser)]
#[command(name = "isp-pipeline")]
#[command(about = "Stream a test pattern through the ISP to the video renderer")]
#[command(version = env!("BUILD_VERSION"))]
struct Cli {
    /// JSON configuration file (built-in defaults otherwise)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Visible frame width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Visible frame height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Streaming duration in seconds
    #[arg(short, long)]
    duration: Option<u64>,

    /// Framework backend to drive
    #[arg(short, long, value_enum, default_value_t = Backend::Gstreamer)]
    backend: Backend,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Backend {
    /// Component graph on GStreamer
    Gstreamer,
    /// Record calls in memory and print them (dry run)
    Recording,
}

impl From<Backend> for FrameworkBackendType {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::Gstreamer => FrameworkBackendType::GStreamer,
            Backend::Recording => FrameworkBackendType::Recording,
        }
    }
}

fn main() -> ExitCode {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=isp_pipeline=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let args = Cli::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Framework failures print as `file:line: call: STATUS (0xcode)`
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Cli) -> AppResult<()> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(duration) = args.duration {
        config.run_seconds = duration;
    }
    config.validate()?;

    if args.print_config {
        return cli::print_config(&config);
    }

    cli::run(&config, args.backend.into())
}
