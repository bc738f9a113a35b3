//! osd-env
//!
//! Reads an OSD deployment descriptor and prints the container environment
//! the provisioning agent expects, as a list of Kubernetes `EnvVar`s.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use k8s_openapi::api::core::v1::EnvVar;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use osd_env_materializer::config::{load_config, load_descriptor};
use osd_env_materializer::env::to_env_vars;
use osd_env_materializer::{Materializer, MaterializerConfig};

// =============================================================================
// CLI Arguments
// =============================================================================

/// Which container environment to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Base OSD environment
    Base,
    /// Base environment plus device selection for the prepare job
    Prepare,
    /// Activation step environment
    Activate,
}

/// Output encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Output {
    Yaml,
    Json,
}

/// OSD environment materializer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Deployment descriptor (YAML, or JSON with a .json extension); not
    /// needed for activate
    #[arg(long, env = "OSD_DESCRIPTOR")]
    descriptor: Option<PathBuf>,

    /// Naming configuration file
    #[arg(long, env = "OSD_ENV_CONFIG")]
    config: Option<PathBuf>,

    /// Environment to produce
    #[arg(long, value_enum, default_value = "base")]
    mode: Mode,

    /// Output encoding
    #[arg(long, value_enum, default_value = "yaml")]
    output: Output,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

// =============================================================================
// Main
// =============================================================================

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logging(&args);

    info!("osd-env {}", osd_env_materializer::VERSION);

    let config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => MaterializerConfig::default(),
    };
    let materializer = Materializer::new(config);

    let entries = match args.mode {
        Mode::Activate => materializer.materialize_activate(),
        mode => {
            let path = args
                .descriptor
                .as_ref()
                .context("--descriptor is required for this mode")?;
            let descriptor = load_descriptor(path)
                .with_context(|| format!("failed to load descriptor {}", path.display()))?;

            if mode == Mode::Prepare {
                materializer.materialize_prepare(&descriptor)?
            } else {
                materializer.materialize_base(&descriptor)?
            }
        }
    };

    info!("Produced {} environment entries ({:?})", entries.len(), args.mode);

    let vars: Vec<EnvVar> = to_env_vars(entries);
    let rendered = match args.output {
        Output::Yaml => serde_yaml::to_string(&vars)?,
        Output::Json => serde_json::to_string_pretty(&vars)?,
    };
    println!("{}", rendered);

    Ok(())
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // stdout carries the rendered environment
    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
