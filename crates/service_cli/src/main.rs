//! blackasian - launcher CLI for the accelerated Black-Asian pricing kernel.
//!
//! Parses the job parameters, loads the precompiled accelerator binary
//! named by `-a`, drives exactly one kernel invocation through the
//! `accel_runtime` pipeline, and reports the call and put prices,
//! optionally with deviations against reference values.
//!
//! # Usage
//!
//! ```text
//! blackasian -a kernel.bin -s 100 -k 110 -r 0.05 -v 0.2 -t 1.0 [-c callRef] [-p putRef]
//! ```
//!
//! # Exit status
//!
//! - `0` success
//! - `2` usage or configuration error
//! - `3` accelerator program build failure (diagnostics printed)
//! - `1` any other device error

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use accel_core::{PricingParameters, PricingReport, ReferenceValues, ReportFormat};
use accel_runtime::{launch, BinaryImage, LaunchError, LaunchOptions, SimAccelerator};

mod config;
mod error;

use config::LauncherConfig;
pub use error::{CliError, Result};

/// Launch one Black-Asian pricing job on an accelerator device
#[derive(Parser, Debug)]
#[command(name = "blackasian", version, about, long_about = None)]
struct Cli {
    /// Path to the precompiled accelerator binary
    #[arg(short = 'a', long = "binary", value_name = "FILE")]
    binary: PathBuf,

    /// Stock price at time zero (S0)
    #[arg(short = 's', long = "spot", allow_negative_numbers = true)]
    spot: f64,

    /// Strike price (K)
    #[arg(short = 'k', long = "strike", allow_negative_numbers = true)]
    strike: f64,

    /// Risk-free interest rate
    #[arg(short = 'r', long = "rate", allow_negative_numbers = true)]
    rate: f64,

    /// Volatility of the stock
    #[arg(short = 'v', long = "volatility", allow_negative_numbers = true)]
    volatility: f64,

    /// Time period of the option in years (T)
    #[arg(short = 't', long = "maturity", allow_negative_numbers = true)]
    maturity: f64,

    /// Reference call price, reported against as a percentage deviation
    #[arg(short = 'c', long = "call-ref", value_name = "PRICE", allow_negative_numbers = true)]
    call_ref: Option<f64>,

    /// Reference put price, reported against as a percentage deviation
    #[arg(short = 'p', long = "put-ref", value_name = "PRICE", allow_negative_numbers = true)]
    put_ref: Option<f64>,

    /// Configuration file path
    #[arg(long, default_value = "blackasian.toml", value_name = "FILE")]
    config: PathBuf,

    /// Output format (text, json); overrides the config file
    #[arg(short = 'f', long)]
    format: Option<ReportFormat>,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // clap renders usage itself and exits 2 on bad arguments.
        Err(err) => err.exit(),
    };

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(err.exit_code());
        }
    };

    init_tracing(&config.log_level, cli.verbose);

    if let Err(err) = run(&cli, &config) {
        eprintln!("Error: {}", err);
        process::exit(err.exit_code());
    }
}

fn load_config(cli: &Cli) -> Result<LauncherConfig> {
    let config = LauncherConfig::load_or_default(&cli.config)?.with_env_override();
    config.validate()?;
    Ok(config)
}

fn init_tracing(log_level: &str, verbose: bool) {
    let directive = if verbose { "debug" } else { log_level };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    // Logs go to stderr; stdout carries only the report.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: &Cli, config: &LauncherConfig) -> Result<()> {
    let format = match cli.format {
        Some(format) => format,
        None => config.report_format()?,
    };
    let params =
        PricingParameters::new(cli.spot, cli.strike, cli.rate, cli.volatility, cli.maturity);
    let references = ReferenceValues::new(cli.call_ref, cli.put_ref);

    info!(binary = %cli.binary.display(), "loading accelerator binary");
    let image = BinaryImage::from_file(&cli.binary).map_err(LaunchError::from)?;

    let options = LaunchOptions {
        entry_point: config.entry_point.clone(),
        device_index: config.device_index,
    };
    let mut accelerator = SimAccelerator::new();
    let result = launch(&mut accelerator, &image, &params, &options)?;

    let report = PricingReport::new(result, references);
    println!("{}", report.render(format)?);
    Ok(())
}
