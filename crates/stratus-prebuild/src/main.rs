//! Stratus prebuild driver.
//!
//! Loads the host-model configuration, the structured metadata tables,
//! and the selected suite definitions; runs the resolution pipeline; and
//! emits the schemes and typedefs build fragments. Any resolution failure
//! terminates with a non-zero exit code and leaves existing artifacts
//! untouched.

// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod artifact;
mod config;
mod emit;
mod error;
mod suites;
mod tables;

use clap::Parser;
use config::Config;
use error::{Error, Result};
use std::path::PathBuf;
use stratus_resolve::{pipeline, PrebuildInput};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "stratus-prebuild")]
#[command(about = "Resolve scheme metadata against the host model and emit build fragments")]
struct Cli {
    /// Path to the host-model prebuild configuration file
    #[arg(long)]
    config: PathBuf,

    /// Suite definition files to use (comma-separated names, without path)
    #[arg(long, value_delimiter = ',')]
    suites: Vec<String>,

    /// Relative path to the build directory
    #[arg(long)]
    builddir: Option<String>,

    /// Enable verbose output
    #[arg(long)]
    verbose: bool,

    /// Remove files created by this tool, then exit
    #[arg(long)]
    clean: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    if let Err(err) = run(cli) {
        error!("{}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(&cli.config, cli.builddir.as_deref())?;

    if cli.clean {
        return clean(&config);
    }

    let suite_names = if cli.suites.is_empty() {
        suites::discover_suites(&config.suites_dir)?
    } else {
        cli.suites.clone()
    };
    let suites = suites::load_suites(&config.suites_dir, &suite_names)?;

    let (defined, host_dependencies) = tables::load_variable_tables(&config.variable_table_files)?;
    let schemes = tables::load_scheme_tables(&config.scheme_table_files)?;

    let input = PrebuildInput {
        defined,
        host_dependencies,
        schemes,
        suites,
        conventions: config.conventions.clone(),
    };

    let output = match pipeline::run(input) {
        Ok(output) => output,
        Err(diagnostics) => {
            let mut error_count = 0;
            for diag in &diagnostics {
                if diag.is_error() {
                    error_count += 1;
                    error!("{}", diag);
                } else {
                    tracing::warn!("{}", diag);
                }
            }
            return Err(Error::Resolve(error_count));
        }
    };

    let compile_set: Vec<String> = output
        .compile_set
        .iter()
        .map(|path| path.display().to_string())
        .collect();
    emit::emit_fragments(&config.schemes, "STRATUS_SCHEMES", &compile_set)?;
    emit::emit_fragments(&config.typedefs, "STRATUS_TYPEDEFS", &output.typedef_modules)?;

    info!(
        host_model = config.host_model.as_str(),
        "prebuild step completed successfully"
    );
    Ok(())
}

fn clean(config: &Config) -> Result<()> {
    info!("performing clean");
    for path in config
        .schemes
        .all()
        .into_iter()
        .chain(config.typedefs.all())
    {
        artifact::remove(path)?;
    }
    info!("prebuild clean completed successfully");
    Ok(())
}
