//! outage-sync - Synchronizes device outages for a site
//!
//! This is the command entry point: it merges configuration from a file, the
//! environment and the command line, then runs one synchronization.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use outage_sync::config::Config;
use outage_sync::logging::init_tracing;

const USAGE_HINT: &str = "Run 'outage-sync --help' for usage.";

/// outage-sync - Synchronizes device outages for a site
#[derive(Parser, Debug)]
#[command(name = "outage-sync")]
#[command(author, about, long_about = None, disable_version_flag = true)]
struct Args {
    /// Site whose outages are synchronized
    #[arg(short, long)]
    site_id: Option<String>,

    /// API key for the outage API
    #[arg(short, long, env = "OUTAGE_SYNC_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Base URI of the outage API
    #[arg(short, long)]
    base_uri: Option<String>,

    /// Ignore outages that began before this time (e.g. 2022-01-01T00:00:00.000Z)
    #[arg(short, long)]
    cutoff: Option<String>,

    /// Path to the configuration file
    #[arg(long, env = "OUTAGE_SYNC_CONFIG")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Log format (pretty, json)
    #[arg(long)]
    log_format: Option<String>,

    /// Print version information and exit
    #[arg(short = 'V', long)]
    version: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if args.version {
        println!("{}", outage_sync::version_string());
        return ExitCode::SUCCESS;
    }

    let config = match load_config(&args).and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            eprintln!("{}", USAGE_HINT);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing(&config.logging.level, &config.logging.format) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    info!(version = outage_sync::VERSION, site_id = %config.sync.site_id, "Starting outage-sync");

    match outage_sync::run(&config).await {
        Ok(report) => {
            info!(submitted = report.submitted, "Synchronization finished");
            println!("Site outages updated.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Synchronization failed");
            eprintln!("Error: {}", e.message());
            ExitCode::FAILURE
        }
    }
}

/// Load configuration from file and environment, then apply command-line overrides
fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            // Use eprintln! since tracing is not yet initialized
            eprintln!("Loading configuration from file: {}", path);
            Config::from_file(path).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?
        }
        None => Config::default(),
    };
    config
        .apply_env()
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    if let Some(site_id) = &args.site_id {
        config.sync.site_id = site_id.clone();
    }
    if let Some(api_key) = &args.api_key {
        config.api.api_key = Some(api_key.clone());
    }
    if let Some(base_uri) = &args.base_uri {
        config.api.base_uri = base_uri.clone();
    }
    if let Some(cutoff) = &args.cutoff {
        config.sync.cutoff = cutoff.clone();
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if let Some(format) = &args.log_format {
        config.logging.format = format.clone();
    }

    Ok(config)
}
