//! Operator CLI for the booking gateway.
//!
//! ```text
//! booking-gateway [--config FILE] [--read-only] <command>
//!
//!     health                      probe every standard module
//!     status                      admission budget, mode, registered modules
//!     get PATH [--param K=V]...   one GET through the full pipeline
//!     batch PATH...               concurrent GETs, results in order
//! ```
//!
//! Results are printed to stdout as JSON; logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};

use booking_gateway::config::{load_config, load_from_env};
use booking_gateway::error::OperationResult;
use booking_gateway::http::Method;
use booking_gateway::observability::{logging, metrics};
use booking_gateway::{ApiVersion, BatchOperation, Orchestrator, RequestOptions};

#[derive(Parser)]
#[command(name = "booking-gateway")]
#[command(about = "Rate-limited, retrying client for the booking platform API", long_about = None)]
struct Cli {
    /// TOML config file; defaults plus environment when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Refuse every mutating call regardless of config
    #[arg(long)]
    read_only: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe every registered module
    Health,
    /// Show admission budget, mode and registered modules
    Status,
    /// Issue one GET request
    Get {
        path: String,
        #[arg(long)]
        api_version: Option<ApiVersion>,
        /// Query parameter, repeatable
        #[arg(long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },
    /// Issue several GET requests concurrently
    Batch {
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => load_from_env()?,
    };
    if cli.read_only {
        config.api.read_only = true;
    }

    logging::init_logging(&config.observability);

    tracing::info!(
        base_url = %config.api.base_url,
        default_version = %config.api.default_version,
        read_only = config.api.read_only,
        rate_limit = config.rate_limit.limit,
        window_ms = config.rate_limit.window_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let orchestrator = Orchestrator::from_config(&config)?;

    let ok = match cli.command {
        Commands::Health => {
            let report = orchestrator.health_check().await;
            print_json(&report)?;
            report.healthy
        }
        Commands::Status => {
            let executor = orchestrator.executor();
            let modules: Vec<Value> = orchestrator
                .get_all_modules()
                .into_iter()
                .map(|(_, module)| json!(module.descriptor()))
                .collect();
            print_json(&json!({
                "readOnly": executor.is_read_only(),
                "defaultVersion": executor.default_version(),
                "rateLimit": executor.rate_status(),
                "modules": modules,
            }))?;
            true
        }
        Commands::Get {
            path,
            api_version,
            params,
        } => {
            let mut options = RequestOptions::new().params(params);
            options.api_version = api_version;
            let result: OperationResult<Value> =
                orchestrator.executor().request(Method::GET, &path, options).await;
            print_result(result)?
        }
        Commands::Batch { paths } => {
            let operations = paths.into_iter().map(BatchOperation::get).collect();
            let result: OperationResult<Vec<Value>> = orchestrator.batch(operations).await;
            print_result(result)?
        }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_result<T: Serialize>(result: OperationResult<T>) -> Result<bool, serde_json::Error> {
    match result {
        Ok(value) => {
            print_json(&value)?;
            Ok(true)
        }
        Err(e) => {
            print_json(&e.to_wire())?;
            Ok(false)
        }
    }
}
