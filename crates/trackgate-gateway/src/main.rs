//! Gateway process bootstrap: loads configuration, builds the application
//! context, registers input sources in the capability registry, and runs
//! them to completion (or until a shutdown signal arrives).

mod config;
mod context;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::Config;
use context::AppContext;
use trackgate_ingest::{InputSource, SourceRegistry};
use trackgate_mt02::{Mt02Client, Mt02Worker};

/// GPS tracking protocol gateway.
#[derive(Parser, Debug)]
#[command(name = "trackgate-gateway")]
#[command(about = "Ingests vendor device locations and re-emits them as GT06 packets")]
#[command(version)]
struct Args {
    /// Override `LOG_LEVEL` from the environment.
    #[arg(long)]
    log_level: Option<String>,

    /// Load configuration and build the context, then exit without running
    /// any input source.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(log_level) = args.log_level {
        config.log_level = log_level;
    }
    init_logging(&config.log_level);

    info!(
        sources = ?config.workers_input_source,
        default_output_protocol = %config.default_output_protocol,
        "starting trackgate gateway"
    );

    let context = AppContext::build(&config)
        .await
        .context("device state store unreachable at startup")?;

    let registry = build_source_registry(&config, &context)?;

    if args.dry_run {
        info!("dry run: context built successfully, exiting without starting sources");
        return Ok(());
    }

    run_sources(&config, &registry).await;
    Ok(())
}

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn build_source_registry(config: &Config, context: &AppContext) -> anyhow::Result<SourceRegistry> {
    let mut registry = SourceRegistry::new();

    for name in &config.workers_input_source {
        match name.as_str() {
            "mt02" => {
                let client = Mt02Client::new(config.mt02_api_base_url.clone(), config.mt02_api_token.clone())
                    .context("failed to build MT02 client")?;
                let worker = Arc::new(Mt02Worker::new(
                    client,
                    context.store.clone(),
                    context.output.clone(),
                    Duration::from_secs(config.mt02_poll_interval_secs),
                ));
                registry.register(worker);
            }
            other => {
                anyhow::bail!("unknown entry in WORKERS_INPUT_SOURCE: {other}");
            }
        }
    }

    Ok(registry)
}

async fn run_sources(config: &Config, registry: &SourceRegistry) {
    let mut handles = Vec::new();
    for source in registry.all() {
        let source = source.clone();
        let name = source.name();
        info!(source = %name, "starting input source");
        handles.push(tokio::spawn(async move {
            if let Err(err) = source.run().await {
                error!(source = %name, error = %err, "input source exited with an error");
            }
        }));
    }

    if handles.is_empty() {
        info!(sources = ?config.workers_input_source, "no input sources started, exiting");
        return;
    }

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
        _ = wait_for_all(handles) => {
            info!("all input sources exited");
        }
    }
}

async fn wait_for_all(handles: Vec<tokio::task::JoinHandle<()>>) {
    for handle in handles {
        let _ = handle.await;
    }
}
