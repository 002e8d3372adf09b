use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use ossf_scanner::observability::metrics::get_metrics;
use ossf_scanner::utils::config_loader;
use ossf_scanner::utils::logging;
use ossf_scanner::utils::logging::LogLevel;
use ossf_scanner::Handler;
use serde_json::Value;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Optional YAML config; defaults read everything from the environment
    #[arg(short, long, env = "CONFIG")]
    config: Option<String>,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    /// Event JSON file; read from stdin when omitted
    #[arg(short, long)]
    event: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load config, init logging
    // -------------------------------

    let args = Args::parse();
    let service_config = config_loader::run(args.config.as_deref())?;
    logging::run(&service_config, args.log_level.to_owned());

    // -------------------------------
    // 2. Read the invocation event
    // -------------------------------

    let raw_event = match &args.event {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read event file {}", path))?,
        None => {
            let mut buffer = String::new();
            tokio::io::stdin().read_to_string(&mut buffer).await?;
            buffer
        }
    };
    let event: Value = serde_json::from_str(&raw_event).context("event is not valid JSON")?;

    // -------------------------------
    // 3. Handle it
    // -------------------------------

    let handler = Handler::from_config(Arc::new(service_config))?;
    info!("Handler starting...");
    let response = match handler.handle(&event).await {
        Ok(report) => serde_json::to_value(&report)?,
        Err(_) => Value::Object(Default::default()),
    };
    println!("{}", response);

    debug!("metrics:\n{}", get_metrics().await.render());
    Ok(())
}
