// src/main.rs

use std::io::Write;

use color_eyre::eyre::{Result, WrapErr};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{info, warn};

use sentinel_rs_scanner::config::Config;
use sentinel_rs_scanner::core::events::ScanEvent;
use sentinel_rs_scanner::core::orchestrator::ScanOrchestrator;
use sentinel_rs_scanner::core::scanner::LiveProber;
use sentinel_rs_scanner::core::scorer::extract_score;
use sentinel_rs_scanner::logging::initialize_logging;
use sentinel_rs_scanner::transport;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    initialize_logging()?;

    let config = Config::from_env().wrap_err("Invalid configuration")?;
    let prober = LiveProber::new(config.scan.clone())?;

    // With a URL argument, scan once and print the events instead of serving.
    if let Some(url) = std::env::args().nth(1) {
        return scan_once(prober, &config, &url).await;
    }

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .wrap_err_with(|| format!("Failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "Server running.");
    transport::serve(listener, prober, config.scan.probe_deadline).await?;
    Ok(())
}

/// Runs a single scan, writing each event to stdout as one JSON line.
async fn scan_once(prober: LiveProber, config: &Config, url: &str) -> Result<()> {
    let (tx, mut rx) = mpsc::channel(16);
    let deadline = config.scan.probe_deadline;
    let url = url.to_string();
    let scan = tokio::spawn(async move {
        let mut orchestrator = ScanOrchestrator::new(prober, deadline);
        orchestrator.run(&url, &tx).await
    });

    let mut stdout = std::io::stdout();
    while let Some(event) = rx.recv().await {
        serde_json::to_writer(&mut stdout, &event)?;
        writeln!(stdout)?;
        stdout.flush()?;
        if let ScanEvent::Final(summary) = &event {
            info!(score = ?extract_score(&summary.score), verdict = summary.message, "Final event written.");
        }
    }

    match scan.await? {
        Ok(outcome) => {
            info!(deductions = outcome.card.deductions.len(), "One-shot scan complete.");
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "One-shot scan failed.");
            Err(e.into())
        }
    }
}
