pub mod advisory;
pub mod app;
pub mod config;
pub mod connectivity;
pub mod i18n;
pub mod intake;
pub mod models;
pub mod navigation;
pub mod readings;
pub mod settings;
mod utils;

use std::sync::Arc;

use anyhow::{Context, Result};
use log::{info, warn};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    sync::{broadcast, mpsc},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

use advisory::{AdvisoryProvider, GeminiProvider};
use app::{commands, AppController, AppEvent};
use config::AppConfig;
use connectivity::{reachability_probe, ConnectivityMonitor};
use readings::{demo, ReadingStore};
use settings::SettingsStore;

/// Process entry: reads commands from stdin and streams events to stdout
/// until stdin closes.
pub fn run() -> Result<()> {
    let config = AppConfig::from_env();

    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(if config.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    info!("GlucaTrack starting up...");

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(serve(config))
}

async fn serve(config: AppConfig) -> Result<()> {
    let settings = SettingsStore::new(config.settings_path())?;
    let provider: Arc<dyn AdvisoryProvider> = Arc::new(GeminiProvider::new(&config)?);
    if config.api_key.is_none() {
        warn!("No advisory credential configured; insights will use fallback text");
    }

    let readings = if config.seed_demo {
        demo::seeded_store()?
    } else {
        ReadingStore::new()
    };

    // Assume reachable until the probe says otherwise.
    let controller = AppController::new(provider, settings, readings, true);

    let (out_tx, out_rx) = mpsc::unbounded_channel::<String>();
    let writer = tokio::spawn(write_lines(out_rx));
    let forwarder = spawn_event_forwarder(&controller, out_tx.clone());

    let mut monitor = ConnectivityMonitor::new();
    let notifier = monitor.start(controller.clone())?;
    let probe_cancel = CancellationToken::new();
    let probe = tokio::spawn(reachability_probe(
        config.probe_addr.clone(),
        config.probe_interval,
        notifier,
        probe_cancel.clone(),
    ));

    controller.refresh_insights().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read command")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let response = commands::handle_line(&controller, line).await;
        if out_tx.send(serde_json::to_string(&response)?).is_err() {
            break;
        }
    }

    info!("Input closed, shutting down");
    probe_cancel.cancel();
    let _ = probe.await;
    monitor.stop().await?;
    forwarder.abort();
    drop(out_tx);
    let _ = writer.await;
    Ok(())
}

/// Mirrors app events and advisory updates onto the output stream.
fn spawn_event_forwarder(
    controller: &AppController,
    out_tx: mpsc::UnboundedSender<String>,
) -> JoinHandle<()> {
    let mut events = controller.subscribe();
    let mut advisory = controller.subscribe_advisory();

    tokio::spawn(async move {
        loop {
            let event = tokio::select! {
                received = events.recv() => match received {
                    Ok(event) => event,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("event stream lagged, {skipped} events dropped");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                changed = advisory.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let latest = advisory.borrow_and_update().clone();
                    AppEvent::AdvisoryChanged { advisory: latest }
                }
            };

            match serde_json::to_string(&event) {
                Ok(line) => {
                    if out_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(err) => warn!("failed to serialize event: {err}"),
            }
        }
    })
}

async fn write_lines(mut out_rx: mpsc::UnboundedReceiver<String>) {
    let mut stdout = tokio::io::stdout();
    while let Some(line) = out_rx.recv().await {
        if stdout.write_all(line.as_bytes()).await.is_err()
            || stdout.write_all(b"\n").await.is_err()
            || stdout.flush().await.is_err()
        {
            break;
        }
    }
}
