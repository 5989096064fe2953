// SPDX-License-Identifier: GPL-3.0-only
mod bridge;
mod config;
mod error;
mod fetcher;
mod logging;
mod manifest;
mod reconcile;
mod status;
mod store;
mod sync;
mod utils;

#[cfg(test)]
mod test_helpers;

use std::sync::Arc;

use tokio::signal;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use bridge::{HostMessage, ModuleChannel, ModuleMessage};
use config::Config;
use fetcher::{HttpFetcher, PackageFetcher};
use logging::setup_logging;
use status::{ChannelReporter, StatusEvent, StatusReporter};
use store::{CacheStore, FsCacheStore};
use sync::SyncService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    setup_logging(&config.log_level)?;

    info!("Starting PakSyncDaemon v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the local cache store
    let store: Arc<dyn CacheStore> =
        Arc::new(FsCacheStore::new(config.cache_dir.clone()).await?);
    info!("Cache store initialized at {}", config.cache_dir.display());

    // Initialize the package fetcher
    let fetcher: Arc<dyn PackageFetcher> = Arc::new(HttpFetcher::new(
        &config.remote_base_url,
        config.http_timeout_secs,
    )?);

    // Status events feed the observer task; the channel pair connects the
    // embedding host's module.
    let (status_tx, status_rx) = mpsc::unbounded_channel();
    let reporter: Arc<dyn StatusReporter> = Arc::new(ChannelReporter::new(status_tx));
    let (mut channel, module_endpoint) = ModuleChannel::pair();

    let status_task = tokio::spawn(render_status(status_rx));

    // Run one synchronization session at startup
    let service = Arc::new(SyncService::new(store, fetcher, reporter));
    let sync_service = Arc::clone(&service);
    let sync_task = tokio::spawn(async move { sync_service.synchronize().await });

    match sync_task.await? {
        Ok(outcome) => {
            info!(
                packages = outcome.packages.len(),
                downloaded = outcome.downloaded,
                removed = outcome.removed,
                "Package cache is up to date"
            );
            // Readiness + locale handshake to the module
            if !channel.post(&HostMessage::Lang(config.effective_locale())) {
                warn!("Module channel is closed, readiness handshake not delivered");
            }
        }
        Err(e) => {
            // The daemon stays up; a retry is the caller's decision.
            error!(error = %e, "Synchronization failed");
        }
    }

    info!("Serving module channel. Waiting for shutdown signal...");

    loop {
        tokio::select! {
            message = channel.recv() => match message {
                Some(ModuleMessage::Init) => {
                    info!("Module is initialising");
                }
                Some(ModuleMessage::HideOverlay) => {
                    debug!("Module requested overlay hide");
                }
                Some(ModuleMessage::Navigate(url)) => {
                    info!(url = %url, "Module requested navigation");
                }
                Some(ModuleMessage::Quit) => {
                    info!("Module requested shutdown");
                    break;
                }
                None => {
                    info!("Module channel closed");
                    break;
                }
            },
            result = signal::ctrl_c() => {
                match result {
                    Ok(()) => info!("Received shutdown signal (Ctrl+C)"),
                    Err(err) => error!(error = %err, "Unable to listen for shutdown signal"),
                }
                break;
            }
        }
    }

    // The far end of the channel belongs to the embedding host; it lives
    // exactly as long as the daemon serves it.
    drop(module_endpoint);
    status_task.abort();

    info!("Shutdown complete");
    Ok(())
}

/// Render status events for the operator; this stands in for the HUD the
/// embedding host draws from the same event stream.
async fn render_status(mut rx: mpsc::UnboundedReceiver<StatusEvent>) {
    while let Some(event) = rx.recv().await {
        match event {
            StatusEvent::Checking => info!("Checking for updates"),
            StatusEvent::Downloading {
                package,
                percent: Some(percent),
            } => info!(package = %package, percent, "Downloading"),
            StatusEvent::Downloading {
                package,
                percent: None,
            } => info!(package = %package, "Downloading"),
            StatusEvent::Ready => info!("Package cache ready"),
            StatusEvent::Failed { reason } => error!(reason = %reason, "Update failed"),
        }
    }
}
