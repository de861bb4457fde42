use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use log::info;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const SIGNAL_BUFFER: usize = 32;

/// Host-level reachability notification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ConnectivitySignal {
    Reachable,
    Unreachable,
}

impl ConnectivitySignal {
    pub fn from_online(is_online: bool) -> Self {
        if is_online {
            ConnectivitySignal::Reachable
        } else {
            ConnectivitySignal::Unreachable
        }
    }

    pub fn is_online(self) -> bool {
        matches!(self, ConnectivitySignal::Reachable)
    }
}

/// Receiver of relayed connectivity state (the app state in practice).
#[async_trait]
pub trait ConnectivitySink: Send + Sync + 'static {
    async fn set_online(&self, is_online: bool);
}

/// Cloneable handle the host uses to report reachability changes.
#[derive(Debug, Clone)]
pub struct ConnectivityNotifier {
    sender: mpsc::Sender<ConnectivitySignal>,
}

impl ConnectivityNotifier {
    pub async fn report(&self, signal: ConnectivitySignal) -> Result<()> {
        self.sender
            .send(signal)
            .await
            .context("connectivity monitor is not running")
    }
}

/// Relays every reported transition to the sink as soon as it arrives.
/// No debouncing is applied.
pub struct ConnectivityMonitor {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
    notifier: Option<ConnectivityNotifier>,
}

impl ConnectivityMonitor {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
            notifier: None,
        }
    }

    pub fn start<S: ConnectivitySink>(&mut self, sink: S) -> Result<ConnectivityNotifier> {
        if self.handle.is_some() {
            bail!("connectivity monitor already running");
        }

        let (sender, receiver) = mpsc::channel(SIGNAL_BUFFER);
        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(relay_loop(receiver, sink, cancel_token.clone()));
        let notifier = ConnectivityNotifier { sender };

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        self.notifier = Some(notifier.clone());
        Ok(notifier)
    }

    pub fn notifier(&self) -> Option<ConnectivityNotifier> {
        self.notifier.clone()
    }

    pub async fn stop(&mut self) -> Result<()> {
        self.notifier = None;
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("connectivity monitor task failed to join")
        } else {
            Ok(())
        }
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new()
    }
}

async fn relay_loop<S: ConnectivitySink>(
    mut receiver: mpsc::Receiver<ConnectivitySignal>,
    sink: S,
    cancel_token: CancellationToken,
) {
    loop {
        tokio::select! {
            signal = receiver.recv() => match signal {
                Some(signal) => {
                    info!("connectivity signal: {:?}", signal);
                    sink.set_online(signal.is_online()).await;
                }
                None => break,
            },
            _ = cancel_token.cancelled() => break,
        }
    }
    info!("connectivity monitor shutting down");
}
