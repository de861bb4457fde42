//! Reachability source for hosts without a native online/offline event:
//! periodically opens a TCP connection and reports each change.

use tokio::net::TcpStream;
use tokio::time::{self, Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::monitor::{ConnectivityNotifier, ConnectivitySignal};

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

pub async fn probe_once(addr: &str, timeout: Duration) -> bool {
    matches!(time::timeout(timeout, TcpStream::connect(addr)).await, Ok(Ok(_)))
}

/// Runs until cancelled or until the monitor stops accepting signals.
/// The first result is always reported; afterwards only changes are.
pub async fn reachability_probe(
    addr: String,
    interval: Duration,
    notifier: ConnectivityNotifier,
    cancel_token: CancellationToken,
) {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last: Option<bool> = None;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let reachable = probe_once(&addr, interval).await;
                if last == Some(reachable) {
                    continue;
                }
                last = Some(reachable);
                log_info!("{addr} is {}", if reachable { "reachable" } else { "unreachable" });

                if let Err(err) = notifier.report(ConnectivitySignal::from_online(reachable)).await {
                    log_warn!("reachability probe stopping: {err}");
                    break;
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("reachability probe shutting down");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn detects_listening_and_closed_ports() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        assert!(probe_once(&addr, Duration::from_secs(1)).await);

        drop(listener);
        assert!(!probe_once(&addr, Duration::from_secs(1)).await);
    }
}
