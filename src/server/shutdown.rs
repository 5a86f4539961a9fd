// Shutdown drain module
// Waits for in-flight connections after the listener has closed

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::logger;

/// Poll interval while waiting for the connection counter to reach zero
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Wait until all active connections have finished, or the deadline passes.
///
/// The listener must already be closed: the counter only decreases once no
/// new connections are being accepted, so this terminates. Connections
/// still active at the deadline are abandoned to their tasks and logged.
pub async fn drain_connections(conn_counter: &AtomicUsize, timeout: Duration) {
    let deadline = tokio::time::Instant::now() + timeout;

    loop {
        let active = conn_counter.load(Ordering::SeqCst);
        if active == 0 {
            logger::log_shutdown_complete();
            return;
        }

        if tokio::time::Instant::now() >= deadline {
            logger::log_shutdown_timeout(active);
            return;
        }

        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_drain_returns_immediately_when_idle() {
        let counter = AtomicUsize::new(0);
        let started = std::time::Instant::now();
        drain_connections(&counter, Duration::from_secs(5)).await;
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_drain_waits_for_active_connection() {
        let counter = Arc::new(AtomicUsize::new(1));

        let background = Arc::clone(&counter);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            background.fetch_sub(1, Ordering::SeqCst);
        });

        drain_connections(&counter, Duration::from_secs(5)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_drain_gives_up_at_deadline() {
        let counter = AtomicUsize::new(3);
        drain_connections(&counter, Duration::from_millis(150)).await;
        // Counter untouched: the stuck connections are abandoned
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }
}
