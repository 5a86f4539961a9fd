// Server loop module
// Accept loop with graceful shutdown

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use super::shutdown::drain_connections;
use crate::config;
use crate::logger;

/// How long shutdown waits for in-flight connections before giving up
const DRAIN_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

/// Run the accept loop until a shutdown signal arrives.
///
/// On shutdown the listener is dropped first (no new connections), then
/// active connections are given `DRAIN_TIMEOUT` to finish.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<config::AppState>,
    active_connections: Arc<AtomicUsize>,
    shutdown: Arc<Notify>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.notified() => {
                logger::log_shutdown_requested();
                break;
            }
        }
    }

    // Stop accepting, then let in-flight requests finish
    drop(listener);
    drain_connections(&active_connections, DRAIN_TIMEOUT).await;

    Ok(())
}
