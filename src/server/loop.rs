// Server loop module
// Accepts connections until Ctrl-C

use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Accept and serve connections until the process is interrupted
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
) -> Result<(), Box<dyn std::error::Error>> {
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            result = &mut shutdown => {
                result?;
                logger::log_info(&format!(
                    "Shutdown requested, {} connection(s) still open",
                    state.active_connections.load(Ordering::SeqCst)
                ));
                return Ok(());
            }
        }
    }
}
