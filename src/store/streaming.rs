use std::time::Duration;

use serde_json::Value;
use tokio::sync::{broadcast, mpsc};
use tokio::time::sleep;
use tracing::debug;

use crate::constants::events;

/// Consumes transactions pushed by the event stream.
pub(crate) async fn run_listener(
    mut transactions: mpsc::Receiver<Value>,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            _ = shutdown.recv() => break,
            trans = transactions.recv() => match trans {
                Some(trans) => on_transaction(&trans),
                None => break,
            },
        }
    }
    debug!("[STREAM] Transaction listener stopped");
}

// Transactions may refer to orders not yet acknowledged; nothing reconciles them.
fn on_transaction(trans: &Value) {
    debug!(
        event = events::TRANSACTION_RECEIVED,
        transaction = %trans,
        "[STREAM] Transaction received"
    );
}

/// Event stream producer. No transport is wired, so after the optional
/// delay it ends, dropping its transaction sender.
pub(crate) async fn run_events(
    _transactions: mpsc::Sender<Value>,
    tmout: Option<Duration>,
    mut shutdown: broadcast::Receiver<()>,
) {
    if let Some(delay) = tmout {
        tokio::select! {
            _ = shutdown.recv() => return,
            _ = sleep(delay) => {}
        }
    }
    debug!("[STREAM] No transaction stream transport configured");
}
