use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::constants::events;
use crate::exchange::{traits::TradingApi, types::AccountSummary};
use crate::notification::{Notification, NotificationQueue};

use super::lock;

/// Last known account figures.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AccountSnapshot {
    /// Margin available
    pub cash: f64,
    /// Account balance
    pub value: f64,
    pub updated_at: Option<DateTime<Utc>>,
}

impl AccountSnapshot {
    /// Fields missing from the summary keep their previous values.
    pub fn apply(&mut self, summary: &AccountSummary) {
        if let Some(margin_available) = summary.margin_available {
            self.cash = margin_available;
        }
        if let Some(balance) = summary.balance {
            self.value = balance;
        }
        self.updated_at = Some(Utc::now());
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AccountCommand {
    Refresh,
}

pub(crate) struct AccountWorker {
    pub api: Arc<dyn TradingApi>,
    pub account_id: String,
    pub interval: Duration,
    pub snapshot: Arc<Mutex<AccountSnapshot>>,
    pub notifications: NotificationQueue,
    pub ready: Arc<watch::Sender<bool>>,
}

impl AccountWorker {
    /// Fetches on every command and whenever `interval` passes without one.
    /// Exits on shutdown, even mid-fetch, or once every command sender is gone.
    pub async fn run(
        self,
        mut commands: mpsc::Receiver<AccountCommand>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        info!(
            "🔄 [ACCOUNT] Worker started for {} via {} (refresh every {:?})",
            self.account_id,
            self.api.name(),
            self.interval
        );

        loop {
            tokio::select! {
                _ = shutdown.recv() => break,
                cmd = commands.recv() => {
                    if cmd.is_none() {
                        break;
                    }
                }
                _ = sleep(self.interval) => {}
            }

            // an in-flight fetch must not hold up shutdown
            tokio::select! {
                _ = shutdown.recv() => break,
                _ = self.refresh() => {}
            }
        }

        info!("[ACCOUNT] Worker stopped for {}", self.account_id);
    }

    async fn refresh(&self) {
        match self.api.account_summary(&self.account_id).await {
            Ok(summary) => {
                let snapshot = {
                    let mut snap = lock(&self.snapshot);
                    snap.apply(&summary);
                    *snap
                };
                info!(
                    event = events::ACCOUNT_REFRESHED,
                    cash = snapshot.cash,
                    value = snapshot.value,
                    "[ACCOUNT] Refreshed {}",
                    self.account_id
                );
                self.ready.send_replace(true);
            }
            Err(e) => {
                warn!(
                    event = events::ACCOUNT_FETCH_FAILED,
                    "⚠️ [ACCOUNT] Summary fetch failed for {}: {} (retry in {:?})",
                    self.account_id,
                    e,
                    self.interval
                );
                self.notifications.put(Notification::from_error(&e));
            }
        }
    }
}
