//! The store: one object per process that owns the broker API connection,
//! polls account figures and queues notifications for the host.
//!
//! Brokers and data feeds attach through [`Store::start`]. Background work
//! runs on tokio tasks that listen on a shared shutdown channel, so
//! [`Store::shutdown`] tears everything down explicitly.

mod account;
mod streaming;


use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::constants::{events, store as limits};
use crate::error::{StoreError, StoreResult};
use crate::exchange::{traits::TradingApi, types::OrderRequest};
use crate::granularity::{self, TimeFrame};
use crate::host::{Broker, DataFeed, OandaBroker, OandaData};
use crate::notification::{Notification, NotificationQueue};

pub use account::AccountSnapshot;
use account::{AccountCommand, AccountWorker};

/// Arguments of a historical candle request.
#[derive(Clone, Debug)]
pub struct CandleQuery {
    pub dataname: String,
    pub dtbegin: Option<DateTime<Utc>>,
    pub dtend: Option<DateTime<Utc>>,
    pub timeframe: TimeFrame,
    pub compression: u32,
    pub candle_format: String,
    pub include_first: bool,
}

pub struct Store {
    config: StoreConfig,
    api: Arc<dyn TradingApi>,
    account: Arc<Mutex<AccountSnapshot>>,
    notifications: NotificationQueue,
    datas: Mutex<Vec<Arc<dyn DataFeed>>>,
    broker: Mutex<Option<Arc<dyn Broker>>>,
    ready: Arc<watch::Sender<bool>>,
    shutdown_tx: broadcast::Sender<()>,
    shut_down: AtomicBool,
    account_tx: Mutex<Option<mpsc::Sender<AccountCommand>>>,
    transactions_tx: Mutex<Option<mpsc::Sender<Value>>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Store {
    pub fn new(config: StoreConfig, api: Arc<dyn TradingApi>) -> Self {
        let (ready, _) = watch::channel(false);
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            config,
            api,
            account: Arc::new(Mutex::new(AccountSnapshot::default())),
            notifications: NotificationQueue::new(),
            datas: Mutex::new(Vec::new()),
            broker: Mutex::new(None),
            ready: Arc::new(ready),
            shutdown_tx,
            shut_down: AtomicBool::new(false),
            account_tx: Mutex::new(None),
            transactions_tx: Mutex::new(None),
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns a data feed bound to this store.
    pub fn get_data(
        self: &Arc<Self>,
        dataname: impl Into<String>,
        timeframe: TimeFrame,
        compression: u32,
    ) -> Arc<OandaData> {
        Arc::new(OandaData::new(self.clone(), dataname, timeframe, compression))
    }

    /// Returns a broker bound to this store.
    pub fn get_broker(self: &Arc<Self>) -> Arc<OandaBroker> {
        Arc::new(OandaBroker::new(self.clone()))
    }

    /// Registers a data feed or a broker.
    ///
    /// A feed is recorded and announced to the registered broker. A broker
    /// starts the background workers and waits up to `account_tmout` for the
    /// first account snapshot. When both are given only the feed is handled.
    pub async fn start(
        &self,
        data: Option<Arc<dyn DataFeed>>,
        broker: Option<Arc<dyn Broker>>,
    ) -> StoreResult<()> {
        if self.is_shut_down() {
            return Err(StoreError::ShutDown);
        }

        if let Some(data) = data {
            info!(
                "[STORE] Data feed {} registered ({:?}/{})",
                data.name(),
                data.timeframe(),
                data.compression()
            );
            lock(&self.datas).push(data.clone());

            let broker = lock(&self.broker).clone();
            if let Some(broker) = broker {
                broker.data_started(data.as_ref());
            }
            return Ok(());
        }

        if let Some(broker) = broker {
            *lock(&self.broker) = Some(broker);
            self.start_broker_workers().await?;
        }

        Ok(())
    }

    /// Host lifecycle hook. Use [`Store::shutdown`] to stop the workers.
    pub fn stop(&self) -> StoreResult<()> {
        Err(StoreError::not_implemented("stop"))
    }

    /// Signals every worker to exit and waits for them. Idempotent.
    pub async fn shutdown(&self) {
        // flag, signal and handle list change together under the task lock,
        // so a worker is either refused or subscribed before the signal
        let handles: Vec<JoinHandle<()>> = {
            let mut tasks = lock(&self.tasks);
            if self.shut_down.swap(true, Ordering::SeqCst) {
                return;
            }
            let _ = self.shutdown_tx.send(());
            tasks.drain(..).collect()
        };
        info!("[STORE] Shutting down");

        lock(&self.account_tx).take();
        lock(&self.transactions_tx).take();

        for handle in handles {
            if let Err(e) = handle.await {
                warn!("[STORE] Worker ended abnormally: {}", e);
            }
        }

        // the broker and feeds hold the store; dropping them here breaks the cycle
        lock(&self.broker).take();
        lock(&self.datas).clear();
        info!("[STORE] Shutdown complete");
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }

    pub fn put_notification(&self, msg: impl Into<String>, args: Vec<Value>, kwargs: Map<String, Value>) {
        self.notifications
            .put(Notification::new(msg).with_args(args).with_kwargs(kwargs));
    }

    /// Pending notifications, oldest first. Each call returns only what was
    /// queued since the previous call.
    pub fn get_notifications(&self) -> Vec<Notification> {
        self.notifications.drain()
    }

    pub fn get_granularity(&self, timeframe: TimeFrame, compression: u32) -> Option<&'static str> {
        granularity::lookup(timeframe, compression)
    }

    pub fn get_cash(&self) -> f64 {
        lock(&self.account).cash
    }

    pub fn get_value(&self) -> f64 {
        lock(&self.account).value
    }

    pub fn account_snapshot(&self) -> AccountSnapshot {
        *lock(&self.account)
    }

    pub fn datas(&self) -> Vec<Arc<dyn DataFeed>> {
        lock(&self.datas).clone()
    }

    pub fn has_broker(&self) -> bool {
        lock(&self.broker).is_some()
    }

    /// Asks the account worker for an immediate fetch. Returns false when
    /// no worker is running or its queue is full.
    pub fn refresh_account(&self) -> bool {
        match lock(&self.account_tx).as_ref() {
            Some(tx) => tx.try_send(AccountCommand::Refresh).is_ok(),
            None => false,
        }
    }

    /// Waits up to `timeout` for the first successful account fetch.
    pub async fn wait_account_ready(&self, timeout: Duration) -> bool {
        let mut rx = self.ready.subscribe();
        // bound to a local so the borrow of `rx` ends before `rx` is dropped
        let result = tokio::time::timeout(timeout, rx.wait_for(|ready| *ready)).await;
        matches!(result, Ok(Ok(_)))
    }

    /// Sender feeding the transaction listener, once a broker has started.
    pub fn transaction_sender(&self) -> Option<mpsc::Sender<Value>> {
        lock(&self.transactions_tx).clone()
    }

    /// Spawns the transaction listener and the event stream task and returns
    /// the channel transactions are delivered on.
    pub fn streaming_events(&self, tmout: Option<Duration>) -> StoreResult<mpsc::Sender<Value>> {
        let (tx, rx) = mpsc::channel(limits::TRANSACTION_CAPACITY);
        let events_tx = tx.clone();

        self.spawn_workers(move |shutdown| {
            vec![
                tokio::spawn(streaming::run_listener(rx, shutdown.subscribe())),
                tokio::spawn(streaming::run_events(events_tx, tmout, shutdown.subscribe())),
            ]
        })?;
        Ok(tx)
    }

    pub fn streaming_prices(
        &self,
        dataname: &str,
        _tmout: Option<Duration>,
    ) -> StoreResult<mpsc::Receiver<Value>> {
        debug!("[STORE] Price stream requested for {}", dataname);
        Err(StoreError::not_implemented("streaming_prices"))
    }

    pub fn order_create(
        &self,
        order: &OrderRequest,
        _stopside: Option<&OrderRequest>,
        _takeside: Option<&OrderRequest>,
    ) -> StoreResult<()> {
        debug!("[STORE] Order {} for {} not sent", order.reference, order.instrument);
        Err(StoreError::not_implemented("order_create"))
    }

    pub fn order_cancel(&self, order: &OrderRequest) -> StoreResult<()> {
        debug!("[STORE] Cancel of order {} not sent", order.reference);
        Err(StoreError::not_implemented("order_cancel"))
    }

    pub fn get_positions(&self) -> StoreResult<Vec<Value>> {
        Err(StoreError::not_implemented("get_positions"))
    }

    pub fn get_instrument(&self, _dataname: &str) -> StoreResult<Value> {
        Err(StoreError::not_implemented("get_instrument"))
    }

    pub fn candles(&self, _query: &CandleQuery) -> StoreResult<Vec<Value>> {
        Err(StoreError::not_implemented("candles"))
    }

    /// Runs `spawn` and tracks its handles, unless shutdown already began.
    fn spawn_workers<F>(&self, spawn: F) -> StoreResult<()>
    where
        F: FnOnce(&broadcast::Sender<()>) -> Vec<JoinHandle<()>>,
    {
        let mut tasks = lock(&self.tasks);
        if self.is_shut_down() {
            return Err(StoreError::ShutDown);
        }
        tasks.extend(spawn(&self.shutdown_tx));
        Ok(())
    }

    async fn start_broker_workers(&self) -> StoreResult<()> {
        let started = {
            let mut account_tx = lock(&self.account_tx);
            if account_tx.is_some() {
                false
            } else {
                let (tx, rx) = mpsc::channel(limits::ACCOUNT_COMMAND_CAPACITY);
                // force an immediate update
                let _ = tx.try_send(AccountCommand::Refresh);

                let worker = AccountWorker {
                    api: self.api.clone(),
                    account_id: self.config.account.clone(),
                    interval: self.config.refresh_interval(),
                    snapshot: self.account.clone(),
                    notifications: self.notifications.clone(),
                    ready: self.ready.clone(),
                };
                self.spawn_workers(|shutdown| {
                    vec![tokio::spawn(worker.run(rx, shutdown.subscribe()))]
                })?;
                *account_tx = Some(tx);
                true
            }
        };

        if !started {
            warn!("[STORE] Broker replaced; workers already running");
            return Ok(());
        }

        let transactions = self.streaming_events(None)?;
        {
            // shutdown sets the flag before clearing this slot
            let mut slot = lock(&self.transactions_tx);
            if !self.is_shut_down() {
                *slot = Some(transactions);
            }
        }

        let timeout = self.config.refresh_interval();
        if self.wait_account_ready(timeout).await {
            info!(
                "✅ [STORE] Account ready: cash={:.2} value={:.2}",
                self.get_cash(),
                self.get_value()
            );
        } else {
            warn!(
                event = events::ACCOUNT_READY_TIMEOUT,
                "⚠️ [STORE] No account snapshot after {:?}, continuing",
                timeout
            );
        }
        Ok(())
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(());
    }
}

// A poisoned lock still guards consistent data: every critical section is a
// plain field update.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
